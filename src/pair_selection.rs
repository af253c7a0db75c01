//! Pose based selection of image pairs to match.
//!
//! Two cameras are paired when their centres are close and they look in similar
//! directions. Both thresholds are inclusive.

use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use nalgebra as na;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::pose::{Pose, PoseStore};

pub const DEFAULT_MAX_POSITION_DISTANCE: f64 = 10.0;
pub const DEFAULT_MAX_ROTATION_ANGLE_DEGREES: f64 = 45.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PairSelectionConfig {
    /// Largest distance between camera centres, in input units.
    pub max_position_distance: f64,
    /// Largest relative rotation between the two cameras.
    pub max_rotation_angle_degrees: f64,
}

impl Default for PairSelectionConfig {
    fn default() -> Self {
        Self {
            max_position_distance: DEFAULT_MAX_POSITION_DISTANCE,
            max_rotation_angle_degrees: DEFAULT_MAX_ROTATION_ANGLE_DEGREES,
        }
    }
}

/// Two distinct poses of a [`PoseStore`], `first < second`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CandidatePair {
    pub first: usize,
    pub second: usize,
}

impl CandidatePair {
    pub fn names<'a>(&self, store: &'a PoseStore) -> (&'a str, &'a str) {
        (store[self.first].name.as_str(), store[self.second].name.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PairVerdict {
    /// Centres too far apart, the rotation was not looked at.
    TooFar { distance: f64 },
    TooRotated { distance: f64, angle_degrees: f64 },
    Retained { distance: f64, angle_degrees: f64 },
}

impl PairVerdict {
    pub fn is_retained(&self) -> bool {
        matches!(self, PairVerdict::Retained { .. })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SelectionStats {
    pub evaluated: usize,
    pub rejected_by_distance: usize,
    pub rejected_by_rotation: usize,
}

impl SelectionStats {
    fn merged(self, other: SelectionStats) -> SelectionStats {
        SelectionStats {
            evaluated: self.evaluated + other.evaluated,
            rejected_by_distance: self.rejected_by_distance + other.rejected_by_distance,
            rejected_by_rotation: self.rejected_by_rotation + other.rejected_by_rotation,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PairSelection {
    pub pairs: Vec<CandidatePair>,
    pub stats: SelectionStats,
}

/// Angle in radians, in `[0, pi]`, of the rotation `a * b^-1`.
///
/// Computed as `2 * atan2(|v|, |w|)` of the relative quaternion, which stays
/// well conditioned near 0 and near pi and does not depend on the sign of
/// either quaternion.
pub fn relative_rotation_angle(a: &na::UnitQuaternion<f64>, b: &na::UnitQuaternion<f64>) -> f64 {
    let rel = a * b.inverse();
    2.0 * rel.imag().norm().atan2(rel.scalar().abs())
}

pub fn relative_rotation_angle_degrees(
    a: &na::UnitQuaternion<f64>,
    b: &na::UnitQuaternion<f64>,
) -> f64 {
    relative_rotation_angle(a, b).to_degrees()
}

/// A NaN distance or angle never passes a threshold.
pub fn evaluate_pair(a: &Pose, b: &Pose, config: &PairSelectionConfig) -> PairVerdict {
    let distance = na::distance(&a.position, &b.position);
    if !(distance <= config.max_position_distance) {
        return PairVerdict::TooFar { distance };
    }
    let angle_degrees = relative_rotation_angle_degrees(&a.orientation, &b.orientation);
    if !(angle_degrees <= config.max_rotation_angle_degrees) {
        PairVerdict::TooRotated {
            distance,
            angle_degrees,
        }
    } else {
        PairVerdict::Retained {
            distance,
            angle_degrees,
        }
    }
}

fn select_row(
    poses: &[Pose],
    i: usize,
    config: &PairSelectionConfig,
) -> (Vec<CandidatePair>, SelectionStats) {
    let mut pairs = Vec::new();
    let mut stats = SelectionStats::default();
    for j in (i + 1)..poses.len() {
        stats.evaluated += 1;
        match evaluate_pair(&poses[i], &poses[j], config) {
            PairVerdict::TooFar { .. } => stats.rejected_by_distance += 1,
            PairVerdict::TooRotated { .. } => stats.rejected_by_rotation += 1,
            PairVerdict::Retained { .. } => pairs.push(CandidatePair {
                first: i,
                second: j,
            }),
        }
    }
    (pairs, stats)
}

const MIN_ROWS_FOR_PROGRESS: usize = 1000;

fn row_progress_bar(rows: usize) -> ProgressBar {
    if rows < MIN_ROWS_FOR_PROGRESS {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(rows as u64);
    if let Ok(style) = ProgressStyle::with_template("{msg} [{bar:40}] {pos}/{len} ({eta})") {
        bar.set_style(style);
    }
    bar.set_message("selecting pairs");
    bar
}

/// Checks every pair `i < j` of the store.
///
/// Rows are spread over the rayon pool; the result keeps the `(i, j)` order of
/// a sequential double loop.
pub fn select_pairs(store: &PoseStore, config: &PairSelectionConfig) -> PairSelection {
    let poses = store.as_slice();
    let bar = row_progress_bar(poses.len());
    let rows: Vec<_> = (0..poses.len())
        .into_par_iter()
        .progress_with(bar.clone())
        .map(|i| select_row(poses, i, config))
        .collect();
    bar.finish_and_clear();

    let mut selection = PairSelection::default();
    for (pairs, stats) in rows {
        selection.pairs.extend(pairs);
        selection.stats = selection.stats.merged(stats);
    }
    log::info!(
        "found {} pairs for {} images ({} too far, {} too rotated)",
        selection.pairs.len(),
        poses.len(),
        selection.stats.rejected_by_distance,
        selection.stats.rejected_by_rotation
    );
    selection
}
