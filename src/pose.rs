use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use nalgebra as na;

use crate::error::ConvertError;

/// Number of header lines at the top of a PoseNet pose list.
pub const POSE_LIST_HEADER_LINES: usize = 3;

const FIELDS_PER_RECORD: usize = 8;
const PROGRESS_EVERY: usize = 100;
const MIN_QUATERNION_NORM: f64 = 1e-12;

/// A camera pose: centre in world coordinates and world to camera rotation.
#[derive(Debug, Clone, PartialEq)]
pub struct Pose {
    pub name: String,
    pub position: na::Point3<f64>,
    pub orientation: na::UnitQuaternion<f64>,
}

impl Pose {
    pub fn new(
        name: impl Into<String>,
        position: na::Point3<f64>,
        orientation: na::UnitQuaternion<f64>,
    ) -> Pose {
        Pose {
            name: name.into(),
            position,
            orientation,
        }
    }

    /// World to camera transform, `x_cam = R * x_world + t` with `t = -R * c`.
    pub fn world_to_camera(&self) -> na::Isometry3<f64> {
        let t = -(self.orientation * self.position.coords);
        na::Isometry3::from_parts(na::Translation3::from(t), self.orientation)
    }
}

/// Poses in file order. Filled once by the loader, read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct PoseStore {
    poses: Vec<Pose>,
}

impl PoseStore {
    pub fn from_poses(poses: Vec<Pose>) -> PoseStore {
        warn_duplicate_names(&poses);
        PoseStore { poses }
    }

    /// Loads a PoseNet `dataset_train.txt` style list.
    ///
    /// The first three lines are skipped, every other non-blank line must read
    /// `name px py pz qw qx qy qz`. Any malformed record fails the whole load.
    pub fn load(path: impl AsRef<Path>) -> Result<PoseStore, ConvertError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| ConvertError::io(path, e))?;
        Self::from_reader(BufReader::new(file), path)
    }

    /// Same as [`PoseStore::load`] on an already opened reader. `source` is only
    /// used in error messages.
    pub fn from_reader<R: BufRead>(reader: R, source: &Path) -> Result<PoseStore, ConvertError> {
        let mut poses = Vec::new();
        for (idx, line) in reader.lines().enumerate().skip(POSE_LIST_HEADER_LINES) {
            let line_number = idx + 1;
            let line = line.map_err(|e| ConvertError::io(source, e))?;
            if line.trim().is_empty() {
                continue;
            }
            poses.push(parse_pose_line(&line, source, line_number)?);
            if poses.len() % PROGRESS_EVERY == 0 {
                log::debug!("loaded {} poses", poses.len());
            }
        }
        log::info!("loaded {} poses from {}", poses.len(), source.display());
        Ok(Self::from_poses(poses))
    }

    pub fn len(&self) -> usize {
        self.poses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&Pose> {
        self.poses.get(idx)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Pose> {
        self.poses.iter()
    }

    pub fn as_slice(&self) -> &[Pose] {
        &self.poses
    }
}

impl std::ops::Index<usize> for PoseStore {
    type Output = Pose;

    fn index(&self, idx: usize) -> &Pose {
        &self.poses[idx]
    }
}

fn warn_duplicate_names(poses: &[Pose]) {
    let mut seen = HashSet::with_capacity(poses.len());
    for pose in poses {
        if !seen.insert(pose.name.as_str()) {
            log::warn!("duplicate pose name {}", pose.name);
        }
    }
}

/// Rejects `nan` and `inf` too, `f64::from_str` accepts both.
fn parse_field(s: &str, source: &Path, line: usize) -> Result<f64, ConvertError> {
    let v = s
        .parse::<f64>()
        .map_err(|e| ConvertError::parse(source, line, format!("{}: {}", s, e)))?;
    if !v.is_finite() {
        return Err(ConvertError::parse(
            source,
            line,
            format!("{}: not a finite number", s),
        ));
    }
    Ok(v)
}

/// `name px py pz qw qx qy qz`, quaternion scalar first.
fn parse_pose_line(line: &str, source: &Path, line_number: usize) -> Result<Pose, ConvertError> {
    let parts = line.split_whitespace().collect::<Vec<_>>();
    if parts.len() != FIELDS_PER_RECORD {
        return Err(ConvertError::parse(
            source,
            line_number,
            format!(
                "expected {} fields, found {}",
                FIELDS_PER_RECORD,
                parts.len()
            ),
        ));
    }

    let values = parts[1..]
        .iter()
        .map(|s| parse_field(s, source, line_number))
        .collect::<Result<Vec<_>, _>>()?;

    let position = na::Point3::new(values[0], values[1], values[2]);
    let raw = na::Quaternion::new(values[3], values[4], values[5], values[6]);
    // a norm overflowing to inf would normalize to NaN
    let orientation = Some(raw)
        .filter(|q| q.norm().is_finite())
        .and_then(|q| na::UnitQuaternion::try_new(q, MIN_QUATERNION_NORM))
        .ok_or_else(|| ConvertError::DegenerateOrientation {
            path: source.to_path_buf(),
            line: line_number,
            name: parts[0].to_string(),
        })?;

    Ok(Pose::new(parts[0], position, orientation))
}
