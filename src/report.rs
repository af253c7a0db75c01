use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::ConvertError;
use crate::pair_selection::{PairSelectionConfig, SelectionStats};

/// What a conversion run produced.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionSummary {
    /// Unix time of the end of the run, in seconds.
    pub timestamp: i64,
    pub output_dir: PathBuf,
    pub shared_camera_id: u32,
    pub pose_count: usize,
    pub images_written: usize,
    pub skipped_images: Vec<String>,
    pub pair_count: usize,
    pub selection: PairSelectionConfig,
    pub stats: SelectionStats,
}

pub(crate) fn now_timestamp() -> i64 {
    time::OffsetDateTime::now_utc().unix_timestamp()
}

/// Writes the summary as pretty printed JSON.
pub fn write_summary_json(
    output_path: impl AsRef<Path>,
    summary: &ConversionSummary,
) -> Result<(), ConvertError> {
    let output_path = output_path.as_ref();
    let json = serde_json::to_string_pretty(summary)?;
    std::fs::write(output_path, json).map_err(|e| ConvertError::io(output_path, e))
}
