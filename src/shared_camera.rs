use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::ConvertError;

/// A single COLMAP camera shared by every image of the model.
#[derive(Debug, Clone, PartialEq)]
pub struct SharedCamera {
    pub camera_id: u32,
    /// Camera model name of the id line, e.g. `PINHOLE`.
    pub model: Option<String>,
    /// Non-blank lines of the source file, comments included.
    pub lines: Vec<String>,
}

impl SharedCamera {
    /// Reads a COLMAP `cameras.txt` and takes the id of its first camera.
    pub fn load(path: impl AsRef<Path>) -> Result<SharedCamera, ConvertError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| ConvertError::io(path, e))?;
        Self::from_reader(BufReader::new(file), path)
    }

    pub fn from_reader<R: BufRead>(reader: R, source: &Path) -> Result<SharedCamera, ConvertError> {
        let lines = reader
            .lines()
            .filter(|line| !matches!(line, Ok(l) if l.trim().is_empty()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ConvertError::io(source, e))?;

        // only the first camera line counts, a bad id there is not skipped over
        let mut parts = lines
            .iter()
            .find(|line| !line.starts_with('#'))
            .map(|line| line.split_whitespace())
            .ok_or_else(|| ConvertError::MissingSharedCameraId {
                path: source.to_path_buf(),
            })?;
        let camera_id = parts
            .next()
            .and_then(|token| token.parse::<u32>().ok())
            .ok_or_else(|| ConvertError::MissingSharedCameraId {
                path: source.to_path_buf(),
            })?;
        let model = parts.next().map(str::to_string);

        log::info!(
            "using shared camera with id {} ({})",
            camera_id,
            model.as_deref().unwrap_or("unknown model")
        );
        Ok(SharedCamera {
            camera_id,
            model,
            lines,
        })
    }
}
