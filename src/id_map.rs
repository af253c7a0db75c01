use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::ConvertError;
use crate::pose::PoseStore;

/// Image name to COLMAP image id, read from a `name id` list.
#[derive(Debug, Clone, Default)]
pub struct ImageIdMap {
    ids: HashMap<String, u32>,
}

impl ImageIdMap {
    pub fn load(path: impl AsRef<Path>) -> Result<ImageIdMap, ConvertError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| ConvertError::io(path, e))?;
        Self::from_reader(BufReader::new(file), path)
    }

    /// Later entries for the same name overwrite earlier ones.
    pub fn from_reader<R: BufRead>(reader: R, source: &Path) -> Result<ImageIdMap, ConvertError> {
        let mut ids = HashMap::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| ConvertError::io(source, e))?;
            let mut parts = line.split_whitespace();
            let Some(name) = parts.next() else {
                continue;
            };
            let id = parts
                .next()
                .ok_or_else(|| ConvertError::parse(source, idx + 1, "missing image id"))?;
            let id = id.parse::<u32>().map_err(|e| {
                ConvertError::parse(source, idx + 1, format!("{}: {}", id, e))
            })?;
            if let Some(previous) = ids.insert(name.to_string(), id) {
                log::debug!("{} remapped from id {} to {}", name, previous, id);
            }
        }
        log::info!("loaded {} image ids from {}", ids.len(), source.display());
        Ok(ImageIdMap { ids })
    }

    pub fn get(&self, name: &str) -> Option<u32> {
        self.ids.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl FromIterator<(String, u32)> for ImageIdMap {
    fn from_iter<I: IntoIterator<Item = (String, u32)>>(iter: I) -> Self {
        ImageIdMap {
            ids: iter.into_iter().collect(),
        }
    }
}

/// What to do with a pose whose name is not in the id list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MissingIdPolicy {
    /// Abort before any output is written.
    #[default]
    Error,
    /// Leave the image out of `images.txt`.
    Skip,
}

/// Image ids for every pose of the store, `None` for skipped poses.
pub fn resolve_image_ids(
    store: &PoseStore,
    id_map: &ImageIdMap,
    policy: MissingIdPolicy,
) -> Result<Vec<Option<u32>>, ConvertError> {
    store
        .iter()
        .map(|pose| match (id_map.get(&pose.name), policy) {
            (Some(id), _) => Ok(Some(id)),
            (None, MissingIdPolicy::Error) => Err(ConvertError::MissingImageId {
                name: pose.name.clone(),
            }),
            (None, MissingIdPolicy::Skip) => {
                log::warn!("no image id for {}, skipping it", pose.name);
                Ok(None)
            }
        })
        .collect()
}
