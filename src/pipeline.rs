use std::path::PathBuf;

use crate::colmap::{
    OUTPUT_CAMERAS, OUTPUT_IMAGES, OUTPUT_MATCHES, OUTPUT_POINTS3D, write_cameras_txt,
    write_images_txt, write_matches_txt, write_points3d_txt,
};
use crate::error::ConvertError;
use crate::id_map::{ImageIdMap, MissingIdPolicy, resolve_image_ids};
use crate::pair_selection::{PairSelectionConfig, select_pairs};
use crate::pose::PoseStore;
use crate::report::{ConversionSummary, now_timestamp};
use crate::shared_camera::SharedCamera;

/// Input files of a conversion run.
#[derive(Debug, Clone)]
pub struct ConvertInputs {
    /// PoseNet `dataset_train.txt`.
    pub pose_list: PathBuf,
    /// `name id` list exported from the COLMAP database.
    pub name_id_list: PathBuf,
    pub output_dir: PathBuf,
    /// COLMAP `cameras.txt` holding the camera used by every image.
    pub shared_camera: PathBuf,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ConvertOptions {
    pub selection: PairSelectionConfig,
    pub missing_id: MissingIdPolicy,
}

/// Runs a full conversion and writes `cameras.txt`, `images.txt`,
/// `points3D.txt` and `matches.txt` into the output directory.
///
/// All inputs are read and every image id is resolved before the first output
/// file is created.
pub fn run(
    inputs: &ConvertInputs,
    options: &ConvertOptions,
) -> Result<ConversionSummary, ConvertError> {
    let camera = SharedCamera::load(&inputs.shared_camera)?;
    let store = PoseStore::load(&inputs.pose_list)?;
    let selection = select_pairs(&store, &options.selection);
    let id_map = ImageIdMap::load(&inputs.name_id_list)?;
    let image_ids = resolve_image_ids(&store, &id_map, options.missing_id)?;

    let out = &inputs.output_dir;
    std::fs::create_dir_all(out).map_err(|e| ConvertError::io(out, e))?;
    write_cameras_txt(out.join(OUTPUT_CAMERAS), &camera)?;
    let images_written =
        write_images_txt(out.join(OUTPUT_IMAGES), &store, &image_ids, camera.camera_id)?;
    write_points3d_txt(out.join(OUTPUT_POINTS3D))?;
    write_matches_txt(out.join(OUTPUT_MATCHES), &store, &selection.pairs)?;
    log::info!(
        "wrote {} images and {} pairs to {}",
        images_written,
        selection.pairs.len(),
        out.display()
    );

    let skipped_images = store
        .iter()
        .zip(&image_ids)
        .filter(|(_, id)| id.is_none())
        .map(|(pose, _)| pose.name.clone())
        .collect();

    Ok(ConversionSummary {
        timestamp: now_timestamp(),
        output_dir: out.clone(),
        shared_camera_id: camera.camera_id,
        pose_count: store.len(),
        images_written,
        skipped_images,
        pair_count: selection.pairs.len(),
        selection: options.selection,
        stats: selection.stats,
    })
}
