//! Writers for the COLMAP text model and the image matching list.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::ConvertError;
use crate::pair_selection::CandidatePair;
use crate::pose::PoseStore;
use crate::shared_camera::SharedCamera;

pub const OUTPUT_CAMERAS: &str = "cameras.txt";
pub const OUTPUT_IMAGES: &str = "images.txt";
pub const OUTPUT_POINTS3D: &str = "points3D.txt";
pub const OUTPUT_MATCHES: &str = "matches.txt";

pub(crate) fn write_file<F>(path: &Path, body: F) -> Result<(), ConvertError>
where
    F: FnOnce(&mut BufWriter<File>) -> std::io::Result<()>,
{
    let file = File::create(path).map_err(|e| ConvertError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    body(&mut writer)
        .and_then(|_| writer.flush())
        .map_err(|e| ConvertError::io(path, e))
}

// adding 0.0 turns -0.0 into 0.0
fn positive_zero(v: f64) -> f64 {
    v + 0.0
}

pub fn write_cameras_txt(
    path: impl AsRef<Path>,
    camera: &SharedCamera,
) -> Result<(), ConvertError> {
    write_file(path.as_ref(), |w| {
        for line in &camera.lines {
            writeln!(w, "{}", line)?;
        }
        Ok(())
    })
}

/// Writes one entry per pose with an image id, `None` entries are left out.
/// Every image gets an empty observation line and the shared camera id.
///
/// Returns the number of images written.
pub fn write_images_txt(
    path: impl AsRef<Path>,
    store: &PoseStore,
    image_ids: &[Option<u32>],
    camera_id: u32,
) -> Result<usize, ConvertError> {
    let entries: Vec<_> = store
        .iter()
        .zip(image_ids)
        .filter_map(|(pose, id)| id.map(|id| (id, pose)))
        .collect();

    write_file(path.as_ref(), |w| {
        writeln!(w, "# Image list with two lines of data per image:")?;
        writeln!(w, "#   IMAGE_ID, QW, QX, QY, QZ, TX, TY, TZ, CAMERA_ID, NAME")?;
        writeln!(w, "#   POINTS2D[] as (X, Y, POINT3D_ID)")?;
        writeln!(
            w,
            "# Number of images: {} , mean observations per image: 0.0",
            entries.len()
        )?;
        for (image_id, pose) in &entries {
            let cam_from_world = pose.world_to_camera();
            let q = cam_from_world.rotation.quaternion();
            let t = cam_from_world.translation.vector;
            writeln!(
                w,
                "{} {} {} {} {} {} {} {} {} {}",
                image_id,
                positive_zero(q.w),
                positive_zero(q.i),
                positive_zero(q.j),
                positive_zero(q.k),
                positive_zero(t.x),
                positive_zero(t.y),
                positive_zero(t.z),
                camera_id,
                pose.name
            )?;
            writeln!(w)?;
        }
        Ok(())
    })?;
    Ok(entries.len())
}

/// Header only, the model has no points yet.
pub fn write_points3d_txt(path: impl AsRef<Path>) -> Result<(), ConvertError> {
    write_file(path.as_ref(), |w| {
        writeln!(w, "# 3D point list with one line of data per point:")?;
        writeln!(
            w,
            "#   POINT3D_ID, X, Y, Z, R, G, B, ERROR, TRACK[] as (IMAGE_ID, POINT2D_IDX)"
        )?;
        writeln!(w, "#   POINTS2D[] as (X, Y, POINT3D_ID)")?;
        writeln!(w, "# Number of points: -, mean track length: 0.0")
    })
}

pub fn write_matches_txt(
    path: impl AsRef<Path>,
    store: &PoseStore,
    pairs: &[CandidatePair],
) -> Result<(), ConvertError> {
    write_file(path.as_ref(), |w| {
        for pair in pairs {
            let (first, second) = pair.names(store);
            writeln!(w, "{} {}", first, second)?;
        }
        Ok(())
    })
}
