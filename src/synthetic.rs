//! Seeded synthetic PoseNet datasets.

use std::io::Write;
use std::path::Path;

use nalgebra as na;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::colmap::write_file;
use crate::error::ConvertError;
use crate::pose::Pose;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyntheticConfig {
    pub num_poses: usize,
    /// Distance travelled between consecutive poses.
    pub step: f64,
    /// Heading change between consecutive poses.
    pub yaw_step_degrees: f64,
    /// Uniform jitter added to every coordinate of the camera centre.
    pub position_noise: f64,
    pub seed: u64,
    pub first_image_id: u32,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            num_poses: 50,
            step: 2.0,
            yaw_step_degrees: 5.0,
            position_noise: 0.1,
            seed: 0,
            first_image_id: 1,
        }
    }
}

/// Camera looking along its walking direction on the ground plane, world `z` up.
fn camera_orientation(yaw: f64) -> na::UnitQuaternion<f64> {
    // camera z forward, y down, x right for a yaw of zero looking along world x
    let cam_to_world = na::Rotation3::from_matrix_unchecked(na::Matrix3::new(
        0.0, 0.0, 1.0, //
        -1.0, 0.0, 0.0, //
        0.0, -1.0, 0.0,
    ));
    let heading = na::Rotation3::from_axis_angle(&na::Vector3::z_axis(), yaw);
    na::UnitQuaternion::from_rotation_matrix(&(heading * cam_to_world).inverse())
}

/// Walks a curve of constant turn rate and drops a camera every `step`.
pub fn generate_poses(config: &SyntheticConfig) -> Vec<Pose> {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let yaw_step = config.yaw_step_degrees.to_radians();
    let mut position = na::Point3::origin();
    let mut yaw = 0.0f64;

    (0..config.num_poses)
        .map(|idx| {
            let mut jitter = || {
                if config.position_noise > 0.0 {
                    rng.random_range(-config.position_noise..config.position_noise)
                } else {
                    0.0
                }
            };
            let noisy = position + na::Vector3::new(jitter(), jitter(), jitter());
            let pose = Pose::new(
                format!("seq1/frame{:05}.png", idx + 1),
                noisy,
                camera_orientation(yaw),
            );
            position += na::Vector3::new(yaw.cos(), yaw.sin(), 0.0) * config.step;
            yaw += yaw_step;
            pose
        })
        .collect()
}

/// Writes poses in the PoseNet list format, header included.
pub fn write_pose_list(path: impl AsRef<Path>, poses: &[Pose]) -> Result<(), ConvertError> {
    write_file(path.as_ref(), |w| {
        writeln!(w, "Synthetic Dataset V1")?;
        writeln!(w, "ImageFile, Camera Position [X Y Z W P Q R]")?;
        writeln!(w)?;
        for pose in poses {
            let p = &pose.position;
            let q = pose.orientation.quaternion();
            writeln!(
                w,
                "{} {} {} {} {} {} {} {}",
                pose.name, p.x, p.y, p.z, q.w, q.i, q.j, q.k
            )?;
        }
        Ok(())
    })
}

/// Writes `name id` lines, ids counting up from `first_id`.
pub fn write_name_id_list(
    path: impl AsRef<Path>,
    poses: &[Pose],
    first_id: u32,
) -> Result<(), ConvertError> {
    write_file(path.as_ref(), |w| {
        for (id, pose) in (first_id..).zip(poses) {
            writeln!(w, "{} {}", pose.name, id)?;
        }
        Ok(())
    })
}
