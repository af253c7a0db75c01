pub mod colmap;
pub mod colmap_db;
pub mod error;
pub mod id_map;
pub mod pair_selection;
pub mod pipeline;
pub mod pose;
pub mod report;
pub mod shared_camera;
pub mod synthetic;

pub use error::ConvertError;
pub use pipeline::{ConvertInputs, ConvertOptions, run};
