use clap::Parser;
use posenet_colmap::id_map::MissingIdPolicy;
use posenet_colmap::pair_selection::{
    DEFAULT_MAX_POSITION_DISTANCE, DEFAULT_MAX_ROTATION_ANGLE_DEGREES, PairSelectionConfig,
};
use posenet_colmap::report::write_summary_json;
use posenet_colmap::{ConvertError, ConvertInputs, ConvertOptions};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

/// Given a dataset_train.txt file in PoseNet's format, creates an empty 3D model
/// in COLMAP's text format and a list of image pairs to be matched.
#[derive(Parser)]
#[command(version, about, author)]
struct PN2ColmapCli {
    /// text file with the names and poses of the training images
    dataset_train: PathBuf,

    /// text file with `name id` lines mapping image names to COLMAP database ids
    name_id_list: PathBuf,

    /// directory receiving cameras.txt, images.txt, points3D.txt and matches.txt
    outdir: PathBuf,

    /// COLMAP cameras.txt whose first camera is shared by all images
    shared_cam_file: PathBuf,

    /// max distance between camera centres of a pair
    #[arg(long, default_value_t = DEFAULT_MAX_POSITION_DISTANCE)]
    max_distance: f64,

    /// max relative rotation of a pair in degrees
    #[arg(long, default_value_t = DEFAULT_MAX_ROTATION_ANGLE_DEGREES)]
    max_angle: f64,

    /// what to do with images missing from name_id_list
    #[arg(long, value_enum, default_value_t = MissingIdPolicy::Error)]
    missing_id: MissingIdPolicy,

    /// write a json summary of the run here
    #[arg(long)]
    report: Option<PathBuf>,

    /// number of worker threads, all cores by default
    #[arg(long)]
    threads: Option<usize>,
}

fn convert(cli: PN2ColmapCli) -> Result<(), ConvertError> {
    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
    }
    let inputs = ConvertInputs {
        pose_list: cli.dataset_train,
        name_id_list: cli.name_id_list,
        output_dir: cli.outdir,
        shared_camera: cli.shared_cam_file,
    };
    let options = ConvertOptions {
        selection: PairSelectionConfig {
            max_position_distance: cli.max_distance,
            max_rotation_angle_degrees: cli.max_angle,
        },
        missing_id: cli.missing_id,
    };

    let now = Instant::now();
    let summary = posenet_colmap::run(&inputs, &options)?;
    log::info!("conversion took {:.3} sec", now.elapsed().as_secs_f64());

    if let Some(report_path) = cli.report {
        write_summary_json(&report_path, &summary)?;
        log::info!("summary written to {}", report_path.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = PN2ColmapCli::parse();
    match convert(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
