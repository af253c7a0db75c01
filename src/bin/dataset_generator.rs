use clap::{Parser, Subcommand};
use posenet_colmap::synthetic::{
    SyntheticConfig, generate_poses, write_name_id_list, write_pose_list,
};
use std::fs;
use std::path::Path;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a synthetic PoseNet dataset with a matching name/id list and shared camera
    Generate {
        /// Output directory
        #[arg(short, long)]
        output: String,

        /// Number of poses to generate
        #[arg(short, long, default_value = "50")]
        num_poses: usize,

        /// Distance between consecutive poses
        #[arg(long, default_value = "2.0")]
        step: f64,

        /// Heading change between consecutive poses in degrees
        #[arg(long, default_value = "5.0")]
        yaw_step: f64,

        /// Jitter on camera centres
        #[arg(long, default_value = "0.1")]
        noise: f64,

        #[arg(long, default_value = "0")]
        seed: u64,

        /// Image id of the first pose
        #[arg(long, default_value = "1")]
        first_id: u32,

        /// Image width
        #[arg(long, default_value = "640")]
        width: u32,

        /// Image height
        #[arg(long, default_value = "480")]
        height: u32,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    match args.command {
        Commands::Generate {
            output,
            num_poses,
            step,
            yaw_step,
            noise,
            seed,
            first_id,
            width,
            height,
        } => {
            let config = SyntheticConfig {
                num_poses,
                step,
                yaw_step_degrees: yaw_step,
                position_noise: noise,
                seed,
                first_image_id: first_id,
            };
            generate_dataset(&output, &config, width, height)?;
        }
    }

    Ok(())
}

fn generate_dataset(
    output_dir: &str,
    config: &SyntheticConfig,
    width: u32,
    height: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    fs::create_dir_all(output_dir)?;
    let output_dir = Path::new(output_dir);

    let poses = generate_poses(config);
    write_pose_list(output_dir.join("dataset_train.txt"), &poses)?;
    write_name_id_list(output_dir.join("name_id_list.txt"), &poses, config.first_image_id)?;

    // focal length for a 60 degree horizontal field of view
    let focal = width as f64 / 2.0 / 30f64.to_radians().tan();
    let cameras = format!(
        "# Camera list with one line of data per camera:\n\
         #   CAMERA_ID, MODEL, WIDTH, HEIGHT, PARAMS[]\n\
         # Number of cameras: 1\n\
         1 PINHOLE {} {} {} {} {} {}\n",
        width,
        height,
        focal,
        focal,
        width as f64 / 2.0,
        height as f64 / 2.0
    );
    fs::write(output_dir.join("cameras.txt"), cameras)?;

    fs::write(
        output_dir.join("config.json"),
        serde_json::to_string_pretty(config)?,
    )?;

    log::info!("generated {} poses in {}", poses.len(), output_dir.display());
    Ok(())
}
