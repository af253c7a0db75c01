use clap::Parser;
use posenet_colmap::colmap_db::export_image_ids;
use std::path::PathBuf;
use std::process::ExitCode;

/// Exports the names and ids of the images in a COLMAP database as a
/// `name id` list for pn2colmap.
#[derive(Parser)]
#[command(version, about, author)]
struct ExportIdsCli {
    /// COLMAP database, e.g. database.db
    #[arg(long)]
    database_path: PathBuf,

    /// output text file, one `name id` line per image
    #[arg(long)]
    output_file: PathBuf,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = ExportIdsCli::parse();
    match export_image_ids(&cli.database_path, &cli.output_file) {
        Ok(count) => {
            log::info!("wrote {} image ids to {}", count, cli.output_file.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
