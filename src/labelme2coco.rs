use clap::Parser;
use log::{error, info};
use std::process::ExitCode;

use labelme2coco::{process_coco_dataset, Args};

fn main() -> ExitCode {
    // Initialize the logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    info!(
        "Converting labelme annotations in {} to COCO...",
        args.labelme_dir.display()
    );

    match process_coco_dataset(&args) {
        Ok(dataset) => {
            info!(
                "COCO conversion completed: {} images, {} categories, {} annotations.",
                dataset.coco.images.len(),
                dataset.coco.categories.len(),
                dataset.coco.annotations.len()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Failed to convert dataset: {}", e);
            ExitCode::FAILURE
        }
    }
}
