use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for converting a directory of LabelMe JSON files to one COCO file.
#[derive(Parser, Debug, Clone)]
#[command(
    version,
    about = "labelme annotation to coco data json file.",
    long_about = None,
    after_help = "Example:\n    labelme2coco path/to/labelme/dir --output train.json"
)]
pub struct Args {
    /// Directory containing the LabelMe images and annotation JSON files
    pub labelme_dir: PathBuf,

    /// Output COCO JSON file path
    #[arg(short = 'o', long = "output", default_value = "trainval.json")]
    pub output: PathBuf,

    /// File name of the label list written next to the output file
    #[arg(long = "label_file", default_value = "classes.txt")]
    pub label_file: String,

    /// Number of worker threads for reading and converting files (0 = all cores)
    #[arg(long = "workers", default_value_t = 0)]
    pub workers: usize,

    /// Write the COCO file on a single line instead of pretty-printing it
    #[arg(long = "compact")]
    pub compact: bool,
}

impl Args {
    /// Path of the label list file, placed in the output file's directory
    pub fn label_file_path(&self) -> PathBuf {
        match self.output.parent() {
            Some(parent) => parent.join(&self.label_file),
            None => PathBuf::from(&self.label_file),
        }
    }
}
