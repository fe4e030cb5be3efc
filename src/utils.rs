use indicatif::{ProgressBar, ProgressStyle};

use crate::error::{Error, Result};

/// Create a progress bar with the given length and label
pub fn create_progress_bar(len: u64, label: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(&format!(
                "{{spinner:.green}} [{}] [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} ({{eta}})",
                label
            ))
            .progress_chars("#>-"),
    );
    pb
}

/// Build the thread pool used for reading and converting files.
/// `workers == 0` lets rayon pick one thread per core.
pub fn create_worker_pool(workers: usize) -> Result<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("labelme2coco-worker-{}", i))
        .build()
        .map_err(|e| Error::InvalidInput(format!("failed to build worker pool: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_worker_pool() {
        let pool = create_worker_pool(2).unwrap();
        assert_eq!(pool.current_num_threads(), 2);
        assert!(create_worker_pool(0).unwrap().current_num_threads() >= 1);
    }
}
