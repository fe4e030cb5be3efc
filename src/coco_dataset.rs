//! COCO dataset assembly
//!
//! Runs in two passes. The scan pass reads every LabelMe record in discovery
//! order, assigns image and annotation ids and collects labels; annotations
//! keep their label as category reference. The resolution pass finalizes the
//! category ids and rewrites every annotation's category reference.

use log::{debug, info, warn};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

use crate::category::{CategoryRegistry, CategoryTable};
use crate::coco::{Annotation, CocoFile, Image, ProvisionalAnnotation};
use crate::config::Args;
use crate::error::{Error, Result};
use crate::io::{
    commit_all, discover_json_files, label_file_bytes, read_and_parse_json, stage_file,
    to_json_bytes,
};
use crate::shape::{normalize_shape, NormalizedShape};
use crate::types::ImageAnnotation;
use crate::utils::{create_progress_bar, create_worker_pool};

/// The assembled dataset and its label list, in category id order
#[derive(Debug, Clone, PartialEq)]
pub struct CocoDataset {
    pub coco: CocoFile,
    pub labels: Vec<String>,
}

/// One LabelMe record with every shape already normalized
#[derive(Debug, Clone)]
pub struct ConvertedRecord {
    pub file_name: String,
    pub height: u32,
    pub width: u32,
    pub shapes: Vec<(String, NormalizedShape)>,
}

/// Resolve the image path relative to the directory of its JSON file
pub fn resolve_image_path(json_path: &Path, image_path: &str) -> String {
    json_path
        .parent()
        .map(|parent| parent.join(image_path))
        .unwrap_or_else(|| PathBuf::from(image_path))
        .to_string_lossy()
        .into_owned()
}

/// Normalize every shape of a record. Fails on the first unsupported or
/// degenerate shape, naming the file, shape index and label.
pub fn convert_record(json_path: &Path, annotation: &ImageAnnotation) -> Result<ConvertedRecord> {
    let shapes = annotation
        .shapes
        .iter()
        .enumerate()
        .map(|(index, shape)| {
            normalize_shape(shape, annotation.image_height, annotation.image_width)
                .map(|normalized| (shape.label.clone(), normalized))
                .map_err(|source| Error::Shape {
                    path: json_path.to_path_buf(),
                    index,
                    label: shape.label.clone(),
                    source,
                })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ConvertedRecord {
        file_name: resolve_image_path(json_path, &annotation.image_path),
        height: annotation.image_height,
        width: annotation.image_width,
        shapes,
    })
}

/// State carried through the scan pass
#[derive(Debug)]
pub struct ScanAccumulator {
    images: Vec<Image>,
    annotations: Vec<ProvisionalAnnotation>,
    registry: CategoryRegistry,
    next_annotation_id: u32,
}

impl Default for ScanAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanAccumulator {
    pub fn new() -> Self {
        Self {
            images: Vec::new(),
            annotations: Vec::new(),
            registry: CategoryRegistry::new(),
            next_annotation_id: 1,
        }
    }

    /// Add the next record in discovery order. Its image id is its ordinal.
    pub fn push_record(&mut self, record: ConvertedRecord) {
        let image_id = self.images.len() as u32;
        // Every annotation's area is the full image area
        let area = f64::from(record.height) * f64::from(record.width);

        self.images.push(Image::new(
            image_id,
            record.file_name,
            record.width,
            record.height,
        ));

        for (label, normalized) in record.shapes {
            self.registry.register(&label);
            self.annotations.push(Annotation {
                bbox: normalized.bbox,
                segmentation: normalized.segmentation,
                iscrowd: 0,
                area,
                image_id,
                category_id: label,
                id: self.next_annotation_id,
            });
            self.next_annotation_id += 1;
        }
    }

    /// Push an annotation as-is, without registering its label
    pub fn push_annotation(&mut self, annotation: ProvisionalAnnotation) {
        self.annotations.push(annotation);
    }

    pub fn images(&self) -> &[Image] {
        &self.images
    }

    pub fn annotations(&self) -> &[ProvisionalAnnotation] {
        &self.annotations
    }

    /// The resolution pass: finalize category ids and rewrite every annotation's label
    pub fn finish(self) -> Result<CocoDataset> {
        let table = self.registry.finalize();
        let annotations = resolve_categories(self.annotations, &table)?;
        let labels = table.labels().map(str::to_string).collect();
        Ok(CocoDataset {
            coco: CocoFile {
                images: self.images,
                categories: table.into_categories(),
                annotations,
            },
            labels,
        })
    }
}

/// Rewrite provisional label references into category ids
pub fn resolve_categories(
    annotations: Vec<ProvisionalAnnotation>,
    table: &CategoryTable,
) -> Result<Vec<Annotation>> {
    annotations
        .into_iter()
        .map(|annotation| {
            annotation
                .try_map_category(|label| table.resolve(label))
                .map_err(Error::from)
        })
        .collect()
}

/// Run both passes over already-parsed records, in the given order
pub fn assemble_dataset(records: &[(PathBuf, ImageAnnotation)]) -> Result<CocoDataset> {
    let mut accumulator = ScanAccumulator::new();
    for (json_path, annotation) in records {
        accumulator.push_record(convert_record(json_path, annotation)?);
    }
    accumulator.finish()
}

/// Read and convert `json_files` on `workers` threads, then run both passes.
///
/// Conversion happens in parallel but ids are assigned sequentially in input
/// order, so the result does not depend on the number of workers.
pub fn assemble_from_files(json_files: &[PathBuf], workers: usize) -> Result<CocoDataset> {
    let pool = create_worker_pool(workers)?;
    let pb = create_progress_bar(json_files.len() as u64, "Scan");

    let converted: Vec<Result<ConvertedRecord>> = pool.install(|| {
        json_files
            .par_iter()
            .map(|json_path| {
                let record = read_and_parse_json(json_path)
                    .and_then(|annotation| convert_record(json_path, &annotation));
                pb.inc(1);
                record
            })
            .collect()
    });
    pb.finish_and_clear();

    let mut accumulator = ScanAccumulator::new();
    for record in converted {
        let record = record?;
        debug!(
            "Image {} ({}x{}): {} shapes",
            record.file_name,
            record.width,
            record.height,
            record.shapes.len()
        );
        accumulator.push_record(record);
    }
    info!(
        "Scanned {} images with {} annotations",
        accumulator.images().len(),
        accumulator.annotations().len()
    );
    accumulator.finish()
}

/// Main conversion pipeline: discover, convert, and write the COCO file and label list
pub fn process_coco_dataset(args: &Args) -> Result<CocoDataset> {
    let json_files = discover_json_files(&args.labelme_dir)?;
    if json_files.is_empty() {
        warn!(
            "No labelme json files found in {}; writing an empty dataset",
            args.labelme_dir.display()
        );
    } else {
        info!("Found {} labelme json files", json_files.len());
    }

    let dataset = assemble_from_files(&json_files, args.workers)?;
    info!("Found {} categories", dataset.labels.len());

    // Both outputs are staged before either is renamed into place
    let label_path = args.label_file_path();
    let staged = vec![
        stage_file(&args.output, &to_json_bytes(&dataset.coco, args.compact)?)?,
        stage_file(
            &label_path,
            &label_file_bytes(dataset.labels.iter().map(String::as_str)),
        )?,
    ];
    commit_all(staged)?;
    info!("Wrote {}", args.output.display());
    info!("Wrote {}", label_path.display());

    Ok(dataset)
}
