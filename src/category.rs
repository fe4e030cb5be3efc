//! Category registry
//!
//! Labels are collected during the scan pass and only turned into ids once every
//! record has been read. Ids follow lexicographic label order, so they depend on
//! the label set alone and not on which file a label first appeared in.

use std::collections::{BTreeSet, HashMap};

use crate::coco::Category;
use crate::error::UnknownCategory;

/// Collects distinct labels while records are being scanned
#[derive(Debug, Default, Clone)]
pub struct CategoryRegistry {
    labels: BTreeSet<String>,
}

impl CategoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a label to the observed set. Registering a label twice is a no-op.
    pub fn register(&mut self, label: &str) {
        if !self.labels.contains(label) {
            self.labels.insert(label.to_string());
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Fold another registry's labels into this one
    pub fn merge(&mut self, other: CategoryRegistry) {
        self.labels.extend(other.labels);
    }

    /// Assign `id = sorted index + 1` to every observed label.
    ///
    /// Consumes the registry, so labels can no longer be added once ids exist.
    pub fn finalize(self) -> CategoryTable {
        let categories: Vec<Category> = self
            .labels
            .into_iter()
            .enumerate()
            .map(|(index, label)| Category::new((index + 1) as u32, label))
            .collect();
        let ids = categories
            .iter()
            .map(|category| (category.name.clone(), category.id))
            .collect();
        CategoryTable { categories, ids }
    }
}

/// Finalized, immutable label to id mapping
#[derive(Debug, Clone)]
pub struct CategoryTable {
    categories: Vec<Category>,
    ids: HashMap<String, u32>,
}

impl CategoryTable {
    /// Look up the id assigned to `label`
    pub fn resolve(&self, label: &str) -> Result<u32, UnknownCategory> {
        self.ids.get(label).copied().ok_or_else(|| UnknownCategory {
            label: label.to_string(),
            categories: self.labels().map(str::to_string).collect(),
        })
    }

    /// Categories ordered by id
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Labels ordered by id
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|category| category.name.as_str())
    }

    pub fn into_categories(self) -> Vec<Category> {
        self.categories
    }
}
