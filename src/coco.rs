//! COCO format data structures
//!
//! Field order matches the key order of the written JSON, so the derived
//! serializers give stable, diffable output.

use serde::{Deserialize, Serialize};

/// COCO category information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub supercategory: String,
    pub id: u32,
    pub name: String,
}

impl Category {
    /// A category whose supercategory is its own name
    pub fn new(id: u32, name: String) -> Self {
        Self {
            supercategory: name.clone(),
            id,
            name,
        }
    }
}

/// COCO image information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub height: u32,
    pub width: u32,
    pub id: u32,
    pub file_name: String,
}

impl Image {
    pub fn new(id: u32, file_name: String, width: u32, height: u32) -> Self {
        Self {
            height,
            width,
            id,
            file_name,
        }
    }
}

/// COCO annotation information.
///
/// `C` is the category reference: the label string while records are being
/// scanned, the resolved numeric id afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation<C = u32> {
    pub bbox: [f64; 4], // [x, y, width, height]
    pub segmentation: Vec<Vec<f64>>,
    pub iscrowd: u32,
    pub area: f64,
    pub image_id: u32,
    pub category_id: C,
    pub id: u32,
}

/// An annotation whose category is still a label
pub type ProvisionalAnnotation = Annotation<String>;

impl<C> Annotation<C> {
    /// Swap the category reference, keeping every other field
    pub fn try_map_category<D, E>(
        self,
        f: impl FnOnce(&C) -> Result<D, E>,
    ) -> Result<Annotation<D>, E> {
        let category_id = f(&self.category_id)?;
        Ok(Annotation {
            bbox: self.bbox,
            segmentation: self.segmentation,
            iscrowd: self.iscrowd,
            area: self.area,
            image_id: self.image_id,
            category_id,
            id: self.id,
        })
    }
}

/// Complete COCO dataset structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CocoFile {
    pub images: Vec<Image>,
    pub categories: Vec<Category>,
    pub annotations: Vec<Annotation>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_order() {
        let coco = CocoFile {
            images: vec![Image::new(0, "dir/a.jpg".to_string(), 30, 20)],
            categories: vec![Category::new(1, "cat".to_string())],
            annotations: vec![Annotation {
                bbox: [1.0, 2.0, 3.0, 4.0],
                segmentation: vec![vec![1.0, 2.0, 4.0, 2.0, 4.0, 6.0, 1.0, 6.0]],
                iscrowd: 0,
                area: 600.0,
                image_id: 0,
                category_id: 1,
                id: 1,
            }],
        };

        let json = serde_json::to_string(&coco).unwrap();
        assert_eq!(
            json,
            concat!(
                r#"{"images":[{"height":20,"width":30,"id":0,"file_name":"dir/a.jpg"}],"#,
                r#""categories":[{"supercategory":"cat","id":1,"name":"cat"}],"#,
                r#""annotations":[{"bbox":[1.0,2.0,3.0,4.0],"#,
                r#""segmentation":[[1.0,2.0,4.0,2.0,4.0,6.0,1.0,6.0]],"#,
                r#""iscrowd":0,"area":600.0,"image_id":0,"category_id":1,"id":1}]}"#
            )
        );
    }

    #[test]
    fn test_try_map_category() {
        let provisional: ProvisionalAnnotation = Annotation {
            bbox: [0.0; 4],
            segmentation: vec![],
            iscrowd: 0,
            area: 1.0,
            image_id: 3,
            category_id: "dog".to_string(),
            id: 7,
        };

        let resolved = provisional
            .clone()
            .try_map_category(|label| if label == "dog" { Ok(2) } else { Err(()) })
            .unwrap();
        assert_eq!(resolved.category_id, 2);
        assert_eq!(resolved.id, 7);
        assert_eq!(resolved.image_id, 3);

        let failed: Result<Annotation, ()> = provisional.try_map_category(|_| Err(()));
        assert!(failed.is_err());
    }
}
