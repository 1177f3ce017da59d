//! Page descriptors
//!
//! One descriptor per document page with the page's native size in PDF
//! points, as a scale-1.0 viewport would report it (rotation applied).

use lopdf::{Dictionary, Document, Object};
use serde::Serialize;
use tracing::debug;

use crate::error::PdfError;

/// Default page box when neither the page nor its ancestors declare one
const US_LETTER: [f64; 4] = [0.0, 0.0, 612.0, 792.0];

/// Limit on Parent hops when resolving inherited attributes
const MAX_TREE_DEPTH: usize = 32;

/// Native geometry of one page. Created once per loaded document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageDescriptor {
    /// Zero-based page index
    pub index: u32,
    /// Width in PDF points after rotation
    pub native_width: f64,
    /// Height in PDF points after rotation
    pub native_height: f64,
    /// Page rotation in degrees (0, 90, 180, 270)
    pub rotation: i32,
}

impl PageDescriptor {
    pub fn new(index: u32, native_width: f64, native_height: f64) -> Self {
        Self {
            index,
            native_width,
            native_height,
            rotation: 0,
        }
    }

    fn from_page(doc: &Document, index: u32, page_dict: &Dictionary) -> Result<Self, PdfError> {
        let media_box = match inherited(doc, page_dict, b"MediaBox") {
            Some(obj) => {
                let array = obj
                    .as_array()
                    .map_err(|_| PdfError::InvalidBox("MediaBox is not an array".to_string()))?;
                parse_box_array(array)?
            }
            None => US_LETTER,
        };

        let width = (media_box[2] - media_box[0]).abs();
        let height = (media_box[3] - media_box[1]).abs();

        let rotation = inherited(doc, page_dict, b"Rotate")
            .and_then(|obj| obj.as_i64().ok())
            .map(|angle| normalize_rotation(angle as i32))
            .unwrap_or(0);

        let (native_width, native_height) = if rotation == 90 || rotation == 270 {
            (height, width)
        } else {
            (width, height)
        };

        Ok(Self {
            index,
            native_width,
            native_height,
            rotation,
        })
    }
}

/// Parse PDF bytes and describe every page, in document order
pub fn read_page_descriptors(bytes: &[u8]) -> Result<Vec<PageDescriptor>, PdfError> {
    if !bytes.starts_with(b"%PDF-") {
        return Err(PdfError::NotPdf);
    }

    let doc = Document::load_mem(bytes).map_err(|e| PdfError::ParseError(e.to_string()))?;
    let pages = doc.get_pages();
    if pages.is_empty() {
        return Err(PdfError::NoPages);
    }

    let mut descriptors = Vec::with_capacity(pages.len());
    for (index, (_, page_id)) in pages.iter().enumerate() {
        let page_dict = doc
            .get_object(*page_id)
            .and_then(Object::as_dict)
            .map_err(|e| PdfError::ParseError(format!("Page {}: {}", index + 1, e)))?;

        let descriptor = PageDescriptor::from_page(&doc, index as u32, page_dict)?;
        debug!(
            "Page {} dimensions: {} x {}",
            index + 1,
            descriptor.native_width,
            descriptor.native_height
        );
        descriptors.push(descriptor);
    }

    Ok(descriptors)
}

/// Look up a page attribute, walking up the page tree for inheritable keys
fn inherited<'a>(doc: &'a Document, page_dict: &'a Dictionary, key: &[u8]) -> Option<&'a Object> {
    let mut dict = page_dict;
    for _ in 0..MAX_TREE_DEPTH {
        if let Ok(value) = dict.get(key) {
            return match value {
                Object::Reference(id) => doc.get_object(*id).ok(),
                other => Some(other),
            };
        }

        let parent_id = dict.get(b"Parent").ok()?.as_reference().ok()?;
        dict = doc.get_object(parent_id).ok()?.as_dict().ok()?;
    }
    None
}

/// Parse a box array [x1, y1, x2, y2]
fn parse_box_array(array: &[Object]) -> Result<[f64; 4], PdfError> {
    if array.len() != 4 {
        return Err(PdfError::InvalidBox(
            "MediaBox must have 4 elements".to_string(),
        ));
    }

    let mut result = [0.0; 4];
    for (i, obj) in array.iter().enumerate() {
        result[i] = match obj {
            Object::Integer(n) => *n as f64,
            Object::Real(n) => *n as f64,
            _ => {
                return Err(PdfError::InvalidBox(format!(
                    "MediaBox element {} is not a number",
                    i
                )))
            }
        };
    }

    Ok(result)
}

/// Normalize rotation to 0, 90, 180, or 270
fn normalize_rotation(angle: i32) -> i32 {
    let normalized = angle % 360;
    if normalized < 0 {
        normalized + 360
    } else {
        normalized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::Dictionary;
    use pretty_assertions::assert_eq;

    fn media_box(w: i64, h: i64) -> Object {
        Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(w),
            Object::Integer(h),
        ])
    }

    /// Build a PDF whose pages carry the given (MediaBox, Rotate) entries.
    /// `tree_box` is set on the Pages node for inheritance tests.
    fn build_pdf(pages: &[(Option<Object>, Option<i64>)], tree_box: Option<Object>) -> Vec<u8> {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();

        let mut page_ids = Vec::new();
        for (mbox, rotate) in pages {
            let mut page = Dictionary::from_iter(vec![
                ("Type", Object::Name(b"Page".to_vec())),
                ("Parent", Object::Reference(pages_id)),
            ]);
            if let Some(mbox) = mbox {
                page.set("MediaBox", mbox.clone());
            }
            if let Some(rotate) = rotate {
                page.set("Rotate", Object::Integer(*rotate));
            }
            page_ids.push(doc.add_object(page));
        }

        let mut tree = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Count", Object::Integer(pages.len() as i64)),
            (
                "Kids",
                Object::Array(page_ids.iter().map(|id| Object::Reference(*id)).collect()),
            ),
        ]);
        if let Some(mbox) = tree_box {
            tree.set("MediaBox", mbox);
        }
        doc.objects.insert(pages_id, Object::Dictionary(tree));

        let catalog = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(pages_id)),
        ]);
        let catalog_id = doc.add_object(catalog);
        doc.trailer.set("Root", Object::Reference(catalog_id));

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer).unwrap();
        buffer
    }

    #[test]
    fn test_reads_letter_and_a4() {
        let pdf = build_pdf(
            &[
                (Some(media_box(612, 792)), None),
                (Some(media_box(595, 842)), None),
            ],
            None,
        );
        let pages = read_page_descriptors(&pdf).unwrap();
        assert_eq!(
            pages,
            vec![
                PageDescriptor::new(0, 612.0, 792.0),
                PageDescriptor::new(1, 595.0, 842.0),
            ]
        );
    }

    #[test]
    fn test_inherits_media_box_from_tree() {
        let pdf = build_pdf(&[(None, None)], Some(media_box(842, 595)));
        let pages = read_page_descriptors(&pdf).unwrap();
        assert_eq!(pages[0].native_width, 842.0);
        assert_eq!(pages[0].native_height, 595.0);
    }

    #[test]
    fn test_defaults_to_letter() {
        let pdf = build_pdf(&[(None, None)], None);
        let pages = read_page_descriptors(&pdf).unwrap();
        assert_eq!(pages[0], PageDescriptor::new(0, 612.0, 792.0));
    }

    #[test]
    fn test_rotated_page_swaps_dimensions() {
        let pdf = build_pdf(&[(Some(media_box(612, 792)), Some(-270))], None);
        let pages = read_page_descriptors(&pdf).unwrap();
        assert_eq!(pages[0].rotation, 90);
        assert_eq!(pages[0].native_width, 792.0);
        assert_eq!(pages[0].native_height, 612.0);
    }

    #[test]
    fn test_rejects_non_pdf() {
        assert_eq!(
            read_page_descriptors(b"hello world"),
            Err(PdfError::NotPdf)
        );
    }

    #[test]
    fn test_rejects_truncated_pdf() {
        let result = read_page_descriptors(b"%PDF-1.7\n%%EOF");
        assert!(matches!(
            result,
            Err(PdfError::ParseError(_)) | Err(PdfError::NoPages)
        ));
    }

    #[test]
    fn test_normalize_rotation() {
        assert_eq!(normalize_rotation(0), 0);
        assert_eq!(normalize_rotation(450), 90);
        assert_eq!(normalize_rotation(-90), 270);
    }

    #[test]
    fn test_parse_box_array_rejects_short() {
        let array = vec![Object::Integer(0), Object::Integer(0)];
        assert!(parse_box_array(&array).is_err());
    }
}
