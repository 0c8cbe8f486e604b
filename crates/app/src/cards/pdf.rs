//! Print-ready PDF assembly.

use lopdf::{
    Document, Object, ObjectId, Stream,
    content::{Content, Operation},
    dictionary,
};

use crate::cards::CardError;

/// CR80 card width: 85.6 mm in points.
pub const PAGE_WIDTH_PT: f32 = 85.6 / 25.4 * 72.0;

/// CR80 card height: 53.98 mm in points.
pub const PAGE_HEIGHT_PT: f32 = 53.98 / 25.4 * 72.0;

const IMAGE_NAME: &str = "Card";

/// PDF with one card image per CR80-sized page.
#[derive(Debug)]
pub struct PrintDocument {
    document: Document,
    pages_id: ObjectId,
    pages: Vec<Object>,
}

impl Default for PrintDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl PrintDocument {
    #[must_use]
    pub fn new() -> Self {
        let mut document = Document::with_version("1.5");
        let pages_id = document.new_object_id();

        Self {
            document,
            pages_id,
            pages: Vec::new(),
        }
    }

    /// Append a page showing a JPEG card image stretched to the page.
    pub fn add_card(&mut self, jpeg: Vec<u8>, width: u32, height: u32) -> Result<(), CardError> {
        let image = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => i64::from(width),
                "Height" => i64::from(height),
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8_i64,
                "Filter" => "DCTDecode",
            },
            jpeg,
        )
        .with_compression(false);

        let image_id = self.document.add_object(image);

        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        PAGE_WIDTH_PT.into(),
                        0_i64.into(),
                        0_i64.into(),
                        PAGE_HEIGHT_PT.into(),
                        0_i64.into(),
                        0_i64.into(),
                    ],
                ),
                Operation::new("Do", vec![Object::Name(IMAGE_NAME.as_bytes().to_vec())]),
                Operation::new("Q", vec![]),
            ],
        };

        let encoded = content
            .encode()
            .map_err(|error| CardError::Pdf(error.to_string()))?;
        let content_id = self.document.add_object(Stream::new(dictionary! {}, encoded));

        let page_id = self.document.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![
                0_i64.into(),
                0_i64.into(),
                PAGE_WIDTH_PT.into(),
                PAGE_HEIGHT_PT.into(),
            ],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "XObject" => dictionary! {
                    IMAGE_NAME => image_id,
                },
            },
        });

        self.pages.push(page_id.into());

        Ok(())
    }

    /// Serialize the document.
    pub fn finish(mut self) -> Result<Vec<u8>, CardError> {
        if self.pages.is_empty() {
            return Err(CardError::Empty);
        }

        let count =
            i64::try_from(self.pages.len()).map_err(|error| CardError::Pdf(error.to_string()))?;

        self.document.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => self.pages,
                "Count" => count,
            }),
        );

        let catalog_id = self.document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });

        self.document.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();

        self.document
            .save_to(&mut bytes)
            .map_err(|error| CardError::Pdf(error.to_string()))?;

        Ok(bytes)
    }
}
