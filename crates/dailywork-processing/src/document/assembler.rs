//! PDF assembly: one JPEG page per normalized image

use crate::image::ImageProcessor;
use crate::types::{AssembledDocument, NormalizedPage};
use dailywork_core::{WorkflowError, WorkflowResult};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

/// Lays out normalized pages as a single binary document, one image per page.
pub trait DocumentEncoder: Send + Sync {
    fn assemble(&self, pages: &[NormalizedPage]) -> WorkflowResult<AssembledDocument>;
}

/// How the PDF page box is chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PageSize {
    /// Each page is the size of its own image.
    #[default]
    MatchEach,
    /// Every page uses the first image's size. Images are drawn unscaled from the
    /// top-left corner, so a wider or taller later image is clipped.
    MatchFirst,
}

/// [`DocumentEncoder`] writing PDF through `lopdf`. One pixel maps to one point.
#[derive(Debug, Clone)]
pub struct PdfAssembler {
    jpeg_quality: u8,
    page_size: PageSize,
}

impl Default for PdfAssembler {
    fn default() -> Self {
        Self::new(100)
    }
}

impl PdfAssembler {
    pub fn new(jpeg_quality: u8) -> Self {
        Self {
            jpeg_quality,
            page_size: PageSize::default(),
        }
    }

    pub fn with_page_size(mut self, page_size: PageSize) -> Self {
        self.page_size = page_size;
        self
    }

    fn add_page(
        &self,
        doc: &mut Document,
        pages_id: ObjectId,
        index: usize,
        page: &NormalizedPage,
        page_box: (u32, u32),
    ) -> WorkflowResult<ObjectId> {
        let (width, height) = page.dimensions();
        let (page_width, page_height) = page_box;
        let jpeg = ImageProcessor::encode_jpeg(&page.image, self.jpeg_quality)?;

        let image_id = doc.add_object(Stream::new(
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
        ));

        let name = format!("Im{}", index + 1);
        // PDF space grows upwards; anchor the image to the top edge.
        let offset_y = i64::from(page_height) - i64::from(height);
        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        i64::from(width).into(),
                        0_i64.into(),
                        0_i64.into(),
                        i64::from(height).into(),
                        0_i64.into(),
                        offset_y.into(),
                    ],
                ),
                Operation::new("Do", vec![Object::Name(name.clone().into_bytes())]),
                Operation::new("Q", vec![]),
            ],
        };
        let encoded = content
            .encode()
            .map_err(|e| WorkflowError::Encode(format!("page content: {}", e)))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![
                0_i64.into(),
                0_i64.into(),
                i64::from(page_width).into(),
                i64::from(page_height).into(),
            ],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "XObject" => dictionary! {
                    name => image_id,
                },
            },
        });

        Ok(page_id)
    }
}

impl DocumentEncoder for PdfAssembler {
    fn assemble(&self, pages: &[NormalizedPage]) -> WorkflowResult<AssembledDocument> {
        let first = pages.first().ok_or(WorkflowError::EmptyDocument)?;
        let first_box = first.dimensions();

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
        for (index, page) in pages.iter().enumerate() {
            let page_box = match self.page_size {
                PageSize::MatchFirst => first_box,
                PageSize::MatchEach => page.dimensions(),
            };
            let page_id = self.add_page(&mut doc, pages_id, index, page, page_box)?;
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)
            .map_err(|e| WorkflowError::Encode(format!("PDF write failed: {}", e)))?;

        tracing::debug!(
            pages = pages.len(),
            bytes = buffer.len(),
            "Assembled RFI document"
        );

        Ok(AssembledDocument::pdf(buffer, pages.len()))
    }
}
