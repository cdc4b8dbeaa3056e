pub mod linearize;
pub mod pdftotext;

use crate::error::FerroError;

#[derive(Debug, Clone, PartialEq)]
pub struct BBox {
    pub x_min: f32,
    pub y_min: f32,
    pub x_max: f32,
    pub y_max: f32,
}

impl BBox {
    pub fn center_x(&self) -> f32 {
        (self.x_min + self.x_max) / 2.0
    }
}

/// A single word with its position on the page.
#[derive(Debug, Clone)]
pub struct WordSpan {
    pub text: String,
    pub bbox: BBox,
}

/// A printed line, as grouped by the extraction backend.
#[derive(Debug, Clone)]
pub struct LineSpan {
    pub page_number: usize,
    pub line_index: usize,
    pub text: String,
    pub bbox: BBox,
    pub words: Vec<WordSpan>,
}

/// Content extracted from a single page of a PDF.
///
/// `width` and `height` are in PDF points; zero means the backend supplied
/// no geometry and only `lines` is meaningful.
#[derive(Debug, Clone)]
pub struct PageContent {
    pub page_number: usize,
    pub width: f32,
    pub height: f32,
    pub lines: Vec<String>,
    pub line_spans: Vec<LineSpan>,
}

impl PageContent {
    /// A page with plain lines and no geometry.
    pub fn from_lines(page_number: usize, lines: Vec<String>) -> Self {
        PageContent {
            page_number,
            width: 0.0,
            height: 0.0,
            lines,
            line_spans: Vec::new(),
        }
    }

    pub fn has_geometry(&self) -> bool {
        self.width > 0.0 && !self.line_spans.is_empty()
    }
}

/// Trait for PDF text extraction backends.
pub trait PdfExtractor: Send + Sync {
    /// Extract text content from PDF bytes, returning one PageContent per page.
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<PageContent>, FerroError>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}
