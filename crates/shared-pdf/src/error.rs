use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PdfError {
    #[error("Not a valid PDF file (missing %PDF- header)")]
    NotPdf,

    #[error("Failed to parse PDF: {0}")]
    ParseError(String),

    #[error("PDF has no pages")]
    NoPages,

    #[error("Invalid page box: {0}")]
    InvalidBox(String),
}
