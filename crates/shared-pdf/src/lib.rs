//! Shared PDF handling utilities
//!
//! Page geometry read from PDF bytes, and the coordinate transforms between
//! the on-screen preview (display pixels) and the document (PDF points).

pub mod coords;
pub mod error;
pub mod page;

pub use coords::{
    display_to_native, native_to_display, percent_to_display, NativeRect, ScaleFactors,
    ASPECT_RATIO,
};
pub use error::PdfError;
pub use page::{read_page_descriptors, PageDescriptor};
