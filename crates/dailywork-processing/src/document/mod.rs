//! Document assembly module

pub mod assembler;

pub use assembler::{DocumentEncoder, PageSize, PdfAssembler};
