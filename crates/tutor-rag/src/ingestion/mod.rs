//! Corpus file extraction

pub mod parser;

pub use parser::{FileParser, PdfMethod};
