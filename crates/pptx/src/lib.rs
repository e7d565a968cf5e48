//! PPTX (Office Open XML) backend for speaker notes extraction.
//!
//! Reads the notes slide parts of a .pptx ZIP archive and turns each one
//! into a page of text.

pub mod archive;
pub mod extractor;
pub mod parser;

pub use archive::NotesArchive;
pub use extractor::{EntryOutcome, NotesExtractor};
pub use parser::{parse_notes, text_runs, ParseError};
