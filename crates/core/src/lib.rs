//! Core domain types, page assembly, and output formatting
//! for speaker notes extraction.

pub mod assemble;
pub mod config;
pub mod error;
pub mod format;
pub mod types;

pub use assemble::{assemble_page, without_trailing_run};
pub use config::{load_template, validate_input, FormatFlags};
pub use error::{Error, Result};
pub use format::{FormatPolicy, Template};
pub use types::{NotesEntry, Page, SpeakerNotes};
