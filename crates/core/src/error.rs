//! Error types for speaker notes extraction.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while extracting and writing speaker notes.
///
/// None of these are recovered internally: each one aborts the run.
#[derive(Error, Debug)]
pub enum Error {
    /// No input path was supplied.
    #[error("No input file provided.")]
    MissingInput,

    /// The input path does not resolve to a readable file.
    #[error("Input file does not exist: {}", .0.display())]
    InputNotFound(PathBuf),

    /// The input file lacks the `.pptx` extension.
    #[error("Input file is not a valid pptx file: {}", .0.display())]
    InvalidInputFormat(PathBuf),

    /// The container could not be opened or one of its entries could not be read.
    #[error("ZIP error: {0}")]
    Archive(String),

    /// A notes entry is not well-formed XML.
    #[error("XML parsing error in '{entry}': {reason}")]
    MalformedNotesXml {
        /// Archive name of the offending entry.
        entry: String,
        /// What the XML reader rejected.
        reason: String,
    },

    /// More than one of pretty, markdown and custom was selected.
    #[error("You can only use one of the flags [-p, --prettyprint], [-m, --markdown] or [-c, --custom].")]
    ConflictingFormatFlags,

    /// Custom format selected without a template path.
    #[error("No custom file provided.")]
    MissingCustomTemplate,

    /// The template path lacks the `.custom` extension.
    #[error("Not a valid '.custom' file: {}", .0.display())]
    InvalidCustomTemplateFormat(PathBuf),

    /// The template path does not resolve to a readable file.
    #[error("'.custom' file does not exist: {}", .0.display())]
    CustomTemplateNotFound(PathBuf),

    /// The output could not be created, written or moved into place.
    #[error("Failed to write output '{}': {source}", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to read a file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),
}

impl Error {
    /// Build a [`Error::MalformedNotesXml`] for the named entry.
    pub fn malformed(entry: impl Into<String>, reason: impl ToString) -> Self {
        Self::MalformedNotesXml {
            entry: entry.into(),
            reason: reason.to_string(),
        }
    }
}
