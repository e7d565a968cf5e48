//! Extraction pipeline: container entries to parsed runs to assembled pages.

use crate::archive::NotesArchive;
use crate::parser::parse_notes;
use notes_core::{assemble_page, Error, Result, SpeakerNotes};
use std::io::{Read, Seek};
use std::path::Path;

/// What happened to one notes entry.
#[derive(Debug)]
pub enum EntryOutcome {
    /// The entry parsed; `runs` are its text runs in document order.
    Parsed { name: String, runs: Vec<String> },
    /// The entry could not be parsed.
    Failed { name: String, error: Error },
}

impl EntryOutcome {
    /// Archive name of the entry.
    pub fn name(&self) -> &str {
        match self {
            Self::Parsed { name, .. } | Self::Failed { name, .. } => name,
        }
    }
}

/// Extracts speaker notes from PPTX files.
pub struct NotesExtractor;

impl NotesExtractor {
    /// Create a new extractor.
    pub fn new() -> Self {
        Self
    }

    /// Extract all pages, failing on the first malformed notes entry.
    pub fn extract<R: Read + Seek>(&self, reader: R, filename: &str) -> Result<SpeakerNotes> {
        let mut archive = NotesArchive::new(reader)?;
        let mut notes = SpeakerNotes::new(filename);

        for entry in archive.entries() {
            let entry = entry?;
            let runs = parse_notes(&entry)?;
            notes.push_text(assemble_page(&runs));
        }

        log::debug!("Extracted {} pages from {}", notes.len(), filename);
        Ok(notes)
    }

    /// Extract all pages, skipping entries that fail to parse.
    ///
    /// Pages are numbered over the entries that parsed, so numbering stays
    /// contiguous. Archive-level failures still abort.
    pub fn extract_lenient<R: Read + Seek>(
        &self,
        reader: R,
        filename: &str,
    ) -> Result<SpeakerNotes> {
        let mut notes = SpeakerNotes::new(filename);

        for outcome in self.extract_entries(reader)? {
            match outcome {
                EntryOutcome::Parsed { runs, .. } => {
                    notes.push_text(assemble_page(&runs));
                }
                EntryOutcome::Failed { name, error } => {
                    log::warn!("Skipping {}: {}", name, error);
                }
            }
        }

        log::debug!("Extracted {} pages from {}", notes.len(), filename);
        Ok(notes)
    }

    /// Parse every notes entry and report each result separately.
    pub fn extract_entries<R: Read + Seek>(&self, reader: R) -> Result<Vec<EntryOutcome>> {
        let mut archive = NotesArchive::new(reader)?;
        let mut outcomes = Vec::with_capacity(archive.len());

        for entry in archive.entries() {
            let entry = entry?;
            let outcome = match parse_notes(&entry) {
                Ok(runs) => EntryOutcome::Parsed {
                    name: entry.name,
                    runs,
                },
                Err(error) => EntryOutcome::Failed {
                    name: entry.name,
                    error,
                },
            };
            outcomes.push(outcome);
        }

        Ok(outcomes)
    }

    /// Open a container on disk and extract it.
    pub fn extract_file(&self, path: &Path, lenient: bool) -> Result<SpeakerNotes> {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown");

        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);

        if lenient {
            self.extract_lenient(reader, filename)
        } else {
            self.extract(reader, filename)
        }
    }
}

impl Default for NotesExtractor {
    fn default() -> Self {
        Self::new()
    }
}
