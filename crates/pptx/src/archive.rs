//! Reading notes slide parts out of a PPTX container.
//!
//! Entries are reported in the archive's central directory order. That order
//! is treated as slide order; nothing checks it against the presentation's
//! own slide list.

use notes_core::{Error, NotesEntry, Result};
use std::io::{Read, Seek};
use zip::ZipArchive;

/// A PPTX archive opened for reading its notes slides.
pub struct NotesArchive<R> {
    archive: ZipArchive<R>,
    /// Archive indices of the notes entries, in enumeration order.
    notes: Vec<usize>,
}

impl<R: Read + Seek> NotesArchive<R> {
    /// Open a container and locate its notes entries.
    pub fn new(reader: R) -> Result<Self> {
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| Error::Archive(format!("Failed to open ZIP: {}", e)))?;

        let mut notes = Vec::new();
        for idx in 0..archive.len() {
            let file = archive
                .by_index(idx)
                .map_err(|e| Error::Archive(format!("Failed to read entry {}: {}", idx, e)))?;

            if !file.is_dir() && NotesEntry::is_notes_entry(file.name()) {
                log::debug!("Found notes entry: {}", file.name());
                notes.push(idx);
            }
        }

        log::debug!(
            "Archive has {} entries, {} notes slides",
            archive.len(),
            notes.len()
        );

        Ok(Self { archive, notes })
    }

    /// Number of notes entries.
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    /// Whether the archive holds no notes entries.
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Read the notes entry at `position` (0-based, enumeration order).
    pub fn read_entry(&mut self, position: usize) -> Result<NotesEntry> {
        let idx = *self.notes.get(position).ok_or_else(|| {
            Error::Archive(format!("No notes entry at position {}", position))
        })?;

        let mut file = self
            .archive
            .by_index(idx)
            .map_err(|e| Error::Archive(format!("Failed to read entry {}: {}", idx, e)))?;

        let name = file.name().to_string();
        let mut content = Vec::new();
        file.read_to_end(&mut content)
            .map_err(|e| Error::Archive(format!("Failed to read '{}': {}", name, e)))?;

        Ok(NotesEntry::new(name, content))
    }

    /// Iterate over the notes entries, reading each one on demand.
    pub fn entries(&mut self) -> impl Iterator<Item = Result<NotesEntry>> + '_ {
        let count = self.notes.len();
        (0..count).map(move |position| self.read_entry(position))
    }
}
