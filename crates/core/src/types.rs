//! Domain types for representing extracted speaker notes.

/// Archive path prefix shared by every notes slide part.
pub const NOTES_SLIDE_PREFIX: &str = "ppt/notesSlides/notesSlide";

/// Extension required on input containers.
pub const CONTAINER_EXTENSION: &str = "pptx";

/// Extension required on custom template files.
pub const TEMPLATE_EXTENSION: &str = "custom";

/// One archive entry holding the XML markup of a slide's speaker notes.
#[derive(Debug, Clone)]
pub struct NotesEntry {
    /// Name of the entry inside the archive.
    pub name: String,

    /// Raw XML payload.
    pub content: Vec<u8>,
}

impl NotesEntry {
    /// Create a new entry.
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Whether an archive entry name denotes a notes slide.
    pub fn is_notes_entry(name: &str) -> bool {
        name.starts_with(NOTES_SLIDE_PREFIX)
    }
}

/// The assembled notes text for one slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// 1-based position in discovery order.
    pub number: usize,

    /// Assembled note text.
    pub text: String,
}

impl Page {
    /// Create a new page.
    pub fn new(number: usize, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
        }
    }
}

/// All notes pages extracted from one presentation.
#[derive(Debug, Clone, Default)]
pub struct SpeakerNotes {
    /// Original filename (without path).
    pub filename: String,

    /// Pages in discovery order.
    pub pages: Vec<Page>,
}

impl SpeakerNotes {
    /// Create an empty set of notes for the given filename.
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            pages: Vec::new(),
        }
    }

    /// Append a page, numbering it after the pages already present.
    pub fn push_text(&mut self, text: impl Into<String>) -> &Page {
        let number = self.pages.len() + 1;
        self.pages.push(Page::new(number, text));
        &self.pages[number - 1]
    }

    /// Number of pages.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Whether no notes entries were found.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}
