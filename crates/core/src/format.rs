//! Output formats for extracted notes.
//!
//! Every format streams into a [`Write`] sink page by page. Separators are
//! decided by page index so the last page never gets a trailing one.

use crate::types::Page;
use std::fmt;
use std::io::{self, Write};

/// Separator between pages for the plain, pretty and markdown formats.
const PAGE_SEPARATOR: &str = "\n\n";

/// Underline written below each pretty page header.
const PRETTY_RULE: &str = "---------------";

/// Placeholder replaced with a page's text in custom templates.
pub const NOTES_PLACEHOLDER: &str = "{notes}";

/// Placeholder replaced with a page's number in custom templates.
pub const SLIDE_PLACEHOLDER: &str = "{slide}";

/// A user supplied template applied once per page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
}

impl Template {
    /// Wrap template text.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// The raw template text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Expand the template for one page.
    ///
    /// `{notes}` is substituted first and `{slide}` afterwards, over the
    /// already expanded text.
    pub fn apply(&self, page: &Page) -> String {
        self.source
            .replace(NOTES_PLACEHOLDER, &page.text)
            .replace(SLIDE_PLACEHOLDER, &page.number.to_string())
    }
}

/// How pages are laid out in the output document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FormatPolicy {
    /// Page texts separated by blank lines.
    #[default]
    Plain,
    /// `Page N` header and a dashed rule above each page.
    Pretty,
    /// `# Page N` heading above each page.
    Markdown,
    /// User template expanded per page, no implicit separator.
    Custom(Template),
}

impl fmt::Display for FormatPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain => f.write_str("plain"),
            Self::Pretty => f.write_str("pretty"),
            Self::Markdown => f.write_str("markdown"),
            Self::Custom(_) => f.write_str("custom"),
        }
    }
}

impl FormatPolicy {
    /// Write all pages to `out`.
    pub fn write_pages<W: Write>(&self, pages: &[Page], out: &mut W) -> io::Result<()> {
        let last = pages.len().saturating_sub(1);

        for (idx, page) in pages.iter().enumerate() {
            match self {
                Self::Plain => out.write_all(page.text.as_bytes())?,
                Self::Pretty => {
                    writeln!(out, "Page {}\n{}\n", page.number, PRETTY_RULE)?;
                    out.write_all(page.text.as_bytes())?;
                }
                Self::Markdown => {
                    writeln!(out, "# Page {}", page.number)?;
                    out.write_all(page.text.as_bytes())?;
                }
                Self::Custom(template) => {
                    out.write_all(template.apply(page).as_bytes())?;
                    continue;
                }
            }

            if idx != last {
                out.write_all(PAGE_SEPARATOR.as_bytes())?;
            }
        }

        Ok(())
    }

    /// Render all pages into a string.
    pub fn render(&self, pages: &[Page]) -> String {
        let mut buf = Vec::new();
        // Writing into a Vec cannot fail.
        let _ = self.write_pages(pages, &mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }
}
