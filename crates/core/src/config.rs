//! Validation of command line choices into a single run configuration.

use crate::error::{Error, Result};
use crate::format::{FormatPolicy, Template};
use crate::types::{CONTAINER_EXTENSION, TEMPLATE_EXTENSION};
use std::fs;
use std::path::{Path, PathBuf};

/// Format switches as given on the command line.
#[derive(Debug, Clone, Default)]
pub struct FormatFlags {
    /// `Page N` headers.
    pub pretty: bool,
    /// `# Page N` headings.
    pub markdown: bool,
    /// Path to a `.custom` template file.
    pub custom: Option<PathBuf>,
    /// The custom switch was given without a usable path.
    pub custom_requested: bool,
}

impl FormatFlags {
    /// Number of explicitly selected formats.
    fn selected(&self) -> usize {
        [
            self.pretty,
            self.markdown,
            self.custom.is_some() || self.custom_requested,
        ]
        .iter()
        .filter(|&&on| on)
        .count()
    }

    /// Resolve the switches into exactly one policy.
    ///
    /// Conflicts are reported before any template file is touched. A custom
    /// template is checked for a path, then its extension, then existence,
    /// and finally read in full.
    pub fn resolve(&self) -> Result<FormatPolicy> {
        if self.selected() > 1 {
            return Err(Error::ConflictingFormatFlags);
        }

        if self.pretty {
            return Ok(FormatPolicy::Pretty);
        }
        if self.markdown {
            return Ok(FormatPolicy::Markdown);
        }

        match (&self.custom, self.custom_requested) {
            (Some(path), _) => load_template(path).map(FormatPolicy::Custom),
            (None, true) => Err(Error::MissingCustomTemplate),
            (None, false) => Ok(FormatPolicy::Plain),
        }
    }
}

/// Read a custom template after checking its extension and existence.
pub fn load_template(path: &Path) -> Result<Template> {
    if path.as_os_str().is_empty() {
        return Err(Error::MissingCustomTemplate);
    }
    if !has_extension(path, TEMPLATE_EXTENSION) {
        return Err(Error::InvalidCustomTemplateFormat(path.to_path_buf()));
    }
    if !path.is_file() {
        return Err(Error::CustomTemplateNotFound(path.to_path_buf()));
    }

    let source = fs::read_to_string(path)?;
    log::debug!("Loaded template {} ({} bytes)", path.display(), source.len());
    Ok(Template::new(source))
}

/// Check the input container path: present, an existing file, `.pptx`.
pub fn validate_input(path: Option<&Path>) -> Result<PathBuf> {
    let path = match path {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => return Err(Error::MissingInput),
    };

    if !path.is_file() {
        return Err(Error::InputNotFound(path.to_path_buf()));
    }
    if !has_extension(path, CONTAINER_EXTENSION) {
        return Err(Error::InvalidInputFormat(path.to_path_buf()));
    }

    Ok(path.to_path_buf())
}

/// Case-sensitive extension check, matching a plain suffix test on the name.
fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(ext)
}
