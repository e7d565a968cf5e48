//! Notes slide XML parser.
//!
//! Collects the text of every `t` element in document order. Only the local
//! part of each tag name is compared, so `a:t`, `t` and any other prefix all
//! count as text runs. Prefixes must still be bound by a namespace
//! declaration for the part to count as well-formed.

use notes_core::{Error, NotesEntry, Result};
use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::NsReader;
use thiserror::Error;

/// Local tag name of a text run.
const TEXT_RUN_TAG: &[u8] = b"t";

/// Reasons a notes part is rejected as malformed XML.
#[derive(Error, Debug)]
pub enum ParseError {
    /// Rejected by the XML reader.
    #[error("{source} (at byte {position})")]
    Xml {
        position: usize,
        #[source]
        source: quick_xml::Error,
    },

    /// A malformed attribute: unquoted value, duplicate name, and so on.
    #[error("{source} (at byte {position})")]
    Attribute {
        position: usize,
        #[source]
        source: AttrError,
    },

    /// A prefix used without a matching `xmlns:` declaration.
    #[error("unbound prefix '{0}'")]
    UnboundPrefix(String),

    /// The part is not UTF-8.
    #[error("content is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    /// Input ended before any element.
    #[error("no root element")]
    MissingRoot,

    /// A second top-level element follows the root.
    #[error("junk after document element")]
    MultipleRoots,

    /// Character data outside the root element.
    #[error("text outside the document element")]
    TextOutsideRoot,

    /// Input ended inside an element.
    #[error("unclosed element <{0}>")]
    Unclosed(String),

    /// A closing tag with nothing open.
    #[error("unexpected closing tag </{0}>")]
    UnexpectedEnd(String),
}

/// An element that has been opened but not yet closed.
#[derive(Debug)]
struct OpenElement {
    name: String,
    /// Index into the collected runs when this element is a text run.
    run: Option<usize>,
    /// Whether a child element has started; later text belongs to the child's tail.
    has_child: bool,
}

/// Parse a notes entry and return its text runs.
pub fn parse_notes(entry: &NotesEntry) -> Result<Vec<String>> {
    let runs = std::str::from_utf8(&entry.content)
        .map_err(ParseError::from)
        .and_then(text_runs)
        .map_err(|e| Error::malformed(entry.name.as_str(), e))?;

    log::debug!("{}: {} text runs", entry.name, runs.len());
    Ok(runs)
}

/// Text of every text-run element in document order, matched by local name.
///
/// Each run's text is the element's own character data before its first
/// child, with entities resolved and whitespace kept as is.
pub fn text_runs(xml: &str) -> std::result::Result<Vec<String>, ParseError> {
    let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);
    let mut reader = NsReader::from_str(xml);

    let mut runs: Vec<String> = Vec::new();
    let mut stack: Vec<OpenElement> = Vec::new();
    let mut seen_root = false;

    loop {
        let event = reader.read_event().map_err(|source| ParseError::Xml {
            position: reader.buffer_position(),
            source,
        })?;

        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                match stack.last_mut() {
                    Some(parent) => parent.has_child = true,
                    None if seen_root => return Err(ParseError::MultipleRoots),
                    None => seen_root = true,
                }

                check_attributes(&reader, e)?;

                let name = e.name();
                let (ns, local) = reader.resolve_element(name);
                if let ResolveResult::Unknown(prefix) = ns {
                    return Err(unbound(&prefix));
                }

                let run = if local.as_ref() == TEXT_RUN_TAG {
                    runs.push(String::new());
                    Some(runs.len() - 1)
                } else {
                    None
                };

                if matches!(event, Event::Start(_)) {
                    stack.push(OpenElement {
                        name: String::from_utf8_lossy(name.as_ref()).into_owned(),
                        run,
                        has_child: false,
                    });
                }
            }
            Event::Text(ref e) => {
                let text = e.unescape().map_err(|source| ParseError::Xml {
                    position: reader.buffer_position(),
                    source,
                })?;
                append_text(&stack, &mut runs, &text)?;
            }
            Event::CData(ref e) => {
                let text = String::from_utf8_lossy(e);
                append_text(&stack, &mut runs, &text)?;
            }
            Event::End(ref e) => {
                if stack.pop().is_none() {
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    return Err(ParseError::UnexpectedEnd(name));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.pop() {
        return Err(ParseError::Unclosed(open.name));
    }
    if !seen_root {
        return Err(ParseError::MissingRoot);
    }

    Ok(runs)
}

/// Route character data to the innermost open text run, if it is still
/// collecting its own text.
fn append_text(
    stack: &[OpenElement],
    runs: &mut [String],
    text: &str,
) -> std::result::Result<(), ParseError> {
    match stack.last() {
        None if text.trim().is_empty() => Ok(()),
        None => Err(ParseError::TextOutsideRoot),
        Some(open) => {
            if let (Some(idx), false) = (open.run, open.has_child) {
                runs[idx].push_str(text);
            }
            Ok(())
        }
    }
}

/// Reject malformed or duplicate attributes, unbound attribute prefixes and
/// bad entity references in attribute values.
fn check_attributes<R>(
    reader: &NsReader<R>,
    e: &BytesStart<'_>,
) -> std::result::Result<(), ParseError> {
    let mut attrs = e.attributes();
    attrs.with_checks(true);

    for attr in attrs {
        let attr = attr.map_err(|source| ParseError::Attribute {
            position: reader.buffer_position(),
            source,
        })?;

        let key = attr.key.as_ref();
        if key == b"xmlns" || key.starts_with(b"xmlns:") || key.starts_with(b"xml:") {
            continue;
        }

        if let (ResolveResult::Unknown(prefix), _) = reader.resolve_attribute(attr.key) {
            return Err(unbound(&prefix));
        }

        attr.unescape_value().map_err(|source| ParseError::Xml {
            position: reader.buffer_position(),
            source,
        })?;
    }

    Ok(())
}

fn unbound(prefix: &[u8]) -> ParseError {
    ParseError::UnboundPrefix(String::from_utf8_lossy(prefix).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOTES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:notes xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">
  <p:cSld>
    <p:spTree>
      <p:sp>
        <p:txBody>
          <a:bodyPr/>
          <a:p><a:r><a:rPr lang="en-US"/><a:t>Hello</a:t></a:r><a:r><a:t>world</a:t></a:r></a:p>
        </p:txBody>
      </p:sp>
      <p:sp>
        <p:txBody>
          <a:p><a:fld id="{1}" type="slidenum"><a:t>3</a:t></a:fld></a:p>
        </p:txBody>
      </p:sp>
    </p:spTree>
  </p:cSld>
</p:notes>"#;

    #[test]
    fn test_runs_in_document_order() {
        let runs = text_runs(NOTES_XML).unwrap();
        assert_eq!(runs, vec!["Hello", "world", "3"]);
    }

    #[test]
    fn test_prefix_agnostic() {
        let xml = r#"<root xmlns:x="urn:one" xmlns="urn:two"><x:t>a</x:t><t>b</t><y:t xmlns:y="urn:three">c</y:t></root>"#;
        assert_eq!(text_runs(xml).unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_other_local_names_ignored() {
        let xml = r#"<a:root xmlns:a="urn:a"><a:tx>no</a:tx><a:tt>no</a:tt><a:t>yes</a:t></a:root>"#;
        assert_eq!(text_runs(xml).unwrap(), vec!["yes"]);
    }

    #[test]
    fn test_empty_run() {
        let xml = r#"<r xmlns:a="urn:a"><a:t/><a:t></a:t><a:t>x</a:t></r>"#;
        assert_eq!(text_runs(xml).unwrap(), vec!["", "", "x"]);
    }

    #[test]
    fn test_whitespace_and_entities_preserved() {
        let xml = "<r><t>  spaced  </t><t>Tom &amp; Jerry &lt;3</t><t><![CDATA[raw <b>]]></t></r>";
        assert_eq!(
            text_runs(xml).unwrap(),
            vec!["  spaced  ", "Tom & Jerry <3", "raw <b>"]
        );
    }

    #[test]
    fn test_run_text_stops_at_first_child() {
        let xml = "<r><t>head<b>inner</b>tail</t></r>";
        assert_eq!(text_runs(xml).unwrap(), vec!["head"]);
    }

    #[test]
    fn test_no_runs() {
        assert!(text_runs("<p:notes xmlns:p=\"urn:p\"/>").unwrap().is_empty());
    }

    #[test]
    fn test_byte_order_mark() {
        assert_eq!(text_runs("\u{feff}<r><t>x</t></r>").unwrap(), vec!["x"]);
    }

    #[test]
    fn test_malformed_mismatched_tags() {
        assert!(text_runs("<r><t>x</r></t>").is_err());
    }

    #[test]
    fn test_malformed_unclosed() {
        assert!(text_runs("<r><t>x</t>").is_err());
    }

    #[test]
    fn test_malformed_empty_document() {
        assert!(matches!(text_runs(""), Err(ParseError::MissingRoot)));
        assert!(matches!(text_runs("not xml"), Err(ParseError::TextOutsideRoot)));
    }

    #[test]
    fn test_malformed_two_roots() {
        assert!(matches!(
            text_runs("<a/><b/>"),
            Err(ParseError::MultipleRoots)
        ));
    }

    #[test]
    fn test_malformed_unquoted_attribute() {
        assert!(matches!(
            text_runs("<r a=1><t>x</t><t>y</t></r>"),
            Err(ParseError::Attribute { .. })
        ));
    }

    #[test]
    fn test_malformed_duplicate_attribute() {
        assert!(matches!(
            text_runs(r#"<r a="1" a="2"><t>x</t><t>y</t></r>"#),
            Err(ParseError::Attribute { .. })
        ));
    }

    #[test]
    fn test_malformed_unbound_element_prefix() {
        match text_runs("<p:notes><a:t>x</a:t><a:t>y</a:t></p:notes>") {
            Err(ParseError::UnboundPrefix(prefix)) => assert_eq!(prefix, "p"),
            other => panic!("expected UnboundPrefix, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_unbound_prefix_inside_bound_root() {
        let xml = r#"<p:notes xmlns:p="urn:p"><a:t>x</a:t></p:notes>"#;
        assert!(matches!(text_runs(xml), Err(ParseError::UnboundPrefix(_))));
    }

    #[test]
    fn test_malformed_unbound_attribute_prefix() {
        let xml = r#"<r><t r:id="rId1">x</t></r>"#;
        assert!(matches!(text_runs(xml), Err(ParseError::UnboundPrefix(_))));
    }

    #[test]
    fn test_prefix_scope_ends_with_element() {
        let xml = r#"<r><a:t xmlns:a="urn:a">x</a:t><a:t>y</a:t></r>"#;
        assert!(matches!(text_runs(xml), Err(ParseError::UnboundPrefix(_))));
    }

    #[test]
    fn test_reserved_attributes_accepted() {
        let xml = r#"<a:r xmlns:a="urn:a"><a:t xml:space="preserve"> x </a:t><a:t a:b="1">y</a:t></a:r>"#;
        assert_eq!(text_runs(xml).unwrap(), vec![" x ", "y"]);
    }

    #[test]
    fn test_malformed_unknown_entity() {
        assert!(text_runs("<r><t>&bogus;</t></r>").is_err());
    }

    #[test]
    fn test_parse_notes_reports_entry_name() {
        let entry = NotesEntry::new("ppt/notesSlides/notesSlide4.xml", "<r><t>x</r>");
        match parse_notes(&entry) {
            Err(Error::MalformedNotesXml { entry, .. }) => {
                assert_eq!(entry, "ppt/notesSlides/notesSlide4.xml");
            }
            other => panic!("expected MalformedNotesXml, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_notes_rejects_invalid_utf8() {
        let entry = NotesEntry::new("ppt/notesSlides/notesSlide1.xml", vec![b'<', 0xff, b'>']);
        assert!(matches!(
            parse_notes(&entry),
            Err(Error::MalformedNotesXml { .. })
        ));
    }
}
