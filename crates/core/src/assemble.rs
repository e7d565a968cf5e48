//! Page assembly from text runs.
//!
//! Authoring tools append a placeholder run (usually the slide number field)
//! after the real note content. Assembly drops that final run and joins the
//! rest with single spaces.

/// Separator placed between consecutive runs of a page.
const RUN_SEPARATOR: &str = " ";

/// The runs that make up a page's text: every run except the last one.
///
/// No content inspection happens here; a genuine final run is dropped just
/// like a slide-number placeholder would be.
pub fn without_trailing_run<S: AsRef<str>>(runs: &[S]) -> &[S] {
    match runs.len() {
        0 => runs,
        len => &runs[..len - 1],
    }
}

/// Assemble the text of one page from its runs in document order.
///
/// Zero or one runs yield an empty page.
pub fn assemble_page<S: AsRef<str>>(runs: &[S]) -> String {
    let kept = without_trailing_run(runs);
    let mut text = String::new();
    for (idx, run) in kept.iter().enumerate() {
        if idx > 0 {
            text.push_str(RUN_SEPARATOR);
        }
        text.push_str(run.as_ref());
    }
    text
}
