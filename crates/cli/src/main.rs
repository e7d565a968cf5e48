//! CLI tool for extracting speaker notes from PowerPoint files.

use clap::Parser;
use notes_core::{validate_input, Error, FormatFlags, FormatPolicy, Page};
use notes_pptx::NotesExtractor;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Extract the speaker notes from a pptx file and write them to a text file.
#[derive(Parser, Debug)]
#[command(name = "pptx-notes")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The path to the pptx file
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// The path to the output file
    #[arg(short, long)]
    output: PathBuf,

    /// Write the text in a pretty format
    #[arg(short, long)]
    prettyprint: bool,

    /// Write the text in a markdown format
    #[arg(short, long, visible_alias = "md")]
    markdown: bool,

    /// Write the text in a custom format using a '.custom' file
    #[arg(short, long, num_args = 0..=1, value_name = "FILE")]
    custom: Option<Option<PathBuf>>,

    /// Skip notes slides that are not well-formed XML instead of aborting
    #[arg(long)]
    skip_invalid: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn format_flags(&self) -> FormatFlags {
        FormatFlags {
            pretty: self.prettyprint,
            markdown: self.markdown,
            custom: self.custom.clone().flatten(),
            custom_requested: self.custom.is_some(),
        }
    }
}

fn main() {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    println!(
        "Successfully wrote the notes to '{}'",
        args.output.display()
    );
}

/// Validate the command line, extract the notes, and write the output.
fn run(args: &Args) -> notes_core::Result<()> {
    let input = validate_input(args.input.as_deref())?;
    let policy = args.format_flags().resolve()?;
    log::debug!("Output format: {}", policy);

    if args.verbose {
        eprintln!("Processing: {}", input.display());
    }

    let notes = NotesExtractor::new().extract_file(&input, args.skip_invalid)?;

    if args.verbose {
        eprintln!("  Found {} notes pages", notes.len());
    }

    write_output(&args.output, &policy, &notes.pages)
}

/// Render into a temporary file next to `path`, then move it into place.
///
/// The destination is only replaced once rendering has fully succeeded. An
/// existing destination keeps its permissions; a new one gets the same
/// umask-derived mode a plain create would.
fn write_output(path: &Path, policy: &FormatPolicy, pages: &[Page]) -> notes_core::Result<()> {
    let write_err = |source: std::io::Error| Error::OutputWrite {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = temp_output(dir).map_err(write_err)?;
    if let Ok(existing) = fs::metadata(path) {
        tmp.as_file()
            .set_permissions(existing.permissions())
            .map_err(write_err)?;
    }

    {
        let mut writer = BufWriter::new(&mut tmp);
        policy.write_pages(pages, &mut writer).map_err(write_err)?;
        writer.flush().map_err(write_err)?;
    }

    tmp.persist(path).map_err(|e| write_err(e.error))?;
    log::debug!("Written to: {}", path.display());
    Ok(())
}

/// Create the temporary output file in `dir`.
fn temp_output(dir: &Path) -> std::io::Result<NamedTempFile> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(".pptx-notes");

    // Default is 0600; ask for 0666 and let the umask narrow it.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }

    builder.tempfile_in(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use notes_core::Template;
    use tempfile::TempDir;

    #[test]
    fn test_args_parse_formats() {
        let args = Args::parse_from(["pptx-notes", "-i", "a.pptx", "-o", "out.txt", "--md"]);
        assert!(args.markdown);
        assert_eq!(args.format_flags().resolve().unwrap(), FormatPolicy::Markdown);
    }

    #[test]
    fn test_args_custom_without_value() {
        let args = Args::parse_from(["pptx-notes", "-i", "a.pptx", "-o", "out.txt", "-c"]);
        let flags = args.format_flags();
        assert!(flags.custom_requested);
        assert!(flags.custom.is_none());
    }

    #[test]
    fn test_write_output_replaces_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "old contents that are longer").unwrap();

        let policy = FormatPolicy::Custom(Template::new("[{slide}] {notes}\n"));
        write_output(&path, &policy, &[Page::new(1, "hi")]).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[1] hi\n");
        // Only the output itself remains, no stray temp files.
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_write_output_keeps_existing_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "old").unwrap();
        std::fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).unwrap();

        write_output(&path, &FormatPolicy::Plain, &[Page::new(1, "new")]).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
    }

    #[cfg(unix)]
    #[test]
    fn test_write_output_new_file_uses_umask() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let reference = dir.path().join("reference.txt");
        std::fs::write(&reference, "").unwrap();
        let expected = fs::metadata(&reference).unwrap().permissions().mode() & 0o777;

        let path = dir.path().join("notes.txt");
        write_output(&path, &FormatPolicy::Plain, &[Page::new(1, "x")]).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, expected);
    }

    #[test]
    fn test_write_output_missing_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope").join("notes.txt");
        let result = write_output(&path, &FormatPolicy::Plain, &[]);
        assert!(matches!(result, Err(Error::OutputWrite { .. })));
    }
}
