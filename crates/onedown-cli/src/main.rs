//! Command line exporter from OneNote page XML to an Obsidian vault.

use std::io::Read as _;
use std::path::{Path, PathBuf};
use std::process::exit;

use clap::Parser;
use onedown::PageConverter;
use onedown_vault::{Exporter, NoteMetadata, VaultConfig};

/// Convert a OneNote page XML dump into an Obsidian Markdown note.
#[derive(Debug, Parser)]
#[clap(name = "onedown", version, about)]
struct Args {
    /// Page XML file to convert, or `-` for stdin
    #[clap(value_name = "INPUT")]
    input: PathBuf,

    /// Path to the vault configuration file
    #[clap(long, value_name = "PATH", default_value = "onedown.json")]
    config: PathBuf,

    /// Note title; defaults to the input file stem
    #[clap(long, value_name = "TITLE")]
    title: Option<String>,

    /// Notebook name recorded in the note frontmatter
    #[clap(long, value_name = "NAME")]
    notebook: Option<String>,

    /// Section name recorded in the note frontmatter
    #[clap(long, value_name = "NAME")]
    section: Option<String>,

    /// Source link recorded in the note frontmatter
    #[clap(long, value_name = "URL")]
    source_link: Option<String>,

    /// Print the converted Markdown to stdout instead of writing the vault
    #[clap(long)]
    dry_run: bool,
}

fn main() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .try_init();

    let args = Args::parse();
    if let Err(err) = run(&args) {
        eprintln!("error: {}", err);
        exit(1);
    }
}

fn run(args: &Args) -> onedown_vault::Result<()> {
    let xml = read_input(&args.input)?;
    let title = args
        .title
        .clone()
        .unwrap_or_else(|| default_title(&args.input));

    if args.dry_run {
        let mut converter = PageConverter::new(&title);
        let markdown = converter.convert_xml(&xml)?;
        println!("{}", markdown);
        return Ok(());
    }

    let mut metadata = NoteMetadata::new(&title);
    metadata.notebook = args.notebook.clone();
    metadata.section = args.section.clone();
    metadata.source_link = args.source_link.clone();

    let config = VaultConfig::load(&args.config)?;
    let exporter = Exporter::new(config)?;
    let report = exporter.export_page(&xml, &metadata)?;

    println!(
        "Wrote {} ({} images, {} attachments)",
        report.note_path.display(),
        report.image_count,
        report.attachment_count
    );
    if let Some(uri) = exporter.note_uri(&report.note_path) {
        println!("Open: {}", uri);
    }
    Ok(())
}

fn read_input(path: &Path) -> std::io::Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path)
    }
}

/// Title fallback when `--title` is absent: the input file stem, or
/// "Untitled" for stdin.
fn default_title(input: &Path) -> String {
    input
        .file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| *stem != "-")
        .unwrap_or("Untitled")
        .to_string()
}
