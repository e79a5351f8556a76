use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use layerkit::{init_logging, Document, DocumentFile, EditorSettings, Page, BUILD_DATE, VERSION};
use serde_json::Value;

#[derive(Parser, Debug)]
#[command(name = "layerkit", version)]
struct Cli {
    /// Settings file (JSON or TOML). Defaults to the platform config directory.
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an empty single-page document.
    New(NewArgs),
    /// Validate a document file and print its page/layer tree.
    Inspect(InspectArgs),
    /// Rewrite a document file with minified keys.
    Minify(ConvertArgs),
    /// Rewrite a document file with plain keys.
    Unminify(ConvertArgs),
}

#[derive(Parser, Debug)]
struct NewArgs {
    /// Output document path.
    #[arg(long)]
    out: PathBuf,

    /// Document name.
    #[arg(long, default_value = "Untitled")]
    name: String,
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Input document path.
    path: PathBuf,
}

#[derive(Parser, Debug)]
struct ConvertArgs {
    /// Input document path.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output document path.
    #[arg(long)]
    out: PathBuf,

    /// Pretty-print the output.
    #[arg(long, default_value_t = false)]
    pretty: bool,
}

fn main() -> anyhow::Result<()> {
    init_logging()?;
    let cli = Cli::parse();
    tracing::debug!("layerkit {} (built {})", VERSION, BUILD_DATE);

    let settings = match &cli.settings {
        Some(path) => EditorSettings::load_from_file(path)
            .with_context(|| format!("load settings '{}'", path.display()))?,
        None => EditorSettings::load_or_default().context("load settings")?,
    };

    match cli.cmd {
        Command::New(args) => cmd_new(args, &settings),
        Command::Inspect(args) => cmd_inspect(args),
        Command::Minify(args) => cmd_convert(args, true),
        Command::Unminify(args) => cmd_convert(args, false),
    }
}

fn cmd_new(args: NewArgs, settings: &EditorSettings) -> anyhow::Result<()> {
    let document = Document::with_defaults(&settings.page);
    let file = DocumentFile::new(
        args.name,
        &document,
        Value::Null,
        settings.serialization.minify,
    )?;
    file.save_to_file(&args.out, settings.serialization.pretty)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let file = DocumentFile::load_from_file(&args.path)?;
    let document = file
        .document()
        .with_context(|| format!("invalid document '{}'", args.path.display()))?;

    println!("name:     {}", file.metadata.name);
    println!("version:  {}", file.version);
    println!("minified: {}", file.is_minified());
    println!("modified: {}", file.metadata.modified.to_rfc3339());
    println!("pages:    {}", document.page_count());
    println!("layers:   {}", document.layer_count());
    for (index, page) in document.pages().enumerate() {
        print_page(index, page);
    }
    Ok(())
}

fn print_page(index: usize, page: &Page) {
    let lock = if page.is_locked() { " [locked]" } else { "" };
    let name = if page.name().is_empty() { "(unnamed)" } else { page.name() };
    println!("\npage {}: {}{}", index, name, lock);
    for layer in page.walk() {
        let depth = page.ancestors(layer.id().as_str()).len();
        let lock = if layer.is_locked() { " [locked]" } else { "" };
        println!(
            "{}{} {}{}",
            "  ".repeat(depth + 1),
            layer.kind(),
            layer.id(),
            lock
        );
    }
}

fn cmd_convert(args: ConvertArgs, minify: bool) -> anyhow::Result<()> {
    let mut file = DocumentFile::load_from_file(&args.in_path)?;
    let document = file
        .document()
        .with_context(|| format!("invalid document '{}'", args.in_path.display()))?;
    file.set_document(&document, minify)?;
    file.save_to_file(&args.out, args.pretty)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}
