use clap::{Parser, Subcommand};
use overlay_tags::{
    error::{Result, TemplateError},
    load_record_ids, load_template_file, parse_tags, render_record,
    source::SourceBook,
    Config, Table,
};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "overlay-tags")]
#[command(version)]
#[command(about = "Parse overlay template tag strings and render overlay text", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Layout config (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log row-level decisions (repeat for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the tag map of a tag string as JSON (reads stdin if omitted)
    Parse { tags: Option<String> },

    /// Print the overlay records of a CSV template as JSON
    Load { template: PathBuf },

    /// Print the source files a CSV template reads from
    Files { template: PathBuf },

    /// Print the record ids of a CSV record sheet as JSON
    Records { records: PathBuf },

    /// Render a template for one record key
    Render {
        template: PathBuf,

        /// Primary key of the record to render
        #[arg(short, long)]
        key: String,

        /// Source sheet as FILE:SHEET=PATH.csv
        #[arg(short, long = "source")]
        sources: Vec<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(err) = run(cli) {
        eprintln!("{}", err);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Parse { tags } => {
            let input = match tags {
                Some(tags) => tags,
                None => {
                    let mut input = String::new();
                    io::stdin().read_to_string(&mut input)?;
                    input
                }
            };
            print_json(&parse_tags(&input))?;
        }
        Commands::Load { template } => {
            let overlays = load_template_file(&template, &config.template)?;
            print_json(&overlays)?;
        }
        Commands::Files { template } => {
            let overlays = load_template_file(&template, &config.template)?;
            for file in overlay_tags::collect_files(&overlays) {
                println!("{}", file);
            }
        }
        Commands::Records { records } => {
            let ids = load_record_ids(&Table::from_csv_path(&records)?, &config.records);
            print_json(&ids)?;
        }
        Commands::Render {
            template,
            key,
            sources,
        } => {
            let overlays = load_template_file(&template, &config.template)?;
            let book = load_sources(&sources)?;
            let result = render_record(&overlays, &book, &key);
            for err in &result.errors {
                tracing::warn!(code = err.code(), "{}", err);
            }
            for record in result.store.records() {
                println!("{}: {}", record.name(), record.text().unwrap_or_default());
            }
        }
    }
    Ok(())
}

fn load_sources(specs: &[String]) -> Result<SourceBook> {
    let mut book = SourceBook::new();
    for spec in specs {
        let (file, sheet, path) = split_source(spec)?;
        book.insert(file, sheet, Table::from_csv_path(Path::new(path))?);
    }
    Ok(book)
}

/// `FILE:SHEET=PATH`
fn split_source(spec: &str) -> Result<(&str, &str, &str)> {
    let invalid = || {
        TemplateError::ConfigInvalid(format!("bad --source '{}', expected FILE:SHEET=PATH", spec))
    };
    let (name, path) = spec.split_once('=').ok_or_else(invalid)?;
    let (file, sheet) = name.rsplit_once(':').ok_or_else(invalid)?;
    Ok((file, sheet, path))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(io::Error::from)?;
    println!("{}", json);
    Ok(())
}
