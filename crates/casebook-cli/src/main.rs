mod commands;
mod output;

use casebook_core::model::{CaseType, Difficulty, Industry};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "casebook",
    version,
    about = "Extract case interviews from PDF casebooks into a searchable case library"
)]
struct Cli {
    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract cases, tables and visual assets from a directory of PDFs
    Extract {
        /// Directory of casebook PDFs
        #[arg(short, long, default_value = "data/casebooks")]
        input: PathBuf,

        /// Extraction report to write
        #[arg(short = 'O', long = "out", default_value = "data/casebooks_complete.json")]
        out: PathBuf,

        /// Directory for extracted images and exhibit screenshots
        #[arg(long, default_value = "data/exhibits")]
        exhibits: PathBuf,

        /// Skip image extraction and page screenshots
        #[arg(long)]
        no_visuals: bool,
    },
    /// Build the flat case database from an extraction report
    Database {
        /// Extraction report to read
        #[arg(short, long, default_value = "data/casebooks_complete.json")]
        input: PathBuf,

        /// Database file to write
        #[arg(short = 'O', long = "out", default_value = "data/cases_database.json")]
        out: PathBuf,

        /// Summary format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Build and query the case library
    Library {
        /// Library directory
        #[arg(long, global = true, default_value = "data/library")]
        library: PathBuf,

        #[command(subcommand)]
        action: LibraryAction,
    },
}

#[derive(Subcommand)]
enum LibraryAction {
    /// Write every case of an extraction report into the library
    Build {
        /// Extraction report to read
        #[arg(short, long, default_value = "data/casebooks_complete.json")]
        input: PathBuf,
    },
    /// List cases, best quality first
    List {
        #[arg(long = "type", value_parser = parse_case_type)]
        case_type: Option<CaseType>,

        #[arg(long, value_parser = parse_difficulty)]
        difficulty: Option<Difficulty>,

        #[arg(long, value_parser = parse_industry)]
        industry: Option<Industry>,

        /// Required tag (repeatable)
        #[arg(long = "tag", value_name = "TAG")]
        tags: Vec<String>,

        #[arg(long, default_value_t = 0)]
        min_quality: u32,

        #[arg(short, long, default_value_t = 100)]
        limit: usize,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Search titles, tags and industries
    Search {
        query: String,

        #[arg(short, long, default_value_t = 10)]
        limit: usize,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Show a single case
    Show {
        case_id: String,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Show library statistics
    Stats {
        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
}

fn parse_case_type(s: &str) -> Result<CaseType, String> {
    CaseType::from_str_loose(s).ok_or_else(|| {
        let known: Vec<&str> = CaseType::ALL.iter().map(|t| t.as_str()).collect();
        format!("unknown case type '{}'. Known: {}", s, known.join(", "))
    })
}

fn parse_difficulty(s: &str) -> Result<Difficulty, String> {
    Difficulty::from_str_loose(s)
        .ok_or_else(|| format!("unknown difficulty '{}'. Known: easy, medium, hard", s))
}

fn parse_industry(s: &str) -> Result<Industry, String> {
    Industry::from_str_loose(s).ok_or_else(|| {
        let known: Vec<&str> = Industry::ALL.iter().map(|i| i.as_str()).collect();
        format!("unknown industry '{}'. Known: {}", s, known.join(", "))
    })
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "casebook=debug,casebook_core=debug"
    } else {
        "casebook=info,casebook_core=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Extract {
            input,
            out,
            exhibits,
            no_visuals,
        } => commands::extract::run(&input, &out, exhibits, no_visuals),
        Commands::Database { input, out, output } => {
            commands::database::run(&input, &out, &output)
        }
        Commands::Library { library, action } => match action {
            LibraryAction::Build { input } => commands::library::build(&input, &library),
            LibraryAction::List {
                case_type,
                difficulty,
                industry,
                tags,
                min_quality,
                limit,
                output,
            } => {
                let filter = casebook_core::library::CaseFilter {
                    case_type,
                    difficulty,
                    industry,
                    tags,
                    min_quality,
                };
                commands::library::list(&library, &filter, limit, &output)
            }
            LibraryAction::Search {
                query,
                limit,
                output,
            } => commands::library::search(&library, &query, limit, &output),
            LibraryAction::Show { case_id, output } => {
                commands::library::show(&library, &case_id, &output)
            }
            LibraryAction::Stats { output } => commands::library::stats(&library, &output),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
