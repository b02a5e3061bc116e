//! Command-line interface for repotext.
//!
//! Resolves a configuration from the arguments, walks the directory and writes
//! the document to stdout or to a file.

use clap::Parser;
use repotext::{Config, DEFAULT_MAX_FILE_SIZE, RepotextBuilder, Snapshot, output, repotext};
use std::io;
use std::path::PathBuf;
use std::process::exit;

/// repotext — flatten a directory into one text document
#[derive(Parser)]
#[command(name = "repotext", version, about, long_about = None)]
struct Cli {
    /// Root directory (default current dir)
    #[arg(default_value = ".")]
    root: PathBuf,

    /// Maximum file size in bytes (larger files are listed without content)
    #[arg(long = "max-size", default_value_t = DEFAULT_MAX_FILE_SIZE)]
    max_size: u64,

    /// Additional ignore patterns, appended to the defaults
    #[arg(short = 'I', long = "ignore")]
    ignore_patterns: Vec<String>,

    /// Write the document to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Do not apply the built-in ignore patterns
    #[arg(long)]
    no_default_ignores: bool,

    /// Log debug events to stderr
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn into_config(self) -> (Result<Config, repotext::ConfigError>, Option<PathBuf>) {
        let config = RepotextBuilder::new(self.root)
            .max_file_size(self.max_size)
            .ignore_patterns(self.ignore_patterns)
            .use_default_ignores(!self.no_default_ignores)
            .build();
        (config, self.output)
    }
}

#[cfg(feature = "logging")]
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;
    let default = if verbose { "repotext=debug" } else { "repotext=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

#[cfg(not(feature = "logging"))]
fn init_logging(_verbose: bool) {}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let (config, output) = cli.into_config();

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            exit(1);
        }
    };

    let snapshot = match repotext(&config) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            eprintln!("Error: {}", e);
            exit(1);
        }
    };

    match output {
        Some(path) => write_file(&snapshot, path),
        None => write_stdout(&snapshot),
    }
    report(&snapshot);
}

fn write_file(snapshot: &Snapshot, path: PathBuf) {
    if let Err(e) = output::write_document_to_file(snapshot, &path) {
        eprintln!("Error: {}", e);
        exit(1);
    }
    eprintln!("Output written to {}", path.display());
}

fn write_stdout(snapshot: &Snapshot) {
    let stdout = io::stdout();
    let handle = io::BufWriter::new(stdout.lock());
    if let Err(e) = output::write_document(snapshot, handle) {
        if e.kind() == io::ErrorKind::BrokenPipe {
            return;
        }
        eprintln!("Failed to write to stdout: {}", e);
        exit(1);
    }
}

#[cfg(feature = "logging")]
fn report(snapshot: &Snapshot) {
    let stats = snapshot.stats();
    tracing::info!(
        "{} directories, {} files ({} bytes): {} text, {} binary, {} oversized, {} unreadable",
        stats.directories,
        stats.files,
        stats.total_bytes,
        stats.text,
        stats.binary,
        stats.oversized,
        stats.unreadable
    );
}

#[cfg(not(feature = "logging"))]
fn report(_snapshot: &Snapshot) {}
