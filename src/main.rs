/// sylvie: single-file C++ symbol extraction with timestamp caching.
///
/// Parses one C++ source file, emits a flat scope-qualified symbol table as
/// JSON on stdout, and caches the result under the output directory keyed on
/// the file's modification time so unchanged files are served from disk.
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use sylvie::frontend::CppFrontend;
use sylvie::symbolize::symbolize;

#[derive(Parser)]
#[command(name = "sylvie")]
#[command(about = "Single-file C++ symbol extraction with timestamp caching", long_about = None)]
#[command(version)]
struct Cli {
    /// Cache output root directory
    out_dir: PathBuf,

    /// C++ source file to symbolize
    file: PathBuf,

    /// Extra compiler-style flags passed through to the parser front-end
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    flags: Vec<String>,

    /// Optional log file path for debug logging
    #[arg(short, long)]
    log: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.log.as_ref())?;

    std::fs::create_dir_all(&cli.out_dir).with_context(|| {
        format!("failed to create output directory {}", cli.out_dir.display())
    })?;

    let payload = symbolize(&cli.out_dir, &cli.file, &cli.flags, &CppFrontend::new())?;
    println!("{}", payload);
    Ok(())
}

/// Initialize logging with optional file output. Diagnostics go to stderr
/// (and the log file when given); stdout stays reserved for the payload.
fn init_logging(log_path: Option<&PathBuf>) -> Result<()> {
    use tracing_subscriber::fmt::writer::MakeWriterExt;

    if let Some(log_file) = log_path {
        // With log file: info+ to file, warn+ to stderr
        let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

        let file_appender = tracing_appender::rolling::never(
            log_file
                .parent()
                .unwrap_or_else(|| std::path::Path::new(".")),
            log_file
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("sylvie.log"),
        );

        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(file_appender.and(std::io::stderr.with_max_level(tracing::Level::WARN)))
            .init();
    } else {
        // No log file: warn+ to stderr only (unless RUST_LOG overrides)
        let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    }

    Ok(())
}
