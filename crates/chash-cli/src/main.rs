use anyhow::Result;
use chash_core::{
    engine::{compute_digest, HashRequest, DEFAULT_CHUNK_SIZE, MAX_CHUNK_SIZE},
    report::HashReport,
};
use clap::{error::ErrorKind, Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use std::{io::IsTerminal, path::PathBuf, process::ExitCode, sync::Arc};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const EXIT_USAGE: u8 = 1;
const EXIT_NOT_FOUND: u8 = 2;
const EXIT_HASH_FAILED: u8 = 3;

#[derive(Parser)]
#[command(
    name = "chash",
    version,
    about = "Streamed SHA-256 of a single file, printed as HEX and Base64 with timing"
)]
struct Cli {
    /// File to hash
    file: PathBuf,

    /// Uppercase HEX output
    #[arg(short, long)]
    uppercase: bool,

    #[arg(long, value_enum, default_value = "console")]
    output: OutputArg,

    /// Read size per chunk, in KiB (at most 1024)
    #[arg(long, default_value_t = (DEFAULT_CHUNK_SIZE / 1024) as u64, value_parser = clap::value_parser!(u64).range(1..=(MAX_CHUNK_SIZE / 1024) as u64))]
    chunk_kib: u64,

    /// No progress bar
    #[arg(short, long)]
    quiet: bool,

    /// Debug logging on stderr (overridden by CHASH_LOG)
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, ValueEnum)]
enum OutputArg {
    Console,
    Json,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::from(EXIT_USAGE),
            };
        }
    };

    init_logging(cli.verbose);

    if !cli.file.is_file() {
        eprintln!("File not found: {}", cli.file.display());
        return ExitCode::from(EXIT_NOT_FOUND);
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(EXIT_HASH_FAILED)
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("CHASH_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let mut req = HashRequest::new(&cli.file).with_chunk_size((cli.chunk_kib * 1024) as usize);

    let bar = progress_bar(cli.quiet);
    if let Some(pb) = &bar {
        let pb = pb.clone();
        req = req.with_progress(Arc::new(move |processed: u64, total: u64| {
            pb.set_length(total);
            pb.set_position(processed);
        }));
    }

    debug!(file = %cli.file.display(), chunk_kib = cli.chunk_kib, "starting");
    let result = compute_digest(&req);

    if let Some(pb) = bar {
        pb.finish_and_clear();
    }

    let hashed = result?;
    let report = HashReport::new(&cli.file, &hashed, cli.uppercase);

    match cli.output {
        OutputArg::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputArg::Console => print_console(&report),
    }

    Ok(())
}

fn progress_bar(quiet: bool) -> Option<ProgressBar> {
    if quiet || !std::io::stderr().is_terminal() {
        return None;
    }

    let pb = ProgressBar::new(0);
    let style = ProgressStyle::with_template(
        "{spinner} [{bar:40}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("=> ");
    pb.set_style(style);
    Some(pb)
}

fn print_console(report: &HashReport) {
    println!("Path: {}", report.path.display());
    println!("Size: {} bytes", report.size_bytes);
    println!("Elapsed: {:.6} s", report.elapsed_seconds);
    println!("Throughput: {:.2} MiB/s", report.throughput_mib_per_sec);
    println!("HEX: {}", report.sha256_hex);
    println!("Base64: {}", report.sha256_base64);
}
