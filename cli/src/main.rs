//! pdf-outline CLI - PDF title and heading outline extraction tool

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdf_outline::batch::{self, BatchOptions, FileReport};
use pdf_outline::{extract_outline_with_options, render, ExtractOptions, JsonFormat};

#[derive(Parser)]
#[command(name = "pdf-outline")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Extract titles and heading outlines from PDF files", long_about = None)]
struct Cli {
    /// Directory of PDF files to process
    #[arg(value_name = "INPUT_DIR")]
    input: Option<PathBuf>,

    /// Directory for JSON records
    #[arg(value_name = "OUTPUT_DIR")]
    output: Option<PathBuf>,

    #[command(flatten)]
    extract: ExtractArgs,

    #[command(flatten)]
    batch: BatchArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Process every PDF in a directory
    Batch {
        /// Directory of PDF files to process
        #[arg(value_name = "INPUT_DIR", default_value = "./input")]
        input: PathBuf,

        /// Directory for JSON records
        #[arg(value_name = "OUTPUT_DIR", default_value = "./output")]
        output: PathBuf,

        #[command(flatten)]
        extract: ExtractArgs,

        #[command(flatten)]
        batch: BatchArgs,
    },

    /// Extract the outline of a single PDF
    Extract {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        #[command(flatten)]
        extract: ExtractArgs,
    },

    /// Show version information
    Version,
}

#[derive(Args, Clone, Default)]
struct ExtractArgs {
    /// Reject documents with more pages than this
    #[arg(long, value_name = "PAGES", env = "PDF_OUTLINE_PAGE_LIMIT")]
    page_limit: Option<u32>,

    /// Accept documents of any length
    #[arg(long, conflicts_with = "page_limit")]
    no_page_limit: bool,

    /// Fail a document when any page cannot be read
    #[arg(long)]
    strict: bool,
}

impl ExtractArgs {
    fn to_options(&self) -> ExtractOptions {
        let mut options = ExtractOptions::new();
        if let Some(limit) = self.page_limit {
            options = options.with_page_limit(limit);
        }
        if self.no_page_limit {
            options = options.without_page_limit();
        }
        if self.strict {
            options = options.strict();
        }
        options
    }
}

#[derive(Args, Clone, Default)]
struct BatchArgs {
    /// Maximum number of worker threads (1 = sequential)
    #[arg(short, long, value_name = "N")]
    jobs: Option<usize>,

    /// Write compact JSON
    #[arg(long)]
    compact: bool,
}

impl BatchArgs {
    fn to_options(&self, extract: ExtractOptions) -> BatchOptions {
        let mut options = BatchOptions::new()
            .with_extract_options(extract)
            .with_json_format(json_format(self.compact));
        match self.jobs {
            Some(1) => options = options.sequential(),
            Some(n) => options = options.with_max_workers(n),
            None => {}
        }
        options
    }
}

fn json_format(compact: bool) -> JsonFormat {
    if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Batch {
            input,
            output,
            extract,
            batch,
        }) => cmd_batch(&input, &output, batch.to_options(extract.to_options())),
        Some(Commands::Extract {
            input,
            output,
            compact,
            extract,
        }) => cmd_extract(&input, output.as_deref(), compact, extract.to_options()),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            let input = cli.input.unwrap_or_else(|| PathBuf::from("./input"));
            let output = cli.output.unwrap_or_else(|| PathBuf::from("./output"));
            let options = cli.batch.to_options(cli.extract.to_options());
            cmd_batch(&input, &output, options)
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_batch(
    input: &Path,
    output: &Path,
    options: BatchOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let start = Instant::now();

    let paths = batch::discover_pdfs(input)
        .map_err(|e| format!("Cannot read input directory {}: {}", input.display(), e))?;
    if paths.is_empty() {
        println!("{} {}", "No PDF files found in".yellow(), input.display());
        return Ok(());
    }

    println!(
        "{} {} PDF file(s) in {}",
        "Found".cyan(),
        paths.len(),
        input.display()
    );

    let pb = ProgressBar::new(paths.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let reports = batch::process_paths_with(&paths, &options, |report| {
        pb.set_message(file_name(&report.path));
        pb.inc(1);
    })?;
    pb.finish_and_clear();

    let written = batch::write_reports(&reports, output, options.json_format)?;
    log::info!("Wrote {} record(s) to {}", written.len(), output.display());

    for (report, out_path) in reports.iter().zip(&written) {
        print_report_line(report, out_path);
    }

    let failed = reports.iter().filter(|r| !r.is_success()).count();
    println!();
    println!(
        "{} {} file(s), {} failed, in {:.2}s",
        "Done!".green().bold(),
        reports.len(),
        failed,
        start.elapsed().as_secs_f64()
    );

    Ok(())
}

fn print_report_line(report: &FileReport, out_path: &Path) {
    let tag = if report.is_success() {
        "[SUCCESS]".green().bold()
    } else {
        "[ERROR]".red().bold()
    };
    println!(
        "{} Processed '{}' -> '{}'",
        tag,
        file_name(&report.path),
        file_name(out_path)
    );
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn cmd_extract(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    options: ExtractOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let result = extract_outline_with_options(input, options)?;
    let json = render::to_json(&result, json_format(compact))?;

    if let Some(path) = output {
        fs::write(path, &json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdf-outline".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF title and heading outline extraction tool");
    println!();
    println!("Repository: {}", "https://github.com/iyulab/pdf-outline".dimmed());
    println!("License: MIT");
}
