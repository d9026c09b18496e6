//! sarpdf CLI - Subject Access Request report assembly tool

mod converter;
mod manifest;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use sarpdf::{
    normalize, render_fallback, AssembledReport, ContentNode, PageSize, ReportAssembler,
    ReportOptions,
};

use converter::HttpWordConverter;
use manifest::{build_request, Manifest};

#[derive(Parser)]
#[command(name = "sarpdf")]
#[command(version)]
#[command(about = "Assemble Subject Access Request reports into a single PDF", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assemble one report from a manifest
    Assemble {
        /// Manifest JSON file
        #[arg(value_name = "MANIFEST")]
        manifest: PathBuf,

        /// Output PDF (defaults to the manifest name with .pdf)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Assemble several reports in parallel
    Batch {
        /// Manifest JSON files
        #[arg(value_name = "MANIFEST", required = true)]
        manifests: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        output: PathBuf,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Show how service content renders without a template
    Preview {
        /// JSON file with one service's content
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print normalized JSON instead of the text block
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

#[derive(Args)]
struct LayoutArgs {
    /// Page size: a4, letter, or WIDTHxHEIGHT in points
    #[arg(long, default_value = "a4", value_parser = PageSize::parse)]
    page_size: PageSize,

    /// Page margin in points
    #[arg(long, default_value = "50")]
    margin: f32,

    /// Base URL of the document conversion service
    #[arg(long, env = "SARPDF_CONVERTER_URL")]
    converter_url: Option<String>,

    /// Conversion request timeout in seconds
    #[arg(long, env = "SARPDF_CONVERTER_TIMEOUT", default_value = "120")]
    converter_timeout: u64,

    /// Write uncompressed content streams
    #[arg(long)]
    no_compress: bool,
}

impl LayoutArgs {
    fn assembler(&self) -> Result<ReportAssembler, Box<dyn std::error::Error>> {
        let options = ReportOptions::new()
            .with_page_size(self.page_size)
            .with_margin(self.margin)
            .with_compression(!self.no_compress);
        options.validate()?;

        let mut assembler = ReportAssembler::new().with_options(options);
        if let Some(url) = &self.converter_url {
            let converter =
                HttpWordConverter::new(url, Duration::from_secs(self.converter_timeout))?;
            assembler = assembler.with_converter(Arc::new(converter));
        } else {
            log::info!("No converter URL set; word attachments will fail");
        }
        Ok(assembler)
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Assemble {
            manifest,
            output,
            layout,
        } => cmd_assemble(&manifest, output.as_deref(), &layout),
        Commands::Batch {
            manifests,
            output,
            layout,
        } => cmd_batch(&manifests, &output, &layout),
        Commands::Preview { input, json } => cmd_preview(&input, json),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn load_request(path: &Path) -> Result<sarpdf::ReportRequest, Box<dyn std::error::Error>> {
    let manifest = Manifest::load(path)
        .map_err(|e| format!("{}: {}", path.display(), e))?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    Ok(build_request(manifest, base_dir)?)
}

fn default_output(manifest: &Path, dir: Option<&Path>) -> PathBuf {
    let stem = manifest.file_stem().unwrap_or_default().to_string_lossy();
    let name = format!("{}.pdf", stem);
    match dir {
        Some(dir) => dir.join(name),
        None => manifest.with_file_name(name),
    }
}

fn print_summary(path: &Path, report: &AssembledReport) {
    println!(
        "{} {} ({} pages: {} content, {} contents)",
        "✓".green(),
        path.display(),
        report.page_count(),
        report.content_pages,
        report.contents_pages
    );
}

fn cmd_assemble(
    manifest: &Path,
    output: Option<&Path>,
    layout: &LayoutArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let assembler = layout.assembler()?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));

    pb.set_message("Loading manifest...");
    let request = load_request(manifest)?;

    pb.set_message("Assembling report...");
    let report = assembler.assemble_with_summary(request)?;

    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output(manifest, None));
    fs::write(&output, &report.bytes)?;
    pb.finish_and_clear();

    print_summary(&output, &report);
    Ok(())
}

fn cmd_batch(
    manifests: &[PathBuf],
    output_dir: &Path,
    layout: &LayoutArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let assembler = layout.assembler()?;
    fs::create_dir_all(output_dir)?;

    let pb = ProgressBar::new(manifests.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    pb.set_message("Loading manifests...");
    let mut requests = Vec::with_capacity(manifests.len());
    for path in manifests {
        requests.push(load_request(path)?);
        pb.inc(1);
    }

    pb.set_message("Assembling...");
    pb.enable_steady_tick(Duration::from_millis(100));
    let results = assembler.assemble_batch(requests);
    pb.finish_and_clear();

    let mut failures = 0;
    for (path, result) in manifests.iter().zip(results) {
        match result {
            Ok(report) => {
                let output = default_output(path, Some(output_dir));
                fs::write(&output, &report.bytes)?;
                print_summary(&output, &report);
            }
            Err(e) => {
                failures += 1;
                eprintln!("{} {}: {}", "✗".red(), path.display(), e);
            }
        }
    }

    if failures > 0 {
        return Err(format!("{} of {} reports failed", failures, manifests.len()).into());
    }
    Ok(())
}

fn cmd_preview(input: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let text = fs::read_to_string(input)?;
    let content = ContentNode::from_json_str(&text)?;
    let normalized = normalize(&content);

    if json {
        println!("{}", serde_json::to_string_pretty(&normalized.to_json())?);
    } else {
        println!("{}", render_fallback(&normalized));
    }
    Ok(())
}

fn cmd_version() {
    println!("{} {}", "sarpdf".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Subject Access Request report assembly tool");
    println!();
    println!("License: MIT");
}
