//! pdf-outline CLI - batch outline extraction

use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdf_outline::batch::{collect_inputs, run_batch_with_progress, BatchReport};
use pdf_outline::{
    BatchOptions, ExtractOptions, FrequencyWeight, JsonFormat, OutlineOptions, PolicyMode,
    TitleFallback,
};

#[derive(Parser, Debug)]
#[command(name = "pdf-outline")]
#[command(version)]
#[command(about = "Extract title and H1-H3 headings from PDF files into JSON", long_about = None)]
struct Cli {
    /// Directory containing input PDF files
    #[arg(
        long = "in_dir",
        value_name = "DIR",
        env = "PDF_OUTLINE_IN_DIR",
        default_value = "data/input_pdfs"
    )]
    in_dir: PathBuf,

    /// Directory for the JSON outlines
    #[arg(
        long = "out_dir",
        value_name = "DIR",
        env = "PDF_OUTLINE_OUT_DIR",
        default_value = "data/processed"
    )]
    out_dir: PathBuf,

    /// Heading acceptance policy
    #[arg(long, value_enum, default_value = "auto")]
    policy: Policy,

    /// How to count font size frequency when finding body text
    #[arg(long, value_enum, default_value = "lines")]
    weight: Weight,

    /// Use the metadata title, then the file name, when no title is found
    #[arg(long)]
    title_fallback: bool,

    /// Deepest heading level to emit (1-3)
    #[arg(long, default_value = "3", value_parser = clap::value_parser!(u8).range(1..=3))]
    max_levels: u8,

    /// Only read the first N pages of each document
    #[arg(long, value_name = "N")]
    max_pages: Option<u32>,

    /// Fail a document when a page cannot be read
    #[arg(long)]
    strict: bool,

    /// Write compact JSON
    #[arg(long)]
    compact: bool,

    /// Process one document at a time
    #[arg(long)]
    sequential: bool,

    /// No progress bar or summary
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Policy {
    /// Decide from the detected document language
    Auto,
    /// Require numbering or a trailing colon
    English,
    /// Accept on font size alone
    SizeOnly,
}

impl From<Policy> for PolicyMode {
    fn from(policy: Policy) -> Self {
        match policy {
            Policy::Auto => PolicyMode::Auto,
            Policy::English => PolicyMode::EnglishCues,
            Policy::SizeOnly => PolicyMode::SizeOnly,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Weight {
    /// One count per line
    Lines,
    /// One count per word
    Words,
}

impl From<Weight> for FrequencyWeight {
    fn from(weight: Weight) -> Self {
        match weight {
            Weight::Lines => FrequencyWeight::Lines,
            Weight::Words => FrequencyWeight::Words,
        }
    }
}

impl Cli {
    fn batch_options(&self) -> BatchOptions {
        let mut extract = ExtractOptions::new();
        if self.strict {
            extract = extract.strict();
        }
        if let Some(pages) = self.max_pages {
            extract = extract.with_max_pages(pages);
        }

        let title_fallback = if self.title_fallback {
            TitleFallback::MetadataThenFileStem
        } else {
            TitleFallback::Empty
        };

        let outline = OutlineOptions::new()
            .with_extract(extract)
            .with_policy(self.policy.into())
            .with_weight(self.weight.into())
            .with_title_fallback(title_fallback)
            .with_max_levels(self.max_levels);

        let mut options = BatchOptions::new().with_outline(outline).with_format(if self.compact {
            JsonFormat::Compact
        } else {
            JsonFormat::Pretty
        });
        if self.sequential {
            options = options.sequential();
        }
        options
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let options = cli.batch_options();
    log::debug!("Batch options: {:?}", options);
    let total = collect_inputs(&cli.in_dir)?.len();

    let pb = if cli.quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(total as u64)
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );

    let report = run_batch_with_progress(&cli.in_dir, &cli.out_dir, &options, |input, _| {
        pb.set_message(file_label(input));
        pb.inc(1);
    })?;

    pb.finish_and_clear();

    if !cli.quiet {
        print_summary(&report, &cli.out_dir);
    }

    Ok(())
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn print_summary(report: &BatchReport, out_dir: &Path) {
    if report.total() == 0 {
        println!("{}", "No PDF files found.".yellow());
        return;
    }

    println!(
        "{} {} of {} files -> {}",
        "Processed".green().bold(),
        report.written.len(),
        report.total(),
        out_dir.display()
    );

    let count = report.written.len();
    for (i, output) in report.written.iter().enumerate() {
        let branch = if i + 1 == count && report.failures.is_empty() {
            "└─"
        } else {
            "├─"
        };
        println!("  {} {}", branch.dimmed(), file_label(output));
    }

    if !report.failures.is_empty() {
        println!("{}", "Failed:".red().bold());
        for failure in &report.failures {
            println!(
                "  {} {}: {}",
                "✗".red(),
                file_label(&failure.input),
                failure.message.dimmed()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["pdf-outline"]).unwrap();
        assert_eq!(cli.policy, Policy::Auto);
        assert_eq!(cli.weight, Weight::Lines);
        assert_eq!(cli.max_levels, 3);

        let options = cli.batch_options();
        assert_eq!(options.outline, OutlineOptions::default());
        assert_eq!(options.format, JsonFormat::Pretty);
        assert!(options.parallel);
    }

    #[test]
    fn test_flags_map_to_options() {
        let cli = Cli::try_parse_from([
            "pdf-outline",
            "--in_dir",
            "pdfs",
            "--out_dir",
            "json",
            "--policy",
            "size-only",
            "--weight",
            "words",
            "--title-fallback",
            "--max-levels",
            "2",
            "--max-pages",
            "5",
            "--strict",
            "--compact",
            "--sequential",
        ])
        .unwrap();

        assert_eq!(cli.in_dir, PathBuf::from("pdfs"));
        assert_eq!(cli.out_dir, PathBuf::from("json"));

        let options = cli.batch_options();
        assert_eq!(options.outline.policy, PolicyMode::SizeOnly);
        assert_eq!(options.outline.weight, FrequencyWeight::Words);
        assert_eq!(options.outline.title_fallback, TitleFallback::MetadataThenFileStem);
        assert_eq!(options.outline.max_levels, 2);
        assert_eq!(options.outline.extract.max_pages, Some(5));
        assert_eq!(options.outline.extract.error_mode, pdf_outline::ErrorMode::Strict);
        assert_eq!(options.format, JsonFormat::Compact);
        assert!(!options.parallel);
    }

    #[test]
    fn test_max_levels_range() {
        assert!(Cli::try_parse_from(["pdf-outline", "--max-levels", "4"]).is_err());
        assert!(Cli::try_parse_from(["pdf-outline", "--max-levels", "0"]).is_err());
    }

    #[test]
    fn test_unknown_policy_rejected() {
        assert!(Cli::try_parse_from(["pdf-outline", "--policy", "french"]).is_err());
    }
}
