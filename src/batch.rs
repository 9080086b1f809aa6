//! Directory batch processing.
//!
//! Every `*.pdf` in the input directory yields `<stem>.json` in the output
//! directory. A file that fails is logged and listed in the report; it never
//! stops the rest of the batch.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::analysis::OutlineOptions;
use crate::error::{Error, Result};
use crate::render::{write_json, JsonFormat};

/// Options for a batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOptions {
    /// Per-document outline options
    pub outline: OutlineOptions,
    /// JSON output format
    pub format: JsonFormat,
    /// Process documents on the rayon thread pool
    pub parallel: bool,
}

impl BatchOptions {
    /// Create new batch options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set outline options.
    pub fn with_outline(mut self, outline: OutlineOptions) -> Self {
        self.outline = outline;
        self
    }

    /// Set output format.
    pub fn with_format(mut self, format: JsonFormat) -> Self {
        self.format = format;
        self
    }

    /// Process one document at a time.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            outline: OutlineOptions::default(),
            format: JsonFormat::Pretty,
            parallel: true,
        }
    }
}

/// A document that produced no output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFailure {
    /// Input file
    pub input: PathBuf,
    /// Error message
    pub message: String,
}

/// Result of a batch run, in input file name order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// JSON files written
    pub written: Vec<PathBuf>,
    /// Inputs that failed
    pub failures: Vec<BatchFailure>,
}

impl BatchReport {
    /// Number of inputs seen.
    pub fn total(&self) -> usize {
        self.written.len() + self.failures.len()
    }

    /// Whether every input produced output.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// List the PDF files of a directory, sorted by file name.
///
/// The extension check is case-insensitive. Subdirectories are not entered.
pub fn collect_inputs<P: AsRef<Path>>(in_dir: P) -> Result<Vec<PathBuf>> {
    let mut inputs = Vec::new();
    for entry in fs::read_dir(in_dir)? {
        let path = entry?.path();
        let is_pdf = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if is_pdf && path.is_file() {
            inputs.push(path);
        }
    }
    inputs.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(inputs)
}

/// Output path for an input: `<out_dir>/<stem>.json`.
pub fn output_path(input: &Path, out_dir: &Path) -> PathBuf {
    let mut name = input.file_stem().unwrap_or(input.as_os_str()).to_os_string();
    name.push(".json");
    out_dir.join(name)
}

/// Process one input file and write its JSON. Returns the output path.
pub fn process_file(input: &Path, out_dir: &Path, options: &BatchOptions) -> Result<PathBuf> {
    let outline = crate::process_with_options(input, &options.outline)?;
    let output = output_path(input, out_dir);
    write_json(&outline, &output, options.format)?;
    Ok(output)
}

/// Process every PDF in `in_dir`, writing outlines to `out_dir`.
///
/// Fails only when the input directory cannot be listed or the output
/// directory cannot be created. Inputs whose output name collides with an
/// earlier input's (`a.pdf` and `a.PDF`) are reported as failures.
pub fn run_batch<P, Q>(in_dir: P, out_dir: Q, options: &BatchOptions) -> Result<BatchReport>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    run_batch_with_progress(in_dir, out_dir, options, |_, _| {})
}

/// Like [`run_batch`], calling `on_done` after each document.
///
/// With `parallel` set, `on_done` runs on worker threads in completion order.
pub fn run_batch_with_progress<P, Q, F>(
    in_dir: P,
    out_dir: Q,
    options: &BatchOptions,
    on_done: F,
) -> Result<BatchReport>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    F: Fn(&Path, &Result<PathBuf>) + Sync,
{
    let inputs = collect_inputs(in_dir.as_ref())?;
    let out_dir = out_dir.as_ref();
    fs::create_dir_all(out_dir).map_err(|source| Error::Output {
        path: out_dir.to_path_buf(),
        source,
    })?;

    let (inputs, collisions) = split_collisions(inputs, out_dir);

    log::info!(
        "Processing {} PDF files from {}",
        inputs.len(),
        in_dir.as_ref().display()
    );

    let run_one = |input: &PathBuf| {
        let result = process_file(input, out_dir, options);
        on_done(input, &result);
        (input.clone(), result)
    };

    let results: Vec<_> = if options.parallel {
        inputs.par_iter().map(run_one).collect()
    } else {
        inputs.iter().map(run_one).collect()
    };

    let collided = collisions.into_iter().map(|(input, first)| {
        let output = output_path(&input, out_dir);
        let result = Err(Error::Output {
            source: io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("output already written for {}", first.display()),
            ),
            path: output,
        });
        on_done(&input, &result);
        (input, result)
    });

    let mut report = BatchReport::default();
    for (input, result) in results.into_iter().chain(collided) {
        match result {
            Ok(output) => {
                log::info!("Processed {}", input.display());
                report.written.push(output);
            }
            Err(e) => {
                log::warn!("Skipping {}: {}", input.display(), e);
                report.failures.push(BatchFailure {
                    input,
                    message: e.to_string(),
                });
            }
        }
    }

    Ok(report)
}

/// Separate inputs whose output file would overwrite an earlier input's.
///
/// Output names are compared case-insensitively. Each collision is paired
/// with the input that keeps the name.
fn split_collisions(
    inputs: Vec<PathBuf>,
    out_dir: &Path,
) -> (Vec<PathBuf>, Vec<(PathBuf, PathBuf)>) {
    let mut owners: HashMap<String, PathBuf> = HashMap::new();
    let mut kept = Vec::with_capacity(inputs.len());
    let mut collisions = Vec::new();

    for input in inputs {
        let key = output_path(&input, out_dir)
            .to_string_lossy()
            .to_lowercase();
        match owners.get(&key) {
            Some(first) => collisions.push((input, first.clone())),
            None => {
                owners.insert(key, input.clone());
                kept.push(input);
            }
        }
    }

    (kept, collisions)
}
