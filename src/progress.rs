//! Progress tracking module for dataset runs.
//!
//! Provides per-file stage tracking, verbosity modes and the console
//! reporter used by the CLI.

use std::cell::{Cell, OnceCell, RefCell};
use std::fmt;
use std::path::PathBuf;
use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};

use crate::dataset::{DatasetCallback, FileOutcome, FileTask};

/// Processing stages of a single file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileStage {
    /// Discovered, not yet opened
    #[default]
    Pending,
    /// Decoded into memory
    Decoded,
    /// Scale bar removed
    Processed,
    /// Output written
    Written,
}

impl FileStage {
    /// Get the name of the stage
    pub fn name(&self) -> &'static str {
        match self {
            FileStage::Pending => "Pending",
            FileStage::Decoded => "Decoded",
            FileStage::Processed => "Processed",
            FileStage::Written => "Written",
        }
    }
}

impl fmt::Display for FileStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Output verbosity mode, ordered from least to most output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum OutputMode {
    /// No output
    Quiet,
    /// Normal output (one line per file)
    #[default]
    Normal,
    /// File headers and the run summary
    Verbose,
    /// Very verbose (stage transitions)
    VeryVerbose,
}

impl OutputMode {
    /// Create OutputMode from verbosity level
    pub fn from_verbosity(level: u8) -> Self {
        match level {
            0 => OutputMode::Normal,
            1 => OutputMode::Verbose,
            _ => OutputMode::VeryVerbose,
        }
    }

    /// Whether output needing `required` is printed; quiet prints nothing
    pub fn should_show(&self, required: OutputMode) -> bool {
        *self != OutputMode::Quiet && *self >= required
    }
}

const PROGRESS_TEMPLATE: &str = "{spinner} [{bar:40}] {pos}/{len} {wide_msg}";

/// Console reporter for dataset runs
///
/// Prints one line per file in the operator format (`<input> -> <output>` or
/// `FAILED: <input> - <error>`) and drives a progress bar in normal mode.
pub struct ProgressTracker {
    output_mode: OutputMode,
    bar: OnceCell<ProgressBar>,
    total_files: Cell<usize>,
    ok_count: Cell<usize>,
    error_count: Cell<usize>,
    overlay_count: Cell<usize>,
    unfilled_count: Cell<usize>,
    failed_inputs: RefCell<Vec<PathBuf>>,
    current_stage: Cell<FileStage>,
    start_time: Instant,
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new(OutputMode::Normal)
    }
}

impl ProgressTracker {
    /// Create a new progress tracker
    pub fn new(output_mode: OutputMode) -> Self {
        Self {
            output_mode,
            bar: OnceCell::new(),
            total_files: Cell::new(0),
            ok_count: Cell::new(0),
            error_count: Cell::new(0),
            overlay_count: Cell::new(0),
            unfilled_count: Cell::new(0),
            failed_inputs: RefCell::new(Vec::new()),
            current_stage: Cell::new(FileStage::Pending),
            start_time: Instant::now(),
        }
    }

    pub fn output_mode(&self) -> OutputMode {
        self.output_mode
    }

    pub fn total_files(&self) -> usize {
        self.total_files.get()
    }

    pub fn ok_count(&self) -> usize {
        self.ok_count.get()
    }

    pub fn error_count(&self) -> usize {
        self.error_count.get()
    }

    /// Cleaned files in which something was masked
    pub fn overlay_count(&self) -> usize {
        self.overlay_count.get()
    }

    /// Cleaned files whose whole region was masked and left as is
    pub fn unfilled_count(&self) -> usize {
        self.unfilled_count.get()
    }

    pub fn failed_inputs(&self) -> Vec<PathBuf> {
        self.failed_inputs.borrow().clone()
    }

    pub fn current_stage(&self) -> FileStage {
        self.current_stage.get()
    }

    /// Get elapsed time in seconds
    pub fn elapsed_secs(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }

    /// Print a line without tearing the progress bar
    fn emit(&self, line: &str) {
        match self.bar.get() {
            Some(bar) => bar.suspend(|| println!("{}", line)),
            None => println!("{}", line),
        }
    }

    /// Run summary, e.g. `cleaned 3/4 TIFF(s): 2 scale bar(s) removed, 1 failed`
    pub fn summary(&self) -> String {
        let mut line = format!(
            "cleaned {}/{} TIFF(s): {} scale bar(s) removed",
            self.ok_count(),
            self.total_files(),
            self.overlay_count()
        );
        if self.unfilled_count() > 0 {
            line.push_str(&format!(", {} fully masked", self.unfilled_count()));
        }
        if self.error_count() > 0 {
            line.push_str(&format!(", {} failed", self.error_count()));
        }
        line
    }

    /// Clear the bar; verbose runs also get the summary and failed inputs
    pub fn finish(&self) {
        if let Some(bar) = self.bar.get() {
            bar.finish_and_clear();
        }
        if self.output_mode.should_show(OutputMode::Verbose) {
            println!();
            println!("{} in {:.2}s", self.summary(), self.elapsed_secs());
            for input in self.failed_inputs.borrow().iter() {
                println!("  not written: {}", input.display());
            }
        }
    }
}

impl DatasetCallback for ProgressTracker {
    fn on_dataset_start(&self, total: usize) {
        self.total_files.set(total);

        // Bar only in normal mode; verbose modes print their own lines
        if self.output_mode == OutputMode::Normal && total > 0 {
            let style = ProgressStyle::with_template(PROGRESS_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar());
            let bar = ProgressBar::new(total as u64).with_style(style);
            let _ = self.bar.set(bar);
        }
    }

    fn on_file_start(&self, index: usize, task: &FileTask) {
        self.current_stage.set(FileStage::Pending);
        if let Some(bar) = self.bar.get() {
            bar.set_message(task.input.display().to_string());
        }
        if self.output_mode.should_show(OutputMode::Verbose) {
            self.emit(&format!(
                "[{}/{}] Processing: {}",
                index + 1,
                self.total_files(),
                task.input.display()
            ));
        }
    }

    fn on_file_stage(&self, _task: &FileTask, stage: FileStage) {
        self.current_stage.set(stage);
        if self.output_mode.should_show(OutputMode::VeryVerbose) {
            self.emit(&format!("  Stage: {}", stage));
        }
    }

    fn on_file_complete(&self, outcome: &FileOutcome) {
        match outcome {
            FileOutcome::Success { result, .. } => {
                self.ok_count.set(self.ok_count.get() + 1);
                if result.has_overlay() {
                    self.overlay_count.set(self.overlay_count.get() + 1);
                }
                if result.unfilled_pixels() > 0 {
                    self.unfilled_count.set(self.unfilled_count.get() + 1);
                }
            }
            FileOutcome::Failure { input, .. } => {
                self.error_count.set(self.error_count.get() + 1);
                self.failed_inputs.borrow_mut().push(input.clone());
            }
        }

        if self.output_mode.should_show(OutputMode::Normal) {
            self.emit(&outcome.to_string());
        }
        if let Some(bar) = self.bar.get() {
            bar.inc(1);
        }
    }
}
