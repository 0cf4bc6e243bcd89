//! Recursive TIFF dataset walker
//!
//! Mirrors `input_root` onto `output_root`, writing `processed_<name>` for
//! every `.tif`/`.tiff` file. Files are processed one at a time in path
//! order; a failing file is recorded and the batch moves on.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use super::types::{
    DatasetError, DatasetReport, FileError, FileOutcome, FileTask, Result, DEFAULT_OUTPUT_PREFIX,
    TIFF_EXTENSIONS,
};
use crate::cleanup::{ScaleBarOptions, ScaleBarRemover, ScaleBarResult};
use crate::progress::FileStage;

// ============================================================
// Callback
// ============================================================

/// Observer for dataset progress
pub trait DatasetCallback {
    /// Called once after the file list is known
    fn on_dataset_start(&self, _total: usize) {}

    /// Called before a file is decoded (index is 0-based)
    fn on_file_start(&self, _index: usize, _task: &FileTask) {}

    /// Called when a file reaches a new stage
    fn on_file_stage(&self, _task: &FileTask, _stage: FileStage) {}

    /// Called with the final outcome of a file
    fn on_file_complete(&self, _outcome: &FileOutcome) {}
}

/// Callback that ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentCallback;

impl DatasetCallback for SilentCallback {}

// ============================================================
// Options
// ============================================================

/// Dataset walker options
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetOptions {
    /// Scale-bar removal options applied to every image
    pub scale_bar: ScaleBarOptions,
    /// Prefix prepended to output file names
    pub prefix: String,
    /// Also write the removal mask as `<output stem>_mask.png`
    pub save_mask: bool,
}

impl Default for DatasetOptions {
    fn default() -> Self {
        Self {
            scale_bar: ScaleBarOptions::default(),
            prefix: DEFAULT_OUTPUT_PREFIX.to_string(),
            save_mask: false,
        }
    }
}

impl DatasetOptions {
    #[must_use]
    pub fn with_scale_bar(mut self, scale_bar: ScaleBarOptions) -> Self {
        self.scale_bar = scale_bar;
        self
    }

    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn with_save_mask(mut self, save_mask: bool) -> Self {
        self.save_mask = save_mask;
        self
    }
}

// ============================================================
// Path helpers
// ============================================================

/// Check for a `.tif`/`.tiff` extension, ignoring case
pub fn is_tiff(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            TIFF_EXTENSIONS
                .iter()
                .any(|candidate| ext.eq_ignore_ascii_case(candidate))
        })
}

/// Derive the mirrored output path for an input file
///
/// `input_root/sub/dir/name.tif` becomes `output_root/sub/dir/<prefix>name.tif`.
/// Returns `None` when `input` is not under `input_root`.
pub fn output_path_for(
    input: &Path,
    input_root: &Path,
    output_root: &Path,
    prefix: &str,
) -> Option<PathBuf> {
    let relative = input.strip_prefix(input_root).ok()?;
    let file_name = relative.file_name()?;

    let mut name = OsString::from(prefix);
    name.push(file_name);

    let mut output = output_root.to_path_buf();
    if let Some(parent) = relative.parent() {
        output.push(parent);
    }
    output.push(name);
    Some(output)
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}

fn write_image(
    image: &DynamicImage,
    path: &Path,
    format: ImageFormat,
) -> std::result::Result<(), FileError> {
    let mut writer = BufWriter::new(File::create(path)?);
    if let Err(e) = image.write_to(&mut writer, format) {
        drop(writer);
        let _ = fs::remove_file(path);
        return Err(FileError::Encode(e.to_string()));
    }
    writer.flush()?;
    Ok(())
}

// ============================================================
// Walker
// ============================================================

/// Sequential dataset processor
#[derive(Debug, Clone, Default)]
pub struct DatasetWalker {
    options: DatasetOptions,
}

impl DatasetWalker {
    pub fn new(options: DatasetOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DatasetOptions {
        &self.options
    }

    /// Discover TIFF files and derive their output paths, sorted by input path
    ///
    /// Fails with [`DatasetError::MissingInput`] before anything is written
    /// when `input_root` does not exist.
    pub fn collect_tasks(&self, input_root: &Path, output_root: &Path) -> Result<Vec<FileTask>> {
        if !input_root.exists() {
            return Err(DatasetError::MissingInput(input_root.to_path_buf()));
        }
        if !input_root.is_dir() {
            return Err(DatasetError::Walk(format!(
                "{} is not a directory",
                input_root.display()
            )));
        }

        // Skip our own output when it lives inside the input tree
        let nested_output = output_root != input_root && output_root.starts_with(input_root);

        let walker = WalkDir::new(input_root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !(nested_output && entry.path().starts_with(output_root)));

        let mut tasks = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "skipping unreadable directory entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() || !is_tiff(entry.path()) {
                continue;
            }
            if let Some(output) =
                output_path_for(entry.path(), input_root, output_root, &self.options.prefix)
            {
                tasks.push(FileTask::new(entry.path(), output));
            }
        }

        tasks.sort_by(|a, b| a.input.cmp(&b.input));
        Ok(tasks)
    }

    /// Process every TIFF under `input_root`
    pub fn run(
        &self,
        input_root: &Path,
        output_root: &Path,
        callback: &dyn DatasetCallback,
    ) -> Result<DatasetReport> {
        let tasks = self.collect_tasks(input_root, output_root)?;
        info!(
            input = %input_root.display(),
            output = %output_root.display(),
            files = tasks.len(),
            "dataset scan complete"
        );
        callback.on_dataset_start(tasks.len());

        let mut report = DatasetReport::default();
        for (index, task) in tasks.iter().enumerate() {
            callback.on_file_start(index, task);
            let outcome = self.run_task(task, callback);
            callback.on_file_complete(&outcome);
            report.outcomes.push(outcome);
        }

        info!(
            succeeded = report.succeeded(),
            failed = report.failed(),
            "dataset run finished"
        );
        Ok(report)
    }

    /// Process one task, turning every failure (including panics) into an outcome
    pub fn run_task(&self, task: &FileTask, callback: &dyn DatasetCallback) -> FileOutcome {
        callback.on_file_stage(task, FileStage::Pending);
        let attempt = panic::catch_unwind(AssertUnwindSafe(|| self.process_file(task, callback)));

        let error = match attempt {
            Ok(Ok(result)) => {
                return FileOutcome::Success {
                    input: task.input.clone(),
                    output: task.output.clone(),
                    result,
                };
            }
            Ok(Err(error)) => error,
            Err(payload) => FileError::Unexpected(panic_message(payload.as_ref())),
        };

        warn!(input = %task.input.display(), error = %error, "file failed");
        FileOutcome::Failure {
            input: task.input.clone(),
            error,
        }
    }

    /// Decode, clean and write one file
    pub fn process_file(
        &self,
        task: &FileTask,
        callback: &dyn DatasetCallback,
    ) -> std::result::Result<ScaleBarResult, FileError> {
        let mut image =
            image::open(&task.input).map_err(|e| FileError::Decode(e.to_string()))?;
        debug!(input = %task.input.display(), color = ?image.color(), "decoded");
        callback.on_file_stage(task, FileStage::Decoded);

        if let Some(parent) = task.output.parent() {
            fs::create_dir_all(parent)?;
        }

        let (result, mask) = ScaleBarRemover::remove_with_mask(&mut image, &self.options.scale_bar)?;
        debug!(
            masked = result.masked_pixels,
            filled = result.filled_pixels,
            "scale bar processed"
        );
        callback.on_file_stage(task, FileStage::Processed);

        let format = ImageFormat::from_path(&task.input).unwrap_or(ImageFormat::Tiff);
        write_image(&image, &task.output, format)?;

        if self.options.save_mask {
            mask.save_with_format(task.mask_path(), ImageFormat::Png)
                .map_err(|e| FileError::Encode(e.to_string()))?;
        }
        callback.on_file_stage(task, FileStage::Written);

        Ok(result)
    }
}

/// Process a dataset with the given options and no progress reporting
pub fn process_dataset(
    input_root: &Path,
    output_root: &Path,
    options: &DatasetOptions,
) -> Result<DatasetReport> {
    DatasetWalker::new(options.clone()).run(input_root, output_root, &SilentCallback)
}
