//! scalebar-clean - scale bar removal for micrograph datasets
//!
//! CLI entry point

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::Level;

use scalebar_clean::{
    exit_codes, Cli, Config, DatasetError, DatasetWalker, FileTask, OutputMode, ProgressTracker,
    RunConfig,
};

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() {
                exit_codes::INVALID_ARGS
            } else {
                exit_codes::SUCCESS
            };
            let _ = e.print();
            return exit_code(code);
        }
    };

    init_logging(&cli);

    let code = match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            exit_codes::GENERAL_ERROR
        }
    };
    exit_code(code)
}

fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}

/// Install the stderr subscriber; level follows -v / -q
fn init_logging(cli: &Cli) {
    let level = if cli.quiet {
        Level::ERROR
    } else {
        match cli.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn output_mode(cli: &Cli) -> OutputMode {
    if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::from_verbosity(cli.verbose)
    }
}

fn run(cli: &Cli) -> Result<i32> {
    // Explicit config must load; implicit lookup falls back to defaults
    let file_config = match &cli.config {
        Some(path) => match Config::load_from_path(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("Error: {}", e);
                return Ok(exit_codes::CONFIG_ERROR);
            }
        },
        None => Config::load().unwrap_or_else(|e| {
            eprintln!("Warning: Failed to load config file: {}", e);
            Config::default()
        }),
    };
    let run_config = file_config.merge_with_cli(&cli.overrides());

    let cwd = std::env::current_dir().context("cannot determine working directory")?;
    let input_root = absolutize(&cwd, &cli.input);
    let output_root = absolutize(&cwd, &cli.output);

    let walker = DatasetWalker::new(run_config.dataset_options());

    if cli.dry_run {
        return match walker.collect_tasks(&input_root, &output_root) {
            Ok(tasks) => {
                print_execution_plan(cli, &input_root, &output_root, &tasks, &run_config);
                Ok(exit_codes::SUCCESS)
            }
            Err(e) => Ok(report_fatal(e)),
        };
    }

    let tracker = ProgressTracker::new(output_mode(cli));
    match walker.run(&input_root, &output_root, &tracker) {
        Ok(_report) => {
            tracker.finish();
            Ok(exit_codes::SUCCESS)
        }
        Err(e) => Ok(report_fatal(e)),
    }
}

fn report_fatal(error: DatasetError) -> i32 {
    println!("ERROR: {}", error);
    match error {
        DatasetError::MissingInput(_) => exit_codes::INPUT_NOT_FOUND,
        DatasetError::Walk(_) => exit_codes::GENERAL_ERROR,
    }
}

fn absolutize(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

/// Print execution plan for dry-run mode
fn print_execution_plan(
    cli: &Cli,
    input_root: &Path,
    output_root: &Path,
    tasks: &[FileTask],
    config: &RunConfig,
) {
    let opts = &config.scale_bar;

    println!("=== Dry Run - Execution Plan ===");
    println!();
    println!("Input: {}", input_root.display());
    println!("Output: {}", output_root.display());
    println!("Files to process: {}", tasks.len());
    println!();
    println!("Scale Bar Removal:");
    println!(
        "  Region: x >= {:.0}% of width, y >= {:.0}% of height",
        opts.region_left * 100.0,
        opts.region_top * 100.0
    );
    println!("  Threshold: {}", opts.threshold);
    println!("  Dilation passes: {}", opts.dilate_iterations);
    println!("  Inpaint radius: {}", opts.inpaint_radius);
    println!();
    println!("Output Options:");
    println!("  Prefix: {}", config.prefix);
    println!("  Save mask: {}", if config.save_mask { "YES" } else { "NO" });

    if cli.verbose > 0 {
        println!();
        println!("Effective configuration:");
        println!("{}", config.to_json());
    }

    println!();
    println!("Files:");
    for (i, task) in tasks.iter().enumerate() {
        println!("  {}. {} -> {}", i + 1, task.input.display(), task.output.display());
    }
}
