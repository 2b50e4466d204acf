//! Command-line driver: parses arguments, feeds a burst-trie engine
//! from one or more input files, and writes the sorted, emitted
//! sequence to standard output, with a diagnostic summary on standard
//! error.

use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use log::{error, info, warn};

use burstsort::input::KeyFile;
use burstsort::{CliError, Engine, GrowthPolicy, MAX_BURST_THRESHOLD, MIN_BURST_THRESHOLD};

#[derive(Parser, Debug)]
#[command(
    name = "burstsort",
    version,
    about = "Sort a large multiset of byte strings in memory with a burst trie."
)]
struct Cli {
    /// Container burst threshold, an integer in [64, 512].
    burst_threshold: u32,

    /// Number of input files that follow.
    file_count: usize,

    /// Input files; each is a sequence of newline-delimited byte keys.
    #[arg(num_args = 1..)]
    files: Vec<PathBuf>,

    /// Container growth policy.
    #[arg(long, value_enum, default_value_t = GrowthArg::Paged)]
    growth: GrowthArg,

    /// Raise log verbosity to debug.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum GrowthArg {
    Exact,
    Paged,
}

impl From<GrowthArg> for GrowthPolicy {
    fn from(arg: GrowthArg) -> Self {
        match arg {
            GrowthArg::Exact => GrowthPolicy::ExactFit,
            GrowthArg::Paged => GrowthPolicy::Paged,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    ExitCode::from(run_and_exit_code(&cli))
}

/// Validate and run, returning the process exit code: 0 on success, 1
/// on any documented failure (bad arguments, engine error, or I/O
/// error). Separated from `main` so the exit-code contract is directly
/// testable without a process boundary.
fn run_and_exit_code(cli: &Cli) -> u8 {
    if let Err(err) = validate_args(cli) {
        println!("{}", err);
        error!("{}", err);
        return 1;
    }

    match run(cli) {
        Ok(()) => 0,
        Err(err) => {
            error!("{:#}", err);
            1
        }
    }
}

/// Check the arguments `clap` itself can't express: the burst
/// threshold's legal range, and that `file_count` matches the number
/// of files actually given.
fn validate_args(cli: &Cli) -> Result<(), CliError> {
    if !(MIN_BURST_THRESHOLD..=MAX_BURST_THRESHOLD).contains(&cli.burst_threshold) {
        return Err(CliError::ThresholdOutOfRange {
            value: cli.burst_threshold,
            min: MIN_BURST_THRESHOLD,
            max: MAX_BURST_THRESHOLD,
        });
    }

    if cli.files.len() != cli.file_count {
        return Err(CliError::FileCountMismatch {
            expected: cli.file_count,
            actual: cli.files.len(),
        });
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let growth_policy = GrowthPolicy::from(cli.growth);
    let mut engine = Engine::new(cli.burst_threshold, growth_policy)?;

    info!("inserting keys from {} file(s)", cli.files.len());
    let insert_start = Instant::now();

    for path in &cli.files {
        insert_file(&mut engine, path).with_context(|| format!("processing {}", path.display()))?;
    }

    let insert_time = insert_start.elapsed();
    let inserted_count = engine.inserted_count();
    let est_mem_mb = engine.estimated_bytes() as f64 / (1024.0 * 1024.0);

    let vsize_mb = burstsort::diagnostics::process_vsize_mb().unwrap_or_else(|| {
        warn!("could not read process virtual size; reporting 0.0 MB");
        0.0
    });

    info!("emitting {} sorted keys", inserted_count);
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    engine.into_sorted_emit(&mut out)?;
    out.flush()?;

    eprintln!(
        "Copybased burst sort {:.2} {:.2} {:.2} {} {} --- sorted {} keys",
        vsize_mb,
        est_mem_mb,
        insert_time.as_secs_f64(),
        inserted_count,
        cli.burst_threshold,
        inserted_count
    );

    Ok(())
}

/// Read one input file and insert each of its keys, mapping I/O
/// failures to the documented `CliError::InputIo` variant.
fn insert_file(engine: &mut Engine, path: &Path) -> Result<(), CliError> {
    let file = KeyFile::open(path).map_err(|source| CliError::InputIo {
        path: path.display().to_string(),
        source,
    })?;

    for key in file {
        let key = key.map_err(|source| CliError::InputIo {
            path: path.display().to_string(),
            source,
        })?;

        engine.insert(&key)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(burst_threshold: u32, files: Vec<PathBuf>, file_count: usize) -> Cli {
        Cli {
            burst_threshold,
            file_count,
            files,
            growth: GrowthArg::Paged,
            verbose: false,
        }
    }

    fn write_temp_file(name: &str, contents: &[u8]) -> PathBuf {
        let path = std::env::temp_dir().join(format!("burstsort_main_test_{}_{}", std::process::id(), name));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn threshold_outside_range_is_rejected() {
        let c = cli(MIN_BURST_THRESHOLD - 1, vec![PathBuf::from("anything")], 1);
        assert!(matches!(validate_args(&c), Err(CliError::ThresholdOutOfRange { .. })));
        assert_eq!(run_and_exit_code(&c), 1);
    }

    #[test]
    fn file_count_mismatch_is_rejected() {
        let c = cli(64, vec![PathBuf::from("a"), PathBuf::from("b")], 1);
        assert!(matches!(validate_args(&c), Err(CliError::FileCountMismatch { .. })));
        assert_eq!(run_and_exit_code(&c), 1);
    }

    #[test]
    fn valid_arguments_pass_validation() {
        let c = cli(64, vec![PathBuf::from("a")], 1);
        assert!(validate_args(&c).is_ok());
    }

    #[test]
    fn missing_input_file_yields_exit_code_one() {
        let missing = std::env::temp_dir().join("burstsort_definitely_missing_main_test.txt");
        let c = cli(64, vec![missing], 1);
        assert_eq!(run_and_exit_code(&c), 1);
    }

    #[test]
    fn a_valid_run_over_a_real_file_exits_zero() {
        let path = write_temp_file("ok", b"cat\ncar\ndog\n");
        let c = cli(64, vec![path.clone()], 1);
        assert_eq!(run_and_exit_code(&c), 0);
        std::fs::remove_file(path).unwrap();
    }
}
