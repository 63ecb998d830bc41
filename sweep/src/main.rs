use std::{io, path::PathBuf, process::ExitCode};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use jump_bucketing_sweep::{
    ids::{read_ids, synthetic_ids},
    report::{write_cases, write_summary, ReportOptions},
    sweep::{run, DEFAULT_ALGORITHMS},
    Algorithm, SweepPlan,
};
use tracing::{error, info};
use tracing_subscriber::{
    filter::{EnvFilter, LevelFilter},
    prelude::*,
    registry::Registry,
};

const LOG_ENV_VAR: &str = "JUMP_BUCKETING_LOG";

/// Compares how many identifiers change bucket under Jump Consistent Hash and
/// under modulo arithmetic when the number of buckets changes.
#[derive(Parser, Debug)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Only log errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log more (repeat for even more).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sweeps the identifiers listed in a file, one per line.
    File {
        file: PathBuf,
        #[command(flatten)]
        sweep: SweepArgs,
    },

    /// Sweeps randomly generated identifiers.
    Synthetic {
        #[arg(short, long, default_value_t = 10_000)]
        count: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[command(flatten)]
        sweep: SweepArgs,
    },
}

#[derive(Args, Debug)]
struct SweepArgs {
    /// Smallest initial number of buckets.
    #[arg(long, default_value_t = 2)]
    from: u32,

    /// Largest initial number of buckets.
    #[arg(long, default_value_t = 9)]
    to: u32,

    /// Change in the number of buckets, negative to remove buckets.
    #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
    delta: i64,

    /// Algorithms to compare.
    #[arg(short, long, value_enum, value_delimiter = ',', default_values_t = DEFAULT_ALGORITHMS)]
    algorithms: Vec<Algorithm>,

    /// Also report how uniform each new distribution is.
    #[arg(long)]
    uniformity: bool,

    /// Print one move ratio line per case instead of the distributions.
    #[arg(long)]
    summary: bool,
}

fn init_tracing(quiet: bool, verbose: u8) {
    let level_filter = if quiet {
        LevelFilter::ERROR
    } else {
        match verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    };

    let env_filter = EnvFilter::builder()
        .with_default_directive(level_filter.into())
        .with_env_var(LOG_ENV_VAR)
        .from_env_lossy();

    let subscriber = Registry::default().with(env_filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(io::stderr)
            .compact(),
    );

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("INTERNAL ERROR: setting default tracing::subscriber failed");
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose);

    match run_command(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run_command(command: Command) -> anyhow::Result<()> {
    let (ids, sweep) = match command {
        Command::File { file, sweep } => {
            let ids = read_ids(&file)
                .with_context(|| format!("Error while reading file {}", file.display()))?;
            (ids, sweep)
        }
        Command::Synthetic { count, seed, sweep } => {
            info!(count, seed, "generating identifiers");
            (synthetic_ids(count, seed), sweep)
        }
    };
    anyhow::ensure!(!ids.is_empty(), "no identifiers to analyze");

    let plan = SweepPlan {
        bucket_counts: sweep.from..=sweep.to,
        delta: sweep.delta,
        algorithms: sweep.algorithms,
    };
    plan.validate().context("invalid sweep")?;
    info!(
        num_ids = ids.len(),
        from = sweep.from,
        to = sweep.to,
        delta = sweep.delta,
        "starting sweep"
    );

    let cases = run(&ids, &plan)?;

    let mut stdout = io::stdout().lock();
    if sweep.summary {
        write_summary(&mut stdout, &cases)?;
    } else {
        let options = ReportOptions {
            uniformity: sweep.uniformity,
        };
        write_cases(&mut stdout, &cases, options)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::ffi::OsStr;

    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_match_historic_sweep() {
        let cli = Cli::parse_from(["jump-bucketing", "file", "ids.txt"]);
        let Command::File { file, sweep } = cli.command else {
            panic!("expected the file command");
        };
        assert_eq!(file, PathBuf::from("ids.txt"));
        assert_eq!((sweep.from, sweep.to, sweep.delta), (2, 9, 1));
        assert_eq!(sweep.algorithms, DEFAULT_ALGORITHMS);
    }

    #[test]
    fn negative_delta() {
        let cli = Cli::parse_from([
            "jump-bucketing",
            "synthetic",
            "--count",
            "50",
            "-d",
            "-2",
            "-a",
            "modulo",
        ]);
        let Command::Synthetic { count, sweep, .. } = cli.command else {
            panic!("expected the synthetic command");
        };
        assert_eq!(count, 50);
        assert_eq!(sweep.delta, -2);
        assert_eq!(sweep.algorithms, [Algorithm::Modulo]);
    }

    #[test]
    fn rejects_sweep_removing_every_bucket() {
        let cli = Cli::parse_from(["jump-bucketing", "synthetic", "-d", "-2"]);
        let err = run_command(cli.command).unwrap_err();
        assert!(format!("{err:#}").starts_with("invalid sweep: cannot go from 2 buckets"));
    }

    #[test]
    fn rejects_inverted_range() {
        let cli = Cli::parse_from(["jump-bucketing", "synthetic", "--from", "9", "--to", "2"]);
        let err = run_command(cli.command).unwrap_err();
        assert_eq!(
            format!("{err:#}"),
            "invalid sweep: empty bucket count range: from 9 to 2"
        );
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.txt");
        let cli = Cli::parse_from([
            OsStr::new("jump-bucketing"),
            OsStr::new("file"),
            path.as_os_str(),
        ]);
        let err = run_command(cli.command).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("Error while reading file {}", path.display())
        );
    }
}
