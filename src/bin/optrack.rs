//! Reconstruct optical-photon tracks from a JSON event file and write one CSV row per photon.
//!
//! Usage:
//! ```text
//! optrack <INPUT> <OUTPUT> [--mode joined|minimal] [--single-step keep|skip|reject]
//!         [--hit-flags toggle|set] [--species NAME]
//! ```
//!
//! Logging is controlled with `RUST_LOG` (`info` for per-event status, `trace` for track
//! tables). Exit status is 1 on bad arguments, a missing input or any reconstruction error.

use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::error::ErrorKind;
use clap::{Parser, ValueEnum};
use log::{error, info};

use optrack::constants::OPTICAL_PHOTON;
use optrack::io::{CsvPhotonWriter, JsonEventFile};
use optrack::pipeline::{process_events, RunSummary};
use optrack::reconstruction::{
    AnalysisMode, HitFlagUpdate, ReconstructionParams, SingleStepPolicy,
};
use optrack::OptrackError;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    /// Join fragment chains before extraction
    Joined,
    /// One photon per fragment, no joining
    Minimal,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SingleStepArg {
    Keep,
    Skip,
    Reject,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum HitFlagsArg {
    /// Each report flips the flag of its track
    Toggle,
    /// Each report sets the flag of its track
    Set,
}

impl From<ModeArg> for AnalysisMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Joined => AnalysisMode::Joined,
            ModeArg::Minimal => AnalysisMode::Minimal,
        }
    }
}

impl From<SingleStepArg> for SingleStepPolicy {
    fn from(arg: SingleStepArg) -> Self {
        match arg {
            SingleStepArg::Keep => SingleStepPolicy::Keep,
            SingleStepArg::Skip => SingleStepPolicy::Skip,
            SingleStepArg::Reject => SingleStepPolicy::Reject,
        }
    }
}

impl From<HitFlagsArg> for HitFlagUpdate {
    fn from(arg: HitFlagsArg) -> Self {
        match arg {
            HitFlagsArg::Toggle => HitFlagUpdate::Toggle,
            HitFlagsArg::Set => HitFlagUpdate::Set,
        }
    }
}

/// Command line arguments
#[derive(Parser, Debug)]
#[command(
    name = "optrack",
    about = "Rebuilds optical-photon tracks split by re-emission and extracts per-photon observables",
    long_about = None
)]
struct Args {
    /// JSON event file
    input: Utf8PathBuf,

    /// CSV file to write the photon records to
    output: Utf8PathBuf,

    /// Analysis to run
    #[arg(long, value_enum, default_value = "joined")]
    mode: ModeArg,

    /// Policy for tracks holding only their birth step
    #[arg(long, value_enum, default_value = "keep")]
    single_step: SingleStepArg,

    /// How hit reports update the hit-flag table
    #[arg(long, value_enum, default_value = "toggle")]
    hit_flags: HitFlagsArg,

    /// Particle species to reconstruct
    #[arg(long, default_value = OPTICAL_PHOTON)]
    species: String,
}

fn run(args: &Args) -> Result<RunSummary, OptrackError> {
    let params = ReconstructionParams::builder()
        .mode(args.mode.into())
        .single_step(args.single_step.into())
        .hit_flag_update(args.hit_flags.into())
        .species(args.species.as_str())
        .build()?;

    let mut source = JsonEventFile::open(&args.input)?;
    let mut sink = CsvPhotonWriter::create(&args.output)?;
    info!("reading {} into {}", args.input, args.output);

    process_events(&mut source, &params, &mut sink)
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            return match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
        }
    };

    env_logger::init();

    match run(&args) {
        Ok(summary) => {
            println!("{summary}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{err}");
            eprintln!("optrack: {err}");
            ExitCode::FAILURE
        }
    }
}
