use std::{path::PathBuf, process::ExitCode};

use anyhow::Context as _;
use clap::{ArgAction, Parser, ValueEnum};
use timelapse::{
    DEFAULT_DELIMITER, DEFAULT_OUTPUT_NAME, DecodePolicy, MalformedPolicy, OverflowPolicy, Rgb8,
    TimelapseConfig, TimelapseError,
};
use tracing_subscriber::EnvFilter;

const EXIT_RUN_FAILED: u8 = 1;
const EXIT_USAGE: u8 = 2;
const EXIT_INPUT_DIR: u8 = 3;

/// Assemble numbered snapshots into a time-lapse video, centering each image on a fixed canvas.
#[derive(Parser, Debug)]
#[command(name = "timelapse", version)]
struct Cli {
    /// Output frames per second.
    fps: u32,

    /// Canvas width in pixels.
    frame_w: u32,

    /// Canvas height in pixels.
    frame_h: u32,

    /// Directory containing `<N>_<suffix>.jpg|png` snapshots.
    input_dir: PathBuf,

    /// Directory the video is written into.
    output_dir: PathBuf,

    /// Video file name inside the output directory.
    #[arg(long, default_value = DEFAULT_OUTPUT_NAME)]
    output_name: String,

    /// Canvas background color as RRGGBB hex.
    #[arg(long, default_value_t = Rgb8::BLACK)]
    background: Rgb8,

    /// Character that ends the sequence number in file names.
    #[arg(long, default_value_t = DEFAULT_DELIMITER)]
    delimiter: char,

    /// Where names without a sequence number go.
    #[arg(long, value_enum, default_value_t = MalformedChoice::Lexical)]
    malformed: MalformedChoice,

    /// What to do with images that fail to decode.
    #[arg(long, value_enum, default_value_t = DecodeChoice::Skip)]
    on_decode_error: DecodeChoice,

    /// What to do with images larger than the canvas.
    #[arg(long, value_enum, default_value_t = OversizeChoice::Clip)]
    oversize: OversizeChoice,

    /// Print the ordered frame list as JSON and exit without encoding.
    #[arg(long)]
    dry_run: bool,

    /// Fail instead of replacing an existing output file.
    #[arg(long)]
    no_overwrite: bool,

    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum MalformedChoice {
    /// Last, sorted by name.
    Lexical,
    /// Last, in directory listing order.
    Discovery,
    /// Left out of the video.
    Exclude,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DecodeChoice {
    Skip,
    Blank,
    Abort,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OversizeChoice {
    Clip,
    Reject,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(EXIT_USAGE)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(exit_code_for(&err))
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn exit_code_for(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<TimelapseError>() {
        Some(TimelapseError::DirectoryOpen { .. }) => EXIT_INPUT_DIR,
        Some(TimelapseError::Validation(_)) => EXIT_USAGE,
        _ => EXIT_RUN_FAILED,
    }
}

fn build_config(cli: &Cli) -> anyhow::Result<TimelapseConfig> {
    let mut cfg = TimelapseConfig::new(
        cli.fps,
        cli.frame_w,
        cli.frame_h,
        &cli.input_dir,
        &cli.output_dir,
    )?;
    cfg.output_name = cli.output_name.clone();
    cfg.background = cli.background;
    cfg.delimiter = cli.delimiter;
    cfg.malformed = match cli.malformed {
        MalformedChoice::Lexical => MalformedPolicy::Lexical,
        MalformedChoice::Discovery => MalformedPolicy::Discovery,
        MalformedChoice::Exclude => MalformedPolicy::Exclude,
    };
    cfg.on_decode_error = match cli.on_decode_error {
        DecodeChoice::Skip => DecodePolicy::Skip,
        DecodeChoice::Blank => DecodePolicy::Blank,
        DecodeChoice::Abort => DecodePolicy::Abort,
    };
    cfg.oversize = match cli.oversize {
        OversizeChoice::Clip => OverflowPolicy::Clip,
        OversizeChoice::Reject => OverflowPolicy::Reject,
    };
    cfg.overwrite = !cli.no_overwrite;
    cfg.validate()?;
    Ok(cfg)
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cfg = build_config(&cli)?;
    tracing::debug!(config = ?cfg, "resolved configuration");

    if cli.dry_run {
        let seq = timelapse::plan_sequence(&cfg)?;
        let stdout = std::io::stdout().lock();
        serde_json::to_writer_pretty(stdout, &seq).context("write sequence JSON")?;
        println!();
        return Ok(());
    }

    let stats = timelapse::run_timelapse(&cfg)?;
    eprintln!(
        "wrote {} ({} frames)",
        cfg.output_path().display(),
        stats.frames_written
    );
    Ok(())
}
