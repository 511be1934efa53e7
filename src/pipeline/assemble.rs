use crate::{
    compose::{
        canvas::{blank_canvas, compose_centered},
        decode::{DecodePolicy, decode_source},
    },
    encode::{
        ffmpeg::{FfmpegSink, FfmpegSinkOpts},
        sink::{FrameSink, SinkConfig},
    },
    foundation::{
        core::FrameIndex,
        error::{TimelapseError, TimelapseResult},
    },
    pipeline::config::TimelapseConfig,
    sequence::{
        order::{OrderedSequence, order_candidates},
        scan::discover_candidates,
    },
};

/// Counters collected over one run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct AssembleStats {
    /// Image candidates discovered in the input directory.
    pub candidates: u64,
    /// Entries in the ordered sequence.
    pub ordered: u64,
    /// Sequence entries without a valid index (ordered last).
    pub malformed: u64,
    /// Malformed entries dropped from the sequence.
    pub excluded: u64,
    /// Frames handed to the sink, blank ones included.
    pub frames_written: u64,
    /// Entries left out because they failed to decode.
    pub frames_skipped: u64,
    /// Background-only frames written for entries that failed to decode.
    pub frames_blank: u64,
    /// Frames whose source was cropped to fit the canvas.
    pub frames_clipped: u64,
}

/// Scan `cfg.input_dir` and order the candidates. No output is produced.
#[tracing::instrument(level = "debug", skip(cfg), fields(input_dir = %cfg.input_dir.display()))]
pub fn plan_sequence(cfg: &TimelapseConfig) -> TimelapseResult<OrderedSequence> {
    let candidates = discover_candidates(&cfg.input_dir)?;
    Ok(order_candidates(candidates, cfg.delimiter, cfg.malformed))
}

/// Composite every entry of `seq` and stream the frames into `sink`.
///
/// The sink is opened once and then either ended exactly once on success, or aborted on any
/// error so no half-written output survives. A sequence that yields no frames (empty, or every
/// entry skipped) is [`TimelapseError::NoFrames`].
#[tracing::instrument(level = "debug", skip_all, fields(frames = seq.len()))]
pub fn assemble(
    seq: &OrderedSequence,
    cfg: &TimelapseConfig,
    sink: &mut dyn FrameSink,
) -> TimelapseResult<AssembleStats> {
    cfg.validate()?;

    let mut stats = AssembleStats {
        candidates: seq.candidates() as u64,
        ordered: seq.len() as u64,
        malformed: seq.malformed() as u64,
        excluded: seq.excluded.len() as u64,
        ..AssembleStats::default()
    };
    if seq.is_empty() {
        return Err(TimelapseError::no_frames(format!(
            "no images found in '{}'",
            cfg.input_dir.display()
        )));
    }

    sink.begin(SinkConfig {
        size: cfg.size,
        fps: cfg.fps,
    })?;

    if let Err(e) = write_frames(seq, cfg, sink, &mut stats) {
        sink.abort();
        return Err(e);
    }
    if stats.frames_written == 0 {
        sink.abort();
        return Err(TimelapseError::no_frames(format!(
            "all {} images failed to decode",
            stats.ordered
        )));
    }

    sink.end()?;
    Ok(stats)
}

fn write_frames(
    seq: &OrderedSequence,
    cfg: &TimelapseConfig,
    sink: &mut dyn FrameSink,
    stats: &mut AssembleStats,
) -> TimelapseResult<()> {
    for entry in seq {
        let frame = match decode_source(&entry.path) {
            Ok(source) => {
                let composited =
                    compose_centered(&source, cfg.size, cfg.background, cfg.oversize).inspect_err(
                        |e| tracing::error!(path = %entry.path.display(), error = %e, "cannot place image"),
                    )?;
                if composited.clipped {
                    stats.frames_clipped += 1;
                    tracing::warn!(
                        path = %entry.path.display(),
                        width = source.width(),
                        height = source.height(),
                        "image larger than canvas; clipped"
                    );
                }
                composited.frame
            }
            Err(e) => match cfg.on_decode_error {
                DecodePolicy::Skip => {
                    tracing::warn!(error = %e, "skipping frame");
                    stats.frames_skipped += 1;
                    continue;
                }
                DecodePolicy::Blank => {
                    tracing::warn!(error = %e, "writing blank frame");
                    stats.frames_blank += 1;
                    blank_canvas(cfg.size, cfg.background)
                }
                DecodePolicy::Abort => return Err(e),
            },
        };

        let idx = FrameIndex(stats.frames_written);
        tracing::debug!(frame = idx.0, path = %entry.path.display(), "encoding frame");
        sink.push_frame(idx, &frame)?;
        stats.frames_written += 1;
    }
    Ok(())
}

/// Scan, order, composite and encode according to `cfg`, writing `cfg.output_path()`.
///
/// `ffmpeg` must be installed and on `PATH`. Nothing is written when the input directory cannot
/// be opened or holds no images.
#[tracing::instrument(skip(cfg), fields(out = %cfg.output_path().display()))]
pub fn run_timelapse(cfg: &TimelapseConfig) -> TimelapseResult<AssembleStats> {
    cfg.validate()?;
    let seq = plan_sequence(cfg)?;

    let mut sink = FfmpegSink::new(FfmpegSinkOpts {
        overwrite: cfg.overwrite,
        ..FfmpegSinkOpts::new(cfg.output_path())
    });
    let stats = assemble(&seq, cfg, &mut sink)?;

    tracing::info!(
        frames = stats.frames_written,
        skipped = stats.frames_skipped,
        blank = stats.frames_blank,
        clipped = stats.frames_clipped,
        malformed = stats.malformed,
        excluded = stats.excluded,
        "time-lapse assembled"
    );
    Ok(stats)
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/assemble.rs"]
mod tests;
