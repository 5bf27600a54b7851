use anyhow::{bail, Context, Result};
use clap::Parser;
use dotenvy::dotenv;
use landmark_track::skeletons::DebugSkeletons;
use landmark_track::track::FramePresence;
use landmark_track::writer::TrackWriter;
use landmark_track::{Group, Presence, TrackDecoder, TrackPlayer};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Parser)]
#[command(version, about = "Step through a recorded landmark track and report each frame")]
struct Args {
    /// Track file to read (headerless little-endian f32 frames)
    #[arg(long, short = 'i', env = "TRACK_FILE")]
    input: PathBuf,

    /// First frame to report
    #[arg(long, default_value_t = 0)]
    frame: usize,

    /// Number of frames to step through; defaults to the rest of the track
    #[arg(long)]
    count: Option<usize>,

    /// Print world-space body skeleton points for each frame
    #[arg(long, default_value_t = false)]
    dump: bool,

    /// Emit one JSON object per frame instead of text
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Write the visited frames to a new track file
    #[arg(long)]
    export: Option<PathBuf>,
}

#[derive(Serialize)]
struct FrameReport<'a> {
    frame: usize,
    presence: FramePresence,
    #[serde(skip_serializing_if = "Option::is_none")]
    body: Option<&'a [f32]>,
}

fn label(p: Presence) -> &'static str {
    match p {
        Presence::Detected => "detected",
        Presence::Missing => "missing",
    }
}

fn report<W: Write>(out: &mut W, player: &mut TrackPlayer<DebugSkeletons>, args: &Args) -> Result<()> {
    let Some(presence) = player.presence() else { return Ok(()) };
    let frame = player.position();
    let body = player.sink().body.points().as_slice();
    if args.json {
        let r = FrameReport { frame, presence, body: args.dump.then_some(body) };
        serde_json::to_writer(&mut *out, &r)?;
        writeln!(out)?;
    } else {
        let groups = Group::ALL
            .iter()
            .map(|&g| format!("{}={}", g.name(), label(presence.get(g))))
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(out, "frame {:>6}: {}", frame, groups)?;
        if args.dump {
            for (i, p) in body.chunks_exact(3).enumerate() {
                writeln!(out, "  {:>2}: {:>9.4} {:>9.4} {:>9.4}", i, p[0], p[1], p[2])?;
            }
        }
    }
    // stands in for the renderer consuming the buffers
    player.sink_mut().mark_clean();
    Ok(())
}

fn main() -> Result<()> {
    // Load environment variables from .env if present
    let _ = dotenv();
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::builder().with_default_directive(LevelFilter::INFO.into()).from_env_lossy())
        .init();
    let args = Args::parse();

    let track = TrackDecoder::default()
        .decode_file(&args.input)
        .with_context(|| format!("open {:?}", args.input))?;
    info!(frames = track.len(), "loaded {:?}", args.input);
    if track.is_empty() {
        warn!("track holds no whole frames");
        return Ok(());
    }
    if args.frame >= track.len() {
        bail!("--frame {} out of range (track has {} frames)", args.frame, track.len());
    }
    if args.count == Some(0) {
        bail!("--count must be at least 1");
    }
    let end = match args.count {
        Some(n) => args.frame.saturating_add(n).min(track.len()),
        None => track.len(),
    };
    let layout = track.layout().clone();

    let mut player = TrackPlayer::new(DebugSkeletons::new());
    player.load_track(track)?;
    if args.frame != 0 {
        player.seek(args.frame)?;
    }

    let mut export = match &args.export {
        Some(p) => {
            let f = File::create(p).with_context(|| format!("create {:?}", p))?;
            Some(TrackWriter::new(BufWriter::new(f), layout))
        }
        None => None,
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    loop {
        report(&mut out, &mut player, &args)?;
        if let (Some(w), Some(f)) = (export.as_mut(), player.current_frame()) {
            w.write_frame(&f)?;
        }
        if player.position() + 1 >= end {
            break;
        }
        player.advance()?;
    }
    out.flush()?;

    if let Some(w) = export {
        let n = w.frames_written();
        w.finish()?;
        info!(frames = n, "exported {:?}", args.export.unwrap_or_default());
    }
    Ok(())
}
