//! `dfplayer`: control a DFPlayer module from the command line.
//!
//! The module is reached through a TCP serial bridge (`--connect host:port`)
//! or replaced by the in-memory simulator (`--simulate`).

mod tcp;

use std::fmt::Display;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use dfplayer_driver::protocol::{EqPreset, MediaSource};
use dfplayer_driver::sim::SimulatedDevice;
use dfplayer_driver::{DfPlayer, DriverConfig, Transport};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::tcp::TcpTransport;

#[derive(Parser, Debug)]
#[command(name = "dfplayer")]
#[command(about = "Control a DFPlayer Mini audio module over a serial bridge")]
#[command(version)]
struct Args {
    /// Serial bridge address (host:port).
    #[arg(short, long, required_unless_present = "simulate")]
    connect: Option<String>,

    /// Use the built-in simulated module instead of real hardware.
    #[arg(long, conflicts_with = "connect")]
    simulate: bool,

    /// YAML driver configuration; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Media to select at startup (usb, sd, aux, sleep, flash).
    #[arg(long)]
    media: Option<MediaSource>,

    /// Initial volume in percent.
    #[arg(long)]
    volume: Option<u8>,

    /// Initial equalizer preset (normal, pop, rock, jazz, classic, bass).
    #[arg(long)]
    eq: Option<EqPreset>,

    /// Settle delay for generic commands, in milliseconds.
    #[arg(long)]
    latency_ms: Option<u64>,

    /// TCP connect timeout, in milliseconds.
    #[arg(long, default_value = "5000")]
    connect_timeout_ms: u64,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Print every status query.
    Info,
    /// Print playback status.
    Status,
    /// Play a track, a folder, a track in a folder, or resume.
    Play {
        #[arg(long)]
        folder: Option<u8>,
        #[arg(long)]
        track: Option<u16>,
    },
    /// Interrupt playback with an advert track (1-9999).
    Advert { track: u16 },
    /// Stop the advert and resume.
    StopAdvert,
    Pause,
    Stop,
    Next,
    Previous,
    /// Shuffle play.
    Random,
    /// Loop the current track.
    LoopTrack { state: Toggle },
    /// Loop every file on the media.
    LoopAll { state: Toggle },
    /// Loop every file in a folder.
    LoopFolder { folder: u8 },
    /// Print the volume, or set it in percent.
    Volume { percent: Option<u8> },
    VolumeUp,
    VolumeDown,
    /// Print the equalizer preset, or set it.
    Eq { preset: Option<EqPreset> },
    /// Select the playback media.
    Media { source: MediaSource },
    /// Count files in a folder or on a media.
    Files {
        #[arg(long, conflicts_with = "media")]
        folder: Option<u8>,
        #[arg(long)]
        media: Option<MediaSource>,
    },
    Standby,
    Wake,
    Reset,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Toggle {
    On,
    Off,
}

impl From<Toggle> for bool {
    fn from(toggle: Toggle) -> Self {
        matches!(toggle, Toggle::On)
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_target(false)
        .init();
}

fn load_config(args: &Args) -> Result<DriverConfig> {
    let mut config = match &args.config {
        Some(path) => DriverConfig::from_yaml_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => DriverConfig::default(),
    };
    if let Some(media) = args.media {
        config = config.with_media(media);
    }
    if let Some(volume) = args.volume {
        config = config.with_volume(volume);
    }
    if let Some(eq) = args.eq {
        config = config.with_eq(eq);
    }
    if let Some(ms) = args.latency_ms {
        config = config.with_latency(Duration::from_millis(ms));
    }
    Ok(config)
}

fn open_transport(args: &Args) -> Result<Box<dyn Transport>> {
    if args.simulate {
        let device = SimulatedDevice::new()
            .with_file_count(MediaSource::SdCard, 24)
            .with_file_count(MediaSource::UsbDisk, 8)
            .with_folder_file_count(1, 12)
            .with_folder_file_count(2, 12);
        return Ok(Box::new(device));
    }

    let addr = args
        .connect
        .as_deref()
        .context("either --connect or --simulate is required")?;
    let transport =
        TcpTransport::connect(addr, Duration::from_millis(args.connect_timeout_ms))
            .with_context(|| format!("connecting to {addr}"))?;
    Ok(Box::new(transport))
}

fn show<V: Display>(label: &str, value: Option<V>) {
    match value {
        Some(v) => println!("{label:<14} {v}"),
        None => println!("{label:<14} no response"),
    }
}

fn run(player: &mut DfPlayer<Box<dyn Transport>>, command: Cmd) -> Result<()> {
    match command {
        Cmd::Info => {
            show("status", player.status()?);
            show("mode", player.mode()?);
            show("firmware", player.firmware_version()?);
            show("volume", player.volume()?.map(|v| format!("{v}%")));
            show("eq", player.eq()?);
            show("current file", player.current_file()?);
            show("files", player.file_count(None)?);
        }
        Cmd::Status => show("status", player.status()?),
        Cmd::Play { folder, track } => match (folder, track) {
            (None, None) => player.resume()?,
            (None, Some(track)) => player.play_track(track)?,
            (Some(folder), None) => player.play_folder(folder)?,
            (Some(folder), Some(track)) => {
                let Ok(track) = u8::try_from(track) else {
                    bail!("track {track} out of range 0-255 when a folder is given");
                };
                player.play_folder_track(folder, track)?
            }
        },
        Cmd::Advert { track } => player.play_advert(track)?,
        Cmd::StopAdvert => player.stop_advert()?,
        Cmd::Pause => player.pause()?,
        Cmd::Stop => player.stop()?,
        Cmd::Next => player.next()?,
        Cmd::Previous => player.previous()?,
        Cmd::Random => player.random()?,
        Cmd::LoopTrack { state } => player.loop_track(state.into())?,
        Cmd::LoopAll { state } => player.loop_all(state.into())?,
        Cmd::LoopFolder { folder } => player.loop_folder(folder)?,
        Cmd::Volume { percent: Some(percent) } => player.set_volume(percent.into())?,
        Cmd::Volume { percent: None } => {
            show("volume", player.volume()?.map(|v| format!("{v}%")))
        }
        Cmd::VolumeUp => player.volume_up()?,
        Cmd::VolumeDown => player.volume_down()?,
        Cmd::Eq { preset: Some(preset) } => player.set_eq(preset)?,
        Cmd::Eq { preset: None } => show("eq", player.eq()?),
        Cmd::Media { source } => player.set_media(source)?,
        Cmd::Files {
            folder: Some(folder),
            ..
        } => show("files", player.folder_file_count(folder)?),
        Cmd::Files {
            folder: None,
            media,
        } => show("files", player.file_count(media)?),
        Cmd::Standby => player.standby()?,
        Cmd::Wake => player.wake()?,
        Cmd::Reset => player.reset()?,
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = load_config(&args)?;
    debug!(?config, "driver configuration");

    let transport = open_transport(&args)?;
    let mut player = DfPlayer::new(transport, &config).context("initializing module")?;

    run(&mut player, args.command)
}
