//! aerosonic: host stand-in for the flight soundscape
//!
//! Replays recorded flight telemetry through the soundscape controller and
//! renders what the vehicle would sound like.

mod config;
mod error;
mod replay;
mod trace;

use std::path::PathBuf;

use aerosonic_core::{
    AeroFxSettings, Classification, FrameTelemetry, PhysicalState, SoundscapeClassifier, ViewMode,
};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use replay::ReplaySettings;
use trace::FlightTrace;

#[derive(Parser)]
#[command(name = "aerosonic")]
#[command(about = "Flight soundscape simulator")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a JSON flight trace
    Run {
        /// Flight trace file
        #[arg(short, long)]
        trace: PathBuf,

        /// Settings file (defaults to the platform config directory)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write the rendered mix to this WAV file
        #[arg(short, long)]
        wav: Option<PathBuf>,

        /// Sample rate in Hz
        #[arg(short, long, default_value = "44100", value_parser = clap::value_parser!(u32).range(8_000..=192_000))]
        sample_rate: u32,

        /// Trace frames per second
        #[arg(short, long, default_value = "50", value_parser = clap::value_parser!(u32).range(1..))]
        fps: u32,
    },

    /// Classify a single flight state and print the result as JSON
    Classify {
        /// Atmospheric density in kg/m^3
        #[arg(short, long)]
        density: f32,

        #[arg(short, long)]
        mach: f32,

        /// Camera angle to the velocity vector in degrees
        #[arg(short, long)]
        angle: f32,

        /// Surface speed in m/s
        #[arg(short, long, default_value = "0")]
        speed: f32,

        /// Camera view (internal, iva, map, external, flight)
        #[arg(short, long, default_value = "external", value_parser = parse_view)]
        view: ViewMode,

        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Show or create the settings file
    Config {
        /// Write the default settings if no file exists yet
        #[arg(long)]
        init: bool,

        /// Print the effective settings
        #[arg(long)]
        show: bool,

        #[arg(short, long)]
        path: Option<PathBuf>,
    },
}

fn parse_view(s: &str) -> std::result::Result<ViewMode, String> {
    match s.to_ascii_lowercase().as_str() {
        "internal" => Ok(ViewMode::Internal),
        "iva" => Ok(ViewMode::Iva),
        "map" => Ok(ViewMode::Map),
        "external" => Ok(ViewMode::External),
        "flight" => Ok(ViewMode::Flight),
        other => Err(format!("unknown view mode: {other}")),
    }
}

#[derive(Serialize)]
struct ClassifyOutput {
    classification: Classification,
    aero_fx: AeroFxSettings,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("aerosonic=info".parse()?))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { trace, config, wav, sample_rate, fps } => {
            let config = config::load_config(&config.unwrap_or_else(config::config_path));
            let flight = FlightTrace::load(&trace)
                .with_context(|| format!("Failed to load flight trace {}", trace.display()))?;
            let settings = ReplaySettings { sample_rate, fps };

            let summary = replay::replay(&flight, config, settings);
            for transition in &summary.transitions {
                println!("{} -> {}", transition.from, transition.to);
            }
            println!("{} frames, final regime: {}", summary.frames, summary.final_regime);

            if let Some(path) = wav {
                replay::write_wav(&path, &summary.samples, sample_rate)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
            }
        }

        Commands::Classify { density, mach, angle, speed, view, config } => {
            let config = config::load_config(&config.unwrap_or_else(config::config_path));
            let frame = FrameTelemetry::new(view, PhysicalState::new(density, mach, angle, speed));
            let classifier = SoundscapeClassifier::new(config);
            let output = ClassifyOutput {
                classification: classifier.classify(&frame),
                aero_fx: AeroFxSettings::evaluate(frame.state.mach_number, frame.state.surface_speed, classifier.config()),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Commands::Config { init, show, path } => {
            let path = path.unwrap_or_else(config::config_path);
            if init && !path.exists() {
                config::save_config(&path, &Default::default())
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                println!("Created {}", path.display());
            }
            if show || !init {
                println!("# {}", path.display());
                for (key, value) in config::load_config(&path).settings() {
                    println!("{key} = {value}");
                }
            }
        }
    }

    Ok(())
}
