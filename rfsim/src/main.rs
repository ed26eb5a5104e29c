mod options;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use log::debug;
use options::{Cli, Command as CliCmd};
use propah::{
    intermod, Component, FilterPreset, HeatmapRequest, InterferenceRequest, Kind, LosRequest,
    RejectionCurve, Tone,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::{
    io::{Read, Write},
    path::Path,
};
use terrain::{BatchedElevation, FlatTerrain};

fn main() -> Result<()> {
    let Cli {
        pretty,
        batch_size,
        cmd,
    } = Cli::parse();

    env_logger::init();

    let elevation = BatchedElevation::new(FlatTerrain).batch_size(batch_size);

    match cmd {
        CliCmd::Los(args) => {
            let request: LosRequest = read_json(&args.input)?;
            print_json(&request.analyze(&elevation)?, pretty)
        }
        CliCmd::Interference(args) => {
            let mut request = interference_request(read_json(&args.input)?, args.receiver)?;
            if let Some(preset) = args.filter {
                request.filter = preset.curve();
            }
            print_json(&request.analyze(), pretty)
        }
        CliCmd::Heatmap(args) => {
            let mut request: HeatmapRequest = read_json(&args.input)?;
            if let Some(preset) = args.filter {
                request.filter = preset.curve();
            }
            print_json(&request.sample(), pretty)
        }
        CliCmd::Intermod(args) => {
            let components: Vec<Component> = read_json(&args.input)?;
            let tones: Vec<Tone> = components
                .iter()
                .filter_map(Component::emitter)
                .map(Tone::from)
                .collect();
            print_json(&intermod::products(&tones, args.max_order), pretty)
        }
        CliCmd::Presets => print_json(&presets(), pretty),
    }
}

/// Reads `path`, or stdin when `path` is `-`, as JSON.
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let mut buf = String::new();
    if path == Path::new("-") {
        std::io::stdin().lock().read_to_string(&mut buf)?;
    } else {
        buf = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
    }
    serde_json::from_str(&buf).with_context(|| format!("parsing {}", path.display()))
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    if pretty {
        serde_json::to_writer_pretty(&mut stdout, value)?;
    } else {
        serde_json::to_writer(&mut stdout, value)?;
    }
    writeln!(stdout)?;
    Ok(())
}

/// Accepts either a full interference request or a bare list of
/// components, in which case `receiver` (or the first receiver-kind
/// component) listens and everything else transmits.
fn interference_request(input: Value, receiver: Option<String>) -> Result<InterferenceRequest> {
    if !input.is_array() {
        return Ok(serde_json::from_value(input)?);
    }

    let mut transmitters: Vec<Component> = serde_json::from_value(input)?;
    let idx = match receiver.as_deref() {
        Some(id) => transmitters
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| anyhow!("no component with id '{id}'"))?,
        None => transmitters
            .iter()
            .position(|c| matches!(c.kind, Kind::Receiver))
            .ok_or_else(|| anyhow!("no receiver in component list, pass --receiver"))?,
    };
    let receiver = transmitters.remove(idx);
    debug!(
        "receiver: {}, transmitters: {}",
        receiver.id,
        transmitters.len()
    );
    Ok(InterferenceRequest::new(receiver, transmitters))
}

#[derive(Serialize)]
struct Preset {
    id: &'static str,
    label: &'static str,
    curve: RejectionCurve,
}

fn presets() -> Vec<Preset> {
    FilterPreset::ALL
        .into_iter()
        .map(|preset| Preset {
            id: preset.id(),
            label: preset.label(),
            curve: preset.curve(),
        })
        .collect()
}
