#[macro_use]
extern crate clap;

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::Serialize;

use vidocq_api as api;
use vidocq_utils as utils;

use api::headers::Header;
use utils::dissectors::{DecodeResult, FrameDecoder};
use utils::tracker::{FlowKey, GapReport, SequenceTracker};

mod commands;
mod config;
mod display;
mod generate;

/// One sequence counter observation fed to the tracker while decoding
#[derive(Serialize)]
pub struct FlowObservation {
    pub key: FlowKey,
    pub counter: u64,
    pub report: GapReport,
}

fn main() -> Result<()> {
    let root_cmd = commands::new_root_command();
    let cfg = config::parse_args(root_cmd)?;

    if let Some(dir) = &cfg.generate {
        return generate::write_samples(Path::new(dir));
    }

    if cfg.frames.is_empty() {
        return Err(anyhow!(
            "No frame files given, try `vidocq -g samples && vidocq samples/*.bin`"
        ));
    }

    let decoder = FrameDecoder::new();
    // one tracker for the whole run so loss shows up across files
    let tracker = SequenceTracker::new(cfg.wrap_policy());

    for path in &cfg.frames {
        let frame = fs::read(path).with_context(|| format!("Could not read \"{}\"", path))?;
        let result = decoder.decode(&frame);
        let gaps = observe_counters(&result, &tracker);

        if cfg.json {
            display::render_json(path, &result, &gaps)?;
        } else {
            display::render_text(path, frame.len(), &result, &gaps);
        }
    }

    Ok(())
}

/// Feed every loss-relevant counter in the decode result to the tracker
fn observe_counters(result: &DecodeResult, tracker: &SequenceTracker) -> Vec<FlowObservation> {
    let mut observations = Vec::new();
    for header in &result.headers {
        let (key, counter) = match header {
            Header::Esp(esp) => (FlowKey::Esp { spi: esp.spi }, esp.sequence as u64),
            Header::Macsec(tag) => (
                FlowKey::Macsec { an: tag.an },
                tag.packet_number as u64,
            ),
            _ => continue,
        };
        observations.push(FlowObservation {
            key,
            counter,
            report: tracker.observe(key, counter),
        });
    }
    observations
}
