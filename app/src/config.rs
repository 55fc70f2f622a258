use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{anyhow, Result};
use yaml_rust::YamlLoader;

use vidocq_utils as utils;

use utils::tracker::WrapPolicy;

use super::commands::CliArg;

#[derive(Default)]
pub struct Config {
    /// Config file path
    pub fpath: String,
    /// Render decode results as JSON
    pub json: bool,
    /// MACsec packet number wraparound policy
    pub wrap: Option<WrapPolicy>,
    /// Frame files to decode, in capture order
    pub frames: Vec<String>,
    /// Sample output directory, generate-and-exit mode
    pub generate: Option<String>,
}

impl Config {
    pub fn wrap_policy(&self) -> WrapPolicy {
        self.wrap.unwrap_or_default()
    }
}

/// Parse command line arguments and set configuration
pub fn parse_args(root_cmd: clap::App) -> Result<Config> {
    let mut config: Config = Default::default();
    let matches = root_cmd.get_matches();

    if let Some(config_file) = matches.value_of(CliArg::Config.as_str()) {
        config.fpath = config_file.to_string();
        parse_config_file(config_file, &mut config)?;
    }

    // CLI flags win over the config file
    if matches.is_present(CliArg::Json.as_str()) {
        config.json = true;
    }
    if let Some(policy) = matches.value_of(CliArg::MacsecWrap.as_str()) {
        config.wrap = Some(parse_wrap_policy(policy)?);
    }
    config.generate = matches
        .value_of(CliArg::Generate.as_str())
        .map(|s| s.to_string());
    if let Some(frames) = matches.values_of(CliArg::Frames.as_str()) {
        config.frames = frames.map(|s| s.to_string()).collect();
    }

    Ok(config)
}

fn parse_config_file(config_file: &str, config: &mut Config) -> Result<()> {
    let cfg_path = Path::new(config_file);
    if !cfg_path.exists() {
        return Err(anyhow!("Config file \"{}\" does not exist", config_file));
    }

    let mut s = String::new();
    File::open(cfg_path)?.read_to_string(&mut s)?;

    let docs = YamlLoader::load_from_str(&s)?;
    let doc = &docs[0];

    if let Some(policy) = doc["tracker"]["macsec-wrap"].as_str() {
        config.wrap = Some(parse_wrap_policy(policy)?);
    }
    if let Some(json) = doc["output"]["json"].as_bool() {
        config.json = json;
    }

    Ok(())
}

fn parse_wrap_policy(name: &str) -> Result<WrapPolicy> {
    match name {
        "strict" => Ok(WrapPolicy::Strict),
        "modulo16" => Ok(WrapPolicy::Modulo16),
        other => Err(anyhow!("Unknown macsec wrap policy \"{}\"", other)),
    }
}
