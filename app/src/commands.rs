use clap::{App, Arg};

/// Avaliable command line arguments
pub enum CliArg {
    Config,
    Frames,
    Generate,
    Json,
    MacsecWrap,
}

impl CliArg {
    pub fn as_str(&self) -> &str {
        match self {
            &CliArg::Config => "config",
            &CliArg::Frames => "frames",
            &CliArg::Generate => "generate",
            &CliArg::Json => "json",
            &CliArg::MacsecWrap => "macsec-wrap",
        }
    }
}

/// Construct a new clap root command
pub fn new_root_command<'a>() -> clap::App<'a, 'static> {
    App::new(crate_name!())
        .version(crate_version!())
        .about("Layered network header decoder with sequence loss tracking")
        .args(&[
            Arg::with_name(CliArg::Config.as_str())
                .short("c")
                .value_name("FILE")
                .help("Use a specific config file")
                .takes_value(true),
            Arg::with_name(CliArg::Generate.as_str())
                .short("g")
                .long("generate")
                .value_name("DIR")
                .help("Write sample frame files into DIR and exit")
                .takes_value(true),
            Arg::with_name(CliArg::Json.as_str())
                .long("json")
                .help("Print decode results as JSON instead of text"),
            Arg::with_name(CliArg::MacsecWrap.as_str())
                .long("macsec-wrap")
                .value_name("POLICY")
                .possible_values(&["strict", "modulo16"])
                .help("MACsec packet number wraparound policy")
                .takes_value(true),
            Arg::with_name(CliArg::Frames.as_str())
                .value_name("FRAME-FILE")
                .help("Raw frame file(s) to decode, in capture order")
                .multiple(true),
        ])
}
