use std::path::PathBuf;

/// Dayof invite service
#[derive(Debug, argh::FromArgs)]
pub struct CliOptions {
    /// print version information and exit
    #[argh(switch, short = 'V')]
    pub version: bool,

    /// logging level (0 = Info, 1 = Debug, 2 = Trace) [env DAYOF_VERBOSE]
    #[argh(option, short = 'v')]
    pub verbose: Option<u8>,

    /// path to a TOML or JSON config file, environment variables override its values
    #[argh(option, short = 'c')]
    pub config: Option<PathBuf>,
}

impl CliOptions {
    pub fn parse() -> Result<Self, anyhow::Error> {
        let mut args: CliOptions = argh::from_env();

        if args.version {
            println!("Dayof {}", env!("CARGO_PKG_VERSION"));
            std::process::exit(0);
        }

        if args.verbose.is_none() {
            if let Ok(verbose) = std::env::var("DAYOF_VERBOSE") {
                args.verbose = verbose.parse().ok();
            }
        }

        Ok(args)
    }
}
