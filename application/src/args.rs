//! [`Args`] definitions.

use clap::Parser;

/// Back-office server of the hotel marketplace.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to the TOML configuration file.
    ///
    /// Missing file is fine: `CONF.*` environment variables and defaults
    /// are used then.
    #[arg(short, long, env = "CONF_PATH", default_value = "config.toml")]
    pub config: String,
}

impl Args {
    /// Parses command line arguments.
    ///
    /// # Errors
    ///
    /// Errors if failed to parse command line arguments.
    pub fn parse() -> Result<Self, clap::Error> {
        <Self as Parser>::try_parse()
    }
}

#[cfg(test)]
mod spec {
    use clap::Parser as _;

    use super::Args;

    #[test]
    fn config_path() {
        let args = Args::try_parse_from(["server", "-c", "prod.toml"]).unwrap();
        assert_eq!(args.config, "prod.toml");

        let args =
            Args::try_parse_from(["server", "--config", "dev.toml"]).unwrap();
        assert_eq!(args.config, "dev.toml");

        assert!(Args::try_parse_from(["server", "--unknown"]).is_err());
    }
}
