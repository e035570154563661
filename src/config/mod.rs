pub mod cli;
pub mod toml_config;

pub use toml_config::BookingConfig;

#[cfg(feature = "cli")]
use clap::Parser;

/// Command line flags. Anything given here overrides the TOML file.
#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "club-booking")]
#[command(about = "Book competition places for clubs against their points")]
pub struct CliConfig {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "booking.toml")]
    pub config: String,

    #[arg(long)]
    pub host: Option<String>,

    #[arg(long)]
    pub port: Option<u16>,

    /// Directory holding clubs.json and competitions.json
    #[arg(long)]
    pub data_dir: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn apply_overrides(&self, config: &mut BookingConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(dir) = &self.data_dir {
            config.data.directory = dir.clone();
        }
        config.logging.verbose |= self.verbose;
        config.logging.json |= self.json_logs;
    }
}
