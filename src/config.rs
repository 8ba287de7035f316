use std::time::Duration;
use clap::Parser;
use crate::postal::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};

/// Look up Indian post offices by 6-digit pincode
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Settings {
    /// pincode to look up; starts the interactive prompt when omitted
    pub pincode: Option<String>,

    /// only show post offices whose name contains this text
    #[arg(long, default_value = "")]
    pub filter: String,

    /// base URL of the postal pincode service
    #[arg(long, env = "PINCODE_API_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// give up on a request after this many seconds
    #[arg(long, env = "PINCODE_API_TIMEOUT", default_value_t = DEFAULT_TIMEOUT.as_secs(), value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: u64,

    /// print the records as JSON instead of cards (one-shot mode only)
    #[arg(long)]
    pub json: bool,
}

impl Settings {
    /// the positional pincode without surrounding whitespace
    pub fn pincode(&self) -> Option<&str> {
        self.pincode.as_deref().map(str::trim)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
