use std::time::Duration;

use clap::Parser;

/// Node configuration, read from flags, the environment or a `.env` file.
#[derive(Debug, Clone, Parser)]
#[command(name = "pow_ledger", about = "Proof-of-work ledger node")]
pub struct Config {
    /// Port to listen on.
    #[arg(short, long, env = "PORT", default_value_t = 5001)]
    pub port: u16,

    /// Interface to bind.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Give up on a peer's `/chain` after this many seconds.
    #[arg(long, env = "PEER_TIMEOUT_SECS", default_value_t = 10)]
    pub peer_timeout_secs: u64,
}

impl Config {
    pub fn peer_timeout(&self) -> Duration {
        Duration::from_secs(self.peer_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(["pow_ledger"]).unwrap();
        assert_eq!(config.peer_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn short_port_flag() {
        let config = Config::try_parse_from(["pow_ledger", "-p", "5002"]).unwrap();
        assert_eq!(config.port, 5002);
    }
}
