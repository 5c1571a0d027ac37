//! Server configuration from command line arguments, with environment
//! variable fallbacks.

use std::path::PathBuf;

use clap::Parser;
use multinomial::simulation::verification::MAX_SIMULATIONS;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct ServerConfig {
    /// Address to bind
    #[arg(long, env = "MULTINOMIAL_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "MULTINOMIAL_PORT", default_value_t = 8000)]
    pub port: u16,

    /// Random seed; requests draw from generators forked off one seeded root
    #[arg(long, env = "MULTINOMIAL_SEED")]
    pub seed: Option<u64>,

    /// Wall-clock budget for one verification, in milliseconds
    #[arg(long, env = "MULTINOMIAL_DEADLINE_MS")]
    pub deadline_ms: Option<i64>,

    /// Upper bound on simulated experiments per verification
    #[arg(long, env = "MULTINOMIAL_MAX_SIMULATIONS", default_value_t = MAX_SIMULATIONS)]
    pub max_simulations: u64,

    /// Directory of static frontend files served at `/`
    #[arg(long, env = "MULTINOMIAL_STATIC_DIR", value_name = "DIR")]
    pub static_dir: Option<PathBuf>,
}

impl ServerConfig {
    pub fn deadline(&self) -> Option<chrono::Duration> {
        self.deadline_ms.map(chrono::Duration::milliseconds)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            seed: None,
            deadline_ms: None,
            max_simulations: MAX_SIMULATIONS,
            static_dir: None,
        }
    }
}
