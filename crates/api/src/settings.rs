//! Server settings

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

/// Runtime settings, overridable through `DROWSY_`-prefixed environment
/// variables (e.g. `DROWSY_BIND_ADDR=127.0.0.1:9000`).
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Socket address the server binds to
    pub bind_addr: String,

    /// Directory session snapshots are written to and served from
    pub snapshot_dir: String,

    /// Allowed browser origin; unset permits any origin
    #[serde(default)]
    pub cors_origin: Option<String>,

    /// TrueType font used for the stream overlay text
    pub overlay_font: String,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("bind_addr", "0.0.0.0:8000")?
            .set_default("snapshot_dir", "snapshots")?
            .set_default("overlay_font", "assets/overlay.ttf")?
            .add_source(Environment::with_prefix("DROWSY"))
            .build()?
            .try_deserialize()
    }
}
