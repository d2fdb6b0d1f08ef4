//! Codec Configuration
//!
//! Settings resolved in three layers: built-in defaults, then environment
//! variables, then explicit overrides (CLI flags). The codec itself is
//! stateless; these settings only shape how buffers are presented and how
//! much gets logged.

use std::collections::HashMap;

use super::hex::HexFormat;
use super::logging::{set_log_level, LogLevel};
use crate::error::AbiResult;

/// Environment variable selecting the log level
pub const ENV_LOG_LEVEL: &str = "HAWALA_ABI_LOG";

/// Environment variable selecting the hex prefix convention
pub const ENV_HEX_PREFIX: &str = "HAWALA_ABI_HEX_PREFIX";

/// Codec presentation settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CodecConfig {
    /// How byte buffers are rendered on output
    pub hex: HexFormat,
    /// Minimum level written to stderr
    pub log_level: LogLevel,
}

impl CodecConfig {
    /// Defaults overridden by the process environment
    pub fn from_env() -> AbiResult<Self> {
        let vars: HashMap<String, String> = std::env::vars()
            .filter(|(k, _)| k == ENV_LOG_LEVEL || k == ENV_HEX_PREFIX)
            .collect();
        Self::default().with_vars(&vars)
    }

    /// Apply overrides from a variable map; unknown values are rejected
    pub fn with_vars(mut self, vars: &HashMap<String, String>) -> AbiResult<Self> {
        if let Some(level) = vars.get(ENV_LOG_LEVEL) {
            self.log_level = level.parse()?;
        }
        if let Some(prefix) = vars.get(ENV_HEX_PREFIX) {
            self.hex = prefix.parse()?;
        }
        Ok(self)
    }

    pub fn with_hex(mut self, hex: HexFormat) -> Self {
        self.hex = hex;
        self
    }

    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    /// Install the log level process-wide
    pub fn apply(&self) {
        set_log_level(self.log_level);
    }
}
