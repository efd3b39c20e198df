//! Engine-level error type.

use std::error::Error;
use std::fmt;

use crate::config::ConfigError;

/// Errors returned by [`OverlayEngine`](crate::OverlayEngine) and the
/// strategy registry.
#[derive(Clone, Debug, PartialEq)]
pub enum EngineError {
    /// The configuration failed validation.
    Config(ConfigError),
    /// No strategy is registered under the requested ruleset id.
    UnknownRuleset {
        /// The id that was requested.
        id: String,
    },
    /// Every [`EventSender`](crate::EventSender) and the engine's own
    /// handle were dropped.
    IngressDisconnected,
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::UnknownRuleset { id } => write!(f, "no range strategy registered for ruleset '{id}'"),
            Self::IngressDisconnected => write!(f, "event ingress disconnected"),
        }
    }
}

impl Error for EngineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for EngineError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}
