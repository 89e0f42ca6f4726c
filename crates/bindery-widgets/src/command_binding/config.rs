//! Binder policy.
//!
//! With the `policy-config` feature the policy can be loaded from TOML:
//!
//! ```toml
//! fallback_events = ["click", "mouse_up", "checked_changed"]
//! sync_enabled = true
//! ```
//!
//! Missing keys take their defaults.

use crate::controls::events;

/// Tunables shared by every binding a [`CommandBinder`](super::CommandBinder)
/// creates.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "policy-config", derive(serde::Deserialize))]
#[cfg_attr(feature = "policy-config", serde(default))]
pub struct BinderConfig {
    /// Event names tried, in order, when a target type declares no default
    /// trigger of its own.
    pub fallback_events: Vec<String>,
    /// Write can-execute into the target's enabled state when supported.
    pub sync_enabled: bool,
}

impl Default for BinderConfig {
    fn default() -> Self {
        Self {
            fallback_events: vec![events::CLICK.to_owned(), events::MOUSE_UP.to_owned()],
            sync_enabled: true,
        }
    }
}

impl BinderConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the fallback default-event list.
    #[must_use]
    pub fn with_fallback_events<I, S>(mut self, events: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fallback_events = events.into_iter().map(Into::into).collect();
        self
    }

    /// Turn enabled-state synchronization on or off.
    #[must_use]
    pub fn with_sync_enabled(mut self, sync_enabled: bool) -> Self {
        self.sync_enabled = sync_enabled;
        self
    }

    /// Parse a TOML policy document.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`](super::ConfigError::Parse) when the document is
    /// not valid TOML or has fields of the wrong type.
    #[cfg(feature = "policy-config")]
    pub fn from_toml_str(source: &str) -> Result<Self, super::ConfigError> {
        Ok(toml::from_str(source)?)
    }
}
