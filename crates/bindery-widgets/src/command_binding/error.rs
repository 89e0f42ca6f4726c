//! Errors raised while setting up a command binding.
//!
//! Resolution errors are raised synchronously from the bind call, before any
//! subscription is made or any enabled state is written. A property-path
//! binding that goes idle records its reason on the handle instead
//! ([`BindingHandle::rebind_error`](super::BindingHandle::rebind_error)).
//! A missing enabled property is not an error; enabled-state sync is skipped
//! for such targets.

/// Why a bind call could not produce a [`BindingHandle`](super::BindingHandle).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindError {
    /// No registered strategy scored the target type above zero.
    #[error("no compatible command binder for target type `{target_type}`")]
    NoCompatibleBinder { target_type: String },

    /// The requested event (or, for `"<default>"`, any default trigger) does
    /// not exist on the target type.
    #[error("event `{event}` not found on target type `{target_type}`")]
    EventNotFound { target_type: String, event: String },

    /// The view model's command property holds no command, so the
    /// property-path binding has nothing wired.
    #[error("command property `{property}` is empty, binding is idle")]
    CommandAbsent { property: String },
}

/// Failure to load a [`BinderConfig`](super::BinderConfig) policy file.
#[cfg(feature = "policy-config")]
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid binder config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let e = BindError::NoCompatibleBinder {
            target_type: "TextBlock".into(),
        };
        assert_eq!(
            e.to_string(),
            "no compatible command binder for target type `TextBlock`"
        );

        let e = BindError::EventNotFound {
            target_type: "Button".into(),
            event: "hover".into(),
        };
        assert_eq!(e.to_string(), "event `hover` not found on target type `Button`");

        let e = BindError::CommandAbsent {
            property: "save".into(),
        };
        assert_eq!(e.to_string(), "command property `save` is empty, binding is idle");
    }
}
