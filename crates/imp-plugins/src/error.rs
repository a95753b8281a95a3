//! Error types for the plugin registry.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PluginError {
    /// Plugin `initialize()` hook failed; the plugin was not registered.
    #[error("plugin '{plugin}' failed to initialize: {message}")]
    Initialization { plugin: String, message: String },

    /// Plugin `teardown()` hook failed.
    #[error("plugin '{plugin}' failed to tear down: {message}")]
    Teardown { plugin: String, message: String },

    /// Name not present in the plugin factory.
    #[error("unknown plugin: {0}")]
    UnknownPlugin(String),

    /// External plugin list could not be obtained.
    #[error("plugin discovery failed: {0}")]
    Discovery(String),
}

pub type Result<T> = std::result::Result<T, PluginError>;
