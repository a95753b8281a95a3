//! Library side of the import wizard CLI: the wizard state machine,
//! configuration, localization and terminal rendering.

pub mod config;
pub mod i18n;
pub mod logging;
pub mod settings;
pub mod store;
pub mod summary;
pub mod wizard;
