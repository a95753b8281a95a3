//! Remote collaborators of the import wizard.
//!
//! [`BackendClient`] talks to the import backend and implements
//! [`imp_map::TemplateStore`] over its template endpoints. [`TicketClient`]
//! files finished imports with the ticketing API. [`translate`] recognizes
//! backend error phrases for localized display.

pub mod backend;
pub mod error;
pub mod templates;
pub mod ticket;
pub mod translate;

pub use backend::{BackendClient, DEFAULT_BASE_URL, DEFAULT_TIMEOUT, RemoteEntityType, error_text};
pub use error::{ClientError, Result};
pub use templates::decode_template;
pub use ticket::{TicketClient, TicketConfig, attachment_file_name, ticket_descriptor};
pub use translate::{ErrorKey, MatchedError, is_translatable, match_error};
