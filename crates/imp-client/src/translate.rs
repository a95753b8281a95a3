//! Recognizes known backend error phrases so they can be shown as localized
//! messages.
//!
//! Lookup is an exact match first, then a case-insensitive substring match
//! in table order. Anything unrecognized is shown as the raw text.

use std::fmt;

/// Message keys for recognized backend errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKey {
    ExternalIdExists,
    EmailExists,
    InvalidEmail,
    PhoneExists,
    InvalidPhone,
    RequiredField,
    DuplicateRecord,
    ValidationError,
    NetworkError,
    ServerError,
    TimeoutError,
    FileNotFound,
    InvalidFileType,
    FileTooLarge,
    ImportFailed,
    ExportFailed,
    PermissionDenied,
    Unauthorized,
    Forbidden,
    AtLeastOneFieldRequired,
}

impl ErrorKey {
    /// Key in the `errors.*` message namespace.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKey::ExternalIdExists => "externalIdExists",
            ErrorKey::EmailExists => "emailExists",
            ErrorKey::InvalidEmail => "invalidEmail",
            ErrorKey::PhoneExists => "phoneExists",
            ErrorKey::InvalidPhone => "invalidPhone",
            ErrorKey::RequiredField => "requiredField",
            ErrorKey::DuplicateRecord => "duplicateRecord",
            ErrorKey::ValidationError => "validationError",
            ErrorKey::NetworkError => "networkError",
            ErrorKey::ServerError => "serverError",
            ErrorKey::TimeoutError => "timeoutError",
            ErrorKey::FileNotFound => "fileNotFound",
            ErrorKey::InvalidFileType => "invalidFileType",
            ErrorKey::FileTooLarge => "fileTooLarge",
            ErrorKey::ImportFailed => "importFailed",
            ErrorKey::ExportFailed => "exportFailed",
            ErrorKey::PermissionDenied => "permissionDenied",
            ErrorKey::Unauthorized => "unauthorized",
            ErrorKey::Forbidden => "forbidden",
            ErrorKey::AtLeastOneFieldRequired => "atLeastOneFieldRequired",
        }
    }
}

impl fmt::Display for ErrorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "errors.{}", self.as_str())
    }
}

const PHRASES: &[(&str, ErrorKey)] = &[
    ("External ID already exists", ErrorKey::ExternalIdExists),
    ("Email already exists", ErrorKey::EmailExists),
    ("Email address already exists", ErrorKey::EmailExists),
    ("Invalid email address", ErrorKey::InvalidEmail),
    ("Phone already exists", ErrorKey::PhoneExists),
    ("Phone number already exists", ErrorKey::PhoneExists),
    ("Invalid phone number", ErrorKey::InvalidPhone),
    ("Required field missing", ErrorKey::RequiredField),
    ("Field is required", ErrorKey::RequiredField),
    ("Duplicate record", ErrorKey::DuplicateRecord),
    ("Record already exists", ErrorKey::DuplicateRecord),
    ("Validation error", ErrorKey::ValidationError),
    ("Validation failed", ErrorKey::ValidationError),
    ("Network error", ErrorKey::NetworkError),
    ("Connection failed", ErrorKey::NetworkError),
    ("Server error", ErrorKey::ServerError),
    ("Internal server error", ErrorKey::ServerError),
    ("Request timeout", ErrorKey::TimeoutError),
    ("Timeout", ErrorKey::TimeoutError),
    ("File not found", ErrorKey::FileNotFound),
    ("Invalid file type", ErrorKey::InvalidFileType),
    ("File too large", ErrorKey::FileTooLarge),
    ("Import failed", ErrorKey::ImportFailed),
    ("Export failed", ErrorKey::ExportFailed),
    ("Permission denied", ErrorKey::PermissionDenied),
    ("Unauthorized", ErrorKey::Unauthorized),
    ("Forbidden", ErrorKey::Forbidden),
    (
        "At least one of these fields is required",
        ErrorKey::AtLeastOneFieldRequired,
    ),
    ("At least one field is required", ErrorKey::AtLeastOneFieldRequired),
];

/// Field list substituted into the "at least one field" message.
pub const IDENTIFYING_FIELDS: &str = "firstName, externalId, email, or phone";

/// A backend error matched to a message key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedError {
    pub key: ErrorKey,
    /// Text after the first `:`, trimmed (`"EXT008"` in
    /// `"External ID already exists: EXT008"`). Empty when absent.
    pub value: String,
    /// Field list for [`ErrorKey::AtLeastOneFieldRequired`], else empty.
    pub fields: String,
}

/// Matches a backend error message against the phrase table.
pub fn match_error(message: &str) -> Option<MatchedError> {
    let trimmed = message.trim();
    if trimmed.is_empty() {
        return None;
    }

    let key = exact_key(trimmed).or_else(|| partial_key(trimmed))?;
    Some(MatchedError {
        key,
        value: extract_value(trimmed),
        fields: if trimmed.contains("At least one of these fields is required") {
            IDENTIFYING_FIELDS.to_string()
        } else {
            String::new()
        },
    })
}

/// Whether [`match_error`] recognizes the message.
pub fn is_translatable(message: &str) -> bool {
    match_error(message).is_some()
}

fn exact_key(message: &str) -> Option<ErrorKey> {
    let without_colon = message.strip_suffix(':').unwrap_or(message);
    PHRASES
        .iter()
        .find(|(phrase, _)| phrase.eq_ignore_ascii_case(without_colon))
        .map(|(_, key)| *key)
}

fn partial_key(message: &str) -> Option<ErrorKey> {
    let lowered = message.to_lowercase();
    PHRASES
        .iter()
        .find(|(phrase, _)| lowered.contains(&phrase.to_lowercase()))
        .map(|(_, key)| *key)
}

fn extract_value(message: &str) -> String {
    message
        .split(':')
        .nth(1)
        .map(|part| part.trim().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        let matched = match_error("Email already exists").unwrap();
        assert_eq!(matched.key, ErrorKey::EmailExists);
        assert_eq!(matched.value, "");
    }

    #[test]
    fn test_value_extraction() {
        let matched = match_error("External ID already exists: EXT008").unwrap();
        assert_eq!(matched.key, ErrorKey::ExternalIdExists);
        assert_eq!(matched.value, "EXT008");
    }

    #[test]
    fn test_partial_match_is_case_insensitive() {
        let matched = match_error("Row 4: VALIDATION FAILED for column Phone").unwrap();
        assert_eq!(matched.key, ErrorKey::ValidationError);
        assert_eq!(matched.value, "VALIDATION FAILED for column Phone");

        let matched = match_error("upstream timeout after 30s").unwrap();
        assert_eq!(matched.key, ErrorKey::TimeoutError);
    }

    #[test]
    fn test_email_address_phrase() {
        let matched = match_error("Email address already exists: a@b.co").unwrap();
        assert_eq!(matched.key, ErrorKey::EmailExists);
        assert_eq!(matched.value, "a@b.co");
    }

    #[test]
    fn test_fields_list() {
        let matched =
            match_error("At least one of these fields is required: firstName, externalId")
                .unwrap();
        assert_eq!(matched.key, ErrorKey::AtLeastOneFieldRequired);
        assert_eq!(matched.fields, IDENTIFYING_FIELDS);

        let matched = match_error("at least one field is required").unwrap();
        assert_eq!(matched.fields, "");
    }

    #[test]
    fn test_unrecognized_and_empty() {
        assert!(match_error("Something odd happened").is_none());
        assert!(match_error("   ").is_none());
        assert!(!is_translatable(""));
        assert!(is_translatable("forbidden"));
    }

    #[test]
    fn test_key_display() {
        assert_eq!(ErrorKey::FileTooLarge.to_string(), "errors.fileTooLarge");
    }
}
