//! Mapping artifact files.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use imp_model::ExportPayload;

use crate::error::{MappingError, Result};

/// File name for an exported mapping: `mapping-{type}-{millis}.json`.
pub fn artifact_file_name(entity_type: &str, timestamp: DateTime<Utc>) -> String {
    format!("mapping-{entity_type}-{}.json", timestamp.timestamp_millis())
}

/// Writes `payload` as pretty JSON.
///
/// When `target` is a directory the file is named by [`artifact_file_name`].
/// Returns the written path.
pub fn write_artifact(payload: &ExportPayload, target: &Path) -> Result<PathBuf> {
    let path = if target.is_dir() {
        target.join(artifact_file_name(&payload.import_type, payload.timestamp))
    } else {
        target.to_path_buf()
    };

    let json = serde_json::to_string_pretty(payload)?;
    std::fs::write(&path, json).map_err(|e| MappingError::Write {
        path: path.clone(),
        source: e,
    })?;

    tracing::info!(path = %path.display(), mapped = payload.mapped_fields, "Mapping exported");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_artifact_file_name() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(artifact_file_name("User", ts), "mapping-User-1704067200000.json");
    }
}
