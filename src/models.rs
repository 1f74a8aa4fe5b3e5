//! Data models for Google Drive API responses.

use serde::{Deserialize, Serialize};

/// A file returned by the primary fetch, enriched with parent folder
/// names during the resolve phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_quota_bytes")]
    pub quota_bytes_used: u64,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub parents: Vec<String>,
    #[serde(default)]
    pub owners: Vec<Owner>,
    /// Resolved parent folder names, appended in parent-id order.
    #[serde(skip_deserializing, default)]
    pub parent_names: Vec<String>,
}

/// An owner entry on a file record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Owner {
    #[serde(default)]
    pub email_address: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

// The Drive API encodes quotaBytesUsed as a decimal string.
fn deserialize_quota_bytes<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt {
        Some(s) => s.parse::<u64>().map_err(serde::de::Error::custom),
        None => Ok(0),
    }
}

/// Response from the files.list API endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileListResponse {
    #[serde(default)]
    pub files: Vec<FileRecord>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// Google API error response.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    pub code: u16,
    pub message: String,
}

/// Service account credentials from JSON file.
#[derive(Debug, Deserialize)]
pub struct ServiceAccountCredentials {
    pub client_email: String,
    pub private_key: String,
    pub token_uri: Option<String>,
}

/// OAuth2 token response.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// On-disk token cache entry (the `token.json` format).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredToken {
    pub access_token: String,
    /// Absolute expiry as seconds since the unix epoch.
    pub expires_at: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_record_deserialize() {
        let json = r#"{
            "id": "abc123",
            "name": "report.pdf",
            "quotaBytesUsed": "2000000",
            "mimeType": "application/pdf",
            "parents": ["p1", "p2"],
            "owners": [{"emailAddress": "alice@x.com", "displayName": "Alice"}]
        }"#;

        let record: FileRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, "abc123");
        assert_eq!(record.quota_bytes_used, 2_000_000);
        assert_eq!(record.mime_type, Some("application/pdf".to_string()));
        assert_eq!(record.parents, vec!["p1", "p2"]);
        assert_eq!(record.owners.len(), 1);
        assert!(record.parent_names.is_empty());
    }

    #[test]
    fn test_file_record_missing_optional_fields() {
        let json = r#"{"id": "f1", "name": "orphan.txt"}"#;

        let record: FileRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.quota_bytes_used, 0);
        assert!(record.parents.is_empty());
        assert!(record.owners.is_empty());
        assert!(record.mime_type.is_none());
    }

    #[test]
    fn test_parent_names_not_taken_from_wire() {
        // parentNames is a local enrichment field, never trusted from the API.
        let json = r#"{"id": "f1", "name": "a", "parentNames": ["sneaky"]}"#;

        let record: FileRecord = serde_json::from_str(json).unwrap();
        assert!(record.parent_names.is_empty());
    }

    #[test]
    fn test_stored_token_roundtrip() {
        let token = StoredToken {
            access_token: "ya29.token".to_string(),
            expires_at: 1_900_000_000,
        };

        let json = serde_json::to_string(&token).unwrap();
        let back: StoredToken = serde_json::from_str(&json).unwrap();
        assert_eq!(back.access_token, "ya29.token");
        assert_eq!(back.expires_at, 1_900_000_000);
    }
}
