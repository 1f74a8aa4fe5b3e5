//! Google Drive API client for the metadata report.

use reqwest::{Client, Response};

use crate::auth::Authenticator;
use crate::error::{ReportError, Result};
use crate::models::{ApiErrorResponse, FileListResponse, FileRecord};

/// Base URL for Google Drive API v3.
const DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";

/// Fields requested for every file object.
const FILE_FIELDS: &str = "id, name, quotaBytesUsed, mimeType, parents, owners";

/// Client for the two metadata calls the report needs: a filtered
/// files.list and a files.get for parent-name resolution.
pub struct DriveClient {
    auth: Authenticator,
    http: Client,
    base_url: String,
}

impl DriveClient {
    /// Create a new DriveClient against the production API.
    pub fn new(auth: Authenticator) -> Self {
        Self::with_base_url(auth, DRIVE_API_BASE)
    }

    /// Create a client against an alternate base URL (used by tests).
    pub fn with_base_url(auth: Authenticator, base_url: impl Into<String>) -> Self {
        Self {
            auth,
            http: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Build an independent client handle over the same session.
    ///
    /// The authenticator (and its token cache) is shared; the HTTP
    /// client is fresh, so callers get no shared mutable state.
    pub fn detached(&self) -> DriveClient {
        DriveClient::with_base_url(self.auth.clone(), self.base_url.clone())
    }

    /// Issue the primary fetch: one files.list call with a page-size
    /// limit, an ordering key, and a query-language filter.
    ///
    /// Only the single page implied by `limit` is fetched.
    pub async fn list_files(
        &self,
        limit: u32,
        order_by: &str,
        query: &str,
    ) -> Result<Vec<FileRecord>> {
        let token = self.auth.get_access_token().await?;
        let page_size = limit.to_string();
        let fields = format!("files({})", FILE_FIELDS);

        let response = self
            .http
            .get(format!("{}/files", self.base_url))
            .bearer_auth(&token)
            .query(&[
                ("pageSize", page_size.as_str()),
                ("orderBy", order_by),
                ("q", query),
                ("fields", fields.as_str()),
            ])
            .send()
            .await?;

        let response = check_status(response).await?;
        let list_response: FileListResponse = response.json().await?;
        Ok(list_response.files)
    }

    /// Get a single file's metadata by ID.
    pub async fn get_file(&self, file_id: &str) -> Result<FileRecord> {
        let token = self.auth.get_access_token().await?;

        let response = self
            .http
            .get(format!("{}/files/{}", self.base_url, file_id))
            .bearer_auth(&token)
            .query(&[("fields", FILE_FIELDS)])
            .send()
            .await?;

        let response = check_status(response).await?;
        let record: FileRecord = response.json().await?;
        Ok(record)
    }
}

/// Map a non-2xx response into `ReportError::ApiError`, preferring
/// Google's structured error envelope over the raw body.
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let error_body = response.text().await.unwrap_or_default();
    if let Ok(api_error) = serde_json::from_str::<ApiErrorResponse>(&error_body) {
        return Err(ReportError::ApiError {
            status: api_error.error.code,
            message: api_error.error.message,
        });
    }
    Err(ReportError::ApiError {
        status: status.as_u16(),
        message: error_body,
    })
}
