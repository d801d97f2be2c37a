//! Google Drive sync client
//!
//! Exchanges stored OAuth credentials for an access token via an interactive
//! loopback consent flow, then uploads CSV snapshots to the configured Drive
//! folder. Remote failures surface as `SyncOutcome` values so a failed push
//! never blocks local usage; only configuration problems fail fast.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::time::{Duration, Instant};

use reqwest::blocking::Client;
use reqwest::Url;
use serde::Deserialize;

use crate::error::{HisabError, HisabResult};
use crate::models::{DriveConfig, DriveState};
use crate::storage::Storage;

const OAUTH_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const OAUTH_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const DRIVE_UPLOAD_URL: &str =
    "https://www.googleapis.com/upload/drive/v3/files?uploadType=multipart";
const DRIVE_SCOPE: &str = "https://www.googleapis.com/auth/drive.file";

/// Fixed wait budget for the interactive consent redirect
const CONNECT_WAIT_BUDGET: Duration = Duration::from_secs(120);
/// Per-request timeout for remote calls
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Best-effort result of a remote operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    pub success: bool,
    pub message: String,
}

impl SyncOutcome {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// In-progress consent flow: the caller shows `auth_url` to the user, then
/// hands the session back to `finish_connect`
pub struct ConnectSession {
    pub auth_url: String,
    listener: TcpListener,
    redirect_uri: String,
    state: String,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct UploadResponse {
    id: String,
}

/// Drive sync client over the stored configuration record
pub struct DriveClient<'a> {
    storage: &'a Storage,
}

impl<'a> DriveClient<'a> {
    /// Create a new Drive client
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Validate and persist credentials; resets any cached token
    pub fn configure(
        &self,
        client_id: &str,
        client_secret: &str,
        folder_id: &str,
    ) -> HisabResult<DriveConfig> {
        let config = DriveConfig::new(client_id, client_secret, folder_id)?;
        self.storage.drive.set(config.clone())?;
        self.storage.drive.save()?;
        Ok(config)
    }

    /// Current position in the state machine
    pub fn state(&self) -> HisabResult<DriveState> {
        Ok(self.storage.drive.get()?.state())
    }

    /// Start the interactive consent flow
    ///
    /// Fails fast if the configuration record is incomplete.
    pub fn begin_connect(&self) -> HisabResult<ConnectSession> {
        let config = self.storage.drive.get()?;
        config.validate()?;

        let listener = TcpListener::bind("127.0.0.1:0")
            .map_err(|e| HisabError::Sync(format!("Failed to bind loopback listener: {}", e)))?;
        let addr = listener
            .local_addr()
            .map_err(|e| HisabError::Sync(format!("Failed to read listener address: {}", e)))?;
        let redirect_uri = format!("http://{}", addr);
        let state = generate_state();
        let auth_url = build_auth_url(&config.client_id, &redirect_uri, &state)?;

        Ok(ConnectSession {
            auth_url,
            listener,
            redirect_uri,
            state,
        })
    }

    /// Wait for the consent redirect, exchange the code, cache the token
    ///
    /// Waits at most the fixed budget; on expiry the caller is told the
    /// consent never arrived.
    pub fn finish_connect(&self, session: ConnectSession) -> HisabResult<()> {
        let deadline = Instant::now() + CONNECT_WAIT_BUDGET;
        session
            .listener
            .set_nonblocking(true)
            .map_err(|e| HisabError::Sync(e.to_string()))?;

        let mut stream = loop {
            if Instant::now() >= deadline {
                return Err(HisabError::Sync(
                    "Timed out waiting for the consent redirect; try connecting again".into(),
                ));
            }
            match session.listener.accept() {
                Ok((stream, _addr)) => break stream,
                Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                    std::thread::sleep(Duration::from_millis(200));
                }
                Err(err) => return Err(HisabError::Sync(err.to_string())),
            }
        };

        let code = read_redirect_code(&mut stream, &session.state)?;

        let mut config = self.storage.drive.get()?;
        let token = exchange_code(&config, &code, &session.redirect_uri)?;
        config.set_token(token);
        self.storage.drive.set(config)?;
        self.storage.drive.save()?;
        Ok(())
    }

    /// Upload a CSV snapshot as a new file in the configured folder
    ///
    /// Remote failures are reported in the outcome, not propagated.
    pub fn push(&self, file_name: &str, csv_text: &str) -> HisabResult<SyncOutcome> {
        let config = self.storage.drive.get()?;
        config.validate()?;

        let token = config.access_token.as_deref().ok_or_else(|| {
            HisabError::Sync("Not connected to Drive; run `hisab drive connect` first".into())
        })?;

        let boundary = format!("hisab-{}", generate_state());
        let metadata = serde_json::json!({
            "name": file_name,
            "parents": [config.folder_id],
        });
        let body = build_multipart_body(&boundary, &metadata.to_string(), csv_text);

        let client = match Client::builder().timeout(REQUEST_TIMEOUT).build() {
            Ok(client) => client,
            Err(e) => return Ok(SyncOutcome::failed(format!("HTTP client error: {}", e))),
        };

        let response = client
            .post(DRIVE_UPLOAD_URL)
            .bearer_auth(token)
            .header(
                "Content-Type",
                format!("multipart/related; boundary={}", boundary),
            )
            .body(body)
            .send();

        let response = match response {
            Ok(response) => response,
            Err(e) => return Ok(SyncOutcome::failed(format!("Upload request failed: {}", e))),
        };

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Ok(SyncOutcome::failed(
                "Drive token expired or revoked; run `hisab drive connect` again",
            ));
        }
        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().unwrap_or_default();
            return Ok(SyncOutcome::failed(format!(
                "Drive upload failed ({}): {}",
                status,
                detail.trim()
            )));
        }

        match response.json::<UploadResponse>() {
            Ok(uploaded) => Ok(SyncOutcome::ok(format!(
                "Uploaded {} (file id {})",
                file_name, uploaded.id
            ))),
            Err(_) => Ok(SyncOutcome::ok(format!("Uploaded {}", file_name))),
        }
    }
}

/// Build the consent URL for the loopback flow
fn build_auth_url(client_id: &str, redirect_uri: &str, state: &str) -> HisabResult<String> {
    let url = Url::parse_with_params(
        OAUTH_AUTH_URL,
        [
            ("client_id", client_id),
            ("redirect_uri", redirect_uri),
            ("response_type", "code"),
            ("scope", DRIVE_SCOPE),
            ("prompt", "consent"),
            ("state", state),
        ],
    )
    .map_err(|e| HisabError::Sync(e.to_string()))?;
    Ok(url.to_string())
}

/// Exchange an authorization code for an access token
fn exchange_code(config: &DriveConfig, code: &str, redirect_uri: &str) -> HisabResult<String> {
    let client = Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| HisabError::Sync(e.to_string()))?;

    let response = client
        .post(OAUTH_TOKEN_URL)
        .form(&[
            ("code", code),
            ("client_id", config.client_id.as_str()),
            ("client_secret", config.client_secret.as_str()),
            ("redirect_uri", redirect_uri),
            ("grant_type", "authorization_code"),
        ])
        .send()
        .map_err(|e| HisabError::Sync(format!("Token request failed: {}", e)))?;

    if !response.status().is_success() {
        let status = response.status();
        let detail = response.text().unwrap_or_default();
        return Err(HisabError::Sync(format!(
            "Token exchange failed ({}): {}",
            status,
            detail.trim()
        )));
    }

    let token: TokenResponse = response
        .json()
        .map_err(|e| HisabError::Sync(format!("Bad token response: {}", e)))?;
    Ok(token.access_token)
}

/// Read the consent redirect, verify the state parameter, reply to the browser
fn read_redirect_code(stream: &mut TcpStream, expected_state: &str) -> HisabResult<String> {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
    let mut buffer = [0u8; 4096];
    let read = stream
        .read(&mut buffer)
        .map_err(|e| HisabError::Sync(format!("Failed to read redirect: {}", e)))?;
    let request = String::from_utf8_lossy(&buffer[..read]);

    let request_line = request.lines().next().unwrap_or_default();
    let result = parse_redirect_request_line(request_line, expected_state);

    let reply_body = match &result {
        Ok(_) => "Connected. You may close this window and return to the terminal.",
        Err(_) => "Connection failed. Return to the terminal for details.",
    };
    let _ = write!(
        stream,
        "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: {}\r\n\r\n{}",
        reply_body.len(),
        reply_body
    );

    result
}

/// Extract the authorization code from a redirect request line
fn parse_redirect_request_line(request_line: &str, expected_state: &str) -> HisabResult<String> {
    let path = request_line
        .split_whitespace()
        .nth(1)
        .ok_or_else(|| HisabError::Sync("Malformed redirect request".into()))?;

    let url = Url::parse(&format!("http://localhost{}", path))
        .map_err(|e| HisabError::Sync(format!("Malformed redirect: {}", e)))?;

    let mut code = None;
    let mut state = None;
    let mut error = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "state" => state = Some(value.into_owned()),
            "error" => error = Some(value.into_owned()),
            _ => {}
        }
    }

    if let Some(error) = error {
        return Err(HisabError::Sync(format!("Consent declined: {}", error)));
    }
    if state.as_deref() != Some(expected_state) {
        return Err(HisabError::Sync("State mismatch in redirect".into()));
    }
    code.ok_or_else(|| HisabError::Sync("Redirect carried no authorization code".into()))
}

/// Assemble a multipart/related upload body (metadata JSON + CSV media)
fn build_multipart_body(boundary: &str, metadata_json: &str, csv_text: &str) -> String {
    format!(
        "--{boundary}\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n{metadata}\r\n--{boundary}\r\nContent-Type: text/csv\r\n\r\n{csv}\r\n--{boundary}--\r\n",
        boundary = boundary,
        metadata = metadata_json,
        csv = csv_text
    )
}

/// Random-enough state token for the consent round-trip
fn generate_state() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);
    format!("{:08x}{:08x}", std::process::id(), nanos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::HisabPaths;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = HisabPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_configure_validates_and_persists() {
        let (_temp, storage) = create_test_storage();
        let client = DriveClient::new(&storage);

        assert!(client.configure("", "secret", "folder").is_err());
        assert_eq!(client.state().unwrap(), DriveState::Unconfigured);

        client.configure("id", "secret", "folder").unwrap();
        assert_eq!(client.state().unwrap(), DriveState::Configured);
    }

    #[test]
    fn test_push_requires_configuration_and_token() {
        let (_temp, storage) = create_test_storage();
        let client = DriveClient::new(&storage);

        // Unconfigured: validation fails fast before any network call
        assert!(matches!(
            client.push("accounts_backup.csv", "id,..."),
            Err(HisabError::Validation(_))
        ));

        client.configure("id", "secret", "folder").unwrap();
        // Configured but not connected
        assert!(matches!(
            client.push("accounts_backup.csv", "id,..."),
            Err(HisabError::Sync(_))
        ));
    }

    #[test]
    fn test_begin_connect_builds_consent_url() {
        let (_temp, storage) = create_test_storage();
        let client = DriveClient::new(&storage);
        client.configure("my-client-id", "secret", "folder").unwrap();

        let session = client.begin_connect().unwrap();
        assert!(session.auth_url.starts_with(OAUTH_AUTH_URL));
        assert!(session.auth_url.contains("client_id=my-client-id"));
        assert!(session.auth_url.contains("response_type=code"));
        assert!(session.auth_url.contains("redirect_uri=http%3A%2F%2F127.0.0.1"));
    }

    #[test]
    fn test_parse_redirect_request_line() {
        let line = "GET /?state=abc&code=4%2Fxyz HTTP/1.1";
        let code = parse_redirect_request_line(line, "abc").unwrap();
        assert_eq!(code, "4/xyz");

        // Wrong state
        assert!(parse_redirect_request_line(line, "other").is_err());

        // Declined consent
        let declined = "GET /?error=access_denied&state=abc HTTP/1.1";
        assert!(matches!(
            parse_redirect_request_line(declined, "abc"),
            Err(HisabError::Sync(_))
        ));

        // No code at all
        let empty = "GET /?state=abc HTTP/1.1";
        assert!(parse_redirect_request_line(empty, "abc").is_err());
    }

    #[test]
    fn test_build_multipart_body() {
        let body = build_multipart_body("b123", "{\"name\":\"f.csv\"}", "id,amount\n");
        assert!(body.starts_with("--b123\r\n"));
        assert!(body.ends_with("--b123--\r\n"));
        assert!(body.contains("Content-Type: application/json; charset=UTF-8"));
        assert!(body.contains("Content-Type: text/csv"));
        assert!(body.contains("{\"name\":\"f.csv\"}"));
        assert!(body.contains("id,amount\n"));
    }

    #[test]
    fn test_build_auth_url_escapes_params() {
        let url = build_auth_url("id with space", "http://127.0.0.1:9999", "st").unwrap();
        assert!(url.contains("client_id=id+with+space") || url.contains("client_id=id%20with%20space"));
        assert!(url.contains(&format!("scope={}", "https%3A%2F%2Fwww.googleapis.com%2Fauth%2Fdrive.file")));
    }
}
