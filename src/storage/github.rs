use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::{header, StatusCode};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};

use super::{GameStore, StoreError};
use crate::season::Game;

const DEFAULT_API_BASE: &str = "https://api.github.com";
const JSON_MEDIA_TYPE: &str = "application/vnd.github+json";
const RAW_MEDIA_TYPE: &str = "application/vnd.github.raw";

/// Where the season JSON lives in a GitHub repository.
#[derive(Debug, Clone)]
pub struct GitHubStoreConfig {
    /// Personal access token with contents read/write on `repo`.
    pub token: Option<String>,
    /// Repository in "owner/repo" format.
    pub repo: Option<String>,
    pub path: String,
    pub branch: String,
}

impl Default for GitHubStoreConfig {
    fn default() -> Self {
        Self {
            token: None,
            repo: None,
            path: "games.json".to_string(),
            branch: "main".to_string(),
        }
    }
}

/// Keeps the game list in a JSON file committed to a GitHub repository.
///
/// Updates go through the contents API and carry the blob sha seen on the
/// last load or save. If someone else committed in between, GitHub rejects
/// the write with 409/422; the store then re-reads the current sha and
/// reports a retryable error, so the next save replaces the remote file
/// with the local season.
///
/// Files over 1 MB come back from the contents API without inline content
/// and are fetched again as raw JSON.
pub struct GitHubGameStore {
    token: String,
    repo: String,
    path: String,
    branch: String,
    api_base: String,
    client: reqwest::Client,
    sha: Mutex<Option<String>>,
}

#[derive(Debug, Deserialize)]
struct ContentsResponse {
    sha: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    encoding: String,
    #[serde(default)]
    size: u64,
}

impl ContentsResponse {
    fn has_inline_content(&self) -> bool {
        self.encoding == "base64" && (self.size == 0 || !self.content.trim().is_empty())
    }
}

/// The season file as last seen on the branch.
struct RemoteFile {
    sha: String,
    games: Vec<Game>,
}

#[derive(Debug, Serialize)]
struct UpdateRequest<'a> {
    message: String,
    content: String,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UpdateResponse {
    content: UpdatedContent,
}

#[derive(Debug, Deserialize)]
struct UpdatedContent {
    sha: String,
}

impl GitHubGameStore {
    pub fn new(config: GitHubStoreConfig) -> Result<Self, StoreError> {
        let token = config
            .token
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| StoreError::Configuration("GITHUB_TOKEN must be set".to_string()))?;
        let repo = config
            .repo
            .filter(|r| r.split('/').filter(|part| !part.is_empty()).count() == 2)
            .ok_or_else(|| {
                StoreError::Configuration("GITHUB_REPO must be set as owner/repo".to_string())
            })?;

        let client = reqwest::Client::builder()
            .user_agent("championship-scorekeeper/0.1")
            .build()
            .map_err(|e| StoreError::Configuration(e.to_string()))?;

        Ok(Self {
            token,
            repo,
            path: config.path,
            branch: config.branch,
            api_base: DEFAULT_API_BASE.to_string(),
            client,
            sha: Mutex::new(None),
        })
    }

    /// Points the store at a different API host (GitHub Enterprise).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    fn contents_url(&self) -> String {
        format!(
            "{}/repos/{}/contents/{}",
            self.api_base,
            self.repo,
            self.path.trim_start_matches('/')
        )
    }

    fn authorized(
        &self,
        request: reqwest::RequestBuilder,
        accept: &'static str,
    ) -> reqwest::RequestBuilder {
        request
            .bearer_auth(&self.token)
            .header(header::ACCEPT, accept)
            .header("X-GitHub-Api-Version", "2022-11-28")
    }

    fn read_request(&self, accept: &'static str) -> reqwest::RequestBuilder {
        self.authorized(
            self.client
                .get(format!("{}?ref={}", self.contents_url(), self.branch)),
            accept,
        )
    }

    /// Reads the season file. `None` when it does not exist on the branch.
    async fn fetch(&self) -> Result<Option<RemoteFile>, StoreError> {
        let response = self
            .read_request(JSON_MEDIA_TYPE)
            .send()
            .await
            .map_err(|e| StoreError::TransientIo(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, "GitHub load failed");
            return Err(classify_status(status, &body));
        }

        let contents: ContentsResponse = response
            .json()
            .await
            .map_err(|e| StoreError::TransientIo(e.to_string()))?;

        let games = if contents.has_inline_content() {
            decode_games(&contents.content)?
        } else {
            debug!(
                size = contents.size,
                encoding = %contents.encoding,
                "No inline content, fetching raw file"
            );
            self.fetch_raw().await?
        };

        Ok(Some(RemoteFile {
            sha: contents.sha,
            games,
        }))
    }

    async fn fetch_raw(&self) -> Result<Vec<Game>, StoreError> {
        let response = self
            .read_request(RAW_MEDIA_TYPE)
            .send()
            .await
            .map_err(|e| StoreError::TransientIo(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, "GitHub raw load failed");
            return Err(classify_status(status, &body));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| StoreError::TransientIo(e.to_string()))?;
        parse_games(&bytes)
    }
}

#[async_trait]
impl GameStore for GitHubGameStore {
    #[instrument(skip(self), fields(repo = %self.repo, path = %self.path))]
    async fn load(&self) -> Result<Vec<Game>, StoreError> {
        let Some(file) = self.fetch().await? else {
            // File not created yet; the first save will create it.
            debug!("Season file not found in repository, starting empty");
            *self.sha.lock().await = None;
            return Ok(Vec::new());
        };

        *self.sha.lock().await = Some(file.sha);
        debug!(game_count = file.games.len(), "Loaded games from GitHub");
        Ok(file.games)
    }

    #[instrument(skip(self, games), fields(repo = %self.repo, game_count = games.len()))]
    async fn save(&self, games: &[Game]) -> Result<(), StoreError> {
        let mut sha = self.sha.lock().await;

        let body = UpdateRequest {
            message: format!("Update season games ({} games)", games.len()),
            content: encode_games(games)?,
            branch: &self.branch,
            sha: sha.clone(),
        };

        let response = self
            .authorized(self.client.put(self.contents_url()), JSON_MEDIA_TYPE)
            .json(&body)
            .send()
            .await
            .map_err(|e| StoreError::TransientIo(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!(%status, "GitHub save failed");
            if matches!(
                status,
                StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY
            ) {
                match self.fetch().await {
                    Ok(file) => *sha = file.map(|f| f.sha),
                    Err(err) => warn!(?err, "Could not refresh sha after rejected save"),
                }
            }
            return Err(classify_status(status, &text));
        }

        let updated: UpdateResponse = response
            .json()
            .await
            .map_err(|e| StoreError::TransientIo(e.to_string()))?;
        *sha = Some(updated.content.sha);

        debug!("Saved games to GitHub");
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "github"
    }
}

fn classify_status(status: StatusCode, body: &str) -> StoreError {
    let detail = format!("GitHub responded {status}: {}", body.trim());
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND => {
            StoreError::Configuration(detail)
        }
        // Stale sha: somebody else wrote first. The sha is refreshed before
        // this is returned.
        StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => StoreError::TransientIo(detail),
        _ => StoreError::TransientIo(detail),
    }
}

fn encode_games(games: &[Game]) -> Result<String, StoreError> {
    let json = serde_json::to_vec_pretty(games).map_err(|e| StoreError::Corrupt(e.to_string()))?;
    Ok(STANDARD.encode(json))
}

/// GitHub wraps base64 content at 60 columns.
fn decode_games(content: &str) -> Result<Vec<Game>, StoreError> {
    let compact: String = content.split_whitespace().collect();
    if compact.is_empty() {
        return Ok(Vec::new());
    }
    let bytes = STANDARD
        .decode(compact)
        .map_err(|e| StoreError::Corrupt(e.to_string()))?;
    parse_games(&bytes)
}

fn parse_games(bytes: &[u8]) -> Result<Vec<Game>, StoreError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    serde_json::from_slice(bytes).map_err(|e| StoreError::Corrupt(e.to_string()))
}
