use std::path::{Path, PathBuf};
use std::str::FromStr;

use reqwest::{Client, StatusCode, Url};
use thiserror::Error;
use tracing::{debug, info};

use crate::models::RawRecord;

pub const DEFAULT_SOURCE: &str = "public/data_sample.json";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to load data: Error: Data file not found at {url}.")]
    NotFound { url: String },
    #[error("Failed to load data: Failed to load data. Status: {status} {status_text}")]
    Fetch { status: u16, status_text: String },
    #[error("Failed to load data: {0}")]
    Unknown(String),
}

/// Where the dataset lives: an HTTP(S) resource or a file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Http(Url),
    File(PathBuf),
}

impl FromStr for DataSource {
    type Err = LoadError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if raw.starts_with("http://") || raw.starts_with("https://") {
            let url = Url::parse(raw).map_err(|err| LoadError::Unknown(err.to_string()))?;
            return Ok(DataSource::Http(url));
        }
        Ok(DataSource::File(PathBuf::from(raw)))
    }
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSource::Http(url) => write!(f, "{url}"),
            DataSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

pub struct Loader {
    client: Client,
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

impl Loader {
    pub fn new() -> Self {
        Self::with_client(Client::new())
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Reads the whole dataset. `Ok(None)` means the document itself was `null`.
    pub async fn load(&self, source: &DataSource) -> Result<Option<Vec<RawRecord>>, LoadError> {
        debug!(%source, "loading dataset");
        let body = match source {
            DataSource::Http(url) => self.fetch(url).await?,
            DataSource::File(path) => read_file(path).await?,
        };

        let records: Option<Vec<RawRecord>> =
            serde_json::from_slice(&body).map_err(|err| LoadError::Unknown(err.to_string()))?;

        info!(
            %source,
            records = records.as_ref().map_or(0, Vec::len),
            "dataset loaded"
        );
        Ok(records)
    }

    async fn fetch(&self, url: &Url) -> Result<Vec<u8>, LoadError> {
        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|err| LoadError::Unknown(err.to_string()))?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Err(LoadError::NotFound {
                url: resp.url().to_string(),
            });
        }
        if !status.is_success() {
            return Err(LoadError::Fetch {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|err| LoadError::Unknown(err.to_string()))?;
        Ok(bytes.to_vec())
    }
}

async fn read_file(path: &Path) -> Result<Vec<u8>, LoadError> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(bytes),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Err(LoadError::NotFound {
            url: file_url(path),
        }),
        Err(err) => Err(LoadError::Unknown(err.to_string())),
    }
}

fn file_url(path: &Path) -> String {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };
    Url::from_file_path(&absolute)
        .map(|url| url.to_string())
        .unwrap_or_else(|_| absolute.display().to_string())
}
