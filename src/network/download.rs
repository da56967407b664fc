// file: src/network/download.rs
// version: 1.0.0
// guid: d28ef189-c5fb-402a-b063-aec806897128

//! Artifact store downloads

use crate::error::CompileDumpError;
use crate::Result;
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

#[cfg(test)]
use std::sync::{Mutex, OnceLock};

#[cfg(test)]
#[derive(Default)]
struct MockResponses {
    exists: Option<Result<bool>>,
    download: Option<Result<Vec<u8>>>,
}

#[cfg(test)]
static MOCK_RESPONSES: OnceLock<Mutex<MockResponses>> = OnceLock::new();

#[cfg(test)]
fn mock_storage() -> &'static Mutex<MockResponses> {
    MOCK_RESPONSES.get_or_init(|| Mutex::new(MockResponses::default()))
}

#[cfg(test)]
fn take_mock_exists() -> Option<Result<bool>> {
    mock_storage().lock().unwrap().exists.take()
}

#[cfg(test)]
fn take_mock_download() -> Option<Result<Vec<u8>>> {
    mock_storage().lock().unwrap().download.take()
}

#[cfg(test)]
pub(crate) fn set_mock_exists(result: Result<bool>) {
    mock_storage().lock().unwrap().exists = Some(result);
}

#[cfg(test)]
pub(crate) fn set_mock_download(result: Result<Vec<u8>>) {
    mock_storage().lock().unwrap().download = Some(result);
}

/// HTTP downloader with progress tracking
pub struct NetworkDownloader {
    client: reqwest::Client,
}

impl NetworkDownloader {
    /// Create a new network downloader
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Download `url` to `dest`, showing a progress bar
    pub async fn download<P: AsRef<Path>>(&self, url: &str, dest: P) -> Result<()> {
        #[cfg(test)]
        if let Some(mock) = take_mock_download() {
            tokio::fs::write(&dest, mock?).await?;
            return Ok(());
        }

        info!("Downloading: {}", url);

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(CompileDumpError::NetworkError(format!(
                "Download of {} failed with status: {}",
                url,
                response.status()
            )));
        }

        let total_size = response.content_length().unwrap_or(0);

        let pb = ProgressBar::new(total_size);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );

        let written = write_body(response, dest.as_ref(), &pb).await;
        pb.finish_and_clear();

        if let Err(e) = written {
            if let Err(remove_err) = tokio::fs::remove_file(&dest).await {
                debug!(
                    "Could not remove partial download {}: {}",
                    dest.as_ref().display(),
                    remove_err
                );
            }
            return Err(e);
        }

        info!("Downloaded to: {}", dest.as_ref().display());
        Ok(())
    }

    /// Check that `url` names an existing object
    pub async fn exists(&self, url: &str) -> Result<bool> {
        #[cfg(test)]
        if let Some(mock) = take_mock_exists() {
            return mock;
        }

        debug!("Probing: {}", url);
        match self.client.head(url).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(e) => {
                debug!("Probe of {} failed: {}", url, e);
                Ok(false)
            }
        }
    }
}

async fn write_body(response: reqwest::Response, dest: &Path, pb: &ProgressBar) -> Result<()> {
    let mut file = File::create(dest).await?;
    let mut stream = response.bytes_stream();
    let mut downloaded = 0u64;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        downloaded += chunk.len() as u64;
        pb.set_position(downloaded);
    }

    file.flush().await?;
    Ok(())
}

impl Default for NetworkDownloader {
    fn default() -> Self {
        Self::new()
    }
}
