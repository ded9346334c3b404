use crate::events::AppEvent;
use crate::gui::reel::images::{self, ImageSource};
use async_channel::{Receiver, Sender};
use gdk_pixbuf::Pixbuf;
use orbit::SourceRef;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Semaphore;

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_CONCURRENT_LOADS: usize = 8;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("No image location in {0:?}")]
    Unsupported(SourceRef),
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Read failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decode failed: {0}")]
    Decode(#[from] glib::Error),
    #[error("Decoder task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Serves [`crate::gui::reel::ImageStore`] requests. Every request produces exactly one
/// [`AppEvent::ImageLoaded`], carrying `None` when the photo could not be loaded.
pub async fn run_image_loader(requests: Receiver<SourceRef>, tx: Sender<AppEvent>) {
    let client = match reqwest::Client::builder().timeout(FETCH_TIMEOUT).build() {
        Ok(client) => client,
        Err(e) => {
            log::error!("Failed to create HTTP client: {}", e);
            return;
        }
    };
    let permits = Arc::new(Semaphore::new(MAX_CONCURRENT_LOADS));

    while let Ok(source) = requests.recv().await {
        let client = client.clone();
        let tx = tx.clone();
        let permits = permits.clone();

        tokio::spawn(async move {
            let Ok(_permit) = permits.acquire_owned().await else {
                return;
            };

            let pixbuf = match load(&client, &source).await {
                Ok(pixbuf) => {
                    log::debug!("Loaded {}", source);
                    Some(pixbuf)
                }
                Err(e) => {
                    log::warn!("Failed to load {}: {}", source, e);
                    None
                }
            };
            let _ = tx.send(AppEvent::ImageLoaded(source, pixbuf)).await;
        });
    }
}

pub async fn fetch(client: &reqwest::Client, source: &SourceRef) -> Result<Vec<u8>, LoadError> {
    match images::resolve(source) {
        Some(ImageSource::Remote(url)) => {
            let response = client.get(url).send().await?.error_for_status()?;
            Ok(response.bytes().await?.to_vec())
        }
        Some(ImageSource::Local(path)) => Ok(fs_err::tokio::read(path).await?),
        None => Err(LoadError::Unsupported(source.clone())),
    }
}

async fn load(client: &reqwest::Client, source: &SourceRef) -> Result<Pixbuf, LoadError> {
    let bytes = fetch(client, source).await?;
    Ok(tokio::task::spawn_blocking(move || images::decode(&bytes)).await??)
}
