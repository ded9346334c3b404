use super::IMAGE_SIZE;
use async_channel::Sender;
use gdk_pixbuf::prelude::*;
use gdk_pixbuf::{Pixbuf, PixbufError, PixbufLoader};
use orbit::SourceRef;
use std::collections::HashMap;
use std::path::PathBuf;

enum Slot {
    Pending,
    Ready(Pixbuf),
    Failed,
}

/// Decoded photos keyed by source.
///
/// Unknown sources are queued for the background loader and draw as placeholders
/// until their pixbuf arrives. Failed loads are remembered so a broken source is
/// only tried once.
pub struct ImageStore {
    cache: HashMap<SourceRef, Slot>,
    requests: Sender<SourceRef>,
}

impl ImageStore {
    pub fn new(requests: Sender<SourceRef>) -> Self {
        Self {
            cache: HashMap::new(),
            requests,
        }
    }

    /// Never blocks. `None` while the photo is loading or after it failed.
    pub fn get(&mut self, source: &SourceRef) -> Option<&Pixbuf> {
        let requests = &self.requests;
        let slot = self.cache.entry(source.clone()).or_insert_with(|| {
            match requests.try_send(source.clone()) {
                Ok(()) => Slot::Pending,
                Err(e) => {
                    log::warn!("Image loader unavailable, {} stays a placeholder: {}", source, e);
                    Slot::Failed
                }
            }
        });

        match slot {
            Slot::Ready(pixbuf) => Some(pixbuf),
            Slot::Pending | Slot::Failed => None,
        }
    }

    /// Stores a finished load. Results for sources dropped by [`Self::retain`] are ignored.
    pub fn finish(&mut self, source: &SourceRef, pixbuf: Option<Pixbuf>) {
        if let Some(slot) = self.cache.get_mut(source) {
            *slot = match pixbuf {
                Some(pixbuf) => Slot::Ready(pixbuf),
                None => Slot::Failed,
            };
        }
    }

    /// Drops everything not in `sources`.
    pub fn retain(&mut self, sources: &[SourceRef]) {
        self.cache.retain(|k, _| sources.contains(k));
    }

    #[cfg(test)]
    fn is_pending(&self, source: &SourceRef) -> bool {
        matches!(self.cache.get(source), Some(Slot::Pending))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Remote(String),
    Local(PathBuf),
}

/// Where the bytes for a source come from. `None` for blank sources.
pub fn resolve(source: &SourceRef) -> Option<ImageSource> {
    let s = source.trim();
    if s.is_empty() {
        return None;
    }
    if s.starts_with("http://") || s.starts_with("https://") {
        return Some(ImageSource::Remote(s.to_string()));
    }
    Some(ImageSource::Local(PathBuf::from(
        s.strip_prefix("file://").unwrap_or(s),
    )))
}

/// Decodes encoded image bytes, shrinking anything larger than [`IMAGE_SIZE`].
/// Runs off the UI thread.
pub fn decode(bytes: &[u8]) -> Result<Pixbuf, glib::Error> {
    let loader = PixbufLoader::new();
    loader.connect_size_prepared(|loader, width, height| {
        let longest = width.max(height);
        if longest > IMAGE_SIZE {
            let scale = IMAGE_SIZE as f64 / longest as f64;
            loader.set_size(
                ((width as f64 * scale).round() as i32).max(1),
                ((height as f64 * scale).round() as i32).max(1),
            );
        }
    });

    if let Err(e) = loader.write(bytes) {
        let _ = loader.close();
        return Err(e);
    }
    loader.close()?;
    loader
        .pixbuf()
        .ok_or_else(|| glib::Error::new(PixbufError::CorruptImage, "No image data"))
}
