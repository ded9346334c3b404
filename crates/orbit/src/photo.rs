use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};

/// Upper bound on arranged photos, keeps per-frame work bounded.
pub const PHOTO_CAP: usize = 150;

/// Opaque reference to an image (path or URL). Handed to the image loader untouched.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct SourceRef(String);

crate::impl_string_newtype!(SourceRef);

impl From<&str> for SourceRef {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhotoItem {
    pub index: usize,
    pub source: SourceRef,
}

/// How many positions to arrange for a given photo list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PhotoCount {
    /// One position per photo.
    #[default]
    Auto,
    /// A fixed number of positions, reusing photos round-robin.
    Fixed(usize),
}

impl PhotoCount {
    pub fn resolve(&self, available: usize) -> usize {
        if available == 0 {
            return 0;
        }
        match self {
            Self::Auto => available.min(PHOTO_CAP),
            Self::Fixed(n) => (*n).min(PHOTO_CAP),
        }
    }
}

impl From<Option<usize>> for PhotoCount {
    fn from(count: Option<usize>) -> Self {
        count.map_or(Self::Auto, Self::Fixed)
    }
}

/// Assigns a source to each of `count` positions. Sources repeat when there
/// are fewer photos than positions.
pub fn distribute(photos: &[SourceRef], count: PhotoCount) -> Vec<PhotoItem> {
    let count = count.resolve(photos.len());

    (0..count)
        .map(|index| PhotoItem {
            index,
            source: photos[index % photos.len()].clone(),
        })
        .collect()
}
