use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use orbit::ribbon::RibbonLayout;
use orbit::sphere::SphereLayout;
use orbit::{Layout, LayoutKind, PhotoCount, SourceRef};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif", "bmp", "tiff"];
pub const PLACEHOLDER_COUNT: usize = 50;

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub layout: LayoutKind,
    /// Positions to arrange. Defaults to one per photo.
    #[serde(default)]
    pub count: Option<usize>,
    #[serde(default)]
    pub photos: Vec<SourceRef>,
    /// Scanned for images when `photos` is empty.
    #[serde(default)]
    pub photo_dir: Option<PathBuf>,
    #[serde(default)]
    pub sphere: SphereLayout,
    #[serde(default)]
    pub ribbon: RibbonLayout,
}

impl Config {
    pub fn layout(&self) -> Layout {
        Layout::from_kind(self.layout, &self.sphere, &self.ribbon)
    }

    pub fn count(&self) -> PhotoCount {
        PhotoCount::from(self.count)
    }

    /// Explicit photos first, then the photo directory, then placeholders.
    pub fn resolve_photos(&self) -> Vec<SourceRef> {
        if !self.photos.is_empty() {
            return self.photos.clone();
        }

        let dir = self.photo_dir.clone().or_else(default_photo_dir);
        if let Some(dir) = dir {
            match scan_photo_dir(&dir) {
                Ok(found) if !found.is_empty() => return found,
                Ok(_) => log::info!("No photos in {}", dir.display()),
                Err(e) => log::debug!("Photo directory unavailable: {}", e),
            }
        }

        placeholder_photos()
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "keepsake", "keepsake").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

pub fn default_photo_dir() -> Option<PathBuf> {
    let xdg = xdg::BaseDirectories::new();
    xdg.get_data_home().map(|home| home.join("keepsake").join("photos"))
}

pub fn load_config() -> Result<Config, ConfigError> {
    let config_path = get_config_path()?;

    let s = config::Config::builder()
        .add_source(config::File::from(config_path).required(false))
        .add_source(config::Environment::with_prefix("KEEPSAKE"))
        .build()?;

    Ok(s.try_deserialize()?)
}

pub fn load_or_setup() -> Config {
    if let Ok(path) = get_config_path()
        && !path.exists()
    {
        match write_default_config() {
            Ok(path) => log::info!("Wrote default config to {}", path.display()),
            Err(e) => log::warn!("Failed to write default config: {}", e),
        }
    }

    load_config().unwrap_or_else(|e| {
        log::error!("Failed to load config, using defaults: {}", e);
        Config::default()
    })
}

pub fn write_default_config() -> std::io::Result<PathBuf> {
    let path =
        get_config_path().map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
    }
    Ok(path)
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// Image files directly inside `dir`, sorted by path.
pub fn scan_photo_dir(dir: &Path) -> std::io::Result<Vec<SourceRef>> {
    let mut paths: Vec<PathBuf> = fs_err::read_dir(dir)?
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_image(path))
        .collect();
    paths.sort();

    Ok(paths
        .into_iter()
        .map(|p| SourceRef::new(p.to_string_lossy()))
        .collect())
}

pub fn placeholder_photos() -> Vec<SourceRef> {
    (0..PLACEHOLDER_COUNT)
        .map(|i| SourceRef::new(format!("https://picsum.photos/seed/{}/200/200", i + 100)))
        .collect()
}

use crate::events::AppEvent;
use async_channel::Sender;

pub async fn run_async_watcher(tx: Sender<AppEvent>) {
    let config_path = match get_config_path() {
        Ok(p) => p,
        Err(e) => {
            log::error!("Config watcher error: {}", e);
            return;
        }
    };
    let config_dir = match config_path.parent() {
        Some(p) => p.to_path_buf(),
        None => return,
    };

    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to create watcher: {}", e);
            return;
        }
    };

    if let Err(e) = watcher.watch(&config_dir, RecursiveMode::NonRecursive) {
        log::error!("Failed to watch config directory: {}", e);
        return;
    }

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                let meaningful_event = matches!(
                    event.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                );

                if meaningful_event
                    && event.paths.iter().any(|p| p == &config_path)
                    && tx.send(AppEvent::ConfigReload).await.is_err()
                {
                    break;
                }
            }
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml: &str) -> Config {
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_layout_deserialization() {
        let cases = vec![
            ("\"sphere\"", LayoutKind::Sphere),
            ("\"Globe\"", LayoutKind::Sphere),
            ("\"RIBBON\"", LayoutKind::Ribbon),
            ("\"carousel\"", LayoutKind::Ribbon),
        ];

        for (json, expected) in cases {
            let deserialized: LayoutKind = serde_json::from_str(json).unwrap();
            assert_eq!(deserialized, expected);
        }
    }

    #[test]
    fn test_partial_sections_keep_defaults() {
        let config = parse(
            r#"
            layout = "ribbon"
            count = 24
            photos = ["/tmp/a.jpg", "/tmp/b.jpg"]

            [ribbon]
            gap = 10.0
            "#,
        );

        assert_eq!(config.layout, LayoutKind::Ribbon);
        assert_eq!(config.count(), PhotoCount::Fixed(24));
        assert_eq!(config.ribbon.gap, 10.0);
        assert_eq!(config.ribbon.item_size, RibbonLayout::default().item_size);
        assert_eq!(config.sphere, SphereLayout::default());
        assert_eq!(config.resolve_photos().len(), 2);
    }

    #[test]
    fn test_default_config_parses() {
        let config = parse(DEFAULT_CONFIG);
        assert_eq!(config.layout, LayoutKind::Sphere);
        assert_eq!(config.count(), PhotoCount::Auto);
    }

    #[test]
    fn test_scan_photo_dir() {
        let dir = std::env::temp_dir().join(format!("keepsake-scan-{}", std::process::id()));
        fs_err::create_dir_all(&dir).unwrap();
        for name in ["b.JPG", "a.png", "notes.txt", "c.webp"] {
            fs_err::write(dir.join(name), b"").unwrap();
        }

        let found = scan_photo_dir(&dir).unwrap();
        let names: Vec<String> = found
            .iter()
            .filter_map(|s| Path::new(s.as_str()).file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.png", "b.JPG", "c.webp"]);

        let config = Config {
            photo_dir: Some(dir.clone()),
            ..Default::default()
        };
        assert_eq!(config.resolve_photos(), found);

        let _ = fs_err::remove_dir_all(&dir);
    }

    #[test]
    fn test_placeholders_when_nothing_configured() {
        let config = Config {
            photo_dir: Some(PathBuf::from("/nonexistent/keepsake/photos")),
            ..Default::default()
        };
        let photos = config.resolve_photos();
        assert_eq!(photos.len(), PLACEHOLDER_COUNT);
        assert_eq!(photos[0].as_str(), "https://picsum.photos/seed/100/200/200");
    }
}
