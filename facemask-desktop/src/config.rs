use anyhow::{Context, Result};
use facemask_img::feed::Backpressure;
use facemask_img::masks::MaskKind;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Settings read from a TOML file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub mask: Option<String>,
    pub accessories: Option<bool>,
    pub queue: Option<usize>,
    pub drop_stale: Option<bool>,
    pub background: Option<PathBuf>,
    pub max_frame_lag_ms: Option<u32>,
    pub autostart: Option<bool>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

/// Resolved run settings: explicit flags win over the config file, which wins
/// over defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub mask: MaskKind,
    pub accessories: bool,
    pub queue: usize,
    pub backpressure: Backpressure,
    pub background: Option<PathBuf>,
    pub max_frame_lag_ms: Option<u32>,
    pub autostart: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mask: MaskKind::default(),
            accessories: false,
            queue: 4,
            backpressure: Backpressure::Block,
            background: None,
            max_frame_lag_ms: None,
            autostart: true,
        }
    }
}

/// The subset of command line flags that can also come from a config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub mask: Option<String>,
    pub accessories: bool,
    pub queue: Option<usize>,
    pub drop_stale: bool,
    pub background: Option<PathBuf>,
    pub max_frame_lag_ms: Option<u32>,
}

impl Settings {
    pub fn resolve(file: FileConfig, flags: Overrides) -> Result<Self> {
        let defaults = Settings::default();

        let mask = match flags.mask.or(file.mask) {
            Some(name) => name.parse::<MaskKind>()?,
            None => defaults.mask,
        };
        let drop_stale = flags.drop_stale || file.drop_stale.unwrap_or(false);

        Ok(Self {
            mask,
            accessories: flags.accessories || file.accessories.unwrap_or(defaults.accessories),
            queue: flags.queue.or(file.queue).unwrap_or(defaults.queue),
            backpressure: if drop_stale {
                Backpressure::DropStale
            } else {
                Backpressure::Block
            },
            background: flags.background.or(file.background),
            max_frame_lag_ms: flags.max_frame_lag_ms.or(file.max_frame_lag_ms),
            autostart: file.autostart.unwrap_or(defaults.autostart),
        })
    }
}

#[test]
fn parses_partial_file() {
    let file = FileConfig::parse("mask = \"batman\"\ndrop_stale = true\nqueue = 2\n").unwrap();
    assert_eq!(file.mask.as_deref(), Some("batman"));
    assert_eq!(file.queue, Some(2));
    assert_eq!(file.accessories, None);
}

#[test]
fn rejects_unknown_keys() {
    assert!(FileConfig::parse("colour = \"red\"").is_err());
}

#[test]
fn flags_override_file() {
    let file = FileConfig::parse("mask = \"batman\"\nqueue = 2\nautostart = false").unwrap();
    let settings = Settings::resolve(
        file,
        Overrides {
            mask: Some("spiderMan".to_string()),
            drop_stale: true,
            ..Default::default()
        },
    )
    .unwrap();

    assert_eq!(settings.mask, MaskKind::SpiderMan);
    assert_eq!(settings.queue, 2);
    assert_eq!(settings.backpressure, Backpressure::DropStale);
    assert!(!settings.autostart);
}

#[test]
fn unknown_mask_is_an_error() {
    let flags = Overrides {
        mask: Some("hulk".to_string()),
        ..Default::default()
    };
    assert!(Settings::resolve(FileConfig::default(), flags).is_err());
}
