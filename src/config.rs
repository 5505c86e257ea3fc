use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use palette::{Srgb, Srgba, WithAlpha};
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TintParseError {
    #[error("Invalid hex colour '{0}'")]
    Hex(String),
    #[error("Invalid alpha '{0}', expected a number between 0 and 1")]
    Alpha(String),
}

/// Colour plus opacity, written as `#rrggbb@alpha` (alpha optional, defaults to 1).
#[derive(Debug, Clone, Copy, PartialEq, SerializeDisplay, DeserializeFromStr)]
pub struct Tint(Srgba<f64>);

impl Tint {
    pub fn new(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self(Srgba::new(red, green, blue, alpha))
    }

    pub fn color(&self) -> Srgba<f64> {
        self.0
    }
}

impl FromStr for Tint {
    type Err = TintParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (hex, alpha) = match s.split_once('@') {
            Some((hex, alpha)) => (hex.trim(), Some(alpha.trim())),
            None => (s, None),
        };

        let rgb: Srgb<u8> = hex
            .parse()
            .map_err(|_| TintParseError::Hex(hex.to_string()))?;
        let alpha = match alpha {
            Some(a) => a
                .parse::<f64>()
                .ok()
                .filter(|a| (0.0..=1.0).contains(a))
                .ok_or_else(|| TintParseError::Alpha(a.to_string()))?,
            None => 1.0,
        };

        Ok(Self(rgb.into_format::<f64>().with_alpha(alpha)))
    }
}

impl fmt::Display for Tint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rgb: Srgb<u8> = self.0.color.into_format();
        write!(
            f,
            "#{:02x}{:02x}{:02x}@{}",
            rgb.red, rgb.green, rgb.blue, self.0.alpha
        )
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Appearance {
    pub trigger_tint: Tint,
    pub satellite_tint: Tint,
    pub glyph_color: Tint,
    pub padding: f64,
    pub button_size: f64,
}

impl Default for Appearance {
    fn default() -> Self {
        Self {
            trigger_tint: Tint::new(128.0 / 255.0, 0.0, 128.0 / 255.0, 0.8),
            satellite_tint: Tint::new(1.0, 1.0, 1.0, 0.8),
            glyph_color: Tint::new(1.0, 1.0, 1.0, 1.0),
            padding: 32.0,
            button_size: 50.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub appearance: Appearance,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
}

pub fn get_config_path() -> Result<std::path::PathBuf, ConfigError> {
    let proj_dirs = ProjectDirs::from("org", "glasspath", "glasspath")
        .ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

fn environment() -> config::Environment {
    config::Environment::with_prefix("GLASSPATH")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

pub fn load_config() -> Result<Config, ConfigError> {
    let config_path = get_config_path()?;

    let s = config::Config::builder()
        .add_source(config::File::from(config_path).required(false))
        .add_source(environment())
        .build()?;

    Ok(s.try_deserialize()?)
}

pub fn load_or_default() -> Config {
    load_config().unwrap_or_else(|e| {
        log::error!("Failed to load config, using defaults: {}", e);
        Config::default()
    })
}

pub fn write_default_config() -> std::io::Result<std::path::PathBuf> {
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
                let touches_config = matches!(
                    event.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                ) && event.paths.iter().any(|p| p == &config_path);

                if touches_config && tx.send(AppEvent::ConfigReload).await.is_err() {
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

    fn from_toml(toml: &str) -> Config {
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_tint_deserialization() {
        let cases = vec![
            ("\"#ffffff@0.8\"", Tint::new(1.0, 1.0, 1.0, 0.8)),
            ("\"#000000\"", Tint::new(0.0, 0.0, 0.0, 1.0)),
            ("\" #ff0000 @ 0.5 \"", Tint::new(1.0, 0.0, 0.0, 0.5)),
            ("\"#FFFFFF@0\"", Tint::new(1.0, 1.0, 1.0, 0.0)),
        ];

        for (json, expected) in cases {
            let deserialized: Tint = serde_json::from_str(json).unwrap();
            assert_eq!(deserialized, expected, "{}", json);
        }
    }

    #[test]
    fn test_tint_rejects_garbage() {
        assert!(matches!("#zzzzzz".parse::<Tint>(), Err(TintParseError::Hex(_))));
        assert!(matches!(
            "#ffffff@1.5".parse::<Tint>(),
            Err(TintParseError::Alpha(_))
        ));
        assert!(matches!(
            "#ffffff@half".parse::<Tint>(),
            Err(TintParseError::Alpha(_))
        ));
    }

    #[test]
    fn test_tint_display_parses_back() {
        let tint: Tint = "#800080@0.8".parse().unwrap();
        assert_eq!(tint.to_string(), "#800080@0.8");
        assert_eq!(tint.to_string().parse::<Tint>().unwrap(), tint);
    }

    #[test]
    fn test_default_appearance() {
        let appearance = Appearance::default();
        assert_eq!(appearance.padding, 32.0);
        assert_eq!(appearance.button_size, 50.0);
        assert_eq!(appearance.trigger_tint.to_string(), "#800080@0.8");
        assert_eq!(appearance.satellite_tint.to_string(), "#ffffff@0.8");
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = from_toml(
            r##"
            [appearance]
            padding = 48.0
            trigger_tint = "#336699@0.9"
            "##,
        );
        assert_eq!(config.appearance.padding, 48.0);
        assert_eq!(config.appearance.button_size, 50.0);
        assert_eq!(config.appearance.trigger_tint.to_string(), "#336699@0.9");
        assert_eq!(
            config.appearance.satellite_tint,
            Appearance::default().satellite_tint
        );
    }

    #[test]
    fn test_environment_overrides_appearance() {
        let vars = std::collections::HashMap::from([
            (
                "GLASSPATH_APPEARANCE__PADDING".to_string(),
                "48".to_string(),
            ),
            (
                "GLASSPATH_APPEARANCE__TRIGGER_TINT".to_string(),
                "#ff0000@0.5".to_string(),
            ),
        ]);

        let config: Config = config::Config::builder()
            .add_source(environment().source(Some(vars)))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.appearance.padding, 48.0);
        assert_eq!(
            config.appearance.trigger_tint,
            Tint::new(1.0, 0.0, 0.0, 0.5)
        );
        assert_eq!(config.appearance.button_size, 50.0);
    }

    #[test]
    fn test_default_config_documents_trigger_glyph_only() {
        assert!(DEFAULT_CONFIG.contains("# Colour of the trigger glyph\n"));
        assert!(!DEFAULT_CONFIG.contains("fallback letters"));
    }

    #[test]
    fn test_embedded_default_config_is_valid() {
        assert_eq!(from_toml(DEFAULT_CONFIG), Config::default());
    }
}
