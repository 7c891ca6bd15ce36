//! Configuration loading and merging

use anyhow::{bail, Context, Result};
use navsts_trajectory::{TrajectoryConfig, PALETTE_SIZE};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration (loaded from navsts.toml)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub filtering: FilteringConfig,
    #[serde(default)]
    pub style: StyleConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct InputConfig {
    #[serde(default)]
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Directory for generated files (default: next to each input)
    pub dir: Option<PathBuf>,
    #[serde(default)]
    pub pretty: bool,
    /// Also write the intermediate per-channel extraction
    #[serde(default)]
    pub write_extraction: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FilteringConfig {
    pub channels: Option<Vec<String>>,
    /// Channel to render (default: first channel seen)
    pub channel: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StyleConfig {
    pub palette: Option<Vec<String>>,
}

impl AppConfig {
    /// Build the library configuration from this application configuration
    pub fn trajectory_config(&self) -> Result<TrajectoryConfig> {
        let mut config = TrajectoryConfig::new();

        if let Some(channels) = &self.filtering.channels {
            config = config.with_channel_filter(channels.clone());
        }
        if let Some(channel) = &self.filtering.channel {
            config = config.with_channel(channel.clone());
        }
        if let Some(palette) = &self.style.palette {
            let palette: [String; PALETTE_SIZE] = match palette.clone().try_into() {
                Ok(palette) => palette,
                Err(colors) => bail!(
                    "style.palette must have exactly {} colors, got {}",
                    PALETTE_SIZE,
                    Vec::len(&colors)
                ),
            };
            config = config.with_palette(palette);
        }

        Ok(config)
    }
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    // Catch a bad palette at load time rather than per input file
    config.trajectory_config()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let toml_content = r##"
            [input]
            files = ["dive_01.jsonl", "dive_02.jsonl"]

            [output]
            dir = "out"
            pretty = true

            [filtering]
            channels = ["/nav/nav_sts"]

            [style]
            palette = ["#a00", "#b00", "#c00", "#d00", "#e00"]
        "##;

        let config: AppConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.input.files.len(), 2);
        assert!(config.output.pretty);
        assert!(!config.output.write_extraction);

        let trajectory = config.trajectory_config().unwrap();
        assert!(trajectory.should_process_channel("/nav/nav_sts"));
        assert!(!trajectory.should_process_channel("/other"));
        assert_eq!(trajectory.palette[4], "#e00");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.trajectory_config().unwrap(), TrajectoryConfig::default());
    }

    #[test]
    fn test_short_palette_rejected() {
        let config: AppConfig = toml::from_str("[style]\npalette = [\"#f00\"]").unwrap();
        assert!(config.trajectory_config().is_err());
    }
}
