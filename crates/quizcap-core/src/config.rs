//! Engine configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Tunables of the answer-capture engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Seed for puzzle shuffling. `None` draws from OS entropy.
    #[serde(default)]
    pub shuffle_seed: Option<u64>,
    /// Joins chain fragments before the puzzle self-check.
    #[serde(default = "default_chain_separator")]
    pub chain_separator: String,
    /// Arrow glyph that ASCII arrows are normalized to during self-check.
    #[serde(default = "default_arrow_glyph")]
    pub arrow_glyph: String,
    /// ASCII spellings treated as the arrow glyph.
    #[serde(default = "default_ascii_arrows")]
    pub ascii_arrows: Vec<String>,
}

fn default_chain_separator() -> String {
    " ".to_string()
}
fn default_arrow_glyph() -> String {
    "→".to_string()
}
fn default_ascii_arrows() -> Vec<String> {
    vec!["->".to_string(), "=>".to_string()]
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            shuffle_seed: None,
            chain_separator: default_chain_separator(),
            arrow_glyph: default_arrow_glyph(),
            ascii_arrows: default_ascii_arrows(),
        }
    }
}

/// Config file layout: engine settings live under `[engine]`.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    engine: EngineConfig,
}

/// Parse a TOML config document.
pub fn parse_config_str(content: &str) -> Result<EngineConfig> {
    let file: ConfigFile = toml::from_str(content).context("failed to parse config")?;
    Ok(file.engine)
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order:
/// 1. `quizcap.toml` in the current directory
/// 2. `~/.config/quizcap/config.toml`
///
/// `QUIZCAP_SHUFFLE_SEED` overrides the shuffle seed.
pub fn load_config_from(path: Option<&Path>) -> Result<EngineConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizcap.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config_str(&content)
                .with_context(|| format!("invalid config: {}", path.display()))?
        }
        None => EngineConfig::default(),
    };

    if let Ok(seed) = std::env::var("QUIZCAP_SHUFFLE_SEED") {
        config.shuffle_seed = Some(
            seed.trim()
                .parse()
                .with_context(|| format!("QUIZCAP_SHUFFLE_SEED is not a number: {seed}"))?,
        );
    }

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizcap"))
}
