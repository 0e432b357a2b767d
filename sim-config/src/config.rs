use anyhow::{Context, Result};
use sim_types::{ResourceMap, WorldConfig};
use std::path::{Path, PathBuf};

mod resource_map;

pub use resource_map::{parse_resource_map, ResourceMapError};

const DEFAULT_WORLD_CONFIG_REL_PATH: &str = "default.toml";

pub fn world_config_from_toml_str(raw: &str) -> Result<WorldConfig, toml::de::Error> {
    toml::from_str(raw)
}

pub fn default_world_config() -> WorldConfig {
    world_config_from_toml_str(include_str!("../default.toml"))
        .expect("default world config TOML must deserialize")
}

pub fn default_world_config_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_WORLD_CONFIG_REL_PATH)
}

pub fn load_world_config_from_path(path: &Path) -> Result<WorldConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read world config from {}", path.display()))?;
    world_config_from_toml_str(&raw)
        .context("world config TOML failed schema deserialization")
        .with_context(|| format!("failed to parse world config from {}", path.display()))
}

/// Falls back to the embedded defaults when no path is given.
pub fn load_world_config(path: Option<&Path>) -> Result<WorldConfig> {
    match path {
        Some(path) => load_world_config_from_path(path),
        None => Ok(default_world_config()),
    }
}

pub fn load_resource_map_from_path(path: &Path) -> Result<ResourceMap> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read resource map from {}", path.display()))?;
    parse_resource_map(&raw)
        .with_context(|| format!("failed to parse resource map from {}", path.display()))
}
