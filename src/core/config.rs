//! # Configuration
//!
//! Centralizes shell settings with a clear override hierarchy:
//! defaults → config file → CLI flags.
//!
//! Config lives at `~/.keymux/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.
//! `[[menus]]` tables replace the built-in menu bar wholesale when present.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::menu::{MenuDefinition, MenuItem, MenuModel};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct KeymuxConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub menus: Vec<MenuEntry>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub start_in_grid: Option<bool>,
    pub prompt: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MenuEntry {
    pub name: String,
    pub hotkey: String,
    #[serde(default)]
    pub items: Vec<MenuItemEntry>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MenuItemEntry {
    pub label: Option<String>,
    pub hotkey: Option<String>,
    pub action: Option<String>,
    pub enabled: Option<bool>,
    pub separator: Option<bool>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_PROMPT: &str = "pmc>";

const DEFAULT_CONFIG_TEMPLATE: &str = r#"# keymux configuration
# Uncomment and edit to override the defaults.

# [general]
# start_in_grid = false
# prompt = "pmc>"

# Menu bar definition. When any [[menus]] table is present it replaces the
# built-in File/View/Help bar entirely.
#
# [[menus]]
# name = "File"
# hotkey = "F"
#
# [[menus.items]]
# label = "Exit"
# hotkey = "X"
# action = "app.quit"
#
# [[menus.items]]
# separator = true
"#;

/// The built-in menu bar used when the config defines none.
pub fn default_menu_model() -> MenuModel {
    MenuModel::new(vec![
        MenuDefinition::new(
            "File",
            'F',
            vec![
                MenuItem::new("Clear Log", 'L', "log.clear"),
                MenuItem::separator(),
                MenuItem::new("Exit", 'X', "app.quit"),
            ],
        ),
        MenuDefinition::new(
            "View",
            'V',
            vec![
                MenuItem::new("Grid Browse", 'G', "view.grid"),
                MenuItem::new("Command Line", 'C', "view.command"),
            ],
        ),
        MenuDefinition::new("Help", 'H', vec![MenuItem::new("Key Bindings", 'K', "help.keys")]),
    ])
}

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub start_in_grid: bool,
    pub prompt: String,
    pub menu_model: MenuModel,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Menu(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
            ConfigError::Menu(msg) => write!(f, "menu config error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.keymux/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".keymux").join("config.toml"))
}

/// Load config from `path` if given, otherwise `~/.keymux/config.toml`.
///
/// If the default file doesn't exist, a commented-out template is generated
/// and `KeymuxConfig::default()` returned. An explicitly passed path that is
/// missing or malformed is an error.
pub fn load_config(path: Option<&Path>) -> Result<KeymuxConfig, ConfigError> {
    if let Some(p) = path {
        let raw = fs::read_to_string(p)?;
        return Ok(toml::from_str(&raw)?);
    }

    let default_path = match config_path() {
        Some(p) => p,
        None => {
            warn!("could not determine home directory, using default config");
            return Ok(KeymuxConfig::default());
        }
    };

    if !default_path.exists() {
        if let Some(dir) = default_path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(&default_path, DEFAULT_CONFIG_TEMPLATE)?;
        info!("generated default config at {}", default_path.display());
        return Ok(KeymuxConfig::default());
    }

    let raw = fs::read_to_string(&default_path)?;
    Ok(toml::from_str(&raw)?)
}

/// Resolve sparse config plus CLI flags into concrete values.
pub fn resolve(config: KeymuxConfig, cli_grid: bool) -> Result<ResolvedConfig, ConfigError> {
    let menu_model = if config.menus.is_empty() {
        default_menu_model()
    } else {
        build_menu_model(&config.menus)?
    };

    Ok(ResolvedConfig {
        start_in_grid: cli_grid || config.general.start_in_grid.unwrap_or(false),
        prompt: config
            .general
            .prompt
            .unwrap_or_else(|| DEFAULT_PROMPT.to_string()),
        menu_model,
    })
}

fn single_char(field: &str, value: &str) -> Result<char, ConfigError> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(ConfigError::Menu(format!(
            "{field} must be a single character, got {value:?}"
        ))),
    }
}

fn build_menu_model(entries: &[MenuEntry]) -> Result<MenuModel, ConfigError> {
    let mut menus = Vec::with_capacity(entries.len());
    for entry in entries {
        let hotkey = single_char(&format!("menu {:?} hotkey", entry.name), &entry.hotkey)?;
        let mut items = Vec::with_capacity(entry.items.len());
        for item in &entry.items {
            if item.separator.unwrap_or(false) {
                items.push(MenuItem::separator());
                continue;
            }
            let label = item.label.clone().ok_or_else(|| {
                ConfigError::Menu(format!("item in menu {:?} is missing a label", entry.name))
            })?;
            let action = item.action.clone().ok_or_else(|| {
                ConfigError::Menu(format!("item {label:?} is missing an action"))
            })?;
            let hotkey = match &item.hotkey {
                Some(h) => single_char(&format!("item {label:?} hotkey"), h)?,
                None => label.chars().next().unwrap_or(' '),
            };
            let mut built = MenuItem::new(label, hotkey, action);
            if !item.enabled.unwrap_or(true) {
                built = built.disabled();
            }
            items.push(built);
        }
        menus.push(MenuDefinition::new(entry.name.clone(), hotkey, items));
    }
    Ok(MenuModel::new(menus))
}
