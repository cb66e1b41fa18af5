//! libcim-core
//!
//! Text utilities and configuration shared by the input-context layer
//! (`libcim`) and by backends.
//!
//! Public API:
//! - `utf8` - codepoint counting, offset navigation, decode/encode, collation
//! - `TextBuffer` - byte-indexed growable text buffer
//! - `DynamicArray` - ordered sequence with an optional element destructor
//! - `SharedRef` - explicitly reference-counted payload
//! - `Config` - which backend to load and from where
//!
//! `DynamicArray` and `SharedRef` are not used by `libcim` itself. They are
//! provided for backends that keep destructor-owning lists or hand one
//! payload to several owners.
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub mod utf8;

pub mod text_buffer;
pub use text_buffer::TextBuffer;

pub mod array;
pub use array::DynamicArray;

pub mod shared_ref;
pub use shared_ref::SharedRef;

/// File name of the backend module inside the user config directory.
pub const PLUGIN_FILE_NAME: &str = "cim.so";

/// File name of the configuration file inside the user config directory.
pub const CONFIG_FILE_NAME: &str = "cim.toml";

/// Where the input-method backend comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PluginSource {
    /// A shared module loaded at runtime. `None` means no path could be
    /// resolved, which behaves like a missing file.
    Dynamic(Option<PathBuf>),
    /// A backend compiled into the process and registered by name.
    Builtin(String),
}

/// Backend selection.
///
/// Every field is optional; an empty file (or no file at all) means "load
/// `cim.so` from the user config directory".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Explicit path to the backend module, overriding `<config>/cim.so`.
    pub plugin_path: Option<PathBuf>,

    /// Name of a compiled-in backend. Takes precedence over `plugin_path`.
    pub backend: Option<String>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize configuration to TOML string.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Read `<config>/cim.toml` if it exists, falling back to defaults.
    ///
    /// A file that cannot be read or parsed is logged and ignored.
    pub fn load_default() -> Self {
        let Some(path) = default_config_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_toml(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("ignoring {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Resolve where the backend should come from.
    pub fn plugin_source(&self) -> PluginSource {
        if let Some(name) = &self.backend {
            return PluginSource::Builtin(name.clone());
        }
        PluginSource::Dynamic(self.plugin_path.clone().or_else(default_plugin_path))
    }
}

/// Per-user configuration directory.
///
/// `$XDG_CONFIG_HOME` when it is set to an absolute path, otherwise
/// `$HOME/.config`.
pub fn user_config_dir() -> Option<PathBuf> {
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
        let xdg = PathBuf::from(xdg);
        if xdg.is_absolute() {
            return Some(xdg);
        }
    }
    std::env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .map(|home| PathBuf::from(home).join(".config"))
}

/// `<config>/cim.so`
pub fn default_plugin_path() -> Option<PathBuf> {
    user_config_dir().map(|dir| dir.join(PLUGIN_FILE_NAME))
}

/// `<config>/cim.toml`
pub fn default_config_path() -> Option<PathBuf> {
    user_config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}
