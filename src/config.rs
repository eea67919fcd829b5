// layered project configuration
//
// The final configuration is a fold of partial JSON layers, lowest priority
// first: built-in defaults, the project config file, environment variables,
// then command line overrides.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde_derive::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::errors::{Error, Result};

/// Environment variable naming the project config file
pub const CONFIG_PATH_VAR: &str = "MICKOFONT_CONFIG_PATH";
/// Environment variable overriding the optimization level
pub const OPTIMIZATION_LEVEL_VAR: &str = "MICKOFONT_OPTIMIZATION_LEVEL";
/// Config file looked for in the working directory
pub const CONFIG_FILE_NAME: &str = "mickofont.json";
/// Program run to build fonts unless configured otherwise
pub const DEFAULT_BUILDER: &str = "mickofont-svgtofont";

/// How aggressively SVGs are optimized before font generation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum OptimizationLevel {
    #[default]
    Full,
    Mid,
    None,
}

impl FromStr for OptimizationLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "mid" => Ok(Self::Mid),
            "none" => Ok(Self::None),
            _ => Err(Error::Config(format!(
                "Invalid optimization level \"{s}\". Must be one of: full, mid, none."
            ))),
        }
    }
}

impl TryFrom<String> for OptimizationLevel {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl fmt::Display for OptimizationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => write!(f, "full"),
            Self::Mid => write!(f, "mid"),
            Self::None => write!(f, "none"),
        }
    }
}

/// External program used to build fonts; see `fontbuild::CommandFontBuilder`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuilderCommand {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl Default for BuilderCommand {
    fn default() -> Self {
        Self {
            program: DEFAULT_BUILDER.to_string(),
            args: Vec::new(),
        }
    }
}

/// Options handed to the font builder.
///
/// Only the fields this crate acts on are typed; everything else in the
/// config file is carried through unchanged in `extra`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontOptions {
    /// Directory of SVG icons
    pub src: PathBuf,
    /// Output directory for font files
    pub dist: PathBuf,
    pub font_name: String,
    /// Optimizer settings, selected from `optimizationLevel`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub svgo_options: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Complete project configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    #[serde(default)]
    pub verbose: bool,
    #[serde(default)]
    pub optimization_level: OptimizationLevel,
    /// Convert stroked paths to fills before building
    #[serde(default)]
    pub stroke_to_fill: bool,
    #[serde(default)]
    pub font_builder: BuilderCommand,
    #[serde(rename = "svgToFontOptions")]
    pub font_options: FontOptions,
}

/// Process-level inputs to configuration loading.
#[derive(Clone, Debug, Default)]
pub struct ConfigEnv {
    /// Directory relative to which defaults and the config file are found
    pub cwd: PathBuf,
    /// Explicit config file path
    pub config_path: Option<PathBuf>,
    /// Raw optimization level override
    pub optimization_level: Option<String>,
}

impl ConfigEnv {
    pub fn from_process() -> Result<Self> {
        Ok(Self {
            cwd: std::env::current_dir()?,
            config_path: std::env::var_os(CONFIG_PATH_VAR).map(PathBuf::from),
            optimization_level: std::env::var(OPTIMIZATION_LEVEL_VAR).ok(),
        })
    }

    pub fn config_file(&self) -> PathBuf {
        match &self.config_path {
            Some(path) => self.cwd.join(path),
            None => self.cwd.join(CONFIG_FILE_NAME),
        }
    }
}

/// Merge `overlay` onto `base`.
///
/// Objects merge key by key, recursively. A `null` overlay keeps the base
/// value; any other overlay value (including arrays) replaces it.
fn merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                let merged = match base.remove(&key) {
                    Some(existing) => merge(existing, value),
                    None => value,
                };
                base.insert(key, merged);
            }
            Value::Object(base)
        }
        (base, Value::Null) => base,
        (_, overlay) => overlay,
    }
}

/// Fold configuration layers, lowest priority first, into a single value.
pub fn merge_layers(layers: impl IntoIterator<Item = Value>) -> Value {
    layers.into_iter().fold(Value::Null, merge)
}

/// Built-in defaults, with icon and font directories under `cwd`.
pub fn default_layer(cwd: &Path) -> Value {
    json!({
        "verbose": false,
        "optimizationLevel": OptimizationLevel::default().to_string(),
        "strokeToFill": false,
        "fontBuilder": { "program": DEFAULT_BUILDER, "args": [] },
        "svgToFontOptions": {
            "src": cwd.join("icons").to_string_lossy(),
            "dist": cwd.join("fonts").to_string_lossy(),
            "fontName": "micko-icons",
            "classNamePrefix": "mko",
            "svgicons2svgfont": { "fontHeight": 1000, "normalize": true },
            "css": true,
        },
    })
}

/// Read the project config file. A missing, unreadable or invalid file is
/// skipped so the remaining layers still apply.
fn file_layer(path: &Path) -> Option<Value> {
    if !path.exists() {
        log::debug!("No project config at {}", path.display());
        return None;
    }
    let parsed = std::fs::read_to_string(path)
        .map_err(Error::from)
        .and_then(|s| serde_json::from_str::<Value>(&s).map_err(Error::from));
    match parsed {
        Ok(value @ Value::Object(_)) => {
            log::info!("Loaded config from project file: {}", path.display());
            Some(value)
        }
        Ok(_) => {
            log::warn!(
                "Project config {} is not a JSON object. Using base configuration.",
                path.display()
            );
            None
        }
        Err(e) => {
            log::warn!(
                "Could not load project config from {}: {e}. Using base configuration.",
                path.display()
            );
            None
        }
    }
}

fn env_layer(env: &ConfigEnv) -> Result<Value> {
    match env.optimization_level.as_deref() {
        Some(level) if !level.is_empty() => {
            let level: OptimizationLevel = level.parse().map_err(|_| {
                Error::Config(format!(
                    "Invalid {OPTIMIZATION_LEVEL_VAR}: \"{level}\". Must be one of: full, mid, none."
                ))
            })?;
            Ok(json!({ "optimizationLevel": level.to_string() }))
        }
        _ => Ok(Value::Null),
    }
}

/// Load the project configuration for `env`, with `overrides` (typically
/// from the command line) taking highest priority.
pub fn load_project_config(env: &ConfigEnv, overrides: Value) -> Result<ProjectConfig> {
    let mut layers = vec![default_layer(&env.cwd)];
    layers.extend(file_layer(&env.config_file()));
    layers.push(env_layer(env)?);
    layers.push(overrides);

    serde_json::from_value(merge_layers(layers)).map_err(|e| Error::Config(e.to_string()))
}
