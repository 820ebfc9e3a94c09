/// Configuration system for arvdash.
///
/// Provides a layered configuration hierarchy:
///
/// 1. **Built-in defaults**: hardcoded in [`schema::DashConfig::default()`]
/// 2. **User global config**: `~/.arvdash/config.toml`
/// 3. **Project local config**: `.arvdash.toml` in the current working directory
/// 4. **Environment variables**: `ARVDASH_*` overrides (highest precedence)
///
/// Later layers override earlier ones at the key level: each file is merged
/// into the running TOML tree before the result is deserialized, so a file
/// that only sets `server.url` leaves every other key untouched.
///
/// # Usage
///
/// ```rust,ignore
/// use arvdash::config;
///
/// let cfg = config::load();
/// let client = arvdash::api::ApiClient::from_config(&cfg.server);
/// ```
pub mod schema;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub use schema::DashConfig;

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the fully resolved arvdash configuration.
///
/// Merges all layers in order: defaults → global TOML → project TOML → env
/// vars. Malformed files are skipped so a bad edit never stops the dashboard
/// from starting.
pub fn load() -> DashConfig {
    let layers = [global_config_path(), project_config_path()];
    let mut config = load_layers(layers.iter().flatten().map(PathBuf::as_path));
    apply_env_overrides(&mut config);
    config
}

/// Merge the given TOML files over the defaults, in order.
pub fn load_layers<'a>(paths: impl IntoIterator<Item = &'a Path>) -> DashConfig {
    let Ok(mut merged) = toml::Value::try_from(DashConfig::default()) else {
        return DashConfig::default();
    };

    for path in paths {
        if let Some(layer) = load_toml_value(path) {
            merge_value(&mut merged, layer);
        }
    }

    merged.try_into().unwrap_or_default()
}

/// Read a TOML file as an untyped tree. `None` if missing or malformed.
fn load_toml_value(path: &Path) -> Option<toml::Value> {
    let content = fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

/// Recursively merge `overlay` into `base`. Tables merge key by key; any
/// other value replaces the base value.
fn merge_value(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                match base_table.get_mut(&key) {
                    Some(existing) => merge_value(existing, value),
                    None => {
                        base_table.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

/// Path to the user global config: `~/.arvdash/config.toml`.
fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".arvdash").join("config.toml"))
}

/// Path to the project local config: `.arvdash.toml` in the current directory.
fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(".arvdash.toml"))
}

/// Return the path to the global config file for display/init purposes.
pub fn global_config_file() -> Option<PathBuf> {
    global_config_path()
}

/// Return the path to the project config file for display purposes.
pub fn project_config_file() -> Option<PathBuf> {
    project_config_path()
}

/// Expand a leading `~/` to the home directory.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(path)
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply environment variable overrides (highest precedence layer).
///
/// Supported variables:
/// - `ARVDASH_SERVER_URL`: control server base URL
/// - `ARVDASH_API_VERSION`: API version path segment
/// - `ARVDASH_TIMEOUT_MS`: request timeout
/// - `ARVDASH_LISTEN`: dashboard listen address
/// - `ARVDASH_LOGGING`: event log switch (`1`/`true`/`yes`/`on`)
fn apply_env_overrides(config: &mut DashConfig) {
    if let Ok(val) = std::env::var("ARVDASH_SERVER_URL")
        && !val.is_empty()
    {
        config.server.url = val;
    }
    if let Ok(val) = std::env::var("ARVDASH_API_VERSION")
        && !val.is_empty()
    {
        config.server.api_version = val;
    }
    if let Ok(val) = std::env::var("ARVDASH_TIMEOUT_MS")
        && let Ok(ms) = val.parse::<u64>()
    {
        config.server.timeout_ms = ms;
    }
    if let Ok(val) = std::env::var("ARVDASH_LISTEN")
        && !val.is_empty()
    {
        config.web.listen = val;
    }
    if let Ok(val) = std::env::var("ARVDASH_LOGGING") {
        config.logging.enabled = is_truthy(&val);
    }
}

/// Check if a string value represents a truthy boolean.
fn is_truthy(val: &str) -> bool {
    matches!(
        val.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

// ---------------------------------------------------------------------------
// Config init / set / reset
// ---------------------------------------------------------------------------

/// Write the default annotated config to `~/.arvdash/config.toml`.
///
/// Creates the `~/.arvdash/` directory if it doesn't exist. Returns an error
/// if the file already exists (use `force = true` to overwrite).
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create ~/.arvdash/ directory")?;
    }

    fs::write(&path, DashConfig::default_toml()).context("failed to write config file")?;

    Ok(path)
}

/// Set a single config key to a value in the global config file.
///
/// Supports dotted keys like `server.url`. The value is typed after the
/// existing value at that key; keys are validated against the full schema
/// even when the file does not set them yet.
pub fn set_config_value(key: &str, value: &str) -> Result<()> {
    let path = global_config_path().context("could not determine home directory")?;

    let mut root = toml::Value::try_from(DashConfig::default())
        .context("failed to serialize default config")?;
    if path.exists() {
        let content = fs::read_to_string(&path).context("failed to read config file")?;
        let existing: toml::Value =
            toml::from_str(&content).context("failed to parse config as TOML value")?;
        merge_value(&mut root, existing);
    }

    set_toml_value(&mut root, key, value)?;

    // Reject values that no longer deserialize (e.g. a string where a number belongs).
    let _: DashConfig = root
        .clone()
        .try_into()
        .with_context(|| format!("invalid value for '{key}': {value}"))?;

    let output = toml::to_string_pretty(&root).context("failed to serialize updated config")?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    fs::write(&path, output).context("failed to write config file")?;

    Ok(())
}

/// Set a value in a TOML value tree using a dotted key path.
fn set_toml_value(root: &mut toml::Value, key: &str, raw_value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();
    if parts.iter().any(|p| p.is_empty()) {
        anyhow::bail!("empty config key segment in '{key}'");
    }

    // Navigate to the parent table
    let mut current = root;
    for &part in &parts[..parts.len() - 1] {
        current = current
            .get_mut(part)
            .with_context(|| format!("config key not found: section '{part}' in '{key}'"))?;
    }

    let leaf = parts[parts.len() - 1];

    let table = current.as_table_mut().with_context(|| {
        format!(
            "expected table at '{}'",
            key.rsplit_once('.').map(|(s, _)| s).unwrap_or("")
        )
    })?;

    let new_value = match table.get(leaf) {
        Some(toml::Value::Boolean(_)) => toml::Value::Boolean(is_truthy(raw_value)),
        Some(toml::Value::Integer(_)) => {
            let n: i64 = raw_value
                .parse()
                .with_context(|| format!("expected integer for '{key}', got '{raw_value}'"))?;
            toml::Value::Integer(n)
        }
        Some(toml::Value::Float(_)) => {
            let f: f64 = raw_value
                .parse()
                .with_context(|| format!("expected float for '{key}', got '{raw_value}'"))?;
            toml::Value::Float(f)
        }
        Some(toml::Value::String(_)) => toml::Value::String(raw_value.to_string()),
        Some(_) => anyhow::bail!("'{key}' is a section, not a value"),
        None => anyhow::bail!("unknown config key '{key}'"),
    };

    table.insert(leaf.to_string(), new_value);
    Ok(())
}

/// Reset the global config to defaults (overwrite the file).
pub fn reset_config() -> Result<PathBuf> {
    init_config(true)
}

/// Show the effective (fully resolved) config as TOML.
pub fn show_effective_config() -> Result<String> {
    let config = load();
    toml::to_string_pretty(&config).context("failed to serialize effective config")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
