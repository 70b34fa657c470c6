//! Reader for the `key = value` configuration file.
//!
//! Keys before the first `[section]` header form the defaults, which is
//! where the credentials live. A sectioned file is accepted too, but only
//! its leading flat part and an explicit `[DEFAULT]` section are consulted.
//! A blank line ends a multi-line value.

use crate::client::SynoError::Configuration;
use crate::password::password_from_command;
use crate::utils::expand_tilde;
use anyhow::{Context, Result};
use log::error;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fs;
use std::path::Path;

/// Section whose values back up the flat part of the file
const DEFAULT_SECTION: &str = "DEFAULT";

/// Default location of the configuration file
pub const DEFAULT_CONFIG_FILE: &str = "~/.config/ds-down.conf";

type Options = HashMap<String, String>;

/// Parsed configuration file
#[derive(Debug, Default)]
pub struct Config {
    defaults: Options,
    sections: HashMap<String, Options>,
}

impl Config {
    /// Reads and parses the file at `path`
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is malformed
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Could not open config file: {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Could not parse config file: {}", path.display()))
    }

    /// Parses configuration text.
    ///
    /// `=` and `:` both separate keys from values, keys are case-insensitive,
    /// lines starting with `#` or `;` are comments and indented lines
    /// continue the previous value.
    ///
    /// # Errors
    ///
    /// Returns an error on a repeated key or section, or on a line that is
    /// not a header, comment, continuation or assignment
    pub fn parse(text: &str) -> Result<Self> {
        let mut config = Config::default();
        let mut section: Option<String> = None;
        let mut last_key: Option<String> = None;

        for (index, raw) in text.lines().enumerate() {
            let number = index + 1;
            let line = raw.trim();

            if line.is_empty() {
                last_key = None;
                continue;
            }
            if line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if raw.starts_with(char::is_whitespace) {
                if let Some(key) = &last_key {
                    let value = config
                        .options_mut(section.as_deref())
                        .get_mut(key)
                        .context("continuation without a key")?;
                    value.push('\n');
                    value.push_str(line);
                    continue;
                }
            }

            if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                let name = name.trim().to_string();
                if config.sections.contains_key(&name) {
                    return Err(Configuration(format!(
                        "line {number}: section '{name}' already exists"
                    ))
                    .into());
                }
                config.sections.insert(name.clone(), Options::new());
                section = Some(name);
                last_key = None;
                continue;
            }

            let Some(split) = line.find(['=', ':']) else {
                return Err(Configuration(format!(
                    "line {number}: expected 'key = value', got: {line}"
                ))
                .into());
            };
            let key = line[..split].trim().to_lowercase();
            let value = line[split + 1..].trim().to_string();
            if key.is_empty() {
                return Err(Configuration(format!("line {number}: missing key before '='")).into());
            }

            match config.options_mut(section.as_deref()).entry(key.clone()) {
                Entry::Occupied(_) => {
                    return Err(Configuration(format!(
                        "line {number}: option '{key}' already exists"
                    ))
                    .into());
                }
                Entry::Vacant(entry) => {
                    entry.insert(value);
                }
            }
            last_key = Some(key);
        }

        Ok(config)
    }

    /// Looks up `key` in the flat part of the file, then in an explicit
    /// `[DEFAULT]` section
    #[must_use]
    pub fn get_default(&self, key: &str) -> Option<&str> {
        self.get(None, key)
            .or_else(|| self.get(Some(DEFAULT_SECTION), key))
    }

    /// Looks up `key` in `section`, or in the flat part when `section` is `None`
    #[must_use]
    pub fn get(&self, section: Option<&str>, key: &str) -> Option<&str> {
        let options = match section {
            None => &self.defaults,
            Some(name) => self.sections.get(name)?,
        };
        options.get(&key.to_lowercase()).map(String::as_str)
    }

    fn options_mut(&mut self, section: Option<&str>) -> &mut Options {
        match section {
            None => &mut self.defaults,
            Some(name) => self.sections.entry(name.to_string()).or_default(),
        }
    }
}

/// Values needed to talk to the device, any of which may be missing
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: Option<String>,
    pub host: Option<String>,
    pub password: Option<String>,
}

impl Credentials {
    /// Reads `username` and `host` from `config` and runs `passwordeval`
    /// for the password. Every missing key is logged.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let get_option = |name: &str| {
            let value = config.get_default(name).map(str::to_string);
            if value.is_none() {
                error!("Config file did not contain value for '{name}'.");
            }
            value
        };

        let username = get_option("username");
        let host = get_option("host");
        let password = password_from_command(get_option("passwordeval").as_deref());

        Self {
            username,
            host,
            password,
        }
    }

    /// Returns `(username, host, password)` if all are present and non-empty
    ///
    /// # Errors
    ///
    /// Returns an error naming the first missing value
    pub fn require(self) -> Result<(String, String, String)> {
        let non_empty = |value: Option<String>, name: &str| {
            value
                .filter(|v| !v.is_empty())
                .ok_or_else(|| Configuration(format!("No {name} available")))
        };
        Ok((
            non_empty(self.username, "username")?,
            non_empty(self.host, "host")?,
            non_empty(self.password, "password")?,
        ))
    }
}

/// Expands `~` in `config_file`, parses it and resolves the credentials
///
/// # Errors
///
/// Returns an error if the file is missing or malformed
pub fn read_config(config_file: &str) -> Result<Credentials> {
    let path = expand_tilde(config_file);
    let config = Config::from_path(Path::new(&path))?;
    Ok(Credentials::from_config(&config))
}
