use alloc::format;
use alloc::string::{String, ToString as _};
use alloc::vec::Vec;

use hashbrown::HashMap;

use crate::error::bail_option_error;
use crate::glob::Glob;
use crate::os::{MachineInfo, Path, Result};
use crate::steps::ConfigureFile;

pub const DEFAULT_SOURCE_DIR: &str = "src/tre";
pub const BUILD_MACRO: &str = "BUILD_TRE";
pub const CONFIG_HEADER: &str = "flx_target_tre_config.h";
pub const VERBATIM_HEADERS: [&str; 2] = ["tre-regex.h", "tre-config.h"];

/// What to do when the C source glob matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptySources {
    /// Compile anyway, with an empty source list.
    #[default]
    Allow,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValue {
    Boolean(bool),
    String(String),
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        match value {
            "true" => ConfigValue::Boolean(true),
            "false" => ConfigValue::Boolean(false),
            s => ConfigValue::String(s.to_string()),
        }
    }
}

/// Fixed locations of everything the adapter reads or writes.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub source_dir: Path,
    pub buildroot: Path,
}

impl Layout {
    pub fn new(source_dir: Path, buildroot: Path) -> Self {
        Self {
            source_dir,
            buildroot,
        }
    }

    pub fn c_sources(&self) -> Glob {
        Glob::new(self.source_dir.clone(), "*.c")
    }

    pub fn flx_sources(&self) -> Glob {
        Glob::new(self.source_dir.clone(), "*.flx")
    }

    pub fn verbatim_headers(&self) -> Vec<Path> {
        VERBATIM_HEADERS
            .iter()
            .map(|name| self.source_dir.join(name))
            .collect()
    }

    /// Runtime include directory; staged headers land here and the C sources
    /// are compiled against it.
    pub fn include_dir(&self) -> Path {
        self.buildroot.join("config/target")
    }

    pub fn config_header(&self) -> Path {
        self.include_dir().join(CONFIG_HEADER)
    }

    pub fn lib_dst(&self) -> Path {
        self.buildroot.join("lib/rtl/tre")
    }

    pub fn flx_dir(&self) -> Path {
        self.buildroot.join("lib")
    }
}

/// Typed view of the string options set on [`Tre`](crate::Tre).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub source_dir: Option<Path>,
    pub empty_sources: EmptySources,
    /// Extra defines for the generated header. `from_options` fills them
    /// sorted by option key.
    pub defines: Vec<(String, ConfigValue)>,
}

impl Config {
    pub fn from_options(options: &HashMap<String, String>) -> Result<Self> {
        let mut config = Config::default();

        // Sort so `config.*` defines come out the same on every run.
        let mut options = options.iter().collect::<Vec<_>>();
        options.sort();

        for (key, value) in options {
            config.set(key, value)?;
        }
        Ok(config)
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "source_dir" => {
                if value.is_empty() {
                    bail_option_error!("'source_dir' must not be empty");
                }
                self.source_dir = Some(Path::from(value));
            }
            "empty_sources" => {
                self.empty_sources = match value {
                    "allow" => EmptySources::Allow,
                    "error" => EmptySources::Error,
                    _ => bail_option_error!(
                        "'empty_sources' must be 'allow' or 'error', got '{value}'"
                    ),
                };
            }
            _ => {
                let Some(name) = key.strip_prefix("config.") else {
                    bail_option_error!("Unknown option '{key}'");
                };
                if !is_identifier(name) {
                    bail_option_error!("'{name}' is not a valid macro name");
                }
                let value = ConfigValue::from(value);
                match self.defines.iter_mut().find(|(k, _)| k == name) {
                    Some((_, v)) => *v = value,
                    None => self.defines.push((name.to_string(), value)),
                }
            }
        }
        Ok(())
    }

    pub fn layout(&self, default_source_dir: &Path, buildroot: &Path) -> Layout {
        let source_dir = self
            .source_dir
            .clone()
            .unwrap_or_else(|| default_source_dir.clone());
        Layout::new(source_dir, buildroot.clone())
    }

    /// Renders `flx_target_tre_config.h` for the given host.
    pub fn config_header(&self, layout: &Layout, host: &MachineInfo) -> ConfigureFile {
        let (export, import) = if host.is_windows() {
            ("__declspec(dllexport)", "__declspec(dllimport)")
        } else {
            ("__attribute__((visibility(\"default\")))", "")
        };

        let mut content = String::from("#pragma once\n\n");
        content.push_str(&format!("#ifdef {BUILD_MACRO}\n"));
        content.push_str(&format!("#define TRE_EXTERN {export}\n"));
        content.push_str("#else\n");
        if import.is_empty() {
            content.push_str("#define TRE_EXTERN\n");
        } else {
            content.push_str(&format!("#define TRE_EXTERN {import}\n"));
        }
        content.push_str("#endif\n");

        for (key, value) in &self.defines {
            content.push('\n');
            match value {
                ConfigValue::Boolean(true) => content.push_str(&format!("#define {key}\n")),
                ConfigValue::Boolean(false) => content.push_str(&format!("#undef {key}\n")),
                ConfigValue::String(s) => content.push_str(&format!("#define {key} {s}\n")),
            }
        }

        ConfigureFile {
            path: layout.config_header(),
            content,
        }
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}
