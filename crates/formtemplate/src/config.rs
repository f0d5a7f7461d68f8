//! Configuration loading.

use crate::cli::{Args, OutputFormat};
use indexmap::IndexMap;
use miette::{Context, IntoDiagnostic, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = "formtemplate.json";

/// Settings read from the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub messages: Option<PathBuf>,
    pub template: Option<String>,
    pub output: Option<OutputFormat>,
    pub values: IndexMap<String, String>,
}

impl FileConfig {
    /// Read a configuration file.
    pub fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&text)
            .into_diagnostic()
            .wrap_err_with(|| format!("Invalid configuration in {}", path.display()))
    }
}

/// Effective settings; command-line flags win over the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub templates: PathBuf,
    pub messages: Option<PathBuf>,
    pub template: Option<String>,
    pub output: OutputFormat,
    pub values: Vec<(String, String)>,
    pub list: bool,
}

impl Config {
    /// Load the configuration file, if any, and merge the arguments.
    pub fn load(args: &Args) -> Result<Self> {
        let file = match &args.config {
            Some(path) => FileConfig::read(path)?,
            None if Path::new(CONFIG_FILE).is_file() => FileConfig::read(Path::new(CONFIG_FILE))?,
            None => FileConfig::default(),
        };
        Ok(Self::merge(args, file))
    }

    fn merge(args: &Args, file: FileConfig) -> Self {
        let mut values: Vec<(String, String)> = file.values.into_iter().collect();
        values.extend(args.values.iter().cloned());
        Self {
            templates: args.templates.clone(),
            messages: args.messages.clone().or(file.messages),
            template: args.template.clone().or(file.template),
            output: args.output.or(file.output).unwrap_or_default(),
            values,
            list: args.list,
        }
    }
}
