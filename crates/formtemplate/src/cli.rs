//! Command-line argument parsing.

use clap::Parser;
use serde::Deserialize;
use std::path::PathBuf;

/// Render an XML form template
#[derive(Parser, Debug, Clone)]
#[command(name = "formtemplate")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Template document
    pub templates: PathBuf,

    /// Message bundle used for localized labels
    #[arg(short, long)]
    pub messages: Option<PathBuf>,

    /// Template to render (default: the first one)
    #[arg(short, long)]
    pub template: Option<String>,

    /// Set a field value before rendering
    #[arg(long = "set", value_name = "NAME=VALUE", value_parser = parse_assignment)]
    pub values: Vec<(String, String)>,

    /// List the templates and exit
    #[arg(long)]
    pub list: bool,

    /// Output format
    #[arg(long)]
    pub output: Option<OutputFormat>,

    /// Configuration file (default: ./formtemplate.json when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Output format of the rendered panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markup followed by a field table
    #[default]
    Human,
    /// One JSON document
    Json,
}

/// Parse a `NAME=VALUE` pair.
pub fn parse_assignment(text: &str) -> Result<(String, String), String> {
    match text.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("expected NAME=VALUE, got '{}'", text)),
    }
}
