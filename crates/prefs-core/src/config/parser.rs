//! TOML parser with helpful error messages

use super::schema::PrefsConfig;
use anyhow::{Context, Result};
use std::path::Path;

/// Parse prefs.toml with detailed error messages
///
/// Relative locations in the file are validated against the file's directory.
pub fn parse_prefs_toml(path: &Path) -> Result<PrefsConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let base_dir = path.parent().unwrap_or_else(|| Path::new("/"));
    parse_prefs_toml_str(&content, base_dir)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Parse prefs.toml content from string
pub fn parse_prefs_toml_str(content: &str, base_dir: &Path) -> Result<PrefsConfig> {
    let config: PrefsConfig =
        toml::from_str(content).map_err(|e| enhance_toml_error(e, content))?;

    config.validate(base_dir)?;

    Ok(config)
}

/// Enhance TOML parsing errors with helpful context
fn enhance_toml_error(error: toml::de::Error, content: &str) -> anyhow::Error {
    let error_msg = error.to_string();

    let line_hint = error
        .span()
        .map(|span| {
            let end = span.start.min(content.len());
            content.as_bytes()[..end].iter().filter(|b| **b == b'\n').count() + 1
        })
        .or_else(|| {
            error_msg
                .lines()
                .find(|line| line.contains("line "))
                .and_then(|line| {
                    line.split("line ")
                        .nth(1)
                        .and_then(|s| s.split_whitespace().next())
                        .and_then(|s| s.trim_end_matches(',').parse::<usize>().ok())
                })
        });

    if let Some(line_num) = line_hint {
        let context = get_line_context(content, line_num);
        anyhow::anyhow!(
            "TOML parsing error at line {}:\n{}\n\nError: {}",
            line_num,
            context,
            error_msg
        )
    } else {
        anyhow::anyhow!("TOML parsing error: {}", error_msg)
    }
}

/// Get context lines around an error
fn get_line_context(content: &str, line_num: usize) -> String {
    let lines: Vec<&str> = content.lines().collect();
    let start = line_num.saturating_sub(2).min(lines.len());
    let end = (line_num + 2).min(lines.len());

    lines[start..end]
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let num = start + i + 1;
            let marker = if num == line_num { ">>>" } else { "   " };
            format!("{} {:4} | {}", marker, num, line)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Serialize a configuration to TOML string
pub fn to_toml(config: &PrefsConfig) -> Result<String> {
    toml::to_string_pretty(config).with_context(|| "Failed to serialize configuration to TOML")
}
