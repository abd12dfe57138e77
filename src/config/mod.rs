mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config = parse_config(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    tracing::debug!("Loaded config from {:?}", path);
    Ok(config)
}

/// Parse and validate configuration from a TOML string
pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content)?;
    validate_config(&config)?;
    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    // Try default locations
    let default_paths = ["./swarmscore.toml", "~/.config/swarmscore/config.toml"];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    config
        .interpret
        .validate()
        .context("Invalid [interpret] section")?;

    if config.ancestry.synthetic_id_prefix.is_empty() {
        anyhow::bail!("ancestry.synthetic_id_prefix cannot be empty");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.interpret.max_pause_within_segment, 1.0);
        assert!(config.interpret.max_segment_duration.is_none());
        assert_eq!(config.ancestry.synthetic_id_prefix, "n");
        assert!(!config.session.ignore_undescribed_files);
    }

    #[test]
    fn parses_all_sections() {
        let config = parse_config(
            r#"
            [session]
            ignore_undescribed_files = true

            [interpret]
            max_pause_within_segment = 0.5
            max_segment_duration = 3.0

            [ancestry]
            synthetic_id_prefix = "fused-"
            "#,
        )
        .unwrap();
        assert!(config.session.ignore_undescribed_files);
        assert_eq!(config.interpret.max_pause_within_segment, 0.5);
        assert_eq!(config.interpret.max_segment_duration, Some(3.0));
        assert_eq!(config.ancestry.synthetic_id_prefix, "fused-");
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(parse_config("[interpret]\nmax_pause_within_segment = -1.0\n").is_err());
        assert!(parse_config("[interpret]\nmax_segment_duration = 0.0\n").is_err());
        assert!(parse_config("[ancestry]\nsynthetic_id_prefix = \"\"\n").is_err());
    }

    #[test]
    fn load_config_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[interpret]\nmax_segment_duration = 2.5").unwrap();
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.interpret.max_segment_duration, Some(2.5));
    }

    #[test]
    fn load_config_reports_missing_file() {
        let err = load_config(Path::new("/nonexistent/swarmscore.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
