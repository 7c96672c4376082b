// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{RearingError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = RearingError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.store, raw.cycle, raw.frame))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_store(cfg)?;
    validate_frame(cfg)?;
    Ok(())
}

fn validate_store(cfg: &RawConfigFile) -> Result<()> {
    if cfg.store.timeout_ms == 0 {
        return Err(RearingError::ConfigError(
            "[store].timeout_ms must be >= 1 (got 0)".to_string(),
        ));
    }
    if cfg.store.snapshot.as_os_str().is_empty() {
        return Err(RearingError::ConfigError(
            "[store].snapshot must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_frame(cfg: &RawConfigFile) -> Result<()> {
    if cfg.frame.default_cell_count == 0 {
        return Err(RearingError::ConfigError(
            "[frame].default_cell_count must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> Result<ConfigFile> {
        let raw: RawConfigFile = toml::from_str(src)?;
        ConfigFile::try_from(raw)
    }

    #[test]
    fn empty_file_uses_defaults() {
        let cfg = parse("").unwrap();
        assert_eq!(cfg, ConfigFile::default());
        assert_eq!(cfg.store().timeout_ms, 5000);
        assert!(cfg.cycle().close_on_final_step);
        assert_eq!(cfg.frame().default_cell_count, 20);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = parse("[store]\ntimeout_ms = 0\n").unwrap_err();
        assert!(matches!(err, RearingError::ConfigError(ref msg) if msg.contains("timeout_ms")));
    }

    #[test]
    fn zero_cells_is_rejected() {
        let err = parse("[frame]\ndefault_cell_count = 0\n").unwrap_err();
        assert!(matches!(err, RearingError::ConfigError(ref msg) if msg.contains("default_cell_count")));
    }

    #[test]
    fn empty_snapshot_path_is_rejected() {
        let err = parse("[store]\nsnapshot = \"\"\n").unwrap_err();
        assert!(matches!(err, RearingError::ConfigError(_)));
    }

    #[test]
    fn unknown_keys_are_a_parse_error() {
        let err = parse("[cycle]\nclose_early = true\n").unwrap_err();
        assert!(matches!(err, RearingError::TomlError(_)));
    }
}
