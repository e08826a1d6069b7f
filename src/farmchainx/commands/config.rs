use crate::commands::{CmdMessage, CmdResult};
use crate::config::FarmchainxConfig;
use crate::error::Result;
use std::path::Path;

#[derive(Debug, Clone)]
pub enum ConfigAction {
    ShowAll,
    ShowKey(String),
    Set(String, String),
}

pub fn run(config_dir: &Path, action: ConfigAction) -> Result<CmdResult> {
    match action {
        ConfigAction::ShowAll => {
            let config = FarmchainxConfig::load(config_dir)?;
            Ok(CmdResult::default().with_config(config))
        }
        ConfigAction::ShowKey(key) => {
            let config = FarmchainxConfig::load(config_dir)?;
            let mut result = CmdResult::default();
            match config.get(&key) {
                Some(val) => result.add_message(CmdMessage::info(val)),
                None => {
                    result.add_message(CmdMessage::error(format!("Unknown config key: {}", key)))
                }
            }
            Ok(result)
        }
        ConfigAction::Set(key, value) => {
            let mut config = FarmchainxConfig::load(config_dir)?;
            if let Err(e) = config.set(&key, &value) {
                let mut res = CmdResult::default();
                res.add_message(CmdMessage::error(e.to_string()));
                return Ok(res);
            }
            config.save(config_dir)?;

            let display_val = config.get(&key).unwrap_or(value);
            let mut result = CmdResult::default().with_config(config);
            result.add_message(CmdMessage::success(format!(
                "{} set to {}",
                key, display_val
            )));
            Ok(result)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use tempfile::tempdir;

    #[test]
    fn show_all_returns_default_config_when_no_file() {
        let temp = tempdir().unwrap();
        let result = run(temp.path(), ConfigAction::ShowAll).unwrap();
        assert_eq!(result.config, Some(FarmchainxConfig::default()));
    }

    #[test]
    fn show_key_returns_value_for_known_key() {
        let temp = tempdir().unwrap();
        let result = run(
            temp.path(),
            ConfigAction::ShowKey("expiry-window-days".to_string()),
        )
        .unwrap();

        assert_eq!(result.messages, [CmdMessage::info("3")]);
    }

    #[test]
    fn show_key_returns_error_for_unknown_key() {
        let temp = tempdir().unwrap();
        let result = run(temp.path(), ConfigAction::ShowKey("nope".to_string())).unwrap();
        assert_eq!(result.count(MessageLevel::Error), 1);
        assert!(result.messages[0].content.contains("nope"));
    }

    #[test]
    fn set_persists_value() {
        let temp = tempdir().unwrap();
        let result = run(
            temp.path(),
            ConfigAction::Set("low-stock-threshold".to_string(), "50".to_string()),
        )
        .unwrap();

        assert_eq!(result.count(MessageLevel::Success), 1);
        assert_eq!(
            FarmchainxConfig::load(temp.path())
                .unwrap()
                .low_stock_threshold,
            50
        );
    }

    #[test]
    fn set_invalid_value_reports_error_without_saving() {
        let temp = tempdir().unwrap();
        let result = run(
            temp.path(),
            ConfigAction::Set("low-stock-threshold".to_string(), "many".to_string()),
        )
        .unwrap();

        assert_eq!(result.count(MessageLevel::Error), 1);
        assert!(!temp.path().join("config.json").exists());
    }
}
