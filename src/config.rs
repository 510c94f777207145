use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use xdg::BaseDirectories;

use crate::dataset::Variant;
use crate::error::ConfigError;

/// 設定ファイルの場所を上書きする環境変数
pub const CONFIG_ENV: &str = "DESCVAL_CONFIG";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 結果 CSV を置くディレクトリ（作業ディレクトリからの相対パス可）
    pub output_dir: PathBuf,
    /// Fixed RNG seed. Random per run when unset.
    pub seed: Option<u64>,
    pub output: OutputConfig,
    pub keybindings: KeybindingsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub absolute: String,
    pub blind: String,
    pub three_way: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeybindingsConfig {
    pub worse: char,
    pub same: char,
    pub better: char,
    pub option_1: char,
    pub option_2: char,
    pub reset: char,
    pub upload: char,
    pub help: char,
    pub quit: char,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            seed: None,
            output: OutputConfig::default(),
            keybindings: KeybindingsConfig::default(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            absolute: "graded_descriptions.csv".to_owned(),
            blind: "blind_comparison.csv".to_owned(),
            three_way: "pairwise_comparison.csv".to_owned(),
        }
    }
}

impl Default for KeybindingsConfig {
    fn default() -> Self {
        Self {
            worse: '1',
            same: '2',
            better: '3',
            option_1: '1',
            option_2: '2',
            reset: 'R',
            upload: 'u',
            help: '?',
            quit: 'q',
        }
    }
}

/// 設定で変更できない固定キー
pub const FOCUS_LEFT_KEY: char = 'h';
pub const FOCUS_RIGHT_KEY: char = 'l';
pub const PRESS_KEY: char = ' ';
pub const RETRY_SAVE_KEY: char = 's';
pub const SCROLL_DOWN_KEY: char = 'j';
pub const SCROLL_UP_KEY: char = 'k';

const FIXED_KEYS: [(&str, char); 6] = [
    ("focus_left", FOCUS_LEFT_KEY),
    ("focus_right", FOCUS_RIGHT_KEY),
    ("press", PRESS_KEY),
    ("retry_save", RETRY_SAVE_KEY),
    ("scroll_down", SCROLL_DOWN_KEY),
    ("scroll_up", SCROLL_UP_KEY),
];

impl KeybindingsConfig {
    /// Choice keys of one variant must be distinct from each other, from
    /// the control keys and from the fixed keys. Keys of different variants
    /// may overlap.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let controls = [
            ("reset", self.reset),
            ("upload", self.upload),
            ("help", self.help),
            ("quit", self.quit),
        ];
        let grading = [
            ("worse", self.worse),
            ("same", self.same),
            ("better", self.better),
        ];
        let pairwise = [("option_1", self.option_1), ("option_2", self.option_2)];

        for choices in [&grading[..], &pairwise[..]] {
            let keys: Vec<(&'static str, char)> =
                choices
                    .iter()
                    .chain(controls.iter())
                    .chain(FIXED_KEYS.iter())
                    .copied()
                    .collect();
            for (i, &(first, key)) in keys.iter().enumerate() {
                if let Some(&(second, _)) = keys[i + 1..].iter().find(|(_, other)| *other == key) {
                    return Err(ConfigError::DuplicateKey { key, first, second });
                }
            }
        }
        Ok(())
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let config: Self = if path.exists() {
            let content = fs::read_to_string(path).context("Failed to read config file")?;
            toml::from_str(&content).context("Failed to parse config file")?
        } else {
            Self::default()
        };
        config
            .keybindings
            .validate()
            .context("Invalid keybindings in config file")?;
        Ok(config)
    }

    /// `$DESCVAL_CONFIG` → `~/.config/descval/config.toml`
    pub fn config_path() -> PathBuf {
        if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
            return PathBuf::from(path);
        }
        BaseDirectories::with_prefix("descval")
            .map(|dirs| dirs.get_config_home())
            .unwrap_or_else(|_| PathBuf::from(".config/descval"))
            .join("config.toml")
    }

    /// Default result file for a variant.
    pub fn output_path(&self, variant: Variant) -> PathBuf {
        let file = match variant {
            Variant::Absolute => &self.output.absolute,
            Variant::Blind => &self.output.blind,
            Variant::ThreeWay => &self.output.three_way,
        };
        self.output_dir.join(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.output_dir, PathBuf::from("output"));
        assert_eq!(config.seed, None);
        assert_eq!(config.keybindings.better, '3');
        assert_eq!(
            config.output_path(Variant::Absolute),
            PathBuf::from("output/graded_descriptions.csv")
        );
    }

    #[test]
    fn test_partial_override() {
        let config: Config = toml::from_str(
            r#"
seed = 7

[output]
blind = "blind.csv"

[keybindings]
option_1 = 'a'
option_2 = 'b'
"#,
        )
        .unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.output_path(Variant::Blind), PathBuf::from("output/blind.csv"));
        assert_eq!(
            config.output_path(Variant::ThreeWay),
            PathBuf::from("output/pairwise_comparison.csv")
        );
        assert_eq!(config.keybindings.option_1, 'a');
        assert_eq!(config.keybindings.worse, '1');
    }

    #[test]
    fn test_default_keybindings_are_valid() {
        assert_eq!(KeybindingsConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_duplicate_choice_keys_rejected() {
        let kb = KeybindingsConfig {
            same: '1',
            ..KeybindingsConfig::default()
        };
        assert_eq!(
            kb.validate(),
            Err(ConfigError::DuplicateKey {
                key: '1',
                first: "worse",
                second: "same",
            })
        );
    }

    #[test]
    fn test_choice_key_colliding_with_quit_rejected() {
        let kb = KeybindingsConfig {
            option_2: 'q',
            ..KeybindingsConfig::default()
        };
        assert!(matches!(
            kb.validate(),
            Err(ConfigError::DuplicateKey { key: 'q', .. })
        ));
    }

    #[test]
    fn test_control_key_colliding_with_fixed_key_rejected() {
        let kb = KeybindingsConfig {
            upload: 's',
            ..KeybindingsConfig::default()
        };
        assert_eq!(
            kb.validate(),
            Err(ConfigError::DuplicateKey {
                key: 's',
                first: "upload",
                second: "retry_save",
            })
        );
    }

    #[test]
    fn test_choice_key_colliding_with_fixed_key_rejected() {
        let kb = KeybindingsConfig {
            worse: 'j',
            ..KeybindingsConfig::default()
        };
        assert!(matches!(
            kb.validate(),
            Err(ConfigError::DuplicateKey {
                key: 'j',
                second: "scroll_down",
                ..
            })
        ));
    }

    #[test]
    fn test_load_from_rejects_invalid_keybindings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[keybindings]\nbetter = '?'\n").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_load_from_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.output.three_way, "pairwise_comparison.csv");
    }

    #[test]
    #[serial]
    fn test_config_path_env_override() {
        std::env::set_var(CONFIG_ENV, "/tmp/descval-test/config.toml");
        assert_eq!(
            Config::config_path(),
            PathBuf::from("/tmp/descval-test/config.toml")
        );
        std::env::remove_var(CONFIG_ENV);
        assert!(Config::config_path().ends_with("descval/config.toml"));
    }
}
