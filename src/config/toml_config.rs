use crate::core::ConfigProvider;
use crate::domain::currency::Currency;
use crate::utils::error::{GameError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub experiment: ExperimentConfig,
    pub session: SessionConfig,
    pub output: OutputConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentConfig {
    pub name_in_url: Option<String>,
    pub players_per_group: Option<u32>,
    pub num_rounds: Option<u32>,
    pub jackpot: Option<Currency>,
    pub guess_max: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub num_participants: u32,
    pub seed: Option<u64>,
    pub guesses_file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub output_path: String,
    pub output_formats: Vec<String>,
    pub compress: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub json: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(GameError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| GameError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${GUESSES_FILE})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| GameError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("experiment.name_in_url", self.name_in_url())?;
        validation::validate_positive_number(
            "experiment.players_per_group",
            self.players_per_group(),
            1,
        )?;
        validation::validate_positive_number("experiment.num_rounds", self.num_rounds(), 1)?;
        validation::validate_range("experiment.guess_max", self.guess_max(), 1, 1_000_000)?;

        if !self.jackpot().is_positive() {
            return Err(GameError::InvalidConfigValueError {
                field: "experiment.jackpot".to_string(),
                value: self.jackpot().to_string(),
                reason: "Jackpot must be positive".to_string(),
            });
        }

        validation::validate_positive_number(
            "session.num_participants",
            self.session.num_participants,
            self.players_per_group(),
        )?;
        validation::validate_multiple_of(
            "session.num_participants",
            self.session.num_participants,
            self.players_per_group(),
        )?;

        if let Some(file) = &self.session.guesses_file {
            if file.contains("${") {
                return Err(GameError::MissingConfigError {
                    field: format!("session.guesses_file ({})", file),
                });
            }
            validation::validate_path("session.guesses_file", file)?;
            validation::validate_file_extensions(
                "session.guesses_file",
                std::slice::from_ref(file),
                &["csv"],
            )?;
        }

        validation::validate_path("output.output_path", &self.output.output_path)?;
        validation::validate_output_formats("output.output_formats", &self.output.output_formats)
    }

    pub fn log_level(&self) -> Option<&str> {
        self.logging.as_ref().and_then(|l| l.level.as_deref())
    }

    pub fn json_logs(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn name_in_url(&self) -> &str {
        self.experiment
            .name_in_url
            .as_deref()
            .unwrap_or("guess_two_thirds")
    }

    fn players_per_group(&self) -> u32 {
        self.experiment.players_per_group.unwrap_or(8)
    }

    fn num_rounds(&self) -> u32 {
        self.experiment.num_rounds.unwrap_or(8)
    }

    fn num_participants(&self) -> u32 {
        self.session.num_participants
    }

    fn jackpot(&self) -> Currency {
        self.experiment
            .jackpot
            .unwrap_or(Currency::from_units(20))
    }

    fn guess_max(&self) -> u32 {
        self.experiment.guess_max.unwrap_or(100)
    }

    fn seed(&self) -> Option<u64> {
        self.session.seed
    }

    fn guesses_file(&self) -> Option<&str> {
        self.session.guesses_file.as_deref()
    }

    fn output_path(&self) -> &str {
        &self.output.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.output.output_formats
    }

    fn compress(&self) -> bool {
        self.output.compress.unwrap_or(false)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[experiment]
name_in_url = "beauty_contest"
players_per_group = 4
num_rounds = 3
jackpot = 12.5
guess_max = 50

[session]
num_participants = 8
seed = 42
guesses_file = "guesses.csv"

[output]
output_path = "./results"
output_formats = ["csv", "json"]
compress = true

[logging]
level = "debug"
json = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.name_in_url(), "beauty_contest");
        assert_eq!(config.players_per_group(), 4);
        assert_eq!(config.num_rounds(), 3);
        assert_eq!(config.jackpot(), Currency::from_cents(1250));
        assert_eq!(config.guess_max(), 50);
        assert_eq!(config.seed(), Some(42));
        assert_eq!(config.guesses_file(), Some("guesses.csv"));
        assert!(config.compress());
        assert_eq!(config.log_level(), Some("debug"));
        assert!(config.json_logs());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults_follow_experiment_constants() {
        let toml_content = r#"
[experiment]

[session]
num_participants = 16

[output]
output_path = "./output"
output_formats = ["csv"]
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.name_in_url(), "guess_two_thirds");
        assert_eq!(config.players_per_group(), 8);
        assert_eq!(config.num_rounds(), 8);
        assert_eq!(config.jackpot(), Currency::from_units(20));
        assert_eq!(config.guess_max(), 100);
        assert!(!config.compress());
        assert!(!config.json_logs());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("GTT_TEST_GUESSES", "/data/round_guesses.csv");

        let toml_content = r#"
[experiment]

[session]
num_participants = 8
guesses_file = "${GTT_TEST_GUESSES}"

[output]
output_path = "./output"
output_formats = ["json"]
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.guesses_file(), Some("/data/round_guesses.csv"));

        std::env::remove_var("GTT_TEST_GUESSES");
    }

    #[test]
    fn test_non_finite_jackpot_is_rejected() {
        for jackpot in ["inf", "nan", "1e20"] {
            let toml_content = format!(
                "[experiment]\njackpot = {}\n\n[session]\nnum_participants = 16\n\n[output]\noutput_path = \"./output\"\noutput_formats = [\"csv\"]\n",
                jackpot
            );
            assert!(matches!(
                TomlConfig::from_toml_str(&toml_content),
                Err(GameError::ConfigValidationError { .. })
            ));
        }
    }

    #[test]
    fn test_unset_env_var_fails_validation() {
        let toml_content = r#"
[experiment]
players_per_group = 2

[session]
num_participants = 2
guesses_file = "${GTT_TEST_SURELY_UNSET_VARIABLE}"

[output]
output_path = "./output"
output_formats = ["json"]
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(matches!(
            config.validate(),
            Err(GameError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[experiment]
players_per_group = 8

[session]
num_participants = 12

[output]
output_path = "./output"
output_formats = ["csv"]
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        assert!(matches!(
            TomlConfig::from_toml_str("[experiment\nplayers = "),
            Err(GameError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[experiment]
name_in_url = "file_test"

[session]
num_participants = 8

[output]
output_path = "./output"
output_formats = ["tsv"]
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.name_in_url(), "file_test");
    }
}
