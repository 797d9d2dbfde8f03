pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use self::command_line::CliConfig;

#[cfg(feature = "cli")]
mod command_line {
    use crate::core::ConfigProvider;
    use crate::domain::currency::Currency;
    use crate::utils::error::Result;
    use crate::utils::validation::{
        validate_file_extensions, validate_multiple_of, validate_non_empty_string,
        validate_output_formats, validate_path, validate_positive_number, Validate,
    };
    use clap::Parser;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize, Deserialize, Parser)]
    #[command(name = "guess-two-thirds")]
    #[command(about = "Run a 'guess 2/3 of the average' session and write the results")]
    pub struct CliConfig {
        #[arg(long, default_value = "guess_two_thirds")]
        pub name_in_url: String,

        #[arg(long, default_value = "8")]
        pub players_per_group: u32,

        #[arg(long, default_value = "8")]
        pub num_rounds: u32,

        #[arg(long, default_value = "16")]
        pub num_participants: u32,

        #[arg(long, default_value = "20")]
        pub jackpot: Currency,

        #[arg(long, default_value = "100")]
        pub guess_max: u32,

        #[arg(long, help = "Seed for grouping and simulated guesses")]
        pub seed: Option<u64>,

        #[arg(long, help = "CSV file with round,participant,guess rows")]
        pub guesses: Option<String>,

        #[arg(long, default_value = "./output")]
        pub output_path: String,

        #[arg(long, value_delimiter = ',', default_values = ["csv", "tsv", "json"])]
        pub output_formats: Vec<String>,

        #[arg(long, help = "Bundle all output files into one ZIP archive")]
        pub compress: bool,

        #[arg(long, help = "Enable verbose output")]
        pub verbose: bool,
    }

    impl ConfigProvider for CliConfig {
        fn name_in_url(&self) -> &str {
            &self.name_in_url
        }

        fn players_per_group(&self) -> u32 {
            self.players_per_group
        }

        fn num_rounds(&self) -> u32 {
            self.num_rounds
        }

        fn num_participants(&self) -> u32 {
            self.num_participants
        }

        fn jackpot(&self) -> Currency {
            self.jackpot
        }

        fn guess_max(&self) -> u32 {
            self.guess_max
        }

        fn seed(&self) -> Option<u64> {
            self.seed
        }

        fn guesses_file(&self) -> Option<&str> {
            self.guesses.as_deref()
        }

        fn output_path(&self) -> &str {
            &self.output_path
        }

        fn output_formats(&self) -> &[String] {
            &self.output_formats
        }

        fn compress(&self) -> bool {
            self.compress
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validate_non_empty_string("name_in_url", &self.name_in_url)?;
            validate_positive_number("players_per_group", self.players_per_group, 1)?;
            validate_positive_number("num_rounds", self.num_rounds, 1)?;
            validate_positive_number("num_participants", self.num_participants, self.players_per_group)?;
            validate_multiple_of("num_participants", self.num_participants, self.players_per_group)?;
            if !self.jackpot.is_positive() {
                return Err(crate::utils::error::GameError::InvalidConfigValueError {
                    field: "jackpot".to_string(),
                    value: self.jackpot.to_string(),
                    reason: "Jackpot must be positive".to_string(),
                });
            }
            if let Some(guesses) = &self.guesses {
                validate_path("guesses", guesses)?;
                validate_file_extensions("guesses", std::slice::from_ref(guesses), &["csv"])?;
            }
            validate_path("output_path", &self.output_path)?;
            validate_output_formats("output_formats", &self.output_formats)
        }
    }

}
