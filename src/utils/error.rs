use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Guess {guess} is outside the allowed range 0..={max}")]
    GuessOutOfRange { guess: u32, max: u32 },

    #[error("Cannot compute payoffs for an empty group")]
    EmptyGroup,

    #[error("Participant {participant} has no guess for round {round}")]
    MissingGuess { participant: u32, round: u32 },

    #[error("Participant {participant} already submitted a guess for round {round}")]
    DuplicateGuess { participant: u32, round: u32 },

    #[error("Group {group} in round {round} already has its payoffs set")]
    GroupAlreadyFinalized { round: u32, group: u32 },

    #[error("Group {group} in round {round} has not been finalized yet")]
    GroupNotFinalized { round: u32, group: u32 },

    #[error("Round {round} is incomplete: {missing} guesses missing")]
    IncompleteRound { round: u32, missing: usize },

    #[error("Unknown participant: {participant}")]
    UnknownParticipant { participant: u32 },

    #[error("Unknown round: {round}")]
    UnknownRound { round: u32 },

    #[error("Unknown group {group} in round {round}")]
    UnknownGroup { round: u32, group: u32 },

    #[error("No role is defined for position {position} in group")]
    RoleOutOfTable { position: u32 },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Gameplay,
    Configuration,
    Io,
    Serialization,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl GameError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            GameError::GuessOutOfRange { .. }
            | GameError::MissingGuess { .. }
            | GameError::DuplicateGuess { .. }
            | GameError::UnknownParticipant { .. } => ErrorCategory::Input,
            GameError::EmptyGroup
            | GameError::GroupAlreadyFinalized { .. }
            | GameError::GroupNotFinalized { .. }
            | GameError::IncompleteRound { .. }
            | GameError::UnknownRound { .. }
            | GameError::UnknownGroup { .. }
            | GameError::RoleOutOfTable { .. } => ErrorCategory::Gameplay,
            GameError::ConfigError { .. }
            | GameError::ConfigValidationError { .. }
            | GameError::InvalidConfigValueError { .. }
            | GameError::MissingConfigError { .. } => ErrorCategory::Configuration,
            GameError::IoError(_) | GameError::ZipError(_) => ErrorCategory::Io,
            GameError::CsvError(_)
            | GameError::SerializationError(_)
            | GameError::ProcessingError { .. } => ErrorCategory::Serialization,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::Medium,
            ErrorCategory::Gameplay | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Serialization => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            GameError::GuessOutOfRange { max, .. } => {
                format!("Guesses must be whole numbers between 0 and {}", max)
            }
            GameError::MissingGuess { .. } | GameError::IncompleteRound { .. } => {
                "Make sure the guesses file has one row per participant and round".to_string()
            }
            GameError::DuplicateGuess { .. } => {
                "Remove repeated (round, participant) rows from the guesses file".to_string()
            }
            GameError::UnknownParticipant { .. } | GameError::UnknownRound { .. } => {
                "Check num_participants and num_rounds against the guesses file".to_string()
            }
            GameError::RoleOutOfTable { .. } => {
                "Roles exist for positions 1 to 4 only".to_string()
            }
            GameError::ConfigError { .. }
            | GameError::ConfigValidationError { .. }
            | GameError::InvalidConfigValueError { .. }
            | GameError::MissingConfigError { .. } => {
                "Review the configuration file or command line flags".to_string()
            }
            GameError::IoError(_) | GameError::ZipError(_) => {
                "Check that the input file exists and the output path is writable".to_string()
            }
            GameError::CsvError(_) => {
                "The guesses file must be CSV with header round,participant,guess".to_string()
            }
            _ => "This indicates an internal error; please report it".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Input => format!("Invalid guess input: {}", self),
            ErrorCategory::Gameplay => format!("The experiment could not proceed: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Io => format!("File access failed: {}", self),
            ErrorCategory::Serialization => format!("Could not read or write data: {}", self),
        }
    }

    /// Process exit code used by the binaries.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, GameError>;
