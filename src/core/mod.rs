pub mod engine;
pub mod history;
pub mod payoff;
pub mod pipeline;
pub mod session;
pub mod summary;

pub use crate::domain::model::{GuessRecord, SessionOutcome};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
