use crate::domain::currency::Currency;
use crate::domain::model::{GuessRecord, SessionOutcome};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn name_in_url(&self) -> &str;
    fn players_per_group(&self) -> u32;
    fn num_rounds(&self) -> u32;
    fn num_participants(&self) -> u32;
    fn jackpot(&self) -> Currency;
    fn guess_max(&self) -> u32;
    fn seed(&self) -> Option<u64>;
    /// CSV with `round,participant,guess`; `None` means simulated guesses.
    fn guesses_file(&self) -> Option<&str>;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[String];
    fn compress(&self) -> bool;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<GuessRecord>>;
    async fn transform(&self, data: Vec<GuessRecord>) -> Result<SessionOutcome>;
    async fn load(&self, result: SessionOutcome) -> Result<String>;
}
