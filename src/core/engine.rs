use crate::core::Pipeline;
use crate::utils::error::Result;

pub struct ExperimentEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> ExperimentEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// Runs the whole session and returns where the results were written.
    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting experiment session...");

        let guesses = self.pipeline.extract().await?;
        tracing::info!("Collected {} guesses", guesses.len());

        let outcome = self.pipeline.transform(guesses).await?;
        tracing::info!(
            "Played {} rounds, {} paid out to {} participants",
            outcome.rounds.len(),
            outcome.total_paid(),
            outcome.participants.len()
        );

        let output_path = self.pipeline.load(outcome).await?;
        tracing::info!("Results saved to: {}", output_path);

        Ok(output_path)
    }
}
