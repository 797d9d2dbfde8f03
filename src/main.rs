use clap::Parser;
use guess_two_thirds::config::cli::absolute_input_path;
use guess_two_thirds::utils::{logger, validation::Validate};
use guess_two_thirds::{CliConfig, ExperimentEngine, LocalStorage, SessionPipeline};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting guess-two-thirds session");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }

    // 輸入檔案相對於目前目錄，而非輸出目錄
    if let Some(guesses) = config.guesses.take() {
        config.guesses = Some(absolute_input_path(&guesses)?);
    }

    let storage = LocalStorage::new(config.output_path.clone());
    let pipeline = SessionPipeline::new(storage, config);
    let engine = ExperimentEngine::new(pipeline);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Session completed successfully!");
            println!("✅ Session completed successfully!");
            println!("📁 Results saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Session failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = e.exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
