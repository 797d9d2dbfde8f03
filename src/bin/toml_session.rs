use clap::Parser;
use guess_two_thirds::config::cli::absolute_input_path;
use guess_two_thirds::core::ConfigProvider;
use guess_two_thirds::utils::{logger, validation::Validate};
use guess_two_thirds::{ExperimentEngine, LocalStorage, SessionPipeline, TomlConfig};

#[derive(Parser)]
#[command(name = "toml_session")]
#[command(about = "Run a guess-two-thirds session described by a TOML file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "session.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override the RNG seed from config
    #[arg(long)]
    seed: Option<u64>,

    /// Override the guesses file from config
    #[arg(long)]
    guesses: Option<String>,

    /// Override ZIP bundling from config
    #[arg(long)]
    compress: Option<bool>,

    /// Show the session layout without playing it
    #[arg(long)]
    dry_run: bool,
}

fn display_config_summary(config: &TomlConfig) {
    tracing::info!("📋 Session summary:");
    tracing::info!("  Experiment: {}", config.name_in_url());
    tracing::info!(
        "  Participants: {} in groups of {}",
        config.num_participants(),
        config.players_per_group()
    );
    tracing::info!("  Rounds: {}", config.num_rounds());
    tracing::info!(
        "  Jackpot: {} per group and round, guesses 0..={}",
        config.jackpot(),
        config.guess_max()
    );
    match config.guesses_file() {
        Some(file) => tracing::info!("  Guesses: {}", file),
        None => tracing::info!("  Guesses: simulated"),
    }
    tracing::info!(
        "  Output: {} ({}){}",
        config.output_path(),
        config.output_formats().join(", "),
        if config.compress() { " zipped" } else { "" }
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    if config.json_logs() {
        logger::init_json_logger(config.log_level());
    } else {
        logger::init_cli_logger(args.verbose || config.log_level() == Some("debug"));
    }

    tracing::info!("🚀 Starting TOML-based session");
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    if let Some(seed) = args.seed {
        config.session.seed = Some(seed);
        tracing::info!("🔧 Seed overridden to: {}", seed);
    }
    if let Some(guesses) = args.guesses {
        config.session.guesses_file = Some(guesses);
    }
    if let Some(compress) = args.compress {
        config.output.compress = Some(compress);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }

    display_config_summary(&config);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - no rounds will be played");
        return Ok(());
    }

    if let Some(guesses) = config.session.guesses_file.take() {
        config.session.guesses_file = Some(absolute_input_path(&guesses)?);
    }

    let storage = LocalStorage::new(config.output_path().to_string());
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
