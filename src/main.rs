use clap::Parser;
use gasprice_admin::cli::{Cli, Commands, Context};
use gasprice_admin::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
            eprintln!("Using default configuration");
            Config::from_toml(include_str!("../config.toml.example"))?
        }
    };

    // Initialize telemetry
    let _telemetry = gasprice_admin::telemetry::init_telemetry(&config.telemetry)?;

    if let Commands::Config = cli.command {
        println!("Current configuration:");
        println!("  Backend: {}", config.backend.url);
        let api_key = if config.backend.api_key.is_empty() {
            "(not set)"
        } else {
            "(set)"
        };
        println!("  API key: {}", api_key);
        println!(
            "  Moderation: threshold={}, page_size={}, actor={}",
            config.moderation.deviation_threshold,
            config.moderation.page_size,
            config.moderation.actor
        );
        println!("  Annotator: {:?}", config.annotator.mode);
        println!("  Reports: {}", config.reports.output_dir.display());
        return Ok(());
    }

    let ctx = Context::new(config, cli.offline);

    match cli.command {
        Commands::Classify(args) => args.execute(&ctx).await?,
        Commands::Queue(args) => args.execute(&ctx).await?,
        Commands::Decide(args) => args.execute(&ctx).await?,
        Commands::Report(args) => args.execute(&ctx).await?,
        Commands::Stations(args) => args.execute(&ctx).await?,
        Commands::Users(args) => args.execute(&ctx).await?,
        Commands::Notify(args) => args.execute(&ctx).await?,
        Commands::Config => {}
    }

    Ok(())
}
