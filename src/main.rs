use clap::Parser;
use divscan::cli::{render_config, Cli, Commands};
use divscan::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = Config::load(&cli.config).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
        eprintln!("Using default configuration");
        Config::default()
    });
    config.apply_env_overrides();
    config.validate()?;

    // Initialize telemetry
    let _telemetry = divscan::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Run(args) => {
            tracing::info!("Starting divergence scanner");
            args.execute(&config).await?;
        }
        Commands::Scan(args) => {
            args.execute(&config).await?;
        }
        Commands::Symbols(args) => {
            args.execute(&config)?;
        }
        Commands::Config => {
            println!("{}", render_config(&config)?);
        }
    }

    Ok(())
}
