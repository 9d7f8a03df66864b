use super::commands::{Cli, Commands};
use super::input::{load_image, load_request};
use crate::config::{Config, StrategyKind};
use crate::llm::LlmGateway;
use crate::orchestrator::create_orchestrator;
use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Run a parsed command against a loaded config. `init-config` is handled
/// by [`init_config`] before any config is loaded.
pub async fn dispatch(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Commands::Evaluate {
            request,
            image,
            strategy,
        } => run_evaluate(config, &request, image.as_deref(), strategy).await,
        Commands::Health => run_health(&config).await,
        Commands::InitConfig { force } => init_config(cli.config, force),
    }
}

async fn run_evaluate(
    mut config: Config,
    request_path: &Path,
    image_path: Option<&Path>,
    strategy: Option<StrategyKind>,
) -> Result<()> {
    if let Some(strategy) = strategy {
        config.orchestrator.strategy = strategy;
    }

    let mut request = load_request(request_path).await?;
    if let Some(path) = image_path {
        request.image = Some(load_image(path).await?);
    }

    let gateway = Arc::new(LlmGateway::from_config(&config.llm));
    let orchestrator = create_orchestrator(&config, gateway);
    info!(
        strategy = %orchestrator.strategy(),
        asset = request.asset_path.as_str(),
        "Evaluating asset"
    );

    let record = orchestrator.evaluate(request).await;
    println!(
        "{}",
        serde_json::to_string_pretty(&record).context("Failed to serialize evaluation record")?
    );
    Ok(())
}

async fn run_health(config: &Config) -> Result<()> {
    let gateway = LlmGateway::from_config(&config.llm);
    let configured = gateway.configured_count();
    info!(
        configured,
        providers = ?gateway.provider_names(),
        "Probing LLM providers"
    );
    if configured == 0 {
        warn!("No provider has credentials; every probe will report false");
    }
    let report = gateway.health_check().await;
    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("Failed to serialize health report")?
    );
    Ok(())
}

/// Write the built-in defaults to `path` (or the default location).
pub fn init_config(path: Option<PathBuf>, force: bool) -> Result<()> {
    let Some(path) = path.or_else(Config::default_path) else {
        bail!("Could not resolve a home directory; pass --config explicitly");
    };
    if path.exists() && !force {
        bail!(
            "Config file {} already exists (use --force to overwrite)",
            path.display()
        );
    }

    let config = Config {
        config_path: path,
        ..Config::default()
    };
    config.save()?;
    println!("Wrote default config to {}", config.config_path.display());
    Ok(())
}
