use crate::config::StrategyKind;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// `brandlens` - multi-agent brand-guideline scoring for generated marketing assets.
#[derive(Parser, Debug)]
#[command(name = "brandlens")]
#[command(version)]
#[command(about = "Score AI-generated marketing assets against brand guidelines.", long_about = None)]
pub struct Cli {
    /// Config file (default: ~/.brandlens/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate one asset and print the evaluation record as JSON
    Evaluate {
        /// JSON file holding the evaluation request
        #[arg(long)]
        request: PathBuf,

        /// Image to attach for vision scoring
        #[arg(long)]
        image: Option<PathBuf>,

        /// Aggregation strategy (fixed_weight, brand_first); overrides config
        #[arg(long)]
        strategy: Option<StrategyKind>,
    },

    /// Probe every configured LLM provider
    Health,

    /// Write a default config file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn evaluate_parses_strategy() {
        let cli = Cli::try_parse_from([
            "brandlens",
            "--config",
            "/tmp/c.toml",
            "evaluate",
            "--request",
            "req.json",
            "--strategy",
            "brand_first",
        ])
        .unwrap();
        assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("/tmp/c.toml")));
        match cli.command {
            Commands::Evaluate {
                request,
                image,
                strategy,
            } => {
                assert_eq!(request, PathBuf::from("req.json"));
                assert!(image.is_none());
                assert_eq!(strategy, Some(StrategyKind::BrandFirst));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn unknown_strategy_is_rejected() {
        let parsed = Cli::try_parse_from([
            "brandlens",
            "evaluate",
            "--request",
            "r.json",
            "--strategy",
            "median",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn init_config_force_flag() {
        let cli = Cli::try_parse_from(["brandlens", "init-config", "--force"]).unwrap();
        assert!(matches!(cli.command, Commands::InitConfig { force: true }));
    }
}
