//! Bankruptcy Risk Analyzer CLI
//!
//! A command-line tool for running bankruptcy predictions against a
//! risk-analyzer service and inspecting its loaded models and health.

mod client;
mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use commands::{health, models, predict};

/// Bankruptcy Risk Analyzer CLI
#[derive(Parser)]
#[command(name = "brisk")]
#[command(author, version, about = "CLI for the Bankruptcy Risk Analyzer", long_about = None)]
pub struct Cli {
    /// API endpoint URL (can also be set via BRISK_API_URL env var)
    #[arg(long, env = "BRISK_API_URL", default_value = "http://localhost:8080")]
    pub api_url: String,

    /// Output format
    #[arg(long, short, default_value = "table")]
    pub format: output::OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a bankruptcy prediction from six qualitative ratings
    Predict {
        /// Industrial risk rating
        #[arg(long, value_enum)]
        industrial_risk: Rating,

        /// Management risk rating
        #[arg(long, value_enum)]
        management_risk: Rating,

        /// Financial flexibility rating
        #[arg(long, value_enum)]
        financial_flexibility: Rating,

        /// Credibility rating
        #[arg(long, value_enum)]
        credibility: Rating,

        /// Competitiveness rating
        #[arg(long, value_enum)]
        competitiveness: Rating,

        /// Operating risk rating
        #[arg(long, value_enum)]
        operating_risk: Rating,

        /// Model to predict with (defaults to the service's preference)
        #[arg(long, value_enum)]
        model: Option<ModelArg>,
    },

    /// List the models loaded by the analyzer
    Models,

    /// Show analyzer component health
    Health,
}

/// One ordinal rating on the three-point assessment scale
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Rating {
    Low,
    Medium,
    High,
}

impl Rating {
    /// Numeric value the models were trained on
    pub fn score(self) -> f64 {
        match self {
            Rating::Low => 0.0,
            Rating::Medium => 0.5,
            Rating::High => 1.0,
        }
    }
}

/// Selectable model identity
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModelArg {
    Ensemble,
    BestSingle,
}

impl ModelArg {
    pub fn as_str(self) -> &'static str {
        match self {
            ModelArg::Ensemble => "ensemble",
            ModelArg::BestSingle => "best_single",
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = client::ApiClient::new(&cli.api_url)?;

    match cli.command {
        Commands::Predict {
            industrial_risk,
            management_risk,
            financial_flexibility,
            credibility,
            competitiveness,
            operating_risk,
            model,
        } => {
            let request = client::PredictRequest {
                industrial_risk: industrial_risk.score(),
                management_risk: management_risk.score(),
                financial_flexibility: financial_flexibility.score(),
                credibility: credibility.score(),
                competitiveness: competitiveness.score(),
                operating_risk: operating_risk.score(),
                model: model.map(|m| m.as_str().to_string()),
            };
            predict::run(&client, request, cli.format).await
        }
        Commands::Models => models::run(&client, cli.format).await,
        Commands::Health => health::run(&client, cli.format).await,
    }
}
