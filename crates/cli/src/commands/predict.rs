//! Prediction command

use anyhow::Result;
use serde::Serialize;
use tabled::Tabled;

use crate::client::{ApiClient, PredictRequest, Prediction};
use crate::output::{color_tier, format_percent, print_warning, OutputFormat};

/// Row for the prediction table
#[derive(Tabled, Serialize)]
struct PredictionRow {
    #[tabled(rename = "Risk Tier")]
    risk_tier: String,
    #[tabled(rename = "Bankruptcy")]
    bankruptcy_probability: String,
    #[tabled(rename = "Survival")]
    non_bankruptcy_probability: String,
    #[tabled(rename = "Confidence")]
    confidence: String,
    #[tabled(rename = "Prediction")]
    label: String,
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "Generated")]
    generated_at: String,
}

fn format_timestamp(timestamp: i64) -> String {
    chrono::DateTime::from_timestamp(timestamp, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

/// Run one prediction and render the result
pub async fn run(client: &ApiClient, request: PredictRequest, format: OutputFormat) -> Result<()> {
    let prediction: Prediction = client.post("/api/v1/predict", &request).await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&prediction)?);
        }
        OutputFormat::Table => {
            let row = PredictionRow {
                risk_tier: color_tier(&prediction.risk_tier),
                bankruptcy_probability: format_percent(prediction.bankruptcy_probability),
                non_bankruptcy_probability: format_percent(prediction.non_bankruptcy_probability),
                confidence: format_percent(prediction.confidence),
                label: prediction.label.replace('_', " "),
                model: prediction.model_display_name.clone(),
                generated_at: format_timestamp(prediction.generated_at),
            };
            crate::output::print_table(&[row], OutputFormat::Table);

            if let Some(warning) = &prediction.warning {
                print_warning(warning);
            }
        }
    }

    Ok(())
}
