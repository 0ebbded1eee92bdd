//! Model listing command

use anyhow::Result;
use serde::Serialize;
use tabled::Tabled;

use crate::client::{ApiClient, ModelsResponse};
use crate::output::{format_percent, print_table, print_warning, OutputFormat};

/// Row for the models table
#[derive(Tabled, Serialize)]
struct ModelRow {
    #[tabled(rename = "Identity")]
    identity: String,
    #[tabled(rename = "Name")]
    display_name: String,
    #[tabled(rename = "Default")]
    default: String,
    #[tabled(rename = "Accuracy")]
    accuracy: String,
    #[tabled(rename = "F1")]
    f1_score: String,
    #[tabled(rename = "Features")]
    feature_count: String,
    #[tabled(rename = "Voting")]
    voting: String,
}

/// List the models loaded by the analyzer
pub async fn run(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let listing: ModelsResponse = client.get("/api/v1/models").await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&listing)?);
        }
        OutputFormat::Table => {
            let rows: Vec<ModelRow> = listing
                .models
                .iter()
                .map(|model| ModelRow {
                    identity: model.identity.clone(),
                    display_name: model.display_name.clone(),
                    default: if model.default {
                        "yes".to_string()
                    } else {
                        String::new()
                    },
                    accuracy: model
                        .performance
                        .map(|p| format_percent(p.accuracy))
                        .unwrap_or_default(),
                    f1_score: model
                        .performance
                        .map(|p| format_percent(p.f1_score))
                        .unwrap_or_default(),
                    feature_count: model
                        .feature_count
                        .map(|n| n.to_string())
                        .unwrap_or_default(),
                    voting: model.voting_type.clone().unwrap_or_default(),
                })
                .collect();
            print_table(&rows, OutputFormat::Table);

            if !listing.scaler_loaded {
                print_warning("feature scaler not loaded; predictions are degraded");
            }
        }
    }

    Ok(())
}
