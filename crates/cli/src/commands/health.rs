//! Health command

use anyhow::Result;
use serde::Serialize;
use tabled::Tabled;

use crate::client::{ApiClient, HealthResponse};
use crate::output::{color_status, print_error, print_success, print_table, OutputFormat};

/// Row for the component health table
#[derive(Tabled, Serialize)]
struct ComponentRow {
    #[tabled(rename = "Component")]
    component: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Message")]
    message: String,
}

/// Show analyzer component health
pub async fn run(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let health: HealthResponse = client.get_allow_unavailable("/healthz").await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&health)?);
        }
        OutputFormat::Table => {
            let mut rows: Vec<ComponentRow> = health
                .components
                .iter()
                .map(|(name, component)| ComponentRow {
                    component: name.clone(),
                    status: color_status(&component.status),
                    message: component.message.clone().unwrap_or_default(),
                })
                .collect();
            rows.sort_by(|a, b| a.component.cmp(&b.component));
            print_table(&rows, OutputFormat::Table);

            if health.status == "unhealthy" {
                print_error(&format!("analyzer is {}", health.status));
            } else {
                print_success(&format!("analyzer is {}", health.status));
            }
        }
    }

    Ok(())
}
