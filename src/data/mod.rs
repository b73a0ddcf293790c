pub mod chart_data;
pub mod fetch;
pub mod ticker;

pub use chart_data::{parse_chart_data, ChartData};
pub use fetch::{fetch_json, http_client, Source};
pub use ticker::{TickerPoller, TickerSnapshot, TickerTrend};

use crate::error::Result;
use reqwest::Client;
use tracing::info;

/// Fetches `stock-chart-data.json` and decodes it into aligned series.
pub async fn load_chart_data(client: &Client, source: &Source) -> Result<ChartData> {
    let json: serde_json::Value = fetch_json(client, source).await?;
    let data = parse_chart_data(&json)?;
    info!(source = source.name(), points = data.len(), "chart data loaded");
    Ok(data)
}
