use crate::adapters::WikiClient;
use crate::domain::model::{ItemId, PriceComparison, PriceQuote, PriceSnapshot, PricedItem};
use crate::utils::error::{CraftError, Result};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct LatestResponse {
    data: PriceSnapshot,
}

pub async fn get_price(client: &WikiClient, id: ItemId) -> Result<PriceQuote> {
    let url = client.prices_url("latest");
    let id_param = id.to_string();
    let response: LatestResponse = client.get_json(&url, &[("id", id_param.as_str())]).await?;

    response
        .data
        .get(id)
        .copied()
        .ok_or(CraftError::MissingPrice { id })
}

pub async fn get_all_prices(client: &WikiClient) -> Result<PriceSnapshot> {
    let url = client.prices_url("latest");
    let response: LatestResponse = client.get_json(&url, &[]).await?;
    tracing::debug!("Fetched {} price quotes", response.data.len());
    Ok(response.data)
}

/// Compares the instant-sell prices of two items; a missing price counts as 0.
pub async fn compare_prices(
    client: &WikiClient,
    first: (ItemId, &str),
    second: (ItemId, &str),
) -> Result<PriceComparison> {
    let first_quote = get_price(client, first.0).await?;
    let second_quote = get_price(client, second.0).await?;

    Ok(PriceComparison::new(
        priced(first, &first_quote),
        priced(second, &second_quote),
    ))
}

fn priced((id, name): (ItemId, &str), quote: &PriceQuote) -> PricedItem {
    PricedItem {
        id,
        name: name.to_string(),
        high: quote.high.unwrap_or(0),
    }
}
