use crate::adapters::WikiClient;
use crate::domain::model::{ItemIndex, ItemRecord};
use crate::utils::error::Result;

/// Fetches the full item catalog in one request and indexes it by name.
pub async fn fetch_item_index(client: &WikiClient) -> Result<ItemIndex> {
    let url = client.prices_url("mapping");
    let records: Vec<ItemRecord> = client.get_json(&url, &[]).await?;
    let index = ItemIndex::from_records(records);
    tracing::info!("✅ Loaded {} item name -> id mappings", index.len());
    Ok(index)
}

/// Like [`fetch_item_index`] but never fails: any failure yields an empty
/// index, which callers must read as "resolution unavailable".
pub async fn resolve_identities(client: &WikiClient) -> ItemIndex {
    match fetch_item_index(client).await {
        Ok(index) => index,
        Err(e) => {
            tracing::warn!("Failed to fetch item id map: {}", e);
            ItemIndex::new()
        }
    }
}
