//! Recipe material resolution: structured query first, article scrape second.

use crate::adapters::WikiClient;
use crate::core::extract::{CreationTableStrategy, Extraction, ExtractionStrategy};
use crate::domain::model::Materials;
use crate::domain::ports::{Lookup, MaterialSource};
use crate::utils::error::{CraftError, Result};
use async_trait::async_trait;
use scraper::Html;
use serde_json::Value;

/// Looks materials up through the wiki's Cargo query API.
pub struct CargoQuerySource {
    client: WikiClient,
}

impl CargoQuerySource {
    pub fn new(client: WikiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MaterialSource for CargoQuerySource {
    fn name(&self) -> &'static str {
        "cargo-query"
    }

    async fn lookup(&self, item_name: &str) -> Lookup {
        let url = self.client.wiki_api_url();
        let filter = format!("item=\"{}\"", item_name);
        let query = [
            ("action", "cargoquery"),
            ("tables", "item_materials"),
            ("fields", "material,quantity"),
            ("where", filter.as_str()),
            ("format", "json"),
        ];

        match self.client.get_json::<Value>(&url, &query).await {
            Ok(body) => parse_cargo_rows(&body),
            Err(error) => Lookup::Failed {
                partial: Materials::new(),
                error,
            },
        }
    }
}

/// Turns `{"cargoquery": [{"title": {"material": .., "quantity": ..}}]}` into
/// materials. Rows are read in order; a malformed row stops the read and the
/// rows before it are kept as partial data.
pub fn parse_cargo_rows(body: &Value) -> Lookup {
    let Some(rows) = body.get("cargoquery").and_then(Value::as_array) else {
        return Lookup::NotFound("query returned no result set".to_string());
    };

    let mut materials = Materials::new();
    for row in rows {
        match parse_cargo_row(row) {
            Ok((name, quantity)) => {
                materials.insert(name, quantity);
            }
            Err(error) => {
                return Lookup::Failed {
                    partial: materials,
                    error,
                }
            }
        }
    }

    if materials.is_empty() {
        Lookup::NotFound("query returned no rows".to_string())
    } else {
        Lookup::Found(materials)
    }
}

fn parse_cargo_row(row: &Value) -> Result<(String, u32)> {
    let fields = row
        .get("title")
        .ok_or_else(|| CraftError::parse("cargoquery", "row without 'title'"))?;

    let name = fields
        .get("material")
        .and_then(Value::as_str)
        .ok_or_else(|| CraftError::parse("cargoquery", "row without 'material'"))?;

    let quantity = match fields.get("quantity") {
        Some(Value::String(s)) => s.trim().parse::<u32>().ok(),
        Some(Value::Number(n)) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        _ => None,
    }
    .filter(|q| *q > 0)
    .ok_or_else(|| {
        CraftError::parse(
            "cargoquery",
            format!("invalid quantity for '{}': {:?}", name, fields.get("quantity")),
        )
    })?;

    Ok((name.to_string(), quantity))
}

/// Scrapes the item's wiki article, trying each extraction strategy in turn.
pub struct ArticleScrapeSource {
    client: WikiClient,
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl ArticleScrapeSource {
    pub fn new(client: WikiClient) -> Self {
        Self::with_strategies(client, vec![Box::new(CreationTableStrategy::default())])
    }

    pub fn with_strategies(client: WikiClient, strategies: Vec<Box<dyn ExtractionStrategy>>) -> Self {
        Self { client, strategies }
    }

    fn extract(&self, html: &str) -> Lookup {
        let document = Html::parse_document(html);
        let mut reasons = Vec::with_capacity(self.strategies.len());

        for strategy in &self.strategies {
            match strategy.extract(&document) {
                Extraction::Found(materials) => {
                    tracing::debug!("Strategy '{}' matched", strategy.name());
                    return Lookup::Found(materials);
                }
                Extraction::Missing(reason) => reasons.push(format!("{}: {}", strategy.name(), reason)),
            }
        }

        Lookup::NotFound(reasons.join("; "))
    }
}

#[async_trait]
impl MaterialSource for ArticleScrapeSource {
    fn name(&self) -> &'static str {
        "article-scrape"
    }

    async fn lookup(&self, item_name: &str) -> Lookup {
        let url = self.client.article_url(item_name);

        match self.client.get_text(&url, &[]).await {
            Ok(html) => self.extract(&html),
            Err(CraftError::HttpStatus { status, .. }) => {
                Lookup::NotFound(format!("article request returned HTTP {}", status))
            }
            Err(error) => Lookup::Failed {
                partial: Materials::new(),
                error,
            },
        }
    }
}

#[derive(Debug)]
pub struct Attempt {
    pub source: &'static str,
    pub outcome: Lookup,
}

/// Every attempt made for one item, in order. At most the last one is `Found`.
#[derive(Debug)]
pub struct Resolution {
    pub item: String,
    pub attempts: Vec<Attempt>,
}

impl Resolution {
    /// Rows kept by failed attempts, overlaid by what a later source found.
    /// Empty when no source produced anything.
    pub fn materials(&self) -> Materials {
        let mut materials = Materials::new();
        for attempt in &self.attempts {
            if let Some(rows) = attempt.outcome.rows() {
                materials.extend(rows.iter().map(|(name, quantity)| (name.clone(), *quantity)));
            }
        }
        materials
    }

    pub fn into_materials(self) -> Materials {
        let mut materials = Materials::new();
        for attempt in self.attempts {
            match attempt.outcome {
                Lookup::Found(rows) | Lookup::Failed { partial: rows, .. } => materials.extend(rows),
                Lookup::NotFound(_) => {}
            }
        }
        materials
    }

    /// Name of the source that produced the materials, falling back to the
    /// first failed source that left partial rows behind.
    pub fn source(&self) -> Option<&'static str> {
        self.found().map(|(source, _)| source).or_else(|| {
            self.attempts.iter().find_map(|attempt| match &attempt.outcome {
                Lookup::Failed { partial, .. } if !partial.is_empty() => Some(attempt.source),
                _ => None,
            })
        })
    }

    pub fn is_found(&self) -> bool {
        self.found().is_some()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&'static str, &CraftError)> + '_ {
        self.attempts.iter().filter_map(|attempt| match &attempt.outcome {
            Lookup::Failed { error, .. } => Some((attempt.source, error)),
            _ => None,
        })
    }

    fn found(&self) -> Option<(&'static str, &Materials)> {
        self.attempts.iter().find_map(|attempt| match &attempt.outcome {
            Lookup::Found(materials) => Some((attempt.source, materials)),
            _ => None,
        })
    }
}

/// Tries each source in order and stops at the first that finds materials.
pub struct MaterialResolver {
    sources: Vec<Box<dyn MaterialSource>>,
}

impl MaterialResolver {
    pub fn new(client: WikiClient) -> Self {
        Self::with_sources(vec![
            Box::new(CargoQuerySource::new(client.clone())),
            Box::new(ArticleScrapeSource::new(client)),
        ])
    }

    pub fn with_sources(sources: Vec<Box<dyn MaterialSource>>) -> Self {
        Self { sources }
    }

    pub async fn resolve(&self, item_name: &str) -> Resolution {
        let mut attempts = Vec::with_capacity(self.sources.len());

        for source in &self.sources {
            let outcome = source.lookup(item_name).await;
            let found = outcome.is_found();
            attempts.push(Attempt {
                source: source.name(),
                outcome,
            });
            if found {
                break;
            }
        }

        Resolution {
            item: item_name.to_string(),
            attempts,
        }
    }

    /// Never fails; an empty map means nothing was found or every source broke.
    pub async fn resolve_materials(&self, item_name: &str) -> Materials {
        self.resolve(item_name).await.into_materials()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct FixedSource {
        name: &'static str,
        materials: Materials,
        fail: bool,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl MaterialSource for FixedSource {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn lookup(&self, _item_name: &str) -> Lookup {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Lookup::Failed {
                    partial: self.materials.clone(),
                    error: CraftError::parse("test", "boom"),
                }
            } else if self.materials.is_empty() {
                Lookup::NotFound("nothing".to_string())
            } else {
                Lookup::Found(self.materials.clone())
            }
        }
    }

    fn source(name: &'static str, materials: &[(&str, u32)], fail: bool) -> (Box<dyn MaterialSource>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let source = FixedSource {
            name,
            materials: materials.iter().map(|(n, q)| (n.to_string(), *q)).collect(),
            fail,
            calls: calls.clone(),
        };
        (Box::new(source), calls)
    }

    #[test]
    fn test_parse_cargo_rows() {
        let body = json!({"cargoquery": [
            {"title": {"material": "Gold bar", "quantity": "1"}},
            {"title": {"material": "Emerald", "quantity": 2}}
        ]});

        let Lookup::Found(materials) = parse_cargo_rows(&body) else {
            panic!("expected rows");
        };
        assert_eq!(materials["Gold bar"], 1);
        assert_eq!(materials["Emerald"], 2);
    }

    #[test]
    fn test_parse_cargo_rows_keeps_partial_data() {
        let body = json!({"cargoquery": [
            {"title": {"material": "Gold bar", "quantity": "1"}},
            {"title": {"material": "Emerald", "quantity": "two"}},
            {"title": {"material": "Ruby", "quantity": "1"}}
        ]});

        match parse_cargo_rows(&body) {
            Lookup::Failed { partial, .. } => {
                assert_eq!(partial.len(), 1);
                assert_eq!(partial["Gold bar"], 1);
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_cargo_rows_empty_or_error_body() {
        assert!(matches!(
            parse_cargo_rows(&json!({"cargoquery": []})),
            Lookup::NotFound(_)
        ));
        assert!(matches!(
            parse_cargo_rows(&json!({"error": {"code": "badquery"}})),
            Lookup::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_first_success_skips_later_sources() {
        let (query, query_calls) = source("query", &[("Gold bar", 1)], false);
        let (scrape, scrape_calls) = source("scrape", &[("Other", 9)], true);
        let resolver = MaterialResolver::with_sources(vec![query, scrape]);

        let resolution = resolver.resolve("Gold ring").await;

        assert_eq!(query_calls.load(Ordering::SeqCst), 1);
        assert_eq!(scrape_calls.load(Ordering::SeqCst), 0);
        assert_eq!(resolution.source(), Some("query"));
        assert_eq!(resolution.materials()["Gold bar"], 1);
        assert_eq!(resolution.attempts.len(), 1);
    }

    #[tokio::test]
    async fn test_falls_back_after_failure() {
        let (query, _) = source("query", &[("Partial", 1)], true);
        let (scrape, scrape_calls) = source("scrape", &[("Flax", 1)], false);
        let resolver = MaterialResolver::with_sources(vec![query, scrape]);

        let resolution = resolver.resolve("Bow string").await;

        assert_eq!(scrape_calls.load(Ordering::SeqCst), 1);
        assert_eq!(resolution.source(), Some("scrape"));
        assert_eq!(resolution.failures().count(), 1);
        let materials = resolution.into_materials();
        assert_eq!(materials["Partial"], 1);
        assert_eq!(materials["Flax"], 1);
    }

    #[tokio::test]
    async fn test_partial_rows_survive_empty_fallback() {
        let (query, _) = source("query", &[("Gold bar", 1)], true);
        let (scrape, scrape_calls) = source("scrape", &[], false);
        let resolver = MaterialResolver::with_sources(vec![query, scrape]);

        let resolution = resolver.resolve("Emerald ring").await;

        assert_eq!(scrape_calls.load(Ordering::SeqCst), 1);
        assert!(!resolution.is_found());
        assert_eq!(resolution.source(), Some("query"));
        assert_eq!(resolution.materials()["Gold bar"], 1);
        assert_eq!(resolution.into_materials().len(), 1);
    }

    #[tokio::test]
    async fn test_found_rows_overwrite_partial_rows() {
        let (query, _) = source("query", &[("Gold bar", 3), ("Emerald", 1)], true);
        let (scrape, _) = source("scrape", &[("Gold bar", 1)], false);
        let resolver = MaterialResolver::with_sources(vec![query, scrape]);

        let materials = resolver.resolve_materials("Emerald ring").await;

        assert_eq!(materials["Gold bar"], 1);
        assert_eq!(materials["Emerald"], 1);
    }

    #[tokio::test]
    async fn test_all_sources_fail_yields_empty() {
        let (query, _) = source("query", &[], true);
        let (scrape, _) = source("scrape", &[], false);
        let resolver = MaterialResolver::with_sources(vec![query, scrape]);

        let resolution = resolver.resolve("Nothing").await;
        assert!(!resolution.is_found());
        assert!(resolution.materials().is_empty());
        assert_eq!(resolution.attempts.len(), 2);
    }
}
