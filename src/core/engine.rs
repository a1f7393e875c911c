use crate::adapters::WikiClient;
use crate::config::toml_config::AppConfig;
use crate::core::materials::{MaterialResolver, Resolution};
use crate::core::session::SessionLog;
use crate::core::{hiscores, items, methods, prices, profit, Storage};
use crate::domain::model::{
    CraftReport, CraftingMethod, ItemIndex, MethodRequirement, PriceSnapshot, ProfitResult,
    SkillStats,
};
use crate::domain::ports::Lookup;
use crate::utils::error::Result;

/// Runs the whole lookup chain for one player, one request at a time.
pub struct CraftEngine<S: Storage> {
    client: WikiClient,
    resolver: MaterialResolver,
    methods: Vec<MethodRequirement>,
    skill_index: usize,
    session_log: Option<SessionLog<S>>,
}

impl<S: Storage> CraftEngine<S> {
    pub fn new(client: WikiClient, config: &AppConfig, storage: S) -> Self {
        let session_log = config
            .log
            .enabled
            .then(|| SessionLog::new(storage, config.log.path.clone()));

        Self {
            resolver: MaterialResolver::new(client.clone()),
            client,
            methods: config.methods.clone(),
            skill_index: config.hiscores.skill_index,
            session_log,
        }
    }

    pub fn from_config(config: &AppConfig, storage: S) -> Result<Self> {
        let client = WikiClient::new(config)?;
        Ok(Self::new(client, config, storage))
    }

    pub fn with_resolver(mut self, resolver: MaterialResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn without_session_log(mut self) -> Self {
        self.session_log = None;
        self
    }

    pub fn client(&self) -> &WikiClient {
        &self.client
    }

    pub async fn crafting_stats(&self, username: &str) -> Result<SkillStats> {
        hiscores::get_skill_stats(&self.client, username, self.skill_index).await
    }

    pub fn unlocked_methods(&self, level: u32) -> Vec<&MethodRequirement> {
        methods::unlocked_methods(&self.methods, level)
    }

    /// Resolves materials and logs whatever went wrong along the way.
    pub async fn resolve_materials(&self, item_name: &str) -> Resolution {
        let resolution = self.resolver.resolve(item_name).await;

        for attempt in &resolution.attempts {
            match &attempt.outcome {
                Lookup::Found(materials) => {
                    tracing::info!("📦 {} materials for {}: {:?}", attempt.source, item_name, materials)
                }
                Lookup::NotFound(reason) => {
                    tracing::debug!("{} found nothing for {}: {}", attempt.source, item_name, reason)
                }
                Lookup::Failed { partial, error } => tracing::warn!(
                    "⚠️ {} error for {} ({} rows read): {}",
                    attempt.source,
                    item_name,
                    partial.len(),
                    error
                ),
            }
        }

        match resolution.source() {
            None => tracing::info!("❌ No materials found for {}", item_name),
            Some(source) if !resolution.is_found() => {
                tracing::warn!("Using partial materials from {} for {}", source, item_name)
            }
            Some(_) => {}
        }

        resolution
    }

    /// Checks the output price before spending requests on materials.
    pub async fn calculate_profit(
        &self,
        method: &CraftingMethod,
        ids: &ItemIndex,
        prices: &PriceSnapshot,
    ) -> Option<ProfitResult> {
        profit::output_price(method, prices)?;
        let materials = self.resolve_materials(&method.name).await.into_materials();
        profit::calculate_profit(method, &materials, ids, prices)
    }

    pub async fn run(&self, username: &str) -> Result<CraftReport> {
        tracing::info!("Starting profit run for {}", username);

        let stats = self.crafting_stats(username).await?;
        tracing::info!(
            "{}'s Crafting level: {} (xp {}, rank {})",
            username,
            stats.level,
            stats.experience,
            stats.rank
        );

        if let Some(log) = &self.session_log {
            let unlocked: Vec<&str> = self
                .unlocked_methods(stats.level)
                .into_iter()
                .map(|m| m.name.as_str())
                .collect();
            if let Err(e) = log.record(username, stats.level, &unlocked).await {
                tracing::warn!("Could not write session log {}: {}", log.path(), e);
            }
        }

        let ids = items::resolve_identities(&self.client).await;
        let snapshot = prices::get_all_prices(&self.client).await?;

        let crafting_methods =
            match methods::fetch_crafting_methods(&self.client, stats.level, &ids).await {
                Ok(found) => found,
                Err(e) => {
                    tracing::warn!("Failed to fetch crafting methods: {}", e);
                    Vec::new()
                }
            };
        tracing::info!("Unlocked crafting methods: {}", crafting_methods.len());

        let mut results = Vec::new();
        let mut skipped = Vec::new();
        for method in &crafting_methods {
            match self.calculate_profit(method, &ids, &snapshot).await {
                Some(result) => results.push(result),
                None => {
                    tracing::debug!("Skipped {} (missing materials or prices)", method.name);
                    skipped.push(method.name.clone());
                }
            }
        }

        Ok(CraftReport {
            username: username.to_string(),
            stats,
            results,
            skipped,
        })
    }
}
