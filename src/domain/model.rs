use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

pub type ItemId = u32;

/// Bill of materials for one craftable item: display name -> quantity (>= 1).
pub type Materials = BTreeMap<String, u32>;

/// One entry of the bulk item-metadata endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemRecord {
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub examine: Option<String>,
    #[serde(default)]
    pub members: Option<bool>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub value: Option<i64>,
    #[serde(default)]
    pub lowalch: Option<i64>,
    #[serde(default)]
    pub highalch: Option<i64>,
}

/// Lowercased item name -> item id.
///
/// Names that differ only by case collide; the record seen last wins.
#[derive(Debug, Clone, Default)]
pub struct ItemIndex {
    ids: HashMap<String, ItemId>,
}

impl ItemIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records<I: IntoIterator<Item = ItemRecord>>(records: I) -> Self {
        let mut index = Self::new();
        for record in records {
            index.insert(&record.name, record.id);
        }
        index
    }

    pub fn insert(&mut self, name: &str, id: ItemId) {
        self.ids.insert(name.to_lowercase(), id);
    }

    pub fn get(&self, name: &str) -> Option<ItemId> {
        self.ids.get(&name.to_lowercase()).copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl<'a> FromIterator<(&'a str, ItemId)> for ItemIndex {
    fn from_iter<T: IntoIterator<Item = (&'a str, ItemId)>>(iter: T) -> Self {
        let mut index = Self::new();
        for (name, id) in iter {
            index.insert(name, id);
        }
        index
    }
}

/// Latest instant-sell (`high`) and instant-buy (`low`) prices of one item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    #[serde(default)]
    pub high: Option<i64>,
    #[serde(default)]
    pub low: Option<i64>,
    #[serde(default, rename = "highTime")]
    pub high_time: Option<i64>,
    #[serde(default, rename = "lowTime")]
    pub low_time: Option<i64>,
}

impl PriceQuote {
    pub fn new(high: Option<i64>, low: Option<i64>) -> Self {
        Self {
            high,
            low,
            ..Default::default()
        }
    }
}

/// Price quotes keyed by item id. The wire format keys them by id-as-string.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceSnapshot {
    quotes: HashMap<ItemId, PriceQuote>,
}

impl PriceSnapshot {
    pub fn get(&self, id: ItemId) -> Option<&PriceQuote> {
        self.quotes.get(&id)
    }

    pub fn insert(&mut self, id: ItemId, quote: PriceQuote) {
        self.quotes.insert(id, quote);
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}

impl FromIterator<(ItemId, PriceQuote)> for PriceSnapshot {
    fn from_iter<T: IntoIterator<Item = (ItemId, PriceQuote)>>(iter: T) -> Self {
        Self {
            quotes: iter.into_iter().collect(),
        }
    }
}

/// A configured crafting method and the level it unlocks at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodRequirement {
    pub name: String,
    pub level: u32,
}

impl MethodRequirement {
    pub fn new(name: impl Into<String>, level: u32) -> Self {
        Self {
            name: name.into(),
            level,
        }
    }
}

/// A craftable item discovered on the wiki, resolved to its item id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CraftingMethod {
    pub name: String,
    pub level: u32,
    pub id: ItemId,
}

/// One hiscores line: `rank,level,experience`. Unranked players report -1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillStats {
    pub rank: i64,
    pub level: u32,
    pub experience: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfitResult {
    pub name: String,
    pub level: u32,
    pub price: i64,
    pub cost: i64,
    pub profit: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PricedItem {
    pub id: ItemId,
    pub name: String,
    pub high: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceComparison {
    pub first: PricedItem,
    pub second: PricedItem,
    /// `first.high - second.high`
    pub difference: i64,
}

impl PriceComparison {
    pub fn new(first: PricedItem, second: PricedItem) -> Self {
        let difference = first.high - second.high;
        Self {
            first,
            second,
            difference,
        }
    }

    pub fn more_expensive(&self) -> &PricedItem {
        if self.difference > 0 {
            &self.first
        } else {
            &self.second
        }
    }
}

/// Outcome of a full run for one player.
#[derive(Debug, Clone, Serialize)]
pub struct CraftReport {
    pub username: String,
    pub stats: SkillStats,
    pub results: Vec<ProfitResult>,
    pub skipped: Vec<String>,
}

impl CraftReport {
    /// Results ordered by profit, best first.
    pub fn ranked(&self) -> Vec<&ProfitResult> {
        let mut ranked: Vec<&ProfitResult> = self.results.iter().collect();
        ranked.sort_by(|a, b| b.profit.cmp(&a.profit));
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_index_lowercases_and_last_wins() {
        let records = vec![
            ItemRecord {
                id: 1,
                name: "Gold bar".to_string(),
                examine: None,
                members: None,
                limit: None,
                value: None,
                lowalch: None,
                highalch: None,
            },
            ItemRecord {
                id: 2,
                name: "GOLD BAR".to_string(),
                examine: None,
                members: None,
                limit: None,
                value: None,
                lowalch: None,
                highalch: None,
            },
        ];

        let index = ItemIndex::from_records(records);
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("gold bar"), Some(2));
        assert_eq!(index.get("Gold Bar"), Some(2));
    }

    #[test]
    fn test_price_snapshot_decodes_string_keys() {
        let json = serde_json::json!({
            "1635": {"high": 60, "low": 50, "highTime": 1700000000, "lowTime": null},
            "2357": {"high": 90}
        });

        let snapshot: PriceSnapshot = serde_json::from_value(json).unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.get(1635).unwrap().low, Some(50));
        assert_eq!(snapshot.get(2357).unwrap().low, None);
        assert_eq!(snapshot.get(2357).unwrap().high, Some(90));
    }

    #[test]
    fn test_price_comparison_difference() {
        let comparison = PriceComparison::new(
            PricedItem {
                id: 1,
                name: "Sapphire".to_string(),
                high: 700,
            },
            PricedItem {
                id: 2,
                name: "Uncut sapphire".to_string(),
                high: 500,
            },
        );
        assert_eq!(comparison.difference, 200);
        assert_eq!(comparison.more_expensive().name, "Sapphire");
    }

    #[test]
    fn test_report_ranked_by_profit() {
        let report = CraftReport {
            username: "tester".to_string(),
            stats: SkillStats {
                rank: 1,
                level: 50,
                experience: 100,
            },
            results: vec![
                ProfitResult {
                    name: "A".to_string(),
                    level: 1,
                    price: 10,
                    cost: 20,
                    profit: -10,
                },
                ProfitResult {
                    name: "B".to_string(),
                    level: 1,
                    price: 30,
                    cost: 5,
                    profit: 25,
                },
            ],
            skipped: vec![],
        };
        let names: Vec<&str> = report.ranked().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);
    }
}
