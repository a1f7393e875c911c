use crate::adapters::WikiClient;
use crate::core::extract::RECIPE_TABLE_CLASS;
use crate::domain::model::{CraftingMethod, ItemIndex, MethodRequirement};
use crate::utils::error::{CraftError, Result};
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

static TABLES: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(&format!("table.{}", RECIPE_TABLE_CLASS)).expect("valid selector")
});
static TR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").expect("valid selector"));
static TD: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").expect("valid selector"));
static A: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").expect("valid selector"));

pub const SKILL_PAGE: &str = "Crafting";

/// Methods from `table` the player has the level for, in table order.
pub fn unlocked_methods(table: &[MethodRequirement], level: u32) -> Vec<&MethodRequirement> {
    table.iter().filter(|method| method.level <= level).collect()
}

/// The built-in method table used when no configuration overrides it.
pub fn default_method_table() -> Vec<MethodRequirement> {
    vec![
        MethodRequirement::new("Spin flax into bowstring", 10),
        MethodRequirement::new("Cut sapphire", 20),
        MethodRequirement::new("Make emerald ring", 27),
        MethodRequirement::new("Blow molten glass into orbs", 46),
        MethodRequirement::new("Craft fire battlestaff", 63),
        MethodRequirement::new("Craft air battlestaff", 66),
        MethodRequirement::new("Craft amulet of glory", 80),
        MethodRequirement::new("Make black d'hide body", 84),
    ]
}

/// Scrapes the skill page for every product the player can make and has an id for.
pub async fn fetch_crafting_methods(
    client: &WikiClient,
    level: u32,
    ids: &ItemIndex,
) -> Result<Vec<CraftingMethod>> {
    let url = client.article_url(SKILL_PAGE);
    let html = client.get_text(&url, &[]).await?;
    let methods = parse_method_tables(&html, ids)
        .into_iter()
        .filter(|method| method.level <= level)
        .collect();
    Ok(methods)
}

/// Every row of every recipe table on a skill page: level in the first cell,
/// product in the third. Rows that don't parse, or whose product has no id,
/// are dropped.
pub fn parse_method_tables(html: &str, ids: &ItemIndex) -> Vec<CraftingMethod> {
    let document = Html::parse_document(html);
    let mut methods = Vec::new();

    for table in document.select(&TABLES) {
        for row in table.select(&TR).skip(1) {
            match parse_method_row(row, ids) {
                Ok(Some(method)) => methods.push(method),
                Ok(None) => {}
                Err(e) => tracing::debug!("Skipping row: {}", e),
            }
        }
    }

    methods
}

fn parse_method_row(row: ElementRef<'_>, ids: &ItemIndex) -> Result<Option<CraftingMethod>> {
    let cells: Vec<ElementRef> = row.select(&TD).collect();
    if cells.len() < 3 {
        return Ok(None);
    }

    // 任務需求等非數字等級直接略過
    let level_text = cell_text(cells[0]);
    if level_text.is_empty() || !level_text.chars().all(|c| c.is_ascii_digit()) {
        return Ok(None);
    }
    let level = level_text
        .parse::<u32>()
        .map_err(|e| CraftError::parse("skill page", format!("level '{}': {}", level_text, e)))?;

    let name = match cells[2].select(&A).next() {
        Some(link) => cell_text(link),
        None => cell_text(cells[2]),
    };

    Ok(ids.get(&name).map(|id| CraftingMethod { name, level, id }))
}

fn cell_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
