//! Page-layout specific extraction of recipe materials from wiki articles.
//!
//! Each known layout is one [`ExtractionStrategy`]. When the wiki changes its
//! markup, add a strategy rather than patching an existing one.

use crate::domain::model::Materials;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

static TR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").expect("valid selector"));
static TD: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").expect("valid selector"));
static A: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").expect("valid selector"));

pub const MULTIPLICATION_SIGN: char = '×';
pub const RECIPE_TABLE_CLASS: &str = "wikitable";

/// Link titles that name tools or placeholders rather than consumed materials.
const NON_MATERIALS: [&str; 2] = ["furnace", "none"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Found(Materials),
    Missing(&'static str),
}

pub trait ExtractionStrategy: Send + Sync {
    fn name(&self) -> &'static str;
    fn extract(&self, document: &Html) -> Extraction;
}

/// Reads the first recipe table following the "Creation" section heading.
#[derive(Debug, Clone)]
pub struct CreationTableStrategy {
    anchor_id: String,
    table_class: String,
}

impl Default for CreationTableStrategy {
    fn default() -> Self {
        Self {
            anchor_id: "Creation".to_string(),
            table_class: RECIPE_TABLE_CLASS.to_string(),
        }
    }
}

impl CreationTableStrategy {
    pub fn new(anchor_id: impl Into<String>, table_class: impl Into<String>) -> Self {
        Self {
            anchor_id: anchor_id.into(),
            table_class: table_class.into(),
        }
    }

    fn find_anchor<'a>(&self, document: &'a Html) -> Option<ElementRef<'a>> {
        let target = document
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().id() == Some(self.anchor_id.as_str()))?;

        // Older markup puts the id on a span inside the heading.
        if target.value().name() == "span" {
            if let Some(parent) = target.parent().and_then(ElementRef::wrap) {
                return Some(parent);
            }
        }
        Some(target)
    }

    fn find_table_after<'a>(
        &self,
        document: &'a Html,
        anchor: ElementRef<'a>,
    ) -> Option<ElementRef<'a>> {
        document
            .root_element()
            .descendants()
            .skip_while(|node| node.id() != anchor.id())
            .skip(1)
            .filter_map(ElementRef::wrap)
            .find(|el| {
                el.value().name() == "table"
                    && el.value().classes().any(|class| class == self.table_class)
            })
    }
}

impl ExtractionStrategy for CreationTableStrategy {
    fn name(&self) -> &'static str {
        "creation-table"
    }

    fn extract(&self, document: &Html) -> Extraction {
        let Some(anchor) = self.find_anchor(document) else {
            return Extraction::Missing("no 'Creation' section");
        };

        let Some(table) = self.find_table_after(document, anchor) else {
            return Extraction::Missing("no recipe table after 'Creation' section");
        };

        let materials = materials_from_table(table);
        if materials.is_empty() {
            Extraction::Missing("recipe table lists no materials")
        } else {
            Extraction::Found(materials)
        }
    }
}

/// Collects materials from the last cell of every data row.
///
/// A name seen twice keeps the quantity of its last occurrence.
pub fn materials_from_table(table: ElementRef<'_>) -> Materials {
    let mut materials = Materials::new();

    for row in table.select(&TR).skip(1) {
        let cells: Vec<ElementRef> = row.select(&TD).collect();
        let Some(last) = cells.last().filter(|_| cells.len() >= 2) else {
            continue;
        };

        for link in last.select(&A) {
            let Some(title) = link.value().attr("title").map(str::trim) else {
                continue;
            };
            if title.is_empty() || is_non_material(title) {
                continue;
            }

            let quantity = link
                .prev_sibling()
                .and_then(|node| node.value().as_text().map(|text| parse_quantity(text)))
                .unwrap_or(1);

            materials.insert(title.to_string(), quantity);
        }
    }

    materials
}

fn is_non_material(title: &str) -> bool {
    let lowered = title.to_lowercase();
    NON_MATERIALS.contains(&lowered.as_str())
}

/// Parses a `5×` style prefix. Anything unparsable, or zero, counts as 1.
pub fn parse_quantity(text: &str) -> u32 {
    text.trim()
        .split(MULTIPLICATION_SIGN)
        .next()
        .and_then(|prefix| prefix.trim().parse::<u32>().ok())
        .filter(|quantity| *quantity > 0)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(creation: &str) -> Html {
        Html::parse_document(&format!(
            r#"<html><body>
            <h2><span class="mw-headline" id="Uses">Uses</span></h2>
            <table class="wikitable"><tr><th>Item</th><th>Needs</th></tr>
            <tr><td>x</td><td><a title="Decoy">Decoy</a></td></tr></table>
            {}
            </body></html>"#,
            creation
        ))
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("3×"), 3);
        assert_eq!(parse_quantity(" 12 × "), 12);
        assert_eq!(parse_quantity(""), 1);
        assert_eq!(parse_quantity("abc×"), 1);
        assert_eq!(parse_quantity("0×"), 1);
        assert_eq!(parse_quantity("7"), 7);
    }

    #[test]
    fn test_creation_table_with_quantities() {
        let document = page(
            r#"<h2><span class="mw-headline" id="Creation">Creation</span></h2>
            <table class="wikitable">
              <tr><th>Skill</th><th>Materials</th></tr>
              <tr><td>Crafting 27</td><td>1 × <a title="Emerald">Emerald</a> 1 × <a title="Gold bar">Gold bar</a></td></tr>
            </table>
            <table class="wikitable"><tr><th>h</th></tr><tr><td>a</td><td><a title="Other">Other</a></td></tr></table>"#,
        );

        let extraction = CreationTableStrategy::default().extract(&document);
        let Extraction::Found(materials) = extraction else {
            panic!("expected materials, got {:?}", extraction);
        };

        assert_eq!(materials.len(), 2);
        assert_eq!(materials["Emerald"], 1);
        assert_eq!(materials["Gold bar"], 1);
        assert!(!materials.contains_key("Decoy"));
        assert!(!materials.contains_key("Other"));
    }

    #[test]
    fn test_skips_tools_and_untitled_links() {
        let document = page(
            r#"<h2 id="Creation">Creation</h2>
            <table class="wikitable">
              <tr><th>Skill</th><th>Materials</th></tr>
              <tr><td>Smithing</td><td><a title="FURNACE">Furnace</a> 3× <a title="Soda ash">Soda ash</a> <a>bare</a> <a title="none">None</a></td></tr>
            </table>"#,
        );

        let Extraction::Found(materials) = CreationTableStrategy::default().extract(&document) else {
            panic!("expected materials");
        };

        assert_eq!(materials.len(), 1);
        assert_eq!(materials["Soda ash"], 3);
    }

    #[test]
    fn test_quantity_defaults_when_previous_sibling_is_element() {
        let document = page(
            r#"<h2 id="Creation">Creation</h2>
            <table class="wikitable">
              <tr><th>a</th><th>b</th></tr>
              <tr><td>1</td><td><b>5×</b><a title="Flax">Flax</a></td></tr>
            </table>"#,
        );

        let Extraction::Found(materials) = CreationTableStrategy::default().extract(&document) else {
            panic!("expected materials");
        };
        assert_eq!(materials["Flax"], 1);
    }

    #[test]
    fn test_last_occurrence_wins() {
        let document = page(
            r#"<h2 id="Creation">Creation</h2>
            <table class="wikitable">
              <tr><th>a</th><th>b</th></tr>
              <tr><td>1</td><td>2× <a title="Molten glass">Molten glass</a></td></tr>
              <tr><td>2</td><td>4× <a title="Molten glass">Molten glass</a></td></tr>
              <tr><td>single cell row</td></tr>
            </table>"#,
        );

        let Extraction::Found(materials) = CreationTableStrategy::default().extract(&document) else {
            panic!("expected materials");
        };
        assert_eq!(materials["Molten glass"], 4);
    }

    #[test]
    fn test_missing_anchor_and_table() {
        let strategy = CreationTableStrategy::default();

        let no_anchor = page("");
        assert_eq!(
            strategy.extract(&no_anchor),
            Extraction::Missing("no 'Creation' section")
        );

        let no_table = page(r#"<h2 id="Creation">Creation</h2><p>Cannot be made.</p>"#);
        assert!(matches!(strategy.extract(&no_table), Extraction::Missing(_)));
    }
}
