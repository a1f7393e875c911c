use crate::domain::model::{CraftingMethod, ItemIndex, Materials, PriceSnapshot, ProfitResult};

/// Prices one crafting method from its materials.
///
/// The output sells at its `low` (instant-buy) price and each material is
/// bought at its `high` (instant-sell) price. Any gap in the data voids the
/// whole result: no output price, an unknown material, a material without a
/// `high` price, or no materials at all.
pub fn calculate_profit(
    method: &CraftingMethod,
    materials: &Materials,
    ids: &ItemIndex,
    prices: &PriceSnapshot,
) -> Option<ProfitResult> {
    let price = output_price(method, prices)?;

    if materials.is_empty() {
        return None;
    }

    let mut cost = 0i64;
    for (name, quantity) in materials {
        let id = ids.get(name)?;
        let high = prices.get(id)?.high?;
        cost = cost.checked_add(high.checked_mul(i64::from(*quantity))?)?;
    }

    Some(ProfitResult {
        name: method.name.clone(),
        level: method.level,
        price,
        cost,
        profit: price - cost,
    })
}

/// Instant-buy price of the method's output, if it has one.
pub fn output_price(method: &CraftingMethod, prices: &PriceSnapshot) -> Option<i64> {
    prices.get(method.id)?.low
}
