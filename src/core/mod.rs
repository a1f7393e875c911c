pub mod engine;
pub mod extract;
pub mod hiscores;
pub mod items;
pub mod materials;
pub mod methods;
pub mod prices;
pub mod profit;
pub mod report;
pub mod session;

pub use crate::domain::model::{CraftingMethod, ItemIndex, Materials, PriceSnapshot};
pub use crate::domain::ports::{ConfigProvider, MaterialSource, Storage};
pub use crate::utils::error::Result;
