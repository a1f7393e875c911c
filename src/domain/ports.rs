use crate::domain::model::Materials;
use crate::utils::error::{CraftError, Result};
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn append_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    /// Base of the price API, e.g. `https://prices.runescape.wiki/api/v1/osrs`.
    fn prices_endpoint(&self) -> &str;
    /// Wiki root; articles live under `/w/` and the query API at `/api.php`.
    fn wiki_endpoint(&self) -> &str;
    fn hiscores_endpoint(&self) -> &str;
    fn user_agent(&self) -> &str;
}

/// What one material source produced for one item.
#[derive(Debug)]
pub enum Lookup {
    Found(Materials),
    NotFound(String),
    /// The source broke part-way; `partial` holds whatever was collected first.
    Failed {
        partial: Materials,
        error: CraftError,
    },
}

impl Lookup {
    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }

    /// Materials this outcome carries, found or partial.
    pub fn rows(&self) -> Option<&Materials> {
        match self {
            Lookup::Found(rows) | Lookup::Failed { partial: rows, .. } => Some(rows),
            Lookup::NotFound(_) => None,
        }
    }
}

/// A place recipe materials can be looked up from.
#[async_trait]
pub trait MaterialSource: Send + Sync {
    fn name(&self) -> &'static str;
    async fn lookup(&self, item_name: &str) -> Lookup;
}
