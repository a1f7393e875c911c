use crate::core::Storage;
use crate::utils::error::Result;
use chrono::Local;

/// Append-only record of who was checked, at what level, and what they unlocked.
pub struct SessionLog<S: Storage> {
    storage: S,
    path: String,
}

impl<S: Storage> SessionLog<S> {
    pub fn new(storage: S, path: impl Into<String>) -> Self {
        Self {
            storage,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub async fn record(&self, username: &str, level: u32, methods: &[&str]) -> Result<()> {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.6f");
        let entry = format_entry(&timestamp.to_string(), username, level, methods);
        self.storage.append_file(&self.path, entry.as_bytes()).await
    }
}

fn format_entry(timestamp: &str, username: &str, level: u32, methods: &[&str]) -> String {
    let mut entry = format!(
        "\n[{}] Username: {}, Crafting Level: {}\n",
        timestamp, username, level
    );
    for method in methods {
        entry.push_str(&format!(" - {}\n", method));
    }
    entry
}
