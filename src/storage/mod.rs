pub mod database;
pub mod memory;

use async_trait::async_trait;

use crate::utils::CareerLensResult;

pub use database::Database;
pub use memory::MemoryStore;

/// Key under which the signed-in session is persisted.
pub const AUTH_KEY: &str = "@careerlens/auth";
/// Key under which the UI preferences are persisted.
pub const PREFS_KEY: &str = "@prefs";

/// String key-value persistence shared by the session and preference stores.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> CareerLensResult<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> CareerLensResult<()>;

    async fn remove(&self, key: &str) -> CareerLensResult<()>;
}
