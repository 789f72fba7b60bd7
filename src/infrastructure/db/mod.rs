pub mod users;

use crate::domain::distribution::AgeDistribution;
use crate::domain::error::Result;
use crate::domain::user::UserEntity;
use async_trait::async_trait;

pub use users::UserRepository;

/// Storage client for the users table. Constructed once at process start
/// and handed to the ingestion use case and the HTTP layer; nothing in
/// the pipeline reaches for ambient connection state.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persist one batch as a single bulk write. Empty input is a no-op.
    async fn insert_batch(&self, users: &[UserEntity]) -> Result<()>;

    /// Count the stored population per age bucket and report percentages.
    async fn age_distribution(&self) -> Result<AgeDistribution>;
}
