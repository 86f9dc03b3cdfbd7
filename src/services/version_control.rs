use async_trait::async_trait;

use crate::domain::change::{ChangeSet, DiffScope};
use crate::error::AppResult;

#[async_trait]
pub trait VersionControlService: Send + Sync {
    /// Collects the changed file list and unified diff for the given scope.
    /// The result may be empty; callers decide whether that is an error.
    async fn collect_changes(&self, scope: DiffScope) -> AppResult<ChangeSet>;

    /// Creates a commit from whatever is currently staged.
    async fn commit(&self, message: &str) -> AppResult<()>;
}
