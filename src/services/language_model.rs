use async_trait::async_trait;

use crate::domain::prompt::Prompt;
use crate::error::AppResult;

#[async_trait]
pub trait LanguageModelService: Send + Sync {
    /// Sends the prompt to the model and returns the generated commit
    /// message, cleaned of surrounding formatting artifacts.
    async fn generate_commit_message(&self, prompt: &Prompt) -> AppResult<String>;
}
