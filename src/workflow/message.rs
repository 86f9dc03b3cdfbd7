use crate::context::AppContext;
use crate::domain::change::ChangeSet;
use crate::domain::prompt::PromptTemplate;
use crate::error::{AppError, AppResult};

pub struct MessageWorkflowOutcome {
    pub changes: ChangeSet,
    pub message: String,
    pub committed: bool,
}

/// Runs the linear pipeline: inspect changes, render the prompt, generate the
/// message, and optionally commit with it. Stops at the first failing step.
pub async fn generate_message_from_changes(
    ctx: &AppContext,
    template: &PromptTemplate,
) -> AppResult<MessageWorkflowOutcome> {
    let changes = ctx
        .version_control
        .collect_changes(ctx.config.scope)
        .await?;

    if changes.is_empty() {
        return Err(AppError::VersionControl(
            "no changes to describe".to_string(),
        ));
    }

    let prompt = template.render(&changes);
    let message = ctx.language_model.generate_commit_message(&prompt).await?;
    let message = message.trim().to_string();

    if message.is_empty() {
        return Err(AppError::LanguageModel(
            "model returned an empty commit message".to_string(),
        ));
    }

    let committed = if ctx.config.commit {
        ctx.version_control.commit(&message).await?;
        true
    } else {
        false
    };

    Ok(MessageWorkflowOutcome {
        changes,
        message,
        committed,
    })
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::config::AppConfig;
    use crate::domain::change::DiffScope;
    use crate::domain::prompt::{MessageLanguage, Prompt};
    use crate::services::{LanguageModelService, VersionControlService};

    struct FakeVersionControl {
        changes: ChangeSet,
        commits: Mutex<Vec<String>>,
    }

    impl FakeVersionControl {
        fn with_changes(changes: ChangeSet) -> Arc<Self> {
            Arc::new(Self {
                changes,
                commits: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl VersionControlService for FakeVersionControl {
        async fn collect_changes(&self, _scope: DiffScope) -> AppResult<ChangeSet> {
            Ok(self.changes.clone())
        }

        async fn commit(&self, message: &str) -> AppResult<()> {
            self.commits.lock().unwrap().push(message.to_string());
            Ok(())
        }
    }

    struct FakeLanguageModel {
        reply: String,
        calls: AtomicUsize,
    }

    impl FakeLanguageModel {
        fn replying(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: reply.to_string(),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl LanguageModelService for FakeLanguageModel {
        async fn generate_commit_message(&self, _prompt: &Prompt) -> AppResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.reply.clone())
        }
    }

    fn test_config(commit: bool) -> AppConfig {
        AppConfig {
            repo_path: PathBuf::from("."),
            api_key: "sk-test".to_string(),
            api_base: "https://example.test/v1".to_string(),
            model: "gpt-test".to_string(),
            scope: DiffScope::Staged,
            commit,
            categorize: true,
            language: MessageLanguage::English,
            prompt_file: None,
        }
    }

    fn staged_changes() -> ChangeSet {
        ChangeSet {
            files: vec!["src/main.rs".to_string()],
            diff: "+fn main() {}".to_string(),
        }
    }

    fn context(
        commit: bool,
        vcs: Arc<FakeVersionControl>,
        llm: Arc<FakeLanguageModel>,
    ) -> AppContext {
        AppContext::new(test_config(commit), vcs, llm)
    }

    #[tokio::test]
    async fn prints_without_committing_when_commit_is_off() {
        let vcs = FakeVersionControl::with_changes(staged_changes());
        let llm = FakeLanguageModel::replying("feat: add main");
        let ctx = context(false, vcs.clone(), llm);
        let template = PromptTemplate::built_in(MessageLanguage::English);

        let outcome = generate_message_from_changes(&ctx, &template).await.unwrap();

        assert_eq!(outcome.message, "feat: add main");
        assert!(!outcome.committed);
        assert!(vcs.commits.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn commits_exactly_once_with_the_generated_message() {
        let vcs = FakeVersionControl::with_changes(staged_changes());
        let llm = FakeLanguageModel::replying("  fix: trim output  ");
        let ctx = context(true, vcs.clone(), llm);
        let template = PromptTemplate::built_in(MessageLanguage::English);

        let outcome = generate_message_from_changes(&ctx, &template).await.unwrap();

        assert!(outcome.committed);
        let commits = vcs.commits.lock().unwrap();
        assert_eq!(commits.as_slice(), ["fix: trim output"]);
    }

    #[tokio::test]
    async fn skips_the_model_when_there_are_no_changes() {
        let vcs = FakeVersionControl::with_changes(ChangeSet::default());
        let llm = FakeLanguageModel::replying("unused");
        let ctx = context(false, vcs, llm.clone());
        let template = PromptTemplate::built_in(MessageLanguage::English);

        let result = generate_message_from_changes(&ctx, &template).await;

        assert!(matches!(result, Err(AppError::VersionControl(_))));
        assert_eq!(llm.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn rejects_a_blank_model_reply() {
        let vcs = FakeVersionControl::with_changes(staged_changes());
        let llm = FakeLanguageModel::replying("   \n  ");
        let ctx = context(true, vcs.clone(), llm);
        let template = PromptTemplate::built_in(MessageLanguage::English);

        let result = generate_message_from_changes(&ctx, &template).await;

        assert!(matches!(result, Err(AppError::LanguageModel(_))));
        assert!(vcs.commits.lock().unwrap().is_empty());
    }
}
