use crate::context::AppContext;
use crate::domain::prompt::PromptTemplate;
use crate::error::AppResult;
use crate::workflow::message::{MessageWorkflowOutcome, generate_message_from_changes};

pub async fn run(
    ctx: &AppContext,
    template: &PromptTemplate,
) -> AppResult<MessageWorkflowOutcome> {
    generate_message_from_changes(ctx, template).await
}
