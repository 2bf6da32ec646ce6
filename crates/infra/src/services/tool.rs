use chrono::{DateTime, Utc};
use tracing::instrument;

use stockyard_core::{ActionContext, ActorId, DocumentId};
use stockyard_documents::{NewTool, Tool, ToolPatch, ToolStatus};

use crate::error::LifecycleResult;
use crate::store::Store;

document_service! {
    /// Tool register: custody and maintenance of individually tracked tools.
    ToolService for Tool {
        new: NewTool,
        patch: ToolPatch,
        status: ToolStatus,
    }
}

impl<S: Store> ToolService<S> {
    #[instrument(skip(self, ctx), fields(actor = %ctx.actor_id), err)]
    pub async fn submit(&self, id: DocumentId, ctx: &ActionContext) -> LifecycleResult<Tool> {
        self.move_to(id, ToolStatus::Pending, ctx).await
    }

    /// Puts the tool into service.
    #[instrument(skip(self, ctx), fields(actor = %ctx.actor_id), err)]
    pub async fn approve(&self, id: DocumentId, ctx: &ActionContext) -> LifecycleResult<Tool> {
        self.move_to(id, ToolStatus::Active, ctx).await
    }

    #[instrument(skip(self, ctx), fields(actor = %ctx.actor_id), err)]
    pub async fn check_out(
        &self,
        id: DocumentId,
        custodian: ActorId,
        due_back_at: Option<DateTime<Utc>>,
        ctx: &ActionContext,
    ) -> LifecycleResult<Tool> {
        self.runtime
            .transition_with(id, "tool.check_out", ctx, |tool: &mut Tool| {
                tool.check_out(custodian, due_back_at, ctx)
            })
            .await
    }

    #[instrument(skip(self, ctx), fields(actor = %ctx.actor_id), err)]
    pub async fn check_in(&self, id: DocumentId, ctx: &ActionContext) -> LifecycleResult<Tool> {
        self.move_to(id, ToolStatus::Active, ctx).await
    }

    #[instrument(skip(self, note, ctx), fields(actor = %ctx.actor_id), err)]
    pub async fn send_to_maintenance(
        &self,
        id: DocumentId,
        note: Option<String>,
        ctx: &ActionContext,
    ) -> LifecycleResult<Tool> {
        self.runtime
            .transition_with(id, "tool.send_to_maintenance", ctx, |tool: &mut Tool| {
                tool.send_to_maintenance(note.clone(), ctx)
            })
            .await
    }

    /// Back from maintenance into service.
    #[instrument(skip(self, ctx), fields(actor = %ctx.actor_id), err)]
    pub async fn restore(&self, id: DocumentId, ctx: &ActionContext) -> LifecycleResult<Tool> {
        self.move_to(id, ToolStatus::Active, ctx).await
    }

    #[instrument(skip(self, ctx), fields(actor = %ctx.actor_id), err)]
    pub async fn retire(&self, id: DocumentId, ctx: &ActionContext) -> LifecycleResult<Tool> {
        self.move_to(id, ToolStatus::Retired, ctx).await
    }

    #[instrument(skip(self, ctx), fields(actor = %ctx.actor_id), err)]
    pub async fn cancel(&self, id: DocumentId, ctx: &ActionContext) -> LifecycleResult<Tool> {
        self.move_to(id, ToolStatus::Cancelled, ctx).await
    }
}
