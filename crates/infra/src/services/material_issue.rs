use tracing::instrument;

use stockyard_core::{ActionContext, DocumentId};
use stockyard_documents::{MaterialIssue, MaterialIssuePatch, MaterialIssueStatus, NewMaterialIssue};

use crate::error::LifecycleResult;
use crate::store::Store;

document_service! {
    MaterialIssueService for MaterialIssue {
        new: NewMaterialIssue,
        patch: MaterialIssuePatch,
        status: MaterialIssueStatus,
    }
}

impl<S: Store> MaterialIssueService<S> {
    #[instrument(skip(self, ctx), fields(actor = %ctx.actor_id), err)]
    pub async fn submit(
        &self,
        id: DocumentId,
        ctx: &ActionContext,
    ) -> LifecycleResult<MaterialIssue> {
        self.move_to(id, MaterialIssueStatus::Pending, ctx).await
    }

    #[instrument(skip(self, ctx), fields(actor = %ctx.actor_id), err)]
    pub async fn approve(
        &self,
        id: DocumentId,
        ctx: &ActionContext,
    ) -> LifecycleResult<MaterialIssue> {
        self.move_to(id, MaterialIssueStatus::Approved, ctx).await
    }

    /// Takes every line out of stock, or fails with `InsufficientStock` and
    /// leaves the issue approved.
    #[instrument(skip(self, ctx), fields(actor = %ctx.actor_id), err)]
    pub async fn issue(
        &self,
        id: DocumentId,
        ctx: &ActionContext,
    ) -> LifecycleResult<MaterialIssue> {
        self.move_to(id, MaterialIssueStatus::Issued, ctx).await
    }

    #[instrument(skip(self, ctx), fields(actor = %ctx.actor_id), err)]
    pub async fn cancel(
        &self,
        id: DocumentId,
        ctx: &ActionContext,
    ) -> LifecycleResult<MaterialIssue> {
        self.move_to(id, MaterialIssueStatus::Cancelled, ctx).await
    }
}
