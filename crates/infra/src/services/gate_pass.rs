use tracing::instrument;

use stockyard_core::{ActionContext, DocumentId};
use stockyard_documents::{GatePass, GatePassPatch, GatePassStatus, NewGatePass};

use crate::error::LifecycleResult;
use crate::store::Store;

document_service! {
    /// Authorises goods leaving the gate. No stock effect.
    GatePassService for GatePass {
        new: NewGatePass,
        patch: GatePassPatch,
        status: GatePassStatus,
    }
}

impl<S: Store> GatePassService<S> {
    #[instrument(skip(self, ctx), fields(actor = %ctx.actor_id), err)]
    pub async fn submit(&self, id: DocumentId, ctx: &ActionContext) -> LifecycleResult<GatePass> {
        self.move_to(id, GatePassStatus::Pending, ctx).await
    }

    #[instrument(skip(self, ctx), fields(actor = %ctx.actor_id), err)]
    pub async fn approve(&self, id: DocumentId, ctx: &ActionContext) -> LifecycleResult<GatePass> {
        self.move_to(id, GatePassStatus::Approved, ctx).await
    }

    #[instrument(skip(self, ctx), fields(actor = %ctx.actor_id), err)]
    pub async fn release(&self, id: DocumentId, ctx: &ActionContext) -> LifecycleResult<GatePass> {
        self.move_to(id, GatePassStatus::Released, ctx).await
    }

    /// Only returnable passes can come back.
    #[instrument(skip(self, ctx), fields(actor = %ctx.actor_id), err)]
    pub async fn return_pass(
        &self,
        id: DocumentId,
        ctx: &ActionContext,
    ) -> LifecycleResult<GatePass> {
        self.move_to(id, GatePassStatus::Returned, ctx).await
    }

    #[instrument(skip(self, ctx), fields(actor = %ctx.actor_id), err)]
    pub async fn cancel(&self, id: DocumentId, ctx: &ActionContext) -> LifecycleResult<GatePass> {
        self.move_to(id, GatePassStatus::Cancelled, ctx).await
    }
}
