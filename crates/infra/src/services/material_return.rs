use tracing::instrument;

use stockyard_core::{ActionContext, DocumentId};
use stockyard_documents::{
    MaterialReturn, MaterialReturnPatch, MaterialReturnStatus, NewMaterialReturn,
};

use crate::error::LifecycleResult;
use crate::store::Store;

document_service! {
    /// Material coming back into stock; only good lines restock on `complete`.
    MaterialReturnService for MaterialReturn {
        new: NewMaterialReturn,
        patch: MaterialReturnPatch,
        status: MaterialReturnStatus,
    }
}

impl<S: Store> MaterialReturnService<S> {
    #[instrument(skip(self, ctx), fields(actor = %ctx.actor_id), err)]
    pub async fn submit(
        &self,
        id: DocumentId,
        ctx: &ActionContext,
    ) -> LifecycleResult<MaterialReturn> {
        self.move_to(id, MaterialReturnStatus::Pending, ctx).await
    }

    #[instrument(skip(self, ctx), fields(actor = %ctx.actor_id), err)]
    pub async fn receive(
        &self,
        id: DocumentId,
        ctx: &ActionContext,
    ) -> LifecycleResult<MaterialReturn> {
        self.move_to(id, MaterialReturnStatus::Received, ctx).await
    }

    #[instrument(skip(self, ctx), fields(actor = %ctx.actor_id), err)]
    pub async fn complete(
        &self,
        id: DocumentId,
        ctx: &ActionContext,
    ) -> LifecycleResult<MaterialReturn> {
        self.move_to(id, MaterialReturnStatus::Completed, ctx).await
    }

    #[instrument(skip(self, ctx), fields(actor = %ctx.actor_id), err)]
    pub async fn cancel(
        &self,
        id: DocumentId,
        ctx: &ActionContext,
    ) -> LifecycleResult<MaterialReturn> {
        self.move_to(id, MaterialReturnStatus::Cancelled, ctx).await
    }
}
