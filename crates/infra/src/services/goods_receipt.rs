use tracing::instrument;

use stockyard_core::{ActionContext, DocumentId};
use stockyard_documents::{GoodsReceipt, GoodsReceiptPatch, GoodsReceiptStatus, NewGoodsReceipt};

use crate::error::LifecycleResult;
use crate::store::Store;

document_service! {
    /// Supplier deliveries; accepted quantities are booked in on `complete`.
    GoodsReceiptService for GoodsReceipt {
        new: NewGoodsReceipt,
        patch: GoodsReceiptPatch,
        status: GoodsReceiptStatus,
    }
}

impl<S: Store> GoodsReceiptService<S> {
    #[instrument(skip(self, ctx), fields(actor = %ctx.actor_id), err)]
    pub async fn submit(
        &self,
        id: DocumentId,
        ctx: &ActionContext,
    ) -> LifecycleResult<GoodsReceipt> {
        self.move_to(id, GoodsReceiptStatus::Pending, ctx).await
    }

    #[instrument(skip(self, ctx), fields(actor = %ctx.actor_id), err)]
    pub async fn approve(
        &self,
        id: DocumentId,
        ctx: &ActionContext,
    ) -> LifecycleResult<GoodsReceipt> {
        self.move_to(id, GoodsReceiptStatus::Approved, ctx).await
    }

    #[instrument(skip(self, ctx), fields(actor = %ctx.actor_id), err)]
    pub async fn complete(
        &self,
        id: DocumentId,
        ctx: &ActionContext,
    ) -> LifecycleResult<GoodsReceipt> {
        self.move_to(id, GoodsReceiptStatus::Completed, ctx).await
    }

    #[instrument(skip(self, ctx), fields(actor = %ctx.actor_id), err)]
    pub async fn cancel(
        &self,
        id: DocumentId,
        ctx: &ActionContext,
    ) -> LifecycleResult<GoodsReceipt> {
        self.move_to(id, GoodsReceiptStatus::Cancelled, ctx).await
    }
}
