use tracing::instrument;

use stockyard_core::{ActionContext, DocumentId};
use stockyard_documents::{NewStockTransfer, StockTransfer, StockTransferPatch, StockTransferStatus};

use crate::error::LifecycleResult;
use crate::store::Store;

document_service! {
    /// Moves stock between two warehouses: out at `ship`, in at `receive`.
    StockTransferService for StockTransfer {
        new: NewStockTransfer,
        patch: StockTransferPatch,
        status: StockTransferStatus,
    }
}

impl<S: Store> StockTransferService<S> {
    #[instrument(skip(self, ctx), fields(actor = %ctx.actor_id), err)]
    pub async fn submit(
        &self,
        id: DocumentId,
        ctx: &ActionContext,
    ) -> LifecycleResult<StockTransfer> {
        self.move_to(id, StockTransferStatus::Pending, ctx).await
    }

    #[instrument(skip(self, ctx), fields(actor = %ctx.actor_id), err)]
    pub async fn approve(
        &self,
        id: DocumentId,
        ctx: &ActionContext,
    ) -> LifecycleResult<StockTransfer> {
        self.move_to(id, StockTransferStatus::Approved, ctx).await
    }

    /// Decreases stock at the source warehouse.
    #[instrument(skip(self, ctx), fields(actor = %ctx.actor_id), err)]
    pub async fn ship(
        &self,
        id: DocumentId,
        ctx: &ActionContext,
    ) -> LifecycleResult<StockTransfer> {
        self.move_to(id, StockTransferStatus::Shipped, ctx).await
    }

    /// Increases stock at the destination warehouse.
    #[instrument(skip(self, ctx), fields(actor = %ctx.actor_id), err)]
    pub async fn receive(
        &self,
        id: DocumentId,
        ctx: &ActionContext,
    ) -> LifecycleResult<StockTransfer> {
        self.move_to(id, StockTransferStatus::Received, ctx).await
    }

    #[instrument(skip(self, ctx), fields(actor = %ctx.actor_id), err)]
    pub async fn complete(
        &self,
        id: DocumentId,
        ctx: &ActionContext,
    ) -> LifecycleResult<StockTransfer> {
        self.move_to(id, StockTransferStatus::Completed, ctx).await
    }

    #[instrument(skip(self, ctx), fields(actor = %ctx.actor_id), err)]
    pub async fn cancel(
        &self,
        id: DocumentId,
        ctx: &ActionContext,
    ) -> LifecycleResult<StockTransfer> {
        self.move_to(id, StockTransferStatus::Cancelled, ctx).await
    }
}
