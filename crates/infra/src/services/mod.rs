//! Per-type lifecycle services.
//!
//! Each service is a thin, typed face over [`DocumentRuntime`]: it names the
//! operations a document type supports and maps each one to a guarded
//! transition. All loading, posting, committing and auditing happens in the
//! runtime.
//!
//! [`DocumentRuntime`]: crate::runtime::DocumentRuntime

/// Declares a service struct with the operations every document type shares:
/// `create`, `update`, `get_by_id`, `list`, plus a private `move_to` helper
/// for plain transitions.
macro_rules! document_service {
    (
        $(#[$meta:meta])*
        $service:ident for $doc:ty {
            new: $new:ty,
            patch: $patch:ty,
            status: $status:ty $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $service<S> {
            runtime: $crate::runtime::DocumentRuntime<S>,
        }

        impl<S: $crate::store::Store> $service<S> {
            pub fn new(runtime: $crate::runtime::DocumentRuntime<S>) -> Self {
                Self { runtime }
            }

            #[tracing::instrument(skip_all, fields(actor = %ctx.actor_id), err)]
            pub async fn create(
                &self,
                input: $new,
                ctx: &::stockyard_core::ActionContext,
            ) -> $crate::error::LifecycleResult<$doc> {
                self.runtime
                    .create(|header| <$doc>::create(header, input), ctx)
                    .await
            }

            /// Field edit; only accepted while the document is editable.
            #[tracing::instrument(skip(self, patch, ctx), fields(actor = %ctx.actor_id), err)]
            pub async fn update(
                &self,
                id: ::stockyard_core::DocumentId,
                patch: $patch,
                ctx: &::stockyard_core::ActionContext,
            ) -> $crate::error::LifecycleResult<::stockyard_documents::Updated<$doc>> {
                self.runtime.update::<$doc>(id, patch, ctx).await
            }

            pub async fn get_by_id(
                &self,
                id: ::stockyard_core::DocumentId,
            ) -> $crate::error::LifecycleResult<$doc> {
                self.runtime.get::<$doc>(id).await
            }

            pub async fn list(
                &self,
                filter: &$crate::store::DocumentFilter,
            ) -> $crate::error::LifecycleResult<$crate::store::Page<$doc>> {
                self.runtime.list::<$doc>(filter).await
            }

            async fn move_to(
                &self,
                id: ::stockyard_core::DocumentId,
                to: $status,
                ctx: &::stockyard_core::ActionContext,
            ) -> $crate::error::LifecycleResult<$doc> {
                self.runtime.transition::<$doc>(id, to, ctx).await
            }
        }
    };
}

pub mod cycle_count;
pub mod gate_pass;
pub mod goods_receipt;
pub mod material_issue;
pub mod material_return;
pub mod stock_transfer;
pub mod surplus;
pub mod tool;

pub use cycle_count::CycleCountService;
pub use gate_pass::GatePassService;
pub use goods_receipt::GoodsReceiptService;
pub use material_issue::MaterialIssueService;
pub use material_return::MaterialReturnService;
pub use stock_transfer::StockTransferService;
pub use surplus::{ActionOutcome, SurplusService};
pub use tool::ToolService;

use crate::ledger::InventoryLedger;
use crate::runtime::DocumentRuntime;
use crate::store::Store;

/// Every service over one store, sharing one runtime.
#[derive(Debug, Clone)]
pub struct Services<S> {
    pub ledger: InventoryLedger<S>,
    pub goods_receipts: GoodsReceiptService<S>,
    pub material_issues: MaterialIssueService<S>,
    pub material_returns: MaterialReturnService<S>,
    pub stock_transfers: StockTransferService<S>,
    pub gate_passes: GatePassService<S>,
    pub surplus: SurplusService<S>,
    pub tools: ToolService<S>,
    pub cycle_counts: CycleCountService<S>,
}

impl<S: Store + Clone> Services<S> {
    pub fn new(runtime: DocumentRuntime<S>) -> Self {
        Self {
            ledger: InventoryLedger::new(
                runtime.store().clone(),
                runtime.audit().clone(),
                &runtime.settings().ledger,
            ),
            goods_receipts: GoodsReceiptService::new(runtime.clone()),
            material_issues: MaterialIssueService::new(runtime.clone()),
            material_returns: MaterialReturnService::new(runtime.clone()),
            stock_transfers: StockTransferService::new(runtime.clone()),
            gate_passes: GatePassService::new(runtime.clone()),
            surplus: SurplusService::new(runtime.clone()),
            tools: ToolService::new(runtime.clone()),
            cycle_counts: CycleCountService::new(runtime),
        }
    }
}
