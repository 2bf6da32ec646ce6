//! End-to-end tests over the in-memory store.
//!
//! Lifecycle service → unit of work → ledger posting → commit → audit bus.
//!
//! Verifies:
//! - document transitions move stock exactly once, in the same commit
//! - rejected operations leave levels, movements and documents untouched
//! - concurrent decrements never drive a level negative
//! - audit events are published only for committed work

use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value as JsonValue;

use stockyard_core::{AggregateRoot, DomainError, ItemId, WarehouseId};
use stockyard_documents::{
    Condition, CycleCountStatus, Document, GoodsReceiptStatus, MaterialIssueStatus,
    MaterialReturnStatus, NewCountLine, NewCycleCount, NewGoodsReceipt, NewLine, NewMaterialIssue,
    NewMaterialReturn, NewReceiptLine, NewStockTransfer, StockTransfer, StockTransferPatch,
    StockTransferStatus,
};
use stockyard_events::{EventBus, EventEnvelope, InMemoryEventBus, Subscription};
use stockyard_inventory::{LedgerEntry, MovementKind};
use stockyard_workflow::DocumentKind;

use crate::audit::AuditTrail;
use crate::error::LifecycleError;
use crate::numbering::{DocumentNumbering, NumberingError};
use crate::runtime::DocumentRuntime;
use crate::services::Services;
use crate::settings::Settings;
use crate::store::{DocumentFilter, InMemoryStore};
use crate::testing::{TestStore, ctx, runtime_with};

type AuditBus = Arc<InMemoryEventBus<EventEnvelope<JsonValue>>>;

struct Harness {
    store: TestStore,
    services: Services<TestStore>,
    audit: Subscription<EventEnvelope<JsonValue>>,
}

fn setup() -> Harness {
    let _ = stockyard_observability::init_with("stockyard_infra=debug", false);

    let store = Arc::new(InMemoryStore::new());
    let bus: AuditBus = Arc::new(InMemoryEventBus::new());
    let audit = bus.subscribe();
    let services = Services::new(runtime_with(store.clone(), AuditTrail::with_bus(bus)));
    Harness {
        store,
        services,
        audit,
    }
}

async fn stock(h: &Harness, item: ItemId, wh: WarehouseId, qty: Decimal) {
    h.services.ledger.increase(item, wh, qty, &ctx()).await.unwrap();
}

async fn on_hand(h: &Harness, item: ItemId, wh: WarehouseId) -> Decimal {
    h.services.ledger.level(item, wh).await.unwrap().qty_on_hand()
}

fn domain(err: &LifecycleError) -> &DomainError {
    err.as_domain()
        .unwrap_or_else(|| panic!("expected a domain error, got {err:?}"))
}

fn two_line_transfer(a: WarehouseId, b: WarehouseId, x: ItemId, y: ItemId) -> NewStockTransfer {
    NewStockTransfer {
        source_warehouse_id: a,
        destination_warehouse_id: b,
        notes: None,
        lines: vec![NewLine::new(x, dec!(10), "ea"), NewLine::new(y, dec!(5), "ea")],
    }
}

#[tokio::test]
async fn transfer_moves_stock_out_at_ship_and_in_at_receive() {
    let h = setup();
    let transfers = &h.services.stock_transfers;
    let (a, b) = (WarehouseId::new(), WarehouseId::new());
    let (x, y) = (ItemId::new(), ItemId::new());
    stock(&h, x, a, dec!(30)).await;
    stock(&h, y, a, dec!(8)).await;

    let transfer = transfers
        .create(two_line_transfer(a, b, x, y), &ctx())
        .await
        .unwrap();
    transfers.submit(transfer.id(), &ctx()).await.unwrap();
    transfers.approve(transfer.id(), &ctx()).await.unwrap();

    let shipped = transfers.ship(transfer.id(), &ctx()).await.unwrap();
    assert_eq!(shipped.status(), StockTransferStatus::Shipped);
    assert_eq!(on_hand(&h, x, a).await, dec!(20));
    assert_eq!(on_hand(&h, y, a).await, dec!(3));
    assert_eq!(on_hand(&h, x, b).await, Decimal::ZERO);

    let received = transfers.receive(transfer.id(), &ctx()).await.unwrap();
    assert_eq!(received.status(), StockTransferStatus::Received);
    assert_eq!(on_hand(&h, x, b).await, dec!(10));
    assert_eq!(on_hand(&h, y, b).await, dec!(5));

    let outbound = h.services.ledger.movements(x, a).await.unwrap();
    let last = outbound.last().unwrap();
    assert_eq!(last.kind, MovementKind::TransferOut);
    assert_eq!(last.delta, dec!(-10));
    let reference = last.reference.as_ref().unwrap();
    assert_eq!(reference.reference_type, "stock_transfer");
    assert_eq!(reference.reference_id, transfer.id());
    assert_eq!(reference.line_no, Some(1));

    let completed = transfers.complete(transfer.id(), &ctx()).await.unwrap();
    assert_eq!(completed.status(), StockTransferStatus::Completed);
    assert_eq!(completed.header().history.len(), 5);
}

#[tokio::test]
async fn shipping_a_draft_transfer_is_rejected_without_movement() {
    let h = setup();
    let (a, b) = (WarehouseId::new(), WarehouseId::new());
    let (x, y) = (ItemId::new(), ItemId::new());
    stock(&h, x, a, dec!(10)).await;
    stock(&h, y, a, dec!(5)).await;
    let before = h.store.movement_count().await;

    let transfer = h
        .services
        .stock_transfers
        .create(two_line_transfer(a, b, x, y), &ctx())
        .await
        .unwrap();
    let err = h
        .services
        .stock_transfers
        .ship(transfer.id(), &ctx())
        .await
        .unwrap_err();

    assert!(matches!(domain(&err), DomainError::InvalidTransition { .. }));
    assert_eq!(h.store.movement_count().await, before);
    assert_eq!(on_hand(&h, x, a).await, dec!(10));
    let reloaded = h
        .services
        .stock_transfers
        .get_by_id(transfer.id())
        .await
        .unwrap();
    assert_eq!(reloaded.status(), StockTransferStatus::Draft);
}

#[tokio::test]
async fn shipping_more_than_on_hand_leaves_transfer_approved() {
    let h = setup();
    let transfers = &h.services.stock_transfers;
    let (a, b) = (WarehouseId::new(), WarehouseId::new());
    let (x, y) = (ItemId::new(), ItemId::new());
    // y is short: 5 requested, 4 on hand. x must not move either.
    stock(&h, x, a, dec!(10)).await;
    stock(&h, y, a, dec!(4)).await;

    let transfer = transfers
        .create(two_line_transfer(a, b, x, y), &ctx())
        .await
        .unwrap();
    transfers.submit(transfer.id(), &ctx()).await.unwrap();
    transfers.approve(transfer.id(), &ctx()).await.unwrap();

    let err = transfers.ship(transfer.id(), &ctx()).await.unwrap_err();
    match domain(&err) {
        DomainError::InsufficientStock {
            item_id,
            on_hand,
            requested,
            ..
        } => {
            assert_eq!(*item_id, y);
            assert_eq!(*on_hand, dec!(4));
            assert_eq!(*requested, dec!(5));
        }
        other => panic!("expected InsufficientStock, got {other:?}"),
    }
    assert_eq!(on_hand(&h, x, a).await, dec!(10));
    assert_eq!(
        transfers.get_by_id(transfer.id()).await.unwrap().status(),
        StockTransferStatus::Approved
    );
}

#[tokio::test]
async fn material_return_restocks_only_good_lines() {
    let h = setup();
    let returns = &h.services.material_returns;
    let wh = WarehouseId::new();
    let (p, q, r) = (ItemId::new(), ItemId::new(), ItemId::new());

    let mrv = returns
        .create(
            NewMaterialReturn {
                warehouse_id: wh,
                reason: Some("job cancelled".into()),
                lines: vec![
                    NewLine::new(p, dec!(5), "ea"),
                    NewLine::new(q, dec!(3), "ea").condition(Condition::Damaged),
                    NewLine::new(r, dec!(2), "ea"),
                ],
            },
            &ctx(),
        )
        .await
        .unwrap();
    returns.submit(mrv.id(), &ctx()).await.unwrap();
    returns.receive(mrv.id(), &ctx()).await.unwrap();
    let done = returns.complete(mrv.id(), &ctx()).await.unwrap();

    assert_eq!(done.status(), MaterialReturnStatus::Completed);
    assert_eq!(on_hand(&h, p, wh).await, dec!(5));
    assert_eq!(on_hand(&h, q, wh).await, Decimal::ZERO);
    assert_eq!(on_hand(&h, r, wh).await, dec!(2));
    assert!(h.services.ledger.movements(q, wh).await.unwrap().is_empty());
}

#[tokio::test]
async fn goods_receipt_books_accepted_quantity() {
    let h = setup();
    let receipts = &h.services.goods_receipts;
    let wh = WarehouseId::new();
    let item = ItemId::new();

    let grn = receipts
        .create(
            NewGoodsReceipt {
                warehouse_id: wh,
                supplier_reference: Some("PO-4471".into()),
                lines: vec![
                    NewReceiptLine::from(NewLine::new(item, dec!(50), "kg")).rejected(dec!(4)),
                ],
            },
            &ctx(),
        )
        .await
        .unwrap();
    receipts.submit(grn.id(), &ctx()).await.unwrap();
    receipts.approve(grn.id(), &ctx()).await.unwrap();
    let done = receipts.complete(grn.id(), &ctx()).await.unwrap();

    assert_eq!(done.status(), GoodsReceiptStatus::Completed);
    assert_eq!(on_hand(&h, item, wh).await, dec!(46));
    let movements = h.services.ledger.movements(item, wh).await.unwrap();
    assert_eq!(movements.len(), 1);
    assert_eq!(movements[0].kind, MovementKind::Receipt);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_decrements_never_overdraw() {
    let h = setup();
    let (item, wh) = (ItemId::new(), WarehouseId::new());
    stock(&h, item, wh, dec!(10)).await;

    let tasks: Vec<_> = (0..2)
        .map(|_| {
            let ledger = h.services.ledger.clone();
            tokio::spawn(async move { ledger.decrease(item, wh, dec!(6), &ctx(), None).await })
        })
        .collect();

    let mut succeeded = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(_) => succeeded += 1,
            Err(err) => assert!(matches!(
                domain(&err),
                DomainError::InsufficientStock { .. }
            )),
        }
    }

    assert_eq!(succeeded, 1);
    assert_eq!(on_hand(&h, item, wh).await, dec!(4));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn many_concurrent_decrements_balance_exactly() {
    let h = setup();
    let (item, wh) = (ItemId::new(), WarehouseId::new());
    stock(&h, item, wh, dec!(25)).await;

    let tasks: Vec<_> = (0..20u32)
        .map(|i| {
            let ledger = h.services.ledger.clone();
            let qty = Decimal::from(i % 3 + 1);
            tokio::spawn(async move {
                ledger
                    .decrease(item, wh, qty, &ctx(), None)
                    .await
                    .map(|_| qty)
            })
        })
        .collect();

    let mut taken = Decimal::ZERO;
    for task in tasks {
        match task.await.unwrap() {
            Ok(qty) => taken += qty,
            Err(err) => assert!(matches!(
                domain(&err),
                DomainError::InsufficientStock { .. } | DomainError::ConcurrentModification(_)
            )),
        }
    }

    let remaining = on_hand(&h, item, wh).await;
    assert!(remaining >= Decimal::ZERO);
    assert_eq!(remaining, dec!(25) - taken);

    let movements = h.services.ledger.movements(item, wh).await.unwrap();
    let last = movements.last().unwrap();
    assert_eq!(last.balance_after, remaining);
}

#[tokio::test]
async fn batch_decrease_is_all_or_nothing() {
    let h = setup();
    let wh = WarehouseId::new();
    let (plenty, short) = (ItemId::new(), ItemId::new());
    stock(&h, plenty, wh, dec!(20)).await;
    stock(&h, short, wh, dec!(1)).await;
    let before = h.store.movement_count().await;

    let err = h
        .services
        .ledger
        .decrease_batch(
            vec![
                LedgerEntry::new(plenty, wh, dec!(5), MovementKind::Issue),
                LedgerEntry::new(short, wh, dec!(2), MovementKind::Issue),
            ],
            &ctx(),
        )
        .await
        .unwrap_err();

    assert!(matches!(domain(&err), DomainError::InsufficientStock { .. }));
    assert_eq!(on_hand(&h, plenty, wh).await, dec!(20));
    assert_eq!(on_hand(&h, short, wh).await, dec!(1));
    assert_eq!(h.store.movement_count().await, before);
}

#[tokio::test]
async fn competing_issues_for_the_same_stock() {
    let h = setup();
    let issues = &h.services.material_issues;
    let (item, wh) = (ItemId::new(), WarehouseId::new());
    stock(&h, item, wh, dec!(8)).await;

    let mut ids = Vec::new();
    for dept in ["maintenance", "assembly"] {
        let miv = issues
            .create(
                NewMaterialIssue {
                    warehouse_id: wh,
                    issued_to: dept.into(),
                    lines: vec![NewLine::new(item, dec!(5), "ea")],
                },
                &ctx(),
            )
            .await
            .unwrap();
        issues.submit(miv.id(), &ctx()).await.unwrap();
        issues.approve(miv.id(), &ctx()).await.unwrap();
        ids.push(miv.id());
    }

    let first = issues.issue(ids[0], &ctx()).await.unwrap();
    assert_eq!(first.status(), MaterialIssueStatus::Issued);
    let err = issues.issue(ids[1], &ctx()).await.unwrap_err();
    assert!(matches!(domain(&err), DomainError::InsufficientStock { .. }));

    assert_eq!(on_hand(&h, item, wh).await, dec!(3));
    assert_eq!(
        issues.get_by_id(ids[1]).await.unwrap().status(),
        MaterialIssueStatus::Approved
    );
}

#[tokio::test]
async fn fields_lock_after_submission() {
    let h = setup();
    let transfers = &h.services.stock_transfers;
    let transfer = transfers
        .create(
            two_line_transfer(
                WarehouseId::new(),
                WarehouseId::new(),
                ItemId::new(),
                ItemId::new(),
            ),
            &ctx(),
        )
        .await
        .unwrap();

    let edited = transfers
        .update(
            transfer.id(),
            StockTransferPatch {
                notes: Some("urgent".into()),
                ..Default::default()
            },
            &ctx(),
        )
        .await
        .unwrap();
    assert_eq!(edited.existing.notes(), None);
    assert_eq!(edited.updated.notes(), Some("urgent"));

    transfers.submit(transfer.id(), &ctx()).await.unwrap();
    let err = transfers
        .update(
            transfer.id(),
            StockTransferPatch {
                notes: Some("too late".into()),
                ..Default::default()
            },
            &ctx(),
        )
        .await
        .unwrap_err();
    assert!(matches!(domain(&err), DomainError::FieldsLocked { .. }));
    assert_eq!(
        transfers.get_by_id(transfer.id()).await.unwrap().notes(),
        Some("urgent")
    );
}

#[tokio::test]
async fn cancellation_follows_the_graph() {
    let h = setup();
    let transfers = &h.services.stock_transfers;
    let (a, b) = (WarehouseId::new(), WarehouseId::new());
    let (x, y) = (ItemId::new(), ItemId::new());
    stock(&h, x, a, dec!(10)).await;
    stock(&h, y, a, dec!(5)).await;

    let approved = transfers
        .create(two_line_transfer(a, b, x, y), &ctx())
        .await
        .unwrap();
    transfers.submit(approved.id(), &ctx()).await.unwrap();
    transfers.approve(approved.id(), &ctx()).await.unwrap();
    let cancelled = transfers.cancel(approved.id(), &ctx()).await.unwrap();
    assert_eq!(cancelled.status(), StockTransferStatus::Cancelled);

    let err = transfers.cancel(approved.id(), &ctx()).await.unwrap_err();
    assert!(matches!(domain(&err), DomainError::InvalidTransition { .. }));

    let shipped = transfers
        .create(two_line_transfer(a, b, x, y), &ctx())
        .await
        .unwrap();
    transfers.submit(shipped.id(), &ctx()).await.unwrap();
    transfers.approve(shipped.id(), &ctx()).await.unwrap();
    transfers.ship(shipped.id(), &ctx()).await.unwrap();
    let err = transfers.cancel(shipped.id(), &ctx()).await.unwrap_err();
    assert!(matches!(domain(&err), DomainError::InvalidTransition { .. }));
}

#[tokio::test]
async fn cycle_count_adjusts_to_counted_quantities() {
    let h = setup();
    let counts = &h.services.cycle_counts;
    let wh = WarehouseId::new();
    let (over, under, exact) = (ItemId::new(), ItemId::new(), ItemId::new());
    stock(&h, over, wh, dec!(10)).await;
    stock(&h, under, wh, dec!(4)).await;
    stock(&h, exact, wh, dec!(7)).await;

    let count = counts
        .create(
            NewCycleCount {
                warehouse_id: wh,
                scheduled_for: ctx().occurred_at,
                lines: [over, under, exact]
                    .into_iter()
                    .map(|item_id| NewCountLine {
                        item_id,
                        unit_of_measure: "ea".into(),
                    })
                    .collect(),
            },
            &ctx(),
        )
        .await
        .unwrap();

    let started = counts.start(count.id(), &ctx()).await.unwrap();
    assert_eq!(started.lines()[0].system_quantity, Some(dec!(10)));

    counts.record_count(count.id(), 1, dec!(8), &ctx()).await.unwrap();
    counts.record_count(count.id(), 2, dec!(6), &ctx()).await.unwrap();
    counts.record_count(count.id(), 3, dec!(7), &ctx()).await.unwrap();
    counts.complete(count.id(), &ctx()).await.unwrap();
    let before = h.store.movement_count().await;
    h.audit.drain();

    let adjusted = counts.apply_adjustments(count.id(), &ctx()).await.unwrap();
    assert_eq!(adjusted.status(), CycleCountStatus::Adjusted);
    assert_eq!(on_hand(&h, over, wh).await, dec!(8));
    assert_eq!(on_hand(&h, under, wh).await, dec!(6));
    assert_eq!(on_hand(&h, exact, wh).await, dec!(7));
    assert_eq!(h.store.movement_count().await, before + 2);

    let envelopes = h.audit.drain();
    let posted = envelopes
        .iter()
        .find(|e| e.event_type() == "inventory.stock.posted")
        .unwrap();
    assert_eq!(posted.payload()["StockPosted"]["posting"], "set_absolute");

    let movement = h.services.ledger.movements(over, wh).await.unwrap().pop().unwrap();
    assert_eq!(movement.kind, MovementKind::Adjustment);
    assert_eq!(movement.delta, dec!(-2));
}

struct OfflineNumbering;

#[async_trait]
impl DocumentNumbering for OfflineNumbering {
    async fn next_number(&self, _kind: DocumentKind) -> Result<String, NumberingError> {
        Err(NumberingError::Unavailable("sequence service down".into()))
    }
}

#[tokio::test]
async fn numbering_failure_writes_nothing() {
    let store = Arc::new(InMemoryStore::new());
    let bus: AuditBus = Arc::new(InMemoryEventBus::new());
    let audit = bus.subscribe();
    let runtime = DocumentRuntime::new(
        store.clone(),
        Arc::new(OfflineNumbering),
        AuditTrail::with_bus(bus),
        Settings::default(),
    );
    let services = Services::new(runtime.clone());

    let err = services
        .stock_transfers
        .create(
            two_line_transfer(
                WarehouseId::new(),
                WarehouseId::new(),
                ItemId::new(),
                ItemId::new(),
            ),
            &ctx(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, LifecycleError::Numbering(_)));
    let page = runtime
        .list::<StockTransfer>(&DocumentFilter::default())
        .await
        .unwrap();
    assert_eq!(page.total, 0);
    assert!(audit.drain().is_empty());
}

#[tokio::test]
async fn audit_sees_only_committed_work() {
    let h = setup();
    let transfers = &h.services.stock_transfers;
    let (a, b) = (WarehouseId::new(), WarehouseId::new());
    let (x, y) = (ItemId::new(), ItemId::new());
    stock(&h, x, a, dec!(10)).await;
    stock(&h, y, a, dec!(5)).await;
    h.audit.drain();

    let transfer = transfers
        .create(two_line_transfer(a, b, x, y), &ctx())
        .await
        .unwrap();
    let _ = transfers.ship(transfer.id(), &ctx()).await.unwrap_err();
    transfers.submit(transfer.id(), &ctx()).await.unwrap();

    let envelopes = h.audit.drain();
    let types: Vec<&str> = envelopes.iter().map(|e| e.event_type()).collect();
    assert_eq!(types, ["document.created", "document.transitioned"]);
    assert!(
        envelopes
            .iter()
            .all(|e| e.stream_type() == "document.stock_transfer")
    );
    assert_eq!(envelopes[1].payload()["to"], "pending");
}

#[tokio::test]
async fn document_postings_reach_the_audit_trail() {
    let h = setup();
    let transfers = &h.services.stock_transfers;
    let (a, b) = (WarehouseId::new(), WarehouseId::new());
    let (x, y) = (ItemId::new(), ItemId::new());
    stock(&h, x, a, dec!(10)).await;
    stock(&h, y, a, dec!(5)).await;

    let transfer = transfers
        .create(two_line_transfer(a, b, x, y), &ctx())
        .await
        .unwrap();
    transfers.submit(transfer.id(), &ctx()).await.unwrap();
    transfers.approve(transfer.id(), &ctx()).await.unwrap();
    h.audit.drain();

    let shipper = ctx();
    transfers.ship(transfer.id(), &shipper).await.unwrap();

    let envelopes = h.audit.drain();
    let types: Vec<&str> = envelopes.iter().map(|e| e.event_type()).collect();
    assert_eq!(types, ["document.transitioned", "inventory.stock.posted"]);

    let posted = &envelopes[1];
    assert_eq!(posted.stream_type(), "inventory.level");
    assert_eq!(posted.actor_id(), shipper.actor_id);
    let body = &posted.payload()["StockPosted"];
    assert_eq!(body["posting"], "decrease");
    assert_eq!(body["movements"].as_array().map(Vec::len), Some(2));

    transfers.receive(transfer.id(), &ctx()).await.unwrap();
    let types: Vec<String> = h
        .audit
        .drain()
        .iter()
        .map(|e| e.event_type().to_owned())
        .collect();
    assert_eq!(types, ["document.transitioned", "inventory.stock.posted"]);
}

#[tokio::test]
async fn transitions_without_stock_effect_audit_no_posting() {
    let h = setup();
    let transfers = &h.services.stock_transfers;
    let transfer = transfers
        .create(
            two_line_transfer(
                WarehouseId::new(),
                WarehouseId::new(),
                ItemId::new(),
                ItemId::new(),
            ),
            &ctx(),
        )
        .await
        .unwrap();
    transfers.submit(transfer.id(), &ctx()).await.unwrap();
    transfers.approve(transfer.id(), &ctx()).await.unwrap();
    transfers.cancel(transfer.id(), &ctx()).await.unwrap();

    assert!(
        h.audit
            .drain()
            .iter()
            .all(|e| e.event_type() != "inventory.stock.posted")
    );
}

#[tokio::test]
async fn empty_batches_change_nothing() {
    let h = setup();
    let (item, wh) = (ItemId::new(), WarehouseId::new());
    stock(&h, item, wh, dec!(3)).await;
    h.audit.drain();

    let increased = h.services.ledger.increase_batch(Vec::new(), &ctx()).await.unwrap();
    let decreased = h.services.ledger.decrease_batch(Vec::new(), &ctx()).await.unwrap();

    assert!(increased.is_empty());
    assert!(decreased.is_empty());
    assert_eq!(h.store.movement_count().await, 1);
    assert_eq!(h.services.ledger.level(item, wh).await.unwrap().version(), 1);
    assert!(h.audit.drain().is_empty());
}

#[tokio::test]
async fn batch_increase_applies_every_entry_or_none() {
    let h = setup();
    let wh = WarehouseId::new();
    let (x, y) = (ItemId::new(), ItemId::new());

    let movements = h
        .services
        .ledger
        .increase_batch(
            vec![
                LedgerEntry::new(x, wh, dec!(4), MovementKind::Receipt),
                LedgerEntry::new(y, wh, dec!(6), MovementKind::Receipt),
                LedgerEntry::new(x, wh, dec!(1), MovementKind::Receipt),
            ],
            &ctx(),
        )
        .await
        .unwrap();
    assert_eq!(movements.len(), 3);
    assert_eq!(on_hand(&h, x, wh).await, dec!(5));
    assert_eq!(on_hand(&h, y, wh).await, dec!(6));

    let err = h
        .services
        .ledger
        .increase_batch(
            vec![
                LedgerEntry::new(x, wh, dec!(2), MovementKind::Receipt),
                LedgerEntry::new(y, wh, dec!(0), MovementKind::Receipt),
            ],
            &ctx(),
        )
        .await
        .unwrap_err();

    assert!(matches!(domain(&err), DomainError::InvalidQuantity(_)));
    assert_eq!(on_hand(&h, x, wh).await, dec!(5));
    assert_eq!(on_hand(&h, y, wh).await, dec!(6));
    assert_eq!(h.store.movement_count().await, 3);
}

#[tokio::test]
async fn listing_filters_by_status_and_pages() {
    let h = setup();
    let transfers = &h.services.stock_transfers;
    let mut ids = Vec::new();
    for _ in 0..3 {
        let t = transfers
            .create(
                two_line_transfer(
                    WarehouseId::new(),
                    WarehouseId::new(),
                    ItemId::new(),
                    ItemId::new(),
                ),
                &ctx(),
            )
            .await
            .unwrap();
        ids.push(t.id());
    }
    transfers.submit(ids[1], &ctx()).await.unwrap();

    let drafts = transfers
        .list(&DocumentFilter::default().status("draft"))
        .await
        .unwrap();
    assert_eq!(drafts.total, 2);

    let page = transfers
        .list(&DocumentFilter::default().page(1, 1))
        .await
        .unwrap();
    assert_eq!(page.total, 3);
    assert_eq!(page.data.len(), 1);
    assert_eq!(page.data[0].id(), ids[1]);
}
