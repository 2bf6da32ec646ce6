use std::sync::Arc;

use chrono::{DateTime, Utc};

use stockyard_core::{ActionContext, ActorId};

use crate::audit::AuditTrail;
use crate::numbering::SequentialNumbering;
use crate::runtime::DocumentRuntime;
use crate::settings::Settings;
use crate::store::InMemoryStore;

pub(crate) type TestStore = Arc<InMemoryStore>;

pub(crate) fn runtime() -> DocumentRuntime<TestStore> {
    runtime_with(Arc::new(InMemoryStore::new()), AuditTrail::disabled())
}

pub(crate) fn runtime_with(store: TestStore, audit: AuditTrail) -> DocumentRuntime<TestStore> {
    DocumentRuntime::new(
        store,
        Arc::new(SequentialNumbering::new()),
        audit,
        Settings::default(),
    )
}

pub(crate) fn runtime_with_settings(settings: Settings) -> DocumentRuntime<TestStore> {
    DocumentRuntime::new(
        Arc::new(InMemoryStore::new()),
        Arc::new(SequentialNumbering::new()),
        AuditTrail::disabled(),
        settings,
    )
}

pub(crate) fn ctx() -> ActionContext {
    ActionContext::now(ActorId::new())
}

pub(crate) fn ctx_at(at: DateTime<Utc>) -> ActionContext {
    ActionContext::new(ActorId::new(), at)
}
