use chrono::{TimeZone, Utc};

use stockyard_core::{ActionContext, ActorId, DocumentId};
use stockyard_workflow::DocumentKind;

use crate::document::DocumentHeader;

pub(crate) fn ctx() -> ActionContext {
    ActionContext::new(ActorId::new(), Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap())
}

pub(crate) fn header(kind: DocumentKind) -> DocumentHeader {
    DocumentHeader::new(
        DocumentId::new(),
        format!("{}-000001", kind.number_prefix()),
        &ctx(),
    )
}
