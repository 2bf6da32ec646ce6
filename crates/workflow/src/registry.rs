//! Admissibility checks over the static status graphs.

use stockyard_core::{DomainError, DomainResult};

use crate::graph::{
    CYCLE_COUNT, GATE_PASS, GOODS_RECEIPT, MATERIAL_ISSUE, MATERIAL_RETURN, STOCK_TRANSFER,
    SURPLUS_ITEM, StatusGraph, TOOL,
};
use crate::kind::DocumentKind;

/// Lookup over the per-type status graphs.
///
/// Stateless and backed by `static` tables, so it is safe to call from any
/// number of tasks without coordination.
#[derive(Debug, Default, Copy, Clone)]
pub struct TransitionRegistry;

impl TransitionRegistry {
    pub fn graph(kind: DocumentKind) -> &'static StatusGraph {
        match kind {
            DocumentKind::GoodsReceipt => &GOODS_RECEIPT,
            DocumentKind::MaterialIssue => &MATERIAL_ISSUE,
            DocumentKind::MaterialReturn => &MATERIAL_RETURN,
            DocumentKind::StockTransfer => &STOCK_TRANSFER,
            DocumentKind::GatePass => &GATE_PASS,
            DocumentKind::SurplusItem => &SURPLUS_ITEM,
            DocumentKind::Tool => &TOOL,
            DocumentKind::CycleCount => &CYCLE_COUNT,
        }
    }

    pub fn is_allowed(kind: DocumentKind, from: &str, to: &str) -> bool {
        from != to && Self::graph(kind).has_edge(from, to)
    }

    /// Succeeds iff `from -> to` is a declared edge of `kind`'s graph.
    ///
    /// Self-transitions, unknown statuses and undeclared edges all fail with
    /// `InvalidTransition`.
    pub fn check(kind: DocumentKind, from: &str, to: &str) -> DomainResult<()> {
        if Self::is_allowed(kind, from, to) {
            Ok(())
        } else {
            Err(DomainError::invalid_transition(kind.as_str(), from, to))
        }
    }

    pub fn initial(kind: DocumentKind) -> &'static str {
        Self::graph(kind).initial
    }

    /// Field edits are only allowed in the initial state.
    pub fn is_editable(kind: DocumentKind, status: &str) -> bool {
        Self::graph(kind).initial == status
    }

    pub fn is_terminal(kind: DocumentKind, status: &str) -> bool {
        Self::graph(kind).is_terminal(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::{HashSet, VecDeque};

    #[test]
    fn every_declared_edge_is_admissible() {
        for kind in DocumentKind::ALL {
            for &(from, to) in TransitionRegistry::graph(kind).edges {
                assert!(
                    TransitionRegistry::check(kind, from, to).is_ok(),
                    "{kind}: {from} -> {to} should be legal"
                );
            }
        }
    }

    #[test]
    fn undeclared_pairs_fail_with_invalid_transition() {
        for kind in DocumentKind::ALL {
            let graph = TransitionRegistry::graph(kind);
            for &from in graph.states {
                for &to in graph.states {
                    let declared = graph.edges.contains(&(from, to));
                    let result = TransitionRegistry::check(kind, from, to);
                    if declared {
                        assert!(result.is_ok());
                    } else {
                        match result {
                            Err(DomainError::InvalidTransition { document, .. }) => {
                                assert_eq!(document, kind.as_str())
                            }
                            other => panic!("{kind}: {from} -> {to} gave {other:?}"),
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn self_transitions_are_rejected() {
        for kind in DocumentKind::ALL {
            for &status in TransitionRegistry::graph(kind).states {
                assert!(TransitionRegistry::check(kind, status, status).is_err());
            }
        }
    }

    #[test]
    fn graphs_are_well_formed() {
        for kind in DocumentKind::ALL {
            let graph = TransitionRegistry::graph(kind);
            assert_eq!(graph.kind, kind);
            assert!(graph.has_state(graph.initial));

            for &(from, to) in graph.edges {
                assert!(graph.has_state(from), "{kind}: unknown source {from}");
                assert!(graph.has_state(to), "{kind}: unknown target {to}");
                assert_ne!(from, to);
            }

            // Every state is reachable from the initial state.
            let mut seen = HashSet::from([graph.initial]);
            let mut queue = VecDeque::from([graph.initial]);
            while let Some(s) = queue.pop_front() {
                for t in graph.targets(s) {
                    if seen.insert(t) {
                        queue.push_back(t);
                    }
                }
            }
            assert_eq!(seen.len(), graph.states.len(), "{kind}: unreachable state");

            assert!(graph.terminal_states().next().is_some(), "{kind}: no terminal state");
        }
    }

    #[test]
    fn cancellation_is_multi_source_and_never_leaves_terminal_states() {
        for kind in DocumentKind::ALL {
            let graph = TransitionRegistry::graph(kind);
            if !graph.has_state("cancelled") {
                continue;
            }

            let sources: Vec<_> = graph.sources("cancelled").collect();
            assert!(sources.len() > 1, "{kind}: cancellation should have several sources");
            for source in &sources {
                assert!(TransitionRegistry::check(kind, source, "cancelled").is_ok());
            }
            for terminal in graph.terminal_states() {
                assert!(TransitionRegistry::check(kind, terminal, "cancelled").is_err());
            }
        }
    }

    #[test]
    fn stock_transfer_lifecycle_matches_declared_flow() {
        let kind = DocumentKind::StockTransfer;
        let path = ["draft", "pending", "approved", "shipped", "received", "completed"];
        for pair in path.windows(2) {
            assert!(TransitionRegistry::check(kind, pair[0], pair[1]).is_ok());
        }
        assert!(TransitionRegistry::check(kind, "draft", "shipped").is_err());
        assert!(TransitionRegistry::check(kind, "shipped", "cancelled").is_err());
        assert!(TransitionRegistry::is_terminal(kind, "completed"));
        assert!(TransitionRegistry::is_terminal(kind, "cancelled"));
        assert!(TransitionRegistry::is_editable(kind, "draft"));
        assert!(!TransitionRegistry::is_editable(kind, "pending"));
    }

    fn any_kind() -> impl Strategy<Value = DocumentKind> {
        (0..DocumentKind::ALL.len()).prop_map(|i| DocumentKind::ALL[i])
    }

    fn any_status() -> impl Strategy<Value = String> {
        let mut known: Vec<&'static str> = DocumentKind::ALL
            .iter()
            .flat_map(|k| TransitionRegistry::graph(*k).states.iter().copied())
            .collect();
        known.sort_unstable();
        known.dedup();
        prop_oneof![
            proptest::sample::select(known).prop_map(str::to_string),
            "[a-z_]{1,12}",
        ]
    }

    proptest! {
        #[test]
        fn check_succeeds_iff_edge_is_declared(
            kind in any_kind(),
            from in any_status(),
            to in any_status(),
        ) {
            let declared = TransitionRegistry::graph(kind)
                .edges
                .iter()
                .any(|&(f, t)| f == from && t == to);
            prop_assert_eq!(TransitionRegistry::check(kind, &from, &to).is_ok(), declared);
        }
    }
}
