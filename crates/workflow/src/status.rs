//! Typed status enums bound to a document type's graph.

use stockyard_core::DomainResult;

use crate::kind::DocumentKind;
use crate::registry::TransitionRegistry;

/// A document type's status enum.
///
/// The string form of each variant is the state name used in that type's
/// [`StatusGraph`](crate::StatusGraph); all admissibility decisions go
/// through the registry.
pub trait WorkflowStatus: Copy + Eq + core::fmt::Debug + Send + Sync + 'static {
    const KIND: DocumentKind;

    fn as_str(self) -> &'static str;

    fn parse(s: &str) -> Option<Self>;

    fn all() -> &'static [Self];

    fn is_editable(self) -> bool {
        TransitionRegistry::is_editable(Self::KIND, self.as_str())
    }

    fn is_terminal(self) -> bool {
        TransitionRegistry::is_terminal(Self::KIND, self.as_str())
    }

    fn can_transition_to(self, to: Self) -> bool {
        TransitionRegistry::is_allowed(Self::KIND, self.as_str(), to.as_str())
    }
}

/// Typed front door to [`TransitionRegistry::check`].
pub fn ensure_transition<S: WorkflowStatus>(from: S, to: S) -> DomainResult<()> {
    TransitionRegistry::check(S::KIND, from.as_str(), to.as_str())
}

/// Declare a status enum for a document type.
///
/// ```ignore
/// workflow_status! {
///     /// Gate pass status.
///     pub enum GatePassStatus for DocumentKind::GatePass {
///         Draft => "draft",
///         Released => "released",
///     }
/// }
/// ```
#[macro_export]
macro_rules! workflow_status {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident for $kind:path {
            $($variant:ident => $tag:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                #[serde(rename = $tag)]
                $variant,
            )+
        }

        impl $crate::WorkflowStatus for $name {
            const KIND: $crate::DocumentKind = $kind;

            fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $tag,)+
                }
            }

            fn parse(s: &str) -> Option<Self> {
                match s {
                    $($tag => Some($name::$variant),)+
                    _ => None,
                }
            }

            fn all() -> &'static [Self] {
                &[$($name::$variant),+]
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str($crate::WorkflowStatus::as_str(*self))
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockyard_core::DomainError;

    workflow_status! {
        enum PassStatus for DocumentKind::GatePass {
            Draft => "draft",
            Pending => "pending",
            Approved => "approved",
            Released => "released",
            Returned => "returned",
            Cancelled => "cancelled",
        }
    }

    #[test]
    fn typed_statuses_follow_the_registry() {
        assert!(ensure_transition(PassStatus::Approved, PassStatus::Released).is_ok());
        assert!(matches!(
            ensure_transition(PassStatus::Draft, PassStatus::Released),
            Err(DomainError::InvalidTransition { .. })
        ));
        assert!(PassStatus::Draft.is_editable());
        assert!(PassStatus::Returned.is_terminal());
        assert!(!PassStatus::Released.can_transition_to(PassStatus::Cancelled));
    }

    #[test]
    fn parse_and_display_agree() {
        for status in PassStatus::all() {
            assert_eq!(PassStatus::parse(&status.to_string()), Some(*status));
        }
        assert_eq!(PassStatus::parse("shipped"), None);
    }
}
