//! Order item status and the static transition table
//!
//! The transition table is the single authority on which status changes are
//! legal. Every operation on an order item must consult
//! [`ItemStatus::can_transition`] before mutating anything.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of one order-item batch
///
/// A batch is a quantity of identical units sharing one status; partial
/// operations split a batch into two siblings, each tracked independently.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemStatus {
    #[default]
    Ordered,
    Shipped,
    Delivered,
    Cancelled,
    ReturnRequested,
    DepartedForReturning,
    Returned,
    ReturnCancelled,
    Refunded,
}

impl ItemStatus {
    /// All statuses, in lifecycle order
    pub const ALL: [ItemStatus; 9] = [
        Self::Ordered,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
        Self::ReturnRequested,
        Self::DepartedForReturning,
        Self::Returned,
        Self::ReturnCancelled,
        Self::Refunded,
    ];

    /// Legal next statuses from this one
    pub fn next(&self) -> &'static [ItemStatus] {
        match self {
            Self::Ordered => &[Self::Cancelled, Self::Shipped],
            Self::Shipped => &[Self::Delivered],
            Self::Delivered => &[Self::ReturnRequested],
            Self::Cancelled => &[Self::Refunded],
            Self::ReturnRequested => &[Self::DepartedForReturning, Self::ReturnCancelled],
            Self::DepartedForReturning => &[Self::Returned, Self::ReturnCancelled],
            Self::Returned => &[Self::Refunded],
            Self::ReturnCancelled => &[],
            Self::Refunded => &[],
        }
    }

    /// Whether `target` is a legal next status from `self`
    pub fn can_transition(&self, target: ItemStatus) -> bool {
        self.next().contains(&target)
    }

    /// Terminal statuses have no outgoing transitions
    pub fn is_terminal(&self) -> bool {
        self.next().is_empty()
    }

    /// Whether this status belongs to an in-flight return
    pub fn is_return_related(&self) -> bool {
        matches!(self, Self::ReturnRequested | Self::DepartedForReturning)
    }

    /// Display label matching the storefront wording
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ordered => "Ordered",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
            Self::ReturnRequested => "Return Requested",
            Self::DepartedForReturning => "Departed For Returning",
            Self::Returned => "Returned",
            Self::ReturnCancelled => "Return Cancelled",
            Self::Refunded => "Refunded",
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Derive the overall order status from its item statuses.
///
/// Pure function, recomputed on every read and never persisted. Priority:
/// any return-related item dominates, then all-delivered, all-cancelled,
/// all-returned, all-refunded, any-shipped, and `Ordered` as the default.
pub fn overall_status(statuses: &[ItemStatus]) -> ItemStatus {
    if statuses.iter().any(|s| s.is_return_related()) {
        return ItemStatus::ReturnRequested;
    }
    if !statuses.is_empty() {
        if statuses.iter().all(|s| *s == ItemStatus::Delivered) {
            return ItemStatus::Delivered;
        }
        if statuses.iter().all(|s| *s == ItemStatus::Cancelled) {
            return ItemStatus::Cancelled;
        }
        if statuses.iter().all(|s| *s == ItemStatus::Returned) {
            return ItemStatus::Returned;
        }
        if statuses.iter().all(|s| *s == ItemStatus::Refunded) {
            return ItemStatus::Refunded;
        }
    }
    if statuses.contains(&ItemStatus::Shipped) {
        return ItemStatus::Shipped;
    }
    ItemStatus::Ordered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_table_adjacency() {
        use ItemStatus::*;
        assert!(Ordered.can_transition(Cancelled));
        assert!(Ordered.can_transition(Shipped));
        assert!(Shipped.can_transition(Delivered));
        assert!(Delivered.can_transition(ReturnRequested));
        assert!(Cancelled.can_transition(Refunded));
        assert!(ReturnRequested.can_transition(DepartedForReturning));
        assert!(ReturnRequested.can_transition(ReturnCancelled));
        assert!(DepartedForReturning.can_transition(Returned));
        assert!(DepartedForReturning.can_transition(ReturnCancelled));
        assert!(Returned.can_transition(Refunded));
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(ItemStatus::Refunded.is_terminal());
        assert!(ItemStatus::ReturnCancelled.is_terminal());
        assert!(!ItemStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_illegal_transitions_rejected() {
        use ItemStatus::*;
        // Spot checks on pairs outside the adjacency
        assert!(!Ordered.can_transition(Delivered));
        assert!(!Cancelled.can_transition(ReturnRequested));
        assert!(!Delivered.can_transition(Cancelled));
        assert!(!Refunded.can_transition(Ordered));
        assert!(!Shipped.can_transition(Cancelled));

        // Exhaustive: every pair not listed in next() must be rejected
        for current in ItemStatus::ALL {
            for target in ItemStatus::ALL {
                let legal = current.next().contains(&target);
                assert_eq!(current.can_transition(target), legal);
            }
        }
    }

    #[test]
    fn test_overall_status_priority() {
        use ItemStatus::*;
        assert_eq!(overall_status(&[Ordered, ReturnRequested]), ReturnRequested);
        assert_eq!(
            overall_status(&[Delivered, DepartedForReturning]),
            ReturnRequested
        );
        assert_eq!(overall_status(&[Delivered, Delivered]), Delivered);
        assert_eq!(overall_status(&[Cancelled, Cancelled]), Cancelled);
        assert_eq!(overall_status(&[Returned]), Returned);
        assert_eq!(overall_status(&[Refunded, Refunded]), Refunded);
        assert_eq!(overall_status(&[Ordered, Shipped]), Shipped);
        assert_eq!(overall_status(&[Ordered, Delivered]), Ordered);
        assert_eq!(overall_status(&[]), Ordered);
    }

    #[test]
    fn test_serde_screaming_snake_case() {
        let json = serde_json::to_string(&ItemStatus::ReturnRequested).unwrap();
        assert_eq!(json, "\"RETURN_REQUESTED\"");
        let back: ItemStatus = serde_json::from_str("\"DEPARTED_FOR_RETURNING\"").unwrap();
        assert_eq!(back, ItemStatus::DepartedForReturning);
    }
}
