use serde::Serialize;

/// Approval lifecycle of a time entry, in order of increasing finality.
///
/// Valid edges: Draft → Submitted → Approved → Locked, plus the single
/// reverse edge Locked → Approved ("unlock for correction"). Everything
/// else is rejected by [`ApprovalState::can_transition`].
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum ApprovalState {
    Draft,
    Submitted,
    Approved,
    Locked,
}

impl ApprovalState {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            ApprovalState::Draft => "draft",
            ApprovalState::Submitted => "submitted",
            ApprovalState::Approved => "approved",
            ApprovalState::Locked => "locked",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(ApprovalState::Draft),
            "submitted" => Some(ApprovalState::Submitted),
            "approved" => Some(ApprovalState::Approved),
            "locked" => Some(ApprovalState::Locked),
            _ => None,
        }
    }

    pub fn is_locked(&self) -> bool {
        matches!(self, ApprovalState::Locked)
    }

    /// Entry counts toward billable totals only once approved or locked.
    pub fn is_billable(&self) -> bool {
        matches!(self, ApprovalState::Approved | ApprovalState::Locked)
    }

    /// The full transition table. Unlock (Locked → Approved) is listed here
    /// but carries extra authorization and reason requirements enforced by
    /// the approval module.
    pub fn can_transition(from: Self, to: Self) -> bool {
        use ApprovalState::*;
        matches!(
            (from, to),
            (Draft, Submitted)
                | (Draft, Approved)
                | (Submitted, Submitted)
                | (Submitted, Approved)
                | (Approved, Locked)
                | (Locked, Approved)
        )
    }
}

impl std::fmt::Display for ApprovalState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.to_db_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_string_round_trip() {
        for s in [
            ApprovalState::Draft,
            ApprovalState::Submitted,
            ApprovalState::Approved,
            ApprovalState::Locked,
        ] {
            assert_eq!(ApprovalState::from_db_str(s.to_db_str()), Some(s));
        }
        assert_eq!(ApprovalState::from_db_str("billed"), None);
    }

    #[test]
    fn only_approved_and_locked_bill() {
        assert!(!ApprovalState::Draft.is_billable());
        assert!(!ApprovalState::Submitted.is_billable());
        assert!(ApprovalState::Approved.is_billable());
        assert!(ApprovalState::Locked.is_billable());
    }

    #[test]
    fn transition_table_rejects_skips() {
        use ApprovalState::*;
        assert!(ApprovalState::can_transition(Draft, Submitted));
        assert!(ApprovalState::can_transition(Draft, Approved));
        assert!(ApprovalState::can_transition(Approved, Locked));
        assert!(ApprovalState::can_transition(Locked, Approved));

        assert!(!ApprovalState::can_transition(Draft, Locked));
        assert!(!ApprovalState::can_transition(Submitted, Locked));
        assert!(!ApprovalState::can_transition(Locked, Draft));
        assert!(!ApprovalState::can_transition(Approved, Draft));
        assert!(!ApprovalState::can_transition(Approved, Submitted));
    }
}
