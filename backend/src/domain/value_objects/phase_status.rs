use serde::{Deserialize, Serialize};

/// Status of a single roadmap phase.
///
/// Allowed moves:
///
/// | from        | to                              |
/// |-------------|---------------------------------|
/// | `pending`   | `active`, `in_review`, `delayed` |
/// | `active`    | `in_review`, `delayed`          |
/// | `in_review` | `completed`, `active`           |
/// | `delayed`   | `active`, `in_review`           |
/// | `completed` | none                            |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseStatus {
    #[default]
    Pending,
    Active,
    InReview,
    Delayed,
    Completed,
}

impl PhaseStatus {
    pub fn allowed_next(&self) -> &'static [PhaseStatus] {
        use PhaseStatus::*;
        match self {
            Pending => &[Active, InReview, Delayed],
            Active => &[InReview, Delayed],
            InReview => &[Completed, Active],
            Delayed => &[Active, InReview],
            Completed => &[],
        }
    }

    pub fn can_transition_to(&self, next: PhaseStatus) -> bool {
        self.allowed_next().contains(&next)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PhaseStatus::Pending => "pending",
            PhaseStatus::Active => "active",
            PhaseStatus::InReview => "in_review",
            PhaseStatus::Delayed => "delayed",
            PhaseStatus::Completed => "completed",
        }
    }
}

impl std::fmt::Display for PhaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completed_is_terminal() {
        assert!(PhaseStatus::Completed.allowed_next().is_empty());
    }

    #[test]
    fn test_mark_ready_sources() {
        assert!(PhaseStatus::Pending.can_transition_to(PhaseStatus::InReview));
        assert!(PhaseStatus::Active.can_transition_to(PhaseStatus::InReview));
        assert!(!PhaseStatus::InReview.can_transition_to(PhaseStatus::InReview));
    }

    #[test]
    fn test_wire_form_is_snake_case() {
        let json = serde_json::to_string(&PhaseStatus::InReview).unwrap();
        assert_eq!(json, "\"in_review\"");
    }
}
