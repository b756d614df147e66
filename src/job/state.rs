use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle stages of one tool invocation.
///
/// Each generation flows through: IDLE → SUBMITTED → POLLING → MATERIALIZING → DONE,
/// leaving early to FAILED or TIMED_OUT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Idle,
    Submitted,
    Polling,
    Materializing,
    Done,
    Failed,
    TimedOut,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Idle => write!(f, "IDLE"),
            Stage::Submitted => write!(f, "SUBMITTED"),
            Stage::Polling => write!(f, "POLLING"),
            Stage::Materializing => write!(f, "MATERIALIZING"),
            Stage::Done => write!(f, "DONE"),
            Stage::Failed => write!(f, "FAILED"),
            Stage::TimedOut => write!(f, "TIMED_OUT"),
        }
    }
}

impl Stage {
    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Done | Stage::Failed | Stage::TimedOut)
    }

    /// Whether `next` is a legal successor of `self`.
    ///
    /// - Every non-terminal stage may fail.
    /// - Only `Polling` may time out.
    /// - Terminal stages accept nothing.
    pub fn can_advance_to(self, next: Stage) -> bool {
        match (self, next) {
            (from, _) if from.is_terminal() => false,
            (_, Stage::Failed) => true,
            (Stage::Idle, Stage::Submitted) => true,
            (Stage::Submitted, Stage::Polling) => true,
            (Stage::Polling, Stage::Materializing) => true,
            (Stage::Polling, Stage::TimedOut) => true,
            (Stage::Materializing, Stage::Done) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Stage; 7] = [
        Stage::Idle,
        Stage::Submitted,
        Stage::Polling,
        Stage::Materializing,
        Stage::Done,
        Stage::Failed,
        Stage::TimedOut,
    ];

    #[test]
    fn happy_path_is_legal() {
        assert!(Stage::Idle.can_advance_to(Stage::Submitted));
        assert!(Stage::Submitted.can_advance_to(Stage::Polling));
        assert!(Stage::Polling.can_advance_to(Stage::Materializing));
        assert!(Stage::Materializing.can_advance_to(Stage::Done));
    }

    #[test]
    fn terminal_stages_never_advance() {
        for from in [Stage::Done, Stage::Failed, Stage::TimedOut] {
            for to in ALL {
                assert!(!from.can_advance_to(to), "{from} -> {to} must be rejected");
            }
        }
    }

    #[test]
    fn only_polling_times_out() {
        for from in ALL {
            assert_eq!(
                from.can_advance_to(Stage::TimedOut),
                from == Stage::Polling,
                "{from} -> TIMED_OUT"
            );
        }
    }

    #[test]
    fn stages_cannot_be_skipped() {
        assert!(!Stage::Idle.can_advance_to(Stage::Polling));
        assert!(!Stage::Submitted.can_advance_to(Stage::Materializing));
        assert!(!Stage::Polling.can_advance_to(Stage::Done));
    }

    #[test]
    fn stage_display() {
        assert_eq!(Stage::Idle.to_string(), "IDLE");
        assert_eq!(Stage::Materializing.to_string(), "MATERIALIZING");
        assert_eq!(Stage::TimedOut.to_string(), "TIMED_OUT");
    }
}
