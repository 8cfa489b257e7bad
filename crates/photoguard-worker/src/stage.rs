use std::fmt::{Display, Formatter, Result as FmtResult};

/// Furthest point a run reached.
///
/// Success path:
/// `Start -> MarkedProcessing -> Fetched -> Decoded -> Detected ->
/// {Unchanged | Redacted -> Replaced} -> MarkedComplete`.
/// `MarkedFailed` is absorbing and reachable from any stage after
/// `MarkedProcessing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Start,
    MarkedProcessing,
    Fetched,
    Decoded,
    Detected,
    Unchanged,
    Redacted,
    Replaced,
    MarkedComplete,
    MarkedFailed,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Start => "start",
            Stage::MarkedProcessing => "marked_processing",
            Stage::Fetched => "fetched",
            Stage::Decoded => "decoded",
            Stage::Detected => "detected",
            Stage::Unchanged => "unchanged",
            Stage::Redacted => "redacted",
            Stage::Replaced => "replaced",
            Stage::MarkedComplete => "marked_complete",
            Stage::MarkedFailed => "marked_failed",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::MarkedComplete | Stage::MarkedFailed)
    }

    /// Whether `next` is a legal successor of `self`.
    pub fn can_advance_to(self, next: Stage) -> bool {
        use Stage::*;
        match (self, next) {
            (Start, MarkedProcessing)
            | (MarkedProcessing, Fetched)
            | (Fetched, Decoded)
            | (Decoded, Detected)
            | (Detected, Unchanged)
            | (Detected, Redacted)
            | (Redacted, Replaced)
            | (Unchanged, MarkedComplete)
            | (Replaced, MarkedComplete) => true,
            (from, MarkedFailed) => from != Start && !from.is_terminal(),
            _ => false,
        }
    }
}

impl Display for Stage {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_path_is_legal() {
        let path = [
            Stage::Start,
            Stage::MarkedProcessing,
            Stage::Fetched,
            Stage::Decoded,
            Stage::Detected,
            Stage::Redacted,
            Stage::Replaced,
            Stage::MarkedComplete,
        ];
        for pair in path.windows(2) {
            assert!(pair[0].can_advance_to(pair[1]), "{} -> {}", pair[0], pair[1]);
        }
        assert!(Stage::Detected.can_advance_to(Stage::Unchanged));
        assert!(Stage::Unchanged.can_advance_to(Stage::MarkedComplete));
    }

    #[test]
    fn test_failed_reachable_only_after_processing_marker() {
        assert!(!Stage::Start.can_advance_to(Stage::MarkedFailed));
        assert!(Stage::MarkedProcessing.can_advance_to(Stage::MarkedFailed));
        assert!(Stage::Redacted.can_advance_to(Stage::MarkedFailed));
        assert!(!Stage::MarkedComplete.can_advance_to(Stage::MarkedFailed));
        assert!(!Stage::MarkedFailed.can_advance_to(Stage::MarkedFailed));
    }

    #[test]
    fn test_no_skipping_replacement() {
        assert!(!Stage::Redacted.can_advance_to(Stage::MarkedComplete));
        assert!(!Stage::Fetched.can_advance_to(Stage::Detected));
    }
}
