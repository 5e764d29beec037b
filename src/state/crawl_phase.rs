/// Phase definitions for a single domain crawl
///
/// A domain moves through `Idle → RootResolved → Crawling → Finalizing → Done`,
/// or drops to `Failed` from any non-terminal phase.
use std::fmt;

/// Represents the current phase of one domain crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    // ===== Active Phases =====
    /// Domain name taken from the to-crawl queue
    Idle,

    /// Root URL formed from the domain name
    RootResolved,

    /// Fetch → extract → enqueue loop is running
    Crawling,

    /// Blank pages are being stripped and the result timestamped
    Finalizing,

    // ===== Terminal Phases =====
    /// Result is ready for the completed-results queue
    Done,

    /// Domain was dropped
    Failed,
}

impl CrawlPhase {
    /// Returns true if no further transition is possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Returns true if the crawl is still in progress
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    /// Checks whether moving from `self` to `next` is a legal transition
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        match (self, next) {
            (Self::Idle, Self::RootResolved)
            | (Self::RootResolved, Self::Crawling)
            | (Self::Crawling, Self::Finalizing)
            | (Self::Finalizing, Self::Done) => true,
            (from, Self::Failed) => from.is_active(),
            _ => false,
        }
    }

    /// Short lowercase name used in log output
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::RootResolved => "root_resolved",
            Self::Crawling => "crawling",
            Self::Finalizing => "finalizing",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
