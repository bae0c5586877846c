/// Crawl state definitions
///
/// A single run of the listing crawler moves through these states in order.
/// The coordinator validates every move with [`CrawlState::can_transition_to`].
use std::fmt;

/// Represents where a crawl run currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlState {
    // ===== Active States =====
    /// Nothing has been loaded yet
    Idle,

    /// The listing page has been navigated to and has settled
    Loaded,

    /// Scrolling no longer grows the page
    ScrollExhausted,

    /// Reading the summary of the item at this index
    Extracting(usize),

    /// Visiting the detail page of the record at this index
    Enriching(usize),

    // ===== Terminal States =====
    /// Every item has been processed
    Done,

    /// The run stopped early: navigation failed or shutdown was requested
    Aborted,
}

impl CrawlState {
    /// Returns true if no further transitions are possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Aborted)
    }

    /// Returns the state's name without its index
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loaded => "loaded",
            Self::ScrollExhausted => "scroll_exhausted",
            Self::Extracting(_) => "extracting",
            Self::Enriching(_) => "enriching",
            Self::Done => "done",
            Self::Aborted => "aborted",
        }
    }

    /// Checks whether moving from `self` to `next` is legal
    ///
    /// Any active state may abort. Indices advance by exactly one, and
    /// enrichment starts at index 0 once extraction is finished.
    pub fn can_transition_to(&self, next: &CrawlState) -> bool {
        use CrawlState::*;

        if !self.is_terminal() && *next == Aborted {
            return true;
        }

        match (*self, *next) {
            (Idle, Loaded) => true,
            (Loaded, ScrollExhausted) => true,
            (ScrollExhausted, Extracting(0)) => true,
            (ScrollExhausted, Done) => true,
            (Extracting(i), Extracting(j)) => j == i + 1,
            (Extracting(_), Enriching(0)) => true,
            (Extracting(_), Done) => true,
            (Enriching(i), Enriching(j)) => j == i + 1,
            (Enriching(_), Done) => true,
            _ => false,
        }
    }
}

impl fmt::Display for CrawlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Extracting(i) | Self::Enriching(i) => write!(f, "{}({})", self.name(), i),
            _ => write!(f, "{}", self.name()),
        }
    }
}
