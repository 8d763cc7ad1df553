use tracing::debug;

/// Scroll offset past which the page header switches to its solid style.
pub const SCROLLED_OFFSET: f64 = 50.0;

pub const HEADER_SCROLLED_CLASS: &str = "bg-slate-900/95 backdrop-blur-md border-b border-slate-700/50";
pub const HEADER_TOP_CLASS: &str = "bg-transparent";

/// Tracks whether the page has scrolled away from the top.
///
/// Unlike section reveal this flag goes both ways.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollHeader {
    scrolled: bool,
}

impl ScrollHeader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates the flag for a new scroll position. Returns true if it changed.
    pub fn on_scroll(&mut self, scroll_y: f64) -> bool {
        // NaN compares false, which keeps the header in its top style
        let scrolled = scroll_y > SCROLLED_OFFSET;
        if scrolled == self.scrolled {
            return false;
        }
        self.scrolled = scrolled;
        debug!(scrolled, scroll_y, "Header style changed");
        true
    }

    pub fn is_scrolled(&self) -> bool {
        self.scrolled
    }

    pub fn class(&self) -> &'static str {
        if self.scrolled {
            HEADER_SCROLLED_CLASS
        } else {
            HEADER_TOP_CLASS
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_is_strictly_greater() {
        let mut header = ScrollHeader::new();
        assert!(!header.on_scroll(SCROLLED_OFFSET));
        assert!(!header.is_scrolled());
        assert!(header.on_scroll(50.5));
        assert_eq!(header.class(), HEADER_SCROLLED_CLASS);
    }

    #[test]
    fn test_returns_to_top_style() {
        let mut header = ScrollHeader::new();
        header.on_scroll(300.0);
        assert!(!header.on_scroll(800.0));
        assert!(header.on_scroll(0.0));
        assert_eq!(header.class(), HEADER_TOP_CLASS);
    }

    #[test]
    fn test_non_finite_offset_stays_at_top() {
        let mut header = ScrollHeader::new();
        assert!(!header.on_scroll(f64::NAN));
        assert!(!header.is_scrolled());
    }
}
