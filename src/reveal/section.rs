use std::collections::HashSet;

use tracing::{debug, info, warn};

use super::geometry::{Region, Viewport};
use super::header::ScrollHeader;
use super::observer::{
    ObserverError, ObserverOptions, TargetHandle, VisibilityEvent, VisibilityObserver,
};
use super::store::{RevealStore, SectionKey};

/// CSS classes for a section before and after it is revealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealClasses {
    pub initial: &'static str,
    pub entered: &'static str,
}

pub const FADE_UP: RevealClasses = RevealClasses {
    initial: "opacity-0 translate-y-10",
    entered: "opacity-100 translate-y-0",
};

pub const SLIDE_IN: RevealClasses = RevealClasses {
    initial: "opacity-0 -translate-x-10",
    entered: "opacity-100 translate-x-0",
};

enum Tracking {
    Observed {
        observer: VisibilityObserver,
        handles: Vec<TargetHandle>,
    },
    /// No viewport to observe; every mounted section is shown immediately.
    FailOpen,
}

/// Wires a [`VisibilityObserver`] to a [`RevealStore`] for one page view.
pub struct SectionReveal {
    store: RevealStore,
    tracking: Tracking,
    header: ScrollHeader,
}

impl SectionReveal {
    /// Mounts `sections` against the given viewport.
    ///
    /// If the viewport or options cannot be observed the reveal degrades to
    /// showing every section rather than leaving content hidden.
    pub fn mount<I, K>(
        sections: I,
        options: ObserverOptions,
        viewport: Viewport,
    ) -> Result<Self, ObserverError>
    where
        I: IntoIterator<Item = (K, Region)>,
        K: Into<SectionKey>,
    {
        let sections: Vec<(SectionKey, Region)> = sections
            .into_iter()
            .map(|(key, region)| (key.into(), region))
            .collect();

        let mut seen = HashSet::with_capacity(sections.len());
        for (key, _) in &sections {
            if !seen.insert(key) {
                return Err(ObserverError::DuplicateKey(key.clone()));
            }
        }

        let mut header = ScrollHeader::new();
        header.on_scroll(viewport.scroll_y);
        let mut store = RevealStore::with_sections(sections.iter().map(|(key, _)| key.clone()));

        let mut observer = match VisibilityObserver::new(options, viewport) {
            Ok(observer) => observer,
            Err(reason) => {
                warn!(%reason, "Visibility observation unavailable, revealing all sections");
                for (key, _) in &sections {
                    store.mark_visible(key.clone());
                }
                return Ok(Self {
                    store,
                    tracking: Tracking::FailOpen,
                    header,
                });
            }
        };

        let mut handles = Vec::with_capacity(sections.len());
        for (key, region) in sections {
            handles.push(observer.register(key, region)?);
        }

        let mut reveal = Self {
            store,
            tracking: Tracking::Observed { observer, handles },
            header,
        };
        reveal.refresh();
        Ok(reveal)
    }

    pub fn is_fail_open(&self) -> bool {
        matches!(self.tracking, Tracking::FailOpen)
    }

    pub fn scroll_to(&mut self, scroll_y: f64) -> Vec<SectionKey> {
        self.header.on_scroll(scroll_y);
        let events = match &mut self.tracking {
            Tracking::Observed { observer, .. } => observer.scroll_to(scroll_y),
            Tracking::FailOpen => Vec::new(),
        };
        self.apply(events)
    }

    pub fn resize(&mut self, height: f64) -> Vec<SectionKey> {
        let events = match &mut self.tracking {
            Tracking::Observed { observer, .. } => match observer.resize(height) {
                Ok(events) => events,
                Err(reason) => {
                    debug!(%reason, "Ignoring unobservable resize");
                    Vec::new()
                }
            },
            Tracking::FailOpen => Vec::new(),
        };
        self.apply(events)
    }

    /// Re-evaluates the current geometry, e.g. right after mounting.
    pub fn refresh(&mut self) -> Vec<SectionKey> {
        let events = match &mut self.tracking {
            Tracking::Observed { observer, .. } => observer.poll(),
            Tracking::FailOpen => Vec::new(),
        };
        self.apply(events)
    }

    /// Feeds observer events into the store and returns the newly revealed keys.
    pub fn apply(&mut self, events: Vec<VisibilityEvent>) -> Vec<SectionKey> {
        let mut revealed = Vec::new();
        for event in events {
            match event {
                VisibilityEvent::Entered(key) => {
                    if self.store.mark_visible(key.clone()) {
                        info!(section = %key, "Section revealed");
                        revealed.push(key);
                    }
                }
                VisibilityEvent::Exited(key) => {
                    debug!(section = %key, "Section left viewport");
                }
            }
        }
        revealed
    }

    pub fn is_visible(&self, key: &str) -> bool {
        self.store.is_visible(key)
    }

    pub fn reveal_class(&self, key: &str, classes: RevealClasses) -> &'static str {
        if self.is_visible(key) {
            classes.entered
        } else {
            classes.initial
        }
    }

    /// Page header state, which follows scrolling even when reveal fails open.
    pub fn header(&self) -> &ScrollHeader {
        &self.header
    }

    pub fn store(&self) -> &RevealStore {
        &self.store
    }

    /// Stops observing every section. Reveal flags are kept.
    pub fn unmount(&mut self) {
        if let Tracking::Observed { observer, handles } = &mut self.tracking {
            for handle in handles.drain(..) {
                observer.unregister(handle);
            }
        }
    }

    pub fn observed_count(&self) -> usize {
        match &self.tracking {
            Tracking::Observed { observer, .. } => observer.len(),
            Tracking::FailOpen => 0,
        }
    }
}

impl Drop for SectionReveal {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn about_page() -> Vec<(&'static str, Region)> {
        vec![
            (SectionKey::MAIN, Region::new(0.0, 700.0)),
            (SectionKey::SERVICES, Region::new(900.0, 600.0)),
            (SectionKey::TECHNICAL, Region::new(1700.0, 500.0)),
            (SectionKey::RESEARCH, Region::new(2400.0, 500.0)),
        ]
    }

    #[test]
    fn test_mount_reveals_sections_already_on_screen() {
        let reveal =
            SectionReveal::mount(about_page(), ObserverOptions::default(), Viewport::new(0.0, 1000.0))
                .unwrap();
        assert!(reveal.is_visible(SectionKey::MAIN));
        assert!(!reveal.is_visible(SectionKey::SERVICES));
        assert_eq!(reveal.reveal_class(SectionKey::SERVICES, FADE_UP), FADE_UP.initial);
    }

    #[test]
    fn test_sections_reveal_in_scroll_order() {
        let mut reveal =
            SectionReveal::mount(about_page(), ObserverOptions::default(), Viewport::new(0.0, 1000.0))
                .unwrap();

        let keys = |revealed: Vec<SectionKey>| -> Vec<String> {
            revealed.into_iter().map(|k| k.to_string()).collect()
        };
        assert_eq!(keys(reveal.scroll_to(500.0)), vec!["services"]);
        assert_eq!(keys(reveal.scroll_to(2000.0)), vec!["technical", "research"]);
        assert!(reveal.scroll_to(0.0).is_empty());
        assert!(reveal.is_visible(SectionKey::RESEARCH));
        assert_eq!(reveal.reveal_class(SectionKey::RESEARCH, FADE_UP), FADE_UP.entered);
    }

    #[test]
    fn test_headless_mount_fails_open() {
        let reveal =
            SectionReveal::mount(about_page(), ObserverOptions::default(), Viewport::new(0.0, 0.0))
                .unwrap();
        assert!(reveal.is_fail_open());
        for (key, _) in about_page() {
            assert!(reveal.is_visible(key));
        }
    }

    #[test]
    fn test_duplicate_section_key_is_an_error() {
        let sections = vec![
            ("contact", Region::new(0.0, 100.0)),
            ("contact", Region::new(200.0, 100.0)),
        ];
        let result =
            SectionReveal::mount(sections, ObserverOptions::default(), Viewport::new(0.0, 800.0));
        assert!(matches!(result, Err(ObserverError::DuplicateKey(_))));
    }

    #[test]
    fn test_duplicate_section_key_is_an_error_without_viewport() {
        let sections = vec![
            ("contact", Region::new(0.0, 100.0)),
            ("contact", Region::new(200.0, 100.0)),
        ];
        let result =
            SectionReveal::mount(sections, ObserverOptions::default(), Viewport::new(0.0, 0.0));
        assert!(matches!(
            result,
            Err(ObserverError::DuplicateKey(key)) if key.as_str() == "contact"
        ));
    }

    #[test]
    fn test_header_follows_scroll_in_both_modes() {
        let mut observed =
            SectionReveal::mount(about_page(), ObserverOptions::default(), Viewport::new(0.0, 1000.0))
                .unwrap();
        assert!(!observed.header().is_scrolled());
        observed.scroll_to(120.0);
        assert!(observed.header().is_scrolled());
        observed.scroll_to(0.0);
        assert!(!observed.header().is_scrolled());

        let mut headless =
            SectionReveal::mount(about_page(), ObserverOptions::default(), Viewport::new(400.0, 0.0))
                .unwrap();
        assert!(headless.header().is_scrolled());
        headless.scroll_to(10.0);
        assert!(!headless.header().is_scrolled());
    }

    #[test]
    fn test_unmount_keeps_flags() {
        let mut reveal =
            SectionReveal::mount(about_page(), ObserverOptions::default(), Viewport::new(0.0, 1000.0))
                .unwrap();
        reveal.unmount();
        assert_eq!(reveal.observed_count(), 0);
        assert!(reveal.is_visible(SectionKey::MAIN));
        assert!(reveal.scroll_to(2000.0).is_empty());
    }
}
