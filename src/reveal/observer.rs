use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, trace};

use super::geometry::{Intersection, Region, Viewport};
use super::store::SectionKey;

pub const DEFAULT_THRESHOLD: f64 = 0.1;
pub const DEFAULT_ROOT_MARGIN_BOTTOM: f64 = 0.1;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ObservationUnavailable {
    #[error("viewport height {0} cannot be observed")]
    Viewport(f64),
    #[error("threshold {0} is outside 0..=1")]
    Threshold(f64),
    #[error("bottom root margin {0} is outside 0..1")]
    RootMargin(f64),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ObserverError {
    #[error("section '{0}' is already being observed")]
    DuplicateKey(SectionKey),
    #[error("visibility observation unavailable: {0}")]
    Unavailable(#[from] ObservationUnavailable),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverOptions {
    pub threshold: f64,
    pub root_margin_bottom: f64,
}

impl Default for ObserverOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            root_margin_bottom: DEFAULT_ROOT_MARGIN_BOTTOM,
        }
    }
}

impl ObserverOptions {
    pub fn validate(&self) -> Result<(), ObservationUnavailable> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(ObservationUnavailable::Threshold(self.threshold));
        }
        if !(0.0..1.0).contains(&self.root_margin_bottom) {
            return Err(ObservationUnavailable::RootMargin(self.root_margin_bottom));
        }
        Ok(())
    }
}

/// Opaque handle returned by [`VisibilityObserver::register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetHandle(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisibilityEvent {
    Entered(SectionKey),
    Exited(SectionKey),
}

/// A registered region and the key it reports under.
#[derive(Debug, Clone)]
struct ObservedTarget {
    key: SectionKey,
    region: Region,
    entered: bool,
    intersecting: bool,
}

/// Watches registered regions against a scrolling viewport.
///
/// `Entered` fires at most once per registration. `Exited` fires whenever an
/// intersecting region leaves the root again.
#[derive(Debug)]
pub struct VisibilityObserver {
    options: ObserverOptions,
    viewport: Viewport,
    targets: HashMap<TargetHandle, ObservedTarget>,
    next_handle: u64,
}

impl VisibilityObserver {
    pub fn new(options: ObserverOptions, viewport: Viewport) -> Result<Self, ObservationUnavailable> {
        options.validate()?;
        if !viewport.is_observable() {
            return Err(ObservationUnavailable::Viewport(viewport.height));
        }

        Ok(Self {
            options,
            viewport,
            targets: HashMap::new(),
            next_handle: 0,
        })
    }

    pub fn options(&self) -> ObserverOptions {
        self.options
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Starts watching `region` under `key`.
    ///
    /// Regions already on screen are evaluated on the next [`poll`](Self::poll).
    pub fn register(
        &mut self,
        key: impl Into<SectionKey>,
        region: Region,
    ) -> Result<TargetHandle, ObserverError> {
        let key = key.into();
        if self.targets.values().any(|target| target.key == key) {
            return Err(ObserverError::DuplicateKey(key));
        }

        let handle = TargetHandle(self.next_handle);
        self.next_handle += 1;
        debug!(section = %key, top = region.top, height = region.height, "Observing section");

        self.targets.insert(
            handle,
            ObservedTarget {
                key,
                region,
                entered: false,
                intersecting: false,
            },
        );
        Ok(handle)
    }

    /// Stops watching. Stale handles are ignored.
    pub fn unregister(&mut self, handle: TargetHandle) -> Option<SectionKey> {
        let removed = self.targets.remove(&handle).map(|target| target.key);
        if let Some(key) = &removed {
            debug!(section = %key, "Stopped observing section");
        }
        removed
    }

    /// Moves a registered region after a layout change.
    pub fn relayout(&mut self, handle: TargetHandle, region: Region) -> Vec<VisibilityEvent> {
        match self.targets.get_mut(&handle) {
            Some(target) => target.region = region,
            None => return Vec::new(),
        }
        self.poll()
    }

    pub fn scroll_to(&mut self, scroll_y: f64) -> Vec<VisibilityEvent> {
        if scroll_y.is_finite() {
            self.viewport.scroll_y = scroll_y;
        }
        self.poll()
    }

    pub fn resize(&mut self, height: f64) -> Result<Vec<VisibilityEvent>, ObservationUnavailable> {
        let resized = Viewport::new(self.viewport.scroll_y, height);
        if !resized.is_observable() {
            return Err(ObservationUnavailable::Viewport(height));
        }
        self.viewport = resized;
        Ok(self.poll())
    }

    /// Re-evaluates every target against the current viewport.
    pub fn poll(&mut self) -> Vec<VisibilityEvent> {
        let root = self.viewport.root(self.options.root_margin_bottom);
        let threshold = self.options.threshold;

        let mut handles: Vec<TargetHandle> = self.targets.keys().copied().collect();
        handles.sort_by_key(|handle| handle.0);

        let mut events = Vec::new();
        for handle in handles {
            let Some(target) = self.targets.get_mut(&handle) else {
                continue;
            };
            let hit = Intersection::compute(&target.region, &root);
            let now_intersecting = hit.is_intersecting(threshold);
            trace!(section = %target.key, ratio = hit.ratio, "Intersection evaluated");

            match (target.intersecting, now_intersecting) {
                (false, true) => {
                    target.intersecting = true;
                    if !target.entered {
                        target.entered = true;
                        events.push(VisibilityEvent::Entered(target.key.clone()));
                    }
                }
                (true, false) => {
                    target.intersecting = false;
                    events.push(VisibilityEvent::Exited(target.key.clone()));
                }
                _ => {}
            }
        }
        events
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}
