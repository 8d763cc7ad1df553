use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::debug;

pub const CURSOR_TRAIL_SIZE: f64 = 20.0;
pub const CURSOR_EASE: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overflow {
    Auto,
    Hidden,
}

impl Overflow {
    pub fn as_css(&self) -> &'static str {
        match self {
            Overflow::Auto => "auto",
            Overflow::Hidden => "hidden",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverlayId(u64);

#[derive(Debug)]
struct BodyState {
    overlays: Vec<(OverlayId, &'static str)>,
    scroll_locks: usize,
    next_id: u64,
}

/// Stand-in for the document body that effects attach to.
///
/// Cloning shares the same body.
#[derive(Debug, Clone)]
pub struct OverlayHost {
    body: Arc<Mutex<BodyState>>,
}

impl Default for OverlayHost {
    fn default() -> Self {
        Self::new()
    }
}

impl OverlayHost {
    pub fn new() -> Self {
        Self {
            body: Arc::new(Mutex::new(BodyState {
                overlays: Vec::new(),
                scroll_locks: 0,
                next_id: 0,
            })),
        }
    }

    fn body(&self) -> MutexGuard<'_, BodyState> {
        self.body.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn overlay_count(&self) -> usize {
        self.body().overlays.len()
    }

    pub fn has_overlay(&self, class: &str) -> bool {
        self.body().overlays.iter().any(|(_, name)| *name == class)
    }

    pub fn overflow(&self) -> Overflow {
        if self.body().scroll_locks > 0 {
            Overflow::Hidden
        } else {
            Overflow::Auto
        }
    }

    fn mount(&self, class: &'static str) -> OverlayId {
        let mut body = self.body();
        let id = OverlayId(body.next_id);
        body.next_id += 1;
        body.overlays.push((id, class));
        id
    }

    fn unmount(&self, id: OverlayId) {
        self.body().overlays.retain(|(existing, _)| *existing != id);
    }
}

/// Fixed-position glow that follows the pointer. Removed from the host on drop.
#[derive(Debug)]
pub struct CursorTrail {
    host: OverlayHost,
    id: OverlayId,
    position: (f64, f64),
    target: (f64, f64),
}

impl CursorTrail {
    pub const CLASS: &'static str = "cursor-trail";

    pub fn attach(host: &OverlayHost) -> Self {
        let id = host.mount(Self::CLASS);
        debug!("Cursor trail attached");
        Self {
            host: host.clone(),
            id,
            position: (0.0, 0.0),
            target: (0.0, 0.0),
        }
    }

    /// Points the trail at the pointer, centred on it.
    pub fn move_to(&mut self, client_x: f64, client_y: f64) {
        let half = CURSOR_TRAIL_SIZE / 2.0;
        self.target = (client_x - half, client_y - half);
    }

    /// Advances the eased follow by `elapsed`.
    pub fn tick(&mut self, elapsed: Duration) {
        let progress = (elapsed.as_secs_f64() / CURSOR_EASE.as_secs_f64()).clamp(0.0, 1.0);
        // power2.out
        let eased = 1.0 - (1.0 - progress).powi(2);
        self.position.0 += (self.target.0 - self.position.0) * eased;
        self.position.1 += (self.target.1 - self.position.1) * eased;
    }

    pub fn position(&self) -> (f64, f64) {
        self.position
    }
}

impl Drop for CursorTrail {
    fn drop(&mut self) {
        self.host.unmount(self.id);
        debug!("Cursor trail detached");
    }
}

/// Holds the body at `overflow: hidden` while alive. Locks nest.
#[derive(Debug)]
pub struct ScrollLock {
    host: OverlayHost,
}

impl ScrollLock {
    pub fn acquire(host: &OverlayHost) -> Self {
        host.body().scroll_locks += 1;
        Self { host: host.clone() }
    }
}

impl Drop for ScrollLock {
    fn drop(&mut self) {
        let mut body = self.host.body();
        body.scroll_locks = body.scroll_locks.saturating_sub(1);
    }
}

/// Detail view for a project or certificate. Page scroll is locked while open.
#[derive(Debug)]
pub struct DetailModal<T> {
    host: OverlayHost,
    open: Option<(T, ScrollLock)>,
}

impl<T> DetailModal<T> {
    pub fn new(host: &OverlayHost) -> Self {
        Self {
            host: host.clone(),
            open: None,
        }
    }

    pub fn open(&mut self, item: T) {
        let lock = match self.open.take() {
            Some((_, lock)) => lock,
            None => ScrollLock::acquire(&self.host),
        };
        self.open = Some((item, lock));
    }

    pub fn close(&mut self) -> Option<T> {
        self.open.take().map(|(item, _lock)| item)
    }

    pub fn selected(&self) -> Option<&T> {
        self.open.as_ref().map(|(item, _)| item)
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }
}
