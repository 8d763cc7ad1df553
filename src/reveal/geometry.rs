use serde::{Deserialize, Serialize};

/// Vertical span of the document occupied by a section, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub top: f64,
    pub height: f64,
}

impl Region {
    pub fn new(top: f64, height: f64) -> Self {
        Self {
            top,
            height: height.max(0.0),
        }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Observation root derived from the scroll offset and the viewport height.
///
/// The bottom edge is pulled up by `root_margin_bottom * height` so sections
/// trigger slightly before they are fully on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scroll_y: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(scroll_y: f64, height: f64) -> Self {
        Self { scroll_y, height }
    }

    /// A viewport can only be observed when it has a real, positive height.
    pub fn is_observable(&self) -> bool {
        self.height.is_finite() && self.height > 0.0 && self.scroll_y.is_finite()
    }

    pub fn root(&self, root_margin_bottom: f64) -> Region {
        let shrink = self.height * root_margin_bottom;
        Region::new(self.scroll_y, self.height - shrink)
    }
}

/// Result of intersecting one region with the observation root.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    pub ratio: f64,
    pub touching: bool,
}

impl Intersection {
    pub fn compute(target: &Region, root: &Region) -> Self {
        let overlap = target.bottom().min(root.bottom()) - target.top.max(root.top);
        let touching = overlap >= 0.0;

        let ratio = if !touching {
            0.0
        } else if target.height == 0.0 {
            // Zero-area targets count as fully visible once inside the root.
            1.0
        } else {
            (overlap / target.height).clamp(0.0, 1.0)
        };

        Self { ratio, touching }
    }

    pub fn is_intersecting(&self, threshold: f64) -> bool {
        self.touching && self.ratio >= threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_shrinks_bottom_edge() {
        let viewport = Viewport::new(200.0, 1000.0);
        let root = viewport.root(0.1);
        assert_eq!(root.top, 200.0);
        assert_eq!(root.bottom(), 1100.0);
    }

    #[test]
    fn test_partial_overlap_ratio() {
        let root = Region::new(0.0, 900.0);
        let target = Region::new(800.0, 400.0);
        let hit = Intersection::compute(&target, &root);
        assert!((hit.ratio - 0.25).abs() < f64::EPSILON);
        assert!(hit.is_intersecting(0.1));
        assert!(!hit.is_intersecting(0.3));
    }

    #[test]
    fn test_disjoint_region_never_intersects() {
        let root = Region::new(0.0, 900.0);
        let target = Region::new(1200.0, 300.0);
        let hit = Intersection::compute(&target, &root);
        assert_eq!(hit.ratio, 0.0);
        assert!(!hit.touching);
        assert!(!hit.is_intersecting(0.0));
    }

    #[test]
    fn test_zero_height_region_inside_root() {
        let root = Region::new(0.0, 900.0);
        let marker = Region::new(450.0, 0.0);
        assert_eq!(Intersection::compute(&marker, &root).ratio, 1.0);
    }

    #[test]
    fn test_headless_viewport_is_not_observable() {
        assert!(!Viewport::new(0.0, 0.0).is_observable());
        assert!(!Viewport::new(0.0, f64::NAN).is_observable());
        assert!(Viewport::new(0.0, 720.0).is_observable());
    }
}
