//! Incremental-loading triggers.
//!
//! Two independent strategies decide *when* a list should ask for more data:
//! scroll proximity inside an explicitly scrollable container, and visibility
//! of a sentinel element placed after the last item. Neither performs I/O.

pub const DEFAULT_SCROLL_THRESHOLD_PX: f64 = 100.0;
pub const DEFAULT_ROOT_MARGIN_PX: u32 = 100;
pub const DEFAULT_VISIBILITY_THRESHOLD: f64 = 0.1;

// ===== PROXIMITY TO BOTTOM =====

/// Geometry of a scrollable element at the time of a scroll event.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub scroll_height: f64,
    pub client_height: f64,
}

impl ScrollMetrics {
    pub fn new(scroll_top: f64, scroll_height: f64, client_height: f64) -> Self {
        Self {
            scroll_top,
            scroll_height,
            client_height,
        }
    }

    /// Pixels left below the visible area.
    pub fn remaining(&self) -> f64 {
        self.scroll_height - (self.scroll_top + self.client_height)
    }
}

/// Fires when the scroll position is within `threshold` pixels of the bottom.
///
/// In the default mode every qualifying scroll event fires; the load callback
/// is expected to ignore calls while a fetch is in flight. In latched mode the
/// trigger fires once on entering the zone and re-arms after leaving it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProximityTrigger {
    threshold: f64,
    latched: bool,
    near_bottom: bool,
}

impl Default for ProximityTrigger {
    fn default() -> Self {
        Self::new(DEFAULT_SCROLL_THRESHOLD_PX)
    }
}

impl ProximityTrigger {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            latched: false,
            near_bottom: false,
        }
    }

    pub fn latched(threshold: f64) -> Self {
        Self {
            latched: true,
            ..Self::new(threshold)
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Returns `true` when the load callback should run for this scroll event.
    pub fn check(&mut self, metrics: ScrollMetrics) -> bool {
        let near_bottom = metrics.remaining() <= self.threshold;
        let was_near_bottom = std::mem::replace(&mut self.near_bottom, near_bottom);
        if self.latched {
            near_bottom && !was_near_bottom
        } else {
            near_bottom
        }
    }
}

// ===== SENTINEL VISIBILITY =====

/// Box the sentinel is intersected with.
///
/// The root margin only grows the root's own box. A sentinel inside a
/// scrolling container is clipped by that container, so the container has to
/// be the root for the pre-trigger distance to apply.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ObserverRoot {
    #[default]
    Viewport,
    /// The sentinel's parent element, which is the scrolling container
    ScrollParent,
}

/// Options handed to the platform intersection observer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObserverOptions {
    pub root: ObserverRoot,
    /// Pre-trigger distance before the sentinel enters the root's box
    pub root_margin_px: u32,
    /// Fraction of the sentinel that must be visible, `0.0..=1.0`
    pub threshold: f64,
}

impl Default for ObserverOptions {
    fn default() -> Self {
        Self {
            root: ObserverRoot::Viewport,
            root_margin_px: DEFAULT_ROOT_MARGIN_PX,
            threshold: DEFAULT_VISIBILITY_THRESHOLD,
        }
    }
}

impl ObserverOptions {
    /// CSS margin string, e.g. `"100px"`
    pub fn root_margin(&self) -> String {
        format!("{}px", self.root_margin_px)
    }

    pub fn with_root(self, root: ObserverRoot) -> Self {
        Self { root, ..self }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArmChange {
    Armed,
    Disarmed,
    Unchanged,
}

/// Arming logic for a sentinel observer.
///
/// The observer should exist only while `has_more && !loading`. The caller
/// owns both flags and reports them through [`VisibilityTrigger::set_flags`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct VisibilityTrigger {
    has_more: bool,
    loading: bool,
    was_intersecting: bool,
}

impl VisibilityTrigger {
    pub fn new(has_more: bool, loading: bool) -> Self {
        Self {
            has_more,
            loading,
            was_intersecting: false,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.has_more && !self.loading
    }

    /// Update the externally owned flags and report whether the observer must
    /// be attached or detached.
    pub fn set_flags(&mut self, has_more: bool, loading: bool) -> ArmChange {
        let was_armed = self.is_armed();
        self.has_more = has_more;
        self.loading = loading;
        match (was_armed, self.is_armed()) {
            (false, true) => {
                // A fresh observer reports the current state on attach
                self.was_intersecting = false;
                ArmChange::Armed
            }
            (true, false) => ArmChange::Disarmed,
            _ => ArmChange::Unchanged,
        }
    }

    /// Feed one intersection report. Returns `true` when the load callback
    /// should run.
    pub fn on_intersection(&mut self, is_intersecting: bool) -> bool {
        if !self.is_armed() {
            return false;
        }
        let entered = is_intersecting && !self.was_intersecting;
        self.was_intersecting = is_intersecting;
        entered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remaining_distance() {
        let metrics = ScrollMetrics::new(300.0, 1000.0, 500.0);
        assert_eq!(metrics.remaining(), 200.0);
    }

    #[test]
    fn test_proximity_fires_within_threshold() {
        let mut trigger = ProximityTrigger::new(100.0);
        assert!(!trigger.check(ScrollMetrics::new(0.0, 1000.0, 500.0)));
        assert!(trigger.check(ScrollMetrics::new(400.0, 1000.0, 500.0))); // exactly 100 left
        assert!(trigger.check(ScrollMetrics::new(450.0, 1000.0, 500.0)));
        assert!(trigger.check(ScrollMetrics::new(500.0, 1000.0, 500.0)));
    }

    #[test]
    fn test_latched_proximity_fires_once_per_entry() {
        let mut trigger = ProximityTrigger::latched(100.0);
        assert!(trigger.check(ScrollMetrics::new(450.0, 1000.0, 500.0)));
        assert!(!trigger.check(ScrollMetrics::new(480.0, 1000.0, 500.0)));

        // Leave the zone, then come back
        assert!(!trigger.check(ScrollMetrics::new(100.0, 1000.0, 500.0)));
        assert!(trigger.check(ScrollMetrics::new(500.0, 1000.0, 500.0)));
    }

    #[test]
    fn test_short_content_is_always_near_bottom() {
        let mut trigger = ProximityTrigger::default();
        assert!(trigger.check(ScrollMetrics::new(0.0, 200.0, 500.0)));
    }

    #[test]
    fn test_default_observer_options() {
        let options = ObserverOptions::default();
        assert_eq!(options.root_margin(), "100px");
        assert_eq!(options.threshold, 0.1);
        assert_eq!(options.root, ObserverRoot::Viewport);
    }

    #[test]
    fn test_scroll_parent_root_keeps_margin() {
        let options = ObserverOptions {
            root_margin_px: 250,
            ..ObserverOptions::default()
        }
        .with_root(ObserverRoot::ScrollParent);
        assert_eq!(options.root, ObserverRoot::ScrollParent);
        assert_eq!(options.root_margin(), "250px");
        assert_eq!(options.threshold, DEFAULT_VISIBILITY_THRESHOLD);
    }

    #[test]
    fn test_visibility_fires_when_armed() {
        let mut trigger = VisibilityTrigger::new(true, false);
        assert!(trigger.is_armed());
        assert!(trigger.on_intersection(true));
    }

    #[test]
    fn test_visibility_silent_without_more_data() {
        let mut trigger = VisibilityTrigger::new(false, false);
        assert!(!trigger.on_intersection(true));
    }

    #[test]
    fn test_visibility_silent_while_loading() {
        let mut trigger = VisibilityTrigger::new(true, true);
        assert!(!trigger.is_armed());
        assert!(!trigger.on_intersection(true));
    }

    #[test]
    fn test_visibility_fires_only_on_transition() {
        let mut trigger = VisibilityTrigger::new(true, false);
        assert!(trigger.on_intersection(true));
        assert!(!trigger.on_intersection(true));
        assert!(!trigger.on_intersection(false));
        assert!(trigger.on_intersection(true));
    }

    #[test]
    fn test_rearm_after_load_completes() {
        let mut trigger = VisibilityTrigger::new(true, false);
        assert!(trigger.on_intersection(true));

        assert_eq!(trigger.set_flags(true, true), ArmChange::Disarmed);
        assert!(!trigger.on_intersection(true));

        // Sentinel still visible after the page arrived: load again
        assert_eq!(trigger.set_flags(true, false), ArmChange::Armed);
        assert!(trigger.on_intersection(true));

        assert_eq!(trigger.set_flags(false, false), ArmChange::Disarmed);
        assert_eq!(trigger.set_flags(false, true), ArmChange::Unchanged);
        assert!(!trigger.on_intersection(true));
    }
}
