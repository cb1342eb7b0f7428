//! Scrollable panes and keeping several of them aligned.
//!
//! A syncer owns the panes registered with it. Scrolling one pane through
//! the syncer propagates the new position to every other pane, either as
//! an absolute offset or as a proportion of each pane's scrollable extent.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use slotmap::{new_key_type, SlotMap};
use tracing::trace;

new_key_type! {
    /// Handle for a pane registered with a [`ScrollSyncer`].
    pub struct PaneKey;
}

/// A syncer shared between the host UI and the player.
pub type SharedSyncer = Rc<RefCell<dyn ScrollSyncer>>;

/// Something with a horizontal and vertical scroll offset.
///
/// Implementors store raw offsets; the provided setters clamp to
/// `0..=scrollable`.
pub trait ScrollPane {
    fn scroll_x(&self) -> f64;
    fn scroll_y(&self) -> f64;

    /// Maximum horizontal offset (content width minus viewport width).
    fn scrollable_x(&self) -> f64;
    fn scrollable_y(&self) -> f64;

    fn write_scroll_x(&mut self, x: f64);
    fn write_scroll_y(&mut self, y: f64);

    fn set_scroll_x(&mut self, x: f64) {
        let max = self.scrollable_x().max(0.0);
        self.write_scroll_x(x.clamp(0.0, max));
    }

    fn set_scroll_y(&mut self, y: f64) {
        let max = self.scrollable_y().max(0.0);
        self.write_scroll_y(y.clamp(0.0, max));
    }

    /// Horizontal offset as a fraction of the extent; 0 when nothing scrolls.
    fn proportion_x(&self) -> f64 {
        proportion(self.scroll_x(), self.scrollable_x())
    }

    fn proportion_y(&self) -> f64 {
        proportion(self.scroll_y(), self.scrollable_y())
    }

    fn set_proportion_x(&mut self, p: f64) {
        let max = self.scrollable_x().max(0.0);
        self.write_scroll_x(p.clamp(0.0, 1.0) * max);
    }

    fn set_proportion_y(&mut self, p: f64) {
        let max = self.scrollable_y().max(0.0);
        self.write_scroll_y(p.clamp(0.0, 1.0) * max);
    }
}

fn proportion(offset: f64, extent: f64) -> f64 {
    if extent > 0.0 {
        offset / extent
    } else {
        0.0
    }
}

/// A pane with no backing view. The player registers one of these to read
/// the starting scroll position and to drive scrolling during playback.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct VirtualPane {
    pub x: f64,
    pub y: f64,
    pub scrollable_x: f64,
    pub scrollable_y: f64,
}

impl VirtualPane {
    pub fn new(scrollable_x: f64, scrollable_y: f64) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scrollable_x,
            scrollable_y,
        }
    }
}

impl ScrollPane for VirtualPane {
    fn scroll_x(&self) -> f64 {
        self.x
    }

    fn scroll_y(&self) -> f64 {
        self.y
    }

    fn scrollable_x(&self) -> f64 {
        self.scrollable_x
    }

    fn scrollable_y(&self) -> f64 {
        self.scrollable_y
    }

    fn write_scroll_x(&mut self, x: f64) {
        self.x = x;
    }

    fn write_scroll_y(&mut self, y: f64) {
        self.y = y;
    }
}

/// Register/unregister panes and scroll them.
pub trait ScrollSyncer {
    fn register_pane(&mut self, pane: Box<dyn ScrollPane>) -> PaneKey;

    /// Remove a pane, handing it back. Stale keys return `None`.
    fn unregister_pane(&mut self, key: PaneKey) -> Option<Box<dyn ScrollPane>>;

    fn pane(&self, key: PaneKey) -> Option<&dyn ScrollPane>;

    /// Scroll one pane horizontally. Returns false for a stale key.
    fn scroll_pane_x(&mut self, key: PaneKey, x: f64) -> bool;

    fn scroll_pane_y(&mut self, key: PaneKey, y: f64) -> bool;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Axis {
    X,
    Y,
}

/// Panes in registration order.
#[derive(Default)]
struct PaneSet {
    panes: SlotMap<PaneKey, Box<dyn ScrollPane>>,
    order: Vec<PaneKey>,
}

impl PaneSet {
    fn first(&self) -> Option<&dyn ScrollPane> {
        let key = *self.order.first()?;
        self.panes.get(key).map(|p| p.as_ref())
    }

    fn insert(&mut self, pane: Box<dyn ScrollPane>) -> PaneKey {
        let key = self.panes.insert(pane);
        self.order.push(key);
        key
    }

    fn remove(&mut self, key: PaneKey) -> Option<Box<dyn ScrollPane>> {
        let pane = self.panes.remove(key)?;
        self.order.retain(|k| *k != key);
        Some(pane)
    }

    fn get(&self, key: PaneKey) -> Option<&dyn ScrollPane> {
        self.panes.get(key).map(|p| p.as_ref())
    }

    fn scroll(&mut self, key: PaneKey, axis: Axis, value: f64) -> bool {
        let Some(pane) = self.panes.get_mut(key) else {
            return false;
        };
        match axis {
            Axis::X => pane.set_scroll_x(value),
            Axis::Y => pane.set_scroll_y(value),
        }
        true
    }
}

/// Stores panes but never aligns them.
#[derive(Default)]
pub struct NullSyncer {
    panes: PaneSet,
}

impl NullSyncer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScrollSyncer for NullSyncer {
    fn register_pane(&mut self, pane: Box<dyn ScrollPane>) -> PaneKey {
        self.panes.insert(pane)
    }

    fn unregister_pane(&mut self, key: PaneKey) -> Option<Box<dyn ScrollPane>> {
        self.panes.remove(key)
    }

    fn pane(&self, key: PaneKey) -> Option<&dyn ScrollPane> {
        self.panes.get(key)
    }

    fn scroll_pane_x(&mut self, key: PaneKey, x: f64) -> bool {
        self.panes.scroll(key, Axis::X, x)
    }

    fn scroll_pane_y(&mut self, key: PaneKey, y: f64) -> bool {
        self.panes.scroll(key, Axis::Y, y)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SyncMode {
    /// Copy offsets verbatim (clamped to each pane's extent).
    #[default]
    Absolute,
    /// Copy offsets as a fraction of each pane's extent.
    Proportional,
}

/// Keeps every registered pane at the same scroll position.
pub struct PaneSyncer {
    panes: PaneSet,
    mode: SyncMode,
    sync_x: bool,
    sync_y: bool,
}

impl PaneSyncer {
    /// Sync both axes.
    pub fn new(mode: SyncMode) -> Self {
        Self::with_axes(mode, true, true)
    }

    pub fn with_axes(mode: SyncMode, sync_x: bool, sync_y: bool) -> Self {
        Self {
            panes: PaneSet::default(),
            mode,
            sync_x,
            sync_y,
        }
    }

    pub fn mode(&self) -> SyncMode {
        self.mode
    }

    pub fn len(&self) -> usize {
        self.panes.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panes.order.is_empty()
    }

    fn syncs(&self, axis: Axis) -> bool {
        match axis {
            Axis::X => self.sync_x,
            Axis::Y => self.sync_y,
        }
    }

    fn read_axis(mode: SyncMode, axis: Axis, pane: &dyn ScrollPane) -> f64 {
        match (mode, axis) {
            (SyncMode::Absolute, Axis::X) => pane.scroll_x(),
            (SyncMode::Absolute, Axis::Y) => pane.scroll_y(),
            (SyncMode::Proportional, Axis::X) => pane.proportion_x(),
            (SyncMode::Proportional, Axis::Y) => pane.proportion_y(),
        }
    }

    fn write_axis(mode: SyncMode, axis: Axis, pane: &mut dyn ScrollPane, value: f64) {
        match (mode, axis) {
            (SyncMode::Absolute, Axis::X) => pane.set_scroll_x(value),
            (SyncMode::Absolute, Axis::Y) => pane.set_scroll_y(value),
            (SyncMode::Proportional, Axis::X) => pane.set_proportion_x(value),
            (SyncMode::Proportional, Axis::Y) => pane.set_proportion_y(value),
        }
    }

    fn scroll(&mut self, key: PaneKey, axis: Axis, value: f64) -> bool {
        if !self.panes.scroll(key, axis, value) {
            return false;
        }
        if !self.syncs(axis) {
            return true;
        }
        let Some(source) = self.panes.get(key) else {
            return false;
        };
        let synced = Self::read_axis(self.mode, axis, source);
        let mode = self.mode;
        for (k, dest) in self.panes.panes.iter_mut() {
            if k != key {
                Self::write_axis(mode, axis, dest.as_mut(), synced);
            }
        }
        trace!(?axis, value, synced, "synced scroll");
        true
    }
}

impl Default for PaneSyncer {
    fn default() -> Self {
        Self::new(SyncMode::Absolute)
    }
}

impl ScrollSyncer for PaneSyncer {
    /// A new pane is first aligned with the earliest registered pane.
    fn register_pane(&mut self, mut pane: Box<dyn ScrollPane>) -> PaneKey {
        if let Some(first) = self.panes.first() {
            for axis in [Axis::X, Axis::Y] {
                if self.syncs(axis) {
                    let value = Self::read_axis(self.mode, axis, first);
                    Self::write_axis(self.mode, axis, pane.as_mut(), value);
                }
            }
        }
        self.panes.insert(pane)
    }

    fn unregister_pane(&mut self, key: PaneKey) -> Option<Box<dyn ScrollPane>> {
        self.panes.remove(key)
    }

    fn pane(&self, key: PaneKey) -> Option<&dyn ScrollPane> {
        self.panes.get(key)
    }

    fn scroll_pane_x(&mut self, key: PaneKey, x: f64) -> bool {
        self.scroll(key, Axis::X, x)
    }

    fn scroll_pane_y(&mut self, key: PaneKey, y: f64) -> bool {
        self.scroll(key, Axis::Y, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pane(scrollable_x: f64, scrollable_y: f64) -> Box<dyn ScrollPane> {
        Box::new(VirtualPane::new(scrollable_x, scrollable_y))
    }

    #[test]
    fn setters_clamp_to_extent() {
        let mut p = VirtualPane::new(100.0, 50.0);
        p.set_scroll_x(140.0);
        p.set_scroll_y(-3.0);
        assert_eq!((p.x, p.y), (100.0, 0.0));

        p.set_proportion_x(0.25);
        assert_eq!(p.x, 25.0);
        assert_eq!(p.proportion_x(), 0.25);
    }

    #[test]
    fn zero_extent_has_zero_proportion() {
        let p = VirtualPane::new(0.0, 0.0);
        assert_eq!(p.proportion_x(), 0.0);
    }

    #[test]
    fn absolute_sync_copies_offsets() {
        let mut syncer = PaneSyncer::new(SyncMode::Absolute);
        let a = syncer.register_pane(pane(200.0, 200.0));
        let b = syncer.register_pane(pane(80.0, 200.0));

        assert!(syncer.scroll_pane_x(a, 120.0));
        assert_eq!(syncer.pane(b).map(|p| p.scroll_x()), Some(80.0));

        syncer.scroll_pane_y(b, 30.0);
        assert_eq!(syncer.pane(a).map(|p| p.scroll_y()), Some(30.0));
    }

    #[test]
    fn proportional_sync_scales_offsets() {
        let mut syncer = PaneSyncer::new(SyncMode::Proportional);
        let a = syncer.register_pane(pane(200.0, 0.0));
        let b = syncer.register_pane(pane(50.0, 0.0));

        syncer.scroll_pane_x(a, 100.0);
        assert_eq!(syncer.pane(b).map(|p| p.scroll_x()), Some(25.0));
    }

    #[test]
    fn new_panes_align_with_the_first() {
        let mut syncer = PaneSyncer::new(SyncMode::Absolute);
        let a = syncer.register_pane(pane(500.0, 500.0));
        syncer.scroll_pane_x(a, 42.0);

        let b = syncer.register_pane(pane(500.0, 500.0));
        assert_eq!(syncer.pane(b).map(|p| p.scroll_x()), Some(42.0));
        assert_eq!(syncer.len(), 2);
    }

    #[test]
    fn disabled_axis_is_not_synced() {
        let mut syncer = PaneSyncer::with_axes(SyncMode::Absolute, true, false);
        let a = syncer.register_pane(pane(100.0, 100.0));
        let b = syncer.register_pane(pane(100.0, 100.0));

        syncer.scroll_pane_y(a, 60.0);
        syncer.scroll_pane_x(a, 10.0);
        let b = syncer.pane(b).map(|p| (p.scroll_x(), p.scroll_y()));
        assert_eq!(b, Some((10.0, 0.0)));
    }

    #[test]
    fn unregistered_panes_stop_syncing() {
        let mut syncer = PaneSyncer::default();
        let a = syncer.register_pane(pane(100.0, 0.0));
        let b = syncer.register_pane(pane(100.0, 0.0));

        let removed = syncer.unregister_pane(b).map(|p| p.scroll_x());
        assert_eq!(removed, Some(0.0));
        assert!(syncer.unregister_pane(b).is_none());
        assert!(!syncer.scroll_pane_x(b, 5.0));
        assert!(syncer.scroll_pane_x(a, 5.0));
    }

    #[test]
    fn null_syncer_keeps_panes_independent() {
        let mut syncer = NullSyncer::new();
        let a = syncer.register_pane(pane(100.0, 0.0));
        let b = syncer.register_pane(pane(100.0, 0.0));

        syncer.scroll_pane_x(a, 70.0);
        assert_eq!(syncer.pane(a).map(|p| p.scroll_x()), Some(70.0));
        assert_eq!(syncer.pane(b).map(|p| p.scroll_x()), Some(0.0));
    }
}
