//! In-progress drag gestures.

use core::num::NonZeroUsize;

use gs_ir::{ContinuousDynamicsCommand, Range};

/// What a note drag does to the cells it covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoteGesture {
    /// Replace the covered columns with one fresh note.
    Write,
    /// Clear the covered columns.
    Erase,
    /// Extend notes, merging with neighboring runs.
    Blend,
}

/// Column snapping granularity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Snap(NonZeroUsize);

impl Snap {
    /// No snapping.
    pub const NONE: Snap = Snap(NonZeroUsize::MIN);

    /// `None` for a zero interval.
    pub fn new(interval: usize) -> Option<Self> {
        NonZeroUsize::new(interval).map(Snap)
    }

    pub fn interval(self) -> usize {
        self.0.get()
    }

    /// Round down to the start of the snap cell containing `column`.
    pub fn start(self, column: isize) -> isize {
        column - column.rem_euclid(self.0.get() as isize)
    }

    /// The last column of the snap cell containing `column`.
    pub fn end(self, column: isize) -> isize {
        self.start(column).saturating_add(self.0.get() as isize - 1)
    }

    /// Snapped inclusive range spanning two endpoints in any order.
    pub fn range(self, a: isize, b: isize) -> Range {
        Range::new(self.start(a.min(b)), self.end(a.max(b)))
    }
}

/// Map a pointer column onto the signed column space of a `len`-column grid.
///
/// Columns far past the grid are pulled in to the first snap cell lying
/// wholly outside it, which trims to the same covered range.
pub fn grid_column(column: usize, len: usize, snap: Snap) -> isize {
    let limit = len.saturating_add(snap.interval());
    isize::try_from(column.min(limit)).unwrap_or(isize::MAX)
}

impl Default for Snap {
    fn default() -> Self {
        Snap::NONE
    }
}

/// A note drag from pointer-down to pointer-up.
///
/// Everything but `current` is fixed when the gesture starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NoteInteraction {
    pub gesture: NoteGesture,
    pub voice: usize,
    pub pitch: usize,
    pub anchor: isize,
    current: isize,
    pub snap: Snap,
}

impl NoteInteraction {
    pub fn new(gesture: NoteGesture, voice: usize, pitch: usize, anchor: isize, snap: Snap) -> Self {
        Self {
            gesture,
            voice,
            pitch,
            anchor,
            current: anchor,
            snap,
        }
    }

    pub fn current(&self) -> isize {
        self.current
    }

    /// The snapped columns the gesture currently covers.
    pub fn snapped_range(&self) -> Range {
        self.snap.range(self.anchor, self.current)
    }

    /// Move the pointer end, returning the covered range before and after.
    pub fn move_to(&mut self, column: isize) -> (Range, Range) {
        let old = self.snapped_range();
        self.current = column;
        (old, self.snapped_range())
    }
}

/// A dynamics drag painting one command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DynamicsInteraction {
    pub command: ContinuousDynamicsCommand,
    pub voice: usize,
    pub anchor: isize,
    current: isize,
}

impl DynamicsInteraction {
    pub fn new(command: ContinuousDynamicsCommand, voice: usize, anchor: isize) -> Self {
        Self {
            command,
            voice,
            anchor,
            current: anchor,
        }
    }

    pub fn current(&self) -> isize {
        self.current
    }

    /// Move the pointer end and return the unsnapped range to paint.
    pub fn move_to(&mut self, column: isize) -> Range {
        self.current = column;
        Range::from_endpoints(self.anchor, self.current)
    }
}
