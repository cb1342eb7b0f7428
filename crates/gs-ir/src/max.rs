//! Running maximum trackers.

/// Tracks the largest value seen so far.
#[derive(Clone, Copy, Debug)]
pub struct Maximum<T> {
    max: T,
}

impl<T: PartialOrd + Copy> Maximum<T> {
    /// Start tracking from `initial`; smaller values never replace it.
    pub const fn new(initial: T) -> Self {
        Self { max: initial }
    }

    pub fn accept(&mut self, value: T) {
        if value > self.max {
            self.max = value;
        }
    }

    pub fn get(&self) -> T {
        self.max
    }
}

/// Tracks the greatest value under a custom ordering.
pub struct MaximumBy<T, F> {
    max: T,
    greater_than: F,
}

impl<T, F: Fn(&T, &T) -> bool> MaximumBy<T, F> {
    /// `greater_than(a, b)` returns true when `a` should replace `b`.
    pub fn new(initial: T, greater_than: F) -> Self {
        Self { max: initial, greater_than }
    }

    pub fn accept(&mut self, value: T) {
        if (self.greater_than)(&value, &self.max) {
            self.max = value;
        }
    }

    pub fn get(&self) -> &T {
        &self.max
    }

    pub fn into_inner(self) -> T {
        self.max
    }
}
