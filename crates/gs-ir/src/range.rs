//! Inclusive integer intervals over the column axis.

use core::ops::RangeInclusive;

/// An inclusive interval `[start, end]` of column indices.
///
/// Endpoints are signed so that ranges probing one column past either
/// edge of the grid (as boundary repair does) can be expressed directly.
/// A range with `end < start` is empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Range {
    start: isize,
    end: isize,
}

impl Range {
    /// Create a range from inclusive endpoints.
    pub const fn new(start: isize, end: isize) -> Self {
        Self { start, end }
    }

    /// The range covering every valid index of a collection of `len` items.
    ///
    /// Empty (`[0, -1]`) when `len` is zero.
    pub const fn for_indices(len: usize) -> Self {
        Self::new(0, len as isize - 1)
    }

    /// Inclusive range between two endpoints given in any order.
    pub fn from_endpoints(a: isize, b: isize) -> Self {
        Self::new(a.min(b), a.max(b))
    }

    /// Range strictly between two endpoints given in any order.
    pub fn from_endpoints_exclusive(a: isize, b: isize) -> Self {
        Self::new(a.min(b) + 1, a.max(b) - 1)
    }

    /// Range excluding the lower endpoint and including the upper one.
    pub fn from_endpoints_start_exclusive(a: isize, b: isize) -> Self {
        Self::new(a.min(b) + 1, a.max(b))
    }

    /// Range including the lower endpoint and excluding the upper one.
    pub fn from_endpoints_end_exclusive(a: isize, b: isize) -> Self {
        Self::new(a.min(b), a.max(b) - 1)
    }

    pub const fn start(&self) -> isize {
        self.start
    }

    pub const fn end(&self) -> isize {
        self.end
    }

    /// The index just before the range.
    pub const fn start_exclusive(&self) -> isize {
        self.start - 1
    }

    /// The index just after the range.
    pub const fn end_exclusive(&self) -> isize {
        self.end + 1
    }

    /// Both inclusive endpoints as a tuple.
    pub const fn endpoints(&self) -> (isize, isize) {
        (self.start, self.end)
    }

    pub fn set_start(&mut self, start: isize) -> &mut Self {
        self.start = start;
        self
    }

    pub fn set_end(&mut self, end: isize) -> &mut Self {
        self.end = end;
        self
    }

    pub fn set_start_exclusive(&mut self, start_exclusive: isize) -> &mut Self {
        self.start = start_exclusive + 1;
        self
    }

    pub fn set_end_exclusive(&mut self, end_exclusive: isize) -> &mut Self {
        self.end = end_exclusive - 1;
        self
    }

    /// Number of indices in the range.
    pub fn len(&self) -> usize {
        if self.end < self.start {
            0
        } else {
            (self.end - self.start + 1) as usize
        }
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    /// Whether `x` lies within the range.
    pub fn contains(&self, x: isize) -> bool {
        x >= self.start && x <= self.end
    }

    /// Shrink this range so it lies within `bounds`.
    pub fn trim_to(&mut self, bounds: Range) -> &mut Self {
        self.start = self.start.max(bounds.start);
        self.end = self.end.min(bounds.end);
        self
    }

    /// A copy of this range shrunk to lie within `bounds`.
    pub fn trimmed_to(&self, bounds: Range) -> Range {
        let mut trimmed = *self;
        trimmed.trim_to(bounds);
        trimmed
    }

    /// Iterate over every index in the range, in ascending order.
    pub fn iter(&self) -> RangeInclusive<isize> {
        self.start..=self.end
    }

    /// The slice index range this interval covers within a collection of
    /// `len` items, clipped to the collection's bounds.
    pub fn to_indices(&self, len: usize) -> core::ops::Range<usize> {
        let trimmed = self.trimmed_to(Range::for_indices(len));
        if trimmed.is_empty() {
            0..0
        } else {
            trimmed.start as usize..trimmed.end as usize + 1
        }
    }
}

impl IntoIterator for Range {
    type Item = isize;
    type IntoIter = RangeInclusive<isize>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl From<RangeInclusive<isize>> for Range {
    fn from(range: RangeInclusive<isize>) -> Self {
        Self::new(*range.start(), *range.end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_endpoints_orders_arguments() {
        assert_eq!(Range::from_endpoints(7, 3), Range::new(3, 7));
        assert_eq!(Range::from_endpoints(3, 7), Range::new(3, 7));
    }

    #[test]
    fn exclusive_constructors() {
        assert_eq!(Range::from_endpoints_exclusive(2, 6), Range::new(3, 5));
        assert_eq!(Range::from_endpoints_start_exclusive(6, 2), Range::new(3, 6));
        assert_eq!(Range::from_endpoints_end_exclusive(2, 6), Range::new(2, 5));
    }

    #[test]
    fn exclusive_accessors_and_setters() {
        let mut r = Range::new(4, 9);
        assert_eq!(r.start_exclusive(), 3);
        assert_eq!(r.end_exclusive(), 10);

        r.set_start_exclusive(0).set_end_exclusive(5);
        assert_eq!(r.endpoints(), (1, 4));
    }

    #[test]
    fn len_and_emptiness() {
        assert_eq!(Range::new(2, 5).len(), 4);
        assert_eq!(Range::new(3, 3).len(), 1);
        assert!(Range::for_indices(0).is_empty());
        assert_eq!(Range::for_indices(0).len(), 0);
        assert_eq!(Range::for_indices(8), Range::new(0, 7));
    }

    #[test]
    fn contains_is_inclusive() {
        let r = Range::new(2, 5);
        assert!(r.contains(2));
        assert!(r.contains(5));
        assert!(!r.contains(1));
        assert!(!r.contains(6));
    }

    #[test]
    fn trimming() {
        let r = Range::new(-1, 10);
        assert_eq!(r.trimmed_to(Range::for_indices(8)), Range::new(0, 7));
        // Original is untouched
        assert_eq!(r, Range::new(-1, 10));
    }

    #[test]
    fn iteration_visits_each_index() {
        let cols: Vec<isize> = Range::new(3, 6).into_iter().collect();
        assert_eq!(cols, vec![3, 4, 5, 6]);
        assert_eq!(Range::new(5, 4).iter().count(), 0);
    }

    #[test]
    fn to_indices_clips_to_collection() {
        assert_eq!(Range::new(-2, 3).to_indices(8), 0..4);
        assert_eq!(Range::new(6, 12).to_indices(8), 6..8);
        assert_eq!(Range::new(9, 12).to_indices(8), 0..0);
    }
}
