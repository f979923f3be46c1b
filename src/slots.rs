//! Gapped slot storage.
//!
//! A [`SlotArray`] is the single allocation behind the packed memory array: a
//! run of cells, each either empty (a gap) or holding one key. This module
//! knows nothing about ordering or densities; it provides the raw cell
//! operations the core composes — occupancy counting, draining a range in
//! place, sliding a run of cells into an adjacent gap, and finding the gap
//! nearest to a position.

/// The free slot closest to a queried position, and which side it is on.
///
/// Ties between an equally distant left and right gap resolve to the right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NearestGap {
    /// Closest gap sits left of the queried position.
    Left(usize),
    /// Closest gap sits at or right of the queried position.
    Right(usize),
}

/// A fixed-length run of optional cells.
///
/// Resizing never moves occupied cells: callers drain the array with
/// [`take_range`](SlotArray::take_range) first and write the keys back after.
#[derive(Debug)]
pub(crate) struct SlotArray<T> {
    cells: Vec<Option<T>>,
}

impl<T> SlotArray<T> {
    /// A fully empty array of `len` cells.
    pub(crate) fn new(len: usize) -> Self {
        let mut cells = Vec::new();
        cells.resize_with(len, || None);
        Self { cells }
    }

    /// Total number of cells, occupied and empty.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.cells.len()
    }

    /// The key at `index`, or `None` for a gap or out-of-range index.
    #[inline]
    pub(crate) fn get(&self, index: usize) -> Option<&T> {
        self.cells.get(index).and_then(Option::as_ref)
    }

    /// `true` when `index` is in range and empty.
    #[inline]
    pub(crate) fn gap_at(&self, index: usize) -> bool {
        self.cells.get(index).is_some_and(Option::is_none)
    }

    /// Write `value` into the cell at `index`, replacing whatever was there.
    #[inline]
    pub(crate) fn set(&mut self, index: usize, value: T) {
        self.cells[index] = Some(value);
    }

    /// Empty the cell at `index`, returning the key it held.
    #[inline]
    pub(crate) fn clear(&mut self, index: usize) -> Option<T> {
        self.cells[index].take()
    }

    /// Number of occupied cells in `[begin, end)`.
    pub(crate) fn count_in(&self, begin: usize, end: usize) -> usize {
        self.cells[begin..end].iter().filter(|c| c.is_some()).count()
    }

    /// Index and key of the first occupied cell in `[begin, end)`.
    pub(crate) fn first_occupied(&self, begin: usize, end: usize) -> Option<(usize, &T)> {
        self.cells[begin..end]
            .iter()
            .enumerate()
            .find_map(|(offset, cell)| cell.as_ref().map(|key| (begin + offset, key)))
    }

    /// Index and key of the last occupied cell in `[begin, end)`.
    pub(crate) fn last_occupied(&self, begin: usize, end: usize) -> Option<(usize, &T)> {
        self.cells[begin..end]
            .iter()
            .enumerate()
            .rev()
            .find_map(|(offset, cell)| cell.as_ref().map(|key| (begin + offset, key)))
    }

    /// Drain every occupied cell in `[begin, end)` left to right.
    ///
    /// The returned keys keep their relative order; the range is all gaps
    /// afterwards.
    pub(crate) fn take_range(&mut self, begin: usize, end: usize) -> Vec<T> {
        self.cells[begin..end]
            .iter_mut()
            .filter_map(Option::take)
            .collect()
    }

    /// Slide the run `[from, to)` one cell right into the gap at `to`,
    /// leaving `from` empty.
    pub(crate) fn shift_right(&mut self, from: usize, to: usize) {
        debug_assert!(self.cells[to].is_none());
        self.cells[from..=to].rotate_right(1);
    }

    /// Slide the run `(to, from]` one cell left into the gap at `to`,
    /// leaving `from` empty.
    pub(crate) fn shift_left(&mut self, from: usize, to: usize) {
        debug_assert!(self.cells[to].is_none());
        self.cells[to..=from].rotate_left(1);
    }

    /// The free cell nearest to `index`, scanning outward both ways.
    ///
    /// `index` itself is not considered. The density bounds maintained by the
    /// rebalancer guarantee at least one gap exists whenever a placement needs
    /// one, so an entirely full array is unreachable here.
    pub(crate) fn nearest_gap(&self, index: usize) -> NearestGap {
        let right = (index + 1..self.cells.len()).find(|&i| self.cells[i].is_none());
        let left = (0..index).rev().find(|&i| self.cells[i].is_none());

        match (left, right) {
            (None, Some(r)) => NearestGap::Right(r),
            (Some(l), None) => NearestGap::Left(l),
            (Some(l), Some(r)) => {
                if r - index <= index - l {
                    NearestGap::Right(r)
                } else {
                    NearestGap::Left(l)
                }
            }
            (None, None) => unreachable!("slot array has no gap near index {index}"),
        }
    }

    /// Grow or shrink to `new_len` cells. All cells must already be empty.
    pub(crate) fn resize(&mut self, new_len: usize) {
        debug_assert!(self.cells.iter().all(Option::is_none));
        self.cells.resize_with(new_len, || None);
    }

    /// The occupied cells, left to right.
    pub(crate) fn occupied(&self) -> impl Iterator<Item = &T> {
        self.cells.iter().filter_map(Option::as_ref)
    }
}
