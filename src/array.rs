//! The packed memory array core: locator, rebalancer, mutators, traversal.

use std::fmt;

use crate::compare::{Comparator, NaturalOrder};
use crate::slots::{NearestGap, SlotArray};
use crate::tracing_helpers::{debug_log, trace_log};
use crate::window::{self, Window};

/// An ordered set of keys in a single gapped buffer.
///
/// Keys are kept in sorted order across the occupied slots of a contiguous
/// array. Empty slots between them absorb insertions; when a leaf-sized block
/// becomes too dense or too sparse, the smallest enclosing window whose
/// combined density is back within its depth's band is rewritten with its
/// keys spread evenly. Only when the root window itself is out of band does
/// the buffer double or halve.
///
/// # Type Parameters
///
/// * `T` - The key type
/// * `C` - The comparator defining the order (default: [`NaturalOrder`])
/// * `LEAF_SIZE` - Slots per leaf window (default: 8). The buffer length is
///   always a power-of-two multiple of this, and at least twice it.
///
/// # Complexity
///
/// Insert and remove do amortized `O(log^2 n / LEAF_SIZE)` slot writes in the
/// worst case; lookup and successor are `O(log n)` comparisons. Ordered
/// traversal is one linear scan.
///
/// # Example
///
/// ```rust
/// use pma::PackedMemoryArray;
///
/// let mut set: PackedMemoryArray<i64> = PackedMemoryArray::new();
/// assert!(set.insert(42));
/// assert!(!set.insert(42)); // already present
/// assert!(set.contains(&42));
/// assert!(set.remove(&42));
/// assert!(set.is_empty());
/// ```
pub struct PackedMemoryArray<T, C = NaturalOrder, const LEAF_SIZE: usize = 8> {
    /// The gapped buffer. Occupied slots are sorted under `cmp`.
    slots: SlotArray<T>,

    /// Total order over keys; equality is derived from it.
    cmp: C,

    /// Number of occupied slots.
    count: usize,
}

impl<T, C: Comparator<T>, const LEAF_SIZE: usize> PackedMemoryArray<T, C, LEAF_SIZE> {
    /// Create an empty set with the default comparator.
    #[must_use]
    pub fn new() -> Self
    where
        C: Default,
    {
        Self::with_comparator(C::default())
    }

    /// Create an empty set ordered by `cmp`.
    ///
    /// The buffer starts at `2 * LEAF_SIZE` slots and never shrinks below
    /// that.
    #[must_use]
    pub fn with_comparator(cmp: C) -> Self {
        Self {
            slots: SlotArray::new(LEAF_SIZE * 2),
            cmp,
            count: 0,
        }
    }

    /// Number of keys stored.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.count
    }

    /// `true` when no keys are stored.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Total slot count, gaps included.
    ///
    /// Always a power-of-two multiple of `LEAF_SIZE` and at least
    /// `2 * LEAF_SIZE`.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// The leaf window length this set was built with.
    #[inline]
    #[must_use]
    pub const fn leaf_size(&self) -> usize {
        LEAF_SIZE
    }

    /// Insert `key`, keeping the occupied slots sorted.
    ///
    /// Returns `true` if the key was newly inserted, `false` if an equal key
    /// was already present (the set is left untouched).
    pub fn insert(&mut self, key: T) -> bool {
        let mut index = self.index_of(&key);

        // Pre-placement density check: if the target leaf would overflow,
        // rebalance upward first, then relocate. Placement into the settled
        // layout never needs to move keys that a rebalance would immediately
        // move again.
        let leaf = Window::leaf_of(index, LEAF_SIZE);
        let occupied = self.slots.count_in(leaf.begin, leaf.end) + 1;
        let height = self.tree_height();
        let band = window::thresholds(height, height);
        if occupied as f64 / LEAF_SIZE as f64 > band.upper {
            self.scan(leaf, occupied, height - 1);
            index = self.index_of(&key);
        }

        let inserted = self.place(index, key);
        if inserted {
            self.count += 1;
        }
        inserted
    }

    /// Remove the key equal to `key`.
    ///
    /// Returns `true` if a key was removed, `false` if none was present.
    pub fn remove(&mut self, key: &T) -> bool {
        let index = self.index_of(key);
        match self.slots.get(index) {
            Some(current) if self.cmp.equal(current, key) => {}
            _ => return false,
        }

        self.slots.clear(index);
        self.count -= 1;

        let leaf = Window::leaf_of(index, LEAF_SIZE);
        let occupied = self.slots.count_in(leaf.begin, leaf.end);
        let height = self.tree_height();
        let band = window::thresholds(height, height);
        if (occupied as f64) / (LEAF_SIZE as f64) < band.lower {
            self.scan(leaf, occupied, height - 1);
        }
        true
    }

    /// The smallest stored key strictly greater than `key`, or `None` when
    /// every stored key is less than or equal to it.
    ///
    /// `key` itself does not have to be in the set.
    #[must_use]
    pub fn successor(&self, key: &T) -> Option<&T> {
        let mut index = self.index_of(key);
        while index < self.slots.len() {
            if let Some(item) = self.slots.get(index) {
                if self.cmp.greater(item, key) {
                    return Some(item);
                }
            }
            index += 1;
        }
        None
    }

    /// `true` when a key equal to `key` is stored.
    #[must_use]
    pub fn contains(&self, key: &T) -> bool {
        match self.slots.get(self.index_of(key)) {
            Some(item) => self.cmp.equal(item, key),
            None => false,
        }
    }

    /// The stored keys in ascending order.
    ///
    /// The iterator borrows the set, so mutation while iterating does not
    /// compile.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.slots.occupied()
    }

    /// Binary search over the gapped buffer.
    ///
    /// Returns a slot index that either holds a key equal to `key`, or sits
    /// in the neighborhood where `key` would be placed without breaking the
    /// order of its occupied neighbors. Always in range, so callers may index
    /// directly; with an entirely empty buffer this is slot 0.
    fn index_of(&self, key: &T) -> usize {
        let size = self.slots.len();
        let mut low = 0;
        let mut high = size;

        while low < high {
            let mid = low + (high - low) / 2;

            // Gaps are transparent: probe the first occupied slot at or
            // after the midpoint, falling back to the nearest one before it.
            let (probe, item) = match self.slots.first_occupied(mid, high) {
                Some(found) => found,
                None => match self.slots.last_occupied(low, mid) {
                    Some(found) => found,
                    None => return low,
                },
            };

            if self.cmp.less(item, key) {
                low = probe + 1;
            } else if self.cmp.greater(item, key) {
                high = probe;
            } else {
                return probe;
            }
        }

        low.min(size - 1)
    }

    /// Write `key` at or next to `index`, opening a slot by shifting a run of
    /// neighbors into the nearest gap when the target is occupied.
    ///
    /// Returns `false` (and writes nothing) when the occupant is equal to
    /// `key`.
    fn place(&mut self, mut index: usize, key: T) -> bool {
        if let Some(current) = self.slots.get(index) {
            if self.cmp.equal(current, &key) {
                return false;
            }
            let after = self.cmp.greater(&key, current);

            if after && self.slots.gap_at(index + 1) {
                index += 1;
            } else if !after && index > 0 && self.slots.gap_at(index - 1) {
                index -= 1;
            } else {
                match self.slots.nearest_gap(index) {
                    NearestGap::Right(gap) => {
                        if after {
                            index += 1;
                        }
                        trace_log!(index, gap, "opening slot by shifting right");
                        self.slots.shift_right(index, gap);
                    }
                    NearestGap::Left(gap) => {
                        if !after {
                            index -= 1;
                        }
                        trace_log!(index, gap, "opening slot by shifting left");
                        self.slots.shift_left(index, gap);
                    }
                }
            }
        }
        self.slots.set(index, key);
        true
    }

    /// Walk up the window tree from `window` (whose parent sits at `depth`)
    /// until a window's combined density is back within its band, then
    /// redistribute that window. At the root, grow or shrink instead.
    ///
    /// `occupied` is the caller's count for `window`; for an overflowing
    /// insert it includes the key about to be placed, so the chosen window is
    /// guaranteed to absorb it.
    fn scan(&mut self, window: Window, occupied: usize, depth: usize) {
        let sibling = window.sibling();
        let parent = window.parent();
        let combined = occupied + self.slots.count_in(sibling.begin, sibling.end);
        let density = combined as f64 / parent.len() as f64;
        let band = window::thresholds(depth, self.tree_height());

        if band.contains(density) {
            debug_log!(
                begin = parent.begin,
                end = parent.end,
                depth,
                combined,
                "redistributing window"
            );
            let buffer = self.slots.take_range(parent.begin, parent.end);
            self.rearrange(parent, buffer);
            return;
        }

        if depth == 0 {
            let size = self.slots.len();
            let buffer = self.slots.take_range(0, size);
            if density > band.upper {
                debug_log!(new_size = size * 2, count = buffer.len(), "growing");
                self.slots.resize(size * 2);
            } else if density < band.lower && size > LEAF_SIZE * 2 {
                debug_log!(new_size = size / 2, count = buffer.len(), "shrinking");
                self.slots.resize(size / 2);
            }
            if !buffer.is_empty() {
                let whole = Window {
                    begin: 0,
                    end: self.slots.len(),
                };
                self.rearrange(whole, buffer);
            }
            return;
        }

        self.scan(parent, combined, depth - 1);
    }

    /// Write `buffer` back into `window`, evenly spaced.
    ///
    /// `buffer` is sorted (it was drained left to right) and no longer than
    /// the window, so the rounded positions are strictly increasing and the
    /// order survives.
    fn rearrange(&mut self, window: Window, buffer: Vec<T>) {
        let step = window.len() as f64 / buffer.len() as f64;
        let mut pos = 0.0_f64;
        for item in buffer {
            self.slots.set(window.begin + pos.round() as usize, item);
            pos += step;
        }
    }

    fn tree_height(&self) -> usize {
        window::tree_height(self.slots.len(), LEAF_SIZE)
    }
}

impl<T, C: Comparator<T> + Default, const LEAF_SIZE: usize> Default
    for PackedMemoryArray<T, C, LEAF_SIZE>
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C, const LEAF_SIZE: usize> fmt::Debug for PackedMemoryArray<T, C, LEAF_SIZE> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PackedMemoryArray")
            .field("count", &self.count)
            .field("capacity", &self.slots.len())
            .field("leaf_size", &LEAF_SIZE)
            .finish()
    }
}
