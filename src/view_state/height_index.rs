//! HeightIndex - O(log n) prefix sums and offset lookup via Fenwick tree
//!
//! Maps scroll offsets to row indices in variable-height mode without scanning
//! every prior row.
//!
//! # Complexity
//!
//! - `set`: O(log n)
//! - `offset_of`: O(log n)
//! - `lower_bound`: O(log n) (descends the tree instead of binary-searching prefix sums)
//! - `push`: O(log n)
//! - `truncate`: O(1) amortized
//! - `height`, `len`: O(1)

/// Cumulative row heights backed by a Fenwick tree.
///
/// Keeps the raw heights alongside the tree so single heights are O(1) to read
/// and the tree can be extended one row at a time.
#[derive(Debug, Clone, Default)]
pub struct HeightIndex {
    /// Fenwick tree, 0-indexed: `tree[i]` holds the sum of `heights[i & (i + 1)..=i]`.
    tree: Vec<i64>,
    /// Height of each row.
    heights: Vec<u32>,
}

impl HeightIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty index with room for `capacity` rows.
    ///
    /// # Examples
    ///
    /// ```
    /// # use rowport::view_state::height_index::HeightIndex;
    /// let index = HeightIndex::with_capacity(100);
    /// assert_eq!(index.len(), 0);
    /// assert_eq!(index.total(), 0);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            tree: Vec::with_capacity(capacity),
            heights: Vec::with_capacity(capacity),
        }
    }

    /// Builds an index from a slice of heights in O(n).
    pub fn from_heights(heights: &[u32]) -> Self {
        let mut tree: Vec<i64> = heights.iter().map(|&h| i64::from(h)).collect();
        let n = tree.len();
        for i in 0..n {
            let parent = i | (i + 1);
            if parent < n {
                tree[parent] += tree[i];
            }
        }
        Self {
            tree,
            heights: heights.to_vec(),
        }
    }

    /// Returns the number of rows in the index.
    pub fn len(&self) -> usize {
        self.heights.len()
    }

    /// Returns true if the index contains no rows.
    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    /// Height of a single row.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn height(&self, index: usize) -> u32 {
        self.heights[index]
    }

    /// Sets the height at the given index.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use rowport::view_state::height_index::HeightIndex;
    /// let mut index = HeightIndex::new();
    /// index.push(5);
    /// index.push(5);
    /// index.set(0, 10);
    /// assert_eq!(index.offset_of(1), 10);
    /// assert_eq!(index.total(), 15);
    /// ```
    pub fn set(&mut self, index: usize, height: u32) {
        assert!(
            index < self.len(),
            "index {} out of bounds (len: {})",
            index,
            self.len()
        );

        let delta = i64::from(height) - i64::from(self.heights[index]);
        if delta != 0 {
            self.heights[index] = height;
            fenwick::array::update(&mut self.tree, index, delta);
        }
    }

    /// Appends a row with the given height.
    ///
    /// # Examples
    ///
    /// ```
    /// # use rowport::view_state::height_index::HeightIndex;
    /// let mut index = HeightIndex::new();
    /// index.push(5);
    /// index.push(3);
    /// assert_eq!(index.len(), 2);
    /// assert_eq!(index.total(), 8);
    /// ```
    pub fn push(&mut self, height: u32) {
        let idx = self.len();
        // The new node covers rows [idx & (idx + 1), idx]; all but the last already exist.
        let low = idx & (idx + 1);
        let covered = self.offset_of(idx) - self.offset_of(low);
        self.heights.push(height);
        self.tree.push(i64::from(height) + covered as i64);
    }

    /// Drops rows past `len`. Remaining tree nodes only cover remaining rows,
    /// so no rebuild is needed.
    pub fn truncate(&mut self, len: usize) {
        self.heights.truncate(len);
        self.tree.truncate(len);
    }

    /// Grows (filling with `fill`) or shrinks to exactly `len` rows.
    pub fn resize(&mut self, len: usize, fill: u32) {
        if len <= self.len() {
            self.truncate(len);
        } else {
            self.tree.reserve(len - self.len());
            self.heights.reserve(len - self.len());
            while self.len() < len {
                self.push(fill);
            }
        }
    }

    /// Top offset of row `index`: the sum of heights of all rows before it.
    ///
    /// `offset_of(len())` equals `total()`.
    ///
    /// # Panics
    ///
    /// Panics if `index > len()`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use rowport::view_state::height_index::HeightIndex;
    /// let index = HeightIndex::from_heights(&[3, 4, 5]);
    /// assert_eq!(index.offset_of(0), 0);
    /// assert_eq!(index.offset_of(1), 3);
    /// assert_eq!(index.offset_of(3), 12);
    /// ```
    pub fn offset_of(&self, index: usize) -> u64 {
        assert!(
            index <= self.len(),
            "index {} out of bounds (len: {})",
            index,
            self.len()
        );
        if index == 0 {
            return 0;
        }
        let sum = fenwick::array::prefix_sum(&self.tree, index - 1);
        sum.max(0) as u64
    }

    /// Total height of all rows.
    pub fn total(&self) -> u64 {
        self.offset_of(self.len())
    }

    /// Index of the row containing `offset`.
    ///
    /// Row `i` covers `[offset_of(i), offset_of(i + 1))`.
    ///
    /// # Returns
    ///
    /// - `Some(index)` for offsets inside the content
    /// - `None` if `offset >= total()` or the index is empty
    ///
    /// # Examples
    ///
    /// ```
    /// # use rowport::view_state::height_index::HeightIndex;
    /// let index = HeightIndex::from_heights(&[10, 20, 15]);
    /// assert_eq!(index.lower_bound(0), Some(0));
    /// assert_eq!(index.lower_bound(9), Some(0));
    /// assert_eq!(index.lower_bound(10), Some(1));
    /// assert_eq!(index.lower_bound(30), Some(2));
    /// assert_eq!(index.lower_bound(45), None);
    /// ```
    pub fn lower_bound(&self, offset: u64) -> Option<usize> {
        let len = self.len();
        if len == 0 {
            return None;
        }

        // Walk down from the largest power-of-two block, skipping every block that
        // ends at or before `offset`.
        let mut pos = 0usize;
        let mut remaining = i64::try_from(offset).unwrap_or(i64::MAX);
        let mut step = 1usize << (usize::BITS - 1 - len.leading_zeros());
        while step > 0 {
            let next = pos + step;
            if next <= len && self.tree[next - 1] <= remaining {
                remaining -= self.tree[next - 1];
                pos = next;
            }
            step >>= 1;
        }

        (pos < len).then_some(pos)
    }

    /// Clears all rows, retaining allocated capacity.
    pub fn clear(&mut self) {
        self.tree.clear();
        self.heights.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn linear_lower_bound(heights: &[u32], offset: u64) -> Option<usize> {
        let mut end = 0u64;
        for (i, &h) in heights.iter().enumerate() {
            end += u64::from(h);
            if end > offset {
                return Some(i);
            }
        }
        None
    }

    #[test]
    fn test_empty_index() {
        let index = HeightIndex::new();
        assert_eq!(index.len(), 0);
        assert_eq!(index.total(), 0);
        assert!(index.is_empty());
        assert_eq!(index.lower_bound(0), None);
    }

    #[test]
    fn test_single_entry() {
        let mut index = HeightIndex::new();
        index.push(5);
        assert_eq!(index.len(), 1);
        assert_eq!(index.total(), 5);
        assert_eq!(index.height(0), 5);
        assert_eq!(index.offset_of(1), 5);
    }

    #[test]
    fn test_push_without_preallocation_keeps_sums_correct() {
        let mut index = HeightIndex::new();
        for h in 1..=9 {
            index.push(h);
        }
        // 1 + 2 + ... + 9
        assert_eq!(index.total(), 45);
        assert_eq!(index.offset_of(4), 10);
        assert_eq!(index.offset_of(8), 36);
    }

    #[test]
    fn test_set_updates_height() {
        let mut index = HeightIndex::from_heights(&[3, 4, 5]);

        index.set(1, 10);

        assert_eq!(index.height(1), 10);
        assert_eq!(index.offset_of(1), 3);
        assert_eq!(index.offset_of(2), 13);
        assert_eq!(index.total(), 18);
    }

    #[test]
    fn test_lower_bound_edge_cases() {
        let index = HeightIndex::from_heights(&[5, 5, 5]);

        assert_eq!(index.lower_bound(0), Some(0));
        assert_eq!(index.lower_bound(5), Some(1));
        assert_eq!(index.lower_bound(10), Some(2));
        assert_eq!(index.lower_bound(14), Some(2));
        assert_eq!(index.lower_bound(15), None);
        assert_eq!(index.lower_bound(u64::MAX), None);
    }

    #[test]
    fn test_truncate_keeps_prefix_sums() {
        let mut index = HeightIndex::from_heights(&[1, 2, 3, 4, 5, 6, 7]);
        index.truncate(4);
        assert_eq!(index.len(), 4);
        assert_eq!(index.total(), 10);
        assert_eq!(index.lower_bound(6), Some(3));
        assert_eq!(index.lower_bound(10), None);
    }

    #[test]
    fn test_resize_grows_with_fill_and_shrinks() {
        let mut index = HeightIndex::from_heights(&[2, 2]);
        index.resize(5, 3);
        assert_eq!(index.len(), 5);
        assert_eq!(index.total(), 13);
        index.resize(1, 3);
        assert_eq!(index.total(), 2);
    }

    #[test]
    fn test_clear_and_reuse() {
        let mut index = HeightIndex::from_heights(&[5, 3]);
        index.clear();
        assert!(index.is_empty());

        index.push(10);
        assert_eq!(index.len(), 1);
        assert_eq!(index.total(), 10);
    }

    proptest! {
        /// offset_of(i) == sum(heights[0..i])
        #[test]
        fn prop_offset_is_cumulative(heights in prop::collection::vec(1u32..=100, 1..80)) {
            let mut index = HeightIndex::new();
            for &h in &heights {
                index.push(h);
            }

            let mut expected = 0u64;
            for (i, &h) in heights.iter().enumerate() {
                prop_assert_eq!(index.offset_of(i), expected);
                expected += u64::from(h);
            }
            prop_assert_eq!(index.total(), expected);
        }

        /// Pushing one row at a time builds the same tree as bulk construction.
        #[test]
        fn prop_push_matches_from_heights(heights in prop::collection::vec(1u32..=100, 0..80)) {
            let mut pushed = HeightIndex::new();
            for &h in &heights {
                pushed.push(h);
            }
            let bulk = HeightIndex::from_heights(&heights);
            prop_assert_eq!(pushed.tree, bulk.tree);
        }

        /// Tree descent agrees with a linear scan for every offset.
        #[test]
        fn prop_lower_bound_matches_linear_scan(
            heights in prop::collection::vec(1u32..=50, 1..60),
            offset in 0u64..4000,
        ) {
            let index = HeightIndex::from_heights(&heights);
            prop_assert_eq!(index.lower_bound(offset), linear_lower_bound(&heights, offset));
        }

        /// After set(i, h), height(i) == h and the total moves by the delta.
        #[test]
        fn prop_set_updates_height(
            heights in prop::collection::vec(1u32..=100, 1..50),
            update_index in 0usize..50,
            new_height in 1u32..=100
        ) {
            let mut index = HeightIndex::from_heights(&heights);
            if update_index < index.len() {
                let before = index.total();
                let old = index.height(update_index);
                index.set(update_index, new_height);

                prop_assert_eq!(index.height(update_index), new_height);
                prop_assert_eq!(
                    index.total() as i64,
                    before as i64 + i64::from(new_height) - i64::from(old)
                );
                prop_assert_eq!(
                    index.offset_of(update_index + 1) - index.offset_of(update_index),
                    u64::from(new_height)
                );
            }
        }
    }
}
