use std::cmp::Ordering;
use std::fmt;

/// Decides which of two items must sit nearer the root of a [`PriorityHeap`].
///
/// `better(a, b)` returns true if `a` must be extracted before `b`. The relation
/// must be a strict weak ordering: irreflexive and transitive.
pub trait Priority<T> {
    fn better(&self, a: &T, b: &T) -> bool;
}

/// Largest item first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaxFirst;

impl<T: Ord> Priority<T> for MaxFirst {
    #[inline]
    fn better(&self, a: &T, b: &T) -> bool {
        a > b
    }
}

/// Smallest item first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MinFirst;

impl<T: Ord> Priority<T> for MinFirst {
    #[inline]
    fn better(&self, a: &T, b: &T) -> bool {
        a < b
    }
}

impl<T, F> Priority<T> for F
where
    F: Fn(&T, &T) -> bool,
{
    #[inline]
    fn better(&self, a: &T, b: &T) -> bool {
        self(a, b)
    }
}

/// Array-backed binary heap ordered by an injected [`Priority`].
///
/// The tree is stored densely: the children of index `i` live at `2i + 1` and
/// `2i + 2`. Both sifts are iterative, so stack usage does not grow with the heap.
#[derive(Clone)]
pub struct PriorityHeap<T, P> {
    items: Vec<T>,
    priority: P,
}

impl<T, P: Priority<T>> PriorityHeap<T, P> {
    pub fn new(priority: P) -> Self {
        Self {
            items: Vec::new(),
            priority,
        }
    }

    pub fn with_capacity(capacity: usize, priority: P) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            priority,
        }
    }

    /// Insert an item. O(log n).
    pub fn insert(&mut self, item: T) {
        self.items.push(item);
        self.sift_up(self.items.len() - 1);
    }

    /// Remove and return the root, or `None` if the heap is empty. O(log n).
    pub fn extract_root(&mut self) -> Option<T> {
        let last = self.items.pop()?;
        if self.items.is_empty() {
            return Some(last);
        }

        let root = std::mem::replace(&mut self.items[0], last);
        self.sift_down(0);
        Some(root)
    }

    /// The root without removing it. O(1).
    #[inline]
    pub fn peek(&self) -> Option<&T> {
        self.items.first()
    }

    /// Mutate the root in place, then restore the heap property from the root.
    ///
    /// Returns `None` without calling `f` if the heap is empty.
    pub fn update_root<R>(&mut self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let root = self.items.first_mut()?;
        let result = f(root);
        self.sift_down(0);
        Some(result)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Items in storage order (not priority order).
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Copy of the contents in extraction order.
    pub fn to_sorted_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        let mut sorted = self.items.clone();
        sorted.sort_by(|a, b| self.compare(a, b));
        sorted
    }

    /// True if no child is better than its parent.
    pub fn is_heap(&self) -> bool {
        (1..self.items.len())
            .all(|i| !self.priority.better(&self.items[i], &self.items[parent(i)]))
    }

    fn compare(&self, a: &T, b: &T) -> Ordering {
        if self.priority.better(a, b) {
            Ordering::Less
        } else if self.priority.better(b, a) {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = parent(index);
            if !self
                .priority
                .better(&self.items[index], &self.items[parent])
            {
                break;
            }
            self.items.swap(index, parent);
            index = parent;
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.items.len();

        loop {
            let left = 2 * index + 1;
            if left >= len {
                break;
            }

            let mut best = index;
            if self.priority.better(&self.items[left], &self.items[best]) {
                best = left;
            }
            let right = left + 1;
            if right < len && self.priority.better(&self.items[right], &self.items[best]) {
                best = right;
            }

            if best == index {
                break;
            }
            self.items.swap(index, best);
            index = best;
        }
    }
}

impl<T, P: Priority<T> + Default> Default for PriorityHeap<T, P> {
    fn default() -> Self {
        Self::new(P::default())
    }
}

impl<T, P: Priority<T>> Extend<T> for PriorityHeap<T, P> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.insert(item);
        }
    }
}

impl<T: fmt::Debug, P> fmt::Debug for PriorityHeap<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PriorityHeap")
            .field("len", &self.items.len())
            .field("root", &self.items.first())
            .finish()
    }
}

#[inline(always)]
fn parent(index: usize) -> usize {
    (index - 1) / 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn drain<T, P: Priority<T>>(heap: &mut PriorityHeap<T, P>) -> Vec<T> {
        std::iter::from_fn(|| heap.extract_root()).collect()
    }

    #[test]
    fn test_empty_heap() {
        let mut heap: PriorityHeap<u32, MaxFirst> = PriorityHeap::default();
        assert!(heap.is_empty());
        assert_eq!(heap.peek(), None);
        assert_eq!(heap.extract_root(), None);
        assert_eq!(heap.update_root(|x| *x += 1), None);
    }

    #[test]
    fn test_max_and_min_share_one_structure() {
        let values = [5, 1, 9, 3, 7, 3, 8];

        let mut max = PriorityHeap::new(MaxFirst);
        max.extend(values);
        assert_eq!(max.peek(), Some(&9));
        assert_eq!(drain(&mut max), vec![9, 8, 7, 5, 3, 3, 1]);

        let mut min = PriorityHeap::new(MinFirst);
        min.extend(values);
        assert_eq!(min.peek(), Some(&1));
        assert_eq!(drain(&mut min), vec![1, 3, 3, 5, 7, 8, 9]);
    }

    #[test]
    fn test_closure_priority() {
        // Longest string first
        let mut heap: PriorityHeap<&str, _> =
            PriorityHeap::new(|a: &&str, b: &&str| a.len() > b.len());
        heap.extend(["ab", "abcd", "a", "abc"]);
        assert_eq!(drain(&mut heap), vec!["abcd", "abc", "ab", "a"]);
    }

    #[test]
    fn test_single_element_extract() {
        let mut heap = PriorityHeap::new(MinFirst);
        heap.insert(42);
        assert_eq!(heap.len(), 1);
        assert_eq!(heap.extract_root(), Some(42));
        assert!(heap.is_empty());
    }

    #[test]
    fn test_update_root_resifts() {
        let mut heap = PriorityHeap::new(MinFirst);
        heap.extend([1, 4, 6, 10]);

        heap.update_root(|x| *x = 8);
        assert!(heap.is_heap());
        assert_eq!(heap.peek(), Some(&4));
        assert_eq!(drain(&mut heap), vec![4, 6, 8, 10]);
    }

    #[test]
    fn test_to_sorted_vec_leaves_heap_intact() {
        let mut heap = PriorityHeap::new(MaxFirst);
        heap.extend([2, 9, 4]);
        assert_eq!(heap.to_sorted_vec(), vec![9, 4, 2]);
        assert_eq!(heap.len(), 3);
        assert!(heap.is_heap());
    }

    #[test]
    fn test_deep_heap_does_not_recurse() {
        let mut heap = PriorityHeap::with_capacity(200_000, MaxFirst);
        heap.extend(0..200_000u32);
        assert_eq!(heap.peek(), Some(&199_999));

        let mut previous = u32::MAX;
        while let Some(value) = heap.extract_root() {
            assert!(value <= previous);
            previous = value;
        }
    }

    #[derive(Debug, Clone)]
    enum Op {
        Insert(i32),
        Extract,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            3 => (-1000i32..1000).prop_map(Op::Insert),
            1 => Just(Op::Extract),
        ]
    }

    proptest! {
        #[test]
        fn prop_heap_property_holds_after_every_operation(
            ops in proptest::collection::vec(op_strategy(), 0..300),
        ) {
            let mut heap = PriorityHeap::new(MinFirst);
            let mut model: Vec<i32> = Vec::new();

            for op in ops {
                match op {
                    Op::Insert(value) => {
                        heap.insert(value);
                        model.push(value);
                    }
                    Op::Extract => {
                        model.sort_unstable_by(|a, b| b.cmp(a));
                        let expected = model.pop();
                        prop_assert_eq!(heap.extract_root(), expected);
                    }
                }
                prop_assert!(heap.is_heap());
                prop_assert_eq!(heap.len(), model.len());
                prop_assert_eq!(heap.peek().copied(), model.iter().min().copied());
            }
        }
    }
}
