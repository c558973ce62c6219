use crate::error::{GestureError, GestureResult};
use parking_lot::RwLock;
use std::fmt;
use std::ops::{Bound, RangeBounds};
use std::sync::Arc;

/// Read-only view over a live, growing sequence.
///
/// Views alias the recorder's storage. Every call reads the sequence as it
/// is at that moment, so a view kept across move events sees rows appended
/// after it was created. Elements are returned by value; a later append can
/// never invalidate something already read.
pub struct HistoryView<T> {
    rows: Arc<RwLock<Vec<T>>>,
}

impl<T> HistoryView<T> {
    pub(crate) fn new(rows: Arc<RwLock<Vec<T>>>) -> Self {
        Self { rows }
    }

    /// Number of rows recorded so far
    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }

    /// True if both views read the same underlying sequence
    pub fn shares_storage_with(&self, other: &HistoryView<T>) -> bool {
        Arc::ptr_eq(&self.rows, &other.rows)
    }
}

impl<T: Clone> HistoryView<T> {
    fn at(&self, index: usize) -> Option<T> {
        self.rows.read().get(index).cloned()
    }

    /// Row at `index`, or `OutOfRange` past the end
    pub fn get(&self, index: usize) -> GestureResult<T> {
        let rows = self.rows.read();
        rows.get(index).cloned().ok_or(GestureError::OutOfRange {
            index,
            len: rows.len(),
        })
    }

    /// Oldest row, if any
    pub fn first(&self) -> Option<T> {
        self.rows.read().first().cloned()
    }

    /// Newest row, if any
    pub fn last(&self) -> Option<T> {
        self.rows.read().last().cloned()
    }

    /// Copy out a half-open sub-range. Bounds past the end are clamped.
    pub fn slice<R: RangeBounds<usize>>(&self, range: R) -> Vec<T> {
        let rows = self.rows.read();
        let len = rows.len();

        let start = match range.start_bound() {
            Bound::Included(&s) => s,
            Bound::Excluded(&s) => s.saturating_add(1),
            Bound::Unbounded => 0,
        }
        .min(len);
        let end = match range.end_bound() {
            Bound::Included(&e) => e.saturating_add(1),
            Bound::Excluded(&e) => e,
            Bound::Unbounded => len,
        }
        .min(len);

        if start >= end {
            return Vec::new();
        }
        rows[start..end].to_vec()
    }

    /// Copy of every row present now
    pub fn to_vec(&self) -> Vec<T> {
        self.rows.read().clone()
    }

    /// Iterate over the rows present now, reading each one on demand
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            view: self,
            front: 0,
            back: self.len(),
        }
    }

    /// Call `f` with `(index, value)` for each row, oldest first
    pub fn for_each<F: FnMut(usize, &T)>(&self, mut f: F) {
        for (i, value) in self.iter().enumerate() {
            f(i, &value);
        }
    }

    /// True if `f` holds for every row. Vacuously true when empty.
    pub fn every<F: FnMut(&T) -> bool>(&self, mut f: F) -> bool {
        self.iter().all(|v| f(&v))
    }

    /// True if `f` holds for at least one row
    pub fn some<F: FnMut(&T) -> bool>(&self, mut f: F) -> bool {
        self.iter().any(|v| f(&v))
    }

    /// Rows for which `f` returns true, in order
    pub fn filter<F: FnMut(&T) -> bool>(&self, mut f: F) -> Vec<T> {
        self.iter().filter(|v| f(v)).collect()
    }

    /// `f` applied to each row, in order
    pub fn map<U, F: FnMut(&T) -> U>(&self, mut f: F) -> Vec<U> {
        self.iter().map(|v| f(&v)).collect()
    }

    /// Left reduction seeded with the first row. `None` when empty.
    pub fn reduce<F: FnMut(T, T) -> T>(&self, f: F) -> Option<T> {
        self.iter().reduce(f)
    }

    /// Left fold from `init`, oldest row first
    pub fn fold<B, F: FnMut(B, &T) -> B>(&self, init: B, mut f: F) -> B {
        self.iter().fold(init, |acc, v| f(acc, &v))
    }

    /// Right reduction seeded with the last row. `None` when empty.
    pub fn reduce_right<F: FnMut(T, T) -> T>(&self, f: F) -> Option<T> {
        self.iter().rev().reduce(f)
    }

    /// Right fold from `init`, newest row first
    pub fn fold_right<B, F: FnMut(B, &T) -> B>(&self, init: B, mut f: F) -> B {
        self.iter().rev().fold(init, |acc, v| f(acc, &v))
    }

    /// New sequence of this view's rows followed by `tail`
    pub fn concat<I: IntoIterator<Item = T>>(&self, tail: I) -> Vec<T> {
        let mut out = self.to_vec();
        out.extend(tail);
        out
    }
}

impl<T: Clone + PartialEq> HistoryView<T> {
    /// First index at or after `from` holding `value`
    pub fn index_of(&self, value: &T, from: usize) -> Option<usize> {
        let rows = self.rows.read();
        let start = from.min(rows.len());
        rows[start..]
            .iter()
            .position(|v| v == value)
            .map(|i| i + start)
    }

    /// Last index at or before `from` holding `value`
    pub fn last_index_of(&self, value: &T, from: usize) -> Option<usize> {
        let rows = self.rows.read();
        if rows.is_empty() {
            return None;
        }
        let end = from.min(rows.len() - 1);
        rows[..=end].iter().rposition(|v| v == value)
    }

    pub fn contains(&self, value: &T) -> bool {
        self.rows.read().contains(value)
    }
}

impl<T> Clone for HistoryView<T> {
    fn clone(&self) -> Self {
        Self {
            rows: self.rows.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for HistoryView<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.rows.read().iter()).finish()
    }
}

impl<T: fmt::Display> fmt::Display for HistoryView<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.rows.read().iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", value)?;
        }
        Ok(())
    }
}

/// Iterator over a view's rows.
///
/// Bounded by the length when the iterator was created. No lock is held
/// between items, so closures driven by it may read other views.
pub struct Iter<'a, T> {
    view: &'a HistoryView<T>,
    front: usize,
    back: usize,
}

impl<T: Clone> Iterator for Iter<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.front >= self.back {
            return None;
        }
        let value = self.view.at(self.front)?;
        self.front += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.back - self.front;
        (n, Some(n))
    }
}

impl<T: Clone> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<T> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        self.view.at(self.back)
    }
}

impl<T: Clone> ExactSizeIterator for Iter<'_, T> {}

impl<'a, T: Clone> IntoIterator for &'a HistoryView<T> {
    type Item = T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::track::Track;
    use crate::input::types::Sample;

    fn track_of(values: &[i64]) -> Track<i64> {
        let mut track = Track::new();
        for v in values {
            track.push(*v);
        }
        track
    }

    #[test]
    fn test_get_and_out_of_range() {
        let track = track_of(&[10, 20, 30]);
        let view = track.view();

        assert_eq!(view.get(0), Ok(10));
        assert_eq!(view.get(2), Ok(30));
        assert_eq!(
            view.get(3),
            Err(GestureError::OutOfRange { index: 3, len: 3 })
        );
    }

    #[test]
    fn test_view_aliases_live_sequence() {
        let mut track = track_of(&[1, 2]);
        let early = track.view();
        assert_eq!(early.len(), 2);

        track.push(3);

        assert_eq!(early.len(), 3, "view must see rows appended after creation");
        assert_eq!(early.get(2), Ok(3));
        assert!(early.shares_storage_with(&track.view()));
    }

    #[test]
    fn test_slice_clamps() {
        let view = track_of(&[1, 2, 3, 4]).view();

        assert_eq!(view.slice(1..3), vec![2, 3]);
        assert_eq!(view.slice(2..), vec![3, 4]);
        assert_eq!(view.slice(..=1), vec![1, 2]);
        assert_eq!(view.slice(2..100), vec![3, 4]);
        assert_eq!(view.slice(10..20), Vec::<i64>::new());
        assert_eq!(view.slice(3..1), Vec::<i64>::new());
    }

    #[test]
    fn test_slice_is_a_copy() {
        let mut track = track_of(&[1, 2]);
        let copied = track.view().slice(..);
        track.push(3);
        assert_eq!(copied, vec![1, 2]);
    }

    #[test]
    fn test_index_of_and_last_index_of() {
        let view = track_of(&[5, 7, 5, 9, 5]).view();

        assert_eq!(view.index_of(&5, 0), Some(0));
        assert_eq!(view.index_of(&5, 1), Some(2));
        assert_eq!(view.index_of(&5, 5), None);
        assert_eq!(view.index_of(&8, 0), None);

        assert_eq!(view.last_index_of(&5, usize::MAX), Some(4));
        assert_eq!(view.last_index_of(&5, 3), Some(2));
        assert_eq!(view.last_index_of(&9, 2), None);
        assert_eq!(track_of(&[]).view().last_index_of(&5, 0), None);
    }

    #[test]
    fn test_traversals() {
        let view = track_of(&[1, 2, 3, 4]).view();

        let mut seen = Vec::new();
        view.for_each(|i, v| seen.push((i, *v)));
        assert_eq!(seen, vec![(0, 1), (1, 2), (2, 3), (3, 4)]);

        assert!(view.every(|v| *v > 0));
        assert!(!view.every(|v| *v > 1));
        assert!(view.some(|v| *v == 3));
        assert!(!view.some(|v| *v == 7));
        assert_eq!(view.filter(|v| v % 2 == 0), vec![2, 4]);
        assert_eq!(view.map(|v| v * 10), vec![10, 20, 30, 40]);
    }

    #[test]
    fn test_empty_view_traversals() {
        let view = track_of(&[]).view();

        assert!(view.is_empty());
        assert!(view.every(|_| false));
        assert!(!view.some(|_| true));
        assert_eq!(view.first(), None);
        assert_eq!(view.get(0), Err(GestureError::OutOfRange { index: 0, len: 0 }));
        assert_eq!(view.fold(7, |acc, v| acc + v), 7);
    }

    #[test]
    fn test_reductions() {
        let view = track_of(&[1, 2, 3]).view();

        assert_eq!(view.reduce(|a, b| a - b), Some(-4));
        assert_eq!(view.reduce_right(|a, b| a - b), Some(0));
        assert_eq!(view.fold(String::new(), |acc, v| format!("{}{}", acc, v)), "123");
        assert_eq!(view.fold_right(String::new(), |acc, v| format!("{}{}", acc, v)), "321");
        assert_eq!(track_of(&[]).view().reduce(|a, b| a + b), None);
    }

    #[test]
    fn test_iteration_is_bounded_at_start() {
        let mut track = track_of(&[1, 2]);
        let view = track.view();
        let mut iter = view.iter();

        track.push(3);

        assert_eq!(iter.len(), 2);
        assert_eq!(iter.next(), Some(1));
        assert_eq!(iter.next(), Some(2));
        assert_eq!(iter.next(), None);
        assert_eq!(view.iter().count(), 3);
    }

    #[test]
    fn test_closure_may_read_other_views() {
        let track = track_of(&[1, 2, 3]);
        let view = track.view();
        let other = track.view();

        let sums = view.map(|v| v + other.len() as i64);
        assert_eq!(sums, vec![4, 5, 6]);
    }

    #[test]
    fn test_concat_and_display() {
        let track = track_of(&[1, 2]);
        let view = track.view();

        assert_eq!(view.concat(vec![3, 4]), vec![1, 2, 3, 4]);
        assert_eq!(view.len(), 2, "concat must not grow the view");
        assert_eq!(view.to_string(), "1,2");

        let mut samples = Track::new();
        samples.push(Sample::new(10.0, 10.0));
        samples.push(Sample::new(20.0, 15.5));
        assert_eq!(samples.view().to_string(), "(10, 10),(20, 15.5)");
    }
}
