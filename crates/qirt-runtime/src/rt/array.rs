//! One-dimensional runtime arrays.

use std::ops::Index;

use crate::error::{RuntimeError, RuntimeResult};
use crate::rt::range::QirRange;

/// A length-prefixed buffer of elements.
///
/// Indices are `i64` as in QIR; anything outside `0..len` is rejected with
/// [`RuntimeError::IndexOutOfRange`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QirArray<T> {
    items: Vec<T>,
}

impl<T> QirArray<T> {
    /// Wrap an existing vector.
    pub fn from_vec(items: Vec<T>) -> Self {
        Self { items }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the array has no elements.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn offset(&self, index: i64) -> RuntimeResult<usize> {
        usize::try_from(index)
            .ok()
            .filter(|&i| i < self.items.len())
            .ok_or(RuntimeError::IndexOutOfRange {
                index,
                len: self.items.len(),
            })
    }

    /// Element at `index`.
    pub fn get(&self, index: i64) -> RuntimeResult<&T> {
        let i = self.offset(index)?;
        Ok(&self.items[i])
    }

    /// Mutable element at `index`.
    pub fn get_mut(&mut self, index: i64) -> RuntimeResult<&mut T> {
        let i = self.offset(index)?;
        Ok(&mut self.items[i])
    }

    /// Overwrite the element at `index`.
    pub fn set(&mut self, index: i64, value: T) -> RuntimeResult<()> {
        *self.get_mut(index)? = value;
        Ok(())
    }

    /// The elements as a slice.
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Iterate over the elements.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Unwrap into the underlying vector.
    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T: Clone> QirArray<T> {
    /// An array of `len` copies of `fill`.
    pub fn create_1d(len: usize, fill: T) -> Self {
        Self {
            items: vec![fill; len],
        }
    }

    /// A new array of the elements selected by `range`.
    ///
    /// Every index the range produces must be in bounds; an empty range
    /// gives an empty array.
    pub fn slice_1d(&self, range: &QirRange) -> RuntimeResult<Self> {
        let items = range
            .iter()
            .map(|index| self.get(index).cloned())
            .collect::<RuntimeResult<Vec<T>>>()?;
        Ok(Self { items })
    }

    /// A new array of the elements of `self` followed by those of `other`.
    pub fn concatenate(&self, other: &Self) -> Self {
        let mut items = Vec::with_capacity(self.len() + other.len());
        items.extend_from_slice(&self.items);
        items.extend_from_slice(&other.items);
        Self { items }
    }
}

impl<T> From<Vec<T>> for QirArray<T> {
    fn from(items: Vec<T>) -> Self {
        Self::from_vec(items)
    }
}

impl<T> FromIterator<T> for QirArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

impl<T> Index<usize> for QirArray<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}

impl<'a, T> IntoIterator for &'a QirArray<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
