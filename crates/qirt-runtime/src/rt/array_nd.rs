//! Multi-dimensional runtime arrays.

use crate::error::{RuntimeError, RuntimeResult};
use crate::rt::array::QirArray;

/// A rectangular array of any rank, stored in row-major order.
///
/// Coordinates are `i64` as in QIR. Each one is checked against its own
/// dimension, so `[0, 5]` on a 2x3 array fails even though the flat offset
/// would be in bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QirArrayNd<T> {
    dims: Vec<usize>,
    items: Vec<T>,
}

impl<T> QirArrayNd<T> {
    /// Number of dimensions.
    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    /// Size of every dimension.
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Total number of elements.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether some dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn offset(&self, index: &[i64]) -> RuntimeResult<usize> {
        if index.len() != self.dims.len() {
            return Err(RuntimeError::RankMismatch {
                rank: self.dims.len(),
                got: index.len(),
            });
        }
        let mut offset = 0;
        for (&i, &dim) in index.iter().zip(&self.dims) {
            let i = usize::try_from(i)
                .ok()
                .filter(|&i| i < dim)
                .ok_or(RuntimeError::IndexOutOfRange { index: i, len: dim })?;
            offset = offset * dim + i;
        }
        Ok(offset)
    }

    /// Element at `index`.
    pub fn get(&self, index: &[i64]) -> RuntimeResult<&T> {
        let i = self.offset(index)?;
        Ok(&self.items[i])
    }

    /// Overwrite the element at `index`.
    pub fn set(&mut self, index: &[i64], value: T) -> RuntimeResult<()> {
        let i = self.offset(index)?;
        self.items[i] = value;
        Ok(())
    }

    /// The elements in row-major order.
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T: Clone> QirArrayNd<T> {
    /// An array with the given dimensions, every element set to `fill`.
    pub fn create(dims: &[usize], fill: T) -> Self {
        Self {
            dims: dims.to_vec(),
            items: vec![fill; dims.iter().product()],
        }
    }

    /// A copy of the slice at `index` along dimension `dim`.
    ///
    /// The result has one dimension less; the array itself is unchanged.
    pub fn project(&self, dim: usize, index: i64) -> RuntimeResult<Self> {
        if dim >= self.dims.len() {
            return Err(RuntimeError::IndexOutOfRange {
                index: dim as i64,
                len: self.dims.len(),
            });
        }
        let size = self.dims[dim];
        let fixed = usize::try_from(index)
            .ok()
            .filter(|&i| i < size)
            .ok_or(RuntimeError::IndexOutOfRange { index, len: size })?;

        let outer: usize = self.dims[..dim].iter().product();
        let inner: usize = self.dims[dim + 1..].iter().product();
        let mut items = Vec::with_capacity(outer * inner);
        for o in 0..outer {
            let start = (o * size + fixed) * inner;
            items.extend_from_slice(&self.items[start..start + inner]);
        }

        let mut dims = self.dims.clone();
        dims.remove(dim);
        Ok(Self { dims, items })
    }
}

impl<T> From<QirArray<T>> for QirArrayNd<T> {
    fn from(array: QirArray<T>) -> Self {
        Self {
            dims: vec![array.len()],
            items: array.into_vec(),
        }
    }
}
