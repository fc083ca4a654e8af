//! Rectangular row-major matrix
//!
//! Units are rows and events are columns everywhere in the crate, so the same
//! `(i, j)` index addresses the observation, the event covariate and the
//! detection probability of one unit-event pair.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::ops::Index;

/// Errors raised when building a matrix from non-rectangular input
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatrixShapeError {
    /// A row has a different length than the first row
    #[error("Row {row} has {actual} columns, expected {expected}")]
    Ragged {
        /// Index of the offending row
        row: usize,
        /// Column count of the first row
        expected: usize,
        /// Column count of the offending row
        actual: usize,
    },

    /// A per-row vector does not have one value per row
    #[error("Expected {expected} row values, got {actual}")]
    RowCount {
        /// Number of rows
        expected: usize,
        /// Number of values supplied
        actual: usize,
    },

    /// Flat storage does not match `rows * cols`
    #[error("Expected {expected} values for the requested shape, got {actual}")]
    Length {
        /// `rows * cols`
        expected: usize,
        /// Number of values supplied
        actual: usize,
    },
}

/// Dense `rows × cols` matrix stored row-major
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T> Matrix<T> {
    /// Build a matrix by calling `f(i, j)` in row-major order
    ///
    /// Panics if `rows * cols` values cannot be allocated; configurations are
    /// checked for this before generation.
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                data.push(f(i, j));
            }
        }
        Self { rows, cols, data }
    }

    /// Build a matrix from flat row-major storage
    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Result<Self, MatrixShapeError> {
        if rows.checked_mul(cols) != Some(data.len()) {
            return Err(MatrixShapeError::Length {
                expected: rows.saturating_mul(cols),
                actual: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Build a matrix from nested rows, rejecting ragged input
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self, MatrixShapeError> {
        let row_count = rows.len();
        let cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(row_count * cols);

        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != cols {
                return Err(MatrixShapeError::Ragged { row, expected: cols, actual: values.len() });
            }
            data.extend(values);
        }

        Ok(Self { rows: row_count, cols, data })
    }

    /// Number of rows (units)
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns (events per unit)
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Element at `(i, j)`, or `None` when out of bounds
    pub fn get(&self, i: usize, j: usize) -> Option<&T> {
        if i < self.rows && j < self.cols {
            self.data.get(i * self.cols + j)
        } else {
            None
        }
    }

    /// Row `i` as a slice
    ///
    /// Panics when `i` is out of bounds.
    pub fn row(&self, i: usize) -> &[T] {
        assert!(i < self.rows, "row {} out of bounds for {} rows", i, self.rows);
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Iterate over rows in order
    pub fn iter_rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        (0..self.rows).map(move |i| self.row(i))
    }

    /// Iterate over all elements in row-major order
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Flat row-major storage
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Apply `f` elementwise, keeping the shape
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Matrix<U> {
        Matrix { rows: self.rows, cols: self.cols, data: self.data.iter().map(f).collect() }
    }
}

impl<T> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    fn index(&self, (i, j): (usize, usize)) -> &T {
        assert!(
            i < self.rows && j < self.cols,
            "index ({}, {}) out of bounds for {}x{} matrix",
            i,
            j,
            self.rows,
            self.cols
        );
        &self.data[i * self.cols + j]
    }
}

impl<T: Serialize> Serialize for Matrix<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.iter_rows())
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Matrix<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let rows = Vec::<Vec<T>>::deserialize(deserializer)?;
        Matrix::from_rows(rows).map_err(serde::de::Error::custom)
    }
}
