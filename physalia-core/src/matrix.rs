//! Dense row-major `f64` matrix for probability tables.
//!
//! A minimal container: allocation, element access, row extraction, and the
//! two normalizations the estimation code needs (per-row and whole-vector L1).

/// A dense matrix of `f64` stored in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Create a `rows × cols` matrix of zeros.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Element at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if `row` or `col` is out of bounds.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        assert!(row < self.rows && col < self.cols, "index out of bounds");
        self.data[row * self.cols + col]
    }

    /// Set the element at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if `row` or `col` is out of bounds.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        assert!(row < self.rows && col < self.cols, "index out of bounds");
        self.data[row * self.cols + col] = value;
    }

    /// Add `delta` to the element at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if `row` or `col` is out of bounds.
    #[inline]
    pub fn add(&mut self, row: usize, col: usize, delta: f64) {
        assert!(row < self.rows && col < self.cols, "index out of bounds");
        self.data[row * self.cols + col] += delta;
    }

    /// Borrow row `row` as a slice.
    ///
    /// # Panics
    ///
    /// Panics if `row` is out of bounds.
    pub fn row(&self, row: usize) -> &[f64] {
        assert!(row < self.rows, "row out of bounds");
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// Sum of the elements in row `row`.
    pub fn row_sum(&self, row: usize) -> f64 {
        self.row(row).iter().sum()
    }

    /// Divide each row by its sum so that it becomes a probability
    /// distribution.
    ///
    /// A row whose sum is zero is left unchanged (all zeros) rather than
    /// producing NaN; callers treat such a row as "every outcome impossible".
    pub fn normalize_rows(&mut self) {
        for row in 0..self.rows {
            let sum = self.row_sum(row);
            if sum == 0.0 {
                continue;
            }
            for col in 0..self.cols {
                self.data[row * self.cols + col] /= sum;
            }
        }
    }
}

/// Divide each element of `values` by the total so the vector sums to 1.
///
/// A vector summing to zero is left unchanged, matching
/// [`Matrix::normalize_rows`].
pub fn l1_normalize(values: &mut [f64]) {
    let sum: f64 = values.iter().sum();
    if sum == 0.0 {
        return;
    }
    for v in values.iter_mut() {
        *v /= sum;
    }
}
