use ndarray as nd;

/// A single ``(row, col, value)`` entry used to assemble a ``SparseMatrix``
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triplet {
    pub row: usize,
    pub col: usize,
    pub value: f64,
}
impl Triplet {
    pub fn new(row: usize, col: usize, value: f64) -> Self {
        Self { row, col, value }
    }
}

/// Compressed sparse row matrix of doubles. Only what skinning needs: assembly
/// from triplets, row iteration and products with dense matrices.
#[derive(Clone, Debug, PartialEq)]
pub struct SparseMatrix {
    nrows: usize,
    ncols: usize,
    row_offsets: Vec<usize>,
    col_indices: Vec<usize>,
    values: Vec<f64>,
}
impl SparseMatrix {
    /// Assembles the matrix from unordered triplets. Entries landing on the
    /// same position are summed.
    /// # Panics
    /// Will panic if a triplet lies outside of ``nrows x ncols``
    pub fn from_triplets(nrows: usize, ncols: usize, mut triplets: Vec<Triplet>) -> Self {
        for t in &triplets {
            assert!(
                t.row < nrows && t.col < ncols,
                "Triplet ({}, {}) is outside of a {nrows}x{ncols} matrix",
                t.row,
                t.col
            );
        }
        triplets.sort_by(|a, b| (a.row, a.col).cmp(&(b.row, b.col)));

        let mut row_offsets = vec![0; nrows + 1];
        let mut col_indices: Vec<usize> = Vec::with_capacity(triplets.len());
        let mut values: Vec<f64> = Vec::with_capacity(triplets.len());
        let mut last: Option<(usize, usize)> = None;
        for t in triplets {
            if last == Some((t.row, t.col)) {
                if let Some(v) = values.last_mut() {
                    *v += t.value;
                }
                continue;
            }
            row_offsets[t.row + 1] += 1;
            col_indices.push(t.col);
            values.push(t.value);
            last = Some((t.row, t.col));
        }
        for r in 0..nrows {
            row_offsets[r + 1] += row_offsets[r];
        }
        Self {
            nrows,
            ncols,
            row_offsets,
            col_indices,
            values,
        }
    }

    /// Keeps only the entries of `dense` strictly greater than `threshold`
    pub fn from_dense_thresholded(dense: nd::ArrayView2<f64>, threshold: f64) -> Self {
        let (nrows, ncols) = dense.dim();
        let triplets = dense
            .indexed_iter()
            .filter(|(_, &value)| value > threshold)
            .map(|((row, col), &value)| Triplet::new(row, col, value))
            .collect();
        Self::from_triplets(nrows, ncols, triplets)
    }

    pub fn nrows(&self) -> usize {
        self.nrows
    }
    pub fn ncols(&self) -> usize {
        self.ncols
    }
    /// Number of stored entries
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Stored ``(col, value)`` pairs of a row, ordered by column
    pub fn row(&self, row: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let range = self.row_offsets[row]..self.row_offsets[row + 1];
        self.col_indices[range.clone()].iter().copied().zip(self.values[range].iter().copied())
    }

    pub fn row_nnz(&self, row: usize) -> usize {
        self.row_offsets[row + 1] - self.row_offsets[row]
    }

    /// All stored entries in row-major order
    pub fn iter(&self) -> impl Iterator<Item = Triplet> + '_ {
        (0..self.nrows).flat_map(move |r| self.row(r).map(move |(c, v)| Triplet::new(r, c, v)))
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.row(row).find(|(c, _)| *c == col).map_or(0.0, |(_, v)| v)
    }

    /// Sparse times dense product
    /// # Panics
    /// Will panic if the inner dimensions disagree
    pub fn dot_dense<S>(&self, rhs: &nd::ArrayBase<S, nd::Ix2>) -> nd::Array2<f64>
    where
        S: nd::Data<Elem = f64>,
    {
        assert_eq!(
            self.ncols,
            rhs.nrows(),
            "Cannot multiply a {}x{} sparse matrix with a {}x{} matrix",
            self.nrows,
            self.ncols,
            rhs.nrows(),
            rhs.ncols()
        );
        let mut res = nd::Array2::<f64>::zeros((self.nrows, rhs.ncols()));
        for (r, mut res_row) in res.axis_iter_mut(nd::Axis(0)).enumerate() {
            for (c, v) in self.row(r) {
                res_row.scaled_add(v, &rhs.row(c));
            }
        }
        res
    }

    pub fn to_dense(&self) -> nd::Array2<f64> {
        let mut dense = nd::Array2::<f64>::zeros((self.nrows, self.ncols));
        for t in self.iter() {
            dense[[t.row, t.col]] = t.value;
        }
        dense
    }
}
