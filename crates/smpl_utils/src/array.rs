use nalgebra as na;
use ndarray as nd;
use num_traits::Zero;

//the equivalent of python's dst=src[indices] along the first axis
pub trait GatherRows<T: Clone + Zero> {
    fn gather_rows(&self, indices: &[usize]) -> nd::Array2<T>;
}
impl<T: Clone + Zero, S: nd::Data<Elem = T>> GatherRows<T> for nd::ArrayBase<S, nd::Ix2> {
    fn gather_rows(&self, indices: &[usize]) -> nd::Array2<T> {
        let mut res = nd::Array2::<T>::zeros((indices.len(), self.ncols()));
        for (mut dst, &i_in) in res.axis_iter_mut(nd::Axis(0)).zip(indices) {
            dst.assign(&self.row(i_in));
        }
        res
    }
}

/// Reads row `idx` of a `N x 3` array as a vector
pub fn row_to_vec3(arr: &nd::ArrayView2<f64>, idx: usize) -> na::Vector3<f64> {
    let row = arr.row(idx);
    na::Vector3::new(row[0], row[1], row[2])
}

/// Column-wise mean of a `N x 3` array
pub fn mean_row(arr: &nd::ArrayView2<f64>) -> na::Vector3<f64> {
    arr.mean_axis(nd::Axis(0))
        .map_or_else(na::Vector3::zeros, |m| na::Vector3::new(m[0], m[1], m[2]))
}

/// Writes a 4x3 block into rows ``4 * block_idx .. 4 * block_idx + 4`` of a
/// stacked `4N x 3` array
pub fn assign_block4x3(dst: &mut nd::Array2<f64>, block_idx: usize, block: &na::Matrix4x3<f64>) {
    let mut view = dst.slice_mut(nd::s![4 * block_idx..4 * block_idx + 4, ..]);
    for ((r, c), v) in view.indexed_iter_mut() {
        *v = block[(r, c)];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn gathers_rows_in_order() {
        let src = array![[0.0, 1.0], [2.0, 3.0], [4.0, 5.0]];
        let gathered = src.gather_rows(&[2, 0, 2]);
        assert_eq!(gathered, array![[4.0, 5.0], [0.0, 1.0], [4.0, 5.0]]);
    }

    #[test]
    fn block_lands_in_its_slot() {
        let mut stacked = nd::Array2::<f64>::zeros((8, 3));
        let block = na::Matrix4x3::from_fn(|r, c| (r * 3 + c) as f64);
        assign_block4x3(&mut stacked, 1, &block);
        assert_eq!(stacked.row(4).to_vec(), vec![0.0, 1.0, 2.0]);
        assert_eq!(stacked.row(7).to_vec(), vec![9.0, 10.0, 11.0]);
        assert!(stacked.slice(nd::s![0..4, ..]).iter().all(|v| *v == 0.0));
    }

    #[test]
    fn mean_of_rows() {
        let pts = array![[0.0, 0.0, 0.0], [2.0, 4.0, -2.0]];
        assert_eq!(mean_row(&pts.view()), na::Vector3::new(1.0, 2.0, -1.0));
    }
}
