use balance_core::generic_replay_buffer::BatchBase;
use candle_core::{Device, Result, Tensor, WithDType};

/// A column of fixed-shape elements, stored on the host.
///
/// Rows are written and gathered as plain values and turned into a
/// [`Tensor`] of shape `[n_rows, elem_shape..]` with [`TensorBatch::to_tensor`].
#[derive(Clone, Debug, PartialEq)]
pub struct TensorBatch<T> {
    data: Vec<T>,
    elem_shape: Vec<usize>,
    n_rows: usize,
}

impl<T: WithDType> TensorBatch<T> {
    /// Builds a batch from row-major data.
    ///
    /// The number of rows is the length of `data` divided by the element size.
    pub fn from_vec(data: Vec<T>, elem_shape: Vec<usize>) -> Self {
        let elem_size = elem_shape.iter().product::<usize>().max(1);
        let n_rows = data.len() / elem_size;
        Self {
            data,
            elem_shape,
            n_rows,
        }
    }

    fn elem_size(&self) -> usize {
        self.elem_shape.iter().product::<usize>().max(1)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.n_rows
    }

    /// Returns `true` if the batch has no row.
    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    /// Shape of a single row.
    pub fn elem_shape(&self) -> &[usize] {
        &self.elem_shape
    }

    /// Values in row-major order.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Creates a tensor on the given device.
    pub fn to_tensor(&self, device: &Device) -> Result<Tensor> {
        let mut shape = vec![self.n_rows];
        shape.extend_from_slice(&self.elem_shape);
        Tensor::from_slice(&self.data, shape, device)
    }
}

impl<T: WithDType> BatchBase for TensorBatch<T> {
    fn new(capacity: usize) -> Self {
        Self {
            data: vec![],
            elem_shape: vec![],
            n_rows: capacity,
        }
    }

    fn push(&mut self, index: usize, data: Self) {
        if data.is_empty() {
            return;
        }

        // Storage is allocated on the first push, when the row shape is known.
        if self.data.is_empty() {
            self.elem_shape = data.elem_shape.clone();
            self.data = vec![T::from_f64(0.0); self.n_rows * self.elem_size()];
        }

        let elem_size = self.elem_size();
        for (k, row) in data.data.chunks(elem_size).enumerate() {
            let i = ((index + k) % self.n_rows) * elem_size;
            self.data[i..i + elem_size].copy_from_slice(row);
        }
    }

    fn sample(&self, ixs: &[usize]) -> Self {
        if self.data.is_empty() {
            return Self::from_vec(vec![], self.elem_shape.clone());
        }
        let elem_size = self.elem_size();
        let data = ixs
            .iter()
            .flat_map(|&ix| self.data[ix * elem_size..(ix + 1) * elem_size].iter().copied())
            .collect();
        Self {
            data,
            elem_shape: self.elem_shape.clone(),
            n_rows: ixs.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_wraps_around() -> Result<()> {
        let mut column = TensorBatch::<f32>::new(3);
        column.push(0, TensorBatch::from_vec(vec![1.0, 1.5], vec![2]));
        column.push(1, TensorBatch::from_vec(vec![2.0, 2.5, 3.0, 3.5], vec![2]));
        column.push(0, TensorBatch::from_vec(vec![4.0, 4.5], vec![2]));
        // Oldest row (index 0) was overwritten by the last push.
        let sampled = column.sample(&[0, 2, 1]);
        assert_eq!(sampled.len(), 3);
        assert_eq!(sampled.as_slice(), &[4.0, 4.5, 3.0, 3.5, 2.0, 2.5]);

        let t = sampled.to_tensor(&Device::Cpu)?;
        assert_eq!(t.dims(), &[3, 2]);
        Ok(())
    }

    #[test]
    fn test_actions() -> Result<()> {
        let mut column = TensorBatch::<i64>::new(4);
        for (i, a) in [1i64, 0, 1].into_iter().enumerate() {
            column.push(i, TensorBatch::from_vec(vec![a], vec![]));
        }
        let t = column.sample(&[2, 1]).to_tensor(&Device::Cpu)?;
        assert_eq!(t.to_vec1::<i64>()?, vec![1, 0]);
        Ok(())
    }
}
