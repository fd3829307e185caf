use super::{Tensor, TensorData, match_tensor_data};
use ndarray::ArrayD;
use std::fmt;

impl fmt::Display for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fn display_recursive<A: fmt::Debug>(
            f: &mut fmt::Formatter,
            data: &ArrayD<A>,
            indices: &mut Vec<usize>,
            depth: usize,
            rank: usize,
        ) -> fmt::Result {
            if depth == rank {
                write!(f, "{:?}", data[&indices[..]])?;
            } else {
                write!(f, "[")?;
                for i in 0..data.shape()[depth] {
                    indices[depth] = i;
                    display_recursive(f, data, indices, depth + 1, rank)?;

                    if i != data.shape()[depth] - 1 {
                        write!(f, ", ")?;
                        if depth == 0 && rank > 1 {
                            write!(f, "\n ")?;
                        }
                    }
                }
                write!(f, "]")?;
            }
            Ok(())
        }

        let shape = self.shape().to_vec();
        let rank = shape.len();
        let mut indices = vec![0; rank];
        if rank > 2 {
            writeln!(
                f,
                "<对于阶数大于二（rank>2）的张量（形状：{shape:?}）无法展示具体数据>"
            )
        } else {
            match_tensor_data!(&self.data, array => display_recursive(f, array, &mut indices, 0, rank))?;
            write!(f, "\n形状: {shape:?}，类型: {}", self.dtype())
        }
    }
}
