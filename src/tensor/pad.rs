/*
 * @Description  : 张量填充（PyTorch `F.pad` 风格）
 *
 * `pad`参数从最后一维开始向前描述每个维度的(前, 后)填充量，如对4D张量[N, C, H, W]：
 * `[w_left, w_right, h_top, h_bottom]`，未描述的前导维度不填充。
 */

use super::Tensor;
use crate::errors::TensorError;
use ndarray::{Array, IxDyn};

/// 填充方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadMode {
    /// 以0填充
    Zeros,
    /// 循环填充：越界的位置从对侧回绕取值
    Circular,
}

impl Tensor {
    /// 按`mode`填充张量，返回新张量
    pub fn pad(&self, pad: &[usize], mode: PadMode) -> Result<Self, TensorError> {
        let ndim = self.dimension();
        if pad.len() % 2 != 0 || pad.len() / 2 > ndim {
            return Err(TensorError::InvalidPadding {
                shape: self.shape().to_vec(),
                pad: pad.to_vec(),
            });
        }

        let mut amounts = vec![(0usize, 0usize); ndim];
        for (i, pair) in pad.chunks(2).enumerate() {
            amounts[ndim - 1 - i] = (pair[0], pair[1]);
        }

        let shape = self.shape();
        if mode == PadMode::Circular {
            for (&len, &(before, after)) in shape.iter().zip(&amounts) {
                let largest = before.max(after);
                if largest > len {
                    return Err(TensorError::CircularPaddingTooLarge {
                        dim_len: len,
                        pad: largest,
                    });
                }
            }
        }

        let new_shape: Vec<usize> = shape
            .iter()
            .zip(&amounts)
            .map(|(&len, &(before, after))| len + before + after)
            .collect();

        let mut src = vec![0usize; ndim];
        let data = Array::from_shape_fn(IxDyn(&new_shape), |idx| {
            for d in 0..ndim {
                let (before, _) = amounts[d];
                let len = shape[d];
                let o = idx[d];
                src[d] = match mode {
                    // 循环填充已保证before <= len
                    PadMode::Circular => (o + len - before) % len,
                    PadMode::Zeros => {
                        if o < before || o >= before + len {
                            return 0.0;
                        }
                        o - before
                    }
                };
            }
            self.data[&src[..]]
        });

        Ok(Self { data })
    }
}
