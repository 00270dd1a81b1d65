use ndarray::{Array, IxDyn};
use rand::Rng;
use rand::distributions::{Distribution, Uniform};
use serde::{Deserialize, Serialize};

use crate::errors::TensorError;

mod ops {
    pub mod add;
    pub mod mul;
    pub mod others;
}

mod index;
mod pad;
mod property;

pub use pad::PadMode;

#[cfg(test)]
mod tests;

/// 定义张量的结构体。其可以是标量、向量、矩阵或更高维度的数组。
/// 注：只要通Tensor初始化的都是张量（即使标量也是张量）；
/// 而通常意义上的数字（类型为usize、i32、f64等）就只是纯数（number），在这里不被认为是张量。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tensor {
    data: Array<f32, IxDyn>,
}

impl Tensor {
    /// 创建一个张量，若为标量，`shape`可以是[]、[1]、[1,1]、[1,1,1]...
    /// 若为向量，`shape`可以是[n]、[1,n]、[n,1]；
    /// 若为矩阵，`shape`可以是[n,m]；
    /// 若为更高维度的数组，`shape`可以是[c,n,m,...]；
    /// 注：`data`的长度必须和`shape`中所有元素的乘积相等，否则会panic。
    pub fn new(data: &[f32], shape: &[usize]) -> Self {
        match Self::try_new(data, shape) {
            Ok(tensor) => tensor,
            Err(e) => panic!("{}", e),
        }
    }

    /// `new`的可失败版本，数据长度与形状不一致时返回错误而非panic
    pub fn try_new(data: &[f32], shape: &[usize]) -> Result<Self, TensorError> {
        let data = Array::from_shape_vec(IxDyn(shape), data.to_vec()).map_err(|_| {
            TensorError::DataShapeMismatch {
                data_len: data.len(),
                shape: shape.to_vec(),
            }
        })?;
        Ok(Self { data })
    }

    /// 创建一个所有元素均为`value`的张量
    pub fn full(value: f32, shape: &[usize]) -> Self {
        Self {
            data: Array::from_elem(IxDyn(shape), value),
        }
    }

    pub fn zeros(shape: &[usize]) -> Self {
        Self::full(0.0, shape)
    }

    pub fn ones(shape: &[usize]) -> Self {
        Self::full(1.0, shape)
    }

    /// 用给定的随机数生成器创建一个随机张量，其值在[min, max]的闭区间
    pub fn uniform_with_rng<R: Rng + ?Sized>(
        min: f32,
        max: f32,
        shape: &[usize],
        rng: &mut R,
    ) -> Self {
        let uniform = Uniform::from(min..=max);
        let data = (0..shape.iter().product::<usize>())
            .map(|_| uniform.sample(rng))
            .collect::<Vec<_>>();
        Self::new(&data, shape)
    }

    /// 用给定的随机数生成器创建一个服从正态分布的随机张量（Box-Muller 变换）。
    /// 若为标量，shape可以是[]、[1,1]、[1,1,1]...；
    /// 若为向量，shape可以是[n]、[1,n]、[n,1]；
    /// 若为矩阵，shape可以是[n,m]；
    /// 若为更高维度的数组，shape可以是[c,n,m,...]。
    pub fn normal_with_rng<R: Rng + ?Sized>(
        mean: f32,
        std_dev: f32,
        shape: &[usize],
        rng: &mut R,
    ) -> Self {
        let data_len = shape.iter().product::<usize>();
        let mut data = Vec::with_capacity(data_len);

        while data.len() < data_len {
            let u1: f32 = rng.r#gen();
            let u2: f32 = rng.r#gen();
            let r = (-2.0 * u1.ln()).sqrt();
            let theta = 2.0 * std::f32::consts::PI * u2;
            let z0 = mean + std_dev * r * theta.cos();
            let z1 = mean + std_dev * r * theta.sin();

            // u1为0时ln发散，丢弃该组样本
            if z0.is_finite() {
                data.push(z0);
            }
            if data.len() < data_len && z1.is_finite() {
                data.push(z1);
            }
        }

        Self::new(&data, shape)
    }
}
