/*
 * @Author       : 老董
 * @Description  : 参数初始化策略
 */

use crate::errors::{ComparisonOperator, TensorError};
use crate::tensor::Tensor;
use rand::Rng;

/// 参数初始化策略
#[derive(Debug, Clone, PartialEq)]
pub enum Init {
    /// 常数初始化
    Constant(f32),
    /// [low, high]上的均匀分布
    Uniform { low: f32, high: f32 },
    /// Kaiming/He 均匀初始化（PyTorch `kaiming_uniform_`，`fan_in`模式、`leaky_relu`非线性）：
    /// `gain = sqrt(2 / (1 + a²))`，`bound = gain * sqrt(3 / fan_in)`
    KaimingUniform { a: f32 },
}

impl Init {
    /// 用指定的 RNG 生成初始化后的 Tensor
    pub fn generate_with_rng<R: Rng + ?Sized>(
        &self,
        shape: &[usize],
        rng: &mut R,
    ) -> Result<Tensor, TensorError> {
        match self {
            Self::Constant(v) => Ok(Tensor::full(*v, shape)),
            Self::Uniform { low, high } => checked_uniform(*low, *high, shape, rng),
            Self::KaimingUniform { a } => {
                let bound = kaiming_uniform_bound(*a, shape)?;
                checked_uniform(-bound, bound, shape, rng)
            }
        }
    }
}

// `Uniform::from(low..=high)`在区间非法时会panic，这里先拦下来
fn checked_uniform<R: Rng + ?Sized>(
    low: f32,
    high: f32,
    shape: &[usize],
    rng: &mut R,
) -> Result<Tensor, TensorError> {
    if !(low.is_finite() && high.is_finite() && low <= high) {
        return Err(TensorError::InvalidUniformRange { low, high });
    }
    Ok(Tensor::uniform_with_rng(low, high, shape, rng))
}

fn kaiming_uniform_bound(a: f32, shape: &[usize]) -> Result<f32, TensorError> {
    let (fan_in, _) = fan_in_and_fan_out(shape)?;
    if fan_in == 0 {
        return Err(TensorError::ValueMustSatisfyComparison {
            value_name: "fan_in".to_string(),
            operator: ComparisonOperator::GreaterThan,
            threshold: 0,
        });
    }
    let gain = (2.0 / (1.0 + a * a)).sqrt();
    let std = gain / (fan_in as f32).sqrt();
    Ok(3.0f32.sqrt() * std)
}

/// 计算权重张量的`(fan_in, fan_out)`
///
/// 形状为`[d0, d1, k...]`时，感受野大小为`k...`之积，
/// `fan_in = d1 * 感受野`，`fan_out = d0 * 感受野`。张量至少需要2维。
pub fn fan_in_and_fan_out(shape: &[usize]) -> Result<(usize, usize), TensorError> {
    if shape.len() < 2 {
        return Err(TensorError::ValueMustSatisfyComparison {
            value_name: "计算fan_in/fan_out的张量维数".to_string(),
            operator: ComparisonOperator::GreaterOrEqual,
            threshold: 2,
        });
    }
    let receptive_field: usize = shape[2..].iter().product();
    Ok((shape[1] * receptive_field, shape[0] * receptive_field))
}
