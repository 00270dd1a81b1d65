use crate::tensor::Tensor;
use approx::{AbsDiffEq, RelativeEq};
use std::cmp::PartialEq;

impl PartialEq for Tensor {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

/*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓近似比较（供数值测试使用）↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
impl AbsDiffEq for Tensor {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        f32::default_epsilon()
    }

    /// 形状不一致时直接视为不相等
    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.is_same_shape(other)
            && self
                .data
                .iter()
                .zip(other.data.iter())
                .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

impl RelativeEq for Tensor {
    fn default_max_relative() -> f32 {
        f32::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
        self.is_same_shape(other)
            && self
                .data
                .iter()
                .zip(other.data.iter())
                .all(|(a, b)| a.relative_eq(b, epsilon, max_relative))
    }
}
/*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑近似比较（供数值测试使用）↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/

impl Tensor {
    /// 对张量中的所有元素求和并返回纯数
    pub fn sum(&self) -> f32 {
        self.data.sum()
    }

    /// 逐元素取自然指数，返回新张量
    pub fn exp(&self) -> Self {
        self.map(f32::exp)
    }

    /// 逐元素映射，返回新张量
    pub fn map<F: Fn(f32) -> f32>(&self, f: F) -> Self {
        Self {
            data: self.data.mapv(f),
        }
    }

    /// 将所有元素原地设为`value`
    pub fn fill(&mut self, value: f32) {
        self.data.fill(value);
    }
}
