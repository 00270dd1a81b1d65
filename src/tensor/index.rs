use super::Tensor;
use std::ops::Index;

// 引用式索引，供卷积等逐元素遍历的场景使用
impl<const N: usize> Index<[usize; N]> for Tensor {
    type Output = f32;

    /// 维数与`N`不一致或越界时会panic
    fn index(&self, indices: [usize; N]) -> &f32 {
        &self.data[&indices[..]]
    }
}
