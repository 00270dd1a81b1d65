use thiserror::Error;
mod ops;
pub use self::ops::*;

#[derive(Error, Debug, PartialEq)]
pub enum TensorError {
    // 数字比较用
    #[error("{value_name}须{operator}{threshold}")]
    ValueMustSatisfyComparison {
        value_name: String,
        operator: ComparisonOperator,
        threshold: usize,
    },
    // 张量二元运算
    #[error(
        "形状不一致，故无法{operator}：第一个张量的形状为{tensor1_shape:?}，第二个张量的形状为{tensor2_shape:?}"
    )]
    OperatorError {
        operator: Operator,
        tensor1_shape: Vec<usize>,
        tensor2_shape: Vec<usize>,
    },
    // 按形状构造张量
    #[error("数据长度{data_len}与形状{shape:?}所需的元素个数不一致")]
    DataShapeMismatch { data_len: usize, shape: Vec<usize> },
    // 填充
    #[error("填充参数个数须为张量维数的2倍且不超过其维数：张量形状为{shape:?}，填充参数为{pad:?}")]
    InvalidPadding { shape: Vec<usize>, pad: Vec<usize> },
    #[error("循环填充的填充量不能超过对应维度的长度：维度长度为{dim_len}，填充量为{pad}")]
    CircularPaddingTooLarge { dim_len: usize, pad: usize },
    // 随机初始化
    #[error("均匀分布的区间须为有限值且下界不大于上界：得到[{low}, {high}]")]
    InvalidUniformRange { low: f32, high: f32 },
}
