/*
 * @Author       : 老董
 * @Description  : 贝叶斯卷积层的错误类型
 */

use crate::errors::TensorError;
use thiserror::Error;

/// 贝叶斯卷积层（含卷积引擎、参数读写）的错误类型
///
/// 所有错误都只对触发它的构造/调用致命，层内部不做任何重试。
#[derive(Error, Debug)]
pub enum BayesConvError {
    /// 构造参数非法，如通道数不能被`groups`整除
    #[error("配置无效：{0}")]
    InvalidConfiguration(String),
    /// 除`zeros`、`circular`以外的填充模式
    #[error("不支持的填充模式：`{0}`（仅支持 zeros、circular）")]
    UnsupportedPaddingMode(String),
    /// 由卷积引擎或参数加载检出的形状不兼容，层本身原样透传
    #[error("{message}：预期形状{expected:?}，实际得到{got:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
        message: String,
    },
    /// 检查点与当前层在“是否有偏置”上不一致
    #[error("偏置存在性不一致：当前层has_bias={layer_has_bias}，检查点has_bias={checkpoint_has_bias}")]
    BiasPresenceMismatch {
        layer_has_bias: bool,
        checkpoint_has_bias: bool,
    },
    #[error("无效的参数文件：{0}")]
    InvalidCheckpoint(String),

    #[error(transparent)]
    Tensor(#[from] TensorError),
    #[error("读写参数文件失败：{0}")]
    Io(#[from] std::io::Error),
    #[error("参数二进制（反）序列化失败：{0}")]
    Bincode(#[from] bincode::Error),
    #[error("参数JSON（反）序列化失败：{0}")]
    Json(#[from] serde_json::Error),
}
