/*
 * @Author       : 老董
 * @Description  : 贝叶斯卷积层的配置与规范化
 *
 * - `Spatial`：标量或元组形式的空间参数（kernel_size/stride/padding/dilation），
 *   按空间维数（1D/2D/3D）展开成定长元组；
 * - `LayerConfig`：构造完成后固定不变的层配置（可序列化，随参数一并保存）；
 * - `BayesConv2dConfig`：2D 层的构造器，对应 PyTorch 的
 *   `(prior_mu, prior_log_sigma, in_channels, out_channels, kernel_size,
 *     stride=1, padding=0, dilation=1, groups=1, bias=True, padding_mode='zeros')`。
 */

use super::BayesConvError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==================== Spatial ====================

/// 空间参数：标量会被重复成与空间维数等长的元组，元组则原样保留
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Spatial {
    Scalar(usize),
    Tuple(Vec<usize>),
}

impl Spatial {
    /// 展开成长度为`rank`的元组。元组长度与`rank`不一致时返回`InvalidConfiguration`
    pub fn expand(&self, rank: usize, name: &str) -> Result<Vec<usize>, BayesConvError> {
        match self {
            Self::Scalar(v) => Ok(vec![*v; rank]),
            Self::Tuple(values) if values.len() == rank => Ok(values.clone()),
            Self::Tuple(values) => Err(BayesConvError::InvalidConfiguration(format!(
                "{name}须为标量或长度为{rank}的元组，得到{values:?}"
            ))),
        }
    }
}

impl From<usize> for Spatial {
    fn from(value: usize) -> Self {
        Self::Scalar(value)
    }
}

impl From<(usize, usize)> for Spatial {
    fn from((a, b): (usize, usize)) -> Self {
        Self::Tuple(vec![a, b])
    }
}

impl From<(usize, usize, usize)> for Spatial {
    fn from((a, b, c): (usize, usize, usize)) -> Self {
        Self::Tuple(vec![a, b, c])
    }
}

impl<const N: usize> From<[usize; N]> for Spatial {
    fn from(values: [usize; N]) -> Self {
        Self::Tuple(values.to_vec())
    }
}

impl From<Vec<usize>> for Spatial {
    fn from(values: Vec<usize>) -> Self {
        Self::Tuple(values)
    }
}

impl From<&[usize]> for Spatial {
    fn from(values: &[usize]) -> Self {
        Self::Tuple(values.to_vec())
    }
}

// ==================== PaddingMode ====================

/// 填充模式
///
/// 只接受`zeros`与`circular`：其余字符串在解析（即构造层）时就会报错，
/// 而不是拖到第一次前向传播才暴露。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PaddingMode {
    /// 交给卷积引擎做（对称的）零填充
    #[default]
    Zeros,
    /// 先对输入做循环填充，再以零填充量调用卷积引擎
    Circular,
}

impl FromStr for PaddingMode {
    type Err = BayesConvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "zeros" => Ok(Self::Zeros),
            "circular" => Ok(Self::Circular),
            other => Err(BayesConvError::UnsupportedPaddingMode(other.to_string())),
        }
    }
}

impl TryFrom<String> for PaddingMode {
    type Error = BayesConvError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PaddingMode> for String {
    fn from(mode: PaddingMode) -> Self {
        mode.to_string()
    }
}

impl fmt::Display for PaddingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Zeros => "zeros",
            Self::Circular => "circular",
        };
        write!(f, "{name}")
    }
}

// ==================== LayerConfig ====================

/// 层配置：构造时确定，之后不再改变
///
/// 不变量（由`validate`保证）：
/// - `in_channels % groups == 0`且`out_channels % groups == 0`；
/// - 所有元组的长度都等于空间维数`kernel_size.len()`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerConfig {
    /// 先验正态分布的均值
    pub prior_mu: f32,
    /// 先验正态分布标准差的自然对数
    pub prior_log_sigma: f32,
    pub in_channels: usize,
    pub out_channels: usize,
    pub kernel_size: Vec<usize>,
    pub stride: Vec<usize>,
    pub padding: Vec<usize>,
    pub dilation: Vec<usize>,
    pub groups: usize,
    pub has_bias: bool,
    /// 旧的参数文件可能没有该字段，此时视为`zeros`
    #[serde(default)]
    pub padding_mode: PaddingMode,
    pub transposed: bool,
    pub output_padding: Vec<usize>,
}

impl LayerConfig {
    /// 空间维数（1D/2D/3D 卷积分别为 1/2/3）
    pub fn spatial_rank(&self) -> usize {
        self.kernel_size.len()
    }

    /// 校验配置的不变量
    pub fn validate(&self) -> Result<(), BayesConvError> {
        let rank = self.spatial_rank();
        if rank == 0 {
            return Err(BayesConvError::InvalidConfiguration(
                "kernel_size不能为空元组".to_string(),
            ));
        }
        for (name, values) in [
            ("stride", &self.stride),
            ("padding", &self.padding),
            ("dilation", &self.dilation),
            ("output_padding", &self.output_padding),
        ] {
            if values.len() != rank {
                return Err(BayesConvError::InvalidConfiguration(format!(
                    "{name}的长度须等于空间维数{rank}，得到{values:?}"
                )));
            }
        }
        for (name, values) in [
            ("kernel_size", &self.kernel_size),
            ("stride", &self.stride),
            ("dilation", &self.dilation),
        ] {
            if values.contains(&0) {
                return Err(BayesConvError::InvalidConfiguration(format!(
                    "{name}的每个元素都须大于0，得到{values:?}"
                )));
            }
        }
        if self.in_channels == 0 || self.out_channels == 0 {
            return Err(BayesConvError::InvalidConfiguration(format!(
                "通道数须大于0，得到in_channels={}，out_channels={}",
                self.in_channels, self.out_channels
            )));
        }
        check_groups(self.in_channels, self.out_channels, self.groups)
    }
}

/// 校验输入/输出通道数能被`groups`整除
pub fn check_groups(
    in_channels: usize,
    out_channels: usize,
    groups: usize,
) -> Result<(), BayesConvError> {
    if groups == 0 {
        return Err(BayesConvError::InvalidConfiguration(
            "groups须大于0".to_string(),
        ));
    }
    if in_channels % groups != 0 {
        return Err(BayesConvError::InvalidConfiguration(format!(
            "in_channels({in_channels})必须能被groups({groups})整除"
        )));
    }
    if out_channels % groups != 0 {
        return Err(BayesConvError::InvalidConfiguration(format!(
            "out_channels({out_channels})必须能被groups({groups})整除"
        )));
    }
    Ok(())
}

// ==================== BayesConv2dConfig ====================

/// [2D 贝叶斯卷积层](super::BayesConv2d)的构造器
///
/// ```ignore
/// let conv = BayesConv2dConfig::new(0.0, -3.0, 3, 16, 3)
///     .with_stride(2)
///     .with_padding((1, 1))
///     .with_padding_mode("circular".parse()?)
///     .init()?;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BayesConv2dConfig {
    pub prior_mu: f32,
    pub prior_log_sigma: f32,
    pub in_channels: usize,
    pub out_channels: usize,
    pub kernel_size: Spatial,
    /// 默认 1
    pub stride: Spatial,
    /// 默认 0
    pub padding: Spatial,
    /// 默认 1
    pub dilation: Spatial,
    /// 默认 1
    pub groups: usize,
    /// 默认 true
    pub bias: bool,
    /// 默认 zeros
    pub padding_mode: PaddingMode,
}

impl BayesConv2dConfig {
    pub fn new(
        prior_mu: f32,
        prior_log_sigma: f32,
        in_channels: usize,
        out_channels: usize,
        kernel_size: impl Into<Spatial>,
    ) -> Self {
        Self {
            prior_mu,
            prior_log_sigma,
            in_channels,
            out_channels,
            kernel_size: kernel_size.into(),
            stride: Spatial::Scalar(1),
            padding: Spatial::Scalar(0),
            dilation: Spatial::Scalar(1),
            groups: 1,
            bias: true,
            padding_mode: PaddingMode::Zeros,
        }
    }

    pub fn with_stride(mut self, stride: impl Into<Spatial>) -> Self {
        self.stride = stride.into();
        self
    }

    pub fn with_padding(mut self, padding: impl Into<Spatial>) -> Self {
        self.padding = padding.into();
        self
    }

    pub fn with_dilation(mut self, dilation: impl Into<Spatial>) -> Self {
        self.dilation = dilation.into();
        self
    }

    pub fn with_groups(mut self, groups: usize) -> Self {
        self.groups = groups;
        self
    }

    pub fn with_bias(mut self, bias: bool) -> Self {
        self.bias = bias;
        self
    }

    pub fn with_padding_mode(mut self, padding_mode: PaddingMode) -> Self {
        self.padding_mode = padding_mode;
        self
    }

    /// 规范化成 2D（非转置）卷积的`LayerConfig`并校验
    pub fn layer_config(&self) -> Result<LayerConfig, BayesConvError> {
        const RANK: usize = 2;
        let config = LayerConfig {
            prior_mu: self.prior_mu,
            prior_log_sigma: self.prior_log_sigma,
            in_channels: self.in_channels,
            out_channels: self.out_channels,
            kernel_size: self.kernel_size.expand(RANK, "kernel_size")?,
            stride: self.stride.expand(RANK, "stride")?,
            padding: self.padding.expand(RANK, "padding")?,
            dilation: self.dilation.expand(RANK, "dilation")?,
            groups: self.groups,
            has_bias: self.bias,
            padding_mode: self.padding_mode,
            transposed: false,
            output_padding: vec![0; RANK],
        };
        config.validate()?;
        Ok(config)
    }
}
