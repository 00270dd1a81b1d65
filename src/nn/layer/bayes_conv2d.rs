/*
 * @Author       : 老董
 * @Description  : BayesConv2d (2D 贝叶斯卷积) 层 - PyTorch 风格 API
 *
 * 输入/输出形状：
 * - 输入：[batch_size, in_channels, H, W]
 * - 输出：[batch_size, out_channels, H', W']
 *
 * 计算：output = conv2d(x, W ~ N(weight_mu, exp(weight_log_sigma)²)) + b ~ N(bias_mu, exp(bias_log_sigma)²)
 */

use super::bayes_conv::{BayesConvCore, Bias, Gaussian, circular_pad_amounts};
use crate::distribution::Generator;
use crate::nn::{
    BayesConv2dConfig, BayesConvError, Conv2dParams, ConvEngine, DirectConv2d, LayerConfig,
    Module, PaddingMode,
};
use crate::tensor::{PadMode, Tensor};
use std::sync::Arc;

/// BayesConv2d (2D 贝叶斯卷积) 层
///
/// 每次调用`forward`都会重新采样权重（及偏置），因此同一输入的两次输出一般不同，
/// 但形状总是一致的。
///
/// # 使用示例
/// ```ignore
/// let conv = BayesConv2dConfig::new(0.0, -3.0, 1, 32, 3).with_padding(1).init()?;
/// let h = conv.forward(&x)?;
/// ```
#[derive(Debug, Clone)]
pub struct BayesConv2d {
    core: BayesConvCore,
    /// 交给卷积引擎的超参数（构造时由配置换算而来）
    params: Conv2dParams,
    generator: Generator,
    engine: Arc<dyn ConvEngine>,
}

impl BayesConv2dConfig {
    /// 使用进程级默认生成器创建层
    pub fn init(&self) -> Result<BayesConv2d, BayesConvError> {
        BayesConv2d::new(self)
    }

    /// 使用固定种子的独立生成器创建层（确保可重复性）
    pub fn init_seeded(&self, seed: u64) -> Result<BayesConv2d, BayesConvError> {
        BayesConv2d::new_seeded(self, seed)
    }

    /// 使用指定的生成器创建层
    pub fn init_with_generator(&self, generator: Generator) -> Result<BayesConv2d, BayesConvError> {
        BayesConv2d::with_generator(self, generator)
    }
}

impl BayesConv2d {
    /// 创建新的 BayesConv2d 层，初始化与采样都使用进程级默认生成器
    pub fn new(config: &BayesConv2dConfig) -> Result<Self, BayesConvError> {
        Self::with_generator(config, Generator::default_generator())
    }

    /// 创建新的 BayesConv2d 层（带种子，确保可重复性）
    pub fn new_seeded(config: &BayesConv2dConfig, seed: u64) -> Result<Self, BayesConvError> {
        Self::with_generator(config, Generator::with_seed(seed))
    }

    /// 创建新的 BayesConv2d 层，初始化与之后的每次采样都使用`generator`
    pub fn with_generator(
        config: &BayesConv2dConfig,
        generator: Generator,
    ) -> Result<Self, BayesConvError> {
        let layer_config = config.layer_config()?;
        let params = Conv2dParams {
            stride: pair(&layer_config.stride),
            padding: pair(&layer_config.padding),
            dilation: pair(&layer_config.dilation),
            groups: layer_config.groups,
        };
        let core = BayesConvCore::new(layer_config, &generator)?;
        Ok(Self {
            core,
            params,
            generator,
            engine: Arc::new(DirectConv2d),
        })
    }

    /// 替换卷积引擎
    pub fn with_engine(mut self, engine: Arc<dyn ConvEngine>) -> Self {
        self.engine = engine;
        self
    }

    /// 前向传播：采样权重（及偏置）后做卷积
    ///
    /// # 参数
    /// - `input`: 输入张量，形状 [batch_size, in_channels, H, W]
    ///
    /// # 返回
    /// 输出张量，形状 [batch_size, out_channels, H', W']；形状不兼容时返回卷积引擎的错误，
    /// 参数经`parameters_mut`被换成其他形状时返回`ShapeMismatch`
    pub fn forward(&self, input: &Tensor) -> Result<Tensor, BayesConvError> {
        let (weight, bias) = self.core.sample(&self.generator)?;
        log::trace!(
            "BayesConv2d 前向：输入 {:?}，采样权重 {:?}",
            input.shape(),
            weight.shape()
        );
        self.conv2d_forward(input, &weight, bias.as_ref())
    }

    /// 用给定的（已采样的）权重与偏置做卷积，按填充模式分派
    ///
    /// - `zeros`：直接以配置的`padding`调用卷积引擎；
    /// - `circular`：先按`circular_pad_amounts`循环填充输入，再以零填充量调用卷积引擎。
    pub fn conv2d_forward(
        &self,
        input: &Tensor,
        weight: &Tensor,
        bias: Option<&Tensor>,
    ) -> Result<Tensor, BayesConvError> {
        match self.core.config().padding_mode {
            PaddingMode::Circular => {
                let expanded_padding = circular_pad_amounts(&self.params.padding);
                let padded = input.pad(&expanded_padding, PadMode::Circular)?;
                let params = Conv2dParams {
                    padding: [0, 0],
                    ..self.params
                };
                self.engine.conv2d(&padded, weight, bias, &params)
            }
            PaddingMode::Zeros => self.engine.conv2d(input, weight, bias, &self.params),
        }
    }

    /// 按先验重新初始化所有参数（构造时已自动调用一次）
    pub fn reset_parameters(&mut self) -> Result<(), BayesConvError> {
        self.core.reset_parameters(&self.generator)
    }

    /// 从当前分布中采样一次（权重, 偏置），不做卷积
    pub fn sample(&self) -> Result<(Tensor, Option<Tensor>), BayesConvError> {
        self.core.sample(&self.generator)
    }

    /// 获取层配置
    pub fn config(&self) -> &LayerConfig {
        self.core.config()
    }

    /// 获取公共核心
    pub fn core(&self) -> &BayesConvCore {
        &self.core
    }

    pub(crate) fn core_mut(&mut self) -> &mut BayesConvCore {
        &mut self.core
    }

    /// 获取交给卷积引擎的超参数
    pub fn conv_params(&self) -> &Conv2dParams {
        &self.params
    }

    /// 获取权重分布
    pub fn weight(&self) -> &Gaussian {
        self.core.weight()
    }

    /// 获取偏置分布
    pub fn bias(&self) -> &Bias {
        self.core.bias()
    }

    /// 获取本层使用的生成器
    pub fn generator(&self) -> &Generator {
        &self.generator
    }

    /// 获取输入通道数
    pub fn in_channels(&self) -> usize {
        self.config().in_channels
    }

    /// 获取输出通道数
    pub fn out_channels(&self) -> usize {
        self.config().out_channels
    }

    /// 获取卷积核大小
    pub fn kernel_size(&self) -> (usize, usize) {
        let [k_h, k_w] = pair(&self.config().kernel_size);
        (k_h, k_w)
    }
}

impl Module for BayesConv2d {
    fn parameters(&self) -> Vec<(&'static str, &Tensor)> {
        self.core.named_tensors()
    }

    fn parameters_mut(&mut self) -> Vec<(&'static str, &mut Tensor)> {
        self.core.named_tensors_mut()
    }
}

// 配置已校验过长度为2
fn pair(values: &[usize]) -> [usize; 2] {
    [values[0], values[1]]
}
