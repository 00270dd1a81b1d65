/*
 * @Author       : 老董
 * @Description  : 贝叶斯卷积的公共部分（与空间维数无关）
 *
 * 每个权重/偏置都是正态分布 N(mu, exp(log_sigma)²)：
 * - 构造时按先验初始化一次（`reset_parameters`）；
 * - 每次前向传播按重参数化技巧采样：`sample = mu + exp(log_sigma) * noise`。
 *
 * 权重形状：
 * - 普通卷积：[out_channels, in_channels / groups, *kernel_size]
 * - 转置卷积：[in_channels, out_channels / groups, *kernel_size]
 */

use crate::distribution::Generator;
use crate::nn::{BayesConvError, Init, LayerConfig, fan_in_and_fan_out};
use crate::tensor::Tensor;
use serde::{Deserialize, Serialize};

// ==================== Gaussian ====================

/// 一组同形状的正态分布参数：均值`mu`与对数标准差`log_sigma`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gaussian {
    mu: Tensor,
    log_sigma: Tensor,
}

impl Gaussian {
    /// `mu`与`log_sigma`的形状须一致
    pub fn new(mu: Tensor, log_sigma: Tensor) -> Result<Self, BayesConvError> {
        if !mu.is_same_shape(&log_sigma) {
            return Err(BayesConvError::ShapeMismatch {
                expected: mu.shape().to_vec(),
                got: log_sigma.shape().to_vec(),
                message: "log_sigma与mu的形状须一致".to_string(),
            });
        }
        Ok(Self { mu, log_sigma })
    }

    /// 按形状分配（值全为0，随后由初始化覆盖）
    fn zeros(shape: &[usize]) -> Self {
        Self {
            mu: Tensor::zeros(shape),
            log_sigma: Tensor::zeros(shape),
        }
    }

    pub fn mu(&self) -> &Tensor {
        &self.mu
    }

    pub fn log_sigma(&self) -> &Tensor {
        &self.log_sigma
    }

    pub fn shape(&self) -> &[usize] {
        self.mu.shape()
    }

    /// 标准差`exp(log_sigma)`
    pub fn sigma(&self) -> Tensor {
        self.log_sigma.exp()
    }

    /// 重参数化采样：`mu + exp(log_sigma) * noise`，`noise`须与`mu`同形状
    pub fn sample_with_noise(&self, noise: &Tensor) -> Tensor {
        &self.mu + self.sigma() * noise
    }

    /// `mu`与`log_sigma`都须为`expected`形状。二者可经`parameters_mut`被整个替换，故采样前需重新校验
    fn check_shape(&self, name: &str, expected: &[usize]) -> Result<(), BayesConvError> {
        for (suffix, tensor) in [("mu", &self.mu), ("log_sigma", &self.log_sigma)] {
            if tensor.shape() != expected {
                return Err(BayesConvError::ShapeMismatch {
                    expected: expected.to_vec(),
                    got: tensor.shape().to_vec(),
                    message: format!("参数 {name}_{suffix} 的形状不一致"),
                });
            }
        }
        Ok(())
    }

    fn parts_mut(&mut self) -> (&mut Tensor, &mut Tensor) {
        (&mut self.mu, &mut self.log_sigma)
    }
}

// ==================== Bias ====================

/// 偏置分布：要么存在，要么在结构上缺失（而不是全0的张量）
#[derive(Debug, Clone, PartialEq)]
pub enum Bias {
    Present(Gaussian),
    Absent,
}

impl Bias {
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    pub fn as_gaussian(&self) -> Option<&Gaussian> {
        match self {
            Self::Present(gaussian) => Some(gaussian),
            Self::Absent => None,
        }
    }
}

// ==================== 与维数相关的自由函数 ====================

/// 按普通/转置卷积的规则计算权重形状
pub fn weight_shape(config: &LayerConfig) -> Vec<usize> {
    let (first, second) = if config.transposed {
        (config.in_channels, config.out_channels / config.groups)
    } else {
        (config.out_channels, config.in_channels / config.groups)
    };
    let mut shape = vec![first, second];
    shape.extend_from_slice(&config.kernel_size);
    shape
}

/// 循环填充时实际使用的（前, 后）填充量
///
/// 每个维度为`((p + 1) / 2, p / 2)`，按卷积引擎的约定从最后一个空间维度开始向前排列，
/// 如 2D 的`padding = [p_h, p_w]`得到`[(p_w+1)/2, p_w/2, (p_h+1)/2, p_h/2]`。
pub fn circular_pad_amounts(padding: &[usize]) -> Vec<usize> {
    padding
        .iter()
        .rev()
        .flat_map(|&p| [(p + 1) / 2, p / 2])
        .collect()
}

// ==================== BayesConvCore ====================

/// 贝叶斯卷积的公共核心：配置 + 权重分布 + 偏置分布
#[derive(Debug, Clone, PartialEq)]
pub struct BayesConvCore {
    config: LayerConfig,
    weight: Gaussian,
    bias: Bias,
}

impl BayesConvCore {
    /// 校验配置、按形状分配参数，并用`generator`完成一次初始化
    pub fn new(config: LayerConfig, generator: &Generator) -> Result<Self, BayesConvError> {
        config.validate()?;

        let weight = Gaussian::zeros(&weight_shape(&config));
        let bias = if config.has_bias {
            Bias::Present(Gaussian::zeros(&[config.out_channels]))
        } else {
            Bias::Absent
        };

        let mut core = Self {
            config,
            weight,
            bias,
        };
        core.reset_parameters(generator)?;
        log::debug!(
            "创建贝叶斯卷积：权重形状 {:?}，偏置 {}",
            core.weight.shape(),
            if core.bias.is_present() { "有" } else { "无" }
        );
        Ok(core)
    }

    /// 按先验重新初始化所有参数
    ///
    /// - `weight_mu`：Kaiming 均匀初始化，`a = sqrt(5)`；
    /// - `weight_log_sigma`、`bias_log_sigma`：全部为`prior_log_sigma`；
    /// - `bias_mu`：`U(-1/sqrt(fan_in), 1/sqrt(fan_in))`，`fan_in`取自权重形状。
    pub fn reset_parameters(&mut self, generator: &Generator) -> Result<(), BayesConvError> {
        // 按配置而非当前张量取形状，被替换过形状的参数也会被复原
        let weight_shape = weight_shape(&self.config);
        let bias_shape = [self.config.out_channels];
        let prior_log_sigma = self.config.prior_log_sigma;

        let (weight_mu, bias_mu) = generator.with_rng(|rng| {
            let weight_mu = Init::KaimingUniform { a: 5.0f32.sqrt() }
                .generate_with_rng(&weight_shape, rng)?;
            let bias_mu = match &self.bias {
                Bias::Present(_) => {
                    let (fan_in, _) = fan_in_and_fan_out(&weight_shape)?;
                    let bound = 1.0 / (fan_in as f32).sqrt();
                    Some(
                        Init::Uniform {
                            low: -bound,
                            high: bound,
                        }
                        .generate_with_rng(&bias_shape, rng)?,
                    )
                }
                Bias::Absent => None,
            };
            Ok::<_, BayesConvError>((weight_mu, bias_mu))
        })?;

        self.weight.mu = weight_mu;
        self.weight.log_sigma = Tensor::full(prior_log_sigma, &weight_shape);
        if let (Bias::Present(bias), Some(bias_mu)) = (&mut self.bias, bias_mu) {
            bias.mu = bias_mu;
            bias.log_sigma = Tensor::full(prior_log_sigma, &bias_shape);
        }
        log::debug!("重置贝叶斯卷积参数，prior_log_sigma = {prior_log_sigma}");
        Ok(())
    }

    /// 从各自的分布中采样一次权重与偏置（无偏置时第二项为`None`）
    ///
    /// 两次抽样在同一次持有`generator`期间完成；采样结果不会被缓存。
    /// 参数形状与配置不符时返回`ShapeMismatch`，不消耗随机数。
    pub fn sample(
        &self,
        generator: &Generator,
    ) -> Result<(Tensor, Option<Tensor>), BayesConvError> {
        self.weight.check_shape("weight", &weight_shape(&self.config))?;
        if let Bias::Present(bias) = &self.bias {
            bias.check_shape("bias", &[self.config.out_channels])?;
        }

        let (weight_noise, bias_noise) = generator.with_rng(|rng| {
            let weight_noise = Tensor::normal_with_rng(0.0, 1.0, self.weight.shape(), rng);
            let bias_noise = self
                .bias
                .as_gaussian()
                .map(|bias| Tensor::normal_with_rng(0.0, 1.0, bias.shape(), rng));
            (weight_noise, bias_noise)
        });

        let weight = self.weight.sample_with_noise(&weight_noise);
        let bias = match (&self.bias, bias_noise) {
            (Bias::Present(bias), Some(noise)) => Some(bias.sample_with_noise(&noise)),
            _ => None,
        };
        Ok((weight, bias))
    }

    pub fn config(&self) -> &LayerConfig {
        &self.config
    }

    pub fn weight(&self) -> &Gaussian {
        &self.weight
    }

    pub fn bias(&self) -> &Bias {
        &self.bias
    }

    pub(crate) fn named_tensors(&self) -> Vec<(&'static str, &Tensor)> {
        let mut params = vec![
            ("weight_mu", &self.weight.mu),
            ("weight_log_sigma", &self.weight.log_sigma),
        ];
        if let Bias::Present(bias) = &self.bias {
            params.push(("bias_mu", &bias.mu));
            params.push(("bias_log_sigma", &bias.log_sigma));
        }
        params
    }

    pub(crate) fn named_tensors_mut(&mut self) -> Vec<(&'static str, &mut Tensor)> {
        let (weight_mu, weight_log_sigma) = self.weight.parts_mut();
        let mut params = vec![
            ("weight_mu", weight_mu),
            ("weight_log_sigma", weight_log_sigma),
        ];
        if let Bias::Present(bias) = &mut self.bias {
            let (bias_mu, bias_log_sigma) = bias.parts_mut();
            params.push(("bias_mu", bias_mu));
            params.push(("bias_log_sigma", bias_log_sigma));
        }
        params
    }
}
