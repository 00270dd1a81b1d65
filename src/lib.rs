//! # Only BNN
//!
//! `only_bnn`实现贝叶斯卷积层（Bayesian Convolution）：
//! 每个权重与偏置都是一个正态分布随机变量，由可学习的均值`mu`与对数标准差`log_sigma`描述；
//! 每次前向传播都会通过重参数化技巧（reparameterization trick）重新采样：
//! `sample = mu + exp(log_sigma) * noise`，`noise ~ N(0, 1)`，
//! 再把采样得到的权重交给确定性的卷积引擎计算。
//!
//! ```ignore
//! use only_bnn::nn::{BayesConv2d, BayesConv2dConfig};
//! use only_bnn::tensor::Tensor;
//!
//! let conv = BayesConv2dConfig::new(0.0, -3.0, 1, 1, 3)
//!     .with_padding(1)
//!     .with_bias(false)
//!     .init_seeded(42)?;
//! let y = conv.forward(&Tensor::ones(&[1, 1, 5, 5]))?;
//! assert_eq!(y.shape(), &[1, 1, 5, 5]);
//! ```

pub mod distribution;
pub mod errors;
pub mod nn;
pub mod tensor;
pub mod utils;
