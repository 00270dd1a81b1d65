/*
 * @Author       : 老董
 * @Description  : 负责贝叶斯神经网络层（Bayesian neural network）的构建
 */

mod config;
mod display;
mod engine;
mod error;
mod init;
pub mod layer;
mod module;
mod state;

pub use config::{BayesConv2dConfig, LayerConfig, PaddingMode, Spatial, check_groups};
pub use engine::{Conv2dParams, ConvEngine, DirectConv2d, conv2d_output_size};
pub use error::BayesConvError;
pub use init::{Init, fan_in_and_fan_out};
pub use layer::{BayesConv2d, BayesConvCore, Bias, Gaussian, circular_pad_amounts, weight_shape};
pub use module::Module;
pub use state::StateDict;

#[cfg(test)]
mod tests;
