/*
 * @Author       : 老董
 * @Description  : Layer 模块
 *
 * - `bayes_conv`：与空间维数无关的公共部分（配置 + 权重/偏置分布 + 初始化 + 采样）；
 * - `bayes_conv2d`：2D 层，负责填充模式分派并调用卷积引擎。
 */

mod bayes_conv;
mod bayes_conv2d;

pub use bayes_conv::{BayesConvCore, Bias, Gaussian, circular_pad_amounts, weight_shape};
pub use bayes_conv2d::BayesConv2d;
