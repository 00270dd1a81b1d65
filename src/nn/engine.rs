/*
 * @Author       : 老董
 * @Description  : 卷积引擎（确定性的 2D 卷积原语）
 *
 * 贝叶斯层只负责采样权重，真正的卷积运算交给实现了`ConvEngine`的引擎。
 * 本库自带`DirectConv2d`：逐元素直接求和的参考实现（PyTorch `F.conv2d` 语义）。
 *
 * 形状约定（Batch-First）：
 * - 输入：[batch, C_in, H, W]
 * - 卷积核：[C_out, C_in / groups, kH, kW]
 * - 偏置：[C_out]（可选）
 * - 输出：[batch, C_out, H', W']
 *
 * 输出尺寸：
 * H' = (H + 2*padding_h - dilation_h*(kH-1) - 1) / stride_h + 1
 * W' = (W + 2*padding_w - dilation_w*(kW-1) - 1) / stride_w + 1
 */

use super::BayesConvError;
use crate::tensor::{PadMode, Tensor};
use rayon::prelude::*;
use std::fmt::Debug;

/// 2D 卷积的超参数，每个数组依次对应 (H, W)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conv2dParams {
    pub stride: [usize; 2],
    /// 两侧对称的零填充量
    pub padding: [usize; 2],
    pub dilation: [usize; 2],
    pub groups: usize,
}

impl Default for Conv2dParams {
    fn default() -> Self {
        Self {
            stride: [1, 1],
            padding: [0, 0],
            dilation: [1, 1],
            groups: 1,
        }
    }
}

/// 卷积引擎
///
/// 形状不兼容时返回`BayesConvError::ShapeMismatch`，调用方（贝叶斯层）不做拦截或转换。
pub trait ConvEngine: Debug + Send + Sync {
    fn conv2d(
        &self,
        input: &Tensor,
        weight: &Tensor,
        bias: Option<&Tensor>,
        params: &Conv2dParams,
    ) -> Result<Tensor, BayesConvError>;
}

/// 单个空间维度上的卷积输出长度；有效核比填充后的输入还大时返回`None`
pub fn conv2d_output_size(
    input: usize,
    kernel: usize,
    stride: usize,
    padding: usize,
    dilation: usize,
) -> Option<usize> {
    if stride == 0 || kernel == 0 {
        return None;
    }
    let effective_kernel = dilation * (kernel - 1) + 1;
    let padded = input + 2 * padding;
    if padded < effective_kernel {
        return None;
    }
    Some((padded - effective_kernel) / stride + 1)
}

/// 直接求和的 2D 卷积引擎，在 batch 维度上用 Rayon 并行
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectConv2d;

impl DirectConv2d {
    fn check_shapes(
        input: &Tensor,
        weight: &Tensor,
        bias: Option<&Tensor>,
        params: &Conv2dParams,
    ) -> Result<[usize; 4], BayesConvError> {
        if input.dimension() != 4 {
            return Err(BayesConvError::ShapeMismatch {
                expected: vec![4],
                got: vec![input.dimension()],
                message: format!(
                    "Conv2d 输入必须是 4D [batch, C_in, H, W]，得到 {:?}。单样本请使用 [1, C_in, H, W]",
                    input.shape()
                ),
            });
        }
        if weight.dimension() != 4 {
            return Err(BayesConvError::ShapeMismatch {
                expected: vec![4],
                got: vec![weight.dimension()],
                message: format!(
                    "卷积核必须是 4D [C_out, C_in/groups, kH, kW]，得到 {:?}",
                    weight.shape()
                ),
            });
        }
        if params.groups == 0
            || params.stride.contains(&0)
            || params.dilation.contains(&0)
        {
            return Err(BayesConvError::InvalidConfiguration(format!(
                "groups、stride、dilation须大于0，得到 {params:?}"
            )));
        }

        let (in_c, in_h, in_w) = (input.shape()[1], input.shape()[2], input.shape()[3]);
        let (out_c, in_c_per_group, k_h, k_w) = (
            weight.shape()[0],
            weight.shape()[1],
            weight.shape()[2],
            weight.shape()[3],
        );

        if in_c != in_c_per_group * params.groups {
            return Err(BayesConvError::ShapeMismatch {
                expected: vec![in_c_per_group * params.groups],
                got: vec![in_c],
                message: format!(
                    "输入通道数 {in_c} 与卷积核输入通道数 {in_c_per_group} × groups {} 不匹配",
                    params.groups
                ),
            });
        }
        if out_c % params.groups != 0 {
            return Err(BayesConvError::ShapeMismatch {
                expected: vec![out_c - out_c % params.groups],
                got: vec![out_c],
                message: format!("卷积核输出通道数 {out_c} 不能被 groups {} 整除", params.groups),
            });
        }
        if let Some(bias) = bias {
            if bias.shape() != [out_c] {
                return Err(BayesConvError::ShapeMismatch {
                    expected: vec![out_c],
                    got: bias.shape().to_vec(),
                    message: "偏置形状须为 [C_out]".to_string(),
                });
            }
        }

        let output_h = conv2d_output_size(
            in_h,
            k_h,
            params.stride[0],
            params.padding[0],
            params.dilation[0],
        );
        let output_w = conv2d_output_size(
            in_w,
            k_w,
            params.stride[1],
            params.padding[1],
            params.dilation[1],
        );
        match (output_h, output_w) {
            (Some(output_h), Some(output_w)) => {
                Ok([input.shape()[0], out_c, output_h, output_w])
            }
            _ => Err(BayesConvError::ShapeMismatch {
                expected: vec![k_h, k_w],
                got: vec![in_h, in_w],
                message: format!(
                    "卷积输出尺寸无效：输入 {in_h}x{in_w}，核 {k_h}x{k_w}，参数 {params:?}"
                ),
            }),
        }
    }
}

impl ConvEngine for DirectConv2d {
    fn conv2d(
        &self,
        input: &Tensor,
        weight: &Tensor,
        bias: Option<&Tensor>,
        params: &Conv2dParams,
    ) -> Result<Tensor, BayesConvError> {
        let output_shape = Self::check_shapes(input, weight, bias, params)?;
        let [batch_size, out_c, out_h, out_w] = output_shape;

        let [pad_h, pad_w] = params.padding;
        let padded = input.pad(&[pad_w, pad_w, pad_h, pad_h], PadMode::Zeros)?;

        let (in_c_per_group, k_h, k_w) = (weight.shape()[1], weight.shape()[2], weight.shape()[3]);
        let out_c_per_group = out_c / params.groups;
        let [stride_h, stride_w] = params.stride;
        let [dilation_h, dilation_w] = params.dilation;
        let single_sample_size = out_c * out_h * out_w;

        // Rayon 并行计算每个 batch 样本
        let batch_results: Vec<Vec<f32>> = (0..batch_size)
            .into_par_iter()
            .map(|b| {
                let mut sample_data = vec![0.0f32; single_sample_size];
                for oc in 0..out_c {
                    let group = oc / out_c_per_group;
                    let ic_offset = group * in_c_per_group;
                    let bias_val = bias.map_or(0.0, |bias| bias[[oc]]);
                    for oh in 0..out_h {
                        for ow in 0..out_w {
                            let mut sum = bias_val;
                            let h_start = oh * stride_h;
                            let w_start = ow * stride_w;

                            for ic in 0..in_c_per_group {
                                for kh in 0..k_h {
                                    for kw in 0..k_w {
                                        let input_val = padded[[
                                            b,
                                            ic_offset + ic,
                                            h_start + kh * dilation_h,
                                            w_start + kw * dilation_w,
                                        ]];
                                        sum += input_val * weight[[oc, ic, kh, kw]];
                                    }
                                }
                            }
                            sample_data[oc * out_h * out_w + oh * out_w + ow] = sum;
                        }
                    }
                }
                sample_data
            })
            .collect();

        // 合并结果
        let all_data: Vec<f32> = batch_results.into_iter().flatten().collect();
        Ok(Tensor::try_new(&all_data, &output_shape)?)
    }
}
