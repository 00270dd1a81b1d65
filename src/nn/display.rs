/*
 * @Author       : 老董
 * @Description  : 贝叶斯卷积层的显示格式化
 *
 * 格式参照 PyTorch 的`extra_repr`：先验、通道数、卷积核大小与步长总是显示；
 * padding/dilation/output_padding/groups 仅在非默认值时显示；无偏置时追加`bias=False`。
 */

use super::{BayesConv2d, LayerConfig};
use std::fmt;

/// 以 Python 元组的样式格式化，如`(3, 3)`、`(1,)`
fn format_tuple(values: &[usize]) -> String {
    match values {
        [single] => format!("({single},)"),
        _ => {
            let joined = values
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            format!("({joined})")
        }
    }
}

impl LayerConfig {
    /// 层的额外描述（不含层名）
    pub fn extra_repr(&self) -> String {
        let mut s = format!(
            "{}, {}, {}, {}, kernel_size={}, stride={}",
            self.prior_mu,
            self.prior_log_sigma,
            self.in_channels,
            self.out_channels,
            format_tuple(&self.kernel_size),
            format_tuple(&self.stride)
        );
        if self.padding.iter().any(|&p| p != 0) {
            s += &format!(", padding={}", format_tuple(&self.padding));
        }
        if self.dilation.iter().any(|&d| d != 1) {
            s += &format!(", dilation={}", format_tuple(&self.dilation));
        }
        if self.output_padding.iter().any(|&p| p != 0) {
            s += &format!(", output_padding={}", format_tuple(&self.output_padding));
        }
        if self.groups != 1 {
            s += &format!(", groups={}", self.groups);
        }
        if !self.has_bias {
            s += ", bias=False";
        }
        s
    }
}

impl fmt::Display for BayesConv2d {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BayesConv2d({})", self.config().extra_repr())
    }
}
