/*
 * @Author       : 老董
 * @Description  : 贝叶斯卷积层的参数读写（state dict）
 *
 * 参数字典只包含具名张量 {weight_mu, weight_log_sigma, bias_mu?, bias_log_sigma?}
 * 以及层配置`LayerConfig`。
 *
 * - `save_params`/`load_params`：二进制文件，魔数 + 版本号 + bincode 负载；
 * - `to_json`/`StateDict::from_json`：可读的 JSON 描述。
 */

use super::layer::BayesConvCore;
use super::{BayesConv2d, BayesConvError, LayerConfig};
use crate::tensor::Tensor;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// 参数文件魔数
const PARAMS_MAGIC: &[u8; 4] = b"OBNN";
/// 参数文件版本
const PARAMS_VERSION: u32 = 1;

/// 可序列化的层状态：配置 + 具名参数张量
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateDict {
    pub config: LayerConfig,
    pub tensors: BTreeMap<String, Tensor>,
}

impl StateDict {
    /// 检查点是否带偏置
    pub fn has_bias(&self) -> bool {
        self.config.has_bias
    }

    pub fn get(&self, name: &str) -> Option<&Tensor> {
        self.tensors.get(name)
    }

    pub fn to_json(&self) -> Result<String, BayesConvError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, BayesConvError> {
        Ok(serde_json::from_str(json)?)
    }

    /// 写入二进制格式：魔数 + 版本号（小端 u32）+ bincode 负载
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), BayesConvError> {
        writer.write_all(PARAMS_MAGIC)?;
        writer.write_all(&PARAMS_VERSION.to_le_bytes())?;
        bincode::serialize_into(&mut *writer, self)?;
        Ok(())
    }

    /// 读取`write_to`写出的二进制格式
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self, BayesConvError> {
        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;
        if &magic != PARAMS_MAGIC {
            return Err(BayesConvError::InvalidCheckpoint(
                "这不是 only_bnn 格式的参数文件，请确保使用 save_params() 保存".to_string(),
            ));
        }

        let mut version_bytes = [0u8; 4];
        reader.read_exact(&mut version_bytes)?;
        let version = u32::from_le_bytes(version_bytes);
        if version != PARAMS_VERSION {
            return Err(BayesConvError::InvalidCheckpoint(format!(
                "不支持的参数文件版本: {version}"
            )));
        }

        Ok(bincode::deserialize_from(reader)?)
    }
}

impl LayerConfig {
    /// 不影响参数形状、但与`other`不同的字段，形如`stride [1, 1] -> [2, 2]`
    pub(crate) fn non_structural_differences(&self, other: &Self) -> Vec<String> {
        let mut differences = Vec::new();
        if self.prior_mu != other.prior_mu || self.prior_log_sigma != other.prior_log_sigma {
            differences.push(format!(
                "先验 ({}, {}) -> ({}, {})",
                self.prior_mu, self.prior_log_sigma, other.prior_mu, other.prior_log_sigma
            ));
        }
        for (name, own, theirs) in [
            ("stride", &self.stride, &other.stride),
            ("padding", &self.padding, &other.padding),
            ("dilation", &self.dilation, &other.dilation),
            ("output_padding", &self.output_padding, &other.output_padding),
        ] {
            if own != theirs {
                differences.push(format!("{name} {own:?} -> {theirs:?}"));
            }
        }
        if self.padding_mode != other.padding_mode {
            differences.push(format!(
                "padding_mode {} -> {}",
                self.padding_mode, other.padding_mode
            ));
        }
        differences
    }
}

impl BayesConvCore {
    /// 导出当前参数（拷贝）与配置
    pub fn state_dict(&self) -> StateDict {
        StateDict {
            config: self.config().clone(),
            tensors: self
                .named_tensors()
                .into_iter()
                .map(|(name, tensor)| (name.to_string(), tensor.clone()))
                .collect(),
        }
    }

    /// 用检查点覆盖当前参数
    ///
    /// 依次校验：偏置存在性、结构配置、参数名称、参数形状；任何一项不符都不会修改当前参数。
    /// 先验、stride、padding、dilation、padding_mode、output_padding 不同只会告警，
    /// 当前层保留自己的配置。
    pub fn load_state_dict(&mut self, state: &StateDict) -> Result<(), BayesConvError> {
        let config = self.config();
        if state.config.has_bias != config.has_bias {
            return Err(BayesConvError::BiasPresenceMismatch {
                layer_has_bias: config.has_bias,
                checkpoint_has_bias: state.config.has_bias,
            });
        }

        let structural = |c: &LayerConfig| {
            (
                c.in_channels,
                c.out_channels,
                c.kernel_size.clone(),
                c.groups,
                c.transposed,
            )
        };
        if structural(&state.config) != structural(config) {
            return Err(BayesConvError::InvalidCheckpoint(format!(
                "检查点的结构配置与当前层不一致：检查点 {:?}，当前层 {:?}",
                state.config, config
            )));
        }
        let differences = config.non_structural_differences(&state.config);
        if !differences.is_empty() {
            log::warn!(
                "检查点的 {} 与当前层不同，仅加载参数，当前层保留自己的配置",
                differences.join("、")
            );
        }

        let own_names: Vec<&str> = self.named_tensors().iter().map(|(name, _)| *name).collect();
        if let Some(unexpected) = state
            .tensors
            .keys()
            .find(|name| !own_names.contains(&name.as_str()))
        {
            return Err(BayesConvError::InvalidCheckpoint(format!(
                "检查点含有多余的参数 {unexpected}"
            )));
        }
        for (name, tensor) in self.named_tensors() {
            let loaded = state.get(name).ok_or_else(|| {
                BayesConvError::InvalidCheckpoint(format!("检查点缺少参数 {name}"))
            })?;
            if !loaded.is_same_shape(tensor) {
                return Err(BayesConvError::ShapeMismatch {
                    expected: tensor.shape().to_vec(),
                    got: loaded.shape().to_vec(),
                    message: format!("参数 {name} 的形状不一致"),
                });
            }
        }

        for (name, tensor) in self.named_tensors_mut() {
            if let Some(loaded) = state.get(name) {
                *tensor = loaded.clone();
            }
        }
        Ok(())
    }
}

impl BayesConv2d {
    pub fn state_dict(&self) -> StateDict {
        self.core().state_dict()
    }

    pub fn load_state_dict(&mut self, state: &StateDict) -> Result<(), BayesConvError> {
        self.core_mut().load_state_dict(state)
    }

    /// 以 JSON 描述当前层（配置 + 参数）
    pub fn to_json(&self) -> Result<String, BayesConvError> {
        self.state_dict().to_json()
    }

    /// 保存参数到二进制文件
    pub fn save_params<P: AsRef<Path>>(&self, path: P) -> Result<(), BayesConvError> {
        let file = File::create(path.as_ref())?;
        let mut writer = BufWriter::new(file);
        self.state_dict().write_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// 从二进制文件加载参数
    pub fn load_params<P: AsRef<Path>>(&mut self, path: P) -> Result<(), BayesConvError> {
        let file = File::open(path.as_ref())?;
        let mut reader = BufReader::new(file);
        let state = StateDict::read_from(&mut reader)?;
        self.load_state_dict(&state)
    }
}
