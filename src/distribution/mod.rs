/*
 * @Author       : 老董
 * @Description  : 随机数生成器（PyTorch `torch.Generator` 风格）
 *
 * - 进程级默认生成器：`Generator::default_generator()`，可用`manual_seed`重设种子；
 * - 也可显式创建独立的生成器并注入到层中，便于测试复现；
 * - 生成器内部以`Mutex`保护，多处并发抽样会被串行化，同一种子下结果可复现的前提是调用顺序固定。
 */

use crate::tensor::Tensor;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

#[cfg(test)]
mod tests;

static DEFAULT_GENERATOR: OnceLock<Generator> = OnceLock::new();

/// 可共享的随机数生成器句柄。Clone 得到的是同一个底层生成器
#[derive(Debug, Clone)]
pub struct Generator {
    rng: Arc<Mutex<StdRng>>,
}

impl Generator {
    /// 以系统熵为种子创建一个新的生成器
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// 创建一个带固定种子的生成器（确保可重复性）
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            rng: Arc::new(Mutex::new(rng)),
        }
    }

    /// 获取进程级默认生成器
    pub fn default_generator() -> Self {
        DEFAULT_GENERATOR.get_or_init(Self::new).clone()
    }

    /// 设置/重置随机种子
    pub fn manual_seed(&self, seed: u64) {
        *self.lock() = StdRng::seed_from_u64(seed);
    }

    /// 判断两个句柄是否指向同一个底层生成器
    pub fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.rng, &other.rng)
    }

    /// 在持有生成器的期间执行`f`，`f`内的多次抽样不会与其他调用方交错
    pub fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        f(&mut self.lock())
    }

    /// 生成形状为`shape`、服从标准正态分布的张量
    pub fn standard_normal(&self, shape: &[usize]) -> Tensor {
        self.with_rng(|rng| Tensor::normal_with_rng(0.0, 1.0, shape, rng))
    }

    /// 生成与`tensor`同形状、服从标准正态分布的张量
    pub fn standard_normal_like(&self, tensor: &Tensor) -> Tensor {
        self.standard_normal(tensor.shape())
    }

    /// 生成形状为`shape`、服从[low, high]均匀分布的张量
    pub fn uniform(&self, low: f32, high: f32, shape: &[usize]) -> Tensor {
        self.with_rng(|rng| Tensor::uniform_with_rng(low, high, shape, rng))
    }

    // 某次抽样中途panic不会破坏生成器状态，故直接取回内部值
    fn lock(&self) -> std::sync::MutexGuard<'_, StdRng> {
        self.rng.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

/// 重设进程级默认生成器的种子
pub fn manual_seed(seed: u64) {
    Generator::default_generator().manual_seed(seed);
}
