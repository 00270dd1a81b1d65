/*
 * @Author       : 老董
 * @Description  : Module trait 定义
 */

use crate::tensor::Tensor;

/// 模块 trait
///
/// # 设计原则
/// - `forward()` **不是** trait 方法（签名各异）
/// - `new()` **不是** trait 方法（参数各异）
/// - `parameters()`/`parameters_mut()` 返回带名称的参数（签名一致，放入 trait）
/// - 外部优化器只能通过`parameters_mut()`更新参数，层内部不会修改它们
pub trait Module {
    /// 获取所有可训练参数（名称, 张量）
    ///
    /// 用于：
    /// - 序列化/保存模型参数
    /// - 统计参数数量
    fn parameters(&self) -> Vec<(&'static str, &Tensor)>;

    /// 获取所有可训练参数的可变引用，供外部的参数更新流程使用
    fn parameters_mut(&mut self) -> Vec<(&'static str, &mut Tensor)>;

    /// 获取参数（张量）个数
    fn num_params(&self) -> usize {
        self.parameters().len()
    }

    /// 获取所有参数的元素总数
    fn num_elements(&self) -> usize {
        self.parameters().iter().map(|(_, t)| t.size()).sum()
    }
}
