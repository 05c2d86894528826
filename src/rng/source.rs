//! 随机源 trait
//!
//! 定义仿真随机源接口。

/// 随机源：引擎唯一的可插拔依赖，注入后整个仿真可复现。
pub trait RandomSource {
    /// 返回 [0,1) 区间内的均匀随机数
    fn uniform(&mut self) -> f64;

    /// 返回 [0,n) 区间内的均匀随机下标；`n` 必须大于 0
    fn choose_index(&mut self, n: usize) -> usize;
}
