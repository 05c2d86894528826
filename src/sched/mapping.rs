//! 线程映射
//!
//! 按模型计算内核线程集合与用户线程到内核线程的映射。

use super::model::Model;
use super::thread::{KernelThread, KernelThreadId, UserThreadId};

/// 计算映射：返回内核线程集合，以及与 `user_ids` 顺序对齐的内核线程标识。
///
/// 纯函数，无随机性。`kernel_hint` 仅对 many-to-many 生效，0 会被矫正为 1。
pub fn compute_mapping(
    model: Model,
    user_ids: &[UserThreadId],
    kernel_hint: usize,
) -> (Vec<KernelThread>, Vec<KernelThreadId>) {
    match model {
        Model::ManyToOne => {
            let k = KernelThreadId(1);
            (vec![KernelThread::new(k)], vec![k; user_ids.len()])
        }
        Model::OneToOne => {
            let kernels: Vec<KernelThread> = (1..=user_ids.len() as u32)
                .map(|i| KernelThread::new(KernelThreadId(i)))
                .collect();
            let by_user = kernels.iter().map(|k| k.id).collect();
            (kernels, by_user)
        }
        Model::ManyToMany => {
            let count = kernel_hint.max(1);
            let kernels: Vec<KernelThread> = (1..=count as u32)
                .map(|i| KernelThread::new(KernelThreadId(i)))
                .collect();
            let by_user = (0..user_ids.len())
                .map(|i| KernelThreadId((i % count) as u32 + 1))
                .collect();
            (kernels, by_user)
        }
    }
}
