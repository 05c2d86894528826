//! 种子随机源
//!
//! 基于 ChaCha20 的可复现随机源，相同种子产生相同抽样序列。

use super::source::RandomSource;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// 种子随机源：相同种子下 `uniform`/`choose_index` 序列完全一致。
pub struct SeededSource {
    rng: ChaCha20Rng,
}

impl SeededSource {
    /// 从 u64 种子创建
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededSource {
    fn uniform(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    fn choose_index(&mut self, n: usize) -> usize {
        debug_assert!(n > 0);
        self.rng.random_range(0..n)
    }
}
