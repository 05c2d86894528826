//! 映射模型
//!
//! 定义用户线程到内核线程的三种映射策略。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 映射模型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Model {
    /// 多个用户线程映射到同一个内核线程
    ManyToOne,
    /// 每个用户线程映射到独立的内核线程
    OneToOne,
    /// 用户线程复用一个内核线程池
    ManyToMany,
}

impl Model {
    /// 模型说明文本（供展示层使用）
    pub fn explanation(self) -> &'static str {
        match self {
            Model::ManyToOne => {
                "Many-to-One: Multiple user threads are mapped to a single kernel thread. \
                 If one user thread blocks, all user threads are effectively blocked."
            }
            Model::OneToOne => {
                "One-to-One: Each user thread is mapped to a separate kernel thread. \
                 Blocking one thread does not block others."
            }
            Model::ManyToMany => {
                "Many-to-Many: Multiple user threads are multiplexed over a pool of kernel \
                 threads. Blocking one user thread does not block all, and the system \
                 balances flexibility and resource usage."
            }
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Model::ManyToOne => "many_to_one",
            Model::OneToOne => "one_to_one",
            Model::ManyToMany => "many_to_many",
        })
    }
}

/// 模型解析错误
#[derive(Debug, thiserror::Error)]
#[error("unknown model `{0}`, expected many_to_one | one_to_one | many_to_many")]
pub struct ParseModelError(String);

impl FromStr for Model {
    type Err = ParseModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "many_to_one" => Ok(Model::ManyToOne),
            "one_to_one" => Ok(Model::OneToOne),
            "many_to_many" => Ok(Model::ManyToMany),
            other => Err(ParseModelError(other.to_string())),
        }
    }
}
