//! 驱动指令定义

use crate::joint::JointIndex;
use crate::units::{Rad, RadPerSec};
use std::fmt;

/// 执行器控制模式
///
/// 目前只定义位置跟踪模式：给定目标角度和速度上限，
/// 由仿真器内部控制器在后续若干步内把关节驱动到目标。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum ControlMode {
    /// 位置跟踪模式
    #[default]
    Position,
}

/// 单个关节的驱动指令
///
/// 一次性下发，不保留，后续轨迹完全由仿真器决定。
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActuationCommand {
    /// 目标关节
    pub joint: JointIndex,
    /// 目标角度
    pub target: Rad,
    /// 最大角速度（只使用幅值）
    pub max_velocity: RadPerSec,
}

impl ActuationCommand {
    /// 创建新的驱动指令
    pub fn new(joint: JointIndex, target: Rad, max_velocity: RadPerSec) -> Self {
        Self {
            joint,
            target,
            max_velocity,
        }
    }
}

impl fmt::Display for ActuationCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "joint {} -> {} (max {})",
            self.joint, self.target, self.max_velocity
        )
    }
}
