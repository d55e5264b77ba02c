//! # Cheetah Simulation Handle Layer
//!
//! 仿真器抽象层，提供统一的仿真句柄接口。
//!
//! 仿真句柄是显式持有的值（而非进程级全局连接），
//! 因此可以同时运行多个独立仿真，并在测试中干净地释放。
//!
//! - [`SimulationHandle`] - 仿真器需要实现的接口
//! - [`BulletSim`] - Bullet 物理引擎后端（需要 `bullet` feature，支持 GUI / DIRECT 模式）
//! - [`KinematicSim`] - 进程内运动学后端（不做动力学，仅模拟位置跟踪执行器，用于无头测试）
//! - [`Simulator`] - 按 [`Backend`] 选择上述后端

use cheetah_model::{ControlMode, JointIndex, JointInfo, ModelError, Rad, RadPerSec};
use nalgebra::Vector3;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub mod backend;
#[cfg(feature = "bullet")]
pub mod bullet;
pub mod kinematic;
pub mod search;

pub use backend::{Backend, Simulator};
#[cfg(feature = "bullet")]
pub use bullet::BulletSim;
pub use kinematic::KinematicSim;
pub use search::SearchPaths;

/// 已加载刚体的句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyId(pub usize);

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "body {}", self.0)
    }
}

/// 关节状态读数
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct JointState {
    /// 当前位置
    pub position: Rad,
    /// 当前速度
    pub velocity: RadPerSec,
}

/// 仿真层统一错误类型
#[derive(Error, Debug)]
pub enum SimError {
    /// 连接仿真器失败
    #[error("Failed to connect to simulator: {0}")]
    Connection(String),

    /// 当前构建不包含该后端
    #[error("Simulator backend '{0}' is not available in this build (enable the `bullet` feature)")]
    BackendUnavailable(Backend),

    /// 描述文件不存在
    #[error("Model file {path} not found (searched: {searched:?})")]
    ModelNotFound { path: PathBuf, searched: Vec<PathBuf> },

    /// 描述文件解析失败
    #[error("Failed to load model: {0}")]
    ModelLoad(#[from] ModelError),

    /// 未知刚体句柄
    #[error("Unknown body: {0}")]
    UnknownBody(BodyId),

    /// 关节索引越界
    #[error("UnknownJoint: index {index} out of range for {body} ({joint_count} joints)")]
    UnknownJoint {
        body: BodyId,
        index: JointIndex,
        joint_count: usize,
    },

    /// 无效的仿真步长
    #[error("Invalid time step: {0} (must be finite and > 0)")]
    InvalidTimeStep(f64),

    /// 后端不支持的控制模式
    #[error("Unsupported control mode: {0:?}")]
    UnsupportedControlMode(ControlMode),

    /// 后端内部错误
    #[error("Simulator backend error: {0}")]
    Backend(String),
}

impl SimError {
    /// 是否为关节索引越界错误
    pub fn is_unknown_joint(&self) -> bool {
        matches!(self, SimError::UnknownJoint { .. })
    }
}

/// 仿真句柄接口
///
/// 世界状态（刚体、重力、步长）由实现方持有。所有方法同步返回，
/// 失败时返回 [`SimError`]，调用方不做重试。
pub trait SimulationHandle {
    /// 加载描述文件，返回刚体句柄
    ///
    /// `base_position` 为初始基座位置（米）。
    fn load_model(&mut self, path: &Path, base_position: Vector3<f64>)
    -> Result<BodyId, SimError>;

    /// 设置重力向量（m/s²）
    fn set_gravity(&mut self, gravity: Vector3<f64>) -> Result<(), SimError>;

    /// 设置每步推进的仿真时间（秒）
    fn set_time_step(&mut self, seconds: f64) -> Result<(), SimError>;

    /// 当前仿真步长（秒）
    fn time_step(&self) -> f64;

    /// 推进一步
    fn step(&mut self) -> Result<(), SimError>;

    /// 刚体的关节数量
    fn joint_count(&self, body: BodyId) -> Result<usize, SimError>;

    /// 单个关节的描述信息
    fn joint_info(&self, body: BodyId, index: JointIndex) -> Result<JointInfo, SimError>;

    /// 单个关节的当前状态
    fn joint_state(&self, body: BodyId, index: JointIndex) -> Result<JointState, SimError>;

    /// 设置关节目标
    ///
    /// 位置跟踪模式下，仿真器内部控制器会以不超过 `max_velocity`（取幅值）
    /// 的速度将关节驱动到 `target`。无效索引立即返回 [`SimError::UnknownJoint`]。
    fn set_joint_target(
        &mut self,
        body: BodyId,
        index: JointIndex,
        mode: ControlMode,
        target: Rad,
        max_velocity: RadPerSec,
    ) -> Result<(), SimError>;

    /// 全部关节的描述信息（按索引顺序）
    fn joint_infos(&self, body: BodyId) -> Result<Vec<JointInfo>, SimError> {
        (0..self.joint_count(body)?)
            .map(|i| self.joint_info(body, JointIndex(i)))
            .collect()
    }
}

/// 位置跟踪的有效速度上限
///
/// 取指令速度的幅值；指令速度为 0 时退回到描述文件中的速度限位。
/// 两者都没有时返回 `None`（不限速）。
pub(crate) fn velocity_bound(commanded: RadPerSec, info: &JointInfo) -> Option<RadPerSec> {
    if commanded.magnitude() > 0.0 {
        return Some(RadPerSec(commanded.magnitude()));
    }
    info.limits
        .map(|l| RadPerSec(l.velocity.magnitude()))
        .filter(|v| v.0 > 0.0)
}
