//! 仿真后端选择
//!
//! | 后端 | 说明 |
//! |---|---|
//! | `auto` | 编译了 `bullet` feature 时为 `gui`，否则为 `kinematic` |
//! | `kinematic` | 进程内运动学后端，无头、确定性，用于测试 |
//! | `direct` | Bullet 物理引擎，无窗口 |
//! | `gui` | Bullet 物理引擎，打开可视化窗口 |

#[cfg(feature = "bullet")]
use crate::bullet::{BulletMode, BulletSim};
use crate::kinematic::KinematicSim;
use crate::{BodyId, JointState, SimError, SimulationHandle};
use cheetah_model::{ControlMode, JointIndex, JointInfo, Rad, RadPerSec};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// 仿真后端类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// 自动选择
    #[default]
    Auto,
    /// 进程内运动学后端
    Kinematic,
    /// Bullet，无窗口
    Direct,
    /// Bullet，可视化窗口
    Gui,
}

impl Backend {
    pub const fn as_str(self) -> &'static str {
        match self {
            Backend::Auto => "auto",
            Backend::Kinematic => "kinematic",
            Backend::Direct => "direct",
            Backend::Gui => "gui",
        }
    }

    /// 把 `Auto` 解析为具体后端
    pub const fn resolve(self) -> Backend {
        match self {
            Backend::Auto => {
                if cfg!(feature = "bullet") {
                    Backend::Gui
                } else {
                    Backend::Kinematic
                }
            },
            other => other,
        }
    }

    /// 是否为物理引擎后端
    pub const fn is_physics(self) -> bool {
        matches!(self.resolve(), Backend::Direct | Backend::Gui)
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Backend::Auto),
            "kinematic" => Ok(Backend::Kinematic),
            "direct" => Ok(Backend::Direct),
            "gui" => Ok(Backend::Gui),
            other => Err(format!(
                "unknown simulator backend {:?} (expected auto, kinematic, direct or gui)",
                other
            )),
        }
    }
}

/// 按后端类型分发的仿真句柄
#[derive(Debug)]
pub enum Simulator {
    Kinematic(KinematicSim),
    #[cfg(feature = "bullet")]
    Bullet(BulletSim),
}

macro_rules! dispatch {
    ($self:expr, $sim:ident => $body:expr) => {
        match $self {
            Simulator::Kinematic($sim) => $body,
            #[cfg(feature = "bullet")]
            Simulator::Bullet($sim) => $body,
        }
    };
}

impl Simulator {
    /// 连接指定后端
    ///
    /// 当前构建不包含所需后端时返回 [`SimError::BackendUnavailable`]。
    pub fn connect(backend: Backend) -> Result<Self, SimError> {
        match backend.resolve() {
            Backend::Kinematic => Ok(Simulator::Kinematic(KinematicSim::connect()?)),
            #[cfg(feature = "bullet")]
            Backend::Direct => Ok(Simulator::Bullet(BulletSim::connect(BulletMode::Direct)?)),
            #[cfg(feature = "bullet")]
            Backend::Gui => Ok(Simulator::Bullet(BulletSim::connect(BulletMode::Gui)?)),
            other => Err(SimError::BackendUnavailable(other)),
        }
    }

    /// 实际使用的后端
    pub fn backend(&self) -> Backend {
        match self {
            Simulator::Kinematic(_) => Backend::Kinematic,
            #[cfg(feature = "bullet")]
            Simulator::Bullet(sim) => match sim.mode() {
                BulletMode::Direct => Backend::Direct,
                BulletMode::Gui => Backend::Gui,
            },
        }
    }

    /// 追加描述文件搜索路径
    pub fn add_search_path<P: Into<PathBuf>>(&mut self, path: P) -> Result<(), SimError> {
        match self {
            Simulator::Kinematic(sim) => {
                sim.add_search_path(path);
                Ok(())
            },
            #[cfg(feature = "bullet")]
            Simulator::Bullet(sim) => sim.add_search_path(path),
        }
    }
}

impl SimulationHandle for Simulator {
    fn load_model(
        &mut self,
        path: &Path,
        base_position: Vector3<f64>,
    ) -> Result<BodyId, SimError> {
        dispatch!(self, sim => sim.load_model(path, base_position))
    }

    fn set_gravity(&mut self, gravity: Vector3<f64>) -> Result<(), SimError> {
        dispatch!(self, sim => sim.set_gravity(gravity))
    }

    fn set_time_step(&mut self, seconds: f64) -> Result<(), SimError> {
        dispatch!(self, sim => sim.set_time_step(seconds))
    }

    fn time_step(&self) -> f64 {
        dispatch!(self, sim => sim.time_step())
    }

    fn step(&mut self) -> Result<(), SimError> {
        dispatch!(self, sim => sim.step())
    }

    fn joint_count(&self, body: BodyId) -> Result<usize, SimError> {
        dispatch!(self, sim => sim.joint_count(body))
    }

    fn joint_info(&self, body: BodyId, index: JointIndex) -> Result<JointInfo, SimError> {
        dispatch!(self, sim => sim.joint_info(body, index))
    }

    fn joint_state(&self, body: BodyId, index: JointIndex) -> Result<JointState, SimError> {
        dispatch!(self, sim => sim.joint_state(body, index))
    }

    fn set_joint_target(
        &mut self,
        body: BodyId,
        index: JointIndex,
        mode: ControlMode,
        target: Rad,
        max_velocity: RadPerSec,
    ) -> Result<(), SimError> {
        dispatch!(self, sim => sim.set_joint_target(body, index, mode, target, max_velocity))
    }
}
