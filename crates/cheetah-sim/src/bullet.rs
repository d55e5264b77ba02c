//! Bullet 物理引擎后端
//!
//! 通过 `rsbullet` 连接 Bullet（与 pybullet 相同的引擎和 API）。
//! 与 [`KinematicSim`](crate::KinematicSim) 不同，这里有真实的动力学：
//! 重力作用于机器人，足端与地面接触，关节由引擎内部的 PD 控制器
//! 以 `POSITION_CONTROL` 模式驱动。
//!
//! GUI 模式会打开可视化窗口；DIRECT 模式无窗口，可用于服务器或 CI。
//!
//! 关节表由本地解析同一份描述文件得到，关节索引与 Bullet 一致
//! （两者都按描述文件中的关节顺序编号）。
//!
//! # 示例
//!
//! ```rust,no_run
//! use cheetah_sim::{BulletSim, SimulationHandle, bullet::BulletMode};
//! use nalgebra::Vector3;
//! use std::path::Path;
//!
//! # fn example() -> Result<(), cheetah_sim::SimError> {
//! let mut sim = BulletSim::connect(BulletMode::Gui)?;
//! sim.add_search_path("assets")?;
//! sim.set_gravity(Vector3::new(0.0, 0.0, -10.0))?;
//! sim.load_model(Path::new("plane.urdf"), Vector3::zeros())?;
//! let robot = sim.load_model(Path::new("mini_cheetah.urdf"), Vector3::new(0.0, 0.0, 0.5))?;
//! println!("{} joints", sim.joint_count(robot)?);
//! # Ok(())
//! # }
//! ```

use crate::search::SearchPaths;
use crate::{BodyId, JointState, SimError, SimulationHandle, velocity_bound};
use cheetah_model::{ControlMode, JointIndex, JointInfo, Rad, RadPerSec, RobotModel};
use nalgebra::Vector3;
use rsbullet::{ControlMode as MotorControl, Mode, PhysicsClient};
use std::cell::RefCell;
use std::fmt;
use std::path::{Path, PathBuf};

/// Bullet 默认步长（1/240 秒）
pub const DEFAULT_TIME_STEP: f64 = 1.0 / 240.0;

/// 连接模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulletMode {
    /// 无窗口
    Direct,
    /// 可视化窗口
    Gui,
}

impl From<BulletMode> for Mode {
    fn from(mode: BulletMode) -> Self {
        match mode {
            BulletMode::Direct => Mode::Direct,
            BulletMode::Gui => Mode::Gui,
        }
    }
}

/// 已加载的刚体
struct BulletBody {
    id: i32,
    model: RobotModel,
}

/// Bullet 仿真器
pub struct BulletSim {
    // 关节状态查询在 Bullet 侧需要可变借用，而 `SimulationHandle` 的查询接口是 `&self`
    client: RefCell<PhysicsClient>,
    mode: BulletMode,
    search_paths: SearchPaths,
    time_step: f64,
    bodies: Vec<BulletBody>,
}

fn backend_error(context: &str, err: impl fmt::Display) -> SimError {
    SimError::Backend(format!("{}: {}", context, err))
}

impl BulletSim {
    /// 连接 Bullet 物理引擎
    ///
    /// Bullet 自带的数据目录（`plane.urdf` 等）作为最后一个搜索路径。
    pub fn connect(mode: BulletMode) -> Result<Self, SimError> {
        let client = PhysicsClient::connect(mode.into())
            .map_err(|e| SimError::Connection(format!("{:?} mode: {}", mode, e)))?;
        tracing::info!("Connected to Bullet physics server ({:?} mode)", mode);

        Ok(Self {
            client: RefCell::new(client),
            mode,
            search_paths: SearchPaths::new(),
            time_step: DEFAULT_TIME_STEP,
            bodies: Vec::new(),
        })
    }

    /// 连接模式
    pub fn mode(&self) -> BulletMode {
        self.mode
    }

    /// 追加描述文件搜索路径（同时注册到 Bullet，用于解析网格等资源）
    pub fn add_search_path<P: Into<PathBuf>>(&mut self, path: P) -> Result<(), SimError> {
        let path = path.into();
        self.client
            .get_mut()
            .set_additional_search_path(&path)
            .map_err(|e| backend_error("set_additional_search_path", e))?;
        self.search_paths.add(path);
        Ok(())
    }

    /// 刚体基座的当前位置（受重力和接触影响）
    pub fn base_position(&self, body: BodyId) -> Result<Vector3<f64>, SimError> {
        let id = self.body(body)?.id;
        let (position, _orientation) = self
            .client
            .borrow_mut()
            .get_base_position_and_orientation(id)
            .map_err(|e| backend_error("get_base_position_and_orientation", e))?;
        Ok(Vector3::new(position[0], position[1], position[2]))
    }

    fn body(&self, body: BodyId) -> Result<&BulletBody, SimError> {
        self.bodies.get(body.0).ok_or(SimError::UnknownBody(body))
    }

    fn checked_joint(
        &self,
        body: BodyId,
        index: JointIndex,
    ) -> Result<(i32, &JointInfo), SimError> {
        let bullet_body = self.body(body)?;
        let joints = bullet_body.model.joints();
        joints
            .get(index.0)
            .map(|info| (bullet_body.id, info))
            .ok_or(SimError::UnknownJoint {
                body,
                index,
                joint_count: joints.len(),
            })
    }

    fn resolve_path(&self, path: &Path) -> Result<PathBuf, SimError> {
        self.search_paths.resolve(path).or_else(|err| {
            let bundled = PathBuf::from(PhysicsClient::bullet_data_path()).join(path);
            if path.is_relative() && bundled.exists() {
                Ok(bundled)
            } else {
                Err(err)
            }
        })
    }
}

impl fmt::Debug for BulletSim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BulletSim")
            .field("mode", &self.mode)
            .field("search_paths", &self.search_paths)
            .field("time_step", &self.time_step)
            .field("bodies", &self.bodies.len())
            .finish_non_exhaustive()
    }
}

impl SimulationHandle for BulletSim {
    fn load_model(
        &mut self,
        path: &Path,
        base_position: Vector3<f64>,
    ) -> Result<BodyId, SimError> {
        let resolved = self.resolve_path(path)?;
        let model = RobotModel::from_urdf_file(&resolved)?;

        let file = resolved.to_string_lossy();
        let id = self
            .client
            .get_mut()
            .load_urdf(&*file, Some([base_position.x, base_position.y, base_position.z]))
            .map_err(|e| backend_error("load_urdf", e))?;

        let body = BodyId(self.bodies.len());
        tracing::info!(
            "Loaded {} from {} as {} (bullet id {}, {} joints)",
            model.name(),
            resolved.display(),
            body,
            id,
            model.joint_count()
        );
        self.bodies.push(BulletBody { id, model });
        Ok(body)
    }

    fn set_gravity(&mut self, gravity: Vector3<f64>) -> Result<(), SimError> {
        self.client
            .get_mut()
            .set_gravity([gravity.x, gravity.y, gravity.z])
            .map_err(|e| backend_error("set_gravity", e))
    }

    fn set_time_step(&mut self, seconds: f64) -> Result<(), SimError> {
        if !seconds.is_finite() || seconds <= 0.0 {
            return Err(SimError::InvalidTimeStep(seconds));
        }
        self.client
            .get_mut()
            .set_time_step(seconds)
            .map_err(|e| backend_error("set_time_step", e))?;
        self.time_step = seconds;
        Ok(())
    }

    fn time_step(&self) -> f64 {
        self.time_step
    }

    fn step(&mut self) -> Result<(), SimError> {
        self.client
            .get_mut()
            .step_simulation()
            .map_err(|e| backend_error("step_simulation", e))
    }

    fn joint_count(&self, body: BodyId) -> Result<usize, SimError> {
        Ok(self.body(body)?.model.joint_count())
    }

    fn joint_info(&self, body: BodyId, index: JointIndex) -> Result<JointInfo, SimError> {
        let (_, info) = self.checked_joint(body, index)?;
        Ok(info.clone())
    }

    fn joint_state(&self, body: BodyId, index: JointIndex) -> Result<JointState, SimError> {
        let (id, _) = self.checked_joint(body, index)?;
        let state = self
            .client
            .borrow_mut()
            .get_joint_state(id, index.0 as i32)
            .map_err(|e| backend_error("get_joint_state", e))?;
        Ok(JointState {
            position: Rad(state.joint_position),
            velocity: RadPerSec(state.joint_velocity),
        })
    }

    fn set_joint_target(
        &mut self,
        body: BodyId,
        index: JointIndex,
        mode: ControlMode,
        target: Rad,
        max_velocity: RadPerSec,
    ) -> Result<(), SimError> {
        let (id, info) = self.checked_joint(body, index)?;
        if !info.is_actuated() {
            tracing::warn!(
                "Ignoring target for fixed joint {} {} on {}",
                index,
                info.name,
                body
            );
            return Ok(());
        }

        let bound = velocity_bound(max_velocity, info).map(|v| v.0);
        match mode {
            ControlMode::Position => {
                self.client
                    .get_mut()
                    .set_joint_motor_control(
                        id,
                        index.0 as i32,
                        MotorControl::Position,
                        Some(target.0),
                        bound,
                    )
                    .map_err(|e| backend_error("set_joint_motor_control", e))
            },
            other => Err(SimError::UnsupportedControlMode(other)),
        }
    }
}
