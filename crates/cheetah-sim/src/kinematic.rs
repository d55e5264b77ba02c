//! 进程内运动学仿真后端
//!
//! `KinematicSim` 不是物理引擎：它不积分刚体动力学，也不处理接触。
//! 它只保存世界参数（重力、步长），并为每个关节模拟一个位置跟踪执行器：
//! 每步以不超过速度上限的速度把关节移向目标角度。
//!
//! 用于在没有外部仿真器的环境中运行演示程序和测试。

use crate::search::SearchPaths;
use crate::{BodyId, JointState, SimError, SimulationHandle, velocity_bound};
use cheetah_model::{ControlMode, JointIndex, JointInfo, Rad, RadPerSec, RobotModel};
use nalgebra::Vector3;
use std::path::{Path, PathBuf};

/// 默认步长（1/240 秒）
pub const DEFAULT_TIME_STEP: f64 = 1.0 / 240.0;

/// 位置跟踪目标
#[derive(Debug, Clone, Copy)]
struct ServoTarget {
    position: Rad,
    max_velocity: RadPerSec,
}

/// 单关节执行器状态
#[derive(Debug, Clone, Copy, Default)]
struct JointServo {
    state: JointState,
    target: Option<ServoTarget>,
}

/// 已加载的刚体
#[derive(Debug, Clone)]
struct SimBody {
    model: RobotModel,
    base_position: Vector3<f64>,
    servos: Vec<JointServo>,
}

/// 运动学仿真器
#[derive(Debug, Clone)]
pub struct KinematicSim {
    search_paths: SearchPaths,
    gravity: Vector3<f64>,
    time_step: f64,
    step_count: u64,
    bodies: Vec<SimBody>,
}

impl KinematicSim {
    /// 创建新的仿真实例
    ///
    /// 进程内后端总是连接成功；返回 `Result` 以与外部仿真器保持相同的调用方式。
    pub fn connect() -> Result<Self, SimError> {
        tracing::info!("Connected to in-process kinematic simulator");
        Ok(Self {
            search_paths: SearchPaths::new(),
            gravity: Vector3::zeros(),
            time_step: DEFAULT_TIME_STEP,
            step_count: 0,
            bodies: Vec::new(),
        })
    }

    /// 追加描述文件搜索路径
    ///
    /// 相对路径先按当前目录查找，找不到时依次在搜索路径中查找。
    pub fn add_search_path<P: Into<PathBuf>>(&mut self, path: P) {
        self.search_paths.add(path);
    }

    /// 当前重力向量
    pub fn gravity(&self) -> Vector3<f64> {
        self.gravity
    }

    /// 已执行的步数
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// 已加载的刚体数量
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// 刚体的初始基座位置
    pub fn base_position(&self, body: BodyId) -> Result<Vector3<f64>, SimError> {
        Ok(self.body(body)?.base_position)
    }

    fn body(&self, body: BodyId) -> Result<&SimBody, SimError> {
        self.bodies.get(body.0).ok_or(SimError::UnknownBody(body))
    }

    fn body_mut(&mut self, body: BodyId) -> Result<&mut SimBody, SimError> {
        self.bodies.get_mut(body.0).ok_or(SimError::UnknownBody(body))
    }

    fn check_joint(sim_body: &SimBody, body: BodyId, index: JointIndex) -> Result<(), SimError> {
        if index.0 < sim_body.servos.len() {
            Ok(())
        } else {
            Err(SimError::UnknownJoint {
                body,
                index,
                joint_count: sim_body.servos.len(),
            })
        }
    }
}

impl SimulationHandle for KinematicSim {
    fn load_model(
        &mut self,
        path: &Path,
        base_position: Vector3<f64>,
    ) -> Result<BodyId, SimError> {
        let resolved = self.search_paths.resolve(path)?;
        let model = RobotModel::from_urdf_file(&resolved)?;
        let id = BodyId(self.bodies.len());
        tracing::info!(
            "Loaded {} from {} as {} ({} joints)",
            model.name(),
            resolved.display(),
            id,
            model.joint_count()
        );
        let servos = vec![JointServo::default(); model.joint_count()];
        self.bodies.push(SimBody {
            model,
            base_position,
            servos,
        });
        Ok(id)
    }

    fn set_gravity(&mut self, gravity: Vector3<f64>) -> Result<(), SimError> {
        self.gravity = gravity;
        Ok(())
    }

    fn set_time_step(&mut self, seconds: f64) -> Result<(), SimError> {
        if !seconds.is_finite() || seconds <= 0.0 {
            return Err(SimError::InvalidTimeStep(seconds));
        }
        self.time_step = seconds;
        Ok(())
    }

    fn time_step(&self) -> f64 {
        self.time_step
    }

    fn step(&mut self) -> Result<(), SimError> {
        let dt = self.time_step;
        for body in &mut self.bodies {
            for (servo, info) in body.servos.iter_mut().zip(body.model.joints()) {
                let Some(target) = servo.target else {
                    continue;
                };

                let current = servo.state.position;
                let error = target.position - current;
                // 没有任何速度上限时一步到位
                let next = match velocity_bound(target.max_velocity, info) {
                    Some(bound) => {
                        let max_step = bound.over(dt).0;
                        current + Rad(error.0.clamp(-max_step, max_step))
                    },
                    None => target.position,
                };

                servo.state.velocity = RadPerSec((next - current).0 / dt);
                servo.state.position = next;
            }
        }
        self.step_count += 1;
        Ok(())
    }

    fn joint_count(&self, body: BodyId) -> Result<usize, SimError> {
        Ok(self.body(body)?.model.joint_count())
    }

    fn joint_info(&self, body: BodyId, index: JointIndex) -> Result<JointInfo, SimError> {
        let sim_body = self.body(body)?;
        Self::check_joint(sim_body, body, index)?;
        Ok(sim_body.model.joints()[index.0].clone())
    }

    fn joint_state(&self, body: BodyId, index: JointIndex) -> Result<JointState, SimError> {
        let sim_body = self.body(body)?;
        Self::check_joint(sim_body, body, index)?;
        Ok(sim_body.servos[index.0].state)
    }

    fn set_joint_target(
        &mut self,
        body: BodyId,
        index: JointIndex,
        mode: ControlMode,
        target: Rad,
        max_velocity: RadPerSec,
    ) -> Result<(), SimError> {
        let sim_body = self.body_mut(body)?;
        Self::check_joint(sim_body, body, index)?;

        let info = &sim_body.model.joints()[index.0];
        if !info.is_actuated() {
            tracing::warn!(
                "Ignoring target for fixed joint {} {} on {}",
                index,
                info.name,
                body
            );
            return Ok(());
        }

        match mode {
            ControlMode::Position => {
                let position = match info.limits {
                    Some(limits) => limits.clamp_position(target),
                    None => target,
                };
                sim_body.servos[index.0].target = Some(ServoTarget {
                    position,
                    max_velocity,
                });
                Ok(())
            },
            other => Err(SimError::UnsupportedControlMode(other)),
        }
    }
}
