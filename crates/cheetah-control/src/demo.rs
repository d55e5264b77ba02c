//! hello-cheetah 演示流程
//!
//! 1. 按 `simulation.backend` 连接仿真器（Bullet GUI / DIRECT 或运动学后端），设置重力和搜索路径
//! 2. 加载地面和机器人，打印全部关节信息
//! 3. 按名称解析关节角色，生成中立站姿指令
//! 4. 在 `delay_secs` 处挂一个延时触发器，交给 Tick Driver 运行
//!
//! # 示例
//!
//! ```rust,no_run
//! use cheetah_control::{Demo, DemoConfig};
//!
//! # fn example() -> Result<(), cheetah_control::ControlError> {
//! let mut config = DemoConfig::default();
//! config.playback.max_ticks = Some(500);
//!
//! let report = Demo::new(config)?.run()?;
//! println!("stance issued at tick {:?}", report.summary.fired_at[0]);
//! # Ok(())
//! # }
//! ```

use crate::config::DemoConfig;
use crate::error::ControlError;
use cheetah_driver::{DelayedActuationTrigger, RunSummary, TickDriver};
use cheetah_model::{
    ActuationCommand, JointIndex, JointInfo, JointRole, Rad, RoleMap, RoleNaming,
};
use cheetah_sim::{BodyId, SimulationHandle, Simulator};
use nalgebra::Vector3;

/// 触发时输出的日志
pub const BENDING_LABEL: &str = "bending joints...";

/// 已加载的场景
#[derive(Debug)]
pub struct Scene<S: SimulationHandle> {
    pub sim: S,
    pub ground: Option<BodyId>,
    pub robot: BodyId,
    pub joints: Vec<JointInfo>,
}

/// 演示运行结果
#[derive(Debug, Clone)]
pub struct DemoReport {
    /// 机器人刚体
    pub robot: BodyId,
    /// 机器人全部关节
    pub joints: Vec<JointInfo>,
    /// 下发的站姿指令
    pub commands: Vec<ActuationCommand>,
    /// 循环统计
    pub summary: RunSummary,
    /// 运行结束时各可驱动关节的位置
    pub final_positions: Vec<(JointIndex, Rad)>,
}

/// 演示程序
#[derive(Debug, Clone)]
pub struct Demo {
    config: DemoConfig,
}

impl Demo {
    /// 校验配置并创建演示程序
    pub fn new(config: DemoConfig) -> Result<Self, ControlError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DemoConfig {
        &self.config
    }

    /// 连接配置的仿真后端并注册搜索路径
    pub fn connect(&self) -> Result<Simulator, ControlError> {
        let settings = &self.config.simulation;
        let mut sim = Simulator::connect(settings.backend)?;
        tracing::info!("Using {} simulator backend", sim.backend());
        for path in &settings.search_paths {
            sim.add_search_path(path)?;
        }
        Ok(sim)
    }

    /// 连接仿真器并加载场景
    pub fn load_scene(&self) -> Result<Scene<Simulator>, ControlError> {
        let sim = self.connect()?;
        self.populate(sim)
    }

    /// 在给定仿真器中加载场景
    pub fn populate<S: SimulationHandle>(&self, mut sim: S) -> Result<Scene<S>, ControlError> {
        sim.set_gravity(self.config.gravity())?;

        let ground = match &self.config.model.ground {
            Some(path) => Some(sim.load_model(path, Vector3::zeros())?),
            None => None,
        };
        let robot = sim.load_model(&self.config.model.robot, self.config.base_position())?;

        let joints = sim.joint_infos(robot)?;
        tracing::info!("Robot {} has {} joints", robot, joints.len());
        for joint in &joints {
            tracing::info!("{}", joint);
        }

        Ok(Scene {
            sim,
            ground,
            robot,
            joints,
        })
    }

    /// 解析角色并生成站姿指令
    pub fn stance_commands(
        &self,
        joints: &[JointInfo],
    ) -> Result<Vec<ActuationCommand>, ControlError> {
        let roles = RoleMap::resolve(joints, &RoleNaming::mini_cheetah())?;
        for role in JointRole::all() {
            tracing::debug!("{} -> {}", role, roles.index(role));
        }
        Ok(self.config.stance().commands(&roles))
    }

    /// 运行演示
    ///
    /// `playback.max_ticks` 为 `None` 时循环不会正常返回。
    pub fn run(&self) -> Result<DemoReport, ControlError> {
        let scene = self.load_scene()?;
        self.run_scene(scene)
    }

    /// 在已加载的场景上运行演示
    pub fn run_scene<S: SimulationHandle>(
        &self,
        scene: Scene<S>,
    ) -> Result<DemoReport, ControlError> {
        let Scene {
            sim, robot, joints, ..
        } = scene;

        let commands = self.stance_commands(&joints)?;
        let trigger =
            DelayedActuationTrigger::new(self.config.actuation.delay_secs, commands.clone())?
                .with_label(BENDING_LABEL);

        let mut driver = TickDriver::new(sim, self.config.tick_config())?;
        let mut triggers = [trigger];
        let summary = driver.run(robot, &mut triggers)?;

        let sim = driver.sim();
        let mut final_positions = Vec::new();
        for joint in joints.iter().filter(|j| j.is_actuated()) {
            let state = sim.joint_state(robot, joint.index)?;
            final_positions.push((joint.index, state.position));
        }

        Ok(DemoReport {
            robot,
            joints,
            commands,
            summary,
            final_positions,
        })
    }
}

impl DemoReport {
    /// 查询某个关节的最终位置
    pub fn final_position(&self, joint: JointIndex) -> Option<Rad> {
        self.final_positions
            .iter()
            .find(|(index, _)| *index == joint)
            .map(|(_, position)| *position)
    }
}
