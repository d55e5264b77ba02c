//! joints 命令
//!
//! 加载描述文件并列出全部关节

use anyhow::{Context, Result};
use cheetah_control::DemoConfig;
use cheetah_model::JointInfo;
use cheetah_sim::{Backend, SimulationHandle, Simulator};
use clap::Args;
use nalgebra::Vector3;
use std::path::PathBuf;

/// 关节列表参数
#[derive(Args, Debug)]
pub struct JointsCommand {
    /// 机器人描述文件（默认 mini_cheetah.urdf）
    #[arg(short, long)]
    pub model: Option<PathBuf>,

    /// 仿真后端：auto, kinematic, direct, gui
    #[arg(short, long, default_value = "auto")]
    pub backend: Backend,

    /// 以 JSON 输出
    #[arg(long)]
    pub json: bool,
}

impl JointsCommand {
    /// 加载模型并读取关节表
    pub fn load_joints(&self) -> Result<Vec<JointInfo>> {
        let defaults = DemoConfig::default();
        let model = self.model.clone().unwrap_or(defaults.model.robot);

        // 只读关节表，不需要窗口
        let backend = match self.backend.resolve() {
            Backend::Gui => Backend::Direct,
            other => other,
        };
        let mut sim = Simulator::connect(backend)
            .with_context(|| format!("Failed to start {} simulator", backend))?;
        for path in defaults.simulation.search_paths {
            sim.add_search_path(path)?;
        }
        let body = sim
            .load_model(&model, Vector3::zeros())
            .with_context(|| format!("Failed to load model {}", model.display()))?;
        Ok(sim.joint_infos(body)?)
    }

    /// 输出关节列表
    pub fn execute(&self) -> Result<()> {
        let joints = self.load_joints()?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&joints)?);
            return Ok(());
        }

        println!("📋 {} 个关节:", joints.len());
        for joint in &joints {
            let limits = match joint.limits {
                Some(l) => format!("[{}, {}] max {}", l.lower, l.upper, l.velocity),
                None => "unbounded".to_string(),
            };
            println!("  {}  {}", joint, limits);
        }
        Ok(())
    }
}
