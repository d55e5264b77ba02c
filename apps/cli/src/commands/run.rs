//! run 命令
//!
//! 运行 hello-cheetah 演示

use anyhow::{Context, Result};
use cheetah_control::{Demo, DemoConfig};
use cheetah_driver::Pacing;
use cheetah_sim::Backend;
use clap::Args;
use std::path::PathBuf;

/// 演示运行参数
#[derive(Args, Debug)]
pub struct RunCommand {
    /// 配置文件路径（TOML）
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 仿真后端：auto, kinematic, direct, gui（覆盖配置）
    #[arg(short, long)]
    pub backend: Option<Backend>,

    /// 机器人描述文件（覆盖配置）
    #[arg(short, long)]
    pub model: Option<PathBuf>,

    /// 最大步数（默认无限循环，Ctrl-C 退出）
    #[arg(long)]
    pub max_ticks: Option<u64>,

    /// 实时节奏：off, sleep, spin（覆盖配置）
    #[arg(long)]
    pub pacing: Option<Pacing>,
}

impl RunCommand {
    /// 合并配置文件和命令行参数
    pub fn resolve_config(&self) -> Result<DemoConfig> {
        let mut config = match &self.config {
            Some(path) => DemoConfig::load_from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => DemoConfig::default(),
        };

        if let Some(backend) = self.backend {
            config.simulation.backend = backend;
        }
        if let Some(model) = &self.model {
            config.model.robot = model.clone();
        }
        if let Some(max_ticks) = self.max_ticks {
            config.playback.max_ticks = Some(max_ticks);
        }
        if let Some(pacing) = self.pacing {
            config.playback.pacing = pacing;
        }
        tracing::debug!("Resolved demo config: {:?}", config);
        Ok(config)
    }

    /// 运行演示
    pub fn execute(&self) -> Result<()> {
        let config = self.resolve_config()?;
        let robot = config.model.robot.clone();
        let demo = Demo::new(config).context("Invalid demo configuration")?;

        println!("🐆 加载模型: {}", robot.display());
        let report = demo
            .run()
            .with_context(|| format!("Demo failed for {}", robot.display()))?;

        println!();
        println!("📊 运行结果:");
        println!("  步数: {}", report.summary.ticks);
        println!("  仿真时间: {:.3} 秒", report.summary.elapsed);
        match report.summary.fired_at.first().copied().flatten() {
            Some(tick) => println!("  站姿指令: 第 {} 步下发 {} 条", tick, report.commands.len()),
            None => println!("  站姿指令: 未到达触发时间"),
        }

        println!();
        println!("📐 关节位置:");
        for (index, position) in &report.final_positions {
            if let Some(joint) = report.joints.get(index.get()) {
                println!("  {:>3} {:<28} {}", index, joint.name, position);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_applied() {
        let cmd = RunCommand {
            config: None,
            backend: Some(Backend::Kinematic),
            model: Some(PathBuf::from("other.urdf")),
            max_ticks: Some(42),
            pacing: Some(Pacing::Spin),
        };
        let config = cmd.resolve_config().unwrap();
        assert_eq!(config.simulation.backend, Backend::Kinematic);
        assert_eq!(config.model.robot, PathBuf::from("other.urdf"));
        assert_eq!(config.playback.max_ticks, Some(42));
        assert_eq!(config.playback.pacing, Pacing::Spin);
    }

    #[test]
    fn test_defaults_without_overrides() {
        let cmd = RunCommand {
            config: None,
            backend: None,
            model: None,
            max_ticks: None,
            pacing: None,
        };
        let config = cmd.resolve_config().unwrap();
        assert_eq!(config, DemoConfig::default());
    }

    #[test]
    fn test_missing_config_file() {
        let cmd = RunCommand {
            config: Some(PathBuf::from("/nonexistent/demo.toml")),
            backend: None,
            model: None,
            max_ticks: None,
            pacing: None,
        };
        let err = cmd.resolve_config().unwrap_err();
        assert!(err.to_string().contains("Failed to load config"));
    }
}
