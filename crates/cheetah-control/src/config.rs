//! 演示配置
//!
//! 从 TOML 文件加载，所有字段都有默认值，缺省的段落或字段使用默认配置：
//!
//! ```toml
//! [simulation]
//! backend = "auto"        # auto | kinematic | direct | gui
//! tick_increment = 0.02
//! gravity = [0.0, 0.0, -10.0]
//! search_paths = ["assets"]
//!
//! [model]
//! ground = "plane.urdf"
//! robot = "mini_cheetah.urdf"
//! base_position = [0.0, 0.0, 0.5]
//!
//! [actuation]
//! delay_secs = 2.0
//! thigh_neutral = 0.5
//! knee_ratio = -1.9
//! velocity_scale = 2.0
//!
//! [playback]
//! pacing = "sleep"
//! ```

use crate::error::ControlError;
use crate::stance::NeutralStance;
use cheetah_driver::{Pacing, TickConfig};
use cheetah_model::Rad;
use cheetah_sim::Backend;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// 演示配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// 仿真世界参数
    pub simulation: SimulationSettings,

    /// 模型文件
    pub model: ModelSettings,

    /// 延时驱动参数
    pub actuation: ActuationSettings,

    /// 回放设置
    pub playback: PlaybackSettings,
}

/// 仿真世界参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// 仿真后端
    ///
    /// `auto` 在编译了 `bullet` feature 时打开 Bullet GUI 窗口，否则使用运动学后端。
    pub backend: Backend,

    /// 固定步长（秒）
    pub tick_increment: f64,

    /// 重力（m/s²）
    pub gravity: [f64; 3],

    /// 描述文件搜索路径
    ///
    /// 从文件加载时，相对路径按配置文件所在目录解析。
    pub search_paths: Vec<PathBuf>,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            backend: Backend::Auto,
            tick_increment: 1.0 / 50.0,
            gravity: [0.0, 0.0, -10.0],
            search_paths: vec![PathBuf::from("assets")],
        }
    }
}

/// 模型文件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    /// 地面模型（None 表示不加载）
    pub ground: Option<PathBuf>,

    /// 机器人模型
    pub robot: PathBuf,

    /// 机器人基座初始位置（m）
    pub base_position: [f64; 3],
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            ground: Some(PathBuf::from("plane.urdf")),
            robot: PathBuf::from("mini_cheetah.urdf"),
            base_position: [0.0, 0.0, 0.5],
        }
    }
}

/// 延时驱动参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActuationSettings {
    /// 触发时刻（仿真时间，秒）
    pub delay_secs: f64,

    /// 大腿目标角度（rad）
    pub thigh_neutral: f64,

    /// 膝关节角度 / 大腿角度
    pub knee_ratio: f64,

    /// 速度上限系数
    pub velocity_scale: f64,
}

impl Default for ActuationSettings {
    fn default() -> Self {
        let stance = NeutralStance::default();
        Self {
            delay_secs: 2.0,
            thigh_neutral: stance.thigh.0,
            knee_ratio: stance.knee_ratio,
            velocity_scale: stance.velocity_scale,
        }
    }
}

/// 回放设置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// 实时节奏
    pub pacing: Pacing,

    /// 最大步数（缺省为无限循环）
    pub max_ticks: Option<u64>,
}

impl DemoConfig {
    /// 从文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ControlError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ControlError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config = Self::from_toml_str(&content)?;
        if let Some(base) = path.parent() {
            config.simulation.search_paths = config
                .simulation
                .search_paths
                .into_iter()
                .map(|p| if p.is_relative() { base.join(p) } else { p })
                .collect();
        }

        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// 从 TOML 字符串解析并校验配置
    pub fn from_toml_str(content: &str) -> Result<Self, ControlError> {
        let config: DemoConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// 序列化为 TOML
    pub fn to_toml_string(&self) -> Result<String, ControlError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ControlError> {
        let path = path.as_ref();
        let content = self.to_toml_string()?;
        fs::write(path, content).map_err(|source| ControlError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// 校验配置
    pub fn validate(&self) -> Result<(), ControlError> {
        let sim = &self.simulation;
        if !sim.tick_increment.is_finite() || sim.tick_increment <= 0.0 {
            return Err(ControlError::InvalidConfig(format!(
                "simulation.tick_increment must be finite and > 0, got {}",
                sim.tick_increment
            )));
        }
        if sim.gravity.iter().any(|g| !g.is_finite()) {
            return Err(ControlError::InvalidConfig(format!(
                "simulation.gravity must be finite, got {:?}",
                sim.gravity
            )));
        }

        let act = &self.actuation;
        if !act.delay_secs.is_finite() || act.delay_secs < 0.0 {
            return Err(ControlError::InvalidConfig(format!(
                "actuation.delay_secs must be finite and >= 0, got {}",
                act.delay_secs
            )));
        }
        if !act.velocity_scale.is_finite() || act.velocity_scale < 0.0 {
            return Err(ControlError::InvalidConfig(format!(
                "actuation.velocity_scale must be finite and >= 0, got {}",
                act.velocity_scale
            )));
        }
        if !act.thigh_neutral.is_finite() || !act.knee_ratio.is_finite() {
            return Err(ControlError::InvalidConfig(
                "actuation.thigh_neutral and actuation.knee_ratio must be finite".to_string(),
            ));
        }

        if self.model.base_position.iter().any(|v| !v.is_finite()) {
            return Err(ControlError::InvalidConfig(format!(
                "model.base_position must be finite, got {:?}",
                self.model.base_position
            )));
        }
        Ok(())
    }

    /// 驱动器循环配置
    pub fn tick_config(&self) -> TickConfig {
        TickConfig {
            tick_increment: self.simulation.tick_increment,
            pacing: self.playback.pacing,
            max_ticks: self.playback.max_ticks,
        }
    }

    /// 站姿参数
    pub fn stance(&self) -> NeutralStance {
        NeutralStance {
            thigh: Rad(self.actuation.thigh_neutral),
            knee_ratio: self.actuation.knee_ratio,
            velocity_scale: self.actuation.velocity_scale,
        }
    }

    pub fn gravity(&self) -> Vector3<f64> {
        Vector3::from(self.simulation.gravity)
    }

    pub fn base_position(&self) -> Vector3<f64> {
        Vector3::from(self.model.base_position)
    }
}
