//! # Cheetah Control
//!
//! 演示层：配置加载、中立站姿和完整的 hello-cheetah 流程。
//!
//! - [`DemoConfig`] - TOML 配置
//! - [`NeutralStance`] - 先膝后髋的站姿指令
//! - [`Demo`] - 加载场景、挂载延时触发器并运行 Tick Driver

pub mod config;
pub mod demo;
mod error;
pub mod stance;

pub use config::{
    ActuationSettings, DemoConfig, ModelSettings, PlaybackSettings, SimulationSettings,
};
pub use demo::{BENDING_LABEL, Demo, DemoReport, Scene};
pub use error::ControlError;
pub use stance::NeutralStance;
