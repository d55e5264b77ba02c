//! 驱动层模块
//!
//! 本模块提供"固定步长仿真 + 延时一次性驱动指令"的最小驱动器，包括：
//! - 仿真时钟（步数 × 步长，无累加漂移）
//! - Tick Driver（推进仿真、可选实时节奏）
//! - 延时驱动触发器（达到阈值后一次性下发，永久解除）
//! - 驱动指令下发（位置跟踪模式）
//!
//! # 使用场景
//!
//! 仿真器通过 [`cheetah_sim::SimulationHandle`] 接入；
//! 完整的演示流程参见 `cheetah-control` crate。

pub mod actuation;
pub mod clock;
pub mod driver;
mod error;
pub mod pacing;
pub mod trigger;

pub use actuation::{issue_command, issue_commands};
pub use clock::SimClock;
pub use driver::{RunSummary, TickConfig, TickDriver};
pub use error::DriverError;
pub use pacing::{Pacer, Pacing};
pub use trigger::{DelayedActuationTrigger, TIME_EPSILON};
