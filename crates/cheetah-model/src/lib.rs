//! # Cheetah Model
//!
//! 四足机器人仿真驱动的数据模型层（无状态）。
//!
//! ## 包含模块
//!
//! - `units` - 强类型单位（`Rad`、`RadPerSec`）
//! - `joint` - 关节描述（索引、类型、运动轴、限位）
//! - `command` - 驱动指令（`ActuationCommand`、`ControlMode`）
//! - `urdf` - URDF 描述文件加载
//! - `role` - 关节角色到索引的查找表

pub mod command;
mod error;
pub mod joint;
pub mod role;
pub mod units;
pub mod urdf;

// 重新导出常用类型
pub use command::{ActuationCommand, ControlMode};
pub use error::ModelError;
pub use joint::{JointIndex, JointInfo, JointKind, JointLimits};
pub use role::{JointRole, Leg, LegSegment, RoleMap, RoleNaming};
pub use units::{Rad, RadPerSec};
pub use urdf::RobotModel;
