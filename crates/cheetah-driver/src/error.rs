//! 驱动层错误类型定义

use cheetah_sim::SimError;
use thiserror::Error;

/// 驱动层错误类型
///
/// 仿真器返回的错误一律视为致命错误，原样向上传播，不做重试。
#[derive(Error, Debug)]
pub enum DriverError {
    /// 仿真器错误
    #[error("Simulation error: {0}")]
    Sim(#[from] SimError),

    /// 无效配置
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl DriverError {
    /// 是否为关节索引越界错误
    pub fn is_unknown_joint(&self) -> bool {
        matches!(self, DriverError::Sim(e) if e.is_unknown_joint())
    }
}
