//! 控制层错误类型

use cheetah_driver::DriverError;
use cheetah_model::ModelError;
use cheetah_sim::SimError;
use std::path::PathBuf;
use thiserror::Error;

/// 控制层错误
#[derive(Error, Debug)]
pub enum ControlError {
    /// 配置文件读写失败
    #[error("Failed to access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 配置文件解析失败
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// 配置序列化失败
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// 配置内容非法
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Simulation error: {0}")]
    Sim(#[from] SimError),

    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),
}

impl ControlError {
    /// 是否是未知关节错误（无论来自哪一层）
    pub fn is_unknown_joint(&self) -> bool {
        match self {
            ControlError::Sim(e) => e.is_unknown_joint(),
            ControlError::Driver(e) => e.is_unknown_joint(),
            _ => false,
        }
    }
}
