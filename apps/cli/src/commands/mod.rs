//! 命令定义和实现

pub mod joints;
pub mod run;

pub use joints::JointsCommand;
pub use run::RunCommand;
