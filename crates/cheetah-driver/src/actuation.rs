//! 驱动指令下发
//!
//! 以位置跟踪模式把一批 [`ActuationCommand`] 发给仿真器。
//! 指令是"发出即不管"的：之后关节的实际轨迹完全由仿真器内部控制器决定，
//! 这里不跟踪也不修正。

use crate::error::DriverError;
use cheetah_model::{ActuationCommand, ControlMode};
use cheetah_sim::{BodyId, SimulationHandle};

/// 按调用方给定的顺序下发一批指令
///
/// 遇到第一个错误立即返回（例如无效关节索引的 `UnknownJoint`），
/// 之前已下发的指令不会回滚。
pub fn issue_commands<S>(
    sim: &mut S,
    body: BodyId,
    commands: &[ActuationCommand],
) -> Result<(), DriverError>
where
    S: SimulationHandle + ?Sized,
{
    for command in commands {
        issue_command(sim, body, command)?;
    }
    Ok(())
}

/// 下发单条指令
pub fn issue_command<S>(
    sim: &mut S,
    body: BodyId,
    command: &ActuationCommand,
) -> Result<(), DriverError>
where
    S: SimulationHandle + ?Sized,
{
    tracing::debug!("Issuing {} on {}", command, body);
    sim.set_joint_target(
        body,
        command.joint,
        ControlMode::Position,
        command.target,
        command.max_velocity,
    )?;
    Ok(())
}
