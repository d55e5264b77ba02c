//! 延时驱动触发器
//!
//! 保存一个仿真时间阈值和一组驱动指令。每步检查一次：
//! 第一次满足 `elapsed >= threshold` 时按顺序一次性下发全部指令，然后永久解除。
//!
//! # 比较方式
//!
//! 使用"达到或超过"而不是精确相等比较。相等比较只在步长恰好整除阈值时才会触发，
//! 对任意步长/阈值组合并不可靠。比较时允许 [`TIME_EPSILON`] 的容差，
//! 使数学上恰好等于阈值、但乘法舍入后低了 1 ulp 的时刻仍然在当步触发。
//!
//! # 示例
//!
//! ```rust
//! use cheetah_driver::{DelayedActuationTrigger, SimClock};
//!
//! let mut clock = SimClock::new(1.0 / 50.0).unwrap();
//! let mut trigger = DelayedActuationTrigger::new(2.0, Vec::new()).unwrap();
//!
//! let mut fired = Vec::new();
//! for _ in 0..500 {
//!     clock.advance();
//!     if trigger.take_due(&clock).is_some() {
//!         fired.push(clock.ticks());
//!     }
//! }
//! assert_eq!(fired, vec![100]);
//! ```

use crate::actuation::issue_commands;
use crate::clock::SimClock;
use crate::error::DriverError;
use cheetah_model::ActuationCommand;
use cheetah_sim::{BodyId, SimulationHandle};

/// 时间比较容差（秒）
pub const TIME_EPSILON: f64 = 1e-9;

/// 延时驱动触发器
#[derive(Debug, Clone)]
pub struct DelayedActuationTrigger {
    threshold: f64,
    commands: Vec<ActuationCommand>,
    fired_at: Option<u64>,
    label: Option<String>,
}

impl DelayedActuationTrigger {
    /// 创建新的触发器
    ///
    /// - `threshold`: 仿真时间阈值（秒），必须是有限非负数
    /// - `commands`: 触发时按此顺序下发的指令
    pub fn new(threshold: f64, commands: Vec<ActuationCommand>) -> Result<Self, DriverError> {
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(DriverError::InvalidConfig(format!(
                "Invalid trigger threshold: {} (must be finite and >= 0)",
                threshold
            )));
        }
        Ok(Self {
            threshold,
            commands,
            fired_at: None,
            label: None,
        })
    }

    /// 设置触发时输出的日志标签
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// 日志标签
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// 时间阈值（秒）
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// 待下发的指令
    pub fn commands(&self) -> &[ActuationCommand] {
        &self.commands
    }

    /// 是否仍处于待触发状态
    pub fn is_armed(&self) -> bool {
        self.fired_at.is_none()
    }

    /// 触发时的步数
    pub fn fired_at(&self) -> Option<u64> {
        self.fired_at
    }

    /// 当前时刻是否已达到阈值（不考虑是否已触发）
    #[inline]
    pub fn threshold_reached(&self, clock: &SimClock) -> bool {
        clock.elapsed() >= self.threshold - TIME_EPSILON
    }

    /// 如果到期则解除并返回待下发的指令
    ///
    /// 每个实例最多返回一次 `Some`。
    pub fn take_due(&mut self, clock: &SimClock) -> Option<&[ActuationCommand]> {
        if !self.is_armed() || !self.threshold_reached(clock) {
            return None;
        }
        self.fired_at = Some(clock.ticks());
        if let Some(label) = &self.label {
            tracing::info!("{}", label);
        }
        tracing::info!(
            "Actuation trigger fired at tick {} (elapsed {:.4}s >= {:.4}s), issuing {} commands",
            clock.ticks(),
            clock.elapsed(),
            self.threshold,
            self.commands.len()
        );
        Some(&self.commands)
    }

    /// 检查并在到期时向仿真器下发全部指令
    ///
    /// 返回本步是否触发。触发器在下发前就已解除，
    /// 因此批量下发中途失败时也不会在后续步重试。
    pub fn poll<S>(
        &mut self,
        clock: &SimClock,
        sim: &mut S,
        body: BodyId,
    ) -> Result<bool, DriverError>
    where
        S: SimulationHandle + ?Sized,
    {
        match self.take_due(clock) {
            Some(commands) => {
                issue_commands(sim, body, commands)?;
                Ok(true)
            },
            None => Ok(false),
        }
    }
}
