//! 仿真时钟
//!
//! 仿真时间 = 步数 × 固定步长。每次计算都用乘法而非累加，
//! 因此任意步数下都不会积累浮点漂移：`elapsed(n)` 与 `n as f64 * step`
//! 逐位相同，误差仅来自这一次乘法的舍入（≤ 0.5 ulp）。

use crate::error::DriverError;
use std::time::Duration;

/// 仿真时钟
///
/// 只能一次前进一步，不能回拨。
#[derive(Debug, Clone, PartialEq)]
pub struct SimClock {
    tick_increment: f64,
    ticks: u64,
}

impl SimClock {
    /// 创建新的时钟（步数为 0）
    ///
    /// `tick_increment` 必须是有限正数。
    pub fn new(tick_increment: f64) -> Result<Self, DriverError> {
        if !tick_increment.is_finite() || tick_increment <= 0.0 {
            return Err(DriverError::InvalidConfig(format!(
                "Invalid tick_increment: {} (must be finite and > 0)",
                tick_increment
            )));
        }
        Ok(Self {
            tick_increment,
            ticks: 0,
        })
    }

    /// 前进一步
    #[inline]
    pub fn advance(&mut self) {
        self.ticks += 1;
    }

    /// 已前进的步数
    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// 固定步长（秒）
    #[inline]
    pub fn tick_increment(&self) -> f64 {
        self.tick_increment
    }

    /// 已经过的仿真时间（秒）
    #[inline]
    pub fn elapsed(&self) -> f64 {
        self.elapsed_at(self.ticks)
    }

    /// 第 `ticks` 步时的仿真时间（秒）
    #[inline]
    pub fn elapsed_at(&self, ticks: u64) -> f64 {
        ticks as f64 * self.tick_increment
    }

    /// 已经过的仿真时间（`Duration`）
    ///
    /// 超出 `Duration` 表示范围时返回 `None`。
    pub fn elapsed_duration(&self) -> Option<Duration> {
        Duration::try_from_secs_f64(self.elapsed()).ok()
    }
}
