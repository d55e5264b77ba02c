//! Tick Driver - 固定步长仿真循环
//!
//! 每个周期：
//!
//! 1. 让仿真器推进一个固定步长
//! 2. 仿真时钟加一步
//! 3. （可选）休眠约一个步长，便于人眼观察
//! 4. 检查所有延时触发器，到期则下发指令
//!
//! 单线程、同步执行。驱动器独占仿真句柄和时钟，
//! 除可选的节奏休眠外没有任何挂起点。
//!
//! # 示例
//!
//! ```rust,ignore
//! use cheetah_driver::{DelayedActuationTrigger, Pacing, TickConfig, TickDriver};
//!
//! let config = TickConfig {
//!     tick_increment: 1.0 / 50.0,
//!     pacing: Pacing::Sleep,
//!     max_ticks: None, // 无限循环，由外部终止进程
//! };
//! let mut driver = TickDriver::new(sim, config)?;
//! let mut triggers = [DelayedActuationTrigger::new(2.0, commands)?];
//! driver.run(robot, &mut triggers)?;
//! ```

use crate::clock::SimClock;
use crate::error::DriverError;
use crate::pacing::{Pacer, Pacing};
use crate::trigger::DelayedActuationTrigger;
use cheetah_sim::{BodyId, SimulationHandle};

/// 循环配置
#[derive(Debug, Clone, PartialEq)]
pub struct TickConfig {
    /// 固定步长（秒）
    ///
    /// 例如：1/50 表示每步 20ms 仿真时间
    pub tick_increment: f64,

    /// 实时回放节奏
    pub pacing: Pacing,

    /// 最大步数（None 表示无限循环）
    ///
    /// 用于测试或脚本化运行。
    pub max_ticks: Option<u64>,
}

impl Default for TickConfig {
    fn default() -> Self {
        TickConfig {
            tick_increment: 1.0 / 50.0, // 默认 50Hz
            pacing: Pacing::Sleep,
            max_ticks: None,
        }
    }
}

/// 一次运行的结果
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// 本次运行推进的步数
    pub ticks: u64,
    /// 运行结束时的仿真时间（秒）
    pub elapsed: f64,
    /// 每个触发器的触发步数（与传入顺序一致）
    pub fired_at: Vec<Option<u64>>,
}

/// 固定步长驱动器
#[derive(Debug)]
pub struct TickDriver<S: SimulationHandle> {
    sim: S,
    clock: SimClock,
    pacer: Pacer,
    max_ticks: Option<u64>,
}

impl<S: SimulationHandle> TickDriver<S> {
    /// 创建驱动器，并把步长同步到仿真器
    pub fn new(mut sim: S, config: TickConfig) -> Result<Self, DriverError> {
        let clock = SimClock::new(config.tick_increment)?;
        let pacer = Pacer::new(config.pacing, config.tick_increment)?;
        if config.tick_increment < 1e-4 {
            tracing::warn!(
                "Very small tick increment: {}s. Real-time pacing may not keep up.",
                config.tick_increment
            );
        }
        sim.set_time_step(config.tick_increment)?;
        tracing::info!(
            "Tick driver ready: {}s per tick, pacing {}, max ticks {:?}",
            config.tick_increment,
            config.pacing,
            config.max_ticks
        );
        Ok(Self {
            sim,
            clock,
            pacer,
            max_ticks: config.max_ticks,
        })
    }

    /// 推进一步
    ///
    /// 仿真器报错时原样返回，时钟不前进。返回推进后的步数。
    pub fn advance(&mut self) -> Result<u64, DriverError> {
        self.sim.step()?;
        self.clock.advance();
        self.pacer.pace();
        Ok(self.clock.ticks())
    }

    /// 运行循环
    ///
    /// 每步之后依次检查 `triggers`；到期的触发器向 `body` 下发指令。
    /// `max_ticks` 为 `None` 时不会正常返回，只能由外部终止进程或因错误退出。
    pub fn run(
        &mut self,
        body: BodyId,
        triggers: &mut [DelayedActuationTrigger],
    ) -> Result<RunSummary, DriverError> {
        let start_ticks = self.clock.ticks();

        loop {
            if let Some(max_ticks) = self.max_ticks
                && self.clock.ticks() - start_ticks >= max_ticks
            {
                break;
            }

            self.advance()?;

            for trigger in triggers.iter_mut() {
                trigger.poll(&self.clock, &mut self.sim, body)?;
            }
        }

        let summary = RunSummary {
            ticks: self.clock.ticks() - start_ticks,
            elapsed: self.clock.elapsed(),
            fired_at: triggers.iter().map(|t| t.fired_at()).collect(),
        };
        tracing::info!(
            "Run finished after {} ticks ({:.3}s simulated)",
            summary.ticks,
            summary.elapsed
        );
        Ok(summary)
    }

    /// 仿真时钟
    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    /// 仿真句柄
    pub fn sim(&self) -> &S {
        &self.sim
    }

    /// 仿真句柄（可变）
    pub fn sim_mut(&mut self) -> &mut S {
        &mut self.sim
    }

    /// 取回仿真句柄
    pub fn into_sim(self) -> S {
        self.sim
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_config_default() {
        let config = TickConfig::default();
        assert_eq!(config.tick_increment, 0.02);
        assert_eq!(config.pacing, Pacing::Sleep);
        assert_eq!(config.max_ticks, None);
    }
}
