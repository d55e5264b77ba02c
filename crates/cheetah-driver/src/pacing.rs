//! 实时回放节奏控制
//!
//! 每步之后休眠约一个步长，使仿真以接近真实时间的速度播放，便于人眼观察。
//! 节奏控制纯属显示效果，不影响仿真时间。

use crate::error::DriverError;
use serde::{Deserialize, Serialize};
use spin_sleep::SpinSleeper;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// 节奏模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pacing {
    /// 不休眠，尽快推进
    Off,
    /// `std::thread::sleep`
    #[default]
    Sleep,
    /// `spin_sleep`（更低抖动，占用更多 CPU）
    Spin,
}

impl Pacing {
    pub const fn as_str(self) -> &'static str {
        match self {
            Pacing::Off => "off",
            Pacing::Sleep => "sleep",
            Pacing::Spin => "spin",
        }
    }
}

impl fmt::Display for Pacing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Pacing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "off" => Ok(Pacing::Off),
            "sleep" => Ok(Pacing::Sleep),
            "spin" => Ok(Pacing::Spin),
            other => Err(format!(
                "unknown pacing mode {:?} (expected off, sleep or spin)",
                other
            )),
        }
    }
}

/// 节奏控制器
#[derive(Debug, Clone)]
pub struct Pacer {
    mode: Pacing,
    period: Duration,
    sleeper: SpinSleeper,
}

impl Pacer {
    /// 以 `tick_increment` 秒为周期创建节奏控制器
    ///
    /// 步长无法表示为 `Duration`（负数、NaN 或过大）时返回错误，
    /// 与节奏模式无关。
    pub fn new(mode: Pacing, tick_increment: f64) -> Result<Self, DriverError> {
        let period = Duration::try_from_secs_f64(tick_increment).map_err(|e| {
            DriverError::InvalidConfig(format!(
                "tick_increment {}s cannot be used as a pacing period: {}",
                tick_increment, e
            ))
        })?;
        Ok(Self {
            mode,
            period,
            sleeper: SpinSleeper::default(),
        })
    }

    /// 节奏模式
    pub fn mode(&self) -> Pacing {
        self.mode
    }

    /// 每步休眠时长
    pub fn period(&self) -> Duration {
        self.period
    }

    /// 休眠约一个步长
    pub fn pace(&self) {
        match self.mode {
            Pacing::Off => {},
            Pacing::Sleep => std::thread::sleep(self.period),
            Pacing::Spin => self.sleeper.sleep(self.period),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_pacing_from_str() {
        assert_eq!("off".parse::<Pacing>().unwrap(), Pacing::Off);
        assert_eq!("SLEEP".parse::<Pacing>().unwrap(), Pacing::Sleep);
        assert_eq!("spin".parse::<Pacing>().unwrap(), Pacing::Spin);
        assert!("realtime".parse::<Pacing>().is_err());
        assert!("none".parse::<Pacing>().is_err());
    }

    #[test]
    fn test_pacing_names_match_config_names() {
        #[derive(Deserialize)]
        struct Playback {
            pacing: Pacing,
        }

        for mode in [Pacing::Off, Pacing::Sleep, Pacing::Spin] {
            let text = format!("pacing = \"{}\"", mode);
            let parsed: Playback = toml::from_str(&text).unwrap();
            assert_eq!(parsed.pacing, mode);
        }
        assert!(toml::from_str::<Playback>("pacing = \"none\"").is_err());
    }

    #[test]
    fn test_pacing_display_roundtrip() {
        for mode in [Pacing::Off, Pacing::Sleep, Pacing::Spin] {
            assert_eq!(mode.to_string().parse::<Pacing>().unwrap(), mode);
        }
    }

    #[test]
    fn test_pacer_period() {
        let pacer = Pacer::new(Pacing::Sleep, 0.02).unwrap();
        assert_eq!(pacer.period(), Duration::from_millis(20));
        assert_eq!(pacer.mode(), Pacing::Sleep);
    }

    #[test]
    fn test_pacer_sleeps_at_least_period() {
        for mode in [Pacing::Sleep, Pacing::Spin] {
            let pacer = Pacer::new(mode, 0.005).unwrap();
            let start = Instant::now();
            pacer.pace();
            assert!(start.elapsed() >= Duration::from_millis(5), "{:?}", mode);
        }
    }

    #[test]
    fn test_pacer_rejects_unrepresentable_period() {
        for mode in [Pacing::Off, Pacing::Sleep, Pacing::Spin] {
            match Pacer::new(mode, 1e30) {
                Err(DriverError::InvalidConfig(msg)) => assert!(msg.contains("tick_increment")),
                other => panic!("Expected InvalidConfig, got {:?}", other),
            }
        }
        assert!(Pacer::new(Pacing::Off, f64::NAN).is_err());
    }

    #[test]
    fn test_off_does_not_sleep() {
        let pacer = Pacer::new(Pacing::Off, 10.0).unwrap();
        let start = Instant::now();
        pacer.pace();
        assert!(start.elapsed() < Duration::from_secs(1));
    }
}
