//! 强类型单位系统
//!
//! 使用 NewType 模式区分关节角度与角速度，防止在下发指令时把两者传反。
//!
//! # 示例
//!
//! ```rust
//! use cheetah_model::units::{Rad, RadPerSec};
//!
//! let thigh = Rad(0.5);
//! let knee = thigh * -1.9;
//! assert!((knee.0 + 0.95).abs() < 1e-12);
//!
//! // 速度上限按角度幅值缩放
//! let max_velocity = RadPerSec(2.0 * knee.abs().0);
//! assert!((max_velocity.0 - 1.9).abs() < 1e-12);
//! ```

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

/// 弧度（NewType）
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rad(pub f64);

impl Rad {
    /// 零弧度常量
    pub const ZERO: Self = Rad(0.0);

    /// 创建新的弧度值
    #[inline]
    pub const fn new(value: f64) -> Self {
        Rad(value)
    }

    /// 获取原始值
    #[inline]
    pub fn value(self) -> f64 {
        self.0
    }

    /// 取绝对值
    #[inline]
    pub fn abs(self) -> Self {
        Rad(self.0.abs())
    }

    /// 转换为角度值（仅用于日志显示）
    #[inline]
    pub fn to_degrees(self) -> f64 {
        self.0.to_degrees()
    }

    /// 限制范围
    #[inline]
    pub fn clamp(self, min: Self, max: Self) -> Self {
        Rad(self.0.clamp(min.0, max.0))
    }
}

impl fmt::Display for Rad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4} rad", self.0)
    }
}

impl Add for Rad {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Rad(self.0 + rhs.0)
    }
}

impl Sub for Rad {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Rad(self.0 - rhs.0)
    }
}

impl Mul<f64> for Rad {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: f64) -> Self {
        Rad(self.0 * rhs)
    }
}

impl Neg for Rad {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Rad(-self.0)
    }
}

/// 角速度（rad/s，NewType）
///
/// 作为速度上限使用时只关心幅值，见 [`RadPerSec::magnitude`]。
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RadPerSec(pub f64);

impl RadPerSec {
    /// 零速度常量
    pub const ZERO: Self = RadPerSec(0.0);

    /// 创建新的角速度值
    #[inline]
    pub const fn new(value: f64) -> Self {
        RadPerSec(value)
    }

    /// 获取原始值
    #[inline]
    pub fn value(self) -> f64 {
        self.0
    }

    /// 速度幅值（忽略符号）
    #[inline]
    pub fn magnitude(self) -> f64 {
        self.0.abs()
    }

    /// 在 `dt` 秒内最多转过的角度
    #[inline]
    pub fn over(self, dt: f64) -> Rad {
        Rad(self.magnitude() * dt)
    }
}

impl fmt::Display for RadPerSec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4} rad/s", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_rad_arithmetic() {
        let a = Rad(0.5);
        let b = Rad(0.25);
        assert_eq!(a + b, Rad(0.75));
        assert_eq!(a - b, Rad(0.25));
        assert_eq!(-a, Rad(-0.5));
        assert_relative_eq!((a * -1.9).0, -0.95);
    }

    #[test]
    fn test_rad_display() {
        assert_eq!(format!("{}", Rad(0.5)), "0.5000 rad");
        assert_eq!(format!("{}", RadPerSec(-1.9)), "-1.9000 rad/s");
    }

    #[test]
    fn test_velocity_magnitude() {
        let v = RadPerSec(-1.9);
        assert_relative_eq!(v.magnitude(), 1.9);
        assert_relative_eq!(v.over(0.02).0, 0.038);
    }

    #[test]
    fn test_rad_clamp() {
        let r = Rad(2.0).clamp(Rad(-1.0), Rad(1.0));
        assert_eq!(r, Rad(1.0));
    }

    proptest! {
        /// 单步最大转角与速度符号无关
        #[test]
        fn step_bound_ignores_sign(v in -100.0..100.0f64, dt in 0.0001..1.0f64) {
            prop_assert_eq!(RadPerSec(v).over(dt), RadPerSec(-v).over(dt));
            prop_assert!(RadPerSec(v).over(dt).0 >= 0.0);
        }

        #[test]
        fn clamp_stays_in_range(x in -10.0..10.0f64, lo in -5.0..0.0f64, hi in 0.0..5.0f64) {
            let r = Rad(x).clamp(Rad(lo), Rad(hi));
            prop_assert!(r >= Rad(lo) && r <= Rad(hi));
        }
    }
}
