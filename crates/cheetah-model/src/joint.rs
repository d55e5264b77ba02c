//! 关节描述
//!
//! 关节由加载顺序分配的 [`JointIndex`] 标识，模型加载完成后只读。

use crate::units::{Rad, RadPerSec};
use nalgebra::Vector3;
use std::fmt;

/// 关节索引（按描述文件中出现的顺序分配，从 0 开始）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JointIndex(pub usize);

impl JointIndex {
    /// 获取原始索引
    #[inline]
    pub const fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for JointIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<usize> for JointIndex {
    fn from(index: usize) -> Self {
        JointIndex(index)
    }
}

/// 关节类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum JointKind {
    /// 有限位的转动关节
    Revolute,
    /// 无限位的转动关节
    Continuous,
    /// 平移关节
    Prismatic,
    /// 固定关节（不可驱动）
    Fixed,
}

impl JointKind {
    /// 从 URDF `type` 属性解析
    pub fn from_urdf(value: &str) -> Option<Self> {
        match value {
            "revolute" => Some(JointKind::Revolute),
            "continuous" => Some(JointKind::Continuous),
            "prismatic" => Some(JointKind::Prismatic),
            "fixed" => Some(JointKind::Fixed),
            _ => None,
        }
    }

    /// URDF 中使用的名称
    pub const fn as_str(self) -> &'static str {
        match self {
            JointKind::Revolute => "revolute",
            JointKind::Continuous => "continuous",
            JointKind::Prismatic => "prismatic",
            JointKind::Fixed => "fixed",
        }
    }

    /// 是否可被控制器驱动
    #[inline]
    pub const fn is_actuated(self) -> bool {
        !matches!(self, JointKind::Fixed)
    }
}

impl fmt::Display for JointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 关节限位（来自 `<limit>` 元素）
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JointLimits {
    /// 位置下限
    pub lower: Rad,
    /// 位置上限
    pub upper: Rad,
    /// 速度上限（0 表示未指定）
    pub velocity: RadPerSec,
}

impl JointLimits {
    /// 位置是否有效（上下限都为 0 时 URDF 视为不限位）
    pub fn bounds_position(&self) -> bool {
        self.lower.0 < self.upper.0
    }

    /// 将目标位置限制在限位内
    pub fn clamp_position(&self, position: Rad) -> Rad {
        if self.bounds_position() {
            position.clamp(self.lower, self.upper)
        } else {
            position
        }
    }
}

/// 单个关节的只读信息
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JointInfo {
    /// 关节索引
    pub index: JointIndex,
    /// 关节名称
    pub name: String,
    /// 关节类型
    pub kind: JointKind,
    /// 运动轴（单位向量）
    pub axis: Vector3<f64>,
    /// 父连杆名称
    pub parent_link: String,
    /// 子连杆名称
    pub child_link: String,
    /// 限位（可选）
    pub limits: Option<JointLimits>,
}

impl JointInfo {
    /// 是否可被控制器驱动
    #[inline]
    pub fn is_actuated(&self) -> bool {
        self.kind.is_actuated()
    }
}

impl fmt::Display for JointInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({}, axis [{:.1}, {:.1}, {:.1}], {} -> {})",
            self.index,
            self.name,
            self.kind,
            self.axis.x,
            self.axis.y,
            self.axis.z,
            self.parent_link,
            self.child_link,
        )
    }
}
