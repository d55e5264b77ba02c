//! 关节角色映射
//!
//! 控制逻辑按"左前腿膝关节"这样的角色寻址，而不是硬编码关节索引。
//! 角色在模型加载后通过名称一次性解析为 [`JointIndex`]，
//! 之后控制代码与具体模型的关节顺序解耦。
//!
//! # 示例
//!
//! ```rust,no_run
//! use cheetah_model::{Leg, LegSegment, JointRole, RobotModel, RoleMap, RoleNaming};
//!
//! # fn example() -> Result<(), cheetah_model::ModelError> {
//! let model = RobotModel::from_urdf_file("assets/mini_cheetah.urdf")?;
//! let roles = RoleMap::from_model(&model, &RoleNaming::mini_cheetah())?;
//!
//! let knee = roles.index(JointRole::new(Leg::FrontLeft, LegSegment::Knee));
//! println!("front-left knee is joint {}", knee);
//! # Ok(())
//! # }
//! ```

use crate::error::ModelError;
use crate::joint::{JointIndex, JointInfo};
use crate::urdf::RobotModel;
use std::fmt;

/// 腿
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Leg {
    /// 右前
    FrontRight,
    /// 左前
    FrontLeft,
    /// 右后
    HindRight,
    /// 左后
    HindLeft,
}

impl Leg {
    /// 全部四条腿（与 mini cheetah 描述文件中的顺序一致）
    pub const ALL: [Leg; 4] = [Leg::FrontRight, Leg::FrontLeft, Leg::HindRight, Leg::HindLeft];

    /// 短名称（fr/fl/hr/hl）
    pub const fn short_name(self) -> &'static str {
        match self {
            Leg::FrontRight => "fr",
            Leg::FrontLeft => "fl",
            Leg::HindRight => "hr",
            Leg::HindLeft => "hl",
        }
    }
}

/// 腿上的关节段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LegSegment {
    /// 髋外展（躯干 -> 外展连杆）
    Abduction,
    /// 髋俯仰（外展连杆 -> 大腿）
    Hip,
    /// 膝关节（大腿 -> 小腿）
    Knee,
    /// 足端（固定关节）
    Toe,
}

impl LegSegment {
    /// 全部关节段（按腿内顺序）
    pub const ALL: [LegSegment; 4] = [
        LegSegment::Abduction,
        LegSegment::Hip,
        LegSegment::Knee,
        LegSegment::Toe,
    ];

    /// 名称
    pub const fn name(self) -> &'static str {
        match self {
            LegSegment::Abduction => "abduction",
            LegSegment::Hip => "hip",
            LegSegment::Knee => "knee",
            LegSegment::Toe => "toe",
        }
    }
}

/// 关节角色（腿 + 关节段）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JointRole {
    pub leg: Leg,
    pub segment: LegSegment,
}

impl JointRole {
    /// 创建新的关节角色
    pub const fn new(leg: Leg, segment: LegSegment) -> Self {
        Self { leg, segment }
    }

    /// 全部 16 个角色（腿优先）
    pub fn all() -> impl Iterator<Item = JointRole> {
        Leg::ALL.into_iter().flat_map(|leg| {
            LegSegment::ALL
                .into_iter()
                .map(move |segment| JointRole::new(leg, segment))
        })
    }
}

impl fmt::Display for JointRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.leg.short_name(), self.segment.name())
    }
}

/// 角色到关节名称的命名约定
pub struct RoleNaming {
    name_of: Box<dyn Fn(JointRole) -> String + Send + Sync>,
}

impl RoleNaming {
    /// 使用自定义命名函数
    pub fn new<F>(name_of: F) -> Self
    where
        F: Fn(JointRole) -> String + Send + Sync + 'static,
    {
        Self {
            name_of: Box::new(name_of),
        }
    }

    /// mini cheetah 描述文件的命名约定
    ///
    /// | 关节段 | 名称 |
    /// |---|---|
    /// | abduction | `torso_to_abduct_{leg}_j` |
    /// | hip | `abduct_{leg}_to_thigh_{leg}_j` |
    /// | knee | `thigh_{leg}_to_knee_{leg}_j` |
    /// | toe | `toe_{leg}_joint` |
    pub fn mini_cheetah() -> Self {
        Self::new(|role| {
            let leg = role.leg.short_name();
            match role.segment {
                LegSegment::Abduction => format!("torso_to_abduct_{leg}_j"),
                LegSegment::Hip => format!("abduct_{leg}_to_thigh_{leg}_j"),
                LegSegment::Knee => format!("thigh_{leg}_to_knee_{leg}_j"),
                LegSegment::Toe => format!("toe_{leg}_joint"),
            }
        })
    }

    /// 角色对应的关节名称
    pub fn joint_name(&self, role: JointRole) -> String {
        (self.name_of)(role)
    }
}

impl fmt::Debug for RoleNaming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoleNaming").finish_non_exhaustive()
    }
}

/// 已解析的角色 -> 关节索引查找表
///
/// 按 `[腿][关节段]` 存储，只能由 [`RoleMap::resolve`] 构造，
/// 构造成功即每个角色都有索引。
#[derive(Debug, Clone, PartialEq)]
pub struct RoleMap {
    indices: [[JointIndex; 4]; 4],
}

impl RoleMap {
    /// 对模型解析全部 16 个角色
    pub fn from_model(model: &RobotModel, naming: &RoleNaming) -> Result<Self, ModelError> {
        Self::resolve(model.joints(), naming)
    }

    /// 对关节表解析全部 16 个角色
    ///
    /// 任意角色缺失都视为加载错误。
    pub fn resolve(joints: &[JointInfo], naming: &RoleNaming) -> Result<Self, ModelError> {
        let mut indices = [[JointIndex(0); 4]; 4];
        for role in JointRole::all() {
            let expected = naming.joint_name(role);
            let joint = joints
                .iter()
                .find(|j| j.name == expected)
                .ok_or_else(|| ModelError::RoleNotFound {
                    role: role.to_string(),
                    expected: expected.clone(),
                })?;
            tracing::debug!("Resolved role {} -> {} {}", role, joint.index, joint.name);
            indices[role.leg as usize][role.segment as usize] = joint.index;
        }
        Ok(Self { indices })
    }

    /// 查询角色对应的关节索引
    pub fn index(&self, role: JointRole) -> JointIndex {
        self.indices[role.leg as usize][role.segment as usize]
    }

    /// 某一关节段在四条腿上的索引（按 [`Leg::ALL`] 顺序）
    pub fn segment(&self, segment: LegSegment) -> [JointIndex; 4] {
        Leg::ALL.map(|leg| self.index(JointRole::new(leg, segment)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quadruped_urdf() -> String {
        let mut xml = String::from("<robot name=\"quad\">\n<link name=\"body\"/>\n");
        let naming = RoleNaming::mini_cheetah();
        for role in JointRole::all() {
            let child = format!("{}_{}", role.leg.short_name(), role.segment.name());
            let kind = if role.segment == LegSegment::Toe {
                "fixed"
            } else {
                "revolute"
            };
            xml.push_str(&format!(
                "<link name=\"{child}\"/>\n<joint name=\"{}\" type=\"{kind}\">\
                 <parent link=\"body\"/><child link=\"{child}\"/><axis xyz=\"0 1 0\"/></joint>\n",
                naming.joint_name(role)
            ));
        }
        xml.push_str("</robot>");
        xml
    }

    #[test]
    fn test_mini_cheetah_naming() {
        let naming = RoleNaming::mini_cheetah();
        assert_eq!(
            naming.joint_name(JointRole::new(Leg::FrontRight, LegSegment::Knee)),
            "thigh_fr_to_knee_fr_j"
        );
        assert_eq!(
            naming.joint_name(JointRole::new(Leg::HindLeft, LegSegment::Hip)),
            "abduct_hl_to_thigh_hl_j"
        );
        assert_eq!(
            naming.joint_name(JointRole::new(Leg::FrontLeft, LegSegment::Toe)),
            "toe_fl_joint"
        );
    }

    #[test]
    fn test_resolve_matches_load_order() {
        let model = RobotModel::from_urdf_str(&quadruped_urdf()).unwrap();
        let roles = RoleMap::from_model(&model, &RoleNaming::mini_cheetah()).unwrap();

        // 每条腿 4 个关节：abduction, hip, knee, toe
        assert_eq!(
            roles.segment(LegSegment::Knee),
            [JointIndex(2), JointIndex(6), JointIndex(10), JointIndex(14)]
        );
        assert_eq!(
            roles.segment(LegSegment::Hip),
            [JointIndex(1), JointIndex(5), JointIndex(9), JointIndex(13)]
        );
    }

    #[test]
    fn test_every_role_has_its_own_index() {
        let model = RobotModel::from_urdf_str(&quadruped_urdf()).unwrap();
        let roles = RoleMap::resolve(model.joints(), &RoleNaming::mini_cheetah()).unwrap();
        let naming = RoleNaming::mini_cheetah();

        for role in JointRole::all() {
            let index = roles.index(role);
            assert_eq!(model.joints()[index.0].name, naming.joint_name(role));
        }
    }

    #[test]
    fn test_resolve_missing_role() {
        let xml = quadruped_urdf().replace("thigh_hl_to_knee_hl_j", "knee_hl_renamed");
        let model = RobotModel::from_urdf_str(&xml).unwrap();
        let err = RoleMap::resolve(model.joints(), &RoleNaming::mini_cheetah()).unwrap_err();
        match err {
            ModelError::RoleNotFound { role, expected } => {
                assert_eq!(role, "hl knee");
                assert_eq!(expected, "thigh_hl_to_knee_hl_j");
            },
            other => panic!("Expected RoleNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_all_roles_unique() {
        let roles: Vec<_> = JointRole::all().collect();
        assert_eq!(roles.len(), 16);
        let unique: std::collections::HashSet<_> = roles.iter().collect();
        assert_eq!(unique.len(), 16);
    }
}
