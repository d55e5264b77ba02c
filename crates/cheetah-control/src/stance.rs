//! 中立站姿
//!
//! 大腿（髋俯仰）抬到 `thigh`，膝关节弯到 `knee_ratio × thigh`。
//! 生成的指令先是四个膝关节，再是四个髋关节，腿序为 [`Leg::ALL`]。

use cheetah_model::{ActuationCommand, JointIndex, Leg, LegSegment, Rad, RadPerSec, RoleMap};

/// 中立站姿参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeutralStance {
    /// 大腿目标角度
    pub thigh: Rad,
    /// 膝关节角度 / 大腿角度
    pub knee_ratio: f64,
    /// 速度上限 = `velocity_scale × |目标角度|`（rad/s）
    pub velocity_scale: f64,
}

impl Default for NeutralStance {
    fn default() -> Self {
        Self {
            thigh: Rad(0.5),
            knee_ratio: -1.9,
            velocity_scale: 2.0,
        }
    }
}

impl NeutralStance {
    /// 膝关节目标角度
    pub fn knee(&self) -> Rad {
        self.thigh * self.knee_ratio
    }

    fn command(&self, joint: JointIndex, target: Rad) -> ActuationCommand {
        ActuationCommand::new(joint, target, RadPerSec(self.velocity_scale * target.abs().0))
    }

    /// 生成站姿指令（先膝后髋）
    pub fn commands(&self, roles: &RoleMap) -> Vec<ActuationCommand> {
        let knee = self.knee();
        let knees = roles
            .segment(LegSegment::Knee)
            .into_iter()
            .map(|joint| self.command(joint, knee));
        let hips = roles
            .segment(LegSegment::Hip)
            .into_iter()
            .map(|joint| self.command(joint, self.thigh));
        let commands: Vec<_> = knees.chain(hips).collect();

        tracing::debug!(
            "Neutral stance: thigh {}, knee {}, {} commands over {} legs",
            self.thigh,
            knee,
            commands.len(),
            Leg::ALL.len()
        );
        commands
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use cheetah_model::{JointInfo, JointKind, JointRole, RoleNaming};
    use nalgebra::Vector3;

    /// 按 mini cheetah 的加载顺序构造 16 个关节
    fn mini_cheetah_joints() -> Vec<JointInfo> {
        let naming = RoleNaming::mini_cheetah();
        JointRole::all()
            .enumerate()
            .map(|(i, role)| JointInfo {
                index: JointIndex(i),
                name: naming.joint_name(role),
                kind: JointKind::Continuous,
                axis: Vector3::x(),
                parent_link: "body".to_string(),
                child_link: format!("link_{i}"),
                limits: None,
            })
            .collect()
    }

    #[test]
    fn test_default_stance() {
        let stance = NeutralStance::default();
        assert_eq!(stance.thigh, Rad(0.5));
        assert_relative_eq!(stance.knee().0, -0.95);
    }

    #[test]
    fn test_commands_knees_then_hips() {
        let roles = RoleMap::resolve(&mini_cheetah_joints(), &RoleNaming::mini_cheetah()).unwrap();
        let commands = NeutralStance::default().commands(&roles);

        let joints: Vec<usize> = commands.iter().map(|c| c.joint.0).collect();
        assert_eq!(joints, vec![2, 6, 10, 14, 1, 5, 9, 13]);

        for knee in &commands[..4] {
            assert_relative_eq!(knee.target.0, -0.95);
            assert_relative_eq!(knee.max_velocity.0, 1.9);
        }
        for hip in &commands[4..] {
            assert_relative_eq!(hip.target.0, 0.5);
            assert_relative_eq!(hip.max_velocity.0, 1.0);
        }
    }

    #[test]
    fn test_custom_stance() {
        let roles = RoleMap::resolve(&mini_cheetah_joints(), &RoleNaming::mini_cheetah()).unwrap();
        let stance = NeutralStance {
            thigh: Rad(-0.4),
            knee_ratio: 2.0,
            velocity_scale: 0.5,
        };
        let commands = stance.commands(&roles);
        assert_relative_eq!(commands[0].target.0, -0.8);
        assert_relative_eq!(commands[0].max_velocity.0, 0.4);
        assert_relative_eq!(commands[7].target.0, -0.4);
        assert_relative_eq!(commands[7].max_velocity.0, 0.2);
    }
}
