//! 使用 mini cheetah 描述文件的运动学后端集成测试

use cheetah_model::{ControlMode, JointIndex, JointKind, Rad, RadPerSec};
use cheetah_sim::{BodyId, KinematicSim, SimError, SimulationHandle};
use nalgebra::Vector3;
use std::path::{Path, PathBuf};

fn assets_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../assets")
}

fn load_cheetah() -> (KinematicSim, BodyId) {
    let mut sim = KinematicSim::connect().unwrap();
    sim.add_search_path(assets_dir());
    sim.set_gravity(Vector3::new(0.0, 0.0, -10.0)).unwrap();
    let plane = sim
        .load_model(Path::new("plane.urdf"), Vector3::zeros())
        .unwrap();
    let robot = sim
        .load_model(Path::new("mini_cheetah.urdf"), Vector3::new(0.0, 0.0, 0.5))
        .unwrap();
    assert_eq!(plane, BodyId(0));
    assert_eq!(sim.joint_count(plane).unwrap(), 0);
    (sim, robot)
}

#[test]
fn test_cheetah_has_sixteen_joints_twelve_actuated() {
    let (sim, robot) = load_cheetah();
    let infos = sim.joint_infos(robot).unwrap();
    assert_eq!(infos.len(), 16);
    assert_eq!(infos.iter().filter(|j| j.is_actuated()).count(), 12);

    // 每条腿最后一个关节是固定的足端关节
    for leg in 0..4 {
        let toe = &infos[leg * 4 + 3];
        assert_eq!(toe.kind, JointKind::Fixed);
        assert!(toe.name.starts_with("toe_"));
    }
}

#[test]
fn test_known_joints_never_fail() {
    let (mut sim, robot) = load_cheetah();
    let count = sim.joint_count(robot).unwrap();
    for i in 0..count {
        sim.set_joint_target(
            robot,
            JointIndex(i),
            ControlMode::Position,
            Rad(0.3),
            RadPerSec(1.0),
        )
        .unwrap();
    }
}

#[test]
fn test_out_of_range_joints_always_fail() {
    let (mut sim, robot) = load_cheetah();
    for i in [16, 17, 100, usize::MAX] {
        let err = sim
            .set_joint_target(
                robot,
                JointIndex(i),
                ControlMode::Position,
                Rad(0.3),
                RadPerSec(1.0),
            )
            .unwrap_err();
        match err {
            SimError::UnknownJoint {
                body,
                index,
                joint_count,
            } => {
                assert_eq!(body, robot);
                assert_eq!(index, JointIndex(i));
                assert_eq!(joint_count, 16);
            },
            other => panic!("Expected UnknownJoint, got {:?}", other),
        }
    }
}

#[test]
fn test_knee_moves_toward_target_over_steps() {
    let (mut sim, robot) = load_cheetah();
    sim.set_time_step(1.0 / 50.0).unwrap();
    let knee = JointIndex(2);
    sim.set_joint_target(robot, knee, ControlMode::Position, Rad(-0.95), RadPerSec(-1.9))
        .unwrap();

    // 0.95 rad / 1.9 rad/s = 0.5 s = 25 步
    for _ in 0..24 {
        sim.step().unwrap();
    }
    let state = sim.joint_state(robot, knee).unwrap();
    assert!(state.position.0 > -0.95);
    assert!(state.velocity.0 < 0.0);

    for _ in 0..5 {
        sim.step().unwrap();
    }
    let state = sim.joint_state(robot, knee).unwrap();
    assert!((state.position.0 + 0.95).abs() < 1e-9);
}

#[test]
fn test_independent_simulations() {
    let (mut a, robot_a) = load_cheetah();
    let (b, robot_b) = load_cheetah();
    a.set_time_step(0.1).unwrap();
    a.set_joint_target(robot_a, JointIndex(1), ControlMode::Position, Rad(0.5), RadPerSec(1.0))
        .unwrap();
    a.step().unwrap();

    assert!(a.joint_state(robot_a, JointIndex(1)).unwrap().position.0 > 0.0);
    assert_eq!(b.joint_state(robot_b, JointIndex(1)).unwrap().position, Rad(0.0));
    assert_eq!(b.step_count(), 0);
}
