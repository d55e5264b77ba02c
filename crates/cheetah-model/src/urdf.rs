//! URDF 机器人描述加载器
//!
//! 只读取驱动所需的 URDF 子集：
//!
//! - `<robot name>`
//! - `<link name>`
//! - `<joint name type>` 及其 `<parent link>`、`<child link>`、`<axis xyz>`、
//!   `<limit lower upper velocity>`
//!
//! 关节索引按出现顺序分配。`<transmission>` 内部的 `<joint>` 引用会被忽略。
//! 几何、惯量、碰撞体等信息由仿真器自行处理，这里不解析。

use crate::error::ModelError;
use crate::joint::{JointIndex, JointInfo, JointKind, JointLimits};
use crate::units::{Rad, RadPerSec};
use nalgebra::Vector3;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// 已加载的多关节刚体描述
#[derive(Debug, Clone, PartialEq)]
pub struct RobotModel {
    name: String,
    links: Vec<String>,
    joints: Vec<JointInfo>,
}

/// 解析过程中的关节元素
#[derive(Debug, Default)]
struct JointElement {
    name: Option<String>,
    kind: Option<String>,
    parent: Option<String>,
    child: Option<String>,
    axis: Option<Vector3<f64>>,
    limits: Option<JointLimits>,
}

impl RobotModel {
    /// 从文件加载 URDF
    pub fn from_urdf_file<P: AsRef<Path>>(path: P) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let xml = fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let model = Self::from_urdf_str(&xml)?;
        tracing::debug!(
            "Loaded robot description {} from {} ({} joints)",
            model.name,
            path.display(),
            model.joints.len()
        );
        Ok(model)
    }

    /// 从 XML 字符串加载 URDF
    pub fn from_urdf_str(xml: &str) -> Result<Self, ModelError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut name: Option<String> = None;
        let mut links = Vec::new();
        let mut joints: Vec<JointInfo> = Vec::new();
        let mut current: Option<JointElement> = None;
        let mut transmission_depth = 0usize;

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    let tag = tag_name(&e);
                    if tag == "transmission" {
                        transmission_depth += 1;
                    } else if transmission_depth == 0 {
                        if tag == "joint" {
                            current = Some(parse_joint_start(&e)?);
                        } else {
                            handle_element(&tag, &e, &mut name, &mut links, current.as_mut())?;
                        }
                    }
                },
                Event::Empty(e) => {
                    let tag = tag_name(&e);
                    if transmission_depth == 0 {
                        if tag == "joint" {
                            // 自闭合的 <joint/> 缺少 parent/child，finish 时报错
                            let element = parse_joint_start(&e)?;
                            joints.push(finish_joint(element, joints.len())?);
                        } else {
                            handle_element(&tag, &e, &mut name, &mut links, current.as_mut())?;
                        }
                    }
                },
                Event::End(e) => {
                    let tag = String::from_utf8_lossy(e.name().as_ref()).to_string();
                    if tag == "transmission" {
                        transmission_depth = transmission_depth.saturating_sub(1);
                    } else if tag == "joint"
                        && transmission_depth == 0
                        && let Some(element) = current.take()
                    {
                        joints.push(finish_joint(element, joints.len())?);
                    }
                },
                Event::Eof => break,
                _ => {},
            }
        }

        let name = name.ok_or_else(|| {
            ModelError::InvalidDescription("missing <robot name=...> element".to_string())
        })?;

        let mut seen = HashSet::new();
        for joint in &joints {
            if !seen.insert(joint.name.as_str()) {
                return Err(ModelError::InvalidDescription(format!(
                    "duplicate joint name {:?}",
                    joint.name
                )));
            }
        }

        Ok(RobotModel {
            name,
            links,
            joints,
        })
    }

    /// 机器人名称
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 连杆名称（按出现顺序）
    pub fn links(&self) -> &[String] {
        &self.links
    }

    /// 全部关节（按索引顺序）
    pub fn joints(&self) -> &[JointInfo] {
        &self.joints
    }

    /// 关节数量
    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    /// 按索引查询关节
    pub fn joint(&self, index: JointIndex) -> Option<&JointInfo> {
        self.joints.get(index.0)
    }

    /// 按名称查询关节
    pub fn joint_by_name(&self, name: &str) -> Option<&JointInfo> {
        self.joints.iter().find(|j| j.name == name)
    }

    /// 按名称解析关节索引
    pub fn joint_index(&self, name: &str) -> Result<JointIndex, ModelError> {
        self.joint_by_name(name)
            .map(|j| j.index)
            .ok_or_else(|| ModelError::JointNotFound(name.to_string()))
    }

    /// 可驱动关节
    pub fn actuated_joints(&self) -> impl Iterator<Item = &JointInfo> {
        self.joints.iter().filter(|j| j.is_actuated())
    }
}

fn tag_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).to_string()
}

/// 处理 `<robot>`、`<link>` 以及关节内部的子元素
fn handle_element(
    tag: &str,
    e: &BytesStart<'_>,
    name: &mut Option<String>,
    links: &mut Vec<String>,
    current: Option<&mut JointElement>,
) -> Result<(), ModelError> {
    match (tag, current) {
        ("robot", None) => {
            *name = attribute(e, "name")?;
        },
        ("link", None) => {
            let link = attribute(e, "name")?.ok_or_else(|| {
                ModelError::InvalidDescription("<link> without name".to_string())
            })?;
            links.push(link);
        },
        ("parent", Some(joint)) => {
            joint.parent = attribute(e, "link")?;
        },
        ("child", Some(joint)) => {
            joint.child = attribute(e, "link")?;
        },
        ("axis", Some(joint)) => {
            if let Some(xyz) = attribute(e, "xyz")? {
                let v = parse_vector3(&xyz)?;
                joint.axis = Some(v);
            }
        },
        ("limit", Some(joint)) => {
            let lower = parse_optional_f64(e, "lower")?.unwrap_or(0.0);
            let upper = parse_optional_f64(e, "upper")?.unwrap_or(0.0);
            let velocity = parse_optional_f64(e, "velocity")?.unwrap_or(0.0);
            joint.limits = Some(JointLimits {
                lower: Rad(lower),
                upper: Rad(upper),
                velocity: RadPerSec(velocity),
            });
        },
        _ => {},
    }
    Ok(())
}

fn parse_joint_start(e: &BytesStart<'_>) -> Result<JointElement, ModelError> {
    Ok(JointElement {
        name: attribute(e, "name")?,
        kind: attribute(e, "type")?,
        ..Default::default()
    })
}

fn finish_joint(element: JointElement, index: usize) -> Result<JointInfo, ModelError> {
    let name = element.name.ok_or_else(|| {
        ModelError::InvalidDescription(format!("joint #{} has no name", index))
    })?;
    let kind_str = element.kind.ok_or_else(|| {
        ModelError::InvalidDescription(format!("joint {:?} has no type", name))
    })?;
    let kind = JointKind::from_urdf(&kind_str).ok_or_else(|| {
        ModelError::InvalidDescription(format!(
            "joint {:?} has unsupported type {:?}",
            name, kind_str
        ))
    })?;
    let parent_link = element.parent.ok_or_else(|| {
        ModelError::InvalidDescription(format!("joint {:?} has no parent link", name))
    })?;
    let child_link = element.child.ok_or_else(|| {
        ModelError::InvalidDescription(format!("joint {:?} has no child link", name))
    })?;

    // URDF 默认轴为 x 轴
    let raw_axis = element.axis.unwrap_or_else(Vector3::x);
    let axis = if kind.is_actuated() {
        raw_axis.try_normalize(f64::EPSILON).ok_or_else(|| {
            ModelError::InvalidDescription(format!("joint {:?} has a zero-length axis", name))
        })?
    } else {
        raw_axis
    };

    Ok(JointInfo {
        index: JointIndex(index),
        name,
        kind,
        axis,
        parent_link,
        child_link,
        limits: element.limits,
    })
}

fn attribute(e: &BytesStart<'_>, key: &str) -> Result<Option<String>, ModelError> {
    for attr in e.attributes() {
        let attr = attr.map_err(|err| ModelError::InvalidDescription(err.to_string()))?;
        if attr.key.as_ref() == key.as_bytes() {
            return Ok(Some(String::from_utf8_lossy(&attr.value).to_string()));
        }
    }
    Ok(None)
}

fn parse_f64(value: &str) -> Result<f64, ModelError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| ModelError::InvalidDescription(format!("invalid number {:?}", value)))
}

fn parse_optional_f64(e: &BytesStart<'_>, key: &str) -> Result<Option<f64>, ModelError> {
    attribute(e, key)?.map(|v| parse_f64(&v)).transpose()
}

fn parse_vector3(value: &str) -> Result<Vector3<f64>, ModelError> {
    let parts = value
        .split_whitespace()
        .map(parse_f64)
        .collect::<Result<Vec<_>, _>>()?;
    match parts.as_slice() {
        [x, y, z] => Ok(Vector3::new(*x, *y, *z)),
        _ => Err(ModelError::InvalidDescription(format!(
            "expected 3 components, got {:?}",
            value
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const LEG_URDF: &str = r#"<?xml version="1.0"?>
<robot name="single_leg">
  <link name="body"/>
  <link name="abduct">
    <visual><geometry><box size="0.1 0.1 0.1"/></geometry></visual>
  </link>
  <link name="thigh"/>
  <link name="foot"/>
  <joint name="body_to_abduct" type="continuous">
    <parent link="body"/>
    <child link="abduct"/>
    <axis xyz="2 0 0"/>
  </joint>
  <joint name="abduct_to_thigh" type="revolute">
    <parent link="abduct"/>
    <child link="thigh"/>
    <axis xyz="0 -1 0"/>
    <limit lower="-1.5" upper="1.5" velocity="30" effort="18"/>
  </joint>
  <joint name="toe" type="fixed">
    <parent link="thigh"/>
    <child link="foot"/>
  </joint>
  <transmission name="t1">
    <joint name="abduct_to_thigh"/>
  </transmission>
</robot>"#;

    #[test]
    fn test_parse_joints_in_order() {
        let model = RobotModel::from_urdf_str(LEG_URDF).unwrap();
        assert_eq!(model.name(), "single_leg");
        assert_eq!(model.links(), &["body", "abduct", "thigh", "foot"]);
        assert_eq!(model.joint_count(), 3);

        let names: Vec<_> = model.joints().iter().map(|j| j.name.as_str()).collect();
        assert_eq!(names, vec!["body_to_abduct", "abduct_to_thigh", "toe"]);

        for (i, joint) in model.joints().iter().enumerate() {
            assert_eq!(joint.index, JointIndex(i));
        }
    }

    #[test]
    fn test_axis_normalized_and_limits() {
        let model = RobotModel::from_urdf_str(LEG_URDF).unwrap();

        let abduct = model.joint_by_name("body_to_abduct").unwrap();
        assert_relative_eq!(abduct.axis.x, 1.0);
        assert_eq!(abduct.kind, JointKind::Continuous);
        assert!(abduct.limits.is_none());

        let thigh = model.joint(JointIndex(1)).unwrap();
        let limits = thigh.limits.unwrap();
        assert_eq!(limits.lower, Rad(-1.5));
        assert_eq!(limits.upper, Rad(1.5));
        assert_eq!(limits.velocity, RadPerSec(30.0));
        assert_relative_eq!(thigh.axis.y, -1.0);
    }

    #[test]
    fn test_fixed_joint_default_axis() {
        let model = RobotModel::from_urdf_str(LEG_URDF).unwrap();
        let toe = model.joint_by_name("toe").unwrap();
        assert!(!toe.is_actuated());
        assert_eq!(toe.axis, Vector3::x());
        assert_eq!(model.actuated_joints().count(), 2);
    }

    #[test]
    fn test_joint_index_lookup() {
        let model = RobotModel::from_urdf_str(LEG_URDF).unwrap();
        assert_eq!(model.joint_index("toe").unwrap(), JointIndex(2));
        assert!(matches!(
            model.joint_index("nope"),
            Err(ModelError::JointNotFound(name)) if name == "nope"
        ));
    }

    #[test]
    fn test_reject_unknown_joint_type() {
        let xml = r#"<robot name="r"><link name="a"/><link name="b"/>
            <joint name="j" type="floating"><parent link="a"/><child link="b"/></joint>
        </robot>"#;
        let err = RobotModel::from_urdf_str(xml).unwrap_err();
        assert!(format!("{}", err).contains("unsupported type"));
    }

    #[test]
    fn test_reject_missing_parent() {
        let xml = r#"<robot name="r"><link name="b"/>
            <joint name="j" type="revolute"><child link="b"/></joint>
        </robot>"#;
        let err = RobotModel::from_urdf_str(xml).unwrap_err();
        assert!(format!("{}", err).contains("no parent link"));
    }

    #[test]
    fn test_reject_duplicate_joint_names() {
        let xml = r#"<robot name="r"><link name="a"/><link name="b"/><link name="c"/>
            <joint name="j" type="revolute"><parent link="a"/><child link="b"/></joint>
            <joint name="j" type="revolute"><parent link="b"/><child link="c"/></joint>
        </robot>"#;
        let err = RobotModel::from_urdf_str(xml).unwrap_err();
        assert!(format!("{}", err).contains("duplicate joint name"));
    }

    #[test]
    fn test_reject_bad_number() {
        let xml = r#"<robot name="r"><link name="a"/><link name="b"/>
            <joint name="j" type="revolute"><parent link="a"/><child link="b"/>
            <axis xyz="0 one 0"/></joint>
        </robot>"#;
        assert!(RobotModel::from_urdf_str(xml).is_err());
    }

    #[test]
    fn test_missing_robot_name() {
        let xml = r#"<robot><link name="a"/></robot>"#;
        let err = RobotModel::from_urdf_str(xml).unwrap_err();
        assert!(format!("{}", err).contains("robot name"));
    }

    #[test]
    fn test_missing_file() {
        let err = RobotModel::from_urdf_file("/nonexistent/robot.urdf").unwrap_err();
        assert!(matches!(err, ModelError::Io { .. }));
    }
}
