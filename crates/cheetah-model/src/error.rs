//! 模型层错误类型定义

use std::path::PathBuf;
use thiserror::Error;

/// 模型加载与查询错误
#[derive(Error, Debug)]
pub enum ModelError {
    /// 读取描述文件失败
    #[error("Failed to read robot description {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// XML 解析错误
    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// 描述文件内容无效
    #[error("Invalid robot description: {0}")]
    InvalidDescription(String),

    /// 按名称找不到关节
    #[error("Joint not found: {0}")]
    JointNotFound(String),

    /// 关节角色无法解析
    #[error("Joint role {role} is not present in model (expected joint named {expected:?})")]
    RoleNotFound { role: String, expected: String },
}

#[cfg(test)]
mod tests {
    use super::ModelError;

    #[test]
    fn test_model_error_display() {
        let err = ModelError::InvalidDescription("joint without name".to_string());
        assert_eq!(
            format!("{}", err),
            "Invalid robot description: joint without name"
        );

        let err = ModelError::RoleNotFound {
            role: "FR knee".to_string(),
            expected: "thigh_fr_to_knee_fr_j".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("FR knee") && msg.contains("thigh_fr_to_knee_fr_j"));
    }
}
