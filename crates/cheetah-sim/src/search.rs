//! 描述文件搜索路径

use crate::SimError;
use std::path::{Path, PathBuf};

/// 描述文件搜索路径列表
///
/// 相对路径先按当前目录查找，找不到时按添加顺序依次在搜索路径中查找。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchPaths {
    dirs: Vec<PathBuf>,
}

impl SearchPaths {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加搜索路径
    pub fn add<P: Into<PathBuf>>(&mut self, path: P) {
        let path = path.into();
        tracing::debug!("Added model search path {}", path.display());
        self.dirs.push(path);
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// 解析描述文件的实际位置
    pub fn resolve(&self, path: &Path) -> Result<PathBuf, SimError> {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        if path.is_relative() {
            for dir in &self.dirs {
                let candidate = dir.join(path);
                if candidate.exists() {
                    return Ok(candidate);
                }
            }
        }
        Err(SimError::ModelNotFound {
            path: path.to_path_buf(),
            searched: self.dirs.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_in_order() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        std::fs::write(second.path().join("robot.urdf"), "<robot/>").unwrap();
        std::fs::write(first.path().join("plane.urdf"), "<robot/>").unwrap();
        std::fs::write(second.path().join("plane.urdf"), "<robot/>").unwrap();

        let mut paths = SearchPaths::new();
        paths.add(first.path());
        paths.add(second.path());

        assert_eq!(
            paths.resolve(Path::new("robot.urdf")).unwrap(),
            second.path().join("robot.urdf")
        );
        assert_eq!(
            paths.resolve(Path::new("plane.urdf")).unwrap(),
            first.path().join("plane.urdf")
        );
    }

    #[test]
    fn test_missing_file_lists_searched_dirs() {
        let dir = TempDir::new().unwrap();
        let mut paths = SearchPaths::new();
        paths.add(dir.path());

        match paths.resolve(Path::new("nope.urdf")) {
            Err(SimError::ModelNotFound { path, searched }) => {
                assert_eq!(path, PathBuf::from("nope.urdf"));
                assert_eq!(searched, vec![dir.path().to_path_buf()]);
            },
            other => panic!("Expected ModelNotFound, got {:?}", other),
        }
    }
}
