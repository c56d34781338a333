//! 路由表
//!
//! 模型键 → 模型服务地址。进程启动时加载一次，之后只读。
//! 制品格式为 JSON 对象：`{ "lr_Store1005_tropicana": "http://..." }`。

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::RegistryError;

/// 路由表
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoutingTable {
    routes: BTreeMap<String, String>,
}

impl RoutingTable {
    pub fn from_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            routes: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// 查找模型键对应的服务地址
    pub fn lookup(&self, model_key: &str) -> Option<&str> {
        self.routes.get(model_key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// 从制品文件加载
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        let raw = fs::read(path).map_err(|source| RegistryError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let table: Self =
            serde_json::from_slice(&raw).map_err(|source| RegistryError::InvalidArtifact {
                path: path.to_path_buf(),
                source,
            })?;

        if table.is_empty() {
            warn!(path = %path.display(), "Routing table is empty, every request will miss");
        }
        info!(path = %path.display(), routes = table.len(), "Routing table loaded");

        Ok(table)
    }

    /// 写出制品文件
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), RegistryError> {
        let path = path.as_ref();
        let io_err = |source| RegistryError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let raw = serde_json::to_string_pretty(self).map_err(|source| {
            RegistryError::InvalidArtifact {
                path: path.to_path_buf(),
                source,
            }
        })?;
        fs::write(path, raw).map_err(io_err)?;

        info!(path = %path.display(), routes = self.len(), "Routing table written");
        Ok(())
    }

    /// 从模型目录加载路由表
    ///
    /// 递归扫描目录，要求恰好存在一个文件。没有文件或多于一个文件都属于
    /// 部署配置错误，服务不应启动。
    pub fn load_from_model_dir(dir: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let dir = dir.as_ref();
        let files = find_artifacts(dir)?;
        debug!(dir = %dir.display(), ?files, "Scanned model directory");

        match files.as_slice() {
            [] => Err(RegistryError::NoArtifact {
                dir: dir.to_path_buf(),
            }),
            [artifact] => Self::load(artifact),
            _ => Err(RegistryError::MultipleArtifacts {
                dir: dir.to_path_buf(),
                files,
            }),
        }
    }
}

fn find_artifacts(dir: &Path) -> Result<Vec<PathBuf>, RegistryError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|source| RegistryError::Scan {
            dir: dir.to_path_buf(),
            source,
        })?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}
