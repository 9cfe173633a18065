//! 静态资源暂存服务
//!
//! 计算资源目录的内容哈希，并在合成时把目录复制到 `asset.<hash>/`。

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::{CoreError, CoreResult};

/// Default static site directory.
pub const DEFAULT_ASSET_DIR: &str = "website";

/// Files the distribution defaults point at.
pub const REQUIRED_ROOT_FILES: [&str; 2] = ["index.html", "error.html"];

/// A local directory fingerprinted for upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileAsset {
    /// Content hash (hex SHA-256 over relative paths and file contents).
    pub hash: String,
    /// Source directory.
    pub source: PathBuf,
    /// Relative file paths, `/`-separated, sorted.
    pub files: Vec<String>,
}

impl FileAsset {
    /// Directory name inside the assembly.
    pub fn staged_dir_name(&self) -> String {
        format!("asset.{}", self.hash)
    }

    /// Object key the packaged asset is published under.
    pub fn object_key(&self) -> String {
        format!("{}.zip", self.hash)
    }
}

/// Asset staging service
pub struct AssetService;

impl AssetService {
    /// 遍历目录并计算内容哈希
    ///
    /// 根目录缺少 `index.html` / `error.html` 时只记录警告。
    pub fn stage_directory(dir: &Path) -> CoreResult<FileAsset> {
        if !dir.is_dir() {
            return Err(CoreError::AssetError(format!(
                "Cannot find asset directory at {}",
                dir.display()
            )));
        }

        let mut files = Vec::new();
        collect_files(dir, dir, &mut files)?;
        files.sort();

        let mut hasher = Sha256::new();
        for relative in &files {
            let content = fs::read(dir.join(relative)).map_err(|e| {
                CoreError::AssetError(format!("Failed to read {relative}: {e}"))
            })?;
            hasher.update(relative.as_bytes());
            hasher.update([0u8]);
            hasher.update((content.len() as u64).to_le_bytes());
            hasher.update(&content);
        }
        let hash = hex::encode(hasher.finalize());

        for required in REQUIRED_ROOT_FILES {
            if !files.iter().any(|f| f == required) {
                log::warn!(
                    "Asset directory {} has no {required} at its root",
                    dir.display()
                );
            }
        }

        log::debug!(
            "Fingerprinted {} file(s) in {} -> {hash}",
            files.len(),
            dir.display()
        );

        Ok(FileAsset {
            hash,
            source: dir.to_path_buf(),
            files,
        })
    }

    /// 把资源复制到组装目录，返回暂存路径；已存在则跳过
    pub fn copy_to_assembly(asset: &FileAsset, out_dir: &Path) -> CoreResult<PathBuf> {
        let target = out_dir.join(asset.staged_dir_name());
        if target.is_dir() {
            log::debug!("Asset {} already staged", asset.hash);
            return Ok(target);
        }

        for relative in &asset.files {
            let destination = target.join(relative);
            if let Some(parent) = destination.parent() {
                fs::create_dir_all(parent).map_err(|e| storage_error(parent, &e))?;
            }
            fs::copy(asset.source.join(relative), &destination)
                .map_err(|e| storage_error(&destination, &e))?;
        }
        // 空目录也要占位
        fs::create_dir_all(&target).map_err(|e| storage_error(&target, &e))?;

        Ok(target)
    }
}

fn storage_error(path: &Path, e: &std::io::Error) -> CoreError {
    CoreError::StorageError(format!("{}: {e}", path.display()))
}

fn collect_files(root: &Path, dir: &Path, out: &mut Vec<String>) -> CoreResult<()> {
    let entries = fs::read_dir(dir)
        .map_err(|e| CoreError::AssetError(format!("Failed to read {}: {e}", dir.display())))?;

    for entry in entries {
        let entry = entry.map_err(|e| CoreError::AssetError(e.to_string()))?;
        let path = entry.path();
        let file_type = entry
            .file_type()
            .map_err(|e| CoreError::AssetError(format!("{}: {e}", path.display())))?;

        // 文件符号链接按目标内容上传；目录链接可能成环，不跟随
        let is_file = if file_type.is_symlink() {
            match fs::metadata(&path) {
                Ok(target) if target.is_file() => true,
                Ok(_) => {
                    log::warn!("Skipping symlinked directory {}", path.display());
                    false
                }
                Err(e) => {
                    log::warn!("Skipping dangling symlink {}: {e}", path.display());
                    false
                }
            }
        } else {
            file_type.is_file()
        };

        if file_type.is_dir() {
            collect_files(root, &path, out)?;
        } else if is_file {
            let relative = path.strip_prefix(root).map_err(|e| {
                CoreError::AssetError(format!("{}: {e}", path.display()))
            })?;
            let parts: Vec<String> = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            out.push(parts.join("/"));
        }
    }
    Ok(())
}
