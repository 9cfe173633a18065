//! 云组装目录写入服务
//!
//! 所有内容在写入前已渲染完毕；这里只负责落盘。

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{CoreError, CoreResult};
use crate::resources::custom::ASSETS_BUCKET;
use crate::types::{
    AssemblyManifest, AssetManifest, AwsEnvironment, FileAssetDestination, FileAssetEntry,
    FileAssetSource, ASSEMBLY_VERSION,
};

use super::asset_service::{AssetService, FileAsset};

/// Root manifest file name.
pub const MANIFEST_FILE: &str = "manifest.json";

/// `<Stack>.template.json`
pub fn template_file_name(stack_name: &str) -> String {
    format!("{stack_name}.template.json")
}

/// `<Stack>.assets.json`
pub fn asset_manifest_file_name(stack_name: &str) -> String {
    format!("{stack_name}.assets.json")
}

/// Build the asset manifest of one stack.
pub fn asset_manifest(env: &AwsEnvironment, assets: &[FileAsset]) -> AssetManifest {
    let destination_id = format!(
        "{}-{}",
        env.account.as_deref().unwrap_or("current_account"),
        env.region.as_deref().unwrap_or("current_region")
    );

    let files = assets
        .iter()
        .map(|asset| {
            let mut destinations = BTreeMap::new();
            destinations.insert(
                destination_id.clone(),
                FileAssetDestination {
                    bucket_name: ASSETS_BUCKET.to_string(),
                    object_key: asset.object_key(),
                    region: env.region.clone(),
                },
            );
            (
                asset.hash.clone(),
                FileAssetEntry {
                    source: FileAssetSource {
                        path: asset.staged_dir_name(),
                        packaging: "zip".to_string(),
                    },
                    destinations,
                },
            )
        })
        .collect();

    AssetManifest {
        version: ASSEMBLY_VERSION.to_string(),
        files,
        docker_images: BTreeMap::new(),
    }
}

/// Writes rendered artifacts into an output directory.
pub struct AssemblyWriter {
    out_dir: PathBuf,
}

impl AssemblyWriter {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// 创建输出目录（已存在时保留其内容）
    pub fn prepare(&self) -> CoreResult<()> {
        fs::create_dir_all(&self.out_dir).map_err(|e| {
            CoreError::StorageError(format!("{}: {e}", self.out_dir.display()))
        })
    }

    /// 写入已渲染的文本文件，返回完整路径
    pub fn write_file(&self, file_name: &str, content: &str) -> CoreResult<PathBuf> {
        let path = self.out_dir.join(file_name);
        fs::write(&path, content)
            .map_err(|e| CoreError::StorageError(format!("{}: {e}", path.display())))?;
        log::debug!("Wrote {}", path.display());
        Ok(path)
    }

    /// 复制资源目录到 `asset.<hash>/`
    pub fn stage_assets(&self, assets: &[FileAsset]) -> CoreResult<()> {
        for asset in assets {
            AssetService::copy_to_assembly(asset, &self.out_dir)?;
        }
        Ok(())
    }

    pub fn write_manifest(&self, manifest: &AssemblyManifest) -> CoreResult<PathBuf> {
        self.write_file(MANIFEST_FILE, &to_pretty_json(manifest)?)
    }
}

/// Pretty JSON rendering shared by every assembly file.
pub fn to_pretty_json<T: Serialize>(value: &T) -> CoreResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| CoreError::SerializationError(e.to_string()))
}
