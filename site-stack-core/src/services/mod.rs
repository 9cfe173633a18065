//! 业务逻辑服务层

pub mod assembly_writer;
pub mod asset_service;
mod record_loader;

pub use assembly_writer::{AssemblyWriter, MANIFEST_FILE};
pub use asset_service::{AssetService, FileAsset, DEFAULT_ASSET_DIR, REQUIRED_ROOT_FILES};
pub use record_loader::{RecordLoader, DEFAULT_RECORDS_FILE};
