pub mod content_type;
pub mod fs_store;

pub use content_type::content_type_for;
pub use fs_store::FsAssetStore;
