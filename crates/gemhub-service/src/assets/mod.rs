//! Asset lifecycle: keeping media references consistent with stored files.

pub mod coordinator;

pub use coordinator::{AssetCoordinator, CATEGORY_FOLDER, MediaUploads};
