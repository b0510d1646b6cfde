//! Common utilities and shared types for famfeed.
//!
//! This crate provides foundational components used across all famfeed crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: Collision-free media file names via [`IdGenerator`]
//! - **Storage**: The media store for uploaded images
//!
//! # Example
//!
//! ```no_run
//! use famfeed_common::{Config, IdGenerator, AppResult};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id_gen = IdGenerator::new();
//!     let name = id_gen.media_file_name("png");
//!     println!("{} -> {}", config.storage.data_dir.display(), name);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod id;
pub mod storage;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use id::IdGenerator;
pub use storage::{
    ALLOWED_IMAGE_EXTENSIONS, LocalStorage, MediaStorage, StorageBackend, image_extension,
    resolve_data_dir,
};
