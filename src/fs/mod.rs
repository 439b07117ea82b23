//! Filesystem module.
//!
//! Provides:
//! - Path and directory management
//! - Filename generation and sanitization

pub mod naming;
pub mod paths;

pub use naming::{output_stem, sanitize_path_component, sanitize_title, MAX_TITLE_CHARS};
pub use paths::{account_folder, ensure_dir, find_output, is_convertible};
