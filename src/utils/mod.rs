//! Utility Functions
//!
//! User-friendly error formatting for the command-line tool.
//!
//! ```rust
//! use windmouse::utils::format_user_error;
//!
//! let error = anyhow::anyhow!("Failed to read config file: missing.toml");
//! let text = format_user_error(&error);
//! assert!(text.contains("Configuration problem"));
//! ```

pub mod errors;

pub use errors::format_user_error;
