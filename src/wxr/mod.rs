//! WXR (WordPress eXtended RSS) export assembly.

pub mod builder;
pub mod slug;

pub use builder::{Post, WxrBuilder};
pub use slug::slugify;
