//! Shared UI crate for Greenboard: the build timeline and the views hosting it.

pub mod components;
pub mod core;
pub mod export;
pub mod i18n;
pub mod timeline;
pub mod views;
