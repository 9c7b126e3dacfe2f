//! Platform-specific input injection backends.
//!
//! The correct implementation is selected at compile time via
//! `#[cfg(target_os = ...)]`.  The mock backend is available on every target
//! for tests.

pub mod mock;

#[cfg(target_os = "windows")]
pub mod windows;

#[cfg(target_os = "linux")]
pub mod linux;

#[cfg(target_os = "macos")]
pub mod macos;
