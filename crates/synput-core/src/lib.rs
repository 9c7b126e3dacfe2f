//! # synput-core
//!
//! Shared library for the synput workspace containing the logical input
//! vocabulary and the on-disk configuration schema.
//!
//! This crate is used by the platform injector and by any Rust host that
//! embeds it.  It has zero dependencies on OS input APIs — everything that
//! touches XTest, CoreGraphics, or SendInput lives in `synput-inject`.
//!
//! # What lives here (for beginners)
//!
//! - **`button`** – The logical mouse button identifiers a host passes across
//!   the library boundary (0 = left, 1 = right, 2 = middle).  Each platform
//!   backend maps these to its own native numbering; X11, CoreGraphics, and
//!   Win32 all disagree on what "button 2" means.
//!
//! - **`config`** – Optional TOML configuration read from the platform config
//!   directory.  When no file exists the defaults reproduce the library's
//!   stock behavior (a 10 ms press/release gap, `info`-level logging), so
//!   hosts that never write a config file see no difference.

pub mod button;
pub mod config;

// Re-export the most-used types at the crate root so callers can write
// `synput_core::Button` instead of `synput_core::button::Button`.
pub use button::Button;
pub use config::{ConfigError, InjectionConfig, LogConfig, TimingConfig};
