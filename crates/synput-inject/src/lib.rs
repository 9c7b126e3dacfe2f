//! # synput-inject
//!
//! OS-level synthetic input injection for Linux (X11/XTest), macOS
//! (CoreGraphics), and Windows (Win32 SendInput).
//!
//! # Architecture
//!
//! ```text
//! host process (dlopen / LoadLibrary)
//!  └─ ffi            -- six C-ABI functions, lazy process-wide simulator
//!       └─ InputSimulator      -- key_press composition, logging
//!            └─ PlatformInputBackend   -- one implementation per OS
//!                 ├─ LinuxXTestBackend        (owns the X display)
//!                 ├─ MacosCoreGraphicsBackend (stateless)
//!                 ├─ WindowsSendInputBackend  (stateless)
//!                 └─ MockBackend              (recording, for tests)
//! ```
//!
//! Rust hosts link the `rlib` and build an [`InputSimulator`] themselves via
//! [`create_simulator`], getting deterministic resource cleanup when the
//! value drops.  C hosts load the `cdylib` and call the exported functions in
//! [`ffi`]; that surface never propagates errors and never unwinds.
//!
//! Key codes are deliberately platform-specific (X11 KeySym, `CGKeyCode`,
//! Win32 virtual-key code); this library performs no cross-platform key
//! translation.

pub mod ffi;
pub mod platform;
pub mod simulator;

pub use simulator::{InjectionError, InputSimulator, PlatformInputBackend};

use std::sync::Arc;
use std::time::Duration;

use synput_core::InjectionConfig;

/// Creates the input backend for the compilation target.
///
/// `press_release_gap` is the delay the X11 and CoreGraphics backends insert
/// between the press and release halves of a click; the Win32 backend batches
/// both halves and ignores it.
///
/// # Errors
///
/// Returns [`InjectionError::Unavailable`] when the platform resources cannot
/// be acquired (Linux: the X display cannot be opened), and
/// [`InjectionError::UnsupportedPlatform`] on targets without a backend.
pub fn create_backend(
    press_release_gap: Duration,
) -> Result<Arc<dyn PlatformInputBackend>, InjectionError> {
    #[cfg(target_os = "linux")]
    {
        Ok(Arc::new(platform::linux::LinuxXTestBackend::new(
            press_release_gap,
        )?))
    }

    #[cfg(target_os = "macos")]
    {
        Ok(Arc::new(platform::macos::MacosCoreGraphicsBackend::new(
            press_release_gap,
        )))
    }

    #[cfg(target_os = "windows")]
    {
        // Win32 clicks travel as one SendInput batch; the gap only applies
        // to key presses composed above the backend.
        let _ = press_release_gap;
        Ok(Arc::new(platform::windows::WindowsSendInputBackend::new()))
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    {
        let _ = press_release_gap;
        Err(InjectionError::UnsupportedPlatform)
    }
}

/// Builds a ready-to-use simulator from configuration.
///
/// # Errors
///
/// Propagates backend construction failures from [`create_backend`].
pub fn create_simulator(config: &InjectionConfig) -> Result<InputSimulator, InjectionError> {
    let gap = config.timing.press_release_delay();
    Ok(InputSimulator::new(create_backend(gap)?, gap))
}
