//! The platform capability trait and the simulator composed on top of it.
//!
//! [`PlatformInputBackend`] is implemented once per OS in the
//! [`platform`](crate::platform) module and selected at composition time.
//! The trait deliberately includes `click_button` as an atomic operation
//! rather than composing it from down/up calls: click timing differs per
//! platform (X11 and CoreGraphics insert a real delay between press and
//! release, Win32 submits both in one `SendInput` batch) and that native
//! behavior is preserved, not reconciled.
//!
//! `key_press`, by contrast, is identical everywhere — down, a short blocking
//! sleep, up — so [`InputSimulator`] composes it once on top of the trait.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use thiserror::Error;
use tracing::trace;

use synput_core::Button;

/// Error type for injection operations.
#[derive(Debug, Error)]
pub enum InjectionError {
    /// The OS rejected or could not deliver a synthesized event.
    #[error("platform error: {0}")]
    Platform(String),

    /// The platform backend could not be constructed (e.g. the X display
    /// could not be opened).
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    /// No backend exists for the compilation target.
    #[error("platform not supported")]
    UnsupportedPlatform,
}

/// Platform-specific input injection capability.
///
/// Each supported OS provides exactly one implementation; a recording mock
/// backs the test suites.  All methods are synchronous and blocking.
pub trait PlatformInputBackend: Send + Sync {
    /// Displaces the pointer by `(dx, dy)` pixels relative to its current
    /// position.
    fn move_pointer(&self, dx: i32, dy: i32) -> Result<(), InjectionError>;

    /// Presses and releases `button` with the platform's native click timing.
    fn click_button(&self, button: Button) -> Result<(), InjectionError>;

    /// Scrolls by discrete units; positive `dy` scrolls up.  Unit granularity
    /// is platform-native: X11 emits one wheel-button press/release pair per
    /// unit, CoreGraphics and Win32 emit single magnitude-carrying events.
    fn scroll(&self, dx: i32, dy: i32) -> Result<(), InjectionError>;

    /// Presses a key.  `keycode` is platform-specific: an X11 KeySym, a
    /// CoreGraphics `CGKeyCode`, or a Win32 virtual-key code.
    fn key_down(&self, keycode: u32) -> Result<(), InjectionError>;

    /// Releases a key previously pressed with [`key_down`](Self::key_down).
    fn key_up(&self, keycode: u32) -> Result<(), InjectionError>;
}

/// The input simulator: the six host-facing operations over a platform
/// backend.
///
/// Construct one with [`crate::create_simulator`] (platform backend from
/// config) or directly with any [`PlatformInputBackend`] for tests.
pub struct InputSimulator {
    backend: Arc<dyn PlatformInputBackend>,
    press_release_gap: Duration,
}

impl InputSimulator {
    /// Creates a simulator over `backend`.
    ///
    /// `press_release_gap` is the blocking delay inserted between the down
    /// and up halves of [`key_press`](Self::key_press).  Tests pass
    /// [`Duration::ZERO`] to avoid wall-clock waits.
    pub fn new(backend: Arc<dyn PlatformInputBackend>, press_release_gap: Duration) -> Self {
        Self {
            backend,
            press_release_gap,
        }
    }

    /// Moves the pointer by `(dx, dy)` pixels.
    ///
    /// # Errors
    ///
    /// Returns [`InjectionError`] if the OS event injection fails.
    pub fn mouse_move(&self, dx: i32, dy: i32) -> Result<(), InjectionError> {
        trace!(dx, dy, "mouse_move");
        self.backend.move_pointer(dx, dy)
    }

    /// Clicks `button` (press then release, native timing).
    ///
    /// # Errors
    ///
    /// Returns [`InjectionError`] if the OS event injection fails.
    pub fn mouse_click(&self, button: Button) -> Result<(), InjectionError> {
        trace!(?button, "mouse_click");
        self.backend.click_button(button)
    }

    /// Scrolls by `(dx, dy)` discrete units; positive `dy` scrolls up.
    ///
    /// # Errors
    ///
    /// Returns [`InjectionError`] if the OS event injection fails.
    pub fn mouse_scroll(&self, dx: i32, dy: i32) -> Result<(), InjectionError> {
        trace!(dx, dy, "mouse_scroll");
        self.backend.scroll(dx, dy)
    }

    /// Presses and releases the key: down, sleep for the configured gap, up.
    ///
    /// The sleep always runs to completion once started; there is no
    /// cancellation.
    ///
    /// # Errors
    ///
    /// Returns [`InjectionError`] if either half of the injection fails.  The
    /// release is not attempted when the press fails.
    pub fn key_press(&self, keycode: u32) -> Result<(), InjectionError> {
        trace!(keycode, "key_press");
        self.backend.key_down(keycode)?;
        thread::sleep(self.press_release_gap);
        self.backend.key_up(keycode)
    }

    /// Presses a key without releasing it.
    ///
    /// # Errors
    ///
    /// Returns [`InjectionError`] if the OS event injection fails.
    pub fn key_down(&self, keycode: u32) -> Result<(), InjectionError> {
        trace!(keycode, "key_down");
        self.backend.key_down(keycode)
    }

    /// Releases a key.
    ///
    /// # Errors
    ///
    /// Returns [`InjectionError`] if the OS event injection fails.
    pub fn key_up(&self, keycode: u32) -> Result<(), InjectionError> {
        trace!(keycode, "key_up");
        self.backend.key_up(keycode)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
