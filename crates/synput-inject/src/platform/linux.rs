//! Linux X11 input injection via the XTest extension.
//!
//! Uses `XTestFakeMotionEvent`, `XTestFakeButtonEvent`, and
//! `XTestFakeKeyEvent` to inject events into the X11 session.  The receiving
//! application cannot distinguish them from physical input.
//!
//! # Display ownership
//!
//! The backend opens one display connection with `XOpenDisplay` at
//! construction and owns it exclusively until dropped, at which point it is
//! closed with `XCloseDisplay`.  Construction fails when `DISPLAY` is unset
//! or the X server is unreachable.  Xlib connections are not safe to use from
//! multiple threads without external serialization, so the handle sits
//! behind a `Mutex`; every injection call holds the lock for its full
//! duration, including the press/release gap inside a click.
//!
//! # Mouse scroll via button events
//!
//! X11 has no dedicated scroll-wheel API.  Scroll is expressed as button
//! press+release pairs on the wheel buttons, one pair per discrete unit:
//!
//! | Button | Meaning          |
//! |--------|------------------|
//! | 4      | one unit up      |
//! | 5      | one unit down    |
//! | 6      | one unit, dx > 0 |
//! | 7      | one unit, dx < 0 |
//!
//! # Key code translation
//!
//! Callers pass X11 KeySyms (e.g. `XK_Return` = 0xFF0D).  `XTestFakeKeyEvent`
//! wants the server's hardware key code, so each key event goes through
//! `XKeysymToKeycode` first.  When the server has no mapping for the symbol
//! the raw input value is used as the key code directly, which lets callers
//! that already resolved a hardware code skip the KeySym layer.

use std::os::raw::{c_int, c_uint, c_ulong};
use std::sync::{Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use tracing::trace;
use x11::{xlib, xtest};

use synput_core::Button;

use crate::simulator::{InjectionError, PlatformInputBackend};

// ── X11 constants ─────────────────────────────────────────────────────────────

/// Passing `-1` as the screen number to `XTestFakeMotionEvent` means "the
/// screen that currently contains the pointer".
const SCREEN_OF_POINTER: c_int = -1;

/// Wheel button numbers (see the module table).
const WHEEL_UP: c_uint = 4;
const WHEEL_DOWN: c_uint = 5;
const WHEEL_POSITIVE_X: c_uint = 6;
const WHEEL_NEGATIVE_X: c_uint = 7;

/// Owns the raw Xlib display pointer.
struct DisplayHandle(*mut xlib::Display);

// SAFETY: the handle is only dereferenced while the surrounding Mutex is
// held; an Xlib connection may move between threads as long as calls on it
// are serialized.
unsafe impl Send for DisplayHandle {}

/// Linux X11/XTest input backend.
pub struct LinuxXTestBackend {
    display: Mutex<DisplayHandle>,
    press_release_gap: Duration,
}

impl LinuxXTestBackend {
    /// Connects to the X display named by the `DISPLAY` environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`InjectionError::Unavailable`] if the display cannot be
    /// opened.
    pub fn new(press_release_gap: Duration) -> Result<Self, InjectionError> {
        // SAFETY: XOpenDisplay accepts a null pointer meaning "use $DISPLAY".
        // The returned pointer must be freed by XCloseDisplay (see Drop).
        let display = unsafe { xlib::XOpenDisplay(std::ptr::null()) };

        if display.is_null() {
            let display_env = std::env::var("DISPLAY").unwrap_or_else(|_| "<unset>".to_string());
            return Err(InjectionError::Unavailable(format!(
                "XOpenDisplay failed; DISPLAY={display_env}"
            )));
        }

        Ok(Self {
            display: Mutex::new(DisplayHandle(display)),
            press_release_gap,
        })
    }

    fn lock_display(&self) -> MutexGuard<'_, DisplayHandle> {
        // Poison can only arise from a panic inside another injection call;
        // the connection itself is still usable.
        self.display
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Drop for LinuxXTestBackend {
    fn drop(&mut self) {
        let handle = self
            .display
            .get_mut()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        // SAFETY: the pointer was returned by a successful XOpenDisplay and
        // is not used again after this.
        unsafe {
            xlib::XCloseDisplay(handle.0);
        }
    }
}

/// Emits one button press+release pair without any delay between the halves.
///
/// Must be called with the display lock held.
fn wheel_unit(display: *mut xlib::Display, button: c_uint) {
    // SAFETY: `display` is a valid connection guarded by the caller's lock.
    unsafe {
        xtest::XTestFakeButtonEvent(display, button, xlib::True, xlib::CurrentTime);
        xtest::XTestFakeButtonEvent(display, button, xlib::False, xlib::CurrentTime);
    }
}

/// Resolves a KeySym to the server's hardware key code, falling back to the
/// raw input value when the server has no mapping for the symbol.
///
/// Must be called with the display lock held.
fn resolve_keycode(display: *mut xlib::Display, keycode: u32) -> c_uint {
    // SAFETY: `display` is a valid connection; the call is a read-only
    // lookup in the server's keyboard mapping.
    let translated = unsafe { xlib::XKeysymToKeycode(display, keycode as c_ulong) };
    if translated == 0 {
        trace!(keycode, "no keycode mapping for keysym; using raw value");
        keycode as c_uint
    } else {
        c_uint::from(translated)
    }
}

impl PlatformInputBackend for LinuxXTestBackend {
    fn move_pointer(&self, dx: i32, dy: i32) -> Result<(), InjectionError> {
        let display = self.lock_display();

        let mut root: xlib::Window = 0;
        let mut child: xlib::Window = 0;
        let mut root_x: c_int = 0;
        let mut root_y: c_int = 0;
        let mut win_x: c_int = 0;
        let mut win_y: c_int = 0;
        let mut mask: c_uint = 0;

        // SAFETY: the display is valid and all out-pointers reference live
        // stack slots.  The motion event uses absolute root coordinates, so
        // the current position is queried first and the delta applied to it.
        unsafe {
            let root_window = xlib::XDefaultRootWindow(display.0);
            xlib::XQueryPointer(
                display.0,
                root_window,
                &mut root,
                &mut child,
                &mut root_x,
                &mut root_y,
                &mut win_x,
                &mut win_y,
                &mut mask,
            );
            xtest::XTestFakeMotionEvent(
                display.0,
                SCREEN_OF_POINTER,
                root_x + dx,
                root_y + dy,
                xlib::CurrentTime,
            );
            xlib::XFlush(display.0);
        }
        Ok(())
    }

    fn click_button(&self, button: Button) -> Result<(), InjectionError> {
        // X11 button numbering: 1 = left, 2 = middle, 3 = right.
        let xbutton: c_uint = match button {
            Button::Left => 1,
            Button::Middle => 2,
            Button::Right => 3,
        };

        let display = self.lock_display();

        // SAFETY: the display is valid; each half is flushed so the press is
        // on the wire before the gap elapses.
        unsafe {
            xtest::XTestFakeButtonEvent(display.0, xbutton, xlib::True, xlib::CurrentTime);
            xlib::XFlush(display.0);
        }

        thread::sleep(self.press_release_gap);

        // SAFETY: as above.
        unsafe {
            xtest::XTestFakeButtonEvent(display.0, xbutton, xlib::False, xlib::CurrentTime);
            xlib::XFlush(display.0);
        }
        Ok(())
    }

    fn scroll(&self, dx: i32, dy: i32) -> Result<(), InjectionError> {
        let display = self.lock_display();

        if dy != 0 {
            let button = if dy > 0 { WHEEL_UP } else { WHEEL_DOWN };
            for _ in 0..dy.unsigned_abs() {
                wheel_unit(display.0, button);
            }
        }
        if dx != 0 {
            let button = if dx > 0 {
                WHEEL_POSITIVE_X
            } else {
                WHEEL_NEGATIVE_X
            };
            for _ in 0..dx.unsigned_abs() {
                wheel_unit(display.0, button);
            }
        }

        // SAFETY: the display is valid; one flush covers the whole burst.
        unsafe {
            xlib::XFlush(display.0);
        }
        Ok(())
    }

    fn key_down(&self, keycode: u32) -> Result<(), InjectionError> {
        let display = self.lock_display();
        let code = resolve_keycode(display.0, keycode);
        // SAFETY: the display is valid and the lock is held.
        unsafe {
            xtest::XTestFakeKeyEvent(display.0, code, xlib::True, xlib::CurrentTime);
            xlib::XFlush(display.0);
        }
        Ok(())
    }

    fn key_up(&self, keycode: u32) -> Result<(), InjectionError> {
        let display = self.lock_display();
        let code = resolve_keycode(display.0, keycode);
        // SAFETY: the display is valid and the lock is held.
        unsafe {
            xtest::XTestFakeKeyEvent(display.0, code, xlib::False, xlib::CurrentTime);
            xlib::XFlush(display.0);
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    /// Smoke-test: if a DISPLAY is available construction must succeed; if it
    /// is unset the typed error is expected.
    #[test]
    fn test_backend_construction_follows_display_availability() {
        let result = LinuxXTestBackend::new(Duration::ZERO);

        if std::env::var("DISPLAY").is_ok() {
            assert!(result.is_ok(), "construction must succeed when DISPLAY is set");
        } else {
            let err = result.err().expect("construction must fail without DISPLAY");
            assert!(
                matches!(err, InjectionError::Unavailable(_)),
                "expected Unavailable, got {err:?}"
            );
        }
    }

    #[test]
    fn test_unavailable_error_names_the_display_variable() {
        if std::env::var("DISPLAY").is_ok() {
            return; // only the failure path is under test here
        }
        let err = LinuxXTestBackend::new(Duration::ZERO)
            .err()
            .expect("must fail without DISPLAY");
        assert!(err.to_string().contains("DISPLAY"));
    }
}
