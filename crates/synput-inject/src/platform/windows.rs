//! Windows input injection via the SendInput API.
//!
//! The backend is stateless: each operation builds one or two `INPUT`
//! structures on the stack and submits them in a single `SendInput` call.
//! A click submits its down and up inputs as one two-element batch — the OS
//! serializes injected input, so no explicit delay is inserted between the
//! halves (unlike the X11 and CoreGraphics backends).
//!
//! `SendInput` return values are not checked; failed injection manifests
//! only as the absence of the expected system effect, per the fire-and-forget
//! contract of this library.

#![cfg(target_os = "windows")]

use std::mem;

use windows::Win32::UI::Input::KeyboardAndMouse::{
    SendInput, INPUT, INPUT_0, INPUT_KEYBOARD, INPUT_MOUSE, KEYBDINPUT, KEYBD_EVENT_FLAGS,
    KEYEVENTF_KEYUP, MOUSEEVENTF_HWHEEL, MOUSEEVENTF_LEFTDOWN, MOUSEEVENTF_LEFTUP,
    MOUSEEVENTF_MIDDLEDOWN, MOUSEEVENTF_MIDDLEUP, MOUSEEVENTF_MOVE, MOUSEEVENTF_RIGHTDOWN,
    MOUSEEVENTF_RIGHTUP, MOUSEEVENTF_WHEEL, MOUSEINPUT, MOUSE_EVENT_FLAGS, VIRTUAL_KEY,
};
use windows::Win32::UI::WindowsAndMessaging::WHEEL_DELTA;

use synput_core::Button;

use crate::simulator::{InjectionError, PlatformInputBackend};

/// Windows SendInput backend.
pub struct WindowsSendInputBackend;

impl WindowsSendInputBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WindowsSendInputBackend {
    fn default() -> Self {
        Self::new()
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn mouse_input(dx: i32, dy: i32, mouse_data: u32, flags: MOUSE_EVENT_FLAGS) -> INPUT {
    INPUT {
        r#type: INPUT_MOUSE,
        Anonymous: INPUT_0 {
            mi: MOUSEINPUT {
                dx,
                dy,
                mouseData: mouse_data,
                dwFlags: flags,
                time: 0,
                dwExtraInfo: 0,
            },
        },
    }
}

fn keyboard_input(keycode: u32, flags: KEYBD_EVENT_FLAGS) -> INPUT {
    INPUT {
        r#type: INPUT_KEYBOARD,
        Anonymous: INPUT_0 {
            ki: KEYBDINPUT {
                wVk: VIRTUAL_KEY(keycode as u16),
                wScan: 0,
                dwFlags: flags,
                time: 0,
                dwExtraInfo: 0,
            },
        },
    }
}

fn send(inputs: &[INPUT]) {
    // SAFETY: every INPUT value is fully initialized stack data.
    unsafe {
        SendInput(inputs, mem::size_of::<INPUT>() as i32);
    }
}

/// Scales discrete scroll units into the `WHEEL_DELTA`-based amount carried
/// by a wheel input.  The result is stored into the `DWORD` field as the
/// two's-complement representation of the signed amount.
fn wheel_amount(units: i32) -> u32 {
    units.wrapping_mul(WHEEL_DELTA as i32) as u32
}

impl PlatformInputBackend for WindowsSendInputBackend {
    fn move_pointer(&self, dx: i32, dy: i32) -> Result<(), InjectionError> {
        send(&[mouse_input(dx, dy, 0, MOUSEEVENTF_MOVE)]);
        Ok(())
    }

    fn click_button(&self, button: Button) -> Result<(), InjectionError> {
        let (down_flag, up_flag) = match button {
            Button::Left => (MOUSEEVENTF_LEFTDOWN, MOUSEEVENTF_LEFTUP),
            Button::Right => (MOUSEEVENTF_RIGHTDOWN, MOUSEEVENTF_RIGHTUP),
            Button::Middle => (MOUSEEVENTF_MIDDLEDOWN, MOUSEEVENTF_MIDDLEUP),
        };

        // Down and up travel as one batch; the OS plays them in order.
        send(&[
            mouse_input(0, 0, 0, down_flag),
            mouse_input(0, 0, 0, up_flag),
        ]);
        Ok(())
    }

    fn scroll(&self, dx: i32, dy: i32) -> Result<(), InjectionError> {
        if dy != 0 {
            send(&[mouse_input(0, 0, wheel_amount(dy), MOUSEEVENTF_WHEEL)]);
        }
        if dx != 0 {
            send(&[mouse_input(0, 0, wheel_amount(dx), MOUSEEVENTF_HWHEEL)]);
        }
        Ok(())
    }

    fn key_down(&self, keycode: u32) -> Result<(), InjectionError> {
        send(&[keyboard_input(keycode, KEYBD_EVENT_FLAGS(0))]);
        Ok(())
    }

    fn key_up(&self, keycode: u32) -> Result<(), InjectionError> {
        send(&[keyboard_input(keycode, KEYEVENTF_KEYUP)]);
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wheel_amount_scales_by_wheel_delta() {
        assert_eq!(wheel_amount(1), WHEEL_DELTA);
        assert_eq!(wheel_amount(3), 3 * WHEEL_DELTA);
    }

    #[test]
    fn test_wheel_amount_encodes_negative_units_as_twos_complement() {
        // -1 unit must read back as -120 when reinterpreted as signed.
        assert_eq!(wheel_amount(-1) as i32, -(WHEEL_DELTA as i32));
        assert_eq!(wheel_amount(-2) as i32, -2 * WHEEL_DELTA as i32);
    }
}
