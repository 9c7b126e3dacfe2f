//! macOS CoreGraphics input injection.
//!
//! Creates `CGEvent` objects and posts them at the `kCGHIDEventTap` level,
//! the same level as physical keyboard and mouse input.  The backend is
//! stateless: every event object is created, posted, and released per call
//! (CoreFoundation reference counting, handled by the wrapper's `Drop` for
//! the safe API and an explicit `CFRelease` for the raw scroll event).
//!
//! Posting at `kCGHIDEventTap` requires the Accessibility permission; without
//! it the OS silently drops the events, which matches the fire-and-forget
//! contract of this library.
//!
//! # Scroll sign convention
//!
//! A single scroll-wheel event carries both axes in line units.  The vertical
//! sign is passed through untouched; with the OS "natural scrolling"
//! preference enabled the observed direction is inverted relative to the
//! other platforms.

#![cfg(target_os = "macos")]

use std::thread;
use std::time::Duration;

use core_foundation::base::{CFRelease, CFTypeRef};
use core_graphics::event::{CGEvent, CGEventTapLocation, CGEventType, CGKeyCode, CGMouseButton};
use core_graphics::event_source::{CGEventSource, CGEventSourceStateID};
use core_graphics::geometry::CGPoint;
use core_graphics::sys;

use synput_core::Button;

use crate::simulator::{InjectionError, PlatformInputBackend};

// The safe wrapper exposes mouse and keyboard event constructors but no
// scroll-wheel constructor, so the non-variadic variant is bound directly.
#[link(name = "CoreGraphics", kind = "framework")]
extern "C" {
    fn CGEventCreateScrollWheelEvent2(
        source: sys::CGEventSourceRef,
        units: u32,
        wheel_count: u32,
        wheel1: i32,
        wheel2: i32,
        wheel3: i32,
    ) -> sys::CGEventRef;
    fn CGEventPost(tap: u32, event: sys::CGEventRef);
}

/// `kCGScrollEventUnitLine`
const SCROLL_UNIT_LINE: u32 = 1;
/// `kCGHIDEventTap`
const HID_EVENT_TAP: u32 = 0;

/// macOS CoreGraphics input backend.
pub struct MacosCoreGraphicsBackend {
    press_release_gap: Duration,
}

impl MacosCoreGraphicsBackend {
    pub fn new(press_release_gap: Duration) -> Self {
        Self { press_release_gap }
    }

    fn key_event(&self, keycode: u32, pressed: bool) -> Result<(), InjectionError> {
        let event = CGEvent::new_keyboard_event(event_source()?, keycode as CGKeyCode, pressed)
            .map_err(|_| InjectionError::Platform("keyboard event creation failed".into()))?;
        event.post(CGEventTapLocation::HID);
        Ok(())
    }
}

fn event_source() -> Result<CGEventSource, InjectionError> {
    CGEventSource::new(CGEventSourceStateID::HIDSystemState)
        .map_err(|_| InjectionError::Platform("event source creation failed".into()))
}

/// Reads the current cursor position from a freshly created event.
fn cursor_location() -> Result<CGPoint, InjectionError> {
    let probe = CGEvent::new(event_source()?)
        .map_err(|_| InjectionError::Platform("location probe event creation failed".into()))?;
    Ok(probe.location())
}

impl PlatformInputBackend for MacosCoreGraphicsBackend {
    fn move_pointer(&self, dx: i32, dy: i32) -> Result<(), InjectionError> {
        let cursor = cursor_location()?;
        let target = CGPoint::new(cursor.x + f64::from(dx), cursor.y + f64::from(dy));

        let event = CGEvent::new_mouse_event(
            event_source()?,
            CGEventType::MouseMoved,
            target,
            CGMouseButton::Left,
        )
        .map_err(|_| InjectionError::Platform("mouse move event creation failed".into()))?;
        event.post(CGEventTapLocation::HID);
        Ok(())
    }

    fn click_button(&self, button: Button) -> Result<(), InjectionError> {
        let cursor = cursor_location()?;

        let (down_type, up_type, cg_button) = match button {
            Button::Left => (
                CGEventType::LeftMouseDown,
                CGEventType::LeftMouseUp,
                CGMouseButton::Left,
            ),
            Button::Right => (
                CGEventType::RightMouseDown,
                CGEventType::RightMouseUp,
                CGMouseButton::Right,
            ),
            Button::Middle => (
                CGEventType::OtherMouseDown,
                CGEventType::OtherMouseUp,
                CGMouseButton::Center,
            ),
        };

        // Both events carry the current cursor location.
        let down = CGEvent::new_mouse_event(event_source()?, down_type, cursor, cg_button)
            .map_err(|_| InjectionError::Platform("mouse down event creation failed".into()))?;
        let up = CGEvent::new_mouse_event(event_source()?, up_type, cursor, cg_button)
            .map_err(|_| InjectionError::Platform("mouse up event creation failed".into()))?;

        down.post(CGEventTapLocation::HID);
        thread::sleep(self.press_release_gap);
        up.post(CGEventTapLocation::HID);
        Ok(())
    }

    fn scroll(&self, dx: i32, dy: i32) -> Result<(), InjectionError> {
        // One event carries both axes: wheel 1 is vertical, wheel 2 is
        // horizontal.  A null source means "no specific source state", the
        // same as every other event this backend creates would accept.
        //
        // SAFETY: the created event is posted and released exactly once; a
        // null return is checked before use.
        unsafe {
            let event = CGEventCreateScrollWheelEvent2(
                std::ptr::null_mut(),
                SCROLL_UNIT_LINE,
                2,
                dy,
                dx,
                0,
            );
            if event.is_null() {
                return Err(InjectionError::Platform(
                    "scroll event creation failed".into(),
                ));
            }
            CGEventPost(HID_EVENT_TAP, event);
            CFRelease(event as CFTypeRef);
        }
        Ok(())
    }

    fn key_down(&self, keycode: u32) -> Result<(), InjectionError> {
        self.key_event(keycode, true)
    }

    fn key_up(&self, keycode: u32) -> Result<(), InjectionError> {
        self.key_event(keycode, false)
    }
}
