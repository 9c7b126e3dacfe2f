//! Recording backend for unit and integration testing.
//!
//! The real backends make OS API calls that require a desktop session and
//! actually move the cursor or press keys on the test machine.  The
//! [`MockBackend`] replaces all of that with an in-memory journal: every call
//! is appended to an ordered `Mutex<Vec<RecordedCall>>`, so assertions can
//! check not only what was injected but in what order.
//!
//! A backend built with [`MockBackend::failing`] returns a platform error
//! from every method without recording anything, for exercising error paths
//! without a broken OS.

use std::sync::Mutex;

use synput_core::Button;

use crate::simulator::{InjectionError, PlatformInputBackend};

/// One recorded backend invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    MovePointer { dx: i32, dy: i32 },
    ClickButton { button: Button },
    Scroll { dx: i32, dy: i32 },
    KeyDown { keycode: u32 },
    KeyUp { keycode: u32 },
}

/// A backend that records all calls instead of performing OS API calls.
///
/// The journal lives behind a `Mutex` so tests can share the backend across
/// threads (e.g. when wrapping it in an `Arc`).
#[derive(Default)]
pub struct MockBackend {
    journal: Mutex<Vec<RecordedCall>>,
    should_fail: bool,
}

impl MockBackend {
    /// Creates a backend with an empty journal that accepts every call.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend whose every method returns a platform error.
    pub fn failing() -> Self {
        Self {
            journal: Mutex::new(Vec::new()),
            should_fail: true,
        }
    }

    /// Returns a snapshot of all recorded calls in invocation order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.journal.lock().unwrap().clone()
    }

    fn record(&self, call: RecordedCall) -> Result<(), InjectionError> {
        if self.should_fail {
            return Err(InjectionError::Platform("mock failure".into()));
        }
        self.journal.lock().unwrap().push(call);
        Ok(())
    }
}

impl PlatformInputBackend for MockBackend {
    fn move_pointer(&self, dx: i32, dy: i32) -> Result<(), InjectionError> {
        self.record(RecordedCall::MovePointer { dx, dy })
    }

    fn click_button(&self, button: Button) -> Result<(), InjectionError> {
        self.record(RecordedCall::ClickButton { button })
    }

    fn scroll(&self, dx: i32, dy: i32) -> Result<(), InjectionError> {
        self.record(RecordedCall::Scroll { dx, dy })
    }

    fn key_down(&self, keycode: u32) -> Result<(), InjectionError> {
        self.record(RecordedCall::KeyDown { keycode })
    }

    fn key_up(&self, keycode: u32) -> Result<(), InjectionError> {
        self.record(RecordedCall::KeyUp { keycode })
    }
}
