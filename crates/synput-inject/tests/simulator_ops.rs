//! Integration tests for the simulator service over the recording backend.
//!
//! These exercise the public surface a Rust host sees: build an
//! [`InputSimulator`] from a backend plus a gap and drive the six operations.

use std::sync::Arc;
use std::time::Duration;

use synput_core::{Button, InjectionConfig};
use synput_inject::platform::mock::{MockBackend, RecordedCall};
use synput_inject::{InputSimulator, PlatformInputBackend};

fn simulator_with_gap(gap: Duration) -> (InputSimulator, Arc<MockBackend>) {
    let backend = Arc::new(MockBackend::new());
    let sim = InputSimulator::new(Arc::clone(&backend) as Arc<dyn PlatformInputBackend>, gap);
    (sim, backend)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[test]
fn test_mixed_session_preserves_invocation_order() {
    // Arrange
    let (sim, backend) = simulator_with_gap(Duration::ZERO);

    // Act – a plausible remote-control burst
    sim.mouse_move(10, -5).unwrap();
    sim.mouse_click(Button::Left).unwrap();
    sim.mouse_scroll(0, 3).unwrap();
    sim.key_press(0xFF0D).unwrap();

    // Assert
    assert_eq!(
        backend.calls(),
        vec![
            RecordedCall::MovePointer { dx: 10, dy: -5 },
            RecordedCall::ClickButton {
                button: Button::Left
            },
            RecordedCall::Scroll { dx: 0, dy: 3 },
            RecordedCall::KeyDown { keycode: 0xFF0D },
            RecordedCall::KeyUp { keycode: 0xFF0D },
        ]
    );
}

#[test]
fn test_scroll_magnitudes_pass_through_unchanged() {
    // Arrange
    let (sim, backend) = simulator_with_gap(Duration::ZERO);

    // Act – positive dy scrolls up, negative scrolls down
    sim.mouse_scroll(0, 3).unwrap();
    sim.mouse_scroll(0, -2).unwrap();

    // Assert – the backend owns unit decomposition; the simulator must not
    // rescale or clamp the magnitudes.
    assert_eq!(
        backend.calls(),
        vec![
            RecordedCall::Scroll { dx: 0, dy: 3 },
            RecordedCall::Scroll { dx: 0, dy: -2 },
        ]
    );
}

#[test]
fn test_each_click_is_one_backend_call_per_button() {
    let (sim, backend) = simulator_with_gap(Duration::ZERO);

    for button in [Button::Left, Button::Right, Button::Middle] {
        sim.mouse_click(button).unwrap();
    }

    assert_eq!(
        backend.calls(),
        vec![
            RecordedCall::ClickButton {
                button: Button::Left
            },
            RecordedCall::ClickButton {
                button: Button::Right
            },
            RecordedCall::ClickButton {
                button: Button::Middle
            },
        ]
    );
}

#[test]
fn test_key_press_with_config_default_gap_blocks_for_the_gap() {
    // Arrange – the stock configuration carries a 10 ms press/release gap
    let gap = InjectionConfig::default().timing.press_release_delay();
    assert!(!gap.is_zero());
    let (sim, backend) = simulator_with_gap(gap);

    // Act
    let start = std::time::Instant::now();
    sim.key_press(0x41).unwrap();

    // Assert
    assert!(start.elapsed() >= gap);
    assert_eq!(
        backend.calls(),
        vec![
            RecordedCall::KeyDown { keycode: 0x41 },
            RecordedCall::KeyUp { keycode: 0x41 },
        ]
    );
}

#[test]
fn test_key_press_equals_key_down_then_key_up() {
    // key_press must be observably equivalent to the manual sequence.
    let (sim_pressed, backend_pressed) = simulator_with_gap(Duration::ZERO);
    let (sim_manual, backend_manual) = simulator_with_gap(Duration::ZERO);

    sim_pressed.key_press(0x20).unwrap();
    sim_manual.key_down(0x20).unwrap();
    sim_manual.key_up(0x20).unwrap();

    assert_eq!(backend_pressed.calls(), backend_manual.calls());
}

#[test]
fn test_failing_backend_surfaces_errors_without_recording() {
    let backend = Arc::new(MockBackend::failing());
    let sim = InputSimulator::new(
        Arc::clone(&backend) as Arc<dyn PlatformInputBackend>,
        Duration::ZERO,
    );

    assert!(sim.mouse_move(1, 2).is_err());
    assert!(sim.key_press(0x41).is_err());
    assert!(backend.calls().is_empty());
}
