//! C ABI surface for hosts that load the library dynamically.
//!
//! A host process resolves six symbols after loading the cdylib:
//!
//! ```text
//! void mouse_move(int dx, int dy);
//! void mouse_click(int button);      // 0 = left, 1 = right, 2 = middle
//! void mouse_scroll(int dx, int dy); // positive dy scrolls up
//! void key_press(int keycode);
//! void key_down(int keycode);
//! void key_up(int keycode);
//! ```
//!
//! # Process-wide simulator (for beginners)
//!
//! C callers have no construction hook, so the first call through any of the
//! six functions bootstraps a process-wide [`InputSimulator`]: load the
//! optional config file, install a `tracing` subscriber (best-effort — a
//! subscriber the host already installed wins), and construct the platform
//! backend.  When backend construction fails (on Linux: the X display cannot
//! be opened), the error is logged **once** and every subsequent call becomes
//! a silent no-op.  Nothing here ever returns an error to C, and nothing
//! unwinds across the boundary.
//!
//! The global simulator is intentionally never dropped: process exit reclaims
//! the display connection.  Rust hosts that want deterministic cleanup build
//! their own simulator via [`crate::create_simulator`] instead.

use std::os::raw::c_int;
use std::sync::OnceLock;

use tracing::{debug, error, warn};
use tracing_subscriber::EnvFilter;

use synput_core::{config, Button, InjectionConfig};

use crate::simulator::InputSimulator;

static SIMULATOR: OnceLock<Option<InputSimulator>> = OnceLock::new();

/// Installs the library's subscriber unless the host already installed one.
fn init_tracing(level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .ok();
}

fn bootstrap() -> Option<InputSimulator> {
    // A broken config file must not disable injection: fall back to defaults
    // and report the problem once logging is up.
    let (cfg, load_error) = match config::load_config() {
        Ok(cfg) => (cfg, None),
        Err(e) => (InjectionConfig::default(), Some(e)),
    };

    init_tracing(&cfg.log.level);

    if let Some(e) = load_error {
        warn!("config load failed; continuing with defaults: {e}");
    }

    match crate::create_simulator(&cfg) {
        Ok(sim) => {
            debug!("input backend initialized");
            Some(sim)
        }
        Err(e) => {
            error!("input backend unavailable; all injection calls will be ignored: {e}");
            None
        }
    }
}

fn simulator() -> Option<&'static InputSimulator> {
    SIMULATOR.get_or_init(bootstrap).as_ref()
}

// ── Exported functions ────────────────────────────────────────────────────────

/// Moves the pointer by `(dx, dy)` pixels relative to its current position.
#[no_mangle]
pub extern "C" fn mouse_move(dx: c_int, dy: c_int) {
    let Some(sim) = simulator() else { return };
    if let Err(e) = sim.mouse_move(dx, dy) {
        error!("mouse_move failed: {e}");
    }
}

/// Clicks a button by index; out-of-range indices inject nothing.
#[no_mangle]
pub extern "C" fn mouse_click(button: c_int) {
    let Some(sim) = simulator() else { return };
    let Some(logical) = Button::from_index(button) else {
        debug!(button, "ignoring click for unknown button index");
        return;
    };
    if let Err(e) = sim.mouse_click(logical) {
        error!("mouse_click failed: {e}");
    }
}

/// Scrolls by discrete units; positive `dy` scrolls up.
#[no_mangle]
pub extern "C" fn mouse_scroll(dx: c_int, dy: c_int) {
    let Some(sim) = simulator() else { return };
    if let Err(e) = sim.mouse_scroll(dx, dy) {
        error!("mouse_scroll failed: {e}");
    }
}

/// Presses and releases a key with the configured gap in between.
#[no_mangle]
pub extern "C" fn key_press(keycode: c_int) {
    let Some(sim) = simulator() else { return };
    if let Err(e) = sim.key_press(keycode as u32) {
        error!("key_press failed: {e}");
    }
}

/// Presses a key without releasing it.
#[no_mangle]
pub extern "C" fn key_down(keycode: c_int) {
    let Some(sim) = simulator() else { return };
    if let Err(e) = sim.key_down(keycode as u32) {
        error!("key_down failed: {e}");
    }
}

/// Releases a key.
#[no_mangle]
pub extern "C" fn key_up(keycode: c_int) {
    let Some(sim) = simulator() else { return };
    if let Err(e) = sim.key_up(keycode as u32) {
        error!("key_up failed: {e}");
    }
}
