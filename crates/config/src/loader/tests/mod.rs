//! Tests for startup loading against real files.
//!
//! Responsibilities:
//! - Test the env-file cascade order and overwrite semantics.
//! - Test required vs optional files and the `DOTENV_DISABLED` gate.
//! - Test that loading into the real process environment overwrites OS values.
//!
//! Invariants:
//! - Tests use `serial_test` and `env_lock()` when touching the process environment.
//! - Temporary directories are cleaned up automatically via `tempfile`.

use std::sync::Mutex;


/// Returns the global test lock for environment variable isolation.
pub fn env_lock() -> &'static Mutex<()> {
    crate::test_util::global_test_lock()
}
