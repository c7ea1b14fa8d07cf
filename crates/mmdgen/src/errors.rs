//! Exit codes for mmdgen.
//!
//! Environment and input errors get distinct codes so callers can tell a
//! broken setup from a diagram that failed to render.

/// Exit code for success.
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code for general errors, including a failed render (the outcome
/// report carries the recovery guidance).
pub const EXIT_GENERAL_ERROR: i32 = 1;

/// Exit code when no usable diagram source was supplied.
pub const EXIT_NO_INPUT: i32 = 64;

/// Exit code when the external renderer (mmdc) is unavailable.
pub const EXIT_RENDERER_UNAVAILABLE: i32 = 70;
