//! Process exit codes reported when a run loop ends

/// The loop exited without errors
pub const SUCCESS: i32 = 0;

/// A failure that does not map to a more specific code
pub const UNKNOWN_ERROR: i32 = -1;

/// The host's `init` hook declined to start
pub const HOST_INIT_FAILED: i32 = -2;

/// A configuration value or call argument was rejected
pub const INVALID_ARGUMENT: i32 = 1;

/// A hook or operation was invoked outside its lifecycle window
pub const LIFECYCLE_VIOLATION: i32 = 2;

/// A lifecycle hook returned an error
pub const HOST_FAILURE: i32 = 3;

/// Configuration could not be read or parsed
pub const CONFIG_ERROR: i32 = 4;
