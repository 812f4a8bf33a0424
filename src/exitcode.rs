/// Exit codes of the pagemark binary, following the BSD convention where possible.
///
/// Successful termination
pub const SUCCESS: i32 = 0;

/// The requested operation failed
pub const FAILURE: i32 = 1;

/// Command line usage error - invalid arguments, missing required parameters, etc.
pub const USAGE: i32 = 64;

/// Something was found in an unconfigured or misconfigured state
pub const CONFIG: i32 = 78;
