//! By-name access to the services.
//!
//! Callers address an operation by its method name and pass a camelCase JSON
//! argument bag. Results are serialized back to JSON.

pub mod error;
pub mod interface;
pub mod method;
pub mod params;

pub use error::{RemoteError, RemoteResult};
pub use interface::{RemoteInterface, Request};
pub use method::Method;
