//! Office map capability: a link to the address and, where a key is
//! configured, a loaded maps script behind a single-flight loader.

mod error;
mod loader;
mod provider;

pub use error::*;
pub use loader::*;
pub use provider::*;
