pub mod contact;
mod error;

pub use contact::*;
pub use error::*;
