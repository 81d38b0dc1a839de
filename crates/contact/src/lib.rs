//! Client side of the contact pipeline: field validation, the relay
//! abstraction and the form controller that drives a submission.

mod controller;
mod relay;
mod validation;

pub use controller::*;
pub use relay::*;
pub use validation::*;
