//! Minimal Telegram Bot API client used to deliver contact-form
//! notifications.

mod client;
mod error;
mod message;
mod notifier;

pub use client::*;
pub use error::*;
pub use message::*;
pub use notifier::*;
