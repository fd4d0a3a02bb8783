//! Payload types for messages published by claptrap.

#[macro_use]
extern crate serde_derive;

pub use message::Message;

pub mod message;
