#[macro_use]
extern crate log;

pub use publisher::Publisher;

pub mod cli;
pub mod publisher;
