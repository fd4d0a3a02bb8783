//! Broker sessions and publish channels used by claptrap.
//!
//! [`common`] holds the broker-agnostic seams; [`amqp`] implements them on top of lapin.

#[cfg(feature = "amqp-broker")]
pub mod amqp;
pub mod common;
pub mod error;

pub use common::{
    Ack, BrokerConnection, ConnectionParameters, Connector, PublishChannel, PublishTarget,
    CONTENT_TYPE_TEXT,
};
pub use error::{ConnectionFailure, Error, Result};
