use std::fmt::{self, Debug};

use async_trait::async_trait;

use crate::error::Result;

/// Content type stamped on every published message.
pub const CONTENT_TYPE_TEXT: &str = "text/plain";

/// Everything needed to open a session with a broker.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionParameters {
    pub username: String,
    /// May be empty. Never rendered by `Debug` or [`ConnectionParameters::endpoint`].
    pub password: String,
    pub host: String,
    pub port: u16,
    /// Virtual host namespace, passed to the broker verbatim.
    pub vhost: String,
}

impl ConnectionParameters {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        host: impl Into<String>,
        port: u16,
        vhost: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            host: host.into(),
            port,
            vhost: vhost.into(),
        }
    }

    pub fn has_password(&self) -> bool {
        !self.password.is_empty()
    }

    /// The broker address with the credentials stripped, for logs and error messages.
    pub fn endpoint(&self) -> String {
        format!(
            "amqp://{}@{}:{}/{}",
            self.username, self.host, self.port, self.vhost
        )
    }
}

impl Debug for ConnectionParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionParameters")
            .field("username", &self.username)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("vhost", &self.vhost)
            .finish_non_exhaustive()
    }
}

/// Where a message is routed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishTarget {
    /// Routing key. May be empty.
    pub destination: String,
    /// Exchange name; the empty string is the default exchange.
    pub exchange: String,
}

impl PublishTarget {
    /// Targets `destination` through the default exchange.
    pub fn new(destination: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            exchange: String::new(),
        }
    }

    pub fn with_exchange(mut self, exchange: impl Into<String>) -> Self {
        self.exchange = exchange.into();
        self
    }
}

/// Local receipt of a publish: the frame was handed to the transport without error.
/// The broker is not asked to confirm delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ack {
    pub exchange: String,
    pub routing_key: String,
    pub payload_len: usize,
}

/// Opens sessions with a broker.
#[async_trait]
pub trait Connector {
    type Connection: BrokerConnection + Send + Sync;

    async fn connect(&self, params: &ConnectionParameters) -> Result<Self::Connection>;
}

/// An established session with a broker.
#[async_trait]
pub trait BrokerConnection {
    type Channel: PublishChannel + Send + Sync;

    async fn open_channel(&self) -> Result<Self::Channel>;

    /// Releases the session. Closing an already closed connection succeeds.
    async fn close(&self) -> Result<()>;
}

/// A logical channel through which publishes are issued.
#[async_trait]
pub trait PublishChannel {
    /// Publishes without the mandatory or immediate flags; unroutable messages are dropped by
    /// the broker.
    async fn publish(
        &self,
        target: &PublishTarget,
        payload: Vec<u8>,
        content_type: &str,
    ) -> Result<Ack>;

    /// Releases the channel. Closing an already closed channel succeeds.
    async fn close(&self) -> Result<()>;
}
