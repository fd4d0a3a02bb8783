use std::{error::Error as StdError, fmt, result::Result as StdResult};

use thiserror::Error;

pub type Result<T, E = Error> = StdResult<T, E>;

/// The underlying failure reported by the transport or the broker.
pub type Cause = Box<dyn StdError + Send + Sync>;

/// Why a connection attempt was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionFailure {
    /// DNS resolution or the TCP/IO layer failed.
    Network,
    /// The broker rejected the supplied credentials.
    Authentication,
    /// The virtual host does not exist or the user may not access it.
    VirtualHost,
    /// The handshake failed for any other reason.
    Negotiation,
}

impl ConnectionFailure {
    /// Classifies the reply code of a `connection.close` sent by the broker during the handshake.
    pub fn from_reply_code(code: u16) -> Self {
        match code {
            403 => ConnectionFailure::Authentication,
            530 => ConnectionFailure::VirtualHost,
            _ => ConnectionFailure::Negotiation,
        }
    }
}

impl fmt::Display for ConnectionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConnectionFailure::Network => "network failure",
            ConnectionFailure::Authentication => "authentication rejected",
            ConnectionFailure::VirtualHost => "virtual host unavailable",
            ConnectionFailure::Negotiation => "protocol negotiation failed",
        })
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to connect to {endpoint} ({kind}): {source}")]
    Connection {
        endpoint: String,
        kind: ConnectionFailure,
        #[source]
        source: Cause,
    },

    #[error("Failed to open a channel: {0}")]
    Channel(#[source] Cause),

    #[error("Failed to encode the message: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("Failed to publish to routing key {routing_key:?} on exchange {exchange:?}: {source}")]
    Publish {
        exchange: String,
        routing_key: String,
        #[source]
        source: Cause,
    },

    #[error("Failed to close the {resource}: {source}")]
    Close {
        resource: &'static str,
        #[source]
        source: Cause,
    },
}

impl Error {
    pub fn connection(
        endpoint: impl Into<String>,
        kind: ConnectionFailure,
        source: impl Into<Cause>,
    ) -> Self {
        Error::Connection {
            endpoint: endpoint.into(),
            kind,
            source: source.into(),
        }
    }

    pub fn channel(source: impl Into<Cause>) -> Self {
        Error::Channel(source.into())
    }

    pub fn publish(exchange: &str, routing_key: &str, source: impl Into<Cause>) -> Self {
        Error::Publish {
            exchange: exchange.to_owned(),
            routing_key: routing_key.to_owned(),
            source: source.into(),
        }
    }

    pub fn close(resource: &'static str, source: impl Into<Cause>) -> Self {
        Error::Close {
            resource,
            source: source.into(),
        }
    }

    /// The step of the publish pathway that failed.
    pub fn stage(&self) -> &'static str {
        match self {
            Error::Connection { .. } => "connect",
            Error::Channel(_) => "open channel",
            Error::Encoding(_) => "encode",
            Error::Publish { .. } => "publish",
            Error::Close { .. } => "close",
        }
    }

    /// Process exit status reported for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Connection { .. } => 3,
            Error::Channel(_) => 4,
            Error::Encoding(_) => 5,
            Error::Publish { .. } => 6,
            Error::Close { .. } => 1,
        }
    }
}
