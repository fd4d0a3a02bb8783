use async_trait::async_trait;
use lapin::{
    options::BasicPublishOptions,
    types::AMQPValue,
    uri::{AMQPAuthority, AMQPScheme, AMQPUri, AMQPUserInfo},
    BasicProperties, Channel, ChannelState, Connection, ConnectionProperties, ConnectionState,
    Error as LapinError,
};
use nanoid::nanoid;
use tracing::{debug, instrument, warn};

use crate::{
    common::{
        Ack, BrokerConnection, ConnectionParameters, Connector, PublishChannel, PublishTarget,
    },
    error::*,
};

pub use crate::common::CONTENT_TYPE_TEXT;

pub type AmqpProperties = BasicProperties;

const REPLY_SUCCESS: u16 = 200;

impl ConnectionParameters {
    /// Builds the connection URI with the credentials embedded.
    pub fn amqp_uri(&self) -> AMQPUri {
        AMQPUri {
            scheme: AMQPScheme::AMQP,
            authority: AMQPAuthority {
                userinfo: AMQPUserInfo {
                    username: self.username.clone(),
                    password: self.password.clone(),
                },
                host: self.host.clone(),
                port: self.port,
            },
            vhost: self.vhost.clone(),
            ..Default::default()
        }
    }
}

fn classify(err: &LapinError) -> ConnectionFailure {
    match err {
        LapinError::IOError(_) => ConnectionFailure::Network,
        LapinError::ProtocolError(amqp) => ConnectionFailure::from_reply_code(amqp.get_id()),
        _ => ConnectionFailure::Negotiation,
    }
}

/// A connection in any of these states has nothing left to close.
fn connection_released(state: &ConnectionState) -> bool {
    matches!(
        state,
        ConnectionState::Initial
            | ConnectionState::Closing
            | ConnectionState::Closed
            | ConnectionState::Error
    )
}

/// A channel in any of these states has nothing left to close.
fn channel_released(state: &ChannelState) -> bool {
    matches!(
        state,
        ChannelState::Initial | ChannelState::Closing | ChannelState::Closed | ChannelState::Error
    )
}

fn connection_properties() -> ConnectionProperties {
    let mut properties = ConnectionProperties::default();
    properties.client_properties.insert(
        "connection_name".into(),
        AMQPValue::LongString(format!("claptrap-send-{}", nanoid!()).into()),
    );
    properties
}

/// Opens [`AmqpBroker`] sessions.
#[derive(Debug, Clone, Copy, Default)]
pub struct AmqpConnector;

#[async_trait]
impl Connector for AmqpConnector {
    type Connection = AmqpBroker;

    async fn connect(&self, params: &ConnectionParameters) -> Result<AmqpBroker> {
        AmqpBroker::connect(params).await
    }
}

/// An authenticated AMQP session.
pub struct AmqpBroker {
    connection: Connection,
    endpoint: String,
}

impl AmqpBroker {
    /// Connects and authenticates. An empty password is sent as-is; the broker decides whether
    /// to accept it.
    #[instrument(level = "debug", skip(params), fields(endpoint = %params.endpoint()))]
    pub async fn connect(params: &ConnectionParameters) -> Result<AmqpBroker> {
        let endpoint = params.endpoint();
        if !params.has_password() {
            warn!(
                "No password supplied for user {:?}, attempting {} with a blank password",
                params.username, endpoint
            );
        }

        let connection = Connection::connect_uri(params.amqp_uri(), connection_properties())
            .await
            .map_err(|err| Error::connection(endpoint.as_str(), classify(&err), err))?;

        Ok(Self { connection, endpoint })
    }

    pub fn is_connected(&self) -> bool {
        self.connection.status().connected()
    }
}

#[async_trait]
impl BrokerConnection for AmqpBroker {
    type Channel = AmqpChannel;

    async fn open_channel(&self) -> Result<AmqpChannel> {
        let channel = self.connection.create_channel().await.map_err(Error::channel)?;
        debug!("Opened channel {} on {}", channel.id(), self.endpoint);
        Ok(AmqpChannel { channel })
    }

    async fn close(&self) -> Result<()> {
        if connection_released(&self.connection.status().state()) {
            return Ok(());
        }

        self.connection
            .close(REPLY_SUCCESS, "OK")
            .await
            .map_err(|err| Error::close("connection", err))?;
        debug!("Closed connection to {}", self.endpoint);
        Ok(())
    }
}

/// A channel on an [`AmqpBroker`] session.
pub struct AmqpChannel {
    channel: Channel,
}

impl AmqpChannel {
    pub fn is_connected(&self) -> bool {
        self.channel.status().connected()
    }
}

#[async_trait]
impl PublishChannel for AmqpChannel {
    async fn publish(
        &self,
        target: &PublishTarget,
        payload: Vec<u8>,
        content_type: &str,
    ) -> Result<Ack> {
        debug!(
            "Publishing {} bytes to {:?} on exchange {:?}",
            payload.len(),
            target.destination,
            target.exchange
        );

        let payload_len = payload.len();
        let properties = AmqpProperties::default().with_content_type(content_type.into());
        self.channel
            .basic_publish(
                target.exchange.as_str(),
                target.destination.as_str(),
                BasicPublishOptions {
                    mandatory: false,
                    immediate: false,
                },
                payload,
                properties,
            )
            .await
            .map_err(|err| Error::publish(&target.exchange, &target.destination, err))?;

        Ok(Ack {
            exchange: target.exchange.clone(),
            routing_key: target.destination.clone(),
            payload_len,
        })
    }

    async fn close(&self) -> Result<()> {
        if channel_released(&self.channel.status().state()) {
            return Ok(());
        }

        self.channel
            .close(REPLY_SUCCESS, "OK")
            .await
            .map_err(|err| Error::close("channel", err))
    }
}
