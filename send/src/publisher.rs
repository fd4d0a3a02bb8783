//! Sends one message through a broker: connect, open a channel, encode, publish, then release
//! the channel and the connection in that order.
//!
//! The first failing step ends the run. Anything acquired before it is still released, and a
//! failure while releasing is only logged so it never hides the outcome of the publish.

use claptrap_brokers::{
    Ack, BrokerConnection, ConnectionParameters, Connector, PublishChannel, PublishTarget, Result,
    CONTENT_TYPE_TEXT,
};
use claptrap_model::Message;

pub struct Publisher<C> {
    connector: C,
}

impl<C> Publisher<C>
where
    C: Connector,
{
    pub fn new(connector: C) -> Self {
        Self { connector }
    }

    pub async fn send(
        &self,
        params: &ConnectionParameters,
        target: &PublishTarget,
        message: &Message,
    ) -> Result<Ack> {
        let connection = self.connector.connect(params).await?;
        debug!("Connected to {}", params.endpoint());

        let outcome = publish_on(&connection, target, message).await;
        release(connection.close().await);
        outcome
    }
}

async fn publish_on<B>(connection: &B, target: &PublishTarget, message: &Message) -> Result<Ack>
where
    B: BrokerConnection,
{
    let channel = connection.open_channel().await?;
    debug!("Channel open");

    let outcome = publish_message(&channel, target, message).await;
    release(channel.close().await);
    outcome
}

async fn publish_message<P>(channel: &P, target: &PublishTarget, message: &Message) -> Result<Ack>
where
    P: PublishChannel,
{
    let payload = message.to_json()?;
    let ack = channel.publish(target, payload, CONTENT_TYPE_TEXT).await?;
    debug!(
        "Published {} bytes to {:?} on exchange {:?}",
        ack.payload_len, ack.routing_key, ack.exchange
    );
    Ok(ack)
}

fn release(closed: Result<()>) {
    if let Err(err) = closed {
        warn!("{}", err);
    }
}
