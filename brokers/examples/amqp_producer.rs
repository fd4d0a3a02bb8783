use std::env;

use claptrap_brokers::{
    amqp::{AmqpBroker, CONTENT_TYPE_TEXT},
    BrokerConnection, ConnectionParameters, PublishChannel, PublishTarget,
};

#[tokio::main]
async fn main() {
    let host = env::var("AMQP_HOST").unwrap_or_else(|_| "127.0.0.1".into());
    let password = env::var("RABBITMQ_PASSWORD").unwrap_or_default();
    let params = ConnectionParameters::new("guest", password, host, 5672, "/");

    let broker = AmqpBroker::connect(&params)
        .await
        .expect("Failed to connect to broker");
    let channel = broker.open_channel().await.expect("Failed to open channel");

    match channel
        .publish(
            &PublishTarget::new("foobar"),
            br#"{"From":"example","Subject":"hello","Body":"hello"}"#.to_vec(),
            CONTENT_TYPE_TEXT,
        )
        .await
    {
        Ok(_) => println!("Message successfully published."),
        Err(e) => panic!("Failed to publish message: {:?}", e),
    };

    channel.close().await.expect("Failed to close channel");
    broker.close().await.expect("Failed to close connection");
}
