#[macro_use]
extern crate log;

use std::{env, process};

use clap::Parser;

use claptrap_brokers::amqp::AmqpConnector;
use claptrap_send::{
    cli::{self, Args},
    Publisher,
};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let password = cli::password(env::var(cli::PASSWORD_ENV_VAR).ok());
    let publisher = Publisher::new(AmqpConnector);

    match publisher
        .send(
            &args.connection_parameters(password),
            &args.target(),
            &args.message(),
        )
        .await
    {
        Ok(ack) => info!(
            "Message sent ({} bytes, routing key {:?})",
            ack.payload_len, ack.routing_key
        ),
        Err(err) => {
            error!("[{}] {}", err.stage(), err);
            process::exit(err.exit_code());
        }
    }
}
