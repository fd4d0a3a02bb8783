use clap::Parser;

use claptrap_brokers::{ConnectionParameters, PublishTarget};
use claptrap_model::Message;

/// Environment variable holding the broker password.
pub const PASSWORD_ENV_VAR: &str = "RABBITMQ_PASSWORD";

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(
    name = "claptrap-send",
    version,
    about = "Publish a single message to an AMQP broker",
    long_about = "Publish a single message to an AMQP broker and exit.\nThe password is read from the RABBITMQ_PASSWORD environment variable; when it is unset a blank password is used."
)]
pub struct Args {
    /// Broker user name
    #[arg(long, env = "RABBITMQ_USER")]
    pub user: String,

    /// Broker host name
    #[arg(long, env = "RABBITMQ_HOST")]
    pub host: String,

    /// Broker port
    #[arg(long, env = "RABBITMQ_PORT")]
    pub port: u16,

    /// Virtual host
    #[arg(long, env = "RABBITMQ_VHOST")]
    pub vhost: String,

    /// Routing key the message is published with
    #[arg(long)]
    pub topic: String,

    /// Exchange to publish through (the default exchange when empty)
    #[arg(long, default_value = "")]
    pub exchange: String,

    /// Sender of the message
    #[arg(long)]
    pub from: String,

    #[arg(long)]
    pub subject: String,

    /// Message body
    #[arg(long)]
    pub message: String,
}

impl Args {
    pub fn connection_parameters(&self, password: String) -> ConnectionParameters {
        ConnectionParameters::new(
            self.user.as_str(),
            password,
            self.host.as_str(),
            self.port,
            self.vhost.as_str(),
        )
    }

    pub fn target(&self) -> PublishTarget {
        PublishTarget::new(self.topic.as_str()).with_exchange(self.exchange.as_str())
    }

    pub fn message(&self) -> Message {
        Message::new(
            self.from.as_str(),
            self.subject.as_str(),
            self.message.as_str(),
        )
    }
}

/// Resolves the password read from [`PASSWORD_ENV_VAR`]. A missing variable means a blank
/// password.
pub fn password(value: Option<String>) -> String {
    match value {
        Some(password) => password,
        None => {
            info!("No environment variable set at {}", PASSWORD_ENV_VAR);
            String::new()
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const SCENARIO: &[&str] = &[
        "claptrap-send",
        "--user=guest",
        "--host=localhost",
        "--port=5672",
        "--vhost=/",
        "--topic=alerts",
        "--from=cron",
        "--subject=backup-ok",
        "--message=done",
    ];

    #[test]
    fn parses_every_flag() {
        let args = Args::try_parse_from(SCENARIO).expect("parse");

        assert_eq!(
            args.connection_parameters(String::new()),
            ConnectionParameters::new("guest", "", "localhost", 5672, "/")
        );
        assert_eq!(args.target(), PublishTarget::new("alerts"));
        assert_eq!(args.message(), Message::new("cron", "backup-ok", "done"));
    }

    #[test]
    fn exchange_is_optional() {
        let mut argv = SCENARIO.to_vec();
        argv.push("--exchange=events");

        let args = Args::try_parse_from(argv).expect("parse");
        assert_eq!(args.target().exchange, "events");
    }

    #[test]
    fn accepts_empty_topic() {
        let argv: Vec<&str> = SCENARIO
            .iter()
            .map(|arg| if arg.starts_with("--topic") { "--topic=" } else { *arg })
            .collect();

        let args = Args::try_parse_from(argv).expect("parse");
        assert_eq!(args.target().destination, "");
    }

    #[test]
    fn requires_message_flags() {
        let argv: Vec<&str> = SCENARIO
            .iter()
            .copied()
            .filter(|arg| !arg.starts_with("--subject"))
            .collect();

        assert!(Args::try_parse_from(argv).is_err());
    }

    #[test]
    fn rejects_invalid_port() {
        let argv: Vec<&str> = SCENARIO
            .iter()
            .map(|arg| if arg.starts_with("--port") { "--port=amqp" } else { *arg })
            .collect();

        assert!(Args::try_parse_from(argv).is_err());
    }

    #[test]
    fn missing_password_is_blank() {
        assert_eq!(password(None), "");
        assert_eq!(password(Some("secret".into())), "secret");
    }
}
