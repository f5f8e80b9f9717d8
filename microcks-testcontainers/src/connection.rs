//! Broker connections used by the async minion

/// A Kafka broker reachable from the container network
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KafkaConnection {
    /// Bootstrap servers as seen from inside the network (e.g., "kafka:19092")
    pub bootstrap_servers: String,
}

impl KafkaConnection {
    pub fn new(bootstrap_servers: impl Into<String>) -> Self {
        Self {
            bootstrap_servers: bootstrap_servers.into(),
        }
    }
}

/// A broker identified by URL with optional credentials (AMQP, MQTT, ...)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenericConnection {
    pub url: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl GenericConnection {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_credentials(
        url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            username: Some(username.into()),
            password: Some(password.into()),
        }
    }
}
