//! The client and its rate limited command dispatch.

use crate::{
    config::ClientConfig,
    errors::Result,
    packet::{connectionless, strip_envelope},
    socket::{Transport, UdpTransport},
};
use bytes::Bytes;
use log::trace;
use tokio::{sync::Mutex, time::sleep};

/// Client for one Quake 3 server.
///
/// Every command is a single UDP round trip. After each one the client waits
/// for the configured rate limit before the next command may go out, so a
/// server is never flooded by one client. Commands issued concurrently on the
/// same client queue up behind each other.
///
/// # Examples
///
/// ```no_run
/// use q3_rcon::{ClientConfig, Q3Client};
///
/// #[tokio::main]
/// async fn main() -> q3_rcon::Result<()> {
///     let config = ClientConfig::builder("127.0.0.1", 27960)
///         .rcon_password("secret")
///         .build()?;
///     let client = Q3Client::new(config);
///
///     let info = client.server_info().await?;
///     println!("{:?}", info.hostname());
///
///     let output = client.send_rcon("status").await?;
///     println!("{output}");
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct Q3Client<T = UdpTransport> {
    config: ClientConfig,
    transport: T,
    dispatch: Mutex<()>,
}

impl Q3Client {
    /// Construct a client that talks to the configured server over UDP.
    pub fn new(config: ClientConfig) -> Self {
        Self::with_transport(config, UdpTransport)
    }
}

impl<T: Transport> Q3Client<T> {
    /// Construct a client that performs its exchanges through `transport`.
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self {
            config,
            transport,
            dispatch: Mutex::new(()),
        }
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send `command` as a connectionless packet and return the raw reply,
    /// envelope included.
    ///
    /// The call only returns once the rate limit has passed, even if the
    /// exchange failed.
    ///
    /// # Errors
    /// Returns [`Error::Transport`](crate::Error::Transport) or
    /// [`Error::Timeout`](crate::Error::Timeout) if the exchange failed.
    pub async fn send_raw(&self, command: &str) -> Result<Bytes> {
        self.dispatch(command, command).await
    }

    /// Like [`send_raw`](Self::send_raw), but strips the envelope and decodes
    /// the rest as text. Replies of 4 bytes or less become an empty string.
    ///
    /// # Errors
    /// Same as [`send_raw`](Self::send_raw).
    pub async fn send(&self, command: &str) -> Result<String> {
        let raw = self.send_raw(command).await?;
        Ok(decode(&raw))
    }

    /// Dispatch `command`, logging it as `shown` so secrets stay out of logs.
    pub(crate) async fn dispatch(&self, command: &str, shown: &str) -> Result<Bytes> {
        let _guard = self.dispatch.lock().await;

        trace!(
            "dispatching {shown:?} to {}:{}",
            self.config.address(),
            self.config.port()
        );

        let result = self
            .transport
            .exchange(
                connectionless(command),
                self.config.address(),
                self.config.port(),
                self.config.timeout(),
            )
            .await;

        let rate_limit = self.config.rate_limit();
        if !rate_limit.is_zero() {
            trace!("rate limiting for {rate_limit:?}");
            sleep(rate_limit).await;
        }

        result
    }
}

/// Text of a reply without its envelope.
pub(crate) fn decode(raw: &[u8]) -> String {
    strip_envelope(raw)
        .map(|payload| String::from_utf8_lossy(payload).into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::Q3Client;
    use crate::{
        config::ClientConfig,
        errors::{Error, Result},
        socket::Transport,
    };
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::{
        sync::{
            atomic::{AtomicUsize, Ordering},
            Arc, Mutex,
        },
        time::{Duration, Instant},
    };

    /// Answers every exchange with the same reply and records what was sent.
    #[derive(Debug, Clone, Default)]
    pub(crate) struct MockTransport {
        reply: Bytes,
        pub calls: Arc<AtomicUsize>,
        pub sent: Arc<Mutex<Vec<Bytes>>>,
    }

    impl MockTransport {
        pub(crate) fn replying(reply: impl Into<Bytes>) -> Self {
            Self {
                reply: reply.into(),
                ..Self::default()
            }
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub(crate) fn last_sent(&self) -> Option<Bytes> {
            self.sent.lock().unwrap().last().cloned()
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn exchange(&self, payload: Bytes, _: &str, _: u16, _: Duration) -> Result<Bytes> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.sent.lock().unwrap().push(payload);
            Ok(self.reply.clone())
        }
    }

    /// Never answers.
    struct SilentTransport;

    #[async_trait]
    impl Transport for SilentTransport {
        async fn exchange(&self, _: Bytes, _: &str, _: u16, dur: Duration) -> Result<Bytes> {
            tokio::time::sleep(dur).await;
            Err(Error::Timeout(dur))
        }
    }

    pub(crate) fn mock_client(
        reply: &'static [u8],
        password: &str,
    ) -> (Q3Client<MockTransport>, MockTransport) {
        let transport = MockTransport::replying(reply);
        let config = ClientConfig::builder("127.0.0.1", 27960)
            .rcon_password(password)
            .rate_limit(Duration::ZERO)
            .build()
            .unwrap();

        (Q3Client::with_transport(config, transport.clone()), transport)
    }

    #[tokio::test]
    async fn test_send_raw_frames_command() -> Result<()> {
        let (client, transport) = mock_client(b"\x00\x01", "");

        let reply = client.send_raw("getchallenge").await?;

        assert_eq!(&reply[..], b"\x00\x01");
        assert_eq!(
            transport.last_sent().as_deref(),
            Some(&b"\xff\xff\xff\xffgetchallenge"[..])
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_send_strips_envelope() -> Result<()> {
        let (client, _) = mock_client(b"\xff\xff\xff\xffprint\nmap: ut4_casa\n", "");
        assert_eq!(client.send("anything").await?, "print\nmap: ut4_casa\n");

        let (client, _) = mock_client(b"\xff\xff\xff\xff", "");
        assert_eq!(client.send("anything").await?, "");

        let (client, _) = mock_client(b"", "");
        assert_eq!(client.send("anything").await?, "");

        Ok(())
    }

    #[tokio::test]
    async fn test_rate_limit_between_commands() -> Result<()> {
        let rate_limit = Duration::from_millis(150);
        let config = ClientConfig::builder("127.0.0.1", 27960)
            .rate_limit(rate_limit)
            .build()?;
        let client = Q3Client::with_transport(
            config,
            MockTransport::replying(&b"\xff\xff\xff\xffok"[..]),
        );

        let start = Instant::now();
        client.send("first").await?;
        let between = Instant::now();
        client.send("second").await?;

        assert!(between - start >= rate_limit);
        assert!(start.elapsed() >= rate_limit * 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_rate_limit_holds_for_concurrent_commands() -> Result<()> {
        let rate_limit = Duration::from_millis(100);
        let config = ClientConfig::builder("127.0.0.1", 27960)
            .rate_limit(rate_limit)
            .build()?;
        let client = Arc::new(Q3Client::with_transport(
            config,
            MockTransport::replying(&b"\xff\xff\xff\xffok"[..]),
        ));

        let start = Instant::now();
        let (a, b, c) = tokio::join!(client.send("a"), client.send("b"), client.send("c"));
        a?;
        b?;
        c?;

        assert!(start.elapsed() >= rate_limit * 3);

        Ok(())
    }

    #[tokio::test]
    async fn test_failed_exchange_is_rate_limited() {
        let rate_limit = Duration::from_millis(100);
        let timeout = Duration::from_millis(50);
        let config = ClientConfig::builder("127.0.0.1", 27960)
            .rate_limit(rate_limit)
            .timeout(timeout)
            .build()
            .unwrap();
        let client = Q3Client::with_transport(config, SilentTransport);

        let start = Instant::now();
        let result = client.send_raw("getinfo").await;

        assert!(matches!(result, Err(Error::Timeout(d)) if d == timeout));
        assert!(start.elapsed() >= timeout + rate_limit);
    }
}
