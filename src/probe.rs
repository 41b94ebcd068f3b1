//! TCP readiness probe: connect with bounded retries, expect immediate EOF.

use std::io::Read;
use std::net::{Ipv4Addr, SocketAddr, TcpStream};
use std::time::Duration;

use anyhow::{Context, Result};

/// Upper size of the single bounded read.
const READ_BUF_LEN: usize = 1024;

/// Knobs for the connect/retry loop.
///
/// Defaults match CI smoke-test use: 10 attempts, 1 s between refusals,
/// 5 s socket timeouts on both the connect and the read.
#[derive(Debug, Clone)]
pub struct ProbeOptions {
    /// Total connection attempts before giving up.
    pub attempts: u32,
    /// Sleep between attempts after a refused connection.
    pub retry_delay: Duration,
    /// Timeout applied to each connection attempt.
    pub connect_timeout: Duration,
    /// Timeout applied to the single read.
    pub read_timeout: Duration,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            attempts: 10,
            retry_delay: Duration::from_secs(1),
            connect_timeout: Duration::from_secs(5),
            read_timeout: Duration::from_secs(5),
        }
    }
}

/// Terminal result of a probe run.
///
/// `NeverReady` is a clean outcome rather than an error: the service
/// refused every connection attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The peer closed its write side with no payload sent.
    Eof,
    /// The peer sent data before closing; carries what was read.
    UnexpectedData(Vec<u8>),
    /// Every attempt was refused.
    NeverReady,
}

/// Connect to `127.0.0.1:{port}` and check that the peer closes the
/// connection without sending data.
///
/// Refused connections are retried with a fixed delay, except after the
/// final attempt. Both the connect and the single read are bounded by
/// their timeouts. On the first successful connection exactly one bounded
/// read is performed: zero bytes is [`ProbeOutcome::Eof`], anything else is
/// [`ProbeOutcome::UnexpectedData`].
///
/// # Errors
///
/// Any transport error other than a refused connection propagates,
/// including a timed-out connect.
pub fn probe(port: u16, opts: &ProbeOptions) -> Result<ProbeOutcome> {
    let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, port));
    for attempt in 1..=opts.attempts {
        let mut stream = match TcpStream::connect_timeout(&addr, opts.connect_timeout) {
            Ok(stream) => stream,
            Err(e) if e.kind() == std::io::ErrorKind::ConnectionRefused => {
                if attempt == opts.attempts {
                    return Ok(ProbeOutcome::NeverReady);
                }
                std::thread::sleep(opts.retry_delay);
                continue;
            }
            Err(e) => return Err(e).with_context(|| format!("connecting to {addr}")),
        };

        stream
            .set_read_timeout(Some(opts.read_timeout))
            .context("setting read timeout")?;

        let mut buf = [0u8; READ_BUF_LEN];
        let n = stream
            .read(&mut buf)
            .with_context(|| format!("reading from {addr}"))?;
        return Ok(if n == 0 {
            ProbeOutcome::Eof
        } else {
            ProbeOutcome::UnexpectedData(buf[..n].to_vec())
        });
    }
    Ok(ProbeOutcome::NeverReady)
}

// ── Unit tests ───────────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::net::TcpListener;
    use std::thread;
    use std::time::Instant;

    fn fast_opts(attempts: u32) -> ProbeOptions {
        ProbeOptions {
            attempts,
            retry_delay: Duration::from_millis(50),
            connect_timeout: Duration::from_secs(5),
            read_timeout: Duration::from_secs(5),
        }
    }

    /// Bind then immediately drop a listener to obtain a local port with
    /// nothing listening on it.
    fn dead_port() -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    }

    #[test]
    fn test_probe_immediate_close_yields_eof() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let server = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            drop(stream);
        });

        let outcome = probe(port, &fast_opts(10)).unwrap();
        assert_eq!(outcome, ProbeOutcome::Eof);
        server.join().unwrap();
    }

    #[test]
    fn test_probe_payload_before_close_yields_unexpected_data() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let server = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            stream.write_all(b"hello").unwrap();
        });

        let outcome = probe(port, &fast_opts(10)).unwrap();
        assert_eq!(outcome, ProbeOutcome::UnexpectedData(b"hello".to_vec()));
        server.join().unwrap();
    }

    #[test]
    fn test_probe_all_attempts_refused_yields_never_ready() {
        let port = dead_port();
        let opts = ProbeOptions {
            retry_delay: Duration::from_millis(200),
            ..fast_opts(3)
        };

        let start = Instant::now();
        let outcome = probe(port, &opts).unwrap();
        let elapsed = start.elapsed();

        assert_eq!(outcome, ProbeOutcome::NeverReady);
        // 3 attempts, 2 delays: the final refusal sleeps no extra time.
        assert!(
            elapsed >= opts.retry_delay * 2,
            "expected at least two retry delays, got {elapsed:?}"
        );
        // Refusals on loopback are immediate; a third delay would push the
        // run past this bound.
        assert!(
            elapsed < opts.retry_delay * 2 + Duration::from_millis(150),
            "expected exactly two retry delays, got {elapsed:?}"
        );
    }

    #[test]
    fn test_default_options_bound_every_blocking_point() {
        let opts = ProbeOptions::default();
        assert_eq!(opts.attempts, 10);
        assert_eq!(opts.retry_delay, Duration::from_secs(1));
        assert_eq!(opts.connect_timeout, Duration::from_secs(5));
        assert_eq!(opts.read_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_probe_succeeds_once_listener_appears() {
        let port = dead_port();
        let server = thread::spawn(move || {
            thread::sleep(Duration::from_millis(120));
            let listener = TcpListener::bind(("127.0.0.1", port)).unwrap();
            let (stream, _) = listener.accept().unwrap();
            drop(stream);
        });

        let outcome = probe(port, &fast_opts(10)).unwrap();
        assert_eq!(outcome, ProbeOutcome::Eof);
        server.join().unwrap();
    }

    #[test]
    fn test_probe_zero_attempts_yields_never_ready() {
        let outcome = probe(dead_port(), &fast_opts(0)).unwrap();
        assert_eq!(outcome, ProbeOutcome::NeverReady);
    }
}
