//! TCP EOF service: accept connections and close each one immediately.
//!
//! The counterpart of the readiness probe — dependent automation points
//! `tcp-eof-probe` at a port this loop is listening on.

use std::net::{Ipv4Addr, SocketAddr, TcpListener};

use anyhow::{Context, Result};

use crate::output::OutputContext;

/// Bind the service listener on all interfaces.
///
/// # Errors
///
/// Returns an error if the port cannot be bound.
pub fn bind(port: u16) -> Result<TcpListener> {
    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
    TcpListener::bind(addr).with_context(|| format!("listening on {addr}"))
}

/// Accept one connection and close it immediately, giving the client a
/// zero-payload EOF.
///
/// # Errors
///
/// Returns the accept error, if any.
pub fn accept_and_close(listener: &TcpListener) -> std::io::Result<()> {
    let (stream, _) = listener.accept()?;
    drop(stream);
    Ok(())
}

/// Accept connections forever. A failed accept is reported and the loop
/// continues; only process exit stops the service.
pub fn run(listener: &TcpListener, ctx: &OutputContext) -> ! {
    loop {
        if let Err(e) = accept_and_close(listener) {
            ctx.error(&format!("Failed to accept connection: {e}"));
        }
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
