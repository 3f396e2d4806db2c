//! Transient bind probe for local ports.

use std::io;
use std::net::TcpListener;

/// Check whether something is listening on `port` on localhost.
///
/// Binds the port and releases it immediately. `AddrInUse` means an
/// existing listener holds it; any other bind error propagates so the
/// caller can decide how pessimistic to be.
pub fn is_port_bound(port: u16) -> io::Result<bool> {
    match TcpListener::bind(("127.0.0.1", port)) {
        Ok(listener) => {
            drop(listener);
            Ok(false)
        }
        Err(err) if err.kind() == io::ErrorKind::AddrInUse => Ok(true),
        Err(err) => Err(err),
    }
}
