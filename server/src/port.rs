use std::io::ErrorKind;
use std::net::{IpAddr, TcpListener};

use tracing::{debug, warn};

use crate::errors::{Result, ServerError};

/// Finds the first bindable port in `start, start + 1, ...`, trying at most
/// `attempts` ports and never going past `u16::MAX`.
///
/// Each candidate is checked by binding a throwaway listener that is dropped
/// immediately. Only `AddrInUse` moves on to the next port; any other bind
/// failure is returned as is. On exhaustion the error carries the number of
/// ports actually tried.
pub fn find_available_port(host: IpAddr, start: u16, attempts: u16) -> Result<u16> {
    let mut tried = 0;

    for offset in 0..attempts {
        let Some(port) = start.checked_add(offset) else {
            debug!(start, tried, "Reached the end of the port range");
            break;
        };
        tried += 1;

        match TcpListener::bind((host, port)) {
            Ok(listener) => {
                drop(listener);
                if port != start {
                    warn!(
                        requested = start,
                        selected = port,
                        "Port {} is in use, falling back to port {}",
                        start,
                        port
                    );
                }
                return Ok(port);
            }
            Err(e) if e.kind() == ErrorKind::AddrInUse => {
                debug!(port, "Port in use, trying the next one");
            }
            Err(source) => return Err(ServerError::Bind { port, source }),
        }
    }

    Err(ServerError::NoAvailablePort {
        start,
        attempts: tried,
    })
}
