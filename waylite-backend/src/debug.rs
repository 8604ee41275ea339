//! Debugging helpers to handle `WAYLAND_DEBUG` env variable.

use std::{
    fmt::Display,
    os::unix::io::AsRawFd,
    time::{SystemTime, UNIX_EPOCH},
};

use crate::protocol::Argument;

/// The `WAYLAND_DEBUG` env variable is set to debug client.
pub fn has_debug_client_env() -> bool {
    matches!(std::env::var_os("WAYLAND_DEBUG"), Some(str) if str == "1" || str == "client")
}

/// Print a dispatched message to stderr in a following format:
///
/// `[timestamp] <- interface@id.opcode (bytes, fds)`
///
/// Incoming messages are traced before their arguments are decoded, so only
/// the sizes are shown.
pub fn print_dispatched_message(
    interface: &str,
    id: u32,
    opcode: u16,
    payload_len: usize,
    fd_count: usize,
) {
    print_timestamp();
    eprintln!(" <- {}@{}.[{}] ({} bytes, {} fds)", interface, id, opcode, payload_len, fd_count);
}

/// Print a sent message to stderr in a following format:
///
/// `[timestamp] -> interface@id.opcode(args)`
pub fn print_send_message<Fd: AsRawFd>(
    interface: &str,
    id: u32,
    opcode: u16,
    args: &[Argument<Fd>],
) {
    print_timestamp();
    eprintln!(" -> {}@{}.[{}]({})", interface, id, opcode, DisplaySlice(args));
}

struct DisplaySlice<'a, D>(pub &'a [D]);

impl<D: Display> Display for DisplaySlice<'_, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut it = self.0.iter();
        if let Some(val) = it.next() {
            write!(f, "{val}")?;
        }
        for val in it {
            write!(f, ", {val}")?;
        }
        Ok(())
    }
}

/// Print timestamp in seconds.milliseconds format.
fn print_timestamp() {
    if let Ok(timestamp) = SystemTime::now().duration_since(UNIX_EPOCH) {
        let time = (timestamp.as_secs() * 1000000 + timestamp.subsec_nanos() as u64 / 1000) as u32;
        eprint!("[{:7}.{:03}]", time / 1000, time % 1000);
    }
}
