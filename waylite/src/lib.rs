//! A small, pure-Rust client library for the Wayland protocol
//!
//! The connection speaks the wire protocol directly over the compositor's
//! Unix socket; no system libwayland is involved. Typed proxies for the core
//! protocol live in [`protocol`] and are produced offline by
//! `waylite-scanner` from the protocol's XML description.
//!
//! A minimal client listing the advertised globals:
//!
//! ```no_run
//! use waylite::{Connection, Proxy};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let conn = Connection::connect()?;
//! conn.on_global(|global| {
//!     println!("({}, {}, {})", global.id(), global.interface_name(), global.version());
//! });
//! conn.sync(|| std::process::exit(0))?;
//! conn.run()?;
//! # Ok(())
//! # }
//! ```
//!
//! Event delivery is pull-free: [`Connection::run`] reads one message at a
//! time and synchronously invokes the callback installed on the receiving
//! proxy, if any. Callbacks must not re-enter the dispatch loop.

#![warn(missing_docs)]

mod conn;
mod globals;
pub mod protocol;
mod proxy;

pub use conn::{ConnectError, Connection, Error, ServerError};
pub use proxy::{FdCounts, Interface, Proxy, ProxyInner, UnknownInterface};

/// Reexport of the backend crate, whose wire-level types appear in this API.
pub use waylite_backend as backend;
