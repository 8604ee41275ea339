//! Wire-level backend for the waylite Wayland client.
//!
//! This crate implements the layers of the protocol that do not depend on any
//! particular interface: the binary codec for message arguments
//! ([`wire`]), the 8-byte message framing ([`wire::MessageHeader`]), the
//! Unix-socket transport with `SCM_RIGHTS` file-descriptor passing
//! ([`socket`]), and the object table keeping client- and server-allocated
//! id ranges disjoint ([`map`]).
//!
//! Everything interface-specific (typed proxies, event callbacks, fd-count
//! tables) is generated by `waylite-scanner` and lives in the `waylite`
//! crate.

#![warn(missing_docs, missing_debug_implementations)]

/// Reexport of the `smallvec` crate, which is part of this crate's public API.
pub extern crate smallvec;

/// Helper macro for quickly making a [`Message`][crate::protocol::Message]
#[macro_export]
macro_rules! message {
    ($sender_id: expr, $opcode: expr, [$($args: expr),* $(,)?] $(,)?) => {
        $crate::protocol::Message {
            sender_id: $sender_id,
            opcode: $opcode,
            args: $crate::smallvec::smallvec![$($args),*],
        }
    }
}

pub mod debug;
pub mod map;
pub mod protocol;
pub mod socket;
pub mod wire;
