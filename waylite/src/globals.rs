//! The process-wide constructor registry
//!
//! Generated code registers one constructor per interface; on a registry
//! `global` event the connection consults this table and, on a hit, binds the
//! global into a typed proxy automatically.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use waylite_backend::protocol::ObjectId;

use crate::conn::Connection;
use crate::proxy::{Interface, Proxy, ProxyInner};

/// Constructs a type-erased proxy for a freshly allocated id.
pub(crate) type Constructor = fn(&Connection, ObjectId) -> Arc<dyn Proxy>;

/// Mapping from an advertised `(interface, version)` pair to the constructor
/// of the matching generated proxy type.
pub(crate) type ConstructorMap = HashMap<(String, u32), Constructor>;

static CONSTRUCTORS: OnceCell<ConstructorMap> = OnceCell::new();

/// The registry, populated from the generated protocol code on first use.
pub(crate) fn constructors() -> &'static ConstructorMap {
    CONSTRUCTORS.get_or_init(|| {
        let mut registry = ConstructorMap::new();
        crate::protocol::register_constructors(&mut registry);
        registry
    })
}

/// Adapter turning a typed [`Interface::from_inner`] into a [`Constructor`].
pub(crate) fn constructor<P: Interface>(conn: &Connection, id: ObjectId) -> Arc<dyn Proxy> {
    Arc::new(P::from_inner(ProxyInner::new(id, conn.downgrade())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_interfaces_are_registered() {
        let registry = constructors();
        assert!(registry.contains_key(&("wl_compositor".to_owned(), crate::protocol::Compositor::VERSION)));
        assert!(registry.contains_key(&("wl_shm".to_owned(), crate::protocol::Shm::VERSION)));
        // exact-version matching: a mismatched version has no constructor
        assert!(!registry.contains_key(&("wl_shm".to_owned(), 999)));
    }
}
