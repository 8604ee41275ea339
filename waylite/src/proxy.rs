//! The proxy capability contract
//!
//! Every protocol object handle, generated or opaque, implements [`Proxy`]:
//! enough surface for the dispatch loop to route events, size fd buffers and
//! report identity, without knowing any concrete interface.

use std::os::unix::io::OwnedFd;
use std::sync::Weak;

use downcast_rs::{impl_downcast, DowncastSync};
use waylite_backend::protocol::ObjectId;

use crate::conn::{Connection, ConnectionInner};
use crate::Error;

/// Per-interface table counting the file descriptors carried by each request
/// and event, indexed by opcode.
///
/// Pure data emitted by the scanner. The dispatch loop sizes its ancillary
/// buffer from the `events` column before it reads a message body.
#[derive(Debug)]
pub struct FdCounts {
    /// Descriptor count per request opcode
    pub requests: &'static [usize],
    /// Descriptor count per event opcode
    pub events: &'static [usize],
}

/// Capabilities common to every protocol object handle
///
/// Concrete handles can be recovered from an `Arc<dyn Proxy>` with
/// [`downcast_arc`][downcast_rs::DowncastSync], typically inside an
/// `on_global` callback.
pub trait Proxy: DowncastSync {
    /// The object id this proxy speaks for
    fn id(&self) -> ObjectId;

    /// The protocol name of the object's interface
    fn interface_name(&self) -> &str;

    /// The interface version spoken over this proxy
    fn version(&self) -> u32;

    /// The fd-count table of the object's interface
    fn fd_counts(&self) -> &'static FdCounts;

    /// Decode one event and invoke its callback slot
    ///
    /// `fds` carries exactly the descriptors announced by the fd-count
    /// table, in declaration order. An event without an installed callback is
    /// silently dropped; its descriptors are closed when the vector drops.
    fn handle_event(&self, opcode: u16, payload: &[u8], fds: Vec<OwnedFd>) -> Result<(), Error>;
}
impl_downcast!(sync Proxy);

/// A typed protocol interface, implemented by every generated proxy type
pub trait Interface: Proxy + Clone + Sized {
    /// The interface name as advertised by the registry
    const NAME: &'static str;

    /// The interface version these bindings were generated against
    const VERSION: u32;

    /// Build a handle from its id and connection
    fn from_inner(inner: ProxyInner) -> Self;
}

/// The (id, connection) pair at the heart of every generated proxy
#[derive(Debug, Clone)]
pub struct ProxyInner {
    id: ObjectId,
    conn: WeakConnection,
}

impl ProxyInner {
    pub(crate) fn new(id: ObjectId, conn: WeakConnection) -> Self {
        Self { id, conn }
    }

    /// The object id
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// The owning connection
    ///
    /// Fails once the connection has been dropped.
    pub fn connection(&self) -> Result<Connection, Error> {
        self.conn.upgrade().ok_or(Error::Disconnected)
    }
}

// Proxies hold the connection weakly: the object table lives inside the
// connection and stores the proxies, so a strong handle here would cycle.
#[derive(Debug, Clone)]
pub(crate) struct WeakConnection {
    inner: Weak<ConnectionInner>,
}

impl WeakConnection {
    pub(crate) fn new(inner: Weak<ConnectionInner>) -> Self {
        Self { inner }
    }

    pub(crate) fn upgrade(&self) -> Option<Connection> {
        self.inner.upgrade().map(Connection::from_inner)
    }
}

/// Placeholder handle for a global whose interface has no registered
/// constructor
///
/// It exposes the advertised name and version only; its id is null because
/// the global was never bound.
#[derive(Debug, Clone)]
pub struct UnknownInterface {
    interface: String,
    version: u32,
}

impl UnknownInterface {
    pub(crate) fn new(interface: &str, version: u32) -> Self {
        Self { interface: interface.to_owned(), version }
    }
}

static NO_FDS: FdCounts = FdCounts { requests: &[], events: &[] };

impl Proxy for UnknownInterface {
    fn id(&self) -> ObjectId {
        ObjectId::NULL
    }

    fn interface_name(&self) -> &str {
        &self.interface
    }

    fn version(&self) -> u32 {
        self.version
    }

    fn fd_counts(&self) -> &'static FdCounts {
        &NO_FDS
    }

    fn handle_event(&self, opcode: u16, _payload: &[u8], _fds: Vec<OwnedFd>) -> Result<(), Error> {
        Err(Error::OpcodeOutOfRange { interface: self.interface.clone(), opcode })
    }
}
