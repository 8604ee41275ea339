//! Connection management and the dispatch loop

use std::env;
use std::io::ErrorKind;
use std::os::unix::io::{AsFd, BorrowedFd, FromRawFd, OwnedFd, RawFd};
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use once_cell::sync::OnceCell;
use waylite_backend::debug;
use waylite_backend::map::ObjectMap;
use waylite_backend::message;
use waylite_backend::protocol::{Argument, Message, ObjectId};
use waylite_backend::socket::Socket;
use waylite_backend::wire::{self, MessageHeader, MessageParseError, MessageWriteError};

use crate::globals::{self, Constructor};
use crate::protocol::{Display, Registry};
use crate::proxy::{Interface, Proxy, ProxyInner, UnknownInterface, WeakConnection};

/// An error reported by the server through `wl_display.error`
///
/// The server kills the connection after sending one; the dispatch loop
/// surfaces it on its next iteration so it is ordered correctly relative to
/// the events before it.
#[derive(Debug, thiserror::Error)]
#[error("server error: {message:?} (object id = {object_id}, error code = {code})")]
pub struct ServerError {
    /// Id of the object the error concerns
    pub object_id: ObjectId,
    /// Interface-defined error code
    pub code: u32,
    /// Human-readable description from the server
    pub message: String,
}

/// Any error surfacing from a connection
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The socket failed
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A message could not be decoded
    #[error(transparent)]
    Parse(#[from] MessageParseError),

    /// A message could not be encoded
    #[error(transparent)]
    Write(#[from] MessageWriteError),

    /// The server reported a fatal error
    #[error(transparent)]
    Server(#[from] ServerError),

    /// An incoming header carried a size below the 8-byte minimum
    #[error("message header specifies a size ({size}) that is too small (minimum is 8)")]
    HeaderTooSmall {
        /// The size the header claimed
        size: u16,
    },

    /// An incoming message named a sender the object table does not know
    #[error("unknown sender object id {0}")]
    UnknownSender(u32),

    /// An incoming opcode is outside the sender's event table
    #[error("opcode {opcode} of {interface} is out of range")]
    OpcodeOutOfRange {
        /// Interface of the sender
        interface: String,
        /// The out-of-range opcode
        opcode: u16,
    },

    /// The kernel returned fewer bytes or descriptors than the header announced
    #[error("short read: got {got_bytes} bytes and {got_fds} fds, expected {expected_bytes} and {expected_fds}")]
    ShortRead {
        /// Bytes the header announced
        expected_bytes: usize,
        /// Bytes actually received
        got_bytes: usize,
        /// Descriptors the fd-count table announced
        expected_fds: usize,
        /// Descriptors actually received
        got_fds: usize,
    },

    /// An event did not match its declared signature
    #[error("malformed {interface} event {opcode}")]
    BadMessage {
        /// Interface of the sender
        interface: String,
        /// Opcode of the offending event
        opcode: u16,
    },

    /// The server already deleted the object this request was sent through
    #[error("object {0} is no longer alive")]
    ObjectDeleted(ObjectId),

    /// A server-created object collided with an existing id
    #[error("id {0} is already taken")]
    IdCollision(ObjectId),

    /// The connection has been dropped
    #[error("the connection is closed")]
    Disconnected,
}

/// An error when trying to establish a Wayland connection
#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    /// `WAYLAND_SOCKET` was set but contained garbage
    #[error("WAYLAND_SOCKET was set but contained garbage")]
    InvalidFd,

    /// Dialing the compositor's socket failed
    #[error("could not connect to the compositor socket: {0}")]
    Io(#[from] std::io::Error),

    /// The initial handshake failed
    #[error("initial handshake failed: {0}")]
    Setup(#[from] Error),
}

/// A connection to a Wayland compositor
///
/// Cheap to clone; all clones drive the same connection. Requests may be sent
/// from any thread, each in one atomic `sendmsg`; events are read by whichever
/// single thread runs [`run`][Self::run] or
/// [`dispatch_one`][Self::dispatch_one].
#[derive(Debug, Clone)]
pub struct Connection {
    inner: Arc<ConnectionInner>,
}

pub(crate) struct ConnectionInner {
    socket: Socket,
    // serializes sendmsg so concurrent requests do not interleave
    send_lock: Mutex<()>,
    state: Mutex<ConnState>,
    on_global: Mutex<Option<Box<dyn FnMut(Arc<dyn Proxy>) + Send>>>,
    display: OnceCell<Display>,
    registry: OnceCell<Registry>,
    debug: bool,
}

impl std::fmt::Debug for ConnectionInner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ConnectionInner { .. }")
    }
}

struct ConnState {
    map: ObjectMap<Arc<dyn Proxy>>,
    // error received from the server's Display object; the next dispatch
    // iteration exits with it
    last_error: Option<Error>,
}

impl Connection {
    /// Connect to the compositor named by the environment
    ///
    /// `$WAYLAND_SOCKET` (an inherited, pre-connected descriptor) wins;
    /// otherwise `$WAYLAND_DISPLAY` is joined with `$XDG_RUNTIME_DIR`, with
    /// `/run/user/<uid>` and `wayland-0` as the fallbacks. An absolute
    /// `$WAYLAND_DISPLAY` is used as-is.
    pub fn connect() -> Result<Connection, ConnectError> {
        if let Some(stream) = socket_from_env()? {
            return Ok(Self::from_stream(stream)?);
        }
        let stream = UnixStream::connect(socket_path_from_env())?;
        Ok(Self::from_stream(stream)?)
    }

    /// Connect to the compositor socket at an explicit path
    pub fn connect_to_path(path: impl AsRef<Path>) -> Result<Connection, ConnectError> {
        let stream = UnixStream::connect(path)?;
        Ok(Self::from_stream(stream)?)
    }

    /// Initialize a connection over an already established Unix stream
    ///
    /// Inserts the display at id 1, wires its `error` and `delete_id` events,
    /// and obtains the registry.
    pub fn from_stream(stream: UnixStream) -> Result<Connection, Error> {
        let conn = Connection {
            inner: Arc::new(ConnectionInner {
                socket: Socket::from(stream),
                send_lock: Mutex::new(()),
                state: Mutex::new(ConnState { map: ObjectMap::new(), last_error: None }),
                on_global: Mutex::new(None),
                display: OnceCell::new(),
                registry: OnceCell::new(),
                debug: debug::has_debug_client_env(),
            }),
        };

        let display = Display::from_inner(ProxyInner::new(ObjectId::DISPLAY, conn.downgrade()));
        conn.inner
            .state
            .lock()
            .unwrap()
            .map
            .insert_at(ObjectId::DISPLAY.raw(), Arc::new(display.clone()))
            .expect("object map starts empty");

        let weak = conn.downgrade();
        display.on_error(move |object_id, code, message| {
            if let Some(conn) = weak.upgrade() {
                let err = ServerError { object_id, code, message };
                log::error!("{err}");
                conn.inner.state.lock().unwrap().last_error = Some(err.into());
            }
        });

        let weak = conn.downgrade();
        display.on_delete_id(move |id| {
            if let Some(conn) = weak.upgrade() {
                conn.inner.state.lock().unwrap().map.remove(id);
            }
        });

        let registry = display.get_registry()?;
        let weak = conn.downgrade();
        registry.on_global(move |name, interface, version| {
            if let Some(conn) = weak.upgrade() {
                conn.handle_global(name, &interface, version);
            }
        });

        conn.inner.display.set(display).expect("display is wired once");
        conn.inner.registry.set(registry).expect("registry is wired once");
        log::debug!("connection established, registry at id {}", conn.registry().id());
        Ok(conn)
    }

    pub(crate) fn from_inner(inner: Arc<ConnectionInner>) -> Connection {
        Connection { inner }
    }

    pub(crate) fn downgrade(&self) -> WeakConnection {
        WeakConnection::new(Arc::downgrade(&self.inner))
    }

    /// The `wl_display` proxy
    pub fn display(&self) -> Display {
        self.inner.display.get().expect("set at connect time").clone()
    }

    /// The `wl_registry` proxy
    pub fn registry(&self) -> Registry {
        self.inner.registry.get().expect("set at connect time").clone()
    }

    /// Install the callback invoked for every advertised global
    ///
    /// Globals whose `(interface, version)` is known get bound and delivered
    /// as their typed proxy (recover it by downcasting); unknown ones are
    /// delivered as an [`UnknownInterface`] placeholder with a null id. The
    /// callback runs on the dispatch thread and must not re-enter the loop.
    pub fn on_global(&self, callback: impl FnMut(Arc<dyn Proxy>) + Send + 'static) {
        *self.inner.on_global.lock().unwrap() = Some(Box::new(callback));
    }

    /// Issue a fence; the closure runs once the server has processed every
    /// request issued before it
    pub fn sync(&self, done: impl FnOnce() + Send + 'static) -> Result<(), Error> {
        let callback = self.display().sync()?;
        let mut done = Some(done);
        callback.on_done(move |_serial| {
            if let Some(done) = done.take() {
                done();
            }
        });
        Ok(())
    }

    /// Run the dispatch loop until the socket closes or a fatal error occurs
    pub fn run(&self) -> Result<(), Error> {
        loop {
            self.dispatch_one()?;
        }
    }

    /// Read and dispatch a single event
    ///
    /// Blocks in `recvmsg`. Any returned error is fatal for the connection.
    pub fn dispatch_one(&self) -> Result<(), Error> {
        if let Some(err) = self.inner.state.lock().unwrap().last_error.take() {
            return Err(err);
        }

        let mut header_buf = [0u8; wire::HEADER_LEN];
        self.inner.socket.read_exact(&mut header_buf)?;
        let header = MessageHeader::from_bytes(header_buf);
        if (header.size as usize) < wire::HEADER_LEN {
            return Err(Error::HeaderTooSmall { size: header.size });
        }

        let sender = self
            .inner
            .state
            .lock()
            .unwrap()
            .map
            .find(header.sender_id)
            .ok_or(Error::UnknownSender(header.sender_id))?;

        let fd_count =
            *sender.fd_counts().events.get(header.opcode as usize).ok_or_else(|| {
                Error::OpcodeOutOfRange {
                    interface: sender.interface_name().to_owned(),
                    opcode: header.opcode,
                }
            })?;

        let mut payload = vec![0u8; header.size as usize - wire::HEADER_LEN];
        let (got, fds) = self.inner.socket.recv_with_fds(&mut payload, fd_count)?;
        if got != payload.len() || fds.len() != fd_count {
            // any descriptors received so far are dropped, and thereby
            // closed, right here
            return Err(Error::ShortRead {
                expected_bytes: payload.len(),
                got_bytes: got,
                expected_fds: fd_count,
                got_fds: fds.len(),
            });
        }

        if self.inner.debug {
            debug::print_dispatched_message(
                sender.interface_name(),
                header.sender_id,
                header.opcode,
                payload.len(),
                fds.len(),
            );
        }

        sender.handle_event(header.opcode, &payload, fds)
    }

    // Invoked from the registry's global event.
    fn handle_global(&self, name: u32, interface: &str, version: u32) {
        let mut slot = self.inner.on_global.lock().unwrap();
        let Some(callback) = slot.as_mut() else { return };

        match globals::constructors().get(&(interface.to_owned(), version)) {
            Some(&ctor) => match self.bind_global(name, interface, version, ctor) {
                Ok(proxy) => callback(proxy),
                Err(err) => {
                    log::error!("binding global {interface} v{version} failed: {err}");
                    self.inner.state.lock().unwrap().last_error = Some(err);
                }
            },
            None => callback(Arc::new(UnknownInterface::new(interface, version))),
        }
    }

    fn bind_global(
        &self,
        name: u32,
        interface: &str,
        version: u32,
        ctor: Constructor,
    ) -> Result<Arc<dyn Proxy>, Error> {
        let registry_id = self.registry().id();
        let proxy = {
            let mut state = self.inner.state.lock().unwrap();
            let mut created = None;
            state.map.client_insert_with(|id| {
                let proxy = ctor(self, ObjectId::new(id));
                created = Some(proxy.clone());
                proxy
            });
            created.expect("constructor ran")
        };
        // wl_registry.bind is the protocol's one generic constructor: the
        // new_id travels with its interface name and version
        self.send_request(message!(
            registry_id.raw(),
            0,
            [
                Argument::Uint(name),
                Argument::Str(Some(Box::new(std::ffi::CString::new(interface).unwrap()))),
                Argument::Uint(version),
                Argument::NewId(proxy.id().raw()),
            ],
        ))?;
        Ok(proxy)
    }

    /// Allocate a client id and insert a freshly constructed proxy for it
    pub(crate) fn create_proxy<P: Interface>(&self) -> P {
        let mut state = self.inner.state.lock().unwrap();
        let mut created = None;
        state.map.client_insert_with(|id| {
            let proxy = P::from_inner(ProxyInner::new(ObjectId::new(id), self.downgrade()));
            created = Some(proxy.clone());
            Arc::new(proxy)
        });
        created.expect("constructor ran")
    }

    /// Insert a proxy for a server-allocated id announced by an event
    ///
    /// Called from generated code when an event carries a typed `new_id`
    /// argument; no core-protocol event does, but extension protocols do.
    #[allow(dead_code)]
    pub(crate) fn insert_server_proxy<P: Interface>(&self, id: ObjectId) -> Result<P, Error> {
        let proxy = P::from_inner(ProxyInner::new(id, self.downgrade()));
        self.inner
            .state
            .lock()
            .unwrap()
            .map
            .insert_at(id.raw(), Arc::new(proxy.clone()))
            .map_err(|()| Error::IdCollision(id))?;
        Ok(proxy)
    }

    /// Encode and send one request in a single `sendmsg`
    ///
    /// Fd arguments are dup()-ed for the transfer; the caller keeps its
    /// descriptors. Fails with [`Error::ObjectDeleted`] if the sender's id has
    /// been reclaimed through `delete_id`.
    pub(crate) fn send_request(&self, msg: Message<RawFd>) -> Result<(), Error> {
        let sender = self.inner.state.lock().unwrap().map.find(msg.sender_id);
        let Some(sender) = sender else {
            return Err(Error::ObjectDeleted(ObjectId::new(msg.sender_id)));
        };

        if self.inner.debug {
            debug::print_send_message(sender.interface_name(), msg.sender_id, msg.opcode, &msg.args);
        }

        let mut bytes = Vec::with_capacity(64);
        let mut fds = Vec::new();
        wire::write_message(&msg, &mut bytes, &mut fds)?;

        let _guard = self.inner.send_lock.lock().unwrap();
        let sent = self.inner.socket.send_msg(&bytes, &fds)?;
        if sent != bytes.len() {
            return Err(Error::Io(std::io::Error::from(ErrorKind::WriteZero)));
        }
        Ok(())
    }
}

impl AsFd for Connection {
    /// The connection's socket, for external readiness polling
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.inner.socket.as_fd()
    }
}

// WAYLAND_SOCKET carries an inherited, already connected descriptor.
fn socket_from_env() -> Result<Option<UnixStream>, ConnectError> {
    let Some(txt) = env::var_os("WAYLAND_SOCKET") else {
        return Ok(None);
    };
    let fd: RawFd = txt
        .to_str()
        .and_then(|s| s.parse().ok())
        .ok_or(ConnectError::InvalidFd)?;
    // the variable must not leak into child processes
    env::remove_var("WAYLAND_SOCKET");
    let fd = unsafe { OwnedFd::from_raw_fd(fd) };
    let flags = rustix::io::fcntl_getfd(&fd).map_err(|_| ConnectError::InvalidFd)?;
    rustix::io::fcntl_setfd(&fd, flags | rustix::io::FdFlags::CLOEXEC)
        .map_err(|_| ConnectError::InvalidFd)?;
    Ok(Some(UnixStream::from(fd)))
}

fn socket_path_from_env() -> PathBuf {
    let display = PathBuf::from(env::var_os("WAYLAND_DISPLAY").unwrap_or_else(|| "wayland-0".into()));
    if display.is_absolute() {
        return display;
    }
    let runtime_dir = env::var_os("XDG_RUNTIME_DIR").map(PathBuf::from).unwrap_or_else(|| {
        PathBuf::from(format!("/run/user/{}", rustix::process::getuid().as_raw()))
    });
    runtime_dir.join(display)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_path_resolution() {
        // absolute WAYLAND_DISPLAY wins over the runtime dir
        env::set_var("XDG_RUNTIME_DIR", "/run/user/1000");
        env::set_var("WAYLAND_DISPLAY", "/tmp/custom-socket");
        assert_eq!(socket_path_from_env(), PathBuf::from("/tmp/custom-socket"));

        env::set_var("WAYLAND_DISPLAY", "wayland-7");
        assert_eq!(socket_path_from_env(), PathBuf::from("/run/user/1000/wayland-7"));

        env::remove_var("WAYLAND_DISPLAY");
        assert_eq!(socket_path_from_env(), PathBuf::from("/run/user/1000/wayland-0"));

        env::remove_var("XDG_RUNTIME_DIR");
        let uid = rustix::process::getuid().as_raw();
        assert_eq!(socket_path_from_env(), PathBuf::from(format!("/run/user/{uid}/wayland-0")));
    }
}
