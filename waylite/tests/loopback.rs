//! Loopback tests against an in-process fake compositor.
//!
//! The compositor half of each test runs over one end of a socketpair,
//! parsing client requests with the backend codec and replying with
//! hand-encoded events. Read timeouts turn any deadlock into a failure
//! instead of a hang.

use std::collections::{HashMap, VecDeque};
use std::ffi::CString;
use std::io::Read;
use std::os::unix::io::{AsFd, OwnedFd, RawFd};
use std::os::unix::net::UnixStream;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use waylite::protocol::{Compositor, Shm};
use waylite::{Connection, Error, Proxy};

use waylite_backend::message;
use waylite_backend::protocol::{AllowNull, Argument, ArgumentType, Message, ObjectId};
use waylite_backend::socket::Socket;
use waylite_backend::wire::{parse_args, write_message, MessageHeader, HEADER_LEN};

fn stream_pair() -> (UnixStream, UnixStream) {
    let (a, b) = UnixStream::pair().unwrap();
    for stream in [&a, &b] {
        stream.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
    }
    (a, b)
}

fn str_arg(s: &str) -> Argument<RawFd> {
    Argument::Str(Some(Box::new(CString::new(s).unwrap())))
}

fn new_id_arg(arg: &Argument<OwnedFd>) -> u32 {
    match arg {
        Argument::NewId(id) => *id,
        other => panic!("expected new_id argument, got {other:?}"),
    }
}

/// The compositor half of a test, driven by an explicit script.
struct FakeCompositor {
    socket: Socket,
    objects: HashMap<u32, &'static str>,
    log: Vec<(u32, u16)>,
}

impl FakeCompositor {
    fn new(stream: UnixStream) -> Self {
        let mut objects = HashMap::new();
        objects.insert(1, "wl_display");
        Self { socket: Socket::from(stream), objects, log: Vec::new() }
    }

    fn request_signature(interface: &str, opcode: u16) -> &'static [ArgumentType] {
        match (interface, opcode) {
            ("wl_display", 0) => &[ArgumentType::NewId],
            ("wl_display", 1) => &[ArgumentType::NewId],
            ("wl_registry", 0) => &[
                ArgumentType::Uint,
                ArgumentType::Str(AllowNull::No),
                ArgumentType::Uint,
                ArgumentType::NewId,
            ],
            ("wl_compositor", 0) => &[ArgumentType::NewId],
            ("wl_compositor", 1) => &[ArgumentType::NewId],
            ("wl_shm", 0) => &[ArgumentType::NewId, ArgumentType::Fd, ArgumentType::Int],
            ("wl_surface", 0) | ("wl_surface", 6) => &[],
            other => panic!("request {other:?} not in the test vocabulary"),
        }
    }

    fn read_request(&mut self) -> (u32, u16, Vec<Argument<OwnedFd>>) {
        let mut header_buf = [0u8; HEADER_LEN];
        self.socket.read_exact(&mut header_buf).unwrap();
        let header = MessageHeader::from_bytes(header_buf);
        let interface = *self.objects.get(&header.sender_id).expect("request from unknown id");
        let signature = Self::request_signature(interface, header.opcode);
        let fd_count = signature.iter().filter(|t| matches!(t, ArgumentType::Fd)).count();

        let mut payload = vec![0u8; header.size as usize - HEADER_LEN];
        let (got, fds) = self.socket.recv_with_fds(&mut payload, fd_count).unwrap();
        assert_eq!(got, payload.len(), "short request read");
        assert_eq!(fds.len(), fd_count, "request fd count mismatch");

        let mut fds = VecDeque::from(fds);
        let args = parse_args(&payload, signature, &mut fds).unwrap();
        self.log.push((header.sender_id, header.opcode));
        (header.sender_id, header.opcode, args.into_vec())
    }

    // consume the get_registry request every connection starts with
    fn handshake(&mut self) -> u32 {
        let (sender, opcode, args) = self.read_request();
        assert_eq!((sender, opcode), (1, 1), "expected wl_display.get_registry");
        let registry = new_id_arg(&args[0]);
        self.objects.insert(registry, "wl_registry");
        registry
    }

    fn send_event(&self, msg: Message<RawFd>) {
        let mut bytes = Vec::new();
        let mut fds = Vec::new();
        write_message(&msg, &mut bytes, &mut fds).unwrap();
        assert_eq!(self.socket.send_msg(&bytes, &fds).unwrap(), bytes.len());
    }

    fn send_global(&self, registry: u32, name: u32, interface: &str, version: u32) {
        self.send_event(message!(
            registry,
            0,
            [Argument::Uint(name), str_arg(interface), Argument::Uint(version)],
        ));
    }
}

#[test]
fn globals_are_listed_and_known_ones_bound() {
    let (client_stream, server_stream) = stream_pair();

    let server = thread::spawn(move || {
        let mut compositor = FakeCompositor::new(server_stream);
        let registry = compositor.handshake();

        compositor.send_global(registry, 1, "wl_compositor", 6);
        compositor.send_global(registry, 2, "wl_shm", 1);
        compositor.send_global(registry, 3, "wl_weird", 2);

        // the sync request was issued before the client started dispatching
        let (sender, opcode, args) = compositor.read_request();
        assert_eq!((sender, opcode), (1, 0), "expected wl_display.sync");
        let callback = new_id_arg(&args[0]);
        compositor.send_event(message!(callback, 0, [Argument::Uint(0)]));
        compositor.send_event(message!(1, 1, [Argument::Uint(callback)]));

        // the two known globals got auto-bound during dispatch
        for expected_name in [1u32, 2] {
            let (sender, opcode, args) = compositor.read_request();
            assert_eq!((sender, opcode), (registry, 0), "expected wl_registry.bind");
            assert!(matches!(args[0], Argument::Uint(name) if name == expected_name));
        }
        // dropping the socket ends the client's loop
    });

    let conn = Connection::from_stream(client_stream).unwrap();

    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_in_cb = seen.clone();
    let first_compositor: Arc<Mutex<Option<Arc<Compositor>>>> = Arc::new(Mutex::new(None));
    let stash = first_compositor.clone();
    conn.on_global(move |global| {
        seen_in_cb.lock().unwrap().push((
            global.id().raw(),
            global.interface_name().to_owned(),
            global.version(),
        ));
        if let Ok(compositor) = global.clone().downcast_arc::<Compositor>() {
            *stash.lock().unwrap() = Some(compositor);
        }
    });

    let synced = Arc::new(AtomicBool::new(false));
    let synced_in_cb = synced.clone();
    conn.sync(move || synced_in_cb.store(true, Ordering::SeqCst)).unwrap();

    let err = conn.run().unwrap_err();
    assert!(matches!(err, Error::Io(_)), "loop should end with the socket closing: {err}");

    assert!(synced.load(Ordering::SeqCst), "sync callback never fired");

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 3);
    // display=1, registry=2, sync callback=3; the two bound globals get 4 and 5
    assert_eq!(seen[0], (4, "wl_compositor".to_owned(), 6));
    assert_eq!(seen[1], (5, "wl_shm".to_owned(), 1));
    // the unknown interface is delivered as a placeholder with a null id
    assert_eq!(seen[2], (0, "wl_weird".to_owned(), 2));

    assert!(first_compositor.lock().unwrap().is_some(), "downcast to Compositor failed");

    server.join().unwrap();
}

#[test]
fn fds_travel_with_create_pool() {
    let (client_stream, server_stream) = stream_pair();

    let server = thread::spawn(move || {
        let mut compositor = FakeCompositor::new(server_stream);
        let registry = compositor.handshake();
        compositor.send_global(registry, 1, "wl_shm", 1);

        let (sender, opcode, _args) = compositor.read_request();
        assert_eq!((sender, opcode), (registry, 0), "expected wl_registry.bind");

        let (_sender, opcode, args) = compositor.read_request();
        assert_eq!(opcode, 0, "expected wl_shm.create_pool");
        assert!(matches!(args[2], Argument::Int(64)));
        let pool_fd = match args.into_iter().nth(1).unwrap() {
            Argument::Fd(fd) => fd,
            other => panic!("expected fd argument, got {other:?}"),
        };
        // prove the descriptor works, then close our only copy of it
        let mut transported = UnixStream::from(pool_fd);
        std::io::Write::write_all(&mut transported, b"fd transport ok").unwrap();
    });

    let conn = Connection::from_stream(client_stream).unwrap();
    let shm: Arc<Mutex<Option<Arc<Shm>>>> = Arc::new(Mutex::new(None));
    let stash = shm.clone();
    conn.on_global(move |global| {
        if let Ok(shm) = global.downcast_arc::<Shm>() {
            *stash.lock().unwrap() = Some(shm);
        }
    });

    conn.dispatch_one().unwrap(); // the wl_shm global, auto-bound
    let shm = shm.lock().unwrap().take().expect("wl_shm was not delivered");

    let (mut read_end, write_end) = stream_pair();
    shm.create_pool(write_end.as_fd(), 64).unwrap();
    // the connection dup()ed the descriptor for transfer; our copy stays
    // usable and closing it must leave the transferred one alive
    drop(write_end);

    let mut buf = [0u8; 15];
    read_end.read_exact(&mut buf).unwrap();
    assert_eq!(&buf, b"fd transport ok");
    // once the server closes its received copy no descriptor is left open,
    // so the pipe drains to EOF instead of blocking
    assert_eq!(read_end.read(&mut buf).unwrap(), 0);

    server.join().unwrap();
}

#[test]
fn short_header_is_a_framing_error() {
    let (client_stream, server_stream) = stream_pair();

    let server = thread::spawn(move || {
        let mut compositor = FakeCompositor::new(server_stream);
        compositor.handshake();
        let rogue = MessageHeader { sender_id: 1, opcode: 0, size: 4 };
        compositor.socket.send_msg(&rogue.to_bytes(), &[]).unwrap();
    });

    let conn = Connection::from_stream(client_stream).unwrap();
    let err = conn.dispatch_one().unwrap_err();
    assert!(matches!(err, Error::HeaderTooSmall { size: 4 }), "got: {err}");

    server.join().unwrap();
}

#[test]
fn delete_id_invalidates_the_sender() {
    let (client_stream, server_stream) = stream_pair();

    let server = thread::spawn(move || {
        let mut compositor = FakeCompositor::new(server_stream);
        compositor.handshake();

        let (sender, opcode, args) = compositor.read_request();
        assert_eq!((sender, opcode), (1, 0), "expected wl_display.sync");
        let callback = new_id_arg(&args[0]);
        compositor.send_event(message!(callback, 0, [Argument::Uint(7)]));
        compositor.send_event(message!(1, 1, [Argument::Uint(callback)]));
        // the object is gone now; an event from its id must be fatal
        compositor.send_event(message!(callback, 0, [Argument::Uint(8)]));
    });

    let conn = Connection::from_stream(client_stream).unwrap();
    let callback = conn.display().sync().unwrap();
    let serials = Arc::new(AtomicU32::new(0));
    let serials_in_cb = serials.clone();
    callback.on_done(move |serial| serials_in_cb.store(serial, Ordering::SeqCst));

    conn.dispatch_one().unwrap(); // done
    assert_eq!(serials.load(Ordering::SeqCst), 7);
    conn.dispatch_one().unwrap(); // delete_id

    let err = conn.dispatch_one().unwrap_err();
    let expected = callback.id().raw();
    assert!(
        matches!(err, Error::UnknownSender(id) if id == expected),
        "got: {err}"
    );

    server.join().unwrap();
}

#[test]
fn requests_on_deleted_objects_are_rejected() {
    let (client_stream, server_stream) = stream_pair();

    let server = thread::spawn(move || {
        let mut compositor = FakeCompositor::new(server_stream);
        let registry = compositor.handshake();
        compositor.send_global(registry, 1, "wl_compositor", 6);

        let (_sender, opcode, args) = compositor.read_request();
        assert_eq!(opcode, 0, "expected wl_registry.bind");
        let compositor_id = new_id_arg(&args[3]);
        compositor.objects.insert(compositor_id, "wl_compositor");

        let (_sender, _opcode, args) = compositor.read_request(); // create_surface
        let surface = new_id_arg(&args[0]);
        compositor.objects.insert(surface, "wl_surface");
        let (sender, opcode, _args) = compositor.read_request(); // destroy
        assert_eq!((sender, opcode), (surface, 0));
        compositor.send_event(message!(1, 1, [Argument::Uint(surface)]));
    });

    let conn = Connection::from_stream(client_stream).unwrap();
    let stash: Arc<Mutex<Option<Arc<Compositor>>>> = Arc::new(Mutex::new(None));
    let stash_in_cb = stash.clone();
    conn.on_global(move |global| {
        if let Ok(compositor) = global.downcast_arc::<Compositor>() {
            *stash_in_cb.lock().unwrap() = Some(compositor);
        }
    });

    conn.dispatch_one().unwrap(); // global + auto-bind
    let compositor = stash.lock().unwrap().take().unwrap();
    let surface = compositor.create_surface().unwrap();
    surface.destroy().unwrap();
    conn.dispatch_one().unwrap(); // delete_id

    let err = surface.commit().unwrap_err();
    assert!(matches!(err, Error::ObjectDeleted(id) if id == surface.id()), "got: {err}");

    server.join().unwrap();
}

#[test]
fn sync_fences_all_prior_requests() {
    let (client_stream, server_stream) = stream_pair();

    let server = thread::spawn(move || {
        let mut compositor = FakeCompositor::new(server_stream);
        let registry = compositor.handshake();
        compositor.send_global(registry, 1, "wl_compositor", 6);

        let (_sender, opcode, args) = compositor.read_request();
        assert_eq!(opcode, 0, "expected wl_registry.bind");
        let compositor_id = new_id_arg(&args[3]);
        compositor.objects.insert(compositor_id, "wl_compositor");

        // process requests in arrival order until the fence, counting the
        // surface creations that precede it
        let mut created = 0u32;
        let callback = loop {
            let (sender, opcode, args) = compositor.read_request();
            if sender == 1 && opcode == 0 {
                break new_id_arg(&args[0]);
            }
            assert_eq!((sender, opcode), (compositor_id, 0), "expected create_surface");
            created += 1;
        };
        assert_eq!(created, 3);
        compositor.send_event(message!(callback, 0, [Argument::Uint(created)]));

        // every surface creation was logged before the fence completed
        let fence_position = compositor.log.len() - 1;
        let creations = compositor
            .log
            .iter()
            .enumerate()
            .filter(|(_, entry)| **entry == (compositor_id, 0))
            .map(|(position, _)| position)
            .collect::<Vec<_>>();
        assert_eq!(creations.len(), 3);
        assert!(creations.iter().all(|&position| position < fence_position));
    });

    let conn = Connection::from_stream(client_stream).unwrap();
    let stash: Arc<Mutex<Option<Arc<Compositor>>>> = Arc::new(Mutex::new(None));
    let stash_in_cb = stash.clone();
    conn.on_global(move |global| {
        if let Ok(compositor) = global.downcast_arc::<Compositor>() {
            *stash_in_cb.lock().unwrap() = Some(compositor);
        }
    });

    conn.dispatch_one().unwrap();
    let compositor = stash.lock().unwrap().take().unwrap();

    for _ in 0..3 {
        compositor.create_surface().unwrap();
    }
    let callback = conn.display().sync().unwrap();
    let processed = Arc::new(AtomicU32::new(0));
    let processed_in_cb = processed.clone();
    callback.on_done(move |count| processed_in_cb.store(count, Ordering::SeqCst));

    conn.dispatch_one().unwrap(); // done
    assert_eq!(processed.load(Ordering::SeqCst), 3, "fence completed before all requests");

    server.join().unwrap();
}

#[test]
fn server_errors_surface_on_the_next_iteration() {
    let (client_stream, server_stream) = stream_pair();

    let server = thread::spawn(move || {
        let mut compositor = FakeCompositor::new(server_stream);
        compositor.handshake();
        compositor.send_event(message!(
            1,
            0,
            [Argument::Object(1), Argument::Uint(3), str_arg("oops")],
        ));
    });

    let conn = Connection::from_stream(client_stream).unwrap();
    // the iteration that carries the error event itself succeeds; the error
    // is recorded and ends the loop on the next pass
    conn.dispatch_one().unwrap();
    let err = conn.dispatch_one().unwrap_err();
    match err {
        Error::Server(server_error) => {
            assert_eq!(server_error.object_id, ObjectId::new(1));
            assert_eq!(server_error.code, 3);
            assert_eq!(server_error.message, "oops");
        }
        other => panic!("expected a server error, got: {other}"),
    }

    server.join().unwrap();
}
