//! Generated bindings for the `wayland` protocol.
//!
//! Produced by waylite-scanner; do not edit by hand. Regenerate with:
//!
//! ```sh
//! cargo run -p waylite-scanner -- <protocol.xml> <this file>
//! ```

#![allow(unused_imports, unused_variables, unused_mut, missing_docs, non_upper_case_globals)]
#![allow(clippy::too_many_arguments, clippy::match_single_binding)]

use std::collections::VecDeque;
use std::ffi::CString;
use std::os::unix::io::{AsRawFd, BorrowedFd, OwnedFd};
use std::sync::{Arc, Mutex};

use waylite_backend::message;
use waylite_backend::protocol::{AllowNull, Argument, ArgumentType, Fixed, ObjectId, WEnum};
use waylite_backend::wire::parse_args;

use crate::proxy::{FdCounts, Interface, Proxy, ProxyInner};

#[doc = "global error values"]
#[repr(u32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[non_exhaustive]
pub enum DisplayError {
    #[doc = "server couldn't find object"]
    InvalidObject = 0,
    #[doc = "method doesn't exist on the specified interface or malformed request"]
    InvalidMethod = 1,
    #[doc = "server is out of memory"]
    NoMemory = 2,
    #[doc = "implementation error in compositor"]
    Implementation = 3,
}

impl std::convert::TryFrom<u32> for DisplayError {
    type Error = ();
    fn try_from(val: u32) -> Result<DisplayError, ()> {
        match val {
            0 => Ok(DisplayError::InvalidObject),
            1 => Ok(DisplayError::InvalidMethod),
            2 => Ok(DisplayError::NoMemory),
            3 => Ok(DisplayError::Implementation),
            _ => Err(()),
        }
    }
}

impl std::convert::From<DisplayError> for u32 {
    fn from(val: DisplayError) -> u32 {
        val as u32
    }
}

#[derive(Default)]
struct DisplayHandlers {
    error: Option<Box<dyn FnMut(ObjectId, u32, String) + Send>>,
    delete_id: Option<Box<dyn FnMut(u32) + Send>>,
}

static WL_DISPLAY_FD_COUNTS: FdCounts = FdCounts { requests: &[0, 0], events: &[0, 0] };

#[doc = "core global object\n\nThe core global object. This is a special singleton object. It is used\nfor internal Wayland protocol features."]
#[derive(Clone)]
pub struct Display {
    inner: ProxyInner,
    handlers: Arc<Mutex<DisplayHandlers>>,
}

impl std::fmt::Debug for Display {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", Self::NAME, self.inner.id())
    }
}

impl Display {
    #[doc = "asynchronous roundtrip\n\nThe sync request asks the server to emit the 'done' event on the\nreturned Callback object once it has processed all requests sent\nbefore this one."]
    pub fn sync(&self) -> Result<Callback, crate::Error> {
        let conn = self.inner.connection()?;
        let callback = conn.create_proxy::<Callback>();
        conn.send_request(message!(
            Proxy::id(self).raw(),
            0u16,
            [Argument::NewId(Proxy::id(&callback).raw())],
        ))?;
        Ok(callback)
    }

    #[doc = "get global registry object\n\nThis request creates a registry object that allows the client to list\nand bind the global objects available from the compositor."]
    pub fn get_registry(&self) -> Result<Registry, crate::Error> {
        let conn = self.inner.connection()?;
        let registry = conn.create_proxy::<Registry>();
        conn.send_request(message!(
            Proxy::id(self).raw(),
            1u16,
            [Argument::NewId(Proxy::id(&registry).raw())],
        ))?;
        Ok(registry)
    }

    #[doc = "Set the handler for the `error` event.\n\nfatal error event\n\nThe error event is sent out when a fatal (non-recoverable) error has\noccurred."]
    pub fn on_error(&self, handler: impl FnMut(ObjectId, u32, String) + Send + 'static) {
        self.handlers.lock().unwrap().error = Some(Box::new(handler));
    }

    #[doc = "Set the handler for the `delete_id` event.\n\nacknowledge object ID deletion\n\nThis event is used internally by the object ID management logic. When\na client deletes an object that it had created, the server will send\nthis event to acknowledge that it has seen the delete request."]
    pub fn on_delete_id(&self, handler: impl FnMut(u32) + Send + 'static) {
        self.handlers.lock().unwrap().delete_id = Some(Box::new(handler));
    }
}

impl Interface for Display {
    const NAME: &'static str = "wl_display";
    const VERSION: u32 = 1;

    fn from_inner(inner: ProxyInner) -> Self {
        Self { inner, handlers: Arc::default() }
    }
}

impl Proxy for Display {
    fn id(&self) -> ObjectId {
        self.inner.id()
    }

    fn interface_name(&self) -> &str {
        Self::NAME
    }

    fn version(&self) -> u32 {
        Self::VERSION
    }

    fn fd_counts(&self) -> &'static FdCounts {
        &WL_DISPLAY_FD_COUNTS
    }

    fn handle_event(
        &self,
        opcode: u16,
        payload: &[u8],
        fds: Vec<OwnedFd>,
    ) -> Result<(), crate::Error> {
        let mut fds = VecDeque::from(fds);
        match opcode {
            0u16 => {
                let mut args = parse_args(
                    payload,
                    &[
                        ArgumentType::Object(AllowNull::No),
                        ArgumentType::Uint,
                        ArgumentType::Str(AllowNull::No),
                    ],
                    &mut fds,
                )?
                .into_iter();
                if let (
                    Some(Argument::Object(object_id)),
                    Some(Argument::Uint(code)),
                    Some(Argument::Str(Some(message))),
                ) = (args.next(), args.next(), args.next())
                {
                    if let Some(handler) = self.handlers.lock().unwrap().error.as_mut() {
                        handler(
                            ObjectId::new(object_id),
                            code,
                            String::from_utf8_lossy(message.as_bytes()).into_owned(),
                        );
                    }
                    Ok(())
                } else {
                    Err(crate::Error::BadMessage { interface: Self::NAME.to_owned(), opcode })
                }
            }
            1u16 => {
                let mut args = parse_args(payload, &[ArgumentType::Uint], &mut fds)?.into_iter();
                if let (Some(Argument::Uint(id)),) = (args.next(),) {
                    if let Some(handler) = self.handlers.lock().unwrap().delete_id.as_mut() {
                        handler(id);
                    }
                    Ok(())
                } else {
                    Err(crate::Error::BadMessage { interface: Self::NAME.to_owned(), opcode })
                }
            }
            _ => Err(crate::Error::OpcodeOutOfRange { interface: Self::NAME.to_owned(), opcode }),
        }
    }
}

#[derive(Default)]
struct RegistryHandlers {
    global: Option<Box<dyn FnMut(u32, String, u32) + Send>>,
    global_remove: Option<Box<dyn FnMut(u32) + Send>>,
}

static WL_REGISTRY_FD_COUNTS: FdCounts = FdCounts { requests: &[0], events: &[0, 0] };

#[doc = "global registry object\n\nThe singleton global registry object. The server has a number of global\nobjects that are available to all clients. These objects typically\nrepresent an actual object in the server (for example, an input device)\nor they are singleton objects that provide extension functionality."]
#[derive(Clone)]
pub struct Registry {
    inner: ProxyInner,
    handlers: Arc<Mutex<RegistryHandlers>>,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", Self::NAME, self.inner.id())
    }
}

impl Registry {
    #[doc = "bind an object to the display\n\nBinds a new, client-created object to the server using the specified\nname as the identifier."]
    pub fn bind<P: Interface>(&self, name: u32, version: u32) -> Result<P, crate::Error> {
        let conn = self.inner.connection()?;
        let id = conn.create_proxy::<P>();
        conn.send_request(message!(
            Proxy::id(self).raw(),
            0u16,
            [
                Argument::Uint(name),
                Argument::Str(Some(Box::new(CString::new(P::NAME).unwrap()))),
                Argument::Uint(version),
                Argument::NewId(Proxy::id(&id).raw()),
            ],
        ))?;
        Ok(id)
    }

    #[doc = "Set the handler for the `global` event.\n\nannounce global object\n\nNotify the client of global objects. The event notifies the client\nthat a global object with the given name is now available, and it\nimplements the given version of the given interface."]
    pub fn on_global(&self, handler: impl FnMut(u32, String, u32) + Send + 'static) {
        self.handlers.lock().unwrap().global = Some(Box::new(handler));
    }

    #[doc = "Set the handler for the `global_remove` event.\n\nannounce removal of global object\n\nNotify the client of removed global objects."]
    pub fn on_global_remove(&self, handler: impl FnMut(u32) + Send + 'static) {
        self.handlers.lock().unwrap().global_remove = Some(Box::new(handler));
    }
}

impl Interface for Registry {
    const NAME: &'static str = "wl_registry";
    const VERSION: u32 = 1;

    fn from_inner(inner: ProxyInner) -> Self {
        Self { inner, handlers: Arc::default() }
    }
}

impl Proxy for Registry {
    fn id(&self) -> ObjectId {
        self.inner.id()
    }

    fn interface_name(&self) -> &str {
        Self::NAME
    }

    fn version(&self) -> u32 {
        Self::VERSION
    }

    fn fd_counts(&self) -> &'static FdCounts {
        &WL_REGISTRY_FD_COUNTS
    }

    fn handle_event(
        &self,
        opcode: u16,
        payload: &[u8],
        fds: Vec<OwnedFd>,
    ) -> Result<(), crate::Error> {
        let mut fds = VecDeque::from(fds);
        match opcode {
            0u16 => {
                let mut args = parse_args(
                    payload,
                    &[ArgumentType::Uint, ArgumentType::Str(AllowNull::No), ArgumentType::Uint],
                    &mut fds,
                )?
                .into_iter();
                if let (
                    Some(Argument::Uint(name)),
                    Some(Argument::Str(Some(interface))),
                    Some(Argument::Uint(version)),
                ) = (args.next(), args.next(), args.next())
                {
                    if let Some(handler) = self.handlers.lock().unwrap().global.as_mut() {
                        handler(
                            name,
                            String::from_utf8_lossy(interface.as_bytes()).into_owned(),
                            version,
                        );
                    }
                    Ok(())
                } else {
                    Err(crate::Error::BadMessage { interface: Self::NAME.to_owned(), opcode })
                }
            }
            1u16 => {
                let mut args = parse_args(payload, &[ArgumentType::Uint], &mut fds)?.into_iter();
                if let (Some(Argument::Uint(name)),) = (args.next(),) {
                    if let Some(handler) = self.handlers.lock().unwrap().global_remove.as_mut() {
                        handler(name);
                    }
                    Ok(())
                } else {
                    Err(crate::Error::BadMessage { interface: Self::NAME.to_owned(), opcode })
                }
            }
            _ => Err(crate::Error::OpcodeOutOfRange { interface: Self::NAME.to_owned(), opcode }),
        }
    }
}

#[derive(Default)]
struct CallbackHandlers {
    done: Option<Box<dyn FnMut(u32) + Send>>,
}

static WL_CALLBACK_FD_COUNTS: FdCounts = FdCounts { requests: &[], events: &[0] };

#[doc = "callback object\n\nClients can handle the 'done' event to get notified when the related\nrequest is done."]
#[derive(Clone)]
pub struct Callback {
    inner: ProxyInner,
    handlers: Arc<Mutex<CallbackHandlers>>,
}

impl std::fmt::Debug for Callback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", Self::NAME, self.inner.id())
    }
}

impl Callback {
    #[doc = "Set the handler for the `done` event.\n\ndone event\n\nNotify the client when the related request is done."]
    pub fn on_done(&self, handler: impl FnMut(u32) + Send + 'static) {
        self.handlers.lock().unwrap().done = Some(Box::new(handler));
    }
}

impl Interface for Callback {
    const NAME: &'static str = "wl_callback";
    const VERSION: u32 = 1;

    fn from_inner(inner: ProxyInner) -> Self {
        Self { inner, handlers: Arc::default() }
    }
}

impl Proxy for Callback {
    fn id(&self) -> ObjectId {
        self.inner.id()
    }

    fn interface_name(&self) -> &str {
        Self::NAME
    }

    fn version(&self) -> u32 {
        Self::VERSION
    }

    fn fd_counts(&self) -> &'static FdCounts {
        &WL_CALLBACK_FD_COUNTS
    }

    fn handle_event(
        &self,
        opcode: u16,
        payload: &[u8],
        fds: Vec<OwnedFd>,
    ) -> Result<(), crate::Error> {
        let mut fds = VecDeque::from(fds);
        match opcode {
            0u16 => {
                let mut args = parse_args(payload, &[ArgumentType::Uint], &mut fds)?.into_iter();
                if let (Some(Argument::Uint(callback_data)),) = (args.next(),) {
                    if let Some(handler) = self.handlers.lock().unwrap().done.as_mut() {
                        handler(callback_data);
                    }
                    Ok(())
                } else {
                    Err(crate::Error::BadMessage { interface: Self::NAME.to_owned(), opcode })
                }
            }
            _ => Err(crate::Error::OpcodeOutOfRange { interface: Self::NAME.to_owned(), opcode }),
        }
    }
}

#[derive(Default)]
struct CompositorHandlers {}

static WL_COMPOSITOR_FD_COUNTS: FdCounts = FdCounts { requests: &[0, 0], events: &[] };

#[doc = "the compositor singleton\n\nA compositor. This object is a singleton global. The compositor is in\ncharge of combining the contents of multiple surfaces into one\ndisplayable output."]
#[derive(Clone)]
pub struct Compositor {
    inner: ProxyInner,
    handlers: Arc<Mutex<CompositorHandlers>>,
}

impl std::fmt::Debug for Compositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", Self::NAME, self.inner.id())
    }
}

impl Compositor {
    #[doc = "create new surface\n\nAsk the compositor to create a new surface."]
    pub fn create_surface(&self) -> Result<Surface, crate::Error> {
        let conn = self.inner.connection()?;
        let id = conn.create_proxy::<Surface>();
        conn.send_request(message!(
            Proxy::id(self).raw(),
            0u16,
            [Argument::NewId(Proxy::id(&id).raw())],
        ))?;
        Ok(id)
    }

    #[doc = "create new region\n\nAsk the compositor to create a new region."]
    pub fn create_region(&self) -> Result<Region, crate::Error> {
        let conn = self.inner.connection()?;
        let id = conn.create_proxy::<Region>();
        conn.send_request(message!(
            Proxy::id(self).raw(),
            1u16,
            [Argument::NewId(Proxy::id(&id).raw())],
        ))?;
        Ok(id)
    }
}

impl Interface for Compositor {
    const NAME: &'static str = "wl_compositor";
    const VERSION: u32 = 6;

    fn from_inner(inner: ProxyInner) -> Self {
        Self { inner, handlers: Arc::default() }
    }
}

impl Proxy for Compositor {
    fn id(&self) -> ObjectId {
        self.inner.id()
    }

    fn interface_name(&self) -> &str {
        Self::NAME
    }

    fn version(&self) -> u32 {
        Self::VERSION
    }

    fn fd_counts(&self) -> &'static FdCounts {
        &WL_COMPOSITOR_FD_COUNTS
    }

    fn handle_event(
        &self,
        opcode: u16,
        payload: &[u8],
        fds: Vec<OwnedFd>,
    ) -> Result<(), crate::Error> {
        let mut fds = VecDeque::from(fds);
        match opcode {
            _ => Err(crate::Error::OpcodeOutOfRange { interface: Self::NAME.to_owned(), opcode }),
        }
    }
}

#[derive(Default)]
struct ShmPoolHandlers {}

static WL_SHM_POOL_FD_COUNTS: FdCounts = FdCounts { requests: &[0, 0, 0], events: &[] };

#[doc = "a shared memory pool\n\nThe ShmPool object encapsulates a piece of memory shared between the\ncompositor and client. Through the ShmPool object, the client can\nallocate shared memory Buffer objects."]
#[derive(Clone)]
pub struct ShmPool {
    inner: ProxyInner,
    handlers: Arc<Mutex<ShmPoolHandlers>>,
}

impl std::fmt::Debug for ShmPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", Self::NAME, self.inner.id())
    }
}

impl ShmPool {
    #[doc = "create a buffer from the pool\n\nCreate a Buffer object from the pool. The buffer is created offset\nbytes into the pool and has width and height as specified."]
    pub fn create_buffer(
        &self,
        offset: i32,
        width: i32,
        height: i32,
        stride: i32,
        format: ShmFormat,
    ) -> Result<Buffer, crate::Error> {
        let conn = self.inner.connection()?;
        let id = conn.create_proxy::<Buffer>();
        conn.send_request(message!(
            Proxy::id(self).raw(),
            0u16,
            [
                Argument::NewId(Proxy::id(&id).raw()),
                Argument::Int(offset),
                Argument::Int(width),
                Argument::Int(height),
                Argument::Int(stride),
                Argument::Uint(format.into()),
            ],
        ))?;
        Ok(id)
    }

    #[doc = "destroy the pool\n\nDestroy the shared memory pool.\n\nThis is a destructor, once sent this object cannot be used any longer."]
    pub fn destroy(&self) -> Result<(), crate::Error> {
        let conn = self.inner.connection()?;
        conn.send_request(message!(Proxy::id(self).raw(), 1u16, []))?;
        Ok(())
    }

    #[doc = "change the size of the pool mapping\n\nThis request will cause the server to remap the backing memory for the\npool from the file descriptor passed when the pool was created, but\nusing the new size. This request can only be used to make the pool\nbigger."]
    pub fn resize(&self, size: i32) -> Result<(), crate::Error> {
        let conn = self.inner.connection()?;
        conn.send_request(message!(Proxy::id(self).raw(), 2u16, [Argument::Int(size)]))?;
        Ok(())
    }
}

impl Interface for ShmPool {
    const NAME: &'static str = "wl_shm_pool";
    const VERSION: u32 = 1;

    fn from_inner(inner: ProxyInner) -> Self {
        Self { inner, handlers: Arc::default() }
    }
}

impl Proxy for ShmPool {
    fn id(&self) -> ObjectId {
        self.inner.id()
    }

    fn interface_name(&self) -> &str {
        Self::NAME
    }

    fn version(&self) -> u32 {
        Self::VERSION
    }

    fn fd_counts(&self) -> &'static FdCounts {
        &WL_SHM_POOL_FD_COUNTS
    }

    fn handle_event(
        &self,
        opcode: u16,
        payload: &[u8],
        fds: Vec<OwnedFd>,
    ) -> Result<(), crate::Error> {
        let mut fds = VecDeque::from(fds);
        match opcode {
            _ => Err(crate::Error::OpcodeOutOfRange { interface: Self::NAME.to_owned(), opcode }),
        }
    }
}

#[doc = "wl_shm error values"]
#[repr(u32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[non_exhaustive]
pub enum ShmError {
    #[doc = "buffer format is not known"]
    InvalidFormat = 0,
    #[doc = "invalid size or stride during pool or buffer creation"]
    InvalidStride = 1,
    #[doc = "mmapping the file descriptor failed"]
    InvalidFd = 2,
}

impl std::convert::TryFrom<u32> for ShmError {
    type Error = ();
    fn try_from(val: u32) -> Result<ShmError, ()> {
        match val {
            0 => Ok(ShmError::InvalidFormat),
            1 => Ok(ShmError::InvalidStride),
            2 => Ok(ShmError::InvalidFd),
            _ => Err(()),
        }
    }
}

impl std::convert::From<ShmError> for u32 {
    fn from(val: ShmError) -> u32 {
        val as u32
    }
}

#[doc = "pixel formats\n\nThis describes the memory layout of an individual pixel. All renderers\nshould support argb8888 and xrgb8888; the other formats are fourcc\ncodes from drm_fourcc.h."]
#[repr(u32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[non_exhaustive]
pub enum ShmFormat {
    #[doc = "32-bit ARGB format, [31:0] A:R:G:B 8:8:8:8 little endian"]
    Argb8888 = 0,
    #[doc = "32-bit RGB format, [31:0] x:R:G:B 8:8:8:8 little endian"]
    Xrgb8888 = 1,
    #[doc = "8-bit color index format, [7:0] C"]
    C8 = 538982467,
    #[doc = "16-bit RGB format, [15:0] R:G:B 5:6:5 little endian"]
    Rgb565 = 909199186,
    #[doc = "24-bit RGB format, [23:0] R:G:B 8:8:8 little endian"]
    Rgb888 = 875710290,
    #[doc = "24-bit BGR format, [23:0] B:G:R 8:8:8 little endian"]
    Bgr888 = 875710274,
    #[doc = "32-bit RGB format, [31:0] x:B:G:R 8:8:8:8 little endian"]
    Xbgr8888 = 875709016,
    #[doc = "32-bit RGBA format, [31:0] A:B:G:R 8:8:8:8 little endian"]
    Abgr8888 = 875708993,
    #[doc = "32-bit BGRA format, [31:0] B:G:R:A 8:8:8:8 little endian"]
    Bgra8888 = 1095911234,
    #[doc = "packed YCbCr format, [31:0] Cr0:Y1:Cb0:Y0 8:8:8:8 little endian"]
    Yuyv = 1448695129,
}

impl std::convert::TryFrom<u32> for ShmFormat {
    type Error = ();
    fn try_from(val: u32) -> Result<ShmFormat, ()> {
        match val {
            0 => Ok(ShmFormat::Argb8888),
            1 => Ok(ShmFormat::Xrgb8888),
            538982467 => Ok(ShmFormat::C8),
            909199186 => Ok(ShmFormat::Rgb565),
            875710290 => Ok(ShmFormat::Rgb888),
            875710274 => Ok(ShmFormat::Bgr888),
            875709016 => Ok(ShmFormat::Xbgr8888),
            875708993 => Ok(ShmFormat::Abgr8888),
            1095911234 => Ok(ShmFormat::Bgra8888),
            1448695129 => Ok(ShmFormat::Yuyv),
            _ => Err(()),
        }
    }
}

impl std::convert::From<ShmFormat> for u32 {
    fn from(val: ShmFormat) -> u32 {
        val as u32
    }
}

#[derive(Default)]
struct ShmHandlers {
    format: Option<Box<dyn FnMut(WEnum<ShmFormat>) + Send>>,
}

static WL_SHM_FD_COUNTS: FdCounts = FdCounts { requests: &[1], events: &[0] };

#[doc = "shared memory support\n\nA singleton global object that provides support for shared memory.\nClients can create ShmPool objects using the create_pool request."]
#[derive(Clone)]
pub struct Shm {
    inner: ProxyInner,
    handlers: Arc<Mutex<ShmHandlers>>,
}

impl std::fmt::Debug for Shm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", Self::NAME, self.inner.id())
    }
}

impl Shm {
    #[doc = "create a shm pool\n\nCreate a new ShmPool object. The pool can be used to create shared\nmemory based Buffer objects. The server will mmap size bytes of the\npassed file descriptor, to use as backing memory for the pool."]
    pub fn create_pool(&self, fd: BorrowedFd<'_>, size: i32) -> Result<ShmPool, crate::Error> {
        let conn = self.inner.connection()?;
        let id = conn.create_proxy::<ShmPool>();
        conn.send_request(message!(
            Proxy::id(self).raw(),
            0u16,
            [
                Argument::NewId(Proxy::id(&id).raw()),
                Argument::Fd(fd.as_raw_fd()),
                Argument::Int(size),
            ],
        ))?;
        Ok(id)
    }

    #[doc = "Set the handler for the `format` event.\n\npixel format description\n\nInforms the client about a valid pixel format that can be used for\nbuffers. Known formats include argb8888 and xrgb8888."]
    pub fn on_format(&self, handler: impl FnMut(WEnum<ShmFormat>) + Send + 'static) {
        self.handlers.lock().unwrap().format = Some(Box::new(handler));
    }
}

impl Interface for Shm {
    const NAME: &'static str = "wl_shm";
    const VERSION: u32 = 1;

    fn from_inner(inner: ProxyInner) -> Self {
        Self { inner, handlers: Arc::default() }
    }
}

impl Proxy for Shm {
    fn id(&self) -> ObjectId {
        self.inner.id()
    }

    fn interface_name(&self) -> &str {
        Self::NAME
    }

    fn version(&self) -> u32 {
        Self::VERSION
    }

    fn fd_counts(&self) -> &'static FdCounts {
        &WL_SHM_FD_COUNTS
    }

    fn handle_event(
        &self,
        opcode: u16,
        payload: &[u8],
        fds: Vec<OwnedFd>,
    ) -> Result<(), crate::Error> {
        let mut fds = VecDeque::from(fds);
        match opcode {
            0u16 => {
                let mut args = parse_args(payload, &[ArgumentType::Uint], &mut fds)?.into_iter();
                if let (Some(Argument::Uint(format)),) = (args.next(),) {
                    if let Some(handler) = self.handlers.lock().unwrap().format.as_mut() {
                        handler(WEnum::<ShmFormat>::from(format));
                    }
                    Ok(())
                } else {
                    Err(crate::Error::BadMessage { interface: Self::NAME.to_owned(), opcode })
                }
            }
            _ => Err(crate::Error::OpcodeOutOfRange { interface: Self::NAME.to_owned(), opcode }),
        }
    }
}

#[derive(Default)]
struct BufferHandlers {
    release: Option<Box<dyn FnMut() + Send>>,
}

static WL_BUFFER_FD_COUNTS: FdCounts = FdCounts { requests: &[0], events: &[0] };

#[doc = "content for a Surface\n\nA buffer provides the content for a Surface. Buffers are created\nthrough factory interfaces such as ShmPool."]
#[derive(Clone)]
pub struct Buffer {
    inner: ProxyInner,
    handlers: Arc<Mutex<BufferHandlers>>,
}

impl std::fmt::Debug for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", Self::NAME, self.inner.id())
    }
}

impl Buffer {
    #[doc = "destroy a buffer\n\nDestroy a buffer. If and how you need to release the backing storage\nis defined by the buffer factory interface.\n\nThis is a destructor, once sent this object cannot be used any longer."]
    pub fn destroy(&self) -> Result<(), crate::Error> {
        let conn = self.inner.connection()?;
        conn.send_request(message!(Proxy::id(self).raw(), 0u16, []))?;
        Ok(())
    }

    #[doc = "Set the handler for the `release` event.\n\ncompositor releases buffer\n\nSent when this Buffer is no longer used by the compositor. The\nclient is now free to reuse or destroy this buffer and its backing\nstorage."]
    pub fn on_release(&self, handler: impl FnMut() + Send + 'static) {
        self.handlers.lock().unwrap().release = Some(Box::new(handler));
    }
}

impl Interface for Buffer {
    const NAME: &'static str = "wl_buffer";
    const VERSION: u32 = 1;

    fn from_inner(inner: ProxyInner) -> Self {
        Self { inner, handlers: Arc::default() }
    }
}

impl Proxy for Buffer {
    fn id(&self) -> ObjectId {
        self.inner.id()
    }

    fn interface_name(&self) -> &str {
        Self::NAME
    }

    fn version(&self) -> u32 {
        Self::VERSION
    }

    fn fd_counts(&self) -> &'static FdCounts {
        &WL_BUFFER_FD_COUNTS
    }

    fn handle_event(
        &self,
        opcode: u16,
        payload: &[u8],
        fds: Vec<OwnedFd>,
    ) -> Result<(), crate::Error> {
        let mut fds = VecDeque::from(fds);
        match opcode {
            0u16 => {
                parse_args(payload, &[], &mut fds)?;
                if let Some(handler) = self.handlers.lock().unwrap().release.as_mut() {
                    handler();
                }
                Ok(())
            }
            _ => Err(crate::Error::OpcodeOutOfRange { interface: Self::NAME.to_owned(), opcode }),
        }
    }
}

#[doc = "wl_surface error values"]
#[repr(u32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[non_exhaustive]
pub enum SurfaceError {
    #[doc = "buffer scale value is invalid"]
    InvalidScale = 0,
    #[doc = "buffer transform value is invalid"]
    InvalidTransform = 1,
    #[doc = "buffer size is invalid"]
    InvalidSize = 2,
    #[doc = "buffer offset is invalid"]
    InvalidOffset = 3,
    #[doc = "surface was destroyed before its role object"]
    DefunctRoleObject = 4,
}

impl std::convert::TryFrom<u32> for SurfaceError {
    type Error = ();
    fn try_from(val: u32) -> Result<SurfaceError, ()> {
        match val {
            0 => Ok(SurfaceError::InvalidScale),
            1 => Ok(SurfaceError::InvalidTransform),
            2 => Ok(SurfaceError::InvalidSize),
            3 => Ok(SurfaceError::InvalidOffset),
            4 => Ok(SurfaceError::DefunctRoleObject),
            _ => Err(()),
        }
    }
}

impl std::convert::From<SurfaceError> for u32 {
    fn from(val: SurfaceError) -> u32 {
        val as u32
    }
}

#[derive(Default)]
struct SurfaceHandlers {
    enter: Option<Box<dyn FnMut(ObjectId) + Send>>,
    leave: Option<Box<dyn FnMut(ObjectId) + Send>>,
    preferred_buffer_scale: Option<Box<dyn FnMut(i32) + Send>>,
    preferred_buffer_transform: Option<Box<dyn FnMut(WEnum<OutputTransform>) + Send>>,
}

static WL_SURFACE_FD_COUNTS: FdCounts =
    FdCounts { requests: &[0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0], events: &[0, 0, 0, 0] };

#[doc = "an onscreen surface\n\nA surface is a rectangular area that may be displayed on zero or more\noutputs, and shown any number of times at the compositor's discretion.\nSurfaces are created through Compositor.create_surface and have\ndouble-buffered state: requests only take effect on commit."]
#[derive(Clone)]
pub struct Surface {
    inner: ProxyInner,
    handlers: Arc<Mutex<SurfaceHandlers>>,
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", Self::NAME, self.inner.id())
    }
}

impl Surface {
    #[doc = "delete surface\n\nDeletes the surface and invalidates its object ID.\n\nThis is a destructor, once sent this object cannot be used any longer."]
    pub fn destroy(&self) -> Result<(), crate::Error> {
        let conn = self.inner.connection()?;
        conn.send_request(message!(Proxy::id(self).raw(), 0u16, []))?;
        Ok(())
    }

    #[doc = "set the surface contents\n\nSet a buffer as the content of this surface. Passing None removes the\nsurface content on the next commit."]
    pub fn attach(&self, buffer: Option<&Buffer>, x: i32, y: i32) -> Result<(), crate::Error> {
        let conn = self.inner.connection()?;
        conn.send_request(message!(
            Proxy::id(self).raw(),
            1u16,
            [
                Argument::Object(buffer.map(|obj| Proxy::id(obj).raw()).unwrap_or(0)),
                Argument::Int(x),
                Argument::Int(y),
            ],
        ))?;
        Ok(())
    }

    #[doc = "mark part of the surface damaged\n\nThis request is used to describe the regions where the pending buffer\nis different from the current surface contents."]
    pub fn damage(&self, x: i32, y: i32, width: i32, height: i32) -> Result<(), crate::Error> {
        let conn = self.inner.connection()?;
        conn.send_request(message!(
            Proxy::id(self).raw(),
            2u16,
            [Argument::Int(x), Argument::Int(y), Argument::Int(width), Argument::Int(height)],
        ))?;
        Ok(())
    }

    #[doc = "request a frame throttling hint\n\nRequest a notification when it is a good time to start drawing a new\nframe, by creating a frame callback."]
    pub fn frame(&self) -> Result<Callback, crate::Error> {
        let conn = self.inner.connection()?;
        let callback = conn.create_proxy::<Callback>();
        conn.send_request(message!(
            Proxy::id(self).raw(),
            3u16,
            [Argument::NewId(Proxy::id(&callback).raw())],
        ))?;
        Ok(callback)
    }

    #[doc = "set opaque region\n\nThis request sets the region of the surface that contains opaque\ncontent. A None region causes the pending opaque region to be set to\nempty."]
    pub fn set_opaque_region(&self, region: Option<&Region>) -> Result<(), crate::Error> {
        let conn = self.inner.connection()?;
        conn.send_request(message!(
            Proxy::id(self).raw(),
            4u16,
            [Argument::Object(region.map(|obj| Proxy::id(obj).raw()).unwrap_or(0))],
        ))?;
        Ok(())
    }

    #[doc = "set input region\n\nThis request sets the region of the surface that can receive pointer\nand touch events. A None region causes the input region to be set to\ninfinite."]
    pub fn set_input_region(&self, region: Option<&Region>) -> Result<(), crate::Error> {
        let conn = self.inner.connection()?;
        conn.send_request(message!(
            Proxy::id(self).raw(),
            5u16,
            [Argument::Object(region.map(|obj| Proxy::id(obj).raw()).unwrap_or(0))],
        ))?;
        Ok(())
    }

    #[doc = "commit pending surface state\n\nSurface state (input, opaque, and damage regions, attached buffers,\netc.) is double-buffered. This request atomically applies all pending\nstate."]
    pub fn commit(&self) -> Result<(), crate::Error> {
        let conn = self.inner.connection()?;
        conn.send_request(message!(Proxy::id(self).raw(), 6u16, []))?;
        Ok(())
    }

    #[doc = "sets the buffer transformation\n\nThis request sets the transformation that the client has already\napplied to the content of the buffer.\n\nOnly available since version 2 of the interface."]
    pub fn set_buffer_transform(&self, transform: OutputTransform) -> Result<(), crate::Error> {
        let conn = self.inner.connection()?;
        conn.send_request(message!(
            Proxy::id(self).raw(),
            7u16,
            [Argument::Int(u32::from(transform) as i32)],
        ))?;
        Ok(())
    }

    #[doc = "sets the buffer scaling factor\n\nThis request sets an optional scaling factor on how the compositor\ninterprets the contents of the buffer attached to the window.\n\nOnly available since version 3 of the interface."]
    pub fn set_buffer_scale(&self, scale: i32) -> Result<(), crate::Error> {
        let conn = self.inner.connection()?;
        conn.send_request(message!(Proxy::id(self).raw(), 8u16, [Argument::Int(scale)]))?;
        Ok(())
    }

    #[doc = "mark part of the surface damaged using buffer coordinates\n\nLike damage, but the damage rectangle is specified in buffer\ncoordinates.\n\nOnly available since version 4 of the interface."]
    pub fn damage_buffer(
        &self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) -> Result<(), crate::Error> {
        let conn = self.inner.connection()?;
        conn.send_request(message!(
            Proxy::id(self).raw(),
            9u16,
            [Argument::Int(x), Argument::Int(y), Argument::Int(width), Argument::Int(height)],
        ))?;
        Ok(())
    }

    #[doc = "set the surface contents offset\n\nThe x and y arguments specify the location of the new pending buffer's\nupper left corner, relative to the current buffer's upper left corner.\n\nOnly available since version 5 of the interface."]
    pub fn offset(&self, x: i32, y: i32) -> Result<(), crate::Error> {
        let conn = self.inner.connection()?;
        conn.send_request(message!(
            Proxy::id(self).raw(),
            10u16,
            [Argument::Int(x), Argument::Int(y)],
        ))?;
        Ok(())
    }

    #[doc = "Set the handler for the `enter` event.\n\nsurface enters an output\n\nThis is emitted whenever a surface's creation, movement, or resizing\nresults in some part of the surface being within the scanout region of\nan output."]
    pub fn on_enter(&self, handler: impl FnMut(ObjectId) + Send + 'static) {
        self.handlers.lock().unwrap().enter = Some(Box::new(handler));
    }

    #[doc = "Set the handler for the `leave` event.\n\nsurface leaves an output\n\nThis is emitted whenever a surface's creation, movement, or resizing\nresults in it no longer having any part of it within the scanout\nregion of an output."]
    pub fn on_leave(&self, handler: impl FnMut(ObjectId) + Send + 'static) {
        self.handlers.lock().unwrap().leave = Some(Box::new(handler));
    }

    #[doc = "Set the handler for the `preferred_buffer_scale` event.\n\npreferred buffer scale for the surface\n\nThis event indicates the preferred buffer scale for this surface.\n\nOnly available since version 6 of the interface."]
    pub fn on_preferred_buffer_scale(&self, handler: impl FnMut(i32) + Send + 'static) {
        self.handlers.lock().unwrap().preferred_buffer_scale = Some(Box::new(handler));
    }

    #[doc = "Set the handler for the `preferred_buffer_transform` event.\n\npreferred buffer transform for the surface\n\nThis event indicates the preferred buffer transform for this surface.\n\nOnly available since version 6 of the interface."]
    pub fn on_preferred_buffer_transform(
        &self,
        handler: impl FnMut(WEnum<OutputTransform>) + Send + 'static,
    ) {
        self.handlers.lock().unwrap().preferred_buffer_transform = Some(Box::new(handler));
    }
}

impl Interface for Surface {
    const NAME: &'static str = "wl_surface";
    const VERSION: u32 = 6;

    fn from_inner(inner: ProxyInner) -> Self {
        Self { inner, handlers: Arc::default() }
    }
}

impl Proxy for Surface {
    fn id(&self) -> ObjectId {
        self.inner.id()
    }

    fn interface_name(&self) -> &str {
        Self::NAME
    }

    fn version(&self) -> u32 {
        Self::VERSION
    }

    fn fd_counts(&self) -> &'static FdCounts {
        &WL_SURFACE_FD_COUNTS
    }

    fn handle_event(
        &self,
        opcode: u16,
        payload: &[u8],
        fds: Vec<OwnedFd>,
    ) -> Result<(), crate::Error> {
        let mut fds = VecDeque::from(fds);
        match opcode {
            0u16 => {
                let mut args =
                    parse_args(payload, &[ArgumentType::Object(AllowNull::No)], &mut fds)?
                        .into_iter();
                if let (Some(Argument::Object(output)),) = (args.next(),) {
                    if let Some(handler) = self.handlers.lock().unwrap().enter.as_mut() {
                        handler(ObjectId::new(output));
                    }
                    Ok(())
                } else {
                    Err(crate::Error::BadMessage { interface: Self::NAME.to_owned(), opcode })
                }
            }
            1u16 => {
                let mut args =
                    parse_args(payload, &[ArgumentType::Object(AllowNull::No)], &mut fds)?
                        .into_iter();
                if let (Some(Argument::Object(output)),) = (args.next(),) {
                    if let Some(handler) = self.handlers.lock().unwrap().leave.as_mut() {
                        handler(ObjectId::new(output));
                    }
                    Ok(())
                } else {
                    Err(crate::Error::BadMessage { interface: Self::NAME.to_owned(), opcode })
                }
            }
            2u16 => {
                let mut args = parse_args(payload, &[ArgumentType::Int], &mut fds)?.into_iter();
                if let (Some(Argument::Int(factor)),) = (args.next(),) {
                    if let Some(handler) =
                        self.handlers.lock().unwrap().preferred_buffer_scale.as_mut()
                    {
                        handler(factor);
                    }
                    Ok(())
                } else {
                    Err(crate::Error::BadMessage { interface: Self::NAME.to_owned(), opcode })
                }
            }
            3u16 => {
                let mut args = parse_args(payload, &[ArgumentType::Uint], &mut fds)?.into_iter();
                if let (Some(Argument::Uint(transform)),) = (args.next(),) {
                    if let Some(handler) =
                        self.handlers.lock().unwrap().preferred_buffer_transform.as_mut()
                    {
                        handler(WEnum::<OutputTransform>::from(transform));
                    }
                    Ok(())
                } else {
                    Err(crate::Error::BadMessage { interface: Self::NAME.to_owned(), opcode })
                }
            }
            _ => Err(crate::Error::OpcodeOutOfRange { interface: Self::NAME.to_owned(), opcode }),
        }
    }
}

#[derive(Default)]
struct RegionHandlers {}

static WL_REGION_FD_COUNTS: FdCounts = FdCounts { requests: &[0, 0, 0], events: &[] };

#[doc = "region interface\n\nA region object describes an area. Region objects are used to describe\nthe opaque and input regions of a surface."]
#[derive(Clone)]
pub struct Region {
    inner: ProxyInner,
    handlers: Arc<Mutex<RegionHandlers>>,
}

impl std::fmt::Debug for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", Self::NAME, self.inner.id())
    }
}

impl Region {
    #[doc = "destroy region\n\nDestroy the region. This will invalidate the object ID.\n\nThis is a destructor, once sent this object cannot be used any longer."]
    pub fn destroy(&self) -> Result<(), crate::Error> {
        let conn = self.inner.connection()?;
        conn.send_request(message!(Proxy::id(self).raw(), 0u16, []))?;
        Ok(())
    }

    #[doc = "add rectangle to region\n\nAdd the specified rectangle to the region."]
    pub fn add(&self, x: i32, y: i32, width: i32, height: i32) -> Result<(), crate::Error> {
        let conn = self.inner.connection()?;
        conn.send_request(message!(
            Proxy::id(self).raw(),
            1u16,
            [Argument::Int(x), Argument::Int(y), Argument::Int(width), Argument::Int(height)],
        ))?;
        Ok(())
    }

    #[doc = "subtract rectangle from region\n\nSubtract the specified rectangle from the region."]
    pub fn subtract(&self, x: i32, y: i32, width: i32, height: i32) -> Result<(), crate::Error> {
        let conn = self.inner.connection()?;
        conn.send_request(message!(
            Proxy::id(self).raw(),
            2u16,
            [Argument::Int(x), Argument::Int(y), Argument::Int(width), Argument::Int(height)],
        ))?;
        Ok(())
    }
}

impl Interface for Region {
    const NAME: &'static str = "wl_region";
    const VERSION: u32 = 1;

    fn from_inner(inner: ProxyInner) -> Self {
        Self { inner, handlers: Arc::default() }
    }
}

impl Proxy for Region {
    fn id(&self) -> ObjectId {
        self.inner.id()
    }

    fn interface_name(&self) -> &str {
        Self::NAME
    }

    fn version(&self) -> u32 {
        Self::VERSION
    }

    fn fd_counts(&self) -> &'static FdCounts {
        &WL_REGION_FD_COUNTS
    }

    fn handle_event(
        &self,
        opcode: u16,
        payload: &[u8],
        fds: Vec<OwnedFd>,
    ) -> Result<(), crate::Error> {
        let mut fds = VecDeque::from(fds);
        match opcode {
            _ => Err(crate::Error::OpcodeOutOfRange { interface: Self::NAME.to_owned(), opcode }),
        }
    }
}

#[doc = "subpixel geometry information\n\nThis enumeration describes how the physical pixels on an output are\nlaid out."]
#[repr(u32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[non_exhaustive]
pub enum OutputSubpixel {
    #[doc = "unknown geometry"]
    Unknown = 0,
    #[doc = "no geometry"]
    None = 1,
    #[doc = "horizontal RGB"]
    HorizontalRgb = 2,
    #[doc = "horizontal BGR"]
    HorizontalBgr = 3,
    #[doc = "vertical RGB"]
    VerticalRgb = 4,
    #[doc = "vertical BGR"]
    VerticalBgr = 5,
}

impl std::convert::TryFrom<u32> for OutputSubpixel {
    type Error = ();
    fn try_from(val: u32) -> Result<OutputSubpixel, ()> {
        match val {
            0 => Ok(OutputSubpixel::Unknown),
            1 => Ok(OutputSubpixel::None),
            2 => Ok(OutputSubpixel::HorizontalRgb),
            3 => Ok(OutputSubpixel::HorizontalBgr),
            4 => Ok(OutputSubpixel::VerticalRgb),
            5 => Ok(OutputSubpixel::VerticalBgr),
            _ => Err(()),
        }
    }
}

impl std::convert::From<OutputSubpixel> for u32 {
    fn from(val: OutputSubpixel) -> u32 {
        val as u32
    }
}

#[doc = "transforms applied to buffer contents\n\nThis describes the transform that a compositor will apply to a surface\nto compensate for the rotation or mirroring of an output device."]
#[repr(u32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[non_exhaustive]
pub enum OutputTransform {
    #[doc = "no transform"]
    Normal = 0,
    #[doc = "90 degrees counter-clockwise"]
    _90 = 1,
    #[doc = "180 degrees counter-clockwise"]
    _180 = 2,
    #[doc = "270 degrees counter-clockwise"]
    _270 = 3,
    #[doc = "180 degree flip around a vertical axis"]
    Flipped = 4,
    #[doc = "flip and rotate 90 degrees counter-clockwise"]
    Flipped90 = 5,
    #[doc = "flip and rotate 180 degrees counter-clockwise"]
    Flipped180 = 6,
    #[doc = "flip and rotate 270 degrees counter-clockwise"]
    Flipped270 = 7,
}

impl std::convert::TryFrom<u32> for OutputTransform {
    type Error = ();
    fn try_from(val: u32) -> Result<OutputTransform, ()> {
        match val {
            0 => Ok(OutputTransform::Normal),
            1 => Ok(OutputTransform::_90),
            2 => Ok(OutputTransform::_180),
            3 => Ok(OutputTransform::_270),
            4 => Ok(OutputTransform::Flipped),
            5 => Ok(OutputTransform::Flipped90),
            6 => Ok(OutputTransform::Flipped180),
            7 => Ok(OutputTransform::Flipped270),
            _ => Err(()),
        }
    }
}

impl std::convert::From<OutputTransform> for u32 {
    fn from(val: OutputTransform) -> u32 {
        val as u32
    }
}

bitflags::bitflags! {
    #[doc = "mode information\n\nThese flags describe properties of an output mode."]
    #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
    pub struct OutputMode: u32 {
        #[doc = "indicates this is the current mode"]
        const Current = 1;
        #[doc = "indicates this is the preferred mode"]
        const Preferred = 2;
    }
}

impl std::convert::TryFrom<u32> for OutputMode {
    type Error = ();
    fn try_from(val: u32) -> Result<OutputMode, ()> {
        OutputMode::from_bits(val).ok_or(())
    }
}

impl std::convert::From<OutputMode> for u32 {
    fn from(val: OutputMode) -> u32 {
        val.bits()
    }
}

#[derive(Default)]
struct OutputHandlers {
    geometry: Option<
        Box<
            dyn FnMut(i32, i32, i32, i32, WEnum<OutputSubpixel>, String, String, WEnum<OutputTransform>)
                + Send,
        >,
    >,
    mode: Option<Box<dyn FnMut(WEnum<OutputMode>, i32, i32, i32) + Send>>,
    done: Option<Box<dyn FnMut() + Send>>,
    scale: Option<Box<dyn FnMut(i32) + Send>>,
    name: Option<Box<dyn FnMut(String) + Send>>,
    description: Option<Box<dyn FnMut(String) + Send>>,
}

static WL_OUTPUT_FD_COUNTS: FdCounts = FdCounts { requests: &[0], events: &[0, 0, 0, 0, 0, 0] };

#[doc = "compositor output region\n\nAn output describes part of the compositor geometry. The compositor\nworks in the 'compositor coordinate system' and an output corresponds to\na rectangular area in that space that is actually visible."]
#[derive(Clone)]
pub struct Output {
    inner: ProxyInner,
    handlers: Arc<Mutex<OutputHandlers>>,
}

impl std::fmt::Debug for Output {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", Self::NAME, self.inner.id())
    }
}

impl Output {
    #[doc = "release the output object\n\nUsing this request a client can tell the server that it is not going\nto use the output object anymore.\n\nThis is a destructor, once sent this object cannot be used any longer.\n\nOnly available since version 3 of the interface."]
    pub fn release(&self) -> Result<(), crate::Error> {
        let conn = self.inner.connection()?;
        conn.send_request(message!(Proxy::id(self).raw(), 0u16, []))?;
        Ok(())
    }

    #[doc = "Set the handler for the `geometry` event.\n\nproperties of the output\n\nThe geometry event describes geometric properties of the output."]
    pub fn on_geometry(
        &self,
        handler: impl FnMut(i32, i32, i32, i32, WEnum<OutputSubpixel>, String, String, WEnum<OutputTransform>)
            + Send
            + 'static,
    ) {
        self.handlers.lock().unwrap().geometry = Some(Box::new(handler));
    }

    #[doc = "Set the handler for the `mode` event.\n\nadvertise available modes for the output\n\nThe mode event describes an available mode for the output."]
    pub fn on_mode(
        &self,
        handler: impl FnMut(WEnum<OutputMode>, i32, i32, i32) + Send + 'static,
    ) {
        self.handlers.lock().unwrap().mode = Some(Box::new(handler));
    }

    #[doc = "Set the handler for the `done` event.\n\nsent all information about output\n\nThis event is sent after all other properties have been sent, to allow\nchanges to the output properties to be seen as atomic.\n\nOnly available since version 2 of the interface."]
    pub fn on_done(&self, handler: impl FnMut() + Send + 'static) {
        self.handlers.lock().unwrap().done = Some(Box::new(handler));
    }

    #[doc = "Set the handler for the `scale` event.\n\noutput scaling properties\n\nThis event contains scaling geometry information that is not in the\ngeometry event.\n\nOnly available since version 2 of the interface."]
    pub fn on_scale(&self, handler: impl FnMut(i32) + Send + 'static) {
        self.handlers.lock().unwrap().scale = Some(Box::new(handler));
    }

    #[doc = "Set the handler for the `name` event.\n\nname of this output\n\nMany compositors will assign user-friendly names to their outputs,\nshow them to the user, allow the user to refer to an output, etc.\n\nOnly available since version 4 of the interface."]
    pub fn on_name(&self, handler: impl FnMut(String) + Send + 'static) {
        self.handlers.lock().unwrap().name = Some(Box::new(handler));
    }

    #[doc = "Set the handler for the `description` event.\n\nhuman-readable description of this output\n\nMany compositors can produce human-readable descriptions of their\noutputs.\n\nOnly available since version 4 of the interface."]
    pub fn on_description(&self, handler: impl FnMut(String) + Send + 'static) {
        self.handlers.lock().unwrap().description = Some(Box::new(handler));
    }
}

impl Interface for Output {
    const NAME: &'static str = "wl_output";
    const VERSION: u32 = 4;

    fn from_inner(inner: ProxyInner) -> Self {
        Self { inner, handlers: Arc::default() }
    }
}

impl Proxy for Output {
    fn id(&self) -> ObjectId {
        self.inner.id()
    }

    fn interface_name(&self) -> &str {
        Self::NAME
    }

    fn version(&self) -> u32 {
        Self::VERSION
    }

    fn fd_counts(&self) -> &'static FdCounts {
        &WL_OUTPUT_FD_COUNTS
    }

    fn handle_event(
        &self,
        opcode: u16,
        payload: &[u8],
        fds: Vec<OwnedFd>,
    ) -> Result<(), crate::Error> {
        let mut fds = VecDeque::from(fds);
        match opcode {
            0u16 => {
                let mut args = parse_args(
                    payload,
                    &[
                        ArgumentType::Int,
                        ArgumentType::Int,
                        ArgumentType::Int,
                        ArgumentType::Int,
                        ArgumentType::Int,
                        ArgumentType::Str(AllowNull::No),
                        ArgumentType::Str(AllowNull::No),
                        ArgumentType::Int,
                    ],
                    &mut fds,
                )?
                .into_iter();
                if let (
                    Some(Argument::Int(x)),
                    Some(Argument::Int(y)),
                    Some(Argument::Int(physical_width)),
                    Some(Argument::Int(physical_height)),
                    Some(Argument::Int(subpixel)),
                    Some(Argument::Str(Some(make))),
                    Some(Argument::Str(Some(model))),
                    Some(Argument::Int(transform)),
                ) = (
                    args.next(),
                    args.next(),
                    args.next(),
                    args.next(),
                    args.next(),
                    args.next(),
                    args.next(),
                    args.next(),
                ) {
                    if let Some(handler) = self.handlers.lock().unwrap().geometry.as_mut() {
                        handler(
                            x,
                            y,
                            physical_width,
                            physical_height,
                            WEnum::<OutputSubpixel>::from(subpixel as u32),
                            String::from_utf8_lossy(make.as_bytes()).into_owned(),
                            String::from_utf8_lossy(model.as_bytes()).into_owned(),
                            WEnum::<OutputTransform>::from(transform as u32),
                        );
                    }
                    Ok(())
                } else {
                    Err(crate::Error::BadMessage { interface: Self::NAME.to_owned(), opcode })
                }
            }
            1u16 => {
                let mut args = parse_args(
                    payload,
                    &[
                        ArgumentType::Uint,
                        ArgumentType::Int,
                        ArgumentType::Int,
                        ArgumentType::Int,
                    ],
                    &mut fds,
                )?
                .into_iter();
                if let (
                    Some(Argument::Uint(flags)),
                    Some(Argument::Int(width)),
                    Some(Argument::Int(height)),
                    Some(Argument::Int(refresh)),
                ) = (args.next(), args.next(), args.next(), args.next())
                {
                    if let Some(handler) = self.handlers.lock().unwrap().mode.as_mut() {
                        handler(WEnum::<OutputMode>::from(flags), width, height, refresh);
                    }
                    Ok(())
                } else {
                    Err(crate::Error::BadMessage { interface: Self::NAME.to_owned(), opcode })
                }
            }
            2u16 => {
                parse_args(payload, &[], &mut fds)?;
                if let Some(handler) = self.handlers.lock().unwrap().done.as_mut() {
                    handler();
                }
                Ok(())
            }
            3u16 => {
                let mut args = parse_args(payload, &[ArgumentType::Int], &mut fds)?.into_iter();
                if let (Some(Argument::Int(factor)),) = (args.next(),) {
                    if let Some(handler) = self.handlers.lock().unwrap().scale.as_mut() {
                        handler(factor);
                    }
                    Ok(())
                } else {
                    Err(crate::Error::BadMessage { interface: Self::NAME.to_owned(), opcode })
                }
            }
            4u16 => {
                let mut args =
                    parse_args(payload, &[ArgumentType::Str(AllowNull::No)], &mut fds)?.into_iter();
                if let (Some(Argument::Str(Some(name))),) = (args.next(),) {
                    if let Some(handler) = self.handlers.lock().unwrap().name.as_mut() {
                        handler(String::from_utf8_lossy(name.as_bytes()).into_owned());
                    }
                    Ok(())
                } else {
                    Err(crate::Error::BadMessage { interface: Self::NAME.to_owned(), opcode })
                }
            }
            5u16 => {
                let mut args =
                    parse_args(payload, &[ArgumentType::Str(AllowNull::No)], &mut fds)?.into_iter();
                if let (Some(Argument::Str(Some(description))),) = (args.next(),) {
                    if let Some(handler) = self.handlers.lock().unwrap().description.as_mut() {
                        handler(String::from_utf8_lossy(description.as_bytes()).into_owned());
                    }
                    Ok(())
                } else {
                    Err(crate::Error::BadMessage { interface: Self::NAME.to_owned(), opcode })
                }
            }
            _ => Err(crate::Error::OpcodeOutOfRange { interface: Self::NAME.to_owned(), opcode }),
        }
    }
}

#[doc = " Registers a proxy constructor for every interface of this protocol."]
pub(crate) fn register_constructors(registry: &mut crate::globals::ConstructorMap) {
    registry.insert(("wl_display".to_owned(), 1), crate::globals::constructor::<Display>);
    registry.insert(("wl_registry".to_owned(), 1), crate::globals::constructor::<Registry>);
    registry.insert(("wl_callback".to_owned(), 1), crate::globals::constructor::<Callback>);
    registry.insert(("wl_compositor".to_owned(), 6), crate::globals::constructor::<Compositor>);
    registry.insert(("wl_shm_pool".to_owned(), 1), crate::globals::constructor::<ShmPool>);
    registry.insert(("wl_shm".to_owned(), 1), crate::globals::constructor::<Shm>);
    registry.insert(("wl_buffer".to_owned(), 1), crate::globals::constructor::<Buffer>);
    registry.insert(("wl_surface".to_owned(), 6), crate::globals::constructor::<Surface>);
    registry.insert(("wl_region".to_owned(), 1), crate::globals::constructor::<Region>);
    registry.insert(("wl_output".to_owned(), 4), crate::globals::constructor::<Output>);
}
