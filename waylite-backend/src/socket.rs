//! Wayland socket manipulation
//!
//! The transport is a blocking `SOCK_STREAM` Unix socket. The kernel preserves
//! the boundaries of ancillary data attached to individual `sendmsg` calls,
//! which is what ties file descriptors to the message they belong to: every
//! outbound message goes out in exactly one `sendmsg`, and the receive side
//! asks for exactly the bytes and descriptors the already-parsed header
//! announced.

use std::io::{Error, ErrorKind, IoSlice, IoSliceMut, Result as IoResult};
use std::os::unix::io::{AsFd, AsRawFd, BorrowedFd, OwnedFd, RawFd};
use std::os::unix::net::UnixStream;

use rustix::io::retry_on_intr;
use rustix::net::{
    recvmsg, send, sendmsg, RecvAncillaryBuffer, RecvAncillaryMessage, RecvFlags,
    SendAncillaryBuffer, SendAncillaryMessage, SendFlags,
};

/// A connection to the compositor's socket
#[derive(Debug)]
pub struct Socket {
    stream: UnixStream,
}

impl Socket {
    /// Send a single message to the socket
    ///
    /// The message bytes go out in one `sendmsg`; if `fds` is non-empty they
    /// are attached as a single `SCM_RIGHTS` control message in order. Returns
    /// the number of bytes accepted by the kernel.
    pub fn send_msg(&self, bytes: &[u8], fds: &[OwnedFd]) -> IoResult<usize> {
        let flags = SendFlags::NOSIGNAL;

        if fds.is_empty() {
            Ok(retry_on_intr(|| send(&self.stream, bytes, flags))?)
        } else {
            let iov = [IoSlice::new(bytes)];
            let mut cmsg_space = vec![0u8; rustix::cmsg_space!(ScmRights(fds.len()))];
            let mut cmsg_buffer = SendAncillaryBuffer::new(&mut cmsg_space);
            let borrowed: Vec<BorrowedFd<'_>> = fds.iter().map(AsFd::as_fd).collect();
            cmsg_buffer.push(SendAncillaryMessage::ScmRights(&borrowed));
            Ok(retry_on_intr(|| sendmsg(&self.stream, &iov, &mut cmsg_buffer, flags))?)
        }
    }

    /// Fill `buf` from the socket, blocking until it is full
    ///
    /// Used for the fixed-size message header. A closed socket surfaces as
    /// [`ErrorKind::UnexpectedEof`].
    pub fn read_exact(&self, buf: &mut [u8]) -> IoResult<()> {
        let mut filled = 0;
        while filled < buf.len() {
            let n = retry_on_intr(|| rustix::io::read(&self.stream, &mut buf[filled..]))?;
            if n == 0 {
                return Err(Error::from(ErrorKind::UnexpectedEof));
            }
            filled += n;
        }
        Ok(())
    }

    /// Receive one message body along with up to `max_fds` file descriptors
    ///
    /// A single `recvmsg` with an ancillary buffer sized for exactly `max_fds`
    /// descriptors. Returns the number of payload bytes received and the
    /// descriptors, already `CLOEXEC` and owned: dropping the vector closes
    /// them, so no error path can leak.
    pub fn recv_with_fds(&self, buf: &mut [u8], max_fds: usize) -> IoResult<(usize, Vec<OwnedFd>)> {
        if buf.is_empty() && max_fds == 0 {
            return Ok((0, Vec::new()));
        }

        let mut cmsg_space = vec![0u8; rustix::cmsg_space!(ScmRights(max_fds.max(1)))];
        let mut cmsg_buffer = if max_fds == 0 {
            // size the ancillary buffer for exactly the expected descriptors
            RecvAncillaryBuffer::new(&mut [])
        } else {
            RecvAncillaryBuffer::new(&mut cmsg_space)
        };
        let mut iov = [IoSliceMut::new(buf)];
        let msg = retry_on_intr(|| {
            recvmsg(&self.stream, &mut iov[..], &mut cmsg_buffer, RecvFlags::CMSG_CLOEXEC)
        })?;

        let fds: Vec<OwnedFd> = cmsg_buffer
            .drain()
            .filter_map(|cmsg| match cmsg {
                RecvAncillaryMessage::ScmRights(fds) => Some(fds),
                _ => None,
            })
            .flatten()
            .collect();
        Ok((msg.bytes, fds))
    }
}

impl From<UnixStream> for Socket {
    fn from(stream: UnixStream) -> Self {
        Self { stream }
    }
}

impl AsFd for Socket {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.stream.as_fd()
    }
}

impl AsRawFd for Socket {
    fn as_raw_fd(&self) -> RawFd {
        self.stream.as_raw_fd()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{AllowNull, Argument, ArgumentType, Message};
    use crate::wire::{parse_args, write_message, MessageHeader, HEADER_LEN};

    use std::collections::VecDeque;
    use std::ffi::CString;
    use std::io::{Read, Write};
    use std::os::unix::io::IntoRawFd;

    fn same_file(a: BorrowedFd, b: BorrowedFd) -> bool {
        let stat1 = rustix::fs::fstat(a).unwrap();
        let stat2 = rustix::fs::fstat(b).unwrap();
        stat1.st_dev == stat2.st_dev && stat1.st_ino == stat2.st_ino
    }

    // check if two messages are equal
    //
    // if arguments contain FDs, check that the fds point to
    // the same file, rather than are the same number.
    fn assert_eq_msgs<Fd: AsRawFd + std::fmt::Debug>(msg1: &Message<Fd>, msg2: &Message<Fd>) {
        assert_eq!(msg1.sender_id, msg2.sender_id);
        assert_eq!(msg1.opcode, msg2.opcode);
        assert_eq!(msg1.args.len(), msg2.args.len());
        for (arg1, arg2) in msg1.args.iter().zip(msg2.args.iter()) {
            if let (Argument::Fd(fd1), Argument::Fd(fd2)) = (arg1, arg2) {
                let fd1 = unsafe { BorrowedFd::borrow_raw(fd1.as_raw_fd()) };
                let fd2 = unsafe { BorrowedFd::borrow_raw(fd2.as_raw_fd()) };
                assert!(same_file(fd1, fd2));
            } else {
                assert_eq!(arg1, arg2);
            }
        }
    }

    fn receive_one(
        socket: &Socket,
        signature: &'static [ArgumentType],
    ) -> Message<std::os::unix::io::OwnedFd> {
        let mut header_buf = [0u8; HEADER_LEN];
        socket.read_exact(&mut header_buf).unwrap();
        let header = MessageHeader::from_bytes(header_buf);
        let fd_count = signature.iter().filter(|a| matches!(a, ArgumentType::Fd)).count();
        let mut payload = vec![0u8; header.size as usize - HEADER_LEN];
        let (n, fds) = socket.recv_with_fds(&mut payload, fd_count).unwrap();
        assert_eq!(n, payload.len());
        assert_eq!(fds.len(), fd_count);
        let mut fds = VecDeque::from(fds);
        let args = parse_args(&payload, signature, &mut fds).unwrap();
        Message { sender_id: header.sender_id, opcode: header.opcode, args }
    }

    #[test]
    fn write_read_cycle() {
        let msg = Message {
            sender_id: 42,
            opcode: 7,
            args: smallvec::smallvec![
                Argument::Uint(3),
                Argument::Str(Some(Box::new(CString::new(&b"I like trains!"[..]).unwrap()))),
                Argument::Array(vec![1, 2, 3, 4, 5, 6, 7, 8, 9].into()),
                Argument::Object(88),
                Argument::Int(-25),
            ],
        };

        static SIGNATURE: &[ArgumentType] = &[
            ArgumentType::Uint,
            ArgumentType::Str(AllowNull::No),
            ArgumentType::Array,
            ArgumentType::Object(AllowNull::No),
            ArgumentType::Int,
        ];

        let (client, server) = UnixStream::pair().unwrap();
        let client = Socket::from(client);
        let server = Socket::from(server);

        let mut bytes = Vec::new();
        let mut fds = Vec::new();
        write_message(&msg, &mut bytes, &mut fds).unwrap();
        assert_eq!(client.send_msg(&bytes, &fds).unwrap(), bytes.len());

        let ret_msg = receive_one(&server, SIGNATURE);
        assert_eq_msgs(&msg, &ret_msg.map_fd(IntoRawFd::into_raw_fd));
    }

    #[test]
    fn write_read_cycle_fd() {
        // ship one end of a second socketpair through the first
        let (fd_a, fd_b) = UnixStream::pair().unwrap();
        let msg = Message {
            sender_id: 42,
            opcode: 7,
            args: smallvec::smallvec![Argument::Fd(fd_a.as_raw_fd()), Argument::Uint(9)],
        };

        static SIGNATURE: &[ArgumentType] = &[ArgumentType::Fd, ArgumentType::Uint];

        let (client, server) = UnixStream::pair().unwrap();
        let client = Socket::from(client);
        let server = Socket::from(server);

        let mut bytes = Vec::new();
        let mut fds = Vec::new();
        write_message(&msg, &mut bytes, &mut fds).unwrap();
        client.send_msg(&bytes, &fds).unwrap();
        // the dups were sent; dropping them must not close the caller's fd
        drop(fds);

        let ret_msg = receive_one(&server, SIGNATURE);
        let received = match ret_msg.args.into_iter().next().unwrap() {
            Argument::Fd(fd) => fd,
            other => panic!("expected fd argument, got {other:?}"),
        };

        // prove the descriptor still points at the peer of fd_b
        let mut transported = UnixStream::from(received);
        transported.write_all(b"ping").unwrap();
        let mut buf = [0u8; 4];
        let mut fd_b = fd_b;
        fd_b.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"ping");
    }

    #[test]
    fn eof_surfaces_on_header_read() {
        let (client, server) = UnixStream::pair().unwrap();
        let server = Socket::from(server);
        drop(client);
        let mut buf = [0u8; HEADER_LEN];
        let err = server.read_exact(&mut buf).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedEof);
    }
}
