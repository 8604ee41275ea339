//! Message framing and the argument codec
//!
//! Every message is a sequence of 32-bit words in native byte order, prefixed
//! by an 8-byte header. Strings and arrays are length-prefixed and padded to a
//! word boundary; file descriptors occupy no payload bytes and travel as
//! ancillary data.

use std::collections::VecDeque;
use std::ffi::CStr;
use std::os::unix::io::{BorrowedFd, OwnedFd, RawFd};

use smallvec::SmallVec;

use crate::protocol::{Argument, ArgumentType, Fixed, Message, INLINE_ARGS};

/// Length in bytes of a message header
pub const HEADER_LEN: usize = 8;

/// Round `n` up to the next multiple of 4
///
/// Strings and arrays are padded to 32-bit boundaries on the wire.
#[inline]
pub fn ceil4(n: usize) -> usize {
    (n + 3) & !3
}

/// The framing header carried by every message
///
/// Bytes 0..4 hold the sender id, bytes 4..6 the opcode and bytes 6..8 the
/// total message size in bytes, header included. The size field caps a single
/// message at 65535 bytes.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct MessageHeader {
    /// Id of the object the message is addressed from
    pub sender_id: u32,
    /// Opcode of the request or event, zero-based in declaration order
    pub opcode: u16,
    /// Total size of the message in bytes, including these 8
    pub size: u16,
}

impl MessageHeader {
    /// Encode this header into its 8-byte wire form
    pub fn to_bytes(self) -> [u8; HEADER_LEN] {
        let mut buf = [0u8; HEADER_LEN];
        buf[..4].copy_from_slice(&self.sender_id.to_ne_bytes());
        let word = (u32::from(self.size) << 16) | u32::from(self.opcode);
        buf[4..].copy_from_slice(&word.to_ne_bytes());
        buf
    }

    /// Decode a header from its 8-byte wire form
    pub fn from_bytes(raw: [u8; HEADER_LEN]) -> Self {
        let sender_id = u32::from_ne_bytes([raw[0], raw[1], raw[2], raw[3]]);
        let word = u32::from_ne_bytes([raw[4], raw[5], raw[6], raw[7]]);
        Self { sender_id, opcode: (word & 0x0000_FFFF) as u16, size: (word >> 16) as u16 }
    }
}

/// Error generated when trying to serialize a message into a buffer
#[derive(Debug)]
pub enum MessageWriteError {
    /// The message does not fit in the 16-bit size field of its header
    MessageTooLong,
    /// The message contains a FD that could not be dup-ed
    DupFdFailed(std::io::Error),
}

impl std::error::Error for MessageWriteError {}

impl std::fmt::Display for MessageWriteError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        match self {
            Self::MessageTooLong => {
                f.write_str("The message content does not fit in the header size field.")
            }
            Self::DupFdFailed(e) => {
                write!(
                    f,
                    "The message contains a file descriptor that could not be dup()-ed ({e})."
                )
            }
        }
    }
}

/// Error generated when trying to deserialize message arguments from a buffer
#[derive(Debug, Clone)]
pub enum MessageParseError {
    /// The message references a FD but the fd queue is empty
    MissingFd,
    /// More data is needed to deserialize the message
    MissingData,
    /// A string argument is not NUL-terminated
    MissingNul,
    /// The message is malformed and cannot be parsed
    Malformed,
}

impl std::error::Error for MessageParseError {}

impl std::fmt::Display for MessageParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        match *self {
            Self::MissingFd => f.write_str("The message references a FD but the fd queue is empty."),
            Self::MissingData => f.write_str("More data is needed to deserialize the message."),
            Self::MissingNul => f.write_str("A string argument misses its NUL terminator."),
            Self::Malformed => f.write_str("The message is malformed and cannot be parsed."),
        }
    }
}

/// Serialize a message, header included, at the end of `payload`
///
/// Any serialized Fd is `dup()`-ed into `fds`; the caller keeps ownership of
/// the original descriptor. Errors if the total size overflows the header's
/// 16-bit size field.
pub fn write_message(
    msg: &Message<RawFd>,
    payload: &mut Vec<u8>,
    fds: &mut Vec<OwnedFd>,
) -> Result<(), MessageWriteError> {
    fn write_u32(payload: &mut Vec<u8>, u: u32) {
        payload.extend_from_slice(&u.to_ne_bytes());
    }

    fn write_array(payload: &mut Vec<u8>, array: &[u8]) {
        write_u32(payload, array.len() as u32);
        payload.extend_from_slice(array);
        payload.resize(payload.len() + ceil4(array.len()) - array.len(), 0);
    }

    let base = payload.len();
    payload.extend_from_slice(&[0u8; HEADER_LEN]);

    for arg in &msg.args {
        match *arg {
            Argument::Int(i) => write_u32(payload, i as u32),
            Argument::Uint(u) => write_u32(payload, u),
            Argument::Fixed(f) => write_u32(payload, f.into_raw() as u32),
            Argument::Str(Some(ref s)) => write_array(payload, s.as_bytes_with_nul()),
            Argument::Str(None) => write_u32(payload, 0),
            Argument::Object(o) => write_u32(payload, o),
            Argument::NewId(n) => write_u32(payload, n),
            Argument::Array(ref a) => write_array(payload, a),
            Argument::Fd(fd) => {
                let dup = unsafe { BorrowedFd::borrow_raw(fd) }
                    .try_clone_to_owned()
                    .map_err(MessageWriteError::DupFdFailed)?;
                fds.push(dup);
            }
        }
    }

    let size = payload.len() - base;
    if size > u16::MAX as usize {
        payload.truncate(base);
        return Err(MessageWriteError::MessageTooLong);
    }
    let header =
        MessageHeader { sender_id: msg.sender_id, opcode: msg.opcode, size: size as u16 };
    payload[base..base + HEADER_LEN].copy_from_slice(&header.to_bytes());
    Ok(())
}

/// Deserialize the arguments of a single message with the given signature
///
/// `payload` holds the message content without its header. Fd arguments are
/// popped from the front of `fds` in declaration order.
pub fn parse_args(
    payload: &[u8],
    signature: &[ArgumentType],
    fds: &mut VecDeque<OwnedFd>,
) -> Result<SmallVec<[Argument<OwnedFd>; INLINE_ARGS]>, MessageParseError> {
    fn read_u32(payload: &[u8], offset: &mut usize) -> Result<u32, MessageParseError> {
        if *offset + 4 > payload.len() {
            return Err(MessageParseError::MissingData);
        }
        let val = u32::from_ne_bytes(payload[*offset..*offset + 4].try_into().unwrap());
        *offset += 4;
        Ok(val)
    }

    // Reads the padded body of a string or array and advances past the padding.
    fn read_body<'a>(
        payload: &'a [u8],
        offset: &mut usize,
        len: usize,
    ) -> Result<&'a [u8], MessageParseError> {
        let padded = ceil4(len);
        if *offset + padded > payload.len() {
            return Err(MessageParseError::MissingData);
        }
        let body = &payload[*offset..*offset + len];
        *offset += padded;
        Ok(body)
    }

    let mut offset = 0;

    signature
        .iter()
        .map(|argtype| match *argtype {
            ArgumentType::Int => Ok(Argument::Int(read_u32(payload, &mut offset)? as i32)),
            ArgumentType::Uint => Ok(Argument::Uint(read_u32(payload, &mut offset)?)),
            ArgumentType::Fixed => {
                Ok(Argument::Fixed(Fixed::from_raw(read_u32(payload, &mut offset)? as i32)))
            }
            ArgumentType::Object(_) => Ok(Argument::Object(read_u32(payload, &mut offset)?)),
            ArgumentType::NewId => Ok(Argument::NewId(read_u32(payload, &mut offset)?)),
            ArgumentType::Str(_) => {
                // the length counts the NUL terminator; 0 encodes a null string
                let len = read_u32(payload, &mut offset)? as usize;
                if len == 0 {
                    return Ok(Argument::Str(None));
                }
                let body = read_body(payload, &mut offset, len)?;
                if body[len - 1] != 0 {
                    return Err(MessageParseError::MissingNul);
                }
                match CStr::from_bytes_with_nul(body) {
                    Ok(s) => Ok(Argument::Str(Some(Box::new(s.into())))),
                    Err(_) => Err(MessageParseError::Malformed),
                }
            }
            ArgumentType::Array => {
                let len = read_u32(payload, &mut offset)? as usize;
                let body = read_body(payload, &mut offset, len)?;
                Ok(Argument::Array(Box::new(body.into())))
            }
            ArgumentType::Fd => {
                fds.pop_front().map(Argument::Fd).ok_or(MessageParseError::MissingFd)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::AllowNull;
    use smallvec::smallvec;
    use std::ffi::CString;
    use std::os::unix::io::IntoRawFd;

    #[test]
    fn ceil4_laws() {
        for n in (0..4096).chain([65530, 65535, 100_000]) {
            let c = ceil4(n);
            assert!(c >= n, "ceil4({n}) rounds down");
            assert_eq!(c % 4, 0, "ceil4({n}) is not aligned");
            assert!(c < n + 4, "ceil4({n}) overshoots");
        }
    }

    #[test]
    fn header_roundtrip() {
        let headers = [
            MessageHeader { sender_id: 0, opcode: 0, size: 8 },
            MessageHeader { sender_id: 1, opcode: 1, size: 12 },
            MessageHeader { sender_id: 0xFF00_0000, opcode: 0x7FFF, size: 0xFFFF },
            MessageHeader { sender_id: u32::MAX, opcode: u16::MAX, size: u16::MAX },
            MessageHeader { sender_id: 42, opcode: 7, size: 0 },
        ];
        for h in headers {
            let bytes = h.to_bytes();
            assert_eq!(bytes.len(), HEADER_LEN);
            assert_eq!(MessageHeader::from_bytes(bytes), h);
        }
    }

    #[test]
    fn into_from_raw_cycle() {
        let mut payload = Vec::new();
        let mut fd_buffer = Vec::new();

        let msg = Message {
            sender_id: 42,
            opcode: 7,
            args: smallvec![
                Argument::Uint(3),
                Argument::Fixed(Fixed::from_raw(-89)),
                Argument::Str(Some(Box::new(CString::new(&b"I like trains!"[..]).unwrap()))),
                Argument::Array(vec![1, 2, 3, 4, 5, 6, 7, 8, 9].into()),
                Argument::Object(88),
                Argument::NewId(56),
                Argument::Int(-25),
            ],
        };
        write_message(&msg, &mut payload, &mut fd_buffer).unwrap();

        let header = MessageHeader::from_bytes(payload[..HEADER_LEN].try_into().unwrap());
        assert_eq!(header.sender_id, 42);
        assert_eq!(header.opcode, 7);
        assert_eq!(header.size as usize, payload.len());

        let mut fd_buffer = VecDeque::from(fd_buffer);
        let args = parse_args(
            &payload[HEADER_LEN..],
            &[
                ArgumentType::Uint,
                ArgumentType::Fixed,
                ArgumentType::Str(AllowNull::No),
                ArgumentType::Array,
                ArgumentType::Object(AllowNull::No),
                ArgumentType::NewId,
                ArgumentType::Int,
            ],
            &mut fd_buffer,
        )
        .unwrap();

        let rebuilt = Message { sender_id: header.sender_id, opcode: header.opcode, args };
        assert_eq!(rebuilt.map_fd(IntoRawFd::into_raw_fd), msg);
    }

    #[test]
    fn string_encoded_length() {
        // total length is 4 (length word) + ceil4(len + 1)
        for (s, expected) in [("abc", 4 + 4), ("wl_shell", 4 + 12), ("", 4 + 4)] {
            let msg = Message::<RawFd> {
                sender_id: 1,
                opcode: 0,
                args: smallvec![Argument::Str(Some(Box::new(CString::new(s).unwrap())))],
            };
            let mut payload = Vec::new();
            write_message(&msg, &mut payload, &mut Vec::new()).unwrap();
            assert_eq!(payload.len() - HEADER_LEN, expected, "string {s:?}");

            let args = parse_args(
                &payload[HEADER_LEN..],
                &[ArgumentType::Str(AllowNull::No)],
                &mut VecDeque::new(),
            )
            .unwrap();
            match &args[..] {
                [Argument::Str(Some(parsed))] => assert_eq!(parsed.to_bytes(), s.as_bytes()),
                other => panic!("unexpected args: {other:?}"),
            }
        }
    }

    #[test]
    fn null_string_roundtrip() {
        let msg = Message::<RawFd> { sender_id: 1, opcode: 0, args: smallvec![Argument::Str(None)] };
        let mut payload = Vec::new();
        write_message(&msg, &mut payload, &mut Vec::new()).unwrap();
        assert_eq!(payload.len(), HEADER_LEN + 4);
        let args = parse_args(
            &payload[HEADER_LEN..],
            &[ArgumentType::Str(AllowNull::Yes)],
            &mut VecDeque::new(),
        )
        .unwrap();
        assert!(matches!(args[..], [Argument::Str(None)]));
    }

    #[test]
    fn missing_nul_is_rejected() {
        // length 4, but the fourth byte is not a NUL
        let mut payload = Vec::new();
        payload.extend_from_slice(&4u32.to_ne_bytes());
        payload.extend_from_slice(b"oops");
        let err = parse_args(&payload, &[ArgumentType::Str(AllowNull::No)], &mut VecDeque::new())
            .unwrap_err();
        assert!(matches!(err, MessageParseError::MissingNul));
    }

    #[test]
    fn truncated_string_is_rejected() {
        // claims 13 bytes of content but carries none
        let payload = 13u32.to_ne_bytes();
        let err = parse_args(&payload, &[ArgumentType::Str(AllowNull::No)], &mut VecDeque::new())
            .unwrap_err();
        assert!(matches!(err, MessageParseError::MissingData));
    }

    #[test]
    fn missing_fd_is_rejected() {
        let err = parse_args(&[], &[ArgumentType::Fd], &mut VecDeque::new()).unwrap_err();
        assert!(matches!(err, MessageParseError::MissingFd));
    }

    #[test]
    fn oversize_message_is_rejected() {
        let msg = Message::<RawFd> {
            sender_id: 1,
            opcode: 0,
            args: smallvec![Argument::Array(Box::new(vec![0u8; 70_000]))],
        };
        let mut payload = Vec::new();
        let err = write_message(&msg, &mut payload, &mut Vec::new()).unwrap_err();
        assert!(matches!(err, MessageWriteError::MessageTooLong));
        assert!(payload.is_empty());
    }
}
