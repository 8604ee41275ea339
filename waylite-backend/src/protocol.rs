//! Types shared by the codec, the transport and the generated proxy layer

use std::ffi::CString;
use std::os::unix::io::AsRawFd;

/// The identifier of a protocol object
///
/// Id `0` is the null object, id `1` is the `wl_display` singleton bound at
/// connection time. Within a connection an id uniquely identifies an object
/// until the server acknowledges its deletion via `wl_display.delete_id`.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct ObjectId(u32);

impl ObjectId {
    /// The null object id
    pub const NULL: ObjectId = ObjectId(0);
    /// The id of the `wl_display` object
    pub const DISPLAY: ObjectId = ObjectId(1);

    /// Wrap a raw wire id
    #[inline]
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw wire representation of this id
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }

    /// Whether this is the null id
    #[inline]
    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

/// A signed 24.8 fixed-point number
///
/// One sign bit, 23 bits of integer precision and 8 bits of fractional
/// precision, carried on the wire as 32 bits.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Fixed(i32);

impl Fixed {
    /// Wrap the raw wire representation
    #[inline]
    pub fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    /// The raw wire representation
    #[inline]
    pub fn into_raw(self) -> i32 {
        self.0
    }

    /// Convert from a floating point value, truncating excess precision
    #[inline]
    pub fn from_f64(value: f64) -> Self {
        Self((value * 256.0) as i32)
    }

    /// Convert to a floating point value
    #[inline]
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / 256.0
    }
}

impl std::fmt::Debug for Fixed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Fixed({})", self.to_f64())
    }
}

impl std::fmt::Display for Fixed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}", self.to_f64())
    }
}

/// Describes whether an argument may have a null value.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AllowNull {
    /// Null values are allowed.
    Yes,
    /// Null values are forbidden.
    No,
}

/// Enum of possible argument types as recognized by the wire
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ArgumentType {
    /// An integer argument. Represented by a [`i32`].
    Int,
    /// An unsigned integer argument. Represented by a [`u32`].
    Uint,
    /// A signed fixed point number with 1/256 precision
    Fixed,
    /// A string. This is represented as a [`CString`] in a message.
    Str(AllowNull),
    /// Id of a wayland object
    Object(AllowNull),
    /// Id of a newly created wayland object
    NewId,
    /// `Vec<u8>`
    Array,
    /// A file descriptor argument.
    Fd,
}

/// Enum of possible argument of the protocol
#[derive(Debug, Clone)]
#[allow(clippy::box_collection)]
pub enum Argument<Fd> {
    /// An integer argument. Represented by a [`i32`].
    Int(i32),
    /// An unsigned integer argument. Represented by a [`u32`].
    Uint(u32),
    /// A signed fixed point number with 1/256 precision
    Fixed(Fixed),
    /// CString
    ///
    /// The value is boxed to reduce the stack size of Argument. The performance
    /// impact is negligible as `string` arguments are pretty rare in the protocol.
    Str(Option<Box<CString>>),
    /// Id of a wayland object
    Object(u32),
    /// Id of a newly created wayland object
    NewId(u32),
    /// `Vec<u8>`
    ///
    /// The value is boxed to reduce the stack size of Argument. The performance
    /// impact is negligible as `array` arguments are pretty rare in the protocol.
    Array(Box<Vec<u8>>),
    /// A file descriptor argument.
    ///
    /// Represented as a [`RawFd`][std::os::fd::RawFd] on the sending side and
    /// an [`OwnedFd`][std::os::fd::OwnedFd] on the receiving side.
    Fd(Fd),
}

impl<Fd> Argument<Fd> {
    fn map_fd<T>(self, f: &mut impl FnMut(Fd) -> T) -> Argument<T> {
        match self {
            Self::Int(val) => Argument::Int(val),
            Self::Uint(val) => Argument::Uint(val),
            Self::Fixed(val) => Argument::Fixed(val),
            Self::Str(val) => Argument::Str(val),
            Self::Object(val) => Argument::Object(val),
            Self::NewId(val) => Argument::NewId(val),
            Self::Array(val) => Argument::Array(val),
            Self::Fd(val) => Argument::Fd(f(val)),
        }
    }
}

impl<Fd: AsRawFd> PartialEq for Argument<Fd> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Uint(a), Self::Uint(b)) => a == b,
            (Self::Fixed(a), Self::Fixed(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a == b,
            (Self::NewId(a), Self::NewId(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Fd(a), Self::Fd(b)) => a.as_raw_fd() == b.as_raw_fd(),
            _ => false,
        }
    }
}

impl<Fd: AsRawFd> Eq for Argument<Fd> {}

impl<Fd: AsRawFd> std::fmt::Display for Argument<Fd> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            Self::Uint(value) => write!(f, "{value}"),
            Self::Fixed(value) => write!(f, "{value}"),
            Self::Str(value) => write!(f, "{value:?}"),
            Self::Object(value) => write!(f, "{value}"),
            Self::NewId(value) => write!(f, "new id {value}"),
            Self::Array(value) => write!(f, "array[{}]", value.len()),
            Self::Fd(value) => write!(f, "fd {}", value.as_raw_fd()),
        }
    }
}

/// Number of arguments that are stocked inline in a `Message` before allocating
///
/// This is a ad-hoc number trying to reach a good balance between avoiding too
/// many allocations and keeping the stack size of `Message` small.
pub const INLINE_ARGS: usize = 4;

/// Represents a message that has been sent from some object.
#[derive(Clone, Debug)]
pub struct Message<Fd> {
    /// The id of the object that sent the message.
    pub sender_id: u32,
    /// The opcode of the message.
    pub opcode: u16,
    /// The arguments of the message.
    pub args: smallvec::SmallVec<[Argument<Fd>; INLINE_ARGS]>,
}

impl<Fd> Message<Fd> {
    /// Map some closure on all Fd contained in this message, to change the Fd generic parameter.
    pub fn map_fd<T>(self, mut f: impl FnMut(Fd) -> T) -> Message<T> {
        Message {
            sender_id: self.sender_id,
            opcode: self.opcode,
            args: self.args.into_iter().map(move |arg| arg.map_fd(&mut f)).collect(),
        }
    }
}

impl<Fd: AsRawFd> PartialEq for Message<Fd> {
    fn eq(&self, other: &Self) -> bool {
        self.sender_id == other.sender_id && self.opcode == other.opcode && self.args == other.args
    }
}

impl<Fd: AsRawFd> Eq for Message<Fd> {}

/// An enum value in the protocol.
///
/// Event arguments declared with an `enum` attribute decode into this wrapper
/// so that a value the protocol file does not know about survives as
/// [`WEnum::Unknown`] instead of being rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WEnum<T> {
    /// The interpreted value
    Value(T),
    /// The stored value does not match one defined by the protocol file
    Unknown(u32),
}

/// Error representing an unknown numeric variant for a [`WEnum`]
#[derive(Debug, Copy, Clone)]
pub struct WEnumError {
    typ: &'static str,
    value: u32,
}

impl std::error::Error for WEnumError {}

impl std::fmt::Display for WEnumError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Unknown numeric value {} for enum {}", self.value, self.typ)
    }
}

impl<T> WEnum<T> {
    /// Convert this [`WEnum`] into a result
    ///
    /// This can be used to take advantage of the numerous helper methods on
    /// [`Result`] if you don't plan to handle the unknown case of this enum.
    #[inline]
    pub fn into_result(self) -> Result<T, WEnumError> {
        match self {
            Self::Value(v) => Ok(v),
            Self::Unknown(value) => Err(WEnumError { typ: std::any::type_name::<T>(), value }),
        }
    }
}

impl<T> From<WEnum<T>> for Result<T, WEnumError> {
    fn from(me: WEnum<T>) -> Self {
        me.into_result()
    }
}

impl<T: TryFrom<u32>> From<u32> for WEnum<T> {
    /// Constructs an enum from the integer format used by the wayland protocol.
    fn from(v: u32) -> Self {
        match T::try_from(v) {
            Ok(t) => Self::Value(t),
            Err(_) => Self::Unknown(v),
        }
    }
}

impl<T: Into<u32>> From<WEnum<T>> for u32 {
    /// Converts an enum into a numerical form used by the wayland protocol.
    fn from(enu: WEnum<T>) -> u32 {
        match enu {
            WEnum::Unknown(u) => u,
            WEnum::Value(t) => t.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_f64_cycle() {
        assert_eq!(Fixed::from_f64(1.0).into_raw(), 256);
        assert_eq!(Fixed::from_f64(-1.0).into_raw(), -256);
        assert_eq!(Fixed::from_raw(128).to_f64(), 0.5);
        assert_eq!(Fixed::from_f64(Fixed::from_raw(-12345).to_f64()).into_raw(), -12345);
    }

    #[test]
    fn wenum_unknown_roundtrip() {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        enum Two {
            A,
        }
        impl TryFrom<u32> for Two {
            type Error = ();
            fn try_from(v: u32) -> Result<Two, ()> {
                if v == 1 {
                    Ok(Two::A)
                } else {
                    Err(())
                }
            }
        }
        impl From<Two> for u32 {
            fn from(_: Two) -> u32 {
                1
            }
        }
        assert_eq!(WEnum::<Two>::from(1), WEnum::Value(Two::A));
        assert_eq!(WEnum::<Two>::from(7), WEnum::Unknown(7));
        assert_eq!(u32::from(WEnum::<Two>::Unknown(7)), 7);
        assert!(WEnum::<Two>::from(7).into_result().is_err());
    }
}
