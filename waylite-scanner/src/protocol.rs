//! Intermediate representation of a protocol file

/// A whole protocol document, holding one or more interfaces
#[derive(Debug)]
pub struct Protocol {
    pub name: String,
    pub copyright: Option<String>,
    pub description: Option<(String, String)>,
    pub interfaces: Vec<Interface>,
}

impl Protocol {
    pub fn new(name: String) -> Self {
        Self { name, copyright: None, description: None, interfaces: Vec::new() }
    }
}

/// A named contract with a version, requests, events and enums
///
/// Opcodes are implicit: the index of a request or event in its list, in
/// declaration order.
#[derive(Debug)]
pub struct Interface {
    pub name: String,
    pub version: u32,
    pub description: Option<(String, String)>,
    pub requests: Vec<MessageSpec>,
    pub events: Vec<MessageSpec>,
    pub enums: Vec<Enum>,
}

impl Interface {
    pub fn new() -> Self {
        Self {
            name: String::new(),
            version: 1,
            description: None,
            requests: Vec::new(),
            events: Vec::new(),
            enums: Vec::new(),
        }
    }
}

impl Default for Interface {
    fn default() -> Self {
        Self::new()
    }
}

/// A request or an event
#[derive(Debug)]
pub struct MessageSpec {
    pub name: String,
    pub destructor: bool,
    pub since: u32,
    pub description: Option<(String, String)>,
    pub args: Vec<Arg>,
}

impl MessageSpec {
    pub fn new() -> Self {
        Self {
            name: String::new(),
            destructor: false,
            since: 1,
            description: None,
            args: Vec::new(),
        }
    }

    /// Number of file descriptors carried by this message
    ///
    /// This feeds the per-interface fd-count tables the dispatch loop sizes
    /// its ancillary buffers with.
    pub fn fd_count(&self) -> usize {
        self.args.iter().filter(|arg| arg.kind == ArgKind::Fd).count()
    }
}

impl Default for MessageSpec {
    fn default() -> Self {
        Self::new()
    }
}

/// A single argument of a request or event
#[derive(Debug)]
pub struct Arg {
    pub name: String,
    pub kind: ArgKind,
    /// Target interface for `object` / `new_id` arguments, when declared
    pub interface: Option<String>,
    pub summary: Option<String>,
    pub allow_null: bool,
    /// Name of the enum this integer belongs to, possibly dotted
    /// (`wl_output.transform`)
    pub enum_: Option<String>,
}

impl Arg {
    pub fn new() -> Self {
        Self {
            name: String::new(),
            kind: ArgKind::Object,
            interface: None,
            summary: None,
            allow_null: false,
            enum_: None,
        }
    }
}

impl Default for Arg {
    fn default() -> Self {
        Self::new()
    }
}

/// The eight wire kinds an argument can have
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum ArgKind {
    Int,
    Uint,
    Fixed,
    String,
    Object,
    NewId,
    Array,
    Fd,
}

/// A named set of integer constants
#[derive(Debug)]
pub struct Enum {
    pub name: String,
    pub since: u32,
    pub description: Option<(String, String)>,
    pub entries: Vec<Entry>,
    /// Entries are independently combinable flags
    pub bitfield: bool,
}

impl Enum {
    pub fn new() -> Self {
        Self { name: String::new(), since: 1, description: None, entries: Vec::new(), bitfield: false }
    }
}

impl Default for Enum {
    fn default() -> Self {
        Self::new()
    }
}

/// One enum entry; the XML value may be decimal or hexadecimal
#[derive(Debug)]
pub struct Entry {
    pub name: String,
    pub value: u32,
    pub since: u32,
    pub description: Option<(String, String)>,
    pub summary: Option<String>,
}

impl Entry {
    pub fn new() -> Self {
        Self { name: String::new(), value: 0, since: 1, description: None, summary: None }
    }
}

impl Default for Entry {
    fn default() -> Self {
        Self::new()
    }
}
