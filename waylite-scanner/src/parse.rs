//! XML protocol parsing
//!
//! The generator is a one-shot offline tool, so malformed input simply
//! panics with a description of the problem.

use std::io::{BufRead, BufReader, Read};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::protocol::{Arg, ArgKind, Entry, Enum, Interface, MessageSpec, Protocol};

/// Parse a protocol document from a reader.
pub fn parse<S: Read>(stream: S) -> Protocol {
    let mut reader = Reader::from_reader(BufReader::new(stream));
    let config = reader.config_mut();
    config.trim_text(true);
    config.expand_empty_elements = true;
    Parser { reader }.document()
}

struct Parser<R: BufRead> {
    reader: Reader<R>,
}

impl<R: BufRead> Parser<R> {
    fn next(&mut self) -> Event<'static> {
        match self.reader.read_event_into(&mut Vec::new()) {
            Ok(event) => event.into_owned(),
            Err(e) => panic!("Ill-formed protocol file: {e:?}"),
        }
    }

    fn document(mut self) -> Protocol {
        loop {
            match self.next() {
                Event::Decl(_) | Event::DocType(_) | Event::Comment(_) => continue,
                Event::Start(start) => {
                    assert_eq!(
                        start.name().into_inner(),
                        b"protocol",
                        "missing protocol toplevel tag"
                    );
                    let name = required_attr(&start, b"name");
                    return self.protocol(Protocol::new(name));
                }
                e => panic!("Ill-formed protocol file: unexpected {e:?}"),
            }
        }
    }

    fn protocol(&mut self, mut protocol: Protocol) -> Protocol {
        loop {
            match self.next() {
                Event::Start(start) => match start.name().into_inner() {
                    b"copyright" => protocol.copyright = Some(self.text_until(b"copyright")),
                    b"description" => protocol.description = Some(self.description(&start)),
                    b"interface" => protocol.interfaces.push(self.interface(&start)),
                    tag => panic!(
                        "unexpected tag `{}` in protocol {}",
                        String::from_utf8_lossy(tag),
                        protocol.name
                    ),
                },
                Event::End(end) if end.name().into_inner() == b"protocol" => return protocol,
                Event::Comment(_) | Event::Text(_) => {}
                e => panic!("Ill-formed protocol file: unexpected {e:?}"),
            }
        }
    }

    fn interface(&mut self, start: &BytesStart) -> Interface {
        let mut interface = Interface::new();
        for (key, value) in attrs(start) {
            match &key[..] {
                b"name" => interface.name = value,
                b"version" => interface.version = int_attr(&value),
                _ => {}
            }
        }

        loop {
            match self.next() {
                Event::Start(start) => match start.name().into_inner() {
                    b"description" => interface.description = Some(self.description(&start)),
                    b"request" => interface.requests.push(self.message(&start, b"request")),
                    b"event" => interface.events.push(self.message(&start, b"event")),
                    b"enum" => interface.enums.push(self.enumeration(&start)),
                    tag => panic!(
                        "unexpected tag `{}` in interface {}",
                        String::from_utf8_lossy(tag),
                        interface.name
                    ),
                },
                Event::End(end) if end.name().into_inner() == b"interface" => return interface,
                Event::Comment(_) | Event::Text(_) => {}
                e => panic!("Ill-formed protocol file: unexpected {e:?}"),
            }
        }
    }

    fn message(&mut self, start: &BytesStart, tag: &[u8]) -> MessageSpec {
        let mut message = MessageSpec::new();
        for (key, value) in attrs(start) {
            match &key[..] {
                b"name" => message.name = value,
                b"type" => message.destructor = value == "destructor",
                b"since" => message.since = int_attr(&value),
                _ => {}
            }
        }

        loop {
            match self.next() {
                Event::Start(start) => match start.name().into_inner() {
                    b"description" => message.description = Some(self.description(&start)),
                    b"arg" => message.args.push(self.arg(&start)),
                    tag => panic!("unexpected tag `{}` in message", String::from_utf8_lossy(tag)),
                },
                Event::End(end) if end.name().into_inner() == tag => return message,
                Event::Comment(_) | Event::Text(_) => {}
                e => panic!("Ill-formed protocol file: unexpected {e:?}"),
            }
        }
    }

    fn arg(&mut self, start: &BytesStart) -> Arg {
        let mut arg = Arg::new();
        for (key, value) in attrs(start) {
            match &key[..] {
                b"name" => arg.name = value,
                b"type" => arg.kind = arg_kind(&value),
                b"summary" => arg.summary = Some(normalize_ws(&value)),
                b"interface" => arg.interface = Some(value),
                b"allow-null" => arg.allow_null = value == "true",
                b"enum" => arg.enum_ = Some(value),
                _ => {}
            }
        }

        loop {
            match self.next() {
                // an arg may carry a description element; the summary attribute
                // is all the generator consumes
                Event::Start(start) if start.name().into_inner() == b"description" => {
                    let _ = self.description(&start);
                }
                Event::End(end) if end.name().into_inner() == b"arg" => return arg,
                Event::Comment(_) | Event::Text(_) => {}
                e => panic!("Ill-formed protocol file: unexpected {e:?}"),
            }
        }
    }

    fn enumeration(&mut self, start: &BytesStart) -> Enum {
        let mut enu = Enum::new();
        for (key, value) in attrs(start) {
            match &key[..] {
                b"name" => enu.name = value,
                b"since" => enu.since = int_attr(&value),
                b"bitfield" => enu.bitfield = value == "true",
                _ => {}
            }
        }

        loop {
            match self.next() {
                Event::Start(start) => match start.name().into_inner() {
                    b"description" => enu.description = Some(self.description(&start)),
                    b"entry" => enu.entries.push(self.entry(&start)),
                    tag => panic!("unexpected tag `{}` in enum", String::from_utf8_lossy(tag)),
                },
                Event::End(end) if end.name().into_inner() == b"enum" => return enu,
                Event::Comment(_) | Event::Text(_) => {}
                e => panic!("Ill-formed protocol file: unexpected {e:?}"),
            }
        }
    }

    fn entry(&mut self, start: &BytesStart) -> Entry {
        let mut entry = Entry::new();
        for (key, value) in attrs(start) {
            match &key[..] {
                b"name" => entry.name = value,
                b"value" => entry.value = int_attr(&value),
                b"since" => entry.since = int_attr(&value),
                b"summary" => entry.summary = Some(normalize_ws(&value)),
                _ => {}
            }
        }

        loop {
            match self.next() {
                Event::Start(start) if start.name().into_inner() == b"description" => {
                    entry.description = Some(self.description(&start));
                }
                Event::End(end) if end.name().into_inner() == b"entry" => return entry,
                Event::Comment(_) | Event::Text(_) => {}
                e => panic!("Ill-formed protocol file: unexpected {e:?}"),
            }
        }
    }

    fn description(&mut self, start: &BytesStart) -> (String, String) {
        let summary = attrs(start)
            .find(|(key, _)| key == b"summary")
            .map(|(_, value)| normalize_ws(&value))
            .unwrap_or_default();
        (summary, self.text_until(b"description"))
    }

    fn text_until(&mut self, tag: &[u8]) -> String {
        let mut out = String::new();
        loop {
            match self.next() {
                Event::Text(text) => {
                    if !out.is_empty() {
                        out.push_str("\n\n");
                    }
                    out.push_str(&text.unescape().unwrap_or_default());
                }
                Event::CData(data) => out.push_str(&String::from_utf8_lossy(&data.into_inner())),
                Event::End(end) if end.name().into_inner() == tag => return out,
                Event::Comment(_) => {}
                e => panic!("Ill-formed protocol file: unexpected {e:?}"),
            }
        }
    }
}

fn attrs<'a>(start: &'a BytesStart<'a>) -> impl Iterator<Item = (Vec<u8>, String)> + 'a {
    start.attributes().filter_map(|attr| {
        let attr = attr.ok()?;
        let value = match String::from_utf8(attr.value.into_owned()) {
            Ok(value) => value,
            Err(e) => panic!("Invalid UTF8 in attribute: {e}"),
        };
        Some((attr.key.into_inner().to_owned(), value))
    })
}

fn required_attr(start: &BytesStart, key: &[u8]) -> String {
    attrs(start)
        .find(|(k, _)| k == key)
        .map(|(_, value)| value)
        .unwrap_or_else(|| panic!("missing `{}` attribute", String::from_utf8_lossy(key)))
}

fn int_attr(value: &str) -> u32 {
    let parsed = if let Some(hex) = value.strip_prefix("0x") {
        u32::from_str_radix(hex, 16).ok()
    } else {
        value.parse().ok()
    };
    match parsed {
        Some(parsed) => parsed,
        None => panic!("invalid integer attribute `{value}`"),
    }
}

fn arg_kind(value: &str) -> ArgKind {
    match value {
        "int" => ArgKind::Int,
        "uint" => ArgKind::Uint,
        "fixed" => ArgKind::Fixed,
        "string" => ArgKind::String,
        "object" => ArgKind::Object,
        "new_id" => ArgKind::NewId,
        "array" => ArgKind::Array,
        "fd" => ArgKind::Fd,
        other => panic!("unknown argument type `{other}`"),
    }
}

fn normalize_ws(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL_PROTOCOL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<protocol name="small">
  <copyright>Do as thou wilt.</copyright>
  <interface name="wl_probe" version="3">
    <description summary="test   fixture">
      A probe object, bound through wl_registry.
    </description>
    <enum name="mood">
      <entry name="calm" value="0" summary="nothing happening"/>
      <entry name="stormy" value="0x2a"/>
    </enum>
    <enum name="caps" bitfield="true">
      <entry name="read" value="1"/>
      <entry name="write" value="2"/>
    </enum>
    <request name="poke">
      <arg name="target" type="object" interface="wl_probe"/>
      <arg name="data" type="fd"/>
      <arg name="label" type="string" allow-null="true"/>
    </request>
    <request name="destroy" type="destructor"/>
    <event name="poked" since="2">
      <arg name="mood" type="uint" enum="mood"/>
      <arg name="data" type="fd"/>
      <arg name="extra" type="fd"/>
    </event>
  </interface>
</protocol>
"#;

    #[test]
    fn parses_the_fixture() {
        let protocol = parse(SMALL_PROTOCOL.as_bytes());
        assert_eq!(protocol.name, "small");
        assert_eq!(protocol.copyright.as_deref(), Some("Do as thou wilt."));
        assert_eq!(protocol.interfaces.len(), 1);

        let iface = &protocol.interfaces[0];
        assert_eq!(iface.name, "wl_probe");
        assert_eq!(iface.version, 3);
        let (summary, body) = iface.description.as_ref().unwrap();
        assert_eq!(summary, "test fixture");
        assert!(body.contains("wl_registry"));

        assert_eq!(iface.requests.len(), 2);
        let poke = &iface.requests[0];
        assert_eq!(poke.name, "poke");
        assert_eq!(poke.fd_count(), 1);
        assert_eq!(poke.args[0].interface.as_deref(), Some("wl_probe"));
        assert!(poke.args[2].allow_null);
        assert!(!poke.destructor);
        assert!(iface.requests[1].destructor);

        assert_eq!(iface.events.len(), 1);
        let poked = &iface.events[0];
        assert_eq!(poked.since, 2);
        assert_eq!(poked.fd_count(), 2);
        assert_eq!(poked.args[0].enum_.as_deref(), Some("mood"));
    }

    #[test]
    fn entry_values_accept_both_radixes() {
        let protocol = parse(SMALL_PROTOCOL.as_bytes());
        let mood = &protocol.interfaces[0].enums[0];
        assert!(!mood.bitfield);
        assert_eq!(mood.entries[0].value, 0);
        assert_eq!(mood.entries[0].summary.as_deref(), Some("nothing happening"));
        assert_eq!(mood.entries[1].value, 42);

        let caps = &protocol.interfaces[0].enums[1];
        assert!(caps.bitfield);
        assert_eq!(caps.entries.iter().map(|e| e.value).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    #[should_panic(expected = "unknown argument type")]
    fn unknown_primitive_kind_aborts() {
        let xml = r#"<protocol name="bad">
  <interface name="wl_bad" version="1">
    <request name="oops"><arg name="x" type="quaternion"/></request>
  </interface>
</protocol>"#;
        let _ = parse(xml.as_bytes());
    }
}
