//! Emission of the typed client proxy layer
//!
//! One flat module is produced per protocol file: for each interface a proxy
//! struct, one method per request, one settable callback slot per event, a
//! per-interface fd-count table, and the enum types. A final
//! `register_constructors` function feeds the client's global constructor
//! table so globals with a known interface can be bound automatically.

use proc_macro2::{Ident, Literal, Span, TokenStream};
use quote::{format_ident, quote};

use crate::naming::{exported, local, rewrite_docs};
use crate::protocol::{Arg, ArgKind, Entry, Enum, Interface, MessageSpec, Protocol};

/// Generate the body of the client module for a whole protocol.
pub fn generate(protocol: &Protocol) -> TokenStream {
    let uses = quote! {
        use std::collections::VecDeque;
        use std::ffi::CString;
        use std::os::unix::io::{AsRawFd, BorrowedFd, OwnedFd};
        use std::sync::{Arc, Mutex};

        use waylite_backend::message;
        use waylite_backend::protocol::{AllowNull, Argument, ArgumentType, Fixed, ObjectId, WEnum};
        use waylite_backend::wire::parse_args;

        use crate::proxy::{FdCounts, Interface, Proxy, ProxyInner};
    };

    let interfaces = protocol.interfaces.iter().map(generate_interface);

    let registrations = protocol.interfaces.iter().map(|iface| {
        let name = &iface.name;
        let version = Literal::u32_unsuffixed(iface.version);
        let ty = ident(&exported(&iface.name));
        quote! {
            registry.insert((#name.to_owned(), #version), crate::globals::constructor::<#ty>);
        }
    });

    quote! {
        #uses

        #(#interfaces)*

        /// Registers a proxy constructor for every interface of this protocol.
        pub(crate) fn register_constructors(registry: &mut crate::globals::ConstructorMap) {
            #(#registrations)*
        }
    }
}

fn generate_interface(interface: &Interface) -> TokenStream {
    let iface_ty = ident(&exported(&interface.name));
    let iface_name = &interface.name;
    let version = Literal::u32_unsuffixed(interface.version);
    let doc = interface.description.as_ref().map(description_to_doc_attr);
    let handlers_ty = format_ident!("{}Handlers", iface_ty);
    let fd_counts_name = format_ident!("{}_FD_COUNTS", interface.name.to_ascii_uppercase());

    let enums = interface.enums.iter().map(|enu| generate_enum(interface, enu));

    let handler_fields = interface.events.iter().map(|event| {
        let field = ident(&local(&event.name));
        let tys = event.args.iter().map(|arg| callback_ty(interface, arg));
        quote! { #field: Option<Box<dyn FnMut(#(#tys),*) + Send>> }
    });

    let req_counts = interface.requests.iter().map(|msg| Literal::usize_unsuffixed(msg.fd_count()));
    let evt_counts = interface.events.iter().map(|msg| Literal::usize_unsuffixed(msg.fd_count()));

    let requests = interface
        .requests
        .iter()
        .enumerate()
        .map(|(opcode, request)| generate_request(interface, opcode as u16, request));
    let setters = interface.events.iter().map(|event| generate_event_setter(interface, event));
    let event_arms = interface
        .events
        .iter()
        .enumerate()
        .map(|(opcode, event)| generate_event_arm(interface, opcode as u16, event));

    quote! {
        #(#enums)*

        #[derive(Default)]
        struct #handlers_ty {
            #(#handler_fields,)*
        }

        static #fd_counts_name: FdCounts = FdCounts {
            requests: &[#(#req_counts),*],
            events: &[#(#evt_counts),*],
        };

        #doc
        #[derive(Clone)]
        pub struct #iface_ty {
            inner: ProxyInner,
            handlers: Arc<Mutex<#handlers_ty>>,
        }

        impl std::fmt::Debug for #iface_ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}@{}", Self::NAME, self.inner.id())
            }
        }

        impl #iface_ty {
            #(#requests)*
            #(#setters)*
        }

        impl Interface for #iface_ty {
            const NAME: &'static str = #iface_name;
            const VERSION: u32 = #version;

            fn from_inner(inner: ProxyInner) -> Self {
                Self { inner, handlers: Arc::default() }
            }
        }

        impl Proxy for #iface_ty {
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
                &#fd_counts_name
            }

            fn handle_event(
                &self,
                opcode: u16,
                payload: &[u8],
                fds: Vec<OwnedFd>,
            ) -> Result<(), crate::Error> {
                let mut fds = VecDeque::from(fds);
                match opcode {
                    #(#event_arms)*
                    _ => Err(crate::Error::OpcodeOutOfRange {
                        interface: Self::NAME.to_owned(),
                        opcode,
                    }),
                }
            }
        }
    }
}

fn generate_enum(interface: &Interface, enu: &Enum) -> TokenStream {
    let enum_ty = format_ident!("{}{}", exported(&interface.name), exported(&enu.name));
    let doc = enu.description.as_ref().map(description_to_doc_attr);

    if enu.bitfield {
        let entries = enu.entries.iter().map(|entry| {
            let doc = entry_doc(entry);
            let name = entry_ident(entry);
            let value = Literal::u32_unsuffixed(entry.value);
            quote! {
                #doc
                const #name = #value;
            }
        });

        quote! {
            bitflags::bitflags! {
                #doc
                #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
                pub struct #enum_ty: u32 {
                    #(#entries)*
                }
            }

            impl std::convert::TryFrom<u32> for #enum_ty {
                type Error = ();
                fn try_from(val: u32) -> Result<#enum_ty, ()> {
                    #enum_ty::from_bits(val).ok_or(())
                }
            }

            impl std::convert::From<#enum_ty> for u32 {
                fn from(val: #enum_ty) -> u32 {
                    val.bits()
                }
            }
        }
    } else {
        let variants = enu.entries.iter().map(|entry| {
            let doc = entry_doc(entry);
            let name = entry_ident(entry);
            let value = Literal::u32_unsuffixed(entry.value);
            quote! {
                #doc
                #name = #value
            }
        });

        let match_arms = enu.entries.iter().map(|entry| {
            let name = entry_ident(entry);
            let value = Literal::u32_unsuffixed(entry.value);
            quote! { #value => Ok(#enum_ty::#name) }
        });

        quote! {
            #doc
            #[repr(u32)]
            #[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
            #[non_exhaustive]
            pub enum #enum_ty {
                #(#variants,)*
            }

            impl std::convert::TryFrom<u32> for #enum_ty {
                type Error = ();
                fn try_from(val: u32) -> Result<#enum_ty, ()> {
                    match val {
                        #(#match_arms,)*
                        _ => Err(()),
                    }
                }
            }

            impl std::convert::From<#enum_ty> for u32 {
                fn from(val: #enum_ty) -> u32 {
                    val as u32
                }
            }
        }
    }
}

fn generate_request(interface: &Interface, opcode: u16, request: &MessageSpec) -> TokenStream {
    let fn_name = ident(&local(&request.name));
    let doc = request_doc(request);
    let opcode = Literal::u16_suffixed(opcode);

    let mut generics = TokenStream::new();
    let mut params = Vec::new();
    let mut setup = Vec::new();
    let mut wire_args = Vec::new();
    let mut ret_ty = quote!(());
    let mut ret_expr = quote!(());

    for arg in &request.args {
        let arg_name = ident(&local(&arg.name));
        match arg.kind {
            ArgKind::Int => {
                if let Some(spec) = &arg.enum_ {
                    let ty = enum_type(interface, spec);
                    params.push(quote!(#arg_name: #ty));
                    wire_args.push(quote!(Argument::Int(u32::from(#arg_name) as i32)));
                } else {
                    params.push(quote!(#arg_name: i32));
                    wire_args.push(quote!(Argument::Int(#arg_name)));
                }
            }
            ArgKind::Uint => {
                if let Some(spec) = &arg.enum_ {
                    let ty = enum_type(interface, spec);
                    params.push(quote!(#arg_name: #ty));
                    wire_args.push(quote!(Argument::Uint(#arg_name.into())));
                } else {
                    params.push(quote!(#arg_name: u32));
                    wire_args.push(quote!(Argument::Uint(#arg_name)));
                }
            }
            ArgKind::Fixed => {
                params.push(quote!(#arg_name: Fixed));
                wire_args.push(quote!(Argument::Fixed(#arg_name)));
            }
            ArgKind::String => {
                if arg.allow_null {
                    params.push(quote!(#arg_name: Option<&str>));
                    wire_args.push(quote!(Argument::Str(
                        #arg_name.map(|s| Box::new(CString::new(s).unwrap()))
                    )));
                } else {
                    params.push(quote!(#arg_name: &str));
                    wire_args
                        .push(quote!(Argument::Str(Some(Box::new(CString::new(#arg_name).unwrap())))));
                }
            }
            ArgKind::Object => {
                if let Some(target) = &arg.interface {
                    let ty = ident(&exported(target));
                    if arg.allow_null {
                        params.push(quote!(#arg_name: Option<&#ty>));
                        wire_args.push(quote!(Argument::Object(
                            #arg_name.map(|obj| Proxy::id(obj).raw()).unwrap_or(0)
                        )));
                    } else {
                        params.push(quote!(#arg_name: &#ty));
                        wire_args.push(quote!(Argument::Object(Proxy::id(#arg_name).raw())));
                    }
                } else {
                    params.push(quote!(#arg_name: ObjectId));
                    wire_args.push(quote!(Argument::Object(#arg_name.raw())));
                }
            }
            ArgKind::NewId => {
                if let Some(target) = &arg.interface {
                    let ty = ident(&exported(target));
                    setup.push(quote! { let #arg_name = conn.create_proxy::<#ty>(); });
                    wire_args.push(quote!(Argument::NewId(Proxy::id(&#arg_name).raw())));
                    ret_ty = quote!(#ty);
                    ret_expr = quote!(#arg_name);
                } else {
                    // generic constructor: the wire form is interface + version + id
                    generics = quote!(<P: Interface>);
                    params.push(quote!(version: u32));
                    setup.push(quote! { let #arg_name = conn.create_proxy::<P>(); });
                    wire_args
                        .push(quote!(Argument::Str(Some(Box::new(CString::new(P::NAME).unwrap())))));
                    wire_args.push(quote!(Argument::Uint(version)));
                    wire_args.push(quote!(Argument::NewId(Proxy::id(&#arg_name).raw())));
                    ret_ty = quote!(P);
                    ret_expr = quote!(#arg_name);
                }
            }
            ArgKind::Array => {
                params.push(quote!(#arg_name: &[u8]));
                wire_args.push(quote!(Argument::Array(Box::new(#arg_name.to_vec()))));
            }
            ArgKind::Fd => {
                params.push(quote!(#arg_name: BorrowedFd<'_>));
                wire_args.push(quote!(Argument::Fd(#arg_name.as_raw_fd())));
            }
        }
    }

    quote! {
        #doc
        pub fn #fn_name #generics(&self, #(#params),*) -> Result<#ret_ty, crate::Error> {
            let conn = self.inner.connection()?;
            #(#setup)*
            conn.send_request(message!(
                Proxy::id(self).raw(),
                #opcode,
                [#(#wire_args),*],
            ))?;
            Ok(#ret_expr)
        }
    }
}

fn generate_event_setter(interface: &Interface, event: &MessageSpec) -> TokenStream {
    let field = ident(&local(&event.name));
    let fn_name = format_ident!("on_{}", local(&event.name));
    let doc = setter_doc(event);
    let tys = event.args.iter().map(|arg| callback_ty(interface, arg));

    quote! {
        #doc
        pub fn #fn_name(&self, handler: impl FnMut(#(#tys),*) + Send + 'static) {
            self.handlers.lock().unwrap().#field = Some(Box::new(handler));
        }
    }
}

fn generate_event_arm(interface: &Interface, opcode: u16, event: &MessageSpec) -> TokenStream {
    let field = ident(&local(&event.name));
    let opcode_lit = Literal::u16_suffixed(opcode);

    if event.args.is_empty() {
        return quote! {
            #opcode_lit => {
                parse_args(payload, &[], &mut fds)?;
                if let Some(handler) = self.handlers.lock().unwrap().#field.as_mut() {
                    handler();
                }
                Ok(())
            }
        };
    }

    let signature = event.args.iter().map(signature_token);
    let takes = event.args.iter().map(|_| quote!(args.next()));

    let mut patterns = Vec::new();
    let mut lifts = Vec::new();
    let mut values = Vec::new();
    for arg in &event.args {
        let arg_name = ident(&local(&arg.name));
        let (pattern, lift, value) = event_arg(interface, arg, &arg_name);
        patterns.push(pattern);
        lifts.extend(lift);
        values.push(value);
    }

    let needs_conn =
        event.args.iter().any(|arg| arg.kind == ArgKind::NewId && arg.interface.is_some());
    let conn_stmt = needs_conn.then(|| quote! { let conn = self.inner.connection()?; });

    quote! {
        #opcode_lit => {
            #conn_stmt
            let mut args = parse_args(payload, &[#(#signature),*], &mut fds)?.into_iter();
            if let (#(#patterns,)*) = (#(#takes,)*) {
                #(#lifts)*
                if let Some(handler) = self.handlers.lock().unwrap().#field.as_mut() {
                    handler(#(#values),*);
                }
                Ok(())
            } else {
                Err(crate::Error::BadMessage { interface: Self::NAME.to_owned(), opcode })
            }
        }
    }
}

// How one event argument is destructured, optionally lifted into a richer
// value ahead of the handler lock, and finally passed to the callback.
fn event_arg(
    interface: &Interface,
    arg: &Arg,
    name: &Ident,
) -> (TokenStream, Option<TokenStream>, TokenStream) {
    match arg.kind {
        ArgKind::Int => {
            let value = if let Some(spec) = &arg.enum_ {
                let ty = enum_type(interface, spec);
                quote!(WEnum::<#ty>::from(#name as u32))
            } else {
                quote!(#name)
            };
            (quote!(Some(Argument::Int(#name))), None, value)
        }
        ArgKind::Uint => {
            let value = if let Some(spec) = &arg.enum_ {
                let ty = enum_type(interface, spec);
                quote!(WEnum::<#ty>::from(#name))
            } else {
                quote!(#name)
            };
            (quote!(Some(Argument::Uint(#name))), None, value)
        }
        ArgKind::Fixed => (quote!(Some(Argument::Fixed(#name))), None, quote!(#name)),
        ArgKind::String => {
            if arg.allow_null {
                (
                    quote!(Some(Argument::Str(#name))),
                    None,
                    quote!(#name.map(|s| String::from_utf8_lossy(s.as_bytes()).into_owned())),
                )
            } else {
                (
                    quote!(Some(Argument::Str(Some(#name)))),
                    None,
                    quote!(String::from_utf8_lossy(#name.as_bytes()).into_owned()),
                )
            }
        }
        ArgKind::Object => {
            (quote!(Some(Argument::Object(#name))), None, quote!(ObjectId::new(#name)))
        }
        ArgKind::NewId => {
            if let Some(target) = &arg.interface {
                let ty = ident(&exported(target));
                let lift = quote! {
                    let #name = conn.insert_server_proxy::<#ty>(ObjectId::new(#name))?;
                };
                (quote!(Some(Argument::NewId(#name))), Some(lift), quote!(#name))
            } else {
                (quote!(Some(Argument::NewId(#name))), None, quote!(ObjectId::new(#name)))
            }
        }
        ArgKind::Array => (quote!(Some(Argument::Array(#name))), None, quote!(*#name)),
        ArgKind::Fd => (quote!(Some(Argument::Fd(#name))), None, quote!(#name)),
    }
}

fn callback_ty(interface: &Interface, arg: &Arg) -> TokenStream {
    if let Some(spec) = &arg.enum_ {
        let ty = enum_type(interface, spec);
        return quote!(WEnum<#ty>);
    }
    match arg.kind {
        ArgKind::Int => quote!(i32),
        ArgKind::Uint => quote!(u32),
        ArgKind::Fixed => quote!(Fixed),
        ArgKind::String => {
            if arg.allow_null {
                quote!(Option<String>)
            } else {
                quote!(String)
            }
        }
        ArgKind::Object => quote!(ObjectId),
        ArgKind::NewId => match &arg.interface {
            Some(target) => {
                let ty = ident(&exported(target));
                quote!(#ty)
            }
            None => quote!(ObjectId),
        },
        ArgKind::Array => quote!(Vec<u8>),
        ArgKind::Fd => quote!(OwnedFd),
    }
}

fn signature_token(arg: &Arg) -> TokenStream {
    let nullability = if arg.allow_null { quote!(AllowNull::Yes) } else { quote!(AllowNull::No) };
    match arg.kind {
        ArgKind::Int => quote!(ArgumentType::Int),
        ArgKind::Uint => quote!(ArgumentType::Uint),
        ArgKind::Fixed => quote!(ArgumentType::Fixed),
        ArgKind::String => quote!(ArgumentType::Str(#nullability)),
        ArgKind::Object => quote!(ArgumentType::Object(#nullability)),
        ArgKind::NewId => quote!(ArgumentType::NewId),
        ArgKind::Array => quote!(ArgumentType::Array),
        ArgKind::Fd => quote!(ArgumentType::Fd),
    }
}

/// Resolve an `enum` attribute, possibly dotted (`wl_output.transform`), to
/// the flat generated type name.
fn enum_type(interface: &Interface, spec: &str) -> Ident {
    match spec.split_once('.') {
        Some((iface, name)) => format_ident!("{}{}", exported(iface), exported(name)),
        None => format_ident!("{}{}", exported(&interface.name), exported(spec)),
    }
}

fn entry_ident(entry: &Entry) -> Ident {
    let prefix = if entry.name.chars().next().is_some_and(|c| c.is_numeric()) { "_" } else { "" };
    format_ident!("{}{}", prefix, exported(&entry.name))
}

fn entry_doc(entry: &Entry) -> Option<TokenStream> {
    entry
        .description
        .as_ref()
        .map(description_to_doc_attr)
        .or_else(|| entry.summary.as_ref().map(|s| to_doc_attr(&rewrite_docs(s))))
}

fn request_doc(request: &MessageSpec) -> Option<TokenStream> {
    let mut text = request
        .description
        .as_ref()
        .map(|desc| description_text(desc))
        .unwrap_or_default();
    if request.destructor {
        if !text.is_empty() {
            text.push_str("\n\n");
        }
        text.push_str("This is a destructor, once sent this object cannot be used any longer.");
    }
    if request.since > 1 {
        if !text.is_empty() {
            text.push_str("\n\n");
        }
        text.push_str(&format!(
            "Only available since version {} of the interface.",
            request.since
        ));
    }
    (!text.is_empty()).then(|| to_doc_attr(&text))
}

fn setter_doc(event: &MessageSpec) -> TokenStream {
    let mut text = format!("Set the handler for the `{}` event.", event.name);
    if let Some(desc) = &event.description {
        text.push_str("\n\n");
        text.push_str(&description_text(desc));
    }
    if event.since > 1 {
        text.push_str(&format!(
            "\n\nOnly available since version {} of the interface.",
            event.since
        ));
    }
    to_doc_attr(&text)
}

fn description_text((summary, body): &(String, String)) -> String {
    let summary = rewrite_docs(summary);
    let body = rewrite_docs(body);
    if body.is_empty() {
        summary
    } else if summary.is_empty() {
        body
    } else {
        format!("{summary}\n\n{body}")
    }
}

fn description_to_doc_attr(desc: &(String, String)) -> TokenStream {
    to_doc_attr(&description_text(desc))
}

fn to_doc_attr(text: &str) -> TokenStream {
    quote!(#[doc = #text])
}

fn ident(name: &str) -> Ident {
    Ident::new(name, Span::call_site())
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"<protocol name="small">
  <interface name="wl_probe" version="3">
    <description summary="a probe">Pokes things; see wl_registry.</description>
    <enum name="mood">
      <entry name="calm" value="0" summary="nothing happening"/>
      <entry name="stormy" value="0x2a"/>
    </enum>
    <enum name="caps" bitfield="true">
      <entry name="read" value="1"/>
      <entry name="write" value="2"/>
    </enum>
    <request name="poke">
      <arg name="data" type="fd"/>
      <arg name="label" type="string" allow-null="true"/>
    </request>
    <request name="spawn">
      <arg name="id" type="new_id" interface="wl_probe"/>
    </request>
    <event name="poked" since="2">
      <arg name="mood" type="uint" enum="mood"/>
      <arg name="data" type="fd"/>
    </event>
    <event name="idle"/>
  </interface>
</protocol>
"#;

    fn generated() -> String {
        let protocol = crate::parse::parse(FIXTURE.as_bytes());
        generate(&protocol).to_string().chars().filter(|c| !c.is_whitespace()).collect()
    }

    #[test]
    fn emits_proxy_type_and_metadata() {
        let code = generated();
        assert!(code.contains("pubstructProbe"));
        assert!(code.contains("constNAME:&'staticstr=\"wl_probe\""));
        assert!(code.contains("constVERSION:u32=3"));
        assert!(code.contains("structProbeHandlers"));
    }

    #[test]
    fn emits_fd_count_tables() {
        let code = generated();
        assert!(code.contains("staticWL_PROBE_FD_COUNTS:FdCounts"));
        // poke carries one fd, spawn none; poked carries one, idle none
        assert!(code.contains("requests:&[1,0]"));
        assert!(code.contains("events:&[1,0]"));
    }

    #[test]
    fn emits_requests_and_event_slots() {
        let code = generated();
        assert!(code.contains("pubfnpoke(&self,data:BorrowedFd<'_>,label:Option<&str>)"));
        assert!(code.contains("pubfnspawn(&self,)->Result<Probe,crate::Error>"));
        assert!(code.contains("pubfnon_poked(&self,handler:implFnMut(WEnum<ProbeMood>,OwnedFd)"));
        assert!(code.contains("pubfnon_idle(&self,handler:implFnMut()"));
    }

    #[test]
    fn emits_enums_with_both_radixes_and_bitfields() {
        let code = generated();
        assert!(code.contains("pubenumProbeMood"));
        assert!(code.contains("Stormy=42"));
        assert!(code.contains("bitflags::bitflags!"));
        assert!(code.contains("pubstructProbeCaps"));
    }

    #[test]
    fn registers_constructors() {
        let code = generated();
        assert!(code
            .contains("registry.insert((\"wl_probe\".to_owned(),3),crate::globals::constructor::<Probe>)"));
    }

    #[test]
    fn docs_are_rewritten() {
        let protocol = crate::parse::parse(FIXTURE.as_bytes());
        let code = generate(&protocol).to_string();
        // doc text lands in #[doc] string literals with identifiers rewritten
        assert!(code.contains("Pokes things; see Registry."));
    }
}
