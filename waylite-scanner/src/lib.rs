//! Wayland protocol scanner for waylite
//!
//! Parses the XML protocol description and emits the typed proxy layer
//! compiled into the `waylite` crate: one proxy type per interface, one
//! request method per request, one settable callback slot per event, and the
//! per-interface fd-count tables the dispatch loop relies on.
//!
//! The scanner is an offline, one-shot tool. The usual workflow is the small
//! CLI:
//!
//! ```sh
//! cargo run -p waylite-scanner -- waylite/protocol/wayland.xml waylite/src/protocol.rs
//! ```
//!
//! and committing the formatted output.

mod client_gen;
pub mod naming;
mod parse;
pub mod protocol;

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

pub use client_gen::generate;
pub use parse::parse;

/// Generate the client code for a protocol file and write it to `target`.
///
/// The output is a self-contained module meant to be included in the
/// `waylite` crate; it is passed through `rustfmt` when available.
pub fn generate_to_file(protocol_path: impl AsRef<Path>, target: impl AsRef<Path>) {
    let file = File::open(&protocol_path)
        .unwrap_or_else(|e| panic!("cannot open {}: {e}", protocol_path.as_ref().display()));
    let protocol = parse(file);

    let mut code = String::new();
    code.push_str(&format!(
        "//! Generated bindings for the `{}` protocol.\n//!\n",
        protocol.name
    ));
    code.push_str("//! Produced by waylite-scanner; do not edit by hand. Regenerate with:\n");
    code.push_str("//!\n//! ```sh\n//! cargo run -p waylite-scanner -- <protocol.xml> <this file>\n//! ```\n\n");
    code.push_str(
        "#![allow(unused_imports, unused_variables, unused_mut, missing_docs, non_upper_case_globals)]\n",
    );
    code.push_str("#![allow(clippy::too_many_arguments, clippy::match_single_binding)]\n\n");
    code.push_str(&generate(&protocol).to_string());
    code.push('\n');

    let formatted = format_rust_code(&code);
    let mut out = File::create(&target)
        .unwrap_or_else(|e| panic!("cannot create {}: {e}", target.as_ref().display()));
    out.write_all(formatted.as_bytes()).expect("write failed");
}

/// Run the given code through `rustfmt`, falling back to the unformatted text
/// if the tool is unavailable.
fn format_rust_code(code: &str) -> String {
    let child = Command::new("rustfmt")
        .args(["--edition", "2021"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn();
    let Ok(mut child) = child else {
        eprintln!("rustfmt not found, emitting unformatted code");
        return code.to_owned();
    };
    child.stdin.take().unwrap().write_all(code.as_bytes()).expect("feeding rustfmt failed");
    let output = child.wait_with_output().expect("rustfmt did not run");
    if output.status.success() {
        String::from_utf8(output.stdout).expect("rustfmt produced invalid UTF-8")
    } else {
        eprintln!("rustfmt rejected the generated code, emitting it unformatted");
        code.to_owned()
    }
}
