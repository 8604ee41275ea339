//! Identifier mapping from protocol names to Rust names
//!
//! Protocol identifiers are lowercase snake_case with a `wl_` namespace
//! prefix. Exported (type-level) names drop the prefix and title-case each
//! component; value-level names keep the snake_case spelling, with reserved
//! words escaped by a trailing underscore.

/// Split an identifier on underscores, dropping a leading `wl` component.
fn parts(name: &str) -> impl Iterator<Item = &str> {
    let mut it = name.split('_').peekable();
    if it.peek() == Some(&"wl") {
        it.next();
    }
    it
}

/// Map an identifier to an exported (type-level) Rust name.
///
/// `wl_shm_pool` becomes `ShmPool`.
pub fn exported(name: &str) -> String {
    parts(name)
        .flat_map(|part| {
            let mut chars = part.chars();
            let first = chars.next().into_iter().map(|c| c.to_ascii_uppercase());
            first.chain(chars)
        })
        .collect()
}

/// Map an identifier to a value-level Rust name.
///
/// Protocol names are already snake_case; only reserved words need escaping,
/// with a trailing underscore.
pub fn local(name: &str) -> String {
    if is_keyword(name) {
        format!("{name}_")
    } else {
        name.to_owned()
    }
}

pub fn is_keyword(txt: &str) -> bool {
    matches!(
        txt,
        "abstract"
            | "as"
            | "async"
            | "await"
            | "become"
            | "box"
            | "break"
            | "const"
            | "continue"
            | "crate"
            | "do"
            | "dyn"
            | "else"
            | "enum"
            | "extern"
            | "false"
            | "final"
            | "fn"
            | "for"
            | "if"
            | "impl"
            | "in"
            | "let"
            | "loop"
            | "macro"
            | "match"
            | "mod"
            | "move"
            | "mut"
            | "override"
            | "priv"
            | "pub"
            | "ref"
            | "return"
            | "self"
            | "static"
            | "struct"
            | "super"
            | "trait"
            | "true"
            | "try"
            | "type"
            | "typeof"
            | "unsafe"
            | "unsized"
            | "use"
            | "virtual"
            | "where"
            | "while"
            | "yield"
    )
}

/// Rewrite a documentation block for emission as a doc comment.
///
/// Trims every line, strips surrounding blank lines, replaces `wl_foo_bar`
/// identifiers with their exported spelling (header-file references ending in
/// `.h` are left alone) and `NULL` with `None`.
pub fn rewrite_docs(text: &str) -> String {
    let trimmed = text.lines().map(str::trim).collect::<Vec<_>>().join("\n");
    trimmed
        .trim()
        .lines()
        .map(|line| line.split(' ').map(rewrite_word).collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join("\n")
}

fn rewrite_word(word: &str) -> String {
    if word.contains(".h") {
        return word.to_owned();
    }
    let core = word.trim_matches(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '.'));
    let core = core.trim_matches('.');
    if core.is_empty() {
        return word.to_owned();
    }
    if core == "NULL" {
        return word.replacen("NULL", "None", 1);
    }
    // identifiers may be dotted message references (`wl_surface.attach`)
    let rewritten = core
        .split('.')
        .map(|seg| {
            if seg.starts_with("wl_")
                && seg.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
            {
                exported(seg)
            } else {
                seg.to_owned()
            }
        })
        .collect::<Vec<_>>()
        .join(".");
    if rewritten != core {
        word.replacen(core, &rewritten, 1)
    } else {
        word.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exported_drops_prefix_and_camels() {
        assert_eq!(exported("wl_display"), "Display");
        assert_eq!(exported("wl_shm_pool"), "ShmPool");
        assert_eq!(exported("delete_id"), "DeleteId");
        assert_eq!(exported("xrgb8888"), "Xrgb8888");
    }

    #[test]
    fn local_escapes_keywords() {
        assert_eq!(local("surface"), "surface");
        assert_eq!(local("move"), "move_");
        assert_eq!(local("type"), "type_");
    }

    #[test]
    fn docs_rewrite_identifiers() {
        assert_eq!(
            rewrite_docs("Clients bind wl_shm via the registry."),
            "Clients bind Shm via the registry."
        );
        assert_eq!(rewrite_docs("see wl_surface.attach, or wl_buffer."), "see Surface.attach, or Buffer.");
        assert_eq!(rewrite_docs("pass NULL to unset."), "pass None to unset.");
        assert_eq!(rewrite_docs("declared in wayland-client.h here"), "declared in wayland-client.h here");
    }

    #[test]
    fn docs_strip_blank_edges() {
        assert_eq!(rewrite_docs("\n\n  first line\n  second line\n\n"), "first line\nsecond line");
    }
}
