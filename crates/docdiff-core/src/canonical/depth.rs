//! Nesting-depth pre-scan run before a document reaches a parser.
//!
//! The scan is lexical and never allocates per level. It may overestimate
//! the depth of malformed input but does not underestimate well-formed input.

use crate::Format;

/// Expansion levels roxmltree permits for nested entity references.
const ENTITY_EXPANSION_LEVELS: usize = 10;

/// Returns the deepest container or element nesting in `text`.
pub(crate) fn nesting_depth(text: &str, format: Format) -> usize {
    match format {
        Format::Json => json_depth(text.as_bytes()),
        Format::Xml => xml_depth(text.as_bytes()),
    }
}

fn json_depth(bytes: &[u8]) -> usize {
    let (mut depth, mut deepest) = (0usize, 0usize);
    let (mut in_string, mut escaped) = (false, false);
    for &byte in bytes {
        if in_string {
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == b'"' {
                in_string = false;
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' | b'[' => {
                depth += 1;
                deepest = deepest.max(depth);
            }
            b'}' | b']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    deepest
}

fn xml_depth(bytes: &[u8]) -> usize {
    let (deepest, literals) = element_depth(bytes);
    // Entity replacement text is parsed in place of each reference.
    let entity = literals.into_iter().map(|literal| element_depth(literal).0).max().unwrap_or(0);
    deepest + ENTITY_EXPANSION_LEVELS * entity
}

/// Scans element tags, returning the deepest nesting and the quoted
/// literals found inside `<!...>` declarations.
fn element_depth(bytes: &[u8]) -> (usize, Vec<&[u8]>) {
    let mut literals = Vec::new();
    let (mut depth, mut deepest) = (0usize, 0usize);
    let mut pos = 0;
    while let Some(offset) = bytes[pos..].iter().position(|&b| b == b'<') {
        let start = pos + offset;
        let rest = &bytes[start..];
        pos = if rest.starts_with(b"<!--") {
            skip_past(bytes, start + 4, b"-->")
        } else if rest.starts_with(b"<![CDATA[") {
            skip_past(bytes, start + 9, b"]]>")
        } else if rest.starts_with(b"<?") {
            skip_past(bytes, start + 2, b"?>")
        } else if rest.starts_with(b"<!") {
            skip_declaration(bytes, start + 2, &mut literals)
        } else if rest.starts_with(b"</") {
            depth = depth.saturating_sub(1);
            skip_past(bytes, start + 2, b">")
        } else {
            match tag_end(bytes, start + 1) {
                Some(end) => {
                    if bytes[end - 1] != b'/' {
                        depth += 1;
                        deepest = deepest.max(depth);
                    }
                    end + 1
                }
                None => bytes.len(),
            }
        };
    }
    (deepest, literals)
}

fn skip_past(bytes: &[u8], from: usize, terminator: &[u8]) -> usize {
    bytes[from..]
        .windows(terminator.len())
        .position(|window| window == terminator)
        .map_or(bytes.len(), |offset| from + offset + terminator.len())
}

/// Finds the `>` closing a start tag, ignoring any inside attribute values.
fn tag_end(bytes: &[u8], from: usize) -> Option<usize> {
    let mut quote = None;
    for (offset, &byte) in bytes[from..].iter().enumerate() {
        match quote {
            Some(open) if byte == open => quote = None,
            Some(_) => {}
            None if byte == b'"' || byte == b'\'' => quote = Some(byte),
            None if byte == b'>' => return Some(from + offset),
            None => {}
        }
    }
    None
}

fn skip_declaration<'a>(bytes: &'a [u8], from: usize, literals: &mut Vec<&'a [u8]>) -> usize {
    let mut brackets = 0usize;
    let mut pos = from;
    while pos < bytes.len() {
        match bytes[pos] {
            quote @ (b'"' | b'\'') => {
                let end = bytes[pos + 1..]
                    .iter()
                    .position(|&b| b == quote)
                    .map_or(bytes.len(), |offset| pos + 1 + offset);
                literals.push(&bytes[pos + 1..end]);
                pos = end + 1;
                continue;
            }
            b'<' if bytes[pos..].starts_with(b"<!--") => {
                pos = skip_past(bytes, pos + 4, b"-->");
                continue;
            }
            b'[' => brackets += 1,
            b']' => brackets = brackets.saturating_sub(1),
            b'>' if brackets == 0 => return pos + 1,
            _ => {}
        }
        pos += 1;
    }
    bytes.len()
}
