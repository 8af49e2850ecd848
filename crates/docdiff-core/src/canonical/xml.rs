use std::sync::LazyLock;

use regex::Regex;
use roxmltree::{Document, Node, NodeType, ParsingOptions};

use crate::{Format, ParseFailure};

static INTER_TAG_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r">\s+<").expect("inter-tag whitespace pattern"));

const INDENT: &str = "  ";

pub(super) fn canonicalize_xml(text: &str) -> Result<String, ParseFailure> {
    let options = ParsingOptions { allow_dtd: true, ..ParsingOptions::default() };
    let document = Document::parse_with_options(text, options).map_err(parse_failure)?;
    let serialized = serialize(&document);
    let collapsed = INTER_TAG_WHITESPACE.replace_all(&serialized, "><");
    Ok(indent(&collapsed))
}

fn parse_failure(err: roxmltree::Error) -> ParseFailure {
    let diagnostic = err.to_string();
    let message = diagnostic.lines().next().unwrap_or("malformed XML");
    let pos = err.pos();
    ParseFailure::new(Format::Xml, message).at(pos.row as usize, pos.col as usize)
}

fn serialize(document: &Document<'_>) -> String {
    let mut out = String::new();
    for child in document.root().children() {
        write_node(child, &mut out);
    }
    out
}

fn write_node(node: Node<'_, '_>, out: &mut String) {
    match node.node_type() {
        NodeType::Root => {
            for child in node.children() {
                write_node(child, out);
            }
        }
        NodeType::Element => write_element(node, out),
        NodeType::Text => escape_into(node.text().unwrap_or_default(), false, out),
        NodeType::Comment => {
            out.push_str("<!--");
            out.push_str(node.text().unwrap_or_default());
            out.push_str("-->");
        }
        NodeType::PI => {
            if let Some(pi) = node.pi() {
                out.push_str("<?");
                out.push_str(pi.target);
                if let Some(value) = pi.value {
                    out.push(' ');
                    out.push_str(value);
                }
                out.push_str("?>");
            }
        }
    }
}

fn write_element(node: Node<'_, '_>, out: &mut String) {
    let tag = node.tag_name();
    let name = qualified_name(node, tag.namespace(), tag.name());
    out.push('<');
    out.push_str(&name);

    for (prefix, uri) in declared_namespaces(node) {
        match prefix {
            Some(prefix) => {
                out.push_str(" xmlns:");
                out.push_str(&prefix);
            }
            None => out.push_str(" xmlns"),
        }
        out.push_str("=\"");
        escape_into(&uri, true, out);
        out.push('"');
    }

    for attribute in node.attributes() {
        out.push(' ');
        out.push_str(&qualified_name(node, attribute.namespace(), attribute.name()));
        out.push_str("=\"");
        escape_into(attribute.value(), true, out);
        out.push('"');
    }

    if node.has_children() {
        out.push('>');
        for child in node.children() {
            write_node(child, out);
        }
        out.push_str("</");
        out.push_str(&name);
        out.push('>');
    } else {
        out.push_str("/>");
    }
}

fn qualified_name(node: Node<'_, '_>, namespace: Option<&str>, local: &str) -> String {
    match namespace.and_then(|uri| node.lookup_prefix(uri)) {
        Some(prefix) if !prefix.is_empty() => format!("{prefix}:{local}"),
        _ => local.to_string(),
    }
}

/// Namespace bindings that are in scope on `node` but not on its parent.
fn declared_namespaces(node: Node<'_, '_>) -> Vec<(Option<String>, String)> {
    let bindings = |n: Node<'_, '_>| -> Vec<(Option<String>, String)> {
        n.namespaces().map(|ns| (ns.name().map(str::to_string), ns.uri().to_string())).collect()
    };
    let inherited = node.parent_element().map(bindings).unwrap_or_default();
    bindings(node)
        .into_iter()
        .filter(|binding| binding.0.as_deref() != Some("xml") && !inherited.contains(binding))
        .collect()
}

fn escape_into(text: &str, attribute: bool, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            '\n' if attribute => out.push_str("&#10;"),
            '\t' if attribute => out.push_str("&#9;"),
            '\r' => out.push_str("&#13;"),
            _ => out.push(ch),
        }
    }
}

fn indent(xml: &str) -> String {
    let mut out = String::with_capacity(xml.len() * 2);
    let mut depth = 0usize;
    for (index, fragment) in split_at_tag_boundaries(xml).into_iter().enumerate() {
        if fragment.starts_with("</") {
            depth = depth.saturating_sub(1);
        }
        if index > 0 {
            out.push('\n');
        }
        out.push_str(&INDENT.repeat(depth));
        out.push_str(fragment);
        if opens_element(fragment) {
            depth += 1;
        }
    }
    out
}

/// Splits between every `>` and the `<` immediately after it.
fn split_at_tag_boundaries(xml: &str) -> Vec<&str> {
    let mut fragments = Vec::new();
    let mut start = 0;
    for (index, _) in xml.match_indices("><") {
        fragments.push(&xml[start..=index]);
        start = index + 1;
    }
    fragments.push(&xml[start..]);
    fragments
}

fn opens_element(fragment: &str) -> bool {
    fragment.starts_with('<')
        && !fragment.starts_with("</")
        && !fragment.starts_with("<!")
        && !fragment.starts_with("<?")
        && !fragment.ends_with("/>")
        // `<a>text</a>` opens and closes on one line.
        && !fragment.contains("</")
}
