//! Lexical scanning primitives shared by every extractor.
//!
//! None of these understand the full language grammar. They count
//! delimiters, skip quoted text where it matters, and test identifier
//! boundaries, which is enough to carve declarations out of source text.

/// True for characters that can appear inside a JS/TS identifier.
pub fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Balanced-delimiter scan.
///
/// `open_pos` must point at `open`. Returns the text strictly between it and
/// its matching `close`, or `None` if the text ends first. When scanning
/// angle brackets the `>` of an arrow (`=>`) is not a closer.
pub fn balanced_body(text: &str, open_pos: usize, open: u8, close: u8) -> Option<&str> {
    let end = matching_close(text, open_pos, open, close)?;
    Some(&text[open_pos + 1..end])
}

/// Byte offset of the delimiter that closes the one at `open_pos`.
pub fn matching_close(text: &str, open_pos: usize, open: u8, close: u8) -> Option<usize> {
    let bytes = text.as_bytes();
    if bytes.get(open_pos) != Some(&open) {
        return None;
    }
    let mut depth = 0usize;
    for (i, &b) in bytes.iter().enumerate().skip(open_pos) {
        if b == open {
            depth += 1;
        } else if b == close {
            if close == b'>' && i > 0 && bytes[i - 1] == b'=' {
                continue;
            }
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

/// Body window of at most `max_chars` characters starting after `open_pos`.
///
/// Uses the balanced scan; an unterminated body runs to the end of the text.
pub fn bounded_body(text: &str, open_pos: usize, open: u8, close: u8, max_chars: usize) -> &str {
    let body = balanced_body(text, open_pos, open, close)
        .unwrap_or_else(|| text.get(open_pos + 1..).unwrap_or(""));
    truncate_chars(body, max_chars)
}

/// Prefix of `s` holding at most `max_chars` characters.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Remove `/* */` and `//` comments, leaving string literals intact.
///
/// Block comments become a single space; line comments keep their newline.
pub fn strip_comments(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    let mut last = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                out.push_str(&text[last..i]);
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
                last = i;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                out.push_str(&text[last..i]);
                i += 2;
                while i < bytes.len() && !(bytes[i] == b'*' && bytes.get(i + 1) == Some(&b'/')) {
                    i += 1;
                }
                i = (i + 2).min(bytes.len());
                out.push(' ');
                last = i;
            }
            q @ (b'\'' | b'"' | b'`') => {
                i = skip_string(bytes, i, q);
            }
            _ => i += 1,
        }
    }
    out.push_str(&text[last..]);
    out
}

/// Index just past the string literal opened by `quote` at `start`.
fn skip_string(bytes: &[u8], start: usize, quote: u8) -> usize {
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'\n' if quote != b'`' => return i,
            b if b == quote => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len().min(i)
}

/// True if `name` occurs in `haystack` as a whole identifier, i.e. not as a
/// substring of a longer identifier.
pub fn contains_identifier(haystack: &str, name: &str) -> bool {
    if name.is_empty() {
        return false;
    }
    haystack.match_indices(name).any(|(idx, _)| {
        let before = haystack[..idx].chars().next_back();
        let after = haystack[idx + name.len()..].chars().next();
        !before.is_some_and(is_ident_char) && !after.is_some_and(is_ident_char)
    })
}

/// True if `name` is invoked as a plain call: `name(` or `name<T>(`.
/// Member calls (`x.name(`) and longer identifiers do not count.
pub fn calls_identifier(haystack: &str, name: &str) -> bool {
    if name.is_empty() {
        return false;
    }
    haystack.match_indices(name).any(|(idx, _)| {
        let before = haystack[..idx].chars().next_back();
        if before.is_some_and(|c| is_ident_char(c) || c == '.') {
            return false;
        }
        let rest = &haystack[idx + name.len()..];
        if rest.chars().next().is_some_and(is_ident_char) {
            return false;
        }
        let mut rest = rest.trim_start();
        if rest.starts_with('<') {
            let Some(close) = matching_close(rest, 0, b'<', b'>') else {
                return false;
            };
            rest = rest[close + 1..].trim_start();
        }
        rest.starts_with('(')
    })
}

/// Skip a type section (generic parameters, `extends` clauses, a return
/// annotation) starting at `start` and return the offset where what
/// follows it begins: the `{` of a body, or the `=` of a top-level `=>`.
///
/// Brackets are skipped as balanced sections. A `{` where a type is
/// expected is an object type and skipped too; `type_expected` says
/// whether that holds at `start`. A top-level `;` ends the search.
pub fn after_type_section(text: &str, start: usize, type_expected: bool) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut expect_type = type_expected;
    let mut i = start;
    while i < bytes.len() {
        match bytes[i] {
            b'=' if bytes.get(i + 1) == Some(&b'>') => {
                if depth == 0 {
                    return Some(i);
                }
                expect_type = true;
                i += 1;
            }
            b'(' | b'[' | b'<' => {
                depth += 1;
                expect_type = true;
            }
            b')' | b']' | b'>' => {
                depth = depth.saturating_sub(1);
                expect_type = false;
            }
            b'{' if depth == 0 && !expect_type => return Some(i),
            b'{' => {
                i = matching_close(text, i, b'{', b'}')?;
                expect_type = false;
            }
            b';' if depth == 0 => return None,
            b'|' | b'&' | b',' | b':' | b'=' | b'?' => expect_type = true,
            b'\'' | b'"' | b'`' => {
                i = skip_string(bytes, i, bytes[i]);
                expect_type = false;
                continue;
            }
            b if b.is_ascii_whitespace() => {}
            _ => expect_type = false,
        }
        i += 1;
    }
    None
}

/// Raw contents of the template literal whose opening backtick is at
/// `open_pos`. `${ ... }` interpolations are skipped as balanced braces,
/// so nested templates inside them do not end the literal.
pub fn template_literal(text: &str, open_pos: usize) -> Option<&str> {
    let bytes = text.as_bytes();
    if bytes.get(open_pos) != Some(&b'`') {
        return None;
    }
    let mut i = open_pos + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'`' => return Some(&text[open_pos + 1..i]),
            b'$' if bytes.get(i + 1) == Some(&b'{') => {
                i = matching_close(text, i + 1, b'{', b'}')? + 1;
            }
            _ => i += 1,
        }
    }
    None
}

/// Turn a raw template literal into a route template.
///
/// Interpolations that build a query string are dropped, everything from
/// the first literal `?` on is cut, and remaining `${expr}` become `{expr}`.
pub fn normalize_template(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut out = String::with_capacity(raw.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'$' && bytes.get(i + 1) == Some(&b'{') {
            let Some(end) = matching_close(raw, i + 1, b'{', b'}') else {
                break;
            };
            let expr = raw[i + 2..end].trim();
            if !is_query_interpolation(expr) {
                out.push('{');
                out.push_str(expr);
                out.push('}');
            }
            i = end + 1;
            continue;
        }
        if bytes[i] == b'?' {
            break;
        }
        let ch = raw[i..].chars().next().unwrap_or_default();
        out.push(ch);
        i += ch.len_utf8().max(1);
    }
    out
}

fn is_query_interpolation(expr: &str) -> bool {
    let lower = expr.to_lowercase();
    expr.contains('?')
        || lower.contains("query")
        || lower.contains("params")
        || lower.contains("search")
}

/// Copy of `text` with the contents of `'...'` and `"..."` literals removed.
///
/// Template literals are kept since their interpolations hold code.
pub fn blank_string_literals(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    let mut last = 0;
    while i < bytes.len() {
        match bytes[i] {
            q @ (b'\'' | b'"') => {
                let end = skip_string(bytes, i, q);
                out.push_str(&text[last..=i]);
                if end > i + 1 && bytes.get(end - 1) == Some(&q) {
                    out.push(q as char);
                }
                last = end;
                i = end;
            }
            b'`' => i = skip_string(bytes, i, b'`'),
            _ => i += 1,
        }
    }
    out.push_str(&text[last..]);
    out
}

/// Quoted string literals (single, double or backtick) in `text`, in order.
pub fn string_literals(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut found = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            q @ (b'\'' | b'"' | b'`') => {
                let end = skip_string(bytes, i, q);
                if end > i + 1 && bytes.get(end - 1) == Some(&q) {
                    found.push(&text[i + 1..end - 1]);
                }
                i = end;
            }
            _ => i += 1,
        }
    }
    found
}
