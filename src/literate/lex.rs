//! Line-oriented tokenizer for Literate notation.
//!
//! [`tokenize`] turns raw text into an ordered list of [`Block`]s: header
//! blocks carrying nested key/value [`Entry`]s annotated with their raw
//! indentation depth, and free-standing text-reference definitions. No
//! identifier resolution happens here — subjects, keys and reference values
//! stay verbatim, and each value's [`ValueKind`] is decided exactly once for
//! the resolution pass to consume exhaustively.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::OnyaError;

/// A top-level item of a Literate document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Header(HeaderBlock),
    /// `:name = """…"""` — may appear anywhere, interleaved with header
    /// blocks; definitions are document-global.
    TextRef { name: String, content: String },
}

/// A `#` heading and the entries nested under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderBlock {
    /// Count of heading marker characters.
    pub depth: usize,
    /// Raw subject reference, unresolved. `None` for a bare heading.
    pub subject: Option<String>,
    /// Raw bracket-delimited type annotation, unresolved.
    pub node_type: Option<String>,
    pub entries: Vec<Entry>,
    /// 1-indexed source line of the heading.
    pub line: usize,
}

/// One line inside a header block. Comments are kept as inert markers so
/// interleaved commentary never disturbs indentation bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Comment,
    Assertion(EntryData),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryData {
    /// Count of leading whitespace characters before the bullet.
    pub indent: usize,
    /// Raw key text, unresolved (explicit keys keep their `<…>` wrapper).
    pub key: String,
    pub form: EntryForm,
    /// `None` when no value text was supplied after the separator.
    pub value: Option<ValueSpec>,
    /// 1-indexed source line.
    pub line: usize,
}

/// Which separator introduced the entry's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryForm {
    /// `key : value`
    Property,
    /// `key -> value` (or `key → value`)
    Edge,
    /// `key :: refname`
    TextRef,
}

/// A raw value and its kind, decided at tokenization time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueSpec {
    pub verbatim: String,
    pub kind: ValueKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Explicit `<…>` reference (delimiters removed).
    Reference,
    /// Quoted literal (quotes removed, escapes processed).
    Text,
    /// Unquoted remainder of the line, trimmed.
    Unknown,
}

static COMMENT_PAT: Lazy<Regex> = Lazy::new(|| Regex::new(r"<!--.*?-->").expect("static pattern"));

static TRAILING_COMMENTS_PAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:\s*<!--.*?-->)+\s*$").expect("static pattern"));

static COMMENT_ONLY_PAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:<!--.*?-->\s*)+$").expect("static pattern"));

static TEXTREF_START_PAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^:([A-Za-z_][\-0-9A-Za-z_]*)\s*=\s*"""(.*)$"#).expect("static pattern")
});

fn is_comment_only(trimmed: &str) -> bool {
    COMMENT_ONLY_PAT.is_match(trimmed)
}

fn only_ws_or_comments(text: &str) -> bool {
    COMMENT_PAT.replace_all(text, "").trim().is_empty()
}

fn strip_trailing_comments(text: &str) -> &str {
    match TRAILING_COMMENTS_PAT.find(text) {
        Some(found) => &text[..found.start()],
        None => text,
    }
}

/// Tokenize a whole Literate document.
///
/// Fails with [`OnyaError::Syntax`] (carrying the 1-indexed line) on the
/// first line that matches no grammar rule at a required position. Blank
/// lines and comment-only lines are permitted anywhere and never terminate
/// a block.
pub fn tokenize(text: &str) -> Result<Vec<Block>, OnyaError> {
    let lines: Vec<&str> = text.lines().collect();
    let mut blocks = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let trimmed = lines[i].trim();
        if trimmed.is_empty() || is_comment_only(trimmed) {
            i += 1;
            continue;
        }

        if trimmed.starts_with('#') {
            let mut header = parse_header(lines[i], i + 1)?;
            i += 1;
            while i < lines.len() {
                let entry_raw = lines[i];
                let entry_trimmed = entry_raw.trim();
                if entry_trimmed.is_empty() {
                    i += 1;
                } else if is_comment_only(entry_trimmed) {
                    header.entries.push(Entry::Comment);
                    i += 1;
                } else if entry_trimmed.starts_with('#')
                    || TEXTREF_START_PAT.is_match(entry_trimmed)
                {
                    break;
                } else if entry_trimmed.starts_with('*') {
                    header
                        .entries
                        .push(Entry::Assertion(parse_entry(entry_raw, i + 1)?));
                    i += 1;
                } else {
                    return Err(OnyaError::syntax(
                        i + 1,
                        format!(
                            "expected '*' entry, heading or text reference, found: {entry_trimmed}"
                        ),
                    ));
                }
            }
            blocks.push(Block::Header(header));
            continue;
        }

        if let Some(caps) = TEXTREF_START_PAT.captures(trimmed) {
            let name = caps[1].to_string();
            let after = caps.get(2).expect("group in static pattern").as_str();
            i = parse_textref_content(&lines, i, after, &name, &mut blocks)?;
            continue;
        }

        return Err(OnyaError::syntax(
            i + 1,
            format!("expected heading or text reference definition, found: {trimmed}"),
        ));
    }

    tracing::debug!(blocks = blocks.len(), "tokenized literate document");
    Ok(blocks)
}

/// Consume the body of a `:name = """…"""` definition starting on line
/// index `start`, whose text after the opening quotes is `after`. Returns
/// the index of the first unconsumed line.
fn parse_textref_content(
    lines: &[&str],
    start: usize,
    after: &str,
    name: &str,
    blocks: &mut Vec<Block>,
) -> Result<usize, OnyaError> {
    if let Some(end) = after.find(r#"""""#) {
        if !after[end + 3..].trim().is_empty() {
            return Err(OnyaError::syntax(
                start + 1,
                "unexpected text after closing \"\"\"",
            ));
        }
        blocks.push(Block::TextRef {
            name: name.to_string(),
            content: after[..end].to_string(),
        });
        return Ok(start + 1);
    }

    let mut content_lines: Vec<&str> = Vec::new();
    if !after.is_empty() {
        content_lines.push(after);
    }
    let mut i = start + 1;
    while i < lines.len() {
        let line = lines[i];
        if let Some(end) = line.find(r#"""""#) {
            if !line[end + 3..].trim().is_empty() {
                return Err(OnyaError::syntax(
                    i + 1,
                    "unexpected text after closing \"\"\"",
                ));
            }
            if !line[..end].is_empty() {
                content_lines.push(&line[..end]);
            }
            blocks.push(Block::TextRef {
                name: name.to_string(),
                content: content_lines.join("\n"),
            });
            return Ok(i + 1);
        }
        content_lines.push(line);
        i += 1;
    }
    Err(OnyaError::syntax(
        start + 1,
        format!("unterminated text reference definition ':{name}'"),
    ))
}

fn parse_header(raw: &str, line_no: usize) -> Result<HeaderBlock, OnyaError> {
    let stripped = strip_trailing_comments(raw);
    let s = stripped.trim();
    let depth = s.chars().take_while(|c| *c == '#').count();
    let rest = s[depth..].trim();

    let (subject_part, node_type) = match rest.find('[') {
        Some(open) => {
            let close = rest
                .rfind(']')
                .filter(|close| *close > open)
                .ok_or_else(|| OnyaError::syntax(line_no, "unterminated '[' type annotation"))?;
            if !rest[close + 1..].trim().is_empty() {
                return Err(OnyaError::syntax(
                    line_no,
                    "unexpected text after type annotation",
                ));
            }
            let annotation = rest[open + 1..close].trim();
            (
                rest[..open].trim(),
                (!annotation.is_empty()).then(|| annotation.to_string()),
            )
        }
        None => (rest, None),
    };

    Ok(HeaderBlock {
        depth,
        subject: (!subject_part.is_empty()).then(|| subject_part.to_string()),
        node_type,
        entries: Vec::new(),
        line: line_no,
    })
}

fn parse_entry(raw: &str, line_no: usize) -> Result<EntryData, OnyaError> {
    let after_indent = raw.trim_start_matches([' ', '\t']);
    let indent = raw.len() - after_indent.len();

    let Some(after_bullet) = after_indent.strip_prefix('*') else {
        return Err(OnyaError::syntax(line_no, "expected '*' entry marker"));
    };
    if !after_bullet.starts_with([' ', '\t']) {
        return Err(OnyaError::syntax(
            line_no,
            "expected whitespace after '*' entry marker",
        ));
    }
    let body = after_bullet.trim_start_matches([' ', '\t']);

    let (key, form, value_text) = if body.starts_with('<') {
        // Explicit keys keep their delimiters; the resolver unwraps them.
        let close = body
            .find('>')
            .ok_or_else(|| OnyaError::syntax(line_no, "unterminated '<' reference in key"))?;
        let key = &body[..=close];
        let sep_rest = body[close + 1..].trim_start_matches([' ', '\t']);
        let (form, sep_len) = read_separator(sep_rest)
            .ok_or_else(|| OnyaError::syntax(line_no, "expected ':', '::' or '->' after key"))?;
        (key, form, &sep_rest[sep_len..])
    } else {
        // First separator occurrence splits key from value; bare-word and
        // unrestricted reference-shaped keys need no distinct handling here.
        let mut found = None;
        for (idx, _) in body.char_indices() {
            if let Some((form, sep_len)) = read_separator(&body[idx..]) {
                found = Some((idx, form, sep_len));
                break;
            }
        }
        let Some((idx, form, sep_len)) = found else {
            return Err(OnyaError::syntax(
                line_no,
                "expected ':', '::' or '->' after key",
            ));
        };
        let key = body[..idx].trim_end();
        if key.is_empty() {
            return Err(OnyaError::syntax(line_no, "empty entry key"));
        }
        (key, form, &body[idx + sep_len..])
    };

    let value = match form {
        EntryForm::TextRef => {
            let name = strip_trailing_comments(value_text).trim();
            (!name.is_empty()).then(|| ValueSpec {
                verbatim: name.to_string(),
                kind: ValueKind::Unknown,
            })
        }
        _ => parse_value(value_text),
    };

    Ok(EntryData {
        indent,
        key: key.to_string(),
        form,
        value,
        line: line_no,
    })
}

fn read_separator(rest: &str) -> Option<(EntryForm, usize)> {
    if rest.starts_with("::") {
        Some((EntryForm::TextRef, 2))
    } else if rest.starts_with("->") {
        Some((EntryForm::Edge, 2))
    } else if rest.starts_with('→') {
        Some((EntryForm::Edge, '→'.len_utf8()))
    } else if rest.starts_with(':') {
        Some((EntryForm::Property, 1))
    } else {
        None
    }
}

/// Value alternatives in priority order: explicit `<…>` reference, quoted
/// literal, unquoted remainder. A malformed explicit or quoted value falls
/// back to the unquoted interpretation rather than failing, and an empty
/// remainder is an absent value.
fn parse_value(text: &str) -> Option<ValueSpec> {
    let vt = text.trim_start_matches([' ', '\t']);

    // The comment guard keeps `<!-- … -->` from reading as an explicit
    // reference; the syntax check rejects `<…>` wrappers around text that
    // could never be a reference.
    if !vt.starts_with("<!--") {
        if let Some(inner) = vt.strip_prefix('<') {
            if let Some(close) = inner.find('>') {
                let candidate = &inner[..close];
                if crate::iri::matches_iri_ref_syntax(candidate)
                    && only_ws_or_comments(&inner[close + 1..])
                {
                    return Some(ValueSpec {
                        verbatim: candidate.to_string(),
                        kind: ValueKind::Reference,
                    });
                }
            }
        }
    }

    if vt.starts_with(['"', '\'']) {
        if let Some((unescaped, rest)) = scan_quoted(vt) {
            if only_ws_or_comments(rest) {
                return Some(ValueSpec {
                    verbatim: unescaped,
                    kind: ValueKind::Text,
                });
            }
        }
    }

    let raw = strip_trailing_comments(vt).trim();
    (!raw.is_empty()).then(|| ValueSpec {
        verbatim: raw.to_string(),
        kind: ValueKind::Unknown,
    })
}

/// Scan a single- or double-quoted literal with backslash escapes. Returns
/// the unescaped content and the text following the closing quote, or `None`
/// when unterminated.
fn scan_quoted(vt: &str) -> Option<(String, &str)> {
    let mut chars = vt.char_indices();
    let (_, quote) = chars.next()?;
    let mut out = String::new();
    let mut escaped = false;
    for (idx, c) in chars {
        if escaped {
            if c != quote && c != '\\' {
                out.push('\\');
            }
            out.push(c);
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == quote {
            return Some((out, &vt[idx + c.len_utf8()..]));
        } else {
            out.push(c);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(line: &str) -> EntryData {
        match tokenize(&format!("# subj\n{line}\n")).unwrap().remove(0) {
            Block::Header(h) => match h.entries.into_iter().next().unwrap() {
                Entry::Assertion(e) => e,
                Entry::Comment => panic!("expected assertion entry"),
            },
            Block::TextRef { .. } => panic!("expected header block"),
        }
    }

    #[test]
    fn property_entry_forms() {
        let e = entry("* a-b-c: <quick-brown-fox>");
        assert_eq!(e.key, "a-b-c");
        assert_eq!(e.form, EntryForm::Property);
        let v = e.value.unwrap();
        assert_eq!(v.kind, ValueKind::Reference);
        assert_eq!(v.verbatim, "quick-brown-fox");

        let e = entry("* a-b-c:  quick brown fox");
        let v = e.value.unwrap();
        assert_eq!(v.kind, ValueKind::Unknown);
        assert_eq!(v.verbatim, "quick brown fox");

        let e = entry("* a-b-c: \" quick brown fox\"");
        let v = e.value.unwrap();
        assert_eq!(v.kind, ValueKind::Text);
        assert_eq!(v.verbatim, " quick brown fox");
    }

    #[test]
    fn edge_and_textref_entry_forms() {
        let e = entry("  * author -> CAchebe");
        assert_eq!(e.indent, 2);
        assert_eq!(e.form, EntryForm::Edge);
        assert_eq!(e.value.unwrap().verbatim, "CAchebe");

        let e = entry("* author → CAchebe");
        assert_eq!(e.form, EntryForm::Edge);

        let e = entry("* summary :: blurb");
        assert_eq!(e.form, EntryForm::TextRef);
        assert_eq!(e.value.unwrap().verbatim, "blurb");
    }

    #[test]
    fn quoted_value_escapes() {
        let e = entry(r#"* quote: "she said \"hi\"""#);
        assert_eq!(e.value.unwrap().verbatim, r#"she said "hi""#);
    }

    #[test]
    fn trailing_comments_are_stripped_from_values() {
        let e = entry("* where: London  <!-- reify later -->");
        assert_eq!(e.value.unwrap().verbatim, "London");

        let e = entry("* img: <cover.jpg> <!-- note -->");
        let v = e.value.unwrap();
        assert_eq!(v.kind, ValueKind::Reference);
        assert_eq!(v.verbatim, "cover.jpg");
    }

    #[test]
    fn absent_values() {
        assert!(entry("* pending:").value.is_none());
        assert!(entry("* pending: <!-- nothing yet -->").value.is_none());
    }

    #[test]
    fn explicit_key_keeps_delimiters() {
        let e = entry("* <http://schema.org/name>: Chinua Achebe");
        assert_eq!(e.key, "<http://schema.org/name>");
        assert_eq!(e.value.unwrap().verbatim, "Chinua Achebe");
    }

    #[test]
    fn header_subject_and_type() {
        let blocks = tokenize("# TFA [Book]\n\n* name: Things Fall Apart\n").unwrap();
        let Block::Header(h) = &blocks[0] else {
            panic!("expected header block");
        };
        assert_eq!(h.depth, 1);
        assert_eq!(h.subject.as_deref(), Some("TFA"));
        assert_eq!(h.node_type.as_deref(), Some("Book"));
        assert_eq!(h.entries.len(), 1);
    }

    #[test]
    fn bare_header_and_depth() {
        let blocks = tokenize("## \n* a: b\n").unwrap();
        let Block::Header(h) = &blocks[0] else {
            panic!("expected header block");
        };
        assert_eq!(h.depth, 2);
        assert_eq!(h.subject, None);
    }

    #[test]
    fn comments_and_blank_lines_do_not_terminate_blocks() {
        let text = "\
# res1
<!-- COMMENT -->

* a-b-c: <quick-brown-fox>


* d-e-f: lazy dog

<!-- trailing commentary -->

# res2

* g: h
";
        let blocks = tokenize(text).unwrap();
        assert_eq!(blocks.len(), 2);
        let Block::Header(h) = &blocks[0] else {
            panic!("expected header block");
        };
        let assertions = h
            .entries
            .iter()
            .filter(|e| matches!(e, Entry::Assertion(_)))
            .count();
        assert_eq!(assertions, 2);
        let comments = h.entries.iter().filter(|e| **e == Entry::Comment).count();
        assert_eq!(comments, 2);
    }

    #[test]
    fn text_reference_definitions() {
        let text = "\
:blurb = \"\"\"Okonkwo is a wealthy and respected warrior.
A classic of world literature.\"\"\"

# TFA [Book]
* summary :: blurb
";
        let blocks = tokenize(text).unwrap();
        let Block::TextRef { name, content } = &blocks[0] else {
            panic!("expected text reference definition");
        };
        assert_eq!(name, "blurb");
        assert!(content.starts_with("Okonkwo"));
        assert!(content.contains('\n'));

        let inline = tokenize(":x = \"\"\"one line\"\"\"\n").unwrap();
        assert_eq!(
            inline[0],
            Block::TextRef {
                name: "x".to_string(),
                content: "one line".to_string()
            }
        );
    }

    #[test]
    fn syntax_errors_carry_line_numbers() {
        let err = tokenize("# ok\n* fine: 1\nstray text\n").unwrap_err();
        assert!(matches!(err, OnyaError::Syntax { line: 3, .. }));

        let err = tokenize("stray at top\n").unwrap_err();
        assert!(matches!(err, OnyaError::Syntax { line: 1, .. }));

        let err = tokenize("# ok\n* broken\n").unwrap_err();
        assert!(matches!(err, OnyaError::Syntax { line: 2, .. }));

        let err = tokenize(":name = \"\"\"never closed\n").unwrap_err();
        assert!(matches!(err, OnyaError::Syntax { line: 1, .. }));
    }
}
