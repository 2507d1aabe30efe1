// src/domain/document/front_matter.rs
//
// Order-preserving front-matter block. Parsed fields keep their original
// raw lines until mutated, so an unchanged document renders byte-for-byte
// identical to its input and a single-field update produces a minimal diff.
use crate::domain::errors::{DomainError, DomainResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Scalar(String),
    List(Vec<String>),
}

impl FieldValue {
    pub fn scalar(value: impl Into<String>) -> Self {
        Self::Scalar(value.into())
    }

    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

#[derive(Debug, Clone)]
struct FieldEntry {
    key: String,
    value: FieldValue,
    /// Original source lines, newline terminators included. Cleared on
    /// mutation; rendering falls back to `render_field`.
    raw: Option<String>,
}

#[derive(Debug, Clone)]
enum Entry {
    Field(FieldEntry),
    /// Blank or comment line kept verbatim.
    Verbatim(String),
}

#[derive(Debug, Clone, Default)]
pub struct FrontMatter {
    entries: Vec<Entry>,
}

impl FrontMatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.entries.iter().find_map(|entry| match entry {
            Entry::Field(field) if field.key == key => Some(&field.value),
            _ => None,
        })
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.get(key) {
            Some(FieldValue::Scalar(value)) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn get_list(&self, key: &str) -> Option<&[String]> {
        match self.get(key) {
            Some(FieldValue::List(items)) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Replace a field's value wholesale (lists included). Known keys keep
    /// their position; unknown keys are appended at the end of the block.
    pub fn set(&mut self, key: &str, value: FieldValue) {
        for entry in &mut self.entries {
            if let Entry::Field(field) = entry {
                if field.key == key {
                    field.value = value;
                    field.raw = None;
                    return;
                }
            }
        }
        self.entries.push(Entry::Field(FieldEntry {
            key: key.to_string(),
            value,
            raw: None,
        }));
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::Field(field) => Some(field.key.as_str()),
            Entry::Verbatim(_) => None,
        })
    }

    /// Ordered (key, value) pairs, ignoring verbatim lines. Used for
    /// structural comparison in tests and by the document round-trip law.
    pub fn fields(&self) -> Vec<(&str, &FieldValue)> {
        self.entries
            .iter()
            .filter_map(|entry| match entry {
                Entry::Field(field) => Some((field.key.as_str(), &field.value)),
                Entry::Verbatim(_) => None,
            })
            .collect()
    }

    pub(super) fn parse_block(block: &str) -> DomainResult<Self> {
        let mut entries = Vec::new();
        let mut lines = block.split_inclusive('\n').peekable();

        while let Some(line) = lines.next() {
            let content = line.strip_suffix('\n').unwrap_or(line);
            let trimmed = content.trim();

            if trimmed.is_empty() || trimmed.starts_with('#') {
                entries.push(Entry::Verbatim(line.to_string()));
                continue;
            }
            if content.starts_with(char::is_whitespace) || content.starts_with('-') {
                return Err(malformed(format!(
                    "unexpected continuation line '{content}'"
                )));
            }

            let Some(colon) = content.find(':') else {
                return Err(malformed(format!("field line '{content}' has no ':'")));
            };
            let key = &content[..colon];
            if key.is_empty() || key.trim() != key {
                return Err(malformed(format!("invalid field key '{key}'")));
            }

            let rest = &content[colon + 1..];
            let mut raw = line.to_string();

            let value = if rest.trim().is_empty() {
                // Bare `key:` header; any following `- item` lines form a list.
                let mut items = Vec::new();
                while let Some(&next_line) = lines.peek() {
                    let next_content = next_line.strip_suffix('\n').unwrap_or(next_line);
                    let item = next_content.trim_start();
                    if item != "-" && !item.starts_with("- ") {
                        break;
                    }
                    items.push(parse_list_item(item)?);
                    raw.push_str(next_line);
                    lines.next();
                }
                if items.is_empty() {
                    FieldValue::Scalar(String::new())
                } else {
                    FieldValue::List(items)
                }
            } else if let Some(text) = rest.strip_prefix(' ') {
                let text = text.trim();
                if text.len() >= 2 && text.starts_with('[') && text.ends_with(']') {
                    FieldValue::List(parse_inline_list(text)?)
                } else {
                    FieldValue::Scalar(parse_scalar(text)?)
                }
            } else {
                return Err(malformed(format!(
                    "missing space after ':' in line '{content}'"
                )));
            };

            entries.push(Entry::Field(FieldEntry {
                key: key.to_string(),
                value,
                raw: Some(raw),
            }));
        }

        Ok(Self { entries })
    }

    pub(super) fn render_into(&self, out: &mut String) {
        for entry in &self.entries {
            match entry {
                Entry::Verbatim(line) => out.push_str(line),
                Entry::Field(field) => match &field.raw {
                    Some(raw) => out.push_str(raw),
                    None => render_field(&field.key, &field.value, out),
                },
            }
        }
    }
}

fn malformed(detail: impl Into<String>) -> DomainError {
    DomainError::MalformedDocument(detail.into())
}

fn parse_list_item(item: &str) -> DomainResult<String> {
    if item == "-" {
        return Ok(String::new());
    }
    parse_scalar(item[2..].trim())
}

fn parse_scalar(text: &str) -> DomainResult<String> {
    if text.starts_with('"') {
        parse_quoted(text)
    } else {
        Ok(text.to_string())
    }
}

fn parse_quoted(text: &str) -> DomainResult<String> {
    let mut out = String::new();
    let mut chars = text[1..].chars();
    loop {
        match chars.next() {
            None => return Err(malformed(format!("unterminated quoted value {text}"))),
            Some('"') => {
                if chars.as_str().is_empty() {
                    return Ok(out);
                }
                return Err(malformed(format!(
                    "trailing content after closing quote in {text}"
                )));
            }
            Some('\\') => match chars.next() {
                Some('"') => out.push('"'),
                Some('\\') => out.push('\\'),
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                other => {
                    return Err(malformed(format!(
                        "unsupported escape '\\{}'",
                        other.map_or_else(String::new, String::from)
                    )));
                }
            },
            Some(c) => out.push(c),
        }
    }
}

fn parse_inline_list(text: &str) -> DomainResult<Vec<String>> {
    let inner = &text[1..text.len() - 1];
    let mut items = Vec::new();
    let mut chars = inner.chars().peekable();

    loop {
        while matches!(chars.peek(), Some(' ' | '\t')) {
            chars.next();
        }
        match chars.peek() {
            None => break,
            Some('"') => {
                chars.next();
                let mut item = String::new();
                loop {
                    match chars.next() {
                        None => {
                            return Err(malformed(format!("unterminated quoted item in {text}")));
                        }
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some('"') => item.push('"'),
                            Some('\\') => item.push('\\'),
                            _ => return Err(malformed(format!("unsupported escape in {text}"))),
                        },
                        Some(c) => item.push(c),
                    }
                }
                items.push(item);
                while matches!(chars.peek(), Some(' ' | '\t')) {
                    chars.next();
                }
                match chars.next() {
                    None => break,
                    Some(',') => {}
                    Some(c) => {
                        return Err(malformed(format!(
                            "unexpected '{c}' after quoted item in {text}"
                        )));
                    }
                }
            }
            Some(_) => {
                let mut item = String::new();
                while let Some(&c) = chars.peek() {
                    if c == ',' {
                        break;
                    }
                    item.push(c);
                    chars.next();
                }
                items.push(item.trim().to_string());
                if chars.next().is_none() {
                    break;
                }
            }
        }
    }

    Ok(items)
}

fn needs_quoting(value: &str) -> bool {
    value.is_empty()
        || value != value.trim()
        || value.contains('\n')
        || value.contains('\t')
        || value.contains(": ")
        || value.ends_with(':')
        || value.contains(" #")
        || value.starts_with(['#', '"', '\'', '-', '[', ']', '{', '}', '&', '*', '>', '|', '%'])
}

fn render_scalar(value: &str, out: &mut String) {
    if !needs_quoting(value) {
        out.push_str(value);
        return;
    }
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
}

fn render_field(key: &str, value: &FieldValue, out: &mut String) {
    match value {
        FieldValue::Scalar(v) => {
            out.push_str(key);
            out.push_str(": ");
            render_scalar(v, out);
            out.push('\n');
        }
        FieldValue::List(items) if items.is_empty() => {
            out.push_str(key);
            out.push_str(": []\n");
        }
        FieldValue::List(items) => {
            out.push_str(key);
            out.push_str(":\n");
            for item in items {
                out.push_str("  - ");
                render_scalar(item, out);
                out.push('\n');
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(block: &str) -> FrontMatter {
        FrontMatter::parse_block(block).unwrap()
    }

    fn render(fm: &FrontMatter) -> String {
        let mut out = String::new();
        fm.render_into(&mut out);
        out
    }

    #[test]
    fn unmutated_block_renders_byte_identical() {
        let block = "title: \"Hello: world\"\n# a comment\n\nplatforms:\n  - wechat\n  - zhihu\ndraft: true\n";
        let fm = parse(block);
        assert_eq!(render(&fm), block);
    }

    #[test]
    fn scalar_values_parse_with_quoting() {
        let fm = parse("title: \"a \\\"quoted\\\" value\"\nplain: just text\n");
        assert_eq!(fm.get_str("title"), Some("a \"quoted\" value"));
        assert_eq!(fm.get_str("plain"), Some("just text"));
    }

    #[test]
    fn block_and_inline_lists_parse_the_same() {
        let block = parse("platforms:\n  - wechat\n  - zhihu\n");
        let inline = parse("platforms: [wechat, zhihu]\n");
        assert_eq!(block.get_list("platforms"), inline.get_list("platforms"));
        let quoted = parse("platforms: [\"wechat\", \"zhihu\"]\n");
        assert_eq!(quoted.get_list("platforms"), block.get_list("platforms"));
    }

    #[test]
    fn empty_inline_list_parses_empty() {
        let fm = parse("platforms: []\n");
        assert_eq!(fm.get_list("platforms"), Some(&[][..]));
    }

    #[test]
    fn set_changes_only_the_targeted_field() {
        let block = "title: \"Hello: world\"\ndraft: true\nlastmod: 2024-01-01\n";
        let mut fm = parse(block);
        fm.set("draft", FieldValue::scalar("false"));
        let rendered = render(&fm);
        assert_eq!(
            rendered,
            "title: \"Hello: world\"\ndraft: false\nlastmod: 2024-01-01\n"
        );
    }

    #[test]
    fn set_preserves_key_order_and_appends_unknown_keys() {
        let mut fm = parse("a: 1\nb: 2\nc: 3\n");
        fm.set("b", FieldValue::scalar("20"));
        fm.set("d", FieldValue::scalar("4"));
        let keys: Vec<_> = fm.keys().collect();
        assert_eq!(keys, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn set_replaces_lists_wholesale() {
        let mut fm = parse("platforms:\n  - wechat\n  - zhihu\n");
        fm.set("platforms", FieldValue::list(["xiaohongshu"]));
        assert_eq!(fm.get_list("platforms"), Some(&["xiaohongshu".into()][..]));
        assert_eq!(render(&fm), "platforms:\n  - xiaohongshu\n");
    }

    #[test]
    fn colliding_values_are_quoted_and_round_trip() {
        let mut fm = FrontMatter::new();
        for value in [
            "has: colon",
            "#leading hash",
            "- leads like a list",
            " padded ",
            "",
            "quote\"inside",
            "multi\nline",
        ] {
            fm.set("field", FieldValue::scalar(value));
            let reparsed = parse(&render(&fm));
            assert_eq!(reparsed.get_str("field"), Some(value), "value {value:?}");
        }
    }

    #[test]
    fn bare_key_is_empty_scalar() {
        let fm = parse("digest:\ntitle: T\n");
        assert_eq!(fm.get_str("digest"), Some(""));
    }

    #[test]
    fn malformed_lines_are_rejected() {
        assert!(FrontMatter::parse_block("no colon here\n").is_err());
        assert!(FrontMatter::parse_block("  indented: value\n").is_err());
        assert!(FrontMatter::parse_block("- orphan item\n").is_err());
        assert!(FrontMatter::parse_block("key:value\n").is_err());
        assert!(FrontMatter::parse_block("title: \"unterminated\n").is_err());
        assert!(FrontMatter::parse_block(": empty key\n").is_err());
    }

    #[test]
    fn mutated_list_field_renders_block_style() {
        let mut fm = parse("platforms: [wechat]\n");
        fm.set("platforms", FieldValue::list(["wechat", "zhihu"]));
        assert_eq!(render(&fm), "platforms:\n  - wechat\n  - zhihu\n");
    }

    #[test]
    fn empty_list_renders_inline() {
        let mut fm = FrontMatter::new();
        fm.set("platforms", FieldValue::list(Vec::<String>::new()));
        assert_eq!(render(&fm), "platforms: []\n");
        assert_eq!(parse(&render(&fm)).get_list("platforms"), Some(&[][..]));
    }
}
