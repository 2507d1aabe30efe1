pub mod front_matter;

pub use front_matter::{FieldValue, FrontMatter};

use crate::domain::errors::{DomainError, DomainResult};

/// A front-matter document: a `---` delimited metadata block followed by a
/// free-text body. The raw remainder after the closing delimiter is kept
/// verbatim so rendering an unmutated document reproduces its exact bytes,
/// trailing newline included or not.
#[derive(Debug, Clone)]
pub struct Document {
    front_matter: FrontMatter,
    body_raw: String,
}

impl Document {
    pub fn new(front_matter: FrontMatter, body: impl Into<String>) -> Self {
        Self {
            front_matter,
            body_raw: format!("\n{}", body.into()),
        }
    }

    pub fn parse(raw: &str) -> DomainResult<Self> {
        let Some(after_open) = raw.strip_prefix("---\n") else {
            return Err(DomainError::MalformedDocument(
                "missing opening '---' delimiter".into(),
            ));
        };

        // Locate the closing delimiter at the start of a line.
        let mut at = 0usize;
        let close = loop {
            let rest = &after_open[at..];
            if rest.starts_with("---") {
                let after = &rest[3..];
                if after.is_empty() || after.starts_with('\n') {
                    break at;
                }
            }
            match rest.find('\n') {
                Some(i) => at += i + 1,
                None => {
                    return Err(DomainError::MalformedDocument(
                        "missing closing '---' delimiter".into(),
                    ));
                }
            }
        };

        let front_matter = FrontMatter::parse_block(&after_open[..close])?;
        Ok(Self {
            front_matter,
            body_raw: after_open[close + 3..].to_string(),
        })
    }

    pub fn render(&self) -> String {
        let mut out = String::from("---\n");
        self.front_matter.render_into(&mut out);
        out.push_str("---");
        out.push_str(&self.body_raw);
        out
    }

    pub fn front_matter(&self) -> &FrontMatter {
        &self.front_matter
    }

    pub fn front_matter_mut(&mut self) -> &mut FrontMatter {
        &mut self.front_matter
    }

    /// Body content after the closing delimiter line.
    pub fn body(&self) -> &str {
        self.body_raw.strip_prefix('\n').unwrap_or(&self.body_raw)
    }
}
