//! SQL identifier paths.
//!
//! An [`Ident`] is a dotted path such as `schema.table.column`. It is stored unquoted and
//! rendered by the dialect: PostgreSQL quotes every part inline (`"schema"."table"`,
//! escaping `"` as `""`), MySQL binds the dotted name to a `??` placeholder.
//!
//! Parsing honours double-quoted parts, so `public."odd.name"` is two parts.

use std::fmt;

/// A SQL identifier (column, table, or schema name), possibly qualified.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ident {
    parts: Vec<String>,
}

impl Ident {
    /// Parse a dotted identifier, honouring double-quoted parts.
    pub fn parse(s: &str) -> Self {
        let mut parts = Vec::new();
        let mut current = String::new();
        let mut chars = s.chars().peekable();
        let mut in_quotes = false;

        while let Some(c) = chars.next() {
            match c {
                '"' if in_quotes => {
                    // Escaped quote: ""
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        current.push('"');
                    } else {
                        in_quotes = false;
                    }
                }
                '"' => in_quotes = true,
                '.' if !in_quotes => parts.push(std::mem::take(&mut current)),
                c => current.push(c),
            }
        }
        parts.push(current);

        Self { parts }
    }

    /// A single-part identifier taken verbatim (dots are not separators).
    ///
    /// MySQL binds identifiers by their dotted form, so a dot inside a single part still
    /// splits there. Use it for names the crate produced itself, such as table names.
    pub fn single(name: impl Into<String>) -> Self {
        Self {
            parts: vec![name.into()],
        }
    }

    /// Build an identifier from already split parts.
    pub fn from_parts<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            parts: parts.into_iter().map(Into::into).collect(),
        }
    }

    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    /// The last part (the bare column or table name).
    pub fn name(&self) -> &str {
        self.parts.last().map_or("", String::as_str)
    }

    /// The unquoted dotted form, e.g. `db1.cars`.
    pub fn dotted(&self) -> String {
        self.parts.join(".")
    }

    /// Render with every part double-quoted.
    pub fn to_quoted(&self) -> String {
        let cap = self.parts.iter().map(|p| p.len() + 3).sum::<usize>();
        let mut out = String::with_capacity(cap);
        self.write_quoted(&mut out);
        out
    }

    pub(crate) fn write_quoted(&self, out: &mut String) {
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                out.push('.');
            }
            out.push('"');
            for ch in part.chars() {
                if ch == '"' {
                    out.push('"');
                    out.push('"');
                } else {
                    out.push(ch);
                }
            }
            out.push('"');
        }
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dotted())
    }
}

impl From<&str> for Ident {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl From<String> for Ident {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<&String> for Ident {
    fn from(s: &String) -> Self {
        Self::parse(s)
    }
}

impl From<&Ident> for Ident {
    fn from(i: &Ident) -> Self {
        i.clone()
    }
}
