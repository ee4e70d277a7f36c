//! Dialect-neutral SQL fragments.
//!
//! A [`Fragment`] is an ordered list of [`Piece`]s. Literal SQL, identifiers and bound
//! values are kept apart until the final render pass, where a [`Dialect`] turns each piece
//! into text and positional values. Because placeholders are numbered during that pass,
//! fragments can be nested and reordered freely without renumbering.

use crate::dialect::{Dialect, Renderer};
use crate::error::QbResult;
use crate::ident::Ident;
use crate::value::{Value, ValueFactory};

/// One unit of a fragment.
#[derive(Debug, Clone)]
pub enum Piece {
    /// Literal SQL text.
    Sql(String),
    /// The owning builder's table, resolved when the statement is built.
    Table,
    /// A quoted (PostgreSQL) or bound (MySQL) identifier.
    Ident(Ident),
    /// An identifier cast to text.
    IdentAsText(Ident),
    /// A timestamp column rendered as an ISO-8601 string.
    IdentAsTimestampString(Ident),
    /// A plain positional placeholder.
    Param(ValueFactory),
    /// A placeholder cast to text.
    ParamAsText(ValueFactory),
    /// A placeholder whose value is an ISO-8601 timestamp string.
    TimestampParam(ValueFactory),
    /// A placeholder whose value is stored as JSON.
    JsonParam(ValueFactory),
    /// `column = <timestamp placeholder>`
    TimestampAssignment { column: Ident, value: ValueFactory },
}

/// An ordered sequence of pieces.
#[derive(Debug, Clone, Default)]
pub struct Fragment {
    pieces: Vec<Piece>,
}

impl Fragment {
    /// Create an empty fragment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fragment holding literal SQL.
    pub fn sql(text: impl Into<String>) -> Self {
        Self {
            pieces: vec![Piece::Sql(text.into())],
        }
    }

    /// Create a fragment holding a single piece.
    pub fn piece(piece: Piece) -> Self {
        Self {
            pieces: vec![piece],
        }
    }

    /// Join fragments with a literal separator.
    pub fn join(fragments: impl IntoIterator<Item = Fragment>, separator: &str) -> Self {
        let mut out = Fragment::new();
        for (i, fragment) in fragments.into_iter().enumerate() {
            if i > 0 {
                out.push_sql(separator);
            }
            out.append(fragment);
        }
        out
    }

    /// Append literal SQL.
    pub fn push_sql(&mut self, sql: &str) -> &mut Self {
        if sql.is_empty() {
            return self;
        }

        match self.pieces.last_mut() {
            Some(Piece::Sql(last)) => last.push_str(sql),
            _ => self.pieces.push(Piece::Sql(sql.to_string())),
        }
        self
    }

    /// Append the deferred table reference.
    pub fn push_table(&mut self) -> &mut Self {
        self.pieces.push(Piece::Table);
        self
    }

    /// Append an identifier.
    pub fn push_ident(&mut self, ident: impl Into<Ident>) -> &mut Self {
        self.pieces.push(Piece::Ident(ident.into()));
        self
    }

    /// Append a placeholder and bind its value.
    pub fn push_bind(&mut self, value: impl Into<Value>) -> &mut Self {
        self.pieces.push(Piece::Param(ValueFactory::bound(value)));
        self
    }

    /// Append a placeholder bound to a value producer.
    pub fn push_factory(&mut self, factory: ValueFactory) -> &mut Self {
        self.pieces.push(Piece::Param(factory));
        self
    }

    /// Append an arbitrary piece.
    pub fn push_piece(&mut self, piece: Piece) -> &mut Self {
        match piece {
            Piece::Sql(text) => self.push_sql(&text),
            other => {
                self.pieces.push(other);
                self
            }
        }
    }

    /// Append another fragment, consuming it.
    pub fn append(&mut self, other: Fragment) -> &mut Self {
        for piece in other.pieces {
            self.push_piece(piece);
        }
        self
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Whether any piece refers to the deferred table.
    pub fn references_table(&self) -> bool {
        self.pieces.iter().any(|p| matches!(p, Piece::Table))
    }

    /// Replace every deferred table reference with `table`.
    pub fn resolve_table(self, table: &Ident) -> Self {
        let pieces = self
            .pieces
            .into_iter()
            .map(|p| match p {
                Piece::Table => Piece::Ident(table.clone()),
                other => other,
            })
            .collect();
        Self { pieces }
    }

    /// Render the SQL text and the ordered value producers.
    ///
    /// Fails if a deferred table reference is still unresolved.
    pub fn render(&self, dialect: &dyn Dialect) -> QbResult<(String, Vec<ValueFactory>)> {
        let mut renderer = Renderer::new(dialect);
        for piece in &self.pieces {
            renderer.render_piece(piece)?;
        }
        Ok(renderer.finish())
    }
}

impl From<&str> for Fragment {
    fn from(sql: &str) -> Self {
        Fragment::sql(sql)
    }
}
