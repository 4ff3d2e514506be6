//! Declarative description of every firelog table.
//!
//! [`SCHEMA`] is the single source of truth the reconciler works from. Table
//! order matters: a table is listed after every table it references.

/// Storage class of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    Integer,
    Text,
    Real,
}

impl SqlType {
    /// The SQL type name used in column definitions.
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Integer => "INTEGER",
            Self::Text => "TEXT",
            Self::Real => "REAL",
        }
    }
}

/// Default value of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnDefault {
    /// A constant SQL literal, written verbatim (e.g. `'general'`, `0`).
    Literal(&'static str),
    /// A SQL expression evaluated per insert; rendered in parentheses.
    Expression(&'static str),
}

/// A `REFERENCES table(column)` constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignKey {
    pub table: &'static str,
    pub column: &'static str,
}

/// One declared column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: &'static str,
    pub sql_type: SqlType,
    pub nullable: bool,
    pub primary_key: bool,
    pub unique: bool,
    pub default: Option<ColumnDefault>,
    pub references: Option<ForeignKey>,
}

impl ColumnDef {
    const fn base(name: &'static str, sql_type: SqlType, nullable: bool) -> Self {
        Self {
            name,
            sql_type,
            nullable,
            primary_key: false,
            unique: false,
            default: None,
            references: None,
        }
    }

    /// An auto-incrementing integer primary key.
    pub const fn id(name: &'static str) -> Self {
        Self {
            primary_key: true,
            ..Self::base(name, SqlType::Integer, false)
        }
    }

    /// A `NOT NULL` column.
    pub const fn required(name: &'static str, sql_type: SqlType) -> Self {
        Self::base(name, sql_type, false)
    }

    /// A nullable column.
    pub const fn optional(name: &'static str, sql_type: SqlType) -> Self {
        Self::base(name, sql_type, true)
    }

    pub const fn unique(self) -> Self {
        Self {
            unique: true,
            ..self
        }
    }

    pub const fn default_literal(self, literal: &'static str) -> Self {
        Self {
            default: Some(ColumnDefault::Literal(literal)),
            ..self
        }
    }

    pub const fn default_expr(self, expression: &'static str) -> Self {
        Self {
            default: Some(ColumnDefault::Expression(expression)),
            ..self
        }
    }

    pub const fn references(self, table: &'static str, column: &'static str) -> Self {
        Self {
            references: Some(ForeignKey { table, column }),
            ..self
        }
    }

    /// Renders the column definition used by `CREATE TABLE` and
    /// `ALTER TABLE .. ADD COLUMN`.
    pub fn definition_sql(&self) -> String {
        let mut sql = format!("{} {}", quote_ident(self.name), self.sql_type.as_sql());
        if self.primary_key {
            sql.push_str(" PRIMARY KEY AUTOINCREMENT");
        } else if !self.nullable {
            sql.push_str(" NOT NULL");
        }
        if self.unique {
            sql.push_str(" UNIQUE");
        }
        match self.default {
            Some(ColumnDefault::Literal(literal)) => {
                sql.push_str(" DEFAULT ");
                sql.push_str(literal);
            }
            Some(ColumnDefault::Expression(expression)) => {
                sql.push_str(&format!(" DEFAULT ({})", expression));
            }
            None => {}
        }
        if let Some(fk) = self.references {
            sql.push_str(&format!(
                " REFERENCES {}({})",
                quote_ident(fk.table),
                quote_ident(fk.column)
            ));
        }
        sql
    }

    /// The form of this column used when appending it to an existing table.
    ///
    /// SQLite rejects expression defaults in `ADD COLUMN`, so such a column is
    /// appended nullable and without its default. Rows that predate it read
    /// back `NULL`.
    pub fn appended(&self) -> Self {
        match self.default {
            Some(ColumnDefault::Expression(_)) => Self {
                nullable: true,
                default: None,
                ..*self
            },
            _ => *self,
        }
    }
}

/// One declared table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableDef {
    pub name: &'static str,
    pub columns: &'static [ColumnDef],
}

impl TableDef {
    /// Renders the `CREATE TABLE` statement with the full column set.
    pub fn create_sql(&self) -> String {
        let columns: Vec<String> = self
            .columns
            .iter()
            .map(|column| format!("    {}", column.definition_sql()))
            .collect();
        format!(
            "CREATE TABLE {} (\n{}\n)",
            quote_ident(self.name),
            columns.join(",\n")
        )
    }

    /// Renders the `ALTER TABLE .. ADD COLUMN` statement for `column`, using
    /// its [`ColumnDef::appended`] form.
    pub fn add_column_sql(&self, column: &ColumnDef) -> String {
        format!(
            "ALTER TABLE {} ADD COLUMN {}",
            quote_ident(self.name),
            column.appended().definition_sql()
        )
    }
}

pub(crate) fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Server-assigned insertion time, in the same text format the store writes.
const NOW_LOCAL: &str = "strftime('%Y-%m-%d %H:%M:%S', 'now', 'localtime')";

/// The firelog data model.
pub const SCHEMA: &[TableDef] = &[
    TableDef {
        name: "users",
        columns: &[
            ColumnDef::id("id"),
            ColumnDef::required("username", SqlType::Text).unique(),
            ColumnDef::required("password", SqlType::Text),
        ],
    },
    TableDef {
        name: "addresses",
        columns: &[
            ColumnDef::id("id"),
            ColumnDef::required("address", SqlType::Text),
            ColumnDef::optional("memo", SqlType::Text),
            ColumnDef::required("user_id", SqlType::Integer).references("users", "id"),
            ColumnDef::required("created_at", SqlType::Text).default_expr(NOW_LOCAL),
            ColumnDef::required("kind", SqlType::Text).default_literal("'general'"),
        ],
    },
    TableDef {
        name: "fire_addresses",
        columns: &[
            ColumnDef::id("id"),
            ColumnDef::required("address", SqlType::Text),
            ColumnDef::optional("memo", SqlType::Text),
            ColumnDef::optional("cause", SqlType::Text),
            ColumnDef::required("user_id", SqlType::Integer).references("users", "id"),
            ColumnDef::required("created_at", SqlType::Text).default_expr(NOW_LOCAL),
        ],
    },
    TableDef {
        name: "facilities",
        columns: &[
            ColumnDef::id("id"),
            ColumnDef::required("name", SqlType::Text),
            ColumnDef::optional("address", SqlType::Text),
            ColumnDef::optional("lat", SqlType::Real),
            ColumnDef::optional("lng", SqlType::Real),
            ColumnDef::optional("type", SqlType::Text),
        ],
    },
    TableDef {
        name: "fire_stations",
        columns: &[
            ColumnDef::id("id"),
            ColumnDef::required("name", SqlType::Text),
            ColumnDef::optional("address", SqlType::Text),
            ColumnDef::optional("type", SqlType::Text),
        ],
    },
];
