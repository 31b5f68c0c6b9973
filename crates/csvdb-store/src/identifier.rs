//! Identifier validation and quoting.
//!
//! Table and column names come straight from user-supplied descriptors and
//! cannot be bound as parameters, so every name that reaches SQL text goes
//! through [`quote_identifier`] or [`quote_table_name`]. Declared column
//! types are spliced in unquoted and are checked by
//! [`validate_type_declaration`] instead.

use crate::error::{Result, StoreError};

/// Maximum identifier length in bytes.
const MAX_IDENTIFIER_LENGTH: usize = 128;

/// Prefix SQLite reserves for internal tables.
const RESERVED_TABLE_PREFIX: &str = "sqlite_";

/// Names SQLite resolves to the implicit row id unless a column claims them.
const ROWID_ALIASES: [&str; 3] = ["rowid", "_rowid_", "oid"];

/// Validate a column or table identifier.
///
/// Rejects:
/// - Empty identifiers
/// - Identifiers containing null bytes
/// - Identifiers exceeding maximum length
pub fn validate_identifier(name: &str) -> Result<()> {
    let reason = if name.is_empty() {
        "identifier cannot be empty"
    } else if name.contains('\0') {
        "identifier contains a null byte"
    } else if name.len() > MAX_IDENTIFIER_LENGTH {
        "identifier exceeds 128 bytes"
    } else {
        return Ok(());
    };

    Err(StoreError::InvalidIdentifier {
        name: name.to_string(),
        reason,
    })
}

/// Validate a table name: identifier rules plus no `sqlite_` prefix.
pub fn validate_table_name(name: &str) -> Result<()> {
    validate_identifier(name)?;
    if name
        .get(..RESERVED_TABLE_PREFIX.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(RESERVED_TABLE_PREFIX))
    {
        return Err(StoreError::InvalidIdentifier {
            name: name.to_string(),
            reason: "names starting with sqlite_ are reserved",
        });
    }
    Ok(())
}

/// First row id alias that no column of the table shadows.
pub fn rowid_alias<S: AsRef<str>>(columns: &[S]) -> Option<&'static str> {
    ROWID_ALIASES.into_iter().find(|alias| {
        !columns
            .iter()
            .any(|column| column.as_ref().eq_ignore_ascii_case(alias))
    })
}

/// Rejects a column list that shadows every row id alias.
///
/// Pages are ordered by the row id, so at least one alias must stay free.
pub fn validate_rowid_access<S: AsRef<str>>(table: &str, columns: &[S]) -> Result<()> {
    if rowid_alias(columns).is_some() {
        return Ok(());
    }
    Err(StoreError::InvalidIdentifier {
        name: table.to_string(),
        reason: "columns cannot use every row id alias (rowid, _rowid_, oid)",
    })
}

/// Quote an identifier with double quotes, doubling embedded quotes.
///
/// ```ignore
/// assert_eq!(quote_identifier("users")?, "\"users\"");
/// assert_eq!(quote_identifier("odd\"name")?, "\"odd\"\"name\"");
/// ```
pub fn quote_identifier(name: &str) -> Result<String> {
    validate_identifier(name)?;
    Ok(escape(name))
}

/// Quote a table name after [`validate_table_name`].
pub fn quote_table_name(name: &str) -> Result<String> {
    validate_table_name(name)?;
    Ok(escape(name))
}

fn escape(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Validate a declared column type before it is spliced into DDL.
///
/// Accepts words made of ASCII letters, digits, `_` and spaces, optionally
/// followed by one parenthesized size list of digits, signs, dots, commas
/// and spaces: `TEXT`, `VARCHAR(20)`, `DECIMAL(10, 2)`, `UNSIGNED BIG INT`.
/// The empty string is accepted (SQLite allows typeless columns).
pub fn validate_type_declaration(column: &str, declared: &str) -> Result<()> {
    if is_valid_type(declared) {
        Ok(())
    } else {
        Err(StoreError::InvalidType {
            column: column.to_string(),
            declared: declared.to_string(),
        })
    }
}

fn is_valid_type(declared: &str) -> bool {
    if declared.len() > MAX_IDENTIFIER_LENGTH {
        return false;
    }

    let (name, args) = match declared.split_once('(') {
        Some((name, rest)) => match rest.strip_suffix(')') {
            Some(args) => (name, Some(args)),
            None => return false,
        },
        None => (declared, None),
    };

    let name_ok = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ' ');
    let args_ok = args.is_none_or(|args| {
        !args.trim().is_empty()
            && args
                .chars()
                .all(|c| c.is_ascii_digit() || matches!(c, ',' | ' ' | '+' | '-' | '.'))
    });

    name_ok && args_ok
}
