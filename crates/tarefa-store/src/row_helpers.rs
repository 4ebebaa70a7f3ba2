use crate::error::StoreError;

/// Get a required column value from a row, returning CorruptRow on failure.
pub fn get<T: rusqlite::types::FromSql>(
    row: &rusqlite::Row<'_>,
    idx: usize,
    table: &'static str,
    column: &'static str,
) -> Result<T, StoreError> {
    row.get(idx).map_err(|e| StoreError::CorruptRow {
        table,
        column,
        detail: e.to_string(),
    })
}

/// Parse a string into an enum, returning CorruptRow on failure.
pub fn parse_enum<T: std::str::FromStr>(
    raw: &str,
    table: &'static str,
    column: &'static str,
) -> Result<T, StoreError> {
    raw.parse().map_err(|_| StoreError::CorruptRow {
        table,
        column,
        detail: format!("unknown variant: {raw}"),
    })
}

/// Escape LIKE special characters for safe pattern matching.
/// Callers must pair the result with an `ESCAPE '\'` clause.
pub fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tarefa_core::model::Completion;

    #[test]
    fn escape_like_special_chars() {
        assert_eq!(escape_like("prova"), "prova");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("foo_bar"), "foo\\_bar");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
        assert_eq!(escape_like("%_\\"), "\\%\\_\\\\");
    }

    #[test]
    fn parse_enum_success() {
        let flag: Completion = parse_enum("1", "tasks", "completed").unwrap();
        assert!(flag.is_done());
    }

    #[test]
    fn parse_enum_failure() {
        let result: Result<Completion, _> = parse_enum("yes", "tasks", "completed");
        assert!(matches!(
            result,
            Err(StoreError::CorruptRow {
                table: "tasks",
                column: "completed",
                ..
            })
        ));
    }
}
