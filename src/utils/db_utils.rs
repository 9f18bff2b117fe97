/// ===============================
/// Search filter for list queries
/// ===============================
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SearchClause {
    /// Either empty or ` WHERE (...)`, ready to append after the FROM part.
    pub sql: String,
    /// One bind value per placeholder in `sql`, in order.
    pub values: Vec<String>,
}

/// Builds `WHERE (LOWER(c1) LIKE LOWER(?) OR ...)` matching `term` anywhere in
/// any of `columns`, ignoring case even on binary-collated columns. No term (or
/// no columns) yields an empty clause.
pub fn search_clause(columns: &[&str], term: Option<&str>) -> SearchClause {
    let Some(term) = term else {
        return SearchClause::default();
    };
    if columns.is_empty() {
        return SearchClause::default();
    }

    let pattern = format!("%{}%", escape_like(term));

    let conditions = columns
        .iter()
        .map(|c| format!("LOWER({}) LIKE LOWER(?)", c))
        .collect::<Vec<_>>()
        .join(" OR ");

    SearchClause {
        sql: format!(" WHERE ({})", conditions),
        values: vec![pattern; columns.len()],
    }
}

/// Escapes LIKE wildcards so user input matches literally.
pub fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}
