//! Helpers shared by the Postgres repositories.

use skyway_core::{BoxError, DuplicateKey};
use skyway_shared::PageQuery;

/// Turn a unique-constraint violation into [`DuplicateKey`], anything else
/// into a plain boxed error.
pub(crate) fn unique_as_duplicate(key: String) -> impl FnOnce(sqlx::Error) -> BoxError {
    move |e| {
        if let sqlx::Error::Database(db) = &e {
            if db.is_unique_violation() {
                return DuplicateKey(key).into();
            }
        }
        e.into()
    }
}

/// `ILIKE` pattern for an optional search term.
pub(crate) fn like_pattern(query: &PageQuery) -> Option<String> {
    query.search_term.as_ref().map(|term| {
        let escaped = term.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_");
        format!("%{escaped}%")
    })
}

/// `ORDER BY ... LIMIT ... OFFSET ...` tail. `column` must come from a
/// whitelist, never from input.
pub(crate) fn page_clause(column: &str, query: &PageQuery) -> String {
    // OFFSET is a bigint in Postgres.
    let offset = i64::try_from(query.offset()).unwrap_or(i64::MAX);
    format!(
        "ORDER BY {} {} LIMIT {} OFFSET {}",
        column,
        query.order.as_sql(),
        query.limit(),
        offset
    )
}
