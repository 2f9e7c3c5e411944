//! Query intent resolver.
//!
//! Maps user input — either a natural-language pseudo-call of the form
//! `output("...")` or a raw SQL statement — to an executable SQL string.
//! Resolution is pure text transformation: no schema validation happens
//! here, so a statement referencing a missing table fails at execution
//! time, not at resolution time.

use once_cell::sync::Lazy;
use regex::Regex;

/// Sentinel statement substituted for unrecognized natural-language input.
///
/// Treated as valid SQL by the caller: the executor short-circuits it into
/// a one-row error display instead of raising an error.
pub const SENTINEL_SQL: &str = "SELECT 'Invalid natural language query' as Error;";

/// Fixed three-way join emitted for "all users ... products" requests.
const USERS_PRODUCTS_JOIN_SQL: &str = "SELECT u.name, u.email, p.name as product_name, p.price \
     FROM users u \
     JOIN sales s ON u.id = s.user_id \
     JOIN products p ON s.product_id = p.product_id;";

static OUTPUT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^output\("(.*)"\)"#).expect("invalid output pattern"));

static FIRST_ROWS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^show first (\d+) rows from (\w+)").expect("invalid rows pattern"));

/// Resolves user input to an executable SQL string.
///
/// Classification rules are evaluated in a fixed priority order; the first
/// match wins. Input not wrapped in `output("...")` is treated as raw SQL
/// and passed through trimmed but otherwise unchanged.
pub fn resolve(input: &str) -> String {
    let trimmed = input.trim();
    let Some(caps) = OUTPUT_RE.captures(trimmed) else {
        return trimmed.to_string();
    };

    let text = caps[1].to_lowercase();
    if text.contains("all users") && text.contains("products") {
        USERS_PRODUCTS_JOIN_SQL.to_string()
    } else if text.contains("all users") {
        "SELECT * FROM users;".to_string()
    } else if text.contains("all products") {
        "SELECT * FROM products;".to_string()
    } else if text.contains("all sales") {
        "SELECT * FROM sales;".to_string()
    } else if let Some(m) = FIRST_ROWS_RE.captures(&text) {
        // Table and limit are taken verbatim; existence is checked by the
        // engine at execution time.
        format!("SELECT * FROM {} LIMIT {};", &m[2], &m[1])
    } else {
        SENTINEL_SQL.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_users_and_products_yields_three_way_join() {
        let sql = resolve(r#"output("show me all users and their corresponding products")"#);
        assert!(sql.contains("JOIN sales s ON u.id = s.user_id"));
        assert!(sql.contains("JOIN products p ON s.product_id = p.product_id"));
    }

    #[test]
    fn test_all_users_without_products() {
        assert_eq!(
            resolve(r#"output("list all users please")"#),
            "SELECT * FROM users;"
        );
    }

    #[test]
    fn test_join_rule_takes_priority_over_all_products() {
        // "all users" + "products" must win even though "products" is present.
        let sql = resolve(r#"output("all users with products")"#);
        assert!(sql.starts_with("SELECT u.name"));
    }

    #[test]
    fn test_first_rows_pattern() {
        assert_eq!(
            resolve(r#"output("show first 10 rows from sales")"#),
            "SELECT * FROM sales LIMIT 10;"
        );
    }

    #[test]
    fn test_first_rows_table_taken_verbatim() {
        // No existence validation at resolve time.
        assert_eq!(
            resolve(r#"output("show first 3 rows from nonexistent")"#),
            "SELECT * FROM nonexistent LIMIT 3;"
        );
    }

    #[test]
    fn test_unrecognized_text_yields_sentinel() {
        assert_eq!(resolve(r#"output("what is the weather")"#), SENTINEL_SQL);
    }

    #[test]
    fn test_raw_sql_passes_through_trimmed() {
        assert_eq!(
            resolve("  SELECT 1 AS one;  "),
            "SELECT 1 AS one;"
        );
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let input = r#"output("show first 5 rows from users")"#;
        assert_eq!(resolve(input), resolve(input));
    }
}
