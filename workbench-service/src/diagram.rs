//! Entity-relationship inference and diagram rendering.
//!
//! Relationship edges are derived from column-naming conventions only:
//! a column `product_id` on table `sales` points at table `products` (or
//! `product` when no plural exists). The singular/plural heuristic is
//! purely suffix-based (`s`-appending/stripping) and deliberately kept
//! that way; it misclassifies irregular plurals and that behavior is a
//! documented simplification, not a bug to patch.

use std::collections::HashSet;

use common::models::Database;
use serde::Serialize;
use utoipa::ToSchema;

/// A directed relationship edge between two tables.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, ToSchema)]
pub struct Relationship {
    /// Table owning the foreign-key-like column.
    pub from_table: String,
    /// Referenced table.
    pub to_table: String,
    /// Edge label.
    pub label: String,
}

/// Infers relationship edges from column names.
///
/// Set semantics: edge membership is stable for identical input, but
/// iteration order is not.
pub fn infer_relationships(database: &Database) -> HashSet<Relationship> {
    let table_names: HashSet<&str> = database.tables.iter().map(|t| t.name.as_str()).collect();
    let mut edges = HashSet::new();

    for table in &database.tables {
        // Self-reference guard: `sale_id` on table `sales` is its own key.
        let self_key = format!("{}_id", table.name.trim_end_matches('s'));
        for column in &table.columns {
            if column.name == "id" || column.name == self_key {
                continue;
            }
            let Some(base) = column.name.strip_suffix("_id") else {
                continue;
            };
            let plural = format!("{}s", base);
            let target = if table_names.contains(plural.as_str()) {
                Some(plural)
            } else if table_names.contains(base) {
                Some(base.to_string())
            } else {
                None
            };
            if let Some(to_table) = target {
                if to_table == table.name {
                    continue;
                }
                edges.insert(Relationship {
                    from_table: table.name.clone(),
                    to_table,
                    label: "has".to_string(),
                });
            }
        }
    }

    edges
}

/// Renders a database as mermaid `erDiagram` source.
///
/// Each table becomes a block of `type name` lines in column order,
/// followed by one relationship line per inferred edge.
pub fn render_er_diagram(database: &Database) -> String {
    let mut out = String::from("erDiagram\n");
    for table in &database.tables {
        out.push_str(&format!("    {} {{\n", table.name));
        for column in &table.columns {
            out.push_str(&format!("        {} {}\n", column.data_type, column.name));
        }
        out.push_str("    }\n");
    }
    for edge in infer_relationships(database) {
        out.push_str(&format!(
            "    \"{}\" ||--o{{ \"{}\" : \"{}\"\n",
            edge.from_table, edge.to_table, edge.label
        ));
    }
    out
}

/// Placeholder shown when no database is selected.
pub fn placeholder_no_selection() -> String {
    "graph TD\n    A[Select a database to see ER Diagram]\n".to_string()
}

/// Placeholder shown when the selected database is missing or empty.
pub fn placeholder_not_found() -> String {
    "graph TD\n    A[Database not found or empty]\n".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::models::{Column, Table};

    fn table(name: &str, columns: &[(&str, &str)]) -> Table {
        Table {
            name: name.to_string(),
            columns: columns
                .iter()
                .map(|(n, t)| Column::new(n, t))
                .collect(),
        }
    }

    fn sample_db() -> Database {
        Database {
            name: "main".to_string(),
            tables: vec![
                table(
                    "users",
                    &[("id", "INTEGER"), ("name", "TEXT"), ("email", "TEXT")],
                ),
                table(
                    "products",
                    &[("product_id", "INTEGER"), ("price", "REAL")],
                ),
                table(
                    "sales",
                    &[
                        ("sale_id", "INTEGER"),
                        ("product_id", "INTEGER"),
                        ("user_id", "INTEGER"),
                    ],
                ),
            ],
        }
    }

    #[test]
    fn test_sales_points_at_products_and_users() {
        let edges = infer_relationships(&sample_db());
        assert!(edges.contains(&Relationship {
            from_table: "sales".into(),
            to_table: "products".into(),
            label: "has".into(),
        }));
        assert!(edges.contains(&Relationship {
            from_table: "sales".into(),
            to_table: "users".into(),
            label: "has".into(),
        }));
    }

    #[test]
    fn test_self_key_and_plain_id_are_skipped() {
        let edges = infer_relationships(&sample_db());
        // `sale_id` on `sales` and `id` on `users` must not produce edges.
        assert!(edges.iter().all(|e| e.to_table != "sales"));
        assert_eq!(edges.len(), 2);
    }

    #[test]
    fn test_never_emits_self_loop() {
        let db = Database {
            name: "main".to_string(),
            tables: vec![table(
                "sales",
                &[("sale_id", "INTEGER"), ("sales_id", "INTEGER")],
            )],
        };
        let edges = infer_relationships(&db);
        assert!(edges.iter().all(|e| e.from_table != e.to_table));
    }

    #[test]
    fn test_singular_target_as_fallback() {
        let db = Database {
            name: "main".to_string(),
            tables: vec![
                table("orders", &[("customer_id", "INTEGER")]),
                table("customer", &[("id", "INTEGER")]),
            ],
        };
        let edges = infer_relationships(&db);
        assert!(edges.contains(&Relationship {
            from_table: "orders".into(),
            to_table: "customer".into(),
            label: "has".into(),
        }));
    }

    #[test]
    fn test_plural_target_wins_over_singular() {
        let db = Database {
            name: "main".to_string(),
            tables: vec![
                table("orders", &[("customer_id", "INTEGER")]),
                table("customer", &[("id", "INTEGER")]),
                table("customers", &[("id", "INTEGER")]),
            ],
        };
        let edges = infer_relationships(&db);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges.iter().next().unwrap().to_table, "customers");
    }

    #[test]
    fn test_unresolvable_column_emits_nothing() {
        let db = Database {
            name: "main".to_string(),
            tables: vec![table("sales", &[("warehouse_id", "INTEGER")])],
        };
        assert!(infer_relationships(&db).is_empty());
    }

    #[test]
    fn test_duplicate_columns_dedup_to_one_edge() {
        let db = Database {
            name: "main".to_string(),
            tables: vec![
                table(
                    "sales",
                    &[("product_id", "INTEGER"), ("product_id", "INTEGER")],
                ),
                table("products", &[("product_id", "INTEGER")]),
            ],
        };
        assert_eq!(infer_relationships(&db).len(), 1);
    }

    #[test]
    fn test_render_contains_blocks_and_edges() {
        let text = render_er_diagram(&sample_db());
        assert!(text.starts_with("erDiagram\n"));
        assert!(text.contains("    sales {\n"));
        assert!(text.contains("        INTEGER product_id\n"));
        assert!(text.contains("    \"sales\" ||--o{ \"products\" : \"has\"\n"));
    }
}
