// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Explicit column configuration and SQL rendering for relational backends.
//!
//! A [`ColumnMap`] names the table and the six columns of the node relation
//! once, at construction time; nothing is re-derived from schema
//! introspection later. [`ColumnMap::where_sql`] renders a
//! [`Predicate`](crate::Predicate) as a `WHERE` fragment and
//! [`ColumnMap::shift_sql`] renders the bulk range shifts the engine issues,
//! so a SQL-backed [`Store`](crate::Store) implementation stays a thin
//! driver shim.

use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use thiserror::Error;

use crate::predicate::{Cmp, Predicate};
use crate::types::TreeId;

/// Setup-time configuration problem. Never raised at runtime.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ConfigError {
    /// A table or column name was left empty.
    #[error("column map: the {role} name is empty")]
    EmptyName {
        /// Which slot was empty (e.g. `"left"`, `"table"`).
        role: &'static str,
    },
    /// Two slots were mapped to the same column name.
    #[error("column map: `{name}` is used for more than one column")]
    DuplicateName {
        /// The repeated name.
        name: String,
    },
}

/// Names of the table and columns backing the node relation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ColumnMap {
    table: String,
    id: String,
    parent: String,
    tree: String,
    left: String,
    right: String,
    depth: String,
}

impl ColumnMap {
    /// Build and validate a column map. Names must be non-empty and the six
    /// column names pairwise distinct.
    pub fn new(
        table: &str,
        id: &str,
        parent: &str,
        tree: &str,
        left: &str,
        right: &str,
        depth: &str,
    ) -> Result<Self, ConfigError> {
        let roles: [(&'static str, &str); 7] = [
            ("table", table),
            ("id", id),
            ("parent", parent),
            ("tree", tree),
            ("left", left),
            ("right", right),
            ("depth", depth),
        ];
        for (role, name) in roles {
            if name.is_empty() {
                return Err(ConfigError::EmptyName { role });
            }
        }
        let mut seen: Vec<&str> = Vec::with_capacity(6);
        for (_, name) in &roles[1..] {
            if seen.contains(name) {
                return Err(ConfigError::DuplicateName {
                    name: (*name).to_string(),
                });
            }
            seen.push(name);
        }
        Ok(Self {
            table: table.to_string(),
            id: id.to_string(),
            parent: parent.to_string(),
            tree: tree.to_string(),
            left: left.to_string(),
            right: right.to_string(),
            depth: depth.to_string(),
        })
    }

    /// The conventional MPTT layout: `nodes(id, parent_id, tree_id, lft,
    /// rgt, depth)`.
    pub fn conventional() -> Self {
        Self::new("nodes", "id", "parent_id", "tree_id", "lft", "rgt", "depth")
            .expect("conventional names are valid")
    }

    /// Render a predicate as a SQL `WHERE` fragment (without the keyword).
    pub fn where_sql(&self, pred: &Predicate) -> String {
        match pred {
            Predicate::All(ps) => self.join_sql(ps, " AND ", "1 = 1"),
            Predicate::Any(ps) => self.join_sql(ps, " OR ", "0 = 1"),
            Predicate::IdEq(id) => format!("{} = {}", self.id, id.0),
            Predicate::IdNe(id) => format!("{} <> {}", self.id, id.0),
            Predicate::ParentEq(None) => format!("{} IS NULL", self.parent),
            Predicate::ParentEq(Some(p)) => format!("{} = {}", self.parent, p.0),
            Predicate::TreeEq(t) => format!("{} = {}", self.tree, t.0),
            Predicate::DepthEq(d) => format!("{} = {}", self.depth, d),
            Predicate::Left(cmp, v) => format!("{} {} {}", self.left, cmp_sql(*cmp), v),
            Predicate::Right(cmp, v) => format!("{} {} {}", self.right, cmp_sql(*cmp), v),
            Predicate::Leaf => format!("{} = {} + 1", self.right, self.left),
        }
    }

    /// Render one bulk range shift as a full `UPDATE` statement.
    ///
    /// `column` picks `left` or `right`; the statement is the engine's
    /// "rows in `tree` with `column >= at` get `column += delta`".
    pub fn shift_sql(&self, column: RangeColumn, tree: TreeId, at: i64, delta: i64) -> String {
        let col = match column {
            RangeColumn::Left => &self.left,
            RangeColumn::Right => &self.right,
        };
        format!(
            "UPDATE {table} SET {col} = {col} + {delta} WHERE {tree_col} = {tree} AND {col} >= {at}",
            table = self.table,
            col = col,
            delta = delta,
            tree_col = self.tree,
            tree = tree.0,
            at = at,
        )
    }

    /// Render an ordered range read as a full `SELECT` statement.
    pub fn select_sql(&self, pred: &Predicate) -> String {
        format!(
            "SELECT {id}, {parent}, {tree}, {left}, {right}, {depth} FROM {table} WHERE {pred} ORDER BY {left}",
            id = self.id,
            parent = self.parent,
            tree = self.tree,
            left = self.left,
            right = self.right,
            depth = self.depth,
            table = self.table,
            pred = self.where_sql(pred),
        )
    }

    fn join_sql(&self, ps: &[Predicate], sep: &str, empty: &str) -> String {
        if ps.is_empty() {
            return empty.to_string();
        }
        let parts: Vec<String> = ps.iter().map(|p| format!("({})", self.where_sql(p))).collect();
        parts.join(sep)
    }
}

/// Which range column a bulk shift applies to.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RangeColumn {
    /// The `left` boundary column.
    Left,
    /// The `right` boundary column.
    Right,
}

fn cmp_sql(cmp: Cmp) -> &'static str {
    match cmp {
        Cmp::Lt => "<",
        Cmp::Le => "<=",
        Cmp::Gt => ">",
        Cmp::Ge => ">=",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RowId;
    use alloc::vec;

    #[test]
    fn rejects_bad_names() {
        assert_eq!(
            ColumnMap::new("nodes", "id", "", "tree_id", "lft", "rgt", "depth"),
            Err(ConfigError::EmptyName { role: "parent" })
        );
        assert_eq!(
            ColumnMap::new("nodes", "id", "pid", "tree_id", "lft", "lft", "depth"),
            Err(ConfigError::DuplicateName {
                name: "lft".to_string()
            })
        );
    }

    #[test]
    fn renders_descendant_predicate() {
        let cols = ColumnMap::conventional();
        let pred = Predicate::All(vec![
            Predicate::TreeEq(TreeId(1)),
            Predicate::Left(Cmp::Gt, 1),
            Predicate::Right(Cmp::Lt, 8),
        ]);
        assert_eq!(
            cols.where_sql(&pred),
            "(tree_id = 1) AND (lft > 1) AND (rgt < 8)"
        );
    }

    #[test]
    fn renders_empty_combinators() {
        let cols = ColumnMap::conventional();
        assert_eq!(cols.where_sql(&Predicate::always()), "1 = 1");
        assert_eq!(cols.where_sql(&Predicate::never()), "0 = 1");
    }

    #[test]
    fn renders_null_parent_and_leaf() {
        let cols = ColumnMap::conventional();
        assert_eq!(cols.where_sql(&Predicate::ParentEq(None)), "parent_id IS NULL");
        assert_eq!(cols.where_sql(&Predicate::Leaf), "rgt = lft + 1");
        assert_eq!(
            cols.where_sql(&Predicate::IdNe(RowId(4))),
            "id <> 4"
        );
    }

    #[test]
    fn renders_shift_update() {
        let cols = ColumnMap::conventional();
        assert_eq!(
            cols.shift_sql(RangeColumn::Left, TreeId(2), 5, 2),
            "UPDATE nodes SET lft = lft + 2 WHERE tree_id = 2 AND lft >= 5"
        );
        assert_eq!(
            cols.shift_sql(RangeColumn::Right, TreeId(2), 5, -4),
            "UPDATE nodes SET rgt = rgt + -4 WHERE tree_id = 2 AND rgt >= 5"
        );
    }

    #[test]
    fn renders_select() {
        let cols = ColumnMap::conventional();
        let sql = cols.select_sql(&Predicate::TreeEq(TreeId(1)));
        assert_eq!(
            sql,
            "SELECT id, parent_id, tree_id, lft, rgt, depth FROM nodes WHERE tree_id = 1 ORDER BY lft"
        );
    }
}
