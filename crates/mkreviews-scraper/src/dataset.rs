//! Unions heterogeneous records into one rectangular table.

use std::fmt;

use indexmap::IndexSet;
use serde::Serialize;

use crate::types::{FieldValue, ReviewRecord};

/// One table cell. Absent fields are an explicit [`Cell::Empty`] so every
/// row has exactly one cell per column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Empty,
    Value(FieldValue),
}

impl Cell {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Value(value) => fmt::Display::fmt(value, f),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Dataset {
    /// Builds a table from already-rectangular parts.
    ///
    /// Returns `None` if any row's width differs from the column count.
    #[must_use]
    pub fn from_parts(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Option<Self> {
        rows.iter()
            .all(|row| row.len() == columns.len())
            .then_some(Self { columns, rows })
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Cell at `row` under `column`, if both exist.
    #[must_use]
    pub fn cell(&self, row: usize, column: &str) -> Option<&Cell> {
        let index = self.columns.iter().position(|c| c == column)?;
        self.rows.get(row)?.get(index)
    }

    /// Every row rendered as display strings, empty cells as `""`.
    #[must_use]
    pub fn rendered_rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(ToString::to_string).collect())
            .collect()
    }
}

/// Builds a dataset whose columns are the union of all record keys in
/// first-seen order.
#[must_use]
pub fn assemble(records: Vec<ReviewRecord>) -> Dataset {
    let columns: IndexSet<String> = records
        .iter()
        .flat_map(|record| record.keys().map(str::to_owned))
        .collect();

    let rows = records
        .into_iter()
        .map(|record| {
            let mut fields = record.into_fields();
            columns
                .iter()
                .map(|column| fields.swap_remove(column).map_or(Cell::Empty, Cell::Value))
                .collect()
        })
        .collect();

    Dataset {
        columns: columns.into_iter().collect(),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordBuilder;

    fn record(fields: &[(&str, &str)]) -> ReviewRecord {
        let mut builder = RecordBuilder::new();
        for (key, value) in fields {
            builder.set(key, FieldValue::Text((*value).to_owned()));
        }
        builder.finalize::<&str>(&[]).unwrap()
    }

    #[test]
    fn columns_are_first_seen_union() {
        let dataset = assemble(vec![
            record(&[("a", "1"), ("b", "2")]),
            record(&[("b", "3"), ("c", "4")]),
        ]);
        assert_eq!(dataset.columns(), ["a", "b", "c"]);
        assert_eq!(dataset.cell(0, "c"), Some(&Cell::Empty));
        assert_eq!(dataset.cell(1, "a"), Some(&Cell::Empty));
        assert_eq!(
            dataset.cell(1, "b"),
            Some(&Cell::Value(FieldValue::Text("3".to_owned())))
        );
    }

    #[test]
    fn every_row_has_one_cell_per_column() {
        let dataset = assemble(vec![
            record(&[("x", "1")]),
            record(&[("y", "2"), ("z", "3")]),
            record(&[]),
        ]);
        assert_eq!(dataset.column_count(), 3);
        assert!(dataset.rows().iter().all(|row| row.len() == 3));
        assert!(dataset.rows()[2].iter().all(Cell::is_empty));
    }

    #[test]
    fn empty_input_yields_empty_dataset() {
        let dataset = assemble(Vec::new());
        assert_eq!(dataset.row_count(), 0);
        assert_eq!(dataset.column_count(), 0);
    }

    #[test]
    fn rendered_rows_blank_empty_cells() {
        let dataset = assemble(vec![record(&[("a", "1")]), record(&[("b", "2")])]);
        assert_eq!(
            dataset.rendered_rows(),
            vec![vec!["1".to_owned(), String::new()], vec![String::new(), "2".to_owned()]]
        );
    }

    #[test]
    fn from_parts_rejects_ragged_rows() {
        assert!(Dataset::from_parts(vec!["a".into()], vec![vec![]]).is_none());
        assert!(Dataset::from_parts(vec!["a".into()], vec![vec![Cell::Empty]]).is_some());
    }
}
