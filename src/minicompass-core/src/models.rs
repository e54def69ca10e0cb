use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;
use thiserror::Error;

/// Cell is one flattened value of a DocumentSet row
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    /// Nested object or array, kept as its compact JSON text
    Json(String),
}

impl Cell {
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// Text of a `String` or `Json` cell
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::String(s) | Cell::Json(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&Value> for Cell {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Cell::Null,
            Value::Bool(b) => Cell::Bool(*b),
            Value::Number(n) => Cell::Number(n.clone()),
            Value::String(s) => Cell::String(s.clone()),
            Value::Array(_) | Value::Object(_) => Cell::Json(value.to_string()),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => Ok(()),
            Cell::Bool(b) => write!(f, "{}", b),
            Cell::Number(n) => write!(f, "{}", n),
            Cell::String(s) | Cell::Json(s) => f.write_str(s),
        }
    }
}

/// How the column list of a DocumentSet is derived from a documents array
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ColumnTemplate {
    /// Keys of the first document, in their order. Later documents never add columns.
    #[default]
    FirstDocument,
    /// Keys of the first document followed by keys first seen in later documents
    Union,
}

/// An element of the documents array was not a JSON object
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("document at index {index} is not a JSON object")]
pub struct ShapeError {
    pub index: usize,
}

/// DocumentSet is a rectangular table built from a documents array
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DocumentSet {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl DocumentSet {
    /// The result of a read that matched no documents
    pub fn empty() -> Self {
        Self::default()
    }

    /// Flatten `documents` into rows, keeping array order.
    ///
    /// Columns come from `template`. Each cell is looked up by key in its
    /// document, so missing keys become [`Cell::Null`] and keys outside the
    /// template are ignored.
    pub fn from_documents(
        documents: &[Value],
        template: ColumnTemplate,
    ) -> Result<Self, ShapeError> {
        let objects = documents
            .iter()
            .enumerate()
            .map(|(index, doc)| doc.as_object().ok_or(ShapeError { index }))
            .collect::<Result<Vec<&Map<String, Value>>, _>>()?;

        let Some(first) = objects.first() else {
            return Ok(Self::empty());
        };

        let mut columns: Vec<String> = first.keys().cloned().collect();
        if template == ColumnTemplate::Union {
            for doc in &objects[1..] {
                for key in doc.keys() {
                    if !columns.contains(key) {
                        columns.push(key.clone());
                    }
                }
            }
        }

        let rows = objects
            .iter()
            .map(|doc| {
                columns
                    .iter()
                    .map(|column| doc.get(column).map(Cell::from).unwrap_or(Cell::Null))
                    .collect()
            })
            .collect();

        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell at `row` under the column named `column`
    pub fn cell(&self, row: usize, column: &str) -> Option<&Cell> {
        let index = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(index))
    }
}
