use anyhow::{anyhow, Context, Result};
use csv::ReaderBuilder;
use serde_json::Value as JsonValue;
use std::fmt;
use std::io::Read;

/// The closed set of value kinds a column may carry.
///
/// `Bool` is deliberately distinct from `Int`: a column of booleans must be
/// mapped by the boolean mapper, never coerced onto an integer range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Bool,
    Int,
    Float,
    Str,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Float => "float",
            Kind::Str => "str",
        };
        write!(f, "{}", name)
    }
}

/// A single raw datum in a dataset cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Bool(_) => Kind::Bool,
            Value::Int(_) => Kind::Int,
            Value::Float(_) => Kind::Float,
            Value::Str(_) => Kind::Str,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(v) => write!(f, "{}", v),
            Value::Str(s) => write!(f, "{}", s),
        }
    }
}

/// Headers plus an insertion-ordered collection of labeled rows.
///
/// Entity insertion order is preserved: it decides which style triple each
/// entity receives and the order of legend entries, so two datasets with the
/// same rows inserted in a different order render with swapped styles.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub headers: Vec<String>,
    entities: Vec<(String, Vec<Value>)>,
}

impl Dataset {
    pub fn new<S: Into<String>>(headers: Vec<S>) -> Self {
        Dataset {
            headers: headers.into_iter().map(Into::into).collect(),
            entities: Vec::new(),
        }
    }

    /// Add a row for `label`, replacing the previous row if the label exists.
    /// Replacement keeps the label's original position.
    pub fn insert<S: Into<String>>(&mut self, label: S, row: Vec<Value>) {
        let label = label.into();
        if let Some(entry) = self.entities.iter_mut().find(|(l, _)| *l == label) {
            entry.1 = row;
        } else {
            self.entities.push((label, row));
        }
    }

    pub fn entities(&self) -> impl Iterator<Item = (&str, &[Value])> {
        self.entities.iter().map(|(l, r)| (l.as_str(), r.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Project one attribute across all entities, in insertion order.
    /// Rows shorter than `index` contribute nothing; the validator rejects
    /// such rows before any column is consumed.
    pub fn column(&self, index: usize) -> Vec<&Value> {
        self.entities
            .iter()
            .filter_map(|(_, row)| row.get(index))
            .collect()
    }

    /// Build a dataset from a JSON document of the form
    /// `{"headers": [...], "content": {"label": [...], ...}}`.
    ///
    /// JSON numbers without a fractional part become `Int`, all others
    /// `Float`. Content key order is preserved as entity insertion order.
    pub fn from_json(value: &JsonValue) -> Result<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| anyhow!("Input must be a JSON object with 'headers' and 'content'"))?;

        let headers = obj
            .get("headers")
            .and_then(|h| h.as_array())
            .ok_or_else(|| anyhow!("'headers' must be a JSON array of strings"))?
            .iter()
            .map(|h| {
                h.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| anyhow!("'headers' entries must be strings"))
            })
            .collect::<Result<Vec<_>>>()?;

        let content = obj
            .get("content")
            .and_then(|c| c.as_object())
            .ok_or_else(|| anyhow!("'content' must be a JSON object mapping labels to rows"))?;

        let mut dataset = Dataset::new(headers);
        for (label, row) in content {
            let cells = row
                .as_array()
                .ok_or_else(|| anyhow!("Row for entity '{}' must be a JSON array", label))?;
            let mut values = Vec::with_capacity(cells.len());
            for cell in cells {
                values.push(value_from_json(cell, label)?);
            }
            dataset.insert(label.clone(), values);
        }

        Ok(dataset)
    }

    /// Read a dataset from CSV. The first column holds entity labels; the
    /// remaining header cells become attribute headers. Each cell is parsed
    /// as bool, then i64, then f64, falling back to a string.
    pub fn from_csv<R: Read>(reader: R) -> Result<Self> {
        let mut csv = ReaderBuilder::new().has_headers(true).from_reader(reader);

        let header_record = csv.headers().context("Failed to read CSV headers")?;
        if header_record.len() < 2 {
            return Err(anyhow!(
                "CSV needs a label column plus at least one attribute column"
            ));
        }
        let headers: Vec<String> = header_record.iter().skip(1).map(str::to_string).collect();

        let mut dataset = Dataset::new(headers);
        for record in csv.records() {
            let record = record.context("Failed to read CSV record")?;
            let mut cells = record.iter();
            let label = cells
                .next()
                .ok_or_else(|| anyhow!("CSV row is missing its label cell"))?
                .to_string();
            let row: Vec<Value> = cells.map(parse_cell).collect();
            dataset.insert(label, row);
        }

        if dataset.is_empty() {
            return Err(anyhow!("CSV must contain at least one data row"));
        }

        Ok(dataset)
    }
}

fn value_from_json(cell: &JsonValue, label: &str) -> Result<Value> {
    match cell {
        JsonValue::Bool(b) => Ok(Value::Bool(*b)),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Int(i))
            } else if let Some(f) = n.as_f64() {
                Ok(Value::Float(f))
            } else {
                Err(anyhow!(
                    "Number '{}' in row for '{}' is out of range",
                    n,
                    label
                ))
            }
        }
        JsonValue::String(s) => Ok(Value::Str(s.clone())),
        other => Err(anyhow!(
            "Unsupported JSON value '{}' in row for '{}'",
            other,
            label
        )),
    }
}

fn parse_cell(cell: &str) -> Value {
    match cell {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => {
            if let Ok(i) = cell.parse::<i64>() {
                Value::Int(i)
            } else if let Ok(f) = cell.parse::<f64>() {
                Value::Float(f)
            } else {
                Value::Str(cell.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_preserves_order_and_replaces() {
        let mut data = Dataset::new(vec!["a", "b"]);
        data.insert("x", vec![Value::Int(1), Value::Int(2)]);
        data.insert("y", vec![Value::Int(3), Value::Int(4)]);
        data.insert("x", vec![Value::Int(5), Value::Int(6)]);

        let labels: Vec<&str> = data.entities().map(|(l, _)| l).collect();
        assert_eq!(labels, vec!["x", "y"]);
        let (_, row) = data.entities().next().unwrap();
        assert_eq!(row[0], Value::Int(5));
    }

    #[test]
    fn test_column_projection() {
        let mut data = Dataset::new(vec!["legs", "colour"]);
        data.insert("cow", vec![Value::Int(4), Value::Str("white".into())]);
        data.insert("pig", vec![Value::Int(4), Value::Str("pink".into())]);

        let colours = data.column(1);
        assert_eq!(colours.len(), 2);
        assert_eq!(*colours[0], Value::Str("white".into()));
    }

    #[test]
    fn test_from_csv_infers_cell_kinds() {
        let csv = "name,legs,height,aquatic\ncow,4,1.575,false\nfish,0,0.3,true\n";
        let data = Dataset::from_csv(csv.as_bytes()).unwrap();

        assert_eq!(data.headers, vec!["legs", "height", "aquatic"]);
        assert_eq!(data.len(), 2);
        let (label, row) = data.entities().next().unwrap();
        assert_eq!(label, "cow");
        assert_eq!(row[0], Value::Int(4));
        assert_eq!(row[1], Value::Float(1.575));
        assert_eq!(row[2], Value::Bool(false));
    }

    #[test]
    fn test_from_json_number_kinds() {
        let doc: JsonValue = serde_json::from_str(
            r#"{"headers": ["legs", "height"], "content": {"cow": [4, 1.575], "pig": [4, 0.75]}}"#,
        )
        .unwrap();
        let data = Dataset::from_json(&doc).unwrap();

        let (_, row) = data.entities().next().unwrap();
        assert_eq!(row[0], Value::Int(4));
        assert_eq!(row[1], Value::Float(1.575));
    }

    #[test]
    fn test_from_json_rejects_non_object() {
        let doc: JsonValue = serde_json::from_str("[1, 2, 3]").unwrap();
        assert!(Dataset::from_json(&doc).is_err());
    }
}
