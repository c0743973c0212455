use crate::data::{Dataset, Kind};
use crate::error::PlotError;

/// Check dataset shape and column homogeneity, returning one kind per column.
///
/// Rules:
/// - headers must be non-empty,
/// - at least one entity must be present,
/// - every row must match the header count,
/// - within a column all values must share a single kind.
///
/// Kinds are never coerced: a column holding both `3` and `3.0` is mixed, and
/// booleans never unify with integers.
pub fn validate(data: &Dataset) -> Result<Vec<Kind>, PlotError> {
    if data.headers.is_empty() {
        return Err(PlotError::EmptyHeaders);
    }
    if data.is_empty() {
        return Err(PlotError::NoEntities);
    }

    let expected = data.headers.len();
    for (label, row) in data.entities() {
        if row.len() != expected {
            return Err(PlotError::RowLength {
                entity: label.to_string(),
                expected,
                found: row.len(),
            });
        }
    }

    let mut kinds = Vec::with_capacity(expected);
    for (index, header) in data.headers.iter().enumerate() {
        let mut found: Vec<Kind> = Vec::new();
        for (_, row) in data.entities() {
            let kind = row[index].kind();
            if !found.contains(&kind) {
                found.push(kind);
            }
        }
        if found.len() > 1 {
            let names: Vec<String> = found.iter().map(Kind::to_string).collect();
            return Err(PlotError::MixedKinds {
                header: header.clone(),
                index,
                kinds: names.join(", "),
            });
        }
        kinds.push(found[0]);
    }

    Ok(kinds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Value;

    fn animal_data() -> Dataset {
        let mut data = Dataset::new(vec!["legs", "colour", "aquatic"]);
        data.insert(
            "cow",
            vec![
                Value::Int(4),
                Value::Str("white".into()),
                Value::Bool(false),
            ],
        );
        data.insert(
            "fish",
            vec![Value::Int(0), Value::Str("grey".into()), Value::Bool(true)],
        );
        data
    }

    #[test]
    fn test_validate_infers_kinds() {
        let kinds = validate(&animal_data()).unwrap();
        assert_eq!(kinds, vec![Kind::Int, Kind::Str, Kind::Bool]);
    }

    #[test]
    fn test_validate_rejects_empty_headers() {
        let mut data = Dataset::new(Vec::<String>::new());
        data.insert("cow", vec![]);
        assert!(matches!(validate(&data), Err(PlotError::EmptyHeaders)));
    }

    #[test]
    fn test_validate_rejects_no_entities() {
        let data = Dataset::new(vec!["legs"]);
        assert!(matches!(validate(&data), Err(PlotError::NoEntities)));
    }

    #[test]
    fn test_validate_rejects_row_length_naming_entity() {
        let mut data = animal_data();
        data.insert("snake", vec![Value::Int(0)]);

        match validate(&data) {
            Err(PlotError::RowLength {
                entity,
                expected,
                found,
            }) => {
                assert_eq!(entity, "snake");
                assert_eq!(expected, 3);
                assert_eq!(found, 1);
            }
            other => panic!("expected RowLength, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_mixed_kinds_naming_column() {
        let mut data = Dataset::new(vec!["legs"]);
        data.insert("cow", vec![Value::Int(4)]);
        data.insert("ghost", vec![Value::Str("many".into())]);

        match validate(&data) {
            Err(PlotError::MixedKinds {
                header,
                index,
                kinds,
            }) => {
                assert_eq!(header, "legs");
                assert_eq!(index, 0);
                assert!(kinds.contains("int") && kinds.contains("str"));
            }
            other => panic!("expected MixedKinds, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_bool_is_not_int() {
        let mut data = Dataset::new(vec!["flag"]);
        data.insert("a", vec![Value::Bool(true)]);
        data.insert("b", vec![Value::Int(1)]);
        assert!(matches!(validate(&data), Err(PlotError::MixedKinds { .. })));
    }
}
