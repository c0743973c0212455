use serde::Deserialize;

use crate::data::{Kind, Value};
use crate::error::PlotError;
use crate::ticks;

/// A labeled reference point on a vertical axis. `position` is in [0,1].
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub position: f64,
    pub label: String,
}

impl Tick {
    fn new(position: f64, label: impl Into<String>) -> Self {
        Tick {
            position,
            label: label.into(),
        }
    }
}

/// How many ticks a continuous (float) axis should carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TickPolicy {
    /// Let the locator pick a small number of round values (targets 5).
    #[default]
    Auto,
    /// Ask the locator for approximately this many intervals.
    Fixed(usize),
}

impl TickPolicy {
    fn target_count(self) -> usize {
        match self {
            TickPolicy::Auto => 5,
            TickPolicy::Fixed(n) => n,
        }
    }
}

/// One fitted per-column value mapping: a pure `value -> [0,1]` conversion
/// plus the tick positions and labels for that column's axis.
///
/// The variant is selected once per column from the validator's kind tag;
/// there is no fallback or coercion between variants.
#[derive(Debug, Clone)]
pub enum Mapper {
    Bool(BoolMap),
    Str(StringMap),
    Int(IntMap),
    Float(FloatMap),
}

impl Mapper {
    /// Fit a mapper of the given kind over one column's values.
    ///
    /// Values of a different kind than `kind` are ignored while fitting; the
    /// validator guarantees none exist by the time this is called.
    pub fn fit(kind: Kind, column: &[&Value], policy: TickPolicy) -> Result<Mapper, PlotError> {
        if column.is_empty() {
            return Err(PlotError::NoEntities);
        }
        let mapper = match kind {
            Kind::Bool => Mapper::Bool(BoolMap::new()),
            Kind::Str => Mapper::Str(StringMap::fit(column)),
            Kind::Int => Mapper::Int(IntMap::fit(column)),
            Kind::Float => Mapper::Float(FloatMap::fit(column, policy)),
        };
        Ok(mapper)
    }

    /// Convert a raw value through the fitted mapping.
    ///
    /// Fails with `UnknownValue` for an unfitted category, or for a value
    /// whose kind does not match the mapper's variant.
    pub fn convert(&self, value: &Value) -> Result<f64, PlotError> {
        match (self, value) {
            (Mapper::Bool(m), Value::Bool(b)) => Ok(m.convert(*b)),
            (Mapper::Str(m), Value::Str(s)) => m.convert(s),
            (Mapper::Int(m), Value::Int(i)) => Ok(m.convert(*i)),
            (Mapper::Float(m), Value::Float(f)) => Ok(m.convert(*f)),
            (_, other) => Err(PlotError::UnknownValue {
                value: other.to_string(),
            }),
        }
    }

    pub fn ticks(&self) -> &[Tick] {
        match self {
            Mapper::Bool(m) => &m.ticks,
            Mapper::Str(m) => &m.ticks,
            Mapper::Int(m) => &m.ticks,
            Mapper::Float(m) => &m.ticks,
        }
    }
}

/// Fixed boolean mapping: false -> 0.0, true -> 1.0. Nothing is fitted from
/// the data; the tick order (false below true) is part of the contract.
#[derive(Debug, Clone)]
pub struct BoolMap {
    ticks: Vec<Tick>,
}

impl BoolMap {
    fn new() -> Self {
        BoolMap {
            ticks: vec![Tick::new(0.0, "false"), Tick::new(1.0, "true")],
        }
    }

    fn convert(&self, value: bool) -> f64 {
        if value {
            1.0
        } else {
            0.0
        }
    }
}

/// Categorical mapping: the unique strings of the column, sorted
/// lexicographically, take ranks 0..K-1 rescaled onto [0,1].
///
/// A single-category column (K = 1) pins its sole tick at 0.0 rather than
/// dividing by zero. Conversion is deterministic for any input order of the
/// same multiset of strings.
#[derive(Debug, Clone)]
pub struct StringMap {
    categories: Vec<String>,
    ticks: Vec<Tick>,
}

impl StringMap {
    fn fit(column: &[&Value]) -> Self {
        let mut categories: Vec<String> = column
            .iter()
            .filter_map(|v| match v {
                Value::Str(s) => Some(s.clone()),
                _ => None,
            })
            .collect();
        categories.sort();
        categories.dedup();

        let ticks = categories
            .iter()
            .enumerate()
            .map(|(rank, cat)| Tick::new(rank_position(rank, categories.len()), cat.clone()))
            .collect();

        StringMap { categories, ticks }
    }

    fn convert(&self, value: &str) -> Result<f64, PlotError> {
        match self.categories.binary_search_by(|c| c.as_str().cmp(value)) {
            Ok(rank) => Ok(rank_position(rank, self.categories.len())),
            Err(_) => Err(PlotError::UnknownValue {
                value: value.to_string(),
            }),
        }
    }
}

fn rank_position(rank: usize, k: usize) -> f64 {
    if k <= 1 {
        0.0
    } else {
        rank as f64 / (k - 1) as f64
    }
}

/// Linear integer mapping over the column's [min, max], one tick per distinct
/// value present.
///
/// A constant column widens its range to [v-0.5, v+0.5] so the axis keeps a
/// nonzero height; the widening affects only the normalization math, never
/// the tick labels.
#[derive(Debug, Clone)]
pub struct IntMap {
    origin: f64,
    span: f64,
    ticks: Vec<Tick>,
}

impl IntMap {
    fn fit(column: &[&Value]) -> Self {
        let mut values: Vec<i64> = column
            .iter()
            .filter_map(|v| match v {
                Value::Int(i) => Some(*i),
                _ => None,
            })
            .collect();
        values.sort_unstable();
        values.dedup();

        let min = *values.first().unwrap_or(&0);
        let max = *values.last().unwrap_or(&0);
        let (origin, span) = widen_range(min as f64, max as f64);

        let ticks = values
            .iter()
            .map(|&v| Tick::new((v as f64 - origin) / span, v.to_string()))
            .collect();

        IntMap { origin, span, ticks }
    }

    fn convert(&self, value: i64) -> f64 {
        (value as f64 - self.origin) / self.span
    }
}

/// Linear float mapping over the column's [min, max] with nice-value ticks.
///
/// Shares the degenerate-range widening of `IntMap`. Ticks come from the
/// locator in `ticks.rs` over the raw extent (the widened extent when the
/// column is constant), then pass through the same normalization as the data;
/// labels are rounded to six decimal digits.
#[derive(Debug, Clone)]
pub struct FloatMap {
    origin: f64,
    span: f64,
    ticks: Vec<Tick>,
}

impl FloatMap {
    fn fit(column: &[&Value], policy: TickPolicy) -> Self {
        let values: Vec<f64> = column
            .iter()
            .filter_map(|v| match v {
                Value::Float(f) => Some(*f),
                _ => None,
            })
            .collect();

        let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let (origin, span) = widen_range(min, max);

        // A constant column has no raw extent; tick over the widened range so
        // the axis still shows reference values around the shared point.
        let (lo, hi) = if min == max {
            (origin, origin + span)
        } else {
            (min, max)
        };

        let ticks = ticks::ticks(lo, hi, policy.target_count())
            .into_iter()
            .map(|v| Tick::new((v - origin) / span, float_label(v)))
            .collect();

        FloatMap { origin, span, ticks }
    }

    fn convert(&self, value: f64) -> f64 {
        (value - self.origin) / self.span
    }
}

/// Degenerate ranges widen by half a unit on each side; anything else maps
/// min -> 0.0 and max -> 1.0 exactly.
fn widen_range(min: f64, max: f64) -> (f64, f64) {
    if min == max {
        (min - 0.5, 1.0)
    } else {
        (min, max - min)
    }
}

fn float_label(value: f64) -> String {
    let rounded = (value * 1e6).round() / 1e6;
    format!("{}", rounded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fit(kind: Kind, values: Vec<Value>) -> Mapper {
        let refs: Vec<&Value> = values.iter().collect();
        Mapper::fit(kind, &refs, TickPolicy::Auto).unwrap()
    }

    #[test]
    fn test_bool_fixed_points() {
        for column in [
            vec![Value::Bool(true)],
            vec![Value::Bool(false)],
            vec![Value::Bool(true), Value::Bool(false), Value::Bool(true)],
        ] {
            let mapper = fit(Kind::Bool, column);
            assert_eq!(mapper.convert(&Value::Bool(false)).unwrap(), 0.0);
            assert_eq!(mapper.convert(&Value::Bool(true)).unwrap(), 1.0);
            let labels: Vec<&str> = mapper.ticks().iter().map(|t| t.label.as_str()).collect();
            assert_eq!(labels, vec!["false", "true"]);
        }
    }

    #[test]
    fn test_string_ranks_sorted_unique() {
        let words = [
            "woof", "frail", "igni", "cup", "frail", "frail", "boof", "igni", "lid",
        ];
        let column: Vec<Value> = words.iter().map(|w| Value::Str(w.to_string())).collect();
        let mapper = fit(Kind::Str, column);

        let expected = ["boof", "cup", "frail", "igni", "lid", "woof"];
        let ticks = mapper.ticks();
        assert_eq!(ticks.len(), expected.len());
        for (rank, word) in expected.iter().enumerate() {
            let pos = rank as f64 / (expected.len() - 1) as f64;
            assert_eq!(ticks[rank].label, *word);
            assert!((ticks[rank].position - pos).abs() < 1e-12);
            assert_eq!(mapper.convert(&Value::Str(word.to_string())).unwrap(), pos);
        }
    }

    #[test]
    fn test_string_determinism_across_input_order() {
        let forward = ["next", "alpha", "bail", "bol", "whiff", "whift"];
        let mut reversed = forward;
        reversed.reverse();

        let a = fit(
            Kind::Str,
            forward.iter().map(|w| Value::Str(w.to_string())).collect(),
        );
        let b = fit(
            Kind::Str,
            reversed.iter().map(|w| Value::Str(w.to_string())).collect(),
        );
        assert_eq!(a.ticks(), b.ticks());
    }

    #[test]
    fn test_string_single_category_at_zero() {
        let mapper = fit(Kind::Str, vec![Value::Str("only".into())]);
        assert_eq!(mapper.ticks(), &[Tick::new(0.0, "only")]);
        assert_eq!(mapper.convert(&Value::Str("only".into())).unwrap(), 0.0);
    }

    #[test]
    fn test_string_unknown_value_fails() {
        let mapper = fit(Kind::Str, vec![Value::Str("white".into())]);
        match mapper.convert(&Value::Str("mauve".into())) {
            Err(PlotError::UnknownValue { value }) => assert_eq!(value, "mauve"),
            other => panic!("expected UnknownValue, got {:?}", other),
        }
    }

    #[test]
    fn test_int_constant_column_widens_to_center() {
        let mapper = fit(Kind::Int, vec![Value::Int(4), Value::Int(4), Value::Int(4)]);
        assert_eq!(mapper.convert(&Value::Int(4)).unwrap(), 0.5);
        // The widened range never leaks into labels.
        assert_eq!(mapper.ticks(), &[Tick::new(0.5, "4")]);
    }

    #[test]
    fn test_int_round_trip_and_per_value_ticks() {
        let mapper = fit(
            Kind::Int,
            vec![Value::Int(0), Value::Int(2), Value::Int(4), Value::Int(2)],
        );
        assert_eq!(mapper.convert(&Value::Int(0)).unwrap(), 0.0);
        assert_eq!(mapper.convert(&Value::Int(4)).unwrap(), 1.0);

        let labels: Vec<&str> = mapper.ticks().iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["0", "2", "4"]);
        assert_eq!(mapper.ticks()[1].position, 0.5);
    }

    #[test]
    fn test_float_constant_column_widens_to_center() {
        let mapper = fit(Kind::Float, vec![Value::Float(1.5), Value::Float(1.5)]);
        assert_eq!(mapper.convert(&Value::Float(1.5)).unwrap(), 0.5);
        assert_eq!(mapper.convert(&Value::Float(1.0)).unwrap(), 0.0);
        assert_eq!(mapper.convert(&Value::Float(2.0)).unwrap(), 1.0);
    }

    #[test]
    fn test_float_round_trip() {
        let mapper = fit(
            Kind::Float,
            vec![Value::Float(0.3), Value::Float(2.5), Value::Float(0.75)],
        );
        assert_eq!(mapper.convert(&Value::Float(0.3)).unwrap(), 0.0);
        assert_eq!(mapper.convert(&Value::Float(2.5)).unwrap(), 1.0);
    }

    #[test]
    fn test_float_ticks_are_nice_and_inside_axis() {
        let mapper = fit(
            Kind::Float,
            vec![Value::Float(0.0), Value::Float(1.0)],
        );
        let labels: Vec<&str> = mapper.ticks().iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["0", "0.2", "0.4", "0.6", "0.8", "1"]);
        for tick in mapper.ticks() {
            assert!(tick.position >= 0.0 && tick.position <= 1.0);
        }
    }

    #[test]
    fn test_float_fixed_tick_policy() {
        let column: Vec<Value> = vec![Value::Float(0.0), Value::Float(1.0)];
        let refs: Vec<&Value> = column.iter().collect();
        let mapper = Mapper::fit(Kind::Float, &refs, TickPolicy::Fixed(10)).unwrap();
        assert_eq!(mapper.ticks().len(), 11);
    }

    #[test]
    fn test_float_labels_rounded_to_six_digits() {
        assert_eq!(float_label(0.30000000000000004), "0.3");
        assert_eq!(float_label(1.2345678), "1.234568");
    }

    #[test]
    fn test_kind_mismatch_is_unknown_value() {
        let mapper = fit(Kind::Bool, vec![Value::Bool(true)]);
        assert!(matches!(
            mapper.convert(&Value::Int(1)),
            Err(PlotError::UnknownValue { .. })
        ));
    }
}
