use serde::Deserialize;

use crate::data::Dataset;
use crate::error::PlotError;
use crate::graph::{AxisSurface, LegendEntry, PngSurface};
use crate::mapping::{Mapper, Tick, TickPolicy};
use crate::style::style_for;
use crate::validate::validate;

/// Rendering options for one plot request.
#[derive(Debug, Clone, Deserialize)]
pub struct PlotOptions {
    #[serde(default)]
    pub legend: bool,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub ylabel: Option<String>,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_markersize")]
    pub markersize: u32,
    #[serde(default)]
    pub tick_policy: TickPolicy,
}

fn default_width() -> u32 {
    640
}
fn default_height() -> u32 {
    480
}
fn default_markersize() -> u32 {
    15
}

impl Default for PlotOptions {
    fn default() -> Self {
        PlotOptions {
            legend: false,
            title: None,
            ylabel: None,
            width: 640,
            height: 480,
            markersize: 15,
            tick_policy: TickPolicy::Auto,
        }
    }
}

/// Tick metadata of one rendered axis.
#[derive(Debug, Clone)]
pub struct AxisLayout {
    pub header: String,
    pub ticks: Vec<Tick>,
}

/// Everything the orchestrator computed for a plot: per-axis ticks and the
/// normalized [0,1] series per entity, in insertion order.
#[derive(Debug, Clone)]
pub struct PlotLayout {
    pub axes: Vec<AxisLayout>,
    pub series: Vec<(String, Vec<f64>)>,
}

/// A finished plot: the encoded PNG plus the layout that produced it.
#[derive(Debug, Clone)]
pub struct PlotHandle {
    pub png: Vec<u8>,
    pub layout: PlotLayout,
}

/// Render a parallel coordinate plot of `data` to PNG.
///
/// Each call owns its canvas and mappers outright; no state survives between
/// calls, so callers may invoke this from multiple threads without added
/// synchronization.
pub fn plot(data: &Dataset, options: &PlotOptions) -> Result<PlotHandle, PlotError> {
    let mut surface = PngSurface::new(options.width, options.height);
    let layout = plot_on(data, options, &mut surface)?;
    let png = surface.finish()?;
    Ok(PlotHandle { png, layout })
}

/// Validate, fit per-column mappers, and drive `surface` with the result.
///
/// Validation and mapping complete before the first surface call, so a
/// failing dataset never produces a partially drawn plot.
pub fn plot_on(
    data: &Dataset,
    options: &PlotOptions,
    surface: &mut dyn AxisSurface,
) -> Result<PlotLayout, PlotError> {
    let kinds = validate(data)?;
    if kinds.len() < 2 {
        return Err(PlotError::TooFewAxes(kinds.len()));
    }

    let mut mappers = Vec::with_capacity(kinds.len());
    for (index, kind) in kinds.iter().enumerate() {
        let column = data.column(index);
        mappers.push(Mapper::fit(*kind, &column, options.tick_policy)?);
    }

    let mut series = Vec::with_capacity(data.len());
    for (label, row) in data.entities() {
        let mut normalized = Vec::with_capacity(row.len());
        for (index, value) in row.iter().enumerate() {
            normalized.push(mappers[index].convert(value)?);
        }
        series.push((label.to_string(), normalized));
    }

    surface.begin(data.headers.len())?;
    for (index, header) in data.headers.iter().enumerate() {
        surface.set_axis_title(index, header)?;
        surface.set_axis_ticks(index, mappers[index].ticks())?;
    }

    for (entity_index, (label, normalized)) in series.iter().enumerate() {
        let style = style_for(entity_index);
        for axis in 0..normalized.len() - 1 {
            surface.draw_segment(
                axis,
                label,
                normalized[axis],
                normalized[axis + 1],
                &style,
                options.markersize,
            )?;
        }
    }

    if let Some(title) = &options.title {
        surface.set_title(title)?;
    }
    if let Some(ylabel) = &options.ylabel {
        surface.set_ylabel(ylabel)?;
    }
    if options.legend {
        let entries: Vec<LegendEntry> = series
            .iter()
            .enumerate()
            .map(|(index, (label, _))| LegendEntry {
                label: label.clone(),
                style: style_for(index),
            })
            .collect();
        surface.attach_legend(&entries)?;
    }

    let axes = data
        .headers
        .iter()
        .zip(&mappers)
        .map(|(header, mapper)| AxisLayout {
            header: header.clone(),
            ticks: mapper.ticks().to_vec(),
        })
        .collect();

    Ok(PlotLayout { axes, series })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Value;
    use crate::graph::RecordingSurface;

    fn cow_pig() -> Dataset {
        let mut data = Dataset::new(vec!["legs", "colour"]);
        data.insert("cow", vec![Value::Int(4), Value::Str("white".into())]);
        data.insert("pig", vec![Value::Int(4), Value::Str("pink".into())]);
        data
    }

    #[test]
    fn test_orchestrator_normalizes_cow_pig() {
        let mut surface = RecordingSurface::default();
        let layout = plot_on(&cow_pig(), &PlotOptions::default(), &mut surface).unwrap();

        // Degenerate integer column centers both entities; colours rank
        // alphabetically with pink below white.
        assert_eq!(layout.series[0], ("cow".to_string(), vec![0.5, 1.0]));
        assert_eq!(layout.series[1], ("pig".to_string(), vec![0.5, 0.0]));
        assert_eq!(surface.axes, 2);
        assert_eq!(surface.axis_titles, vec!["legs", "colour"]);
        assert_eq!(surface.segments.len(), 2);
    }

    #[test]
    fn test_orchestrator_rejects_single_axis() {
        let mut data = Dataset::new(vec!["legs"]);
        data.insert("cow", vec![Value::Int(4)]);
        let mut surface = RecordingSurface::default();

        let err = plot_on(&data, &PlotOptions::default(), &mut surface).unwrap_err();
        assert!(matches!(err, PlotError::TooFewAxes(1)));
        // Validation fails before the surface sees anything.
        assert_eq!(surface.axes, 0);
        assert!(surface.segments.is_empty());
    }

    #[test]
    fn test_orchestrator_styles_follow_insertion_order() {
        let mut forward = RecordingSurface::default();
        plot_on(&cow_pig(), &PlotOptions::default(), &mut forward).unwrap();

        let mut reversed_data = Dataset::new(vec!["legs", "colour"]);
        reversed_data.insert("pig", vec![Value::Int(4), Value::Str("pink".into())]);
        reversed_data.insert("cow", vec![Value::Int(4), Value::Str("white".into())]);
        let mut reversed = RecordingSurface::default();
        plot_on(&reversed_data, &PlotOptions::default(), &mut reversed).unwrap();

        let style_of = |surface: &RecordingSurface, label: &str| {
            surface
                .segments
                .iter()
                .find(|(_, l, ..)| l == label)
                .map(|(.., style)| *style)
                .unwrap()
        };
        assert_eq!(style_of(&forward, "cow"), style_of(&reversed, "pig"));
        assert_ne!(style_of(&forward, "cow"), style_of(&reversed, "cow"));
    }

    #[test]
    fn test_orchestrator_legend_lists_entities_in_order() {
        let options = PlotOptions {
            legend: true,
            ..PlotOptions::default()
        };
        let mut surface = RecordingSurface::default();
        plot_on(&cow_pig(), &options, &mut surface).unwrap();
        assert_eq!(surface.legend, vec!["cow", "pig"]);
    }

    #[test]
    fn test_single_entity_single_category_does_not_panic() {
        let mut data = Dataset::new(vec!["colour", "height"]);
        data.insert("cow", vec![Value::Str("white".into()), Value::Float(1.575)]);

        let mut surface = RecordingSurface::default();
        let layout = plot_on(&data, &PlotOptions::default(), &mut surface).unwrap();

        // Sole category pins to 0.0; the constant float column centers.
        assert_eq!(layout.series[0].1, vec![0.0, 0.5]);
        assert_eq!(surface.axis_ticks[0].len(), 1);
        assert_eq!(surface.axis_ticks[0][0].position, 0.0);
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: PlotOptions = serde_json::from_str(r#"{"legend": true}"#).unwrap();
        assert!(options.legend);
        assert_eq!(options.width, 640);
        assert_eq!(options.height, 480);
        assert_eq!(options.markersize, 15);
        assert_eq!(options.tick_policy, TickPolicy::Auto);
    }
}
