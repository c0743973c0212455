//! Rendering collaborators for parallel coordinate plots.
//!
//! The orchestrator only talks to the [`AxisSurface`] trait, so the mapping
//! core can be exercised in tests with [`RecordingSurface`] while production
//! calls go through the plotters-backed [`PngSurface`].

use image::ImageEncoder;
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontTransform;

use crate::error::PlotError;
use crate::mapping::Tick;
use crate::style::{Marker, PlotStyle};

/// One legend row: an entity label with the style its lines carry.
#[derive(Debug, Clone)]
pub struct LegendEntry {
    pub label: String,
    pub style: PlotStyle,
}

/// The drawing capabilities a parallel coordinate plot needs.
///
/// Axis indices run 0..H-1 left to right; segment `axis` is the left axis of
/// the inter-axis gap being drawn. All y coordinates are normalized [0,1].
pub trait AxisSurface {
    fn begin(&mut self, axes: usize) -> Result<(), PlotError>;
    fn set_axis_title(&mut self, axis: usize, title: &str) -> Result<(), PlotError>;
    fn set_axis_ticks(&mut self, axis: usize, ticks: &[Tick]) -> Result<(), PlotError>;
    fn draw_segment(
        &mut self,
        axis: usize,
        label: &str,
        y0: f64,
        y1: f64,
        style: &PlotStyle,
        markersize: u32,
    ) -> Result<(), PlotError>;
    fn set_title(&mut self, title: &str) -> Result<(), PlotError>;
    fn set_ylabel(&mut self, text: &str) -> Result<(), PlotError>;
    fn attach_legend(&mut self, entries: &[LegendEntry]) -> Result<(), PlotError>;
}

struct Segment {
    axis: usize,
    y0: f64,
    y1: f64,
    style: PlotStyle,
    markersize: u32,
}

/// Buffered plotters surface that encodes to PNG on [`PngSurface::finish`].
///
/// Commands are collected first and replayed against a `BitMapBackend` in one
/// pass; the buffer is owned per instance, so independent plots never share
/// canvas state.
pub struct PngSurface {
    width: u32,
    height: u32,
    axes: usize,
    axis_titles: Vec<String>,
    axis_ticks: Vec<Vec<Tick>>,
    segments: Vec<Segment>,
    title: Option<String>,
    ylabel: Option<String>,
    legend: Option<Vec<LegendEntry>>,
}

impl PngSurface {
    pub fn new(width: u32, height: u32) -> Self {
        PngSurface {
            width,
            height,
            axes: 0,
            axis_titles: Vec::new(),
            axis_ticks: Vec::new(),
            segments: Vec::new(),
            title: None,
            ylabel: None,
            legend: None,
        }
    }

    /// Draw every buffered command and encode the canvas as PNG.
    pub fn finish(self) -> Result<Vec<u8>, PlotError> {
        if self.axes < 2 {
            return Err(PlotError::TooFewAxes(self.axes));
        }

        let mut buffer = vec![0u8; (self.width * self.height * 3) as usize];
        self.draw(&mut buffer)?;

        let mut png_bytes = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
        encoder
            .write_image(&buffer, self.width, self.height, image::ColorType::Rgb8)
            .map_err(|e| PlotError::Render(format!("Failed to encode PNG: {}", e)))?;

        Ok(png_bytes)
    }

    fn draw(&self, buffer: &mut [u8]) -> Result<(), PlotError> {
        let root = BitMapBackend::with_buffer(buffer, (self.width, self.height))
            .into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let x_max = (self.axes - 1) as f64;
        let chart = ChartBuilder::on(&root)
            .margin(10)
            .caption(self.title.as_deref().unwrap_or(""), ("sans-serif", 20))
            .x_label_area_size(30)
            .y_label_area_size(55)
            .right_y_label_area_size(55)
            .build_cartesian_2d(0.0..x_max, 0.0..1.0)
            .map_err(render_err)?;

        self.draw_axes(&root, &chart)?;
        for segment in &self.segments {
            self.draw_one_segment(&root, &chart, segment)?;
        }
        if let Some(text) = &self.ylabel {
            let style = ("sans-serif", 14)
                .into_font()
                .transform(FontTransform::Rotate270)
                .color(&BLACK)
                .pos(Pos::new(HPos::Center, VPos::Center));
            root.draw(&Text::new(text.clone(), (14, (self.height / 2) as i32), style))
                .map_err(render_err)?;
        }
        if let Some(entries) = &self.legend {
            self.draw_legend(&root, &chart, entries)?;
        }

        root.present().map_err(render_err)?;
        Ok(())
    }

    fn draw_axes(
        &self,
        root: &DrawingArea<BitMapBackend, Shift>,
        chart: &ChartContext<BitMapBackend, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    ) -> Result<(), PlotError> {
        let label_font = ("sans-serif", 12).into_font().color(&BLACK);
        let last = self.axes - 1;

        for axis in 0..self.axes {
            let x = axis as f64;
            let top = chart.backend_coord(&(x, 1.0));
            let bottom = chart.backend_coord(&(x, 0.0));

            root.draw(&PathElement::new(vec![top, bottom], BLACK.stroke_width(1)))
                .map_err(render_err)?;

            // Interior tick labels sit left of the axis; the last axis is
            // mirrored with its labels on the right.
            let mirrored = axis == last;
            let anchor = if mirrored {
                Pos::new(HPos::Left, VPos::Bottom)
            } else {
                Pos::new(HPos::Right, VPos::Bottom)
            };
            let text_style = label_font.clone().pos(anchor);

            for tick in &self.axis_ticks[axis] {
                let at = chart.backend_coord(&(x, tick.position));
                let (mark_dx, text_dx) = if mirrored { (4, 6) } else { (-4, -6) };
                root.draw(&PathElement::new(
                    vec![at, (at.0 + mark_dx, at.1)],
                    BLACK.stroke_width(1),
                ))
                .map_err(render_err)?;
                root.draw(&Text::new(
                    tick.label.clone(),
                    (at.0 + text_dx, at.1),
                    text_style.clone(),
                ))
                .map_err(render_err)?;
            }

            if let Some(title) = self.axis_titles.get(axis) {
                let at = chart.backend_coord(&(x, 0.0));
                let title_style = label_font
                    .clone()
                    .pos(Pos::new(HPos::Center, VPos::Top));
                root.draw(&Text::new(title.clone(), (at.0, at.1 + 8), title_style))
                    .map_err(render_err)?;
            }
        }
        Ok(())
    }

    fn draw_one_segment(
        &self,
        root: &DrawingArea<BitMapBackend, Shift>,
        chart: &ChartContext<BitMapBackend, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
        segment: &Segment,
    ) -> Result<(), PlotError> {
        let color = rgb(segment.style.color);
        let p0 = chart.backend_coord(&(segment.axis as f64, segment.y0));
        let p1 = chart.backend_coord(&((segment.axis + 1) as f64, segment.y1));

        for (a, b) in dash_segments(p0, p1, segment.style.line.dash_pattern()) {
            root.draw(&PathElement::new(vec![a, b], color.stroke_width(1)))
                .map_err(render_err)?;
        }

        let radius = (segment.markersize / 2).max(2) as i32;
        draw_marker(root, p0, segment.style.marker, radius, color)?;
        draw_marker(root, p1, segment.style.marker, radius, color)?;
        Ok(())
    }

    fn draw_legend(
        &self,
        root: &DrawingArea<BitMapBackend, Shift>,
        chart: &ChartContext<BitMapBackend, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
        entries: &[LegendEntry],
    ) -> Result<(), PlotError> {
        // Anchor on the third-from-last axis, matching the usual placement
        // that keeps the box clear of the mirrored right-hand labels.
        let anchor_axis = self.axes.saturating_sub(3);
        let origin = chart.backend_coord(&(anchor_axis as f64, 1.0));
        let (x0, y0) = (origin.0 + 8, origin.1 + 8);

        let row_height = 18;
        let sample_width = 24;
        let box_width = sample_width
            + 12
            + entries
                .iter()
                .map(|e| e.label.len() as i32 * 7)
                .max()
                .unwrap_or(0);
        let box_height = row_height * entries.len() as i32 + 8;

        root.draw(&Rectangle::new(
            [(x0, y0), (x0 + box_width, y0 + box_height)],
            WHITE.filled(),
        ))
        .map_err(render_err)?;
        root.draw(&Rectangle::new(
            [(x0, y0), (x0 + box_width, y0 + box_height)],
            BLACK.stroke_width(1),
        ))
        .map_err(render_err)?;

        let text_style = ("sans-serif", 12)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Left, VPos::Center));

        for (row, entry) in entries.iter().enumerate() {
            let y = y0 + 4 + row_height * row as i32 + row_height / 2;
            let color = rgb(entry.style.color);
            for (a, b) in dash_segments(
                (x0 + 4, y),
                (x0 + 4 + sample_width, y),
                entry.style.line.dash_pattern(),
            ) {
                root.draw(&PathElement::new(vec![a, b], color.stroke_width(1)))
                    .map_err(render_err)?;
            }
            draw_marker(
                root,
                (x0 + 4 + sample_width / 2, y),
                entry.style.marker,
                4,
                color,
            )?;
            root.draw(&Text::new(
                entry.label.clone(),
                (x0 + sample_width + 10, y),
                text_style.clone(),
            ))
            .map_err(render_err)?;
        }
        Ok(())
    }
}

impl AxisSurface for PngSurface {
    fn begin(&mut self, axes: usize) -> Result<(), PlotError> {
        self.axes = axes;
        self.axis_titles = vec![String::new(); axes];
        self.axis_ticks = vec![Vec::new(); axes];
        Ok(())
    }

    fn set_axis_title(&mut self, axis: usize, title: &str) -> Result<(), PlotError> {
        self.axis_titles[axis] = title.to_string();
        Ok(())
    }

    fn set_axis_ticks(&mut self, axis: usize, ticks: &[Tick]) -> Result<(), PlotError> {
        self.axis_ticks[axis] = ticks.to_vec();
        Ok(())
    }

    fn draw_segment(
        &mut self,
        axis: usize,
        _label: &str,
        y0: f64,
        y1: f64,
        style: &PlotStyle,
        markersize: u32,
    ) -> Result<(), PlotError> {
        self.segments.push(Segment {
            axis,
            y0,
            y1,
            style: *style,
            markersize,
        });
        Ok(())
    }

    fn set_title(&mut self, title: &str) -> Result<(), PlotError> {
        self.title = Some(title.to_string());
        Ok(())
    }

    fn set_ylabel(&mut self, text: &str) -> Result<(), PlotError> {
        self.ylabel = Some(text.to_string());
        Ok(())
    }

    fn attach_legend(&mut self, entries: &[LegendEntry]) -> Result<(), PlotError> {
        self.legend = Some(entries.to_vec());
        Ok(())
    }
}

/// Test surface that records every call instead of drawing.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub axes: usize,
    pub axis_titles: Vec<String>,
    pub axis_ticks: Vec<Vec<Tick>>,
    /// (axis, entity label, y0, y1, style) per drawn segment.
    pub segments: Vec<(usize, String, f64, f64, PlotStyle)>,
    pub title: Option<String>,
    pub ylabel: Option<String>,
    pub legend: Vec<String>,
}

impl AxisSurface for RecordingSurface {
    fn begin(&mut self, axes: usize) -> Result<(), PlotError> {
        self.axes = axes;
        self.axis_titles = vec![String::new(); axes];
        self.axis_ticks = vec![Vec::new(); axes];
        Ok(())
    }

    fn set_axis_title(&mut self, axis: usize, title: &str) -> Result<(), PlotError> {
        self.axis_titles[axis] = title.to_string();
        Ok(())
    }

    fn set_axis_ticks(&mut self, axis: usize, ticks: &[Tick]) -> Result<(), PlotError> {
        self.axis_ticks[axis] = ticks.to_vec();
        Ok(())
    }

    fn draw_segment(
        &mut self,
        axis: usize,
        label: &str,
        y0: f64,
        y1: f64,
        style: &PlotStyle,
        _markersize: u32,
    ) -> Result<(), PlotError> {
        self.segments
            .push((axis, label.to_string(), y0, y1, *style));
        Ok(())
    }

    fn set_title(&mut self, title: &str) -> Result<(), PlotError> {
        self.title = Some(title.to_string());
        Ok(())
    }

    fn set_ylabel(&mut self, text: &str) -> Result<(), PlotError> {
        self.ylabel = Some(text.to_string());
        Ok(())
    }

    fn attach_legend(&mut self, entries: &[LegendEntry]) -> Result<(), PlotError> {
        self.legend = entries.iter().map(|e| e.label.clone()).collect();
        Ok(())
    }
}

fn render_err<E: std::fmt::Display>(e: E) -> PlotError {
    PlotError::Render(e.to_string())
}

fn rgb((r, g, b): (u8, u8, u8)) -> RGBColor {
    RGBColor(r, g, b)
}

/// Split a pixel-space line into on-runs of the dash pattern. An empty
/// pattern yields the whole line.
fn dash_segments(
    p0: (i32, i32),
    p1: (i32, i32),
    pattern: &[f64],
) -> Vec<((i32, i32), (i32, i32))> {
    if pattern.is_empty() {
        return vec![(p0, p1)];
    }

    let dx = (p1.0 - p0.0) as f64;
    let dy = (p1.1 - p0.1) as f64;
    let length = dx.hypot(dy);
    if length == 0.0 {
        return vec![(p0, p1)];
    }
    let (ux, uy) = (dx / length, dy / length);

    let at = |t: f64| {
        (
            (p0.0 as f64 + ux * t).round() as i32,
            (p0.1 as f64 + uy * t).round() as i32,
        )
    };

    let mut out = Vec::new();
    let mut t = 0.0;
    let mut i = 0;
    let mut pen_down = true;
    while t < length {
        let run = pattern[i % pattern.len()].min(length - t);
        if pen_down {
            out.push((at(t), at(t + run)));
        }
        t += pattern[i % pattern.len()];
        pen_down = !pen_down;
        i += 1;
    }
    out
}

/// Draw an open (outline only) marker centered at `center` in pixel space.
fn draw_marker(
    root: &DrawingArea<BitMapBackend, Shift>,
    center: (i32, i32),
    marker: Marker,
    radius: i32,
    color: RGBColor,
) -> Result<(), PlotError> {
    let style = color.stroke_width(1);
    match marker {
        Marker::Circle => {
            root.draw(&Circle::new(center, radius, style))
                .map_err(render_err)?;
        }
        Marker::Plus => {
            draw_path(root, axis_cross(center, radius, false), style)?;
        }
        Marker::Cross => {
            draw_path(root, axis_cross(center, radius, true), style)?;
        }
        other => {
            let vertices = marker_vertices(other, center, radius);
            for path in vertices {
                root.draw(&PathElement::new(path, style))
                    .map_err(render_err)?;
            }
        }
    }
    Ok(())
}

fn draw_path(
    root: &DrawingArea<BitMapBackend, Shift>,
    paths: Vec<Vec<(i32, i32)>>,
    style: ShapeStyle,
) -> Result<(), PlotError> {
    for path in paths {
        root.draw(&PathElement::new(path, style))
            .map_err(render_err)?;
    }
    Ok(())
}

fn axis_cross((cx, cy): (i32, i32), r: i32, diagonal: bool) -> Vec<Vec<(i32, i32)>> {
    if diagonal {
        vec![
            vec![(cx - r, cy - r), (cx + r, cy + r)],
            vec![(cx - r, cy + r), (cx + r, cy - r)],
        ]
    } else {
        vec![
            vec![(cx - r, cy), (cx + r, cy)],
            vec![(cx, cy - r), (cx, cy + r)],
        ]
    }
}

fn marker_vertices(marker: Marker, center: (i32, i32), r: i32) -> Vec<Vec<(i32, i32)>> {
    let (cx, cy) = center;
    let closed = |mut pts: Vec<(i32, i32)>| {
        if let Some(&first) = pts.first() {
            pts.push(first);
        }
        vec![pts]
    };

    match marker {
        Marker::TriangleUp => closed(vec![(cx, cy - r), (cx + r, cy + r), (cx - r, cy + r)]),
        Marker::TriangleDown => closed(vec![(cx, cy + r), (cx + r, cy - r), (cx - r, cy - r)]),
        Marker::TriangleLeft => closed(vec![(cx - r, cy), (cx + r, cy - r), (cx + r, cy + r)]),
        Marker::TriangleRight => closed(vec![(cx + r, cy), (cx - r, cy - r), (cx - r, cy + r)]),
        Marker::Square => closed(vec![
            (cx - r, cy - r),
            (cx + r, cy - r),
            (cx + r, cy + r),
            (cx - r, cy + r),
        ]),
        Marker::Diamond => closed(vec![(cx, cy - r), (cx + r, cy), (cx, cy + r), (cx - r, cy)]),
        Marker::ThinDiamond => closed(vec![
            (cx, cy - r),
            (cx + r / 2, cy),
            (cx, cy + r),
            (cx - r / 2, cy),
        ]),
        Marker::Pentagon => closed(ring(center, r, 5, None)),
        Marker::Hexagon => closed(ring(center, r, 6, None)),
        Marker::Star => closed(ring(center, r, 10, Some(0.45))),
        // Circle, Plus and Cross are handled before dispatch reaches here.
        _ => Vec::new(),
    }
}

/// Vertices of a regular polygon (or star when `inner` alternates radii),
/// starting from the top point.
fn ring((cx, cy): (i32, i32), r: i32, n: usize, inner: Option<f64>) -> Vec<(i32, i32)> {
    (0..n)
        .map(|i| {
            let angle = std::f64::consts::PI * (2.0 * i as f64 / n as f64 - 0.5);
            let scale = match inner {
                Some(factor) if i % 2 == 1 => factor,
                _ => 1.0,
            };
            let radius = r as f64 * scale;
            (
                cx + (radius * angle.cos()).round() as i32,
                cy + (radius * angle.sin()).round() as i32,
            )
        })
        .collect()
}
