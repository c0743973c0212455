//! Deterministic per-entity style assignment.
//!
//! Three independent cycles with pairwise-coprime lengths (4 line styles,
//! 15 colors, 13 markers) are each indexed by `index mod length`, so the
//! combined triple only repeats after lcm(4, 15, 13) = 780 entities.

/// Dash pattern of a polyline segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineKind {
    Solid,
    Dashed,
    DashDot,
    Dotted,
}

impl LineKind {
    /// On/off run lengths in pixels; empty means a solid stroke.
    pub fn dash_pattern(self) -> &'static [f64] {
        match self {
            LineKind::Solid => &[],
            LineKind::Dashed => &[8.0, 5.0],
            LineKind::DashDot => &[8.0, 4.0, 2.0, 4.0],
            LineKind::Dotted => &[2.0, 4.0],
        }
    }
}

/// Marker shape drawn at each axis crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    Circle,
    TriangleDown,
    TriangleUp,
    TriangleLeft,
    TriangleRight,
    Square,
    Pentagon,
    Plus,
    Diamond,
    Star,
    Hexagon,
    Cross,
    ThinDiamond,
}

/// The (linestyle, color, marker) triple for one plotted entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlotStyle {
    pub line: LineKind,
    pub color: (u8, u8, u8),
    pub marker: Marker,
}

const LINE_KINDS: [LineKind; 4] = [
    LineKind::Solid,
    LineKind::Dashed,
    LineKind::DashDot,
    LineKind::Dotted,
];

const COLORS: [(u8, u8, u8); 15] = [
    (0, 0, 255),     // blue
    (0, 128, 0),     // green
    (255, 0, 0),     // red
    (0, 191, 191),   // cyan
    (191, 0, 191),   // magenta
    (191, 191, 0),   // yellow
    (0, 0, 0),       // black
    (255, 140, 0),   // dark orange
    (75, 0, 130),    // indigo
    (188, 143, 143), // rosy brown
    (47, 79, 79),    // dark slate grey
    (0, 255, 127),   // spring green
    (184, 134, 11),  // dark goldenrod
    (255, 105, 180), // hot pink
    (219, 112, 147), // pale violet red
];

const MARKERS: [Marker; 13] = [
    Marker::Circle,
    Marker::TriangleDown,
    Marker::TriangleUp,
    Marker::TriangleLeft,
    Marker::TriangleRight,
    Marker::Square,
    Marker::Pentagon,
    Marker::Plus,
    Marker::Diamond,
    Marker::Star,
    Marker::Hexagon,
    Marker::Cross,
    Marker::ThinDiamond,
];

/// Style triple for the `index`-th plotted entity. Pure function of `index`.
pub fn style_for(index: usize) -> PlotStyle {
    PlotStyle {
        line: LINE_KINDS[index % LINE_KINDS.len()],
        color: COLORS[index % COLORS.len()],
        marker: MARKERS[index % MARKERS.len()],
    }
}
