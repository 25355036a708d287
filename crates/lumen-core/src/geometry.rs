use serde::{Deserialize, Serialize};

/// Integer point in screen coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl std::ops::Neg for Point {
    type Output = Point;

    fn neg(self) -> Point {
        Point::new(self.x.saturating_neg(), self.y.saturating_neg())
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x.saturating_sub(rhs.x), self.y.saturating_sub(rhs.y))
    }
}

/// Integer size in pixels. Negative values are legal and mean "nothing to draw".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

/// Screen rectangle, used for the available area
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    pub fn from_parts(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Grow the rectangle by `amount` on every side, saturating at the i32 range
    pub fn inflate(&self, amount: i32) -> Self {
        let grow = 2 * i64::from(amount);
        Self::new(
            self.x.saturating_sub(amount),
            self.y.saturating_sub(amount),
            saturate(i64::from(self.width) + grow),
            saturate(i64::from(self.height) + grow),
        )
    }

    /// Overlap of two rectangles, `None` when they do not overlap
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = (i64::from(self.x) + i64::from(self.width)).min(i64::from(other.x) + i64::from(other.width));
        let bottom = (i64::from(self.y) + i64::from(self.height)).min(i64::from(other.y) + i64::from(other.height));
        if right <= i64::from(left) || bottom <= i64::from(top) {
            return None;
        }
        Some(Rect::new(
            left,
            top,
            saturate(right - i64::from(left)),
            saturate(bottom - i64::from(top)),
        ))
    }
}

pub(crate) fn saturate(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Screen edge a panel is docked to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    Left,
    Top,
    Right,
    #[default]
    Bottom,
}

impl Edge {
    /// Map the `Position` config index. Unknown indices land on the bottom edge.
    pub fn from_index(index: i64) -> Self {
        match index {
            0 => Edge::Left,
            1 => Edge::Top,
            2 => Edge::Right,
            _ => Edge::Bottom,
        }
    }

    pub fn is_vertical(&self) -> bool {
        matches!(self, Edge::Left | Edge::Right)
    }

    /// Location value for the slide-in hint
    pub fn slide_location(&self) -> u8 {
        match self {
            Edge::Left => 0,
            Edge::Top => 1,
            Edge::Right => 2,
            Edge::Bottom => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Edge::Left => "left",
            Edge::Top => "top",
            Edge::Right => "right",
            Edge::Bottom => "bottom",
        }
    }

    /// Thickness of the strip a panel of `size` occupies along this edge
    pub fn strut_thickness(&self, size: Size) -> i32 {
        if self.is_vertical() {
            size.width.max(0)
        } else {
            size.height.max(0)
        }
    }
}

/// A width or height: a percentage of the available area or an absolute pixel count
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Dimension {
    Percent(f64),
    Pixels(i32),
}

impl Dimension {
    /// Parse `"50"`, `"12.5"` or `"120px"`. Never fails: unparsable text is zero.
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        match text.strip_suffix("px") {
            Some(number) => Dimension::Pixels(number.trim().parse::<i32>().unwrap_or(0)),
            None => Dimension::Percent(text.parse::<f64>().unwrap_or(0.0)),
        }
    }

    /// Resolve against the matching extent of the available area
    pub fn resolve(&self, extent: i32) -> i32 {
        match *self {
            Dimension::Pixels(px) => px,
            Dimension::Percent(pct) => percent_of(extent, pct),
        }
    }
}

impl Default for Dimension {
    fn default() -> Self {
        Dimension::Percent(0.0)
    }
}

/// `extent * pct / 100`, truncated toward zero and saturated to the i32 range
fn percent_of(extent: i32, pct: f64) -> i32 {
    let value = f64::from(extent) * (pct / 100.0);
    if value.is_nan() {
        0
    } else {
        value as i32
    }
}

/// Percent offsets from each screen side. Not clamped: negative or >100 is honored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Offsets {
    pub top: f64,
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
}

/// Everything the geometry engine needs to place a panel
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PanelRequest {
    pub width: Dimension,
    pub height: Dimension,
    pub edge: Edge,
    pub offsets: Offsets,
}

/// Resolved panel geometry in screen coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct PanelGeometry {
    pub size: Size,
    pub origin: Point,
}

impl PanelGeometry {
    pub fn rect(&self) -> Rect {
        Rect::from_parts(self.origin, self.size)
    }
}

/// Compute a panel's size and origin for the given available area.
///
/// Pure and total. Left/Top panels use their offsets as direct additions from
/// the top-left corner, Right panels subtract from the right side, and every
/// other edge is placed from the bottom. The per-edge sign convention matters
/// for existing configurations and is not unified.
pub fn recompute_geometry(area: Rect, request: &PanelRequest) -> PanelGeometry {
    let size = Size::new(request.width.resolve(area.width), request.height.resolve(area.height));

    let from_left = percent_of(area.width, request.offsets.left);
    let from_top = percent_of(area.height, request.offsets.top);

    // Far-side placement in i64: extreme sizes and offsets saturate instead of overflowing
    let from_far = |extent: i32, size: i32, pct: f64| {
        saturate(i64::from(extent) - i64::from(size) - i64::from(percent_of(extent, pct)))
    };

    let origin = match request.edge {
        Edge::Left | Edge::Top => Point::new(from_left, from_top),
        Edge::Right => Point::new(
            from_far(area.width, size.width, request.offsets.right),
            from_top,
        ),
        Edge::Bottom => Point::new(
            from_left,
            from_far(area.height, size.height, request.offsets.bottom),
        ),
    };

    PanelGeometry { size, origin }
}
