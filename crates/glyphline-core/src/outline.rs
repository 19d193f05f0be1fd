//! Recorded glyph outlines
//!
//! Font backends replay their contours into a [`GlyphOutline`] through the
//! pen methods; the rasterizer reads them back as [`OutlineCommand`]s. Units
//! are whatever the recorder used, which for a [`crate::types::Glyph`] means
//! font design units with y pointing up.

/// A position in outline space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// One drawing command of a contour
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutlineCommand {
    MoveTo(Point),
    LineTo(Point),
    QuadTo(Point, Point),
    CurveTo(Point, Point, Point),
    Close,
}

/// Axis-aligned bounds of every point in an outline, control points included
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x_min: f32,
    pub y_min: f32,
    pub x_max: f32,
    pub y_max: f32,
}

/// Geometry container for a recorded glyph outline
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlyphOutline {
    commands: Vec<OutlineCommand>,
}

impl GlyphOutline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[OutlineCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn move_to(&mut self, x: f32, y: f32) {
        self.commands.push(OutlineCommand::MoveTo(Point::new(x, y)));
    }

    pub fn line_to(&mut self, x: f32, y: f32) {
        self.commands.push(OutlineCommand::LineTo(Point::new(x, y)));
    }

    pub fn quad_to(&mut self, cx: f32, cy: f32, x: f32, y: f32) {
        self.commands
            .push(OutlineCommand::QuadTo(Point::new(cx, cy), Point::new(x, y)));
    }

    pub fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        self.commands.push(OutlineCommand::CurveTo(
            Point::new(cx0, cy0),
            Point::new(cx1, cy1),
            Point::new(x, y),
        ));
    }

    pub fn close(&mut self) {
        self.commands.push(OutlineCommand::Close);
    }

    /// Every point in command order, control points included
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.commands.iter().flat_map(|command| {
            let (points, len): ([Point; 3], usize) = match *command {
                OutlineCommand::MoveTo(p) | OutlineCommand::LineTo(p) => {
                    ([p, p, p], 1)
                },
                OutlineCommand::QuadTo(c, p) => ([c, p, p], 2),
                OutlineCommand::CurveTo(c0, c1, p) => ([c0, c1, p], 3),
                OutlineCommand::Close => ([Point::default(); 3], 0),
            };
            points.into_iter().take(len)
        })
    }

    /// A copy with every point passed through `f`
    pub fn map_points(&self, mut f: impl FnMut(Point) -> Point) -> Self {
        let commands = self
            .commands
            .iter()
            .map(|command| match *command {
                OutlineCommand::MoveTo(p) => OutlineCommand::MoveTo(f(p)),
                OutlineCommand::LineTo(p) => OutlineCommand::LineTo(f(p)),
                OutlineCommand::QuadTo(c, p) => OutlineCommand::QuadTo(f(c), f(p)),
                OutlineCommand::CurveTo(c0, c1, p) => {
                    OutlineCommand::CurveTo(f(c0), f(c1), f(p))
                },
                OutlineCommand::Close => OutlineCommand::Close,
            })
            .collect();
        Self { commands }
    }

    /// Bounds of all points, or `None` for an outline without points
    pub fn bounds(&self) -> Option<Bounds> {
        self.points().fold(None, |acc, p| {
            Some(match acc {
                None => Bounds {
                    x_min: p.x,
                    y_min: p.y,
                    x_max: p.x,
                    y_max: p.y,
                },
                Some(b) => Bounds {
                    x_min: b.x_min.min(p.x),
                    y_min: b.y_min.min(p.y),
                    x_max: b.x_max.max(p.x),
                    y_max: b.y_max.max(p.y),
                },
            })
        })
    }
}
