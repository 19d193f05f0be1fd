//! Edges: the line segments a flattened outline is made of
//!
//! Sampling happens at row centres (`y + 0.5`). An edge owns the half-open
//! range of rows whose centre lies in `[y_start, y_end)`, so two edges
//! meeting at a vertex never both claim the same centre.

use glyphline_core::fixed::F26Dot6;

/// Index of the first row or column whose centre is at or after `v`
#[inline]
pub fn first_center_at_or_after(v: F26Dot6) -> i32 {
    // ceil((v - 0.5) / 1) in 1/64ths
    (v.raw() + 31).div_euclid(64)
}

/// A non-horizontal segment, stored top to bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    x_start: F26Dot6,
    y_start: F26Dot6,
    x_end: F26Dot6,
    y_end: F26Dot6,
    /// +1 when the original segment ran downwards, -1 when upwards
    pub direction: i8,
    /// First row this edge crosses (inclusive)
    pub y_min: i32,
    /// Last row this edge crosses (inclusive)
    pub y_max: i32,
}

impl Edge {
    /// An edge from `(x1, y1)` to `(x2, y2)`
    ///
    /// `None` for horizontal segments and for segments too short to cross
    /// any row centre.
    pub fn new(x1: F26Dot6, y1: F26Dot6, x2: F26Dot6, y2: F26Dot6) -> Option<Self> {
        if y1 == y2 {
            return None;
        }

        let (x_start, y_start, x_end, y_end, direction) = if y2 > y1 {
            (x1, y1, x2, y2, 1i8)
        } else {
            (x2, y2, x1, y1, -1i8)
        };

        let y_min = first_center_at_or_after(y_start);
        let y_max = first_center_at_or_after(y_end) - 1;
        if y_min > y_max {
            return None;
        }

        Some(Self {
            x_start,
            y_start,
            x_end,
            y_end,
            direction,
            y_min,
            y_max,
        })
    }

    /// X where this edge crosses the centre of `row`
    ///
    /// Computed from the end points each time, so long edges do not drift.
    pub fn x_at(&self, row: i32) -> F26Dot6 {
        let center = row as i64 * 64 + 32;
        let dy = (self.y_end.raw() - self.y_start.raw()) as i64;
        let dx = (self.x_end.raw() - self.x_start.raw()) as i64;
        let t = center - self.y_start.raw() as i64;
        let x = self.x_start.raw() as i64 + (dx * t).div_euclid(dy);
        F26Dot6::from_raw(x as i32)
    }

    #[inline]
    pub fn is_active(&self, row: i32) -> bool {
        row >= self.y_min && row <= self.y_max
    }
}

/// An edge paired with its crossing for the current row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crossing {
    pub x: F26Dot6,
    pub direction: i8,
}

/// Edges bucketed by the row they start on, plus the active set
#[derive(Debug, Clone, Default)]
pub struct EdgeTable {
    buckets: Vec<Vec<Edge>>,
    active: Vec<Edge>,
    crossings: Vec<Crossing>,
}

impl EdgeTable {
    pub fn new(rows: usize) -> Self {
        Self {
            buckets: vec![Vec::new(); rows],
            active: Vec::with_capacity(32),
            crossings: Vec::with_capacity(32),
        }
    }

    pub fn rows(&self) -> usize {
        self.buckets.len()
    }

    /// File `edge` under its first visible row; edges entirely outside the
    /// table are dropped
    pub fn insert(&mut self, edge: Edge) {
        let rows = self.buckets.len() as i32;
        if edge.y_max < 0 || edge.y_min >= rows {
            return;
        }
        let row = edge.y_min.max(0) as usize;
        if let Some(bucket) = self.buckets.get_mut(row) {
            bucket.push(edge);
        }
    }

    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(Vec::is_empty)
    }

    /// Activate the edges starting on `row`, retire finished ones, and
    /// return every crossing on `row` sorted left to right
    ///
    /// Rows must be visited in increasing order.
    pub fn crossings(&mut self, row: i32) -> &[Crossing] {
        if let Some(bucket) = usize::try_from(row).ok().and_then(|r| self.buckets.get_mut(r)) {
            self.active.append(bucket);
        }
        self.active.retain(|edge| edge.y_max >= row);

        self.crossings.clear();
        self.crossings.extend(self.active.iter().map(|edge| Crossing {
            x: edge.x_at(row),
            direction: edge.direction,
        }));
        self.crossings.sort_by_key(|c| c.x);
        &self.crossings
    }

    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.active.clear();
        self.crossings.clear();
    }
}
