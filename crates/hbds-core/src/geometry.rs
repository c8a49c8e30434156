//! Outline paths and extruded body geometry
//!
//! The card body is a rounded rectangle: four straight edges joined by
//! quadratic corner curves whose control point is the sharp corner. The path
//! is sampled into a closed polygon, which is then extruded along +Z into a
//! triangle mesh for rendering and line loops for the border.

use glam::{Vec2, Vec3};

/// One segment of a 2D outline path
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    Line { from: Vec2, to: Vec2 },
    Quadratic { from: Vec2, control: Vec2, to: Vec2 },
}

impl PathSegment {
    pub fn start(&self) -> Vec2 {
        match *self {
            PathSegment::Line { from, .. } | PathSegment::Quadratic { from, .. } => from,
        }
    }

    pub fn end(&self) -> Vec2 {
        match *self {
            PathSegment::Line { to, .. } | PathSegment::Quadratic { to, .. } => to,
        }
    }

    /// Point at parameter `t` in 0.0-1.0
    pub fn point_at(&self, t: f32) -> Vec2 {
        match *self {
            PathSegment::Line { from, to } => from.lerp(to, t),
            PathSegment::Quadratic { from, control, to } => {
                let u = 1.0 - t;
                from * (u * u) + control * (2.0 * u * t) + to * (t * t)
            }
        }
    }
}

/// Closed 2D outline made of connected segments
#[derive(Debug, Clone, PartialEq)]
pub struct Outline {
    pub segments: Vec<PathSegment>,
}

impl Outline {
    /// Rounded rectangle centred on the origin
    ///
    /// The radius is clamped to `[0, min(w, h) / 2]` so corners never overlap.
    pub fn rounded_rect(width: f32, height: f32, radius: f32) -> Self {
        let r = radius.max(0.0).min(width.min(height) / 2.0);
        let x = -width / 2.0;
        let y = -height / 2.0;
        let (w, h) = (width, height);

        let p = Vec2::new;
        let segments = vec![
            PathSegment::Line { from: p(x, y + r), to: p(x, y + h - r) },
            PathSegment::Quadratic { from: p(x, y + h - r), control: p(x, y + h), to: p(x + r, y + h) },
            PathSegment::Line { from: p(x + r, y + h), to: p(x + w - r, y + h) },
            PathSegment::Quadratic { from: p(x + w - r, y + h), control: p(x + w, y + h), to: p(x + w, y + h - r) },
            PathSegment::Line { from: p(x + w, y + h - r), to: p(x + w, y + r) },
            PathSegment::Quadratic { from: p(x + w, y + r), control: p(x + w, y), to: p(x + w - r, y) },
            PathSegment::Line { from: p(x + w - r, y), to: p(x + r, y) },
            PathSegment::Quadratic { from: p(x + r, y), control: p(x, y), to: p(x, y + r) },
        ];

        Self { segments }
    }

    /// Sample the outline into a closed polygon (first point not repeated)
    ///
    /// Lines contribute their start point; curves contribute `curve_divisions`
    /// points. Consecutive duplicates (zero-length segments from a zero
    /// radius) are dropped.
    pub fn sample(&self, curve_divisions: usize) -> Vec<Vec2> {
        let divisions = curve_divisions.max(1);
        let mut points: Vec<Vec2> = Vec::new();

        let mut push = |point: Vec2| {
            if points.last().map_or(true, |last| last.distance_squared(point) > 1e-12) {
                points.push(point);
            }
        };

        for segment in &self.segments {
            match segment {
                PathSegment::Line { from, .. } => push(*from),
                PathSegment::Quadratic { .. } => {
                    for i in 0..divisions {
                        push(segment.point_at(i as f32 / divisions as f32));
                    }
                }
            }
        }

        if points.len() > 1 && points[0].distance_squared(points[points.len() - 1]) <= 1e-12 {
            points.pop();
        }
        points
    }

    /// Whether each segment starts where the previous one ended
    pub fn is_closed(&self) -> bool {
        if self.segments.is_empty() {
            return false;
        }
        let n = self.segments.len();
        (0..n).all(|i| {
            let next = &self.segments[(i + 1) % n];
            self.segments[i].end().distance_squared(next.start()) <= 1e-12
        })
    }
}

/// Indexed triangle mesh with per-vertex normals
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl TriangleMesh {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    fn push_vertex(&mut self, position: Vec3, normal: Vec3) -> u32 {
        let index = self.positions.len() as u32;
        self.positions.push(position.to_array());
        self.normals.push(normal.to_array());
        index
    }
}

/// Extrude a convex polygon from z=0 to z=`depth`
///
/// Either winding is accepted. Caps are fan-triangulated around the
/// centroid; side walls get flat outward normals.
pub fn extrude(polygon: &[Vec2], depth: f32) -> TriangleMesh {
    let mut mesh = TriangleMesh::default();
    let n = polygon.len();
    if n < 3 {
        return mesh;
    }

    let mut polygon = polygon.to_vec();
    if signed_area(&polygon) < 0.0 {
        polygon.reverse();
    }

    let centroid = polygon.iter().copied().sum::<Vec2>() / n as f32;

    // Front cap (z = depth, facing +Z)
    let front_center = mesh.push_vertex(centroid.extend(depth), Vec3::Z);
    let front_start = mesh.positions.len() as u32;
    for point in &polygon {
        mesh.push_vertex(point.extend(depth), Vec3::Z);
    }
    for i in 0..n as u32 {
        let next = (i + 1) % n as u32;
        mesh.indices
            .extend_from_slice(&[front_center, front_start + i, front_start + next]);
    }

    // Back cap (z = 0, facing -Z, reversed winding)
    let back_center = mesh.push_vertex(centroid.extend(0.0), Vec3::NEG_Z);
    let back_start = mesh.positions.len() as u32;
    for point in &polygon {
        mesh.push_vertex(point.extend(0.0), Vec3::NEG_Z);
    }
    for i in 0..n as u32 {
        let next = (i + 1) % n as u32;
        mesh.indices
            .extend_from_slice(&[back_center, back_start + next, back_start + i]);
    }

    // Side walls
    for i in 0..n {
        let a = polygon[i];
        let b = polygon[(i + 1) % n];
        let edge = b - a;
        // Outward normal of a CCW polygon edge
        let normal = Vec3::new(edge.y, -edge.x, 0.0).normalize_or_zero();

        let a0 = mesh.push_vertex(a.extend(0.0), normal);
        let b0 = mesh.push_vertex(b.extend(0.0), normal);
        let b1 = mesh.push_vertex(b.extend(depth), normal);
        let a1 = mesh.push_vertex(a.extend(depth), normal);
        mesh.indices.extend_from_slice(&[a0, b0, b1, a0, b1, a1]);
    }

    mesh
}

/// Signed area of a polygon (positive when counter-clockwise)
pub fn signed_area(polygon: &[Vec2]) -> f32 {
    let n = polygon.len();
    (0..n)
        .map(|i| {
            let a = polygon[i];
            let b = polygon[(i + 1) % n];
            a.x * b.y - b.x * a.y
        })
        .sum::<f32>()
        / 2.0
}
