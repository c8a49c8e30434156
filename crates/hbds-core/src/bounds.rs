//! Bounding volumes, recentring, and camera framing

use glam::Vec3;

/// Axis-aligned bounding box; starts empty and grows with `extend`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Aabb {
    pub const EMPTY: Aabb = Aabb {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    pub fn from_center_half_extents(center: Vec3, half: Vec3) -> Self {
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn from_points<I: IntoIterator<Item = Vec3>>(points: I) -> Self {
        let mut aabb = Self::EMPTY;
        for point in points {
            aabb.extend(point);
        }
        aabb
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn extend(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn translated(&self, offset: Vec3) -> Aabb {
        if self.is_empty() {
            return *self;
        }
        Aabb {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Centre of the box, or the origin when empty
    pub fn center(&self) -> Vec3 {
        if self.is_empty() {
            Vec3::ZERO
        } else {
            (self.min + self.max) * 0.5
        }
    }

    pub fn size(&self) -> Vec3 {
        if self.is_empty() {
            Vec3::ZERO
        } else {
            self.max - self.min
        }
    }

    /// Sphere enclosing the box (centre at box centre, radius half-diagonal)
    pub fn bounding_sphere(&self) -> Sphere {
        Sphere {
            center: self.center(),
            radius: self.size().length() * 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

/// Translation that moves the centre of `bounds` onto the origin
///
/// Empty bounds need no recentring.
pub fn recenter_offset(bounds: &Aabb) -> Vec3 {
    -bounds.center()
}

/// Camera distance that fits a sphere of `radius` in a vertical field of view
///
/// `distance = |radius / sin(fov / 2)| * margin`. A zero, negative, or
/// non-finite radius (e.g. an empty diagram) yields `default_distance`.
pub fn framing_distance(radius: f32, fov_y_radians: f32, margin: f32, default_distance: f32) -> f32 {
    if !radius.is_finite() || radius <= 0.0 {
        return default_distance;
    }
    let half_sin = (fov_y_radians / 2.0).sin();
    if half_sin.abs() <= f32::EPSILON {
        return default_distance;
    }
    (radius / half_sin).abs() * margin
}

/// Intersection of a ray with a plane, if it lies in front of the origin
pub fn ray_plane_intersection(
    origin: Vec3,
    direction: Vec3,
    plane_point: Vec3,
    plane_normal: Vec3,
) -> Option<Vec3> {
    let denom = plane_normal.dot(direction);
    if denom.abs() <= f32::EPSILON {
        return None;
    }
    let t = plane_normal.dot(plane_point - origin) / denom;
    if t < 0.0 {
        return None;
    }
    Some(origin + direction * t)
}
