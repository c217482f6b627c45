//! Planar-geometry kernel: vectors, lines, circles and triangles.
//!
//! Every type here is a plain value with no state beyond its fields. Nothing
//! in this module knows about meshes, vertices or corners; it is used both by
//! the mesh layer and by client code that just wants the kernel.

use std::f64::consts::PI;

use crate::MeshError;

const TAU: f64 = 2.0 * PI;

/// A point, or a free vector, in the Euclidean plane.
#[derive(Debug, Clone, Copy)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub fn new(x: f64, y: f64) -> Self {
        Vec2 { x, y }
    }

    /// Angle from the positive x axis, normalized to `[0, 2*PI)`.
    ///
    /// `NaN` for the zero vector, which has no well-defined direction.
    pub fn ang(&self) -> f64 {
        if self.x == 0.0 && self.y == 0.0 {
            return f64::NAN;
        }
        self.y.atan2(self.x).rem_euclid(TAU)
    }

    /// The vector's L2 norm.
    pub fn mag(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn dot(&self, other: Vec2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Rotate by `theta` radians, standard mathematical orientation.
    pub fn rotate(&self, theta: f64) -> Vec2 {
        let (s, c) = theta.sin_cos();
        Vec2::new(self.x * c - self.y * s, self.x * s + self.y * c)
    }

    pub fn unit(&self) -> Vec2 {
        *self / self.mag()
    }

    /// A vector of length `mag` pointing in direction `ang`.
    pub fn from_polar(ang: f64, mag: f64) -> Vec2 {
        let (s, c) = ang.sin_cos();
        Vec2::new(c * mag, s * mag)
    }
}

impl PartialEq for Vec2 {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}

impl From<(f64, f64)> for Vec2 {
    fn from((x, y): (f64, f64)) -> Self {
        Vec2::new(x, y)
    }
}

impl std::ops::Add for Vec2 {
    type Output = Vec2;
    fn add(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x + other.x, self.y + other.y)
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x - other.x, self.y - other.y)
    }
}

impl std::ops::Neg for Vec2 {
    type Output = Vec2;
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

impl std::ops::Mul<f64> for Vec2 {
    type Output = Vec2;
    fn mul(self, scalar: f64) -> Vec2 {
        Vec2::new(self.x * scalar, self.y * scalar)
    }
}

impl std::ops::Div<f64> for Vec2 {
    type Output = Vec2;
    fn div(self, scalar: f64) -> Vec2 {
        Vec2::new(self.x / scalar, self.y / scalar)
    }
}

/// A side of a line: never a third "on the line" state (see [`Line::side`]).
pub type Side = i32;

/// A line through two distinct points, also usable as the segment between
/// them depending on context (callers that want segment semantics use
/// `a()`/`b()` directly; the kernel treats it as infinite for intersection
/// and side tests).
#[derive(Debug, Clone, Copy)]
pub struct Line {
    a: Vec2,
    b: Vec2,
}

impl Line {
    pub fn new(a: Vec2, b: Vec2) -> Result<Self, MeshError> {
        if a == b {
            return Err(MeshError::ConstructOfDegenerateLine(a));
        }
        Ok(Line { a, b })
    }

    pub fn a(&self) -> Vec2 {
        self.a
    }

    pub fn b(&self) -> Vec2 {
        self.b
    }

    /// Direction of the line, normalized to `[0, PI)` (undirected).
    pub fn ang(&self) -> f64 {
        (self.a - self.b).ang().rem_euclid(PI)
    }

    pub fn mid(&self) -> Vec2 {
        (self.a + self.b) / 2.0
    }

    pub fn translate(&self, by: Vec2) -> Line {
        Line {
            a: self.a + by,
            b: self.b + by,
        }
    }

    /// The line through `mid()` perpendicular to `self`.
    pub fn perp(&self) -> Line {
        let ang = self.ang() + PI / 2.0;
        let mid = self.mid();
        Line {
            a: mid,
            b: mid + Vec2::from_polar(ang, 1.0),
        }
    }

    /// Signed side of `p` relative to this line: `-1` or `1`, never `0`.
    /// Points exactly on the line deterministically map to the `1` side.
    pub fn side(&self, p: Vec2) -> Side {
        let cross = (p.x - self.a.x) * (self.b.y - self.a.y) - (p.y - self.a.y) * (self.b.x - self.a.x);
        if cross < 0.0 {
            -1
        } else {
            1
        }
    }

    /// True iff every point in `ps` maps to the same side.
    pub fn same_side(&self, ps: &[Vec2]) -> bool {
        match ps.first() {
            None => true,
            Some(&first) => {
                let side = self.side(first);
                ps.iter().all(|&p| self.side(p) == side)
            }
        }
    }

    /// Circumcircle "bulge" of candidate apex `p` against this edge.
    ///
    /// Minimizing this across candidates on one side of the line yields the
    /// Delaunay neighbor of the edge on that side.
    pub fn bulge(&self, p: Vec2) -> f64 {
        let tri = Triangle::new(self.a, self.b, p);
        let circle = match tri.circumcircle() {
            Some(c) => c,
            None => {
                // a, b, p collinear: infinite circumradius in the limit.
                return f64::INFINITY * self.side(p) as f64;
            }
        };
        circle.radius * (self.side(p) * self.side(circle.center)) as f64
    }
}

/// Intersection of two lines, or `None` if they are parallel.
///
/// Parallel detection is exact `ang()` equality, not a tolerance band — a
/// deliberate choice, and adversarial near-parallel inputs can defeat it.
pub fn intersect_lines(a: &Line, b: &Line) -> Option<Vec2> {
    if a.ang() == b.ang() {
        return None;
    }
    let (x1, y1) = (a.a.x, a.a.y);
    let (x2, y2) = (a.b.x, a.b.y);
    let (x3, y3) = (b.a.x, b.a.y);
    let (x4, y4) = (b.b.x, b.b.y);

    let d = (x1 - x2) * (y3 - y4) - (y1 - y2) * (x3 - x4);
    let x = ((x1 * y2 - y1 * x2) * (x3 - x4) - (x1 - x2) * (x3 * y4 - y3 * x4)) / d;
    let y = ((x1 * y2 - y1 * x2) * (y3 - y4) - (y1 - y2) * (x3 * y4 - y3 * x4)) / d;
    Some(Vec2::new(x, y))
}

/// Intersection of a line with a circle: zero, one (tangent) or two points.
pub fn intersect_line_circle(line: &Line, circle: &Circle) -> Vec<Vec2> {
    let r = circle.radius;
    let l = line.translate(-circle.center);
    let (p1, p2) = (l.a, l.b);
    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;
    let dr = (dx * dx + dy * dy).sqrt();
    let d = p1.x * p2.y - p2.x * p1.y;

    let delta = r * r * dr * dr - d * d;
    if delta < 0.0 {
        return Vec::new();
    }
    let q = delta.sqrt();
    let sign_dy = if dy == 0.0 { 1.0 } else { dy.signum() };

    let i1 = Vec2::new(d * dy + sign_dy * dx * q, -d * dx + dy.abs() * q) / (dr * dr) + circle.center;
    let i2 = Vec2::new(d * dy - sign_dy * dx * q, -d * dx - dy.abs() * q) / (dr * dr) + circle.center;

    if i1 == i2 {
        vec![i1]
    } else {
        vec![i1, i2]
    }
}

/// A circle: center and nonnegative radius.
#[derive(Debug, Clone, Copy)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f64,
}

impl Circle {
    pub fn new(center: Vec2, radius: f64) -> Self {
        Circle { center, radius }
    }

    pub fn intersect_line(&self, line: &Line) -> Vec<Vec2> {
        intersect_line_circle(line, self)
    }
}

/// Three points in the plane; lazily-computable circumcenter/circumcircle.
#[derive(Debug, Clone, Copy)]
pub struct Triangle {
    pub p0: Vec2,
    pub p1: Vec2,
    pub p2: Vec2,
}

impl Triangle {
    pub fn new(p0: Vec2, p1: Vec2, p2: Vec2) -> Self {
        Triangle { p0, p1, p2 }
    }

    /// `None` if the three points are collinear.
    pub fn circumcenter(&self) -> Option<Vec2> {
        let l01 = Line::new(self.p0, self.p1).ok()?;
        let l12 = Line::new(self.p1, self.p2).ok()?;
        intersect_lines(&l01.perp(), &l12.perp())
    }

    pub fn circumcircle(&self) -> Option<Circle> {
        let center = self.circumcenter()?;
        Some(Circle::new(center, (center - self.p0).mag()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    const EPS: f64 = 1e-4;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a - b).mag() < EPS
    }

    #[test]
    fn s1_vec_add() {
        let v = Vec2::new(1.0, 2.0) + Vec2::new(5.0, 11.0);
        assert!(close(v, Vec2::new(6.0, 13.0)));
    }

    #[test]
    fn vec_sub_reverses_add() {
        let u = Vec2::new(1.0, 2.0);
        let v = Vec2::new(5.0, 11.0);
        assert!(close((u + v) - v, u));
    }

    #[test]
    fn vec_scalar_reverses_direction_when_negative() {
        let v = Vec2::new(2.0, 1.0);
        assert!(close(v * -1.0 + v, Vec2::new(0.0, 0.0)));
    }

    #[test]
    fn vec_rotation_by_tau_is_identity() {
        let v = Vec2::new(3.0, -4.0);
        let r = v.rotate(2.0 * PI);
        assert!(close(r, v));
    }

    #[test]
    fn vec_zero_angle_is_nan() {
        assert!(Vec2::new(0.0, 0.0).ang().is_nan());
    }

    #[test]
    fn vec_dot() {
        assert!((Vec2::new(2.0, 6.0).dot(Vec2::new(4.0, 1.5)) - 17.0).abs() < EPS);
    }

    #[test]
    fn s2_line_intersect() {
        let a = Line::new(Vec2::new(0.0, 0.0), Vec2::new(2.0, 2.0)).unwrap();
        let b = Line::new(Vec2::new(2.0, 0.0), Vec2::new(-1.0, 3.0)).unwrap();
        let i = intersect_lines(&a, &b).unwrap();
        assert!(close(i, Vec2::new(1.0, 1.0)));
    }

    #[test]
    fn line_perp_meets_self_at_mid() {
        let l = Line::new(Vec2::new(0.0, 0.0), Vec2::new(2.0, 2.0)).unwrap();
        let i = intersect_lines(&l, &l.perp()).unwrap();
        assert!(close(i, l.mid()));
    }

    #[test]
    fn line_side_consistent_and_same_side_agrees() {
        let l = Line::new(Vec2::new(10.0, 10.0), Vec2::new(14.0, 11.0)).unwrap();
        let top = l.side(Vec2::new(-1000.0, 1000.0));
        let bottom = l.side(Vec2::new(1000.0, -1000.0));
        assert_ne!(top, bottom);
        assert_eq!(l.side(Vec2::new(1000.0, 0.0)), bottom);
        assert_eq!(l.side(Vec2::new(10.0, 11.0)), top);
        assert_eq!(l.side(Vec2::new(10.0, 9.0)), bottom);
        assert!(l.same_side(&[Vec2::new(10.0, 11.0), Vec2::new(14.0, 11.1)]));
        assert!(!l.same_side(&[Vec2::new(10.0, 11.0), Vec2::new(10.0, 9.0)]));
    }

    #[test]
    fn line_side_2() {
        let l = Line::new(Vec2::new(660.0, 28.0), Vec2::new(707.0, 113.0)).unwrap();
        assert_eq!(l.side(Vec2::new(119.0, 563.0)), l.side(Vec2::new(350.0, 255.0)));
    }

    #[test]
    fn s3_line_circle_intersect() {
        let l = Line::new(Vec2::new(3.0, 1.0), Vec2::new(4.0, 2.0)).unwrap();
        let c = Circle::new(Vec2::new(3.0, 1.0), 2f64.sqrt());
        let pts = intersect_line_circle(&l, &c);
        assert_eq!(pts.len(), 2);
        let wants = [Vec2::new(4.0, 2.0), Vec2::new(2.0, 0.0)];
        for w in wants {
            assert!(pts.iter().any(|&p| close(p, w)));
        }
    }

    #[test]
    fn s4_triangle_circumcenter() {
        let t = Triangle::new(Vec2::new(1.0, 0.0), Vec2::new(0.0, 2.0), Vec2::new(0.0, 0.0));
        let c = t.circumcenter().unwrap();
        assert!(close(c, Vec2::new(0.5, 1.0)));
    }

    #[test]
    fn triangle_circumcenter_equidistant() {
        let t = Triangle::new(Vec2::new(1.0, 0.0), Vec2::new(0.0, 2.0), Vec2::new(3.0, 5.0));
        let c = t.circumcenter().unwrap();
        let d0 = (c - t.p0).mag();
        let d1 = (c - t.p1).mag();
        let d2 = (c - t.p2).mag();
        assert!((d0 - d1).abs() < EPS);
        assert!((d1 - d2).abs() < EPS);
    }

    #[test]
    fn triangle_circumcenter_none_for_collinear() {
        let t = Triangle::new(Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(2.0, 0.0));
        assert!(t.circumcenter().is_none());
    }

    #[test]
    fn s5_bulge_monotonicity() {
        let l = Line::new(Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0)).unwrap();
        assert!(l.bulge(Vec2::new(0.5, 0.1)) < l.bulge(Vec2::new(0.5, 0.2)));
        assert!(l.bulge(Vec2::new(0.5, 0.2)) < l.bulge(Vec2::new(0.5, 20.0)));
        assert!(l.bulge(Vec2::new(0.5, -0.1)) < l.bulge(Vec2::new(0.5, -0.2)));

        let l2 = Line::new(Vec2::new(660.0, 28.0), Vec2::new(707.0, 113.0)).unwrap();
        assert!(l2.bulge(Vec2::new(119.0, 563.0)) > 0.0);
    }

    #[test]
    fn degenerate_line_construction_errors() {
        let p = Vec2::new(1.0, 1.0);
        let err = Line::new(p, p).unwrap_err();
        assert!(matches!(err, MeshError::ConstructOfDegenerateLine(q) if q == p));
    }
}
