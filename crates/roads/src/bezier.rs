use bevy::prelude::*;

pub fn cubic_point(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f32) -> Vec3 {
    let mt = 1.0 - t;
    let mt2 = mt * mt;
    let mt3 = mt2 * mt;
    let t2 = t * t;
    let t3 = t2 * t;
    p0 * mt3 + p1 * 3.0 * mt2 * t + p2 * 3.0 * mt * t2 + p3 * t3
}

pub fn cubic_tangent(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f32) -> Vec3 {
    let mt = 1.0 - t;
    let mt2 = mt * mt;
    let t2 = t * t;
    (p1 - p0) * 3.0 * mt2 + (p2 - p1) * 6.0 * mt * t + (p3 - p2) * 3.0 * t2
}

/// Point on the quadratic Bezier with end points `a`, `b` and control point `c`.
pub fn quadratic_point(a: Vec3, c: Vec3, b: Vec3, t: f32) -> Vec3 {
    let mt = 1.0 - t;
    a * (mt * mt) + c * (2.0 * mt * t) + b * (t * t)
}
