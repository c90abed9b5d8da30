//! Triangulated host surfaces.
//!
//! Mesh file parsing lives outside this crate. The core only needs an ordered
//! list of triangles carrying positions, UVs and per-vertex normals, plus a
//! couple of procedural generators for tests and the viewer.

use glam::{Vec2, Vec3};
use std::f32::consts::{PI, TAU};

/// Triangles with an area below this contribute no hairs.
pub const DEGENERATE_AREA: f32 = 1e-9;

/// One surface triangle with per-corner attributes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub positions: [Vec3; 3],
    pub uvs: [Vec2; 3],
    pub normals: [Vec3; 3],
}

impl Triangle {
    pub fn new(positions: [Vec3; 3], uvs: [Vec2; 3], normals: [Vec3; 3]) -> Self {
        Self {
            positions,
            uvs,
            normals,
        }
    }

    /// Triangle with a single face normal shared by all corners.
    pub fn flat(positions: [Vec3; 3], uvs: [Vec2; 3]) -> Self {
        let [a, b, c] = positions;
        let normal = (b - a).cross(c - a).normalize_or_zero();
        Self::new(positions, uvs, [normal; 3])
    }

    pub fn area(&self) -> f32 {
        let [a, b, c] = self.positions;
        (c - a).cross(b - a).length() * 0.5
    }

    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.area() < DEGENERATE_AREA
    }

    /// Interpolate position, UV and normal at barycentric weights `bary`.
    ///
    /// The returned normal is renormalized; it falls back to the raw
    /// interpolated value when that is zero.
    pub fn interpolate(&self, bary: Vec3) -> (Vec3, Vec2, Vec3) {
        let [p0, p1, p2] = self.positions;
        let [t0, t1, t2] = self.uvs;
        let [n0, n1, n2] = self.normals;

        let position = p0 * bary.x + p1 * bary.y + p2 * bary.z;
        let uv = t0 * bary.x + t1 * bary.y + t2 * bary.z;
        let normal = n0 * bary.x + n1 * bary.y + n2 * bary.z;

        (position, uv, normal.try_normalize().unwrap_or(normal))
    }
}

/// An ordered collection of triangles; read-only to the sampler.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Surface {
    pub triangles: Vec<Triangle>,
}

impl Surface {
    pub fn new(triangles: Vec<Triangle>) -> Self {
        Self { triangles }
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn total_area(&self) -> f32 {
        self.triangles.iter().map(Triangle::area).sum()
    }

    /// Axis-aligned square in the XZ plane, centered at the origin, facing +Y.
    ///
    /// UV (0,0) sits at the `-X, +Z` corner and (1,1) at `+X, -Z`.
    pub fn quad(size: f32) -> Self {
        let h = size * 0.5;
        let p00 = Vec3::new(-h, 0.0, h);
        let p10 = Vec3::new(h, 0.0, h);
        let p11 = Vec3::new(h, 0.0, -h);
        let p01 = Vec3::new(-h, 0.0, -h);
        let uv00 = Vec2::new(0.0, 0.0);
        let uv10 = Vec2::new(1.0, 0.0);
        let uv11 = Vec2::new(1.0, 1.0);
        let uv01 = Vec2::new(0.0, 1.0);
        let up = [Vec3::Y; 3];

        Self::new(vec![
            Triangle::new([p00, p10, p11], [uv00, uv10, uv11], up),
            Triangle::new([p00, p11, p01], [uv00, uv11, uv01], up),
        ])
    }

    /// UV sphere centered at the origin.
    ///
    /// `v` runs from 0 at the south pole to 1 at the north pole, so the top of
    /// a growth-map image maps onto the top of the sphere. Pole caps produce
    /// one degenerate triangle per slice which the sampler skips.
    pub fn uv_sphere(radius: f32, stacks: u32, slices: u32) -> Self {
        let stacks = stacks.max(2);
        let slices = slices.max(3);

        let point = |stack: u32, slice: u32| {
            let v = stack as f32 / stacks as f32;
            let u = slice as f32 / slices as f32;
            let phi = PI * (1.0 - v);
            let theta = TAU * u;
            let normal = Vec3::new(phi.sin() * theta.cos(), phi.cos(), -phi.sin() * theta.sin());
            (normal * radius, Vec2::new(u, v), normal)
        };

        let mut triangles = Vec::with_capacity((stacks * slices * 2) as usize);
        for stack in 0..stacks {
            for slice in 0..slices {
                let (p0, t0, n0) = point(stack, slice);
                let (p1, t1, n1) = point(stack, slice + 1);
                let (p2, t2, n2) = point(stack + 1, slice + 1);
                let (p3, t3, n3) = point(stack + 1, slice);

                triangles.push(Triangle::new([p0, p1, p2], [t0, t1, t2], [n0, n1, n2]));
                triangles.push(Triangle::new([p0, p2, p3], [t0, t2, t3], [n0, n2, n3]));
            }
        }

        Self::new(triangles)
    }
}
