//! Root placement: random points on a surface, weighted by area and growth map.
//!
//! For each triangle the sampler draws `floor(density * area + u)` candidate
//! points with `u` uniform in `[0, 1)`, so the expected number of candidates
//! is exactly `density * area`. Candidates whose UV falls outside the growth
//! map, or onto a zero-valued texel, are dropped without comment.
//!
//! A single triangle never draws more than [`MAX_CANDIDATES_PER_TRIANGLE`]
//! candidates, so huge or infinite densities still give a finite pass.
//!
//! The sampler never reaches for a process-wide generator; callers hand in
//! the RNG, which keeps seeded runs reproducible:
//!
//! ```ignore
//! let mut rng = seeded_rng(Some(7));
//! let roots: Vec<RootSample> =
//!     SurfaceSampler::new(&surface, &growth_map, 40.0, &mut rng).collect();
//! ```

use crate::growth_map::GrowthMap;
use crate::mesh::{Surface, Triangle};
use glam::{Vec2, Vec3};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Upper bound on candidates drawn from one triangle.
pub const MAX_CANDIDATES_PER_TRIANGLE: usize = 1 << 16;

/// Where a guide hair takes root.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootSample {
    pub position: Vec3,
    pub uv: Vec2,
    pub normal: Vec3,
}

/// Build the generator used for placement.
///
/// A seed gives reproducible placement; `None` seeds from the OS.
pub fn seeded_rng(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    }
}

/// Number of candidates to draw on a triangle of `area` at `density`.
///
/// Stochastic rounding: the fractional part becomes the probability of one
/// extra candidate. NaN yields zero and the result saturates at
/// [`MAX_CANDIDATES_PER_TRIANGLE`].
pub fn candidate_count<R: Rng + ?Sized>(area: f32, density: f32, rng: &mut R) -> usize {
    let expected = density * area;
    if expected.is_nan() || expected <= 0.0 {
        return 0;
    }
    let cap = MAX_CANDIDATES_PER_TRIANGLE as f32;
    if expected >= cap {
        return MAX_CANDIDATES_PER_TRIANGLE;
    }
    ((expected + rng.gen::<f32>()).floor() as usize).min(MAX_CANDIDATES_PER_TRIANGLE)
}

/// Uniform barycentric weights over a triangle.
///
/// `t = sqrt(u1)` places the point on a segment parallel to the edge opposite
/// corner 0, and `u2` picks a spot along it. All weights lie in `[0, 1]` and
/// sum to 1.
pub fn uniform_barycentric<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    let t = rng.gen::<f32>().sqrt();
    let u2 = rng.gen::<f32>();
    Vec3::new(1.0 - t, t * (1.0 - u2), t * u2)
}

/// Random point on `triangle`.
pub fn sample_triangle<R: Rng + ?Sized>(triangle: &Triangle, rng: &mut R) -> RootSample {
    let (position, uv, normal) = triangle.interpolate(uniform_barycentric(rng));
    RootSample {
        position,
        uv,
        normal,
    }
}

/// Lazy, finite iterator over accepted root samples.
///
/// Not restartable: each pass consumes draws from the borrowed RNG.
pub struct SurfaceSampler<'a, R: Rng + ?Sized> {
    triangles: std::slice::Iter<'a, Triangle>,
    growth_map: &'a GrowthMap,
    density: f32,
    rng: &'a mut R,
    current: Option<&'a Triangle>,
    remaining: usize,
    drawn: usize,
    rejected: usize,
}

impl<'a, R: Rng + ?Sized> SurfaceSampler<'a, R> {
    pub fn new(surface: &'a Surface, growth_map: &'a GrowthMap, density: f32, rng: &'a mut R) -> Self {
        Self {
            triangles: surface.triangles.iter(),
            growth_map,
            density,
            rng,
            current: None,
            remaining: 0,
            drawn: 0,
            rejected: 0,
        }
    }

    /// Candidates drawn so far, accepted or not.
    pub fn drawn(&self) -> usize {
        self.drawn
    }

    /// Candidates dropped by the growth map so far.
    pub fn rejected(&self) -> usize {
        self.rejected
    }
}

impl<R: Rng + ?Sized> Iterator for SurfaceSampler<'_, R> {
    type Item = RootSample;

    fn next(&mut self) -> Option<RootSample> {
        loop {
            if self.remaining == 0 {
                let triangle = self.triangles.next()?;
                if triangle.is_degenerate() {
                    continue;
                }
                self.remaining = candidate_count(triangle.area(), self.density, self.rng);
                self.current = Some(triangle);
                continue;
            }

            self.remaining -= 1;
            let triangle = self.current?;
            let sample = sample_triangle(triangle, self.rng);
            self.drawn += 1;

            if self.growth_map.allows(sample.uv) {
                return Some(sample);
            }
            self.rejected += 1;
        }
    }
}
