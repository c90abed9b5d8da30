//! Guide hairs: simulated strands anchored to the host surface.
//!
//! A guide hair is an ordered chain of mass-bearing vertices. The first vertex
//! is the root; it has infinite mass (`inv_mass == 0`) and never moves. Every
//! other vertex carries unit mass and is integrated by the
//! [`Simulation`](crate::simulation::Simulation).
//!
//! A guide hair does not integrate its own physics. After the simulation has
//! moved the vertices for a frame, [`GuideHair::update`] refreshes the cached
//! render geometry and bend state, and [`GuideHair::paint`] hands it to a
//! render sink.

use crate::render::{GuideVertexGpu, RenderSink};
use crate::time::FrameTime;
use glam::Vec3;

/// Segments shorter than this are treated as zero length when deriving
/// directions.
pub const SEGMENT_EPSILON: f32 = 1e-6;

/// One simulated point on a guide hair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HairVertex {
    pub position: Vec3,
    /// Position at the start of the current step.
    pub prev_position: Vec3,
    pub velocity: Vec3,
    /// Force accumulator, cleared at the start of every step.
    pub force: Vec3,
    /// Offset the length constraint applied to this vertex in the last step.
    pub correction: Vec3,
    /// Unit direction of the segment arriving at this vertex.
    pub direction: Vec3,
    /// Bend angle between the incoming and outgoing segments, in radians.
    pub theta: f32,
    /// Rate of change of `theta` in radians per second.
    pub omega: f32,
    /// Rest length of the segment from the previous vertex; zero on the root.
    pub rest_length: f32,
    pub mass: f32,
    pub inv_mass: f32,
}

impl HairVertex {
    /// A free vertex with unit mass.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            prev_position: position,
            velocity: Vec3::ZERO,
            force: Vec3::ZERO,
            correction: Vec3::ZERO,
            direction: Vec3::ZERO,
            theta: 0.0,
            omega: 0.0,
            rest_length: 0.0,
            mass: 1.0,
            inv_mass: 1.0,
        }
    }

    /// A vertex with infinite mass.
    pub fn pinned(position: Vec3) -> Self {
        Self {
            mass: 0.0,
            inv_mass: 0.0,
            ..Self::new(position)
        }
    }

    #[inline]
    pub fn is_pinned(&self) -> bool {
        self.inv_mass == 0.0
    }
}

/// One simulated strand and its cached render data.
#[derive(Debug, Clone, PartialEq)]
pub struct GuideHair {
    vertices: Vec<HairVertex>,
    root_position: Vec3,
    root_direction: Vec3,
    /// Per-vertex tangents, refreshed by `update`.
    tangents: Vec<Vec3>,
}

impl GuideHair {
    /// Build a straight strand of `num_vertices` vertices starting at `root`
    /// and stepping `spacing` along `direction`.
    ///
    /// A zero `direction` falls back to +Y. Rest lengths are the initial
    /// distances between neighbours and never change afterwards.
    pub fn new(num_vertices: usize, spacing: f32, root: Vec3, direction: Vec3) -> Self {
        let root_direction = direction.try_normalize().unwrap_or(Vec3::Y);

        let vertices: Vec<HairVertex> = (0..num_vertices)
            .map(|i| {
                let position = root + root_direction * (spacing * i as f32);
                if i == 0 {
                    HairVertex::pinned(position)
                } else {
                    HairVertex::new(position)
                }
            })
            .collect();

        let mut hair = Self {
            vertices,
            root_position: root,
            root_direction,
            tangents: Vec::with_capacity(num_vertices),
        };

        for i in 1..hair.vertices.len() {
            let rest = hair.vertices[i].position.distance(hair.vertices[i - 1].position);
            hair.vertices[i].rest_length = rest;
        }
        hair.update(FrameTime::default());
        hair
    }

    #[inline]
    pub fn vertices(&self) -> &[HairVertex] {
        &self.vertices
    }

    /// Mutable vertex access for the simulation.
    #[inline]
    pub fn vertices_mut(&mut self) -> &mut [HairVertex] {
        &mut self.vertices
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Anchor point on the surface.
    #[inline]
    pub fn root_position(&self) -> Vec3 {
        self.root_position
    }

    /// Unit growth direction at the root (the surface normal for grown hair).
    #[inline]
    pub fn root_direction(&self) -> Vec3 {
        self.root_direction
    }

    /// Distance between the first two vertices at construction.
    pub fn spacing(&self) -> f32 {
        self.vertices.get(1).map(|v| v.rest_length).unwrap_or(0.0)
    }

    /// Sum of all rest lengths.
    pub fn rest_length(&self) -> f32 {
        self.vertices.iter().map(|v| v.rest_length).sum()
    }

    /// Cached per-vertex tangents from the last `update`.
    #[inline]
    pub fn tangents(&self) -> &[Vec3] {
        &self.tangents
    }

    /// Refresh derived geometry after the simulation has moved the vertices.
    ///
    /// Re-anchors the root, then recomputes each vertex's segment direction
    /// and a smoothed tangent. Zero-length segments inherit the previous
    /// direction, starting from the root direction, so no NaNs appear.
    ///
    /// Bend angles are measured at every vertex; the root bends against its
    /// growth direction. Their rates use `time.delta` and keep their last
    /// value on frames that do not advance.
    pub fn update(&mut self, time: FrameTime) {
        if let Some(root) = self.vertices.first_mut() {
            root.position = self.root_position;
            root.velocity = Vec3::ZERO;
            root.direction = self.root_direction;
        }

        let mut last = self.root_direction;
        for i in 1..self.vertices.len() {
            let delta = self.vertices[i].position - self.vertices[i - 1].position;
            let len = delta.length();
            if len > SEGMENT_EPSILON {
                last = delta / len;
            }
            self.vertices[i].direction = last;
        }

        let advancing = time.delta > 0.0 && time.delta.is_finite();
        self.tangents.clear();
        let n = self.vertices.len();
        for i in 0..n {
            let incoming = self.vertices[i].direction;
            let outgoing = if i + 1 < n {
                self.vertices[i + 1].direction
            } else {
                incoming
            };
            let tangent = (incoming + outgoing).try_normalize().unwrap_or(outgoing);
            self.tangents.push(tangent);

            let theta = incoming.dot(outgoing).clamp(-1.0, 1.0).acos();
            let v = &mut self.vertices[i];
            if advancing {
                v.omega = (theta - v.theta) / time.delta;
            }
            v.theta = theta;
        }
    }

    /// GPU layout of this strand's vertex chain.
    pub fn gpu_vertices(&self) -> Vec<GuideVertexGpu> {
        self.vertices
            .iter()
            .zip(self.tangents.iter())
            .map(|(v, t)| GuideVertexGpu::new(v.position, *t))
            .collect()
    }

    /// Emit this strand to the render sink.
    ///
    /// The owning hair object must have set object uniforms first; the sink
    /// expands the strand into a full hair group.
    pub fn paint<S: RenderSink + ?Sized>(&self, sink: &mut S) {
        if self.vertices.is_empty() {
            return;
        }
        sink.draw_guide_hair(&self.gpu_vertices());
    }
}
