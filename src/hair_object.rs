//! Hair objects: the guide hairs grown on one surface plus their shared look.
//!
//! A [`HairObject`] exclusively owns its guide hairs and the rendering
//! attributes that apply to all of them. Objects are built through
//! [`HairObject::builder`] from one of three placement strategies:
//!
//! | Placement | Layout |
//! |-----------|--------|
//! | [`Placement::UniformCount`] | `n` strands in a row along +X |
//! | [`Placement::GrowthMap`] | roots sampled on a surface, masked by a growth map |
//! | [`Placement::CopyOf`] | same roots as a prior object, fresh vertex state |
//!
//! ```ignore
//! let mut rng = seeded_rng(Some(1));
//! let hair = HairObject::builder(Placement::GrowthMap {
//!         surface: &surface,
//!         growth_map: &growth_map,
//!         density: 40.0,
//!     })
//!     .with_attributes_from(&previous)
//!     .with_simulation(simulation.clone())
//!     .build(&mut rng);
//! ```

use crate::error::GrowthMapError;
use crate::growth_map::GrowthMap;
use crate::hair::GuideHair;
use crate::mesh::Surface;
use crate::render::{HairUniforms, RenderSink};
use crate::sampler::SurfaceSampler;
use crate::simulation::Simulation;
use crate::time::FrameTime;
use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Tunable rendering attributes shared by every guide hair of an object.
///
/// These survive a reset: a regenerated object copies them from its
/// predecessor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HairAttributes {
    /// Base RGB color, each channel in `[0, 1]`.
    pub color: Vec3,
    /// Rendered hairs per guide hair.
    pub group_hairs: u32,
    /// Radius of the disc the group members are spread over.
    pub group_spread: f32,
    /// Half-width of a rendered hair ribbon.
    pub hair_radius: f32,
    pub noise_amplitude: f32,
    /// Spline samples per rendered hair.
    pub spline_vertices: u32,
}

impl Default for HairAttributes {
    fn default() -> Self {
        Self {
            color: Vec3::new(0.6, 0.4, 0.3),
            group_hairs: 64,
            group_spread: 0.15,
            hair_radius: 0.004,
            noise_amplitude: 0.03,
            spline_vertices: 20,
        }
    }
}

/// Shape of a freshly grown guide hair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrandConfig {
    /// Vertices per guide hair, root included.
    pub vertices: usize,
    /// Initial distance between neighbouring vertices.
    pub spacing: f32,
}

impl Default for StrandConfig {
    fn default() -> Self {
        Self {
            vertices: 20,
            spacing: 0.4,
        }
    }
}

/// One RGB channel of the hair color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorChannel {
    Red,
    Green,
    Blue,
}

/// How guide-hair roots are laid out.
#[derive(Debug, Clone, Copy)]
pub enum Placement<'a> {
    /// `n` strands rooted at `(i + 0.25, 1, 0)`, growing along +X.
    UniformCount(usize),
    /// Roots sampled on `surface` at `density` hairs per unit area, kept only
    /// where `growth_map` is non-zero. Strands grow along the surface normal.
    GrowthMap {
        surface: &'a Surface,
        growth_map: &'a GrowthMap,
        density: f32,
    },
    /// The prior object's roots and strand shapes with fresh vertex state.
    /// Attributes are copied from the prior object unless overridden.
    CopyOf(&'a HairObject),
}

/// Counts describing how much work a hair object represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HairStats {
    pub guide_hairs: usize,
    pub rendered_hairs: usize,
    pub simulated_vertices: usize,
    pub rendered_vertices: usize,
}

/// Builder for [`HairObject`].
pub struct HairObjectBuilder<'a> {
    placement: Placement<'a>,
    attributes: Option<HairAttributes>,
    strand: StrandConfig,
    simulation: Option<Arc<Simulation>>,
}

impl<'a> HairObjectBuilder<'a> {
    fn new(placement: Placement<'a>) -> Self {
        Self {
            placement,
            attributes: None,
            strand: StrandConfig::default(),
            simulation: None,
        }
    }

    /// Use these attributes instead of the defaults.
    pub fn with_attributes(mut self, attributes: HairAttributes) -> Self {
        self.attributes = Some(attributes);
        self
    }

    /// Carry over the tunables of `prior`.
    pub fn with_attributes_from(mut self, prior: &HairObject) -> Self {
        self.attributes = Some(prior.attributes);
        self
    }

    /// Shape of newly grown strands. Ignored by [`Placement::CopyOf`].
    pub fn with_strand(mut self, strand: StrandConfig) -> Self {
        self.strand = strand;
        self
    }

    /// Simulation that advances this object on `update`.
    pub fn with_simulation(mut self, simulation: Arc<Simulation>) -> Self {
        self.simulation = Some(simulation);
        self
    }

    /// Grow the guide hairs.
    pub fn build<R: Rng + ?Sized>(self, rng: &mut R) -> HairObject {
        let strand = self.strand;
        let (guide_hairs, inherited) = match self.placement {
            Placement::UniformCount(count) => {
                let hairs = (0..count)
                    .map(|i| {
                        let root = Vec3::new(i as f32 + 0.25, 1.0, 0.0);
                        GuideHair::new(strand.vertices, strand.spacing, root, Vec3::X)
                    })
                    .collect();
                (hairs, None)
            }
            Placement::GrowthMap {
                surface,
                growth_map,
                density,
            } => {
                let mut sampler = SurfaceSampler::new(surface, growth_map, density, rng);
                let hairs: Vec<GuideHair> = sampler
                    .by_ref()
                    .map(|root| GuideHair::new(strand.vertices, strand.spacing, root.position, root.normal))
                    .collect();
                debug!(
                    drawn = sampler.drawn(),
                    rejected = sampler.rejected(),
                    accepted = hairs.len(),
                    "sampled guide hair roots"
                );
                if hairs.is_empty() {
                    warn!(density, "growth map produced no guide hairs");
                }
                (hairs, None)
            }
            Placement::CopyOf(prior) => {
                let hairs = prior
                    .guide_hairs
                    .iter()
                    .map(|h| GuideHair::new(h.len(), h.spacing(), h.root_position(), h.root_direction()))
                    .collect();
                (hairs, Some(prior.attributes))
            }
        };

        let attributes = self.attributes.or(inherited).unwrap_or_default();
        info!(guide_hairs = guide_hairs.len(), "hair object grown");

        HairObject {
            guide_hairs,
            attributes,
            simulation: self.simulation,
            time: FrameTime::default(),
        }
    }
}

/// The set of guide hairs grown on a surface.
#[derive(Debug, Clone)]
pub struct HairObject {
    guide_hairs: Vec<GuideHair>,
    attributes: HairAttributes,
    simulation: Option<Arc<Simulation>>,
    /// Time of the last update, forwarded to the renderer.
    time: FrameTime,
}

impl HairObject {
    pub fn builder(placement: Placement<'_>) -> HairObjectBuilder<'_> {
        HairObjectBuilder::new(placement)
    }

    /// Grow on `surface` using the growth map stored at `path`.
    ///
    /// # Errors
    ///
    /// Fails if the growth map cannot be loaded; no object is created.
    pub fn from_growth_map_file<P: AsRef<Path>, R: Rng + ?Sized>(
        surface: &Surface,
        density: f32,
        path: P,
        simulation: Option<Arc<Simulation>>,
        prior: Option<&HairObject>,
        rng: &mut R,
    ) -> Result<Self, GrowthMapError> {
        let growth_map = GrowthMap::from_file(path)?;
        let mut builder = Self::builder(Placement::GrowthMap {
            surface,
            growth_map: &growth_map,
            density,
        });
        if let Some(prior) = prior {
            builder = builder.with_attributes_from(prior);
        }
        if let Some(simulation) = simulation {
            builder = builder.with_simulation(simulation);
        }
        Ok(builder.build(rng))
    }

    #[inline]
    pub fn guide_hairs(&self) -> &[GuideHair] {
        &self.guide_hairs
    }

    #[inline]
    pub fn guide_hairs_mut(&mut self) -> &mut [GuideHair] {
        &mut self.guide_hairs
    }

    #[inline]
    pub fn attributes(&self) -> &HairAttributes {
        &self.attributes
    }

    pub fn set_attributes(&mut self, attributes: HairAttributes) {
        self.attributes = attributes;
    }

    pub fn simulation(&self) -> Option<&Arc<Simulation>> {
        self.simulation.as_ref()
    }

    pub fn set_simulation(&mut self, simulation: Option<Arc<Simulation>>) {
        self.simulation = simulation;
    }

    pub fn set_group_hairs(&mut self, count: u32) {
        self.attributes.group_hairs = count.max(1);
    }

    pub fn set_spline_vertices(&mut self, count: u32) {
        self.attributes.spline_vertices = count.max(2);
    }

    pub fn set_color(&mut self, color: Vec3) {
        self.attributes.color = color.clamp(Vec3::ZERO, Vec3::ONE);
    }

    pub fn set_color_channel(&mut self, channel: ColorChannel, value: f32) {
        let value = value.clamp(0.0, 1.0);
        match channel {
            ColorChannel::Red => self.attributes.color.x = value,
            ColorChannel::Green => self.attributes.color.y = value,
            ColorChannel::Blue => self.attributes.color.z = value,
        }
    }

    pub fn color_channel(&self, channel: ColorChannel) -> f32 {
        match channel {
            ColorChannel::Red => self.attributes.color.x,
            ColorChannel::Green => self.attributes.color.y,
            ColorChannel::Blue => self.attributes.color.z,
        }
    }

    /// Advance one frame: run the attached simulation (if any) over every
    /// guide hair, then refresh each hair's derived geometry.
    pub fn update(&mut self, time: FrameTime) {
        self.time = time;
        if let Some(simulation) = &self.simulation {
            simulation.simulate(&mut self.guide_hairs, time.delta);
        }
        for hair in &mut self.guide_hairs {
            hair.update(time);
        }
    }

    /// Set the shared uniforms once, then emit every guide hair.
    pub fn paint<S: RenderSink + ?Sized>(&self, sink: &mut S) {
        let uniforms = HairUniforms::new(&self.attributes, self.time.elapsed, self.guide_hairs.len() as u32);
        sink.set_object_uniforms(&uniforms);
        for hair in &self.guide_hairs {
            hair.paint(sink);
        }
    }

    pub fn stats(&self) -> HairStats {
        let guide_hairs = self.guide_hairs.len();
        let rendered_hairs = guide_hairs * self.attributes.group_hairs as usize;
        HairStats {
            guide_hairs,
            rendered_hairs,
            simulated_vertices: self.guide_hairs.iter().map(GuideHair::len).sum(),
            rendered_vertices: rendered_hairs * self.attributes.spline_vertices as usize * 4,
        }
    }
}
