//! A running hair session: one surface, one growth map, one live hair object.
//!
//! The scene is the single owner of the live [`HairObject`]. Tunables are
//! applied to it directly. Placement changes (density) only take effect on
//! [`HairScene::reset`], which grows a replacement that inherits the live
//! object's attributes and swaps it into place between frames.

use crate::config::SceneConfig;
use crate::error::GrowthMapError;
use crate::growth_map::GrowthMap;
use crate::hair_object::{ColorChannel, HairAttributes, HairObject, HairStats, Placement};
use crate::mesh::Surface;
use crate::render::{GlobalUniforms, RenderSink};
use crate::simulation::{Collider, Simulation};
use crate::time::FrameTime;
use glam::Vec3;
use rand::Rng;
use std::sync::Arc;
use tracing::{info, warn};

pub struct HairScene {
    config: SceneConfig,
    surface: Surface,
    growth_map: GrowthMap,
    colliders: Vec<Collider>,
    simulation: Arc<Simulation>,
    hair: HairObject,
    /// Generations grown so far, the initial one included.
    generation: u32,
    warned_unstable: bool,
}

impl HairScene {
    /// Grow the first hair object on `surface` with no colliders.
    pub fn new<R: Rng + ?Sized>(config: SceneConfig, surface: Surface, growth_map: GrowthMap, rng: &mut R) -> Self {
        Self::with_colliders(config, surface, growth_map, Vec::new(), rng)
    }

    pub fn with_colliders<R: Rng + ?Sized>(
        config: SceneConfig,
        surface: Surface,
        growth_map: GrowthMap,
        colliders: Vec<Collider>,
        rng: &mut R,
    ) -> Self {
        let simulation = Arc::new(Self::build_simulation(&config, &colliders));
        let hair = HairObject::builder(Placement::GrowthMap {
            surface: &surface,
            growth_map: &growth_map,
            density: config.density,
        })
        .with_attributes(config.attributes)
        .with_strand(config.strand)
        .with_simulation(simulation.clone())
        .build(rng);

        Self {
            config,
            surface,
            growth_map,
            colliders,
            simulation,
            hair,
            generation: 1,
            warned_unstable: false,
        }
    }

    /// The viewer's scene: hair on a UV sphere that also acts as collider.
    ///
    /// Without a configured growth map the built-in one is used.
    ///
    /// # Errors
    ///
    /// Fails if the configured growth map cannot be loaded.
    pub fn from_config<R: Rng + ?Sized>(config: SceneConfig, rng: &mut R) -> Result<Self, GrowthMapError> {
        let growth_map = match &config.growth_map {
            Some(path) => GrowthMap::from_file(path)?,
            None => GrowthMap::builtin()?,
        };
        let surface = Surface::uv_sphere(config.sphere_radius, config.sphere_stacks, config.sphere_slices);
        let sphere = Collider::sphere(Vec3::ZERO, config.sphere_radius);
        Ok(Self::with_colliders(config, surface, growth_map, vec![sphere], rng))
    }

    fn build_simulation(config: &SceneConfig, colliders: &[Collider]) -> Simulation {
        colliders
            .iter()
            .fold(Simulation::new(config.simulation), |sim, c| sim.with_collider(*c))
    }

    /// Advance the live hair object by one frame.
    pub fn tick(&mut self, time: FrameTime) {
        let limit = self.simulation.config().max_stable_timestep();
        if time.delta > limit && !self.warned_unstable {
            warn!(delta = time.delta, limit, "timestep exceeds the stable range of the solver");
            self.warned_unstable = true;
        }
        self.hair.update(time);
    }

    /// Push the frame's global uniforms, then the hair object.
    pub fn paint<S: RenderSink + ?Sized>(&self, sink: &mut S, globals: &GlobalUniforms) {
        sink.set_global_uniforms(globals);
        self.hair.paint(sink);
    }

    /// Discard the live hair object and grow a replacement with a fresh
    /// simulation. Attributes carry over; geometry and vertex state do not.
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.simulation = Arc::new(Self::build_simulation(&self.config, &self.colliders));
        let replacement = HairObject::builder(Placement::GrowthMap {
            surface: &self.surface,
            growth_map: &self.growth_map,
            density: self.config.density,
        })
        .with_attributes_from(&self.hair)
        .with_strand(self.config.strand)
        .with_simulation(self.simulation.clone())
        .build(rng);

        let old = std::mem::replace(&mut self.hair, replacement);
        self.generation += 1;
        info!(
            generation = self.generation,
            previous = old.guide_hairs().len(),
            guide_hairs = self.hair.guide_hairs().len(),
            density = self.config.density,
            "hair object reset"
        );
    }

    #[inline]
    pub fn hair(&self) -> &HairObject {
        &self.hair
    }

    #[inline]
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    #[inline]
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    #[inline]
    pub fn simulation(&self) -> &Arc<Simulation> {
        &self.simulation
    }

    #[inline]
    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn attributes(&self) -> &HairAttributes {
        self.hair.attributes()
    }

    pub fn stats(&self) -> HairStats {
        self.hair.stats()
    }

    pub fn density(&self) -> f32 {
        self.config.density
    }

    /// Takes effect on the next [`reset`](Self::reset).
    pub fn set_density(&mut self, density: f32) {
        self.config.density = if density.is_finite() { density.max(0.0) } else { 0.0 };
    }

    pub fn set_group_hairs(&mut self, count: u32) {
        self.hair.set_group_hairs(count);
    }

    pub fn set_spline_vertices(&mut self, count: u32) {
        self.hair.set_spline_vertices(count);
    }

    pub fn set_color_channel(&mut self, channel: ColorChannel, value: f32) {
        self.hair.set_color_channel(channel, value);
    }
}
