//! # hairsim
//!
//! Guide-hair simulation with instanced hair rendering.
//!
//! A handful of simulated guide strands are grown on a surface, advanced by a
//! shared solver every frame, and handed to a renderer that expands each one
//! into a dense group of interpolated, noised hairs.
//!
//! ## Quick Start
//!
//! ```ignore
//! use hairsim::prelude::*;
//! use std::sync::Arc;
//!
//! let surface = Surface::uv_sphere(1.0, 24, 48);
//! let growth_map = GrowthMap::from_file("assets/growth.png")?;
//! let simulation = Arc::new(
//!     Simulation::new(SimulationConfig::default())
//!         .with_collider(Collider::sphere(Vec3::ZERO, 1.0)),
//! );
//!
//! let mut rng = seeded_rng(Some(42));
//! let mut hair = HairObject::builder(Placement::GrowthMap {
//!         surface: &surface,
//!         growth_map: &growth_map,
//!         density: 40.0,
//!     })
//!     .with_simulation(simulation)
//!     .build(&mut rng);
//!
//! let mut clock = FrameClock::new(60.0);
//! let mut sink = RecordingSink::new();
//! loop {
//!     hair.update(clock.tick());
//!     sink.begin_frame();
//!     hair.paint(&mut sink);
//! }
//! ```
//!
//! ## Frame Order
//!
//! 1. [`HairObject::update`] runs the [`Simulation`] once over all guide
//!    hairs, then refreshes each hair's tangents.
//! 2. [`HairObject::paint`] sets [`HairUniforms`] once, then each
//!    [`GuideHair`] submits its vertex chain to the [`RenderSink`].
//!
//! ## Modules
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`mesh`] | triangles and procedural surfaces |
//! | [`growth_map`] | density masks |
//! | [`sampler`] | root placement |
//! | [`hair`] | guide hairs and their vertices |
//! | [`hair_object`] | the set of guide hairs on a surface |
//! | [`simulation`] | the solver and colliders |
//! | [`render`] | uniforms, sinks and the hair shader |
//! | [`scene`] | a live session with reset |
//! | [`gpu`] | the wgpu renderer |

pub mod config;
pub mod error;
pub mod gpu;
pub mod growth_map;
pub mod hair;
pub mod hair_object;
pub mod mesh;
pub mod render;
pub mod sampler;
pub mod scene;
pub mod simulation;
pub mod time;

pub use bytemuck;
pub use config::SceneConfig;
pub use error::{ConfigError, GpuError, GrowthMapError, ViewerError};
pub use glam::{Mat4, Vec2, Vec3};
pub use growth_map::GrowthMap;
pub use hair::{GuideHair, HairVertex};
pub use hair_object::{
    ColorChannel, HairAttributes, HairObject, HairObjectBuilder, HairStats, Placement, StrandConfig,
};
pub use mesh::{Surface, Triangle};
pub use render::{
    GlobalUniforms, GuideVertexGpu, HairUniforms, RecordingSink, RenderSink, StrandRange, HAIR_SHADER,
};
pub use sampler::{seeded_rng, RootSample, SurfaceSampler};
pub use scene::HairScene;
pub use simulation::{Collider, Simulation, SimulationConfig};
pub use time::{FrameClock, FrameTime};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use hairsim::prelude::*;
/// ```
pub mod prelude {
    pub use crate::growth_map::GrowthMap;
    pub use crate::hair::GuideHair;
    pub use crate::hair_object::{ColorChannel, HairAttributes, HairObject, Placement, StrandConfig};
    pub use crate::mesh::Surface;
    pub use crate::render::{RecordingSink, RenderSink};
    pub use crate::sampler::seeded_rng;
    pub use crate::scene::HairScene;
    pub use crate::simulation::{Collider, Simulation, SimulationConfig};
    pub use crate::time::{FrameClock, FrameTime};
    pub use crate::{Vec2, Vec3};
}
