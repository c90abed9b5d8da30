//! The data contract between simulated guide hairs and the hair renderer.
//!
//! Each frame the renderer receives, in this order:
//!
//! 1. [`GlobalUniforms`] - projection, view and model matrices plus the eye.
//! 2. [`HairUniforms`] - per-object attributes, set once by the hair object.
//! 3. One vertex chain per guide hair ([`GuideVertexGpu`]).
//!
//! The renderer expands every guide strand into `group_hairs` rendered
//! strands: it interpolates the chain with a Catmull-Rom spline sampled at
//! `spline_vertices` points, offsets each member of the group inside a disc
//! of radius `group_spread`, adds hash noise of `noise_amplitude`, and draws
//! a camera-facing ribbon of half-width `hair_radius`. [`HAIR_SHADER`] is the
//! WGSL implementation used by the GPU renderer.
//!
//! Render sinks are passed into `paint` explicitly; nothing here is global.

use crate::hair_object::HairAttributes;
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

/// WGSL source for the instanced hair expansion.
///
/// Bindings (group 0):
/// - `0` uniform [`GlobalUniforms`]
/// - `1` uniform [`HairUniforms`]
/// - `2` storage `array<GuideVertex>` (all strands, back to back)
/// - `3` storage `array<StrandRange>`
///
/// Draw with a triangle strip of `spline_vertices * 2` vertices and
/// `strand_count * group_hairs` instances.
pub const HAIR_SHADER: &str = r#"
struct Globals {
    projection: mat4x4<f32>,
    view: mat4x4<f32>,
    model: mat4x4<f32>,
    camera_position: vec4<f32>,
};

struct HairParams {
    color: vec3<f32>,
    group_hairs: u32,
    group_spread: f32,
    hair_radius: f32,
    noise_amplitude: f32,
    spline_vertices: u32,
    time: f32,
    strand_count: u32,
    _pad0: u32,
    _pad1: u32,
};

struct GuideVertex {
    position: vec4<f32>,
    tangent: vec4<f32>,
};

struct StrandRange {
    first_vertex: u32,
    vertex_count: u32,
};

@group(0) @binding(0) var<uniform> globals: Globals;
@group(0) @binding(1) var<uniform> hair: HairParams;
@group(0) @binding(2) var<storage, read> guides: array<GuideVertex>;
@group(0) @binding(3) var<storage, read> strands: array<StrandRange>;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec3<f32>,
    @location(1) along: f32,
    @location(2) across: f32,
};

fn hash(n: u32) -> f32 {
    var x = n * 747796405u + 2891336453u;
    x = ((x >> ((x >> 28u) + 4u)) ^ x) * 277803737u;
    x = (x >> 22u) ^ x;
    return f32(x) / 4294967295.0;
}

fn guide_point(range: StrandRange, i: i32) -> vec3<f32> {
    let last = max(i32(range.vertex_count) - 1, 0);
    let idx = clamp(i, 0, last);
    return guides[range.first_vertex + u32(idx)].position.xyz;
}

fn catmull_rom(p0: vec3<f32>, p1: vec3<f32>, p2: vec3<f32>, p3: vec3<f32>, t: f32) -> vec3<f32> {
    let t2 = t * t;
    let t3 = t2 * t;
    return 0.5 * ((2.0 * p1)
        + (p2 - p0) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (3.0 * p1 - p0 - 3.0 * p2 + p3) * t3);
}

fn strand_point(range: StrandRange, s: f32) -> vec3<f32> {
    let segments = max(i32(range.vertex_count) - 1, 1);
    let x = clamp(s, 0.0, 1.0) * f32(segments);
    let seg = min(i32(floor(x)), segments - 1);
    let t = x - f32(seg);
    return catmull_rom(
        guide_point(range, seg - 1),
        guide_point(range, seg),
        guide_point(range, seg + 1),
        guide_point(range, seg + 2),
        t,
    );
}

fn strand_tangent(range: StrandRange, s: f32) -> vec3<f32> {
    let ds = 1.0 / f32(max(hair.spline_vertices, 2u));
    let d = strand_point(range, min(s + ds, 1.0)) - strand_point(range, max(s - ds, 0.0));
    let len = length(d);
    // Collapsed strands fall back to the root direction
    let root_dir = guides[range.first_vertex].tangent.xyz;
    return select(root_dir, d / max(len, 1e-6), len > 1e-6);
}

@vertex
fn vs_main(
    @builtin(vertex_index) vertex_index: u32,
    @builtin(instance_index) instance_index: u32,
) -> VertexOutput {
    let group_size = max(hair.group_hairs, 1u);
    let strand_index = instance_index / group_size;
    let member = instance_index % group_size;
    let range = strands[strand_index];

    let samples = max(hair.spline_vertices, 2u);
    let sample_index = min(vertex_index / 2u, samples - 1u);
    let side = f32(vertex_index % 2u) * 2.0 - 1.0;
    let s = f32(sample_index) / f32(samples - 1u);

    var center = strand_point(range, s);
    let tangent = strand_tangent(range, s);

    let root_dir = guides[range.first_vertex].tangent.xyz;
    let helper = select(vec3<f32>(0.0, 1.0, 0.0), vec3<f32>(1.0, 0.0, 0.0), abs(root_dir.y) > 0.9);
    let u_axis = normalize(cross(root_dir, helper));
    let v_axis = cross(root_dir, u_axis);

    // Member 0 follows its guide exactly; the rest spread out toward the tip
    let seed = strand_index * 7919u + member * 104729u;
    let angle = hash(seed) * 6.2831853;
    let radius = sqrt(hash(seed + 1u)) * hair.group_spread * f32(member != 0u);
    center += (cos(angle) * u_axis + sin(angle) * v_axis) * radius * (0.3 + 0.7 * s);

    let phase = hash(seed + 2u) * 6.2831853;
    let wobble = vec3<f32>(
        sin(s * 12.0 + phase + hair.time),
        sin(s * 9.0 + phase * 1.3),
        cos(s * 11.0 + phase * 0.7),
    );
    center += wobble * hair.noise_amplitude * s;

    let world = (globals.model * vec4<f32>(center, 1.0)).xyz;
    let to_camera = globals.camera_position.xyz - world;
    let side_raw = cross(tangent, to_camera);
    let side_len = length(side_raw);
    let side_dir = select(u_axis, side_raw / max(side_len, 1e-6), side_len > 1e-6);
    let taper = 1.0 - 0.8 * s;
    let position = world + side_dir * side * hair.hair_radius * taper;

    var out: VertexOutput;
    out.clip_position = globals.projection * globals.view * vec4<f32>(position, 1.0);
    out.color = hair.color * (0.6 + 0.4 * s);
    out.along = s;
    out.across = side;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let edge = 1.0 - abs(in.across);
    let shade = 0.75 + 0.25 * edge;
    let alpha = 1.0 - 0.5 * in.along;
    return vec4<f32>(in.color * shade, alpha);
}
"#;

/// Per-frame camera state shared by everything drawn.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct GlobalUniforms {
    pub projection: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub camera_position: [f32; 4],
}

impl GlobalUniforms {
    pub fn new(projection: Mat4, view: Mat4, model: Mat4, camera_position: Vec3) -> Self {
        Self {
            projection: projection.to_cols_array_2d(),
            view: view.to_cols_array_2d(),
            model: model.to_cols_array_2d(),
            camera_position: camera_position.extend(1.0).to_array(),
        }
    }
}

impl Default for GlobalUniforms {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY, Mat4::IDENTITY, Mat4::IDENTITY, Vec3::Z)
    }
}

/// Per-object attributes applied uniformly to every guide hair of an object.
///
/// Layout matches `HairParams` in [`HAIR_SHADER`]: the `vec3` color takes 12
/// bytes and `group_hairs` packs into its trailing slot.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct HairUniforms {
    pub color: [f32; 3],
    pub group_hairs: u32,
    pub group_spread: f32,
    pub hair_radius: f32,
    pub noise_amplitude: f32,
    pub spline_vertices: u32,
    /// Elapsed seconds; phase input for the noise.
    pub time: f32,
    pub strand_count: u32,
    pub _pad: [u32; 2],
}

impl HairUniforms {
    pub fn new(attributes: &HairAttributes, time: f32, strand_count: u32) -> Self {
        Self {
            color: attributes.color.to_array(),
            group_hairs: attributes.group_hairs,
            group_spread: attributes.group_spread,
            hair_radius: attributes.hair_radius,
            noise_amplitude: attributes.noise_amplitude,
            spline_vertices: attributes.spline_vertices,
            time,
            strand_count,
            _pad: [0; 2],
        }
    }
}

/// One guide-hair vertex as stored in the guide storage buffer.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct GuideVertexGpu {
    pub position: [f32; 4],
    pub tangent: [f32; 4],
}

impl GuideVertexGpu {
    pub fn new(position: Vec3, tangent: Vec3) -> Self {
        Self {
            position: position.extend(1.0).to_array(),
            tangent: tangent.extend(0.0).to_array(),
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::new(self.position[0], self.position[1], self.position[2])
    }

    pub fn tangent(&self) -> Vec3 {
        Vec3::new(self.tangent[0], self.tangent[1], self.tangent[2])
    }
}

/// Where one strand lives inside the guide buffer.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Pod, Zeroable)]
pub struct StrandRange {
    pub first_vertex: u32,
    pub vertex_count: u32,
}

/// Receiver for per-frame hair draw state.
///
/// `set_object_uniforms` must be called before any `draw_guide_hair` of the
/// same object in a frame.
pub trait RenderSink {
    fn set_global_uniforms(&mut self, globals: &GlobalUniforms);
    fn set_object_uniforms(&mut self, uniforms: &HairUniforms);
    fn draw_guide_hair(&mut self, vertices: &[GuideVertexGpu]);
}

/// Guide strands gathered for one frame, packed back to back.
#[derive(Debug, Clone, Default)]
pub struct StrandBatch {
    vertices: Vec<GuideVertexGpu>,
    ranges: Vec<StrandRange>,
}

impl StrandBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.ranges.clear();
    }

    /// Append a strand; empty chains are ignored.
    pub fn push(&mut self, strand: &[GuideVertexGpu]) {
        if strand.is_empty() {
            return;
        }
        self.ranges.push(StrandRange {
            first_vertex: self.vertices.len() as u32,
            vertex_count: strand.len() as u32,
        });
        self.vertices.extend_from_slice(strand);
    }

    pub fn vertices(&self) -> &[GuideVertexGpu] {
        &self.vertices
    }

    pub fn ranges(&self) -> &[StrandRange] {
        &self.ranges
    }

    pub fn strand_count(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Vertices of the strand at `index`.
    pub fn strand(&self, index: usize) -> Option<&[GuideVertexGpu]> {
        let range = self.ranges.get(index)?;
        let start = range.first_vertex as usize;
        self.vertices.get(start..start + range.vertex_count as usize)
    }

    /// Instances drawn for this batch: one per rendered hair.
    pub fn instance_count(&self, uniforms: &HairUniforms) -> u32 {
        self.ranges.len() as u32 * uniforms.group_hairs.max(1)
    }

    /// Triangle-strip vertices per rendered hair.
    pub fn vertices_per_instance(uniforms: &HairUniforms) -> u32 {
        uniforms.spline_vertices.max(2) * 2
    }
}

/// A command observed by a [`RecordingSink`].
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    Globals(GlobalUniforms),
    Object(HairUniforms),
    Strand { vertex_count: usize },
}

/// In-memory sink that records what it was asked to draw.
///
/// Used for headless runs and tests. Strands drawn before any object uniforms
/// in the current frame are still recorded, but counted as out of order.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    commands: Vec<RenderCommand>,
    batch: StrandBatch,
    globals: Option<GlobalUniforms>,
    object: Option<HairUniforms>,
    out_of_order: usize,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything recorded so far.
    pub fn begin_frame(&mut self) {
        self.commands.clear();
        self.batch.clear();
        self.globals = None;
        self.object = None;
        self.out_of_order = 0;
    }

    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    pub fn globals(&self) -> Option<&GlobalUniforms> {
        self.globals.as_ref()
    }

    /// The most recent object uniforms.
    pub fn object_uniforms(&self) -> Option<&HairUniforms> {
        self.object.as_ref()
    }

    pub fn batch(&self) -> &StrandBatch {
        &self.batch
    }

    /// Every strand drawn this frame, in order.
    pub fn strands(&self) -> Vec<&[GuideVertexGpu]> {
        (0..self.batch.strand_count())
            .filter_map(|i| self.batch.strand(i))
            .collect()
    }

    /// Strands drawn before object uniforms were set.
    pub fn out_of_order_draws(&self) -> usize {
        self.out_of_order
    }
}

impl RenderSink for RecordingSink {
    fn set_global_uniforms(&mut self, globals: &GlobalUniforms) {
        self.globals = Some(*globals);
        self.commands.push(RenderCommand::Globals(*globals));
    }

    fn set_object_uniforms(&mut self, uniforms: &HairUniforms) {
        self.object = Some(*uniforms);
        self.commands.push(RenderCommand::Object(*uniforms));
    }

    fn draw_guide_hair(&mut self, vertices: &[GuideVertexGpu]) {
        if self.object.is_none() {
            self.out_of_order += 1;
        }
        self.batch.push(vertices);
        self.commands.push(RenderCommand::Strand {
            vertex_count: vertices.len(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_sizes_match_wgsl() {
        assert_eq!(std::mem::size_of::<GlobalUniforms>(), 208);
        assert_eq!(std::mem::size_of::<HairUniforms>(), 48);
        assert_eq!(std::mem::size_of::<GuideVertexGpu>(), 32);
        assert_eq!(std::mem::size_of::<StrandRange>(), 8);
    }

    #[test]
    fn test_hair_uniforms_from_attributes() {
        let attrs = HairAttributes {
            color: Vec3::new(0.1, 0.2, 0.3),
            group_hairs: 12,
            ..Default::default()
        };
        let u = HairUniforms::new(&attrs, 2.5, 7);
        assert_eq!(u.color, [0.1, 0.2, 0.3]);
        assert_eq!(u.group_hairs, 12);
        assert_eq!(u.spline_vertices, attrs.spline_vertices);
        assert_eq!(u.time, 2.5);
        assert_eq!(u.strand_count, 7);
    }

    #[test]
    fn test_batch_packs_strands() {
        let mut batch = StrandBatch::new();
        let a = vec![GuideVertexGpu::new(Vec3::ZERO, Vec3::Y); 3];
        let b = vec![GuideVertexGpu::new(Vec3::X, Vec3::Y); 5];
        batch.push(&a);
        batch.push(&[]);
        batch.push(&b);

        assert_eq!(batch.strand_count(), 2);
        assert_eq!(batch.ranges()[1], StrandRange { first_vertex: 3, vertex_count: 5 });
        assert_eq!(batch.strand(1).map(|s| s.len()), Some(5));
        assert_eq!(batch.strand(2), None);

        let uniforms = HairUniforms::new(&HairAttributes::default(), 0.0, 2);
        assert_eq!(batch.instance_count(&uniforms), 2 * uniforms.group_hairs);
        assert_eq!(
            StrandBatch::vertices_per_instance(&uniforms),
            uniforms.spline_vertices * 2
        );
    }

    #[test]
    fn test_recording_sink_flags_out_of_order_draws() {
        let mut sink = RecordingSink::new();
        let strand = [GuideVertexGpu::new(Vec3::ZERO, Vec3::Y)];
        sink.draw_guide_hair(&strand);
        assert_eq!(sink.out_of_order_draws(), 1);

        sink.begin_frame();
        sink.set_object_uniforms(&HairUniforms::new(&HairAttributes::default(), 0.0, 1));
        sink.draw_guide_hair(&strand);
        assert_eq!(sink.out_of_order_draws(), 0);
        assert_eq!(sink.commands().len(), 2);
    }
}
