//! Force and constraint solver shared by every guide hair of an object.
//!
//! One call to [`Simulation::simulate`] advances every free vertex by one
//! step of semi-implicit Euler:
//!
//! ```text
//! F = m g - c v + stretch + bending
//! v' = v + dt * F / m
//! x' = x + dt * v'
//! ```
//!
//! followed by a follow-the-leader length pass. Walking from root to tip,
//! each vertex is put back at its rest length from the already settled vertex
//! before it and pushed out of every [`Collider`]. Velocities are then rebuilt
//! from the settled positions, minus a damped share of the next vertex's
//! correction:
//!
//! ```text
//! v_i = (x_i - x_i_prev) / dt - s * d_(i+1) / dt
//! ```
//!
//! With [`SimulationConfig::length_constraint`] off, the stretch spring alone
//! holds the segments together and colliders only project vertices.
//!
//! # Stability
//!
//! The solver never substeps. For unit-mass vertices the force terms stay
//! stable while `dt <= SimulationConfig::max_stable_timestep()`. Past that
//! the spring-only chain diverges; the constrained chain stays bounded by its
//! rest lengths but jitters. Choosing the timestep and stiffness is up to the
//! caller.

use crate::hair::{GuideHair, HairVertex, SEGMENT_EPSILON};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Physical parameters of a [`Simulation`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Acceleration applied to every free vertex.
    pub gravity: Vec3,
    /// Spring constant pulling each segment toward its rest length.
    pub stretch_stiffness: f32,
    /// Pull of each vertex toward the midpoint of its neighbours.
    pub bending_stiffness: f32,
    /// Linear velocity damping coefficient.
    pub damping: f32,
    /// Distance kept between vertices and collider surfaces.
    pub collision_margin: f32,
    /// Fraction of tangential velocity removed on contact, in `[0, 1]`.
    pub friction: f32,
    /// Hold every segment at its rest length after integration.
    pub length_constraint: bool,
    /// Share of the next vertex's length correction taken out of a vertex's
    /// velocity, in `[0, 1]`.
    pub constraint_damping: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.81, 0.0),
            stretch_stiffness: 400.0,
            bending_stiffness: 20.0,
            damping: 1.5,
            collision_margin: 0.01,
            friction: 0.3,
            length_constraint: true,
            constraint_damping: 0.9,
        }
    }
}

impl SimulationConfig {
    /// Largest timestep the force terms handle without diverging, for
    /// unit-mass vertices.
    pub fn max_stable_timestep(&self) -> f32 {
        let stiffness = self.stretch_stiffness.max(0.0) + self.bending_stiffness.max(0.0);
        if stiffness <= 0.0 {
            return f32::INFINITY;
        }
        1.0 / stiffness.sqrt()
    }
}

/// Static collision geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Collider {
    Sphere { center: Vec3, radius: f32 },
    /// Half-space above `point` along the unit `normal`.
    Plane { point: Vec3, normal: Vec3 },
}

impl Collider {
    pub fn sphere(center: Vec3, radius: f32) -> Self {
        Collider::Sphere {
            center,
            radius: radius.abs(),
        }
    }

    /// A plane through `point`; a zero normal falls back to +Y.
    pub fn plane(point: Vec3, normal: Vec3) -> Self {
        Collider::Plane {
            point,
            normal: normal.try_normalize().unwrap_or(Vec3::Y),
        }
    }

    /// Signed distance from `position` to the collider surface.
    pub fn signed_distance(&self, position: Vec3) -> f32 {
        match *self {
            Collider::Sphere { center, radius } => position.distance(center) - radius,
            Collider::Plane { point, normal } => (position - point).dot(normal),
        }
    }

    /// Outward surface normal at the point of the surface nearest `position`.
    pub fn normal_at(&self, position: Vec3) -> Vec3 {
        match *self {
            Collider::Sphere { center, .. } => (position - center).try_normalize().unwrap_or(Vec3::Y),
            Collider::Plane { normal, .. } => normal,
        }
    }

    /// Distance a vertex must keep from the surface so that a straight
    /// `segment` between two such vertices stays outside as well.
    ///
    /// A chord of length `L` between two points at radius `R` dips to
    /// `sqrt(R^2 - L^2 / 4)`, so spheres need at least
    /// `sqrt(r^2 + L^2 / 4) - r`. Planes need nothing beyond `margin`.
    pub fn clearance(&self, margin: f32, segment: f32) -> f32 {
        match *self {
            Collider::Sphere { radius, .. } => {
                let sag = (radius * radius + 0.25 * segment * segment).sqrt() - radius;
                margin.max(sag)
            }
            Collider::Plane { .. } => margin,
        }
    }

    /// Where `position` must move to sit `margin` outside the surface, and the
    /// outward normal there. `None` when it is already clear.
    pub fn project(&self, position: Vec3, margin: f32) -> Option<(Vec3, Vec3)> {
        match *self {
            Collider::Sphere { center, radius } => {
                let offset = position - center;
                let dist = offset.length();
                let target = radius + margin;
                if dist >= target {
                    return None;
                }
                let normal = if dist > SEGMENT_EPSILON { offset / dist } else { Vec3::Y };
                Some((center + normal * target, normal))
            }
            Collider::Plane { point, normal } => {
                let dist = (position - point).dot(normal);
                if dist >= margin {
                    return None;
                }
                Some((position + normal * (margin - dist), normal))
            }
        }
    }

    /// Like [`project`](Self::project) for a vertex hanging `length` from
    /// `anchor`: the result sits `clearance` outside the surface and, where
    /// the two shells meet, exactly `length` from `anchor`.
    pub fn constrain(&self, anchor: Vec3, position: Vec3, length: f32, clearance: f32) -> Option<(Vec3, Vec3)> {
        let (projected, normal) = self.project(position, clearance)?;

        // Circle where the clearance shell meets the sphere of `length`
        // around `anchor`, as (center, axis, radius squared)
        let ring = match *self {
            Collider::Sphere { center, radius } => {
                let shell = radius + clearance;
                let offset = anchor - center;
                let d = offset.length();
                if d <= SEGMENT_EPSILON {
                    None
                } else {
                    let axis = offset / d;
                    let h = (d * d + shell * shell - length * length) / (2.0 * d);
                    Some((center + axis * h, axis, shell * shell - h * h))
                }
            }
            Collider::Plane { point, normal } => {
                let height = (anchor - point).dot(normal) - clearance;
                Some((anchor - normal * height, normal, length * length - height * height))
            }
        };

        let settled = ring.filter(|&(_, _, rho2)| rho2 >= 0.0).and_then(|(hub, axis, rho2)| {
            let spoke = projected - hub;
            (spoke - axis * spoke.dot(axis))
                .try_normalize()
                .map(|w| hub + w * rho2.sqrt())
        });

        match settled {
            Some(p) => Some((p, self.normal_at(p))),
            None => Some((projected, normal)),
        }
    }
}

/// Advances guide-hair vertices. Holds parameters and colliders only, so one
/// instance can serve any number of hair objects.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Simulation {
    config: SimulationConfig,
    colliders: Vec<Collider>,
}

impl Simulation {
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            config,
            colliders: Vec::new(),
        }
    }

    /// Add a static collider.
    pub fn with_collider(mut self, collider: Collider) -> Self {
        self.colliders.push(collider);
        self
    }

    pub fn with_gravity(mut self, gravity: Vec3) -> Self {
        self.config.gravity = gravity;
        self
    }

    #[inline]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    #[inline]
    pub fn colliders(&self) -> &[Collider] {
        &self.colliders
    }

    /// Advance every hair by `dt` seconds.
    ///
    /// A zero, negative or non-finite `dt` leaves everything untouched.
    /// Pinned vertices never move.
    pub fn simulate(&self, hairs: &mut [GuideHair], dt: f32) {
        if !(dt > 0.0 && dt.is_finite()) {
            return;
        }
        let mut contacts = Vec::new();
        for hair in hairs {
            self.step(hair.vertices_mut(), &mut contacts, dt);
        }
    }

    fn step(&self, vertices: &mut [HairVertex], contacts: &mut Vec<Option<Vec3>>, dt: f32) {
        if vertices.len() < 2 {
            return;
        }
        contacts.clear();
        contacts.resize(vertices.len(), None);

        self.accumulate_forces(vertices);
        self.integrate(vertices, dt);
        if self.config.length_constraint {
            self.follow_the_leader(vertices, contacts);
        } else {
            self.resolve_collisions(vertices, contacts);
        }
        self.update_velocities(vertices, contacts, dt);
    }

    fn accumulate_forces(&self, vertices: &mut [HairVertex]) {
        let cfg = &self.config;
        for v in vertices.iter_mut() {
            v.force = if v.is_pinned() {
                Vec3::ZERO
            } else {
                cfg.gravity * v.mass - cfg.damping * v.velocity
            };
        }

        // Stretch: equal and opposite spring forces on both ends
        for i in 1..vertices.len() {
            let delta = vertices[i].position - vertices[i - 1].position;
            let len = delta.length();
            if len <= SEGMENT_EPSILON {
                continue;
            }
            let f = delta / len * (cfg.stretch_stiffness * (len - vertices[i].rest_length));
            vertices[i].force -= f;
            vertices[i - 1].force += f;
        }

        if cfg.bending_stiffness > 0.0 {
            for i in 1..vertices.len() - 1 {
                let laplacian =
                    vertices[i - 1].position + vertices[i + 1].position - 2.0 * vertices[i].position;
                vertices[i].force += cfg.bending_stiffness * laplacian;
            }
        }
    }

    fn integrate(&self, vertices: &mut [HairVertex], dt: f32) {
        for v in vertices.iter_mut() {
            v.prev_position = v.position;
            v.correction = Vec3::ZERO;
            if v.is_pinned() {
                v.velocity = Vec3::ZERO;
                continue;
            }
            v.velocity += v.force * v.inv_mass * dt;
            v.position += v.velocity * dt;
        }
    }

    /// Root-to-tip length pass with collisions folded in.
    fn follow_the_leader(&self, vertices: &mut [HairVertex], contacts: &mut [Option<Vec3>]) {
        let margin = self.config.collision_margin;
        for i in 1..vertices.len() {
            if vertices[i].is_pinned() {
                continue;
            }
            let anchor = vertices[i - 1].position;
            let next_rest = vertices.get(i + 1).map_or(0.0, |n| n.rest_length);
            let v = &mut vertices[i];
            let rest = v.rest_length;
            let heading = (v.position - anchor).try_normalize().unwrap_or(v.direction);

            let mut target = anchor + heading * rest;
            for collider in &self.colliders {
                let clearance = collider.clearance(margin, rest.max(next_rest));
                if let Some((position, normal)) = collider.constrain(anchor, target, rest, clearance) {
                    target = position;
                    contacts[i] = Some(normal);
                }
            }
            v.correction = target - v.position;
            v.position = target;
        }
    }

    fn resolve_collisions(&self, vertices: &mut [HairVertex], contacts: &mut [Option<Vec3>]) {
        if self.colliders.is_empty() {
            return;
        }
        let margin = self.config.collision_margin;
        for (v, contact) in vertices.iter_mut().zip(contacts.iter_mut()) {
            if v.is_pinned() {
                continue;
            }
            for collider in &self.colliders {
                let Some((position, normal)) = collider.project(v.position, margin) else {
                    continue;
                };
                v.correction += position - v.position;
                v.position = position;
                *contact = Some(normal);
            }
        }
    }

    /// Rebuild velocities from the settled positions, then apply contact
    /// friction.
    fn update_velocities(&self, vertices: &mut [HairVertex], contacts: &[Option<Vec3>], dt: f32) {
        let cfg = &self.config;
        let share = if cfg.length_constraint {
            cfg.constraint_damping.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let keep = (1.0 - cfg.friction).clamp(0.0, 1.0);
        let inv_dt = 1.0 / dt;

        for i in 0..vertices.len() {
            if vertices[i].is_pinned() {
                continue;
            }
            let next_correction = vertices.get(i + 1).map_or(Vec3::ZERO, |n| n.correction);
            let v = &mut vertices[i];
            let mut velocity = (v.position - v.prev_position) * inv_dt - next_correction * (share * inv_dt);

            if let Some(normal) = contacts[i] {
                let normal_speed = velocity.dot(normal);
                let tangential = velocity - normal * normal_speed;
                velocity = tangential * keep + normal * normal_speed.max(0.0);
            }
            v.velocity = velocity;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn horizontal_hair(vertices: usize) -> GuideHair {
        GuideHair::new(vertices, 0.5, Vec3::ZERO, Vec3::X)
    }

    fn spring_only() -> SimulationConfig {
        SimulationConfig {
            length_constraint: false,
            ..SimulationConfig::default()
        }
    }

    fn max_stretch_error(hair: &GuideHair) -> f32 {
        hair.vertices()
            .windows(2)
            .map(|w| (w[1].position.distance(w[0].position) - w[1].rest_length).abs())
            .fold(0.0, f32::max)
    }

    fn is_bounded(hair: &GuideHair, limit: f32) -> bool {
        hair.vertices()
            .iter()
            .all(|v| v.position.is_finite() && v.position.length() < limit)
    }

    /// Closest distance from `center` to the segment `a`-`b`.
    fn segment_distance(a: Vec3, b: Vec3, center: Vec3) -> f32 {
        let ab = b - a;
        let t = if ab.length_squared() > 0.0 {
            ((center - a).dot(ab) / ab.length_squared()).clamp(0.0, 1.0)
        } else {
            0.0
        };
        (a + ab * t).distance(center)
    }

    #[test]
    fn test_root_never_moves() {
        let sim = Simulation::default();
        let mut hairs = vec![horizontal_hair(8), GuideHair::new(4, 0.3, Vec3::ONE, Vec3::Y)];
        let roots: Vec<Vec3> = hairs.iter().map(|h| h.vertices()[0].position).collect();
        for _ in 0..200 {
            sim.simulate(&mut hairs, 1.0 / 60.0);
        }
        for (hair, root) in hairs.iter().zip(roots) {
            assert_eq!(hair.vertices()[0].position, root);
            assert_eq!(hair.len(), hair.vertices().len());
        }
        assert_eq!(hairs[0].len(), 8);
    }

    #[test]
    fn test_gravity_pulls_free_vertices_down() {
        let sim = Simulation::default();
        let mut hairs = vec![horizontal_hair(4)];
        sim.simulate(&mut hairs, 1.0 / 60.0);
        for v in &hairs[0].vertices()[1..] {
            assert!(v.position.y < 0.0);
            assert!(v.velocity.y < 0.0);
        }
    }

    #[test]
    fn test_zero_delta_is_a_no_op() {
        let sim = Simulation::default().with_collider(Collider::plane(Vec3::new(0.0, 0.2, 0.0), Vec3::Y));
        let mut hairs = vec![horizontal_hair(6)];
        hairs[0].vertices_mut()[3].velocity = Vec3::new(1.0, 2.0, 3.0);
        let before = hairs.clone();
        for _ in 0..50 {
            sim.simulate(&mut hairs, 0.0);
        }
        sim.simulate(&mut hairs, f32::NAN);
        sim.simulate(&mut hairs, -1.0);
        assert_eq!(hairs, before);
    }

    #[test]
    fn test_stretch_error_shrinks_with_stiffness() {
        let settle = |stiffness: f32| {
            let sim = Simulation::new(SimulationConfig {
                stretch_stiffness: stiffness,
                bending_stiffness: 0.0,
                damping: 2.0,
                ..spring_only()
            });
            let mut hairs = vec![horizontal_hair(5)];
            for _ in 0..3000 {
                sim.simulate(&mut hairs, 1.0 / 240.0);
            }
            max_stretch_error(&hairs[0])
        };
        let soft = settle(100.0);
        let medium = settle(500.0);
        let stiff = settle(2000.0);
        assert!(medium < soft, "soft {soft}, medium {medium}");
        assert!(stiff < medium, "medium {medium}, stiff {stiff}");
        assert!(stiff < 0.05);
    }

    #[test]
    fn test_default_hair_keeps_rest_lengths_under_gravity() {
        let sim = Simulation::default();
        let mut hairs = vec![GuideHair::new(20, 0.4, Vec3::ZERO, Vec3::X)];
        for _ in 0..1200 {
            sim.simulate(&mut hairs, 1.0 / 60.0);
        }
        let hair = &hairs[0];
        for w in hair.vertices().windows(2) {
            let ratio = w[1].position.distance(w[0].position) / w[1].rest_length;
            assert!((ratio - 1.0).abs() < 1e-3, "segment ratio {ratio}");
        }
        // Hanging straight down from the root
        let tip = hair.vertices()[19].position;
        assert!(tip.y < -0.9 * hair.rest_length(), "tip {tip}");
        assert!(is_bounded(hair, hair.rest_length() + 1e-3));
    }

    #[test]
    fn test_spring_alone_sags_under_gravity() {
        let sim = Simulation::new(spring_only());
        let mut hairs = vec![GuideHair::new(20, 0.4, Vec3::ZERO, Vec3::X)];
        for _ in 0..1200 {
            sim.simulate(&mut hairs, 1.0 / 60.0);
        }
        let root_segment = hairs[0].vertices()[1].position.length() / 0.4;
        assert!(root_segment > 1.5, "root segment ratio {root_segment}");
    }

    #[test]
    fn test_constraint_damping_slows_the_chain() {
        let energy = |share: f32| {
            let sim = Simulation::new(SimulationConfig {
                constraint_damping: share,
                ..SimulationConfig::default()
            });
            let mut hairs = vec![GuideHair::new(10, 0.3, Vec3::ZERO, Vec3::X)];
            for _ in 0..30 {
                sim.simulate(&mut hairs, 1.0 / 60.0);
            }
            hairs[0].vertices().iter().map(|v| v.velocity.length_squared()).sum::<f32>()
        };
        assert!(energy(0.9) < energy(0.0));
    }

    #[test]
    fn test_corrections_are_recorded() {
        let sim = Simulation::default();
        let mut hairs = vec![horizontal_hair(4)];
        sim.simulate(&mut hairs, 1.0 / 60.0);
        let vertices = hairs[0].vertices();
        assert_eq!(vertices[0].correction, Vec3::ZERO);
        for v in &vertices[1..] {
            // Gravity stretched the integrated chain, the pass pulled it back
            assert!(v.correction.x < 0.0);
            assert!((v.position - v.correction - v.prev_position).length() > 0.0);
        }
    }

    #[test]
    fn test_sphere_is_never_penetrated() {
        let radius = 1.0;
        let config = SimulationConfig::default();
        let sim = Simulation::new(config).with_collider(Collider::sphere(Vec3::ZERO, radius));
        let mut hairs: Vec<GuideHair> = [Vec3::X, Vec3::Z, Vec3::NEG_X, Vec3::new(1.0, 1.0, 0.0).normalize()]
            .iter()
            .map(|&n| GuideHair::new(10, 0.2, n * radius, n))
            .collect();
        for _ in 0..600 {
            sim.simulate(&mut hairs, 1.0 / 60.0);
            for hair in &hairs {
                for v in &hair.vertices()[1..] {
                    assert!(v.position.length() >= radius + config.collision_margin - 1e-4);
                }
                for w in hair.vertices()[1..].windows(2) {
                    let d = segment_distance(w[0].position, w[1].position, Vec3::ZERO);
                    assert!(d >= radius - 1e-4, "segment dips to {d}");
                }
            }
        }
    }

    #[test]
    fn test_long_segments_stay_outside_sphere() {
        // Segments longer than the margin alone can protect
        let radius = 1.0;
        let sim = Simulation::default().with_collider(Collider::sphere(Vec3::ZERO, radius));
        let mut hairs: Vec<GuideHair> = [Vec3::X, Vec3::Z, Vec3::new(1.0, 0.3, -0.5).normalize()]
            .iter()
            .map(|&n| GuideHair::new(20, 0.4, n * radius, n))
            .collect();
        for _ in 0..600 {
            sim.simulate(&mut hairs, 1.0 / 60.0);
        }
        for hair in &hairs {
            for w in hair.vertices()[1..].windows(2) {
                let mid = (w[0].position + w[1].position) * 0.5;
                assert!(mid.length() >= radius - 1e-4, "midpoint at {}", mid.length());
                assert!(segment_distance(w[0].position, w[1].position, Vec3::ZERO) >= radius - 1e-4);
            }
            assert!((hair.vertices()[1].position.distance(hair.vertices()[0].position) - 0.4).abs() < 1e-3);
        }
    }

    #[test]
    fn test_plane_contact_removes_inward_velocity() {
        let tip_after = |friction: f32| {
            let sim = Simulation::new(SimulationConfig {
                friction,
                ..SimulationConfig::default()
            })
            .with_collider(Collider::plane(Vec3::ZERO, Vec3::Y));
            let mut hairs = vec![GuideHair::new(2, 0.5, Vec3::new(0.0, 0.05, 0.0), Vec3::X)];
            hairs[0].vertices_mut()[1].velocity = Vec3::new(2.0, -10.0, 0.0);
            sim.simulate(&mut hairs, 1.0 / 60.0);
            hairs[0].vertices()[1]
        };
        let margin = SimulationConfig::default().collision_margin;
        let free = tip_after(0.0);
        let rough = tip_after(0.5);
        for tip in [free, rough] {
            assert!((tip.position.y - margin).abs() < 1e-5);
            assert!(tip.velocity.y.abs() < 1e-5);
        }
        // Contact keeps the segment length
        assert!((free.position.distance(Vec3::new(0.0, 0.05, 0.0)) - 0.5).abs() < 1e-5);
        assert!(free.velocity.x != 0.0);
        assert!((rough.velocity.x - 0.5 * free.velocity.x).abs() < 1e-4);
    }

    #[test]
    fn test_collider_projection() {
        let sphere = Collider::sphere(Vec3::ZERO, 2.0);
        let (p, n) = sphere.project(Vec3::new(0.0, 1.0, 0.0), 0.1).unwrap();
        assert!((p - Vec3::new(0.0, 2.1, 0.0)).length() < 1e-6);
        assert_eq!(n, Vec3::Y);
        assert!(sphere.project(Vec3::new(0.0, 3.0, 0.0), 0.1).is_none());

        let plane = Collider::plane(Vec3::ZERO, Vec3::Y * 5.0);
        assert!((plane.signed_distance(Vec3::new(4.0, -2.0, 1.0)) + 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_constrain_keeps_length_on_sphere() {
        let sphere = Collider::sphere(Vec3::ZERO, 1.0);
        let anchor = Vec3::new(1.05, 0.0, 0.0);
        let (p, n) = sphere
            .constrain(anchor, Vec3::new(0.9, -0.3, 0.0), 0.4, 0.05)
            .unwrap();
        assert!((p.length() - 1.05).abs() < 1e-5);
        assert!((p.distance(anchor) - 0.4).abs() < 1e-5);
        assert!((n - p.normalize()).length() < 1e-5);
        assert!(p.y < 0.0);
    }

    #[test]
    fn test_clearance_covers_chord_sag() {
        let sphere = Collider::sphere(Vec3::ZERO, 1.0);
        assert_eq!(sphere.clearance(0.01, 0.1), 0.01);
        let c = sphere.clearance(0.01, 0.4);
        assert!((c - (1.04_f32.sqrt() - 1.0)).abs() < 1e-6);
        let plane = Collider::plane(Vec3::ZERO, Vec3::Y);
        assert_eq!(plane.clearance(0.01, 10.0), 0.01);
    }

    #[test]
    fn test_stable_range() {
        let config = SimulationConfig::default();
        let dt_max = config.max_stable_timestep();
        assert!(dt_max > 1.0 / 60.0, "default config should be stable at 60 Hz");

        let run = |config: SimulationConfig, dt: f32| {
            let sim = Simulation::new(config);
            let mut hairs = vec![horizontal_hair(12)];
            for _ in 0..400 {
                sim.simulate(&mut hairs, dt);
            }
            hairs.remove(0)
        };
        let spring = spring_only();
        assert!(is_bounded(&run(spring, dt_max * 0.5), 100.0));
        assert!(!is_bounded(&run(spring, dt_max * 10.0), 100.0));

        // The length pass keeps an oversized step within reach of the root
        let held = run(config, dt_max * 10.0);
        assert!(is_bounded(&held, held.rest_length() + 1e-2));
    }

    #[test]
    fn test_unbent_strand_has_no_bending_force() {
        let sim = Simulation::new(SimulationConfig {
            gravity: Vec3::ZERO,
            ..SimulationConfig::default()
        });
        let mut hairs = vec![horizontal_hair(6)];
        let before = hairs.clone();
        sim.simulate(&mut hairs, 1.0 / 60.0);
        for (a, b) in hairs[0].vertices().iter().zip(before[0].vertices()) {
            assert!((a.position - b.position).length() < 1e-6);
        }
    }
}
