// src/scene.rs
//! The simulation scene: a rapier world plus the bookkeeping the demo needs.
//!
//! - actors and their shapes are created from [`ActorDesc`]s and keep their name,
//!   color and filter data next to the rapier handles;
//! - joints are created from [`JointDesc`]s between two live actors;
//! - [`Scene::step`] advances rapier, then reports filtered trigger/contact events,
//!   broken joints and wake/sleep transitions to a [`SimulationEventCallback`].

use std::collections::HashMap;
use std::time::Instant;

use crossbeam::channel::{unbounded, Receiver};
use log::{debug, info, warn};
use nalgebra::Vector3;
use rapier3d::prelude::{
    ActiveEvents, BroadPhase, CCDSolver, ChannelEventCollector, ColliderBuilder, ColliderHandle,
    ColliderSet, CollisionEvent, ContactForceEvent, ImpulseJointHandle, ImpulseJointSet,
    IntegrationParameters, IslandManager, MultibodyJointSet, NarrowPhase, PhysicsPipeline,
    QueryPipeline, RigidBodyBuilder, RigidBodyHandle, RigidBodySet,
};

use crate::actors::{ActorDesc, BodyKind, Color, GeometryType, Material, Pose};
use crate::config::SceneConfig;
use crate::debug_draw::DebugDraw;
use crate::events::{
    BrokenConstraint, ContactPair, ContactPairHeader, SimulationEventCallback, TriggerPair,
};
use crate::filter::{filter_shader, FilterAttributes, FilterData, PairFlags};
use crate::joints::{JointDesc, JointKind};
use crate::{Error, Result};

pub type ActorId = RigidBodyHandle;
pub type ShapeId = ColliderHandle;
pub type JointId = ImpulseJointHandle;

/// Debug visualization switches. A parameter is on when its value is above zero;
/// `Scale` also multiplies the length of drawn axes and normals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisualizationParameter {
    Scale,
    CollisionShapes,
    ContactPoints,
    JointLocalFrames,
    BodyAxes,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActorRecord {
    pub id: ActorId,
    pub name: Option<String>,
    pub kind: BodyKind,
    pub color: Color,
    pub shapes: Vec<ShapeId>,
}

impl ActorRecord {
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("unnamed")
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeRecord {
    pub actor: ActorId,
    pub geometry: GeometryType,
    pub attributes: FilterAttributes,
    pub filter: FilterData,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JointRecord {
    pub id: JointId,
    pub name: Option<String>,
    pub kind: JointKind,
    pub actors: [ActorId; 2],
    pub break_force: Option<f32>,
}

#[derive(Debug, Clone, Default)]
pub struct SceneMetrics {
    pub last_step_time_ms: f32,
    pub step_count: u64,
    /// Dynamic bodies that are awake.
    pub active_bodies: usize,
    /// Collider pairs with at least one active contact.
    pub contact_pairs: usize,
}

pub struct Scene {
    gravity: Vector3<f32>,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: BroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,

    // rapier's collector needs Send + Sync, so events go through channels
    // and are drained right after the step.
    event_collector: ChannelEventCollector,
    collision_events: Receiver<CollisionEvent>,
    contact_force_events: Receiver<ContactForceEvent>,

    actors: Vec<ActorRecord>,
    actor_index: HashMap<ActorId, usize>,
    names: HashMap<String, ActorId>,
    shapes: HashMap<ShapeId, ShapeRecord>,
    joints: HashMap<JointId, JointRecord>,
    sleeping: HashMap<ActorId, bool>,

    default_material: Material,
    visualization: HashMap<VisualizationParameter, f32>,
    config: SceneConfig,
    metrics: SceneMetrics,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(&SceneConfig::default())
    }
}

impl Scene {
    pub fn new(config: &SceneConfig) -> Self {
        let (collision_send, collision_events) = unbounded();
        let (force_send, contact_force_events) = unbounded();

        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.dt = config.timestep;

        let g = config.gravity;
        Self {
            gravity: Vector3::new(g.x, g.y, g.z),
            integration_parameters,
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: BroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            event_collector: ChannelEventCollector::new(collision_send, force_send),
            collision_events,
            contact_force_events,
            actors: Vec::new(),
            actor_index: HashMap::new(),
            names: HashMap::new(),
            shapes: HashMap::new(),
            joints: HashMap::new(),
            sleeping: HashMap::new(),
            default_material: config.default_material,
            visualization: HashMap::new(),
            config: config.clone(),
            metrics: SceneMetrics::default(),
        }
    }

    // -------------------------------------------------------------------------
    // Scene parameters
    // -------------------------------------------------------------------------

    pub fn set_visualization_parameter(&mut self, parameter: VisualizationParameter, value: f32) {
        self.visualization.insert(parameter, value);
    }

    pub fn visualization_parameter(&self, parameter: VisualizationParameter) -> f32 {
        self.visualization.get(&parameter).copied().unwrap_or(0.0)
    }

    pub fn default_material(&self) -> Material {
        self.default_material
    }

    /// Replace the shared material. Every existing shape picks up the new values.
    pub fn set_default_material(&mut self, material: Material) {
        self.default_material = material;
        for (_, collider) in self.colliders.iter_mut() {
            collider.set_friction(material.dynamic_friction);
            collider.set_restitution(material.restitution);
        }
    }

    pub fn gravity(&self) -> Vector3<f32> {
        self.gravity
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn metrics(&self) -> &SceneMetrics {
        &self.metrics
    }

    // -------------------------------------------------------------------------
    // Actors
    // -------------------------------------------------------------------------

    /// Create the rigid body and colliders described by `desc`.
    ///
    /// Shapes are validated before anything is inserted, so a failed call leaves
    /// the scene unchanged.
    pub fn add_actor(&mut self, desc: &ActorDesc) -> Result<ActorId> {
        self.check_actor(desc)?;

        let mut colliders = Vec::with_capacity(desc.shapes.len());
        for shape in &desc.shapes {
            let geometry = shape.geometry.geometry_type();
            let collider = ColliderBuilder::new(shape.geometry.to_shared_shape()?)
                .position(shape.local_pose.to_isometry())
                .density(shape.density)
                .friction(self.default_material.dynamic_friction)
                .restitution(self.default_material.restitution)
                .sensor(shape.trigger)
                .active_events(ActiveEvents::COLLISION_EVENTS)
                .build();
            let record = ShapeRecord {
                actor: RigidBodyHandle::invalid(),
                geometry,
                attributes: shape.attributes(desc.kind),
                filter: shape.filter,
            };
            colliders.push((collider, record));
        }

        let builder = match desc.kind {
            BodyKind::Dynamic => RigidBodyBuilder::dynamic(),
            BodyKind::Static => RigidBodyBuilder::fixed(),
            BodyKind::Kinematic => RigidBodyBuilder::kinematic_position_based(),
        };
        let id = self.bodies.insert(builder.position(desc.pose.to_isometry()).build());

        let mut shapes = Vec::with_capacity(colliders.len());
        for (collider, mut record) in colliders {
            let handle = self.colliders.insert_with_parent(collider, id, &mut self.bodies);
            record.actor = id;
            self.shapes.insert(handle, record);
            shapes.push(handle);
        }

        if let Some(name) = &desc.name {
            self.names.insert(name.clone(), id);
        }
        if desc.kind != BodyKind::Static {
            self.sleeping.insert(id, false);
        }
        self.actor_index.insert(id, self.actors.len());
        self.actors.push(ActorRecord {
            id,
            name: desc.name.clone(),
            kind: desc.kind,
            color: desc.color,
            shapes,
        });

        debug!(
            "added {:?} actor `{}` with {} shape(s) at {}",
            desc.kind,
            desc.label(),
            desc.shapes.len(),
            desc.pose.position
        );
        Ok(id)
    }

    /// Everything [`add_actor`](Self::add_actor) would reject, without inserting.
    pub fn check_actor(&self, desc: &ActorDesc) -> Result<()> {
        if let Some(name) = &desc.name {
            if self.names.contains_key(name) {
                return Err(Error::DuplicateActor(name.clone()));
            }
        }
        desc.validate()
    }

    pub fn actor(&self, id: ActorId) -> Option<&ActorRecord> {
        self.actor_index.get(&id).map(|&i| &self.actors[i])
    }

    pub fn actor_by_name(&self, name: &str) -> Option<ActorId> {
        self.names.get(name).copied()
    }

    /// Actors in insertion order.
    pub fn actors(&self) -> impl Iterator<Item = &ActorRecord> {
        self.actors.iter()
    }

    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    pub fn contains_actor(&self, id: ActorId) -> bool {
        self.actor_index.contains_key(&id) && self.bodies.contains(id)
    }

    pub fn actor_pose(&self, id: ActorId) -> Option<Pose> {
        self.bodies.get(id).map(|body| Pose::from_isometry(body.position()))
    }

    pub fn shape(&self, id: ShapeId) -> Option<&ShapeRecord> {
        self.shapes.get(&id)
    }

    pub fn is_sleeping(&self, id: ActorId) -> Option<bool> {
        self.bodies.get(id).map(|body| body.is_sleeping())
    }

    // -------------------------------------------------------------------------
    // Joints
    // -------------------------------------------------------------------------

    /// Connect two live actors. `desc.frame0` is relative to `actor0`,
    /// `desc.frame1` to `actor1`.
    pub fn add_joint(&mut self, actor0: ActorId, actor1: ActorId, desc: &JointDesc) -> Result<JointId> {
        for actor in [actor0, actor1] {
            if !self.contains_actor(actor) {
                return Err(Error::InvalidHandle(actor));
            }
        }

        let id = self
            .impulse_joints
            .insert(actor0, actor1, desc.to_generic_joint(), true);
        self.joints.insert(
            id,
            JointRecord {
                id,
                name: desc.name.clone(),
                kind: desc.kind,
                actors: [actor0, actor1],
                break_force: desc.break_force,
            },
        );
        debug!("added {} joint `{}`", desc.kind.label(), desc.label());
        Ok(id)
    }

    /// Remove a joint. The connected actors are left alone.
    pub fn remove_joint(&mut self, id: JointId) -> Option<JointRecord> {
        let record = self.joints.remove(&id)?;
        self.impulse_joints.remove(id, true);
        Some(record)
    }

    pub fn joint(&self, id: JointId) -> Option<&JointRecord> {
        self.joints.get(&id)
    }

    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    // -------------------------------------------------------------------------
    // Raw rapier access
    // -------------------------------------------------------------------------

    pub fn bodies(&self) -> &RigidBodySet {
        &self.bodies
    }

    pub fn colliders(&self) -> &ColliderSet {
        &self.colliders
    }

    pub fn impulse_joints(&self) -> &ImpulseJointSet {
        &self.impulse_joints
    }

    pub fn narrow_phase(&self) -> &NarrowPhase {
        &self.narrow_phase
    }

    // -------------------------------------------------------------------------
    // Simulation
    // -------------------------------------------------------------------------

    /// Advance the world by `dt` seconds and report what happened to `callback`.
    ///
    /// `dt` is clamped to the configured maximum and split into substeps.
    /// Callbacks run on the calling thread before this returns.
    pub fn step(&mut self, dt: f32, callback: &mut dyn SimulationEventCallback) {
        let start = Instant::now();
        let dt = self.config.clamp_dt(dt);
        if dt == 0.0 {
            return;
        }

        let substeps = self.config.substeps.max(1);
        let sub_dt = dt / substeps as f32;
        self.integration_parameters.dt = sub_dt;
        for _ in 0..substeps {
            self.pipeline.step(
                &self.gravity,
                &self.integration_parameters,
                &mut self.islands,
                &mut self.broad_phase,
                &mut self.narrow_phase,
                &mut self.bodies,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                &mut self.ccd_solver,
                Some(&mut self.query_pipeline),
                &(),
                &self.event_collector,
            );
        }

        let broken = self.break_overloaded_joints(sub_dt);
        self.dispatch_collision_events(callback);
        if !broken.is_empty() {
            callback.on_constraint_break(&broken);
        }

        let (woke, slept) = self.sleep_transitions();
        if !woke.is_empty() {
            debug!("{} actor(s) woke up", woke.len());
            callback.on_wake(&woke);
        }
        if !slept.is_empty() {
            debug!("{} actor(s) fell asleep", slept.len());
            callback.on_sleep(&slept);
        }

        self.metrics.step_count += 1;
        self.metrics.last_step_time_ms = start.elapsed().as_secs_f32() * 1000.0;
        self.metrics.active_bodies = self
            .bodies
            .iter()
            .filter(|(_, body)| body.is_dynamic() && !body.is_sleeping())
            .count();
        self.metrics.contact_pairs = self
            .narrow_phase
            .contact_pairs()
            .filter(|pair| pair.has_any_active_contact)
            .count();
    }

    fn dispatch_collision_events(&self, callback: &mut dyn SimulationEventCallback) {
        let mut triggers = Vec::new();
        let mut contacts: Vec<(ContactPairHeader, Vec<ContactPair>)> = Vec::new();

        while let Ok(event) = self.collision_events.try_recv() {
            let (c0, c1) = (event.collider1(), event.collider2());
            let (Some(s0), Some(s1)) = (self.shapes.get(&c0), self.shapes.get(&c1)) else {
                continue;
            };

            let status = if event.started() {
                PairFlags::NOTIFY_TOUCH_FOUND
            } else {
                PairFlags::NOTIFY_TOUCH_LOST
            };
            let flags = filter_shader(s0.attributes, s0.filter, s1.attributes, s1.filter);
            if !flags.contains(status) {
                continue;
            }

            if event.sensor() {
                let ((trigger_shape, trigger), (other_shape, other)) = if s0.attributes.is_trigger() {
                    ((c0, s0), (c1, s1))
                } else {
                    ((c1, s1), (c0, s0))
                };
                triggers.push(TriggerPair {
                    trigger_actor: trigger.actor,
                    trigger_shape,
                    other_actor: other.actor,
                    other_shape,
                    other_geometry: other.geometry,
                    status,
                });
                continue;
            }

            let actors = [s0.actor, s1.actor];
            let pair = ContactPair {
                shapes: [c0, c1],
                events: status,
            };
            match contacts.iter_mut().find(|(header, _)| header.actors == actors) {
                Some((_, pairs)) => pairs.push(pair),
                None => {
                    let header = ContactPairHeader {
                        actors,
                        names: actors.map(|id| self.actor(id).and_then(|a| a.name.clone())),
                    };
                    contacts.push((header, vec![pair]));
                }
            }
        }

        // no collider asks for force events; keep the channel empty anyway
        let dropped = self.contact_force_events.try_iter().count();
        if dropped > 0 {
            warn!("dropped {dropped} contact force event(s)");
        }

        if !triggers.is_empty() {
            callback.on_trigger(&triggers);
        }
        for (header, pairs) in &contacts {
            callback.on_contact(header, pairs);
        }
    }

    fn break_overloaded_joints(&mut self, dt: f32) -> Vec<BrokenConstraint> {
        let overloaded: Vec<JointId> = self
            .joints
            .values()
            .filter_map(|record| {
                let limit = record.break_force?;
                let joint = self.impulse_joints.get(record.id)?;
                let force = joint.impulses.fixed_rows::<3>(0).norm() / dt;
                (force > limit).then_some(record.id)
            })
            .collect();

        overloaded
            .into_iter()
            .filter_map(|id| {
                let record = self.remove_joint(id)?;
                warn!(
                    "joint `{}` exceeded its break force and was removed",
                    record.name.as_deref().unwrap_or("unnamed")
                );
                Some(BrokenConstraint {
                    joint: id,
                    name: record.name,
                    actors: record.actors,
                })
            })
            .collect()
    }

    fn sleep_transitions(&mut self) -> (Vec<ActorId>, Vec<ActorId>) {
        let mut woke = Vec::new();
        let mut slept = Vec::new();

        for record in &self.actors {
            if record.kind == BodyKind::Static {
                continue;
            }
            let Some(body) = self.bodies.get(record.id) else {
                continue;
            };
            let sleeping = body.is_sleeping();
            match self.sleeping.insert(record.id, sleeping) {
                Some(false) if sleeping => slept.push(record.id),
                Some(true) if !sleeping => woke.push(record.id),
                _ => {}
            }
        }

        (woke, slept)
    }

    /// Debug geometry for the current state, driven by the visualization parameters.
    pub fn debug_draw(&self) -> DebugDraw {
        DebugDraw::from_scene(self)
    }

    /// One-line summary for logs.
    pub fn log_summary(&self) {
        info!(
            "scene: {} actor(s), {} shape(s), {} joint(s)",
            self.actors.len(),
            self.shapes.len(),
            self.joints.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actors::{box_actor, plane, sphere, static_box, Geometry};
    use crate::events::ContactReporter;
    use crate::filter::FilterGroup;
    use glam::Vec3;

    const DT: f32 = 1.0 / 60.0;

    #[derive(Default)]
    struct Recorder {
        triggers: Vec<TriggerPair>,
        contacts: Vec<(ContactPairHeader, Vec<ContactPair>)>,
        broken: Vec<BrokenConstraint>,
        woke: Vec<ActorId>,
        slept: Vec<ActorId>,
    }

    impl SimulationEventCallback for Recorder {
        fn on_trigger(&mut self, pairs: &[TriggerPair]) {
            self.triggers.extend_from_slice(pairs);
        }
        fn on_contact(&mut self, header: &ContactPairHeader, pairs: &[ContactPair]) {
            self.contacts.push((header.clone(), pairs.to_vec()));
        }
        fn on_constraint_break(&mut self, constraints: &[BrokenConstraint]) {
            self.broken.extend_from_slice(constraints);
        }
        fn on_wake(&mut self, actors: &[ActorId]) {
            self.woke.extend_from_slice(actors);
        }
        fn on_sleep(&mut self, actors: &[ActorId]) {
            self.slept.extend_from_slice(actors);
        }
    }

    #[test]
    fn add_actor_records_everything() {
        let mut scene = Scene::default();
        let id = scene
            .add_actor(&box_actor(Pose::from_translation(Vec3::Y), Vec3::splat(0.5), 2.0).name("crate"))
            .unwrap();

        assert_eq!(scene.actor_by_name("crate"), Some(id));
        let record = scene.actor(id).unwrap();
        assert_eq!(record.kind, BodyKind::Dynamic);
        assert_eq!(record.shapes.len(), 1);

        let shape = scene.shape(record.shapes[0]).unwrap();
        assert_eq!(shape.actor, id);
        assert_eq!(shape.geometry, GeometryType::Box);
        assert_eq!(scene.actor_pose(id).unwrap().position, Vec3::Y);
    }

    #[test]
    fn construction_errors_leave_scene_untouched() {
        let mut scene = Scene::default();
        scene.add_actor(&plane(Vec3::Y, 0.0).name("ground")).unwrap();

        let duplicate = plane(Vec3::Y, 0.0).name("ground");
        assert!(matches!(scene.add_actor(&duplicate), Err(Error::DuplicateActor(_))));

        let empty = ActorDesc::dynamic(Pose::IDENTITY);
        assert!(matches!(scene.add_actor(&empty), Err(Error::EmptyActor(_))));

        let moving_plane =
            ActorDesc::dynamic(Pose::IDENTITY).create_shape(Geometry::Plane { normal: Vec3::Y }, 1.0);
        assert!(matches!(scene.add_actor(&moving_plane), Err(Error::InvalidGeometry(_))));

        let bad = box_actor(Pose::IDENTITY, Vec3::splat(0.5), 1.0)
            .create_shape(Geometry::ball(0.0), 1.0);
        assert!(scene.add_actor(&bad).is_err());

        assert_eq!(scene.actor_count(), 1);
        assert_eq!(scene.bodies().len(), 1);
        assert_eq!(scene.colliders().len(), 1);
    }

    #[test]
    fn joints_require_live_actors() {
        let mut scene = Scene::default();
        let a = scene.add_actor(&static_box(Pose::IDENTITY, Vec3::splat(0.5), 1.0)).unwrap();
        let joint = JointDesc::fixed(Pose::IDENTITY, Pose::IDENTITY);

        let stranger = RigidBodyHandle::from_raw_parts(42, 0);
        assert!(matches!(scene.add_joint(a, stranger, &joint), Err(Error::InvalidHandle(_))));

        let b = scene
            .add_actor(&box_actor(Pose::from_translation(Vec3::X), Vec3::splat(0.5), 1.0))
            .unwrap();
        let id = scene.add_joint(a, b, &joint.named("weld")).unwrap();
        assert_eq!(scene.joint(id).unwrap().actors, [a, b]);

        let removed = scene.remove_joint(id).unwrap();
        assert_eq!(removed.name.as_deref(), Some("weld"));
        assert_eq!(scene.joint_count(), 0);
        assert!(scene.impulse_joints().get(id).is_none());
        assert_eq!(scene.actor_count(), 2);
    }

    #[test]
    fn default_material_updates_existing_colliders() {
        let mut scene = Scene::default();
        let id = scene.add_actor(&sphere(Pose::IDENTITY, 1.0, 1.0)).unwrap();
        scene.set_default_material(Material {
            dynamic_friction: 0.2,
            restitution: 0.1,
        });

        let shape = scene.actor(id).unwrap().shapes[0];
        let collider = scene.colliders().get(shape).unwrap();
        assert_eq!(collider.friction(), 0.2);
        assert_eq!(collider.restitution(), 0.1);
        assert_eq!(scene.default_material().dynamic_friction, 0.2);
    }

    #[test]
    fn falling_through_a_trigger_sets_and_clears_flag() {
        let mut scene = Scene::default();
        scene
            .add_actor(&static_box(Pose::IDENTITY, Vec3::ONE, 1.0).trigger(true).name("zone"))
            .unwrap();
        scene
            .add_actor(&sphere(Pose::from_translation(Vec3::new(0.0, 3.0, 0.0)), 0.25, 1.0))
            .unwrap();

        let mut reporter = ContactReporter::new();
        let mut ever_triggered = false;
        for _ in 0..120 {
            scene.step(DT, &mut reporter);
            ever_triggered |= reporter.is_triggered();
        }
        assert!(ever_triggered);
        assert!(!reporter.is_triggered());
    }

    #[test]
    fn contacts_are_reported_only_for_opted_in_pairs() {
        let mut scene = Scene::default();
        let ground = scene
            .add_actor(
                &static_box(Pose::from_translation(Vec3::new(0.0, -0.5, 0.0)), Vec3::new(10.0, 0.5, 10.0), 1.0)
                    .name("ground")
                    .setup_filtering(FilterGroup::ACTOR1, FilterGroup::ACTOR0),
            )
            .unwrap();
        let listener = scene
            .add_actor(
                &box_actor(Pose::from_translation(Vec3::new(0.0, 1.0, 0.0)), Vec3::splat(0.5), 1.0)
                    .name("listener")
                    .setup_filtering(FilterGroup::ACTOR0, FilterGroup::ACTOR1),
            )
            .unwrap();
        let quiet = scene
            .add_actor(
                &box_actor(Pose::from_translation(Vec3::new(3.0, 1.0, 0.0)), Vec3::splat(0.5), 1.0)
                    .name("quiet"),
            )
            .unwrap();

        let mut recorder = Recorder::default();
        for _ in 0..600 {
            scene.step(DT, &mut recorder);
        }

        assert!(recorder.contacts.iter().any(|(header, pairs)| {
            header.actors.contains(&ground)
                && header.actors.contains(&listener)
                && pairs.iter().any(|p| p.events.contains(PairFlags::NOTIFY_TOUCH_FOUND))
        }));
        assert!(recorder
            .contacts
            .iter()
            .all(|(header, _)| !header.actors.contains(&quiet)));
        assert!(recorder.triggers.is_empty());

        // both boxes settle and fall asleep
        assert!(recorder.slept.contains(&listener));
        assert!(recorder.slept.contains(&quiet));
        assert_eq!(scene.metrics().step_count, 600);
    }

    #[test]
    fn overloaded_joint_breaks() {
        let mut scene = Scene::default();
        let anchor = scene
            .add_actor(&static_box(Pose::from_translation(Vec3::new(0.0, 5.0, 0.0)), Vec3::splat(0.5), 1.0))
            .unwrap();
        let weight = scene
            .add_actor(&box_actor(Pose::from_translation(Vec3::new(0.0, 3.5, 0.0)), Vec3::splat(0.5), 1.0))
            .unwrap();
        let joint = JointDesc::fixed(Pose::from_translation(Vec3::new(0.0, -1.5, 0.0)), Pose::IDENTITY)
            .named("hook")
            .breakable(1.0);
        let id = scene.add_joint(anchor, weight, &joint).unwrap();

        let mut recorder = Recorder::default();
        for _ in 0..10 {
            scene.step(DT, &mut recorder);
        }

        assert_eq!(recorder.broken.len(), 1);
        assert_eq!(recorder.broken[0].joint, id);
        assert_eq!(recorder.broken[0].name.as_deref(), Some("hook"));
        assert_eq!(scene.joint_count(), 0);
        assert!(scene.contains_actor(weight));
    }

    #[test]
    fn zero_dt_is_a_no_op() {
        let mut scene = Scene::default();
        scene.add_actor(&sphere(Pose::IDENTITY, 1.0, 1.0)).unwrap();
        scene.step(0.0, &mut ());
        assert_eq!(scene.metrics().step_count, 0);
    }
}
