// src/trebuchet.rs
//! The trebuchet demo: frame, pivoting arm with counterweight, ground plane and
//! an optional trampoline.

use std::f32::consts::{FRAC_PI_2, PI};

use glam::Vec3;
use log::info;

use crate::actors::{box_actor, palette, plane, sphere, static_box, Color, Material, Pose};
use crate::config::SceneConfig;
use crate::events::ContactReporter;
use crate::filter::FilterGroup;
use crate::joints::JointDesc;
use crate::layout::{BuiltLayout, SceneLayout};
use crate::scene::{ActorId, Scene, VisualizationParameter};
use crate::trampoline::Trampoline;
use crate::Result;

pub const PLANE_COLOR: Color = Vec3::new(210.0 / 255.0, 210.0 / 255.0, 210.0 / 255.0);

/// Dynamic friction of the demo's shared material.
pub const FRICTION: f32 = 0.2;

fn at(x: f32, y: f32, z: f32) -> Pose {
    Pose::from_translation(Vec3::new(x, y, z))
}

fn turned(x: f32, y: f32, z: f32, axis: Vec3, angle: f32) -> Pose {
    Pose::from_axis_angle(Vec3::new(x, y, z), axis, angle)
}

/// Every body and joint of the trebuchet. The bracing struts, spare boxes and
/// the frame welds are listed but inactive.
pub fn trebuchet_layout() -> SceneLayout {
    let beam = Vec3::new(3.5, 0.5, 0.5);
    let cube = Vec3::splat(0.45);

    SceneLayout::new()
        // frame
        .actor(static_box(at(0.0, 0.0, 0.0), Vec3::new(5.0, 0.1, 5.0), 3.0).name("base"))
        .actor(
            static_box(turned(0.0, 1.5, 2.0, Vec3::Y, FRAC_PI_2), Vec3::new(1.5, 0.5, 0.5), 3.0)
                .name("middle")
                .color(palette(4)),
        )
        .actor(static_box(at(0.0, 1.5, 0.0), beam, 3.0).name("left").color(palette(4)))
        .actor(static_box(at(0.0, 1.5, 4.0), beam, 3.0).name("right").color(palette(4)))
        .actor(
            box_actor(turned(0.0, 5.5, 0.0, Vec3::Z, FRAC_PI_2), beam, 3.0)
                .name("upleft")
                .color(palette(6)),
        )
        .actor(
            box_actor(turned(0.0, 5.5, 4.0, Vec3::Z, FRAC_PI_2), beam, 3.0)
                .name("upright")
                .color(palette(6)),
        )
        .actor(static_box(at(0.0, 8.5, 3.0), cube, 3.0).name("upmidri"))
        .actor(static_box(at(0.0, 8.5, 1.0), cube, 3.0).name("upmidle"))
        // arm
        .actor(
            box_actor(turned(3.0, 8.5, 2.0, Vec3::Z, PI / 7.0), Vec3::new(7.5, 0.5, 0.5), 1.0)
                .name("arm")
                .color(palette(2)),
        )
        .actor(box_actor(Pose::IDENTITY, cube, 3.0).name("counterweight"))
        // spare bodies
        .inactive_actor(sphere(at(3.0, 4.0, 1.0), 1.0, 1.0).name("ball").color(palette(5)))
        .inactive_actor(
            box_actor(at(0.0, 10.5, 0.0), Vec3::new(1.0, 4.0, 1.0), 1.0)
                .name("box")
                .color(palette(0))
                .setup_filtering(FilterGroup::ACTOR0, FilterGroup::ACTOR1 | FilterGroup::ACTOR2),
        )
        .inactive_actor(
            box_actor(at(3.0, 6.5, 0.0), Vec3::splat(0.5), 1.0)
                .name("box2")
                .color(palette(1)),
        )
        .inactive_actor(
            static_box(turned(0.0, 2.5, -1.0, Vec3::Y, FRAC_PI_2), Vec3::new(0.01, 1.5, 0.5), 6.0)
                .name("bracerleft")
                .color(palette(2)),
        )
        // pivots, sharing one axis
        .joint(
            "arm",
            "middle",
            JointDesc::revolute(turned(3.0, 0.0, 0.0, Vec3::Y, FRAC_PI_2), at(0.0, 7.0, 0.0))
                .named("arm_pivot"),
        )
        .joint(
            "arm",
            "counterweight",
            JointDesc::revolute(turned(0.0, 0.0, 0.0, Vec3::Y, FRAC_PI_2), at(0.0, 7.0, 0.0))
                .named("counter_pivot"),
        )
        // frame welds and bracing
        .inactive_joint(
            "upleft",
            "left",
            JointDesc::fixed(Pose::IDENTITY, Pose::IDENTITY).named("left_joint"),
        )
        .inactive_joint(
            "upleft",
            "upmidle",
            JointDesc::fixed(turned(2.0, 1.0, 2.0, Vec3::Y, FRAC_PI_2), Pose::IDENTITY)
                .named("left_up_joint"),
        )
        .inactive_joint(
            "upright",
            "right",
            JointDesc::fixed(Pose::IDENTITY, Pose::IDENTITY).named("right_joint"),
        )
        .inactive_joint(
            "upright",
            "upmidri",
            JointDesc::fixed(Pose::IDENTITY, Pose::IDENTITY).named("right_up_joint"),
        )
        .inactive_joint(
            "upleft",
            "bracerleft",
            JointDesc::distance(Pose::IDENTITY, at(0.0, 2.5, 0.5)).named("left_bracer_joint"),
        )
        .inactive_joint(
            "left",
            "bracerleft",
            JointDesc::distance(Pose::IDENTITY, at(0.0, -2.5, 0.5)).named("left_joint_bracer"),
        )
}

/// The live demo: a scene built from [`trebuchet_layout`] plus the callback that
/// receives its events.
pub struct TrebuchetScene {
    scene: Scene,
    reporter: ContactReporter,
    layout: SceneLayout,
    built: BuiltLayout,
    plane: ActorId,
    trampoline: Option<Trampoline>,
}

impl TrebuchetScene {
    pub fn new(config: &SceneConfig) -> Result<Self> {
        let mut scene = Scene::new(config);
        scene.set_visualization_parameter(VisualizationParameter::Scale, 1.0);
        scene.set_visualization_parameter(VisualizationParameter::CollisionShapes, 1.0);
        scene.set_default_material(Material {
            dynamic_friction: FRICTION,
            ..scene.default_material()
        });

        let reporter = ContactReporter::new();
        let plane = scene.add_actor(&plane(Vec3::Y, 0.0).name("plane").color(PLANE_COLOR))?;

        let layout = trebuchet_layout();
        let built = layout.build(&mut scene)?;

        let trampoline = match &config.trampoline {
            Some(trampoline_config) => {
                let mut trampoline = Trampoline::from_config(trampoline_config);
                trampoline.add_to_scene(&mut scene)?;
                Some(trampoline)
            }
            None => None,
        };

        info!(
            "trebuchet ready{}",
            if trampoline.is_some() { " with trampoline" } else { "" }
        );
        scene.log_summary();

        Ok(Self {
            scene,
            reporter,
            layout,
            built,
            plane,
            trampoline,
        })
    }

    /// Advance the simulation; events go to the owned [`ContactReporter`].
    pub fn step(&mut self, dt: f32) {
        self.scene.step(dt, &mut self.reporter);
    }

    pub fn is_triggered(&self) -> bool {
        self.reporter.is_triggered()
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn reporter(&self) -> &ContactReporter {
        &self.reporter
    }

    pub fn layout(&self) -> &SceneLayout {
        &self.layout
    }

    pub fn built(&self) -> &BuiltLayout {
        &self.built
    }

    pub fn plane(&self) -> ActorId {
        self.plane
    }

    pub fn actor(&self, name: &str) -> Option<ActorId> {
        self.scene.actor_by_name(name)
    }

    pub fn arm_pose(&self) -> Option<Pose> {
        self.actor("arm").and_then(|id| self.scene.actor_pose(id))
    }

    pub fn trampoline(&self) -> Option<&Trampoline> {
        self.trampoline.as_ref()
    }

    /// Cut the trampoline springs. Returns the number removed.
    pub fn release_trampoline(&mut self) -> usize {
        match &mut self.trampoline {
            Some(trampoline) => trampoline.release(&mut self.scene),
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actors::BodyKind;
    use crate::config::TrampolineConfig;
    use crate::filter::FilterData;
    use crate::joints::JointKind;

    #[test]
    fn layout_lists_active_and_inactive_entries() {
        let layout = trebuchet_layout();
        assert_eq!(layout.actors().len(), 14);
        assert_eq!(layout.actors().iter().filter(|e| e.active).count(), 10);
        assert_eq!(layout.joints().len(), 8);
        assert_eq!(layout.joints().iter().filter(|e| e.active).count(), 2);
        layout.validate().unwrap();

        let boxed = layout.actor_entry("box").unwrap();
        assert!(!boxed.active);
        assert_eq!(boxed.desc.shapes[0].filter, FilterData::new(0b001, 0b110));

        let strut = layout.joint_entry("left_bracer_joint").unwrap();
        assert!(matches!(strut.desc.kind, JointKind::Distance { .. }));
    }

    #[test]
    fn scene_init_matches_demo() {
        let demo = TrebuchetScene::new(&SceneConfig::default()).unwrap();
        let scene = demo.scene();

        // plane + ten active bodies
        assert_eq!(scene.actor_count(), 11);
        assert_eq!(scene.joint_count(), 2);
        assert_eq!(demo.built().skipped.len(), 10);
        assert!(demo.actor("ball").is_none());

        assert_eq!(scene.visualization_parameter(VisualizationParameter::Scale), 1.0);
        assert_eq!(scene.visualization_parameter(VisualizationParameter::CollisionShapes), 1.0);
        assert_eq!(scene.default_material().dynamic_friction, FRICTION);

        let plane = scene.actor(demo.plane()).unwrap();
        assert_eq!(plane.color, PLANE_COLOR);

        let arm = scene.actor(demo.actor("arm").unwrap()).unwrap();
        assert_eq!(arm.name.as_deref(), Some("arm"));
        assert_eq!(arm.kind, BodyKind::Dynamic);
        assert_eq!(arm.color, palette(2));
        let collider = scene.colliders().get(arm.shapes[0]).unwrap();
        assert_eq!(collider.friction(), FRICTION);

        for name in ["arm_pivot", "counter_pivot"] {
            let id = demo.built().joints[name];
            let joint = scene.joint(id).unwrap();
            assert!(matches!(joint.kind, JointKind::Revolute { .. }));
            assert_eq!(joint.actors[0], demo.actor("arm").unwrap());
        }
    }

    #[test]
    fn pivots_share_one_axis() {
        let layout = trebuchet_layout();
        let arm_pivot = &layout.joint_entry("arm_pivot").unwrap().desc;
        let counter_pivot = &layout.joint_entry("counter_pivot").unwrap().desc;
        assert!(arm_pivot
            .frame0
            .rotation
            .abs_diff_eq(counter_pivot.frame0.rotation, 1e-6));

        let mut demo = TrebuchetScene::new(&SceneConfig::default()).unwrap();
        let arm = demo.actor("arm").unwrap();
        let middle = demo.actor("middle").unwrap();
        let pivot = demo.built().joints["arm_pivot"];

        // hinge axis in world space, read from the static side
        let axis = {
            let scene = demo.scene();
            let joint = scene.impulse_joints().get(pivot).unwrap();
            assert_eq!(joint.body2, middle);
            let frame = scene.bodies().get(middle).unwrap().position() * joint.data.local_frame2;
            frame.rotation * nalgebra::Vector3::x()
        };

        for _ in 0..10 {
            demo.step(1.0 / 60.0);
        }

        let angvel = *demo.scene().bodies().get(arm).unwrap().angvel();
        assert!(angvel.norm() > 0.1, "arm should swing, got {angvel:?}");
        let alignment = angvel.dot(&axis).abs() / angvel.norm();
        assert!(alignment > 0.95, "arm spins off the hinge axis: {angvel:?} vs {axis:?}");
    }

    #[test]
    fn steps_without_trigger_activity() {
        let mut demo = TrebuchetScene::new(&SceneConfig::default()).unwrap();
        for _ in 0..120 {
            demo.step(1.0 / 60.0);
        }
        assert!(!demo.is_triggered());
        let pose = demo.arm_pose().unwrap();
        assert!(pose.position.is_finite());
        assert_eq!(demo.scene().metrics().step_count, 120);
    }

    #[test]
    fn optional_trampoline_is_added_and_released() {
        let config = SceneConfig {
            trampoline: Some(TrampolineConfig {
                position: Vec3::new(10.0, 0.0, 0.0),
                stiffness: 50.0,
                ..TrampolineConfig::default()
            }),
            ..SceneConfig::default()
        };
        let mut demo = TrebuchetScene::new(&config).unwrap();
        assert_eq!(demo.scene().actor_count(), 13);
        assert_eq!(demo.scene().joint_count(), 6);

        assert_eq!(demo.release_trampoline(), 4);
        assert_eq!(demo.scene().joint_count(), 2);
        assert_eq!(demo.scene().actor_count(), 13);
        assert!(demo.trampoline().unwrap().joints().is_empty());
    }
}
