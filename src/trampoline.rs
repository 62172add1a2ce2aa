// src/trampoline.rs
//! Two plates held together by four corner springs.
//!
//! Once added, the scene owns the plates and the trampoline keeps the handles of
//! its springs, so [`Trampoline::release`] can take them out again.

use glam::Vec3;
use log::debug;

use crate::actors::{box_actor, ActorDesc, Pose};
use crate::config::TrampolineConfig;
use crate::joints::{JointDesc, JointKind};
use crate::scene::{ActorId, JointId, Scene};
use crate::{Error, Result};

/// Half-thickness of both plates.
pub const THICKNESS: f32 = 0.1;

#[derive(Debug, Clone)]
pub struct Trampoline {
    bottom: ActorDesc,
    top: ActorDesc,
    springs: Vec<JointDesc>,
    plates: Option<[ActorId; 2]>,
    joints: Vec<JointId>,
}

impl Default for Trampoline {
    fn default() -> Self {
        Self::new(Vec3::ONE, 1.0, 1.0)
    }
}

impl Trampoline {
    /// `dimensions` are the plates' half-width (x), the gap between them (y) and
    /// their half-depth (z).
    pub fn new(dimensions: Vec3, stiffness: f32, damping: f32) -> Self {
        let half_extents = Vec3::new(dimensions.x, THICKNESS, dimensions.z);
        let bottom = box_actor(
            Pose::from_translation(Vec3::new(0.0, THICKNESS, 0.0)),
            half_extents,
            1.0,
        )
        .name("trampoline_bottom");
        let top = box_actor(
            Pose::from_translation(Vec3::new(0.0, dimensions.y + THICKNESS, 0.0)),
            half_extents,
            1.0,
        )
        .name("trampoline_top");

        let corners = [
            (dimensions.x, dimensions.z),
            (dimensions.x, -dimensions.z),
            (-dimensions.x, dimensions.z),
            (-dimensions.x, -dimensions.z),
        ];
        let springs = corners
            .into_iter()
            .enumerate()
            .map(|(i, (x, z))| {
                JointDesc::new(
                    JointKind::Distance { stiffness, damping },
                    Pose::from_translation(Vec3::new(x, THICKNESS, z)),
                    Pose::from_translation(Vec3::new(x, -dimensions.y, z)),
                )
                .named(format!("trampoline_spring_{i}"))
            })
            .collect();

        Self {
            bottom,
            top,
            springs,
            plates: None,
            joints: Vec::new(),
        }
    }

    pub fn from_config(config: &TrampolineConfig) -> Self {
        Self::new(config.dimensions, config.stiffness, config.damping).at(config.position)
    }

    /// Move both plates by `position`.
    pub fn at(mut self, position: Vec3) -> Self {
        self.bottom.pose = self.bottom.pose.translated(position);
        self.top.pose = self.top.pose.translated(position);
        self
    }

    /// Prefix the plate and spring names, for scenes with more than one trampoline.
    pub fn named(mut self, prefix: &str) -> Self {
        self.bottom.name = Some(format!("{prefix}_bottom"));
        self.top.name = Some(format!("{prefix}_top"));
        for (i, spring) in self.springs.iter_mut().enumerate() {
            spring.name = Some(format!("{prefix}_spring_{i}"));
        }
        self
    }

    pub fn bottom(&self) -> &ActorDesc {
        &self.bottom
    }

    pub fn top(&self) -> &ActorDesc {
        &self.top
    }

    pub fn springs(&self) -> &[JointDesc] {
        &self.springs
    }

    /// `[bottom, top]` once added.
    pub fn plates(&self) -> Option<[ActorId; 2]> {
        self.plates
    }

    /// Springs currently held in the scene.
    pub fn joints(&self) -> &[JointId] {
        &self.joints
    }

    pub fn add_to_scene(&mut self, scene: &mut Scene) -> Result<()> {
        if self.plates.is_some() {
            return Err(Error::custom("trampoline is already part of a scene"));
        }

        scene.check_actor(&self.bottom)?;
        scene.check_actor(&self.top)?;
        let bottom = scene.add_actor(&self.bottom)?;
        let top = scene.add_actor(&self.top)?;
        self.plates = Some([bottom, top]);

        for spring in &self.springs {
            let id = scene.add_joint(bottom, top, spring)?;
            self.joints.push(id);
        }
        debug!(
            "trampoline added at {} with {} spring(s)",
            self.bottom.pose.position,
            self.joints.len()
        );
        Ok(())
    }

    /// Remove the springs from `scene`, leaving the plates where they are.
    /// Returns how many springs were removed.
    pub fn release(&mut self, scene: &mut Scene) -> usize {
        self.joints
            .drain(..)
            .filter(|&id| scene.remove_joint(id).is_some())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actors::Geometry;
    use rapier3d::prelude::{JointAxis, MotorModel};

    #[test]
    fn plates_and_springs_follow_dimensions() {
        let t = Trampoline::new(Vec3::new(2.0, 1.5, 3.0), 40.0, 2.0);

        assert_eq!(t.bottom().pose.position, Vec3::new(0.0, 0.1, 0.0));
        assert_eq!(t.top().pose.position, Vec3::new(0.0, 1.6, 0.0));
        assert_eq!(
            t.top().shapes[0].geometry,
            Geometry::cuboid(Vec3::new(2.0, 0.1, 3.0))
        );

        assert_eq!(t.springs().len(), 4);
        for spring in t.springs() {
            assert_eq!(
                spring.kind,
                JointKind::Distance {
                    stiffness: 40.0,
                    damping: 2.0
                }
            );
            assert_eq!(spring.frame0.position.y, 0.1);
            assert_eq!(spring.frame1.position.y, -1.5);
            assert_eq!(spring.frame0.position.x.abs(), 2.0);
            assert_eq!(spring.frame1.position.z.abs(), 3.0);
        }
    }

    #[test]
    fn release_frees_four_springs_and_keeps_plates() {
        let mut scene = Scene::default();
        let mut t = Trampoline::new(Vec3::ONE, 10.0, 1.0);
        t.add_to_scene(&mut scene).unwrap();

        assert_eq!(scene.actor_count(), 2);
        assert_eq!(scene.joint_count(), 4);
        assert_eq!(t.joints().len(), 4);
        for &id in t.joints() {
            let joint = scene.impulse_joints().get(id).unwrap();
            for axis in [JointAxis::X, JointAxis::Y, JointAxis::Z] {
                let motor = joint.data.motor(axis).unwrap();
                assert_eq!(motor.model, MotorModel::ForceBased);
                assert_eq!(motor.stiffness, 10.0);
                assert_eq!(motor.damping, 1.0);
            }
        }
        assert!(t.add_to_scene(&mut scene).is_err());

        for _ in 0..10 {
            scene.step(1.0 / 60.0, &mut ());
        }

        assert_eq!(t.release(&mut scene), 4);
        assert_eq!(scene.joint_count(), 0);
        assert_eq!(scene.actor_count(), 2);
        let [bottom, top] = t.plates().unwrap();
        assert!(scene.contains_actor(bottom));
        assert!(scene.contains_actor(top));

        assert_eq!(t.release(&mut scene), 0);
    }

    #[test]
    fn offset_and_prefix() {
        let config = TrampolineConfig {
            position: Vec3::new(6.0, 0.0, -2.0),
            ..TrampolineConfig::default()
        };
        let t = Trampoline::from_config(&config).named("left");
        assert_eq!(t.bottom().pose.position, Vec3::new(6.0, 0.1, -2.0));
        assert_eq!(t.top().name.as_deref(), Some("left_top"));
        assert_eq!(t.springs()[3].name.as_deref(), Some("left_spring_3"));
    }
}
