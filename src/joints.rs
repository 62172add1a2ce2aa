// src/joints.rs
//! Joint descriptors and their translation into rapier generic joints.
//!
//! Each joint connects two actors through a local frame on each side. Revolute
//! joints rotate about the local X axis of those frames. Distance joints are
//! modelled as a force-based positional motor pulling the two anchors together,
//! which gives the spring behaviour with the requested stiffness and damping.

use rapier3d::prelude::{GenericJoint, GenericJointBuilder, JointAxesMask, JointAxis, MotorModel};

use crate::actors::Pose;
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JointKind {
    /// No relative motion.
    Fixed,
    /// One rotational degree of freedom about the frames' X axis.
    Revolute { limits: Option<[f32; 2]> },
    /// Free rotation, anchors locked together.
    Spherical,
    /// Spring between the two anchors.
    Distance { stiffness: f32, damping: f32 },
}

impl JointKind {
    pub fn label(&self) -> &'static str {
        match self {
            JointKind::Fixed => "fixed",
            JointKind::Revolute { .. } => "revolute",
            JointKind::Spherical => "spherical",
            JointKind::Distance { .. } => "distance",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct JointDesc {
    pub name: Option<String>,
    pub kind: JointKind,
    /// Joint frame relative to the first actor.
    pub frame0: Pose,
    /// Joint frame relative to the second actor.
    pub frame1: Pose,
    /// Linear force above which the joint breaks; `None` means unbreakable.
    pub break_force: Option<f32>,
    /// Whether the two connected actors still collide with each other.
    pub collision_enabled: bool,
}

impl JointDesc {
    pub fn new(kind: JointKind, frame0: Pose, frame1: Pose) -> Self {
        Self {
            name: None,
            kind,
            frame0,
            frame1,
            break_force: None,
            collision_enabled: false,
        }
    }

    pub fn fixed(frame0: Pose, frame1: Pose) -> Self {
        Self::new(JointKind::Fixed, frame0, frame1)
    }

    pub fn revolute(frame0: Pose, frame1: Pose) -> Self {
        Self::new(JointKind::Revolute { limits: None }, frame0, frame1)
    }

    pub fn spherical(frame0: Pose, frame1: Pose) -> Self {
        Self::new(JointKind::Spherical, frame0, frame1)
    }

    /// Unit spring; tune with [`set_stiffness`](Self::set_stiffness) and
    /// [`set_damping`](Self::set_damping).
    pub fn distance(frame0: Pose, frame1: Pose) -> Self {
        Self::new(
            JointKind::Distance {
                stiffness: 1.0,
                damping: 1.0,
            },
            frame0,
            frame1,
        )
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn breakable(mut self, force: f32) -> Self {
        self.break_force = Some(force);
        self
    }

    pub fn set_stiffness(&mut self, value: f32) -> Result<()> {
        match &mut self.kind {
            JointKind::Distance { stiffness, .. } => {
                *stiffness = value;
                Ok(())
            }
            other => Err(Error::JointKindMismatch {
                kind: other.label(),
                property: "stiffness",
            }),
        }
    }

    pub fn set_damping(&mut self, value: f32) -> Result<()> {
        match &mut self.kind {
            JointKind::Distance { damping, .. } => {
                *damping = value;
                Ok(())
            }
            other => Err(Error::JointKindMismatch {
                kind: other.label(),
                property: "damping",
            }),
        }
    }

    /// Angular limits (radians) of a revolute joint.
    pub fn set_limits(&mut self, lower: f32, upper: f32) -> Result<()> {
        match &mut self.kind {
            JointKind::Revolute { limits } => {
                *limits = Some([lower.min(upper), lower.max(upper)]);
                Ok(())
            }
            other => Err(Error::JointKindMismatch {
                kind: other.label(),
                property: "limits",
            }),
        }
    }

    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("unnamed")
    }

    pub(crate) fn to_generic_joint(&self) -> GenericJoint {
        let locked = match self.kind {
            JointKind::Fixed => JointAxesMask::LOCKED_FIXED_AXES,
            JointKind::Revolute { .. } => JointAxesMask::LOCKED_REVOLUTE_AXES,
            JointKind::Spherical => JointAxesMask::LOCKED_SPHERICAL_AXES,
            JointKind::Distance { .. } => JointAxesMask::empty(),
        };

        let mut builder = GenericJointBuilder::new(locked)
            .local_frame1(self.frame0.to_isometry())
            .local_frame2(self.frame1.to_isometry())
            .contacts_enabled(self.collision_enabled);

        match self.kind {
            JointKind::Revolute {
                limits: Some(limits),
            } => {
                builder = builder.limits(JointAxis::AngX, limits);
            }
            JointKind::Distance { stiffness, damping } => {
                for axis in [JointAxis::X, JointAxis::Y, JointAxis::Z] {
                    builder = builder
                        .motor_model(axis, MotorModel::ForceBased)
                        .motor_position(axis, 0.0, stiffness, damping);
                }
            }
            _ => {}
        }

        builder.build()
    }
}
