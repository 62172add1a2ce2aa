// src/events.rs
//! Simulation event records and the callback interface.
//!
//! [`Scene::step`](crate::scene::Scene::step) collects rapier's raw events, runs
//! them through the filter shader and hands the survivors to a
//! [`SimulationEventCallback`] before returning.

use log::info;

use crate::actors::GeometryType;
use crate::filter::PairFlags;
use crate::scene::{ActorId, JointId, ShapeId};

/// A trigger shape started or stopped overlapping another shape.
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerPair {
    pub trigger_actor: ActorId,
    pub trigger_shape: ShapeId,
    pub other_actor: ActorId,
    pub other_shape: ShapeId,
    pub other_geometry: GeometryType,
    /// `NOTIFY_TOUCH_FOUND` on enter, `NOTIFY_TOUCH_LOST` on exit.
    pub status: PairFlags,
}

/// The two actors of a batch of contact pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactPairHeader {
    pub actors: [ActorId; 2],
    pub names: [Option<String>; 2],
}

/// One shape pair of a contact report.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactPair {
    pub shapes: [ShapeId; 2],
    pub events: PairFlags,
}

/// A joint removed because it exceeded its break force.
#[derive(Debug, Clone, PartialEq)]
pub struct BrokenConstraint {
    pub joint: JointId,
    pub name: Option<String>,
    pub actors: [ActorId; 2],
}

/// Receives simulation events. Every method defaults to doing nothing.
pub trait SimulationEventCallback {
    fn on_trigger(&mut self, _pairs: &[TriggerPair]) {}

    fn on_contact(&mut self, _header: &ContactPairHeader, _pairs: &[ContactPair]) {}

    fn on_constraint_break(&mut self, _constraints: &[BrokenConstraint]) {}

    fn on_wake(&mut self, _actors: &[ActorId]) {}

    fn on_sleep(&mut self, _actors: &[ActorId]) {}
}

/// Ignores everything.
impl SimulationEventCallback for () {}

/// Whether something is currently inside a trigger volume.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TriggerState {
    triggered: bool,
}

impl TriggerState {
    #[inline]
    pub fn is_triggered(&self) -> bool {
        self.triggered
    }

    #[inline]
    pub fn set(&mut self, triggered: bool) {
        self.triggered = triggered;
    }
}

/// The demo callback: tracks the trigger flag and logs contacts.
#[derive(Debug, Default)]
pub struct ContactReporter {
    pub trigger: TriggerState,
}

impl ContactReporter {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_triggered(&self) -> bool {
        self.trigger.is_triggered()
    }
}

impl SimulationEventCallback for ContactReporter {
    fn on_trigger(&mut self, pairs: &[TriggerPair]) {
        for pair in pairs {
            // planes are ignored
            if pair.other_geometry == GeometryType::Plane {
                continue;
            }
            if pair.status.contains(PairFlags::NOTIFY_TOUCH_FOUND) {
                info!("onTrigger: touch found");
                self.trigger.set(true);
            }
            if pair.status.contains(PairFlags::NOTIFY_TOUCH_LOST) {
                info!("onTrigger: touch lost");
                self.trigger.set(false);
            }
        }
    }

    fn on_contact(&mut self, header: &ContactPairHeader, pairs: &[ContactPair]) {
        let [a, b] = &header.names;
        info!(
            "Contact found between {} {}",
            a.as_deref().unwrap_or("unnamed"),
            b.as_deref().unwrap_or("unnamed")
        );

        for pair in pairs {
            if pair.events.contains(PairFlags::NOTIFY_TOUCH_FOUND) {
                info!("onContact: touch found");
            }
            if pair.events.contains(PairFlags::NOTIFY_TOUCH_LOST) {
                info!("onContact: touch lost");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rapier3d::prelude::{ColliderHandle, RigidBodyHandle};

    fn pair(other: GeometryType, status: PairFlags) -> TriggerPair {
        TriggerPair {
            trigger_actor: RigidBodyHandle::from_raw_parts(0, 0),
            trigger_shape: ColliderHandle::from_raw_parts(0, 0),
            other_actor: RigidBodyHandle::from_raw_parts(1, 0),
            other_shape: ColliderHandle::from_raw_parts(1, 0),
            other_geometry: other,
            status,
        }
    }

    #[test]
    fn touch_found_then_lost() {
        let mut reporter = ContactReporter::new();
        assert!(!reporter.is_triggered());

        reporter.on_trigger(&[pair(GeometryType::Box, PairFlags::NOTIFY_TOUCH_FOUND)]);
        assert!(reporter.is_triggered());

        reporter.on_trigger(&[pair(GeometryType::Sphere, PairFlags::NOTIFY_TOUCH_LOST)]);
        assert!(!reporter.is_triggered());
    }

    #[test]
    fn planes_leave_flag_alone() {
        let mut reporter = ContactReporter::new();
        reporter.on_trigger(&[pair(GeometryType::Plane, PairFlags::NOTIFY_TOUCH_FOUND)]);
        assert!(!reporter.is_triggered());

        reporter.trigger.set(true);
        reporter.on_trigger(&[pair(GeometryType::Plane, PairFlags::NOTIFY_TOUCH_LOST)]);
        assert!(reporter.is_triggered());
    }

    #[test]
    fn last_write_wins_within_a_batch() {
        let mut reporter = ContactReporter::new();
        reporter.on_trigger(&[
            pair(GeometryType::Box, PairFlags::NOTIFY_TOUCH_FOUND),
            pair(GeometryType::Box, PairFlags::NOTIFY_TOUCH_LOST),
        ]);
        assert!(!reporter.is_triggered());

        reporter.on_trigger(&[
            pair(GeometryType::Box, PairFlags::NOTIFY_TOUCH_LOST),
            pair(GeometryType::ConvexMesh, PairFlags::NOTIFY_TOUCH_FOUND),
        ]);
        assert!(reporter.is_triggered());
    }

    #[test]
    fn contact_reports_do_not_touch_trigger() {
        let mut reporter = ContactReporter::new();
        let header = ContactPairHeader {
            actors: [
                RigidBodyHandle::from_raw_parts(0, 0),
                RigidBodyHandle::from_raw_parts(1, 0),
            ],
            names: [Some("arm".into()), None],
        };
        let pairs = [ContactPair {
            shapes: [
                ColliderHandle::from_raw_parts(0, 0),
                ColliderHandle::from_raw_parts(1, 0),
            ],
            events: PairFlags::NOTIFY_TOUCH_FOUND,
        }];
        reporter.on_contact(&header, &pairs);
        reporter.on_wake(&header.actors);
        assert!(!reporter.is_triggered());
    }
}
