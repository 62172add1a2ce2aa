// src/layout.rs
//! Declarative scene layouts.
//!
//! A [`SceneLayout`] lists actors and joints by name, each flagged active or not.
//! [`SceneLayout::build`] adds the active ones to a [`Scene`] in listing order and
//! resolves joint endpoints by actor name. Inactive entries stay in the layout as
//! data and are reported back as skipped.

use std::collections::{HashMap, HashSet};

use log::{debug, info};

use crate::actors::ActorDesc;
use crate::joints::JointDesc;
use crate::scene::{ActorId, JointId, Scene};
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct ActorEntry {
    pub desc: ActorDesc,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JointEntry {
    pub actor0: String,
    pub actor1: String,
    pub desc: JointDesc,
    pub active: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneLayout {
    actors: Vec<ActorEntry>,
    joints: Vec<JointEntry>,
}

/// What [`SceneLayout::build`] created.
#[derive(Debug, Clone, Default)]
pub struct BuiltLayout {
    /// Named actors that went live.
    pub actors: HashMap<String, ActorId>,
    /// Named joints that went live.
    pub joints: HashMap<String, JointId>,
    pub actor_count: usize,
    pub joint_count: usize,
    /// Labels of inactive actors and joints, in listing order.
    pub skipped: Vec<String>,
}

impl BuiltLayout {
    pub fn actor(&self, name: &str) -> Result<ActorId> {
        self.actors
            .get(name)
            .copied()
            .ok_or_else(|| Error::UnknownActor(name.to_string()))
    }
}

impl SceneLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn actor(mut self, desc: ActorDesc) -> Self {
        self.actors.push(ActorEntry { desc, active: true });
        self
    }

    /// Keep an actor in the layout without adding it to the scene.
    pub fn inactive_actor(mut self, desc: ActorDesc) -> Self {
        self.actors.push(ActorEntry { desc, active: false });
        self
    }

    pub fn joint(self, actor0: &str, actor1: &str, desc: JointDesc) -> Self {
        self.push_joint(actor0, actor1, desc, true)
    }

    pub fn inactive_joint(self, actor0: &str, actor1: &str, desc: JointDesc) -> Self {
        self.push_joint(actor0, actor1, desc, false)
    }

    fn push_joint(mut self, actor0: &str, actor1: &str, desc: JointDesc, active: bool) -> Self {
        self.joints.push(JointEntry {
            actor0: actor0.to_string(),
            actor1: actor1.to_string(),
            desc,
            active,
        });
        self
    }

    pub fn actors(&self) -> &[ActorEntry] {
        &self.actors
    }

    pub fn joints(&self) -> &[JointEntry] {
        &self.joints
    }

    pub fn actor_entry(&self, name: &str) -> Option<&ActorEntry> {
        self.actors
            .iter()
            .find(|entry| entry.desc.name.as_deref() == Some(name))
    }

    pub fn joint_entry(&self, name: &str) -> Option<&JointEntry> {
        self.joints
            .iter()
            .find(|entry| entry.desc.name.as_deref() == Some(name))
    }

    /// Check names, shapes and joint endpoints of every entry, active or not.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        let mut active = HashSet::new();
        for entry in &self.actors {
            entry
                .desc
                .validate()
                .map_err(|e| e.context(format!("actor `{}`", entry.desc.label())))?;
            if let Some(name) = &entry.desc.name {
                if !seen.insert(name.as_str()) {
                    return Err(Error::DuplicateActor(name.clone()));
                }
                if entry.active {
                    active.insert(name.as_str());
                }
            }
        }

        for entry in &self.joints {
            for name in [&entry.actor0, &entry.actor1] {
                if !seen.contains(name.as_str()) {
                    return Err(Error::UnknownActor(name.clone()));
                }
                if entry.active && !active.contains(name.as_str()) {
                    return Err(Error::InactiveActor(name.clone()).context(format!(
                        "joint `{}` is active",
                        entry.desc.label()
                    )));
                }
            }
        }
        Ok(())
    }

    /// Add every active entry to `scene`.
    ///
    /// Everything is checked against the layout and the scene first, so a failed
    /// build leaves the scene unchanged.
    pub fn build(&self, scene: &mut Scene) -> Result<BuiltLayout> {
        self.validate()?;
        for entry in self.actors.iter().filter(|entry| entry.active) {
            scene
                .check_actor(&entry.desc)
                .map_err(|e| e.context(format!("adding actor `{}`", entry.desc.label())))?;
        }
        let mut built = BuiltLayout::default();

        for entry in &self.actors {
            if !entry.active {
                built.skipped.push(entry.desc.label().to_string());
                continue;
            }
            let id = scene
                .add_actor(&entry.desc)
                .map_err(|e| e.context(format!("adding actor `{}`", entry.desc.label())))?;
            if let Some(name) = &entry.desc.name {
                built.actors.insert(name.clone(), id);
            }
            built.actor_count += 1;
        }

        for entry in &self.joints {
            if !entry.active {
                built.skipped.push(entry.desc.label().to_string());
                continue;
            }
            let a0 = built.actor(&entry.actor0)?;
            let a1 = built.actor(&entry.actor1)?;
            let id = scene
                .add_joint(a0, a1, &entry.desc)
                .map_err(|e| e.context(format!("adding joint `{}`", entry.desc.label())))?;
            if let Some(name) = &entry.desc.name {
                built.joints.insert(name.clone(), id);
            }
            built.joint_count += 1;
        }

        debug!("skipped inactive entries: {:?}", built.skipped);
        info!(
            "layout built: {} actor(s), {} joint(s), {} inactive",
            built.actor_count,
            built.joint_count,
            built.skipped.len()
        );
        Ok(built)
    }
}
