// src/filter.rs
//! Collision filtering: groups, per-shape filter words and the filter shader.
//!
//! Every shape carries two 32-bit words. `word0` is the set of groups the shape
//! belongs to, `word1` the set of groups it wants to hear about. The shader runs
//! once per candidate pair and decides which pair flags apply; it never drops a
//! pair, it only decides whether touch notifications are reported.

use serde::{Deserialize, Serialize};

bitflags::bitflags! {
    /// Named filter groups. Combine with `|` to build masks.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FilterGroup: u32 {
        const ACTOR0 = 1 << 0;
        const ACTOR1 = 1 << 1;
        const ACTOR2 = 1 << 2;
        const ACTOR3 = 1 << 3;
        const ACTOR4 = 1 << 4;
        const ACTOR5 = 1 << 5;
    }
}

bitflags::bitflags! {
    /// Per-pair behaviour flags produced by [`filter_shader`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PairFlags: u32 {
        const SOLVE_CONTACT = 1 << 0;
        const MODIFY_CONTACTS = 1 << 1;
        const NOTIFY_TOUCH_FOUND = 1 << 2;
        const NOTIFY_TOUCH_PERSISTS = 1 << 3;
        const NOTIFY_TOUCH_LOST = 1 << 4;
        const NOTIFY_CONTACT_POINTS = 1 << 5;
        const DETECT_DISCRETE_CONTACT = 1 << 6;
        const DETECT_CCD_CONTACT = 1 << 7;

        const CONTACT_DEFAULT = Self::SOLVE_CONTACT.bits() | Self::DETECT_DISCRETE_CONTACT.bits();
        const TRIGGER_DEFAULT = Self::NOTIFY_TOUCH_FOUND.bits()
            | Self::NOTIFY_TOUCH_LOST.bits()
            | Self::DETECT_DISCRETE_CONTACT.bits();
    }
}

bitflags::bitflags! {
    /// What the shader knows about the object owning a shape.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FilterAttributes: u32 {
        const TRIGGER = 1 << 0;
        const STATIC = 1 << 1;
        const KINEMATIC = 1 << 2;
    }
}

impl FilterAttributes {
    #[inline]
    pub fn is_trigger(self) -> bool {
        self.contains(FilterAttributes::TRIGGER)
    }
}

/// The two filter words of one shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterData {
    /// Groups this shape belongs to.
    pub word0: u32,
    /// Groups this shape reports touches with.
    pub word1: u32,
}

impl FilterData {
    #[inline]
    pub const fn new(word0: u32, word1: u32) -> Self {
        Self { word0, word1 }
    }

    /// Shape belongs to `group` and wants notifications for `mask`.
    #[inline]
    pub fn groups(group: FilterGroup, mask: FilterGroup) -> Self {
        Self::new(group.bits(), mask.bits())
    }
}

/// Decide the behaviour of a candidate pair before contacts are evaluated.
///
/// Triggers always get [`PairFlags::TRIGGER_DEFAULT`]. Any other pair gets
/// [`PairFlags::CONTACT_DEFAULT`], plus touch-found/touch-lost notifications when
/// each side's mask contains the other side's group.
pub fn filter_shader(
    attributes0: FilterAttributes,
    data0: FilterData,
    attributes1: FilterAttributes,
    data1: FilterData,
) -> PairFlags {
    if attributes0.is_trigger() || attributes1.is_trigger() {
        return PairFlags::TRIGGER_DEFAULT;
    }

    let mut flags = PairFlags::CONTACT_DEFAULT;
    if (data0.word0 & data1.word1) != 0 && (data1.word0 & data0.word1) != 0 {
        flags |= PairFlags::NOTIFY_TOUCH_FOUND | PairFlags::NOTIFY_TOUCH_LOST;
    }
    flags
}
