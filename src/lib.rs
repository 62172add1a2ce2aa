// src/lib.rs
//! A trebuchet, a trampoline and a handful of primitive bodies on top of rapier3d.
//!
//! [`TrebuchetScene`] builds the demo; [`Scene`] is the thin rapier wrapper it
//! runs on. Contact and trigger events are filtered by [`filter_shader`] and
//! delivered to a [`SimulationEventCallback`] after every step.

pub mod actors;
pub mod config;
pub mod debug_draw;
pub mod error;
pub mod events;
pub mod filter;
pub mod joints;
pub mod layout;
pub mod scene;
pub mod trampoline;
pub mod trebuchet;

pub use actors::{ActorDesc, BodyKind, Color, Geometry, GeometryType, Material, Pose, ShapeDesc};
pub use config::{SceneConfig, TrampolineConfig};
pub use debug_draw::DebugDraw;
pub use error::{Error, Result};
pub use events::{
    BrokenConstraint, ContactPair, ContactPairHeader, ContactReporter, SimulationEventCallback,
    TriggerPair, TriggerState,
};
pub use filter::{filter_shader, FilterAttributes, FilterData, FilterGroup, PairFlags};
pub use joints::{JointDesc, JointKind};
pub use layout::{BuiltLayout, SceneLayout};
pub use scene::{ActorId, JointId, Scene, SceneMetrics, ShapeId, VisualizationParameter};
pub use trampoline::Trampoline;
pub use trebuchet::{trebuchet_layout, TrebuchetScene};
