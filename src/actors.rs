// src/actors.rs
//! Actor descriptors: what a body looks like before it is handed to rapier.
//!
//! An [`ActorDesc`] is plain data (pose, shapes, color, name). [`Scene::add_actor`]
//! turns it into a rigid body plus colliders. Keeping descriptors engine-free lets
//! a layout list every body of a demo, including ones that never go live.
//!
//! [`Scene::add_actor`]: crate::scene::Scene::add_actor

use glam::{Quat, Vec3};
use nalgebra::{Isometry3, Point3, Quaternion, Translation3, Unit, UnitQuaternion, Vector3};
use rapier3d::prelude::SharedShape;
use serde::{Deserialize, Serialize};

use crate::filter::{FilterAttributes, FilterData, FilterGroup};
use crate::{Error, Result};

/// RGB color, components in `[0, 1]`.
pub type Color = Vec3;

/// Color used when an actor never had one assigned.
pub const DEFAULT_COLOR: Color = Vec3::new(0.8, 0.8, 0.8);

/// Five-color "circus" palette shared by the demo scenes.
pub const PALETTE: [Color; 5] = [
    Vec3::new(46.0 / 255.0, 9.0 / 255.0, 39.0 / 255.0),
    Vec3::new(217.0 / 255.0, 0.0 / 255.0, 0.0 / 255.0),
    Vec3::new(255.0 / 255.0, 45.0 / 255.0, 0.0 / 255.0),
    Vec3::new(255.0 / 255.0, 140.0 / 255.0, 54.0 / 255.0),
    Vec3::new(4.0 / 255.0, 117.0 / 255.0, 111.0 / 255.0),
];

/// Palette lookup. Indices past the end wrap around.
#[inline]
pub fn palette(index: usize) -> Color {
    PALETTE[index % PALETTE.len()]
}

/// Rigid transform: position plus unit rotation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Pose {
    pub const IDENTITY: Pose = Pose {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    #[inline]
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    #[inline]
    pub fn from_translation(position: Vec3) -> Self {
        Self::new(position, Quat::IDENTITY)
    }

    /// Translation plus a rotation of `angle` radians about `axis`.
    #[inline]
    pub fn from_axis_angle(position: Vec3, axis: Vec3, angle: f32) -> Self {
        Self::new(position, Quat::from_axis_angle(axis.normalize(), angle))
    }

    pub fn translated(self, offset: Vec3) -> Self {
        Self::new(self.position + offset, self.rotation)
    }

    pub fn to_isometry(&self) -> Isometry3<f32> {
        let p = self.position;
        let q = self.rotation;
        Isometry3::from_parts(
            Translation3::new(p.x, p.y, p.z),
            UnitQuaternion::new_normalize(Quaternion::new(q.w, q.x, q.y, q.z)),
        )
    }

    pub fn from_isometry(iso: &Isometry3<f32>) -> Self {
        let t = iso.translation.vector;
        let r = iso.rotation;
        Self::new(Vec3::new(t.x, t.y, t.z), Quat::from_xyzw(r.i, r.j, r.k, r.w))
    }
}

/// Surface properties shared by every shape of a scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    pub dynamic_friction: f32,
    pub restitution: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            dynamic_friction: 0.5,
            restitution: 0.0,
        }
    }
}

/// Geometry kind, used by callbacks to tell shapes apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryType {
    Sphere,
    Plane,
    Box,
    ConvexMesh,
    TriangleMesh,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Box { half_extents: Vec3 },
    Sphere { radius: f32 },
    /// Infinite plane through the shape origin; everything behind `normal` is solid.
    Plane { normal: Vec3 },
    ConvexMesh { vertices: Vec<Vec3> },
    TriangleMesh { vertices: Vec<Vec3>, indices: Vec<[u32; 3]> },
}

impl Geometry {
    #[inline]
    pub fn cuboid(half_extents: Vec3) -> Self {
        Geometry::Box { half_extents }
    }

    #[inline]
    pub fn ball(radius: f32) -> Self {
        Geometry::Sphere { radius }
    }

    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Geometry::Box { .. } => GeometryType::Box,
            Geometry::Sphere { .. } => GeometryType::Sphere,
            Geometry::Plane { .. } => GeometryType::Plane,
            Geometry::ConvexMesh { .. } => GeometryType::ConvexMesh,
            Geometry::TriangleMesh { .. } => GeometryType::TriangleMesh,
        }
    }

    /// Build the rapier shape for this geometry.
    pub(crate) fn to_shared_shape(&self) -> Result<SharedShape> {
        match self {
            Geometry::Box { half_extents: h } => {
                if h.min_element() <= 0.0 || !h.is_finite() {
                    return Err(Error::InvalidGeometry(format!(
                        "box half-extents must be positive, got {h}"
                    )));
                }
                Ok(SharedShape::cuboid(h.x, h.y, h.z))
            }
            Geometry::Sphere { radius } => {
                if *radius <= 0.0 || !radius.is_finite() {
                    return Err(Error::InvalidGeometry(format!(
                        "sphere radius must be positive, got {radius}"
                    )));
                }
                Ok(SharedShape::ball(*radius))
            }
            Geometry::Plane { normal } => {
                if normal.length_squared() < 1e-12 {
                    return Err(Error::InvalidGeometry("plane normal is zero".into()));
                }
                let n = Unit::new_normalize(Vector3::new(normal.x, normal.y, normal.z));
                Ok(SharedShape::halfspace(n))
            }
            Geometry::ConvexMesh { vertices } => {
                let points = to_points(vertices);
                SharedShape::convex_hull(&points).ok_or_else(|| {
                    Error::InvalidGeometry(format!(
                        "convex hull of {} vertices is degenerate",
                        vertices.len()
                    ))
                })
            }
            Geometry::TriangleMesh { vertices, indices } => {
                let count = vertices.len() as u32;
                if indices.is_empty() {
                    return Err(Error::InvalidGeometry("triangle mesh has no triangles".into()));
                }
                if let Some(tri) = indices.iter().find(|tri| tri.iter().any(|&i| i >= count)) {
                    return Err(Error::InvalidGeometry(format!(
                        "triangle {tri:?} indexes past {count} vertices"
                    )));
                }
                Ok(SharedShape::trimesh(to_points(vertices), indices.clone()))
            }
        }
    }
}

fn to_points(vertices: &[Vec3]) -> Vec<Point3<f32>> {
    vertices.iter().map(|v| Point3::new(v.x, v.y, v.z)).collect()
}

/// One collision shape attached to an actor.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeDesc {
    pub geometry: Geometry,
    pub density: f32,
    /// Shape pose relative to the actor.
    pub local_pose: Pose,
    pub filter: FilterData,
    /// Trigger shapes report overlaps and never push back.
    pub trigger: bool,
}

impl ShapeDesc {
    pub fn new(geometry: Geometry, density: f32) -> Self {
        Self {
            geometry,
            density,
            local_pose: Pose::IDENTITY,
            filter: FilterData::default(),
            trigger: false,
        }
    }

    pub fn at(mut self, local_pose: Pose) -> Self {
        self.local_pose = local_pose;
        self
    }

    pub(crate) fn attributes(&self, kind: BodyKind) -> FilterAttributes {
        let mut attributes = match kind {
            BodyKind::Static => FilterAttributes::STATIC,
            BodyKind::Kinematic => FilterAttributes::KINEMATIC,
            BodyKind::Dynamic => FilterAttributes::empty(),
        };
        if self.trigger {
            attributes |= FilterAttributes::TRIGGER;
        }
        attributes
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyKind {
    Dynamic,
    Static,
    Kinematic,
}

/// Everything needed to create one actor.
#[derive(Debug, Clone, PartialEq)]
pub struct ActorDesc {
    pub name: Option<String>,
    pub kind: BodyKind,
    pub pose: Pose,
    pub shapes: Vec<ShapeDesc>,
    pub color: Color,
}

impl ActorDesc {
    pub fn new(kind: BodyKind, pose: Pose) -> Self {
        Self {
            name: None,
            kind,
            pose,
            shapes: Vec::new(),
            color: DEFAULT_COLOR,
        }
    }

    pub fn dynamic(pose: Pose) -> Self {
        Self::new(BodyKind::Dynamic, pose)
    }

    pub fn fixed(pose: Pose) -> Self {
        Self::new(BodyKind::Static, pose)
    }

    /// Attach a shape with the given geometry and density.
    pub fn create_shape(mut self, geometry: Geometry, density: f32) -> Self {
        self.shapes.push(ShapeDesc::new(geometry, density));
        self
    }

    pub fn with_shape(mut self, shape: ShapeDesc) -> Self {
        self.shapes.push(shape);
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set filter words on every shape: own group `group`, notify against `mask`.
    pub fn setup_filtering(mut self, group: FilterGroup, mask: FilterGroup) -> Self {
        let data = FilterData::groups(group, mask);
        for shape in &mut self.shapes {
            shape.filter = data;
        }
        self
    }

    /// Turn every shape into a trigger volume (or back).
    pub fn trigger(mut self, trigger: bool) -> Self {
        for shape in &mut self.shapes {
            shape.trigger = trigger;
        }
        self
    }

    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("unnamed")
    }

    /// Check that rapier can build every shape of this actor.
    pub fn validate(&self) -> Result<()> {
        if self.shapes.is_empty() {
            return Err(Error::EmptyActor(self.label().to_string()));
        }
        for shape in &self.shapes {
            if shape.geometry.geometry_type() == GeometryType::Plane && self.kind != BodyKind::Static {
                return Err(Error::InvalidGeometry(format!(
                    "plane shape on non-static actor `{}`",
                    self.label()
                )));
            }
            shape.geometry.to_shared_shape()?;
        }
        Ok(())
    }
}

/* -------------------------------------------------------------------------- */
/*                          Primitive constructors                            */
/* -------------------------------------------------------------------------- */

/// Dynamic box.
pub fn box_actor(pose: Pose, half_extents: Vec3, density: f32) -> ActorDesc {
    ActorDesc::dynamic(pose).create_shape(Geometry::cuboid(half_extents), density)
}

/// Static box.
pub fn static_box(pose: Pose, half_extents: Vec3, density: f32) -> ActorDesc {
    ActorDesc::fixed(pose).create_shape(Geometry::cuboid(half_extents), density)
}

/// Dynamic sphere.
pub fn sphere(pose: Pose, radius: f32, density: f32) -> ActorDesc {
    ActorDesc::dynamic(pose).create_shape(Geometry::ball(radius), density)
}

/// Static plane `normal . x + distance = 0`.
pub fn plane(normal: Vec3, distance: f32) -> ActorDesc {
    let normal = normal.normalize_or_zero();
    ActorDesc::fixed(Pose::from_translation(-normal * distance))
        .create_shape(Geometry::Plane { normal }, 1.0)
}

/// Dynamic convex hull around `vertices`.
pub fn convex_mesh(vertices: Vec<Vec3>, pose: Pose, density: f32) -> ActorDesc {
    ActorDesc::dynamic(pose).create_shape(Geometry::ConvexMesh { vertices }, density)
}

/// Static triangle mesh. Triangles are counter-clockwise seen from outside.
pub fn triangle_mesh(vertices: Vec<Vec3>, indices: Vec<[u32; 3]>, pose: Pose) -> ActorDesc {
    ActorDesc::fixed(pose).create_shape(Geometry::TriangleMesh { vertices, indices }, 1.0)
}

pub const PYRAMID_VERTICES: [Vec3; 5] = [
    Vec3::new(0.0, 1.0, 0.0),
    Vec3::new(1.0, 0.0, 0.0),
    Vec3::new(-1.0, 0.0, 0.0),
    Vec3::new(0.0, 0.0, 1.0),
    Vec3::new(0.0, 0.0, -1.0),
];

pub const PYRAMID_TRIANGLES: [[u32; 3]; 6] = [
    [1, 4, 0],
    [3, 1, 0],
    [2, 3, 0],
    [4, 2, 0],
    [3, 2, 1],
    [2, 4, 1],
];

pub fn pyramid(pose: Pose, density: f32) -> ActorDesc {
    convex_mesh(PYRAMID_VERTICES.to_vec(), pose, density)
}

pub fn pyramid_static(pose: Pose) -> ActorDesc {
    triangle_mesh(PYRAMID_VERTICES.to_vec(), PYRAMID_TRIANGLES.to_vec(), pose)
}
