// src/debug_draw.rs
//! Debug geometry produced from a scene according to its visualization parameters.

use glam::Vec3;
use nalgebra::{Isometry3, Point3};

use crate::actors::DEFAULT_COLOR;
use crate::scene::{Scene, VisualizationParameter};

const UNBOUNDED: f32 = 1.0e6;

const AXIS_COLORS: [[f32; 4]; 3] = [
    [1.0, 0.0, 0.0, 1.0],
    [0.0, 1.0, 0.0, 1.0],
    [0.0, 0.0, 1.0, 1.0],
];

#[derive(Debug, Clone, Default)]
pub struct DebugDraw {
    pub lines: Vec<DebugLine>,
    pub points: Vec<DebugPoint>,
    pub contacts: Vec<DebugContact>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DebugLine {
    pub start: Vec3,
    pub end: Vec3,
    pub color: [f32; 4],
}

#[derive(Debug, Clone, PartialEq)]
pub struct DebugPoint {
    pub position: Vec3,
    pub color: [f32; 4],
    pub size: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DebugContact {
    pub point: Vec3,
    pub normal: Vec3,
    pub color: [f32; 4],
}

fn vec3(p: &Point3<f32>) -> Vec3 {
    Vec3::new(p.x, p.y, p.z)
}

impl DebugDraw {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.points.is_empty() && self.contacts.is_empty()
    }

    /// Nothing is drawn while `Scale` is zero.
    pub fn from_scene(scene: &Scene) -> Self {
        let mut draw = Self::new();
        let scale = scene.visualization_parameter(VisualizationParameter::Scale);
        if scale <= 0.0 {
            return draw;
        }

        let enabled = |p| scene.visualization_parameter(p) > 0.0;
        if enabled(VisualizationParameter::CollisionShapes) {
            draw.draw_collision_shapes(scene);
        }
        if enabled(VisualizationParameter::ContactPoints) {
            draw.draw_contacts(scene, scale);
        }
        if enabled(VisualizationParameter::JointLocalFrames) {
            draw.draw_joint_frames(scene, scale);
        }
        if enabled(VisualizationParameter::BodyAxes) {
            draw.draw_body_axes(scene, scale);
        }
        draw
    }

    /// AABB wireframe of every collider, in its actor's color.
    pub fn draw_collision_shapes(&mut self, scene: &Scene) {
        for (handle, collider) in scene.colliders().iter() {
            let color = scene
                .shape(handle)
                .and_then(|shape| scene.actor(shape.actor))
                .map_or(DEFAULT_COLOR, |actor| actor.color);
            let color = [color.x, color.y, color.z, 1.0];

            // halfspaces have unbounded boxes; mark their origin instead
            let aabb = collider.compute_aabb();
            if aabb.half_extents().iter().any(|v| !v.is_finite() || *v > UNBOUNDED) {
                self.points.push(DebugPoint {
                    position: vec3(&Point3::from(collider.position().translation.vector)),
                    color,
                    size: 0.1,
                });
                continue;
            }

            let (min, max) = (vec3(&aabb.mins), vec3(&aabb.maxs));
            let corners = [
                Vec3::new(min.x, min.y, min.z),
                Vec3::new(max.x, min.y, min.z),
                Vec3::new(max.x, max.y, min.z),
                Vec3::new(min.x, max.y, min.z),
                Vec3::new(min.x, min.y, max.z),
                Vec3::new(max.x, min.y, max.z),
                Vec3::new(max.x, max.y, max.z),
                Vec3::new(min.x, max.y, max.z),
            ];
            let edges = [
                (0, 1), (1, 2), (2, 3), (3, 0),
                (4, 5), (5, 6), (6, 7), (7, 4),
                (0, 4), (1, 5), (2, 6), (3, 7),
            ];
            for (a, b) in edges {
                self.lines.push(DebugLine {
                    start: corners[a],
                    end: corners[b],
                    color,
                });
            }
        }
    }

    pub fn draw_contacts(&mut self, scene: &Scene, scale: f32) {
        for pair in scene.narrow_phase().contact_pairs() {
            for manifold in &pair.manifolds {
                let n = manifold.data.normal;
                let normal = Vec3::new(n.x, n.y, n.z) * scale;
                for contact in &manifold.data.solver_contacts {
                    self.contacts.push(DebugContact {
                        point: vec3(&contact.point),
                        normal,
                        color: [1.0, 1.0, 0.0, 1.0],
                    });
                }
            }
        }
    }

    pub fn draw_joint_frames(&mut self, scene: &Scene, scale: f32) {
        let bodies = scene.bodies();
        for (_, joint) in scene.impulse_joints().iter() {
            let frames = [
                (joint.body1, joint.data.local_frame1),
                (joint.body2, joint.data.local_frame2),
            ];
            for (body, local) in frames {
                if let Some(body) = bodies.get(body) {
                    self.draw_axes(&(body.position() * local), scale);
                }
            }
        }
    }

    pub fn draw_body_axes(&mut self, scene: &Scene, scale: f32) {
        for (_, body) in scene.bodies().iter() {
            self.draw_axes(body.position(), scale);
        }
    }

    fn draw_axes(&mut self, frame: &Isometry3<f32>, scale: f32) {
        let origin = vec3(&Point3::from(frame.translation.vector));
        for (axis, color) in AXIS_COLORS.into_iter().enumerate() {
            let dir = frame.rotation * nalgebra::Vector3::ith(axis, scale);
            self.lines.push(DebugLine {
                start: origin,
                end: origin + Vec3::new(dir.x, dir.y, dir.z),
                color,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actors::{box_actor, palette, static_box, Pose};
    use crate::joints::JointDesc;

    fn scene_with_hinge() -> Scene {
        let mut scene = Scene::default();
        let a = scene
            .add_actor(&static_box(Pose::IDENTITY, Vec3::splat(0.5), 1.0).color(palette(4)))
            .unwrap();
        let b = scene
            .add_actor(&box_actor(Pose::from_translation(Vec3::X * 2.0), Vec3::splat(0.5), 1.0))
            .unwrap();
        scene
            .add_joint(a, b, &JointDesc::revolute(Pose::IDENTITY, Pose::IDENTITY))
            .unwrap();
        scene
    }

    #[test]
    fn nothing_without_scale() {
        let mut scene = scene_with_hinge();
        scene.set_visualization_parameter(VisualizationParameter::CollisionShapes, 1.0);
        assert!(scene.debug_draw().is_empty());
    }

    #[test]
    fn collision_shapes_use_actor_color() {
        let mut scene = scene_with_hinge();
        scene.set_visualization_parameter(VisualizationParameter::Scale, 1.0);
        scene.set_visualization_parameter(VisualizationParameter::CollisionShapes, 1.0);

        let draw = scene.debug_draw();
        assert_eq!(draw.lines.len(), 24);
        let c = palette(4);
        assert!(draw.lines.iter().any(|l| l.color == [c.x, c.y, c.z, 1.0]));
        assert!(draw.contacts.is_empty());
    }

    #[test]
    fn joint_frames_and_axes_scale() {
        let mut scene = scene_with_hinge();
        scene.set_visualization_parameter(VisualizationParameter::Scale, 2.0);
        scene.set_visualization_parameter(VisualizationParameter::JointLocalFrames, 1.0);

        let draw = scene.debug_draw();
        // two frames, three axes each
        assert_eq!(draw.lines.len(), 6);
        for line in &draw.lines {
            assert!(((line.end - line.start).length() - 2.0).abs() < 1e-5);
        }

        scene.set_visualization_parameter(VisualizationParameter::JointLocalFrames, 0.0);
        scene.set_visualization_parameter(VisualizationParameter::BodyAxes, 1.0);
        assert_eq!(scene.debug_draw().lines.len(), 6);
    }
}
