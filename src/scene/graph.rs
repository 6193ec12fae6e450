use glam::{Mat4, Quat, UVec2, Vec3};
use indexmap::IndexMap;
use log::{debug, trace, warn};

use super::linear_path::LinearPath;
use super::object::{
    Behavior, DirectionalLight, Light, ObjectHandle, ObjectKind, OrthographicCamera,
    PerspectiveCamera, PointLight, SceneObject, SpotLight,
};
use super::path::Path;
use super::spline_path::SplinePath;
use super::transform::Transform;
use crate::animation::AnimationObject;
use crate::error::{EngineError, Result};

/// Owns every scene object by name.
///
/// Objects reference their parent by handle only; the graph owns all of
/// them. Each object's world matrix is snapshotted by
/// [`update_world_transforms`](Self::update_world_transforms), which the
/// engine runs once per frame after input and animation, so listeners in
/// a frame all observe the same world state. [`compute_world_matrix`](Self::compute_world_matrix)
/// walks the parent chain instead and always reflects the current locals.
#[derive(Debug)]
pub struct SceneGraph {
    slots: Vec<Option<SceneObject>>,
    names: IndexMap<String, ObjectHandle>,
    active_camera: Option<ObjectHandle>,
    resolution: UVec2,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            names: IndexMap::new(),
            active_camera: None,
            resolution: UVec2::new(800, 600),
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Object names in creation order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.keys().map(String::as_str)
    }

    /// Live objects in creation order, skipping any checked out by the frame loop
    pub fn objects(&self) -> impl Iterator<Item = &SceneObject> {
        self.slots.iter().filter_map(Option::as_ref)
    }

    // === Factories ===

    pub fn add_object(&mut self, name: impl Into<String>, kind: ObjectKind) -> Result<ObjectHandle> {
        let name = name.into();
        if name.is_empty() {
            return Err(EngineError::invalid("object name must not be empty"));
        }
        if self.names.contains_key(&name) {
            return Err(EngineError::invalid(format!("object '{name}' already exists")));
        }

        let handle = ObjectHandle(self.slots.len());
        debug!("scene: add {} '{}' as {}", kind.label(), name, handle);
        self.names.insert(name.clone(), handle);
        self.slots.push(Some(SceneObject::new(name, handle, kind)));
        Ok(handle)
    }

    pub fn create_empty(&mut self, name: impl Into<String>) -> Result<ObjectHandle> {
        self.add_object(name, ObjectKind::Empty)
    }

    pub fn create_mesh(
        &mut self,
        name: impl Into<String>,
        mesh: impl Into<String>,
        material: impl Into<String>,
    ) -> Result<ObjectHandle> {
        self.add_object(
            name,
            ObjectKind::Mesh {
                mesh: mesh.into(),
                material: material.into(),
            },
        )
    }

    pub fn create_point_light(&mut self, name: impl Into<String>) -> Result<ObjectHandle> {
        self.add_object(name, ObjectKind::PointLight(PointLight::default()))
    }

    pub fn create_directional_light(&mut self, name: impl Into<String>) -> Result<ObjectHandle> {
        self.add_object(name, ObjectKind::DirectionalLight(DirectionalLight::default()))
    }

    pub fn create_spot_light(&mut self, name: impl Into<String>) -> Result<ObjectHandle> {
        self.add_object(name, ObjectKind::SpotLight(SpotLight::default()))
    }

    pub fn create_perspective_camera(
        &mut self,
        name: impl Into<String>,
        fov: f32,
        near: f32,
        far: f32,
    ) -> Result<ObjectHandle> {
        validate_clip(near, far)?;
        self.add_object(
            name,
            ObjectKind::PerspectiveCamera(PerspectiveCamera { fov, near, far }),
        )
    }

    pub fn create_orthographic_camera(
        &mut self,
        name: impl Into<String>,
        width: f32,
        near: f32,
        far: f32,
    ) -> Result<ObjectHandle> {
        validate_clip(near, far)?;
        self.add_object(
            name,
            ObjectKind::OrthographicCamera(OrthographicCamera { width, near, far }),
        )
    }

    pub fn create_spline_path(&mut self, name: impl Into<String>) -> Result<ObjectHandle> {
        self.add_object(name, ObjectKind::SplinePath(SplinePath::new()))
    }

    pub fn create_linear_path(&mut self, name: impl Into<String>) -> Result<ObjectHandle> {
        self.add_object(name, ObjectKind::LinearPath(LinearPath::new()))
    }

    pub fn create_animation(&mut self, name: impl Into<String>) -> Result<ObjectHandle> {
        self.add_object(name, ObjectKind::Animation(AnimationObject::new()))
    }

    // === Lookup ===

    pub fn handle(&self, name: &str) -> Result<ObjectHandle> {
        self.names
            .get(name)
            .copied()
            .ok_or_else(|| EngineError::not_found("object", name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    pub fn object(&self, handle: ObjectHandle) -> Result<&SceneObject> {
        match self.slots.get(handle.0) {
            Some(Some(object)) => Ok(object),
            Some(None) => Err(checked_out(handle)),
            None => Err(EngineError::not_found("object", handle.to_string())),
        }
    }

    pub fn object_mut(&mut self, handle: ObjectHandle) -> Result<&mut SceneObject> {
        match self.slots.get_mut(handle.0) {
            Some(Some(object)) => Ok(object),
            Some(None) => Err(checked_out(handle)),
            None => Err(EngineError::not_found("object", handle.to_string())),
        }
    }

    pub fn get(&self, name: &str) -> Result<&SceneObject> {
        self.object(self.handle(name)?)
    }

    pub fn get_mut(&mut self, name: &str) -> Result<&mut SceneObject> {
        let handle = self.handle(name)?;
        self.object_mut(handle)
    }

    pub fn transform(&self, handle: ObjectHandle) -> Result<&Transform> {
        Ok(&self.object(handle)?.transform)
    }

    pub fn transform_mut(&mut self, handle: ObjectHandle) -> Result<&mut Transform> {
        Ok(&mut self.object_mut(handle)?.transform)
    }

    pub fn add_behavior(
        &mut self,
        handle: ObjectHandle,
        behavior: impl Behavior + 'static,
    ) -> Result<()> {
        self.object_mut(handle)?.add_behavior(behavior);
        Ok(())
    }

    // === Typed access ===

    pub fn spline_path(&self, handle: ObjectHandle) -> Result<&SplinePath> {
        let object = self.object(handle)?;
        match &object.kind {
            ObjectKind::SplinePath(p) => Ok(p),
            other => Err(wrong_kind(&object.name, other, "spline path")),
        }
    }

    pub fn spline_path_mut(&mut self, handle: ObjectHandle) -> Result<&mut SplinePath> {
        let object = self.object_mut(handle)?;
        match &mut object.kind {
            ObjectKind::SplinePath(p) => Ok(p),
            other => Err(wrong_kind(&object.name, other, "spline path")),
        }
    }

    pub fn linear_path_mut(&mut self, handle: ObjectHandle) -> Result<&mut LinearPath> {
        let object = self.object_mut(handle)?;
        match &mut object.kind {
            ObjectKind::LinearPath(p) => Ok(p),
            other => Err(wrong_kind(&object.name, other, "linear path")),
        }
    }

    /// Either path kind
    pub fn path(&self, handle: ObjectHandle) -> Result<&dyn Path> {
        let object = self.object(handle)?;
        object
            .kind
            .path()
            .ok_or_else(|| wrong_kind(&object.name, &object.kind, "path"))
    }

    pub fn animation(&self, handle: ObjectHandle) -> Result<&AnimationObject> {
        let object = self.object(handle)?;
        match &object.kind {
            ObjectKind::Animation(a) => Ok(a),
            other => Err(wrong_kind(&object.name, other, "animation")),
        }
    }

    pub fn animation_mut(&mut self, handle: ObjectHandle) -> Result<&mut AnimationObject> {
        let object = self.object_mut(handle)?;
        match &mut object.kind {
            ObjectKind::Animation(a) => Ok(a),
            other => Err(wrong_kind(&object.name, other, "animation")),
        }
    }

    pub fn light_mut(&mut self, handle: ObjectHandle) -> Result<&mut Light> {
        let object = self.object_mut(handle)?;
        let name = &object.name;
        match object.kind.light_mut() {
            Some(light) => Ok(light),
            None => Err(EngineError::invalid(format!("object '{name}' is not a light"))),
        }
    }

    // === Hierarchy ===

    /// Attach `child` under the object named `parent`, keeping the child's
    /// local transform. Fails with `NotFound` for an unknown parent and
    /// `InvalidArgument` if the link would create a cycle.
    pub fn set_parent(&mut self, child: ObjectHandle, parent: &str) -> Result<()> {
        let parent = self.handle(parent)?;
        self.set_parent_handle(child, parent)
    }

    pub fn set_parent_handle(&mut self, child: ObjectHandle, parent: ObjectHandle) -> Result<()> {
        self.object(child)?;
        self.object(parent)?;

        let mut cursor = Some(parent);
        while let Some(current) = cursor {
            if current == child {
                return Err(EngineError::invalid(format!(
                    "parenting '{}' under '{}' would create a cycle",
                    self.object(child)?.name,
                    self.object(parent)?.name
                )));
            }
            cursor = self.object(current)?.parent;
        }

        self.detach(child)?;
        self.object_mut(parent)?.children.push(child);
        self.object_mut(child)?.parent = Some(parent);
        debug!("scene: {} parented to {}", child, parent);
        Ok(())
    }

    pub fn clear_parent(&mut self, child: ObjectHandle) -> Result<()> {
        self.detach(child)?;
        self.object_mut(child)?.parent = None;
        Ok(())
    }

    fn detach(&mut self, child: ObjectHandle) -> Result<()> {
        if let Some(old) = self.object(child)?.parent {
            self.object_mut(old)?.children.retain(|&c| c != child);
        }
        Ok(())
    }

    /// Objects without a parent, in creation order
    pub fn roots(&self) -> Vec<ObjectHandle> {
        self.objects()
            .filter(|o| o.parent.is_none())
            .map(|o| o.handle)
            .collect()
    }

    // === World transforms ===

    /// Snapshot every object's world matrix in one top-down pass from the roots
    pub fn update_world_transforms(&mut self) {
        let mut stack: Vec<(ObjectHandle, Mat4)> = self
            .roots()
            .into_iter()
            .rev()
            .map(|h| (h, Mat4::IDENTITY))
            .collect();

        let mut visited = 0usize;
        while let Some((handle, parent_world)) = stack.pop() {
            let Some(Some(object)) = self.slots.get_mut(handle.0) else {
                continue;
            };
            object.world = parent_world * object.transform.matrix();
            visited += 1;
            let world = object.world;
            stack.extend(object.children.iter().rev().map(|&c| (c, world)));
        }
        trace!("scene: propagated {visited} world transforms");
    }

    /// World matrix as of the last [`update_world_transforms`](Self::update_world_transforms).
    /// Lags local edits made since that pass; use
    /// [`compute_world_matrix`](Self::compute_world_matrix) for a fresh value.
    pub fn world_matrix(&self, handle: ObjectHandle) -> Result<Mat4> {
        Ok(self.object(handle)?.world)
    }

    /// World matrix from the current local transforms along the parent chain
    pub fn compute_world_matrix(&self, handle: ObjectHandle) -> Result<Mat4> {
        let object = self.object(handle)?;
        let local = object.transform.matrix();
        match object.parent {
            Some(parent) => Ok(self.compute_world_matrix(parent)? * local),
            None => Ok(local),
        }
    }

    pub fn world_position(&self, handle: ObjectHandle) -> Result<Vec3> {
        Ok(self.compute_world_matrix(handle)?.w_axis.truncate())
    }

    pub fn world_rotation(&self, handle: ObjectHandle) -> Result<Quat> {
        let (_, rotation, _) = self.compute_world_matrix(handle)?.to_scale_rotation_translation();
        Ok(rotation)
    }

    pub fn world_scale(&self, handle: ObjectHandle) -> Result<Vec3> {
        let (scale, _, _) = self.compute_world_matrix(handle)?.to_scale_rotation_translation();
        Ok(scale)
    }

    /// Local +X in world space
    pub fn right(&self, handle: ObjectHandle) -> Result<Vec3> {
        Ok(self.compute_world_matrix(handle)?.x_axis.truncate().normalize_or_zero())
    }

    /// Local +Y in world space
    pub fn up(&self, handle: ObjectHandle) -> Result<Vec3> {
        Ok(self.compute_world_matrix(handle)?.y_axis.truncate().normalize_or_zero())
    }

    /// Local +Z in world space. Cameras look down the opposite direction.
    pub fn forward(&self, handle: ObjectHandle) -> Result<Vec3> {
        Ok(self.compute_world_matrix(handle)?.z_axis.truncate().normalize_or_zero())
    }

    // === Paths in world space ===

    pub fn path_length(&self, handle: ObjectHandle) -> Result<f32> {
        self.path(handle)?.path_length()
    }

    /// Path sample mapped through the path object's world matrix
    pub fn path_position_world(&self, handle: ObjectHandle, distance: f32) -> Result<Vec3> {
        let local = self.path(handle)?.position_at_distance(distance)?;
        Ok(self.compute_world_matrix(handle)?.transform_point3(local))
    }

    pub fn path_rotation_world(&self, handle: ObjectHandle, distance: f32) -> Result<Quat> {
        let local = self.path(handle)?.rotation_at_distance(distance)?;
        Ok((self.world_rotation(handle)? * local).normalize())
    }

    // === Camera ===

    pub fn set_active_camera(&mut self, name: &str) -> Result<()> {
        let handle = self.handle(name)?;
        let object = self.object(handle)?;
        if object.kind.camera().is_none() {
            return Err(wrong_kind(name, &object.kind, "camera"));
        }
        self.active_camera = Some(handle);
        debug!("scene: active camera '{name}'");
        Ok(())
    }

    pub fn active_camera(&self) -> Option<ObjectHandle> {
        self.active_camera
    }

    pub fn set_resolution(&mut self, width: u32, height: u32) {
        self.resolution = UVec2::new(width.max(1), height.max(1));
    }

    pub fn resolution(&self) -> UVec2 {
        self.resolution
    }

    pub fn aspect(&self) -> f32 {
        self.resolution.x as f32 / self.resolution.y as f32
    }

    /// Inverse of the active camera's world matrix
    pub fn view_matrix(&self) -> Result<Mat4> {
        let camera = self
            .active_camera
            .ok_or_else(|| EngineError::State("no active camera".into()))?;
        Ok(self.compute_world_matrix(camera)?.inverse())
    }

    pub fn projection_matrix(&self) -> Result<Mat4> {
        let handle = self
            .active_camera
            .ok_or_else(|| EngineError::State("no active camera".into()))?;
        let object = self.object(handle)?;
        let camera = object
            .kind
            .camera()
            .ok_or_else(|| wrong_kind(&object.name, &object.kind, "camera"))?;
        Ok(camera.projection(self.aspect()))
    }

    // === Frame update ===

    /// Run behaviors, then tick animations, in creation order.
    ///
    /// An animation is checked out of its slot while it ticks so its
    /// callbacks can borrow the rest of the graph; looking it up from
    /// inside its own callback yields a `State` error. Failures are logged
    /// and do not stop the remaining objects from updating.
    pub fn animate(&mut self, delta: f32) {
        for index in 0..self.slots.len() {
            let handle = ObjectHandle(index);
            let mut behaviors = match self.slots[index].as_mut() {
                Some(object) if !object.behaviors.is_empty() => std::mem::take(&mut object.behaviors),
                _ => continue,
            };

            for behavior in &mut behaviors {
                if let Err(err) = behavior.on_frame(handle, self, delta) {
                    warn!("scene: behavior on {handle} failed: {err}");
                }
            }

            if let Some(object) = self.slots[index].as_mut() {
                behaviors.append(&mut object.behaviors);
                object.behaviors = behaviors;
            }
        }

        for index in 0..self.slots.len() {
            let is_animation = matches!(
                self.slots[index].as_ref().map(|o| &o.kind),
                Some(ObjectKind::Animation(_))
            );
            if !is_animation {
                continue;
            }

            let Some(mut object) = self.slots[index].take() else {
                continue;
            };
            if let ObjectKind::Animation(animation) = &mut object.kind {
                animation.tick(delta, self);
            }
            self.slots[index] = Some(object);
        }
    }
}

fn validate_clip(near: f32, far: f32) -> Result<()> {
    if near > 0.0 && far > near {
        Ok(())
    } else {
        Err(EngineError::invalid(format!(
            "camera clip planes must satisfy 0 < near < far, got near={near} far={far}"
        )))
    }
}

fn checked_out(handle: ObjectHandle) -> EngineError {
    EngineError::State(format!("object {handle} is being updated by the frame loop"))
}

fn wrong_kind(name: &str, kind: &ObjectKind, expected: &str) -> EngineError {
    EngineError::invalid(format!("object '{name}' is a {}, not a {expected}", kind.label()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_names_are_rejected() {
        let mut scene = SceneGraph::new();
        scene.create_empty("a").unwrap();
        assert!(matches!(scene.create_empty("a"), Err(EngineError::InvalidArgument(_))));
        assert!(scene.create_empty("").is_err());
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn unknown_parent_is_not_found() {
        let mut scene = SceneGraph::new();
        let a = scene.create_empty("a").unwrap();
        let err = scene.set_parent(a, "ghost").unwrap_err();
        assert!(matches!(err, EngineError::NotFound { kind: "object", .. }));
    }

    #[test]
    fn cycles_are_rejected() {
        let mut scene = SceneGraph::new();
        let a = scene.create_empty("a").unwrap();
        let b = scene.create_empty("b").unwrap();
        let c = scene.create_empty("c").unwrap();
        scene.set_parent(b, "a").unwrap();
        scene.set_parent(c, "b").unwrap();
        assert!(scene.set_parent(a, "c").is_err());
        assert!(scene.set_parent(a, "a").is_err());
        assert_eq!(scene.object(a).unwrap().parent(), None);
    }

    #[test]
    fn reparenting_moves_child_between_lists() {
        let mut scene = SceneGraph::new();
        let a = scene.create_empty("a").unwrap();
        let b = scene.create_empty("b").unwrap();
        let c = scene.create_empty("c").unwrap();
        scene.set_parent(c, "a").unwrap();
        scene.set_parent(c, "b").unwrap();
        assert!(scene.object(a).unwrap().children().is_empty());
        assert_eq!(scene.object(b).unwrap().children(), &[c]);
        scene.clear_parent(c).unwrap();
        assert!(scene.object(b).unwrap().children().is_empty());
        assert_eq!(scene.roots(), vec![a, b, c]);
    }

    #[test]
    fn active_camera_must_be_a_camera() {
        let mut scene = SceneGraph::new();
        scene.create_empty("pivot").unwrap();
        assert!(scene.set_active_camera("pivot").is_err());
        assert!(scene.view_matrix().is_err());
        scene.create_perspective_camera("cam", 60.0, 0.1, 100.0).unwrap();
        scene.set_active_camera("cam").unwrap();
        assert!(scene.projection_matrix().is_ok());
    }

    #[test]
    fn invalid_clip_planes_are_rejected() {
        let mut scene = SceneGraph::new();
        assert!(scene.create_perspective_camera("cam", 60.0, 0.0, 1.0).is_err());
        assert!(scene.create_orthographic_camera("ortho", 4.0, 2.0, 1.0).is_err());
    }

    #[test]
    fn wrong_kind_access_is_invalid() {
        let mut scene = SceneGraph::new();
        let e = scene.create_empty("e").unwrap();
        assert!(matches!(scene.spline_path(e), Err(EngineError::InvalidArgument(_))));
        assert!(scene.animation_mut(e).is_err());
        assert!(scene.light_mut(e).is_err());
    }
}
