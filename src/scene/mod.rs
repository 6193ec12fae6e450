//! Scene graph, transforms and waypoint paths

mod graph;
mod linear_path;
mod object;
mod path;
mod spline_path;
mod transform;

pub use graph::SceneGraph;
pub use linear_path::LinearPath;
pub use object::{
    Attenuation, Behavior, Camera, DirectionalLight, Light, ObjectHandle, ObjectKind,
    OrthographicCamera, Orbit, PerspectiveCamera, PointLight, SceneObject, Spin, SpotLight,
};
pub use path::{Location, Path, PathLayout, Waypoint};
pub use spline_path::SplinePath;
pub use transform::Transform;
