mod hermite;
mod interpolate;
mod quadrature;

pub use hermite::CubicHermite;
pub use interpolate::{euler_to_quat, lerp, quat_to_euler, slerp, smoothstep};
pub use quadrature::GaussLegendre;
