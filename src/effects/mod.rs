// Decorative effects
//
// Nothing here reads reveal or contact state. Global page mutations are held
// by guards that undo themselves on drop.

pub mod animation;
pub mod overlay;

pub use animation::{AnimationLoop, Effect, FloatingShapes, Shape, TiltCube, Vec3};
pub use overlay::{CursorTrail, DetailModal, Overflow, OverlayHost, ScrollLock};
