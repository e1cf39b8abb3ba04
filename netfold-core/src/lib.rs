/// Netfold Core Library - Nets of solids and their fold animation
///
/// This library holds everything the front ends share: the layout catalog
/// (eleven cube nets, a cross demo, cylinder and cone nets), fold progress
/// driven by drags or toggles, pose interpolation and easing, the hollow-cube
/// surface-area lookup, and the meshes and camera used to draw it all.

pub mod config;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod hollow;
pub mod layout;
pub mod progress;
pub mod projection;
pub mod registry;
pub mod session;
pub mod side;
pub mod transform;
pub mod tween;

// Re-export commonly used types
pub use config::UnfoldConfig;
pub use error::{HollowError, LayoutError, NetfoldError, Result};
pub use geometry::{Mesh, Panel, Triangle, Vertex};
pub use grid::NetGrid;
pub use hollow::{HollowCase, HollowCube, HollowReport, HollowScene};
pub use layout::{ControlMode, Face, Layout, NetFamily, Rgb, SolidKind};
pub use progress::{DragController, PointerEvent, PointerKind, PointerSource, Progress};
pub use projection::{Camera, ProjectionMode};
pub use registry::LayoutRegistry;
pub use session::{PoseUpdate, Session};
pub use side::CubeSide;
pub use transform::{Pose, Transform};
pub use tween::{FaceAnimator, FoldState, PoseTween};
