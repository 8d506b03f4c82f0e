pub mod actions;
pub mod camera;
pub mod color;
pub mod config;
pub mod connectivity;
pub mod controller;
pub mod coords;
pub mod cube;
pub mod grid;
pub mod hud;
pub mod level;
pub mod orientation;
pub mod session;

// Re-exports for convenience in tests and integration users.
pub use actions::{Action, MoveDirection};
pub use camera::CameraRig;
pub use color::CubeColor;
pub use config::{ConfigError, SessionConfig};
pub use connectivity::{Classification, ColorProgress, ConnectivityAnalyzer, ConnectivityReport};
pub use controller::{GrabDropController, GrabState};
pub use coords::{Column, GridCoord3, GridSize};
pub use cube::{Cube, CubeId, CubeRegistry};
pub use grid::GridIndex;
pub use hud::{format_hud, format_side_panel};
pub use level::{LevelDef, LevelError, Placement, builtin_level, builtin_levels};
pub use orientation::{OrientationKeyframes, snap_orientation};
pub use session::{LevelSession, SessionEvent, Snapshot};
