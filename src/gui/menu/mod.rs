pub mod animation;
pub mod model;
pub mod view;

pub use animation::{MenuAnimator, OffsetSpring, Spring, SpringParams, Transition};
pub use model::{
    ButtonKind, GlassId, Hit, IconToken, LayoutError, MenuGeometry, MenuPhase, MenuState, Offset,
    Point, SatelliteFrame,
};
pub use view::{MenuIcons, draw};

pub const MENU_RADIUS: f64 = 120.0; // satellite orbital radius
pub const ARC_SWEEP_DEG: f64 = 90.0;
pub const START_ANGLE_DEG: f64 = -180.0;
pub const DURATION_SCALE: f64 = 3.0; // base duration multiplier for satellite springs
pub const SATELLITE_BOUNCE: f64 = 0.2;
pub const TRIGGER_ID: &str = "menu";

// Glass look
pub const GLASS_HIGHLIGHT_ALPHA: f64 = 0.35;
pub const GLASS_RIM_ALPHA: f64 = 0.55;
pub const GLASS_RIM_WIDTH: f64 = 1.0;
pub const ICON_SIZE: i32 = 128;
pub const ICON_FILL: f64 = 0.48; // icon edge relative to button diameter
