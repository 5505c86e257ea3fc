use crate::gui::menu::animation::Transition;
use crate::gui::menu::{
    ARC_SWEEP_DEG, DURATION_SCALE, MENU_RADIUS, SATELLITE_BOUNCE, START_ANGLE_DEG, TRIGGER_ID,
};
use derive_more::{AsRef, Deref, Display, From, Into};
use strum::{EnumCount, EnumIter, IntoEnumIterator, IntoStaticStr};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn translate(self, offset: Offset) -> Self {
        Self::new(self.x + offset.dx, self.y + offset.dy)
    }

    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Displacement from the trigger centre in surface space (x right, y down).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Offset {
    pub dx: f64,
    pub dy: f64,
}

impl Offset {
    pub const ZERO: Self = Self { dx: 0.0, dy: 0.0 };

    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    pub fn length(&self) -> f64 {
        self.dx.hypot(self.dy)
    }
}

/// Identity of a glass element, stable across animated transitions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Deref, From, Into, AsRef)]
pub struct GlassId(String);

crate::impl_string_newtype!(GlassId);

impl GlassId {
    pub fn trigger() -> Self {
        Self::new(TRIGGER_ID)
    }
}

/// Symbolic icon name, resolved to a real glyph by the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Deref, From, Into, AsRef)]
pub struct IconToken(String);

crate::impl_string_newtype!(IconToken);

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum LayoutError {
    #[error("An arc needs at least two slots, got {0}")]
    DegenerateArc(usize),
    #[error("Slot {index} is outside an arc of {count}")]
    IndexOutOfRange { index: usize, count: usize },
}

/// Angle in degrees of slot `index` when `count` slots share the quarter arc.
pub fn arc_angle_deg(index: usize, count: usize) -> Result<f64, LayoutError> {
    if count < 2 {
        return Err(LayoutError::DegenerateArc(count));
    }
    if index >= count {
        return Err(LayoutError::IndexOutOfRange { index, count });
    }
    let step = ARC_SWEEP_DEG / (count - 1) as f64;
    Ok(START_ANGLE_DEG + index as f64 * step)
}

pub fn arc_offset(index: usize, count: usize, radius: f64) -> Result<Offset, LayoutError> {
    let angle = arc_angle_deg(index, count)?.to_radians();
    Ok(Offset::new(angle.cos() * radius, angle.sin() * radius))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumCount, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum ButtonKind {
    Home,
    Write,
    Chat,
    Email,
}

const _: () = assert!(ButtonKind::COUNT >= 2, "satellites need at least two arc slots");

impl ButtonKind {
    pub fn raw(&self) -> &'static str {
        (*self).into()
    }

    pub fn label(&self) -> String {
        let mut chars = self.raw().chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    pub fn icon_token(&self) -> IconToken {
        IconToken::new(match self {
            Self::Home => "house",
            Self::Write => "pencil",
            Self::Chat => "bubble",
            Self::Email => "at",
        })
    }

    /// Base spring duration in seconds, before [`DURATION_SCALE`].
    pub fn duration(&self) -> f64 {
        match self {
            Self::Home => 0.3,
            Self::Write => 0.4,
            Self::Chat => 0.5,
            Self::Email => 0.6,
        }
    }

    pub fn arc_index(&self) -> usize {
        *self as usize
    }

    pub fn glass_id(&self) -> GlassId {
        GlassId::new(self.label())
    }

    // The COUNT assertion above keeps both arc calls on their Ok path.
    pub fn angle_deg(&self) -> f64 {
        arc_angle_deg(self.arc_index(), Self::COUNT).unwrap_or(START_ANGLE_DEG)
    }

    pub fn offset(&self, expanded: bool) -> Offset {
        if !expanded {
            return Offset::ZERO;
        }
        arc_offset(self.arc_index(), Self::COUNT, MENU_RADIUS).unwrap_or_default()
    }

    pub fn transition(&self) -> Transition {
        Transition::spring(self.duration() * DURATION_SCALE, SATELLITE_BOUNCE)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MenuPhase {
    #[default]
    Collapsed,
    Expanded,
}

/// What the renderer needs to place and animate one satellite.
#[derive(Debug, Clone, PartialEq)]
pub struct SatelliteFrame {
    pub kind: ButtonKind,
    pub id: GlassId,
    pub offset: Offset,
    pub opacity: f64,
    pub transition: Transition,
}

#[derive(Debug, Clone, Default)]
pub struct MenuState {
    expanded: bool,
}

impl MenuState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn phase(&self) -> MenuPhase {
        if self.expanded {
            MenuPhase::Expanded
        } else {
            MenuPhase::Collapsed
        }
    }

    /// Flips the menu and returns the new target of every satellite. Values
    /// without their own transition fall back to `ambient`.
    pub fn toggle(&mut self, ambient: Transition) -> Vec<SatelliteFrame> {
        self.expanded = !self.expanded;
        log::debug!("Menu toggled to {:?}", self.phase());
        self.frames_with(ambient)
    }

    pub fn frames(&self) -> Vec<SatelliteFrame> {
        self.frames_with(Transition::AMBIENT)
    }

    fn frames_with(&self, ambient: Transition) -> Vec<SatelliteFrame> {
        ButtonKind::iter()
            .map(|kind| self.frame(kind, ambient))
            .collect()
    }

    pub fn frame(&self, kind: ButtonKind, ambient: Transition) -> SatelliteFrame {
        SatelliteFrame {
            kind,
            id: kind.glass_id(),
            offset: kind.offset(self.expanded),
            opacity: self.opacity(),
            transition: Transition::resolve(Some(kind.transition()), ambient),
        }
    }

    /// Opacity switches with the flag and is never eased.
    pub fn opacity(&self) -> f64 {
        if self.expanded { 1.0 } else { 0.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Trigger,
    Satellite(ButtonKind),
}

/// Placement of the menu inside a surface, anchored to the bottom-trailing corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MenuGeometry {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
    pub button_size: f64,
}

impl MenuGeometry {
    pub fn new(width: f64, height: f64, padding: f64, button_size: f64) -> Self {
        Self {
            width,
            height,
            padding,
            button_size,
        }
    }

    /// Smallest surface edge that fits the expanded fan plus the padding.
    /// The extra tenth of the radius leaves room for spring overshoot.
    pub fn required_extent(padding: f64, button_size: f64) -> f64 {
        MENU_RADIUS * 1.1 + button_size + padding * 2.0
    }

    pub fn button_radius(&self) -> f64 {
        self.button_size / 2.0
    }

    pub fn trigger_center(&self) -> Point {
        let inset = self.padding + self.button_radius();
        Point::new(self.width - inset, self.height - inset)
    }

    pub fn satellite_center(&self, offset: Offset) -> Point {
        self.trigger_center().translate(offset)
    }

    /// The trigger wins over anything it covers. Satellites only take taps
    /// while the menu is expanded.
    pub fn hit_test(&self, point: Point, state: &MenuState) -> Option<Hit> {
        let radius = self.button_radius();
        if point.distance(self.trigger_center()) <= radius {
            return Some(Hit::Trigger);
        }
        if !state.is_expanded() {
            return None;
        }
        ButtonKind::iter()
            .find(|kind| point.distance(self.satellite_center(kind.offset(true))) <= radius)
            .map(Hit::Satellite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    #[test]
    fn test_collapsed_offsets_are_zero() {
        for kind in ButtonKind::iter() {
            assert_eq!(kind.offset(false), Offset::ZERO);
        }
    }

    #[test]
    fn test_expanded_offsets_lie_on_radius() {
        for kind in ButtonKind::iter() {
            let offset = kind.offset(true);
            let r2 = offset.dx * offset.dx + offset.dy * offset.dy;
            assert!((r2 - 14400.0).abs() < 1e-6, "{:?} has r² {}", kind, r2);
        }
    }

    #[test]
    fn test_angles_fan_across_quarter_arc() {
        let angles: Vec<f64> = ButtonKind::iter().map(|k| k.angle_deg()).collect();
        assert_eq!(angles.len(), 4);
        for (angle, expected) in angles.iter().zip([-180.0, -150.0, -120.0, -90.0]) {
            assert!(approx(*angle, expected), "{} != {}", angle, expected);
        }
        assert!(angles.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_home_left_email_above() {
        let home = ButtonKind::Home.offset(true);
        assert!(approx(home.dx, -120.0));
        assert!(home.dy.abs() < 1e-9);

        let email = ButtonKind::Email.offset(true);
        assert!(email.dx.abs() < 1e-9);
        assert!(approx(email.dy, -120.0));
    }

    #[test]
    fn test_arc_indices_are_unique_and_ordered() {
        let indices: Vec<usize> = ButtonKind::iter().map(|k| k.arc_index()).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_effective_durations() {
        let cases = [
            (ButtonKind::Home, 0.9),
            (ButtonKind::Write, 1.2),
            (ButtonKind::Chat, 1.5),
            (ButtonKind::Email, 1.8),
        ];
        for (kind, expected) in cases {
            match kind.transition() {
                Transition::Spring { duration, bounce } => {
                    assert!((duration - expected).abs() < 1e-9, "{:?}", kind);
                    assert!(approx(bounce, 0.2));
                }
                other => panic!("{:?} should spring, got {:?}", kind, other),
            }
        }
    }

    #[test]
    fn test_labels_and_ids() {
        let labels: Vec<String> = ButtonKind::iter().map(|k| k.label()).collect();
        assert_eq!(labels, vec!["Home", "Write", "Chat", "Email"]);
        assert_eq!(ButtonKind::Chat.raw(), "chat");
        assert_eq!(ButtonKind::Email.glass_id(), GlassId::new("Email"));
        assert_eq!(GlassId::trigger().as_str(), "menu");
    }

    #[test]
    fn test_icon_tokens() {
        let tokens: Vec<IconToken> = ButtonKind::iter().map(|k| k.icon_token()).collect();
        assert_eq!(
            tokens,
            vec![
                IconToken::new("house"),
                IconToken::new("pencil"),
                IconToken::new("bubble"),
                IconToken::new("at"),
            ]
        );
    }

    #[test]
    fn test_toggle_round_trip() {
        let mut state = MenuState::new();
        assert_eq!(state.phase(), MenuPhase::Collapsed);
        let before = state.frames();

        let expanded = state.toggle(Transition::AMBIENT);
        assert_eq!(state.phase(), MenuPhase::Expanded);
        assert!(expanded.iter().all(|f| f.opacity == 1.0));
        assert!(expanded.iter().all(|f| approx(f.offset.length(), MENU_RADIUS)));

        let collapsed = state.toggle(Transition::AMBIENT);
        assert_eq!(state.phase(), MenuPhase::Collapsed);
        assert_eq!(collapsed, before);
        assert!(collapsed.iter().all(|f| f.opacity == 0.0));
    }

    #[test]
    fn test_frames_keep_their_own_transition() {
        let mut state = MenuState::new();
        let ambient = Transition::spring(0.25, 0.0);
        for frame in state.toggle(ambient) {
            assert_eq!(frame.transition, frame.kind.transition());
            assert_ne!(frame.transition, ambient);
        }
    }

    #[test]
    fn test_general_arc_keeps_sweep() {
        assert_eq!(arc_angle_deg(0, 1), Err(LayoutError::DegenerateArc(1)));
        assert_eq!(arc_angle_deg(0, 0), Err(LayoutError::DegenerateArc(0)));
        assert_eq!(
            arc_angle_deg(4, 4),
            Err(LayoutError::IndexOutOfRange { index: 4, count: 4 })
        );

        for count in 2..=9 {
            let first = arc_angle_deg(0, count).unwrap();
            let last = arc_angle_deg(count - 1, count).unwrap();
            assert!(approx(first, -180.0));
            assert!(approx(last, -90.0));
        }

        for kind in ButtonKind::iter() {
            let general = arc_offset(kind.arc_index(), ButtonKind::COUNT, MENU_RADIUS).unwrap();
            let fixed = kind.offset(true);
            assert!(approx(general.dx, fixed.dx) && approx(general.dy, fixed.dy));
        }
    }

    #[test]
    fn test_kind_offsets_come_from_general_arc() {
        for kind in ButtonKind::iter() {
            assert_eq!(
                kind.offset(true),
                arc_offset(kind.arc_index(), ButtonKind::COUNT, MENU_RADIUS).unwrap()
            );
            assert_eq!(
                kind.angle_deg(),
                arc_angle_deg(kind.arc_index(), ButtonKind::COUNT).unwrap()
            );
        }
    }

    #[test]
    fn test_trigger_anchored_bottom_trailing() {
        let geometry = MenuGeometry::new(300.0, 200.0, 32.0, 50.0);
        assert_eq!(geometry.trigger_center(), Point::new(243.0, 143.0));
    }

    #[test]
    fn test_hit_testing() {
        let geometry = MenuGeometry::new(300.0, 300.0, 32.0, 50.0);
        let mut state = MenuState::new();
        let trigger = geometry.trigger_center();
        let home = geometry.satellite_center(ButtonKind::Home.offset(true));

        assert_eq!(geometry.hit_test(trigger, &state), Some(Hit::Trigger));
        assert_eq!(geometry.hit_test(home, &state), None);

        state.toggle(Transition::AMBIENT);
        assert_eq!(
            geometry.hit_test(home, &state),
            Some(Hit::Satellite(ButtonKind::Home))
        );
        assert_eq!(geometry.hit_test(trigger, &state), Some(Hit::Trigger));
        assert_eq!(geometry.hit_test(Point::new(0.0, 0.0), &state), None);
    }

    #[test]
    fn test_required_extent_fits_fan() {
        let extent = MenuGeometry::required_extent(32.0, 50.0);
        let geometry = MenuGeometry::new(extent, extent, 32.0, 50.0);
        let home = geometry.satellite_center(ButtonKind::Home.offset(true));
        let email = geometry.satellite_center(ButtonKind::Email.offset(true));
        assert!(home.x - geometry.button_radius() >= 0.0);
        assert!(email.y - geometry.button_radius() >= 0.0);
    }
}
