#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    Toggle,
    ConfigReload,
}
