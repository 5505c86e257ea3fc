use crate::gui::menu::IconToken;
use freedesktop_icons::lookup;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::OnceLock;

const ICON_LOOKUP_SIZE: u16 = 128;

/// Freedesktop icon names to try for a token, best match first.
pub fn candidates(token: &IconToken) -> &'static [&'static str] {
    match token.as_str() {
        "house" => &["user-home", "go-home"],
        "pencil" => &["document-edit", "accessories-text-editor"],
        "bubble" => &["internet-chat", "mail-message-new"],
        "at" => &["mail-send", "mail-unread"],
        _ => &[],
    }
}

static CACHE: OnceLock<RwLock<HashMap<IconToken, Option<PathBuf>>>> = OnceLock::new();

/// Resolves a token to an icon file from the active theme, caching misses too.
pub fn find_icon_path(token: &IconToken) -> Option<PathBuf> {
    let cache = CACHE.get_or_init(|| RwLock::new(HashMap::new()));
    if let Some(hit) = cache.read().get(token) {
        return hit.clone();
    }

    let path = candidates(token).iter().find_map(|name| {
        lookup(name)
            .with_size(ICON_LOOKUP_SIZE)
            .with_scale(1)
            .find()
    });
    if path.is_none() {
        log::debug!("No icon found for token '{}'", token);
    }

    cache.write().insert(token.clone(), path.clone());
    path
}

pub fn clear_cache() {
    if let Some(cache) = CACHE.get() {
        cache.write().clear();
    }
}
