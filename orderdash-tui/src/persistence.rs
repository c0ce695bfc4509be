//! UI state persistence — JSON save/load across restarts.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use orderdash_core::{PriceAxis, Side};

use crate::app::{AppState, Overlay, Panel};

/// Serializable subset of app state that persists across restarts.
#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedState {
    pub active_panel: Panel,
    pub welcome_dismissed: bool,
    pub price_axis: PriceAxis,
    pub orders_focus: Side,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            active_panel: Panel::Overview,
            welcome_dismissed: false,
            price_axis: PriceAxis::default(),
            orders_focus: Side::Buy,
        }
    }
}

/// `<config dir>/orderdash/state.json`, or `./orderdash/state.json` when the
/// platform has no config dir.
pub fn default_state_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("orderdash")
        .join("state.json")
}

/// Load persisted state from disk. Returns defaults if file is missing or corrupt.
pub fn load(path: &Path) -> PersistedState {
    match std::fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
        Err(_) => PersistedState::default(),
    }
}

/// Save persisted state to disk. Creates parent directories if needed.
pub fn save(path: &Path, state: &PersistedState) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(state)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Extract persisted state from AppState.
pub fn extract(app: &AppState) -> PersistedState {
    PersistedState {
        active_panel: app.active_panel,
        welcome_dismissed: app.overlay != Overlay::Welcome,
        price_axis: app.price_axis,
        orders_focus: app.orders.focus,
    }
}

/// Apply persisted state to AppState.
pub fn apply(app: &mut AppState, state: PersistedState) {
    app.active_panel = state.active_panel;
    if !state.welcome_dismissed {
        app.overlay = Overlay::Welcome;
    }
    app.price_axis = state.price_axis;
    app.orders.focus = state.orders_focus;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::test_app;

    #[test]
    fn roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");

        let state = PersistedState {
            active_panel: Panel::Status,
            welcome_dismissed: true,
            price_axis: PriceAxis::Sequence,
            orders_focus: Side::Sell,
        };

        save(&path, &state).unwrap();
        let loaded = load(&path);

        assert_eq!(loaded.active_panel, Panel::Status);
        assert!(loaded.welcome_dismissed);
        assert_eq!(loaded.price_axis, PriceAxis::Sequence);
        assert_eq!(loaded.orders_focus, Side::Sell);
    }

    #[test]
    fn missing_file_returns_defaults() {
        let loaded = load(Path::new("/nonexistent/path/state.json"));
        assert_eq!(loaded.active_panel, Panel::Overview);
        assert!(!loaded.welcome_dismissed);
    }

    #[test]
    fn corrupt_file_returns_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "not valid json {{{").unwrap();

        let loaded = load(&path);
        assert_eq!(loaded.active_panel, Panel::Overview);
    }

    #[test]
    fn older_file_fills_new_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, r#"{"active_panel":"Trades","welcome_dismissed":true}"#).unwrap();

        let loaded = load(&path);
        assert_eq!(loaded.active_panel, Panel::Trades);
        assert_eq!(loaded.price_axis, PriceAxis::Timestamp);
    }

    #[test]
    fn apply_then_extract() {
        let (mut app, _rx) = test_app();
        apply(&mut app, PersistedState::default());
        assert_eq!(app.overlay, Overlay::Welcome);

        app.overlay = Overlay::None;
        app.active_panel = Panel::Depth;
        let extracted = extract(&app);
        assert!(extracted.welcome_dismissed);
        assert_eq!(extracted.active_panel, Panel::Depth);
    }
}
