use anyhow::{bail, Context, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::ops::RangeInclusive;
use std::time::Duration;

/// Accepted values for `[grid] columns`
pub const COLUMNS_RANGE: RangeInclusive<u16> = 1..=16;
/// Accepted values for `[grid] card_height`
pub const CARD_HEIGHT_RANGE: RangeInclusive<u16> = 3..=50;

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Keymap {
    pub quit: String,
    pub help: String,
    pub add_note: String,
    pub edit_note: String,
    pub pick_up: String,
    pub hover_bin: String,
    pub leave_bin: String,
    pub drop: String,
    pub cancel: String,
    pub switch_field: String,
    pub submit: String,
}

impl Default for Keymap {
    fn default() -> Self {
        Self {
            quit: "q".to_string(),
            help: "?".to_string(),
            add_note: "a".to_string(),
            edit_note: "enter".to_string(),
            pick_up: "space".to_string(),
            hover_bin: "b".to_string(),
            leave_bin: "left".to_string(),
            drop: "enter".to_string(),
            cancel: "esc".to_string(),
            switch_field: "tab".to_string(),
            submit: "ctrl-s".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct GridConfig {
    pub columns: u16,
    pub card_height: u16,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            columns: 2,
            card_height: 6,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ToastConfig {
    pub duration_ms: u64,
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self { duration_ms: 2000 }
    }
}

impl ToastConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub grid: GridConfig,
    pub toast: ToastConfig,
    pub keymap: Keymap,
}

/// Read the config at `path`, writing the defaults there first if it is missing
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        let config = Config::default();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let toml = toml::to_string(&config)?;
        fs::write(path, toml)
            .with_context(|| format!("Failed to write default config to {}", path.display()))?;
        return Ok(config);
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    if !COLUMNS_RANGE.contains(&config.grid.columns) {
        bail!(
            "grid.columns must be between {} and {}, got {}",
            COLUMNS_RANGE.start(),
            COLUMNS_RANGE.end(),
            config.grid.columns
        );
    }
    if !CARD_HEIGHT_RANGE.contains(&config.grid.card_height) {
        bail!(
            "grid.card_height must be between {} and {}, got {}",
            CARD_HEIGHT_RANGE.start(),
            CARD_HEIGHT_RANGE.end(),
            config.grid.card_height
        );
    }
    config.bindings()?;
    Ok(config)
}

/// A single key plus modifiers, e.g. `ctrl-s` or `space`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub fn parse(spec: &str) -> Result<Self> {
        let spec = spec.trim();
        if spec.is_empty() {
            bail!("empty key binding");
        }

        let mut modifiers = KeyModifiers::NONE;
        let mut key = spec;
        // "-" on its own (or as the last char after a modifier) is a key, not a separator
        while let Some((head, rest)) = key.split_once('-') {
            if rest.is_empty() {
                break;
            }
            match head.to_ascii_lowercase().as_str() {
                "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                other => bail!("unknown modifier `{}` in `{}`", other, spec),
            }
            key = rest;
        }

        let code = match key.to_ascii_lowercase().as_str() {
            "enter" => KeyCode::Enter,
            "esc" => KeyCode::Esc,
            "tab" => KeyCode::Tab,
            "backtab" => KeyCode::BackTab,
            "space" => KeyCode::Char(' '),
            "backspace" => KeyCode::Backspace,
            "delete" => KeyCode::Delete,
            "insert" => KeyCode::Insert,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" => KeyCode::PageUp,
            "pagedown" => KeyCode::PageDown,
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeyCode::Char(c),
                    _ => bail!("unknown key `{}` in `{}`", key, spec),
                }
            }
        };

        Ok(Self { code, modifiers })
    }

    /// Whether a key event triggers this binding. Shift is ignored for
    /// printable characters since terminals report it inconsistently.
    pub fn matches(&self, key: &KeyEvent) -> bool {
        let relevant = if matches!(key.code, KeyCode::Char(_)) {
            key.modifiers - KeyModifiers::SHIFT
        } else {
            key.modifiers
        };
        let wanted = if matches!(self.code, KeyCode::Char(_)) {
            self.modifiers - KeyModifiers::SHIFT
        } else {
            self.modifiers
        };

        let code_matches = match (self.code, key.code) {
            (KeyCode::Char(a), KeyCode::Char(b)) => a.eq_ignore_ascii_case(&b),
            (a, b) => a == b,
        };
        code_matches && relevant == wanted
    }
}

/// The keymap resolved into matchable bindings
#[derive(Debug, Clone)]
pub struct Bindings {
    pub quit: KeyBinding,
    pub help: KeyBinding,
    pub add_note: KeyBinding,
    pub edit_note: KeyBinding,
    pub pick_up: KeyBinding,
    pub hover_bin: KeyBinding,
    pub leave_bin: KeyBinding,
    pub drop: KeyBinding,
    pub cancel: KeyBinding,
    pub switch_field: KeyBinding,
    pub submit: KeyBinding,
}

impl Config {
    pub fn bindings(&self) -> Result<Bindings> {
        let k = &self.keymap;
        let parse = |name: &str, spec: &str| {
            KeyBinding::parse(spec).with_context(|| format!("invalid keymap.{}", name))
        };
        Ok(Bindings {
            quit: parse("quit", &k.quit)?,
            help: parse("help", &k.help)?,
            add_note: parse("add_note", &k.add_note)?,
            edit_note: parse("edit_note", &k.edit_note)?,
            pick_up: parse("pick_up", &k.pick_up)?,
            hover_bin: parse("hover_bin", &k.hover_bin)?,
            leave_bin: parse("leave_bin", &k.leave_bin)?,
            drop: parse("drop", &k.drop)?,
            cancel: parse("cancel", &k.cancel)?,
            switch_field: parse("switch_field", &k.switch_field)?,
            submit: parse("submit", &k.submit)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_missing_config_writes_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let config = load_config(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.grid.columns, 2);
        assert_eq!(config.toast.duration(), Duration::from_millis(2000));

        // Written file reads back the same
        let again = load_config(&path).unwrap();
        assert_eq!(again.keymap.quit, "q");
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[grid]\ncolumns = 3\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.grid.columns, 3);
        assert_eq!(config.grid.card_height, 6);
        assert_eq!(config.keymap.add_note, "a");
    }

    #[test]
    fn test_malformed_config_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[grid\ncolumns = ").unwrap();
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn test_grid_out_of_range_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        for grid in [
            "columns = 0",
            "columns = 17",
            "columns = 65535",
            "card_height = 2",
            "card_height = 51",
            "card_height = 65535",
        ] {
            fs::write(&path, format!("[grid]\n{}\n", grid)).unwrap();
            assert!(load_config(&path).is_err(), "accepted {}", grid);
        }

        fs::write(&path, "[grid]\ncolumns = 16\ncard_height = 50\n").unwrap();
        let config = load_config(&path).unwrap();
        assert_eq!(config.grid.columns, 16);
        assert_eq!(config.grid.card_height, 50);
    }

    #[test]
    fn test_bad_keymap_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[keymap]\nquit = \"hyper-q\"\n").unwrap();
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn test_parse_bindings() {
        let b = KeyBinding::parse("ctrl-s").unwrap();
        assert_eq!(b.code, KeyCode::Char('s'));
        assert_eq!(b.modifiers, KeyModifiers::CONTROL);

        assert_eq!(KeyBinding::parse("space").unwrap().code, KeyCode::Char(' '));
        assert_eq!(KeyBinding::parse("Enter").unwrap().code, KeyCode::Enter);
        assert_eq!(KeyBinding::parse("-").unwrap().code, KeyCode::Char('-'));
        assert!(KeyBinding::parse("ctrl-").is_err());
        assert!(KeyBinding::parse("f13x").is_err());
    }

    #[test]
    fn test_binding_matches() {
        let quit = KeyBinding::parse("q").unwrap();
        assert!(quit.matches(&key(KeyCode::Char('q'), KeyModifiers::NONE)));
        assert!(quit.matches(&key(KeyCode::Char('Q'), KeyModifiers::SHIFT)));
        assert!(!quit.matches(&key(KeyCode::Char('q'), KeyModifiers::CONTROL)));

        let save = KeyBinding::parse("ctrl-s").unwrap();
        assert!(save.matches(&key(KeyCode::Char('s'), KeyModifiers::CONTROL)));
        assert!(!save.matches(&key(KeyCode::Char('s'), KeyModifiers::NONE)));

        let help = KeyBinding::parse("?").unwrap();
        assert!(help.matches(&key(KeyCode::Char('?'), KeyModifiers::SHIFT)));
    }
}
