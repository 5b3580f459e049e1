//! Configuration loading and parsing.
//!
//! Reads `vimterm.toml` (or an override path supplied by the binary):
//!
//! ```toml
//! [keymap]
//! inherit_defaults = true
//! [keymap.bindings]
//! w = "right"
//!
//! [render]
//! frame_interval_ms = 16
//! ```
//!
//! Missing files and parse errors fall back to defaults. Unknown fields are
//! ignored so the file can grow without breaking older binaries. Binding
//! entries that name an unknown motion, or use an empty key, are skipped with
//! a warning on the `config` target.

use anyhow::Result;
use core_keymap::{BindingTable, Motion, baseline_normal_bindings};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::{info, warn};

pub const CONFIG_FILE_NAME: &str = "vimterm.toml";

#[derive(Debug, Deserialize, Clone)]
pub struct KeymapConfig {
    /// Start from the baseline Normal mode table before applying overrides.
    #[serde(default = "KeymapConfig::default_inherit")]
    pub inherit_defaults: bool,
    /// Key string -> motion name (`left`, `insert_at_line_end`, ...).
    #[serde(default)]
    pub bindings: BTreeMap<String, String>,
}

impl Default for KeymapConfig {
    fn default() -> Self {
        Self {
            inherit_defaults: Self::default_inherit(),
            bindings: BTreeMap::new(),
        }
    }
}

impl KeymapConfig {
    const fn default_inherit() -> bool {
        true
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct RenderConfig {
    #[serde(default = "RenderConfig::default_frame_interval_ms")]
    pub frame_interval_ms: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: Self::default_frame_interval_ms(),
        }
    }
}

impl RenderConfig {
    const fn default_frame_interval_ms() -> u64 {
        16
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ConfigFile {
    #[serde(default)]
    pub keymap: KeymapConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>, // original file string (optional)
    pub file: ConfigFile,    // parsed (or default) data
}

/// Config path: `vimterm.toml` in the working directory if present, else the
/// platform config dir (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("vimterm").join(CONFIG_FILE_NAME);
    }
    local
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        info!(target: "config", path = %path.display(), "config_missing_using_defaults");
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            info!(
                target: "config",
                path = %path.display(),
                overrides = file.keymap.bindings.len(),
                "config_loaded"
            );
            Ok(Config {
                raw: Some(content),
                file,
            })
        }
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_error_using_defaults");
            Ok(Config::default())
        }
    }
}

impl Config {
    /// Compile the effective binding table: baseline (unless disabled) with
    /// the file's overrides applied on top.
    pub fn binding_table(&self) -> BindingTable {
        let keymap = &self.file.keymap;
        let mut table = if keymap.inherit_defaults {
            baseline_normal_bindings()
        } else {
            BindingTable::default()
        };
        for (key, name) in &keymap.bindings {
            if key.is_empty() {
                warn!(target: "config", motion = name.as_str(), "binding_empty_key_skipped");
                continue;
            }
            match name.parse::<Motion>() {
                Ok(motion) => table.bind(key.as_str(), motion),
                Err(e) => {
                    warn!(target: "config", key = key.as_str(), error = %e, "binding_unknown_motion_skipped");
                }
            }
        }
        table
    }

    /// Frame tick interval, never shorter than 1ms.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.file.render.frame_interval_ms.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex, MutexGuard};
    use tracing::Level;
    use tracing::subscriber::with_default;
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone)]
    struct BufferWriter {
        inner: Arc<Mutex<Vec<u8>>>,
    }

    impl BufferWriter {
        fn new() -> (Self, Arc<Mutex<Vec<u8>>>) {
            let buf = Arc::new(Mutex::new(Vec::new()));
            (Self { inner: buf.clone() }, buf)
        }
    }

    struct LockedWriter<'a> {
        guard: MutexGuard<'a, Vec<u8>>,
    }

    impl<'a> Write for LockedWriter<'a> {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.guard.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for BufferWriter {
        type Writer = LockedWriter<'a>;

        fn make_writer(&'a self) -> Self::Writer {
            LockedWriter {
                guard: self.inner.lock().expect("log buffer poisoned"),
            }
        }
    }

    fn load_str(content: &str) -> Config {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), content).unwrap();
        load_from(Some(tmp.path().to_path_buf())).unwrap()
    }

    #[test]
    fn default_config_when_missing_file() {
        let cfg = load_from(Some(PathBuf::from("__nonexistent_hopefully__.toml"))).unwrap();
        assert!(cfg.raw.is_none());
        assert!(cfg.file.keymap.inherit_defaults);
        assert_eq!(cfg.binding_table(), baseline_normal_bindings());
        assert_eq!(cfg.frame_interval(), Duration::from_millis(16));
    }

    #[test]
    fn overrides_merge_into_baseline() {
        let cfg = load_str("[keymap.bindings]\nw = \"right\"\nh = \"down\"\n");
        let table = cfg.binding_table();
        let d = core_keymap::MotionDispatcher::build(&table);
        assert_eq!(d.resolve("w"), Some(Motion::Right));
        assert_eq!(d.resolve("h"), Some(Motion::Down));
        assert_eq!(d.resolve("l"), Some(Motion::Right));
        assert_eq!(table.len(), baseline_normal_bindings().len() + 1);
    }

    #[test]
    fn inherit_defaults_false_starts_empty() {
        let cfg = load_str("[keymap]\ninherit_defaults = false\n[keymap.bindings]\nx = \"left\"\n");
        let table = cfg.binding_table();
        assert_eq!(table.len(), 1);
        let d = core_keymap::MotionDispatcher::build(&table);
        assert_eq!(d.resolve("h"), None);
        assert_eq!(d.resolve("x"), Some(Motion::Left));
    }

    #[test]
    fn parse_error_falls_back_to_defaults() {
        let cfg = load_str("[keymap\nthis is not toml");
        assert!(cfg.raw.is_none());
        assert_eq!(cfg.binding_table(), baseline_normal_bindings());
    }

    #[test]
    fn frame_interval_parsed_and_floored() {
        let cfg = load_str("[render]\nframe_interval_ms = 33\n");
        assert_eq!(cfg.frame_interval(), Duration::from_millis(33));
        let cfg = load_str("[render]\nframe_interval_ms = 0\n");
        assert_eq!(cfg.frame_interval(), Duration::from_millis(1));
    }

    #[test]
    fn unknown_motion_is_skipped_with_warning() {
        let cfg = load_str("[keymap.bindings]\nq = \"teleport\"\n");
        let (writer, buffer) = BufferWriter::new();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::WARN)
            .with_target(true)
            .with_ansi(false)
            .without_time()
            .with_writer(writer)
            .finish();

        let table = with_default(subscriber, || cfg.binding_table());

        let log_output = String::from_utf8(buffer.lock().unwrap().clone()).unwrap();
        assert!(log_output.contains("WARN config:"));
        assert!(log_output.contains("binding_unknown_motion_skipped"));
        assert_eq!(table, baseline_normal_bindings());
    }
}
