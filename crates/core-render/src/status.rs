//! Bottom bar composition.

use core_state::Mode;

/// `--normal--` / `--insert--`.
pub fn bottom_bar(mode: Mode) -> String {
    format!("--{}--", mode.as_str())
}
