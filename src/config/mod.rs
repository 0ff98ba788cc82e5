//! Settings file loading and config path resolution.

mod parsing;
mod paths;
mod settings;

pub use parsing::{parse_bool, parse_key_value, skip_comment_or_empty, strip_inline_comment};
pub use paths::{config_dir, logs_dir, resolve_settings_config_path};
pub use settings::{Settings, load_settings, parse_settings};
