mod state;

pub use state::{
    App, CONFIG_FIELDS, ConfigField, SongEntry, TabConfig, View, tab_configs, tab_index_for_view,
};
