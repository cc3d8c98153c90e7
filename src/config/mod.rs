//! Configuration for quarry.
//!
//! Settings select the entity catalog and the defaults applied to models and
//! to the CLI's log output.

mod settings;

pub use settings::{
    expand_env_vars, CatalogSettings, LoggingSettings, QuerySettings, Settings, SettingsError,
};
