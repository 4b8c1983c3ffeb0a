pub mod batch;
pub mod cache;
pub mod digest;
pub mod error;
pub mod host;
pub mod introspect;
pub mod loader;
pub mod memory;
pub mod migration;
pub mod publish;
pub mod settings;

pub use error::{LoadDataError, Result};
pub use loader::{LoadData, RunMode};
pub use settings::{DirectoryChoice, LoadDataSettings, Setting, SETTINGS_VERSION};
