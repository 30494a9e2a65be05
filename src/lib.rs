// library crate for lfilter
// exposes the filter engine and the modules needed by auxiliary binaries (e.g., generate-man)

pub mod cli;
pub mod config;
pub mod entity;
pub mod filter;

pub use entity::Entity;
pub use filter::{FilterError, LabelFilter, Labels};
