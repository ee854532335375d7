pub mod definition;
pub mod error;
pub mod generate;
pub mod io;
pub mod names;
pub mod sanitize;
pub mod session;
pub mod template;
pub mod yaml;

pub use error::{Result, ScriptGenError};
