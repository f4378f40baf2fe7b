pub mod error;
pub mod logging;
pub mod papers;
pub mod session;
pub mod settings;
pub mod summarizer;
pub mod utils;

pub use error::{Error, Result};
