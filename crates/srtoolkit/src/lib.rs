pub mod error;
pub mod config;
pub mod utils;

pub mod bus;
pub mod host;
pub mod storage;
pub mod settings;

pub mod command;
pub mod input;
pub mod mic;
pub mod worker;
pub mod routes;

pub use crate::bus::{InputMode, MessageBus, Request, TabMessage, Topic};
pub use crate::config::{load_or_create_config, ToolkitConfig};
pub use crate::error::{CoreError, CoreResult};
pub use crate::routes::{BackgroundRouter, Collaborators};
pub use crate::worker::Workers;
