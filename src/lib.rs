pub mod config;
pub mod store;
pub mod types;
pub mod utils;

pub use crate::config::{Hosts, Settings};
pub use handle_errors::Error;
pub use store::{CleanupReport, ContactStore};
pub use types::contact::{Contact, ContactKey};
pub use types::link::{Link, LinkPair};
