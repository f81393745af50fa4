//! Terminal front end for the gallery core.
//!
//! `search` and `detail` print one listing and exit; `browse` runs an
//! interactive [`session::Session`] that navigates between overviews and
//! object details the way a graphical client would.

pub mod args;
pub mod commands;
pub mod logging;
pub mod render;
pub mod session;

pub use args::{Cli, Command};
pub use commands::Services;
pub use session::Session;
