//! Async nl80211 command framework for Linux wireless configuration.
//!
//! This crate provides the pieces an `iw`-style tool is built from: a
//! netlink attribute codec, a Generic Netlink transport with nl80211
//! family resolution, and a registry/dispatcher that turns command lines
//! into nl80211 requests.
//!
//! # Modules
//!
//! - `netlink` - attribute codec, message framing, async GENL socket
//! - `nl80211` - nl80211 commands, attributes and the connection
//! - `cmd` - command registry, target resolution and dispatch
//! - `output` - JSON/text output formatting
//! - `util` - interface and wireless device name lookups
//!
//! # Example
//!
//! ```ignore
//! use iwlink::cmd::{Dispatcher, Registry};
//! use iwlink::nl80211::Nl80211Connection;
//! use iwlink::output::Printer;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> iwlink::Result<()> {
//!     let mut registry = Registry::new();
//!     // registry.register(...) for every command
//!
//!     let args: Vec<String> = std::env::args().skip(1).collect();
//!     let conn = Nl80211Connection::new().await?;
//!     let mut stdout = std::io::stdout();
//!     let mut printer = Printer::text(&mut stdout);
//!
//!     Dispatcher::with_sysfs(&registry)
//!         .dispatch(&conn, &args, &mut printer)
//!         .await
//! }
//! ```

pub mod cmd;
pub mod netlink;
pub mod nl80211;
pub mod output;
pub mod util;

// Re-export common types at crate root for convenience
pub use netlink::{Error, Result};
