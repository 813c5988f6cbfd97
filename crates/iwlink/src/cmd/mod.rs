//! Command registration, dispatch and request construction.
//!
//! A binary fills a [`Registry`] with [`CommandDescriptor`]s at startup and
//! hands it to a [`Dispatcher`]. The dispatcher matches the command words,
//! resolves the target name through a [`Resolver`], lets the command's
//! handler fill in a [`Request`] and finally runs it over a [`Channel`].
//! Replies go through the command's reply handler one at a time.
//!
//! ```ignore
//! let mut registry = Registry::new();
//! commands::register_all(&mut registry);
//!
//! let conn = Nl80211Connection::new().await?;
//! let mut stdout = std::io::stdout();
//! let mut printer = Printer::text(&mut stdout);
//! Dispatcher::with_sysfs(&registry)
//!     .dispatch(&conn, &args, &mut printer)
//!     .await?;
//! ```

mod channel;
mod dispatch;
mod registry;
mod reply;
mod request;
mod target;

pub use channel::Channel;
pub use dispatch::{Dispatcher, Invocation};
pub use registry::{CommandDescriptor, Handler, HandlerError, Registry, ReplyHandler};
pub use reply::ReplyDecoder;
pub use request::{REQUEST_ATTR_LIMIT, Request};
pub use target::{DeviceLookup, Resolver, SysfsLookup, Target, TargetKind};
