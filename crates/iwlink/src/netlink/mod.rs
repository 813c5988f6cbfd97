//! Async netlink protocol implementation, trimmed to what nl80211 needs.
//!
//! # Quick Start
//!
//! ```ignore
//! use iwlink::netlink::genl::GenlConnection;
//! use iwlink::netlink::AttrBuilder;
//!
//! let conn = GenlConnection::new()?;
//! let family = conn.get_family("nl80211").await?;
//!
//! let mut attrs = AttrBuilder::new();
//! attrs.append_u32(3, ifindex)?;
//! conn.execute(family.id, 5, 0, 0, attrs.as_bytes(), &mut |reply| {
//!     let table = AttrTable::parse(reply)?;
//!     println!("{:?}", table.str(4)?);
//!     Ok(())
//! })
//! .await?;
//! ```

pub mod attr;
mod builder;
mod error;
pub mod genl;
pub mod message;
mod socket;

pub use attr::{Attr, AttrIter, AttrTable, NlAttr, decode_attrs};
pub use builder::{AttrBuilder, DEFAULT_ATTR_LIMIT, MessageBuilder};
pub use error::{EXIT_ABORT, EXIT_USAGE, Error, Result};
pub use message::{MessageIter, NLMSG_HDRLEN, NlMsgHdr, NlMsgType};
pub use socket::{NetlinkSocket, Protocol};
