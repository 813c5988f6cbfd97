//! nl80211: the Generic Netlink family for 802.11 configuration.
//!
//! Only the commands and attributes the interface commands use are
//! listed. Numbering follows `include/uapi/linux/nl80211.h`.
//!
//! # Example
//!
//! ```rust,no_run
//! use iwlink::cmd::{Channel, Request};
//! use iwlink::nl80211::{Nl80211Attr, Nl80211Cmd, Nl80211Connection};
//!
//! # async fn example() -> iwlink::Result<()> {
//! let conn = Nl80211Connection::new().await?;
//! let mut request = Request::new(Nl80211Cmd::SetInterface, 0, None)?;
//! request.attrs().append(Nl80211Attr::MeshId as u16, b"mesh0")?;
//! conn.execute(&request, &mut |_| Ok(())).await?;
//! # Ok(())
//! # }
//! ```

mod connection;
mod types;

pub use connection::Nl80211Connection;
pub use types::{InterfaceInfo, InterfaceType, MonitorFlag, iftype_name};

/// nl80211 Generic Netlink family name.
pub const NL80211_GENL_NAME: &str = "nl80211";

/// Version carried in the GENL header of nl80211 requests.
pub const NL80211_GENL_VERSION: u8 = 0;

/// nl80211 commands.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nl80211Cmd {
    Unspec = 0,
    GetWiphy = 1,
    SetWiphy = 2,
    NewWiphy = 3,
    DelWiphy = 4,
    GetInterface = 5,
    SetInterface = 6,
    NewInterface = 7,
    DelInterface = 8,
}

/// nl80211 attributes.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nl80211Attr {
    Unspec = 0,
    Wiphy = 1,
    WiphyName = 2,
    Ifindex = 3,
    Ifname = 4,
    Iftype = 5,
    Mac = 6,
    MntrFlags = 23,
    MeshId = 24,
}
