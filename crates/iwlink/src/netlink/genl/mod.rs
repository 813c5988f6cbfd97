//! Generic Netlink (GENL) support.
//!
//! Generic Netlink extends the standard netlink protocol with:
//! - Dynamic family ID allocation (resolved via the control family)
//! - Family-specific commands and attributes
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │ Nl80211Connection                       │
//! │ (nl80211 family, request execution)     │
//! └────────────────┬────────────────────────┘
//!                  │
//! ┌────────────────▼────────────────────────┐
//! │ GenlConnection                          │
//! │ (Generic GENL operations, family cache) │
//! └────────────────┬────────────────────────┘
//!                  │
//! ┌────────────────▼────────────────────────┐
//! │ NetlinkSocket (Protocol::Generic)       │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use iwlink::netlink::genl::GenlConnection;
//!
//! # async fn example() -> iwlink::Result<()> {
//! let conn = GenlConnection::new()?;
//! let family = conn.get_family("nl80211").await?;
//! println!("nl80211 family ID: {}", family.id);
//! # Ok(())
//! # }
//! ```

mod connection;
mod header;

pub use connection::{FamilyInfo, GenlConnection};
pub use header::{GENL_HDRLEN, GenlMsgHdr, split_payload};

// Control family constants (fixed, not dynamically assigned)
pub const GENL_ID_CTRL: u16 = 0x10;

/// Control family commands
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CtrlCmd {
    Unspec = 0,
    NewFamily = 1,
    DelFamily = 2,
    GetFamily = 3,
}

/// Control family attributes
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CtrlAttr {
    Unspec = 0,
    FamilyId = 1,
    FamilyName = 2,
    Version = 3,
    HdrSize = 4,
    MaxAttr = 5,
}
