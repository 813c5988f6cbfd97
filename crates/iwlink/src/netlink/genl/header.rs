//! Generic Netlink message header.
//!
//! GENL messages have an additional header after the standard netlink header:
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │ nlmsghdr (16 bytes)                     │
//! │   nlmsg_len, nlmsg_type (family_id),    │
//! │   nlmsg_flags, nlmsg_seq, nlmsg_pid     │
//! ├─────────────────────────────────────────┤
//! │ genlmsghdr (4 bytes)                    │
//! │   cmd (u8), version (u8), reserved (u16)│
//! ├─────────────────────────────────────────┤
//! │ Attributes (TLV format)                 │
//! └─────────────────────────────────────────┘
//! ```

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// Generic Netlink message header.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct GenlMsgHdr {
    /// Command identifier (family-specific)
    pub cmd: u8,
    /// Interface version
    pub version: u8,
    /// Reserved for future use
    pub reserved: u16,
}

/// Size of the GENL header in bytes.
pub const GENL_HDRLEN: usize = std::mem::size_of::<GenlMsgHdr>();

impl GenlMsgHdr {
    /// Create a new GENL header with the given command and version.
    #[inline]
    pub const fn new(cmd: u8, version: u8) -> Self {
        Self {
            cmd,
            version,
            reserved: 0,
        }
    }

    /// Read the header at the start of a GENL payload.
    ///
    /// Returns `None` if the slice is too short.
    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        Self::read_from_prefix(data).ok().map(|(hdr, _)| hdr)
    }

    /// Get the header as a byte slice.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        <Self as IntoBytes>::as_bytes(self)
    }
}

/// Split a GENL payload into its header and attribute data.
pub fn split_payload(payload: &[u8]) -> Option<(GenlMsgHdr, &[u8])> {
    let hdr = GenlMsgHdr::from_bytes(payload)?;
    Some((hdr, &payload[GENL_HDRLEN..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genl_header_size() {
        assert_eq!(GENL_HDRLEN, 4);
    }

    #[test]
    fn test_genl_header_from_bytes() {
        let data = [0x07, 0x00, 0x00, 0x00]; // NEW_INTERFACE, version 0
        let hdr = GenlMsgHdr::from_bytes(&data).unwrap();
        assert_eq!(hdr.cmd, 7);
        assert_eq!(hdr.version, 0);
    }

    #[test]
    fn test_genl_header_from_bytes_too_short() {
        assert!(GenlMsgHdr::from_bytes(&[0x03, 0x01, 0x00]).is_none());
    }

    #[test]
    fn test_split_payload() {
        let data = [0x05, 0x01, 0x00, 0x00, 0xaa, 0xbb];
        let (hdr, attrs) = split_payload(&data).unwrap();
        assert_eq!(hdr.cmd, 5);
        assert_eq!(attrs, &[0xaa, 0xbb]);
    }
}
