//! Builders for netlink messages and attribute lists.
//!
//! [`AttrBuilder`] is where request bodies are assembled. It owns a bounded
//! buffer: once an append would push it past its limit the append fails with
//! [`Error::EncodingOverflow`] and the buffer is left as it was. Nested
//! containers are built in a child builder and embedded whole.
//!
//! [`MessageBuilder`] frames a finished body with the netlink header.

use super::attr::{NLA_F_NESTED, NLA_HDRLEN, NlAttr, nla_align};
use super::error::{Error, Result};
use super::message::{NLMSG_HDRLEN, NlMsgHdr, nlmsg_align};

/// Default attribute buffer size, one page as the kernel allocates it.
pub const DEFAULT_ATTR_LIMIT: usize = 4096;

/// Growable, size-bounded buffer of netlink attributes.
#[derive(Debug, Clone)]
pub struct AttrBuilder {
    buf: Vec<u8>,
    limit: usize,
}

impl Default for AttrBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AttrBuilder {
    /// Create an empty builder with the default limit.
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_ATTR_LIMIT)
    }

    /// Create an empty builder that refuses to grow past `limit` bytes.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            buf: Vec::new(),
            limit,
        }
    }

    /// Start a child builder for a nested container, sharing this limit.
    pub fn nest(&self) -> Self {
        Self::with_limit(self.limit)
    }

    /// Maximum size of the buffer.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Current encoded length, padding included.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Check if no attribute has been appended.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Get the encoded attributes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Append an attribute with the given type and raw payload.
    pub fn append(&mut self, attr_type: u16, data: &[u8]) -> Result<()> {
        let attr_len = NLA_HDRLEN + data.len();
        let needed = self.buf.len() + nla_align(attr_len);
        if needed > self.limit || attr_len > u16::MAX as usize {
            return Err(Error::EncodingOverflow {
                needed,
                limit: self.limit,
            });
        }
        self.buf
            .try_reserve(needed - self.buf.len())
            .map_err(|_| Error::EncodingOverflow {
                needed,
                limit: self.limit,
            })?;

        let attr = NlAttr::new(attr_type, data.len());
        self.buf.extend_from_slice(attr.as_bytes());
        self.buf.extend_from_slice(data);
        // Pad to alignment
        self.buf.resize(needed, 0);
        Ok(())
    }

    /// Append a u32 attribute (native endian).
    pub fn append_u32(&mut self, attr_type: u16, value: u32) -> Result<()> {
        self.append(attr_type, &value.to_ne_bytes())
    }

    /// Append a null-terminated string attribute.
    pub fn append_str(&mut self, attr_type: u16, value: &str) -> Result<()> {
        let mut data = Vec::with_capacity(value.len() + 1);
        data.extend_from_slice(value.as_bytes());
        data.push(0);
        self.append(attr_type, &data)
    }

    /// Append an empty (flag) attribute with no payload.
    pub fn append_flag(&mut self, attr_type: u16) -> Result<()> {
        self.append(attr_type, &[])
    }

    /// Embed a finished child builder as a nested attribute.
    pub fn append_nested(&mut self, attr_type: u16, inner: &AttrBuilder) -> Result<()> {
        self.append(attr_type | NLA_F_NESTED, inner.as_bytes())
    }
}

/// Builder for constructing netlink messages.
#[derive(Debug, Clone)]
pub struct MessageBuilder {
    buf: Vec<u8>,
}

impl MessageBuilder {
    /// Create a new message builder with the given type and flags.
    pub fn new(msg_type: u16, flags: u16) -> Self {
        let header = NlMsgHdr::new(msg_type, flags);
        let mut buf = vec![0u8; NLMSG_HDRLEN];
        buf[..std::mem::size_of::<NlMsgHdr>()].copy_from_slice(header.as_bytes());
        Self { buf }
    }

    /// Get the current message length.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Check if the message is empty (header only).
    pub fn is_empty(&self) -> bool {
        self.buf.len() == NLMSG_HDRLEN
    }

    /// Append raw bytes to the message (with alignment padding).
    pub fn append_bytes(&mut self, data: &[u8]) {
        self.buf.extend_from_slice(data);
        let aligned = nlmsg_align(self.buf.len());
        self.buf.resize(aligned, 0);
    }

    /// Set the sequence number.
    pub fn set_seq(&mut self, seq: u32) {
        self.buf[8..12].copy_from_slice(&seq.to_ne_bytes());
    }

    /// Set the port ID.
    pub fn set_pid(&mut self, pid: u32) {
        self.buf[12..16].copy_from_slice(&pid.to_ne_bytes());
    }

    /// Finalize and return the message bytes.
    pub fn finish(mut self) -> Vec<u8> {
        let len = self.buf.len() as u32;
        self.buf[0..4].copy_from_slice(&len.to_ne_bytes());
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::netlink::attr::{AttrTable, decode_attrs};
    use crate::netlink::message::NLM_F_REQUEST;

    #[test]
    fn test_simple_message() {
        let msg = MessageBuilder::new(0x1c, NLM_F_REQUEST).finish();
        assert_eq!(msg.len(), NLMSG_HDRLEN);

        let header = NlMsgHdr::from_bytes(&msg).unwrap();
        assert_eq!(header.nlmsg_len as usize, NLMSG_HDRLEN);
        assert_eq!(header.nlmsg_type, 0x1c);
        assert_eq!(header.nlmsg_flags, NLM_F_REQUEST);
    }

    #[test]
    fn test_attribute_padding() {
        let mut attrs = AttrBuilder::new();
        attrs.append(24, b"bar").unwrap();
        assert_eq!(attrs.len(), 8);
        assert_eq!(&attrs.as_bytes()[..4], &[7, 0, 24, 0]);
        assert_eq!(attrs.as_bytes()[7], 0);
    }

    #[test]
    fn test_round_trip_scalars() {
        let mut attrs = AttrBuilder::new();
        attrs.append_str(4, "mon0").unwrap();
        attrs.append_u32(5, 6).unwrap();
        attrs.append_flag(9).unwrap();
        attrs.append(24, b"mesh\x00\xff").unwrap();

        let table = AttrTable::parse(attrs.as_bytes()).unwrap();
        assert_eq!(table.str(4).unwrap(), Some("mon0"));
        assert_eq!(table.bytes(4), Some(&b"mon0\0"[..]));
        assert_eq!(table.u32(5).unwrap(), Some(6));
        assert!(table.flag(9));
        assert_eq!(table.bytes(9), Some(&[][..]));
        assert_eq!(table.bytes(24), Some(&b"mesh\x00\xff"[..]));
    }

    #[test]
    fn test_round_trip_nested() {
        let mut attrs = AttrBuilder::new();
        let mut inner = attrs.nest();
        inner.append_flag(1).unwrap();
        inner.append_u32(2, 100).unwrap();
        let mut deeper = inner.nest();
        deeper.append_str(1, "x").unwrap();
        inner.append_nested(3, &deeper).unwrap();
        attrs.append_nested(23, &inner).unwrap();

        let table = AttrTable::parse(attrs.as_bytes()).unwrap();
        assert!(table.get(23).unwrap().nested);
        let nested = table.nested(23).unwrap().unwrap();
        assert!(nested.flag(1));
        assert_eq!(nested.u32(2).unwrap(), Some(100));
        let deepest = nested.nested(3).unwrap().unwrap();
        assert_eq!(deepest.str(1).unwrap(), Some("x"));
    }

    #[test]
    fn test_overflow_leaves_buffer_intact() {
        let mut attrs = AttrBuilder::with_limit(12);
        attrs.append_u32(3, 1).unwrap();
        let before = attrs.as_bytes().to_vec();

        let err = attrs.append_u32(5, 2).unwrap_err();
        assert!(matches!(
            err,
            Error::EncodingOverflow {
                needed: 16,
                limit: 12
            }
        ));
        assert_eq!(attrs.as_bytes(), &before[..]);
    }

    #[test]
    fn test_nested_overflow_propagates() {
        let attrs = AttrBuilder::with_limit(8);
        let mut inner = attrs.nest();
        inner.append_flag(1).unwrap();
        inner.append_flag(2).unwrap();
        assert!(inner.append_flag(3).is_err());

        let mut outer = AttrBuilder::with_limit(8);
        assert!(outer.append_nested(23, &inner).is_err());
        assert!(decode_attrs(outer.as_bytes()).unwrap().is_empty());
    }
}
