//! Netlink attribute (nlattr) decoding.
//!
//! Two readers live here. [`AttrIter`] is the lenient zero-copy walk that
//! stops at the first framing problem; it is used on buffers we produced
//! ourselves or where a short read simply means "no more attributes".
//! [`AttrTable`] and [`decode_attrs`] are strict: every length field must be
//! self-consistent, and anything else is reported as
//! [`Error::MalformedAttribute`](super::Error::MalformedAttribute). Replies
//! from the kernel go through the strict path.

use super::error::{Error, Result};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// Netlink attribute alignment.
pub const NLA_ALIGNTO: usize = 4;

/// Align a length to NLA_ALIGNTO boundary.
#[inline]
pub const fn nla_align(len: usize) -> usize {
    (len + NLA_ALIGNTO - 1) & !(NLA_ALIGNTO - 1)
}

/// Size of the attribute header.
pub const NLA_HDRLEN: usize = 4; // nla_align(size_of::<NlAttr>())

/// Netlink attribute header (mirrors struct nlattr).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct NlAttr {
    /// Length including header.
    pub nla_len: u16,
    /// Attribute type.
    pub nla_type: u16,
}

/// Attribute type flags.
pub const NLA_F_NESTED: u16 = 1 << 15;
pub const NLA_F_NET_BYTEORDER: u16 = 1 << 14;
pub const NLA_TYPE_MASK: u16 = !(NLA_F_NESTED | NLA_F_NET_BYTEORDER);

impl NlAttr {
    /// Create a new attribute header.
    pub fn new(attr_type: u16, data_len: usize) -> Self {
        Self {
            nla_len: (NLA_HDRLEN + data_len) as u16,
            nla_type: attr_type,
        }
    }

    /// Get the attribute type without flags.
    pub fn kind(&self) -> u16 {
        self.nla_type & NLA_TYPE_MASK
    }

    /// Check if this is a nested attribute.
    pub fn is_nested(&self) -> bool {
        self.nla_type & NLA_F_NESTED != 0
    }

    /// Convert to bytes.
    pub fn as_bytes(&self) -> &[u8] {
        <Self as IntoBytes>::as_bytes(self)
    }

    /// Read a header from the start of `data`, whatever its alignment.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::read_from_prefix(data)
            .map(|(r, _)| r)
            .map_err(|_| Error::Truncated {
                expected: std::mem::size_of::<Self>(),
                actual: data.len(),
            })
    }
}

/// Iterator over netlink attributes in a buffer.
pub struct AttrIter<'a> {
    data: &'a [u8],
}

impl<'a> AttrIter<'a> {
    /// Create a new attribute iterator.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }
}

impl<'a> Iterator for AttrIter<'a> {
    /// Returns (attribute type, payload data).
    type Item = (u16, &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        if self.data.len() < NLA_HDRLEN {
            return None;
        }

        let attr = NlAttr::from_bytes(self.data).ok()?;

        let len = attr.nla_len as usize;
        if len < NLA_HDRLEN || len > self.data.len() {
            return None;
        }

        let payload = &self.data[NLA_HDRLEN..len];
        let aligned_len = nla_align(len);

        if aligned_len >= self.data.len() {
            self.data = &[];
        } else {
            self.data = &self.data[aligned_len..];
        }

        Some((attr.kind(), payload))
    }
}

/// One decoded attribute: its key and a view of its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attr<'a> {
    /// Attribute type with the nested/byte-order flags masked off.
    pub kind: u16,
    /// Whether the sender marked the payload as a nested container.
    pub nested: bool,
    /// Payload bytes, without header or padding.
    pub payload: &'a [u8],
}

/// Strictly decode every attribute in `data`, in wire order.
///
/// Duplicate keys are kept. Fails if a length field is smaller than the
/// header, runs past the end of the buffer, or if bytes are left over that
/// cannot hold another header.
pub fn decode_attrs(data: &[u8]) -> Result<Vec<Attr<'_>>> {
    let mut attrs = Vec::new();
    let mut rest = data;
    let mut offset = 0usize;

    while rest.len() >= NLA_HDRLEN {
        let header = NlAttr::from_bytes(rest)?;
        let len = header.nla_len as usize;

        if len < NLA_HDRLEN {
            return Err(Error::MalformedAttribute(format!(
                "attribute {} at offset {offset} has length {len}",
                header.kind()
            )));
        }
        if len > rest.len() {
            return Err(Error::MalformedAttribute(format!(
                "attribute {} at offset {offset} claims {len} bytes, {} available",
                header.kind(),
                rest.len()
            )));
        }

        attrs.push(Attr {
            kind: header.kind(),
            nested: header.is_nested(),
            payload: &rest[NLA_HDRLEN..len],
        });

        let step = nla_align(len).min(rest.len());
        rest = &rest[step..];
        offset += step;
    }

    if !rest.is_empty() {
        return Err(Error::MalformedAttribute(format!(
            "{} trailing bytes at offset {offset}",
            rest.len()
        )));
    }

    Ok(attrs)
}

/// Read-only attribute tree decoded from a reply.
///
/// Lookups return the first occurrence of a key. Nested payloads are left
/// as bytes until [`nested`](Self::nested) is asked for them.
#[derive(Debug, Clone, Default)]
pub struct AttrTable<'a> {
    attrs: Vec<Attr<'a>>,
}

impl<'a> AttrTable<'a> {
    /// Decode the top level of an attribute buffer.
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        Ok(Self {
            attrs: decode_attrs(data)?,
        })
    }

    /// Number of attributes, duplicates included.
    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    /// Check if the buffer held no attributes.
    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    /// All attributes in wire order.
    pub fn iter(&self) -> impl Iterator<Item = &Attr<'a>> {
        self.attrs.iter()
    }

    /// The first attribute with this key.
    pub fn get(&self, kind: u16) -> Option<&Attr<'a>> {
        self.attrs.iter().find(|attr| attr.kind == kind)
    }

    /// Check if the key is present at all.
    pub fn contains(&self, kind: u16) -> bool {
        self.get(kind).is_some()
    }

    /// Presence-only flag attribute.
    pub fn flag(&self, kind: u16) -> bool {
        self.contains(kind)
    }

    /// Raw payload of the first attribute with this key.
    pub fn bytes(&self, kind: u16) -> Option<&'a [u8]> {
        self.get(kind).map(|attr| attr.payload)
    }

    /// 32-bit unsigned attribute (native endian).
    pub fn u32(&self, kind: u16) -> Result<Option<u32>> {
        self.bytes(kind).map(get::u32_ne).transpose()
    }

    /// String attribute, with or without null terminator.
    pub fn str(&self, kind: u16) -> Result<Option<&'a str>> {
        self.bytes(kind).map(get::string).transpose()
    }

    /// Decode the payload of a nested attribute.
    pub fn nested(&self, kind: u16) -> Result<Option<AttrTable<'a>>> {
        self.bytes(kind).map(AttrTable::parse).transpose()
    }
}

/// Helper functions for extracting typed values from attribute payloads.
pub mod get {
    use super::*;

    /// Extract a u16 value (native endian).
    pub fn u16_ne(data: &[u8]) -> Result<u16> {
        match data {
            [a, b, ..] => Ok(u16::from_ne_bytes([*a, *b])),
            _ => Err(Error::MalformedAttribute("truncated u16 attribute".into())),
        }
    }

    /// Extract a u32 value (native endian).
    pub fn u32_ne(data: &[u8]) -> Result<u32> {
        match data {
            [a, b, c, d, ..] => Ok(u32::from_ne_bytes([*a, *b, *c, *d])),
            _ => Err(Error::MalformedAttribute("truncated u32 attribute".into())),
        }
    }

    /// Extract a null-terminated string.
    pub fn string(data: &[u8]) -> Result<&str> {
        // Find null terminator or use whole buffer
        let len = data.iter().position(|&b| b == 0).unwrap_or(data.len());
        std::str::from_utf8(&data[..len])
            .map_err(|e| Error::MalformedAttribute(format!("invalid UTF-8: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attr(kind: u16, payload: &[u8]) -> Vec<u8> {
        let mut buf = NlAttr::new(kind, payload.len()).as_bytes().to_vec();
        buf.extend_from_slice(payload);
        buf.resize(nla_align(buf.len()), 0);
        buf
    }

    #[test]
    fn test_decode_in_order_with_duplicates() {
        let mut buf = attr(4, b"wlan0\0");
        buf.extend(attr(3, &7u32.to_ne_bytes()));
        buf.extend(attr(4, b"wlan1\0"));

        let attrs = decode_attrs(&buf).unwrap();
        let kinds: Vec<u16> = attrs.iter().map(|a| a.kind).collect();
        assert_eq!(kinds, vec![4, 3, 4]);

        let table = AttrTable::parse(&buf).unwrap();
        assert_eq!(table.str(4).unwrap(), Some("wlan0"));
        assert_eq!(table.u32(3).unwrap(), Some(7));
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_missing_key_is_none() {
        let buf = attr(3, &1u32.to_ne_bytes());
        let table = AttrTable::parse(&buf).unwrap();
        assert_eq!(table.str(4).unwrap(), None);
        assert!(!table.flag(9));
        assert!(table.nested(23).unwrap().is_none());
    }

    #[test]
    fn test_truncated_payload_rejected() {
        let mut buf = attr(4, b"wlan0\0");
        buf.truncate(7);
        assert!(matches!(
            decode_attrs(&buf),
            Err(Error::MalformedAttribute(_))
        ));
    }

    #[test]
    fn test_truncated_header_rejected() {
        let mut buf = attr(3, &1u32.to_ne_bytes());
        buf.extend_from_slice(&[8, 0]);
        assert!(matches!(
            AttrTable::parse(&buf),
            Err(Error::MalformedAttribute(_))
        ));
    }

    #[test]
    fn test_short_length_field_rejected() {
        let buf = [2u8, 0, 3, 0, 0, 0, 0, 0];
        assert!(matches!(
            decode_attrs(&buf),
            Err(Error::MalformedAttribute(_))
        ));
    }

    #[test]
    fn test_unpadded_final_attribute_accepted() {
        let mut buf = attr(4, b"ab\0");
        buf.truncate(NLA_HDRLEN + 3);
        let table = AttrTable::parse(&buf).unwrap();
        assert_eq!(table.str(4).unwrap(), Some("ab"));
    }

    #[test]
    fn test_wrong_size_u32_is_malformed() {
        let buf = attr(3, &[1, 2]);
        let table = AttrTable::parse(&buf).unwrap();
        assert!(matches!(table.u32(3), Err(Error::MalformedAttribute(_))));
    }

    #[test]
    fn test_nested_flag_masked() {
        let inner = attr(1, &[]);
        let buf = attr(23 | NLA_F_NESTED, &inner);
        let table = AttrTable::parse(&buf).unwrap();
        let outer = table.get(23).unwrap();
        assert!(outer.nested);
        let nested = table.nested(23).unwrap().unwrap();
        assert!(nested.flag(1));
    }

    #[test]
    fn test_lenient_iter_stops_on_garbage() {
        let mut buf = attr(3, &1u32.to_ne_bytes());
        buf.extend_from_slice(&[200, 0, 4, 0]);
        let kinds: Vec<u16> = AttrIter::new(&buf).map(|(k, _)| k).collect();
        assert_eq!(kinds, vec![3]);
    }
}
