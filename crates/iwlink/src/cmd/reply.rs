//! Per-reply decoding.

use super::registry::ReplyHandler;
use crate::netlink::{AttrTable, Error, Result};
use crate::output::Printer;

/// Decodes reply payloads and hands them to a command's reply handler.
///
/// A reply whose attributes do not parse, or whose fields have the wrong
/// size, is logged and skipped; the replies after it are still handled.
pub struct ReplyDecoder<'p, 'w> {
    handler: ReplyHandler,
    printer: &'p mut Printer<'w>,
    handled: usize,
    skipped: usize,
}

impl<'p, 'w> ReplyDecoder<'p, 'w> {
    pub fn new(handler: ReplyHandler, printer: &'p mut Printer<'w>) -> Self {
        Self {
            handler,
            printer,
            handled: 0,
            skipped: 0,
        }
    }

    /// Decode one reply.
    pub fn decode(&mut self, data: &[u8]) -> Result<()> {
        let result =
            AttrTable::parse(data).and_then(|table| (self.handler)(&table, self.printer));

        match result {
            Ok(()) => {
                self.handled += 1;
                Ok(())
            }
            Err(Error::MalformedAttribute(reason)) => {
                tracing::warn!(%reason, len = data.len(), "skipping malformed reply");
                self.skipped += 1;
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Replies passed to the handler so far.
    pub fn handled(&self) -> usize {
        self.handled
    }

    /// Replies dropped because they did not parse.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::netlink::AttrBuilder;
    use crate::nl80211::{InterfaceInfo, Nl80211Attr};

    fn print_info(attrs: &AttrTable<'_>, printer: &mut Printer<'_>) -> Result<()> {
        printer.print(&InterfaceInfo::from_attrs(attrs)?)?;
        Ok(())
    }

    #[test]
    fn test_truncated_reply_is_skipped() {
        let mut good = AttrBuilder::new();
        good.append_str(Nl80211Attr::Ifname as u16, "wlan0").unwrap();
        good.append_u32(Nl80211Attr::Ifindex as u16, 3).unwrap();

        // Header claims 8 bytes, only 6 follow.
        let truncated = [8u8, 0, 3, 0, 1, 0];

        let mut out = Vec::new();
        let mut printer = Printer::text(&mut out);
        let mut decoder = ReplyDecoder::new(print_info, &mut printer);
        decoder.decode(&truncated).unwrap();
        decoder.decode(good.as_bytes()).unwrap();
        assert_eq!(decoder.skipped(), 1);
        assert_eq!(decoder.handled(), 1);
        drop(decoder);
        drop(printer);

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Interface wlan0\n\tifindex 3\n"
        );
    }

    #[test]
    fn test_wrong_sized_field_is_skipped() {
        let mut bad = AttrBuilder::new();
        bad.append(Nl80211Attr::Ifindex as u16, &[1, 2]).unwrap();

        let mut out = Vec::new();
        let mut printer = Printer::text(&mut out);
        let mut decoder = ReplyDecoder::new(print_info, &mut printer);
        decoder.decode(bad.as_bytes()).unwrap();
        assert_eq!(decoder.skipped(), 1);
        assert_eq!(decoder.handled(), 0);
    }

    #[test]
    fn test_non_utf8_ifname_is_printed() {
        let mut reply = AttrBuilder::new();
        reply.append(Nl80211Attr::Ifname as u16, b"wl\xffan\0").unwrap();
        reply.append_u32(Nl80211Attr::Ifindex as u16, 5).unwrap();
        reply.append_u32(Nl80211Attr::Iftype as u16, 2).unwrap();

        let mut out = Vec::new();
        let mut printer = Printer::text(&mut out);
        let mut decoder = ReplyDecoder::new(print_info, &mut printer);
        decoder.decode(reply.as_bytes()).unwrap();
        assert_eq!(decoder.handled(), 1);
        assert_eq!(decoder.skipped(), 0);
        drop(decoder);
        drop(printer);

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Interface wl\u{FFFD}an\n\tifindex 5\n\ttype managed\n"
        );
    }
}
