//! Request message under construction.

use super::target::Target;
use crate::netlink::genl::GENL_HDRLEN;
use crate::netlink::message::NLM_F_DUMP;
use crate::netlink::{AttrBuilder, DEFAULT_ATTR_LIMIT, NLMSG_HDRLEN, Result};
use crate::nl80211::Nl80211Cmd;

/// Room left for attributes once both headers are accounted for.
pub const REQUEST_ATTR_LIMIT: usize = DEFAULT_ATTR_LIMIT - NLMSG_HDRLEN - GENL_HDRLEN;

/// An nl80211 request: command, message flags and attribute body.
///
/// The target attribute is written first so handlers only append their own
/// arguments. The body is owned by the request and dropped with it, so a
/// request that fails to build is never sent.
#[derive(Debug)]
pub struct Request {
    cmd: Nl80211Cmd,
    flags: u16,
    target: Option<Target>,
    attrs: AttrBuilder,
}

impl Request {
    /// Start a request, encoding `target` as its first attribute.
    pub fn new(cmd: Nl80211Cmd, flags: u16, target: Option<Target>) -> Result<Self> {
        Self::with_limit(cmd, flags, target, REQUEST_ATTR_LIMIT)
    }

    /// Start a request whose body may not exceed `limit` bytes.
    pub fn with_limit(
        cmd: Nl80211Cmd,
        flags: u16,
        target: Option<Target>,
        limit: usize,
    ) -> Result<Self> {
        let mut attrs = AttrBuilder::with_limit(limit);
        if let Some(target) = &target {
            attrs.append_u32(target.attr() as u16, target.id())?;
        }
        Ok(Self {
            cmd,
            flags,
            target,
            attrs,
        })
    }

    pub fn cmd(&self) -> Nl80211Cmd {
        self.cmd
    }

    pub fn flags(&self) -> u16 {
        self.flags
    }

    pub fn target(&self) -> Option<&Target> {
        self.target.as_ref()
    }

    /// Builder for the attribute body.
    pub fn attrs(&mut self) -> &mut AttrBuilder {
        &mut self.attrs
    }

    /// Encoded attribute body.
    pub fn body(&self) -> &[u8] {
        self.attrs.as_bytes()
    }

    /// Check if the request asks for a dump.
    pub fn is_dump(&self) -> bool {
        self.flags & NLM_F_DUMP == NLM_F_DUMP
    }
}
