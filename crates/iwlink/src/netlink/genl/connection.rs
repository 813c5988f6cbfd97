//! Generic Netlink connection with family resolution.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use super::header::{GenlMsgHdr, split_payload};
use super::{CtrlAttr, CtrlCmd, GENL_ID_CTRL};
use crate::netlink::attr::{AttrIter, get};
use crate::netlink::builder::{AttrBuilder, MessageBuilder};
use crate::netlink::error::{Error, Result};
use crate::netlink::message::{
    MessageIter, NLM_F_ACK, NLM_F_DUMP, NLM_F_REQUEST, NlMsgError,
};
use crate::netlink::socket::{NetlinkSocket, Protocol};

/// Information about a Generic Netlink family.
#[derive(Debug, Clone)]
pub struct FamilyInfo {
    /// Dynamically assigned family ID (used as nlmsg_type).
    pub id: u16,
    /// Family version.
    pub version: u8,
    /// Maximum attribute number.
    pub max_attr: u32,
}

/// Generic Netlink connection.
///
/// Provides family ID resolution and request execution. Family IDs are
/// cached to avoid repeated kernel queries.
pub struct GenlConnection {
    socket: NetlinkSocket,
    cache: RwLock<HashMap<String, FamilyInfo>>,
}

impl GenlConnection {
    /// Create a new Generic Netlink connection.
    pub fn new() -> Result<Self> {
        Ok(Self {
            socket: NetlinkSocket::new(Protocol::Generic)?,
            cache: RwLock::new(HashMap::new()),
        })
    }

    /// Get the underlying socket.
    pub fn socket(&self) -> &NetlinkSocket {
        &self.socket
    }

    /// Get information about a Generic Netlink family.
    ///
    /// The result is cached, so subsequent calls for the same family
    /// do not require kernel communication.
    pub async fn get_family(&self, name: &str) -> Result<FamilyInfo> {
        {
            let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(info) = cache.get(name) {
                return Ok(info.clone());
            }
        }

        let info = self.query_family(name).await?;
        tracing::debug!(family = name, id = info.id, version = info.version, "resolved genl family");

        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), info.clone());

        Ok(info)
    }

    /// Query the kernel for family information.
    async fn query_family(&self, name: &str) -> Result<FamilyInfo> {
        let mut attrs = AttrBuilder::new();
        attrs.append_str(CtrlAttr::FamilyName as u16, name)?;

        let mut info = None;
        let result = self
            .execute(
                GENL_ID_CTRL,
                CtrlCmd::GetFamily as u8,
                1,
                0,
                attrs.as_bytes(),
                &mut |data: &[u8]| {
                    if info.is_none() {
                        info = Some(parse_family_attrs(data)?);
                    }
                    Ok(())
                },
            )
            .await;

        match result {
            Err(Error::Kernel { errno, .. }) if errno == libc::ENOENT => {
                return Err(Error::FamilyNotFound {
                    name: name.to_string(),
                });
            }
            other => other?,
        }

        info.ok_or_else(|| Error::FamilyNotFound {
            name: name.to_string(),
        })
    }

    /// Send a GENL command and feed every data reply to `on_reply`.
    ///
    /// `attrs` is an already encoded attribute list. `flags` is OR-ed into
    /// `NLM_F_REQUEST | NLM_F_ACK`. A request carrying `NLM_F_DUMP` completes
    /// on `NLMSG_DONE`; any other request completes on the kernel's ACK. A
    /// negative status in the ACK is returned as [`Error::Kernel`].
    ///
    /// `on_reply` receives the attribute data of each reply, after the GENL
    /// header.
    pub async fn execute(
        &self,
        family_id: u16,
        cmd: u8,
        version: u8,
        flags: u16,
        attrs: &[u8],
        on_reply: &mut dyn FnMut(&[u8]) -> Result<()>,
    ) -> Result<()> {
        let dump = flags & NLM_F_DUMP == NLM_F_DUMP;
        let mut builder = MessageBuilder::new(family_id, NLM_F_REQUEST | NLM_F_ACK | flags);
        builder.append_bytes(GenlMsgHdr::new(cmd, version).as_bytes());
        builder.append_bytes(attrs);

        let seq = self.socket.next_seq();
        builder.set_seq(seq);
        builder.set_pid(self.socket.pid());

        let msg = builder.finish();
        self.socket.send(&msg).await?;

        loop {
            let data = self.socket.recv_msg().await?;

            for result in MessageIter::new(&data) {
                let (header, payload) = result?;

                if header.nlmsg_seq != seq {
                    continue;
                }

                if header.is_error() {
                    let err = NlMsgError::from_bytes(payload)?;
                    if !err.is_ack() {
                        return Err(Error::from_errno(err.error));
                    }
                    return Ok(());
                }

                if header.is_done() {
                    if dump {
                        return Ok(());
                    }
                    continue;
                }

                if header.is_control() {
                    continue;
                }

                match split_payload(payload) {
                    Some((_, attr_data)) => on_reply(attr_data)?,
                    None => tracing::warn!(len = payload.len(), "reply shorter than GENL header"),
                }
            }
        }
    }
}

/// Parse family attributes from a CTRL_CMD_GETFAMILY response.
fn parse_family_attrs(data: &[u8]) -> Result<FamilyInfo> {
    let mut id: Option<u16> = None;
    let mut version: u8 = 0;
    let mut max_attr: u32 = 0;

    for (attr_type, payload) in AttrIter::new(data) {
        match attr_type {
            t if t == CtrlAttr::FamilyId as u16 => {
                id = Some(get::u16_ne(payload)?);
            }
            t if t == CtrlAttr::Version as u16 => {
                version = get::u32_ne(payload)? as u8;
            }
            t if t == CtrlAttr::MaxAttr as u16 => {
                max_attr = get::u32_ne(payload)?;
            }
            _ => {}
        }
    }

    let id = id.ok_or_else(|| Error::InvalidMessage("missing family ID".into()))?;

    Ok(FamilyInfo {
        id,
        version,
        max_attr,
    })
}
