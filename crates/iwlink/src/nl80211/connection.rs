//! nl80211 connection.

use std::time::Duration;

use super::{NL80211_GENL_NAME, NL80211_GENL_VERSION};
use crate::cmd::{Channel, Request};
use crate::netlink::genl::GenlConnection;
use crate::netlink::{Error, Result};

/// Connection to the nl80211 family.
///
/// The family id is resolved once, when the connection is opened.
pub struct Nl80211Connection {
    genl: GenlConnection,
    family_id: u16,
    timeout: Option<Duration>,
}

impl Nl80211Connection {
    /// Open a Generic Netlink socket and resolve the nl80211 family.
    pub async fn new() -> Result<Self> {
        let genl = GenlConnection::new()?;
        let family = genl.get_family(NL80211_GENL_NAME).await?;

        Ok(Self {
            genl,
            family_id: family.id,
            timeout: None,
        })
    }

    /// Give up on a request the kernel has not finished answering after
    /// `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The dynamically assigned family id.
    pub fn family_id(&self) -> u16 {
        self.family_id
    }

    /// Get the underlying GENL connection.
    pub fn genl(&self) -> &GenlConnection {
        &self.genl
    }

    async fn exchange(
        &self,
        request: &Request,
        on_reply: &mut dyn FnMut(&[u8]) -> Result<()>,
    ) -> Result<()> {
        self.genl
            .execute(
                self.family_id,
                request.cmd() as u8,
                NL80211_GENL_VERSION,
                request.flags(),
                request.body(),
                on_reply,
            )
            .await
            .map_err(|e| e.with_context("command failed"))
    }
}

impl Channel for Nl80211Connection {
    async fn execute(
        &self,
        request: &Request,
        on_reply: &mut dyn FnMut(&[u8]) -> Result<()>,
    ) -> Result<()> {
        tracing::debug!(
            cmd = ?request.cmd(),
            flags = request.flags(),
            len = request.body().len(),
            "sending nl80211 request"
        );

        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.exchange(request, on_reply))
                .await
                .map_err(|_| Error::Timeout(limit.as_millis() as u64))?,
            None => self.exchange(request, on_reply).await,
        }
    }
}
