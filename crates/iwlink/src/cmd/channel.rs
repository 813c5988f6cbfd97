//! Transport seam between the dispatcher and the kernel.

use std::future::Future;

use super::request::Request;
use crate::netlink::Result;

/// Something that can carry a [`Request`] to the kernel.
///
/// `execute` sends the request and passes the attribute data of every reply
/// to `on_reply`. It completes once the kernel acknowledges the request or,
/// for dump requests, once the dump is done. Errors returned by `on_reply`
/// abort the exchange.
pub trait Channel {
    fn execute(
        &self,
        request: &Request,
        on_reply: &mut dyn FnMut(&[u8]) -> Result<()>,
    ) -> impl Future<Output = Result<()>>;
}
