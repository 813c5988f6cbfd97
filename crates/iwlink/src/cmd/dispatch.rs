//! Matching command lines against the registry.

use super::channel::Channel;
use super::registry::{CommandDescriptor, HandlerError, Registry};
use super::reply::ReplyDecoder;
use super::request::Request;
use super::target::{DeviceLookup, Resolver, SysfsLookup, TargetKind};
use crate::netlink::{Error, Result};
use crate::output::Printer;

/// Turns argument vectors into ready-to-send requests.
pub struct Dispatcher<'r, L = SysfsLookup> {
    registry: &'r Registry,
    resolver: Resolver<L>,
}

impl<'r> Dispatcher<'r> {
    /// Dispatcher resolving names through sysfs.
    pub fn with_sysfs(registry: &'r Registry) -> Self {
        Self::new(registry, Resolver::default())
    }
}

impl<'r, L: DeviceLookup> Dispatcher<'r, L> {
    pub fn new(registry: &'r Registry, resolver: Resolver<L>) -> Self {
        Self { registry, resolver }
    }

    /// Parse `argv`, resolve its target and build the request.
    ///
    /// Nothing is sent. Usage, resolution and encoding errors all surface
    /// here.
    pub fn prepare(&self, argv: &[String]) -> Result<Invocation<'r>> {
        let registry = self.registry;

        let Some((first, rest)) = argv.split_first() else {
            return Err(Error::Usage {
                usage: registry.usage(),
            });
        };

        let (section, name, rest) = match rest.split_first() {
            Some((second, tail))
                if registry
                    .candidates(Some(first.as_str()), second)
                    .next()
                    .is_some() =>
            {
                (Some(first.as_str()), second.as_str(), tail)
            }
            _ if registry.candidates(None, first).next().is_some() => (None, first.as_str(), rest),
            _ => {
                let words = match rest.first() {
                    Some(second) if registry.has_section(first) => format!("{first} {second}"),
                    _ => first.clone(),
                };
                return Err(Error::UnknownCommand(words));
            }
        };

        let kinds: Vec<TargetKind> = registry
            .candidates(section, name)
            .map(|descriptor| descriptor.target)
            .collect();

        let (descriptor, target, args) = if kinds.contains(&TargetKind::None) {
            let descriptor = registry
                .lookup(section, name, TargetKind::None)
                .ok_or_else(|| Error::UnknownCommand(name.to_string()))?;
            (descriptor, None, rest)
        } else {
            let Some((token, args)) = rest.split_first() else {
                return Err(Error::Usage {
                    usage: registry
                        .candidates(section, name)
                        .map(CommandDescriptor::usage_line)
                        .collect::<Vec<_>>()
                        .join("\n"),
                });
            };

            let target = self.resolver.resolve(token, &kinds)?;
            let descriptor = registry
                .lookup(section, name, target.kind())
                .ok_or_else(|| Error::NoSuchDevice {
                    name: token.clone(),
                })?;
            (descriptor, Some(target), args)
        };

        tracing::debug!(
            command = %descriptor.usage_line(),
            target = ?target,
            args = args.len(),
            "matched command"
        );

        let mut request = Request::new(descriptor.cmd, descriptor.flags, target)?;
        (descriptor.handler)(&mut request, args).map_err(|e| match e {
            HandlerError::Usage => Error::Usage {
                usage: descriptor.usage_line(),
            },
            HandlerError::Invalid(message) => Error::InvalidArgument(message),
            HandlerError::InvalidUsage(message) => Error::InvalidUsage {
                message,
                usage: descriptor.usage_line(),
            },
            HandlerError::Netlink(err) => err,
        })?;

        Ok(Invocation {
            descriptor,
            request,
        })
    }

    /// Prepare `argv` and run it over `channel`.
    pub async fn dispatch<C: Channel>(
        &self,
        channel: &C,
        argv: &[String],
        printer: &mut Printer<'_>,
    ) -> Result<()> {
        self.prepare(argv)?.execute(channel, printer).await
    }
}

/// A fully built request and the command it came from.
#[derive(Debug)]
pub struct Invocation<'r> {
    descriptor: &'r CommandDescriptor,
    request: Request,
}

impl<'r> Invocation<'r> {
    pub fn descriptor(&self) -> &'r CommandDescriptor {
        self.descriptor
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    /// Send the request, printing each reply through the command's handler.
    pub async fn execute<C: Channel>(self, channel: &C, printer: &mut Printer<'_>) -> Result<()> {
        {
            let mut decoder = self
                .descriptor
                .reply
                .map(|handler| ReplyDecoder::new(handler, &mut *printer));

            channel
                .execute(&self.request, &mut |data: &[u8]| match decoder.as_mut() {
                    Some(decoder) => decoder.decode(data),
                    None => Ok(()),
                })
                .await?;
        }

        printer.flush()?;
        Ok(())
    }
}
