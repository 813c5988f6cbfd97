//! Command targets and name resolution.

use std::fmt;

use crate::netlink::{Error, Result};
use crate::nl80211::Nl80211Attr;
use crate::util::ifname;

/// Kind of object a command acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    /// The command applies to no particular object.
    None,
    /// A wireless device (wiphy).
    Phy,
    /// A network interface.
    Netdev,
}

impl TargetKind {
    /// Placeholder shown in usage text.
    pub fn placeholder(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Phy => "<phy>",
            Self::Netdev => "<dev>",
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Self::None => "nothing",
            Self::Phy => "wireless device",
            Self::Netdev => "network interface",
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// A resolved command target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Phy { index: u32, name: String },
    Netdev { ifindex: u32, name: String },
}

impl Target {
    pub fn kind(&self) -> TargetKind {
        match self {
            Self::Phy { .. } => TargetKind::Phy,
            Self::Netdev { .. } => TargetKind::Netdev,
        }
    }

    /// The name as given on the command line.
    pub fn name(&self) -> &str {
        match self {
            Self::Phy { name, .. } | Self::Netdev { name, .. } => name,
        }
    }

    /// Numeric handle the kernel knows this target by.
    pub fn id(&self) -> u32 {
        match self {
            Self::Phy { index, .. } => *index,
            Self::Netdev { ifindex, .. } => *ifindex,
        }
    }

    /// Attribute that carries the target in a request.
    pub fn attr(&self) -> Nl80211Attr {
        match self {
            Self::Phy { .. } => Nl80211Attr::Wiphy,
            Self::Netdev { .. } => Nl80211Attr::Ifindex,
        }
    }
}

/// Name-to-index lookups for interfaces and wireless devices.
pub trait DeviceLookup {
    /// Index of the network interface with this name.
    fn netdev_index(&self, name: &str) -> Option<u32>;

    /// Index of the wireless device with this name.
    fn phy_index(&self, name: &str) -> Option<u32>;
}

/// Lookups against `/sys/class/net` and `/sys/class/ieee80211`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SysfsLookup;

impl DeviceLookup for SysfsLookup {
    fn netdev_index(&self, name: &str) -> Option<u32> {
        ifname::name_to_index(name).ok()
    }

    fn phy_index(&self, name: &str) -> Option<u32> {
        ifname::phy_name_to_index(name).ok()
    }
}

/// Turns a target token into a [`Target`] of an accepted kind.
#[derive(Debug, Clone, Default)]
pub struct Resolver<L = SysfsLookup> {
    lookup: L,
}

impl<L: DeviceLookup> Resolver<L> {
    pub fn new(lookup: L) -> Self {
        Self { lookup }
    }

    /// Resolve `token` to one of `kinds`.
    ///
    /// Interface names are tried before wireless device names. A name that
    /// exists only as a kind outside `kinds` yields
    /// [`Error::TargetKindMismatch`]; a name that exists as neither yields
    /// [`Error::NoSuchDevice`].
    pub fn resolve(&self, token: &str, kinds: &[TargetKind]) -> Result<Target> {
        let mut found = None;

        if let Some(ifindex) = self.lookup.netdev_index(token) {
            if kinds.contains(&TargetKind::Netdev) {
                return Ok(Target::Netdev {
                    ifindex,
                    name: token.to_string(),
                });
            }
            found = Some(TargetKind::Netdev);
        }

        if let Some(index) = self.lookup.phy_index(token) {
            if kinds.contains(&TargetKind::Phy) {
                return Ok(Target::Phy {
                    index,
                    name: token.to_string(),
                });
            }
            found.get_or_insert(TargetKind::Phy);
        }

        match found {
            Some(kind) => Err(Error::TargetKindMismatch {
                name: token.to_string(),
                found: kind.to_string(),
                expected: kinds
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(" or "),
            }),
            None => Err(Error::NoSuchDevice {
                name: token.to_string(),
            }),
        }
    }
}
