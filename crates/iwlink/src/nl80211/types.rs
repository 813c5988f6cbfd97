//! Interface types, monitor flags and the decoded interface record.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use super::Nl80211Attr;
use crate::netlink::{AttrTable, Result};

/// Operating mode of a wireless interface (`enum nl80211_iftype`).
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterfaceType {
    Unspecified = 0,
    Adhoc = 1,
    Station = 2,
    Ap = 3,
    ApVlan = 4,
    Wds = 5,
    Monitor = 6,
    MeshPoint = 7,
    P2pClient = 8,
    P2pGo = 9,
    P2pDevice = 10,
    Ocb = 11,
    Nan = 12,
}

impl InterfaceType {
    const ALL: [InterfaceType; 13] = [
        Self::Unspecified,
        Self::Adhoc,
        Self::Station,
        Self::Ap,
        Self::ApVlan,
        Self::Wds,
        Self::Monitor,
        Self::MeshPoint,
        Self::P2pClient,
        Self::P2pGo,
        Self::P2pDevice,
        Self::Ocb,
        Self::Nan,
    ];

    /// Look up a kernel type code.
    pub fn from_u32(value: u32) -> Option<Self> {
        Self::ALL.get(value as usize).copied()
    }

    /// Kernel type code.
    pub fn as_u32(self) -> u32 {
        self as u32
    }

    /// Human-readable mode name, as printed for replies.
    pub fn name(self) -> &'static str {
        match self {
            Self::Unspecified => "Unspecified",
            Self::Adhoc => "IBSS",
            Self::Station => "managed",
            Self::Ap => "AP",
            Self::ApVlan => "AP/VLAN",
            Self::Wds => "WDS",
            Self::Monitor => "monitor",
            Self::MeshPoint => "mesh point",
            Self::P2pClient => "P2P-client",
            Self::P2pGo => "P2P-GO",
            Self::P2pDevice => "P2P-device",
            Self::Ocb => "outside context of a BSS",
            Self::Nan => "NAN",
        }
    }
}

/// Parses the type words accepted on the command line.
impl FromStr for InterfaceType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "adhoc" | "ibss" => Ok(Self::Adhoc),
            "monitor" => Ok(Self::Monitor),
            "__ap" => Ok(Self::Ap),
            "__ap_vlan" => Ok(Self::ApVlan),
            "wds" => Ok(Self::Wds),
            "station" => Ok(Self::Station),
            "mp" | "mesh" => Ok(Self::MeshPoint),
            _ => Err(format!("invalid interface type {s}")),
        }
    }
}

impl fmt::Display for InterfaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Name for a raw type code, including codes this build does not know.
pub fn iftype_name(value: u32) -> String {
    match InterfaceType::from_u32(value) {
        Some(kind) => kind.name().to_string(),
        None => format!("Unknown mode ({value})"),
    }
}

/// Monitor-mode capture option (`enum nl80211_mntr_flags`).
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorFlag {
    FcsFail = 1,
    PlcpFail = 2,
    Control = 3,
    OtherBss = 4,
    CookFrames = 5,
}

impl MonitorFlag {
    /// Every flag, in kernel order.
    pub const ALL: [MonitorFlag; 5] = [
        Self::FcsFail,
        Self::PlcpFail,
        Self::Control,
        Self::OtherBss,
        Self::CookFrames,
    ];

    /// Word used on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Self::FcsFail => "fcsfail",
            Self::PlcpFail => "plcpfail",
            Self::Control => "control",
            Self::OtherBss => "otherbss",
            Self::CookFrames => "cook",
        }
    }

    /// Attribute key inside the `MNTR_FLAGS` container.
    pub fn attr(self) -> u16 {
        self as u16
    }
}

impl FromStr for MonitorFlag {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|flag| flag.name() == s)
            .ok_or_else(|| format!("unknown flag {s}"))
    }
}

/// Interface fields reported by `GET_INTERFACE`.
///
/// Fields the kernel did not send stay `None`; attributes not listed here
/// are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InterfaceInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ifname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ifindex: Option<u32>,
    #[serde(
        rename = "type",
        serialize_with = "serialize_iftype",
        skip_serializing_if = "Option::is_none"
    )]
    pub iftype: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wiphy: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mesh_id: Option<String>,
}

impl InterfaceInfo {
    /// Extract the interface fields from a decoded reply.
    pub fn from_attrs(attrs: &AttrTable<'_>) -> Result<Self> {
        Ok(Self {
            ifname: attrs.bytes(Nl80211Attr::Ifname as u16).map(c_string_lossy),
            ifindex: attrs.u32(Nl80211Attr::Ifindex as u16)?,
            iftype: attrs.u32(Nl80211Attr::Iftype as u16)?,
            wiphy: attrs.u32(Nl80211Attr::Wiphy as u16)?,
            mesh_id: attrs
                .bytes(Nl80211Attr::MeshId as u16)
                .map(|id| String::from_utf8_lossy(id).into_owned()),
        })
    }

    /// Mode name for the reported type.
    pub fn type_name(&self) -> Option<String> {
        self.iftype.map(iftype_name)
    }
}

/// Text up to the first NUL, with invalid UTF-8 replaced.
fn c_string_lossy(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

fn serialize_iftype<S: Serializer>(
    value: &Option<u32>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match value {
        Some(code) => serializer.serialize_str(&iftype_name(*code)),
        None => serializer.serialize_none(),
    }
}
