//! Interface and wireless device name lookups via sysfs.

use std::path::Path;

/// Maximum interface name length (including null terminator).
pub const IFNAMSIZ: usize = 16;

const NET_CLASS: &str = "/sys/class/net";
const IEEE80211_CLASS: &str = "/sys/class/ieee80211";

/// Error type for interface operations.
#[derive(Debug, thiserror::Error)]
pub enum IfError {
    #[error("interface not found: {0}")]
    NotFound(String),

    #[error("invalid interface name: {0}")]
    InvalidName(String),
}

pub type Result<T> = std::result::Result<T, IfError>;

/// Validate an interface or wireless device name.
pub fn validate(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(IfError::InvalidName("empty name".to_string()));
    }

    if name.len() >= IFNAMSIZ {
        return Err(IfError::InvalidName(format!(
            "name too long (max {} chars)",
            IFNAMSIZ - 1
        )));
    }

    if name.contains('/') || name.contains('\0') || name == "." || name == ".." {
        return Err(IfError::InvalidName(
            "name contains invalid characters".to_string(),
        ));
    }

    if name.chars().any(|c| c.is_whitespace()) {
        return Err(IfError::InvalidName("name contains whitespace".to_string()));
    }

    Ok(())
}

/// Convert a network interface name to its index.
pub fn name_to_index(name: &str) -> Result<u32> {
    validate(name)?;
    read_index(&Path::new(NET_CLASS).join(name).join("ifindex"), name)
}

/// Convert a wireless device name to its wiphy index.
///
/// Accepts `phy#<n>` to name a device by index directly; otherwise the
/// name is looked up under `/sys/class/ieee80211`.
pub fn phy_name_to_index(name: &str) -> Result<u32> {
    if let Some(index) = parse_phy_index(name) {
        return Ok(index);
    }
    validate(name)?;
    read_index(&Path::new(IEEE80211_CLASS).join(name).join("index"), name)
}

/// Parse the `phy#<n>` form.
pub fn parse_phy_index(name: &str) -> Option<u32> {
    name.strip_prefix("phy#")?.parse().ok()
}

fn read_index(path: &Path, name: &str) -> Result<u32> {
    let content =
        std::fs::read_to_string(path).map_err(|_| IfError::NotFound(name.to_string()))?;

    content
        .trim()
        .parse()
        .map_err(|_| IfError::NotFound(name.to_string()))
}
