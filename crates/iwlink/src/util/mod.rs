//! Shared utilities for iwlink.

pub mod ifname;

pub use ifname::{name_to_index, phy_name_to_index};
