//! Printable implementation for InterfaceInfo.

use std::io::Write;

use crate::nl80211::InterfaceInfo;

use super::{OutputOptions, Printable};

impl Printable for InterfaceInfo {
    fn print_text<W: Write + ?Sized>(
        &self,
        w: &mut W,
        _opts: &OutputOptions,
    ) -> std::io::Result<()> {
        if let Some(ref name) = self.ifname {
            writeln!(w, "Interface {}", name)?;
        }
        if let Some(ifindex) = self.ifindex {
            writeln!(w, "\tifindex {}", ifindex)?;
        }
        if let Some(kind) = self.type_name() {
            writeln!(w, "\ttype {}", kind)?;
        }
        if let Some(wiphy) = self.wiphy {
            writeln!(w, "\twiphy {}", wiphy)?;
        }
        if let Some(ref mesh_id) = self.mesh_id {
            writeln!(w, "\tmesh id {}", mesh_id)?;
        }
        Ok(())
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
