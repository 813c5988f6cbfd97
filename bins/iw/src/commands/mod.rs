//! iw command implementations.

pub mod interface;

use iwlink::cmd::Registry;

/// Register every command this binary knows.
pub fn register_all(registry: &mut Registry) {
    interface::register(registry);
}
