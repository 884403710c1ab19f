pub mod iface;
pub mod probe;
