//! Repository synchronization over HTTP
//!
//! Clone, push and pull all speak the same four-endpoint protocol: a ref
//! advertisement, a negotiated object fetch, an object push and a
//! compare-and-swap ref update. [`protocol`] defines the bodies that cross
//! the wire, [`client`] drives them with `reqwest` and [`server`] answers
//! them with `hyper`.

pub mod client;
pub mod protocol;
pub mod server;
