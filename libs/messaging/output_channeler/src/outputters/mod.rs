//! Outputter implementations

pub mod socket;

pub use socket::SocketOutputter;
