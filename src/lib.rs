#![doc = include_str!("../README.md")]
//! ## Feature flags
#![doc = document_features::document_features!()]
//!

mod actor;
mod chord;
mod common;
mod config;
mod error;
mod info;
mod ring;

#[cfg(feature = "async")]
pub mod async_chord;

pub use crate::common::{FingerTable, Id, KeyRange, Node, NodeIndex, ID_BITS, RING_SIZE};
pub use bytes::Bytes;
pub use chord::{Chord, ChordBuilder};
pub use config::{
    Config, TickOrder, DEFAULT_MAINTENANCE_INTERVAL, DEFAULT_MAX_HOPS, DEFAULT_REQUEST_TIMEOUT,
};
pub use error::{Error, Result};
pub use info::{NodeInfo, RingInfo};
pub use ring::{Lookup, Ring, Route, TickReport};
