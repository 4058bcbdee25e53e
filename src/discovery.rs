//! Bridge discovery seam.

use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

use crate::errors::Error;
use crate::runtime::BoxFuture;

type Result<T> = std::result::Result<T, Error>;

/// A bridge found on the local network.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct BridgeCandidate {
    /// Bridge id as reported by the discovery transport
    pub id: String,
    /// IP address of the bridge
    pub address: Ipv4Addr,
}

/// The discovery transport.
///
/// Implementations wrap whatever actually finds bridges on the local
/// network (UPnP multicast, portal lookup, IP scan); the coordinator only
/// consumes the resulting candidate list.
pub trait Discovery: Send + Sync {
    /// Search the local network for bridges.
    ///
    /// An empty list is an answer in its own right: the search worked and
    /// nothing responded. Transport failures are errors; the coordinator
    /// retries those, never empty results.
    fn search(&self) -> BoxFuture<'_, Result<Vec<BridgeCandidate>>>;
}
