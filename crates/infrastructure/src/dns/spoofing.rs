use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

use super::query::DnsQuery;
use super::wire_response::build_spoofed_response;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpoofingStats {
    pub answered: u64,
    pub dropped: u64,
}

/// Answers every standard query with the portal address. Responses,
/// non-zero opcodes and undecodable packets are dropped without a reply.
pub struct SpoofingHandler {
    portal_ip: Ipv4Addr,
    answered: AtomicU64,
    dropped: AtomicU64,
}

impl SpoofingHandler {
    pub fn new(portal_ip: Ipv4Addr) -> Self {
        Self {
            portal_ip,
            answered: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
        }
    }

    pub fn portal_ip(&self) -> Ipv4Addr {
        self.portal_ip
    }

    pub fn handle(&self, datagram: &[u8]) -> Option<Vec<u8>> {
        let reply = DnsQuery::parse(datagram).and_then(|query| {
            if !query.is_standard_query() {
                debug!(
                    id = query.id,
                    opcode = query.opcode,
                    is_response = query.is_response,
                    "Ignoring non-query packet"
                );
                return None;
            }
            let reply = build_spoofed_response(&query, self.portal_ip);
            if reply.is_some() {
                debug!(domain = %query.domain, target = %self.portal_ip, "Spoofed answer");
            }
            reply
        });

        match reply {
            Some(bytes) => {
                self.answered.fetch_add(1, Ordering::Relaxed);
                Some(bytes)
            }
            None => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    pub fn stats(&self) -> SpoofingStats {
        SpoofingStats {
            answered: self.answered.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
        }
    }
}
