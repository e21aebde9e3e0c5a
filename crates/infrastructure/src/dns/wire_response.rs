use super::query::DnsQuery;
use std::net::Ipv4Addr;

/// Lifetime of every spoofed answer. Short so clients re-resolve soon after
/// they leave the portal network.
pub const SPOOF_TTL: u32 = 60;

const ANSWER_LEN: usize = 16;

/// Builds a reply that answers the first question with a single A record
/// pointing at `target`.
///
/// Header: id copied, flags `0x8180` (response, recursion desired and
/// available), one question, one answer, no authority or additional records.
/// The question is echoed byte for byte and the answer name is a pointer back
/// to it (`C0 0C`).
///
/// Returns `None` when the query has no delimitable question.
pub fn build_spoofed_response(query: &DnsQuery<'_>, target: Ipv4Addr) -> Option<Vec<u8>> {
    let question = query.question()?;
    let mut buf = Vec::with_capacity(12 + question.len() + ANSWER_LEN);

    buf.extend_from_slice(&query.id.to_be_bytes());
    buf.extend_from_slice(&[0x81, 0x80]);
    buf.extend_from_slice(&1u16.to_be_bytes());
    buf.extend_from_slice(&1u16.to_be_bytes());
    buf.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);

    buf.extend_from_slice(question);

    buf.extend_from_slice(&[0xC0, 0x0C]);
    buf.extend_from_slice(&[0x00, 0x01]); // A
    buf.extend_from_slice(&[0x00, 0x01]); // IN
    buf.extend_from_slice(&SPOOF_TTL.to_be_bytes());
    buf.extend_from_slice(&[0x00, 0x04]);
    buf.extend_from_slice(&target.octets());

    Some(buf)
}
