const HEADER_LEN: usize = 12;
const MAX_LABEL_LEN: usize = 63;

/// Read-only view over one received datagram.
///
/// Parsing never fails past the header: a question that cannot be delimited
/// leaves `question_end` empty and the domain blank.
#[derive(Debug)]
pub struct DnsQuery<'a> {
    bytes: &'a [u8],
    pub id: u16,
    pub opcode: u8,
    pub is_response: bool,
    /// Byte offset where the first question (name, type, class) ends.
    pub question_end: Option<usize>,
    pub domain: String,
}

impl<'a> DnsQuery<'a> {
    /// Returns `None` only when the datagram is shorter than a DNS header.
    pub fn parse(bytes: &'a [u8]) -> Option<Self> {
        if bytes.len() < HEADER_LEN {
            return None;
        }

        let id = u16::from_be_bytes([bytes[0], bytes[1]]);
        let is_response = bytes[2] & 0x80 != 0;
        let opcode = (bytes[2] >> 3) & 0x0F;

        Some(Self {
            bytes,
            id,
            opcode,
            is_response,
            question_end: question_end(bytes),
            domain: parse_domain(bytes, HEADER_LEN),
        })
    }

    pub fn is_standard_query(&self) -> bool {
        !self.is_response && self.opcode == 0
    }

    /// The first question exactly as the client sent it.
    pub fn question(&self) -> Option<&'a [u8]> {
        self.question_end.map(|end| &self.bytes[HEADER_LEN..end])
    }

    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }
}

fn question_end(bytes: &[u8]) -> Option<usize> {
    let mut pos = HEADER_LEN;
    loop {
        let label_len = *bytes.get(pos)? as usize;
        if label_len == 0 {
            pos += 1;
            break;
        }
        if label_len > MAX_LABEL_LEN {
            return None;
        }
        pos += 1 + label_len;
    }

    let end = pos + 4;
    if end > bytes.len() {
        return None;
    }
    Some(end)
}

/// Decodes a label-encoded name starting at `offset`. Anything malformed
/// (a label running past the end, a compression pointer, missing terminator)
/// yields an empty string.
pub fn parse_domain(bytes: &[u8], offset: usize) -> String {
    let mut labels: Vec<String> = Vec::new();
    let mut pos = offset;

    loop {
        let Some(&len) = bytes.get(pos) else {
            return String::new();
        };
        let len = len as usize;
        if len == 0 {
            break;
        }
        if len > MAX_LABEL_LEN {
            return String::new();
        }
        let Some(label) = bytes.get(pos + 1..pos + 1 + len) else {
            return String::new();
        };
        labels.push(String::from_utf8_lossy(label).into_owned());
        pos += len + 1;
    }

    labels.join(".")
}

/// Label-encodes a dotted name. Returns `None` when a label is empty or
/// longer than 63 bytes.
pub fn encode_domain(domain: &str) -> Option<Vec<u8>> {
    let trimmed = domain.trim_end_matches('.');
    let mut out = Vec::with_capacity(trimmed.len() + 2);

    if !trimmed.is_empty() {
        for label in trimmed.split('.') {
            if label.is_empty() || label.len() > MAX_LABEL_LEN {
                return None;
            }
            out.push(label.len() as u8);
            out.extend_from_slice(label.as_bytes());
        }
    }

    out.push(0);
    Some(out)
}
