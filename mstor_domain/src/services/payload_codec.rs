//! Packing of the per-entry stat record returned by `listdir` and `stat`.
//!
//! Each entry is a self-describing record: a `u16` total length, a fixed
//! header of numeric fields, and a NUL-terminated name — so a reader can
//! walk a `listdir` response without knowing the name lengths in advance,
//! the way the original `add_stat_to_list`/`mmm_stat_hdr` pairing works.

use crate::entities::node::NodePayload;
use crate::error::MstorError;

/// Bytes in the fixed portion of a stat record, before the name.
pub const STAT_HEADER_LEN: usize = 2 + 2 + 4 + 8 + 8 + 8 + 1 + 4 + 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatRecord {
    pub mode_and_type: u16,
    pub mtime: u64,
    pub atime: u64,
    pub length: u64,
    pub man_repl: u8,
    pub uid: u32,
    pub gid: u32,
    pub name: String,
}

impl StatRecord {
    pub fn from_node(name: &str, node: &NodePayload, man_repl: u8) -> Self {
        StatRecord {
            mode_and_type: node.mode_and_type.0,
            mtime: node.mtime,
            atime: node.atime,
            length: node.length,
            man_repl,
            uid: node.uid,
            gid: node.gid,
            name: name.to_string(),
        }
    }

    /// Encoded length of this record, including its own `u16` length
    /// prefix.
    pub fn encoded_len(&self) -> usize {
        STAT_HEADER_LEN + self.name.len() + 1
    }

    pub fn encode(&self) -> Result<Vec<u8>, MstorError> {
        let len = self.encoded_len();
        if len > u16::MAX as usize {
            return Err(MstorError::name_too_long(self.name.clone()));
        }
        let mut buf = Vec::with_capacity(len);
        buf.extend_from_slice(&(len as u16).to_be_bytes());
        buf.extend_from_slice(&self.mode_and_type.to_be_bytes());
        buf.extend_from_slice(&0u32.to_be_bytes()); // block_sz, reserved
        buf.extend_from_slice(&self.mtime.to_be_bytes());
        buf.extend_from_slice(&self.atime.to_be_bytes());
        buf.extend_from_slice(&self.length.to_be_bytes());
        buf.push(self.man_repl);
        buf.extend_from_slice(&self.uid.to_be_bytes());
        buf.extend_from_slice(&self.gid.to_be_bytes());
        buf.extend_from_slice(self.name.as_bytes());
        buf.push(0);
        Ok(buf)
    }

    pub fn decode(bytes: &[u8]) -> Result<(Self, usize), MstorError> {
        if bytes.len() < 2 {
            return Err(MstorError::corruption("stat record truncated"));
        }
        let total_len = u16::from_be_bytes(bytes[0..2].try_into().unwrap()) as usize;
        if bytes.len() < total_len || total_len < STAT_HEADER_LEN + 1 {
            return Err(MstorError::corruption("stat record length out of range"));
        }
        let body = &bytes[2..total_len];
        let mode_and_type = u16::from_be_bytes(body[0..2].try_into().unwrap());
        let mtime = u64::from_be_bytes(body[6..14].try_into().unwrap());
        let atime = u64::from_be_bytes(body[14..22].try_into().unwrap());
        let length = u64::from_be_bytes(body[22..30].try_into().unwrap());
        let man_repl = body[30];
        let uid = u32::from_be_bytes(body[31..35].try_into().unwrap());
        let gid = u32::from_be_bytes(body[35..39].try_into().unwrap());
        let name_bytes = &body[39..body.len() - 1];
        let name = std::str::from_utf8(name_bytes)
            .map_err(|_| MstorError::corruption("stat record name is not utf8"))?
            .to_string();
        Ok((
            StatRecord {
                mode_and_type,
                mtime,
                atime,
                length,
                man_repl,
                uid,
                gid,
                name,
            },
            total_len,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::mode::Mode;

    #[test]
    fn encode_decode_round_trips() {
        let node = NodePayload {
            mtime: 1,
            atime: 2,
            length: 3,
            uid: 4,
            gid: 5,
            mode_and_type: Mode::new(0o755, true),
        };
        let rec = StatRecord::from_node("subdir", &node, 3);
        let encoded = rec.encode().unwrap();
        let (decoded, consumed) = StatRecord::decode(&encoded).unwrap();
        assert_eq!(consumed, encoded.len());
        assert_eq!(rec, decoded);
    }

    #[test]
    fn successive_records_are_length_prefixed_for_streaming() {
        let node = NodePayload {
            mtime: 0,
            atime: 0,
            length: 0,
            uid: 0,
            gid: 0,
            mode_and_type: Mode::new(0o644, false),
        };
        let a = StatRecord::from_node("a", &node, 2).encode().unwrap();
        let b = StatRecord::from_node("bb", &node, 2).encode().unwrap();
        let mut buf = a.clone();
        buf.extend_from_slice(&b);
        let (first, off) = StatRecord::decode(&buf).unwrap();
        assert_eq!(first.name, "a");
        let (second, _) = StatRecord::decode(&buf[off..]).unwrap();
        assert_eq!(second.name, "bb");
    }
}
