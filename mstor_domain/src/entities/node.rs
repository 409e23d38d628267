//! The node payload stored under every `n`-family key.

use crate::error::MstorError;
use crate::value_objects::mode::Mode;

/// mtime(8) + atime(8) + length(8) + uid(4) + gid(4) + mode_and_type(2),
/// packed with no padding, matching the original `struct mnode_payload`.
pub const NODE_PAYLOAD_LEN: usize = 34;

/// Fixed-layout metadata carried by every file or directory node.
///
/// Field order matches the original `struct mnode_payload` exactly:
/// mtime, atime, length (each `u64`), uid, gid (each `u32`), then the
/// packed mode-and-type `u16`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodePayload {
    pub mtime: u64,
    pub atime: u64,
    pub length: u64,
    pub uid: u32,
    pub gid: u32,
    pub mode_and_type: Mode,
}

impl NodePayload {
    pub fn new_file(mtime: u64, atime: u64, uid: u32, gid: u32, perm_bits: u16) -> Self {
        NodePayload {
            mtime,
            atime,
            length: 0,
            uid,
            gid,
            mode_and_type: Mode::new(perm_bits, false),
        }
    }

    pub fn new_dir(mtime: u64, atime: u64, uid: u32, gid: u32, perm_bits: u16) -> Self {
        NodePayload {
            mtime,
            atime,
            length: 0,
            uid,
            gid,
            mode_and_type: Mode::new(perm_bits, true),
        }
    }

    pub fn encode(&self) -> [u8; NODE_PAYLOAD_LEN] {
        let mut buf = [0u8; NODE_PAYLOAD_LEN];
        buf[0..8].copy_from_slice(&self.mtime.to_be_bytes());
        buf[8..16].copy_from_slice(&self.atime.to_be_bytes());
        buf[16..24].copy_from_slice(&self.length.to_be_bytes());
        buf[24..28].copy_from_slice(&self.uid.to_be_bytes());
        buf[28..32].copy_from_slice(&self.gid.to_be_bytes());
        buf[32..34].copy_from_slice(&self.mode_and_type.0.to_be_bytes());
        buf
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, MstorError> {
        if bytes.len() != NODE_PAYLOAD_LEN {
            return Err(MstorError::corruption(format!(
                "node payload has wrong length: {}",
                bytes.len()
            )));
        }
        let mtime = u64::from_be_bytes(bytes[0..8].try_into().unwrap());
        let atime = u64::from_be_bytes(bytes[8..16].try_into().unwrap());
        let length = u64::from_be_bytes(bytes[16..24].try_into().unwrap());
        let uid = u32::from_be_bytes(bytes[24..28].try_into().unwrap());
        let gid = u32::from_be_bytes(bytes[28..32].try_into().unwrap());
        let mode_and_type = Mode(u16::from_be_bytes(bytes[32..34].try_into().unwrap()));
        Ok(NodePayload {
            mtime,
            atime,
            length,
            uid,
            gid,
            mode_and_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_dir_sets_is_dir_flag() {
        let n = NodePayload::new_dir(1, 1, 0, 0, 0o755);
        assert!(n.mode_and_type.is_dir());
    }

    #[test]
    fn new_file_is_not_dir() {
        let n = NodePayload::new_file(1, 1, 0, 0, 0o644);
        assert!(!n.mode_and_type.is_dir());
    }

    #[test]
    fn encode_decode_round_trips() {
        let n = NodePayload {
            mtime: 123,
            atime: 456,
            length: 789,
            uid: 10,
            gid: 20,
            mode_and_type: Mode::new(0o640, false),
        };
        let bytes = n.encode();
        assert_eq!(bytes.len(), NODE_PAYLOAD_LEN);
        let back = NodePayload::decode(&bytes).unwrap();
        assert_eq!(n, back);
    }

    #[test]
    fn decode_rejects_wrong_length() {
        assert!(NodePayload::decode(&[0u8; 10]).is_err());
    }
}
