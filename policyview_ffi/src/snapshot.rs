//! Binary overlay snapshot format.
//!
//! ```text
//! [u32 magic = "VOV1"][u32 version = 1][u32 count]
//! repeated count times:
//!   [u32 keylen][key bytes...][u8 expanded]
//! ```
//! All integers little-endian.

use thiserror::Error;

use policyview_presenter::{OverlaySnapshot, ViewState};

pub const SNAP_MAGIC: u32 = 0x3156_4F56; // "VOV1" little-endian
pub const SNAP_VERSION: u32 = 1;
pub const SNAP_HEADER_LEN: usize = 12;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("snapshot header truncated")]
    TruncatedHeader,
    #[error("bad snapshot magic {0:#010x}")]
    BadMagic(u32),
    #[error("unsupported snapshot version {0}")]
    UnsupportedVersion(u32),
    #[error("entry {0}: key length truncated")]
    TruncatedKeyLen(usize),
    #[error("entry {0}: key runs past end of buffer")]
    KeyOutOfBounds(usize),
    #[error("entry {0}: key is not valid UTF-8")]
    KeyUtf8(usize),
    #[error("entry {0}: view flags truncated")]
    TruncatedFlags(usize),
}

impl SnapshotError {
    /// FFI return code for this error.
    pub fn rc(&self) -> i32 {
        match self {
            SnapshotError::TruncatedHeader => -10,
            SnapshotError::BadMagic(_) => -11,
            SnapshotError::UnsupportedVersion(_) => -12,
            SnapshotError::TruncatedKeyLen(_) => -13,
            SnapshotError::KeyOutOfBounds(_) => -14,
            SnapshotError::KeyUtf8(_) => -15,
            SnapshotError::TruncatedFlags(_) => -16,
        }
    }
}

pub fn encode(snap: &OverlaySnapshot) -> Vec<u8> {
    let mut buf: Vec<u8> = Vec::new();
    buf.extend_from_slice(&SNAP_MAGIC.to_le_bytes());
    buf.extend_from_slice(&SNAP_VERSION.to_le_bytes());
    buf.extend_from_slice(&(snap.states.len() as u32).to_le_bytes());

    for (key, state) in &snap.states {
        let kb = key.as_bytes();
        buf.extend_from_slice(&(kb.len() as u32).to_le_bytes());
        buf.extend_from_slice(kb);
        buf.push(state.expanded as u8);
    }
    buf
}

struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize) -> Option<&'a [u8]> {
        let end = self.pos.checked_add(n)?;
        let out = self.data.get(self.pos..end)?;
        self.pos = end;
        Some(out)
    }

    fn u32(&mut self) -> Option<u32> {
        let b = self.take(4)?;
        Some(u32::from_le_bytes(b.try_into().ok()?))
    }

    fn u8(&mut self) -> Option<u8> {
        self.take(1).map(|b| b[0])
    }
}

pub fn decode(data: &[u8]) -> Result<OverlaySnapshot, SnapshotError> {
    let mut r = Reader { data, pos: 0 };

    let magic = r.u32().ok_or(SnapshotError::TruncatedHeader)?;
    if magic != SNAP_MAGIC {
        return Err(SnapshotError::BadMagic(magic));
    }
    let ver = r.u32().ok_or(SnapshotError::TruncatedHeader)?;
    if ver != SNAP_VERSION {
        return Err(SnapshotError::UnsupportedVersion(ver));
    }
    let count = r.u32().ok_or(SnapshotError::TruncatedHeader)? as usize;

    // Each entry is at least 5 bytes; don't trust `count` for the allocation.
    let mut states = Vec::with_capacity(count.min(data.len() / 5));
    for idx in 0..count {
        let klen = r.u32().ok_or(SnapshotError::TruncatedKeyLen(idx))? as usize;
        let kb = r.take(klen).ok_or(SnapshotError::KeyOutOfBounds(idx))?;
        let key = std::str::from_utf8(kb)
            .map_err(|_| SnapshotError::KeyUtf8(idx))?
            .to_string();
        let flags = r.u8().ok_or(SnapshotError::TruncatedFlags(idx))?;

        states.push((key, ViewState { expanded: flags & 1 != 0 }));
    }

    Ok(OverlaySnapshot { states })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_then_decode() {
        let snap = OverlaySnapshot {
            states: vec![
                ("index:0".to_string(), ViewState { expanded: false }),
                ("policy:P-12345678".to_string(), ViewState { expanded: true }),
            ],
        };
        let bytes = encode(&snap);
        assert_eq!(&bytes[..4], b"VOV1");
        assert_eq!(decode(&bytes), Ok(snap));
    }

    #[test]
    fn rejects_damage() {
        let snap = OverlaySnapshot {
            states: vec![("P-1".to_string(), ViewState { expanded: true })],
        };
        let bytes = encode(&snap);

        assert_eq!(decode(&bytes[..8]), Err(SnapshotError::TruncatedHeader));
        assert_eq!(decode(&bytes[..bytes.len() - 1]), Err(SnapshotError::TruncatedFlags(0)));
        assert_eq!(decode(&bytes[..14]), Err(SnapshotError::TruncatedKeyLen(0)));
        assert_eq!(decode(&bytes[..17]), Err(SnapshotError::KeyOutOfBounds(0)));

        let mut bad = bytes.clone();
        bad[4] = 2;
        assert_eq!(decode(&bad), Err(SnapshotError::UnsupportedVersion(2)));

        let mut bad = bytes;
        bad[16] = 0xff;
        assert_eq!(decode(&bad), Err(SnapshotError::KeyUtf8(0)));
    }
}
