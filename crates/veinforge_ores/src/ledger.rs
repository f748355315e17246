//! # Region Ledger
//!
//! Durable bookkeeping of which regions have already been written into the
//! host world's tile storage. This is separate from the region cache: the
//! cache dies with the session, the ledger is saved with the world.
//!
//! Only 32-bit region hashes are persisted. Within a session the ledger
//! also remembers which region produced each hash it recorded, so a
//! collision between two distinct regions is reported instead of silently
//! treating the second region as already written.
//!
//! ## Snapshot Format
//!
//! ```text
//! LZ4 block (size-prepended) of:
//! [4 bytes: magic "VFLG"]
//! [4 bytes: version]
//! [4 bytes: hash count N]
//! [N * 4 bytes: i32 hashes, little-endian, ascending]
//! [4 bytes: CRC32 of above]
//! ```

use std::collections::{HashMap, HashSet};

use lz4_flex::{compress_prepend_size, decompress_size_prepended};
use serde::{Deserialize, Serialize};

use crate::error::{OreError, OreResult};
use crate::region::RegionKey;

/// Magic bytes identifying a ledger snapshot.
const SNAPSHOT_MAGIC: &[u8; 4] = b"VFLG";

/// Current snapshot format version.
const SNAPSHOT_VERSION: u32 = 1;

/// Header (magic + version + count) length in bytes.
const HEADER_LEN: usize = 12;

/// Upper bound on LZ4 block expansion (one length byte encodes 255 bytes).
const MAX_EXPANSION: usize = 255;

/// 32-bit hash of a region identity.
///
/// Polynomial hash over `(x, z, dimension)` with multiplier 31 and seed 1,
/// in wrapping `i32` arithmetic. Existing world saves store exactly these
/// values, so the formula must not change.
#[must_use]
pub const fn region_hash(key: RegionKey) -> i32 {
    let mut hash: i32 = 1;
    hash = hash.wrapping_mul(31).wrapping_add(key.region.x);
    hash = hash.wrapping_mul(31).wrapping_add(key.region.z);
    hash = hash.wrapping_mul(31).wrapping_add(key.dimension.value());
    hash
}

/// Set of region hashes already written into the world.
#[derive(Debug, Default)]
pub struct RegionLedger {
    recorded: HashSet<i32>,
    owners: HashMap<i32, RegionKey>,
}

impl RegionLedger {
    /// Creates an empty ledger (every hash unrecorded).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a raw hash. Returns true if it was not recorded before.
    pub fn mark_recorded(&mut self, hash: i32) -> bool {
        self.recorded.insert(hash)
    }

    /// Returns true if `hash` has not been recorded.
    #[must_use]
    pub fn is_unrecorded(&self, hash: i32) -> bool {
        !self.recorded.contains(&hash)
    }

    /// Returns true if the region's hash has not been recorded.
    #[must_use]
    pub fn is_region_unrecorded(&self, key: RegionKey) -> bool {
        self.is_unrecorded(region_hash(key))
    }

    /// Checks that recording `key` would not collide with another region
    /// recorded this session.
    ///
    /// # Errors
    ///
    /// Returns `HashCollision` if a different region already owns the hash.
    pub fn check_region(&self, key: RegionKey) -> OreResult<()> {
        let hash = region_hash(key);
        match self.owners.get(&hash) {
            Some(&existing) if existing != key => {
                tracing::warn!(
                    "Region hash collision {}: {:?} vs {:?}",
                    hash,
                    existing,
                    key
                );
                Err(OreError::HashCollision {
                    hash,
                    existing,
                    incoming: key,
                })
            }
            _ => Ok(()),
        }
    }

    /// Records a region. Returns true if its hash was not recorded before.
    ///
    /// # Errors
    ///
    /// Returns `HashCollision` (and records nothing) if a different region
    /// recorded the same hash this session.
    pub fn record_region(&mut self, key: RegionKey) -> OreResult<bool> {
        self.check_region(key)?;
        let hash = region_hash(key);
        self.owners.insert(hash, key);
        Ok(self.mark_recorded(hash))
    }

    /// Number of recorded hashes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.recorded.len()
    }

    /// Returns true if nothing is recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.recorded.is_empty()
    }

    /// Recorded hashes, unordered.
    pub fn hashes(&self) -> impl Iterator<Item = i32> + '_ {
        self.recorded.iter().copied()
    }

    /// Copies the recorded set for persistence.
    #[must_use]
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot::from_hashes(self.hashes())
    }

    /// Replaces the recorded set with a persisted one (world load).
    pub fn restore(&mut self, snapshot: &LedgerSnapshot) {
        self.recorded.clear();
        self.owners.clear();
        self.recorded.extend(snapshot.hashes.iter().copied());
    }
}

/// Persisted form of the ledger: a sorted, duplicate-free hash list.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Recorded region hashes, ascending.
    pub hashes: Vec<i32>,
}

impl LedgerSnapshot {
    /// Builds a snapshot from any hash sequence (sorted and deduplicated).
    #[must_use]
    pub fn from_hashes(hashes: impl IntoIterator<Item = i32>) -> Self {
        let mut hashes: Vec<i32> = hashes.into_iter().collect();
        hashes.sort_unstable();
        hashes.dedup();
        Self { hashes }
    }

    /// Encodes to the compressed binary format.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotTooLarge` if the hash count does not fit the `u32`
    /// count field.
    pub fn encode(&self) -> OreResult<Vec<u8>> {
        let count = encoded_count(self.hashes.len())?;
        let mut buf = Vec::with_capacity(HEADER_LEN + self.hashes.len() * 4 + 4);
        buf.extend_from_slice(SNAPSHOT_MAGIC);
        buf.extend_from_slice(&SNAPSHOT_VERSION.to_le_bytes());
        buf.extend_from_slice(&count.to_le_bytes());
        for hash in &self.hashes {
            buf.extend_from_slice(&hash.to_le_bytes());
        }
        let crc = crc32fast::hash(&buf);
        buf.extend_from_slice(&crc.to_le_bytes());
        Ok(compress_prepend_size(&buf))
    }

    /// Decodes the compressed binary format.
    ///
    /// # Errors
    ///
    /// Returns `CorruptSnapshot` on bad compression, magic, version, length
    /// or checksum.
    pub fn decode(data: &[u8]) -> OreResult<Self> {
        check_declared_size(data)?;
        let buf = decompress_size_prepended(data)
            .map_err(|e| OreError::CorruptSnapshot(format!("decompression failed: {e}")))?;

        if buf.len() < HEADER_LEN + 4 {
            return Err(OreError::CorruptSnapshot(format!(
                "snapshot too short: {} bytes",
                buf.len()
            )));
        }
        if &buf[0..4] != SNAPSHOT_MAGIC {
            return Err(OreError::CorruptSnapshot("invalid magic".to_string()));
        }

        let version = u32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]);
        if version != SNAPSHOT_VERSION {
            return Err(OreError::CorruptSnapshot(format!(
                "unsupported version: {version}"
            )));
        }

        let count = u32::from_le_bytes([buf[8], buf[9], buf[10], buf[11]]) as usize;
        let body_len = HEADER_LEN + count * 4;
        if buf.len() != body_len + 4 {
            return Err(OreError::CorruptSnapshot(format!(
                "length mismatch: {count} hashes but {} bytes",
                buf.len()
            )));
        }

        let (body, crc_bytes) = buf.split_at(body_len);
        let stored_crc =
            u32::from_le_bytes([crc_bytes[0], crc_bytes[1], crc_bytes[2], crc_bytes[3]]);
        if crc32fast::hash(body) != stored_crc {
            return Err(OreError::CorruptSnapshot("CRC mismatch".to_string()));
        }

        let hashes = body[HEADER_LEN..]
            .chunks_exact(4)
            .map(|b| i32::from_le_bytes([b[0], b[1], b[2], b[3]]));
        Ok(Self::from_hashes(hashes))
    }
}

fn encoded_count(len: usize) -> OreResult<u32> {
    u32::try_from(len).map_err(|_| OreError::SnapshotTooLarge(len))
}

/// Rejects a size prefix that no LZ4 block of this length can produce,
/// before anything is allocated for it.
fn check_declared_size(data: &[u8]) -> OreResult<()> {
    if data.len() < 4 {
        return Err(OreError::CorruptSnapshot(format!(
            "snapshot too short: {} bytes",
            data.len()
        )));
    }
    let declared = u32::from_le_bytes([data[0], data[1], data[2], data[3]]) as usize;
    let block_len = data.len() - 4;
    let limit = block_len.saturating_mul(MAX_EXPANSION);
    if declared > limit {
        return Err(OreError::CorruptSnapshot(format!(
            "declared size {declared} exceeds {limit} for a {block_len} byte block"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use veinforge_shared::{DimensionId, RegionCoord};

    fn key(x: i32, z: i32, dim: i32) -> RegionKey {
        RegionKey::new(RegionCoord::new(x, z), DimensionId(dim))
    }

    #[test]
    fn test_region_hash_values() {
        // 31 * (31 * (31 + x) + z) + dim
        assert_eq!(region_hash(key(0, 0, 0)), 29_791);
        assert_eq!(region_hash(key(1, 2, 3)), (32 * 31 + 2) * 31 + 3);
        assert_eq!(region_hash(key(-1, -1, 0)), 31 * (31 * 30 - 1));
        let _ = region_hash(key(i32::MAX, i32::MIN, i32::MAX));
    }

    #[test]
    fn test_fresh_ledger_has_nothing_recorded() {
        let ledger = RegionLedger::new();
        for hash in [i32::MIN, -1, 0, 1, 29_791, i32::MAX] {
            assert!(ledger.is_unrecorded(hash));
        }
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_mark_recorded() {
        let mut ledger = RegionLedger::new();
        assert!(ledger.mark_recorded(42));
        assert!(!ledger.mark_recorded(42));
        assert!(!ledger.is_unrecorded(42));
        assert!(ledger.is_unrecorded(43));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_detects_collision() {
        // (0, 31, 0) and (1, 0, 0) share a hash: 31*(31*31 + 31) = 31*(31*32)
        let a = key(0, 31, 0);
        let b = key(1, 0, 0);
        assert_eq!(region_hash(a), region_hash(b));

        let mut ledger = RegionLedger::new();
        assert!(ledger.record_region(a).unwrap());
        assert!(!ledger.record_region(a).unwrap());

        let err = ledger.record_region(b).unwrap_err();
        assert_eq!(
            err,
            OreError::HashCollision {
                hash: region_hash(a),
                existing: a,
                incoming: b,
            }
        );
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_restore_replaces_set() {
        let mut ledger = RegionLedger::new();
        ledger.mark_recorded(1);
        ledger.restore(&LedgerSnapshot::from_hashes([5, 3, 5]));
        assert!(ledger.is_unrecorded(1));
        assert!(!ledger.is_unrecorded(3));
        assert_eq!(ledger.snapshot().hashes, vec![3, 5]);
    }

    #[test]
    fn test_snapshot_codec() {
        let snapshot = LedgerSnapshot::from_hashes([i32::MIN, -7, 0, 29_791, i32::MAX]);
        let decoded = LedgerSnapshot::decode(&snapshot.encode().unwrap()).unwrap();
        assert_eq!(decoded, snapshot);

        let empty = LedgerSnapshot::default();
        assert_eq!(LedgerSnapshot::decode(&empty.encode().unwrap()).unwrap(), empty);
    }

    #[test]
    fn test_snapshot_rejects_corruption() {
        let snapshot = LedgerSnapshot::from_hashes([1, 2, 3]);
        let raw = decompress_size_prepended(&snapshot.encode().unwrap()).unwrap();

        let mut flipped = raw.clone();
        flipped[HEADER_LEN] ^= 0xFF;
        assert!(matches!(
            LedgerSnapshot::decode(&compress_prepend_size(&flipped)),
            Err(OreError::CorruptSnapshot(_))
        ));

        let mut bad_magic = raw.clone();
        bad_magic[0] = b'X';
        assert!(LedgerSnapshot::decode(&compress_prepend_size(&bad_magic)).is_err());

        let truncated = &raw[..raw.len() - 2];
        assert!(LedgerSnapshot::decode(&compress_prepend_size(truncated)).is_err());

        assert!(LedgerSnapshot::decode(&[1, 2, 3]).is_err());
    }

    #[test]
    fn test_snapshot_rejects_oversized_prefix() {
        let mut data = u32::MAX.to_le_bytes().to_vec();
        data.extend_from_slice(&[0x10, 0x00, 0x00, 0x00]);
        let err = LedgerSnapshot::decode(&data).unwrap_err();
        assert!(
            matches!(&err, OreError::CorruptSnapshot(msg) if msg.contains("declared size")),
            "{err}"
        );

        let valid = LedgerSnapshot::from_hashes(0..1000).encode().unwrap();
        assert!(check_declared_size(&valid).is_ok());
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_count_must_fit_u32() {
        assert_eq!(encoded_count(3), Ok(3));
        let len = u32::MAX as usize + 1;
        assert_eq!(encoded_count(len), Err(OreError::SnapshotTooLarge(len)));
    }
}
