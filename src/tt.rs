//! Shared, lock-free transposition table.
//!
//! Fixed-capacity array of 3-entry buckets indexed by the position key
//! modulo the table's power-of-two size. Entries are written without
//! any synchronization between search threads (the source this crate's
//! design follows does the same): a torn read is made detectable by
//! storing each entry's key fragment XORed against its data word, so a
//! reader that observes a half-written slot reconstructs a key that
//! won't match the position it's probing and treats it as a miss
//! rather than trusting garbage.

use std::mem;
use std::sync::atomic::{AtomicU16, AtomicU64, Ordering};

use crate::position::Move;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound {
    None,
    Exact,
    Lower,
    Upper,
}

impl Bound {
    const fn to_bits(self) -> u64 {
        match self {
            Bound::None => 0,
            Bound::Exact => 1,
            Bound::Lower => 2,
            Bound::Upper => 3,
        }
    }

    const fn from_bits(bits: u64) -> Bound {
        match bits & 0b11 {
            1 => Bound::Exact,
            2 => Bound::Lower,
            3 => Bound::Upper,
            _ => Bound::None,
        }
    }
}

/// A decoded transposition-table hit.
#[derive(Clone, Copy, Debug)]
pub struct TtEntry {
    pub eval: i16,
    pub score: i16,
    pub best_move: Move,
    pub depth: u8,
    pub bound: Bound,
}

const AGE_BITS: u64 = 6;
const AGE_MASK: u64 = (1 << AGE_BITS) - 1;

fn pack(entry: &TtEntry, entry_age: u16) -> u64 {
    let eval = entry.eval as u16 as u64;
    let score = entry.score as u16 as u64;
    let mv = entry.best_move.raw() as u64;
    let depth = entry.depth as u64;
    let bound = entry.bound.to_bits();
    let age = (entry_age as u64) & AGE_MASK;
    eval | (score << 16) | (mv << 32) | (depth << 48) | (bound << 56) | (age << 58)
}

fn unpack(data: u64) -> (TtEntry, u16) {
    let eval = (data & 0xFFFF) as u16 as i16;
    let score = ((data >> 16) & 0xFFFF) as u16 as i16;
    let mv = Move::from_raw(((data >> 32) & 0xFFFF) as u16);
    let depth = ((data >> 48) & 0xFF) as u8;
    let bound = Bound::from_bits((data >> 56) & 0b11);
    let age = ((data >> 58) & AGE_MASK) as u16;
    (
        TtEntry {
            eval,
            score,
            best_move: mv,
            depth,
            bound,
        },
        age,
    )
}

struct Slot {
    /// `key_fragment XOR data`. Combined with `data`, lets a reader
    /// recover the fragment without a separate locked critical section.
    xor_word: AtomicU64,
    data: AtomicU64,
}

impl Slot {
    fn empty() -> Self {
        Slot {
            xor_word: AtomicU64::new(0),
            data: AtomicU64::new(0),
        }
    }

    fn load(&self) -> (u16, u64) {
        let data = self.data.load(Ordering::Relaxed);
        let xor_word = self.xor_word.load(Ordering::Relaxed);
        ((xor_word ^ data) as u16, data)
    }

    fn store(&self, key_fragment: u16, data: u64) {
        self.data.store(data, Ordering::Relaxed);
        self.xor_word.store((key_fragment as u64) ^ data, Ordering::Relaxed);
    }
}

struct Bucket {
    slots: [Slot; 3],
    /// Global age as of this bucket's most recent write; not used by
    /// the replacement formula directly (that's per-entry, see
    /// `priority` below), but lets `hashfull`-style diagnostics skip
    /// decoding every slot in an obviously cold bucket.
    age: AtomicU16,
}

impl Bucket {
    fn empty() -> Self {
        Bucket {
            slots: [Slot::empty(), Slot::empty(), Slot::empty()],
            age: AtomicU16::new(0),
        }
    }
}

const AGE_PRIORITY_WEIGHT: i32 = 1;

fn priority(depth: u8, age_delta: u16) -> i32 {
    i32::from(depth) * 2 - i32::from(age_delta) * AGE_PRIORITY_WEIGHT
}

pub struct TranspositionTable {
    buckets: Vec<Bucket>,
    mask: usize,
    current_age: AtomicU16,
}

impl TranspositionTable {
    /// Build a table sized to fit `size_mb` megabytes, rounded down to
    /// a power-of-two bucket count.
    ///
    /// # Errors
    /// Returns [`crate::error::EngineError::TtTooSmall`] if `size_mb`
    /// doesn't fit even one bucket.
    pub fn new(size_mb: usize) -> Result<Self, crate::error::EngineError> {
        let bucket_size = mem::size_of::<Bucket>();
        let bytes = size_mb.saturating_mul(1024 * 1024);
        let num_buckets = (bytes / bucket_size).next_power_of_two() / 2;
        if num_buckets == 0 {
            return Err(crate::error::EngineError::TtTooSmall { requested_mb: size_mb });
        }
        let mut buckets = Vec::with_capacity(num_buckets);
        buckets.resize_with(num_buckets, Bucket::empty);
        #[cfg(feature = "logging")]
        log::debug!("allocated transposition table: {num_buckets} buckets ({size_mb}MB requested)");
        Ok(TranspositionTable {
            buckets,
            mask: num_buckets - 1,
            current_age: AtomicU16::new(0),
        })
    }

    fn index(&self, key: u64) -> usize {
        (key as usize) & self.mask
    }

    /// Advance the table-wide age counter. Called once at the start of
    /// each root iteration so replacement can tell recent entries from
    /// stale ones left over from earlier searches.
    pub fn new_search(&self) {
        self.current_age.fetch_add(1, Ordering::Relaxed);
    }

    #[must_use]
    pub fn probe(&self, key: u64) -> Option<TtEntry> {
        let bucket = &self.buckets[self.index(key)];
        let fragment = (key & 0xFFFF) as u16;
        for slot in &bucket.slots {
            let (stored_fragment, data) = slot.load();
            if data != 0 && stored_fragment == fragment {
                let (entry, _age) = unpack(data);
                return Some(entry);
            }
        }
        None
    }

    pub fn store(&self, key: u64, entry: TtEntry) {
        let bucket = &self.buckets[self.index(key)];
        let fragment = (key & 0xFFFF) as u16;
        let current_age = self.current_age.load(Ordering::Relaxed);
        bucket.age.store(current_age, Ordering::Relaxed);

        for slot in &bucket.slots {
            let (stored_fragment, data) = slot.load();
            if data != 0 && stored_fragment == fragment {
                slot.store(fragment, pack(&entry, current_age));
                return;
            }
        }

        for slot in &bucket.slots {
            let (_stored_fragment, data) = slot.load();
            if data == 0 {
                slot.store(fragment, pack(&entry, current_age));
                return;
            }
        }

        let mut replace_idx = 0;
        let mut worst = i32::MAX;
        let mut worst_is_exact = false;
        for (idx, slot) in bucket.slots.iter().enumerate() {
            let (_stored_fragment, data) = slot.load();
            let (existing, age) = unpack(data);
            let age_delta = current_age.wrapping_sub(age);
            let p = priority(existing.depth, age_delta);
            let is_exact = existing.bound == Bound::Exact;
            if idx == 0 || p < worst || (p == worst && worst_is_exact && !is_exact) {
                replace_idx = idx;
                worst = p;
                worst_is_exact = is_exact;
            }
        }
        bucket.slots[replace_idx].store(fragment, pack(&entry, current_age));
    }

    #[must_use]
    pub fn hashfull_per_mille(&self) -> u32 {
        let sample = self.buckets.len().min(1000).max(1);
        let mut occupied = 0u32;
        for bucket in self.buckets.iter().take(sample) {
            for slot in &bucket.slots {
                if slot.data.load(Ordering::Relaxed) != 0 {
                    occupied += 1;
                }
            }
        }
        (occupied * 1000) / (sample as u32 * 3)
    }

    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            *bucket = Bucket::empty();
        }
        self.current_age.store(0, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::{Move, MoveFlag, Square};

    fn sample_entry(depth: u8, score: i16) -> TtEntry {
        TtEntry {
            eval: 17,
            score,
            best_move: Move::new(Square::new(12), Square::new(28), MoveFlag::DoublePawnPush),
            depth,
            bound: Bound::Exact,
        }
    }

    #[test]
    fn store_then_probe_round_trips() {
        let tt = TranspositionTable::new(1).unwrap();
        let key = 0xDEAD_BEEF_0000_1234u64;
        tt.store(key, sample_entry(5, 123));
        let hit = tt.probe(key).unwrap();
        assert_eq!(hit.depth, 5);
        assert_eq!(hit.score, 123);
        assert_eq!(hit.bound, Bound::Exact);
    }

    #[test]
    fn probe_misses_on_different_key_same_bucket() {
        let tt = TranspositionTable::new(1).unwrap();
        let key_a = 0x0000_0000_0000_0001u64;
        let key_b = key_a | (1u64 << 32); // same low 16 bits, different fragment-adjacent bits won't matter; use a distinct fragment instead
        let key_b = key_b ^ 0xFFFF; // flip the key fragment bits
        tt.store(key_a, sample_entry(4, 10));
        assert!(tt.probe(key_b).is_none());
    }

    #[test]
    fn rejects_size_too_small_for_one_bucket() {
        assert!(TranspositionTable::new(0).is_err());
    }

    #[test]
    fn overwriting_same_key_updates_in_place() {
        let tt = TranspositionTable::new(1).unwrap();
        let key = 42u64;
        tt.store(key, sample_entry(3, 1));
        tt.store(key, sample_entry(7, 2));
        let hit = tt.probe(key).unwrap();
        assert_eq!(hit.depth, 7);
        assert_eq!(hit.score, 2);
    }
}
