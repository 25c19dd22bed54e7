/// How a stored value relates to the true score of a position
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Bound {
    Exact,
    /// the search failed high, the score is at least the value
    Lower,
    /// the search failed low, the score is at most the value
    Upper,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    pub value: i32,
    pub bound: Bound,
}

#[derive(Copy, Clone)]
struct Slot {
    key: u64,
    entry: Entry,
}

/// A fixed size cache of search results for one top-level search
///
/// Entries are always replaced on collision and the full key is checked on
/// lookup, so a lost entry only costs search time.
#[derive(Clone)]
pub struct TranspositionTable {
    slots: Vec<Option<Slot>>,
    len: usize,
}

impl TranspositionTable {
    /// Creates a table holding at most `capacity` entries, 0 stores nothing
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
            len: 0,
        }
    }

    fn index(&self, key: u64) -> Option<usize> {
        if self.slots.is_empty() {
            return None;
        }
        // spread the key, as its low bits only cover the bottom rows
        let hash = key.wrapping_mul(0x9e37_79b9_7f4a_7c15) >> 32;
        Some(hash as usize % self.slots.len())
    }

    pub fn set(&mut self, key: u64, value: i32, bound: Bound) {
        if let Some(i) = self.index(key) {
            if self.slots[i].is_none() {
                self.len += 1;
            }
            self.slots[i] = Some(Slot {
                key,
                entry: Entry { value, bound },
            });
        }
    }

    pub fn get(&self, key: u64) -> Option<Entry> {
        let i = self.index(key)?;
        match self.slots[i] {
            Some(slot) if slot.key == key => Some(slot.entry),
            _ => None,
        }
    }

    /// Number of slots
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of occupied slots
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
