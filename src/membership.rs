/// Maps a deduplicated point index to the id of the cluster that currently
/// owns it.
///
/// The reference implementation template-specializes this on `uint8_t` vs
/// `uint32_t` storage depending on whether the cluster count fits in a
/// byte. This crate expresses the same choice as a small trait with two
/// concrete backings, picked once by the orchestrator and used uniformly
/// by the splitter afterward.
pub trait MembershipTable {
    fn get(&self, index: usize) -> u32;
    fn set(&mut self, index: usize, id: u32);
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Indices whose membership equals `id`, in ascending order.
    fn indices_with(&self, id: u32) -> Vec<u32> {
        (0..self.len() as u32)
            .filter(|&i| self.get(i as usize) == id)
            .collect()
    }
}

/// Backing used when the cluster count fits in a byte (K ≤ 256).
#[derive(Debug, Clone)]
pub struct ByteMembership(Vec<u8>);

impl ByteMembership {
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self(vec![0u8; len])
    }
}

impl MembershipTable for ByteMembership {
    fn get(&self, index: usize) -> u32 {
        u32::from(self.0[index])
    }

    fn set(&mut self, index: usize, id: u32) {
        debug_assert!(id <= u32::from(u8::MAX));
        self.0[index] = id as u8;
    }

    fn len(&self) -> usize {
        self.0.len()
    }
}

/// Backing used when the cluster count exceeds a byte's range (K > 256).
#[derive(Debug, Clone)]
pub struct WordMembership(Vec<u32>);

impl WordMembership {
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self(vec![0u32; len])
    }
}

impl MembershipTable for WordMembership {
    fn get(&self, index: usize) -> u32 {
        self.0[index]
    }

    fn set(&mut self, index: usize, id: u32) {
        self.0[index] = id;
    }

    fn len(&self) -> usize {
        self.0.len()
    }
}

/// Either backing, chosen at construction time by whatever needs a table
/// without caring which representation it is.
#[derive(Debug, Clone)]
pub enum Membership {
    Byte(ByteMembership),
    Word(WordMembership),
}

impl Membership {
    #[must_use]
    pub fn new(len: usize, max_clusters: usize) -> Self {
        if max_clusters <= 256 {
            Self::Byte(ByteMembership::new(len))
        } else {
            Self::Word(WordMembership::new(len))
        }
    }
}

impl MembershipTable for Membership {
    fn get(&self, index: usize) -> u32 {
        match self {
            Self::Byte(b) => b.get(index),
            Self::Word(w) => w.get(index),
        }
    }

    fn set(&mut self, index: usize, id: u32) {
        match self {
            Self::Byte(b) => b.set(index, id),
            Self::Word(w) => w.set(index, id),
        }
    }

    fn len(&self) -> usize {
        match self {
            Self::Byte(b) => b.len(),
            Self::Word(w) => w.len(),
        }
    }
}
