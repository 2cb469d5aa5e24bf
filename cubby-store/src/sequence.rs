use std::{
    fmt::{Display, Formatter},
    sync::Arc,
};

use parking_lot::Mutex;

/// Opaque id assigned to each stored file at upload time, rendered in hex.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct FileId(pub u64);

impl Display for FileId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:x}", self.0)
    }
}

/// Process-local id allocator. Ids are unique for the lifetime of the
/// process, which matches the registry's lifetime exactly.
#[derive(Clone)]
pub struct MemorySequencer {
    counter: Arc<Mutex<u64>>,
}

impl MemorySequencer {
    pub fn new() -> MemorySequencer {
        MemorySequencer {
            counter: Arc::new(Mutex::new(1)),
        }
    }

    pub fn next_file_id(&self) -> FileId {
        let mut counter = self.counter.lock();
        let file_id = *counter;
        *counter += 1;
        FileId(file_id)
    }
}

impl Default for MemorySequencer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use crate::sequence::MemorySequencer;

    #[test]
    pub fn test_next_file_id() {
        let sequencer = MemorySequencer::new();
        let first = sequencer.next_file_id();
        let second = sequencer.next_file_id();
        assert_ne!(first, second);

        // clones share the counter
        let clone = sequencer.clone();
        assert_ne!(clone.next_file_id(), sequencer.next_file_id());
    }
}
