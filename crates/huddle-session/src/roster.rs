//! The client's view of currently connected peers.

/// One known peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    /// Stable ordinal within the current roster (position in the last
    /// server push).
    pub index: usize,
    /// The peer's username.
    pub username: String,
}

/// The list of known peers, replaced wholesale on every server push.
///
/// The server sends the full list each time; no incremental diffing is
/// attempted. Accessors are permissive — out-of-range lookups return
/// `None` rather than failing, matching the reporter-style queries the
/// host caller makes.
#[derive(Debug, Default)]
pub struct Roster {
    entries: Vec<RosterEntry>,
}

impl Roster {
    /// Creates an empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically swaps in a new entry list from a server push,
    /// assigning ordinals in push order.
    pub fn replace(&mut self, usernames: Vec<String>) {
        self.entries = usernames
            .into_iter()
            .enumerate()
            .map(|(index, username)| RosterEntry { index, username })
            .collect();
    }

    /// Returns the number of known peers.
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// Looks up a peer by ordinal. `None` if out of range.
    pub fn by_index(&self, index: usize) -> Option<&RosterEntry> {
        self.entries.get(index)
    }

    /// Iterates over the usernames in roster order.
    pub fn usernames(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.username.as_str())
    }

    /// Drops every entry. Called when the session ends.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Returns `true` if no peers are known.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =========================================================================
// Tests
// =========================================================================
