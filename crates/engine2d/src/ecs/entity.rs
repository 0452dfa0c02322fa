//! Entity implementation

use std::fmt;

use slotmap::Key;

slotmap::new_key_type! {
    /// Entity identifier
    ///
    /// Generational key: a destroyed entity's identifier is never handed out
    /// again, so stale copies simply stop resolving.
    pub struct Entity;
}

impl Entity {
    /// Get the raw entity ID (index and generation packed together)
    pub fn id(&self) -> u64 {
        self.data().as_ffi()
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity#{}", self.id())
    }
}
