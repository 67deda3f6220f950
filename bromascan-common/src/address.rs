/// A method's binding on a single platform.
///
/// Only [`Address::Offset`] participates in pattern synthesis and scanning;
/// the other variants mean the method is not present as a concrete code
/// location on this platform (e.g. it's a vtable-only virtual, a link-time
/// symbol resolved by the dynamic linker, or a header-only inline).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Address {
    /// No binding recorded for this platform.
    Null,
    /// Resolved at link time; has no fixed offset to search for.
    Link,
    /// A concrete byte offset within the platform's address space.
    Offset(u64),
    /// Inlined at the call site; never has its own entry point.
    Inlined,
}

impl Address {
    /// The offset, if this is an [`Address::Offset`].
    pub fn offset(self) -> Option<u64> {
        match self {
            Address::Offset(value) => Some(value),
            _ => None,
        }
    }
}

impl Default for Address {
    fn default() -> Self {
        Address::Null
    }
}
