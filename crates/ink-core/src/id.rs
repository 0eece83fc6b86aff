use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

/// Global string interner for annotation IDs — fast comparisons, low memory.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// Random tag drawn once per session and mixed into every generated ID,
/// so two sessions annotating the same lesson cannot mint the same ID.
static SESSION_TAG: LazyLock<u32> = LazyLock::new(|| {
    let mut buf = [0u8; 4];
    match getrandom::getrandom(&mut buf) {
        Ok(()) => u32::from_le_bytes(buf),
        // Entropy source unavailable: IDs stay unique within the session
        // via the counter alone.
        Err(_) => 0,
    }
});

/// A lightweight, interned identifier for annotations.
/// Internally a `Spur` index — 4 bytes, Copy, Eq, Hash in O(1).
///
/// IDs loaded from persisted data keep their original string form; freshly
/// drawn annotations get a generated one.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnnotationId(Spur);

impl AnnotationId {
    /// Intern a string as an AnnotationId, or return the existing ID if
    /// already interned.
    pub fn intern(s: &str) -> Self {
        AnnotationId(INTERNER.get_or_intern(s))
    }

    /// Resolve back to the string form stored on the wire.
    pub fn as_str(&self) -> &'static str {
        INTERNER.resolve(&self.0)
    }

    /// Mint a fresh unique ID: monotonic counter plus the session tag.
    pub fn generate() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        Self::intern(&format!("a{n}-{:08x}", *SESSION_TAG))
    }
}

impl fmt::Debug for AnnotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.as_str())
    }
}

impl fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for AnnotationId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AnnotationId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(AnnotationId::intern(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_roundtrip() {
        let a = AnnotationId::intern("a17-cafe");
        let b = AnnotationId::intern("a17-cafe");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "a17-cafe");
    }

    #[test]
    fn generated_ids_are_unique() {
        let a = AnnotationId::generate();
        let b = AnnotationId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn generated_ids_carry_session_tag() {
        let a = AnnotationId::generate();
        assert!(a.as_str().contains('-'));
    }
}
