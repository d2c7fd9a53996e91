//! The flat, linearly-scanned variable store.
//!
//! A direct translation of the reference `run.c`'s `static struct { ... }
//! varstore` global: up to [`CAPACITY`] entries, each holding a name (a
//! slice borrowed from the input buffer, compared byte-for-byte) and a
//! growable array of `i32` values. A scalar assignment `x = E;` is just an
//! array of length one.

/// Matches the reference's `#define VARSTORE_CAPACITY 128`.
pub(crate) const CAPACITY: usize = 128;

struct VarEntry<'a> {
    name: &'a [u8],
    /// Empty iff `poisoned`.
    values: Vec<i32>,
    poisoned: bool,
}

/// Outcome of a write, for the evaluator to turn into a report warning.
pub(crate) enum WriteWarning {
    NegativeIndex,
    Poisoned,
    ReallocFailed,
    StoreExhausted,
    AllocFailed,
}

impl WriteWarning {
    /// The exact report line for this failure. Unlike [`ReadWarning`],
    /// these don't all share one `warn: ` prefix: the reference's
    /// `run_assign` prints the poisoned-write case as `WARN:` (uppercase)
    /// and the two allocation-failure cases with no prefix at all, while
    /// the negative-index and store-exhausted cases use the ordinary
    /// lowercase `warn: `.
    pub(crate) fn report_line(&self) -> &'static str {
        match self {
            WriteWarning::NegativeIndex => "warn: negative array offset",
            WriteWarning::Poisoned => {
                "WARN: a previous reallocation has failed, assignment has no effect"
            }
            WriteWarning::ReallocFailed => "realloc failed",
            WriteWarning::StoreExhausted => "warn: varstore exhausted, assignment has no effect",
            WriteWarning::AllocFailed => "malloc failed",
        }
    }
}

pub(crate) enum ReadWarning {
    NegativeIndex,
    UndefinedVariable,
    UndefinedArray,
    OutOfBounds,
}

impl ReadWarning {
    pub(crate) fn message(&self) -> &'static str {
        match self {
            ReadWarning::NegativeIndex => "negative array offset",
            ReadWarning::UndefinedVariable => "access to undefined variable",
            ReadWarning::UndefinedArray => "access to undefined array",
            ReadWarning::OutOfBounds => "out of bounds array access",
        }
    }
}

#[derive(Default)]
pub(crate) struct VarStore<'a> {
    entries: Vec<VarEntry<'a>>,
}

impl<'a> VarStore<'a> {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn find(&self, name: &[u8]) -> Option<usize> {
        self.entries.iter().position(|e| e.name == name)
    }

    /// `x` in an rvalue position: element 0 of its array, or 0 with a
    /// warning if the name was never assigned. A poisoned entry reads back
    /// as 0 silently, matching the reference's `array_size ? values[0] : 0`
    /// (no warning branch there for the poisoned case).
    pub(crate) fn read_scalar(&self, name: &[u8]) -> Result<i32, ReadWarning> {
        match self.find(name) {
            Some(idx) => {
                let entry = &self.entries[idx];
                Ok(if entry.poisoned { 0 } else { entry.values[0] })
            }
            None => Err(ReadWarning::UndefinedVariable),
        }
    }

    /// `x[i]` in an rvalue position.
    pub(crate) fn read_index(&self, name: &[u8], index: i32) -> Result<i32, ReadWarning> {
        if index < 0 {
            return Err(ReadWarning::NegativeIndex);
        }
        match self.find(name) {
            Some(idx) => {
                let entry = &self.entries[idx];
                let index = index as usize;
                if index < entry.values.len() {
                    Ok(entry.values[index])
                } else {
                    Err(ReadWarning::OutOfBounds)
                }
            }
            None => Err(ReadWarning::UndefinedArray),
        }
    }

    /// `x = v;` (`index == 0`) or `x[i] = v;`.
    pub(crate) fn write(
        &mut self,
        name: &'a [u8],
        index: i32,
        value: i32,
    ) -> Result<(), WriteWarning> {
        if index < 0 {
            return Err(WriteWarning::NegativeIndex);
        }
        let index = index as usize;

        if let Some(idx) = self.find(name) {
            let entry = &mut self.entries[idx];
            if entry.poisoned {
                return Err(WriteWarning::Poisoned);
            }
            if index < entry.values.len() {
                entry.values[index] = value;
                return Ok(());
            }
            // Growth: new capacity is (index + 1) * 2, per the reference's
            // `realloc(..., (array_idx + 1) * 2 * sizeof(int))`.
            let new_len = (index + 1) * 2;
            if entry.values.try_reserve(new_len - entry.values.len()).is_err() {
                entry.values = Vec::new();
                entry.poisoned = true;
                return Err(WriteWarning::ReallocFailed);
            }
            entry.values.resize(new_len, 0);
            entry.values[index] = value;
            return Ok(());
        }

        if self.entries.len() >= CAPACITY {
            return Err(WriteWarning::StoreExhausted);
        }

        let mut values = Vec::new();
        if values.try_reserve(index + 1).is_err() {
            // The reference leaves the slot uncounted (`varstore.size` is
            // only incremented after a successful malloc); we mirror that
            // by simply not pushing an entry.
            return Err(WriteWarning::AllocFailed);
        }
        values.resize(index + 1, 0);
        values[index] = value;
        self.entries.push(VarEntry {
            name,
            values,
            poisoned: false,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_round_trip() {
        let mut store = VarStore::new();
        store.write(b"x", 0, 42).unwrap();
        assert_eq!(store.read_scalar(b"x").unwrap(), 42);
    }

    #[test]
    fn growth_preserves_old_slots_and_zeroes_new_ones() {
        let mut store = VarStore::new();
        store.write(b"a", 0, 5).unwrap();
        store.write(b"a", 1, 7).unwrap();
        assert_eq!(store.read_index(b"a", 0).unwrap(), 5);
        assert_eq!(store.read_index(b"a", 1).unwrap(), 7);
        assert_eq!(store.read_index(b"a", 3).unwrap(), 0);
    }

    #[test]
    fn negative_index_is_a_warning_on_read_and_write() {
        let mut store = VarStore::new();
        assert!(matches!(
            store.write(b"a", -1, 1),
            Err(WriteWarning::NegativeIndex)
        ));
        assert!(matches!(
            store.read_index(b"a", -1),
            Err(ReadWarning::NegativeIndex)
        ));
    }

    #[test]
    fn undefined_variable_reads_as_zero_with_warning() {
        let store = VarStore::new();
        assert!(matches!(
            store.read_scalar(b"missing"),
            Err(ReadWarning::UndefinedVariable)
        ));
    }

    #[test]
    fn out_of_bounds_read_is_a_warning() {
        let mut store = VarStore::new();
        store.write(b"a", 0, 1).unwrap();
        assert!(matches!(
            store.read_index(b"a", 50),
            Err(ReadWarning::OutOfBounds)
        ));
    }

    #[test]
    fn report_lines_match_reference_prefixes() {
        assert_eq!(
            WriteWarning::NegativeIndex.report_line(),
            "warn: negative array offset"
        );
        assert_eq!(
            WriteWarning::Poisoned.report_line(),
            "WARN: a previous reallocation has failed, assignment has no effect"
        );
        assert_eq!(WriteWarning::ReallocFailed.report_line(), "realloc failed");
        assert_eq!(
            WriteWarning::StoreExhausted.report_line(),
            "warn: varstore exhausted, assignment has no effect"
        );
        assert_eq!(WriteWarning::AllocFailed.report_line(), "malloc failed");
    }
}
