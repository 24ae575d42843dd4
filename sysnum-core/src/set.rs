use std::{fmt, marker::PhantomData};

use bitvec::prelude::*;

use crate::SyscallTable;

/// A set of syscalls of one table, e.g. the syscalls a tracer should report.
///
/// Stored as a bitmap over the table's number space, so membership tests are a single bit lookup.
#[derive(Clone, PartialEq, Eq)]
pub struct SysnoSet<T: SyscallTable> {
    bits: BitVec<u64, Lsb0>,
    _table: PhantomData<T>,
}

impl<T: SyscallTable> SysnoSet<T> {
    /// An empty set.
    pub fn new() -> Self {
        Self {
            bits: bitvec![u64, Lsb0; 0; T::MAX_ID as usize + 1],
            _table: PhantomData,
        }
    }

    /// The set of every syscall of the table.
    pub fn all() -> Self {
        T::ALL.iter().copied().collect()
    }

    /// Adds a syscall. Returns `true` if it was not present yet.
    pub fn insert(&mut self, sysno: T) -> bool {
        !self.bits.replace(sysno.id() as usize, true)
    }

    /// Removes a syscall. Returns `true` if it was present.
    pub fn remove(&mut self, sysno: T) -> bool {
        self.bits.replace(sysno.id() as usize, false)
    }

    pub fn contains(&self, sysno: T) -> bool {
        self.bits[sysno.id() as usize]
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.not_any()
    }

    /// The members, in ascending number order.
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.bits
            .iter_ones()
            .filter_map(|number| T::from_number(number as u32))
    }

    pub fn union(&self, other: &Self) -> Self {
        let mut out = self.clone();
        out.extend(other.iter());
        out
    }

    pub fn intersection(&self, other: &Self) -> Self {
        self.iter().filter(|&sysno| other.contains(sysno)).collect()
    }

    pub fn difference(&self, other: &Self) -> Self {
        self.iter().filter(|&sysno| !other.contains(sysno)).collect()
    }
}

impl<T: SyscallTable> Default for SysnoSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: SyscallTable> Extend<T> for SysnoSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for sysno in iter {
            self.insert(sysno);
        }
    }
}

impl<T: SyscallTable> FromIterator<T> for SysnoSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<T: SyscallTable> fmt::Debug for SysnoSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
