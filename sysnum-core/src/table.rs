//! The interface every generated syscall table implements, and the lookups written against it.

use std::{fmt, hash::Hash, str::FromStr};

use crate::{Arch, LookupError};

/// A syscall numbering of one architecture/ABI.
///
/// Implemented by the enums `syscall_table!` generates; the inherent `const fn`s of those enums are
/// the zero-cost path, this trait is for code generic over architectures.
pub trait SyscallTable:
    Copy
    + Eq
    + Ord
    + Hash
    + fmt::Debug
    + fmt::Display
    + FromStr<Err = LookupError>
    + Send
    + Sync
    + 'static
{
    const ARCH: Arch;
    /// Every entry, in ascending number order.
    const ALL: &'static [Self];
    /// The largest assigned number.
    const MAX_ID: u32;

    fn id(self) -> u32;
    fn name(self) -> &'static str;
    fn from_number(number: u32) -> Option<Self>;
    fn from_name(name: &str) -> Option<Self>;
}

pub fn lookup_name<T: SyscallTable>(name: &str) -> Result<T, LookupError> {
    T::from_name(name).ok_or_else(|| LookupError::UnknownSyscallName {
        arch: T::ARCH,
        name: name.to_owned(),
    })
}

pub fn lookup_number<T: SyscallTable>(number: u64) -> Result<T, LookupError> {
    u32::try_from(number)
        .ok()
        .and_then(T::from_number)
        .ok_or(LookupError::UnknownSyscallNumber {
            arch: T::ARCH,
            number,
        })
}

/// The number of a syscall, by name.
pub fn number_of<T: SyscallTable>(name: &str) -> Result<u32, LookupError> {
    lookup_name::<T>(name).map(T::id)
}

/// The canonical name of a syscall, by number.
pub fn name_of<T: SyscallTable>(number: u64) -> Result<&'static str, LookupError> {
    lookup_number::<T>(number).map(T::name)
}

pub fn is_defined_name<T: SyscallTable>(name: &str) -> bool {
    T::from_name(name).is_some()
}

pub fn is_defined_number<T: SyscallTable>(number: u64) -> bool {
    lookup_number::<T>(number).is_ok()
}
