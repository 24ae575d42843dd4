use serde::Serialize;

use crate::{table, x86_64, Arch, LookupError, SyscallTable};

/// One row of a syscall table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Entry {
    pub arch: Arch,
    pub name: &'static str,
    pub number: u32,
}

impl Entry {
    pub fn of<T: SyscallTable>(sysno: T) -> Self {
        Self {
            arch: T::ARCH,
            name: sysno.name(),
            number: sysno.id(),
        }
    }
}

/// Lookups against a table picked at runtime.
///
/// Code that knows its architecture at compile time should use the table enum (e.g.
/// [`x86_64::Sysno`]) directly instead; this is for tracers and tools that get the architecture
/// from the user or from the traced process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registry {
    arch: Arch,
}

impl Registry {
    pub fn new(arch: Arch) -> Self {
        Self { arch }
    }

    /// The registry for the table matching the compilation target.
    pub fn host() -> Result<Self, LookupError> {
        match Arch::host() {
            Some(arch) => {
                log::debug!("using the {} syscall table for the host", arch);
                Ok(Self::new(arch))
            }
            None => {
                log::debug!("no syscall table for host architecture {}", std::env::consts::ARCH);
                Err(LookupError::UnsupportedHost {
                    arch: std::env::consts::ARCH,
                })
            }
        }
    }

    #[inline]
    pub fn arch(&self) -> Arch {
        self.arch
    }

    pub fn entry_by_name(&self, name: &str) -> Result<Entry, LookupError> {
        match self.arch {
            Arch::X86_64 => table::lookup_name::<x86_64::Sysno>(name).map(Entry::of),
        }
    }

    pub fn entry_by_number(&self, number: u64) -> Result<Entry, LookupError> {
        match self.arch {
            Arch::X86_64 => table::lookup_number::<x86_64::Sysno>(number).map(Entry::of),
        }
    }

    /// Decodes the raw value of the syscall-number register of a stopped tracee.
    ///
    /// The register is read as a full machine word; values with any of the upper bits set (e.g. the
    /// x32 marker bit, or `-1` for "no syscall") are not x86-64 numbers and fail to decode.
    pub fn decode(&self, raw: u64) -> Result<Entry, LookupError> {
        self.entry_by_number(raw)
    }

    pub fn number_of(&self, name: &str) -> Result<u32, LookupError> {
        self.entry_by_name(name).map(|e| e.number)
    }

    pub fn name_of(&self, number: u64) -> Result<&'static str, LookupError> {
        self.entry_by_number(number).map(|e| e.name)
    }

    pub fn is_defined_name(&self, name: &str) -> bool {
        match self.arch {
            Arch::X86_64 => table::is_defined_name::<x86_64::Sysno>(name),
        }
    }

    pub fn is_defined_number(&self, number: u64) -> bool {
        match self.arch {
            Arch::X86_64 => table::is_defined_number::<x86_64::Sysno>(number),
        }
    }

    /// All entries, in ascending number order.
    pub fn entries(&self) -> impl ExactSizeIterator<Item = Entry> {
        let all = match self.arch {
            Arch::X86_64 => x86_64::Sysno::ALL,
        };
        all.iter().copied().map(Entry::of)
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
