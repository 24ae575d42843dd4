//! This crate implements the core functionality of sysnum
//!
//! It holds the per-architecture Linux syscall number tables, and the lookups built on top of them:
//! name to number, number to name, syscall sets and table dumps.
//!
//! Tables are generated at compile time by [`sysnum_derive::syscall_table`], so a lookup of a known
//! name can be folded into a constant:
//!
//! ```
//! use sysnum_core::x86_64::Sysno;
//!
//! const OPENAT: u32 = sysnum_core::nr!(x86_64, "openat");
//! assert_eq!(OPENAT, 257);
//! assert_eq!(Sysno::from_number(OPENAT), Some(Sysno::openat));
//! ```

#![allow(clippy::uninlined_format_args)]

// macro hack
extern crate self as sysnum_core;

pub mod arch;
pub mod dump;
pub mod error;
pub mod registry;
pub mod set;
pub mod table;
pub mod util;
pub mod x86_64;

pub use arch::Arch;
pub use error::LookupError;
pub use registry::{Entry, Registry};
pub use set::SysnoSet;
pub use table::SyscallTable;

#[doc(hidden)]
pub mod __private {
    pub use serde;
}

/// Resolves a syscall name to its number at compile time.
///
/// An unknown name fails the build instead of producing a wrong number.
///
/// ```compile_fail
/// const NR: u32 = sysnum_core::nr!(x86_64, "not_a_syscall");
/// assert_eq!(NR, 0);
/// ```
#[macro_export]
macro_rules! nr {
    ($arch:ident, $name:literal) => {{
        const NR: u32 = match $crate::$arch::Sysno::from_name($name) {
            ::core::option::Option::Some(sysno) => sysno.id(),
            ::core::option::Option::None => {
                ::core::panic!(::core::concat!("unknown ", ::core::stringify!($arch), " syscall: ", $name))
            }
        };
        NR
    }};
}
