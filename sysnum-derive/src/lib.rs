// this is noisy & not well-supported by IDEs
#![allow(clippy::uninlined_format_args)]

mod syscall_table;

use proc_macro::TokenStream;

use crate::syscall_table::{impl_syscall_table, SyscallTableInput};

/// Generates an architecture-scoped syscall number enum, and its lookup tables. For use in `sysnum-core`.
///
/// ```ignore
/// syscall_table! {
///     pub enum Sysno in crate::Arch::X86_64 {
///         read = 0,
///         write = 1,
///     }
/// }
/// ```
///
/// Duplicate names or numbers are rejected at compile time.
#[proc_macro]
pub fn syscall_table(input: TokenStream) -> TokenStream {
    match syn::parse::<SyscallTableInput>(input) {
        Ok(p) => match impl_syscall_table(p) {
            Ok(s) => s.into(),
            Err(e) => e.to_compile_error().into(),
        },
        Err(e) => e.to_compile_error().into(),
    }
}
