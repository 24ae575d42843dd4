//! Text renderings of a syscall table.

use std::fmt::Write;

use crate::{util::decimal_width, SyscallTable};

/// One `"<number> <name>"` line per syscall, numbers right-aligned to the table's widest number.
///
/// This is the format the checked-in golden tables use.
pub fn render_table<T: SyscallTable>(entries: impl IntoIterator<Item = T>) -> String {
    let width = decimal_width(T::MAX_ID);
    let mut out = String::new();
    let mut count = 0usize;
    for sysno in entries {
        // writing into a String cannot fail
        let _ = writeln!(out, "{:>width$} {}", sysno.id(), sysno.name(), width = width);
        count += 1;
    }
    log::debug!("rendered {} {} entries as a table", count, T::ARCH);
    out
}

/// The kernel's `asm/unistd_64.h` layout: an include guard around one `#define __NR_<name> <number>`
/// per syscall.
///
/// Rendering the full table reproduces the header it was taken from byte for byte.
pub fn render_c_header<T: SyscallTable>(entries: impl IntoIterator<Item = T>) -> String {
    let guard = T::ARCH.header_guard();
    let mut out = String::new();
    let _ = write!(out, "#ifndef {}\n#define {} 1\n\n", guard, guard);
    let mut count = 0usize;
    for sysno in entries {
        let _ = writeln!(out, "#define __NR_{} {}", sysno.name(), sysno.id());
        count += 1;
    }
    let _ = write!(out, "\n#endif /* {} */", guard);
    log::debug!("rendered {} {} entries as a C header", count, T::ARCH);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::x86_64::Sysno;

    #[test]
    fn table_pads_numbers() {
        let out = render_table([Sysno::read, Sysno::exit, Sysno::openat]);
        assert_eq!(out, "  0 read\n 60 exit\n257 openat\n");
    }

    #[test]
    fn header_layout() {
        let out = render_c_header([Sysno::read, Sysno::pwritev2]);
        assert_eq!(
            out,
            "#ifndef _ASM_X86_UNISTD_64_H\n\
             #define _ASM_X86_UNISTD_64_H 1\n\
             \n\
             #define __NR_read 0\n\
             #define __NR_pwritev2 328\n\
             \n\
             #endif /* _ASM_X86_UNISTD_64_H */"
        );
    }

    #[test]
    fn empty_selection() {
        assert_eq!(render_table(std::iter::empty::<Sysno>()), "");
    }
}
