use crate::Arch;

/// A lookup miss. The tables are immutable, so these always point at a wrong name, a wrong number
/// or a wrong architecture, never at a transient condition.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("unknown {arch} syscall name: {name:?}")]
    UnknownSyscallName { arch: Arch, name: String },

    #[error("unknown {arch} syscall number: {number}")]
    UnknownSyscallNumber { arch: Arch, number: u64 },

    #[error("no syscall table for host architecture {arch}")]
    UnsupportedHost { arch: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let e = LookupError::UnknownSyscallName {
            arch: Arch::X86_64,
            name: "not_a_syscall".into(),
        };
        insta::assert_snapshot!(e.to_string(), @r#"unknown x86_64 syscall name: "not_a_syscall""#);

        let e = LookupError::UnknownSyscallNumber {
            arch: Arch::X86_64,
            number: 329,
        };
        insta::assert_snapshot!(e.to_string(), @"unknown x86_64 syscall number: 329");

        let e = LookupError::UnsupportedHost { arch: "riscv64" };
        insta::assert_snapshot!(e.to_string(), @"no syscall table for host architecture riscv64");
    }
}
