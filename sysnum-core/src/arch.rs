use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// An architecture/ABI pair that owns a syscall numbering.
///
/// Numbers are only meaningful together with their `Arch`: `open` is 2 on x86-64 and does not exist
/// at all in the generic table used by arm64 and riscv64.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    IntoStaticStr,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(ascii_case_insensitive)]
pub enum Arch {
    /// x86-64, 64-bit ABI (`syscall` instruction, number in `rax`). Does not cover x32.
    #[strum(to_string = "x86_64", serialize = "x86-64", serialize = "amd64")]
    #[serde(rename = "x86_64", alias = "x86-64", alias = "amd64")]
    X86_64,
}

impl Arch {
    /// The table matching the compilation target, if there is one.
    pub const fn host() -> Option<Arch> {
        if cfg!(all(target_arch = "x86_64", target_pointer_width = "64")) {
            Some(Arch::X86_64)
        } else {
            None
        }
    }

    pub fn all() -> impl Iterator<Item = Arch> {
        Arch::iter()
    }

    #[inline]
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Include guard of the kernel's `unistd` header for this ABI.
    pub const fn header_guard(self) -> &'static str {
        match self {
            Arch::X86_64 => "_ASM_X86_UNISTD_64_H",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_common_spellings() {
        for s in ["x86_64", "x86-64", "amd64", "AMD64", "X86_64"] {
            assert_eq!(s.parse::<Arch>(), Ok(Arch::X86_64), "{}", s);
        }
        assert!("aarch64".parse::<Arch>().is_err());
        assert!("i386".parse::<Arch>().is_err());
    }

    #[test]
    fn displays_canonical_name() {
        assert_eq!(Arch::X86_64.to_string(), "x86_64");
        assert_eq!(Arch::X86_64.name(), "x86_64");
        assert_eq!(Arch::all().collect::<Vec<_>>(), vec![Arch::X86_64]);
    }

    #[test]
    fn serde_uses_canonical_name() {
        assert_eq!(serde_yaml::to_string(&Arch::X86_64).unwrap(), "x86_64\n");
        assert_eq!(serde_yaml::from_str::<Arch>("amd64").unwrap(), Arch::X86_64);
    }

    #[test]
    #[cfg(all(target_arch = "x86_64", target_pointer_width = "64"))]
    fn host_is_x86_64() {
        assert_eq!(Arch::host(), Some(Arch::X86_64));
    }
}
