use itertools::Itertools;
use proc_macro2::{Literal, TokenStream};
use quote::quote;
use syn::{
    braced,
    ext::IdentExt,
    parse::{Parse, ParseStream},
    Attribute, Ident, LitInt, Path, Token, Visibility,
};

pub struct SyscallTableInput {
    attrs: Vec<Attribute>,
    vis: Visibility,
    ident: Ident,
    arch: Path,
    entries: Vec<TableEntry>,
}

struct TableEntry {
    name: Ident,
    number: LitInt,
}

impl Parse for TableEntry {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let name = input.parse()?;
        input.parse::<Token![=]>()?;
        let number = input.parse()?;
        Ok(Self { name, number })
    }
}

impl Parse for SyscallTableInput {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let attrs = input.call(Attribute::parse_outer)?;
        let vis = input.parse()?;
        input.parse::<Token![enum]>()?;
        let ident = input.parse()?;
        input.parse::<Token![in]>()?;
        let arch = Path::parse_mod_style(input)?;

        let content;
        braced!(content in input);
        let entries = content
            .parse_terminated(TableEntry::parse, Token![,])?
            .into_iter()
            .collect();

        Ok(Self {
            attrs,
            vis,
            ident,
            arch,
            entries,
        })
    }
}

struct Row {
    ident: Ident,
    name: String,
    number: u32,
}

fn collect_rows(entries: &[TableEntry]) -> syn::Result<Vec<Row>> {
    let mut rows = Vec::with_capacity(entries.len());
    for entry in entries {
        rows.push(Row {
            ident: entry.name.clone(),
            name: entry.name.unraw().to_string(),
            number: entry.number.base10_parse::<u32>()?,
        });
    }

    let mut errors = Vec::new();
    for row in rows.iter().duplicates_by(|r| r.name.clone()) {
        errors.push(syn::Error::new(
            row.ident.span(),
            format!("duplicate syscall name `{}`", row.name),
        ));
    }
    for row in rows.iter().duplicates_by(|r| r.number) {
        errors.push(syn::Error::new(
            row.ident.span(),
            format!(
                "syscall number {} is assigned twice (second time to `{}`)",
                row.number, row.name
            ),
        ));
    }

    match errors.into_iter().reduce(|mut a, b| {
        a.combine(b);
        a
    }) {
        Some(e) => Err(e),
        None => Ok(rows),
    }
}

pub fn impl_syscall_table(input: SyscallTableInput) -> syn::Result<TokenStream> {
    let SyscallTableInput {
        attrs,
        vis,
        ident,
        arch,
        entries,
    } = input;

    if entries.is_empty() {
        return Err(syn::Error::new(ident.span(), "syscall table has no entries"));
    }

    let rows = collect_rows(&entries)?;
    let by_number = rows.iter().sorted_by_key(|r| r.number).collect::<Vec<_>>();
    let by_name = rows
        .iter()
        .sorted_by(|a, b| a.name.cmp(&b.name))
        .collect::<Vec<_>>();

    let count = Literal::usize_unsuffixed(rows.len());
    let first = &by_number[0].ident;
    let last = &by_number[by_number.len() - 1].ident;
    let max_id = Literal::u32_unsuffixed(by_number[by_number.len() - 1].number);

    let variants = by_number.iter().map(|r| {
        let variant = &r.ident;
        let number = Literal::u32_unsuffixed(r.number);
        quote!(#variant = #number)
    });
    let all = by_number.iter().map(|r| {
        let variant = &r.ident;
        quote!(Self::#variant)
    });
    let name_arms = by_number.iter().map(|r| {
        let variant = &r.ident;
        let name = &r.name;
        quote!(Self::#variant => #name)
    });
    let number_arms = by_number.iter().map(|r| {
        let variant = &r.ident;
        let number = Literal::u32_unsuffixed(r.number);
        quote!(#number => ::core::option::Option::Some(Self::#variant))
    });
    let sorted_names = by_name.iter().map(|r| {
        let variant = &r.ident;
        let name = &r.name;
        quote!((#name, Self::#variant))
    });

    let serde = quote!(::sysnum_core::__private::serde);

    Ok(quote! {
        #(#attrs)*
        #[repr(u32)]
        #[allow(non_camel_case_types)]
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #vis enum #ident {
            #(#variants,)*
        }

        impl #ident {
            /// The ABI these numbers belong to.
            pub const ARCH: ::sysnum_core::Arch = #arch;
            /// Number of assigned entries.
            pub const COUNT: usize = #count;
            /// Every entry, in ascending number order.
            pub const ALL: &'static [Self] = &[#(#all),*];
            pub const FIRST: Self = Self::#first;
            pub const LAST: Self = Self::#last;
            /// The largest assigned number.
            pub const MAX_ID: u32 = #max_id;

            // sorted by name for `from_name`
            const BY_NAME: &'static [(&'static str, Self)] = &[#(#sorted_names),*];

            #[inline]
            pub const fn id(self) -> u32 {
                self as u32
            }

            /// The canonical (kernel) name of this syscall.
            pub const fn name(self) -> &'static str {
                match self {
                    #(#name_arms,)*
                }
            }

            pub const fn from_number(number: u32) -> ::core::option::Option<Self> {
                match number {
                    #(#number_arms,)*
                    _ => ::core::option::Option::None,
                }
            }

            /// Looks up a syscall by its canonical name. Usable in `const` context.
            pub const fn from_name(name: &str) -> ::core::option::Option<Self> {
                let mut lo = 0;
                let mut hi = Self::BY_NAME.len();
                while lo < hi {
                    let mid = lo + (hi - lo) / 2;
                    let (probe, sysno) = Self::BY_NAME[mid];
                    match ::sysnum_core::util::cmp_str(probe, name) {
                        ::core::cmp::Ordering::Less => lo = mid + 1,
                        ::core::cmp::Ordering::Greater => hi = mid,
                        ::core::cmp::Ordering::Equal => return ::core::option::Option::Some(sysno),
                    }
                }
                ::core::option::Option::None
            }
        }

        impl ::sysnum_core::SyscallTable for #ident {
            const ARCH: ::sysnum_core::Arch = #ident::ARCH;
            const ALL: &'static [Self] = #ident::ALL;
            const MAX_ID: u32 = #ident::MAX_ID;

            #[inline]
            fn id(self) -> u32 {
                #ident::id(self)
            }

            #[inline]
            fn name(self) -> &'static str {
                #ident::name(self)
            }

            #[inline]
            fn from_number(number: u32) -> ::core::option::Option<Self> {
                #ident::from_number(number)
            }

            #[inline]
            fn from_name(name: &str) -> ::core::option::Option<Self> {
                #ident::from_name(name)
            }
        }

        impl ::core::fmt::Display for #ident {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(self.name())
            }
        }

        impl ::core::str::FromStr for #ident {
            type Err = ::sysnum_core::LookupError;

            fn from_str(name: &str) -> ::core::result::Result<Self, Self::Err> {
                Self::from_name(name).ok_or_else(|| ::sysnum_core::LookupError::UnknownSyscallName {
                    arch: Self::ARCH,
                    name: ::std::string::String::from(name),
                })
            }
        }

        impl ::core::convert::From<#ident> for u32 {
            #[inline]
            fn from(sysno: #ident) -> Self {
                sysno.id()
            }
        }

        impl ::core::convert::From<#ident> for u64 {
            #[inline]
            fn from(sysno: #ident) -> Self {
                u64::from(sysno.id())
            }
        }

        impl ::core::convert::From<#ident> for i64 {
            #[inline]
            fn from(sysno: #ident) -> Self {
                i64::from(sysno.id())
            }
        }

        impl ::core::convert::From<#ident> for usize {
            #[inline]
            fn from(sysno: #ident) -> Self {
                sysno.id() as usize
            }
        }

        impl ::core::convert::TryFrom<u32> for #ident {
            type Error = ::sysnum_core::LookupError;

            fn try_from(number: u32) -> ::core::result::Result<Self, Self::Error> {
                Self::from_number(number).ok_or(::sysnum_core::LookupError::UnknownSyscallNumber {
                    arch: Self::ARCH,
                    number: u64::from(number),
                })
            }
        }

        impl ::core::convert::TryFrom<u64> for #ident {
            type Error = ::sysnum_core::LookupError;

            fn try_from(number: u64) -> ::core::result::Result<Self, Self::Error> {
                u32::try_from(number)
                    .ok()
                    .and_then(Self::from_number)
                    .ok_or(::sysnum_core::LookupError::UnknownSyscallNumber {
                        arch: Self::ARCH,
                        number,
                    })
            }
        }

        impl ::core::convert::TryFrom<usize> for #ident {
            type Error = ::sysnum_core::LookupError;

            fn try_from(number: usize) -> ::core::result::Result<Self, Self::Error> {
                <Self as ::core::convert::TryFrom<u64>>::try_from(number as u64)
            }
        }

        impl #serde::Serialize for #ident {
            fn serialize<S>(&self, serializer: S) -> ::core::result::Result<S::Ok, S::Error>
            where
                S: #serde::Serializer,
            {
                serializer.serialize_str(self.name())
            }
        }

        impl<'de> #serde::Deserialize<'de> for #ident {
            fn deserialize<D>(deserializer: D) -> ::core::result::Result<Self, D::Error>
            where
                D: #serde::Deserializer<'de>,
            {
                let name = <::std::string::String as #serde::Deserialize>::deserialize(deserializer)?;
                name.parse::<Self>()
                    .map_err(<D::Error as #serde::de::Error>::custom)
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand(input: TokenStream) -> syn::Result<String> {
        let input = syn::parse2::<SyscallTableInput>(input)?;
        let file = syn::parse2::<syn::File>(impl_syscall_table(input)?)?;
        Ok(prettyplease::unparse(&file))
    }

    fn expand_err(input: TokenStream) -> String {
        match expand(input) {
            Ok(out) => panic!("expected an error, got:\n{}", out),
            Err(e) => e.to_string(),
        }
    }

    #[test]
    fn expands_enum_in_number_order() {
        let out = expand(quote! {
            /// Test table
            pub enum Sysno in ::sysnum_core::Arch::X86_64 {
                write = 1,
                openat = 257,
                read = 0,
            }
        })
        .unwrap();

        assert!(out.contains("pub enum Sysno {"), "{}", out);
        let read = out.find("read = 0,").unwrap();
        let write = out.find("write = 1,").unwrap();
        let openat = out.find("openat = 257,").unwrap();
        assert!(read < write && write < openat, "{}", out);

        assert!(out.contains("pub const COUNT: usize = 3;"), "{}", out);
        assert!(out.contains("pub const MAX_ID: u32 = 257;"), "{}", out);
        assert!(out.contains("pub const FIRST: Self = Self::read;"), "{}", out);
        assert!(out.contains("pub const LAST: Self = Self::openat;"), "{}", out);
        assert!(out.contains("/// Test table"), "{}", out);
    }

    #[test]
    fn name_table_is_sorted() {
        let out = expand(quote! {
            pub enum Sysno in crate::Arch::X86_64 {
                write = 1,
                read = 0,
                openat = 257,
                _sysctl = 156,
            }
        })
        .unwrap();

        let positions = ["(\"_sysctl\"", "(\"openat\"", "(\"read\"", "(\"write\""]
            .iter()
            .map(|needle| out.find(needle).unwrap_or_else(|| panic!("{} missing:\n{}", needle, out)))
            .collect::<Vec<_>>();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{}", out);
    }

    #[test]
    fn rejects_duplicate_number() {
        let err = expand_err(quote! {
            pub enum Sysno in crate::Arch::X86_64 {
                stat = 4,
                fstat = 4,
            }
        });
        assert_eq!(err, "syscall number 4 is assigned twice (second time to `fstat`)");
    }

    #[test]
    fn rejects_duplicate_name() {
        let err = expand_err(quote! {
            pub enum Sysno in crate::Arch::X86_64 {
                read = 0,
                read = 1,
            }
        });
        assert_eq!(err, "duplicate syscall name `read`");
    }

    #[test]
    fn rejects_empty_table() {
        let err = expand_err(quote! {
            pub enum Sysno in crate::Arch::X86_64 {}
        });
        assert_eq!(err, "syscall table has no entries");
    }

    #[test]
    fn rejects_out_of_range_number() {
        let err = expand_err(quote! {
            pub enum Sysno in crate::Arch::X86_64 {
                read = 4294967296,
            }
        });
        assert!(err.contains("number too large"), "{}", err);
    }
}
