use std::cmp::Ordering;

/// Byte-wise string comparison usable in `const fn`.
///
/// Orders exactly like `<str as Ord>::cmp`, which the generated name tables are sorted by.
pub const fn cmp_str(a: &str, b: &str) -> Ordering {
    let a = a.as_bytes();
    let b = b.as_bytes();
    let len = if a.len() < b.len() { a.len() } else { b.len() };

    let mut i = 0;
    while i < len {
        if a[i] < b[i] {
            return Ordering::Less;
        }
        if a[i] > b[i] {
            return Ordering::Greater;
        }
        i += 1;
    }

    if a.len() < b.len() {
        Ordering::Less
    } else if a.len() > b.len() {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}

/// Number of decimal digits needed to print `n`.
pub const fn decimal_width(mut n: u32) -> usize {
    let mut width = 1;
    while n >= 10 {
        n /= 10;
        width += 1;
    }
    width
}
