const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Color key for a branch, as `#rrggbb`.
///
/// Derived from the upper-cased branch key only, so every graph built from
/// the same data colors a branch identically.
pub fn branch_color(key: &str) -> String {
    let hash = key
        .to_ascii_uppercase()
        .bytes()
        .fold(FNV_OFFSET, |hash, byte| (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME));
    let [r, g, b, ..] = hash.to_be_bytes();
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branch_color_is_stable_and_case_insensitive() {
        let color = branch_color("EXAMPLE.COM");
        assert_eq!(color, branch_color("example.com"));
        assert_eq!(color.len(), 7);
        assert!(color.starts_with('#'));
        assert!(color[1..].chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(color, branch_color("EXAMPLE.NET"));
    }
}
