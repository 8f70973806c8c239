use once_cell::sync::Lazy;
use regex::Regex;

/// Checks that a permission mode string is plain octal permission bits,
/// e.g. "644", "0644" or "4755".
pub fn valid_mode(s: &str) -> bool {
    static VALIDATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-7]{3,4}$").unwrap());

    VALIDATOR.is_match(s)
}

/// Parses a permission mode string into mode bits, or `None` if the string
/// is not a valid octal mode.
pub fn parse_mode(s: &str) -> Option<u32> {
    if !valid_mode(s) {
        return None;
    }

    u32::from_str_radix(s, 8).ok()
}

/// Checks that a table or chain name can be used verbatim as a single
/// directory name under the destination root.
pub fn valid_path_segment(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\0'])
}
