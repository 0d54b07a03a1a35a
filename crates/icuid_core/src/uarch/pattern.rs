//! Minimal pattern matching used to classify brand strings.
//!
//! Supported syntax:
//! - `.`: any character
//! - `#`: any ASCII digit
//! - `[...]`: any of the characters between the brackets
//! - anything else matches itself

/// Check if `needle` matches a contiguous part of `haystack`
///
/// An empty needle always matches, an unterminated `[` never does.
pub fn match_pattern(haystack: &str, needle: &str) -> bool {
    let haystack = haystack.as_bytes();
    let needle = needle.as_bytes();

    // Also true for an empty haystack, where no start position exists
    if needle.is_empty() {
        return true;
    }

    (0..haystack.len()).any(|start| match_at(&haystack[start..], needle))
}

fn match_at(haystack: &[u8], needle: &[u8]) -> bool {
    let mut hay_idx = 0;
    let mut needle_idx = 0;

    while needle_idx < needle.len() {
        let Some(&ch) = haystack.get(hay_idx) else {
            return false;
        };

        match needle[needle_idx] {
            b'.' => needle_idx += 1,
            b'#' => {
                if !ch.is_ascii_digit() {
                    return false;
                }
                needle_idx += 1;
            },
            b'[' => {
                let class_start = needle_idx + 1;
                let Some(len) = needle[class_start..].iter().position(|b| *b == b']') else {
                    return false;
                };
                if !needle[class_start..class_start + len].contains(&ch) {
                    return false;
                }
                needle_idx = class_start + len + 1;
            },
            lit => {
                if lit != ch {
                    return false;
                }
                needle_idx += 1;
            },
        }
        hay_idx += 1;
    }
    true
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    pub fn literals() {
        assert!(match_pattern("Intel(R) Xeon(R) CPU", "Xeon"));
        assert!(!match_pattern("Intel(R) Core(TM) i7", "Xeon"));
        assert!(match_pattern("anything", ""));
        assert!(match_pattern("", ""));
        assert!(!match_pattern("", "a"));
    }

    #[test]
    pub fn wildcards() {
        assert!(match_pattern("Core(TM)2 Duo CPU E8400", "E8###"));
        assert!(!match_pattern("Core(TM)2 Duo CPU E84a0", "E8###"));
        assert!(match_pattern("abc", "a.c"));
        assert!(!match_pattern("ab", "a.c"));
    }

    #[test]
    pub fn classes() {
        assert!(match_pattern("Xeon(R) CPU X5570", "[EWLX]55##"));
        assert!(match_pattern("Xeon(R) CPU L5520", "[EWLX]55##"));
        assert!(!match_pattern("Xeon(R) CPU Q5520", "[EWLX]55##"));
    }

    #[test]
    pub fn restarts_after_partial_match() {
        assert!(match_pattern("EEE8400", "E8###"));
        assert!(match_pattern("aab", "ab"));
    }

    #[test]
    pub fn unterminated_class_never_matches() {
        assert!(!match_pattern("X5570", "[EWLX55##"));
        assert!(!match_pattern("[", "["));
    }
}
