//! Contains traits used by icuid macros


/// Trait to get the number of elements in an enum
pub trait EnumCountT {
    /// Count or number of element in an enum
    const COUNT : usize;
}

/// Trait to get an enum from a given index
pub trait EnumFromIndexT: Sized {
    /// Try to convert an index to an enum
    fn from_idx(idx: usize) -> Option<Self>;

    /// Try to convert an index to an enum, if it couldn't convert it, return a default value
    fn from_idx_or(idx: usize, default: Self) -> Self;

    /// Get the index of the variant, the inverse of `from_idx`
    fn to_idx(&self) -> usize;
}

/// Trait to get the canonical name of an enum variant.
pub trait EnumNameT {
    /// Name of the variant, as given by `#[display("...")]`, or the variant's identifier.
    fn name(&self) -> &'static str;
}

pub trait EnumFromNameT: Sized {
    /// Try to parse the enum from a string slice.
    fn parse(s: &str) -> Option<Self>;
}
