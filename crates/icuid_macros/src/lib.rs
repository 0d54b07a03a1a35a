use proc_macro::TokenStream;

mod derive;

/// Implement `icuid_base::EnumCountT` for an enum.
#[proc_macro_derive(EnumCount)]
pub fn derive_enum_count(item: TokenStream) -> TokenStream {
    derive::enum_count(item.into()).into()
}

/// Implement `icuid_base::EnumFromIndexT` for an enum, integer discriminants are respected.
#[proc_macro_derive(EnumFromIndex)]
pub fn derive_enum_from_index(item: TokenStream) -> TokenStream {
    derive::enum_from_index(item.into()).into()
}

/// Implement `icuid_base::EnumNameT`, the name is taken from `#[display("...")]` when present.
#[proc_macro_derive(EnumName, attributes(display))]
pub fn derive_enum_name(item: TokenStream) -> TokenStream {
    derive::enum_name(item.into()).into()
}

/// Implement `core::fmt::Display`, the text is taken from `#[display("...")]` when present.
#[proc_macro_derive(EnumDisplay, attributes(display))]
pub fn derive_enum_display(item: TokenStream) -> TokenStream {
    derive::enum_display(item.into()).into()
}

/// Implement `icuid_base::EnumFromNameT`.
///
/// The accepted name is the one given by `#[display("...")]`, or the identifier.
#[proc_macro_derive(EnumFromName, attributes(display))]
pub fn derive_enum_from_name(item: TokenStream) -> TokenStream {
    derive::enum_from_name(item.into()).into()
}
