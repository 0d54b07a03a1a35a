use proc_macro2::*;
use quote::quote;
use syn::*;

fn parse_enum(item: TokenStream) -> core::result::Result<(Ident, DataEnum), TokenStream> {
	let input_parsed = match syn::parse2::<DeriveInput>(item) {
	    Ok(derived_input) => derived_input,
	    Err(err) => return Err(err.to_compile_error()),
	};

    match input_parsed.data {
		Data::Enum(body) => Ok((input_parsed.ident, body)),
		_ => Err(quote!( compile_error!("Not an enum"); )),
	}
}

/// Get the string value of the first `#[<attr_name>("...")]` attribute on a variant
fn attr_string(variant: &Variant, attr_name: &str) -> Option<TokenStream> {
    variant.attrs.iter()
    .filter(|attr| attr.path().get_ident().map_or(false, |ident| ident.to_string() == attr_name))
    .map(|attr| attr.parse_args::<LitStr>().map_or_else(|err| err.to_compile_error(), |parsed| {
        let val = parsed.value();
        quote!(#val)
    }))
    .nth(0)
}

fn ident_string(variant: &Variant) -> TokenStream {
    let val = variant.ident.to_string();
    quote!(#val)
}

pub fn enum_count(item: TokenStream) -> TokenStream {
    let (ident, body_data) = match parse_enum(item) {
        Ok(parsed) => parsed,
        Err(err) => return err,
    };
    let count = body_data.variants.len();

    quote!{
        impl icuid_base::EnumCountT for #ident {
            const COUNT: usize = #count;
        }
    }
}

pub fn enum_from_index(item: TokenStream) -> TokenStream {
    let (ident, body_data) = match parse_enum(item) {
        Ok(parsed) => parsed,
        Err(err) => return err,
    };

    let mut variants = Vec::with_capacity(body_data.variants.len());
    let mut indices = Vec::with_capacity(body_data.variants.len());
    let mut i = 0;
    for variant in body_data.variants { 
        let idx = match variant.discriminant {
            Some((_, expr)) => match expr {
                Expr::Lit(lit) => match lit.lit {
                    Lit::Int(int) => match int.base10_parse::<usize>() {
                        Ok(int) => int,
                        Err(err) => {
                            let msg = err.to_string();
                            return quote!(compile_error!(#msg));
                        },
                    },
                    _ => return quote!(compile_error!("Only integer descriminants are supported by EnumFromIndex")),
                },
                _ => return quote!(compile_error!("Only integer descriminants are supported by EnumFromIndex")),
            },
            None => i,
        };
        
        variants.push(variant.ident);
        indices.push(idx);

        i = idx + 1;
    }

    quote!{
        impl icuid_base::EnumFromIndexT for #ident {
            fn from_idx(idx: usize) -> Option<Self> {
                match idx {
                    #(#indices => Some(Self::#variants),)*
                    _ => None,
                }
            }
            
            fn from_idx_or(idx: usize, default: Self) -> Self {
                match idx {
                    #(#indices => Self::#variants,)*
                    _ => default,
                }
            }

            fn to_idx(&self) -> usize {
                match self {
                    #(Self::#variants => #indices,)*
                }
            }
        }
    }
}

pub fn enum_name(item: TokenStream) -> TokenStream {
    let (ident, body_data) = match parse_enum(item) {
        Ok(parsed) => parsed,
        Err(err) => return err,
    };

    let members = body_data.variants.iter().map(|variant| variant.ident.clone());
    let names = body_data.variants.iter().map(|variant| attr_string(variant, "display").unwrap_or_else(|| ident_string(variant)));

    quote!{
        impl icuid_base::EnumNameT for #ident {
            fn name(&self) -> &'static str {
                match self {
                    #(#ident::#members => #names,)*
                }
            }
        }
    }
}

pub fn enum_display(item: TokenStream) -> TokenStream {
    let (ident, body_data) = match parse_enum(item) {
        Ok(parsed) => parsed,
        Err(err) => return err,
    };

    let members = body_data.variants.iter().map(|variant| variant.ident.clone());
    let names = body_data.variants.iter().map(|variant| attr_string(variant, "display").unwrap_or_else(|| ident_string(variant)));

    quote!{
        impl core::fmt::Display for #ident {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                match self {
                    #(#ident::#members => f.pad(#names),)*
                }
            }
        }
    }
}

pub fn enum_from_name(item: TokenStream) -> TokenStream {
    let (ident, body_data) = match parse_enum(item) {
        Ok(parsed) => parsed,
        Err(err) => return err,
    };

    let members = body_data.variants.iter().map(|variant| variant.ident.clone());
    let names = body_data.variants.iter().map(|variant| attr_string(variant, "display").unwrap_or_else(|| ident_string(variant)));

    quote!{
        impl icuid_base::EnumFromNameT for #ident {
            fn parse(s: &str) -> Option<Self> {
                match s {
                    #(#names => Some(Self::#members),)*
                    _ => None,
                }
            }
        }
    }
}
