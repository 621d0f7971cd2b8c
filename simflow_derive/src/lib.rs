extern crate proc_macro;
extern crate quote;
extern crate syn;

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, DeriveInput};

/// Generates the `from_value` constructor used by the station factory, and
/// the `SerializableStation` implementation that reports the station type
/// and its flattened configuration fields.  The station type is the struct
/// name, so `Decide` persists as `type: Decide`.
#[proc_macro_derive(SerializableStation)]
pub fn station(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    let name = input.ident;
    let tokens = quote! {
        impl #name {
            pub fn from_value(
                value: serde_yaml::Value,
            ) -> Result<Box<dyn StationBehavior>, serde_yaml::Error> {
                serde_yaml::from_value::<Self>(value)
                    .map(|station| Box::new(station) as Box<dyn StationBehavior>)
            }
        }
        impl SerializableStation for #name {
            fn get_type(&self) -> &'static str {
                stringify!(#name)
            }
            fn serialize(&self) -> Result<serde_yaml::Value, serde_yaml::Error> {
                serde_yaml::to_value(self)
            }
        }
    };
    tokens.into()
}
