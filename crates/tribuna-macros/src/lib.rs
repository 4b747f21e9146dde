use proc_macro::TokenStream;
use quote::quote;
use syn::parse::{Parse, ParseStream, Result};
use syn::{ItemStruct, LitStr};

struct Args {
    pattern: LitStr,
}

impl Parse for Args {
    fn parse(input: ParseStream) -> Result<Self> {
        let pattern = input.parse::<LitStr>()?;

        if pattern.value().is_empty() {
            return Err(syn::Error::new(
                pattern.span(),
                "route pattern cannot be empty, use \"/\" for the root",
            ));
        }

        Ok(Args { pattern })
    }
}

/// Ties a struct to a route pattern, e.g. `#[route("/debate/[slug]")]`.
///
/// Implements `InternalRoute` (the pattern itself) and `FullRoute` (the
/// type-erased surface the build drives), leaving only the `Route` impl to
/// the page.
#[proc_macro_attribute]
pub fn route(attrs: TokenStream, item: TokenStream) -> TokenStream {
    let item_struct = syn::parse_macro_input!(item as ItemStruct);
    let attrs = syn::parse_macro_input!(attrs as Args);

    let struct_name = &item_struct.ident;
    let pattern = &attrs.pattern;

    let expanded = quote! {
        impl ::tribuna::route::InternalRoute for #struct_name {
            fn pattern(&self) -> &'static str {
                #pattern
            }
        }

        impl ::tribuna::route::FullRoute for #struct_name {
            fn render_internal(
                &self,
                ctx: &::tribuna::route::PageContext,
            ) -> ::tribuna::route::RenderResult {
                ::tribuna::route::Route::render(self, ctx).into()
            }

            fn pages_internal(
                &self,
                ctx: &::tribuna::route::DynamicRouteContext,
            ) -> Vec<::tribuna::route::PagesResult> {
                ::tribuna::route::Route::pages(self, ctx)
                    .into_iter()
                    .map(|page| {
                        let raw_params: ::tribuna::route::PageParams = (&page.params).into();
                        let typed_params: Box<dyn ::std::any::Any + Send + Sync> =
                            Box::new(page.params);
                        let props: Box<dyn ::std::any::Any + Send + Sync> = Box::new(page.props);
                        (raw_params, typed_params, props)
                    })
                    .collect()
            }
        }

        #item_struct
    };

    TokenStream::from(expanded)
}

/// Derives the conversions from a typed params struct into the engine's
/// untyped `PageParams`, stringifying every field.
#[proc_macro_derive(Params)]
pub fn derive_params(item: TokenStream) -> TokenStream {
    let item_struct = syn::parse_macro_input!(item as ItemStruct);
    let struct_name = &item_struct.ident;

    let fields = match &item_struct.fields {
        syn::Fields::Named(fields) => fields
            .named
            .iter()
            .map(|field| field.ident.as_ref().unwrap())
            .collect::<Vec<_>>(),
        _ => panic!("Params can only be derived for structs with named fields"),
    };

    let expanded = quote! {
        impl ::core::convert::From<&#struct_name> for ::tribuna::route::PageParams {
            fn from(params: &#struct_name) -> Self {
                let mut map = ::tribuna::FxHashMap::default();
                #(
                    map.insert(stringify!(#fields).to_string(), params.#fields.to_string());
                )*
                ::tribuna::route::PageParams(map)
            }
        }

        impl ::core::convert::From<#struct_name> for ::tribuna::route::PageParams {
            fn from(params: #struct_name) -> Self {
                ::tribuna::route::PageParams::from(&params)
            }
        }
    };

    TokenStream::from(expanded)
}
