use proc_macro::{self, TokenStream};
use proc_macro2::Span;
use quote::quote;
use syn::{
    parse_macro_input, parse_quote, punctuated::Punctuated, FnArg, Ident, ItemFn, LitStr,
    PatType, Token, Type,
};

/// Registers a function as a method installed on every synthesized record
/// type. The first parameter is the receiver (`&Record` or `&mut Record`),
/// the rest are `&Value` arguments, optionally followed by a trailing
/// `&[Value]` that collects any remaining arguments.
///
/// Several names may be given to install the same function under aliases:
/// `#[builtin("size", "length")]`.
#[proc_macro_attribute]
pub fn builtin(names: TokenStream, item: TokenStream) -> TokenStream {
    let names = parse_macro_input!(names with Punctuated::<LitStr, Token![,]>::parse_terminated);
    let builtin = parse_macro_input!(item as ItemFn);

    let impl_name = builtin.sig.ident.clone();
    let wrapper_name = impl_name.to_string() + "_wrapper";
    let wrapper_name = Ident::new(&wrapper_name, Span::call_site());

    let is_variadic = if let Some(last_arg) = builtin.sig.inputs.iter().skip(1).last() {
        is_slice(last_arg)
    } else {
        false
    };

    let num_args = if is_variadic {
        builtin.sig.inputs.len().saturating_sub(2)
    } else {
        builtin.sig.inputs.len().saturating_sub(1)
    };

    let arg_indices: Vec<_> = (0..num_args).collect();
    let wrapper: ItemFn = if !is_variadic {
        parse_quote! {
            fn #wrapper_name(
                record: &mut ::record_factory::records::Record,
                args: &[::record_factory::value::Value],
            ) -> ::core::result::Result<
                ::record_factory::value::Value,
                ::record_factory::exceptions::Condition,
            > {
                #impl_name(
                    record,
                    #( &args[#arg_indices], )*
                )
            }
        }
    } else {
        parse_quote! {
            fn #wrapper_name(
                record: &mut ::record_factory::records::Record,
                args: &[::record_factory::value::Value],
            ) -> ::core::result::Result<
                ::record_factory::value::Value,
                ::record_factory::exceptions::Condition,
            > {
                let (required_args, var_args) = args.split_at(#num_args);
                #impl_name(
                    record,
                    #( &required_args[#arg_indices], )*
                    var_args
                )
            }
        }
    };

    let names = names.iter();
    quote! {
        #builtin

        #wrapper

        #(
            ::record_factory::builtin::inventory::submit! {
                ::record_factory::builtin::Builtin::new(#names, #num_args, #is_variadic, #wrapper_name)
            }
        )*
    }
    .into()
}

fn is_slice(arg: &FnArg) -> bool {
    if let FnArg::Typed(PatType { ty, .. }) = arg {
        if let Type::Reference(ref reference) = ty.as_ref() {
            return matches!(reference.elem.as_ref(), Type::Slice(_));
        }
    }
    false
}
