//! `#[handlers]`: parse an inherent impl block and generate its `Handlers` impl.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{Attribute, Error, FnArg, Ident, ImplItem, ItemImpl, LitStr, Pat, Result, Token, Type};

const SIGNALS_ATTR: &str = "signals";
const SKIP_ATTR: &str = "skip";
const CONSTRUCTOR: &str = "new";

// ---------------------------------------------------------------------------
// AST types
// ---------------------------------------------------------------------------

/// Arguments of the attribute itself: empty or `name = "..."`.
#[derive(Debug, Default)]
pub(crate) struct HandlersArgs {
    pub name: Option<String>,
}

/// One handler parameter: declared name and owned type.
pub(crate) struct Param {
    pub name: String,
    pub ty: Type,
}

/// One handler method.
pub(crate) struct HandlerMethod {
    pub ident: Ident,
    pub params: Vec<Param>,
    pub signals: Option<Vec<LitStr>>,
}

impl HandlerMethod {
    fn param_names(&self) -> Vec<&str> {
        self.params.iter().map(|p| p.name.as_str()).collect()
    }
}

/// How instances are constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Constructor {
    /// `fn new(sb: &Switchboard) -> Self`
    WithSwitchboard,
    /// `fn new() -> Self`
    NoArgs,
    /// `Default::default()`
    Default,
}

/// The analyzed impl block, marker attributes stripped.
pub(crate) struct HandlersImpl {
    pub item: ItemImpl,
    pub class_name: String,
    pub constructor: Constructor,
    pub methods: Vec<HandlerMethod>,
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

impl Parse for HandlersArgs {
    fn parse(input: ParseStream) -> Result<Self> {
        if input.is_empty() {
            return Ok(Self::default());
        }
        let key: Ident = input.parse()?;
        if key != "name" {
            return Err(Error::new(key.span(), "expected `name = \"...\"`"));
        }
        input.parse::<Token![=]>()?;
        let name: LitStr = input.parse()?;
        if !input.is_empty() {
            return Err(input.error("unexpected tokens after the class name"));
        }
        Ok(Self {
            name: Some(name.value()),
        })
    }
}

/// Remove the marker attribute `name` from `attrs`, returning it.
fn take_attr(attrs: &mut Vec<Attribute>, name: &str) -> Option<Attribute> {
    let pos = attrs.iter().position(|a| a.path().is_ident(name))?;
    Some(attrs.remove(pos))
}

fn parse_signals(attr: &Attribute) -> Result<Vec<LitStr>> {
    let list = attr.parse_args_with(Punctuated::<LitStr, Token![,]>::parse_terminated)?;
    if list.is_empty() {
        return Err(Error::new(attr.span(), "#[signals] needs at least one signal name"));
    }
    Ok(list.into_iter().collect())
}

fn class_name_of(ty: &Type) -> Option<String> {
    match ty {
        Type::Path(path) => path.path.segments.last().map(|s| s.ident.to_string()),
        _ => None,
    }
}

/// Analyze `item` under `args`.
pub(crate) fn analyze(args: HandlersArgs, mut item: ItemImpl) -> Result<HandlersImpl> {
    if let Some((_, path, _)) = &item.trait_ {
        return Err(Error::new(path.span(), "#[handlers] goes on an inherent impl block"));
    }
    if !item.generics.params.is_empty() {
        return Err(Error::new(
            item.generics.span(),
            "generic handler classes are not supported",
        ));
    }
    let class_name = match args.name.or_else(|| class_name_of(&item.self_ty)) {
        Some(name) => name,
        None => {
            return Err(Error::new(
                item.self_ty.span(),
                "cannot name this class; use #[handlers(name = \"...\")]",
            ))
        }
    };

    let mut constructor = Constructor::Default;
    let mut methods = Vec::new();

    for impl_item in &mut item.items {
        let ImplItem::Fn(func) = impl_item else {
            continue;
        };
        let signals = take_attr(&mut func.attrs, SIGNALS_ATTR)
            .map(|a| parse_signals(&a))
            .transpose()?;
        let skip = take_attr(&mut func.attrs, SKIP_ATTR).is_some();
        let sig = &func.sig;

        let receiver = sig.receiver();
        if receiver.is_none() {
            if signals.is_some() {
                return Err(Error::new(sig.ident.span(), "#[signals] needs a method with a receiver"));
            }
            if sig.ident == CONSTRUCTOR {
                constructor = match sig.inputs.len() {
                    0 => Constructor::NoArgs,
                    1 => Constructor::WithSwitchboard,
                    _ => {
                        return Err(Error::new(
                            sig.inputs.span(),
                            "the constructor takes nothing or `sb: &Switchboard`",
                        ))
                    }
                };
            }
            continue;
        }
        if skip {
            if signals.is_some() {
                return Err(Error::new(sig.ident.span(), "#[skip] and #[signals] conflict"));
            }
            continue;
        }
        if receiver.is_some_and(|r| r.reference.is_none()) {
            return Err(Error::new(
                sig.ident.span(),
                "handler methods take &self or &mut self",
            ));
        }
        if let Some(asyncness) = &sig.asyncness {
            return Err(Error::new(asyncness.span(), "handler methods cannot be async"));
        }
        if !sig.generics.params.is_empty() {
            return Err(Error::new(sig.generics.span(), "handler methods cannot be generic"));
        }

        let mut params = Vec::new();
        for input in &sig.inputs {
            let FnArg::Typed(typed) = input else {
                continue;
            };
            let Pat::Ident(pat) = typed.pat.as_ref() else {
                return Err(Error::new(
                    typed.pat.span(),
                    "handler parameters must be plain identifiers",
                ));
            };
            if let Type::Reference(reference) = typed.ty.as_ref() {
                return Err(Error::new(
                    reference.span(),
                    "handler parameters are owned values (use Rc<Ui>, Switchboard, String, ...)",
                ));
            }
            params.push(Param {
                name: pat.ident.to_string(),
                ty: (*typed.ty).clone(),
            });
        }

        methods.push(HandlerMethod {
            ident: sig.ident.clone(),
            params,
            signals,
        });
    }

    Ok(HandlersImpl {
        item,
        class_name,
        constructor,
        methods,
    })
}

// ---------------------------------------------------------------------------
// Code generation
// ---------------------------------------------------------------------------

fn generate_method(ty: &Type, method: &HandlerMethod) -> TokenStream {
    let name = method.ident.to_string();
    let ident = &method.ident;
    let params = method.param_names();
    let inv = if method.params.is_empty() {
        format_ident!("_inv")
    } else {
        format_ident!("inv")
    };
    let bindings: Vec<Ident> = (0..method.params.len())
        .map(|i| format_ident!("__arg{}", i))
        .collect();
    let extracts = method.params.iter().enumerate().map(|(i, p)| {
        let binding = &bindings[i];
        let pty = &p.ty;
        quote! { let #binding = #inv.extract::<#pty>(#i)?; }
    });

    let body = quote! {
        |this: &mut #ty, #inv: &::switchboard::handler::Invocation| {
            #(#extracts)*
            ::switchboard::handler::IntoHandlerResult::into_handler_result(
                this.#ident(#(#bindings),*)
            )
        }
    };

    match &method.signals {
        None => quote! { .method(#name, &[#(#params),*], #body) },
        Some(signals) => quote! { .method_on(#name, &[#(#signals),*], &[#(#params),*], #body) },
    }
}

pub(crate) fn generate(analyzed: &HandlersImpl) -> TokenStream {
    let item = &analyzed.item;
    let ty = &analyzed.item.self_ty;
    let class_name = &analyzed.class_name;

    let construct = match analyzed.constructor {
        Constructor::WithSwitchboard => quote! {
            |sb: &::switchboard::Switchboard| <#ty>::new(sb)
        },
        Constructor::NoArgs => quote! {
            |_: &::switchboard::Switchboard| <#ty>::new()
        },
        Constructor::Default => quote! {
            |_: &::switchboard::Switchboard| <#ty as ::core::default::Default>::default()
        },
    };
    let methods = analyzed.methods.iter().map(|m| generate_method(ty, m));

    quote! {
        #item

        impl ::switchboard::handler::Handlers for #ty {
            fn handler_class() -> ::switchboard::handler::HandlerClass {
                ::switchboard::handler::HandlerClass::builder(#class_name, #construct)
                    #(#methods)*
                    .build()
            }
        }
    }
}

/// Entry point for the `#[handlers]` attribute.
pub(crate) fn handlers_impl(attr: TokenStream, item: TokenStream) -> Result<TokenStream> {
    let args: HandlersArgs = syn::parse2(attr)?;
    let item: ItemImpl = syn::parse2(item)?;
    let analyzed = analyze(args, item)?;
    Ok(generate(&analyzed))
}
