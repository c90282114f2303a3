//! Proc macros for switchboard: `#[handlers]` handler-class derivation.
//!
//! This crate is not meant to be used directly; enable the `macros` feature on `switchboard`.

use proc_macro::TokenStream;

mod handlers_macro;

/// Derive a handler class from an inherent `impl` block.
///
/// Every method with a `&self` or `&mut self` receiver becomes a handler
/// method named after the function. Parameter names are what the binder
/// inspects, so they must be signal parameter names (`state`, `text`,
/// `index`, ...) or injections (`widget`, `ui`, `sb`). Parameter types must
/// implement `FromArg`.
///
/// # Attributes
///
/// - `#[handlers]`: the class is named after the type
/// - `#[handlers(name = "MainSlots")]`: explicit class name
/// - `#[signals("text-changed", "enter-pressed")]` on a method: connect to
///   these signals instead of the widget type's default
/// - `#[skip]` on a method: not a handler
///
/// An associated `fn new(sb: &Switchboard) -> Self` or `fn new() -> Self` is
/// used as the constructor; without one the type must implement `Default`.
///
/// # Example
///
/// ```ignore
/// #[handlers]
/// impl MainSlots {
///     fn new(sb: &Switchboard) -> Self { ... }
///
///     fn save_btn(&mut self, state: bool) { ... }
///
///     #[signals("text-changed", "enter-pressed")]
///     fn search_box(&mut self, widget: WidgetHandle) { ... }
/// }
/// ```
#[proc_macro_attribute]
pub fn handlers(attr: TokenStream, item: TokenStream) -> TokenStream {
    handlers_macro::handlers_impl(attr.into(), item.into())
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}
