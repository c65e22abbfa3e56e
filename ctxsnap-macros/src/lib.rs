use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod parsed;

use parsed::ParsedEntity;

/// Derives `Describable` and `EntityMetadata` for a struct with named fields.
///
/// Every field becomes an attribute unless marked `#[ctxsnap(skip)]`.
///
/// ```text
/// #[derive(Describable, Serialize)]
/// #[ctxsnap(entity = "BlogPost")]
/// pub struct Post {
///     pub title: String,
///     #[ctxsnap(rename = "stars")]
///     pub rating: i32,
///     pub summary: Option<String>,
///     #[ctxsnap(json)]
///     pub tags: Vec<String>,
///     #[ctxsnap(skip)]
///     pub render_cache: Option<String>,
/// }
/// ```
///
/// Field types map to attribute kinds: `String` to text, integers up to
/// `i64`/`u32` (and `isize`) to integer, `f32`/`f64` to float, `bool` to
/// boolean, `Vec<u8>` to binary and `DateTime<Utc>` to datetime. `Option<T>`
/// makes the attribute optional. Any other type, including `u64`, `usize` and
/// `DateTime` with another timezone, needs `#[ctxsnap(json)]`, which stores it
/// as a JSON tree. An optional JSON field that is `None` becomes `Null`.
#[proc_macro_derive(Describable, attributes(ctxsnap))]
pub fn derive_describable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match ParsedEntity::from_input(&input) {
        Ok(parsed) => parsed.emit().into(),
        Err(err) => err.to_compile_error().into(),
    }
}
