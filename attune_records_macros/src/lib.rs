mod entity;

use proc_macro::TokenStream;

// ============================================================================
// #[derive(Entity)]
// ============================================================================

/// Derive macro implementing `attune_records::Entity` for a plain struct.
///
/// Struct-level attributes name the collection and how records are described
/// in notifications. Field-level attributes become the record schema.
///
/// # Usage
///
/// ```ignore
/// #[derive(Clone, Debug, Serialize, Deserialize, Entity)]
/// #[entity(collection = "stakeholders", noun = "Stakeholder", label = name)]
/// pub struct Stakeholder {
///     #[entity(required, min_len = 2, search)]
///     pub name: String,
///     #[entity(email, optional)]
///     pub email: String,
///     #[entity(min = 0, max = 100)]
///     pub alignment: u8,
///     #[entity(min_items = 1)]
///     pub systems: Vec<String>,
/// }
/// ```
///
/// Struct attributes:
/// - `collection = "..."`: defaults to the snake_case struct name plus `s`
/// - `noun = "..."`: defaults to the struct name
/// - `label = field`: defaults to a field named `name`
/// - `id_prefix = "..."`: display prefix for record ids
///
/// Field attributes:
/// - text fields: `required`, `min_len = N`, `max_len = N`, `email`,
///   `optional`, `search`
/// - numeric fields: `min = X`, `max = X` (both together form a range)
/// - `Vec` fields: `min_items = N`
/// - any field: `preserve` keeps the stored value when a record is edited
///   (lifecycle state, review stamps)
/// - `Tracked<_>` fields: `lifecycle` refuses in-place changes that do not
///   follow the state machine
#[proc_macro_derive(Entity, attributes(entity))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    entity::derive_entity(input)
}
