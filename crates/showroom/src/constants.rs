//! Names and markers shared across the store.
//!
//! Field names follow the wire format the web layer already depends on, so they are
//! spelled exactly as they appear in the collection files.

/// File extension for collection files.
pub const COLLECTION_EXTENSION: &str = "json";

/// Suffix of the per-save temporary file (`<name>.json.<id>.tmp`) used by atomic saves.
pub const TEMP_SUFFIX: &str = "tmp";

/// Identifier field assigned at insert time.
pub const ID_FIELD: &str = "_id";

/// Insert timestamp field.
pub const CREATED_AT_FIELD: &str = "createdAt";

/// Last modification timestamp field.
pub const UPDATED_AT_FIELD: &str = "updatedAt";

/// Update operator selecting the fields to set.
pub const SET_OPERATOR: &str = "$set";

/// Prefix marking a field reference in a `$group` selector (`"$brand"`).
pub const FIELD_REFERENCE_PREFIX: char = '$';

/// Key of the single group produced when `$group` does not reference a field.
pub const GROUP_ALL_KEY: &str = "all";

/// Field holding the group size in `$group` output.
pub const GROUP_COUNT_FIELD: &str = "count";

/// Field holding the grouped documents in `$group` output.
pub const GROUP_ITEMS_FIELD: &str = "items";

/// Default storage root used by the command-line interface.
pub const DEFAULT_STORE_ROOT: &str = "data";
