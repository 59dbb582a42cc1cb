//! Gameplay tag containers (`ExcludeItems`, `AllowedItems`)
//!
//! In storage tables these properties wrap a tag list one level down:
//!
//! ```json
//! {"Name": "ExcludeItems", "Value": [{"Name": "ExcludeItems", "Value": ["Item.Brew", "Item.Ore"]}]}
//! ```
//!
//! A `<change>` on one of them swaps a tag (`original` out, `value` in) and a
//! `<delete>` removes one, instead of overwriting the property.

use serde_json::Value;

use crate::json::str_field;
use crate::json::table::find_row_mut;

/// Property names edited as tag containers
pub const TAG_CONTAINER_PROPERTIES: [&str; 2] = ["ExcludeItems", "AllowedItems"];

/// Whether `property` is edited as a tag container
pub fn is_tag_container(property: &str) -> bool {
    TAG_CONTAINER_PROPERTIES.contains(&property)
}

/// Find the tag list of `property` on data-table row `item`
pub fn tag_list_mut<'a>(doc: &'a mut Value, item: &str, property: &str) -> Option<&'a mut Vec<Value>> {
    find_row_mut(doc, item)?
        .get_mut("Value")?
        .as_array_mut()?
        .iter_mut()
        .filter(|prop| str_field(prop, "Name") == Some(property))
        .find_map(|prop| {
            prop.get_mut("Value")?
                .as_array_mut()?
                .first_mut()?
                .get_mut("Value")?
                .as_array_mut()
        })
}

/// Remove the first occurrence of `tag`. Returns whether it was present.
pub fn remove_tag(tags: &mut Vec<Value>, tag: &str) -> bool {
    match tags.iter().position(|t| t.as_str() == Some(tag)) {
        Some(index) => {
            tags.remove(index);
            true
        }
        None => false,
    }
}

/// Append `tag` unless it is already present. Returns whether it was added.
pub fn add_tag(tags: &mut Vec<Value>, tag: &str) -> bool {
    if tags.iter().any(|t| t.as_str() == Some(tag)) {
        return false;
    }
    tags.push(Value::String(tag.to_string()));
    true
}
