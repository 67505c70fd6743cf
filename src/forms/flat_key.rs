// src/forms/flat_key.rs
//! Flat-key codec.
//!
//! A widget's identity in the session store is a single string: the path of
//! field names from the form root to the leaf, joined with `+`. The first
//! segment also carries the entity id (`name_<id>`), so two entities rendered
//! from the same schema never share widget keys. List items may use
//! `field[index]` on the last segment.

use bevy::log::warn;
use std::collections::BTreeMap;

use super::error::{FormError, FormResult};
use super::field_value::{FieldMap, FieldValue};

pub const PATH_DELIMITER: char = '+';
pub const ENTITY_DELIMITER: char = '_';

/// Joins a field path into a flat key (`parent+child+leaf`).
pub fn encode_path<S: AsRef<str>>(path: &[S]) -> String {
    let mut out = String::new();
    for (i, segment) in path.iter().enumerate() {
        if i > 0 {
            out.push(PATH_DELIMITER);
        }
        out.push_str(segment.as_ref());
    }
    out
}

/// Builds the session key for one widget: the first segment is suffixed with
/// `_<entity_id>`, the rest of the path follows with `+`.
pub fn widget_key<S: AsRef<str>>(entity_id: &str, path: &[S]) -> String {
    let mut key = encode_path(path);
    let insert_at = key.find(PATH_DELIMITER).unwrap_or(key.len());
    key.insert_str(insert_at, &entity_suffix(entity_id));
    key
}

/// Extends an existing widget key by one nested field.
pub fn child_key(parent: &str, field: &str) -> String {
    format!("{}{}{}", parent, PATH_DELIMITER, field)
}

pub fn entity_suffix(entity_id: &str) -> String {
    format!("{}{}", ENTITY_DELIMITER, entity_id)
}

/// Returns the flat key with the entity suffix removed, or `None` when the key
/// does not belong to `entity_id`. Ownership is decided on the first path
/// segment (before any `+` or `[`), which must end with `_<entity_id>`.
pub fn strip_entity(key: &str, entity_id: &str) -> Option<String> {
    let head_end = key
        .find(|c| c == PATH_DELIMITER || c == '[')
        .unwrap_or(key.len());
    let (head, tail) = key.split_at(head_end);
    let field = head.strip_suffix(&entity_suffix(entity_id))?;
    if field.is_empty() {
        return None;
    }
    Some(format!("{}{}", field, tail))
}

/// Splits `prefix[index]` into its prefix and numeric index. Returns `Ok(None)`
/// when the key carries no list notation.
pub fn parse_indexed_key(key: &str) -> FormResult<Option<(&str, usize)>> {
    let Some(open) = key.rfind('[') else {
        return Ok(None);
    };
    let Some(inner) = key[open + 1..].strip_suffix(']') else {
        return Err(FormError::InvalidListIndex {
            key: key.to_string(),
            index: key[open + 1..].to_string(),
        });
    };
    let index = inner.trim().parse::<usize>().map_err(|_| FormError::InvalidListIndex {
        key: key.to_string(),
        index: inner.to_string(),
    })?;
    Ok(Some((&key[..open], index)))
}

fn split_path(key: &str) -> FormResult<Vec<&str>> {
    let segments: Vec<&str> = key.split(PATH_DELIMITER).collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(FormError::EmptySegment(key.to_string()));
    }
    Ok(segments)
}

/// Assigns `value` at `path`, creating intermediate mappings as needed. An
/// existing non-mapping value on the way is replaced by a mapping, so later
/// branches join the tree instead of overwriting it at the root.
pub fn assign_path(root: &mut FieldMap, path: &[&str], value: FieldValue) {
    let Some((last, parents)) = path.split_last() else {
        return;
    };
    let mut level = root;
    for segment in parents {
        let slot = level
            .entry((*segment).to_string())
            .or_insert_with(|| FieldValue::Map(FieldMap::new()));
        if !slot.is_map() {
            warn!(
                "Flat-key decode: '{}' held a {} value and is replaced by a nested mapping.",
                segment,
                slot.type_name()
            );
            *slot = FieldValue::Map(FieldMap::new());
        }
        let FieldValue::Map(inner) = slot else {
            return;
        };
        level = inner;
    }
    // Keep the union when a whole branch lands on an existing branch
    if let (Some(FieldValue::Map(existing)), FieldValue::Map(incoming)) =
        (level.get_mut(*last), &value)
    {
        super::dict_utils::merge(existing, incoming);
        return;
    }
    level.insert((*last).to_string(), value);
}

/// Groups `prefix[index]` entries by prefix and orders each group by index.
/// Gaps in the indices are closed up, so the result is always a dense list.
pub fn assemble_indexed_lists<'a, I>(entries: I) -> BTreeMap<String, Vec<FieldValue>>
where
    I: IntoIterator<Item = (&'a str, usize, FieldValue)>,
{
    let mut grouped: BTreeMap<String, BTreeMap<usize, FieldValue>> = BTreeMap::new();
    for (prefix, index, value) in entries {
        grouped.entry(prefix.to_string()).or_default().insert(index, value);
    }
    grouped
        .into_iter()
        .map(|(prefix, items)| (prefix, items.into_values().collect()))
        .collect()
}

/// Decodes a flat `key -> value` mapping back into a nested mapping.
///
/// - `a+b+c` is assigned at `a.b.c`, creating `a` and `a.b` when missing.
/// - `a+tags[0]`, `a+tags[1]` are grouped into a list at `a.tags`.
/// - Anything else is assigned at the top level.
///
/// A malformed key is logged and skipped; it never blocks the other keys.
pub fn decode<'a, I>(flat: I) -> FieldMap
where
    I: IntoIterator<Item = (&'a str, &'a FieldValue)>,
{
    let mut out = FieldMap::new();
    let mut indexed: Vec<(&'a str, usize, FieldValue)> = Vec::new();

    for (key, value) in flat {
        match parse_indexed_key(key) {
            Ok(Some((prefix, index))) => {
                indexed.push((prefix, index, value.clone()));
                continue;
            }
            Ok(None) => {}
            Err(e) => {
                warn!("Flat-key decode: skipping key: {}", e);
                continue;
            }
        }
        match split_path(key) {
            Ok(segments) => assign_path(&mut out, &segments, value.clone()),
            Err(e) => warn!("Flat-key decode: skipping key: {}", e),
        }
    }

    for (prefix, items) in assemble_indexed_lists(indexed) {
        match split_path(&prefix) {
            Ok(segments) => assign_path(&mut out, &segments, FieldValue::List(items)),
            Err(e) => warn!("Flat-key decode: skipping list: {}", e),
        }
    }
    out
}

/// Produces every leaf path of `map` as a flat key. Lists are leaves. Empty
/// nested mappings have no leaves and therefore vanish.
pub fn flatten(map: &FieldMap) -> Vec<(String, FieldValue)> {
    let mut out = Vec::new();
    flatten_into(map, None, &mut out);
    out
}

fn flatten_into(map: &FieldMap, prefix: Option<&str>, out: &mut Vec<(String, FieldValue)>) {
    for (key, value) in map {
        let path = match prefix {
            Some(p) => child_key(p, key),
            None => key.clone(),
        };
        match value {
            FieldValue::Map(inner) => flatten_into(inner, Some(&path), out),
            leaf => out.push((path, leaf.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::field_value::field_map_from_json;
    use serde_json::json;

    fn map(v: serde_json::Value) -> FieldMap {
        field_map_from_json(&v).unwrap()
    }

    fn decode_pairs(pairs: &[(&str, FieldValue)]) -> FieldMap {
        decode(pairs.iter().map(|(k, v)| (*k, v)))
    }

    #[test]
    fn test_encode_path() {
        assert_eq!(encode_path(&["a", "b", "c"]), "a+b+c");
        assert_eq!(encode_path(&["solo"]), "solo");
        assert_eq!(encode_path::<&str>(&[]), "");
    }

    #[test]
    fn test_widget_key_suffixes_first_segment() {
        assert_eq!(widget_key("42", &["name"]), "name_42");
        assert_eq!(widget_key("42", &["icons", "win"]), "icons_42+win");
        assert_eq!(child_key("icons_42", "win"), "icons_42+win");
    }

    #[test]
    fn test_strip_entity() {
        assert_eq!(strip_entity("icons_42+win", "42").as_deref(), Some("icons+win"));
        assert_eq!(strip_entity("name_42", "42").as_deref(), Some("name"));
        assert_eq!(strip_entity("tags_42[1]", "42").as_deref(), Some("tags[1]"));
        // Another entity whose id merely contains "42"
        assert_eq!(strip_entity("name_142", "42"), None);
        assert_eq!(strip_entity("name_42x", "42"), None);
        assert_eq!(strip_entity("_42", "42"), None);
    }

    #[test]
    fn test_parse_indexed_key() {
        assert_eq!(parse_indexed_key("tags[3]"), Ok(Some(("tags", 3))));
        assert_eq!(parse_indexed_key("a+tags[0]"), Ok(Some(("a+tags", 0))));
        assert_eq!(parse_indexed_key("plain"), Ok(None));
        assert!(parse_indexed_key("tags[x]").is_err());
        assert!(parse_indexed_key("tags[1").is_err());
    }

    #[test]
    fn test_decode_merges_branches() {
        let out = decode_pairs(&[
            ("icons+win", FieldValue::text("W")),
            ("name", FieldValue::text("n")),
            ("icons+lose", FieldValue::text("L")),
            ("icons+deep+x", FieldValue::Int(1)),
            ("icons+deep+y", FieldValue::Int(2)),
        ]);
        assert_eq!(
            out,
            map(json!({"icons": {"win": "W", "lose": "L", "deep": {"x": 1, "y": 2}}, "name": "n"}))
        );
    }

    #[test]
    fn test_decode_groups_indexed_keys_in_order() {
        let out = decode_pairs(&[
            ("tags[2]", FieldValue::text("c")),
            ("tags[0]", FieldValue::text("a")),
            ("cfg+ids[1]", FieldValue::Int(20)),
            ("tags[1]", FieldValue::text("b")),
            ("cfg+ids[0]", FieldValue::Int(10)),
            ("cfg+name", FieldValue::text("x")),
        ]);
        assert_eq!(out, map(json!({"cfg": {"name": "x", "ids": [10, 20]}, "tags": ["a", "b", "c"]})));
    }

    #[test]
    fn test_assemble_closes_gaps() {
        let lists = assemble_indexed_lists(vec![
            ("t", 5, FieldValue::Int(5)),
            ("t", 1, FieldValue::Int(1)),
        ]);
        assert_eq!(lists["t"], vec![FieldValue::Int(1), FieldValue::Int(5)]);
    }

    #[test]
    fn test_malformed_keys_do_not_block_others() {
        let out = decode_pairs(&[
            ("a++b", FieldValue::Int(1)),
            ("tags[x]", FieldValue::Int(2)),
            ("ok", FieldValue::Int(3)),
            ("n+fine", FieldValue::Int(4)),
        ]);
        assert_eq!(out, map(json!({"ok": 3, "n": {"fine": 4}})));
    }

    #[test]
    fn test_repeated_decode_is_additive() {
        let mut root = decode_pairs(&[("a+b", FieldValue::Int(1))]);
        let second = decode_pairs(&[("a+c", FieldValue::Int(2))]);
        crate::forms::dict_utils::merge(&mut root, &second);
        assert_eq!(root, map(json!({"a": {"b": 1, "c": 2}})));
    }

    #[test]
    fn test_flatten_decode_round_trip() {
        let original = map(json!({
            "name": "p",
            "active": true,
            "odds": 1.5,
            "tips_filter": ["free", "vip"],
            "icons": {
                "win": "W",
                "l2": {"l3": {"l4": {"l5": "deep", "other": 0}}}
            },
            "last": null
        }));
        let flat = flatten(&original);
        assert!(flat.iter().any(|(k, _)| k == "icons+l2+l3+l4+l5"));
        let decoded = decode(flat.iter().map(|(k, v)| (k.as_str(), v)));
        assert_eq!(decoded, original);
    }

    fn round_trip(original: &FieldMap) -> FieldMap {
        let flat = flatten(original);
        decode(flat.iter().map(|(k, v)| (k.as_str(), v)))
    }

    #[test]
    fn test_round_trip_over_shapes() {
        let shapes = [
            json!({}),
            json!({"only": null}),
            json!({"list": [], "items": [1, "two", null], "flag": false}),
            json!({"a": {"b": 1}, "ab": {"b": 2}, "a_b": 3}),
            json!({"a": {"b": {"c": {"d": {"e": 1, "f": [1]}}, "x": {"d": 2}}}}),
            json!({"icons": {"win": "W"}, "win": {"icons": "I"}}),
            json!({"n": {"m": {"n": {"m": {"n": "same names at every level"}}}}}),
        ];
        for shape in shapes {
            let original = map(shape);
            assert_eq!(round_trip(&original), original, "shape {:?}", original);
        }
    }

    #[test]
    fn test_round_trip_generated_shapes() {
        use crate::forms::test_shapes::{depth_of, nested_map, Lcg, MAX_DEPTH};
        let mut deepest = 0;
        for seed in 0..200 {
            let original = nested_map(&mut Lcg::new(seed), 1);
            deepest = deepest.max(depth_of(&original));
            assert!(depth_of(&original) <= MAX_DEPTH);
            assert_eq!(round_trip(&original), original, "seed {}", seed);
        }
        assert_eq!(deepest, MAX_DEPTH);
    }
}
