// src/forms/dict_utils.rs
//! Recursive helpers over [`FieldMap`] trees: merge stored values onto schema
//! defaults, strip UI hint keys before persisting, and normalize leaf values
//! before they cross the REST boundary.

use super::field_value::{FieldMap, FieldValue};

/// Hint suffixes that never belong in a persisted payload.
pub const HINT_SUBSTRINGS: &[&str] = &["_help", "_options", "_field", "_disabled"];

/// Recursively merges `src` into `dst`. When both sides hold a mapping under the
/// same key the merge descends; otherwise the `src` value wins.
pub fn merge(dst: &mut FieldMap, src: &FieldMap) {
    for (key, src_value) in src {
        match (dst.get_mut(key), src_value) {
            (Some(FieldValue::Map(dst_map)), FieldValue::Map(src_map)) => merge(dst_map, src_map),
            _ => {
                dst.insert(key.clone(), src_value.clone());
            }
        }
    }
}

/// Rebuilds `data` keeping only keys that contain (`exclude == false`) or do
/// not contain (`exclude == true`) any of `substrings`.
///
/// Nested mappings are filtered even when their parent key did not match in
/// include mode, so hint keys nested at any depth are always reachable.
pub fn filter(data: &FieldMap, substrings: &[&str], exclude: bool) -> FieldMap {
    let mut out = FieldMap::new();
    for (key, value) in data {
        let matched = substrings.iter().any(|s| key.contains(s));
        let keep = matched != exclude;
        match value {
            FieldValue::Map(inner) if keep || !exclude => {
                out.insert(key.clone(), FieldValue::Map(filter(inner, substrings, exclude)));
            }
            _ if keep => {
                out.insert(key.clone(), value.clone());
            }
            _ => {}
        }
    }
    out
}

/// Strips every `_help`/`_options`/`_field`/`_disabled` key at any depth.
pub fn strip_hints(data: &FieldMap) -> FieldMap {
    filter(data, HINT_SUBSTRINGS, true)
}

/// Replaces every non-mapping leaf with `f(leaf)`, in place. Lists are leaves.
pub fn walk_transform<F>(data: &mut FieldMap, f: &mut F)
where
    F: FnMut(FieldValue) -> FieldValue,
{
    for value in data.values_mut() {
        if let FieldValue::Map(inner) = value {
            walk_transform(inner, f);
        } else {
            let leaf = std::mem::take(value);
            *value = f(leaf);
        }
    }
}

/// Leaf transform for [`walk_transform`]: full datetimes become ISO-8601 text,
/// bare times `HH:MM`, dates `YYYY-MM-DD`. Other values pass through.
pub fn encode_for_wire(value: FieldValue) -> FieldValue {
    match value {
        FieldValue::DateTime(_) | FieldValue::Time(_) | FieldValue::Date(_) => {
            FieldValue::Text(value.to_string())
        }
        other => other,
    }
}

/// Convenience wrapper applying [`encode_for_wire`] to a whole payload.
pub fn encode_payload_for_wire(data: &mut FieldMap) {
    walk_transform(data, &mut encode_for_wire);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::field_value::field_map_from_json;
    use chrono::{NaiveDate, NaiveTime};
    use serde_json::json;

    fn map(v: serde_json::Value) -> FieldMap {
        field_map_from_json(&v).unwrap()
    }

    #[test]
    fn test_merge_recurses_and_src_wins() {
        let mut dst = map(json!({"a": 1, "nested": {"x": 1, "y": 2}, "keep": "d"}));
        let src = map(json!({"a": 2, "nested": {"y": 3, "z": 4}}));
        merge(&mut dst, &src);
        assert_eq!(dst, map(json!({"a": 2, "nested": {"x": 1, "y": 3, "z": 4}, "keep": "d"})));
    }

    #[test]
    fn test_merge_replaces_leaf_with_map_and_back() {
        let mut dst = map(json!({"a": 1, "b": {"c": 1}}));
        merge(&mut dst, &map(json!({"a": {"n": 1}, "b": 5})));
        assert_eq!(dst, map(json!({"a": {"n": 1}, "b": 5})));
    }

    #[test]
    fn test_merge_is_idempotent() {
        let a = map(json!({"a": 1, "n": {"x": [1, 2], "y": {"deep": true}}}));
        let b = map(json!({"n": {"y": {"deep": false, "new": "v"}}, "b": "s"}));
        let mut once = a.clone();
        merge(&mut once, &b);
        let mut twice = once.clone();
        merge(&mut twice, &b);
        assert_eq!(once, twice);
    }

    fn merged(a: &FieldMap, b: &FieldMap) -> FieldMap {
        let mut out = a.clone();
        merge(&mut out, b);
        out
    }

    #[test]
    fn test_merge_properties_over_shapes() {
        let pairs = [
            (json!({}), json!({})),
            (json!({"a": 1}), json!({})),
            (json!({}), json!({"a": {"b": [1]}})),
            (json!({"a": 1}), json!({"a": {"b": 2}})),
            (json!({"a": {"b": 2}}), json!({"a": 1})),
            (json!({"a": {"b": {}}}), json!({"a": {"b": {"c": null}}})),
            (json!({"l": [1, 2]}), json!({"l": []})),
            (json!({"x": {"y": {"z": {"w": {"v": 1}}}}}), json!({"x": {"y": {"z": {"w": {"u": 2}}}}})),
        ];
        for (a, b) in pairs {
            let (a, b) = (map(a), map(b));
            let once = merged(&a, &b);
            assert_eq!(merged(&once, &b), once, "merging {:?} into {:?}", b, a);
            assert_eq!(merged(&a, &FieldMap::new()), a);
        }
    }

    #[test]
    fn test_merge_properties_generated() {
        use crate::forms::flat_key::flatten;
        use crate::forms::test_shapes::{nested_map, Lcg};
        for seed in 0..200 {
            let mut rng = Lcg::new(seed);
            let a = nested_map(&mut rng, 1);
            let b = nested_map(&mut rng, 1);
            let once = merged(&a, &b);
            assert_eq!(merged(&once, &b), once, "seed {}", seed);
            // Every leaf of the incoming side wins
            let result = flatten(&once);
            for leaf in flatten(&b) {
                assert!(result.contains(&leaf), "seed {}: {:?} lost", seed, leaf);
            }
        }
    }

    #[test]
    fn test_filter_properties_generated() {
        use crate::forms::test_shapes::{nested_map, Lcg};
        for seed in 0..200 {
            let data = nested_map(&mut Lcg::new(seed), 1);
            for exclude in [true, false] {
                let once = filter(&data, HINT_SUBSTRINGS, exclude);
                assert_eq!(filter(&once, HINT_SUBSTRINGS, exclude), once, "seed {} exclude {}", seed, exclude);
            }
            let stripped = strip_hints(&data);
            assert!(crate::forms::flat_key::flatten(&stripped)
                .iter()
                .all(|(k, _)| !HINT_SUBSTRINGS.iter().any(|h| k.contains(h))));
        }
    }

    #[test]
    fn test_schema_evolution_keeps_new_defaults() {
        let mut schema = map(json!({"event_name": "", "market_type": "1X2", "odds": 1.0}));
        let stored = map(json!({"event_name": "Final", "odds": 2.5}));
        merge(&mut schema, &stored);
        assert_eq!(schema["market_type"], FieldValue::text("1X2"));
        assert_eq!(schema["event_name"], FieldValue::text("Final"));
        assert_eq!(schema["odds"], FieldValue::Float(2.5));
    }

    #[test]
    fn test_filter_exclude_strips_nested_hints() {
        let data = map(json!({
            "name": "x",
            "name_help": "h",
            "language_options": ["en"],
            "icons": {"win": "w", "win_help": "h", "deep": {"a_field": "time", "a": 1}}
        }));
        let out = strip_hints(&data);
        assert_eq!(out, map(json!({"name": "x", "icons": {"win": "w", "deep": {"a": 1}}})));
    }

    #[test]
    fn test_filter_include_descends_into_unmatched_parents() {
        let data = map(json!({"a_help": "x", "plain": 1, "n": {"b_help": "y", "c": 2}}));
        let out = filter(&data, &["_help"], false);
        assert_eq!(out, map(json!({"a_help": "x", "n": {"b_help": "y"}})));
    }

    #[test]
    fn test_filter_is_idempotent() {
        let data = map(json!({"a": 1, "a_help": "h", "n": {"b_options": [], "b": {"c_field": "x", "c": 3}}}));
        let once = strip_hints(&data);
        assert_eq!(strip_hints(&once), once);
    }

    #[test]
    fn test_masked_field_survives_hint_filter() {
        let data = map(json!({"api_token": "abc123", "api_token_help": "secret"}));
        let out = filter(&data, &["_help", "_options", "_field"], true);
        assert_eq!(out, map(json!({"api_token": "abc123"})));
    }

    #[test]
    fn test_walk_transform_encodes_temporal_leaves() {
        let dt = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap().and_hms_opt(3, 4, 5).unwrap();
        let mut data = FieldMap::new();
        data.insert("when".into(), FieldValue::DateTime(dt));
        let mut inner = FieldMap::new();
        inner.insert("at".into(), FieldValue::Time(NaiveTime::from_hms_opt(14, 15, 0).unwrap()));
        inner.insert("n".into(), FieldValue::Int(3));
        data.insert("schedule".into(), FieldValue::Map(inner));
        encode_payload_for_wire(&mut data);
        assert_eq!(data["when"], FieldValue::text("2024-01-02T03:04:05"));
        let inner = data["schedule"].as_map().unwrap();
        assert_eq!(inner["at"], FieldValue::text("14:15"));
        assert_eq!(inner["n"], FieldValue::Int(3));
    }

    #[test]
    fn test_walk_transform_visits_every_leaf() {
        let mut data = map(json!({"a": 1, "b": {"c": 2, "d": {"e": 3}}, "l": [1]}));
        let mut seen = 0;
        walk_transform(&mut data, &mut |v| {
            seen += 1;
            v
        });
        assert_eq!(seen, 4);
    }
}
