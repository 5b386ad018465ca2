use std::fs::{self, File};
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{json, Map, Value};

/// Recursively re-sorts every object's keys so the output is diff-stable.
/// Arrays keep their element order; values are untouched.
pub fn sort_keys_deep(value: Value) -> Value {
    match value {
        Value::Object(fields) => Value::Object(
            fields
                .into_iter()
                .map(|(key, val)| (key, sort_keys_deep(val)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys_deep).collect()),
        other => other,
    }
}

fn wrap(snakes: Value, length: usize) -> Value {
    json!({
        "length": length,
        "snakes": snakes,
    })
}

/// Writes `all.json`, `by_id.json` and `by_snake_number.json` under
/// `<out_dir>/listing/`. The by-id and by-number views are projections of the
/// same final sequence. The three writes are independent: a failure can leave
/// earlier files behind.
pub fn write_listings(out_dir: &Path, snakes: &[Value]) -> Result<()> {
    let length = snakes.len();

    let mut by_id = Map::new();
    let mut by_number = Map::new();
    for snake in snakes {
        let id = snake
            .get("id")
            .and_then(Value::as_str)
            .context("finished record missing id")?;
        let number = snake
            .get("snakeNumber")
            .and_then(Value::as_u64)
            .context("finished record missing snakeNumber")?;
        by_id.insert(id.to_owned(), snake.clone());
        by_number.insert(number.to_string(), snake.clone());
    }

    let listing_dir = out_dir.join("listing");
    fs::create_dir_all(&listing_dir)
        .with_context(|| format!("creating {}", listing_dir.display()))?;

    write_json(
        &listing_dir.join("all.json"),
        &wrap(Value::Array(snakes.to_vec()), length),
    )?;
    write_json(&listing_dir.join("by_id.json"), &wrap(Value::Object(by_id), length))?;
    write_json(
        &listing_dir.join("by_snake_number.json"),
        &wrap(Value::Object(by_number), length),
    )?;

    Ok(())
}

fn write_json(path: &Path, value: &Value) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    serde_json::to_writer_pretty(file, value)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_keys_deep_orders_nested_objects() {
        let value = json!({
            "zeta": 1,
            "alpha": { "beta": [ { "b": 1, "a": 2 } ], "aaa": true },
        });

        let sorted = serde_json::to_string(&sort_keys_deep(value)).unwrap();
        assert_eq!(
            sorted,
            r#"{"alpha":{"aaa":true,"beta":[{"a":2,"b":1}]},"zeta":1}"#
        );
    }

    #[test]
    fn sort_keys_deep_preserves_array_order() {
        let value = json!([3, 1, 2, { "z": 0, "a": 0 }]);
        let sorted = serde_json::to_string(&sort_keys_deep(value)).unwrap();
        assert_eq!(sorted, r#"[3,1,2,{"a":0,"z":0}]"#);
    }

    #[test]
    fn wrap_pairs_length_with_snakes() {
        let wrapped = wrap(json!(["a"]), 1);
        assert_eq!(wrapped, json!({ "length": 1, "snakes": ["a"] }));
    }
}
