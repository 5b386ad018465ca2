use std::cmp::Ordering;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, NaiveDate, NaiveTime};

use crate::record::Snake;

#[derive(Debug, Clone, Copy)]
struct SortKey {
    date: Option<i64>,
    order: Option<i64>,
}

// Accepts a full RFC 3339 timestamp or a plain calendar date.
fn parse_date(raw: &str) -> Result<i64> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Ok(instant.timestamp());
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| anyhow!("'{raw}' is not an RFC 3339 timestamp or a YYYY-MM-DD date"))?;
    Ok(date.and_time(NaiveTime::MIN).and_utc().timestamp())
}

fn sort_key(snake: &Snake) -> Result<SortKey> {
    let appearance = match &snake.first_appearance {
        Some(appearance) => appearance,
        None => return Ok(SortKey { date: None, order: None }),
    };
    let date = match &appearance.date {
        Some(raw) => Some(parse_date(raw).with_context(|| {
            format!("snake '{}': bad firstAppearance.date", snake.id)
        })?),
        None => None,
    };
    Ok(SortKey { date, order: appearance.order })
}

fn compare(a: &SortKey, b: &SortKey) -> Ordering {
    match (a.date, b.date) {
        (None, _) => Ordering::Less,
        (_, None) => Ordering::Greater,
        (Some(da), Some(db)) => match da.cmp(&db) {
            // order only breaks the tie when both sides carry a non-zero value
            Ordering::Equal => match (a.order, b.order) {
                (Some(x), Some(y)) if x != 0 && y != 0 => x.cmp(&y),
                _ => Ordering::Equal,
            },
            unequal => unequal,
        },
    }
}

/// Sorts snakes by first appearance and assigns 1-based snake numbers.
/// The comparator is not a total order (a missing date always compares
/// "less"), so the sort must stay stable for reproducible output.
pub fn sort_and_number(snakes: Vec<Snake>) -> Result<Vec<Snake>> {
    let mut keyed = snakes
        .into_iter()
        .map(|snake| Ok((sort_key(&snake)?, snake)))
        .collect::<Result<Vec<_>>>()?;
    keyed.sort_by(|(a, _), (b, _)| compare(a, b));

    let mut snakes: Vec<Snake> = keyed.into_iter().map(|(_, snake)| snake).collect();
    for (index, snake) in snakes.iter_mut().enumerate() {
        snake.snake_number = Some(index as u32 + 1);
    }
    Ok(snakes)
}
