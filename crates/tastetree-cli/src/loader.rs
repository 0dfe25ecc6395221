//! Reads the item table and the user file into core types.
//!
//! Item table: comma-separated, header `url, timedelta, <attr>, ...`, one row
//! per item. An item has an attribute iff its value reaches that column's
//! mean over all rows. A blank line ends the table.
//!
//! User file: records of `<id> <liked> <disliked>` followed by that many item
//! keys, likes first. `#` lines and blank lines between records are skipped.

use anyhow::{bail, Context, Result};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;
use tastetree_core::{AttributeUniverse, Item, User, UserId};

/// Columns before the first attribute: the key and an ignored age column.
const LEADING_COLUMNS: usize = 2;

#[derive(Debug)]
pub struct Row {
    pub key: String,
    pub values: Vec<f64>,
}

/// Raw item table before thresholds are applied.
#[derive(Debug)]
pub struct Table {
    pub attributes: Vec<String>,
    pub rows: Vec<Row>,
}

/// The universe and every item, keyed by item key.
#[derive(Debug)]
pub struct Catalog {
    pub universe: Arc<AttributeUniverse>,
    pub items: BTreeMap<String, Arc<Item>>,
}

impl Table {
    pub fn read<R: BufRead>(reader: R) -> Result<Self> {
        let mut lines = reader.lines().enumerate();
        let header = match lines.next() {
            Some((_, line)) => line.context("Failed to read table header")?,
            None => bail!("Item table is empty"),
        };
        let columns: Vec<&str> = header.split(',').map(str::trim).collect();
        if columns.len() <= LEADING_COLUMNS {
            bail!("Item table header has no attribute columns");
        }
        let attributes: Vec<String> = columns[LEADING_COLUMNS..]
            .iter()
            .map(|name| (*name).to_string())
            .collect();

        let mut rows = Vec::new();
        for (idx, line) in lines {
            let line_no = idx + 1;
            let line = line.with_context(|| format!("Failed to read line {line_no}"))?;
            if line.trim().is_empty() {
                break;
            }
            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            if fields.len() != columns.len() {
                bail!(
                    "Line {line_no}: expected {} columns, found {}",
                    columns.len(),
                    fields.len()
                );
            }
            let values = fields[LEADING_COLUMNS..]
                .iter()
                .zip(&attributes)
                .map(|(field, attribute)| {
                    field.parse::<f64>().with_context(|| {
                        format!("Line {line_no}: invalid value '{field}' for '{attribute}'")
                    })
                })
                .collect::<Result<Vec<f64>>>()?;
            rows.push(Row {
                key: fields[0].to_string(),
                values,
            });
        }

        Ok(Self { attributes, rows })
    }

    /// Per-column means, used as the "has attribute" cut-off.
    pub fn thresholds(&self) -> Vec<f64> {
        let mut sums = vec![0.0; self.attributes.len()];
        for row in &self.rows {
            for (sum, value) in sums.iter_mut().zip(&row.values) {
                *sum += value;
            }
        }
        #[allow(clippy::cast_precision_loss)]
        let count = self.rows.len() as f64;
        sums.into_iter().map(|sum| sum / count).collect()
    }

    pub fn into_catalog(self) -> Result<Catalog> {
        if self.rows.is_empty() {
            bail!("Item table has no rows");
        }
        let thresholds = self.thresholds();
        let universe = Arc::new(
            AttributeUniverse::new(&self.attributes).context("Invalid attribute header")?,
        );

        let mut items = BTreeMap::new();
        for row in self.rows {
            let present = self
                .attributes
                .iter()
                .zip(row.values.iter().zip(&thresholds))
                .filter(|(_, (value, threshold))| value >= threshold)
                .map(|(name, _)| name.as_str());
            let item = Item::new(row.key.clone(), present, &universe)
                .with_context(|| format!("Invalid item '{}'", row.key))?;
            items.insert(row.key, Arc::new(item));
        }

        Ok(Catalog { universe, items })
    }
}

pub fn load_table(path: &Path) -> Result<Table> {
    let file =
        File::open(path).with_context(|| format!("Failed to open item table {path:?}"))?;
    Table::read(BufReader::new(file))
}

pub fn load_catalog(path: &Path) -> Result<Catalog> {
    load_table(path)?.into_catalog()
}

pub fn read_users<R: BufRead>(reader: R, catalog: &Catalog) -> Result<Vec<User>> {
    let mut lines = reader.lines().enumerate();
    let mut users = Vec::new();

    while let Some((idx, line)) = lines.next() {
        let line = line.with_context(|| format!("Failed to read line {}", idx + 1))?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let (id, liked, disliked) = parse_user_header(line)
            .with_context(|| format!("Line {}: invalid user header '{line}'", idx + 1))?;
        let mut user = User::new(id);
        for position in 0..liked + disliked {
            let Some((idx, key)) = lines.next() else {
                bail!("User {id}: expected {} item keys, found {position}", liked + disliked);
            };
            let key = key.with_context(|| format!("Failed to read line {}", idx + 1))?;
            let key = key.trim();
            let Some(item) = catalog.items.get(key) else {
                bail!("User {id}: unknown item key '{key}' on line {}", idx + 1);
            };
            if position < liked {
                user.like(Arc::clone(item));
            } else {
                user.dislike(Arc::clone(item));
            }
        }
        users.push(user);
    }

    Ok(users)
}

pub fn load_users(path: &Path, catalog: &Catalog) -> Result<Vec<User>> {
    let file = File::open(path).with_context(|| format!("Failed to open user file {path:?}"))?;
    read_users(BufReader::new(file), catalog)
}

fn parse_user_header(line: &str) -> Result<(UserId, usize, usize)> {
    let mut fields = line.split_whitespace();
    let mut next = |what: &str| {
        fields
            .next()
            .with_context(|| format!("missing {what}"))
    };
    let id = next("user id")?.parse::<u32>().context("user id")?;
    let liked = next("like count")?.parse::<usize>().context("like count")?;
    let disliked = next("dislike count")?
        .parse::<usize>()
        .context("dislike count")?;
    Ok((UserId(id), liked, disliked))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "url, timedelta, n_tokens, num_imgs, is_weekend
http://e.org/a, 731.0, 12.0, 1.0, 1.0
http://e.org/b, 731.0, 8.0, 10.0, 0.0
http://e.org/c, 700.0, 10.0, 4.0, 0.0

http://e.org/ignored, 1.0, 1.0, 1.0, 1.0
";

    fn catalog() -> Catalog {
        Table::read(TABLE.as_bytes())
            .and_then(Table::into_catalog)
            .unwrap_or_else(|e| panic!("table should parse: {e:#}"))
    }

    #[test]
    fn header_defines_the_universe() {
        let catalog = catalog();
        assert_eq!(
            catalog.universe.names(),
            &["n_tokens", "num_imgs", "is_weekend"]
        );
        assert_eq!(catalog.items.len(), 3);
    }

    #[test]
    fn attributes_are_values_at_or_above_the_mean() {
        let catalog = catalog();
        // means: n_tokens 10, num_imgs 5, is_weekend 1/3
        let a = &catalog.items["http://e.org/a"];
        assert!(a.has_attribute("n_tokens"));
        assert!(!a.has_attribute("num_imgs"));
        assert!(a.has_attribute("is_weekend"));

        let c = &catalog.items["http://e.org/c"];
        assert!(c.has_attribute("n_tokens"));
        assert!(!c.has_attribute("num_imgs"));
        assert!(!c.has_attribute("is_weekend"));
    }

    #[test]
    fn malformed_values_name_the_line() {
        let table = "url, timedelta, x\nhttp://e.org/a, 1.0, abc\n";
        let err = Table::read(table.as_bytes()).expect_err("should fail");
        assert!(format!("{err:#}").contains("Line 2"));
    }

    #[test]
    fn short_rows_are_rejected() {
        let table = "url, timedelta, x, y\nhttp://e.org/a, 1.0, 2.0\n";
        assert!(Table::read(table.as_bytes()).is_err());
    }

    #[test]
    fn empty_table_has_no_catalog() {
        let table = Table::read("url, timedelta, x\n".as_bytes()).expect("header only");
        assert!(table.into_catalog().is_err());
    }

    #[test]
    fn reads_user_records() {
        let catalog = catalog();
        let users = "# id liked disliked
1 2 1
http://e.org/a
http://e.org/b
http://e.org/c

2 0 0
";
        let users = read_users(users.as_bytes(), &catalog).expect("users");
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].id(), UserId(1));
        assert_eq!(users[0].feedback().likes(), 2);
        assert_eq!(users[0].feedback().dislikes(), 1);
        assert!(users[1].feedback().is_empty());
    }

    #[test]
    fn unknown_keys_are_reported() {
        let catalog = catalog();
        let users = "3 1 0\nhttp://e.org/missing\n";
        let err = read_users(users.as_bytes(), &catalog).expect_err("should fail");
        assert!(err.to_string().contains("unknown item key 'http://e.org/missing'"));
    }

    #[test]
    fn truncated_records_are_reported() {
        let catalog = catalog();
        let err = read_users("4 2 0\nhttp://e.org/a\n".as_bytes(), &catalog)
            .expect_err("should fail");
        assert!(err.to_string().contains("expected 2 item keys, found 1"));
    }
}
