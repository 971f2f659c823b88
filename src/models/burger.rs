//! Burger records and their request bodies.

use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use uuid::Uuid;

/// A burger on the menu, as stored in the burger table.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Burger {
    /// Time-based (v1) identifier, assigned on creation.
    pub id: String,

    pub name: String,

    pub price: f64,

    /// Normalized ingredient tokens, in the order they were given.
    pub ingredients: Vec<String>,

    /// Image URL or reference; empty when none was supplied.
    #[serde(default)]
    pub image: String,

    /// Epoch milliseconds.
    pub created_at: i64,

    /// Epoch milliseconds.
    pub updated_at: i64,
}

/// Body of `POST /api/burger`.
#[derive(Deserialize, Debug)]
pub struct CreateBurgerRequest {
    pub name: String,
    pub price: f64,
    /// Comma-separated list, e.g. `"beef, lettuce ,tomato"`.
    pub ingredients: String,
    #[serde(default)]
    pub image: String,
}

/// Body of `PUT /api/burger/{id}`. Every field is overwritten.
#[derive(Deserialize, Debug)]
pub struct UpdateBurgerRequest {
    pub name: String,
    pub price: f64,
    pub ingredients: String,
    #[serde(default)]
    pub image: String,
}

impl Burger {
    /// Build a new burger with a fresh id, stamped at `now`.
    pub fn create(req: CreateBurgerRequest, now: i64) -> Self {
        Self {
            id: Uuid::now_v1(node_id()).to_string(),
            name: req.name,
            price: req.price,
            ingredients: normalize_ingredients(&req.ingredients),
            image: req.image,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Split a comma-separated ingredient list into trimmed, non-empty tokens.
pub fn normalize_ingredients(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Node id for v1 uuids, chosen randomly once per process.
fn node_id() -> &'static [u8; 6] {
    static NODE_ID: OnceLock<[u8; 6]> = OnceLock::new();
    NODE_ID.get_or_init(|| {
        let mut node = [0u8; 6];
        node.copy_from_slice(&Uuid::new_v4().as_bytes()[..6]);
        // multicast bit marks a node id that is not a real MAC address
        node[0] |= 0x01;
        node
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ingredients_are_trimmed_and_empty_tokens_dropped() {
        assert_eq!(
            normalize_ingredients("beef, lettuce ,tomato"),
            vec!["beef", "lettuce", "tomato"]
        );
        assert_eq!(
            normalize_ingredients(" bun ,, cheese,  ,pickles, "),
            vec!["bun", "cheese", "pickles"]
        );
        assert!(normalize_ingredients(" , ,").is_empty());
        assert!(normalize_ingredients("").is_empty());
    }

    #[test]
    fn create_assigns_time_based_id_and_timestamps() {
        let burger = Burger::create(
            CreateBurgerRequest {
                name: "Classic".into(),
                price: 5.99,
                ingredients: "beef, lettuce ,tomato".into(),
                image: String::new(),
            },
            1_700_000_000_000,
        );

        let id = Uuid::parse_str(&burger.id).unwrap();
        assert_eq!(id.get_version_num(), 1);
        assert_eq!(burger.created_at, 1_700_000_000_000);
        assert_eq!(burger.updated_at, burger.created_at);
        assert_eq!(burger.ingredients, vec!["beef", "lettuce", "tomato"]);
    }

    #[test]
    fn serializes_with_camel_case_attributes() {
        let burger = Burger {
            id: "b-1".into(),
            name: "Classic".into(),
            price: 5.99,
            ingredients: vec!["beef".into()],
            image: String::new(),
            created_at: 1,
            updated_at: 2,
        };
        let value = serde_json::to_value(&burger).unwrap();
        assert_eq!(value["createdAt"], 1);
        assert_eq!(value["updatedAt"], 2);
        assert!(value.get("created_at").is_none());
    }

    #[test]
    fn create_request_defaults_missing_image() {
        let req: CreateBurgerRequest = serde_json::from_str(
            r#"{"name":"Classic","price":5.99,"ingredients":"beef"}"#,
        )
        .unwrap();
        assert_eq!(req.image, "");
    }
}
