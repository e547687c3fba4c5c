//! Entity catalog: the validated set of entity definitions served by the API.

use crate::config::types::{EntityDef, FieldKind, FieldSpec};
use crate::config::validate;
use crate::error::ConfigError;
use std::collections::HashMap;

#[derive(Clone, Debug)]
pub struct Catalog {
    pub entities: Vec<EntityDef>,
    entity_by_path: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog from definitions. Fails on duplicate paths/tables, reserved or repeated fields.
    pub fn new(entities: Vec<EntityDef>) -> Result<Self, ConfigError> {
        validate(&entities)?;
        let entity_by_path = index(&entities);
        Ok(Catalog {
            entities,
            entity_by_path,
        })
    }

    pub fn entity_by_path(&self, path: &str) -> Option<&EntityDef> {
        self.entity_by_path.get(path).map(|&i| &self.entities[i])
    }

    /// The sandwich shop's five entities.
    pub fn builtin() -> Self {
        // Built-in definitions are fixed and pass validation.
        let entities = builtin_entities();
        let entity_by_path = index(&entities);
        Catalog {
            entities,
            entity_by_path,
        }
    }
}

fn index(entities: &[EntityDef]) -> HashMap<String, usize> {
    entities
        .iter()
        .enumerate()
        .map(|(i, e)| (e.path_segment.clone(), i))
        .collect()
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn entity(path_segment: &str, label: &str, table: &str, fields: Vec<FieldSpec>) -> EntityDef {
    EntityDef {
        path_segment: path_segment.to_string(),
        label: label.to_string(),
        table: table.to_string(),
        fields,
    }
}

pub fn builtin_entities() -> Vec<EntityDef> {
    use FieldKind::*;
    vec![
        entity(
            "sandwiches",
            "Sandwich",
            "sandwiches",
            vec![
                FieldSpec::new("sandwich_name", Text).required().max_length(100),
                FieldSpec::new("price", Decimal).required(),
            ],
        ),
        entity(
            "resources",
            "Resource",
            "resources",
            vec![
                FieldSpec::new("item", Text).required().max_length(100),
                FieldSpec::new("amount", Integer).required(),
            ],
        ),
        entity(
            "recipes",
            "Recipe",
            "recipes",
            vec![
                FieldSpec::new("sandwich_id", Integer).required(),
                FieldSpec::new("resource_id", Integer).required(),
                FieldSpec::new("amount", Integer).required(),
            ],
        ),
        entity(
            "orders",
            "Order",
            "orders",
            vec![
                FieldSpec::new("customer_name", Text).required().max_length(100),
                FieldSpec::new("order_date", Datetime).default_now(),
                FieldSpec::new("description", Text).max_length(300),
            ],
        ),
        entity(
            "order-details",
            "Order detail",
            "order_details",
            vec![
                FieldSpec::new("order_id", Integer).required(),
                FieldSpec::new("sandwich_id", Integer).required(),
                FieldSpec::new("amount", Integer).required(),
            ],
        ),
    ]
}
