//! Record: a surrogate integer id plus named field values.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Name of the surrogate key. Never stored among a record's fields.
pub const ID_FIELD: &str = "id";

pub type Fields = Map<String, Value>;

/// Serializes flat: `{"id": 1, "sandwich_name": "BLT", ...}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: i64,
    #[serde(flatten)]
    fields: Fields,
}

impl Record {
    pub fn new(id: i64, mut fields: Fields) -> Self {
        fields.remove(ID_FIELD);
        Record { id, fields }
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Overlay `fields` onto this record one by one: named fields are replaced, others kept.
    /// An `id` entry in `fields` is ignored.
    pub fn overlay(&mut self, fields: Fields) {
        for (name, value) in fields {
            if name == ID_FIELD {
                tracing::warn!(record_id = self.id, "ignoring id in update payload");
                continue;
            }
            self.fields.insert(name, value);
        }
    }
}
