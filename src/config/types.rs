//! Entity definition types. Deserializable so a catalog can also come from a JSON file.

use serde::{Deserialize, Serialize};

/// Structural kind of a declared field. Decides both the JSON shape accepted on input and the column type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Integer,
    Decimal,
    Datetime,
}

impl FieldKind {
    /// Name used in `$n::<type>` casts so JSON-derived parameters bind to the right column type.
    pub fn pg_cast(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Integer => "bigint",
            FieldKind::Decimal => "numeric",
            FieldKind::Datetime => "timestamptz",
        }
    }
}

/// Value filled in on create when the body omits the field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldDefault {
    Now,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub max_length: Option<u32>,
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub default: Option<FieldDefault>,
}

impl FieldSpec {
    pub fn new(name: &str, kind: FieldKind) -> Self {
        FieldSpec {
            name: name.to_string(),
            kind,
            required: false,
            max_length: None,
            pattern: None,
            default: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn max_length(mut self, n: u32) -> Self {
        self.max_length = Some(n);
        self
    }

    pub fn default_now(mut self) -> Self {
        self.default = Some(FieldDefault::Now);
        self
    }

    /// Column DDL fragment, e.g. `VARCHAR(100) NOT NULL`.
    pub fn column_type(&self) -> String {
        let base = match (self.kind, self.max_length) {
            (FieldKind::Text, Some(n)) => format!("VARCHAR({})", n),
            (FieldKind::Text, None) => "TEXT".to_string(),
            (FieldKind::Integer, _) => "BIGINT".to_string(),
            (FieldKind::Decimal, _) => "NUMERIC(10, 2)".to_string(),
            (FieldKind::Datetime, _) => "TIMESTAMPTZ".to_string(),
        };
        if self.required {
            format!("{} NOT NULL", base)
        } else {
            base
        }
    }
}

/// One entity kind exposed over the API.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EntityDef {
    /// URL segment, e.g. "order-details".
    pub path_segment: String,
    /// Human-readable name used in messages, e.g. "Order detail".
    pub label: String,
    pub table: String,
    pub fields: Vec<FieldSpec>,
}

impl EntityDef {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}
