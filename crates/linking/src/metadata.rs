//! Decoder for element-metadata payloads.
//!
//! The element lookup endpoint wraps some fields as `{ "data": value }` and
//! returns others bare, inconsistently across element types. Every field the
//! classifier cares about is listed in [`MetadataField`]; [`decode_field`]
//! tries both shapes and reports [`DecodedField::Missing`] for anything it
//! cannot read. Decoding never fails.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A classification field expected in an element-metadata payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetadataField {
    DomainId,
    DefinitionId,
    ViewHint,
    SchemaId,
    DocumentNumber,
    DisplayName,
}

impl MetadataField {
    /// Every field, in payload order.
    pub const ALL: [MetadataField; 6] = [
        MetadataField::DomainId,
        MetadataField::DefinitionId,
        MetadataField::ViewHint,
        MetadataField::SchemaId,
        MetadataField::DocumentNumber,
        MetadataField::DisplayName,
    ];

    /// JSON key the platform uses for this field.
    pub fn json_key(self) -> &'static str {
        match self {
            MetadataField::DomainId => "domainId",
            MetadataField::DefinitionId => "definitionId",
            MetadataField::ViewHint => "viewHint",
            MetadataField::SchemaId => "schemaId",
            MetadataField::DocumentNumber => "documentNumber",
            MetadataField::DisplayName => "name",
        }
    }
}

/// Result of decoding one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedField {
    /// A non-empty value was found, bare or wrapped.
    Present(String),
    /// The key is absent, null, empty, or of a shape the decoder does not read.
    Missing,
}

impl DecodedField {
    /// Converts into an `Option`, dropping the distinction the caller no
    /// longer needs.
    pub fn into_option(self) -> Option<String> {
        match self {
            DecodedField::Present(v) => Some(v),
            DecodedField::Missing => None,
        }
    }
}

/// Decodes one field from a metadata payload.
///
/// Accepted shapes: a non-empty string, a number, or an object whose `data`
/// member is one of those.
pub fn decode_field(payload: &Value, field: MetadataField) -> DecodedField {
    let Some(raw) = payload.get(field.json_key()) else {
        return DecodedField::Missing;
    };
    let value = match raw {
        Value::Object(wrapper) => match wrapper.get("data") {
            Some(inner) => inner,
            None => return DecodedField::Missing,
        },
        bare => bare,
    };
    match value {
        Value::String(s) if !s.trim().is_empty() => DecodedField::Present(s.trim().to_owned()),
        Value::Number(n) => DecodedField::Present(n.to_string()),
        _ => DecodedField::Missing,
    }
}

/// Classification fields decoded from one element-metadata response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaMetadata {
    pub domain_id: Option<String>,
    pub definition_id: Option<String>,
    pub view_hint: Option<String>,
    pub schema_id: Option<String>,
    pub document_number: Option<String>,
    pub display_name: Option<String>,
}

impl SchemaMetadata {
    /// Decodes every known field from `payload`. Non-object payloads decode
    /// to an empty value.
    pub fn decode(payload: &Value) -> Self {
        let field = |f| decode_field(payload, f).into_option();
        Self {
            domain_id: field(MetadataField::DomainId),
            definition_id: field(MetadataField::DefinitionId),
            view_hint: field(MetadataField::ViewHint),
            schema_id: field(MetadataField::SchemaId),
            document_number: field(MetadataField::DocumentNumber),
            display_name: field(MetadataField::DisplayName),
        }
    }

    /// Returns `true` if none of the classification fields decoded.
    pub fn is_empty(&self) -> bool {
        self.domain_id.is_none()
            && self.definition_id.is_none()
            && self.view_hint.is_none()
            && self.schema_id.is_none()
    }
}
