//! Declarative input schemas
//!
//! A schema is plain data. [`ObjectSchema::to_json_schema`] renders it as the
//! JSON-schema document advertised in `tools/list`, and
//! [`crate::validate::validate`] walks the same tree to check arguments.

use serde_json::{json, Map, Value};

/// Shape of a single value
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    String,
    Number,
    Boolean,
    /// A string restricted to the listed values
    Enum(&'static [&'static str]),
    Array(Box<Schema>),
    /// An object with arbitrary keys and string values
    StringMap,
    Object(ObjectSchema),
}

impl Schema {
    pub fn array(items: Schema) -> Self {
        Schema::Array(Box::new(items))
    }

    pub fn string_list() -> Self {
        Schema::array(Schema::String)
    }

    /// Name used in type mismatch messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Schema::String | Schema::Enum(_) => "string",
            Schema::Number => "number",
            Schema::Boolean => "boolean",
            Schema::Array(_) => "array",
            Schema::StringMap | Schema::Object(_) => "object",
        }
    }

    pub fn to_json_schema(&self) -> Value {
        match self {
            Schema::String => json!({"type": "string"}),
            Schema::Number => json!({"type": "number"}),
            Schema::Boolean => json!({"type": "boolean"}),
            Schema::Enum(values) => json!({"type": "string", "enum": values}),
            Schema::Array(items) => json!({"type": "array", "items": items.to_json_schema()}),
            Schema::StringMap => json!({
                "type": "object",
                "additionalProperties": {"type": "string"}
            }),
            Schema::Object(object) => object.to_json_schema(),
        }
    }
}

/// A named property of an object schema
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: &'static str,
    pub schema: Schema,
    pub required: bool,
    pub description: Option<&'static str>,
}

impl Field {
    pub fn required(name: &'static str, schema: Schema) -> Self {
        Self {
            name,
            schema,
            required: true,
            description: None,
        }
    }

    pub fn optional(name: &'static str, schema: Schema) -> Self {
        Self {
            name,
            schema,
            required: false,
            description: None,
        }
    }

    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }
}

/// Ordered set of fields; unknown input keys are not part of the shape
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectSchema {
    fields: Vec<Field>,
}

impl ObjectSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Append every field of `other`
    pub fn extend(mut self, other: ObjectSchema) -> Self {
        self.fields.extend(other.fields);
        self
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Copy of this schema with every field made optional
    pub fn all_optional(&self) -> Self {
        Self {
            fields: self
                .fields
                .iter()
                .cloned()
                .map(|mut f| {
                    f.required = false;
                    f
                })
                .collect(),
        }
    }

    pub fn required_names(&self) -> Vec<&'static str> {
        self.fields
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name)
            .collect()
    }

    pub fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        for field in &self.fields {
            let mut rendered = field.schema.to_json_schema();
            if let (Some(description), Value::Object(obj)) = (field.description, &mut rendered) {
                obj.insert("description".to_string(), json!(description));
            }
            properties.insert(field.name.to_string(), rendered);
        }

        json!({
            "type": "object",
            "properties": properties,
            "required": self.required_names(),
        })
    }
}
