use crate::errors::{ContextError, ContextResult};
use crate::value::{AttributeKind, AttributeValue, Attributes};

/// Schema of one entity type, emitted by `#[derive(Describable)]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityDescriptor {
    pub name: String,
    pub attributes: Vec<AttributeDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeDescriptor {
    pub name: String,
    pub kind: AttributeKind,
    /// Whether `Null` is an acceptable value.
    pub optional: bool,
}

impl AttributeDescriptor {
    pub fn new(name: impl Into<String>, kind: AttributeKind, optional: bool) -> Self {
        Self {
            name: name.into(),
            kind,
            optional,
        }
    }
}

impl EntityDescriptor {
    pub fn attribute(&self, name: &str) -> Option<&AttributeDescriptor> {
        self.attributes.iter().find(|attribute| attribute.name == name)
    }

    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().map(|attribute| attribute.name.as_str())
    }

    /// Checks a value against the declared attribute.
    ///
    /// `Json` attributes accept any non-null value.
    pub fn check(&self, name: &str, value: &AttributeValue) -> ContextResult<()> {
        let attribute = self.attribute(name).ok_or_else(|| ContextError::UnknownAttribute {
            entity: self.name.clone(),
            attribute: name.to_string(),
        })?;

        match value.kind() {
            None if attribute.optional => Ok(()),
            None => Err(ContextError::MissingAttribute {
                entity: self.name.clone(),
                attribute: name.to_string(),
            }),
            Some(_) if attribute.kind == AttributeKind::Json => Ok(()),
            Some(found) if found == attribute.kind => Ok(()),
            Some(found) => Err(ContextError::AttributeKindMismatch {
                entity: self.name.clone(),
                attribute: name.to_string(),
                expected: attribute.kind,
                found,
            }),
        }
    }

    /// Reads every declared attribute from `object`, checking each one.
    pub fn describe(&self, object: &dyn Describable) -> ContextResult<Attributes> {
        let mut attributes = Attributes::new();
        for descriptor in &self.attributes {
            let value = object
                .value_for(&descriptor.name)
                .ok_or_else(|| ContextError::MissingAttribute {
                    entity: self.name.clone(),
                    attribute: descriptor.name.clone(),
                })?;
            self.check(&descriptor.name, &value)?;
            attributes.insert(descriptor.name.clone(), value);
        }
        Ok(attributes)
    }
}

/// Capability to expose an object's attributes by name.
///
/// Implemented by `#[derive(Describable)]`; host frameworks with dynamic
/// objects can implement it by hand.
pub trait Describable {
    fn entity_name(&self) -> &str;

    fn attribute_names(&self) -> Vec<&str>;

    fn value_for(&self, name: &str) -> Option<AttributeValue>;

    fn attributes(&self) -> Attributes {
        self.attribute_names()
            .into_iter()
            .filter_map(|name| self.value_for(name).map(|value| (name.to_string(), value)))
            .collect()
    }
}

/// Static schema information for a describable entity type.
pub trait EntityMetadata: Describable {
    const ENTITY_NAME: &'static str;

    fn entity_descriptor() -> EntityDescriptor;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article() -> EntityDescriptor {
        EntityDescriptor {
            name: "Article".to_string(),
            attributes: vec![
                AttributeDescriptor::new("title", AttributeKind::Text, false),
                AttributeDescriptor::new("summary", AttributeKind::Text, true),
                AttributeDescriptor::new("meta", AttributeKind::Json, false),
            ],
        }
    }

    #[test]
    fn check_accepts_matching_kinds_and_optional_nulls() {
        let descriptor = article();
        assert!(descriptor.check("title", &AttributeValue::from("Hello")).is_ok());
        assert!(descriptor.check("summary", &AttributeValue::Null).is_ok());
        assert!(descriptor.check("meta", &AttributeValue::Integer(3)).is_ok());
    }

    #[test]
    fn check_rejects_unknown_missing_and_mismatched() {
        let descriptor = article();
        assert!(matches!(
            descriptor.check("body", &AttributeValue::from("x")),
            Err(ContextError::UnknownAttribute { .. })
        ));
        assert!(matches!(
            descriptor.check("title", &AttributeValue::Null),
            Err(ContextError::MissingAttribute { .. })
        ));
        assert!(matches!(
            descriptor.check("title", &AttributeValue::Integer(1)),
            Err(ContextError::AttributeKindMismatch {
                expected: AttributeKind::Text,
                found: AttributeKind::Integer,
                ..
            })
        ));
    }

    #[test]
    fn attribute_names_follow_declaration_order() {
        let article = article();
        let names: Vec<&str> = article.attribute_names().collect();
        assert_eq!(names, ["title", "summary", "meta"]);
    }
}
