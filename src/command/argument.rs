use std::fmt;

use crate::command::{
    ArityError, Completer, ConversionError, DispatchError, Namespace, SlotKind,
    StructuralViolation, Value, ValueType,
};
use crate::grammar::GrammarError;

/// A positional slot of a leaf command.
pub struct ArgumentDef<C> {
    pub name: String,
    pub description: String,
    pub value_type: ValueType,
    /// Only allowed on the final argument
    pub default: Option<Value>,
    pub member_of: Vec<String>,
    pub completer: Option<Completer<C>>,
    /// Absorbs all remaining positionals; only allowed on the final argument
    pub array: bool,
}

impl<C> ArgumentDef<C> {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            value_type: ValueType::default(),
            default: None,
            member_of: Vec::new(),
            completer: None,
            array: false,
        }
    }

    pub fn value_type(mut self, value_type: ValueType) -> Self {
        self.value_type = value_type;
        self
    }

    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn array(mut self) -> Self {
        self.array = true;
        self
    }

    pub fn member_of<I, S>(mut self, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.member_of = members.into_iter().map(Into::into).collect();
        self
    }

    pub fn completer(mut self, completer: impl Fn(&str, &C) -> Vec<String> + 'static) -> Self {
        self.completer = Some(Box::new(completer));
        self
    }

    /// `<name>`, `[<name>]` with a default, `<name...>` or `[<name...>]` for
    /// arrays.
    pub fn usage(&self) -> String {
        let dots = if self.array { "..." } else { "" };
        if self.default.is_some() {
            format!("[<{}{dots}>]", self.name)
        } else {
            format!("<{}{dots}>", self.name)
        }
    }

    /// Suggestions for a partially typed value.
    pub fn suggest(&self, prefix: &str, ctx: &C) -> Vec<String> {
        crate::command::completion::suggest(&self.member_of, self.completer.as_ref(), prefix, ctx)
    }

    pub(crate) fn prepare(&mut self, last: bool) -> Result<(), StructuralViolation> {
        if self.name.chars().count() < 2 {
            return Err(StructuralViolation::ArgumentNameTooShort(self.name.clone()));
        }
        if self.description.trim().is_empty() {
            return Err(StructuralViolation::MissingSlotDescription {
                kind: SlotKind::Argument,
                name: self.name.clone(),
            });
        }
        if !last && self.default.is_some() {
            return Err(StructuralViolation::DefaultNotLast(self.name.clone()));
        }
        if !last && self.array {
            return Err(StructuralViolation::ArrayNotLast(self.name.clone()));
        }
        if !self.member_of.is_empty() && self.completer.is_some() {
            return Err(StructuralViolation::CompletionConflict {
                kind: SlotKind::Argument,
                name: self.name.clone(),
            });
        }
        if let Some(default) = self.default.take() {
            let expected = self.value_type;
            self.default = Some(expected.fit_default(default, self.array).ok_or_else(|| {
                StructuralViolation::DefaultTypeMismatch {
                    kind: SlotKind::Argument,
                    name: self.name.clone(),
                    expected,
                }
            })?);
        }
        Ok(())
    }

    pub(crate) fn seed(&self, namespace: &mut Namespace) {
        if self.array {
            namespace.set(&self.name, Value::Array(Vec::new()));
        } else if let Some(default) = &self.default {
            namespace.set(&self.name, default.clone());
        }
    }

    /// Bind one positional token to this slot.
    pub(crate) fn apply(&self, raw: &str, namespace: &mut Namespace) -> Result<(), DispatchError> {
        let value = self.convert(raw)?;
        if self.array {
            namespace.push(&self.name, value);
        } else {
            namespace.set(&self.name, value);
        }
        Ok(())
    }

    /// Substitute an array default into an empty array and check that a
    /// scalar slot received a value.
    pub(crate) fn finish(&self, namespace: &mut Namespace) -> Result<(), ArityError> {
        if self.array {
            if let Some(default) = &self.default
                && namespace.get(&self.name).is_none_or(Value::is_empty_array)
            {
                namespace.set(&self.name, default.clone());
            }
            return Ok(());
        }
        if !namespace.contains(&self.name) {
            return Err(ArityError::Expected(self.name.clone()));
        }
        Ok(())
    }

    fn convert(&self, raw: &str) -> Result<Value, DispatchError> {
        if !self.member_of.is_empty() && !self.member_of.iter().any(|member| member == raw) {
            return Err(GrammarError::NotAMember {
                name: format!("argument \"{}\"", self.name),
                value: raw.to_string(),
                allowed: self.member_of.clone(),
            }
            .into());
        }
        self.value_type.parse(raw).ok_or_else(|| {
            ConversionError {
                owner: SlotKind::Argument,
                name: self.name.clone(),
                expected: self.value_type,
                value: raw.to_string(),
            }
            .into()
        })
    }
}

impl<C> fmt::Debug for ArgumentDef<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArgumentDef")
            .field("name", &self.name)
            .field("value_type", &self.value_type)
            .field("default", &self.default)
            .field("member_of", &self.member_of)
            .field("completer", &self.completer.is_some())
            .field("array", &self.array)
            .finish_non_exhaustive()
    }
}
