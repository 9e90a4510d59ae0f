use std::fmt;

use crate::command::{
    Completer, ConversionError, DispatchError, Namespace, SlotKind, StructuralViolation, Value,
    ValueType,
};
use crate::grammar::{GrammarError, OptionInput, OptionShape, is_name, is_name_char};

/// A named flag of a leaf command.
pub struct OptionDef<C> {
    /// Long name, used with `--` and as the namespace key
    pub name: String,
    pub short: Option<char>,
    pub description: String,
    pub value_type: ValueType,
    /// Fixed value set by the bare flag; the flag then refuses `=value`
    pub implicit: Option<Value>,
    pub default: Option<Value>,
    /// Repeatable; every occurrence appends one `=value`
    pub array: bool,
    pub required: bool,
    pub member_of: Vec<String>,
    pub completer: Option<Completer<C>>,
}

impl<C> OptionDef<C> {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            short: None,
            description: description.into(),
            value_type: ValueType::default(),
            implicit: None,
            default: None,
            array: false,
            required: false,
            member_of: Vec::new(),
            completer: None,
        }
    }

    /// A switch that sets `true` when present.
    pub fn flag(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, description).implicit(true)
    }

    pub fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    pub fn value_type(mut self, value_type: ValueType) -> Self {
        self.value_type = value_type;
        self
    }

    pub fn implicit(mut self, value: impl Into<Value>) -> Self {
        self.implicit = Some(value.into());
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

    pub fn required(mut self) -> Self {
        self.required = true;
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

    /// `-s/--long`, or `--long` without a short name.
    pub fn invocation(&self) -> String {
        match self.short {
            Some(short) => format!("-{short}/--{}", self.name),
            None => format!("--{}", self.name),
        }
    }

    /// Type of the values this option binds. An implicit value brings its
    /// own type.
    pub fn effective_type(&self) -> ValueType {
        self.implicit
            .as_ref()
            .and_then(Value::value_type)
            .unwrap_or(self.value_type)
    }

    /// Suggestions for a partially typed value.
    pub fn suggest(&self, prefix: &str, ctx: &C) -> Vec<String> {
        crate::command::completion::suggest(&self.member_of, self.completer.as_ref(), prefix, ctx)
    }

    fn enforces_required(&self) -> bool {
        self.required && self.default.is_none() && self.implicit.is_none()
    }

    /// Check the declaration and normalize its default to the declared type.
    pub(crate) fn prepare(&mut self) -> Result<(), StructuralViolation> {
        if self.name.chars().count() < 2 {
            return Err(StructuralViolation::OptionNameTooShort(self.name.clone()));
        }
        if !is_name(&self.name) {
            return Err(StructuralViolation::InvalidOptionName(self.name.clone()));
        }
        if let Some(short) = self.short
            && !is_name_char(short)
        {
            return Err(StructuralViolation::InvalidShortName {
                option: self.name.clone(),
                short,
            });
        }
        if self.description.trim().is_empty() {
            return Err(StructuralViolation::MissingSlotDescription {
                kind: SlotKind::Option,
                name: self.name.clone(),
            });
        }
        if let Some(implicit) = &self.implicit {
            if self.array {
                return Err(StructuralViolation::ImplicitArray(self.name.clone()));
            }
            if implicit.value_type().is_none() {
                return Err(StructuralViolation::ImplicitNotScalar(self.name.clone()));
            }
        }
        if !self.member_of.is_empty() && self.completer.is_some() {
            return Err(StructuralViolation::CompletionConflict {
                kind: SlotKind::Option,
                name: self.name.clone(),
            });
        }
        if let Some(default) = self.default.take() {
            let expected = self.effective_type();
            self.default = Some(expected.fit_default(default, self.array).ok_or_else(|| {
                StructuralViolation::DefaultTypeMismatch {
                    kind: SlotKind::Option,
                    name: self.name.clone(),
                    expected,
                }
            })?);
        }
        Ok(())
    }

    /// Initial namespace slot: the default, or an empty array.
    pub(crate) fn seed(&self, namespace: &mut Namespace) {
        if self.array {
            namespace.set(&self.name, Value::Array(Vec::new()));
        } else if let Some(default) = &self.default {
            namespace.set(&self.name, default.clone());
        }
    }

    /// Bind one occurrence of the option.
    pub(crate) fn apply(
        &self,
        input: &OptionInput,
        namespace: &mut Namespace,
    ) -> Result<(), DispatchError> {
        if self.implicit.is_some() && input.value.is_some() {
            return Err(GrammarError::AssignmentNotAllowed(self.invocation()).into());
        }
        let value = input.value.as_deref().filter(|value| !value.is_empty());

        if self.array {
            let raw = value.ok_or_else(|| GrammarError::MissingValue(self.invocation()))?;
            namespace.push(&self.name, self.convert(raw)?);
        } else if let Some(implicit) = &self.implicit {
            namespace.set(&self.name, implicit.clone());
        } else if let Some(raw) = value {
            namespace.set(&self.name, self.convert(raw)?);
        } else if let Some(default) = &self.default {
            namespace.set(&self.name, default.clone());
        } else {
            return Err(GrammarError::MissingValue(self.invocation()).into());
        }
        Ok(())
    }

    /// Substitute an array default into an empty array and check that a
    /// required option was given.
    pub(crate) fn finish(&self, namespace: &mut Namespace) -> Result<(), GrammarError> {
        if self.array
            && let Some(default) = &self.default
            && namespace.get(&self.name).is_none_or(Value::is_empty_array)
        {
            namespace.set(&self.name, default.clone());
        }
        if self.enforces_required()
            && namespace.get(&self.name).is_none_or(Value::is_empty_array)
        {
            return Err(GrammarError::MissingRequired(self.invocation()));
        }
        Ok(())
    }

    fn convert(&self, raw: &str) -> Result<Value, DispatchError> {
        if !self.member_of.is_empty() && !self.member_of.iter().any(|member| member == raw) {
            return Err(GrammarError::NotAMember {
                name: self.invocation(),
                value: raw.to_string(),
                allowed: self.member_of.clone(),
            }
            .into());
        }
        let expected = self.effective_type();
        expected.parse(raw).ok_or_else(|| {
            ConversionError {
                owner: SlotKind::Option,
                name: self.name.clone(),
                expected,
                value: raw.to_string(),
            }
            .into()
        })
    }
}

impl<C> OptionShape for OptionDef<C> {
    fn takes_companion(&self) -> bool {
        !self.array && self.implicit.is_none()
    }

    fn invocation(&self) -> String {
        OptionDef::invocation(self)
    }
}

impl<C> fmt::Debug for OptionDef<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionDef")
            .field("name", &self.name)
            .field("short", &self.short)
            .field("value_type", &self.value_type)
            .field("implicit", &self.implicit)
            .field("default", &self.default)
            .field("array", &self.array)
            .field("required", &self.required)
            .field("member_of", &self.member_of)
            .field("completer", &self.completer.is_some())
            .finish_non_exhaustive()
    }
}
