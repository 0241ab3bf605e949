//! Executes a selection set against live data.
//!
//! Every object in the response is produced by one [`ExecutableNode`]: a type,
//! the data value it is bound to and the selection set to serialize. Nodes are
//! consumed by [`ExecutableNode::serialize`], nested nodes are created for
//! related fields and share the document's fragment table.

mod validation;

use std::{cell::RefCell, collections::HashMap, rc::Rc};

use async_graphql_parser::{
    types::{ExecutableDocument, Field, Selection, SelectionSet},
    Pos, Positioned,
};
use indexmap::IndexMap;

pub(crate) use validation::check_depth;

use crate::{
    config::ErrorMode,
    error::{Error, ErrorPath, GraphqlError},
    introspection::TYPENAME_FIELD,
    registry::Coerced,
    Type, Value,
};

/// Selections grouped by response key, keys in order of first appearance.
/// Each key holds its distinct field nodes ordered by their last appearance,
/// so the last one decides the value.
type CollectedFields<'doc> = IndexMap<&'doc str, Vec<&'doc Positioned<Field>>>;

/// State shared by every node of one execution.
pub(crate) struct ExecutionContext<'doc> {
    document: &'doc ExecutableDocument,
    error_mode: ErrorMode,
    errors: RefCell<Vec<GraphqlError>>,
    fragments: RefCell<HashMap<&'doc str, Rc<CollectedFields<'doc>>>>,
}

/// Why serializing a node stopped.
pub(crate) enum Failure {
    /// Fails the whole request.
    Fatal(Error),
    /// Nulls out the closest nullable field on the way up.
    Field(FieldError),
}

pub(crate) struct FieldError {
    error: Error,
    location: Pos,
    path: ErrorPath,
}

impl From<FieldError> for GraphqlError {
    fn from(FieldError { error, location, path }: FieldError) -> Self {
        GraphqlError::from(&error).with_location(location).with_path(path)
    }
}

impl From<Error> for Failure {
    fn from(error: Error) -> Self {
        Failure::Fatal(error)
    }
}

impl<'doc> ExecutionContext<'doc> {
    pub(crate) fn new(document: &'doc ExecutableDocument, error_mode: ErrorMode) -> Self {
        ExecutionContext {
            document,
            error_mode,
            errors: RefCell::new(Vec::new()),
            fragments: RefCell::new(HashMap::new()),
        }
    }

    pub(crate) fn into_errors(self) -> Vec<GraphqlError> {
        self.errors.into_inner()
    }

    pub(crate) fn record(&self, error: FieldError) {
        tracing::warn!(path = %error.path, "{}", error.error);
        self.errors.borrow_mut().push(error.into());
    }

    fn field_error(&self, error: Error, location: Pos, path: &ErrorPath) -> Failure {
        match self.error_mode {
            ErrorMode::Abort => Failure::Fatal(error),
            ErrorMode::Partial => Failure::Field(FieldError {
                error,
                location,
                path: path.clone(),
            }),
        }
    }

    /// A nullable position absorbs field errors below it.
    fn null_on_error(&self, result: Result<serde_json::Value, Failure>) -> Result<serde_json::Value, Failure> {
        match result {
            Err(Failure::Field(error)) => {
                self.record(error);
                Ok(serde_json::Value::Null)
            }
            other => other,
        }
    }
}

pub(crate) struct ExecutableNode<'ctx, 'doc> {
    ctx: &'ctx ExecutionContext<'doc>,
    ty: Type,
    data: Value,
    selection_set: &'doc Positioned<SelectionSet>,
    path: ErrorPath,
}

impl<'ctx, 'doc> ExecutableNode<'ctx, 'doc> {
    pub(crate) fn new(
        ctx: &'ctx ExecutionContext<'doc>,
        ty: Type,
        data: Value,
        selection_set: &'doc Positioned<SelectionSet>,
        path: ErrorPath,
    ) -> Self {
        ExecutableNode {
            ctx,
            ty,
            data,
            selection_set,
            path,
        }
    }

    /// Resolves every selected field, in selection order. When several selections
    /// share a response key, each of them is resolved and the last one wins.
    pub(crate) fn serialize(self) -> Result<serde_json::Value, Failure> {
        tracing::trace!("Where: {}", self.ty.name());

        let mut fields = CollectedFields::new();
        self.collect_fields(self.selection_set, &mut Vec::new(), &mut fields)?;

        let mut object = serde_json::Map::with_capacity(fields.len());
        for (response_key, selections) in fields {
            for field in selections {
                let value = self.resolve_field(response_key, field)?;
                object.insert(response_key.to_owned(), value);
            }
        }
        Ok(serde_json::Value::Object(object))
    }

    /// Flattens fragments into `fields`. Fragments are flattened once per execution.
    fn collect_fields(
        &self,
        selection_set: &'doc Positioned<SelectionSet>,
        expanding: &mut Vec<&'doc str>,
        fields: &mut CollectedFields<'doc>,
    ) -> Result<(), Error> {
        for selection in &selection_set.node.items {
            match &selection.node {
                Selection::Field(field) => push_field(fields, field.node.response_key().node.as_str(), field),
                Selection::InlineFragment(fragment) => {
                    self.collect_fields(&fragment.node.selection_set, expanding, fields)?;
                }
                Selection::FragmentSpread(spread) => {
                    let name = spread.node.fragment_name.node.as_str();
                    for (&response_key, selections) in self.fragment_fields(name, expanding)?.iter() {
                        for &field in selections {
                            push_field(fields, response_key, field);
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn fragment_fields(
        &self,
        name: &'doc str,
        expanding: &mut Vec<&'doc str>,
    ) -> Result<Rc<CollectedFields<'doc>>, Error> {
        if expanding.contains(&name) {
            return Err(Error::FragmentCycle { name: name.to_owned() });
        }
        let cached = self.ctx.fragments.borrow().get(name).cloned();
        if let Some(fields) = cached {
            return Ok(fields);
        }

        let fragment = self
            .ctx
            .document
            .fragments
            .get(name)
            .ok_or_else(|| Error::UnknownFragment { name: name.to_owned() })?;

        let mut fields = CollectedFields::new();
        expanding.push(name);
        self.collect_fields(&fragment.node.selection_set, expanding, &mut fields)?;
        expanding.pop();

        let fields = Rc::new(fields);
        self.ctx.fragments.borrow_mut().insert(name, Rc::clone(&fields));
        Ok(fields)
    }

    fn resolve_field(
        &self,
        response_key: &str,
        field: &'doc Positioned<Field>,
    ) -> Result<serde_json::Value, Failure> {
        let name = field.node.name.node.as_str();
        let path = self.path.child(response_key);

        if name == TYPENAME_FIELD {
            return Ok(self.ty.name().into());
        }

        let descriptor = self.ty.field(name).ok_or_else(|| Error::UnknownField {
            type_name: self.ty.name().to_owned(),
            field: name.to_owned(),
        })?;

        tracing::trace!("Resolving {}.{} as {}", self.ty.name(), name, response_key);

        let result = descriptor
            .resolve(name, &self.data)
            .and_then(|raw| descriptor.coerce(&self.ty, raw))
            .map_err(|error| self.ctx.field_error(error, field.pos, &path))
            .and_then(|coerced| self.serialize_coerced(coerced, field, &path))
            .and_then(|value| {
                if value.is_null() && descriptor.is_non_null() {
                    Err(self.ctx.field_error(
                        Error::NullValueForNonNullField { field: name.to_owned() },
                        field.pos,
                        &path,
                    ))
                } else {
                    Ok(value)
                }
            });

        if descriptor.is_non_null() {
            result
        } else {
            self.ctx.null_on_error(result)
        }
    }

    fn serialize_coerced(
        &self,
        coerced: Coerced,
        field: &'doc Positioned<Field>,
        path: &ErrorPath,
    ) -> Result<serde_json::Value, Failure> {
        match coerced {
            Coerced::Leaf(value) => Ok(value),
            Coerced::Object(ty, data) => self.child(ty, data, field, path.clone()).serialize(),
            Coerced::Objects(ty, items) => {
                let mut list = Vec::with_capacity(items.len());
                for (index, data) in items.into_iter().enumerate() {
                    if data.is_null() {
                        list.push(serde_json::Value::Null);
                        continue;
                    }
                    let item = self.child(ty.clone(), data, field, path.child(index)).serialize();
                    list.push(self.ctx.null_on_error(item)?);
                }
                Ok(serde_json::Value::Array(list))
            }
        }
    }

    fn child(
        &self,
        ty: Type,
        data: Value,
        field: &'doc Positioned<Field>,
        path: ErrorPath,
    ) -> ExecutableNode<'ctx, 'doc> {
        ExecutableNode::new(self.ctx, ty, data, &field.node.selection_set, path)
    }
}

/// The same field node reached again, through a fragment spread twice, moves to the end
/// of its key instead of being resolved twice.
fn push_field<'doc>(fields: &mut CollectedFields<'doc>, response_key: &'doc str, field: &'doc Positioned<Field>) {
    let selections = fields.entry(response_key).or_default();
    selections.retain(|selected| !std::ptr::eq(*selected, field));
    selections.push(field);
}
