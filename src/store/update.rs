use serde_json::Value;

/// One mutation step inside an atomic `update_one`.
#[derive(Debug, Clone)]
pub enum UpdateOp {
    /// Set a top-level field.
    Set { field: String, value: Value },
    /// Set a field on the first element of `array` whose `match_field`
    /// equals `match_value` (the positional update used for RSVP edits).
    SetMatchedElement {
        array: String,
        match_field: String,
        match_value: Value,
        field: String,
        value: Value,
    },
    /// Append each value to an array field, preserving order.
    PushEach { array: String, values: Vec<Value> },
}

/// A typed update document. All ops are applied to one document under a
/// single write lock, so callers get document-level atomicity.
#[derive(Debug, Clone, Default)]
pub struct Update {
    ops: Vec<UpdateOp>,
}

impl Update {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.ops.push(UpdateOp::Set {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    pub fn set_matched_element(
        mut self,
        array: impl Into<String>,
        match_field: impl Into<String>,
        match_value: impl Into<Value>,
        field: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.ops.push(UpdateOp::SetMatchedElement {
            array: array.into(),
            match_field: match_field.into(),
            match_value: match_value.into(),
            field: field.into(),
            value: value.into(),
        });
        self
    }

    pub fn push_each(mut self, array: impl Into<String>, values: Vec<Value>) -> Self {
        self.ops.push(UpdateOp::PushEach {
            array: array.into(),
            values,
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn ops(&self) -> &[UpdateOp] {
        &self.ops
    }

    /// Apply every op to the document body in order.
    pub(crate) fn apply(&self, body: &mut Value) {
        for op in &self.ops {
            match op {
                UpdateOp::Set { field, value } => {
                    if let Value::Object(map) = body {
                        map.insert(field.clone(), value.clone());
                    }
                }
                UpdateOp::SetMatchedElement {
                    array,
                    match_field,
                    match_value,
                    field,
                    value,
                } => {
                    if let Some(Value::Array(items)) = body.get_mut(array.as_str()) {
                        if let Some(element) = items
                            .iter_mut()
                            .find(|item| item.get(match_field.as_str()) == Some(match_value))
                        {
                            if let Value::Object(map) = element {
                                map.insert(field.clone(), value.clone());
                            }
                        }
                    }
                }
                UpdateOp::PushEach { array, values } => {
                    if let Some(Value::Array(items)) = body.get_mut(array.as_str()) {
                        items.extend(values.iter().cloned());
                    }
                }
            }
        }
    }
}
