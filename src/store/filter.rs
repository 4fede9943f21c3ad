use serde_json::Value;
use uuid::Uuid;

/// A single predicate over a dotted field path. Paths descend through
/// objects; stepping through an array applies the remaining path to each
/// element, and the predicate holds if any element satisfies it.
#[derive(Debug, Clone)]
pub enum Predicate {
    Eq(String, Value),
    Ne(String, Value),
    Gte(String, Value),
    Lte(String, Value),
    /// Case-insensitive substring match against a string field.
    ContainsCi(String, String),
    /// Disjunction of the inner predicates.
    Any(Vec<Predicate>),
}

impl Predicate {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Predicate::Eq(field.into(), value.into())
    }

    pub fn contains_ci(field: impl Into<String>, needle: impl Into<String>) -> Self {
        Predicate::ContainsCi(field.into(), needle.into())
    }

    pub fn matches(&self, doc: &Value) -> bool {
        match self {
            Predicate::Eq(path, value) => lookup(doc, path).iter().any(|v| *v == value),
            Predicate::Ne(path, value) => !lookup(doc, path).iter().any(|v| *v == value),
            Predicate::Gte(path, value) => compare_any(doc, path, value, |ord| ord.is_ge()),
            Predicate::Lte(path, value) => compare_any(doc, path, value, |ord| ord.is_le()),
            Predicate::ContainsCi(path, needle) => {
                let needle = needle.to_lowercase();
                lookup(doc, path).iter().any(|v| match v {
                    Value::String(s) => s.to_lowercase().contains(&needle),
                    _ => false,
                })
            }
            Predicate::Any(inner) => inner.iter().any(|p| p.matches(doc)),
        }
    }
}

fn compare_any(doc: &Value, path: &str, value: &Value, keep: fn(std::cmp::Ordering) -> bool) -> bool {
    lookup(doc, path).iter().any(|v| match (v, value) {
        (Value::String(a), Value::String(b)) => keep(a.as_str().cmp(b.as_str())),
        _ => false,
    })
}

/// Resolve a dotted path against a document, fanning out over arrays.
fn lookup<'a>(doc: &'a Value, path: &str) -> Vec<&'a Value> {
    let mut current = vec![doc];
    for segment in path.split('.') {
        let mut next = Vec::new();
        for value in current {
            match value {
                Value::Object(map) => {
                    if let Some(child) = map.get(segment) {
                        next.push(child);
                    }
                }
                Value::Array(items) => {
                    for item in items {
                        if let Some(child) = item.get(segment) {
                            next.push(child);
                        }
                    }
                }
                _ => {}
            }
        }
        current = next;
    }
    current
}

/// A conjunctive filter: a document matches when its id satisfies the
/// optional id constraint and every predicate holds against its body.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    id: Option<Uuid>,
    predicates: Vec<Predicate>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.predicates.push(Predicate::Eq(field.into(), value.into()));
        self
    }

    pub fn ne(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.predicates.push(Predicate::Ne(field.into(), value.into()));
        self
    }

    pub fn gte(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.predicates.push(Predicate::Gte(field.into(), value.into()));
        self
    }

    pub fn lte(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.predicates.push(Predicate::Lte(field.into(), value.into()));
        self
    }

    pub fn any(mut self, predicates: Vec<Predicate>) -> Self {
        self.predicates.push(Predicate::Any(predicates));
        self
    }

    pub fn matches(&self, id: Uuid, body: &Value) -> bool {
        if let Some(expected) = self.id {
            if expected != id {
                return false;
            }
        }
        self.predicates.iter().all(|p| p.matches(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc() -> Value {
        json!({
            "title": "Team Offsite",
            "description": null,
            "date": "2025-06-01",
            "organizer_email": "a@example.com",
            "attendees": [
                {"email": "a@example.com", "role": "organizer", "status": "going"},
                {"email": "b@example.com", "role": "attendee", "status": "pending"},
            ],
        })
    }

    #[test]
    fn test_eq_on_scalar_field() {
        let filter = Filter::new().eq("organizer_email", "a@example.com");
        assert!(filter.matches(Uuid::new_v4(), &doc()));

        let filter = Filter::new().eq("organizer_email", "z@example.com");
        assert!(!filter.matches(Uuid::new_v4(), &doc()));
    }

    #[test]
    fn test_dotted_path_fans_out_over_array_elements() {
        let filter = Filter::new().eq("attendees.email", "b@example.com");
        assert!(filter.matches(Uuid::new_v4(), &doc()));

        let filter = Filter::new().eq("attendees.email", "c@example.com");
        assert!(!filter.matches(Uuid::new_v4(), &doc()));
    }

    #[test]
    fn test_ne_holds_when_no_candidate_equals() {
        let filter = Filter::new().ne("organizer_email", "b@example.com");
        assert!(filter.matches(Uuid::new_v4(), &doc()));

        let filter = Filter::new().ne("organizer_email", "a@example.com");
        assert!(!filter.matches(Uuid::new_v4(), &doc()));
    }

    #[test]
    fn test_date_bounds_compare_lexically() {
        let filter = Filter::new().gte("date", "2025-06-01").lte("date", "2025-06-30");
        assert!(filter.matches(Uuid::new_v4(), &doc()));

        let filter = Filter::new().gte("date", "2025-06-02");
        assert!(!filter.matches(Uuid::new_v4(), &doc()));
    }

    #[test]
    fn test_contains_ci_ignores_case_and_null_fields() {
        let filter = Filter::new().any(vec![
            Predicate::contains_ci("title", "OFFSITE"),
            Predicate::contains_ci("description", "OFFSITE"),
        ]);
        assert!(filter.matches(Uuid::new_v4(), &doc()));

        let filter = Filter::new().any(vec![
            Predicate::contains_ci("title", "retro"),
            Predicate::contains_ci("description", "retro"),
        ]);
        assert!(!filter.matches(Uuid::new_v4(), &doc()));
    }

    #[test]
    fn test_id_constraint() {
        let id = Uuid::new_v4();
        let filter = Filter::new().id(id);
        assert!(filter.matches(id, &doc()));
        assert!(!filter.matches(Uuid::new_v4(), &doc()));
    }
}
