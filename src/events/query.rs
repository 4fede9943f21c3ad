use crate::events::access;
use crate::models::{AttendeeRole, Event, EventView};
use crate::store::{Filter, Predicate, Store, StoreError};
use crate::utils::error::AppError;

/// Optional, independently combinable list filters. All supplied filters
/// apply conjunctively.
#[derive(Debug, Clone, Default)]
pub struct EventQuery {
    pub search: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub role: Option<AttendeeRole>,
}

impl EventQuery {
    /// Translate the store-side filters to the store's query form. The
    /// role filter is not part of this: it works on the computed viewer
    /// role, which only exists after the records are read.
    fn to_filter(&self) -> Filter {
        let mut filter = Filter::new();
        if let Some(search) = &self.search {
            filter = filter.any(vec![
                Predicate::contains_ci("title", search.clone()),
                Predicate::contains_ci("description", search.clone()),
            ]);
        }
        if let Some(from) = &self.date_from {
            filter = filter.gte("date", from.clone());
        }
        if let Some(to) = &self.date_to {
            filter = filter.lte("date", to.clone());
        }
        filter
    }
}

/// List events matching the query, as the requester sees them. Sorted
/// most recent first: date descending, then time descending, remaining
/// ties in store-natural order.
pub async fn list(
    store: &Store,
    requester: &str,
    query: &EventQuery,
) -> Result<Vec<EventView>, AppError> {
    let views = run(store, requester, &query.to_filter()).await?;
    Ok(match query.role {
        Some(role) => views
            .into_iter()
            .filter(|view| view.user_role == Some(role))
            .collect(),
        None => views,
    })
}

/// Events the requester organizes. A direct equality filter on
/// `organizer_email`, not the viewer-role filter.
pub async fn mine(store: &Store, requester: &str) -> Result<Vec<EventView>, AppError> {
    let filter = Filter::new().eq("organizer_email", requester);
    run(store, requester, &filter).await
}

/// Events the requester was invited to by someone else.
pub async fn invitations(store: &Store, requester: &str) -> Result<Vec<EventView>, AppError> {
    let filter = Filter::new()
        .eq("attendees.email", requester)
        .ne("organizer_email", requester);
    run(store, requester, &filter).await
}

async fn run(store: &Store, requester: &str, filter: &Filter) -> Result<Vec<EventView>, AppError> {
    let documents = store.events.find_many(filter).await?;

    let mut views = Vec::with_capacity(documents.len());
    for doc in documents {
        let event: Event =
            serde_json::from_value(doc.body).map_err(|e| AppError::Store(StoreError::Codec(e)))?;
        views.push(access::view_for(doc.id, event, requester));
    }

    views.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.time.cmp(&a.time)));
    Ok(views)
}
