use serde::{Deserialize, Deserializer, Serialize};

/// Remote collection the admin panel works against
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Resource {
    #[default]
    Exhibits,
    Tours,
}

impl Resource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Exhibits => "exhibits",
            Resource::Tours => "tours",
        }
    }

    /// Singular noun used in toasts and dialog titles
    pub fn singular(&self) -> &'static str {
        match self {
            Resource::Exhibits => "exhibit",
            Resource::Tours => "tour",
        }
    }

    /// Capitalised singular, for headings
    pub fn label(&self) -> &'static str {
        match self {
            Resource::Exhibits => "Exhibit",
            Resource::Tours => "Tour",
        }
    }

    pub fn toggle(&self) -> Resource {
        match self {
            Resource::Exhibits => Resource::Tours,
            Resource::Tours => Resource::Exhibits,
        }
    }
}

/// Operation performed against a collection endpoint
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApiAction {
    Fetch,
    Create,
    Update,
    Delete,
}

impl ApiAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiAction::Fetch => "Loading",
            ApiAction::Create => "Creating",
            ApiAction::Update => "Updating",
            ApiAction::Delete => "Deleting",
        }
    }
}

/// Treats JSON `null` the same as a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Museum artifact as stored by the exhibits endpoint
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Exhibit {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub period: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub location: String,
}

/// Guided media experience as stored by the tours endpoint
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VirtualTour {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub duration_minutes: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub video_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub thumbnail_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    /// Maintained by the server, never sent back
    #[serde(default, deserialize_with = "null_as_default")]
    pub viewers_count: i64,
}

/// Client-editable exhibit fields (no id)
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ExhibitDraft {
    pub title: String,
    pub period: String,
    pub description: String,
    pub image_url: String,
    pub category: String,
    pub location: String,
}

impl From<&Exhibit> for ExhibitDraft {
    fn from(exhibit: &Exhibit) -> Self {
        ExhibitDraft {
            title: exhibit.title.clone(),
            period: exhibit.period.clone(),
            description: exhibit.description.clone(),
            image_url: exhibit.image_url.clone(),
            category: exhibit.category.clone(),
            location: exhibit.location.clone(),
        }
    }
}

/// Client-editable tour fields (no id, no viewer count)
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TourDraft {
    pub title: String,
    pub description: String,
    pub duration_minutes: u32,
    pub video_url: String,
    pub thumbnail_url: String,
    pub category: String,
}

impl From<&VirtualTour> for TourDraft {
    fn from(tour: &VirtualTour) -> Self {
        TourDraft {
            title: tour.title.clone(),
            description: tour.description.clone(),
            duration_minutes: tour.duration_minutes,
            video_url: tour.video_url.clone(),
            thumbnail_url: tour.thumbnail_url.clone(),
            category: tour.category.clone(),
        }
    }
}

/// A validated draft ready to be sent
#[derive(Clone, Debug, PartialEq)]
pub enum Draft {
    Exhibit(ExhibitDraft),
    Tour(TourDraft),
}

impl Draft {
    pub fn resource(&self) -> Resource {
        match self {
            Draft::Exhibit(_) => Resource::Exhibits,
            Draft::Tour(_) => Resource::Tours,
        }
    }

    /// JSON body for POST
    pub fn create_body(&self) -> serde_json::Value {
        match self {
            Draft::Exhibit(d) => serde_json::json!(d),
            Draft::Tour(d) => serde_json::json!(d),
        }
    }

    /// JSON body for PUT: the draft fields plus the target id
    pub fn update_body(&self, id: i64) -> serde_json::Value {
        match self {
            Draft::Exhibit(d) => serde_json::json!(WithId { id, fields: d }),
            Draft::Tour(d) => serde_json::json!(WithId { id, fields: d }),
        }
    }
}

#[derive(Serialize)]
struct WithId<'a, T: Serialize> {
    id: i64,
    #[serde(flatten)]
    fields: &'a T,
}

/// A single stored record returned by the server
#[derive(Clone, Debug, PartialEq)]
pub enum Record {
    Exhibit(Exhibit),
    Tour(VirtualTour),
}

impl Record {
    pub fn id(&self) -> i64 {
        match self {
            Record::Exhibit(e) => e.id,
            Record::Tour(t) => t.id,
        }
    }
}

/// What a successful mutation produced
#[derive(Clone, Debug, PartialEq)]
pub enum MutationOutcome {
    /// The stored record, when the response body decoded as one
    Created {
        resource: Resource,
        record: Option<Record>,
    },
    Updated {
        resource: Resource,
        record_id: i64,
        record: Option<Record>,
    },
    Deleted {
        resource: Resource,
        record_id: i64,
    },
}

impl MutationOutcome {
    pub fn resource(&self) -> Resource {
        match self {
            MutationOutcome::Created { resource, .. }
            | MutationOutcome::Updated { resource, .. }
            | MutationOutcome::Deleted { resource, .. } => *resource,
        }
    }

    pub fn action(&self) -> ApiAction {
        match self {
            MutationOutcome::Created { .. } => ApiAction::Create,
            MutationOutcome::Updated { .. } => ApiAction::Update,
            MutationOutcome::Deleted { .. } => ApiAction::Delete,
        }
    }
}

/// Toast severity
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

/// Transient notification shown in the corner of the screen
#[derive(Clone, Debug)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Toast {
            kind: ToastKind::Success,
            message: message.into(),
            created_at: chrono::Utc::now(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Toast {
            kind: ToastKind::Error,
            message: message.into(),
            created_at: chrono::Utc::now(),
        }
    }

    pub fn is_expired(&self, now: chrono::DateTime<chrono::Utc>, ttl: chrono::Duration) -> bool {
        now - self.created_at >= ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exhibit_ignores_server_columns() {
        let json = r#"{"id":3,"title":"Vase","period":"V BC","description":null,
            "image_url":"","category":"pottery","location":"Hall 2",
            "is_active":true,"created_at":"2024-01-01 10:00:00"}"#;
        let exhibit: Exhibit = serde_json::from_str(json).unwrap();
        assert_eq!(exhibit.id, 3);
        assert_eq!(exhibit.title, "Vase");
        assert_eq!(exhibit.description, "");
    }

    #[test]
    fn test_update_body_carries_id() {
        let draft = Draft::Exhibit(ExhibitDraft {
            title: "Helmet".into(),
            ..Default::default()
        });
        let body = draft.update_body(42);
        assert_eq!(body["id"], 42);
        assert_eq!(body["title"], "Helmet");
        assert!(draft.create_body().get("id").is_none());
    }

    #[test]
    fn test_tour_body_never_sends_viewers() {
        let tour = VirtualTour {
            id: 1,
            title: "Egypt".into(),
            description: String::new(),
            duration_minutes: 30,
            video_url: String::new(),
            thumbnail_url: String::new(),
            category: String::new(),
            viewers_count: 2100,
        };
        let body = Draft::Tour(TourDraft::from(&tour)).update_body(tour.id);
        assert!(body.get("viewers_count").is_none());
        assert_eq!(body["duration_minutes"], 30);
    }

    #[test]
    fn test_toast_expiry() {
        let toast = Toast::success("saved");
        let ttl = chrono::Duration::seconds(4);
        assert!(!toast.is_expired(toast.created_at, ttl));
        assert!(toast.is_expired(toast.created_at + chrono::Duration::seconds(5), ttl));
    }
}
