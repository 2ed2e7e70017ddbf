//! Edit form backing the admin dialog

use thiserror::Error;

use crate::models::{Draft, Exhibit, ExhibitDraft, Resource, TourDraft, VirtualTour};

/// Reasons a form can't become a draft
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormError {
    #[error("Title is required")]
    MissingTitle,
    #[error("Duration must be a whole number of minutes, got '{0}'")]
    InvalidDuration(String),
}

/// One text input in the form
#[derive(Clone, Debug, PartialEq)]
pub struct FormField {
    pub key: &'static str,
    pub label: &'static str,
    pub value: String,
    pub multiline: bool,
}

impl FormField {
    fn new(key: &'static str, label: &'static str) -> Self {
        FormField {
            key,
            label,
            value: String::new(),
            multiline: false,
        }
    }

    fn multiline(mut self) -> Self {
        self.multiline = true;
        self
    }
}

/// Ordered text fields for one resource, plus the editing cursor
#[derive(Clone, Debug, PartialEq)]
pub struct EntityForm {
    pub resource: Resource,
    pub fields: Vec<FormField>,
    pub selected: usize,
    pub cursor_position: usize,
}

impl EntityForm {
    /// Blank form for `resource`
    pub fn empty(resource: Resource) -> Self {
        let fields = match resource {
            Resource::Exhibits => vec![
                FormField::new("title", "Title"),
                FormField::new("period", "Period"),
                FormField::new("description", "Description").multiline(),
                FormField::new("image_url", "Image URL"),
                FormField::new("category", "Category"),
                FormField::new("location", "Location"),
            ],
            Resource::Tours => vec![
                FormField::new("title", "Title"),
                FormField::new("description", "Description").multiline(),
                FormField::new("duration_minutes", "Duration (min)"),
                FormField::new("video_url", "Video URL"),
                FormField::new("thumbnail_url", "Thumbnail URL"),
                FormField::new("category", "Category"),
            ],
        };
        EntityForm {
            resource,
            fields,
            selected: 0,
            cursor_position: 0,
        }
    }

    pub fn from_exhibit(exhibit: &Exhibit) -> Self {
        let draft = ExhibitDraft::from(exhibit);
        let mut form = EntityForm::empty(Resource::Exhibits);
        form.set("title", draft.title);
        form.set("period", draft.period);
        form.set("description", draft.description);
        form.set("image_url", draft.image_url);
        form.set("category", draft.category);
        form.set("location", draft.location);
        form.cursor_position = form.current_value().len();
        form
    }

    pub fn from_tour(tour: &VirtualTour) -> Self {
        let draft = TourDraft::from(tour);
        let mut form = EntityForm::empty(Resource::Tours);
        form.set("title", draft.title);
        form.set("description", draft.description);
        form.set("duration_minutes", draft.duration_minutes.to_string());
        form.set("video_url", draft.video_url);
        form.set("thumbnail_url", draft.thumbnail_url);
        form.set("category", draft.category);
        form.cursor_position = form.current_value().len();
        form
    }

    pub fn get(&self, key: &str) -> &str {
        self.fields
            .iter()
            .find(|f| f.key == key)
            .map(|f| f.value.as_str())
            .unwrap_or("")
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        if let Some(field) = self.fields.iter_mut().find(|f| f.key == key) {
            field.value = value.into();
        }
    }

    /// Validate and convert into a draft
    pub fn to_draft(&self) -> Result<Draft, FormError> {
        if self.get("title").trim().is_empty() {
            return Err(FormError::MissingTitle);
        }

        match self.resource {
            Resource::Exhibits => Ok(Draft::Exhibit(ExhibitDraft {
                title: self.get("title").to_string(),
                period: self.get("period").to_string(),
                description: self.get("description").to_string(),
                image_url: self.get("image_url").to_string(),
                category: self.get("category").to_string(),
                location: self.get("location").to_string(),
            })),
            Resource::Tours => {
                let raw = self.get("duration_minutes").trim();
                let duration_minutes = if raw.is_empty() {
                    0
                } else {
                    raw.parse::<u32>()
                        .map_err(|_| FormError::InvalidDuration(raw.to_string()))?
                };
                Ok(Draft::Tour(TourDraft {
                    title: self.get("title").to_string(),
                    description: self.get("description").to_string(),
                    duration_minutes,
                    video_url: self.get("video_url").to_string(),
                    thumbnail_url: self.get("thumbnail_url").to_string(),
                    category: self.get("category").to_string(),
                }))
            }
        }
    }

    // ========================
    // Field navigation
    // ========================

    pub fn next_field(&mut self) {
        self.selected = (self.selected + 1) % self.fields.len();
        self.cursor_position = self.current_value().len();
    }

    pub fn prev_field(&mut self) {
        self.selected = self
            .selected
            .checked_sub(1)
            .unwrap_or(self.fields.len() - 1);
        self.cursor_position = self.current_value().len();
    }

    pub fn current_value(&self) -> &str {
        &self.fields[self.selected].value
    }

    // ========================
    // Input editing
    // ========================

    pub fn move_cursor_left(&mut self) {
        let input = self.current_value();
        if self.cursor_position > 0 {
            self.cursor_position = input[..self.cursor_position]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
        }
    }

    pub fn move_cursor_right(&mut self) {
        let input = self.current_value();
        if self.cursor_position < input.len() {
            self.cursor_position = input[self.cursor_position..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor_position + i)
                .unwrap_or(input.len());
        }
    }

    pub fn enter_char(&mut self, c: char) {
        let cursor_pos = self.cursor_position;
        let input = &mut self.fields[self.selected].value;
        if cursor_pos <= input.len() {
            input.insert(cursor_pos, c);
            self.cursor_position = cursor_pos + c.len_utf8();
        }
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position > 0 {
            let cursor_pos = self.cursor_position;
            let input = &mut self.fields[self.selected].value;
            let prev_pos = input[..cursor_pos]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            input.remove(prev_pos);
            self.cursor_position = prev_pos;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_str(form: &mut EntityForm, s: &str) {
        for c in s.chars() {
            form.enter_char(c);
        }
    }

    #[test]
    fn test_vase_scenario_draft() {
        let mut form = EntityForm::empty(Resource::Exhibits);
        form.set("title", "Vase");
        form.set("period", "V BC");
        form.set("category", "pottery");
        form.set("location", "Hall 2");

        let draft = form.to_draft().unwrap();
        assert_eq!(
            draft,
            Draft::Exhibit(ExhibitDraft {
                title: "Vase".into(),
                period: "V BC".into(),
                description: String::new(),
                image_url: String::new(),
                category: "pottery".into(),
                location: "Hall 2".into(),
            })
        );
    }

    #[test]
    fn test_blank_title_rejected() {
        let mut form = EntityForm::empty(Resource::Tours);
        form.set("title", "   ");
        assert_eq!(form.to_draft(), Err(FormError::MissingTitle));
    }

    #[test]
    fn test_duration_parsing() {
        let mut form = EntityForm::empty(Resource::Tours);
        form.set("title", "Egypt");
        match form.to_draft().unwrap() {
            Draft::Tour(t) => assert_eq!(t.duration_minutes, 0),
            other => panic!("unexpected draft {:?}", other),
        }

        form.set("duration_minutes", "half an hour");
        assert!(matches!(form.to_draft(), Err(FormError::InvalidDuration(_))));

        form.set("duration_minutes", " 45 ");
        match form.to_draft().unwrap() {
            Draft::Tour(t) => assert_eq!(t.duration_minutes, 45),
            other => panic!("unexpected draft {:?}", other),
        }
    }

    #[test]
    fn test_editing_is_utf8_safe() {
        let mut form = EntityForm::empty(Resource::Exhibits);
        type_str(&mut form, "Ваза");
        assert_eq!(form.get("title"), "Ваза");

        form.move_cursor_left();
        form.delete_char();
        assert_eq!(form.get("title"), "Ваа");

        form.move_cursor_right();
        form.enter_char('!');
        assert_eq!(form.get("title"), "Ваа!");
    }

    #[test]
    fn test_field_cycling_wraps() {
        let mut form = EntityForm::empty(Resource::Exhibits);
        form.prev_field();
        assert_eq!(form.fields[form.selected].key, "location");
        form.next_field();
        assert_eq!(form.fields[form.selected].key, "title");
    }

    #[test]
    fn test_prefill_from_tour() {
        let tour = VirtualTour {
            id: 9,
            title: "Middle Ages".into(),
            description: "Castles".into(),
            duration_minutes: 20,
            video_url: "v".into(),
            thumbnail_url: "t".into(),
            category: "history".into(),
            viewers_count: 890,
        };
        let form = EntityForm::from_tour(&tour);
        assert_eq!(form.get("duration_minutes"), "20");
        assert_eq!(form.cursor_position, "Middle Ages".len());
        assert_eq!(form.to_draft().unwrap(), Draft::Tour(TourDraft::from(&tour)));
    }
}
