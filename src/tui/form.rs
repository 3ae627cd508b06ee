use crate::model::{LibraryConfig, Material, MaterialDraft, Status};
use crate::ops::normalize::canonical_status;
use crate::util::unicode::{next_grapheme_boundary, prev_grapheme_boundary};

/// Fields of the add/edit form, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Title,
    Author,
    MaterialType,
    Subject,
    Status,
    Progress,
    Link,
    Notes,
}

impl FieldKind {
    pub fn all() -> [FieldKind; 8] {
        [
            FieldKind::Title,
            FieldKind::Author,
            FieldKind::MaterialType,
            FieldKind::Subject,
            FieldKind::Status,
            FieldKind::Progress,
            FieldKind::Link,
            FieldKind::Notes,
        ]
    }

    pub fn label(self) -> &'static str {
        match self {
            FieldKind::Title => "Title",
            FieldKind::Author => "Author",
            FieldKind::MaterialType => "Type",
            FieldKind::Subject => "Subject",
            FieldKind::Status => "Status",
            FieldKind::Progress => "Progress",
            FieldKind::Link => "Link",
            FieldKind::Notes => "Notes",
        }
    }

    /// Choice fields cycle through a fixed list with Left/Right instead of
    /// taking typed text.
    pub fn is_choice(self) -> bool {
        matches!(
            self,
            FieldKind::MaterialType | FieldKind::Subject | FieldKind::Status
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub kind: FieldKind,
    pub value: String,
    /// Byte offset of the edit cursor in `value`
    pub cursor: usize,
    /// Value when the form opened, used to send only changed fields on edit
    pub original: String,
}

impl FormField {
    fn new(kind: FieldKind, value: String) -> Self {
        FormField {
            kind,
            cursor: value.len(),
            original: value.clone(),
            value,
        }
    }

    fn changed(&self) -> bool {
        self.value != self.original
    }
}

/// Whether the form creates a record or edits an existing one
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormTarget {
    Add,
    Edit { id: String },
}

/// Add/edit form state. A failed submit sets `error` and keeps every typed
/// value in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub target: FormTarget,
    pub fields: Vec<FormField>,
    pub focus: usize,
    pub error: Option<String>,
    subjects: Vec<String>,
    material_types: Vec<String>,
}

impl FormState {
    /// Empty form for a new material, defaulting the choice fields
    pub fn for_add(config: &LibraryConfig, subject: Option<&str>) -> Self {
        let subject = subject
            .map(str::to_string)
            .or_else(|| config.subjects.first().cloned())
            .unwrap_or_default();
        let material_type = config
            .material_types
            .first()
            .cloned()
            .unwrap_or_else(crate::model::material::default_material_type);
        let fields = FieldKind::all()
            .into_iter()
            .map(|kind| {
                let value = match kind {
                    FieldKind::MaterialType => material_type.clone(),
                    FieldKind::Subject => subject.clone(),
                    FieldKind::Status => Status::ToRead.label().to_string(),
                    FieldKind::Progress => "0".to_string(),
                    _ => String::new(),
                };
                FormField::new(kind, value)
            })
            .collect();
        FormState {
            target: FormTarget::Add,
            fields,
            focus: 0,
            error: None,
            subjects: config.subjects.clone(),
            material_types: config.material_types.clone(),
        }
    }

    /// Form pre-filled from an existing material
    pub fn for_edit(config: &LibraryConfig, material: &Material) -> Self {
        let fields = FieldKind::all()
            .into_iter()
            .map(|kind| {
                let value = match kind {
                    FieldKind::Title => material.title.clone(),
                    FieldKind::Author => material.author.clone(),
                    FieldKind::MaterialType => material.material_type.clone(),
                    FieldKind::Subject => material.category.clone(),
                    FieldKind::Status => material.status.label().to_string(),
                    FieldKind::Progress => material.progress.to_string(),
                    FieldKind::Link => material.material_link.clone().unwrap_or_default(),
                    FieldKind::Notes => material.notes.clone().unwrap_or_default(),
                };
                FormField::new(kind, value)
            })
            .collect();
        FormState {
            target: FormTarget::Edit {
                id: material.id.clone(),
            },
            fields,
            focus: 0,
            error: None,
            subjects: config.subjects.clone(),
            material_types: config.material_types.clone(),
        }
    }

    pub fn title(&self) -> &'static str {
        match self.target {
            FormTarget::Add => "Add material",
            FormTarget::Edit { .. } => "Edit material",
        }
    }

    pub fn focused(&self) -> &FormField {
        &self.fields[self.focus]
    }

    fn focused_mut(&mut self) -> &mut FormField {
        &mut self.fields[self.focus]
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % self.fields.len();
    }

    pub fn focus_prev(&mut self) {
        self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
    }

    // -----------------------------------------------------------------------
    // Text editing
    // -----------------------------------------------------------------------

    pub fn insert_char(&mut self, c: char) {
        if self.focused().kind.is_choice() {
            return;
        }
        let field = self.focused_mut();
        field.value.insert(field.cursor, c);
        field.cursor += c.len_utf8();
    }

    pub fn backspace(&mut self) {
        if self.focused().kind.is_choice() {
            return;
        }
        let field = self.focused_mut();
        if field.cursor == 0 {
            return;
        }
        let start = prev_grapheme_boundary(&field.value, field.cursor).unwrap_or(0);
        field.value.replace_range(start..field.cursor, "");
        field.cursor = start;
    }

    /// Left: move the text cursor, or pick the previous choice
    pub fn left(&mut self) {
        if self.focused().kind.is_choice() {
            self.cycle_choice(false);
        } else {
            let field = self.focused_mut();
            if let Some(prev) = prev_grapheme_boundary(&field.value, field.cursor) {
                field.cursor = prev;
            }
        }
    }

    /// Right: move the text cursor, or pick the next choice
    pub fn right(&mut self) {
        if self.focused().kind.is_choice() {
            self.cycle_choice(true);
        } else {
            let field = self.focused_mut();
            if let Some(next) = next_grapheme_boundary(&field.value, field.cursor) {
                field.cursor = next;
            }
        }
    }

    fn choices(&self, kind: FieldKind) -> Vec<String> {
        match kind {
            FieldKind::MaterialType => self.material_types.clone(),
            FieldKind::Subject => self.subjects.clone(),
            FieldKind::Status => Status::all().iter().map(|s| s.label().to_string()).collect(),
            _ => Vec::new(),
        }
    }

    fn cycle_choice(&mut self, forward: bool) {
        let choices = self.choices(self.focused().kind);
        if choices.is_empty() {
            return;
        }
        let current = choices
            .iter()
            .position(|c| c.eq_ignore_ascii_case(&self.focused().value));
        let next = match (current, forward) {
            (None, _) => 0,
            (Some(i), true) => (i + 1) % choices.len(),
            (Some(i), false) => (i + choices.len() - 1) % choices.len(),
        };
        let field = self.focused_mut();
        field.value = choices[next].clone();
        field.cursor = field.value.len();
    }

    // -----------------------------------------------------------------------
    // Submission
    // -----------------------------------------------------------------------

    fn value(&self, kind: FieldKind) -> Option<&FormField> {
        self.fields.iter().find(|f| f.kind == kind)
    }

    /// Build the draft to submit. Editing sends only the fields the user
    /// changed so an untouched progress value cannot undo a status change.
    /// Returns a message for input that cannot even be parsed.
    pub fn to_draft(&self) -> Result<MaterialDraft, String> {
        let include = |field: &FormField| match self.target {
            FormTarget::Add => true,
            FormTarget::Edit { .. } => field.changed(),
        };
        let text = |kind: FieldKind| {
            self.value(kind)
                .filter(|f| include(f))
                .map(|f| f.value.clone())
        };

        let status = match self.value(FieldKind::Status).filter(|f| include(f)) {
            Some(f) => Some(
                canonical_status(&f.value)
                    .ok_or_else(|| format!("unknown status \"{}\"", f.value))?,
            ),
            None => None,
        };
        let progress = match self.value(FieldKind::Progress).filter(|f| include(f)) {
            Some(f) if f.value.trim().is_empty() => None,
            Some(f) => Some(
                f.value
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| "progress must be a number".to_string())?,
            ),
            None => None,
        };

        Ok(MaterialDraft {
            title: text(FieldKind::Title),
            author: text(FieldKind::Author),
            material_type: text(FieldKind::MaterialType),
            material_link: text(FieldKind::Link),
            category: text(FieldKind::Subject),
            status,
            progress,
            notes: text(FieldKind::Notes),
        })
    }
}
