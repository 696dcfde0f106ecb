//! Recipe form state for the terminal editor

use recipectl_core::editor::{
    AddOutcome, EditorConfig, EditorGroups, GroupKind, ListEditor, RemoveOutcome, RowId,
};
use recipectl_core::{Recipe, RecipeCreate, RecipeForm};

/// Single-value fields above the row groups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarField {
    Title,
    Description,
    Tags,
    Cuisine,
}

impl ScalarField {
    pub const ALL: [ScalarField; 4] = [Self::Title, Self::Description, Self::Tags, Self::Cuisine];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Description => "Description",
            Self::Tags => "Tags (comma-separated)",
            Self::Cuisine => "Cuisine",
        }
    }
}

/// What the cursor is on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Field(ScalarField),
    Row(GroupKind, RowId),
}

/// Terminal recipe form
#[derive(Debug)]
pub struct App {
    /// Header text ("New recipe" / "Edit recipe")
    pub heading: String,
    pub form: RecipeForm,
    pub editor: ListEditor,
    pub focus: Focus,
    /// Status message (shown in status bar)
    pub status_message: Option<String>,
    /// Blocking notice; dismissed by any key
    pub modal: Option<String>,
}

impl App {
    /// Blank form for a new recipe
    pub fn new(config: EditorConfig) -> Self {
        Self {
            heading: "New recipe".to_string(),
            form: RecipeForm::default(),
            editor: ListEditor::new(config),
            focus: Focus::Field(ScalarField::Title),
            status_message: None,
            modal: None,
        }
    }

    /// Form pre-populated from an existing recipe
    pub fn for_recipe(config: EditorConfig, recipe: &Recipe) -> Self {
        let editor = ListEditor::initialize(
            config,
            EditorGroups::from_values(&recipe.ingredients, &recipe.instructions),
            Default::default(),
        );
        Self {
            heading: format!("Edit recipe: {}", recipe.title),
            form: RecipeForm {
                title: recipe.title.clone(),
                description: recipe.description.clone(),
                tags: recipe.tags.join(", "),
                cuisine: recipe.cuisine.clone().unwrap_or_default(),
            },
            editor,
            focus: Focus::Field(ScalarField::Title),
            status_message: None,
            modal: None,
        }
    }

    /// Every focusable target in display order
    pub fn targets(&self) -> Vec<Focus> {
        let mut targets: Vec<Focus> = ScalarField::ALL.iter().copied().map(Focus::Field).collect();
        for kind in [GroupKind::Ingredients, GroupKind::Instructions] {
            targets.extend(self.editor.rows(kind).iter().map(|row| Focus::Row(kind, row.id())));
        }
        targets
    }

    fn focus_index(&self) -> usize {
        self.targets()
            .iter()
            .position(|t| *t == self.focus)
            .unwrap_or(0)
    }

    pub fn focus_next(&mut self) {
        let targets = self.targets();
        let next = (self.focus_index() + 1) % targets.len();
        self.focus = targets[next];
    }

    pub fn focus_prev(&mut self) {
        let targets = self.targets();
        let index = self.focus_index();
        let prev = if index == 0 { targets.len() - 1 } else { index - 1 };
        self.focus = targets[prev];
    }

    /// Group of the focused row, if a row is focused
    pub fn focused_group(&self) -> Option<GroupKind> {
        match self.focus {
            Focus::Row(kind, _) => Some(kind),
            Focus::Field(_) => None,
        }
    }

    /// Text of the focused field or row
    pub fn focused_text(&self) -> String {
        match self.focus {
            Focus::Field(field) => self.field_value(field).to_string(),
            Focus::Row(kind, id) => self
                .editor
                .group(kind)
                .and_then(|g| g.row(id))
                .map(|row| row.value().to_string())
                .unwrap_or_default(),
        }
    }

    pub fn field_value(&self, field: ScalarField) -> &str {
        match field {
            ScalarField::Title => &self.form.title,
            ScalarField::Description => &self.form.description,
            ScalarField::Tags => &self.form.tags,
            ScalarField::Cuisine => &self.form.cuisine,
        }
    }

    fn set_focused_text(&mut self, text: String) {
        match self.focus {
            Focus::Field(ScalarField::Title) => self.form.title = text,
            Focus::Field(ScalarField::Description) => self.form.description = text,
            Focus::Field(ScalarField::Tags) => self.form.tags = text,
            Focus::Field(ScalarField::Cuisine) => self.form.cuisine = text,
            Focus::Row(kind, id) => {
                self.editor.set_value(kind, id, text);
            }
        }
    }

    pub fn insert_char(&mut self, c: char) {
        let mut text = self.focused_text();
        text.push(c);
        self.set_focused_text(text);
    }

    /// Line break inside a step; other fields stay single-line.
    pub fn insert_newline(&mut self) {
        match self.focus {
            Focus::Row(GroupKind::Instructions, _) => self.insert_char('\n'),
            _ => self.status_message = Some("Only steps can span several lines".into()),
        }
    }

    pub fn delete_char(&mut self) {
        let mut text = self.focused_text();
        text.pop();
        self.set_focused_text(text);
    }

    /// Add a row to `kind` and focus it; a refusal opens the notice modal.
    pub fn add_row(&mut self, kind: GroupKind) {
        match self.editor.add_row(kind) {
            AddOutcome::Added(id) => self.focus = Focus::Row(kind, id),
            AddOutcome::Refused => self.show_notices(),
            AddOutcome::Unavailable => {
                self.status_message = Some(format!("No {} list on this form", kind));
            }
        }
    }

    /// Remove the focused row and move focus to its neighbour.
    pub fn remove_focused_row(&mut self) {
        let Focus::Row(kind, id) = self.focus else {
            self.status_message = Some("Move to an ingredient or step to remove it".into());
            return;
        };
        let index = self
            .editor
            .rows(kind)
            .iter()
            .position(|row| row.id() == id)
            .unwrap_or(0);

        match self.editor.remove_row(kind, id) {
            RemoveOutcome::Removed => {
                let rows = self.editor.rows(kind);
                let neighbour = rows[index.min(rows.len() - 1)].id();
                self.focus = Focus::Row(kind, neighbour);
            }
            RemoveOutcome::AtFloor => {
                self.status_message = Some(format!("{} needs at least one row", kind));
            }
            RemoveOutcome::NotFound | RemoveOutcome::Unavailable => {}
        }
    }

    fn show_notices(&mut self) {
        let notices = self.editor.notifier_mut().drain();
        if let Some(notice) = notices.last() {
            self.modal = Some(notice.to_string());
        }
    }

    pub fn dismiss_modal(&mut self) {
        self.modal = None;
    }

    /// Build the request body, or explain what is missing.
    pub fn submission(&self) -> Result<RecipeCreate, String> {
        if self.form.title.trim().is_empty() {
            return Err("Title is required".to_string());
        }
        if let Some(missing) = self.editor.missing_required().first() {
            return Err(missing.to_string());
        }
        Ok(self.form.clone().into_request(self.editor.submission()))
    }
}
