//! List editor for the repeated rows of a recipe form
//!
//! Two independent field groups live in one editor:
//! - ingredients: single-line rows, capped by `EditorConfig::max_ingredients`
//! - instructions: multi-line rows carrying a display-only ordinal label
//!
//! Every group always keeps at least one row. Refused additions are reported
//! through a [`Notifier`], never as errors.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default advisory cap on ingredient rows
pub const DEFAULT_MAX_INGREDIENTS: usize = 20;

/// Which repeated-field group an action targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupKind {
    Ingredients,
    Instructions,
}

impl GroupKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ingredients => "ingredients",
            Self::Instructions => "instructions",
        }
    }

    /// Singular noun used in user-facing messages
    fn noun(&self) -> &'static str {
        match self {
            Self::Ingredients => "ingredient",
            Self::Instructions => "instruction",
        }
    }

    /// Instruction rows carry an ordinal label
    pub fn is_numbered(&self) -> bool {
        matches!(self, Self::Instructions)
    }
}

impl fmt::Display for GroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Row limits for one editor instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Maximum ingredient rows (`None` = unlimited)
    pub max_ingredients: Option<usize>,
    /// Maximum instruction rows (`None` = unlimited)
    pub max_instructions: Option<usize>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_ingredients: Some(DEFAULT_MAX_INGREDIENTS),
            max_instructions: None,
        }
    }
}

impl EditorConfig {
    /// Row cap for `kind`, if any
    pub fn max_for(&self, kind: GroupKind) -> Option<usize> {
        match kind {
            GroupKind::Ingredients => self.max_ingredients,
            GroupKind::Instructions => self.max_instructions,
        }
    }
}

/// Stable handle for a row's remove control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowId(u64);

/// One editable entry in a field group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    id: RowId,
    value: String,
    required: bool,
    ordinal: Option<usize>,
}

impl Row {
    pub fn id(&self) -> RowId {
        self.id
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Display-only 1-based position (instruction rows only)
    pub fn ordinal(&self) -> Option<usize> {
        self.ordinal
    }
}

/// User-visible condition raised by the editor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The group already holds its maximum number of rows
    LimitReached { group: GroupKind, max: usize },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LimitReached { group, max } => {
                write!(f, "Maximum {} {}s allowed", max, group.noun())
            }
        }
    }
}

/// Receives notices that must be shown to the user
pub trait Notifier {
    fn notify(&mut self, notice: &Notice);
}

/// Notifier that keeps every notice until drained
#[derive(Debug, Default, Clone)]
pub struct NoticeLog {
    notices: Vec<Notice>,
}

impl NoticeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn drain(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}

impl Notifier for NoticeLog {
    fn notify(&mut self, notice: &Notice) {
        self.notices.push(notice.clone());
    }
}

/// Result of an add action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added(RowId),
    /// Group is at its maximum; a notice was raised
    Refused,
    /// Group is not present in this form
    Unavailable,
}

/// Result of a remove action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    /// Only one row left; nothing happened
    AtFloor,
    /// Row is not (or no longer) in the group
    NotFound,
    /// Group is not present in this form
    Unavailable,
}

/// Action emitted by a control inside a group's container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupEvent {
    RemoveClicked(RowId),
}

/// Action emitted anywhere in the form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorEvent {
    AddClicked(GroupKind),
    Group(GroupKind, GroupEvent),
}

/// Ordered rows of one repeated field
#[derive(Debug, Clone)]
pub struct FieldGroup {
    kind: GroupKind,
    rows: Vec<Row>,
    next_id: u64,
}

impl FieldGroup {
    /// Empty form: a single blank row.
    pub fn new(kind: GroupKind) -> Self {
        Self::with_values(kind, std::iter::empty::<String>())
    }

    /// Pre-rendered rows (edit mode). An empty iterator still yields one blank row.
    pub fn with_values<I, S>(kind: GroupKind, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut group = Self {
            kind,
            rows: Vec::new(),
            next_id: 0,
        };
        for value in values {
            group.append(value.into());
        }
        if group.rows.is_empty() {
            group.append(String::new());
        }
        group
    }

    pub fn kind(&self) -> GroupKind {
        self.kind
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, id: RowId) -> Option<&Row> {
        self.rows.iter().find(|row| row.id == id)
    }

    fn append(&mut self, value: String) -> RowId {
        let id = RowId(self.next_id);
        self.next_id += 1;
        let ordinal = self.kind.is_numbered().then(|| self.rows.len() + 1);
        self.rows.push(Row {
            id,
            value,
            required: true,
            ordinal,
        });
        id
    }

    /// Handle an action emitted by any row of this group.
    ///
    /// Rows added after initialization are routed here the same way as
    /// rows that were present from the start.
    pub fn dispatch(&mut self, event: GroupEvent) -> RemoveOutcome {
        match event {
            GroupEvent::RemoveClicked(id) => self.remove(id),
        }
    }

    fn remove(&mut self, id: RowId) -> RemoveOutcome {
        if self.rows.len() <= 1 {
            tracing::debug!(group = %self.kind, "ignoring removal of last row");
            return RemoveOutcome::AtFloor;
        }
        let Some(index) = self.rows.iter().position(|row| row.id == id) else {
            return RemoveOutcome::NotFound;
        };
        self.rows.remove(index);
        if self.kind.is_numbered() {
            self.renumber();
        }
        tracing::debug!(group = %self.kind, rows = self.rows.len(), "row removed");
        RemoveOutcome::Removed
    }

    /// Re-derive every ordinal label from the current row order.
    pub fn renumber(&mut self) {
        if !self.kind.is_numbered() {
            return;
        }
        for (index, row) in self.rows.iter_mut().enumerate() {
            row.ordinal = Some(index + 1);
        }
    }

    fn set_value(&mut self, id: RowId, value: String) -> bool {
        match self.rows.iter_mut().find(|row| row.id == id) {
            Some(row) => {
                row.value = value;
                true
            }
            None => false,
        }
    }

    fn values(&self) -> Vec<String> {
        self.rows.iter().map(|row| row.value.trim().to_string()).collect()
    }
}

/// Containers found in the rendered form
#[derive(Debug, Clone, Default)]
pub struct EditorGroups {
    pub ingredients: Option<FieldGroup>,
    pub instructions: Option<FieldGroup>,
}

impl EditorGroups {
    /// Both groups, each with one blank row.
    pub fn blank() -> Self {
        Self {
            ingredients: Some(FieldGroup::new(GroupKind::Ingredients)),
            instructions: Some(FieldGroup::new(GroupKind::Instructions)),
        }
    }

    /// Both groups pre-populated from existing recipe data.
    pub fn from_values(ingredients: &[String], instructions: &[String]) -> Self {
        Self {
            ingredients: Some(FieldGroup::with_values(
                GroupKind::Ingredients,
                ingredients.iter().cloned(),
            )),
            instructions: Some(FieldGroup::with_values(
                GroupKind::Instructions,
                instructions.iter().cloned(),
            )),
        }
    }
}

/// A required row left blank at submission time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingField {
    pub group: GroupKind,
    /// 1-based row position
    pub position: usize,
}

impl fmt::Display for MissingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} is required", self.group.noun(), self.position)
    }
}

/// Row values in document order, ready to be sent with the form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EditorSubmission {
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
}

/// Add/remove/renumber behavior for the two repeated groups of a recipe form
#[derive(Debug)]
pub struct ListEditor<N: Notifier = NoticeLog> {
    config: EditorConfig,
    ingredients: Option<FieldGroup>,
    instructions: Option<FieldGroup>,
    notifier: N,
}

impl ListEditor<NoticeLog> {
    /// Blank form with both groups and a collecting notifier.
    pub fn new(config: EditorConfig) -> Self {
        Self::initialize(config, EditorGroups::blank(), NoticeLog::new())
    }
}

impl<N: Notifier> ListEditor<N> {
    /// Attach to the groups present in the form and number the instruction rows.
    ///
    /// A missing group is not an error: actions aimed at it do nothing.
    pub fn initialize(config: EditorConfig, groups: EditorGroups, notifier: N) -> Self {
        let mut editor = Self {
            config,
            ingredients: groups.ingredients.filter(|g| g.kind == GroupKind::Ingredients),
            instructions: groups.instructions.filter(|g| g.kind == GroupKind::Instructions),
            notifier,
        };
        editor.renumber_instructions();
        editor
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    pub fn group(&self, kind: GroupKind) -> Option<&FieldGroup> {
        match kind {
            GroupKind::Ingredients => self.ingredients.as_ref(),
            GroupKind::Instructions => self.instructions.as_ref(),
        }
    }

    fn group_mut(&mut self, kind: GroupKind) -> Option<&mut FieldGroup> {
        match kind {
            GroupKind::Ingredients => self.ingredients.as_mut(),
            GroupKind::Instructions => self.instructions.as_mut(),
        }
    }

    /// Rows of a group; empty when the group is absent.
    pub fn rows(&self, kind: GroupKind) -> &[Row] {
        self.group(kind).map(FieldGroup::rows).unwrap_or(&[])
    }

    pub fn len(&self, kind: GroupKind) -> usize {
        self.rows(kind).len()
    }

    /// Ordinal labels of the instruction rows, in document order
    pub fn labels(&self) -> Vec<usize> {
        self.rows(GroupKind::Instructions)
            .iter()
            .filter_map(Row::ordinal)
            .collect()
    }

    /// Route a form action to the behavior that owns it.
    pub fn dispatch(&mut self, event: EditorEvent) {
        match event {
            EditorEvent::AddClicked(kind) => {
                self.add_row(kind);
            }
            EditorEvent::Group(kind, event) => {
                if let Some(group) = self.group_mut(kind) {
                    group.dispatch(event);
                }
            }
        }
    }

    /// Append a blank required row unless the group is at its maximum.
    pub fn add_row(&mut self, kind: GroupKind) -> AddOutcome {
        let Some(len) = self.group(kind).map(FieldGroup::len) else {
            return AddOutcome::Unavailable;
        };

        if let Some(max) = self.config.max_for(kind) {
            if len >= max {
                tracing::debug!(group = %kind, max, "row limit reached");
                self.notifier.notify(&Notice::LimitReached { group: kind, max });
                return AddOutcome::Refused;
            }
        }

        let Some(group) = self.group_mut(kind) else {
            return AddOutcome::Unavailable;
        };
        let id = group.append(String::new());
        group.renumber();
        AddOutcome::Added(id)
    }

    /// Detach a row unless it is the last one in its group.
    pub fn remove_row(&mut self, kind: GroupKind, row: RowId) -> RemoveOutcome {
        match self.group_mut(kind) {
            Some(group) => group.dispatch(GroupEvent::RemoveClicked(row)),
            None => RemoveOutcome::Unavailable,
        }
    }

    /// Set every instruction ordinal to its current 1-based position.
    pub fn renumber_instructions(&mut self) {
        if let Some(group) = self.instructions.as_mut() {
            group.renumber();
        }
    }

    /// Replace a row's text. Returns false if the row does not exist.
    pub fn set_value(&mut self, kind: GroupKind, row: RowId, value: impl Into<String>) -> bool {
        self.group_mut(kind)
            .map(|group| group.set_value(row, value.into()))
            .unwrap_or(false)
    }

    /// Required rows that are still blank
    pub fn missing_required(&self) -> Vec<MissingField> {
        [GroupKind::Ingredients, GroupKind::Instructions]
            .into_iter()
            .flat_map(|kind| {
                self.rows(kind)
                    .iter()
                    .enumerate()
                    .filter(|(_, row)| row.required && row.value.trim().is_empty())
                    .map(move |(index, _)| MissingField {
                        group: kind,
                        position: index + 1,
                    })
            })
            .collect()
    }

    /// Trimmed row values in document order. Ordinals are not included.
    pub fn submission(&self) -> EditorSubmission {
        EditorSubmission {
            ingredients: self.ingredients.as_ref().map(FieldGroup::values).unwrap_or_default(),
            instructions: self.instructions.as_ref().map(FieldGroup::values).unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instruction_ids(editor: &ListEditor) -> Vec<RowId> {
        editor
            .rows(GroupKind::Instructions)
            .iter()
            .map(Row::id)
            .collect()
    }

    #[test]
    fn ingredients_fill_up_to_max_then_refuse() {
        let mut editor = ListEditor::new(EditorConfig::default());
        assert_eq!(editor.len(GroupKind::Ingredients), 1);

        for expected in 2..=20 {
            assert!(matches!(
                editor.add_row(GroupKind::Ingredients),
                AddOutcome::Added(_)
            ));
            assert_eq!(editor.len(GroupKind::Ingredients), expected);
        }
        assert!(editor.notifier().notices().is_empty());

        assert_eq!(editor.add_row(GroupKind::Ingredients), AddOutcome::Refused);
        assert_eq!(editor.len(GroupKind::Ingredients), 20);
        assert_eq!(
            editor.notifier().notices(),
            &[Notice::LimitReached {
                group: GroupKind::Ingredients,
                max: 20
            }]
        );
    }

    #[test]
    fn limit_notice_message() {
        let notice = Notice::LimitReached {
            group: GroupKind::Ingredients,
            max: 20,
        };
        assert_eq!(notice.to_string(), "Maximum 20 ingredients allowed");
    }

    #[test]
    fn instructions_have_no_default_max() {
        let mut editor = ListEditor::new(EditorConfig::default());
        for _ in 0..40 {
            editor.add_row(GroupKind::Instructions);
        }
        assert_eq!(editor.len(GroupKind::Instructions), 41);
        assert_eq!(editor.labels(), (1..=41).collect::<Vec<_>>());
        assert!(editor.notifier().notices().is_empty());
    }

    #[test]
    fn configured_instruction_max_is_honored() {
        let config = EditorConfig {
            max_ingredients: None,
            max_instructions: Some(2),
        };
        let mut editor = ListEditor::new(config);
        editor.add_row(GroupKind::Instructions);
        assert_eq!(editor.add_row(GroupKind::Instructions), AddOutcome::Refused);
        assert_eq!(editor.len(GroupKind::Instructions), 2);

        for _ in 0..30 {
            editor.add_row(GroupKind::Ingredients);
        }
        assert_eq!(editor.len(GroupKind::Ingredients), 31);
    }

    #[test]
    fn removing_last_row_is_noop() {
        let mut editor = ListEditor::new(EditorConfig::default());
        for kind in [GroupKind::Ingredients, GroupKind::Instructions] {
            let id = editor.rows(kind)[0].id();
            assert_eq!(editor.remove_row(kind, id), RemoveOutcome::AtFloor);
            assert_eq!(editor.len(kind), 1);
        }
        assert!(editor.notifier().notices().is_empty());
    }

    #[test]
    fn removing_middle_instruction_relabels_in_order() {
        let mut editor = ListEditor::new(EditorConfig::default());
        for _ in 0..3 {
            editor.add_row(GroupKind::Instructions);
        }
        let ids = instruction_ids(&editor);
        for (id, text) in ids.iter().zip(["one", "two", "three", "four"]) {
            editor.set_value(GroupKind::Instructions, *id, text);
        }
        assert_eq!(editor.labels(), vec![1, 2, 3, 4]);

        assert_eq!(
            editor.remove_row(GroupKind::Instructions, ids[1]),
            RemoveOutcome::Removed
        );

        assert_eq!(editor.labels(), vec![1, 2, 3]);
        assert_eq!(instruction_ids(&editor), vec![ids[0], ids[2], ids[3]]);
        assert_eq!(
            editor.submission().instructions,
            vec!["one", "three", "four"]
        );
    }

    #[test]
    fn rows_added_later_are_removable_through_dispatch() {
        let mut editor = ListEditor::new(EditorConfig::default());
        editor.dispatch(EditorEvent::AddClicked(GroupKind::Instructions));
        editor.dispatch(EditorEvent::AddClicked(GroupKind::Instructions));
        assert_eq!(editor.labels(), vec![1, 2, 3]);

        let third = editor.rows(GroupKind::Instructions)[2].id();
        editor.dispatch(EditorEvent::Group(
            GroupKind::Instructions,
            GroupEvent::RemoveClicked(third),
        ));

        assert_eq!(editor.len(GroupKind::Instructions), 2);
        assert_eq!(editor.labels(), vec![1, 2]);
    }

    #[test]
    fn prepopulated_instructions_are_numbered_on_initialize() {
        let mut group = FieldGroup::with_values(
            GroupKind::Instructions,
            ["Preheat", "Mix", "Bake"],
        );
        for row in group.rows.iter_mut() {
            row.ordinal = None;
        }

        let editor = ListEditor::initialize(
            EditorConfig::default(),
            EditorGroups {
                ingredients: None,
                instructions: Some(group),
            },
            NoticeLog::new(),
        );

        assert_eq!(editor.labels(), vec![1, 2, 3]);
    }

    #[test]
    fn missing_group_behaviors_are_noops() {
        let mut editor = ListEditor::initialize(
            EditorConfig::default(),
            EditorGroups {
                ingredients: Some(FieldGroup::new(GroupKind::Ingredients)),
                instructions: None,
            },
            NoticeLog::new(),
        );

        assert_eq!(
            editor.add_row(GroupKind::Instructions),
            AddOutcome::Unavailable
        );
        assert_eq!(
            editor.remove_row(GroupKind::Instructions, RowId(0)),
            RemoveOutcome::Unavailable
        );
        editor.renumber_instructions();
        assert!(editor.labels().is_empty());

        assert!(matches!(
            editor.add_row(GroupKind::Ingredients),
            AddOutcome::Added(_)
        ));
        assert_eq!(editor.len(GroupKind::Ingredients), 2);
    }

    #[test]
    fn prepopulated_rows_above_max_are_kept() {
        let values: Vec<String> = (0..25).map(|i| format!("item {i}")).collect();
        let mut editor = ListEditor::initialize(
            EditorConfig::default(),
            EditorGroups::from_values(&values, &["Stir".to_string()]),
            NoticeLog::new(),
        );
        assert_eq!(editor.len(GroupKind::Ingredients), 25);
        assert_eq!(editor.add_row(GroupKind::Ingredients), AddOutcome::Refused);

        let first = editor.rows(GroupKind::Ingredients)[0].id();
        assert_eq!(
            editor.remove_row(GroupKind::Ingredients, first),
            RemoveOutcome::Removed
        );
        assert_eq!(editor.len(GroupKind::Ingredients), 24);
    }

    #[test]
    fn removed_row_id_is_not_found_afterwards() {
        let mut editor = ListEditor::new(EditorConfig::default());
        let added = match editor.add_row(GroupKind::Ingredients) {
            AddOutcome::Added(id) => id,
            other => panic!("unexpected outcome: {other:?}"),
        };
        editor.add_row(GroupKind::Ingredients);

        assert_eq!(
            editor.remove_row(GroupKind::Ingredients, added),
            RemoveOutcome::Removed
        );
        assert_eq!(
            editor.remove_row(GroupKind::Ingredients, added),
            RemoveOutcome::NotFound
        );
        assert_eq!(editor.len(GroupKind::Ingredients), 2);
    }

    #[test]
    fn submission_trims_and_reports_blank_required_rows() {
        let mut editor = ListEditor::new(EditorConfig::default());
        let first = editor.rows(GroupKind::Ingredients)[0].id();
        editor.set_value(GroupKind::Ingredients, first, "  2 eggs ");
        editor.add_row(GroupKind::Ingredients);

        let submission = editor.submission();
        assert_eq!(submission.ingredients, vec!["2 eggs", ""]);

        let missing = editor.missing_required();
        assert_eq!(
            missing,
            vec![
                MissingField {
                    group: GroupKind::Ingredients,
                    position: 2
                },
                MissingField {
                    group: GroupKind::Instructions,
                    position: 1
                },
            ]
        );
        assert_eq!(missing[0].to_string(), "ingredient 2 is required");
    }

    #[test]
    fn editors_do_not_share_limits() {
        let mut tight = ListEditor::new(EditorConfig {
            max_ingredients: Some(1),
            max_instructions: None,
        });
        let mut loose = ListEditor::new(EditorConfig::default());

        assert_eq!(tight.add_row(GroupKind::Ingredients), AddOutcome::Refused);
        assert!(matches!(
            loose.add_row(GroupKind::Ingredients),
            AddOutcome::Added(_)
        ));
    }
}
