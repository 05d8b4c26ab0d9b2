//! Classifier session state.
//!
//! A session owns everything the panel mutates: the annotation table, the
//! class registry, bound hotkeys and pending notices. The host viewer is
//! borrowed for each call, never stored.

use std::path::{Path, PathBuf};

use crate::config::ClassifierConfig;
use crate::constants::{DOCK_NAME, MAX_CLASS_HOTKEYS, panel};
use crate::data::leading_shape;
use crate::format::{FormatError, FormatRegistry, SaveResult};
use crate::keybindings::{KeyBindings, KeyCode};
use crate::message::ClassifierMessage;
use crate::model::{
    AnnotationTable, ClassError, ClassRegistry, TableError, resolve_levels,
};
use crate::notice::{Notice, NoticeKind};
use crate::viewer::Viewer;
use crate::walker;

/// Errors raised by session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The viewer must show exactly one image layer
    #[error("Expected exactly one image layer, found {count}")]
    NoSingleLayer { count: usize },

    /// The layer has no axes beyond the image plane
    #[error("Layer shape {shape:?} has no leading dimensions to classify")]
    NoLeadingDimensions { shape: Vec<usize> },

    /// No class at this index
    #[error("No class at index {0}")]
    UnknownClass(usize),

    /// Viewer position does not address a table row
    #[error("Viewer position {0:?} is outside the annotation table")]
    PositionOutsideTable(Vec<usize>),

    /// Table file error
    #[error(transparent)]
    Format(#[from] FormatError),

    /// Table shape or key error
    #[error(transparent)]
    Table(#[from] TableError),

    /// Class registration error
    #[error(transparent)]
    Class(#[from] ClassError),
}

/// Result of writing a class at the viewer position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifyOutcome {
    /// Coordinate that was written
    pub coord: Vec<usize>,
    /// Class written
    pub class: String,
    /// Class held before the write
    pub previous: Option<String>,
    /// New viewer coordinate, None when traversal is exhausted
    pub next: Option<Vec<usize>>,
}

impl ClassifyOutcome {
    /// Whether a different class was replaced.
    pub fn overwrote(&self) -> bool {
        self.previous
            .as_deref()
            .is_some_and(|previous| previous != self.class)
    }
}

/// How the current table came to be after a load request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Dialog cancelled, table untouched
    Skipped,
    /// Table read from a file
    Loaded(PathBuf),
    /// Unsupported extension, a fresh table was generated instead
    Generated,
}

/// Annotation progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    /// Rows carrying a class
    pub annotated: usize,
    /// All rows
    pub total: usize,
    /// Row count per class, in order of first appearance in the table
    pub per_class: Vec<(String, usize)>,
}

impl Progress {
    /// Fraction of rows annotated (1.0 for an empty table).
    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            self.annotated as f32 / self.total as f32
        }
    }
}

/// One class button in the panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassButton {
    /// Class index sent back in [`ClassifierMessage::ClassClicked`]
    pub index: usize,
    /// Button text
    pub label: String,
    /// Bound hotkey
    pub shortcut: Option<KeyCode>,
}

/// Description of the panel for the host to render.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelView {
    pub load_label: &'static str,
    pub save_label: &'static str,
    pub classes_title: &'static str,
    pub add_class_label: &'static str,
    /// Current content of the class name field
    pub new_class_text: String,
    /// One button per class, in registration order
    pub class_buttons: Vec<ClassButton>,
    pub max_width: f32,
    pub max_height: f32,
    pub spacing: f32,
}

/// State of one classifier panel attached to a viewer.
pub struct ClassifierSession {
    config: ClassifierConfig,
    shape: Vec<usize>,
    levels: Vec<String>,
    table: AnnotationTable,
    classes: ClassRegistry,
    keybindings: KeyBindings,
    formats: FormatRegistry,
    new_class_text: String,
    notices: Vec<Notice>,
}

impl ClassifierSession {
    /// Attach a classifier to the viewer's single image layer.
    ///
    /// Builds a fresh table over the leading dimensions, registers the classes
    /// from `config` and docks the panel.
    pub fn attach(viewer: &mut dyn Viewer, config: ClassifierConfig) -> Result<Self, SessionError> {
        let shapes = viewer.layer_shapes();
        let [layer_shape] = shapes.as_slice() else {
            return Err(SessionError::NoSingleLayer {
                count: shapes.len(),
            });
        };

        let shape = leading_shape(layer_shape).to_vec();
        if shape.is_empty() {
            return Err(SessionError::NoLeadingDimensions {
                shape: layer_shape.clone(),
            });
        }

        let mut notices = Vec::new();
        let resolved = resolve_levels(&config.levels, &shape);
        if let Some(mismatch) = &resolved.mismatch {
            let notice = Notice::warning(
                NoticeKind::LevelMismatch,
                format!("{}, using {}", mismatch, resolved.names.join(", ")),
            );
            notice.log();
            notices.push(notice);
        }

        let levels = resolved.names;
        let table = AnnotationTable::build(levels.clone(), &shape);
        log::info!(
            "Classifier attached: levels {:?}, shape {:?}, {} rows",
            levels,
            shape,
            table.len()
        );

        let mut session = Self {
            shape,
            levels,
            table,
            classes: ClassRegistry::new(),
            keybindings: KeyBindings::new(),
            formats: FormatRegistry::new(),
            new_class_text: String::new(),
            notices,
            config,
        };

        for name in session.config.classes.clone() {
            if let Err(e) = session.register_class(viewer, &name) {
                session.notify(Notice::warning(
                    NoticeKind::ClassRejected,
                    format!("Skipping configured class '{}': {}", name, e),
                ));
            }
        }

        viewer.dock_widget(DOCK_NAME, session.config.preferences.dock_area);
        Ok(session)
    }

    /// Route a panel or key event.
    ///
    /// Failures are reported as notices; nothing is retried.
    pub fn update(&mut self, viewer: &mut dyn Viewer, message: ClassifierMessage) {
        log::debug!("Classifier message: {:?}", message);
        match message {
            ClassifierMessage::LoadRequested(path) => {
                crate::handlers::handle_load(self, path.as_deref())
            }
            ClassifierMessage::SaveRequested(path) => {
                crate::handlers::handle_save(self, path.as_deref())
            }
            ClassifierMessage::NewClassTextChanged(text) => self.new_class_text = text,
            ClassifierMessage::AddClass => crate::handlers::handle_add_class(self, viewer),
            ClassifierMessage::ClassClicked(index) => {
                crate::handlers::handle_classify(self, viewer, index)
            }
            ClassifierMessage::KeyPressed(key) => crate::handlers::handle_key(self, viewer, key),
        }
    }

    /// Register a class, binding its digit hotkey when one is available.
    pub fn register_class(
        &mut self,
        viewer: &mut dyn Viewer,
        name: &str,
    ) -> Result<Option<KeyCode>, ClassError> {
        let class = self.classes.register(name)?;
        let (index, name) = (class.index, class.name.clone());

        let key = self.keybindings.bind_class(index);
        match key {
            Some(key) => {
                viewer.bind_key(key);
                log::info!("Registered class '{}' on key {}", name, key.digit());
            }
            None => {
                log::info!("Registered class '{}' without hotkey", name);
                // only the first class past the limit announces it
                if index == MAX_CLASS_HOTKEYS {
                    self.notify(Notice::info(
                        NoticeKind::ShortcutsUnavailable,
                        format!(
                            "Only the first {} classes get number-key shortcuts",
                            MAX_CLASS_HOTKEYS
                        ),
                    ));
                }
            }
        }

        Ok(key)
    }

    /// Write the class at `class_index` at the viewer position and advance.
    pub fn classify(
        &mut self,
        viewer: &mut dyn Viewer,
        class_index: usize,
    ) -> Result<ClassifyOutcome, SessionError> {
        let class = self
            .classes
            .get(class_index)
            .ok_or(SessionError::UnknownClass(class_index))?
            .name
            .clone();
        self.classify_as(viewer, &class)
    }

    /// Write `class` at the viewer position and advance.
    pub fn classify_as(
        &mut self,
        viewer: &mut dyn Viewer,
        class: &str,
    ) -> Result<ClassifyOutcome, SessionError> {
        let coord = self.current_coordinate(viewer);
        if self.table.get(&coord).is_none() {
            return Err(SessionError::PositionOutsideTable(coord));
        }

        let previous = self.table.set_class(&coord, class)?;
        let next = walker::advance(viewer, &coord, &self.shape);
        if next.is_none() {
            log::info!("Reached the last coordinate {:?}", coord);
        }

        let outcome = ClassifyOutcome {
            coord,
            class: class.to_string(),
            previous,
            next,
        };

        let notice = if outcome.overwrote() {
            Notice::info(
                NoticeKind::Overwrite,
                format!(
                    "Overwriting {} with {} at {}",
                    outcome.previous.as_deref().unwrap_or_default(),
                    outcome.class,
                    self.describe(&outcome.coord)
                ),
            )
        } else {
            Notice::info(
                NoticeKind::NewAnnotation,
                format!("{} annotated as {}", self.describe(&outcome.coord), outcome.class),
            )
        };
        self.notify(notice);

        Ok(outcome)
    }

    /// Replace the table with one read from `path`.
    ///
    /// `None` (cancelled dialog) does nothing. An unsupported extension
    /// generates a fresh table. A file whose key columns or coverage do not
    /// match this session is rejected and the current table is kept.
    pub fn load_table(&mut self, path: Option<&Path>) -> Result<LoadOutcome, SessionError> {
        let Some(path) = path else {
            log::debug!("Load cancelled");
            return Ok(LoadOutcome::Skipped);
        };

        let loaded = match self.formats.for_path(path) {
            Some(format) => format.load(path),
            None => {
                let message = format!(
                    "Cannot read {:?} (supported: {}), starting a fresh table",
                    path,
                    self.formats.supported_extensions().join(", ")
                );
                self.notify(Notice::warning(NoticeKind::UnsupportedExtension, message));
                self.table = AnnotationTable::build(self.levels.clone(), &self.shape);
                return Ok(LoadOutcome::Generated);
            }
        };

        let table = loaded?.rekey(&self.levels)?;
        table.validate_coverage(&self.shape)?;

        let annotated = table.annotated_count();
        self.table = table;
        self.notify(Notice::info(
            NoticeKind::TableLoaded,
            format!(
                "Loaded {} rows ({} annotated) from {:?}",
                self.table.len(),
                annotated,
                path
            ),
        ));
        Ok(LoadOutcome::Loaded(path.to_path_buf()))
    }

    /// Write the table to `path`.
    ///
    /// `None` (cancelled dialog) does nothing. An unsupported extension is an
    /// error and nothing is written.
    pub fn save_table(&mut self, path: Option<&Path>) -> Result<Option<SaveResult>, SessionError> {
        let Some(path) = path else {
            log::debug!("Save cancelled");
            return Ok(None);
        };

        let format = self
            .formats
            .for_path(path)
            .ok_or_else(|| FormatError::UnsupportedExtension {
                path: path.to_path_buf(),
            })?;

        let result = format.save(&self.table, path)?;
        self.notify(Notice::info(
            NoticeKind::TableSaved,
            format!(
                "Saved {} rows ({} annotated) to {:?}",
                result.rows_written, result.annotated_rows, path
            ),
        ));
        Ok(Some(result))
    }

    /// Viewer position truncated to the leading dimensions.
    pub fn current_coordinate(&self, viewer: &dyn Viewer) -> Vec<usize> {
        let mut coord = viewer.current_step();
        coord.truncate(self.shape.len());
        coord
    }

    /// Class index bound to a key.
    pub fn class_index_for_key(&self, key: KeyCode) -> Option<usize> {
        self.keybindings.class_index_for_key(key)
    }

    /// Queue a notice and log it.
    pub fn notify(&mut self, notice: Notice) {
        notice.log();
        self.notices.push(notice);
    }

    /// Take all pending notices.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Pending notices.
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Annotation progress over the whole table.
    pub fn progress(&self) -> Progress {
        Progress {
            annotated: self.table.annotated_count(),
            total: self.table.len(),
            per_class: self.table.class_counts(),
        }
    }

    /// Describe the panel for rendering.
    pub fn panel(&self) -> PanelView {
        PanelView {
            load_label: panel::LOAD_LABEL,
            save_label: panel::SAVE_LABEL,
            classes_title: panel::CLASSES_TITLE,
            add_class_label: panel::ADD_CLASS_LABEL,
            new_class_text: self.new_class_text.clone(),
            class_buttons: self
                .classes
                .iter()
                .map(|class| ClassButton {
                    index: class.index,
                    label: class.button_label(),
                    shortcut: self.keybindings.key_for_class_index(class.index),
                })
                .collect(),
            max_width: panel::MAX_WIDTH,
            max_height: panel::MAX_HEIGHT,
            spacing: panel::SPACING,
        }
    }

    /// Text currently in the class name field.
    pub fn new_class_text(&self) -> &str {
        &self.new_class_text
    }

    /// Clear the class name field.
    pub(crate) fn clear_new_class_text(&mut self) {
        self.new_class_text.clear();
    }

    /// The annotation table.
    pub fn table(&self) -> &AnnotationTable {
        &self.table
    }

    /// Registered classes.
    pub fn classes(&self) -> &ClassRegistry {
        &self.classes
    }

    /// Leading shape being classified.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Level names in use.
    pub fn levels(&self) -> &[String] {
        &self.levels
    }

    /// Configuration the session was attached with.
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Format a coordinate as `cell=1, frame=4`.
    fn describe(&self, coord: &[usize]) -> String {
        self.levels
            .iter()
            .zip(coord)
            .map(|(level, index)| format!("{}={}", level, index))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::StackViewer;
    use crate::notice::NoticeLevel;
    use crate::viewer::DockArea;

    fn attach(shape: Vec<usize>, levels: &[&str]) -> (StackViewer, ClassifierSession) {
        let mut viewer = StackViewer::with_shape(shape);
        let config = ClassifierConfig::new().with_levels(levels.iter().copied());
        let session = ClassifierSession::attach(&mut viewer, config).unwrap();
        (viewer, session)
    }

    fn kinds(session: &mut ClassifierSession) -> Vec<NoticeKind> {
        session.drain_notices().into_iter().map(|n| n.kind).collect()
    }

    #[test]
    fn test_attach_builds_table_and_docks() {
        let (viewer, session) = attach(vec![2, 3, 16, 16], &["cell", "frame"]);

        assert_eq!(session.shape(), &[2, 3]);
        assert_eq!(session.table().len(), 6);
        assert_eq!(session.levels(), &["cell".to_string(), "frame".to_string()]);
        assert_eq!(
            viewer.docked(),
            &[(DOCK_NAME.to_string(), DockArea::Bottom)]
        );
        assert!(session.notices().is_empty());
    }

    #[test]
    fn test_attach_level_mismatch_falls_back() {
        let (_, mut session) = attach(vec![2, 3, 16, 16], &["cell"]);

        assert_eq!(session.levels(), &["dim_0".to_string(), "dim_1".to_string()]);
        let notices = session.drain_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].kind, NoticeKind::LevelMismatch);
        assert_eq!(notices[0].level, NoticeLevel::Warning);
    }

    #[test]
    fn test_unwritable_level_names_still_round_trip() {
        let dir = tempfile::tempdir().unwrap();

        for configured in [["", "frame"], ["cell", "cell"], ["annotated_class", "frame"]] {
            let (mut viewer, mut session) = attach(vec![2, 3, 8, 8], &configured);
            assert_eq!(session.levels(), &["dim_0".to_string(), "dim_1".to_string()]);
            assert_eq!(kinds(&mut session), vec![NoticeKind::LevelMismatch]);

            session.register_class(&mut viewer, "alive").unwrap();
            session.classify(&mut viewer, 0).unwrap();
            let path = dir.path().join("levels.csv");
            session.save_table(Some(&path)).unwrap();

            let (_, mut fresh) = attach(vec![2, 3, 8, 8], &configured);
            fresh.load_table(Some(&path)).unwrap();
            assert_eq!(fresh.table(), session.table(), "levels {:?}", configured);
        }
    }

    #[test]
    fn test_attach_requires_single_layer() {
        let mut viewer = StackViewer::new();
        let err = ClassifierSession::attach(&mut viewer, ClassifierConfig::new()).err();
        assert!(matches!(err, Some(SessionError::NoSingleLayer { count: 0 })));

        let mut viewer = StackViewer::with_shape(vec![16, 16]);
        let err = ClassifierSession::attach(&mut viewer, ClassifierConfig::new()).err();
        assert!(matches!(err, Some(SessionError::NoLeadingDimensions { .. })));
    }

    #[test]
    fn test_attach_registers_configured_classes() {
        let mut viewer = StackViewer::with_shape(vec![4, 8, 8]);
        let config = ClassifierConfig::new().with_classes(["alive", "dead", "alive"]);
        let mut session = ClassifierSession::attach(&mut viewer, config).unwrap();

        assert_eq!(session.classes().len(), 2);
        assert_eq!(viewer.bound_keys(), &[KeyCode::Key1, KeyCode::Key2]);
        assert_eq!(kinds(&mut session), vec![NoticeKind::ClassRejected]);
    }

    #[test]
    fn test_classify_advances_odometer() {
        let (mut viewer, mut session) = attach(vec![2, 3, 8, 8], &["cell", "frame"]);
        session.register_class(&mut viewer, "alive").unwrap();

        viewer.set_position(&[0, 2]);
        let outcome = session.classify(&mut viewer, 0).unwrap();

        assert_eq!(outcome.coord, vec![0, 2]);
        assert_eq!(outcome.next, Some(vec![1, 0]));
        assert_eq!(session.current_coordinate(&viewer), vec![1, 0]);
        assert_eq!(session.table().class_at(&[0, 2]), Some("alive"));
    }

    #[test]
    fn test_classify_at_last_coordinate_stays() {
        let (mut viewer, mut session) = attach(vec![2, 3, 8, 8], &["cell", "frame"]);
        session.register_class(&mut viewer, "alive").unwrap();

        viewer.set_position(&[1, 2]);
        let outcome = session.classify(&mut viewer, 0).unwrap();

        assert_eq!(outcome.next, None);
        assert_eq!(session.current_coordinate(&viewer), vec![1, 2]);
        assert_eq!(session.table().class_at(&[1, 2]), Some("alive"));
    }

    #[test]
    fn test_overwrite_notice_exclusive() {
        let (mut viewer, mut session) = attach(vec![3, 8, 8], &["cell"]);
        session.register_class(&mut viewer, "alive").unwrap();
        session.register_class(&mut viewer, "dead").unwrap();
        session.drain_notices();

        // unannotated
        session.classify(&mut viewer, 0).unwrap();
        assert_eq!(kinds(&mut session), vec![NoticeKind::NewAnnotation]);

        // same class again
        viewer.set_position(&[0]);
        session.classify(&mut viewer, 0).unwrap();
        assert_eq!(kinds(&mut session), vec![NoticeKind::NewAnnotation]);

        // different class
        viewer.set_position(&[0]);
        let outcome = session.classify(&mut viewer, 1).unwrap();
        assert!(outcome.overwrote());
        assert_eq!(kinds(&mut session), vec![NoticeKind::Overwrite]);
        assert_eq!(session.table().class_at(&[0]), Some("dead"));
    }

    #[test]
    fn test_classify_unknown_class() {
        let (mut viewer, mut session) = attach(vec![3, 8, 8], &["cell"]);
        let err = session.classify(&mut viewer, 4).unwrap_err();
        assert!(matches!(err, SessionError::UnknownClass(4)));
        assert_eq!(session.progress().annotated, 0);
    }

    #[test]
    fn test_shortcuts_for_first_nine_only() {
        let (mut viewer, mut session) = attach(vec![3, 8, 8], &["cell"]);

        for i in 0..9 {
            let key = session
                .register_class(&mut viewer, &format!("class{}", i))
                .unwrap();
            assert_eq!(key.map(|k| k.digit() as usize), Some(i + 1));
        }
        assert!(session.drain_notices().is_empty());

        assert_eq!(session.register_class(&mut viewer, "tenth").unwrap(), None);
        assert_eq!(kinds(&mut session), vec![NoticeKind::ShortcutsUnavailable]);

        assert_eq!(session.register_class(&mut viewer, "eleventh").unwrap(), None);
        assert!(session.drain_notices().is_empty());

        assert_eq!(viewer.bound_keys().len(), 9);
        let buttons = session.panel().class_buttons;
        assert_eq!(buttons[0].label, "class0 (1)");
        assert_eq!(buttons[9].label, "tenth");
        assert_eq!(buttons[9].shortcut, None);
    }

    #[test]
    fn test_save_unsupported_extension_writes_nothing() {
        let (mut viewer, mut session) = attach(vec![2, 2, 8, 8], &["cell", "frame"]);
        session.register_class(&mut viewer, "alive").unwrap();
        session.classify(&mut viewer, 0).unwrap();
        let before = session.table().clone();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.txt");
        let err = session.save_table(Some(&path)).unwrap_err();

        assert!(matches!(
            err,
            SessionError::Format(FormatError::UnsupportedExtension { .. })
        ));
        assert!(!path.exists());
        assert_eq!(session.table(), &before);
    }

    #[test]
    fn test_save_and_load_cancelled() {
        let (_, mut session) = attach(vec![2, 8, 8], &["cell"]);
        assert_eq!(session.save_table(None).unwrap(), None);
        assert_eq!(session.load_table(None).unwrap(), LoadOutcome::Skipped);
        assert!(session.drain_notices().is_empty());
    }

    #[test]
    fn test_save_then_load_restores_classes() {
        let dir = tempfile::tempdir().unwrap();

        let mut names = vec!["table.csv", "table.npz"];
        if cfg!(feature = "hdf5") {
            names.extend(["table.hdf", "table.h5"]);
        }

        for name in names {
            let path = dir.path().join(name);
            let (mut viewer, mut session) = attach(vec![2, 3, 8, 8], &["cell", "frame"]);
            session.register_class(&mut viewer, "alive").unwrap();
            session.classify(&mut viewer, 0).unwrap();
            session.classify(&mut viewer, 0).unwrap();
            session.save_table(Some(&path)).unwrap();

            let (_, mut fresh) = attach(vec![2, 3, 8, 8], &["cell", "frame"]);
            let outcome = fresh.load_table(Some(&path)).unwrap();
            assert_eq!(outcome, LoadOutcome::Loaded(path.clone()));
            assert_eq!(fresh.table(), session.table());
            assert_eq!(fresh.progress().annotated, 2);
        }
    }

    #[test]
    fn test_load_unsupported_extension_generates_table() {
        let (mut viewer, mut session) = attach(vec![2, 8, 8], &["cell"]);
        session.register_class(&mut viewer, "alive").unwrap();
        session.classify(&mut viewer, 0).unwrap();
        session.drain_notices();

        let outcome = session.load_table(Some(Path::new("table.txt"))).unwrap();
        assert_eq!(outcome, LoadOutcome::Generated);
        assert_eq!(session.table().annotated_count(), 0);
        assert_eq!(session.table().len(), 2);
        assert_eq!(kinds(&mut session), vec![NoticeKind::UnsupportedExtension]);
    }

    #[test]
    fn test_load_rejects_mismatched_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("other.csv");
        std::fs::write(&path, "cell,time,annotated_class\n0,0,a\n").unwrap();

        let (mut viewer, mut session) = attach(vec![2, 3, 8, 8], &["cell", "frame"]);
        session.register_class(&mut viewer, "alive").unwrap();
        session.classify(&mut viewer, 0).unwrap();

        let err = session.load_table(Some(&path)).unwrap_err();
        assert!(matches!(
            err,
            SessionError::Table(TableError::SchemaMismatch { .. })
        ));
        assert_eq!(session.table().class_at(&[0, 0]), Some("alive"));
    }

    #[test]
    fn test_load_rejects_partial_coverage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.csv");
        std::fs::write(&path, "cell,annotated_class\n0,a\n").unwrap();

        let (_, mut session) = attach(vec![2, 8, 8], &["cell"]);
        let err = session.load_table(Some(&path)).unwrap_err();
        assert!(matches!(err, SessionError::Table(TableError::Coverage { .. })));
        assert_eq!(session.table().len(), 2);
    }

    #[test]
    fn test_load_rekeys_reordered_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reordered.csv");
        std::fs::write(
            &path,
            "frame,cell,annotated_class\n0,0,a\n1,0,\n0,1,b\n1,1,\n",
        )
        .unwrap();

        let (_, mut session) = attach(vec![2, 2, 8, 8], &["cell", "frame"]);
        session.load_table(Some(&path)).unwrap();

        assert_eq!(session.table().class_at(&[0, 0]), Some("a"));
        assert_eq!(session.table().class_at(&[1, 0]), Some("b"));
        assert_eq!(session.table().class_at(&[0, 1]), None);
    }

    #[test]
    fn test_progress() {
        let (mut viewer, mut session) = attach(vec![4, 8, 8], &["cell"]);
        session.register_class(&mut viewer, "alive").unwrap();
        session.register_class(&mut viewer, "dead").unwrap();

        session.classify(&mut viewer, 0).unwrap();
        session.classify(&mut viewer, 1).unwrap();
        session.classify(&mut viewer, 0).unwrap();

        let progress = session.progress();
        assert_eq!(progress.annotated, 3);
        assert_eq!(progress.total, 4);
        assert_eq!(
            progress.per_class,
            vec![("alive".to_string(), 2), ("dead".to_string(), 1)]
        );
        assert!((progress.fraction() - 0.75).abs() < f32::EPSILON);
    }
}
