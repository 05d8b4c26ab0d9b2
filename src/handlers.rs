//! Message handlers for the classifier panel.
//!
//! Each handler processes one kind of message and turns failures into
//! notices, keeping `ClassifierSession::update` small.

use std::path::Path;

use crate::keybindings::KeyCode;
use crate::notice::{Notice, NoticeKind};
use crate::session::ClassifierSession;
use crate::viewer::Viewer;

/// Handle a finished load dialog.
pub fn handle_load(session: &mut ClassifierSession, path: Option<&Path>) {
    if let Err(e) = session.load_table(path) {
        session.notify(Notice::error(
            NoticeKind::LoadFailed,
            format!("Failed to load {:?}: {}", path.unwrap_or(Path::new("")), e),
        ));
    }
}

/// Handle a finished save dialog.
pub fn handle_save(session: &mut ClassifierSession, path: Option<&Path>) {
    if let Err(e) = session.save_table(path) {
        session.notify(Notice::error(
            NoticeKind::SaveFailed,
            format!("Failed to save {:?}: {}", path.unwrap_or(Path::new("")), e),
        ));
    }
}

/// Register the class typed into the text field.
pub fn handle_add_class(session: &mut ClassifierSession, viewer: &mut dyn Viewer) {
    let name = session.new_class_text().to_string();
    match session.register_class(viewer, &name) {
        Ok(_) => session.clear_new_class_text(),
        Err(e) => session.notify(Notice::warning(NoticeKind::ClassRejected, e.to_string())),
    }
}

/// Classify the current coordinate with a class button.
pub fn handle_classify(session: &mut ClassifierSession, viewer: &mut dyn Viewer, index: usize) {
    if let Err(e) = session.classify(viewer, index) {
        session.notify(Notice::error(NoticeKind::ClassifyFailed, e.to_string()));
    }
}

/// Classify the current coordinate with a bound digit key.
pub fn handle_key(session: &mut ClassifierSession, viewer: &mut dyn Viewer, key: KeyCode) {
    match session.class_index_for_key(key) {
        Some(index) => handle_classify(session, viewer, index),
        None => log::debug!("Key {} has no class bound", key.digit()),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use crate::config::ClassifierConfig;
    use crate::data::StackViewer;
    use crate::message::ClassifierMessage;
    use crate::notice::{NoticeKind, NoticeLevel};
    use crate::session::ClassifierSession;
    use crate::keybindings::KeyCode;

    fn setup() -> (StackViewer, ClassifierSession) {
        let mut viewer = StackViewer::with_shape(vec![2, 3, 8, 8]);
        let config = ClassifierConfig::new().with_levels(["cell", "frame"]);
        let session = ClassifierSession::attach(&mut viewer, config).unwrap();
        (viewer, session)
    }

    #[test]
    fn test_add_class_from_text_field() {
        let (mut viewer, mut session) = setup();

        session.update(
            &mut viewer,
            ClassifierMessage::NewClassTextChanged("alive".to_string()),
        );
        assert_eq!(session.panel().new_class_text, "alive");

        session.update(&mut viewer, ClassifierMessage::AddClass);
        assert_eq!(session.classes().len(), 1);
        assert_eq!(session.new_class_text(), "");
        assert_eq!(viewer.bound_keys(), &[KeyCode::Key1]);
    }

    #[test]
    fn test_add_empty_class_rejected() {
        let (mut viewer, mut session) = setup();
        session.update(&mut viewer, ClassifierMessage::AddClass);

        let notices = session.drain_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].kind, NoticeKind::ClassRejected);
        assert!(session.classes().is_empty());
    }

    #[test]
    fn test_key_press_classifies_and_advances() {
        let (mut viewer, mut session) = setup();
        session.update(
            &mut viewer,
            ClassifierMessage::NewClassTextChanged("alive".to_string()),
        );
        session.update(&mut viewer, ClassifierMessage::AddClass);

        session.update(&mut viewer, ClassifierMessage::KeyPressed(KeyCode::Key1));
        assert_eq!(session.table().class_at(&[0, 0]), Some("alive"));
        assert_eq!(session.current_coordinate(&viewer), vec![0, 1]);

        // unbound key does nothing
        session.update(&mut viewer, ClassifierMessage::KeyPressed(KeyCode::Key5));
        assert_eq!(session.current_coordinate(&viewer), vec![0, 1]);
        assert_eq!(session.progress().annotated, 1);
    }

    #[test]
    fn test_class_button_out_of_range() {
        let (mut viewer, mut session) = setup();
        session.update(&mut viewer, ClassifierMessage::ClassClicked(3));

        let notices = session.drain_notices();
        assert_eq!(notices[0].kind, NoticeKind::ClassifyFailed);
        assert_eq!(notices[0].level, NoticeLevel::Error);
    }

    #[test]
    fn test_save_unsupported_reports_error() {
        let (mut viewer, mut session) = setup();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.txt");

        session.update(&mut viewer, ClassifierMessage::SaveRequested(Some(path.clone())));

        let notices = session.drain_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].kind, NoticeKind::SaveFailed);
        assert!(!path.exists());
    }

    #[test]
    fn test_cancelled_dialogs_are_silent() {
        let (mut viewer, mut session) = setup();
        session.update(&mut viewer, ClassifierMessage::LoadRequested(None));
        session.update(&mut viewer, ClassifierMessage::SaveRequested(None));
        assert!(session.drain_notices().is_empty());
    }

    #[test]
    fn test_load_missing_file_keeps_table() {
        let (mut viewer, mut session) = setup();
        let path = PathBuf::from("/nonexistent/dir/table.csv");

        session.update(&mut viewer, ClassifierMessage::LoadRequested(Some(path)));

        let notices = session.drain_notices();
        assert_eq!(notices[0].kind, NoticeKind::LoadFailed);
        assert_eq!(session.table().len(), 6);
    }
}
