//! Terminal host for the stack classifier.
//!
//! Opens a NumPy stack through a native file dialog and drives the classifier
//! panel from stdin. A digit presses the bound key; `add <name>`, `load`,
//! `save`, `status` and `quit` map to the panel buttons.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use stack_classifier::data::{NpyStackLoader, StackViewer};
use stack_classifier::format::FormatRegistry;
use stack_classifier::keybindings::{KeyCode, optional_key_to_string};
use stack_classifier::notice::NoticeLevel;
use stack_classifier::{ClassifierConfig, ClassifierMessage, ClassifierSession, SessionError};

fn main() {
    let loaded = ClassifierConfig::load_from_default_path();
    let config = match &loaded {
        Ok(Some(config)) => config.clone(),
        _ => ClassifierConfig::default(),
    };

    env_logger::Builder::new()
        .filter_level(config.preferences.log_level.to_level_filter())
        .parse_default_env()
        .init();

    let path = ClassifierConfig::default_path();
    let shown = path
        .as_deref()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    match loaded {
        Ok(Some(_)) => log::info!("Loaded configuration from {}", shown),
        Ok(None) => write_starter_config(&config, path.as_deref()),
        Err(e) => log::warn!("Failed to load config file {}: {}", shown, e),
    }

    let Some((mut viewer, mut session)) = open_stack(&config) else {
        eprintln!("No image stack selected, exiting");
        return;
    };

    print_panel(&session);
    if let Err(e) = run(&mut viewer, &mut session) {
        eprintln!("Application error: {}", e);
    }
}

/// Write the defaults so the user has a file to edit level names in.
fn write_starter_config(config: &ClassifierConfig, path: Option<&Path>) {
    let Some(path) = path else {
        log::debug!("No config directory, running with defaults");
        return;
    };
    if let Err(e) = config.save_to_path(path) {
        log::warn!("Could not write config file {:?}: {}", path, e);
    }
}

/// Ask for stacks until one can be classified or the dialog is cancelled.
fn open_stack(config: &ClassifierConfig) -> Option<(StackViewer, ClassifierSession)> {
    loop {
        let mut dialog = rfd::FileDialog::new()
            .set_title("Open image stack")
            .add_filter("NumPy stack", NpyStackLoader.extensions());
        if !config.preferences.import_folder.is_empty() {
            dialog = dialog.set_directory(&config.preferences.import_folder);
        }
        let path = dialog.pick_file()?;

        let stack = match NpyStackLoader.load_file(&path) {
            Ok(stack) => stack,
            Err(e) => {
                eprintln!("Cannot open {}: {}", path.display(), e);
                continue;
            }
        };

        let mut viewer = StackViewer::new();
        viewer.add_layer(stack);
        match ClassifierSession::attach(&mut viewer, config.clone()) {
            Ok(session) => return Some((viewer, session)),
            Err(e @ SessionError::NoLeadingDimensions { .. }) => {
                eprintln!("{}; pick a stack with more than two axes", e);
            }
            Err(e) => eprintln!("{}", e),
        }
    }
}

fn run(viewer: &mut StackViewer, session: &mut ClassifierSession) -> io::Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print_prompt(session, viewer)?;
        let Some(line) = lines.next() else {
            return Ok(());
        };
        let line = line?;
        let line = line.trim();

        let message = match line.split_once(' ').map_or((line, ""), |(c, r)| (c, r.trim())) {
            ("quit" | "exit", _) => return Ok(()),
            ("", _) => continue,
            ("status", _) => {
                print_status(session, viewer);
                continue;
            }
            ("add", name) => {
                session.update(
                    viewer,
                    ClassifierMessage::NewClassTextChanged(name.to_string()),
                );
                Some(ClassifierMessage::AddClass)
            }
            ("load", _) => Some(ClassifierMessage::LoadRequested(pick_table(session, false))),
            ("save", _) => Some(ClassifierMessage::SaveRequested(pick_table(session, true))),
            (key, _) => KeyCode::from_label(key).map(ClassifierMessage::KeyPressed),
        };

        match message {
            Some(message) => {
                let adds_class = message == ClassifierMessage::AddClass;
                session.update(viewer, message);
                if adds_class {
                    print_panel(session);
                }
            }
            None => print_help(),
        }

        for notice in session.drain_notices() {
            let tag = match notice.level {
                NoticeLevel::Info => "info",
                NoticeLevel::Warning => "warning",
                NoticeLevel::Error => "error",
            };
            println!("[{}] {}", tag, notice.message);
        }
    }
}

fn pick_table(session: &ClassifierSession, save: bool) -> Option<PathBuf> {
    let preferences = &session.config().preferences;
    let folder = if save {
        &preferences.export_folder
    } else {
        &preferences.import_folder
    };

    let registry = FormatRegistry::new();
    let extensions = registry.supported_extensions();
    let mut dialog = rfd::FileDialog::new().add_filter("Annotation table", extensions.as_slice());
    for format in registry.iter() {
        dialog = dialog.add_filter(format.display_name(), format.extensions());
    }
    dialog = dialog.add_filter("All files", &["*"]);
    if !folder.is_empty() {
        dialog = dialog.set_directory(folder);
    }

    if save {
        dialog
            .set_title("Save annotations")
            .set_file_name("annotations.csv")
            .save_file()
    } else {
        dialog.set_title("Load metadata").pick_file()
    }
}

fn print_prompt(session: &ClassifierSession, viewer: &StackViewer) -> io::Result<()> {
    let coord = session.current_coordinate(viewer);
    let position: Vec<String> = session
        .levels()
        .iter()
        .zip(&coord)
        .map(|(level, index)| format!("{}={}", level, index))
        .collect();
    let current = session.table().class_at(&coord).unwrap_or("-");

    print!("[{}] ({}) > ", position.join(" "), current);
    io::stdout().flush()
}

fn print_panel(session: &ClassifierSession) {
    let panel = session.panel();
    println!("{} | {}", panel.load_label, panel.save_label);
    println!("{}:", panel.classes_title);
    for button in &panel.class_buttons {
        println!(
            "  [{}] {}",
            optional_key_to_string(button.shortcut),
            button.label
        );
    }
}

fn print_status(session: &ClassifierSession, viewer: &StackViewer) {
    let progress = session.progress();
    println!(
        "{}/{} annotated ({:.0}%), position {:?}",
        progress.annotated,
        progress.total,
        progress.fraction() * 100.0,
        session.current_coordinate(viewer)
    );
    for (class, count) in progress.per_class {
        println!("  {}: {}", class, count);
    }
}

fn print_help() {
    println!("Commands: <digit> | add <name> | load | save | status | quit");
}
