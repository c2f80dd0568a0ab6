use super::*;
use crate::executor::memory::{EditorCall, InMemoryCodeExecutor};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Clone, Default)]
struct FakeBrowser {
    log: Rc<RefCell<Vec<String>>>,
}

impl FakeBrowser {
    fn entries(&self) -> Vec<String> {
        self.log.borrow().clone()
    }

    fn push(&self, entry: String) {
        self.log.borrow_mut().push(entry);
    }
}

impl BrowserExecutor for FakeBrowser {
    fn navigate(&mut self, url: &str) -> TutoResult<()> {
        self.push(format!("navigate {url}"));
        Ok(())
    }

    fn click(&mut self, selector: &str) -> TutoResult<()> {
        self.push(format!("click {selector}"));
        Ok(())
    }

    fn type_text(&mut self, selector: &str, text: &str) -> TutoResult<()> {
        self.push(format!("type {selector} {text}"));
        Ok(())
    }

    fn highlight(&mut self, selector: &str) -> TutoResult<()> {
        self.push(format!("highlight {selector}"));
        Ok(())
    }

    fn screenshot(&mut self) -> TutoResult<PathBuf> {
        Err(TutoError::executor("no screen"))
    }

    fn start_recording(&mut self) -> TutoResult<()> {
        Err(TutoError::capture("no recorder"))
    }

    fn stop_recording(&mut self) -> TutoResult<PathBuf> {
        Err(TutoError::capture("no recorder"))
    }
}

fn dry_config(project: &Path) -> RuntimeConfig {
    RuntimeConfig {
        project_dir: Some(project.to_path_buf()),
        ..RuntimeConfig::default()
    }
}

fn render_config(project: &Path, scratch: &Path) -> RuntimeConfig {
    RuntimeConfig {
        render_video: true,
        project_dir: Some(project.to_path_buf()),
        temp_dir: Some(scratch.join("run")),
        cache_dir: Some(scratch.join("cache")),
        ..RuntimeConfig::default()
    }
}

#[test]
fn dry_run_logs_every_action_and_renders_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    let mut rt = Runtime::new(dry_config(tmp.path())).unwrap();
    rt.run(&[
        Action::Narrate {
            text: "Hello there".to_string(),
            duration: None,
            browser: None,
        },
        Action::OpenFile {
            path: "src/app.js".to_string(),
            mode: None,
        },
        Action::Merge { output: None },
    ])
    .unwrap();

    assert_eq!(
        rt.actions(),
        [
            "[narrate] Hello there",
            "[openFile] src/app.js mode=-",
            "[merge] tutoreel-output.mp4 (0 segments)",
        ]
    );
    assert!(rt.segments().is_empty());
    assert!(rt.temp_dir().is_none());
    assert!(rt.output().is_none());
}

#[test]
fn dry_run_still_drives_the_editor() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("a.js"), "one\ntwo\n").unwrap();
    let editor = InMemoryCodeExecutor::new();
    let mut rt = Runtime::new(dry_config(tmp.path()))
        .unwrap()
        .with_code_executor(editor.clone());

    rt.execute(&Action::OpenFile {
        path: "a.js".to_string(),
        mode: Some(FileMode::Input),
    })
    .unwrap();
    rt.execute(&Action::InputLine {
        path: "a.js".to_string(),
        line: Some(2),
        text: Some("TWO".to_string()),
    })
    .unwrap();

    let calls = editor.calls();
    assert_eq!(
        calls[0],
        EditorCall::Open {
            path: tmp.path().join("a.js"),
            opts: OpenFileOptions::keep(),
        }
    );
    assert_eq!(
        calls[1],
        EditorCall::WriteLine {
            text: "TWO".to_string(),
            line: Some(2),
            append_newline: false,
        }
    );
    assert_eq!(rt.actions()[1], "[inputLine] a.js:2 TWO");
    assert!(rt.file_context("a.js").is_none());
}

#[test]
fn navigate_resolves_relative_targets_to_file_urls() {
    let browser = FakeBrowser::default();
    let mut rt = Runtime::new(dry_config(Path::new("/proj")))
        .unwrap()
        .with_browser_executor(browser.clone());
    rt.execute(&Action::Navigate {
        target: "docs/index.html".to_string(),
    })
    .unwrap();
    rt.execute(&Action::Navigate {
        target: " https://example.com/a ".to_string(),
    })
    .unwrap();
    rt.execute(&Action::Click {
        selector: "#go".to_string(),
        narration: None,
    })
    .unwrap();

    assert_eq!(
        browser.entries(),
        [
            "navigate file:///proj/docs/index.html",
            "navigate https://example.com/a",
            "click #go",
        ]
    );
}

#[test]
fn fatal_error_names_the_failing_step_and_cleans_up() {
    let tmp = tempfile::tempdir().unwrap();
    let mut rt = Runtime::new(dry_config(tmp.path())).unwrap();
    let err = rt
        .run(&[
            Action::Narrate {
                text: "intro".to_string(),
                duration: None,
                browser: None,
            },
            Action::CheckoutCommit {
                commit: "abc123".to_string(),
            },
            Action::Merge { output: None },
        ])
        .unwrap_err();

    match &err {
        TutoError::Step {
            index,
            action,
            source,
        } => {
            assert_eq!(*index, 1);
            assert_eq!(action, "checkoutCommit abc123");
            assert!(matches!(**source, TutoError::Git { .. }), "{source}");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.is_fatal());
    assert_eq!(rt.actions().len(), 2);
    assert_eq!(rt.project_dir(), tmp.path());
}

#[test]
fn live_input_requires_a_readable_source() {
    let tmp = tempfile::tempdir().unwrap();
    let project = tmp.path().join("proj");
    std::fs::create_dir_all(&project).unwrap();
    let mut rt = Runtime::new(render_config(&project, tmp.path()))
        .unwrap()
        .with_code_executor(InMemoryCodeExecutor::new());

    rt.execute(&Action::OpenFile {
        path: "new.js".to_string(),
        mode: Some(FileMode::Input),
    })
    .unwrap();
    let err = rt
        .execute(&Action::InputLine {
            path: "new.js".to_string(),
            line: Some(1),
            text: None,
        })
        .unwrap_err();
    match err {
        TutoError::SourceMissing { path } => assert_eq!(path, project.join("new.js")),
        other => panic!("unexpected error: {other}"),
    }
    assert!(rt.segments().is_empty());
}

#[test]
fn live_input_rejects_out_of_range_lines() {
    let tmp = tempfile::tempdir().unwrap();
    let project = tmp.path().join("proj");
    std::fs::create_dir_all(&project).unwrap();
    std::fs::write(project.join("a.js"), "one\ntwo").unwrap();
    let editor = InMemoryCodeExecutor::new();
    let mut rt = Runtime::new(render_config(&project, tmp.path()))
        .unwrap()
        .with_code_executor(editor.clone());

    rt.execute(&Action::OpenFile {
        path: "a.js".to_string(),
        mode: Some(FileMode::Input),
    })
    .unwrap();
    assert_eq!(
        editor.calls()[0],
        EditorCall::Open {
            path: project.join("a.js"),
            opts: OpenFileOptions::fresh(),
        }
    );
    let err = rt
        .execute(&Action::InputLine {
            path: "a.js".to_string(),
            line: Some(5),
            text: None,
        })
        .unwrap_err();
    assert!(matches!(err, TutoError::Validation(_)), "{err}");
    assert_eq!(rt.file_context("a.js").map(|c| c.typed_line_count), Some(0));
}

#[test]
fn live_input_types_forward_and_records() {
    if !MediaTools::default().available() {
        return;
    }
    let tmp = tempfile::tempdir().unwrap();
    let project = tmp.path().join("proj");
    std::fs::create_dir_all(&project).unwrap();
    std::fs::write(project.join("a.js"), "one\ntwo\nthree").unwrap();
    // The in-memory editor has no real capture; a failing recorder degrades to a slide.
    let editor = InMemoryCodeExecutor::new().with_failing_recording();
    let mut rt = Runtime::new(render_config(&project, tmp.path()))
        .unwrap()
        .with_code_executor(editor.clone());

    rt.execute(&Action::OpenFile {
        path: "a.js".to_string(),
        mode: Some(FileMode::Input),
    })
    .unwrap();
    rt.execute(&Action::InputLine {
        path: "a.js".to_string(),
        line: Some(2),
        text: None,
    })
    .unwrap();

    assert_eq!(
        editor.buffer_text(&project.join("a.js")).as_deref(),
        Some("one\ntwo\n")
    );
    assert!(editor.calls().contains(&EditorCall::Highlight(2)));
    assert_eq!(rt.segments().len(), 1);
    assert_eq!(rt.file_context("a.js").map(|c| c.typed_line_count), Some(2));

    rt.execute(&Action::CloseFile {
        path: "a.js".to_string(),
    })
    .unwrap();
    assert_eq!(
        editor.buffer_text(&project.join("a.js")).as_deref(),
        Some("one\ntwo\nthree\n")
    );
    assert_eq!(rt.segments().len(), 2);
}

#[test]
fn insert_clip_queues_the_path_even_when_dry() {
    let tmp = tempfile::tempdir().unwrap();
    let mut rt = Runtime::new(dry_config(tmp.path())).unwrap();
    rt.execute(&Action::InsertClip {
        path: PathBuf::from("intro.mp4"),
    })
    .unwrap();
    assert_eq!(rt.segments(), [PathBuf::from("intro.mp4")]);
}
