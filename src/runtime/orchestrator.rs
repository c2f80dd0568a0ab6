use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Context;

use crate::cache::disk::{DiskCache, cache_root_dir};
use crate::config::{RuntimeConfig, TtsEngine};
use crate::executor::browser::BrowserExecutor;
use crate::executor::code::{CodeExecutor, OpenFileOptions};
use crate::foundation::error::{TutoError, TutoResult};
use crate::git::stepper::CommitStepper;
use crate::media::segments::{SegmentSynth, SlideLayout};
use crate::media::tools::MediaTools;
use crate::narration::narrator::Narrator;
use crate::narration::provider::SpeechProvider;
use crate::runtime::action::{Action, FileMode};
use crate::runtime::file_context::{
    FileContext, PreviewOptions, render_preview, resolve_script_path,
};

/// File name of the merged video when a `merge` action names no output.
pub const DEFAULT_OUTPUT_NAME: &str = "tutoreel-output.mp4";

/// Static slide length for line actions without a live editor.
const LINE_SLIDE_SECS: f64 = 1.4;
/// Slide length for file and browser open/close cards.
const CARD_SECS: f64 = 1.2;

/// Executes an action stream one action at a time, producing an ordered list of canonical
/// segments and finally merging them.
///
/// Executors are optional collaborators: without them every step is shown as a static slide.
/// With `render_video = false` nothing is rendered; actions are logged and executors are
/// still driven.
pub struct Runtime {
    config: RuntimeConfig,
    project_dir: PathBuf,
    code: Option<Box<dyn CodeExecutor>>,
    browser: Option<Box<dyn BrowserExecutor>>,
    provider: Option<Box<dyn SpeechProvider>>,
    narrator: Option<Narrator>,
    synth: SegmentSynth,
    stepper: Option<CommitStepper>,
    files: HashMap<String, FileContext>,
    segments: Vec<PathBuf>,
    actions: Vec<String>,
    temp_dir: Option<PathBuf>,
    output: Option<PathBuf>,
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("render_video", &self.config.render_video)
            .field("project_dir", &self.project_dir)
            .field("code", &self.code.is_some())
            .field("browser", &self.browser.is_some())
            .field("segments", &self.segments.len())
            .field("open_files", &self.files.len())
            .finish_non_exhaustive()
    }
}

impl Runtime {
    /// Validate `config` and set up a runtime with no executors attached.
    pub fn new(config: RuntimeConfig) -> TutoResult<Self> {
        config.validate()?;
        let project_dir = match &config.project_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().context("resolve current directory")?,
        };
        let synth = SegmentSynth::new(
            MediaTools::new(&config.ffmpeg),
            config.standard(),
            config.slide.clone(),
            config.tts.speaking_rate,
            config.capture.audio_padding_secs,
        );
        Ok(Self {
            config,
            project_dir,
            code: None,
            browser: None,
            provider: None,
            narrator: None,
            synth,
            stepper: None,
            files: HashMap::new(),
            segments: Vec::new(),
            actions: Vec::new(),
            temp_dir: None,
            output: None,
        })
    }

    /// Attach a live code editor.
    pub fn with_code_executor(mut self, executor: impl CodeExecutor + 'static) -> Self {
        self.code = Some(Box::new(executor));
        self
    }

    /// Attach a live browser.
    pub fn with_browser_executor(mut self, executor: impl BrowserExecutor + 'static) -> Self {
        self.browser = Some(Box::new(executor));
        self
    }

    /// Attach the text-to-speech backend used for narration.
    pub fn with_speech_provider(mut self, provider: impl SpeechProvider + 'static) -> Self {
        self.provider = Some(Box::new(provider));
        self.narrator = None;
        self
    }

    /// `[action] message` lines for every action executed so far.
    pub fn actions(&self) -> &[String] {
        &self.actions
    }

    /// Segments queued for the final merge, in order.
    pub fn segments(&self) -> &[PathBuf] {
        &self.segments
    }

    /// Current project directory (inside a worktree while commit stepping).
    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    /// Scratch directory holding segments, once one was needed.
    pub fn temp_dir(&self) -> Option<&Path> {
        self.temp_dir.as_deref()
    }

    /// Path written by the last successful `merge`.
    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }

    /// Replay state of an open file.
    pub fn file_context(&self, path: &str) -> Option<&FileContext> {
        self.files.get(path)
    }

    /// Execute `actions` in order and clean up afterwards, even on failure.
    ///
    /// A failing action aborts the run with [`TutoError::Step`] naming it.
    #[tracing::instrument(skip_all, fields(actions = actions.len()))]
    pub fn run(&mut self, actions: &[Action]) -> TutoResult<()> {
        let mut result = Ok(());
        for (index, action) in actions.iter().enumerate() {
            if let Err(e) = self.execute(action) {
                if !e.is_fatal() {
                    tracing::warn!(index, %action, "step degraded: {e}");
                    continue;
                }
                result = Err(TutoError::Step {
                    index,
                    action: action.to_string(),
                    source: Box::new(e),
                });
                break;
            }
        }
        let cleaned = self.cleanup();
        match (result, cleaned) {
            (Err(e), Err(cleanup)) => {
                tracing::warn!("cleanup after failed run also failed: {cleanup}");
                Err(e)
            }
            (Err(e), Ok(())) | (Ok(()), Err(e)) => Err(e),
            (Ok(()), Ok(())) => Ok(()),
        }
    }

    /// Execute one action.
    pub fn execute(&mut self, action: &Action) -> TutoResult<()> {
        match action {
            Action::Narrate {
                text,
                duration,
                browser,
            } => self.narrate(text, *duration, browser.as_deref()),
            Action::OpenFile { path, mode } => self.open_file(path, *mode),
            Action::CloseFile { path } => self.close_file(path),
            Action::InputLine { path, line, text } => {
                self.input_line(path, *line, text.as_deref())
            }
            Action::EditLine { path, line, text } => self.edit_line(path, *line, text.as_deref()),
            Action::Highlight {
                selector,
                narration,
            } => self.highlight(selector, narration.as_deref()),
            Action::Click {
                selector,
                narration,
            } => self.click(selector, narration.as_deref()),
            Action::Navigate { target } => self.navigate(target),
            Action::CloseBrowser { target } => self.close_browser(target),
            Action::CheckoutCommit { commit } => self.checkout_commit(commit),
            Action::InsertClip { path } => self.insert_clip(path),
            Action::Merge { output } => self.merge(output.as_deref()),
        }
    }

    /// Tear down commit stepping and restore the original project directory. Idempotent.
    pub fn cleanup(&mut self) -> TutoResult<()> {
        let Some(mut stepper) = self.stepper.take() else {
            return Ok(());
        };
        self.project_dir = stepper.teardown()?;
        Ok(())
    }

    fn narrate(
        &mut self,
        text: &str,
        duration: Option<f64>,
        browser: Option<&str>,
    ) -> TutoResult<()> {
        let extra = browser.map(|b| format!(" browser={b}")).unwrap_or_default();
        self.log("narrate", format!("{text}{extra}"));
        let audio = self.speech(Some(text));

        let live = self.config.render_video && self.browser.is_some();
        if let Some(target) = browser.filter(|_| live) {
            let target = target.trim();
            if !target.is_empty() && target != "true" {
                let url = self.browser_url(target);
                if let Some(b) = self.browser.as_mut() {
                    b.navigate(&url)?;
                }
            }
            let min = self.config.capture.narrated_min_secs;
            return self.capture_browser(|_| Ok(()), min, audio.as_deref(), 0, text);
        }

        self.slide(text, duration, audio.as_deref(), SlideLayout::Center)
    }

    fn open_file(&mut self, path: &str, mode: Option<FileMode>) -> TutoResult<()> {
        let mode_label = mode.map_or_else(|| "-".to_string(), |m| m.to_string());
        self.log("openFile", format!("{path} mode={mode_label}"));
        let resolved = resolve_script_path(&self.project_dir, path);
        let record = self.records_code() && mode == Some(FileMode::Input);
        if let Some(code) = self.code.as_mut() {
            let opts = if record {
                OpenFileOptions::fresh()
            } else {
                OpenFileOptions::keep()
            };
            code.open_file(&resolved, opts)?;
        }
        if !self.config.render_video {
            return Ok(());
        }

        let ctx = FileContext::open(path, resolved, mode);
        let preview = ctx.has_lines().then(|| render_preview(&ctx, &self.preview(None, None)));
        self.files.insert(path.to_string(), ctx);
        if record {
            return Ok(());
        }
        match preview {
            Some(text) => self.slide(&text, None, None, SlideLayout::Code),
            None => self.slide(
                &format!("File: {path}  mode: {mode_label}"),
                None,
                None,
                SlideLayout::Center,
            ),
        }
    }

    fn close_file(&mut self, path: &str) -> TutoResult<()> {
        self.log("closeFile", path.to_string());
        let ctx = self.files.remove(path);
        match ctx {
            Some(mut ctx) if self.records_code() && ctx.is_input() => {
                self.flush_remaining(&mut ctx)
            }
            Some(mut ctx) if ctx.has_lines() => {
                ctx.revealed_line_count = ctx.total_lines();
                let text = render_preview(&ctx, &self.preview(None, None));
                self.slide(&text, Some(CARD_SECS), None, SlideLayout::Code)
            }
            _ => self.slide(
                &format!("End of file: {path}"),
                Some(CARD_SECS),
                None,
                SlideLayout::Center,
            ),
        }
    }

    fn input_line(
        &mut self,
        path: &str,
        line: Option<usize>,
        text: Option<&str>,
    ) -> TutoResult<()> {
        let at = line.map_or_else(|| "?".to_string(), |l| l.to_string());
        self.log(
            "inputLine",
            format!("{path}:{at} {}", text.unwrap_or_default()).trim().to_string(),
        );
        let live = self.records_code() && self.files.get(path).is_some_and(FileContext::is_input);
        if let (true, Some(line)) = (live, line) {
            return self.record_code_segment(path, line, text);
        }
        self.static_line(path, line, text, &format!("Input {path}:{at}"))
    }

    fn edit_line(&mut self, path: &str, line: usize, text: Option<&str>) -> TutoResult<()> {
        self.log(
            "editLine",
            format!("{path}:{line} {}", text.unwrap_or_default()).trim().to_string(),
        );
        if let Some(ctx) = self.files.get_mut(path) {
            ctx.revealed_line_count = ctx.total_lines();
        }
        self.static_line(path, Some(line), text, &format!("Edit {path}:{line}"))
    }

    /// Type or rewrite the line without recording and show a highlighted preview slide.
    fn static_line(
        &mut self,
        path: &str,
        line: Option<usize>,
        text: Option<&str>,
        fallback_title: &str,
    ) -> TutoResult<()> {
        let source = match (self.files.get(path), line) {
            (Some(ctx), Some(l)) if ctx.has_lines() => ctx.line(l).map(str::to_owned),
            _ => None,
        };
        if let Some(code) = self.code.as_mut() {
            let content = source.as_deref().or(text).unwrap_or_default();
            code.write_line(content, line, false)?;
        }
        let audio = self.speech(text);

        let opts = self.preview(line, text);
        let preview = match (self.files.get_mut(path), line) {
            (Some(ctx), Some(l)) if ctx.has_lines() => {
                ctx.reveal_through(l);
                Some(render_preview(ctx, &opts))
            }
            _ => None,
        };
        if let Some(preview) = preview {
            return self.slide(&preview, Some(LINE_SLIDE_SECS), audio.as_deref(), SlideLayout::Code);
        }
        let card = format!("{fallback_title}\n{}", text.unwrap_or_default());
        self.slide(&card, Some(LINE_SLIDE_SECS), audio.as_deref(), SlideLayout::Center)
    }

    fn highlight(&mut self, selector: &str, narration: Option<&str>) -> TutoResult<()> {
        self.log("highlight", selector.to_string());
        let caption = caption("Highlight", selector, narration);
        let settle = self.config.capture.highlight_settle_ms;
        self.browser_step(narration, &caption, settle, |b| b.highlight(selector))
    }

    fn click(&mut self, selector: &str, narration: Option<&str>) -> TutoResult<()> {
        self.log("click", selector.to_string());
        let caption = caption("Click", selector, narration);
        let settle = self.config.capture.click_settle_ms;
        self.browser_step(narration, &caption, settle, |b| b.click(selector))
    }

    fn browser_step(
        &mut self,
        narration: Option<&str>,
        caption: &str,
        settle_ms: u64,
        step: impl FnOnce(&mut dyn BrowserExecutor) -> TutoResult<()>,
    ) -> TutoResult<()> {
        let audio = self.speech(narration);
        let min = if narration.is_some() {
            self.config.capture.narrated_min_secs
        } else {
            self.config.capture.browser_min_secs
        };
        if self.config.render_video && self.browser.is_some() {
            return self.capture_browser(step, min, audio.as_deref(), settle_ms, caption);
        }
        if let Some(b) = self.browser.as_deref_mut() {
            step(b)?;
        }
        self.slide(caption, Some(min), audio.as_deref(), SlideLayout::Center)
    }

    fn navigate(&mut self, target: &str) -> TutoResult<()> {
        self.log("navigate", target.to_string());
        if self.browser.is_some() {
            let url = self.browser_url(target);
            if let Some(b) = self.browser.as_mut() {
                b.navigate(&url)?;
            }
            if self.config.render_video {
                return Ok(());
            }
        }
        self.slide(&format!("Browse: {target}"), Some(CARD_SECS), None, SlideLayout::Center)
    }

    fn close_browser(&mut self, target: &str) -> TutoResult<()> {
        self.log("closeBrowser", target.to_string());
        if self.config.render_video && self.browser.is_some() {
            return Ok(());
        }
        self.slide(&format!("Leave browser: {target}"), Some(1.0), None, SlideLayout::Center)
    }

    fn checkout_commit(&mut self, commit: &str) -> TutoResult<()> {
        self.log("checkoutCommit", commit.to_string());
        let project = self.project_dir.clone();
        let stepper = self.stepper.get_or_insert_with(|| CommitStepper::new(project));
        self.project_dir = match self.code.as_deref_mut() {
            Some(code) => stepper.checkout_live(commit, code)?,
            None => stepper.checkout(commit)?,
        };
        Ok(())
    }

    fn insert_clip(&mut self, path: &Path) -> TutoResult<()> {
        self.log("insertClip", path.display().to_string());
        self.segments.push(path.to_path_buf());
        Ok(())
    }

    fn merge(&mut self, output: Option<&Path>) -> TutoResult<()> {
        let target = match output {
            Some(p) => p.to_path_buf(),
            None if self.config.render_video => self.scratch_dir()?.join(DEFAULT_OUTPUT_NAME),
            None => PathBuf::from(DEFAULT_OUTPUT_NAME),
        };
        self.log(
            "merge",
            format!("{} ({} segments)", target.display(), self.segments.len()),
        );
        if !self.config.render_video {
            return Ok(());
        }
        if self.segments.is_empty() {
            self.slide("Nothing to show yet", Some(1.0), None, SlideLayout::Center)?;
        }
        let manifest = self.scratch_dir()?.join("concat.txt");
        self.synth
            .tools()
            .concat_segments(&self.segments, &manifest, &target)?;
        self.output = Some(target);
        Ok(())
    }

    /// Type lines up to `line` while recording the editor, then highlight it.
    #[tracing::instrument(skip(self, narration))]
    fn record_code_segment(
        &mut self,
        path: &str,
        line: usize,
        narration: Option<&str>,
    ) -> TutoResult<()> {
        let Some(mut ctx) = self.files.remove(path) else {
            return Ok(());
        };
        let recorded = self.record_lines(&mut ctx, line, narration);
        self.files.insert(path.to_string(), ctx);
        recorded
    }

    fn record_lines(
        &mut self,
        ctx: &mut FileContext,
        line: usize,
        narration: Option<&str>,
    ) -> TutoResult<()> {
        let total = ctx.total_lines();
        if total == 0 {
            return Err(TutoError::source_missing(ctx.resolved_path.clone()));
        }
        if line == 0 || line > total {
            return Err(TutoError::validation(format!(
                "line {line} is out of range for '{}' ({total} lines)",
                ctx.display_path
            )));
        }

        let audio = self.speech(narration);
        let desired = self.desired_duration(self.config.capture.code_min_secs, audio.as_deref());
        let Some(code) = self.code.as_mut() else {
            return Ok(());
        };

        let started = Instant::now();
        let recording = match code.start_recording() {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(path = %ctx.display_path, "editor recording did not start: {e}");
                false
            }
        };
        for n in ctx.typed_line_count + 1..=line {
            code.write_line(ctx.line(n).unwrap_or_default(), None, true)?;
        }
        ctx.typed_line_count = ctx.typed_line_count.max(line);
        ctx.reveal_through(line);
        code.highlight_line(line)?;

        let capture = if recording {
            wait_remaining(started, desired);
            code.stop_recording()
                .inspect_err(|e| tracing::warn!("editor recording did not stop: {e}"))
                .ok()
        } else {
            None
        };
        let Some(capture) = capture else {
            let preview = render_preview(ctx, &self.preview(Some(line), narration));
            return self.slide(&preview, Some(LINE_SLIDE_SECS), audio.as_deref(), SlideLayout::Code);
        };

        let secs = desired.max(started.elapsed().as_secs_f64());
        self.push_capture(&capture, audio.as_deref(), secs)
    }

    /// Type every line not yet typed in one recording.
    fn flush_remaining(&mut self, ctx: &mut FileContext) -> TutoResult<()> {
        let total = ctx.total_lines();
        if total == 0 || ctx.typed_line_count >= total {
            return Ok(());
        }
        let min = self.config.capture.flush_min_secs;
        let Some(code) = self.code.as_mut() else {
            return Ok(());
        };

        let started = Instant::now();
        let recording = code
            .start_recording()
            .inspect_err(|e| {
                tracing::warn!(path = %ctx.display_path, "editor recording did not start: {e}")
            })
            .is_ok();
        for n in ctx.typed_line_count + 1..=total {
            code.write_line(ctx.line(n).unwrap_or_default(), None, true)?;
        }
        ctx.typed_line_count = total;
        ctx.revealed_line_count = total;

        let capture = if recording {
            wait_remaining(started, min);
            code.stop_recording()
                .inspect_err(|e| tracing::warn!("editor recording did not stop: {e}"))
                .ok()
        } else {
            None
        };
        let Some(capture) = capture else {
            let preview = render_preview(ctx, &self.preview(None, None));
            return self.slide(&preview, Some(CARD_SECS), None, SlideLayout::Code);
        };
        let secs = min.max(started.elapsed().as_secs_f64());
        self.push_capture(&capture, None, secs)
    }

    /// Record the browser around `step`; recording and transcoding failures fall back to a
    /// screenshot slide. Errors from `step` itself are returned.
    fn capture_browser(
        &mut self,
        step: impl FnOnce(&mut dyn BrowserExecutor) -> TutoResult<()>,
        min_secs: f64,
        audio: Option<&Path>,
        settle_ms: u64,
        caption: &str,
    ) -> TutoResult<()> {
        let desired = self.desired_duration(min_secs, audio);
        let Some(browser) = self.browser.as_deref_mut() else {
            return Ok(());
        };

        if let Err(e) = browser.start_recording() {
            tracing::warn!("browser recording did not start, using a screenshot: {e}");
            return self.screenshot_slide(caption, desired, audio);
        }
        let started = Instant::now();
        let stepped = step(&mut *browser).map(|()| {
            if settle_ms > 0 {
                std::thread::sleep(Duration::from_millis(settle_ms));
            }
            wait_remaining(started, desired);
        });
        let stop_requested = started.elapsed().as_secs_f64();
        let stopped = browser.stop_recording();
        stepped?;

        let capture = match stopped {
            Ok(capture) => capture,
            Err(e) => {
                tracing::warn!("browser recording did not stop, using a screenshot: {e}");
                return self.screenshot_slide(caption, desired, audio);
            }
        };
        if let Err(e) = self.push_capture(&capture, audio, desired.max(stop_requested)) {
            tracing::warn!("browser capture transcode failed, using a screenshot: {e}");
            return self.screenshot_slide(caption, desired, audio);
        }
        Ok(())
    }

    fn screenshot_slide(
        &mut self,
        caption: &str,
        secs: f64,
        audio: Option<&Path>,
    ) -> TutoResult<()> {
        if !self.config.render_video {
            return Ok(());
        }
        let shot = match self.browser.as_mut().map(|b| b.screenshot()) {
            Some(Ok(shot)) => shot,
            Some(Err(e)) => {
                tracing::warn!("screenshot failed: {e}");
                return self.slide(caption, Some(secs), audio, SlideLayout::Center);
            }
            None => return self.slide(caption, Some(secs), audio, SlideLayout::Center),
        };
        if let Err(e) = image::image_dimensions(&shot) {
            tracing::warn!(shot = %shot.display(), "screenshot is not a readable image: {e}");
            return self.slide(caption, Some(secs), audio, SlideLayout::Center);
        }
        let out = self.next_segment_path()?;
        self.synth
            .image_slide(&out, &shot, Some(caption), Some(secs), audio)?;
        self.segments.push(out);
        Ok(())
    }

    fn push_capture(&mut self, capture: &Path, audio: Option<&Path>, secs: f64) -> TutoResult<()> {
        let out = self.next_segment_path()?;
        self.synth.transcode_capture(&out, capture, audio, secs)?;
        self.segments.push(out);
        Ok(())
    }

    fn slide(
        &mut self,
        text: &str,
        duration: Option<f64>,
        audio: Option<&Path>,
        layout: SlideLayout,
    ) -> TutoResult<()> {
        if !self.config.render_video {
            return Ok(());
        }
        let out = self.next_segment_path()?;
        self.synth.slide(&out, text, layout, duration, audio)?;
        self.segments.push(out);
        Ok(())
    }

    /// Narration audio for `text`, or `None` when not rendering, disabled, blank or failed.
    fn speech(&mut self, text: Option<&str>) -> Option<PathBuf> {
        if !self.config.render_video || self.config.tts.engine == TtsEngine::None {
            return None;
        }
        let text = text.map(str::trim).filter(|t| !t.is_empty())?;
        let narrator = match self.narrator() {
            Ok(n) => n,
            Err(e) => {
                tracing::warn!("narration unavailable: {e}");
                return None;
            }
        };
        match narrator.generate(text) {
            Ok(audio) => audio,
            Err(e) => {
                tracing::warn!("narration failed, continuing silently: {e}");
                None
            }
        }
    }

    fn narrator(&mut self) -> TutoResult<&mut Narrator> {
        if self.narrator.is_none() {
            let root = cache_root_dir(self.config.cache_dir.as_deref());
            let cache = DiskCache::new(root.join("tts"))?;
            let out = self.scratch_dir()?.join("tts");
            let narrator =
                Narrator::new(&self.config.tts, cache, self.provider.take()).with_output_dir(out);
            self.narrator = Some(narrator);
        }
        self.narrator
            .as_mut()
            .ok_or_else(|| TutoError::narration("narrator unavailable"))
    }

    fn desired_duration(&self, min_secs: f64, audio: Option<&Path>) -> f64 {
        audio
            .and_then(|a| self.synth.tools().media_duration(a))
            .map_or(min_secs, |secs| {
                min_secs.max(secs + self.config.capture.audio_padding_secs)
            })
    }

    fn records_code(&self) -> bool {
        self.config.render_video && self.code.is_some()
    }

    fn preview<'a>(
        &self,
        highlight: Option<usize>,
        narration: Option<&'a str>,
    ) -> PreviewOptions<'a> {
        PreviewOptions {
            highlight,
            narration,
            rows: self.config.standard().preview_rows(),
        }
    }

    fn browser_url(&self, target: &str) -> String {
        let target = target.trim();
        if ["http://", "https://", "file://"]
            .iter()
            .any(|scheme| target.starts_with(scheme))
        {
            return target.to_string();
        }
        let resolved = resolve_script_path(&self.project_dir, target);
        let abs = std::path::absolute(&resolved).unwrap_or(resolved);
        format!("file://{}", abs.display())
    }

    fn scratch_dir(&mut self) -> TutoResult<PathBuf> {
        if let Some(dir) = &self.temp_dir {
            return Ok(dir.clone());
        }
        let dir = match &self.config.temp_dir {
            Some(dir) => {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("create temp dir '{}'", dir.display()))?;
                dir.clone()
            }
            None => tempfile::Builder::new()
                .prefix("tutoreel-")
                .tempdir()
                .context("create run temp dir")?
                .keep(),
        };
        tracing::debug!(dir = %dir.display(), "scratch directory");
        self.temp_dir = Some(dir.clone());
        Ok(dir)
    }

    fn next_segment_path(&mut self) -> TutoResult<PathBuf> {
        let index = self.segments.len();
        Ok(self.scratch_dir()?.join(format!("segment-{index:04}.mp4")))
    }

    fn log(&mut self, action: &str, message: String) {
        let line = format!("[{action}] {message}");
        tracing::info!("{line}");
        self.actions.push(line);
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        if let Err(e) = self.cleanup() {
            tracing::warn!("runtime cleanup failed: {e}");
        }
    }
}

fn caption(verb: &str, selector: &str, narration: Option<&str>) -> String {
    match narration {
        Some(n) => format!("{verb} {selector}\n{n}"),
        None => format!("{verb} {selector}"),
    }
}

/// Sleep until `secs` have passed since `started`.
fn wait_remaining(started: Instant, secs: f64) {
    let remaining = Duration::from_secs_f64(secs.max(0.0)).saturating_sub(started.elapsed());
    if !remaining.is_zero() {
        std::thread::sleep(remaining);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/runtime/orchestrator.rs"]
mod tests;
