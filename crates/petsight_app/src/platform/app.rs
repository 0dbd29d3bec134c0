use std::fs;
use std::io::{self, BufRead};
use std::path::Path;
use std::process::ExitCode;
use std::sync::mpsc;
use std::thread;

use anyhow::Context;
use petsight_core::{
    mime_type_for_file_name, update, AppState, Effect, Msg, Phase, RawImageInput,
};
use petsight_engine::EngineHandle;
use pipeline_logging::{pipeline_debug, pipeline_info, pipeline_warn, set_current_upload};

use super::cli::Cli;
use super::clipboard::read_clipboard;
use super::config::load_config;
use super::effects::EffectRunner;
use super::logging;
use super::paste::{PasteEvents, PasteSubscription};
use super::ui::console::Console;

const HELP: &str = "commands: open <path> | paste | status | help | quit";

/// Everything that can wake the dispatch loop.
#[derive(Debug)]
pub(crate) enum AppEvent {
    Msg(Msg),
    ShowStatus,
    Say(String),
    Quit,
}

pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    logging::initialize(cli.log, cli.verbose);

    let config = load_config(&cli.config).with_overrides(&cli);
    let settings = config
        .submit_settings()
        .with_context(|| format!("invalid base url {:?}", config.base_url))?;
    pipeline_info!("Posting images to {}", settings.endpoint);
    let engine = EngineHandle::new(settings).context("cannot start engine")?;

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>();
    let mut session = Session {
        state: AppState::new(),
        runner: EffectRunner::new(engine, event_tx.clone()),
        console: Console::stdout(),
    };

    // Paste events reach the state machine only while this subscription is alive.
    let paste_tx = event_tx.clone();
    let subscription = PasteEvents::global().subscribe(move |items| {
        let _ = paste_tx.send(AppEvent::Msg(Msg::Pasted(items)));
    });

    if let Some(path) = &cli.file {
        let input = read_image_file(path)?;
        session.dispatch(Msg::FileSelected(Some(input)))?;
        return session.finish(&event_rx, subscription);
    }

    if cli.paste {
        let items = read_clipboard().context("cannot read clipboard")?;
        PasteEvents::global().dispatch(items);
        // Apply the paste before deciding whether anything started.
        if let Ok(AppEvent::Msg(msg)) = event_rx.try_recv() {
            session.dispatch(msg)?;
        }
        if !session.state.phase().is_busy() {
            session.console.say("No image found on the clipboard.")?;
            return Ok(ExitCode::FAILURE);
        }
        return session.finish(&event_rx, subscription);
    }

    session.console.render_all(&session.state.view())?;
    session.console.say(HELP)?;
    spawn_stdin_reader(event_tx);
    session.run_interactive(&event_rx)?;
    drop(subscription);
    pipeline_debug!(
        "paste listeners after session: {}",
        PasteEvents::global().listener_count()
    );
    Ok(ExitCode::SUCCESS)
}

struct Session {
    state: AppState,
    runner: EffectRunner,
    console: Console<io::Stdout>,
}

impl Session {
    fn dispatch(&mut self, msg: Msg) -> io::Result<()> {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        set_current_upload(state.phase().active_upload().unwrap_or(0));
        let was_dirty = state.consume_dirty();
        let view = state.view();
        self.state = state;

        if was_dirty {
            self.console.render(&view)?;
        }
        for effect in effects {
            match effect {
                Effect::Alert(notice) => self.console.alert(notice)?,
                other => self.runner.run(other),
            }
        }
        Ok(())
    }

    /// Waits for the current upload to settle, then reports it.
    fn finish(
        mut self,
        events: &mpsc::Receiver<AppEvent>,
        subscription: PasteSubscription,
    ) -> anyhow::Result<ExitCode> {
        while self.state.phase().is_busy() {
            match events.recv() {
                Ok(AppEvent::Msg(msg)) => self.dispatch(msg)?,
                Ok(_) => {}
                Err(_) => break,
            }
        }
        drop(subscription);

        Ok(match self.state.phase() {
            Phase::Succeeded { .. } => ExitCode::SUCCESS,
            _ => ExitCode::FAILURE,
        })
    }

    fn run_interactive(&mut self, events: &mpsc::Receiver<AppEvent>) -> io::Result<()> {
        while let Ok(event) = events.recv() {
            match event {
                AppEvent::Msg(msg) => self.dispatch(msg)?,
                AppEvent::ShowStatus => self.console.render_all(&self.state.view())?,
                AppEvent::Say(text) => self.console.say(&text)?,
                AppEvent::Quit => break,
            }
        }
        Ok(())
    }
}

fn read_image_file(path: &Path) -> anyhow::Result<RawImageInput> {
    let bytes = fs::read(path).with_context(|| format!("cannot read {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mime_type = mime_type_for_file_name(&file_name);
    Ok(RawImageInput::new(bytes, mime_type, file_name))
}

fn spawn_stdin_reader(event_tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    pipeline_warn!("stdin closed: {}", err);
                    break;
                }
            };
            let event = match parse_command(&line) {
                Some(Command::Open(path)) => match read_image_file(Path::new(path)) {
                    Ok(input) => AppEvent::Msg(Msg::FileSelected(Some(input))),
                    Err(err) => AppEvent::Say(format!("{err:#}")),
                },
                Some(Command::Paste) => match read_clipboard() {
                    Ok(items) => {
                        PasteEvents::global().dispatch(items);
                        continue;
                    }
                    Err(err) => AppEvent::Say(err.to_string()),
                },
                Some(Command::Status) => AppEvent::ShowStatus,
                Some(Command::Help) => AppEvent::Say(HELP.to_string()),
                Some(Command::Quit) => AppEvent::Quit,
                None if line.trim().is_empty() => continue,
                None => AppEvent::Say(format!("unknown command, {HELP}")),
            };
            let quit = matches!(event, AppEvent::Quit);
            if event_tx.send(event).is_err() || quit {
                return;
            }
        }
        let _ = event_tx.send(AppEvent::Quit);
    });
}

#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Open(&'a str),
    Paste,
    Status,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Option<Command<'_>> {
    let line = line.trim();
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    match (word, rest.trim()) {
        ("open", "") => None,
        ("open", path) => Some(Command::Open(path)),
        ("paste", _) => Some(Command::Paste),
        ("status", _) => Some(Command::Status),
        ("help" | "?", _) => Some(Command::Help),
        ("quit" | "exit", _) => Some(Command::Quit),
        _ => None,
    }
}
