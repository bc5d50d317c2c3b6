//! End-to-end session scenarios driven through key events.

use std::cell::RefCell;
use std::rc::Rc;

use futures::future::LocalBoxFuture;
use futures::FutureExt;
use mirage_storage::{MemoryStorage, Storage};
use mirage_types::config::{Config, ConfigValue, STORAGE_KEY};
use mirage_types::error::{CommandResult, MirageError};
use mirage_types::input::{FileHandle, InputEvent, Key, KeyEvent};
use serde_json::json;

use crate::commands::{MUSIC_PROCESS, Playback, Player};
use crate::{
    CancelToken, Command, CommandContext, ENGINE_SOURCE, InputMode, OutputRecord, PresenterCall,
    PromptKind, RecordingPresenter, Terminal,
};

fn terminal_with(storage: MemoryStorage) -> (Terminal, RecordingPresenter) {
    let presenter = RecordingPresenter::new();
    let terminal =
        Terminal::with_builtins(Box::new(storage), Box::new(presenter.clone())).unwrap();
    (terminal, presenter)
}

fn terminal() -> (Terminal, RecordingPresenter) {
    terminal_with(MemoryStorage::new())
}

fn key(k: Key) -> InputEvent {
    InputEvent::Key(KeyEvent::plain(k))
}

fn ctrl_c() -> InputEvent {
    InputEvent::Key(KeyEvent::ctrl('c'))
}

fn shift_enter() -> InputEvent {
    InputEvent::Key(KeyEvent::shift(Key::Enter))
}

/// Type `text` into the focal surface and press Enter.
fn submit(t: &mut Terminal, text: &str) {
    t.handle_events(InputEvent::typed(text));
    t.handle_event(key(Key::Enter));
}

fn lines(t: &Terminal) -> Vec<String> {
    t.output().iter().flat_map(OutputRecord::to_lines).collect()
}

fn errors(t: &Terminal) -> Vec<OutputRecord> {
    t.output()
        .into_iter()
        .filter(|r| matches!(r, OutputRecord::Error { .. }))
        .collect()
}

fn error_code(t: &Terminal) -> Option<Option<String>> {
    errors(t).last().map(|r| match r {
        OutputRecord::Error { code, .. } => code.clone(),
        _ => None,
    })
}

fn songs(names: &[&str]) -> Vec<FileHandle> {
    names.iter().map(|n| FileHandle::from_path(*n)).collect()
}

// -- Lifecycle --

#[test]
fn echo_prints_remainder_verbatim() {
    let (mut t, _) = terminal();
    submit(&mut t, "echo  hello   world");
    assert_eq!(
        t.output(),
        vec![
            OutputRecord::Command {
                user: "Guest".into(),
                symbol: "$".into(),
                input: "echo  hello   world".into(),
            },
            OutputRecord::line("hello   world"),
        ]
    );
    assert_eq!(t.input_mode(), InputMode::MainPromptActive);
    assert!(!t.is_busy());
}

#[test]
fn unknown_command_renders_one_terminal_error() {
    let (mut t, presenter) = terminal();
    submit(&mut t, "frobnicate");
    assert_eq!(
        errors(&t),
        vec![OutputRecord::Error {
            source: ENGINE_SOURCE.into(),
            code: None,
            details: "command not found...".into(),
        }]
    );
    assert_eq!(t.input_mode(), InputMode::MainPromptActive);
    assert_eq!(t.history(), vec!["frobnicate"]);
    assert!(matches!(
        presenter.calls().last(),
        Some(PresenterCall::ScrollToBottom)
    ));
    assert!(presenter
        .calls()
        .iter()
        .rev()
        .any(|c| matches!(c, PresenterCall::ShowMainPrompt { .. })));
}

#[test]
fn empty_line_is_a_no_op() {
    let (mut t, _) = terminal();
    t.handle_event(key(Key::Enter));
    assert!(errors(&t).is_empty());
    assert_eq!(t.input_mode(), InputMode::MainPromptActive);
}

#[test]
fn quiet_run_skips_echo() {
    let (mut t, _) = terminal();
    t.run_line("echo hi", true).unwrap();
    assert_eq!(t.output(), vec![OutputRecord::line("hi")]);
}

#[test]
fn alias_runs_the_same_command() {
    let (mut t, _) = terminal();
    submit(&mut t, "echo one");
    submit(&mut t, "cls");
    assert!(t.output().is_empty());
    submit(&mut t, "echo two");
    submit(&mut t, "clr");
    assert!(t.output().is_empty());
}

#[test]
fn command_names_are_sorted() {
    let (t, _) = terminal();
    assert_eq!(
        t.command_names(),
        vec![
            "clear", "config", "echo", "help", "music", "notes", "restart", "time", "welcome"
        ]
    );
}

#[test]
fn failing_command_is_reported_under_canonical_name() {
    let (mut t, _) = terminal();
    submit(&mut t, "note -l");
    let errs = errors(&t);
    assert_eq!(errs.len(), 1);
    assert!(matches!(
        &errs[0],
        OutputRecord::Error { source, code: None, .. } if source == "notes"
    ));
    assert_eq!(t.input_mode(), InputMode::MainPromptActive);
}

#[test]
fn duplicate_install_fails() {
    let (mut t, _) = terminal();
    let err = t.install(crate::commands::builtins()).unwrap_err();
    assert!(matches!(err, MirageError::DuplicateCommand(_)));
}

// -- Main prompt input --

#[test]
fn history_navigation_replaces_draft() {
    let (mut t, _) = terminal();
    submit(&mut t, "echo a");
    submit(&mut t, "echo b");
    t.handle_events(InputEvent::typed("half"));
    t.handle_event(key(Key::Up));
    assert_eq!(t.draft(), "echo b");
    t.handle_event(key(Key::Up));
    assert_eq!(t.draft(), "echo a");
    t.handle_event(key(Key::Up));
    assert_eq!(t.draft(), "echo a");
    t.handle_event(key(Key::Down));
    assert_eq!(t.draft(), "echo b");
    t.handle_event(key(Key::Down));
    assert_eq!(t.draft(), "echo b");
}

#[test]
fn history_keys_keep_draft_when_empty() {
    let (mut t, _) = terminal();
    t.handle_events(InputEvent::typed("typed"));
    t.handle_event(key(Key::Up));
    assert_eq!(t.draft(), "typed");
}

#[test]
fn history_is_capped_by_config() {
    let (mut t, _) = terminal();
    submit(&mut t, "config max_history=3");
    for line in ["a", "b", "c", "d"] {
        submit(&mut t, line);
    }
    assert_eq!(t.history(), vec!["d", "c", "b"]);
}

#[test]
fn tab_follows_tab_size() {
    let (mut t, _) = terminal();
    t.handle_event(key(Key::Tab));
    assert_eq!(t.draft(), "  ");
    submit(&mut t, "");
    submit(&mut t, "config tab_size=4");
    t.handle_event(key(Key::Tab));
    assert_eq!(t.draft(), "    ");
}

#[test]
fn ctrl_c_on_main_prompt_does_nothing() {
    let (mut t, _) = terminal();
    t.handle_events(InputEvent::typed("echo"));
    t.handle_event(ctrl_c());
    assert_eq!(t.draft(), "echo");
    assert!(t.output().is_empty());
}

// -- Sub-prompts and cancellation --

#[test]
fn welcome_sets_prompt_user_and_symbol() {
    let (mut t, _) = terminal();
    assert!(t.is_first_launch());
    t.run_line("welcome", true).unwrap();
    assert_eq!(t.input_mode(), InputMode::SubPromptActive(PromptKind::Line));
    submit(&mut t, "ada");
    assert!(t.output().contains(&OutputRecord::Input {
        label: Some("Enter your name:".into()),
        text: "ada".into(),
    }));
    submit(&mut t, "#");
    assert_eq!(t.input_mode(), InputMode::MainPromptActive);
    assert_eq!(t.config().prompt_user(), "ada");
    assert_eq!(t.config().prompt_symbol(), "#");
    submit(&mut t, "echo hi");
    assert!(lines(&t).contains(&"[ada] # echo hi".to_string()));
}

#[test]
fn main_prompt_is_disabled_while_prompting() {
    let (mut t, _) = terminal();
    t.run_line("welcome", true).unwrap();
    assert!(t.is_busy());
    assert!(matches!(t.run_line("echo x", false), Err(MirageError::Busy(_))));
    t.handle_event(key(Key::Up));
    assert_eq!(t.prompt_text().as_deref(), Some(""));
}

#[test]
fn ctrl_c_cancels_pending_prompt() {
    let (mut t, presenter) = terminal();
    t.run_line("welcome", true).unwrap();
    t.handle_events(InputEvent::typed("ad"));
    t.handle_event(ctrl_c());
    assert_eq!(t.input_mode(), InputMode::MainPromptActive);
    assert!(!t.is_busy());
    assert!(errors(&t).is_empty());
    assert_eq!(t.config().prompt_user(), "Guest");
    assert!(presenter.calls().contains(&PresenterCall::CloseSubPrompt));
    submit(&mut t, "echo after");
    assert!(lines(&t).contains(&"after".to_string()));
}

struct WaitCmd {
    seen: Rc<RefCell<Option<CancelToken>>>,
}

impl Command for WaitCmd {
    fn name(&self) -> &str {
        "wait"
    }
    fn run(&self, ctx: CommandContext) -> LocalBoxFuture<'static, CommandResult> {
        *self.seen.borrow_mut() = Some(ctx.cancel.clone());
        async move {
            let answer = ctx.session.read_char(Some("Continue?")).await?;
            ctx.session.print(&format!("got {answer}"));
            Ok(())
        }
        .boxed_local()
    }
}

#[test]
fn char_prompt_completes_on_alphanumeric() {
    let (mut t, _) = terminal();
    let seen = Rc::new(RefCell::new(None));
    t.install(vec![Rc::new(WaitCmd {
        seen: Rc::clone(&seen),
    })])
    .unwrap();
    submit(&mut t, "wait");
    assert_eq!(t.input_mode(), InputMode::SubPromptActive(PromptKind::Char));
    t.handle_event(key(Key::Char('?')));
    t.handle_event(key(Key::Enter));
    assert!(t.is_busy());
    t.handle_event(key(Key::Char('y')));
    assert!(!t.is_busy());
    assert!(lines(&t).contains(&"got y".to_string()));
}

#[test]
fn cancellation_marks_the_token() {
    let (mut t, _) = terminal();
    let seen = Rc::new(RefCell::new(None));
    t.install(vec![Rc::new(WaitCmd {
        seen: Rc::clone(&seen),
    })])
    .unwrap();
    submit(&mut t, "wait");
    let token = seen.borrow().clone().unwrap();
    assert!(!token.is_cancelled());
    t.handle_event(ctrl_c());
    assert!(token.is_cancelled());
    assert!(!lines(&t).iter().any(|l| l.starts_with("got")));
}

struct NestedCmd;

impl Command for NestedCmd {
    fn name(&self) -> &str {
        "nested"
    }
    fn run(&self, ctx: CommandContext) -> LocalBoxFuture<'static, CommandResult> {
        async move {
            ctx.session.invoke("echo inner").await?;
            ctx.session.invoke(&ctx.raw_args).await
        }
        .boxed_local()
    }
}

#[test]
fn nested_invoke_propagates_failure() {
    let (mut t, _) = terminal();
    t.install(vec![Rc::new(NestedCmd)]).unwrap();
    submit(&mut t, "nested frobnicate");
    assert!(lines(&t).contains(&"inner".to_string()));
    assert_eq!(
        errors(&t),
        vec![OutputRecord::Error {
            source: "nested".into(),
            code: None,
            details: "command not found...".into(),
        }]
    );
    assert_eq!(t.history(), vec!["nested frobnicate"]);
}

#[test]
fn time_prints_one_dated_line() {
    let (mut t, _) = terminal();
    submit(&mut t, "time");
    let out = lines(&t);
    assert_eq!(out.len(), 2);
    assert!(out[1].contains(" GMT"), "unexpected time line: {}", out[1]);
    assert!(errors(&t).is_empty());
}

// -- help --

#[test]
fn help_lists_visible_commands() {
    let (mut t, _) = terminal();
    submit(&mut t, "help");
    let out = lines(&t);
    assert!(out.contains(&"This is the help page. Here are the registered commands:".to_string()));
    assert!(out.contains(&"config".to_string()));
    assert!(!out.contains(&"welcome".to_string()));
    assert_eq!(out.last().map(String::as_str), Some(""));
}

#[test]
fn help_renders_sections() {
    let (mut t, _) = terminal();
    submit(&mut t, "help cls");
    let out = lines(&t);
    assert_eq!(out[1], "");
    assert!(out.contains(&"Command: clear".to_string()));
    assert!(out.contains(&"Usage:   clear [no-args]".to_string()));
}

#[test]
fn help_for_unknown_command_is_h01() {
    let (mut t, _) = terminal();
    submit(&mut t, "help frobnicate");
    assert_eq!(error_code(&t), Some(Some("H01".to_string())));
    submit(&mut t, "help welcome");
    assert_eq!(errors(&t).len(), 2);
}

// -- config --

#[test]
fn config_change_length_value() {
    let (mut t, presenter) = terminal();
    submit(&mut t, "config -c font_size=24px");
    assert!(errors(&t).is_empty());
    assert_eq!(t.config().get("font_size"), Some(&ConfigValue::text("24px")));
    assert!(lines(&t).contains(&"font_size change was successful".to_string()));
    assert!(presenter.calls().contains(&PresenterCall::ApplyStyle {
        key: "font_size".into(),
        value: ConfigValue::text("24px"),
    }));
}

#[test]
fn config_rejects_value_of_wrong_shape() {
    let (mut t, _) = terminal();
    submit(&mut t, "config -c font_size=tiny");
    assert_eq!(error_code(&t), Some(Some("C03".to_string())));
    assert_eq!(t.config().get("font_size"), Some(&ConfigValue::text("17px")));
}

#[test]
fn config_accepts_spaces_around_equals() {
    let (mut t, _) = terminal();
    submit(&mut t, "config background = #ffffff");
    assert_eq!(t.config().get("background"), Some(&ConfigValue::text("#ffffff")));
}

#[test]
fn config_usage_errors() {
    let (mut t, _) = terminal();
    submit(&mut t, "config -v -c");
    assert_eq!(error_code(&t), Some(Some("C01".to_string())));
    submit(&mut t, "config -c font_size");
    assert_eq!(error_code(&t), Some(Some("C04".to_string())));
    submit(&mut t, "config -c nope=1");
    assert_eq!(error_code(&t), Some(Some("C02".to_string())));
}

#[test]
fn config_view_lists_sorted_pairs() {
    let (mut t, _) = terminal();
    submit(&mut t, "config");
    let out = lines(&t);
    assert!(out.contains(&"Configuration data:".to_string()));
    let pairs: Vec<&String> = out.iter().filter(|l| l.starts_with(" * ")).collect();
    assert_eq!(pairs.len(), Config::default().keys().count());
    assert_eq!(pairs[0], " * background=#121212");
}

#[test]
fn config_number_value_is_stored_as_number() {
    let storage = MemoryStorage::new();
    let (mut t, _) = terminal_with(storage);
    submit(&mut t, "config max_buffer=20");
    assert_eq!(t.config().get("max_buffer"), Some(&ConfigValue::Number(20)));
    let stored = t.session().retrieve::<serde_json::Value>(STORAGE_KEY).unwrap();
    assert_eq!(stored.unwrap()["max_buffer"], json!(20));
}

#[test]
fn config_rejects_oversized_buffer_and_restart_survives() {
    let (mut t, _) = terminal();
    submit(&mut t, "config -c max_buffer=1000000000000000000");
    assert_eq!(error_code(&t), Some(Some("C03".to_string())));
    submit(&mut t, "config -c max_history=10001");
    assert_eq!(error_code(&t), Some(Some("C03".to_string())));
    submit(&mut t, "restart");
    assert_eq!(t.config().max_buffer(), 50);
    assert_eq!(t.input_mode(), InputMode::MainPromptActive);
    submit(&mut t, "echo alive");
    assert!(lines(&t).contains(&"alive".to_string()));
}

#[test]
fn oversized_stored_number_does_not_break_startup() {
    let mut storage = MemoryStorage::new();
    storage
        .store(STORAGE_KEY, &json!({"max_buffer": 1_000_000_000_000_000_000i64}))
        .unwrap();
    let (mut t, _) = terminal_with(storage);
    assert_eq!(t.config().max_buffer(), 50);
    submit(&mut t, "echo alive");
    assert!(lines(&t).contains(&"alive".to_string()));
}

#[test]
fn text_option_stays_text_after_length_like_value() {
    let (mut t, _) = terminal();
    submit(&mut t, "config -c prompt_user=12px");
    assert!(errors(&t).is_empty());
    submit(&mut t, "config -c prompt_user=Ada");
    assert!(errors(&t).is_empty());
    assert_eq!(t.config().prompt_user(), "Ada");
    submit(&mut t, "config -c prompt_user=#abc");
    submit(&mut t, "config -c prompt_user=Bob");
    assert!(errors(&t).is_empty());
    assert_eq!(t.config().prompt_user(), "Bob");
}

#[test]
fn config_persistence_failure_is_c05() {
    let mut storage = MemoryStorage::new();
    storage.set_read_only(true);
    let (mut t, _) = terminal_with(storage);
    submit(&mut t, "config -c font_size=24px");
    assert_eq!(error_code(&t), Some(Some("C05".to_string())));
    assert_eq!(t.config().get("font_size"), Some(&ConfigValue::text("17px")));
}

#[test]
fn config_reset_single_key() {
    let (mut t, _) = terminal();
    submit(&mut t, "config prompt_color=#000");
    submit(&mut t, "config -r prompt_color");
    assert_eq!(t.config().get("prompt_color"), Some(&ConfigValue::text("#4be14b")));
    assert!(lines(&t).contains(&"prompt_color was changed to default".to_string()));
}

#[test]
fn config_reset_all_restarts() {
    let (mut t, _) = terminal();
    submit(&mut t, "config font_size=30px");
    submit(&mut t, "config -r");
    assert_eq!(t.config(), Config::default());
    assert!(t.output().is_empty());
    assert!(t.history().is_empty());
    assert_eq!(t.input_mode(), InputMode::MainPromptActive);
}

#[test]
fn shrinking_max_buffer_evicts_oldest() {
    let (mut t, presenter) = terminal();
    for i in 0..4 {
        submit(&mut t, &format!("echo {i}"));
    }
    submit(&mut t, "config max_buffer=3");
    assert_eq!(t.output().len(), 3);
    assert_eq!(presenter.visible_len(), 3);
    assert_eq!(
        t.output().last(),
        Some(&OutputRecord::line("max_buffer change was successful"))
    );
}

// -- notes --

#[test]
fn notes_create_read_and_delete() {
    let (mut t, _) = terminal();
    submit(&mut t, "notes -l");
    assert!(matches!(
        errors(&t).last(),
        Some(OutputRecord::Error { details, .. }) if details.starts_with("You don't have any saved notes")
    ));

    submit(&mut t, "notes todo");
    assert_eq!(t.input_mode(), InputMode::SubPromptActive(PromptKind::Multiline));
    assert_eq!(t.prompt_text().as_deref(), Some("Title: todo"));
    t.handle_event(key(Key::Enter));
    t.handle_events(InputEvent::typed("milk"));
    t.handle_event(shift_enter());
    assert_eq!(t.input_mode(), InputMode::MainPromptActive);

    submit(&mut t, "clear");
    submit(&mut t, "notes todo");
    let out = lines(&t);
    assert!(out.contains(&"Title: todo".to_string()));
    assert!(out.contains(&"milk".to_string()));

    submit(&mut t, "notes -c todo");
    assert!(matches!(
        errors(&t).last(),
        Some(OutputRecord::Error { details, code: None, .. }) if details.starts_with("The note already exists")
    ));

    submit(&mut t, "nts -d todo");
    assert!(lines(&t).contains(&"[NOTES INFO]: Note deleted successfully...".to_string()));
    submit(&mut t, "notes -r todo");
    assert!(matches!(
        errors(&t).last(),
        Some(OutputRecord::Error { details, .. }) if details.starts_with("Note was not found")
    ));
}

#[test]
fn notes_edit_strips_blank_lines() {
    let (mut t, _) = terminal();
    submit(&mut t, "notes -c groceries");
    t.handle_event(key(Key::Enter));
    t.handle_events(InputEvent::typed("milk"));
    t.handle_event(shift_enter());

    submit(&mut t, "notes -e groceries");
    assert_eq!(t.prompt_text().as_deref(), Some("Title: groceries\nmilk"));
    t.handle_event(key(Key::Enter));
    t.handle_event(key(Key::Enter));
    t.handle_events(InputEvent::typed("eggs"));
    t.handle_event(shift_enter());
    assert!(lines(&t).contains(&"[NOTES INFO]: Note edit was successfully saved...".to_string()));

    let stored = t.session().retrieve::<serde_json::Value>("notes").unwrap().unwrap();
    assert_eq!(
        stored,
        json!({"list": [{"name": "groceries", "note": "Title: groceries\nmilk\neggs"}]})
    );
}

#[test]
fn notes_without_arguments_shows_help() {
    let (mut t, _) = terminal();
    submit(&mut t, "notes");
    assert!(lines(&t).contains(&"Command: notes".to_string()));
    assert!(errors(&t).is_empty());
}

// -- music --

fn music_player(t: &Terminal) -> Rc<Player> {
    t.session()
        .process(MUSIC_PROCESS)
        .unwrap()
        .data::<Player>()
        .unwrap()
}

#[test]
fn music_new_replaces_running_player() {
    let (mut t, _) = terminal();
    submit(&mut t, "music");
    assert_eq!(t.input_mode(), InputMode::SubPromptActive(PromptKind::FilePicker));
    t.handle_event(InputEvent::FilesSelected(songs(&["a.ogg", "b.ogg", "c.ogg"])));
    assert_eq!(t.process_names(), vec![MUSIC_PROCESS]);
    let last = lines(&t).last().cloned().unwrap();
    assert!(last.starts_with("Playing ") && last.ends_with(" and 2 more ..."));

    submit(&mut t, "music new");
    t.handle_event(InputEvent::FilesSelected(songs(&["d.ogg"])));
    assert!(errors(&t).is_empty());
    assert_eq!(t.process_names(), vec![MUSIC_PROCESS]);
    assert_eq!(lines(&t).last().map(String::as_str), Some("Playing d ..."));
    assert_eq!(music_player(&t).files(), songs(&["d.ogg"]));
}

#[test]
fn music_actions_drive_player_state() {
    let (mut t, _) = terminal();
    submit(&mut t, "music new");
    t.handle_event(InputEvent::FilesSelected(songs(&["a.ogg", "b.ogg"])));
    let player = music_player(&t);
    assert_eq!(player.playback(), Playback::Playing);
    submit(&mut t, "music pause");
    assert_eq!(player.playback(), Playback::Paused);
    submit(&mut t, "music list");
    assert!(lines(&t).iter().any(|l| l.starts_with("0 - ")));
    submit(&mut t, "music end");
    assert!(t.process_names().is_empty());
    assert_eq!(player.playback(), Playback::Stopped);
}

#[test]
fn music_without_songs_fails() {
    let (mut t, _) = terminal();
    submit(&mut t, "music play");
    assert!(matches!(
        errors(&t).last(),
        Some(OutputRecord::Error { source, code: None, details })
            if source == "music" && details.starts_with("there are no songs loaded")
    ));
    submit(&mut t, "music");
    t.handle_event(InputEvent::PickerDismissed);
    assert_eq!(errors(&t).len(), 2);
    assert!(t.process_names().is_empty());
    submit(&mut t, "music louder");
    assert!(matches!(
        errors(&t).last(),
        Some(OutputRecord::Error { details, .. }) if details.starts_with("invalid action")
    ));
}

// -- restart and startup --

#[test]
fn restart_clears_session_and_reloads_config() {
    let (mut t, _) = terminal();
    submit(&mut t, "config prompt_user=ada");
    submit(&mut t, "music");
    t.handle_event(InputEvent::FilesSelected(songs(&["a.ogg"])));
    submit(&mut t, "rs");
    assert!(t.output().is_empty());
    assert!(t.history().is_empty());
    assert!(t.process_names().is_empty());
    assert_eq!(t.config().prompt_user(), "ada");
    assert_eq!(t.input_mode(), InputMode::MainPromptActive);
}

#[test]
fn stored_config_means_no_first_launch() {
    let mut storage = MemoryStorage::new();
    storage
        .store(STORAGE_KEY, &json!({"prompt_symbol": ">"}))
        .unwrap();
    let (mut t, _) = terminal_with(storage);
    assert!(!t.is_first_launch());
    submit(&mut t, "echo x");
    assert_eq!(lines(&t)[0], "[Guest] > echo x");
}

#[test]
fn custom_defaults_apply() {
    let presenter = RecordingPresenter::new();
    let defaults = Config::from_toml("prompt_user = \"root\"\nmax_history = 2").unwrap();
    let mut t = Terminal::with_defaults(
        Box::new(MemoryStorage::new()),
        Box::new(presenter.clone()),
        defaults,
    );
    t.install(crate::commands::builtins()).unwrap();
    submit(&mut t, "echo a");
    submit(&mut t, "echo b");
    submit(&mut t, "echo c");
    assert_eq!(t.history().len(), 2);
    assert_eq!(lines(&t)[0], "[root] $ echo a");
    assert!(presenter.calls().contains(&PresenterCall::ShowMainPrompt {
        user: "root".into(),
        symbol: "$".into(),
    }));
}
