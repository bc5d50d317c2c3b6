//! Execution lifecycle of one submitted line.
//!
//! The body of a resolved command is raced against the cancellation signal;
//! whichever settles first wins. Whatever the outcome, the main prompt is
//! restored afterwards.

use futures::channel::oneshot;
use futures::future::{self, Either};
use mirage_types::error::CommandError;

use crate::output::OutputRecord;
use crate::session::{CancelToken, CommandContext, Running, SessionHandle};

/// Source of engine-level errors.
pub const ENGINE_SOURCE: &str = "Terminal";

/// Split a line into the command token and the raw remainder.
pub(crate) fn split_command(line: &str) -> (&str, &str) {
    let line = line.trim();
    match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim_start()),
        None => (line, ""),
    }
}

/// Run one line in command position.
///
/// The caller has already marked the session busy and taken focus away from
/// the main prompt.
pub(crate) async fn run_line(session: SessionHandle, raw: String, quiet: bool) {
    let (token, raw_args) = split_command(&raw);

    let resolved = session.with(|st| {
        if !quiet {
            st.echo_command(&raw);
        }
        st.history.push(&raw);
        st.registry
            .canonical_name(token)
            .map(str::to_string)
            .zip(st.registry.resolve(token))
    });

    match resolved {
        _ if token.is_empty() => {},
        None => {
            log::debug!("Unknown command '{token}'");
            session.with(|st| {
                st.emit(OutputRecord::Error {
                    source: ENGINE_SOURCE.to_string(),
                    code: None,
                    details: "command not found...".to_string(),
                })
            });
        },
        Some((name, command)) => {
            let (signal, cancelled) = oneshot::channel();
            let cancel = CancelToken::new();
            session.with(|st| {
                st.hide_main_prompt();
                st.running = Some(Running {
                    signal: Some(signal),
                    token: cancel.clone(),
                });
            });

            log::debug!("Running '{name}'");
            let body = command.run(CommandContext {
                name: name.clone(),
                args: raw_args.split_whitespace().map(str::to_string).collect(),
                raw_args: raw_args.to_string(),
                session: session.clone(),
                cancel: cancel.clone(),
            });

            match future::select(body, cancelled).await {
                Either::Left((Ok(()), _)) => log::debug!("'{name}' finished"),
                Either::Left((Err(err), _)) => report_failure(&session, &name, &err),
                Either::Right((_, body)) => {
                    cancel.cancel();
                    drop(body);
                    log::info!("'{name}' cancelled");
                },
            }
        },
    }

    session.with(|st| {
        st.running = None;
        st.busy = false;
        st.restore_main_prompt();
    });
}

fn report_failure(session: &SessionHandle, name: &str, err: &CommandError) {
    // A read abandoned by a cancelled prompt is not a failure worth showing.
    if err.is_cancelled() {
        log::info!("'{name}' stopped: {err}");
        return;
    }
    log::warn!("'{name}' failed ({}): {err}", err.kind);
    session.with(|st| st.emit_error(name, err));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_name_and_remainder() {
        assert_eq!(split_command("echo  hello   world"), ("echo", "hello   world"));
    }

    #[test]
    fn split_trims_outer_whitespace() {
        assert_eq!(split_command("   help   "), ("help", ""));
    }

    #[test]
    fn split_empty_line() {
        assert_eq!(split_command(""), ("", ""));
        assert_eq!(split_command("   "), ("", ""));
    }

    #[test]
    fn split_on_tab() {
        assert_eq!(split_command("config\t-v"), ("config", "-v"));
    }
}
