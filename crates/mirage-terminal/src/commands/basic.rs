//! Small session commands: clear, echo, help, restart, welcome, time.

use std::fmt;

use chrono::{DateTime, Local, TimeZone};
use futures::future::LocalBoxFuture;
use futures::FutureExt;
use mirage_types::config::{ConfigValue, PROMPT_SYMBOL, PROMPT_USER};
use mirage_types::error::{CommandError, CommandResult, ErrorKind};

use super::render_help;
use crate::registry::Command;
use crate::session::CommandContext;

// ---------------------------------------------------------------------------
// clear
// ---------------------------------------------------------------------------

pub(super) struct ClearCmd;
impl Command for ClearCmd {
    fn name(&self) -> &str {
        "clear"
    }
    fn aliases(&self) -> &[&str] {
        &["cls", "clr"]
    }
    fn help(&self) -> Option<&str> {
        Some(
            "~Command Help\
             ~~Command: clear\
             ~Aliases: cls, clr\
             ~Details: resets the terminal's buffer and clears the screen.\
             ~Usage:   clear [no-args]~",
        )
    }
    fn run(&self, ctx: CommandContext) -> LocalBoxFuture<'static, CommandResult> {
        ctx.session.clear();
        futures::future::ready(Ok(())).boxed_local()
    }
}

// ---------------------------------------------------------------------------
// echo
// ---------------------------------------------------------------------------

pub(super) struct EchoCmd;
impl Command for EchoCmd {
    fn name(&self) -> &str {
        "echo"
    }
    fn help(&self) -> Option<&str> {
        Some(
            "~Command Help\
             ~~Command: echo\
             ~Details: prints a string on the terminal.\
             ~Usage:   echo string~",
        )
    }
    fn run(&self, ctx: CommandContext) -> LocalBoxFuture<'static, CommandResult> {
        ctx.session.print(&ctx.raw_args);
        futures::future::ready(Ok(())).boxed_local()
    }
}

// ---------------------------------------------------------------------------
// help
// ---------------------------------------------------------------------------

pub(super) struct HelpCmd;
impl Command for HelpCmd {
    fn name(&self) -> &str {
        "help"
    }
    fn help(&self) -> Option<&str> {
        Some(
            "~Command Help\
             ~~Command: help\
             ~Details: displays all registered commands or the manual of a specific command.\
             ~Usage:   help [command]~",
        )
    }
    fn run(&self, ctx: CommandContext) -> LocalBoxFuture<'static, CommandResult> {
        let session = ctx.session;
        let result = match ctx.args.first() {
            None => {
                session.new_line();
                session.print("This is the help page. Here are the registered commands:");
                session.new_line();
                for name in session.command_names() {
                    session.print(&name);
                }
                session.new_line();
                session.print("Type 'help [command]' for more info");
                session.new_line();
                Ok(())
            },
            Some(name) => match session.command_help(name) {
                Ok(text) => {
                    render_help(&session, &text);
                    Ok(())
                },
                Err(_) => Err(CommandError::with_code(
                    ErrorKind::NotFound,
                    "H01",
                    "cannot find command or command doesn't have a manual...",
                )),
            },
        };
        futures::future::ready(result).boxed_local()
    }
}

// ---------------------------------------------------------------------------
// restart
// ---------------------------------------------------------------------------

pub(super) struct RestartCmd;
impl Command for RestartCmd {
    fn name(&self) -> &str {
        "restart"
    }
    fn aliases(&self) -> &[&str] {
        &["rs"]
    }
    fn help(&self) -> Option<&str> {
        Some(
            "~Command help\
             ~~Command: restart\
             ~Aliases: rs\
             ~Details: restart the terminal\
             ~Usage:   restart [no-args]~",
        )
    }
    fn run(&self, ctx: CommandContext) -> LocalBoxFuture<'static, CommandResult> {
        ctx.session.print("restarting...");
        ctx.session.restart();
        futures::future::ready(Ok(())).boxed_local()
    }
}

// ---------------------------------------------------------------------------
// welcome
// ---------------------------------------------------------------------------

/// First-launch greeting that asks for the prompt user and symbol.
pub(super) struct WelcomeCmd;
impl Command for WelcomeCmd {
    fn name(&self) -> &str {
        "welcome"
    }
    fn hidden(&self) -> bool {
        true
    }
    fn run(&self, ctx: CommandContext) -> LocalBoxFuture<'static, CommandResult> {
        let session = ctx.session;
        async move {
            let name = session.read_line(Some("Enter your name:")).await?;
            let symbol = session
                .read_line(Some("Enter a prompt symbol (e.g. #, $, ~$, etc.):"))
                .await?;
            // Blank answers keep the current value.
            if !name.trim().is_empty() {
                session.set_config(PROMPT_USER, ConfigValue::text(name.trim()))?;
            }
            if !symbol.trim().is_empty() {
                session.set_config(PROMPT_SYMBOL, ConfigValue::text(symbol.trim()))?;
            }
            Ok(())
        }
        .boxed_local()
    }
}

// ---------------------------------------------------------------------------
// time
// ---------------------------------------------------------------------------

pub(super) struct TimeCmd;
impl Command for TimeCmd {
    fn name(&self) -> &str {
        "time"
    }
    fn help(&self) -> Option<&str> {
        Some(
            "~Command Help\
             ~~Command: time\
             ~Details:  get current time and date\
             ~Usage:    time~",
        )
    }
    fn run(&self, ctx: CommandContext) -> LocalBoxFuture<'static, CommandResult> {
        ctx.session.print(&format_time(&Local::now()));
        futures::future::ready(Ok(())).boxed_local()
    }
}

/// Date and time as `Tue Mar 05 2024 14:03:09 GMT+0100`.
fn format_time<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    now.format("%a %b %d %Y %H:%M:%S GMT%z").to_string()
}
