//! `config`: view, change or reset the terminal configuration.

use futures::future::LocalBoxFuture;
use futures::FutureExt;
use mirage_types::config::ValueKind;
use mirage_types::error::{CommandError, CommandResult, ErrorKind};

use super::split_flag;
use crate::registry::Command;
use crate::session::{CommandContext, SessionHandle};

fn c01() -> CommandError {
    CommandError::with_code(
        ErrorKind::InvalidUsage,
        "C01",
        "invalid use of command, run \"help config\" for more details",
    )
}

fn c02() -> CommandError {
    CommandError::with_code(
        ErrorKind::InvalidConfigKey,
        "C02",
        "invalid key, run \"config\" or \"config -v\" to see all available configuration",
    )
}

fn c03() -> CommandError {
    CommandError::with_code(
        ErrorKind::InvalidConfigValue,
        "C03",
        "invalid given value, try checking your input",
    )
}

fn c04() -> CommandError {
    CommandError::with_code(
        ErrorKind::InvalidConfigPair,
        "C04",
        "invalid key=value pair, try checking your input. Make sure to add \"=\" in between",
    )
}

fn c05() -> CommandError {
    CommandError::with_code(
        ErrorKind::PersistenceFailure,
        "C05",
        "error occurred while changing the configuration, please try again",
    )
}

pub(super) struct ConfigCmd;
impl Command for ConfigCmd {
    fn name(&self) -> &str {
        "config"
    }
    fn help(&self) -> Option<&str> {
        Some(
            "~Command Help:\
             ~~Command: config\
             ~Details: Change or view the terminal's configuration.\
             ~Usage:   config [command] [key=value pair]\
             ~Commands:\
             ~~    -v   view the configuration.\
             ~    -c   change a value of a key\
             ~    -r   resets the whole configuration or a specific key.\
             ~~To change a key in the configuration, specify the key and the new value. Colors and \
              measurements must be valid CSS values.\
             ~~    config -c background=#ffffff\
             ~    config font_size = 24px\
             ~    config -c foreground= rgb(17, 17, 17)\
             ~    config prompt_symbol = #\
             ~~There are two ways to view all configuration:\
             ~~    config\
             ~    config -v\
             ~~To reset a specific configuration, specify the key:\
             ~~    config -r prompt_color\
             ~~To reset the whole configuration, run without a key:\
             ~~    config -r~",
        )
    }
    fn run(&self, ctx: CommandContext) -> LocalBoxFuture<'static, CommandResult> {
        async move { configure(&ctx.session, &ctx.args).await }.boxed_local()
    }
}

async fn configure(session: &SessionHandle, args: &[String]) -> CommandResult {
    let (flag, rest) =
        split_flag(args, |a| matches!(a, "-v" | "-c" | "-r")).ok_or_else(c01)?;
    // Spaces around '=' are allowed: the remaining words are glued together.
    let pair = rest.concat();
    match flag {
        Some("-v") => view(session),
        Some("-c") => change(session, &pair),
        Some(_) => reset(session, &pair).await,
        None if pair.is_empty() => view(session),
        None => change(session, &pair),
    }
}

fn view(session: &SessionHandle) -> CommandResult {
    session.new_line();
    session.print("Configuration data:");
    session.new_line();
    for (key, value) in session.config().iter() {
        session.print(&format!(" * {key}={}", value.to_string().trim()));
    }
    session.new_line();
    Ok(())
}

fn change(session: &SessionHandle, pair: &str) -> CommandResult {
    let Some((key, raw)) = pair.split_once('=') else {
        return Err(c04());
    };
    let config = session.config();
    if !config.contains_key(key) {
        return Err(c02());
    }
    // The option's kind comes from its default, so an accepted value never
    // changes which values are accepted next.
    let value = match session.default_value(key) {
        Some(default) => ValueKind::of(&default).parse(raw),
        None => config.parse_value(key, raw),
    }
    .ok_or_else(c03)?;
    session.set_config(key, value).map_err(|e| {
        log::warn!("config change of '{key}' failed: {e}");
        c05()
    })?;
    session.print(&format!("{key} change was successful"));
    Ok(())
}

async fn reset(session: &SessionHandle, pair: &str) -> CommandResult {
    if pair.is_empty() {
        session.store_default_config().map_err(|e| {
            log::warn!("config reset failed: {e}");
            c05()
        })?;
        return session.invoke("restart").await;
    }
    let key = pair.split('=').next().unwrap_or(pair);
    let value = session.default_value(key).ok_or_else(c02)?;
    session.set_config(key, value).map_err(|e| {
        log::warn!("config reset of '{key}' failed: {e}");
        c05()
    })?;
    session.print(&format!("{key} was changed to default"));
    Ok(())
}
