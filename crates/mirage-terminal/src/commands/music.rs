//! `music`: a playlist player kept alive in the process registry.
//!
//! Only the player state is modelled; producing sound is up to the host.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use futures::future::LocalBoxFuture;
use futures::FutureExt;
use mirage_types::error::{CommandError, CommandResult, ErrorKind};
use mirage_types::input::FileHandle;

use crate::registry::Command;
use crate::session::{CommandContext, SessionHandle};

/// Process name the player registers under.
pub const MUSIC_PROCESS: &str = "music";

/// Knuth multiplicative hash constant (2^32 / phi).
const HASH_MULT: u32 = 2_654_435_761;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Playback {
    Playing,
    Paused,
    Stopped,
}

#[derive(Debug)]
struct PlayerState {
    files: Vec<FileHandle>,
    index: usize,
    playback: Playback,
}

/// A shuffled playlist and its playback position.
#[derive(Debug)]
pub struct Player {
    state: RefCell<PlayerState>,
}

impl Player {
    fn new(files: Vec<FileHandle>) -> Self {
        Self {
            state: RefCell::new(PlayerState {
                files,
                index: 0,
                playback: Playback::Playing,
            }),
        }
    }

    pub fn playback(&self) -> Playback {
        self.state.borrow().playback
    }

    pub fn current(&self) -> Option<FileHandle> {
        let st = self.state.borrow();
        st.files.get(st.index).cloned()
    }

    pub fn files(&self) -> Vec<FileHandle> {
        self.state.borrow().files.clone()
    }

    fn set(&self, playback: Playback) {
        self.state.borrow_mut().playback = playback;
    }

    /// Skip to the next song; running off the end stops playback.
    fn next(&self) {
        let mut st = self.state.borrow_mut();
        if st.files.len() > 1 && st.index + 1 >= st.files.len() {
            st.playback = Playback::Stopped;
            return;
        }
        if st.files.len() > 1 {
            st.index += 1;
        }
        st.playback = Playback::Playing;
    }

    fn prev(&self) {
        let mut st = self.state.borrow_mut();
        st.index = st.index.saturating_sub(1);
        st.playback = Playback::Playing;
    }
}

fn m01() -> CommandError {
    CommandError::new(
        ErrorKind::InvalidUsage,
        "there are no songs loaded, check the help command for more details",
    )
}

fn m02() -> CommandError {
    CommandError::new(
        ErrorKind::InvalidUsage,
        "invalid action, check the help command for more details",
    )
}

fn hash_step(seed: u32) -> u32 {
    let mut h = seed.wrapping_mul(HASH_MULT);
    h ^= h >> 16;
    h = h.wrapping_mul(0x45d9f3b);
    h ^= h >> 16;
    h
}

/// Fisher-Yates shuffle driven by `hash_step`.
fn shuffle<T>(items: &mut [T], seed: u32) {
    let mut h = seed;
    for i in (1..items.len()).rev() {
        h = hash_step(h ^ i as u32);
        let j = h as usize % (i + 1);
        items.swap(i, j);
    }
}

fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(0)
}

pub(super) struct MusicCmd;
impl Command for MusicCmd {
    fn name(&self) -> &str {
        "music"
    }
    fn help(&self) -> Option<&str> {
        Some(
            "~Command Help\
             ~~Command: music\
             ~Details: plays song/s from the user's machine.\
             ~Usage:   music [command]\
             ~Commands:\
             ~    play, pause, stop, next, prev, list, new, end~",
        )
    }
    fn run(&self, ctx: CommandContext) -> LocalBoxFuture<'static, CommandResult> {
        async move {
            let action = ctx.args.first().map(String::as_str).unwrap_or("");
            music(&ctx.session, action).await
        }
        .boxed_local()
    }
}

fn player(session: &SessionHandle) -> Option<Rc<Player>> {
    session
        .process(MUSIC_PROCESS)
        .ok()
        .and_then(|entry| entry.data::<Player>())
}

fn loaded(session: &SessionHandle) -> Result<Rc<Player>, CommandError> {
    player(session)
        .filter(|p| !p.state.borrow().files.is_empty())
        .ok_or_else(m01)
}

async fn music(session: &SessionHandle, action: &str) -> CommandResult {
    match action {
        "play" => loaded(session)?.set(Playback::Playing),
        "pause" => loaded(session)?.set(Playback::Paused),
        "stop" => loaded(session)?.set(Playback::Stopped),
        "next" => loaded(session)?.next(),
        "prev" => loaded(session)?.prev(),
        "list" => {
            for (i, f) in loaded(session)?.files().iter().enumerate() {
                session.print(&format!("{i} - {}", f.name));
            }
        },
        "new" | "" => start(session).await?,
        "end" => end(session),
        _ => return Err(m02()),
    }
    Ok(())
}

/// Pick files, replace any running player, and start playing.
async fn start(session: &SessionHandle) -> CommandResult {
    let mut files = session.read_files(true, &["audio/*"]).await?;
    if files.is_empty() {
        return Err(m01());
    }
    end(session);
    shuffle(&mut files, clock_seed());

    let title = files[0].stem().to_string();
    let more = files.len() - 1;
    let player = Rc::new(Player::new(files));
    session.register_process(MUSIC_PROCESS, player)?;
    if more > 0 {
        session.print(&format!("Playing {title} and {more} more ..."));
    } else {
        session.print(&format!("Playing {title} ..."));
    }
    log::info!("Music player started with {} songs", more + 1);
    Ok(())
}

/// Stop and unregister the player, if any.
fn end(session: &SessionHandle) {
    if let Some(old) = session.end_process(MUSIC_PROCESS)
        && let Some(player) = old.data::<Player>()
    {
        player.set(Playback::Stopped);
    }
}
