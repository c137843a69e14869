use crate::command::{Command, HELP};
use crate::display::render_lines;
use lyricplayer_core::{
    LoadedLyrics, LyricsLoader, LyricsRequest, MediaClock, PlaybackClock, PlaybackConfig, Player,
    RequestToken, SecondsExt, Song,
};
use std::io::{self, Write};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

const LOG_TARGET: &str = "lyricplayer::app";

/// Whether the command loop should keep going
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Drives the player: ticks the clock, runs commands and applies fetched
/// lyrics.
///
/// The player is only ever touched from the task running [`App::run`].
pub struct App {
    player: Player,
    clock: MediaClock,
    loader: Arc<LyricsLoader>,
    playback: PlaybackConfig,
    lyrics_tx: mpsc::UnboundedSender<(RequestToken, LoadedLyrics)>,
    lyrics_rx: mpsc::UnboundedReceiver<(RequestToken, LoadedLyrics)>,
}

impl App {
    pub fn new(player: Player, loader: Arc<LyricsLoader>, playback: PlaybackConfig) -> Self {
        let (lyrics_tx, lyrics_rx) = mpsc::unbounded_channel();

        Self {
            player,
            clock: MediaClock::new(),
            loader,
            playback,
            lyrics_tx,
            lyrics_rx,
        }
    }

    /// Run until `quit`, end of input or cancellation
    pub async fn run(&mut self, cancel_token: CancellationToken) {
        let mut ticker = tokio::time::interval(self.playback.tick_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        info!(
            target: LOG_TARGET,
            "Ready ({} songs, tick {:?})",
            self.player.catalog().len(),
            self.playback.tick_interval()
        );
        println!("Type `help` for commands.");

        loop {
            tokio::select! {
                () = cancel_token.cancelled() => {
                    info!(target: LOG_TARGET, "Shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    self.tick();
                }
                Some((token, lyrics)) = self.lyrics_rx.recv() => {
                    self.player.complete_lyrics(token, lyrics);
                }
                line = lines.next_line() => match line {
                    Ok(Some(line)) => {
                        if self.handle_input(&line) == Flow::Quit {
                            break;
                        }
                    }
                    Ok(None) => {
                        info!(target: LOG_TARGET, "Input closed");
                        break;
                    }
                    Err(e) => {
                        error!(target: LOG_TARGET, "Failed to read input: {}", e);
                        break;
                    }
                },
            }
        }
    }

    /// Report the clock position to the player
    fn tick(&mut self) {
        if self.player.is_home() {
            return;
        }
        self.player.time_update(self.clock.current_time());
    }

    fn handle_input(&mut self, line: &str) -> Flow {
        if line.trim().is_empty() {
            return Flow::Continue;
        }
        match line.parse::<Command>() {
            Ok(command) => self.handle(command),
            Err(e) => {
                println!("{e}");
                Flow::Continue
            }
        }
    }

    /// Execute one command
    pub fn handle(&mut self, command: Command) -> Flow {
        debug!(target: LOG_TARGET, "Command: {:?}", command);

        match command {
            Command::List => {
                let current = self.player.current_song().map(|song| song.id);
                print_songs(self.player.catalog().songs().iter(), current);
            }
            Command::Search(query) => {
                let found = self.player.catalog().search(&query);
                if found.is_empty() {
                    println!("No songs match \"{query}\"");
                } else {
                    let current = self.player.current_song().map(|song| song.id);
                    print_songs(found.into_iter(), current);
                }
            }
            Command::Play(id) => match self.player.select_song(id) {
                Ok(request) => self.start(request),
                Err(e) => println!("{e}"),
            },
            Command::Previous => match self.player.play_previous() {
                Some(request) => self.start(request),
                None => println!("No previous song"),
            },
            Command::Home => {
                self.clock.unload();
                self.player.go_home();
            }
            Command::Pause => self.clock.pause(),
            Command::Resume => {
                if self.player.is_home() {
                    println!("Nothing is playing");
                } else {
                    self.clock.play();
                }
            }
            Command::Seek(seconds) => {
                if self.player.is_home() {
                    println!("Nothing is playing");
                } else {
                    self.clock.seek_to(seconds);
                }
            }
            Command::Line(number) => {
                // Displayed line numbers start at 1
                match number
                    .checked_sub(1)
                    .and_then(|index| self.player.seek_to_line(index))
                {
                    Some(time) => self.clock.seek_to(time),
                    None => println!("No line {number}"),
                }
            }
            Command::Lyrics => self.print_lyrics(),
            Command::Status => self.print_status(),
            Command::Help => println!("{HELP}"),
            Command::Quit => return Flow::Quit,
        }

        Flow::Continue
    }

    /// Restart the clock for a newly current song and fetch its lyrics in
    /// the background
    fn start(&mut self, request: LyricsRequest) {
        self.clock.load(None);
        if self.playback.autoplay {
            self.clock.play();
        }

        let loader = Arc::clone(&self.loader);
        let tx = self.lyrics_tx.clone();
        tokio::spawn(async move {
            let lyrics = loader.load(request.location()).await;
            // The app may have shut down in the meantime
            let _ = tx.send((request.token, lyrics));
        });
    }

    fn print_lyrics(&self) {
        let tracker = self.player.tracker();
        let Some(track) = tracker.track() else {
            println!("No lyrics loaded");
            return;
        };
        if track.is_empty() {
            println!("🎵 No lyrics available");
            return;
        }

        let mut out = io::stdout().lock();
        let _ = render_lines(&mut out, 0, track.lines(), tracker.active_index());
        let _ = out.flush();
    }

    fn print_status(&self) {
        let Some(song) = self.player.current_song() else {
            println!("Nothing is playing");
            return;
        };

        let state = if self.clock.is_ended() {
            "ended"
        } else if self.clock.is_playing() {
            "playing"
        } else {
            "paused"
        };
        println!(
            "{} - {} [{}] {}",
            song.title,
            song.artist,
            self.clock.current_time().to_timestamp(),
            state
        );
        if let Some(line) = self.player.tracker().active_line() {
            println!("  ▶ {}", line.text);
        }
    }
}

fn print_songs<'a>(songs: impl Iterator<Item = &'a Song>, current: Option<u32>) {
    for song in songs {
        let marker = if Some(song.id) == current { '♪' } else { ' ' };
        println!("{marker} {:>3}  {} - {}", song.id, song.title, song.artist);
    }
}
