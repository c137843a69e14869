use crate::display::TerminalDisplay;
use lyricplayer_core::{LyricsOrigin, PlayerEvent};
use std::io::Write;
use tokio::sync::broadcast;
use tracing::{debug, info};

const LOG_TARGET: &str = "lyricplayer::bridge";

/// Forward player events to the terminal display until the player is dropped.
pub async fn run_display_bridge<W: Write>(
    mut rx: broadcast::Receiver<PlayerEvent>,
    mut display: TerminalDisplay<W>,
) {
    loop {
        match rx.recv().await {
            Ok(event) => {
                handle_player_event(&event, &mut display);
            }
            Err(broadcast::error::RecvError::Closed) => {
                info!(target: LOG_TARGET, "Player event channel closed");
                break;
            }
            Err(broadcast::error::RecvError::Lagged(n)) => {
                info!(target: LOG_TARGET, "Missed {} player events", n);
            }
        }
    }
}

fn handle_player_event<W: Write>(event: &PlayerEvent, display: &mut TerminalDisplay<W>) {
    match event {
        PlayerEvent::SongSelected { song, can_go_back } => {
            display.now_playing(song, *can_go_back);
        }
        PlayerEvent::LyricsLoaded { origin, track, .. } => {
            if *origin == LyricsOrigin::Fallback {
                info!(
                    target: LOG_TARGET,
                    "Showing demonstration lyrics ({} lines)",
                    track.len()
                );
            }
        }
        PlayerEvent::SeekRequested { index, time } => {
            debug!(target: LOG_TARGET, "Seek to line {} ({:.2}s)", index + 1, time);
        }
        PlayerEvent::LineChanged { transition, time } if transition.is_backward() => {
            debug!(
                target: LOG_TARGET,
                "Jumped back to line {:?} at {:.2}s",
                transition.current.map(|index| index + 1),
                time
            );
        }
        PlayerEvent::LyricsUnavailable { .. }
        | PlayerEvent::LineChanged { .. }
        | PlayerEvent::ReturnedHome => {}
    }

    event.dispatch(display);
}

#[cfg(test)]
mod tests {
    use super::*;
    use lyricplayer_core::{Catalog, LoadedLyrics, LyricLine, LyricTrack, Player, Song};

    fn song(id: u32, title: &str) -> Song {
        Song {
            id,
            title: title.to_string(),
            artist: "Tester".to_string(),
            audio_file: format!("songs/{id}.mp3"),
            lyrics_file: format!("songs/lrcs/{id}.lrc"),
            cover: String::new(),
        }
    }

    #[tokio::test]
    async fn test_bridge_renders_player_events() {
        let catalog = Catalog::new(vec![song(1, "First"), song(2, "Second")]).unwrap();
        let mut player = Player::new(catalog);
        let rx = player.subscribe();

        let request = player.select_song(1).unwrap();
        let track = LyricTrack::from(vec![
            LyricLine::new(0.0, "hello"),
            LyricLine::new(2.0, "world"),
        ]);
        assert!(player.complete_lyrics(request.token, LoadedLyrics::fetched(track)));
        player.time_update(2.5);
        player.go_home();
        drop(player);

        let mut out = Vec::new();
        run_display_bridge(rx, TerminalDisplay::new(&mut out)).await;

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Now playing: First - Tester"));
        assert!(text.contains("2 lyric lines"));
        assert!(text.contains("▶   2  [00:02.00]  world"));
        assert!(text.ends_with("Select a song to see its lyrics\n"));
    }
}
