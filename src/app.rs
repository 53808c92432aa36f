//! The interactive loop: terminal setup, frame pacing and the wiring between
//! input, simulation, audio and rendering.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute, queue, terminal,
};
use tracing::debug;

use crate::audio::Audio;
use crate::game::Game;
use crate::input;
use crate::render::Renderer;

/// Raw mode, alternate screen and mouse capture for as long as it lives.
pub struct TerminalGuard;

impl TerminalGuard {
    pub fn enter(out: &mut impl Write) -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(
            out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::DisableLineWrap,
            EnableMouseCapture,
        )?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(
            io::stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show,
            terminal::EnableLineWrap,
        );
        let _ = terminal::disable_raw_mode();
    }
}

/// Frame time since the previous frame, capped so a stall (a suspended
/// process, a slow terminal) cannot tunnel the avatar through the ground.
pub fn clamp_delta(elapsed: Duration, max: Duration) -> Duration {
    if elapsed > max {
        debug!(elapsed_ms = elapsed.as_millis() as u64, "long frame clamped");
        max
    } else {
        elapsed
    }
}

/// Runs until the game stops.
pub fn run(game: &mut Game, audio: &Audio, out: &mut impl Write) -> io::Result<()> {
    let (cols, rows) = terminal::size()?;
    let mut renderer = Renderer::new(
        game.config().screen.width as usize,
        game.config().screen.height as usize,
        cols,
        rows,
    );
    let frame_dur = game.config().frame_duration();
    let max_dt = game.config().max_frame_delta();
    let mut last = Instant::now();

    while game.is_running() {
        let frame_start = Instant::now();
        let dt = clamp_delta(frame_start - last, max_dt);
        last = frame_start;

        // Input
        while event::poll(Duration::ZERO)? {
            let ev = event::read()?;
            if let Event::Resize(c, r) = ev {
                renderer.resize(c, r);
                queue!(out, terminal::Clear(terminal::ClearType::All))?;
            }
            if let Some(input) = input::translate(&ev, renderer.viewport()) {
                game.handle(input);
            }
        }
        if !game.is_running() {
            break;
        }

        // Update
        game.step(dt);
        for sfx in game.take_sfx() {
            audio.play(sfx);
        }

        // Render
        renderer.draw(game);
        renderer.present(out)?;

        // Frame pacing
        let elapsed = frame_start.elapsed();
        if elapsed < frame_dur {
            std::thread::sleep(frame_dur - elapsed);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_frames_pass_through() {
        let max = Duration::from_millis(100);
        assert_eq!(clamp_delta(Duration::from_millis(16), max), Duration::from_millis(16));
    }

    #[test]
    fn stalls_are_capped() {
        let max = Duration::from_millis(100);
        assert_eq!(clamp_delta(Duration::from_secs(5), max), max);
    }
}
