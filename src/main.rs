//! ocho: A chip-8 interpreter in Rust

mod ui;

use gumdrop::*;
use ocho::{error::Result, *};
use owo_colors::OwoColorize;
use std::{
    path::PathBuf,
    time::{Duration, Instant},
};
use ui::{UIBuilder, UI};

/// Wall-clock interval between timer decrements (62.5 Hz)
const TIMER_INTERVAL: Duration = Duration::from_millis(16);

pub fn main() -> Result<()> {
    let options = Arguments::parse_args_default_or_exit();
    let mut state = State::new(options)?;
    while let Some(result) = state.next() {
        if let Err(e) = result {
            // Halt execution, but keep the last frame visible until quit
            eprintln!("{}", e.bold().red());
            state.ch8.cpu.flags.pause = true;
        }
    }
    // The only exit paths are the escape key and closing the window
    std::process::exit(1);
}

#[derive(Clone, Debug, PartialEq, Eq, Options)]
struct Arguments {
    #[options(help = "Load a ROM to run.", required, free)]
    pub file: PathBuf,
    #[options(help = "Print this help message.")]
    help: bool,
    #[options(help = "Enable the cycle trace at startup.")]
    pub debug: bool,
    #[options(help = "Start in the paused state.")]
    pub pause: bool,
    #[options(help = "Set the instructions-per-frame rate.", default = "8")]
    pub speed: usize,
    #[options(help = "Set the target framerate.", default = "60", meta = "FR")]
    pub frame_rate: u64,
    #[options(help = "Seed the random-number generator.", meta = "SEED")]
    pub seed: Option<u64>,
}

#[derive(Debug)]
struct State {
    speed: usize,
    rate: u64,
    pub ch8: Chip8,
    ui: UI,
    /// Start of the current frame
    ft: Instant,
    /// Last observed timer decrement
    tt: Instant,
}

impl State {
    fn new(options: Arguments) -> Result<Self> {
        let rom = std::fs::read(&options.file)?;
        Ok(State {
            speed: options.speed,
            rate: options.frame_rate,
            ch8: Chip8::new(
                Flags {
                    debug: options.debug,
                    pause: options.pause,
                    ..Default::default()
                },
                options.seed,
                &rom,
            )?,
            ui: UIBuilder::default().build()?,
            ft: Instant::now(),
            tt: Instant::now(),
        })
    }
    fn keys(&mut self) -> Result<bool> {
        self.ui.keys(&mut self.ch8)
    }
    fn frame(&mut self) -> Result<bool> {
        self.ui.frame(&mut self.ch8)
    }
    /// Decrements the timers once per elapsed [TIMER_INTERVAL]. While
    /// paused, the clock is held instead, so unpausing doesn't replay the
    /// missed intervals.
    fn tick_timers(&mut self) {
        if self.ch8.cpu.flags.pause {
            self.tt = Instant::now();
            return;
        }
        while self.tt.elapsed() >= TIMER_INTERVAL {
            self.ch8.cpu.tick_timers();
            self.tt += TIMER_INTERVAL;
        }
    }
    fn tick_cpu(&mut self) -> Result<()> {
        if !self.ch8.cpu.flags.pause {
            self.ch8.multistep(self.speed)?;
        }
        Ok(())
    }
    /// Enforces the frame-rate ceiling
    fn wait_for_next_frame(&mut self) {
        let rate = Duration::from_nanos(1_000_000_000 / self.rate + 1);
        std::thread::sleep(rate.saturating_sub(self.ft.elapsed()));
        self.ft += rate;
    }
}

impl Iterator for State {
    type Item = Result<()>;

    /// One scheduler tick: input, timers, instruction cycles, presentation
    fn next(&mut self) -> Option<Self::Item> {
        self.wait_for_next_frame();
        match self.keys() {
            Ok(opt) if !opt => return None,
            Err(e) => return Some(Err(e)),
            _ => (),
        }
        self.tick_timers();
        if let Err(e) = self.tick_cpu() {
            return Some(Err(e));
        }
        match self.frame() {
            Ok(opt) if !opt => return None,
            Err(e) => return Some(Err(e)),
            _ => (),
        }
        Some(Ok(()))
    }
}
