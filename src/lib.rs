//! This crate implements the core of a Chip-8 virtual machine: 4 KiB of
//! memory, sixteen registers, a 16-slot call stack, two countdown timers, a
//! 64x32 monochrome screen, and a 16-key input latch, driven by a
//! fetch-decode-execute cycle over the 34 documented instructions.
//!
//! Window creation, key events, and frame pacing live in the binary; the
//! library only ever sees post-mapped hex keys and hands back a cell grid.

pub mod cpu;
pub mod error;
pub mod mem;
pub mod screen;

pub use crate::{
    cpu::{flags::Flags, CPU},
    error::{Error, Result},
    mem::Mem,
    screen::Screen,
};

/// The whole machine: CPU, memory, and screen
#[derive(Clone, Debug, Default)]
pub struct Chip8 {
    pub cpu: CPU,
    pub mem: Mem,
    pub screen: Screen,
}

impl Chip8 {
    /// Constructs a machine with `rom` loaded and the pc at 0x200
    /// # Examples
    /// ```rust
    /// # use ocho::*;
    /// let ch8 = Chip8::new(Flags::default(), Some(1), &[0x00, 0xe0]).unwrap();
    /// assert_eq!(0x200, ch8.cpu.pc());
    /// ```
    pub fn new(flags: Flags, seed: Option<u64>, rom: &[u8]) -> Result<Self> {
        let mut ch8 = Chip8 {
            cpu: CPU::new(flags, seed),
            ..Default::default()
        };
        ch8.mem.load_rom(rom)?;
        Ok(ch8)
    }

    /// Executes a single fetch-decode-execute cycle
    pub fn tick(&mut self) -> Result<&mut Self> {
        self.cpu.tick(&mut self.mem, &mut self.screen)?;
        Ok(self)
    }

    /// Executes `steps` cycles
    pub fn multistep(&mut self, steps: usize) -> Result<&mut Self> {
        for _ in 0..steps {
            self.tick()?;
        }
        Ok(self)
    }

    /// Resets the CPU and blanks the screen, leaving the loaded ROM intact
    pub fn reset(&mut self) {
        self.cpu.reset();
        self.screen.clear();
    }
}
