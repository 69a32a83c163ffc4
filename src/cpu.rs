//! Decodes and runs instructions


pub mod behavior;
pub mod flags;
pub mod instruction;

use self::{flags::Flags, instruction::Insn};
use crate::{
    error::{Error, Result},
    mem::{Mem, ROM_BASE},
    screen::Screen,
};
use imperative_rs::InstructionSet;
use owo_colors::OwoColorize;
use rand::{rngs::StdRng, SeedableRng};
use std::fmt::Debug;

type Reg = usize;
type Adr = u16;
type Nib = u8;

/// Number of return addresses the call stack holds
pub const STACK_DEPTH: usize = 16;

/// Represents the internal state of the CPU interpreter
#[derive(Clone)]
pub struct CPU {
    /// Flags that control how the CPU behaves, but which aren't inherent to
    /// the chip-8: pause, keypause, and the cycle trace. See [Flags].
    pub flags: Flags,
    // memory
    stack: Vec<Adr>,
    // registers
    pc: Adr,
    i: Adr,
    v: [u8; 16],
    delay: u8,
    sound: u8,
    // I/O
    keys: [bool; 16],
    // Execution data
    cycle: usize,
    rng: StdRng,
}

// public interface
impl CPU {
    /// Constructs a new CPU with the given [Flags].
    ///
    /// `seed` fixes the random-number generator, for reproducible runs;
    /// `None` seeds it from entropy.
    /// # Examples
    /// ```rust
    /// # use ocho::*;
    /// let cpu = CPU::new(Default::default(), Some(42));
    /// assert_eq!(0x200, cpu.pc());
    /// ```
    pub fn new(flags: Flags, seed: Option<u64>) -> Self {
        CPU {
            flags,
            stack: Vec::with_capacity(STACK_DEPTH),
            pc: ROM_BASE,
            i: 0,
            v: [0; 16],
            delay: 0,
            sound: 0,
            keys: [false; 16],
            cycle: 0,
            rng: match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            },
        }
    }

    /// Presses a key, and reports whether the key's state changed.
    /// If key is outside range `0..=0xF`, returns [Error::InvalidKey].
    ///
    /// A fresh press while a `waitk` instruction is pending resolves the
    /// wait: [Flags::lastkey] records the key and [Flags::keypause] clears.
    /// # Examples
    /// ```rust
    /// # use ocho::*;
    /// let mut cpu = CPU::default();
    ///
    /// // press key `7`
    /// let did_press = cpu.press(0x7).unwrap();
    /// assert!(did_press);
    ///
    /// // press key `7` again, even though it's already pressed
    /// let did_press = cpu.press(0x7).unwrap();
    /// // it was already pressed, so nothing's changed.
    /// assert!(!did_press);
    /// ```
    pub fn press(&mut self, key: usize) -> Result<bool> {
        if let Some(keyref) = self.keys.get_mut(key) {
            if !*keyref {
                *keyref = true;
                if self.flags.keypause {
                    self.flags.lastkey = Some(key);
                    self.flags.keypause = false;
                }
                return Ok(true);
            } // else do nothing
        } else {
            return Err(Error::InvalidKey { key });
        }
        Ok(false)
    }

    /// Releases a key, and reports whether the key's state changed.
    /// If key is outside range `0..=0xF`, returns [Error::InvalidKey].
    pub fn release(&mut self, key: usize) -> Result<bool> {
        if let Some(keyref) = self.keys.get_mut(key) {
            if *keyref {
                *keyref = false;
                return Ok(true);
            }
        } else {
            return Err(Error::InvalidKey { key });
        }
        Ok(false)
    }

    /// Sets a general purpose register in the CPU.
    /// If the register doesn't exist, returns [Error::InvalidRegister]
    /// # Examples
    /// ```rust
    /// # use ocho::*;
    /// // Create a new CPU, and set v4 to 0x41
    /// let mut cpu = CPU::default();
    /// cpu.set_v(0x4, 0x41).unwrap();
    /// assert_eq!(0x41, cpu.v()[0x4]);
    /// ```
    pub fn set_v(&mut self, reg: Reg, value: u8) -> Result<()> {
        if let Some(gpr) = self.v.get_mut(reg) {
            *gpr = value;
            Ok(())
        } else {
            Err(Error::InvalidRegister { reg })
        }
    }

    /// Gets a slice of the entire general purpose registers
    pub fn v(&self) -> &[u8] {
        self.v.as_slice()
    }

    /// Gets the program counter
    /// # Examples
    /// ```rust
    /// # use ocho::*;
    /// let mut cpu = CPU::default();
    /// assert_eq!(0x200, cpu.pc());
    /// ```
    pub fn pc(&self) -> Adr {
        self.pc
    }

    /// Gets the I register
    pub fn i(&self) -> Adr {
        self.i
    }

    /// Gets the value in the Delay Timer register
    pub fn delay(&self) -> u8 {
        self.delay
    }

    /// Gets the value in the Sound Timer register.
    ///
    /// A nonzero sound timer is the signal an audio backend would use to
    /// emit tone; no audio is implemented in-core.
    pub fn sound(&self) -> u8 {
        self.sound
    }

    /// Gets the number of cycles the CPU has executed
    pub fn cycle(&self) -> usize {
        self.cycle
    }

    /// Resets the interpreter.
    ///
    /// Touches the registers, stack, timers, keys, cycle count, and the
    /// pause-related [Flags]. Does not touch the debug flag or the RNG.
    /// # Examples
    /// ```rust
    /// # use ocho::*;
    /// let mut cpu = CPU::default();
    /// cpu.flags.keypause = true;
    /// cpu.reset();
    /// assert_eq!(0x200, cpu.pc());
    /// assert_eq!(false, cpu.flags.keypause);
    /// ```
    pub fn reset(&mut self) {
        self.flags = Flags {
            pause: false,
            keypause: false,
            lastkey: None,
            ..self.flags.clone()
        };
        self.stack.truncate(0);
        // Reset the program counter
        self.pc = ROM_BASE;
        // Zero the registers
        self.i = 0;
        self.v = [0; 16];
        self.delay = 0;
        self.sound = 0;
        // I/O
        self.keys = [false; 16];
        // Execution data
        self.cycle = 0;
    }

    /// Decrements both timers by one, saturating at zero.
    ///
    /// The scheduler calls this once per elapsed timer interval (~16 ms),
    /// independent of the instruction rate.
    pub fn tick_timers(&mut self) {
        self.delay = self.delay.saturating_sub(1);
        self.sound = self.sound.saturating_sub(1);
    }

    /// Executes a single fetch-decode-execute cycle.
    ///
    /// Does nothing while [Flags::is_paused] — the scheduler keeps calling
    /// this during a `waitk`, and execution resumes once a mapped keypress
    /// clears the keypause.
    ///
    /// Returns [Error::UnknownInstruction] if the word at `pc` matches no
    /// operation; the program counter is left where it was.
    /// # Examples
    /// ```rust
    /// # use ocho::*;
    /// let (mut cpu, mut mem, mut screen) = (CPU::default(), Mem::new(), Screen::new());
    /// mem.load_rom(&[
    ///     0x00, 0xe0, // cls
    ///     0x12, 0x02, // jmp 0x202
    /// ]).unwrap();
    /// cpu.tick(&mut mem, &mut screen)
    ///     .expect("0x00e0 (cls) should be a valid opcode.");
    /// assert_eq!(0x202, cpu.pc());
    /// assert_eq!(1, cpu.cycle());
    /// ```
    pub fn tick(&mut self, mem: &mut Mem, screen: &mut Screen) -> Result<&mut Self> {
        // Do nothing if paused
        if self.flags.is_paused() {
            return Ok(self);
        }
        self.cycle += 1;
        // fetch opcode
        let addr = self.pc & 0xfff;
        let opcode = [mem.read(addr), mem.read(addr.wrapping_add(1))];

        if self.flags.debug {
            std::println!(
                "{:3} {:03x}: {:04x}",
                self.cycle.bright_black(),
                addr,
                u16::from_be_bytes(opcode),
            );
        }

        // decode opcode
        if let Ok((inc, insn)) = Insn::decode(&opcode) {
            self.pc = self.pc.wrapping_add(inc as Adr);
            self.execute(mem, screen, insn)?;
        } else {
            return Err(Error::UnknownInstruction {
                word: u16::from_be_bytes(opcode),
                addr,
            });
        }
        Ok(self)
    }

    /// Unpauses the interpreter for a single tick, then pauses it again.
    ///
    /// NOTE: does not synchronize with the timers
    pub fn singlestep(&mut self, mem: &mut Mem, screen: &mut Screen) -> Result<&mut Self> {
        self.flags.pause = false;
        self.tick(mem, screen)?;
        self.flags.pause = true;
        Ok(self)
    }

    /// Dumps the current state of all CPU registers, and the cycle count
    /// # Examples
    /// ```rust
    /// # use ocho::*;
    /// let mut cpu = CPU::default();
    /// cpu.dump();
    /// ```
    /// outputs
    /// ```text
    /// PC: 0200, SP: 0000, I: 0000
    /// v0: 00 v1: 00 v2: 00 v3: 00
    /// v4: 00 v5: 00 v6: 00 v7: 00
    /// v8: 00 v9: 00 vA: 00 vB: 00
    /// vC: 00 vD: 00 vE: 00 vF: 00
    /// DLY: 0, SND: 0, CYC:      0
    /// ```
    pub fn dump(&self) {
        std::println!(
            "PC: {:04x}, SP: {:04x}, I: {:04x}\n{}DLY: {}, SND: {}, CYC: {:6}",
            self.pc,
            self.stack.len(),
            self.i,
            self.v
                .into_iter()
                .enumerate()
                .map(|(i, gpr)| {
                    format!(
                        "v{i:X}: {gpr:02x} {}",
                        match i % 4 {
                            3 => "\n",
                            _ => "",
                        }
                    )
                })
                .collect::<String>(),
            self.delay,
            self.sound,
            self.cycle,
        );
    }
}

impl Debug for CPU {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CPU")
            .field("flags", &self.flags)
            .field("stack", &self.stack)
            .field("pc", &self.pc)
            .field("i", &self.i)
            .field("v", &self.v)
            .field("delay", &self.delay)
            .field("sound", &self.sound)
            .field("keys", &self.keys)
            .field("cycle", &self.cycle)
            .finish_non_exhaustive()
    }
}

impl Default for CPU {
    /// Constructs a new CPU with default flags and an entropy-seeded RNG
    fn default() -> Self {
        CPU::new(Flags::default(), None)
    }
}
