//! Represents flags that aid in operation, but aren't inherent to the Chip-8

/// Scheduler-facing state that isn't inherent to the CPU
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Flags {
    /// Set when the cycle trace is enabled
    pub debug: bool,
    /// Set when the emulator is paused by the user and should not update
    pub pause: bool,
    /// Set while a `waitk` instruction is waiting for a keypress
    pub keypause: bool,
    /// The key that resolved the last keypause, not yet consumed by `waitk`
    pub lastkey: Option<usize>,
}

impl Flags {
    /// Toggles the cycle trace
    pub fn debug(&mut self) {
        self.debug = !self.debug
    }

    /// Toggles pause
    ///
    /// # Examples
    /// ```rust
    /// # use ocho::*;
    /// let mut cpu = CPU::default();
    /// assert_eq!(false, cpu.flags.pause);
    /// // Pause the cpu
    /// cpu.flags.pause();
    /// assert_eq!(true, cpu.flags.pause);
    /// ```
    pub fn pause(&mut self) {
        self.pause = !self.pause
    }

    /// True when no instruction should execute this tick, either because the
    /// user paused the machine or a `waitk` is pending
    pub fn is_paused(&self) -> bool {
        self.pause || self.keypause
    }
}
