//! The Chip-8's 4 KiB of addressable memory
//!
//! Every address that reaches the backing array is masked to 12 bits first,
//! so reads and writes can never land outside the address space.

use crate::error::{Error, Result};

/// Total addressable memory, in bytes
pub const MEM_SIZE: usize = 0x1000;
/// Address programs are loaded at, and where execution starts
pub const ROM_BASE: u16 = 0x200;
/// Largest ROM that fits between [ROM_BASE] and the end of memory
pub const ROM_CAPACITY: usize = MEM_SIZE - ROM_BASE as usize;
/// Address of the font glyph table
pub const FONT_BASE: u16 = 0x000;
/// Length of one font glyph, in bytes
pub const FONT_GLYPH_LEN: u16 = 5;

/// The 16 hexadecimal digit glyphs, 5 bytes each, 0 through F
pub const FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// 4 KiB of RAM with the font table at [FONT_BASE]
#[derive(Clone, PartialEq, Eq)]
pub struct Mem {
    ram: Box<[u8; MEM_SIZE]>,
}

impl Mem {
    /// Constructs a zeroed memory with the font glyphs loaded
    /// # Examples
    /// ```rust
    /// # use ocho::mem::*;
    /// let mem = Mem::new();
    /// assert_eq!(0xf0, mem.read(0x000)); // top row of glyph '0'
    /// ```
    pub fn new() -> Self {
        let mut ram = Box::new([0; MEM_SIZE]);
        ram[FONT_BASE as usize..FONT_BASE as usize + FONT.len()].copy_from_slice(&FONT);
        Mem { ram }
    }

    /// Reads one byte. The address is masked to 12 bits.
    pub fn read(&self, addr: u16) -> u8 {
        self.ram[addr as usize & 0xfff]
    }

    /// Reads a big-endian instruction word at `addr`
    /// # Examples
    /// ```rust
    /// # use ocho::mem::*;
    /// let mut mem = Mem::new();
    /// mem.write(0x200, 0x12);
    /// mem.write(0x201, 0x34);
    /// assert_eq!(0x1234, mem.read_word(0x200));
    /// ```
    pub fn read_word(&self, addr: u16) -> u16 {
        u16::from_be_bytes([self.read(addr), self.read(addr.wrapping_add(1))])
    }

    /// Writes one byte. The address is masked to 12 bits.
    pub fn write(&mut self, addr: u16, data: u8) {
        self.ram[addr as usize & 0xfff] = data;
    }

    /// Loads a ROM into the program region starting at [ROM_BASE].
    ///
    /// A ROM larger than [ROM_CAPACITY] is rejected with [Error::RomTooLarge]
    /// before a single byte is copied.
    /// # Examples
    /// ```rust
    /// # use ocho::mem::*;
    /// let mut mem = Mem::new();
    /// mem.load_rom(&[0x00, 0xe0]).unwrap();
    /// assert_eq!(0x00e0, mem.read_word(0x200));
    /// ```
    pub fn load_rom(&mut self, rom: &[u8]) -> Result<&mut Self> {
        if rom.len() > ROM_CAPACITY {
            return Err(Error::RomTooLarge {
                size: rom.len(),
                capacity: ROM_CAPACITY,
            });
        }
        let base = ROM_BASE as usize;
        self.ram[base..].fill(0);
        self.ram[base..base + rom.len()].copy_from_slice(rom);
        Ok(self)
    }

    /// Address of the 5-byte font glyph for the low nibble of `digit`
    pub fn font_addr(digit: u8) -> u16 {
        FONT_BASE + FONT_GLYPH_LEN * (digit & 0xf) as u16
    }
}

impl Default for Mem {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Mem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mem").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addresses_wrap_to_12_bits() {
        let mut mem = Mem::new();
        mem.write(0x1234, 0x56);
        assert_eq!(0x56, mem.read(0x234));
    }

    #[test]
    fn font_addr_uses_low_nibble() {
        assert_eq!(Mem::font_addr(0x0), Mem::font_addr(0x10));
        assert_eq!(FONT_BASE + 5 * 0xf, Mem::font_addr(0xff));
    }

    #[test]
    fn oversized_rom_leaves_memory_untouched() {
        let mut mem = Mem::new();
        mem.load_rom(&[0x60, 0x42]).unwrap();
        let before = mem.clone();
        let rom = vec![0xaa; ROM_CAPACITY + 1];
        assert!(matches!(
            mem.load_rom(&rom),
            Err(Error::RomTooLarge { size, capacity })
                if size == ROM_CAPACITY + 1 && capacity == ROM_CAPACITY
        ));
        assert_eq!(before, mem);
    }

    #[test]
    fn max_size_rom_loads() {
        let mut mem = Mem::new();
        let rom = vec![0xaa; ROM_CAPACITY];
        mem.load_rom(&rom).unwrap();
        assert_eq!(0xaa, mem.read(0xfff));
    }
}
