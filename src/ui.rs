//! Platform-specific IO/UI code: the minifb window, the key mapping, and
//! the cell-grid-to-pixel conversion.

use minifb::*;
use ocho::{error::Result, screen, Chip8};

#[derive(Clone, Debug)]
pub struct UIBuilder {
    pub width: usize,
    pub height: usize,
    pub name: &'static str,
    pub window_options: WindowOptions,
}

impl UIBuilder {
    pub fn build(&self) -> Result<UI> {
        let ui = UI {
            window: Window::new(self.name, self.width, self.height, self.window_options)?,
            keyboard: Default::default(),
            fb: FrameBuffer::new(self.width, self.height),
        };
        Ok(ui)
    }
}

impl Default for UIBuilder {
    fn default() -> Self {
        UIBuilder {
            width: screen::WIDTH,
            height: screen::HEIGHT,
            name: "Chip-8 Interpreter",
            window_options: WindowOptions {
                title: true,
                resize: false,
                scale: Scale::X16,
                scale_mode: ScaleMode::AspectRatioStretch,
                none: true,
                ..Default::default()
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameBufferFormat {
    pub fg: u32,
    pub bg: u32,
}

impl Default for FrameBufferFormat {
    fn default() -> Self {
        FrameBufferFormat {
            fg: 0x0011a434,
            bg: 0x001e2431,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameBuffer {
    buffer: Vec<u32>,
    width: usize,
    height: usize,
    format: FrameBufferFormat,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        FrameBuffer {
            buffer: vec![0; width * height],
            width,
            height,
            format: Default::default(),
        }
    }
    /// Converts the boolean cell grid to pixels and presents the frame
    pub fn render(&mut self, window: &mut Window, screen: &ocho::Screen) -> Result<()> {
        for (pixel, &cell) in self.buffer.iter_mut().zip(screen.cells()) {
            *pixel = if cell {
                self.format.fg
            } else {
                self.format.bg
            };
        }
        window.update_with_buffer(&self.buffer, self.width, self.height)?;
        Ok(())
    }
}

#[derive(Debug)]
pub struct UI {
    window: Window,
    keyboard: Vec<Key>,
    fb: FrameBuffer,
}

impl UI {
    /// Presents a frame if the screen is dirty, otherwise just pumps the
    /// window's event queue. Returns false once the window is closed.
    pub fn frame(&mut self, ch8: &mut Chip8) -> Result<bool> {
        if !self.window.is_open() {
            return Ok(false);
        }
        self.window.set_title(if ch8.cpu.flags.pause {
            "Chip-8 Interpreter ⏸"
        } else {
            "Chip-8 Interpreter ▶"
        });
        if ch8.screen.take_dirty() {
            self.fb.render(&mut self.window, &ch8.screen)?;
        } else {
            self.window.update();
        }
        Ok(true)
    }

    /// Forwards key events to the input latch, and handles the frontend
    /// keybindings. Returns false when the user quit.
    pub fn keys(&mut self, ch8: &mut Chip8) -> Result<bool> {
        let pressed: Vec<Key> = self
            .window
            .get_keys()
            .into_iter()
            .filter(|key| !self.keyboard.contains(key))
            .collect();
        let released: Vec<Key> = self
            .keyboard
            .iter()
            .copied()
            .filter(|key| !self.window.get_keys().contains(key))
            .collect();
        for key in released {
            if let Some(key) = identify_key(key) {
                ch8.cpu.release(key)?;
            }
        }
        for key in pressed {
            match key {
                Key::F1 => ch8.cpu.dump(),
                Key::F2 => print!("{}", ch8.screen),
                Key::F4 => ch8.cpu.flags.debug(),
                Key::F5 => eprintln!("{}.", {
                    ch8.cpu.flags.pause();
                    if ch8.cpu.flags.pause {
                        "Paused"
                    } else {
                        "Unpaused"
                    }
                }),
                Key::F6 => {
                    eprintln!("Step");
                    ch8.cpu.singlestep(&mut ch8.mem, &mut ch8.screen)?;
                }
                Key::F9 => {
                    eprintln!("Reset");
                    ch8.reset();
                }
                Key::Escape => return Ok(false),
                key => {
                    if let Some(key) = identify_key(key) {
                        ch8.cpu.press(key)?;
                    }
                }
            }
        }
        self.keyboard = self.window.get_keys();
        Ok(true)
    }
}

/// Maps the left-hand QWERTY block to the hex keypad
pub fn identify_key(key: Key) -> Option<usize> {
    match key {
        Key::Key1 => Some(0x1),
        Key::Key2 => Some(0x2),
        Key::Key3 => Some(0x3),
        Key::Key4 => Some(0xc),
        Key::Q => Some(0x4),
        Key::W => Some(0x5),
        Key::E => Some(0x6),
        Key::R => Some(0xd),
        Key::A => Some(0x7),
        Key::S => Some(0x8),
        Key::D => Some(0x9),
        Key::F => Some(0xe),
        Key::Z => Some(0xa),
        Key::X => Some(0x0),
        Key::C => Some(0xb),
        Key::V => Some(0xf),
        _ => None,
    }
}
