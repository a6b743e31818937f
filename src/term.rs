use std::{io::{Stdout, Write, stdout}, time::Duration};

use crossterm::{cursor, execute, queue, style, terminal, Result};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::event::{Event, KeyEvent, read, poll};

pub type Coords = (u16, u16);

pub struct TermManager {
    width: u16,
    height: u16,
    stdout: Stdout,
    screen: Vec<char>,
    current_msg: Option<Message>,
}

struct Message {
    top_left: Coords,
    width: u16,
    height: u16,
}

impl TermManager {
    pub fn new() -> Result<Self> {
        let (width, height) = terminal::size()?;
        let screen = vec![' '; width as usize * height as usize];
        Ok(TermManager { width, height, stdout: stdout(), screen, current_msg: None })
    }

    pub fn setup(&mut self) -> Result<()> {
        execute!(self.stdout, EnterAlternateScreen, cursor::Hide, cursor::DisableBlinking)?;
        terminal::enable_raw_mode()
    }

    pub fn restore(&mut self) -> Result<()> {
        terminal::disable_raw_mode()?;
        execute!(self.stdout, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen)
    }

    pub fn size(&self) -> Coords {
        (self.width, self.height)
    }

    pub fn read_key_blocking(&self) -> Result<KeyEvent> {
        loop {
            if let Event::Key(ev) = read()? {
                return Ok(ev);
            }
        }
    }

    /// Drains every key event already waiting, without blocking.
    pub fn read_key_events_queue(&self) -> Result<Vec<KeyEvent>> {
        let mut events = vec![];

        while poll(Duration::from_millis(0))? {
            if let Event::Key(ev) = read()? {
                events.push(ev);
            }
        }

        Ok(events)
    }

    pub fn show_message(&mut self, lines: &[&str]) -> Result<()> {
        if self.current_msg.is_some() {
            self.hide_message()?;
        }

        let msg_height = (lines.len() + 2) as u16;
        let msg_width = (lines.iter().map(|x| x.chars().count()).max().unwrap_or(0) + 2) as u16;
        let center = (self.width / 2, self.height / 2);
        let top_left = (
            center.0.saturating_sub(msg_width / 2),
            center.1.saturating_sub(msg_height / 2),
        );

        for y in [top_left.1, top_left.1 + msg_height - 1].iter() {
            for x_diff in 0..msg_width {
                self.print_at_no_save((top_left.0 + x_diff, *y), ' ')?;
            }
        }

        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            let y = top_left.1 + i as u16 + 1;
            for (x_diff, ch) in padded_line.chars().enumerate() {
                self.print_at_no_save((top_left.0 + x_diff as u16, y), ch)?;
            }
        }

        self.current_msg = Some(Message { top_left, width: msg_width, height: msg_height });
        self.flush()
    }

    pub fn hide_message(&mut self) -> Result<()> {
        let msg = match self.current_msg.take() {
            Some(msg) => msg,
            None => return Ok(()),
        };

        // Put back whatever the message was covering
        for y_diff in 0..msg.height {
            for x_diff in 0..msg.width {
                let (x, y) = (msg.top_left.0 + x_diff, msg.top_left.1 + y_diff);
                if let Some(&ch) = self.screen.get(self.width as usize * y as usize + x as usize) {
                    self.print_at_no_save((x, y), ch)?;
                }
            }
        }

        self.flush()
    }

    pub fn print_at(&mut self, pos: Coords, ch: char) -> Result<()> {
        if pos.0 >= self.width || pos.1 >= self.height {
            return Ok(());
        }
        self.screen[self.width as usize * pos.1 as usize + pos.0 as usize] = ch;
        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::Print(ch))
    }

    pub fn print_str_at(&mut self, pos: Coords, text: &str) -> Result<()> {
        for (i, ch) in text.chars().enumerate() {
            self.print_at((pos.0 + i as u16, pos.1), ch)?;
        }
        Ok(())
    }

    pub fn clear(&mut self) -> Result<()> {
        self.screen = vec![' '; self.width as usize * self.height as usize];
        execute!(self.stdout, terminal::Clear(ClearType::All))
    }

    pub fn flush(&mut self) -> Result<()> {
        self.stdout.flush()?;
        Ok(())
    }

    ///////////////////////////////////////////////////////////////////////////

    fn print_at_no_save(&mut self, pos: Coords, ch: char) -> Result<()> {
        // Messages sit on top of the screen buffer so hiding them can restore it
        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::Print(ch))
    }
}
