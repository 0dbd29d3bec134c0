use std::io::{self, Write};

use petsight_core::{AppViewModel, Notice};

use super::render::{render, ConsoleLine};

/// Prints the view to a terminal, repeating only the lines that changed.
pub(crate) struct Console<W: Write> {
    out: W,
    shown: Vec<ConsoleLine>,
}

impl Console<io::Stdout> {
    pub(crate) fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Console<W> {
    pub(crate) fn new(out: W) -> Self {
        Self {
            out,
            shown: Vec::new(),
        }
    }

    pub(crate) fn render(&mut self, view: &AppViewModel) -> io::Result<()> {
        let lines = render(view);
        for line in &lines {
            if !self.shown.contains(line) {
                writeln!(self.out, "{}", line.text)?;
            }
        }
        self.shown = lines;
        self.out.flush()
    }

    /// Prints every line regardless of what was shown before.
    pub(crate) fn render_all(&mut self, view: &AppViewModel) -> io::Result<()> {
        self.shown.clear();
        self.render(view)
    }

    pub(crate) fn alert(&mut self, notice: Notice) -> io::Result<()> {
        writeln!(self.out, "! {}", notice.message())?;
        self.out.flush()
    }

    pub(crate) fn say(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{text}")?;
        self.out.flush()
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        self.out
    }
}
