use std::io::{self, BufRead, Write};

use oxifour_engine::{BoardState, Player};

/// Reads columns typed on a terminal.
///
/// Unparsable input is asked for again. Out-of-range or full columns are
/// returned as typed; the game runner reports them and asks again. When the
/// input ends the leftmost open column is played.
#[derive(Debug)]
pub struct HumanPrompt<R, W> {
    input: R,
    output: W,
}

impl HumanPrompt<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R, W> HumanPrompt<R, W>
where
    R: BufRead,
    W: Write,
{
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn read_column(&mut self) -> io::Result<Option<usize>> {
        loop {
            write!(self.output, "Enter the column to place your piece: ")?;
            self.output.flush()?;
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            match line.trim().parse() {
                Ok(column) => return Ok(Some(column)),
                Err(_) => writeln!(self.output)?,
            }
        }
    }
}

impl<R, W> Player for HumanPrompt<R, W>
where
    R: BufRead,
    W: Write,
{
    fn next_move(&mut self, state: &BoardState) -> usize {
        match self.read_column() {
            Ok(Some(column)) => column,
            Ok(None) => {
                tracing::warn!("input closed, playing the first open column");
                state.legal_columns().first().copied().unwrap_or(0)
            }
            Err(err) => {
                tracing::warn!("failed to read input, playing the first open column: {err}");
                state.legal_columns().first().copied().unwrap_or(0)
            }
        }
    }
}
