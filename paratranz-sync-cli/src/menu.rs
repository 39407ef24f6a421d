//! Interactive prompt used when no subcommand is given.

use std::io::{self, BufRead, Write};

/// What the user picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Export,
    Import,
}

/// Prints the menu and reads choices until a valid one is entered.
///
/// Returns `None` when input ends first.
pub fn choose_action<R: BufRead, W: Write>(
    mut input: R,
    mut output: W,
) -> io::Result<Option<Action>> {
    writeln!(output, "Welcome to the ParaTranz import/export tool.")?;
    writeln!(output, "Choose the operation to perform:")?;
    writeln!(output, "1 - Export ParaTranz items from original and translated files")?;
    writeln!(output, "2 - Import ParaTranz items into translated files")?;

    let mut line = String::new();
    loop {
        write!(output, "Input option number: ")?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        match line.trim() {
            "1" => return Ok(Some(Action::Export)),
            "2" => return Ok(Some(Action::Import)),
            _ => writeln!(output, "Invalid option!")?,
        }
    }
}

/// Blocks until the user presses Enter or input ends.
pub fn wait_for_enter<R: BufRead, W: Write>(mut input: R, mut output: W) -> io::Result<()> {
    write!(output, "Press Enter to exit")?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(())
}
