use std::io::{self, BufRead, Write};

use rand::Rng;
use tracing::debug;

use crate::bot::Bot;
use crate::render::{RenderOptions, Rendered, render};
use crate::session::{Action, Reply, SessionId};

/// The single conversation a console run drives.
pub const CONSOLE_SESSION: SessionId = SessionId(0);

const HELP: &str = "(type ingredients, a button number, /start, or /quit)";

/// Run an interactive session over line-oriented input.
///
/// - `/start` issues the entry command, `/quit` ends the run
/// - a number presses that button from the previous reply
/// - anything else is submitted as ingredients
///
/// Membership is always granted. Returns the number of events handled.
///
/// # Errors
///
/// Returns an I/O error if reading input or writing output fails.
pub fn run_console<G: Rng, I: BufRead, W: Write>(
    bot: &mut Bot<G>,
    options: &RenderOptions,
    input: I,
    output: &mut W,
) -> io::Result<usize> {
    let mut buttons: Vec<Action> = Vec::new();
    let mut handled = 0;

    let reply = bot.on_start(CONSOLE_SESSION, true);
    buttons = show(&reply, options, output, buttons)?;
    writeln!(output, "{HELP}")?;

    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "/quit" {
            break;
        }

        let reply = if line == "/start" {
            bot.on_start(CONSOLE_SESSION, true)
        } else if let Some(action) = pressed(line, &buttons) {
            debug!(?action, "button pressed");
            bot.on_action(CONSOLE_SESSION, action)
        } else {
            bot.on_ingredients_text(CONSOLE_SESSION, line, true)
        };
        handled += 1;

        buttons = show(&reply, options, output, buttons)?;
    }

    Ok(handled)
}

/// Map a numeric line to the button it names, if any.
fn pressed(line: &str, buttons: &[Action]) -> Option<Action> {
    let index: usize = line.parse().ok()?;
    index
        .checked_sub(1)
        .and_then(|i| buttons.get(i))
        .cloned()
}

/// Print a reply and return the button actions now on screen.
///
/// A reply without buttons keeps the previous ones pressable, the way a
/// chat keeps older messages' buttons around.
fn show<W: Write>(
    reply: &Reply,
    options: &RenderOptions,
    output: &mut W,
    previous: Vec<Action>,
) -> io::Result<Vec<Action>> {
    let rendered = render(reply, options);
    write_rendered(&rendered, output)?;
    if rendered.keyboard.is_empty() {
        Ok(previous)
    } else {
        Ok(rendered.buttons().map(|b| b.action.clone()).collect())
    }
}

fn write_rendered<W: Write>(rendered: &Rendered, output: &mut W) -> io::Result<()> {
    writeln!(output, "{}", rendered.text)?;
    for (i, button) in rendered.buttons().enumerate() {
        writeln!(output, "  [{}] {}", i + 1, button.label)?;
    }
    writeln!(output)?;
    Ok(())
}
