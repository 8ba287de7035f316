use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use crate::lookup::LookupController;
use crate::postal::model::PINCODE_LEN;
use crate::postal::PostalApi;
use crate::render::render_view;

const HELP: &str = "\
commands:
  <pincode>        look up a 6-digit pincode
  /filter <name>   show only post offices whose name contains <name>
  /clear           remove the filter
  /help            show this help
  /quit            exit
";

#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Lookup(&'a str),
    Filter(&'a str),
    Clear,
    Help,
    Quit,
    Unknown(&'a str),
}

impl<'a> Command<'a> {
    fn parse(line: &'a str) -> Self {
        let Some(rest) = line.trim_start().strip_prefix('/') else {
            return Self::Lookup(line.trim());
        };
        let (name, arg) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
        match name {
            "filter" | "f" => Self::Filter(arg),
            "clear" => Self::Clear,
            "help" | "h" => Self::Help,
            "quit" | "q" | "exit" => Self::Quit,
            _ => Self::Unknown(name),
        }
    }
}

/// Read commands until `/quit` or end of input, redrawing after each one.
///
/// Each lookup is awaited before the next line is read, so there is never more
/// than one request in flight.
pub async fn run_prompt<A, R, W>(
    controller: &mut LookupController<A>,
    input: R,
    out: &mut W,
) -> color_eyre::Result<()>
where
    A: PostalApi + Sync,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    write!(out, "{HELP}\n> ")?;
    out.flush()?;

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        match Command::parse(&line) {
            Command::Lookup(pincode) => {
                if controller.set_pincode_input(pincode) {
                    writeln!(out, "note: input cut to {PINCODE_LEN} characters: {}", controller.pincode_input())?;
                }
                if let Some(ticket) = controller.begin_lookup() {
                    write!(out, "{}", render_view(controller))?;
                    out.flush()?;
                    controller.finish_lookup(ticket).await;
                }
                write!(out, "{}", render_view(controller))?;
            }
            Command::Filter(term) => {
                if controller.filter_visible() {
                    controller.set_filter_input(term);
                    write!(out, "{}", render_view(controller))?;
                } else {
                    writeln!(out, "look up a pincode first")?;
                }
            }
            Command::Clear => {
                controller.set_filter_input("");
                write!(out, "{}", render_view(controller))?;
            }
            Command::Help => write!(out, "{HELP}")?,
            Command::Quit => return Ok(()),
            Command::Unknown(name) => writeln!(out, "unknown command /{name}, try /help")?,
        }
        write!(out, "> ")?;
        out.flush()?;
    }
    writeln!(out)?;
    Ok(())
}
