//! Operator text commands (`.efs ...`) entered in the host's command line.
//!
//! Same primitives as the inbound wire commands, but replies go to the
//! operator directly. Returns whether the line was consumed.

use crate::commands::{self, CommandError, CommandReply};
use crate::host::{Host, TagDelegate};
use crate::protocol::InboundCommand;

const COMMAND_PREFIX: &str = ".efs ";

impl<H: Host> super::Bridge<H> {
    /// Handle one operator command line. Lines without the `.efs ` prefix
    /// are not ours and are left for other consumers.
    pub fn handle_text_command(&mut self, line: &str) -> bool {
        let Some(rest) = line.strip_prefix(COMMAND_PREFIX) else {
            return false;
        };
        let (subcommand, remainder) = match rest.split_once(' ') {
            Some((sub, rem)) => (sub, rem),
            None => (rest, ""),
        };

        match subcommand {
            "debug" => {
                self.host.display_message("Debug mode enabled");
                self.debug = true;
                true
            }
            "assume" => {
                let callsign = first_word(remainder);
                if callsign.is_empty() {
                    self.host.display_message("Usage: .efs assume CALLSIGN");
                    return false;
                }
                let command = InboundCommand::Assume {
                    callsign: callsign.to_string(),
                };
                let result = commands::execute(&mut self.host, None, &command);
                self.show_reply(result);
                true
            }
            "transfer" => {
                let callsign = first_word(remainder);
                if callsign.is_empty() {
                    self.host.display_message("Usage: .efs transfer CALLSIGN");
                    return false;
                }
                let command = InboundCommand::Transfer {
                    callsign: callsign.to_string(),
                };
                let result = commands::execute(&mut self.host, None, &command);
                self.show_reply(result);
                true
            }
            // `scratch` sets the pad and leaves it; `scratmp` writes
            // momentarily and restores the previous content.
            "scratch" | "scratmp" => {
                let (callsign, content) = match remainder.split_once(' ') {
                    Some((callsign, content)) => (callsign, content),
                    None => (remainder, ""),
                };
                let restore_after = subcommand == "scratmp";
                let result = commands::update_scratch_pad(
                    &mut self.host,
                    "scratch",
                    callsign,
                    content,
                    restore_after,
                );
                match result {
                    Ok(()) => self.host.display_message(&format!(
                        "Scratch pad set for {}: {content}",
                        callsign.to_ascii_uppercase()
                    )),
                    Err(e) => self.host.display_message(&e.to_string()),
                }
                true
            }
            "ssr" => {
                if remainder.is_empty() {
                    self.host.display_message("Usage: .efs ssr CALLSIGN");
                    return false;
                }
                let command = InboundCommand::ResetSquawk {
                    callsign: remainder.to_string(),
                };
                let tag: Option<&mut dyn TagDelegate> = match self.tag_delegate.as_mut() {
                    Some(d) => Some(&mut **d),
                    None => None,
                };
                let result = commands::execute(&mut self.host, tag, &command);
                self.show_reply(result);
                true
            }
            "clr" => {
                if remainder.is_empty() {
                    self.host.display_message("Usage: .efs clr CALLSIGN");
                    return false;
                }
                let command = InboundCommand::ToggleClearanceFlag {
                    callsign: remainder.to_string(),
                };
                let tag: Option<&mut dyn TagDelegate> = match self.tag_delegate.as_mut() {
                    Some(d) => Some(&mut **d),
                    None => None,
                };
                let result = commands::execute(&mut self.host, tag, &command);
                self.show_reply(result);
                true
            }
            "refresh" => {
                self.refresh();
                self.host
                    .display_message("Refreshed all flight plans and radar targets");
                true
            }
            _ => false,
        }
    }

    fn show_reply(&mut self, result: Result<CommandReply, CommandError>) {
        match result {
            Ok(reply) => {
                if let Some(info) = reply.info {
                    self.host.display_message(&info);
                }
            }
            Err(e) => self.host.display_message(&e.to_string()),
        }
    }
}

fn first_word(text: &str) -> &str {
    text.split_whitespace().next().unwrap_or("")
}
