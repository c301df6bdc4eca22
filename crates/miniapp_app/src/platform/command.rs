use miniapp_core::{Msg, ViewState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Dispatch(Msg),
    Health,
    Help,
    Quit,
    Unknown(String),
}

pub const HELP_TEXT: &str = "\
Commands:
  prompt <text>      replace the prompt
  generate           submit the prompt
  clear              clear the generation output
  tab <view>         switch to generate, history or billing
  history, billing   shortcuts for tab history / tab billing
  buy <product>      start a purchase (credits_100, sub_month)
  health             ping the API
  help               show this text
  quit               leave";

/// Parses one input line. Blank lines yield `None`.
pub fn parse(line: &str) -> Option<Command> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "prompt" => Command::Dispatch(Msg::PromptChanged(rest.to_string())),
        "generate" | "gen" => Command::Dispatch(Msg::GenerateClicked),
        "clear" => Command::Dispatch(Msg::ClearOutputClicked),
        "tab" => match parse_view(rest) {
            Some(view) => Command::Dispatch(Msg::ViewSelected(view)),
            None => Command::Unknown(line.to_string()),
        },
        "history" => Command::Dispatch(Msg::ViewSelected(ViewState::History)),
        "billing" => Command::Dispatch(Msg::ViewSelected(ViewState::Billing)),
        "buy" if !rest.is_empty() => Command::Dispatch(Msg::BuyClicked {
            product_id: rest.to_string(),
        }),
        "health" => Command::Health,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => Command::Unknown(line.to_string()),
    };
    Some(command)
}

fn parse_view(name: &str) -> Option<ViewState> {
    match name.to_ascii_lowercase().as_str() {
        "generate" => Some(ViewState::Generate),
        "history" => Some(ViewState::History),
        "billing" => Some(ViewState::Billing),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_keeps_inner_whitespace() {
        assert_eq!(
            parse("prompt   five ideas  about tea "),
            Some(Command::Dispatch(Msg::PromptChanged(
                "five ideas  about tea".into()
            )))
        );
    }

    #[test]
    fn tabs_and_shortcuts() {
        assert_eq!(
            parse("tab Billing"),
            Some(Command::Dispatch(Msg::ViewSelected(ViewState::Billing)))
        );
        assert_eq!(
            parse("history"),
            Some(Command::Dispatch(Msg::ViewSelected(ViewState::History)))
        );
        assert_eq!(
            parse("tab nowhere"),
            Some(Command::Unknown("tab nowhere".into()))
        );
    }

    #[test]
    fn buy_needs_a_product() {
        assert_eq!(
            parse("buy credits_100"),
            Some(Command::Dispatch(Msg::BuyClicked {
                product_id: "credits_100".into()
            }))
        );
        assert_eq!(parse("buy"), Some(Command::Unknown("buy".into())));
    }

    #[test]
    fn blank_lines_are_skipped() {
        assert_eq!(parse("   "), None);
        assert_eq!(parse("QUIT"), Some(Command::Quit));
    }
}
