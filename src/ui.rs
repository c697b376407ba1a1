use ratatui::{prelude::*, widgets::*};

use crate::models::{format_amount, Friend, Payer, Standing};

/// Renders a labelled text input field
pub fn render_input<'a>(content: &'a str, title: &'a str, is_focused: bool, is_editing: bool) -> Paragraph<'a> {
    let style = if is_editing {
        Style::default().fg(Color::Yellow)
    } else if is_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(title);

    Paragraph::new(content).block(block)
}

/// The sentence describing who owes whom
pub fn balance_text(friend: &Friend) -> String {
    match friend.standing() {
        Standing::UserOwes(amount) => format!("You owe {} {}$", friend.name, format_amount(amount)),
        Standing::FriendOwes(amount) => format!("{} owes You {}$", friend.name, format_amount(amount)),
        Standing::Even => format!("You and {} are Even", friend.name),
    }
}

/// Balance colour: red when the user owes, green when owed
pub fn balance_color(friend: &Friend) -> Color {
    match friend.standing() {
        Standing::UserOwes(_) => Color::Red,
        Standing::FriendOwes(_) => Color::Green,
        Standing::Even => Color::Gray,
    }
}

/// Roster entries: name, balance sentence and avatar
pub fn render_roster<'a>(
    friends: &'a [Friend],
    selected_id: Option<&str>,
    is_focused: bool,
) -> List<'a> {
    let items: Vec<ListItem> = friends
        .iter()
        .map(|friend| {
            let is_selected = selected_id == Some(friend.id.as_str());
            let marker = if is_selected { "[Close] " } else { "[Select]" };
            let name_style = if is_selected {
                Style::default().fg(Color::Yellow).bold()
            } else {
                Style::default().bold()
            };

            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(format!("{} ", marker), Style::default().fg(Color::DarkGray)),
                    Span::styled(friend.name.clone(), name_style),
                ]),
                Line::from(Span::styled(
                    format!("         {}", balance_text(friend)),
                    Style::default().fg(balance_color(friend)),
                )),
                Line::from(Span::styled(
                    format!("         {}", friend.image),
                    Style::default().fg(Color::DarkGray),
                )),
            ])
        })
        .collect();

    let border_style = if is_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(" Friends (Enter select, d delete, a add) "),
        )
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("> ")
}

/// Label of the payer selector
pub fn payer_label(payer: Payer, friend_name: &str) -> String {
    match payer {
        Payer::User => String::from("You"),
        Payer::Friend => friend_name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn friend(balance: f64) -> Friend {
        Friend {
            id: "1".into(),
            name: "Ann".into(),
            image: "https://i.pravatar.cc/48".into(),
            balance,
        }
    }

    #[test]
    fn test_balance_text() {
        assert_eq!(balance_text(&friend(-7.0)), "You owe Ann 7$");
        assert_eq!(balance_text(&friend(20.0)), "Ann owes You 20$");
        assert_eq!(balance_text(&friend(0.0)), "You and Ann are Even");
        assert_eq!(balance_color(&friend(-1.0)), Color::Red);
    }

    #[test]
    fn test_payer_label() {
        assert_eq!(payer_label(Payer::User, "Ann"), "You");
        assert_eq!(payer_label(Payer::Friend, "Ann"), "Ann");
    }
}
