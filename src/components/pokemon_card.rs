use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::StatusBarHint;

use super::theme::{self, BG_BASE, TEXT_DIM, TEXT_MAIN};
use super::Component;
use crate::action::Action;
use crate::state::{AppState, Pokemon};

pub const NO_IMAGE: &str = "image not available";

pub struct PokemonCardProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

/// One card per Pokemon, with prev/next paging
#[derive(Default)]
pub struct PokemonCard;

impl Component<Action> for PokemonCard {
    type Props<'a> = PokemonCardProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return None;
        }

        match event {
            EventKind::Key(key) => match key.code {
                KeyCode::Left | KeyCode::Char('h') => Some(Action::CursorPrev),
                KeyCode::Right | KeyCode::Char('l') => Some(Action::CursorNext),
                KeyCode::Char('m') => Some(Action::MovesOpen),
                KeyCode::Char('s') | KeyCode::Esc => Some(Action::SearchAnother),
                KeyCode::Char('q') => Some(Action::Quit),
                _ => None,
            },
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let state = props.state;
        frame.render_widget(Block::default().style(Style::default().bg(BG_BASE)), area);

        let chunks = Layout::vertical([
            Constraint::Min(1),    // Card
            Constraint::Length(1), // Help bar
        ])
        .split(area);

        if let Some(pokemon) = state.current() {
            render_card(frame, chunks[0], state, pokemon);
        }

        theme::render_status_bar(
            frame,
            chunks[1],
            &[
                StatusBarHint::new("←/h", "prev"),
                StatusBarHint::new("→/l", "next"),
                StatusBarHint::new("m", "moves"),
                StatusBarHint::new("s", "search"),
                StatusBarHint::new("q", "quit"),
            ],
            &state.status_line(),
        );
    }
}

fn display_name(pokemon: &Pokemon) -> String {
    if pokemon.name.is_empty() {
        "UNKNOWN".to_string()
    } else {
        pokemon.name.to_uppercase()
    }
}

fn type_line(pokemon: &Pokemon) -> String {
    if pokemon.types.is_empty() {
        "-".to_string()
    } else {
        pokemon.types.join(" ").to_uppercase()
    }
}

fn stat_line(label: &'static str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label:<8}"), Style::default().fg(TEXT_DIM)),
        Span::styled(
            value,
            Style::default().fg(TEXT_MAIN).add_modifier(Modifier::BOLD),
        ),
    ])
}

fn render_card(frame: &mut Frame, area: Rect, state: &AppState, pokemon: &Pokemon) {
    let accent = theme::type_color(pokemon.primary_type().unwrap_or_default());
    let position = format!(
        " {}/{} ",
        state.collection.cursor() + 1,
        state.collection.len()
    );
    let block = Block::default()
        .title(Line::from(Span::styled(
            format!(" {} ", display_name(pokemon)),
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        )))
        .title_bottom(Line::from(position).alignment(Alignment::Right))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(accent));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::vertical([
        Constraint::Min(1),    // Artwork
        Constraint::Length(1), // Spacer
        Constraint::Length(3), // Stats
    ])
    .split(inner);

    match state.current_artwork() {
        Some(artwork) => artwork.render(chunks[0], frame.buffer_mut()),
        None => {
            let placeholder = if pokemon.image.is_some() {
                "loading artwork…"
            } else {
                NO_IMAGE
            };
            let y = chunks[0].y + chunks[0].height / 2;
            let line_area = Rect::new(chunks[0].x, y, chunks[0].width, 1.min(chunks[0].height));
            frame.render_widget(
                Paragraph::new(Line::from(placeholder).centered())
                    .style(Style::default().fg(TEXT_DIM)),
                line_area,
            );
        }
    }

    let stats = vec![
        stat_line("WEIGHT", format!("{} Hg", pokemon.weight)),
        stat_line("TYPE", type_line(pokemon)),
        stat_line("HEIGHT", format!("{} Ft", pokemon.height)),
    ];
    frame.render_widget(Paragraph::new(stats), chunks[2]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tui_dispatch::testing::*;

    #[test]
    fn test_handle_event_navigation() {
        let mut component = PokemonCard;
        let state = AppState::default();

        for (pressed, expected) in [
            ("l", Action::CursorNext),
            ("h", Action::CursorPrev),
            ("m", Action::MovesOpen),
            ("s", Action::SearchAnother),
            ("q", Action::Quit),
        ] {
            let props = PokemonCardProps {
                state: &state,
                is_focused: true,
            };
            let actions: Vec<_> = component
                .handle_event(&EventKind::Key(key(pressed)), props)
                .into_iter()
                .collect();
            actions.assert_count(1);
            actions.assert_first(expected);
        }
    }

    #[test]
    fn test_handle_event_unfocused_ignores() {
        let mut component = PokemonCard;
        let state = AppState::default();
        let props = PokemonCardProps {
            state: &state,
            is_focused: false,
        };
        let actions: Vec<_> = component
            .handle_event(&EventKind::Key(key("l")), props)
            .into_iter()
            .collect();
        actions.assert_empty();
    }

    #[test]
    fn test_display_helpers() {
        let pokemon = Pokemon {
            name: "charizard".into(),
            types: vec!["fire".into(), "flying".into()],
            ..Default::default()
        };
        assert_eq!(display_name(&pokemon), "CHARIZARD");
        assert_eq!(type_line(&pokemon), "FIRE FLYING");
        assert_eq!(display_name(&Pokemon::default()), "UNKNOWN");
        assert_eq!(type_line(&Pokemon::default()), "-");
    }
}
