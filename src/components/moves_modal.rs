use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    centered_rect, BaseStyle, Modal, ModalBehavior, ModalProps, ModalStyle, Padding,
};

use super::theme::{self, BG_PANEL, TEXT_DIM, TEXT_MAIN};
use super::Component;
use crate::action::Action;
use crate::state::Pokemon;

pub struct MovesModalProps<'a> {
    pub pokemon: &'a Pokemon,
    pub is_focused: bool,
}

pub struct MovesModal {
    modal: Modal,
}

impl Default for MovesModal {
    fn default() -> Self {
        Self {
            modal: Modal::new(),
        }
    }
}

impl MovesModal {
    pub fn new() -> Self {
        Self::default()
    }
}

fn move_lines(pokemon: &Pokemon) -> Vec<Line<'static>> {
    let moves = pokemon.clamped_moves();
    if moves.is_empty() {
        return vec![Line::from(Span::styled(
            "no moves known",
            Style::default().fg(TEXT_DIM),
        ))];
    }
    moves
        .iter()
        .map(|name| Line::from(format!("• {name}")))
        .collect()
}

impl Component<Action> for MovesModal {
    type Props<'a> = MovesModalProps<'a>;

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
                KeyCode::Esc | KeyCode::Enter | KeyCode::Char('m') => Some(Action::MovesClose),
                KeyCode::Char('q') => Some(Action::Quit),
                _ => None,
            },
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let accent = theme::type_color(props.pokemon.primary_type().unwrap_or_default());
        let title = format!("{} MOVES", props.pokemon.name.to_uppercase());
        let lines = move_lines(props.pokemon);

        let mut render_content = |frame: &mut Frame, content_area: Rect| {
            let chunks = Layout::vertical([
                Constraint::Length(2), // Title
                Constraint::Min(1),    // Moves
            ])
            .split(content_area);
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    title.as_str(),
                    Style::default().fg(accent).add_modifier(Modifier::BOLD),
                ))),
                chunks[0],
            );
            frame.render_widget(
                Paragraph::new(lines.clone()).style(Style::default().fg(TEXT_MAIN)),
                chunks[1],
            );
        };

        self.modal.render(
            frame,
            area,
            ModalProps {
                is_open: true,
                is_focused: props.is_focused,
                area: centered_rect(40, 12, area),
                style: ModalStyle {
                    base: BaseStyle {
                        border: Some(theme::panel_border(accent)),
                        padding: Padding::all(1),
                        bg: Some(BG_PANEL),
                        fg: None,
                    },
                    ..Default::default()
                },
                behavior: ModalBehavior::default(),
                on_close: || Action::MovesClose,
                render_content: &mut render_content,
            },
        );
    }
}
