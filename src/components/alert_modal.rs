use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    centered_rect, BaseStyle, Modal, ModalBehavior, ModalProps, ModalStyle, Padding,
};

use super::theme::{self, ALERT, BG_PANEL, TEXT_DIM, TEXT_MAIN};
use super::Component;
use crate::action::Action;

pub struct AlertModalProps<'a> {
    pub message: &'a str,
    pub is_focused: bool,
}

/// Blocking message; any key dismisses it
pub struct AlertModal {
    modal: Modal,
}

impl Default for AlertModal {
    fn default() -> Self {
        Self {
            modal: Modal::new(),
        }
    }
}

impl AlertModal {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Component<Action> for AlertModal {
    type Props<'a> = AlertModalProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return None;
        }
        match event {
            EventKind::Key(_) => Some(Action::AlertDismiss),
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let text = vec![
            Line::from(Span::styled(
                props.message,
                Style::default().fg(TEXT_MAIN).add_modifier(Modifier::BOLD),
            )),
            Line::default(),
            Line::from(Span::styled(
                "press any key",
                Style::default().fg(TEXT_DIM),
            )),
        ];
        let mut render_content = |frame: &mut Frame, content_area: Rect| {
            frame.render_widget(
                Paragraph::new(text.clone()).wrap(Wrap { trim: true }),
                content_area,
            );
        };

        self.modal.render(
            frame,
            area,
            ModalProps {
                is_open: true,
                is_focused: props.is_focused,
                area: centered_rect(52, 9, area),
                style: ModalStyle {
                    base: BaseStyle {
                        border: Some(theme::panel_border(ALERT)),
                        padding: Padding::all(1),
                        bg: Some(BG_PANEL),
                        fg: None,
                    },
                    ..Default::default()
                },
                behavior: ModalBehavior::default(),
                on_close: || Action::AlertDismiss,
                render_content: &mut render_content,
            },
        );
    }
}
