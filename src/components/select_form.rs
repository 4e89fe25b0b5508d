use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    BaseStyle, Padding, SelectList, SelectListBehavior, SelectListProps, SelectListStyle,
    SelectionStyle, StatusBarHint, TextInput, TextInputProps, TextInputStyle,
};

use super::theme::{self, ACCENT, BG_BASE, BG_HIGHLIGHT, BG_PANEL, TEXT_DIM, TEXT_MAIN};
use super::Component;
use crate::action::Action;
use crate::state::{AppState, CATEGORIES};

const COUNT_PLACEHOLDER: &str = "how many?";

/// Type list plus count field
pub struct SelectFormView {
    list: SelectList,
    input: TextInput,
}

pub struct SelectFormProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

impl Default for SelectFormView {
    fn default() -> Self {
        Self {
            list: SelectList::new(),
            input: TextInput::new(),
        }
    }
}

impl SelectFormView {
    pub fn new() -> Self {
        Self::default()
    }

    fn category_items() -> Vec<Line<'static>> {
        CATEGORIES
            .iter()
            .map(|category| Line::from(capitalize(category)))
            .collect()
    }
}

fn count_style() -> TextInputStyle {
    TextInputStyle {
        base: BaseStyle {
            border: None,
            padding: Padding::xy(1, 0),
            bg: Some(BG_PANEL),
            fg: Some(TEXT_MAIN),
        },
        placeholder_style: Some(Style::default().fg(TEXT_DIM)),
        cursor_style: None,
    }
}

fn list_style() -> SelectListStyle {
    SelectListStyle {
        base: BaseStyle {
            border: None,
            padding: Padding::xy(1, 0),
            bg: Some(BG_PANEL),
            fg: Some(TEXT_MAIN),
        },
        selection: SelectionStyle {
            style: Some(
                Style::default()
                    .bg(BG_HIGHLIGHT)
                    .fg(TEXT_MAIN)
                    .add_modifier(Modifier::BOLD),
            ),
            marker: None,
            disabled: false,
        },
        ..SelectListStyle::default()
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl Component<Action> for SelectFormView {
    type Props<'a> = SelectFormProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return Vec::new();
        }
        let EventKind::Key(key) = event else {
            return Vec::new();
        };
        let state = props.state;

        // While a load runs only cancel and quit do anything
        if state.loading {
            return match key.code {
                KeyCode::Esc => vec![Action::LoadCancel],
                KeyCode::Char('q') => vec![Action::Quit],
                _ => Vec::new(),
            };
        }

        match key.code {
            KeyCode::Enter => vec![Action::FormSubmit],
            KeyCode::Char('q') => vec![Action::Quit],
            KeyCode::Esc if !state.collection.is_empty() => vec![Action::ResultsResume],
            KeyCode::Up | KeyCode::Down => {
                let items = Self::category_items();
                let list_props = SelectListProps {
                    items: &items,
                    count: items.len(),
                    selected: state.form.category_index,
                    is_focused: true,
                    style: list_style(),
                    behavior: SelectListBehavior::default(),
                    on_select: Action::FormCategorySelect,
                    render_item: &|item| item.clone(),
                };
                self.list
                    .handle_event(event, list_props)
                    .into_iter()
                    .collect()
            }
            KeyCode::Char(c) if !c.is_ascii_digit() => Vec::new(),
            KeyCode::Char(_)
            | KeyCode::Backspace
            | KeyCode::Delete
            | KeyCode::Left
            | KeyCode::Right
            | KeyCode::Home
            | KeyCode::End => {
                let input_props = TextInputProps {
                    value: &state.form.count_input,
                    placeholder: COUNT_PLACEHOLDER,
                    is_focused: true,
                    style: count_style(),
                    on_change: Action::FormCountChange,
                    on_submit: |_| Action::FormSubmit,
                    on_cursor_move: None,
                };
                self.input
                    .handle_event(event, input_props)
                    .into_iter()
                    .collect()
            }
            _ => Vec::new(),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let state = props.state;
        frame.render_widget(Block::default().style(Style::default().bg(BG_BASE)), area);

        let chunks = Layout::vertical([
            Constraint::Length(1), // Title
            Constraint::Min(3),    // Types
            Constraint::Length(3), // Count
            Constraint::Length(1), // Loading line
            Constraint::Length(1), // Help bar
        ])
        .split(area);

        let title = Line::from(vec![
            Span::styled(
                "POKEDECK",
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            ),
            Span::styled("  pick a type and how many", Style::default().fg(TEXT_DIM)),
        ]);
        frame.render_widget(Paragraph::new(title), chunks[0]);

        let list_block = Block::default()
            .title(" Type ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::panel_border(ACCENT).style_for_focus(props.is_focused));
        let list_area = list_block.inner(chunks[1]);
        frame.render_widget(list_block, chunks[1]);

        let items = Self::category_items();
        let list_props = SelectListProps {
            items: &items,
            count: items.len(),
            selected: state.form.category_index,
            is_focused: props.is_focused && !state.loading,
            style: list_style(),
            behavior: SelectListBehavior::default(),
            on_select: Action::FormCategorySelect,
            render_item: &|item| item.clone(),
        };
        self.list.render(frame, list_area, list_props);

        let count_block = Block::default()
            .title(" Count ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(TEXT_DIM));
        let count_area = count_block.inner(chunks[2]);
        frame.render_widget(count_block, chunks[2]);
        let input_props = TextInputProps {
            value: &state.form.count_input,
            placeholder: COUNT_PLACEHOLDER,
            is_focused: props.is_focused && !state.loading,
            style: count_style(),
            on_change: Action::FormCountChange,
            on_submit: |_| Action::FormSubmit,
            on_cursor_move: None,
        };
        self.input.render(frame, count_area, input_props);

        if state.loading {
            let loading = Line::from(vec![
                Span::styled(theme::spinner_frame(state.tick), Style::default().fg(ACCENT)),
                Span::styled(" Loading…", Style::default().fg(TEXT_MAIN)),
            ])
            .centered();
            frame.render_widget(Paragraph::new(loading), chunks[3]);
        }

        let mut hints = if state.loading {
            vec![StatusBarHint::new("Esc", "cancel")]
        } else {
            vec![
                StatusBarHint::new("↑↓", "type"),
                StatusBarHint::new("0-9", "count"),
                StatusBarHint::new("Enter", "search"),
            ]
        };
        if !state.loading && !state.collection.is_empty() {
            hints.push(StatusBarHint::new("Esc", "back"));
        }
        hints.push(StatusBarHint::new("q", "quit"));
        theme::render_status_bar(frame, chunks[4], &hints, &state.status_line());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers};
    use tui_dispatch::testing::*;

    fn actions_for(state: &AppState, code: KeyCode) -> Vec<Action> {
        let mut component = SelectFormView::new();
        let props = SelectFormProps {
            state,
            is_focused: true,
        };
        let event = EventKind::Key(KeyEvent::new(code, KeyModifiers::NONE));
        component.handle_event(&event, props).into_iter().collect()
    }

    #[test]
    fn test_enter_submits() {
        let actions = actions_for(&AppState::default(), KeyCode::Enter);
        actions.assert_count(1);
        actions.assert_first(Action::FormSubmit);
    }

    #[test]
    fn test_letters_do_not_reach_count() {
        actions_for(&AppState::default(), KeyCode::Char('x')).assert_empty();
    }

    #[test]
    fn test_esc_cancels_load() {
        let state = AppState {
            loading: true,
            ..Default::default()
        };
        actions_for(&state, KeyCode::Esc).assert_first(Action::LoadCancel);
        actions_for(&state, KeyCode::Enter).assert_empty();
    }

    #[test]
    fn test_unfocused_ignores() {
        let mut component = SelectFormView::new();
        let state = AppState::default();
        let props = SelectFormProps {
            state: &state,
            is_focused: false,
        };
        let actions: Vec<_> = component
            .handle_event(&EventKind::Key(key("q")), props)
            .into_iter()
            .collect();
        actions.assert_empty();
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("fire"), "Fire");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_render_shows_types_and_count() {
        let mut render = RenderHarness::new(60, 30);
        let mut component = SelectFormView::new();
        let state = AppState::default().with_selection("fire", 3);

        let output = render.render_to_string_plain(|frame| {
            let props = SelectFormProps {
                state: &state,
                is_focused: true,
            };
            component.render(frame, frame.area(), props);
        });

        assert!(output.contains("Normal"));
        assert!(output.contains("Fire"));
        assert!(output.contains("3"));
        assert!(!output.contains("Loading…"));
    }

    #[test]
    fn test_render_loading() {
        let mut render = RenderHarness::new(60, 30);
        let mut component = SelectFormView::new();
        let state = AppState {
            loading: true,
            ..Default::default()
        };

        let output = render.render_to_string_plain(|frame| {
            let props = SelectFormProps {
                state: &state,
                is_focused: true,
            };
            component.render(frame, frame.area(), props);
        });

        assert!(output.contains("Loading…"));
        assert!(output.contains("cancel"));
    }
}
