//! Pokedeck - browse Pokemon by type in the terminal

use std::cell::RefCell;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use pokedeck::action::Action;
use pokedeck::api::{CatalogClient, API_BASE};
use pokedeck::artwork::decode_artwork;
use pokedeck::components::{
    AlertModal, AlertModalProps, Component, MovesModal, MovesModalProps, PokemonCard,
    PokemonCardProps, SelectFormProps, SelectFormView,
};
use pokedeck::effect::Effect;
use pokedeck::loader::{self, LoadSlot};
use pokedeck::logging;
use pokedeck::reducer::reducer;
use pokedeck::state::{AppState, Screen, CATEGORIES, DEFAULT_COUNT};
use ratatui::{backend::CrosstermBackend, layout::Rect, Frame, Terminal};
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventContext, EventKind,
    EventRoutingState, HandlerResponse, Keybindings, RenderContext, TaskKey,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};

const SPINNER_TICK_MS: u64 = 90;
const LOAD_TASK: &str = "load";

static LOAD_SLOT: LoadSlot = LoadSlot::new();

/// Pokedeck - pick a type, flip through the cards
#[derive(Parser, Debug)]
#[command(name = "pokedeck")]
#[command(about = "Browse Pokemon by type, one card at a time")]
struct Args {
    /// Type to load right away
    #[arg(long, short, value_parser = clap::builder::PossibleValuesParser::new(CATEGORIES))]
    category: Option<String>,

    /// How many Pokemon to load (minimum 1)
    #[arg(long, short = 'n', default_value_t = DEFAULT_COUNT as u64, value_parser = clap::value_parser!(u64).range(1..))]
    count: u64,

    /// Catalog API root
    #[arg(long, env = "POKEDECK_API_BASE", default_value = API_BASE)]
    api_base: String,

    /// Log file (defaults to the user cache dir)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log level or filter directives
    #[arg(long, env = "POKEDECK_LOG", default_value = logging::DEFAULT_LOG_LEVEL)]
    log_level: String,

    #[command(flatten)]
    debug: DebugCliArgs,
}

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum DeckComponentId {
    Form,
    Card,
    Moves,
    Alert,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
enum DeckContext {
    Main,
    Modal,
}

impl EventRoutingState<DeckComponentId, DeckContext> for AppState {
    fn focused(&self) -> Option<DeckComponentId> {
        if self.alert.is_some() {
            return Some(DeckComponentId::Alert);
        }
        if self.moves_open {
            return Some(DeckComponentId::Moves);
        }
        match self.screen {
            Screen::Select => Some(DeckComponentId::Form),
            Screen::Results => Some(DeckComponentId::Card),
        }
    }

    fn modal(&self) -> Option<DeckComponentId> {
        if self.alert.is_some() {
            Some(DeckComponentId::Alert)
        } else if self.moves_open {
            Some(DeckComponentId::Moves)
        } else {
            None
        }
    }

    fn binding_context(&self, id: DeckComponentId) -> DeckContext {
        match id {
            DeckComponentId::Form | DeckComponentId::Card => DeckContext::Main,
            DeckComponentId::Moves | DeckComponentId::Alert => DeckContext::Modal,
        }
    }

    fn default_context(&self) -> DeckContext {
        DeckContext::Main
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let Args {
        category,
        count,
        api_base,
        log_file,
        log_level,
        debug: debug_args,
    } = Args::parse();

    let _log_guard = logging::init(log_file, &log_level);
    tracing::info!(%api_base, ?category, count, "starting pokedeck");

    let debug = DebugSession::new(debug_args);

    let autoload = category.is_some();
    let state = debug
        .load_state_or_else_async(move || async move {
            let state = AppState::new(api_base);
            let state = match category {
                Some(category) => state.with_selection(&category, count as usize),
                None => state,
            };
            Ok::<AppState, io::Error>(state)
        })
        .await
        .map_err(debug_error)?;

    let replay_actions = debug.load_replay_items().map_err(debug_error)?;

    let (middleware, action_recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    // ===== Terminal setup =====
    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let initial_action = autoload.then_some(Action::FormSubmit);
    let result = run_app(&mut terminal, &debug, store, replay_actions, initial_action).await;

    // ===== Cleanup =====
    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug
        .save_actions(action_recorder.as_ref())
        .map_err(debug_error)?;

    tracing::info!("pokedeck exited");
    Ok(())
}

struct DeckUi {
    form: SelectFormView,
    card: PokemonCard,
    moves: MovesModal,
    alert: AlertModal,
}

impl DeckUi {
    fn new() -> Self {
        Self {
            form: SelectFormView::new(),
            card: PokemonCard,
            moves: MovesModal::new(),
            alert: AlertModal::new(),
        }
    }

    fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        render_ctx: RenderContext,
        event_ctx: &mut EventContext<DeckComponentId>,
    ) {
        let has_modal = state.alert.is_some() || state.moves_open;
        let base_focused = render_ctx.is_focused() && !has_modal;

        match state.screen {
            Screen::Select => {
                event_ctx.set_component_area(DeckComponentId::Form, area);
                event_ctx.component_areas.remove(&DeckComponentId::Card);
                let props = SelectFormProps {
                    state,
                    is_focused: base_focused,
                };
                self.form.render(frame, area, props);
            }
            Screen::Results => {
                event_ctx.set_component_area(DeckComponentId::Card, area);
                event_ctx.component_areas.remove(&DeckComponentId::Form);
                let props = PokemonCardProps {
                    state,
                    is_focused: base_focused,
                };
                self.card.render(frame, area, props);
            }
        }

        match (state.moves_open, state.current()) {
            (true, Some(pokemon)) => {
                event_ctx.set_component_area(DeckComponentId::Moves, area);
                let props = MovesModalProps {
                    pokemon,
                    is_focused: render_ctx.is_focused() && state.alert.is_none(),
                };
                self.moves.render(frame, area, props);
            }
            _ => {
                event_ctx.component_areas.remove(&DeckComponentId::Moves);
            }
        }

        if let Some(message) = state.alert.as_deref() {
            event_ctx.set_component_area(DeckComponentId::Alert, area);
            let props = AlertModalProps {
                message,
                is_focused: render_ctx.is_focused(),
            };
            self.alert.render(frame, area, props);
        } else {
            event_ctx.component_areas.remove(&DeckComponentId::Alert);
        }
    }

    fn handle_form_event(&mut self, event: &EventKind, state: &AppState) -> HandlerResponse<Action> {
        let props = SelectFormProps {
            state,
            is_focused: true,
        };
        let actions: Vec<_> = self.form.handle_event(event, props).into_iter().collect();
        respond(actions)
    }

    fn handle_card_event(&mut self, event: &EventKind, state: &AppState) -> HandlerResponse<Action> {
        let props = PokemonCardProps {
            state,
            is_focused: true,
        };
        let actions: Vec<_> = self.card.handle_event(event, props).into_iter().collect();
        respond(actions)
    }

    fn handle_moves_event(&mut self, event: &EventKind, state: &AppState) -> HandlerResponse<Action> {
        let Some(pokemon) = state.current() else {
            return HandlerResponse::ignored();
        };
        let props = MovesModalProps {
            pokemon,
            is_focused: true,
        };
        let actions: Vec<_> = self.moves.handle_event(event, props).into_iter().collect();
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }

    fn handle_alert_event(&mut self, event: &EventKind, state: &AppState) -> HandlerResponse<Action> {
        let Some(message) = state.alert.as_deref() else {
            return HandlerResponse::ignored();
        };
        let props = AlertModalProps {
            message,
            is_focused: true,
        };
        let actions: Vec<_> = self.alert.handle_event(event, props).into_iter().collect();
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

fn respond(actions: Vec<Action>) -> HandlerResponse<Action> {
    if actions.is_empty() {
        HandlerResponse::ignored()
    } else {
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    replay_actions: Vec<ReplayItem<Action>>,
    initial_action: Option<Action>,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(DeckUi::new()));
    let mut bus: EventBus<AppState, Action, DeckComponentId, DeckContext> = EventBus::new();
    let keybindings: Keybindings<DeckContext> = Keybindings::new();

    let ui_form = Rc::clone(&ui);
    bus.register(DeckComponentId::Form, move |event, state| {
        ui_form.borrow_mut().handle_form_event(&event.kind, state)
    });

    let ui_card = Rc::clone(&ui);
    bus.register(DeckComponentId::Card, move |event, state| {
        ui_card.borrow_mut().handle_card_event(&event.kind, state)
    });

    let ui_moves = Rc::clone(&ui);
    bus.register(DeckComponentId::Moves, move |event, state| {
        ui_moves.borrow_mut().handle_moves_event(&event.kind, state)
    });

    let ui_alert = Rc::clone(&ui);
    bus.register(DeckComponentId::Alert, move |event, state| {
        ui_alert.borrow_mut().handle_alert_event(&event.kind, state)
    });

    bus.register_global(|event, _state| match event.kind {
        EventKind::Resize(_, _) => HandlerResponse::ignored().with_render(),
        _ => HandlerResponse::ignored(),
    });

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            initial_action,
            Some(Action::Quit),
            |runtime| {
                if debug.render_once() {
                    return;
                }

                runtime.subscriptions().interval(
                    "tick",
                    Duration::from_millis(SPINNER_TICK_MS),
                    || Action::Tick,
                );
            },
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            handle_effect,
        )
        .await
}

/// Handle effects by spawning tasks
fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>) {
    match effect {
        Effect::LoadCategory {
            api_base,
            category,
            count,
        } => {
            // Reusing the key replaces any load still in flight; its token is
            // cancelled too so it stops before the next detail request.
            let cancel = LOAD_SLOT.begin();
            ctx.tasks().spawn(TaskKey::new(LOAD_TASK), async move {
                let client = CatalogClient::new(api_base);
                match loader::load_batch(&client, &category, count, &cancel).await {
                    Ok(batch) => Action::LoadDidComplete(batch),
                    Err(err) => {
                        tracing::warn!(%category, error = %err, "load failed");
                        Action::LoadDidError(err.to_string())
                    }
                }
            });
        }
        Effect::CancelLoad => {
            tracing::info!("load cancelled");
            LOAD_SLOT.cancel();
            ctx.tasks().cancel(&TaskKey::new(LOAD_TASK));
        }
        Effect::LoadArtwork { name, url } => {
            let key = format!("artwork_{name}");
            ctx.tasks().spawn(TaskKey::new(key), async move {
                let client = CatalogClient::default();
                let decoded = match client.fetch_bytes(&url).await {
                    Ok(bytes) => decode_artwork(&bytes),
                    Err(err) => Err(err.to_string()),
                };
                match decoded {
                    Ok(artwork) => Action::ArtworkDidLoad { name, artwork },
                    Err(error) => {
                        tracing::warn!(%name, %error, "artwork unavailable");
                        Action::ArtworkDidError { name, error }
                    }
                }
            });
        }
    }
}
