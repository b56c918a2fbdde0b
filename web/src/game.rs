use crate::utils::*;
use gloo::timers::callback::Timeout;
use pairflip_core as game;
use web_time::Instant;
use yew::prelude::*;

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    Flip(game::CardIndex),
    SelectDifficulty(game::Difficulty),
    NewGame,
    Resolve,
    Changed(game::GameSnapshot),
}

#[derive(Properties, Debug, Clone, PartialEq)]
pub(crate) struct GameProps {
    pub seed: Option<u64>,
    pub difficulty: game::Difficulty,
}

#[derive(Properties, Clone, PartialEq)]
struct CardProps {
    index: game::CardIndex,
    card: game::CardView,
    #[prop_or_default]
    locked: bool,
    callback: Callback<Msg>,
}

#[function_component(CardButton)]
fn card_component(props: &CardProps) -> Html {
    use game::CardFace::*;

    let CardProps {
        index,
        card,
        locked,
        callback,
    } = props.clone();

    let mut class = classes!(
        "card",
        match card.face {
            Hidden => classes!(),
            Revealed => classes!("open"),
            Solved => classes!("open", "solved"),
            MatchGlow => classes!("open", "solved", "glow"),
        }
    );
    if locked {
        class.push("locked");
    }

    let style = card.color.map(|color| format!("--card-color: {}", color));
    let onclick = Callback::from(move |_: MouseEvent| {
        log::trace!("card {} clicked", index);
        callback.emit(Msg::Flip(index));
    });

    html! {
        <button {class} {style} {onclick}>{ card.symbol.unwrap_or_default() }</button>
    }
}

#[derive(Debug)]
pub(crate) struct GameView {
    controller: game::Controller,
    snapshot: game::GameSnapshot,
    resolve_timer: Option<Timeout>,
}

impl GameView {
    /// Arms a browser timeout for the controller's pending deadline, replacing any previous one.
    fn schedule_resolution(&mut self, ctx: &Context<Self>) {
        self.resolve_timer = self
            .controller
            .time_until_resolution(Instant::now())
            .map(|delay| {
                let link = ctx.link().clone();
                let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
                log::trace!("resolution timer armed for {}ms", millis);
                Timeout::new(millis, move || link.send_message(Msg::Resolve))
            });
    }

    fn view_stats(&self) -> Html {
        let snapshot = &self.snapshot;
        html! {
            <p class="stats">
                { format!(
                    "Moves: {}  •  Pairs: {}/{}  •  Cards: {}",
                    snapshot.moves,
                    snapshot.matched_pairs,
                    snapshot.total_pairs,
                    snapshot.config.total_cards()
                ) }
            </p>
        }
    }

    fn view_difficulty_buttons(&self, ctx: &Context<Self>) -> Html {
        let current = self.snapshot.config.difficulty();
        html! {
            <nav class="difficulty">
                { for game::Difficulty::ALL.into_iter().map(|difficulty| {
                    let class = classes!("difficulty-button", (difficulty == current).then_some("selected"));
                    let onclick = ctx.link().callback(move |_| Msg::SelectDifficulty(difficulty));
                    html! {
                        <button {class} {onclick}>{ difficulty.name().to_uppercase() }</button>
                    }
                }) }
            </nav>
        }
    }

    fn view_recent_matches(&self) -> Html {
        html! {
            <aside class="matches">
                <h2>{"Latest Matches:"}</h2>
                { for self.snapshot.recent_matches.iter().map(|symbol| html! {
                    <div class="match-entry">{ *symbol }</div>
                }) }
            </aside>
        }
    }

    fn view_board(&self, ctx: &Context<Self>) -> Html {
        let callback = ctx.link().callback(|msg: Msg| msg);
        let locked = self.snapshot.is_resolving();
        let cols = usize::from(self.snapshot.config.cols());
        let class = classes!(
            "board",
            format!("board-{}", self.snapshot.config.difficulty_name().to_lowercase())
        );

        html! {
            <table {class}>
                { for self.snapshot.cards.rows().into_iter().enumerate().map(|(row, cards)| html! {
                    <tr>
                        { for cards.iter().enumerate().map(|(col, card)| html! {
                            <td>
                                <CardButton
                                    index={row * cols + col}
                                    card={*card}
                                    {locked}
                                    callback={callback.clone()}
                                />
                            </td>
                        }) }
                    </tr>
                }) }
            </table>
        }
    }

    fn view_win(&self, ctx: &Context<Self>) -> Html {
        html! {
            <section class="win">
                <h2>{"🎉 YOU WIN! 🎉"}</h2>
                <button class="main-button" onclick={ctx.link().callback(|_| Msg::NewGame)}>
                    {"Play Again"}
                </button>
            </section>
        }
    }
}

impl Component for GameView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        let props = ctx.props();
        let seed = props.seed.unwrap_or_else(js_random_seed);
        log::debug!("seed: {}", seed);

        let mut controller =
            game::Controller::new(game::GameState::new(props.difficulty.config(), seed));
        let link = ctx.link().clone();
        controller.subscribe(move |snapshot| link.send_message(Msg::Changed(snapshot.clone())));
        let snapshot = controller.snapshot();

        Self {
            controller,
            snapshot,
            resolve_timer: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Flip(index) => match self.controller.flip(index) {
                Ok(outcome) => {
                    if outcome.scheduled().is_some() {
                        self.schedule_resolution(ctx);
                    }
                    false
                }
                Err(err) => {
                    log::error!("flip {} rejected: {}", index, err);
                    false
                }
            },
            Msg::Resolve => {
                let outcome = self.controller.poll();
                log::debug!("resolution: {:?}", outcome);
                // timers can fire a hair early, re-arm if still pending
                self.schedule_resolution(ctx);
                false
            }
            Msg::SelectDifficulty(difficulty) => {
                self.resolve_timer = None;
                self.controller.select_difficulty(difficulty);
                false
            }
            Msg::NewGame => {
                self.resolve_timer = None;
                self.controller.request_new_game();
                false
            }
            Msg::Changed(snapshot) => {
                self.snapshot = snapshot;
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let board = if self.snapshot.is_won() {
            self.view_win(ctx)
        } else {
            self.view_board(ctx)
        };

        html! {
            <main class="memory-game">
                <header>
                    <h1>{"Memory Game"}</h1>
                    <p class="description">{ self.snapshot.config.description() }</p>
                    { self.view_stats() }
                    { self.view_difficulty_buttons(ctx) }
                </header>
                { self.view_recent_matches() }
                { board }
                <footer>
                    <button class="main-button" onclick={ctx.link().callback(|_| Msg::NewGame)}>
                        {"New Game"}
                    </button>
                </footer>
            </main>
        }
    }
}
