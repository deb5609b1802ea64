//! Memory Match entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlButtonElement, HtmlInputElement, KeyboardEvent, MouseEvent};

    use memory_match::game::{FlipOutcome, GameEvent, MemoryGame};
    use memory_match::leaderboard::{Leaderboard, standings};
    use memory_match::platform::{BrowserStorage, Clock, KeyValueStore, MemoryStorage, SystemClock};
    use memory_match::{GameConfig, GameResult, RemoteConfig, ScoreReporter, ScoreStore, SubmitError};

    struct App {
        game: MemoryGame,
        /// Card elements, indexed by board position
        cards: Vec<Element>,
        /// Last elapsed value written to the HUD
        shown_seconds: Option<u32>,
        /// Result of the won round, until submitted or restarted
        result: Option<GameResult>,
        leaderboard_size: usize,
        store: Rc<ScoreStore>,
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn set_text(id: &str, text: &str) {
        if let Some(el) = document().and_then(|d| d.get_element_by_id(id)) {
            el.set_text_content(Some(text));
        }
    }

    fn alert(message: &str) {
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(message);
        }
    }

    impl App {
        fn new(config: &GameConfig, seed: u64, store: Rc<ScoreStore>) -> Self {
            Self {
                game: MemoryGame::new(config, seed),
                cards: Vec::new(),
                shown_seconds: None,
                result: None,
                leaderboard_size: config.leaderboard_size,
                store,
            }
        }

        /// Sync card classes with the round state
        fn sync_cards(&self) {
            for (card, el) in self.game.state().deck.iter().zip(&self.cards) {
                let classes = el.class_list();
                let _ = classes.toggle_with_force("flipped", card.is_face_up());
                let _ = classes.toggle_with_force("matched", card.is_matched);
            }
        }

        fn mark_mismatch(&self, positions: [usize; 2], on: bool) {
            for position in positions {
                if let Some(el) = self.cards.get(position) {
                    let _ = el.class_list().toggle_with_force("mismatch", on);
                }
            }
        }

        /// Update the attempts and timer readouts
        fn update_hud(&mut self, now: f64) {
            set_text("attempts", &self.game.state().attempts.to_string());
            let seconds = self.game.elapsed_seconds(now);
            if self.shown_seconds != Some(seconds) {
                set_text("timer", &format!("{}초", seconds));
                self.shown_seconds = Some(seconds);
            }
        }

        fn handle_events(&mut self, events: Vec<GameEvent>) {
            for event in events {
                match event {
                    GameEvent::PairMatched { first, second } => {
                        self.mark_mismatch([first, second], false);
                    }
                    GameEvent::PairMismatched { first, second } => {
                        self.mark_mismatch([first, second], true);
                    }
                    GameEvent::CardsHidden { first, second } => {
                        self.mark_mismatch([first, second], false);
                    }
                    GameEvent::Won(result) => {
                        set_text("final-attempts", &result.attempts.to_string());
                        set_text("final-time", &format!("{}초", result.elapsed_seconds));
                        set_modal_visible(true);
                        self.result = Some(result);
                    }
                }
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Memory Match starting...");

        let config = GameConfig::default();
        let storage: Box<dyn KeyValueStore> = match BrowserStorage::local() {
            Ok(storage) => Box::new(storage),
            Err(e) => {
                log::warn!("{}; scores will not survive a reload", e);
                Box::new(MemoryStorage::new())
            }
        };
        let store = Rc::new(ScoreStore::from_config(
            &RemoteConfig::load(),
            storage,
            Rc::new(SystemClock),
        ));

        let seed = SystemClock.now_ms() as u64;
        let app = Rc::new(RefCell::new(App::new(&config, seed, store)));
        log::info!("Game initialized with seed: {}", seed);

        build_board(app.clone());
        setup_restart_button(app.clone());
        setup_score_dialog(app.clone());
        load_leaderboard(app.clone());

        request_animation_frame(app);

        log::info!("Memory Match running!");
    }

    /// Recreate the card elements for the current round
    fn build_board(app: Rc<RefCell<App>>) {
        let Some(document) = document() else {
            return;
        };
        let Some(board) = document.get_element_by_id("game-board") else {
            log::error!("No #game-board element");
            return;
        };
        board.set_inner_html("");

        let mut cards = Vec::new();
        for card in app.borrow().game.state().deck.iter() {
            let Ok(el) = document.create_element("div") else {
                continue;
            };
            el.set_class_name("card");
            let _ = el.set_attribute("data-index", &card.position.to_string());

            if let Ok(front) = document.create_element("div") {
                front.set_class_name("card-front");
                front.set_text_content(Some(&card.symbol));
                let _ = el.append_child(&front);
            }
            if let Ok(back) = document.create_element("div") {
                back.set_class_name("card-back");
                let _ = el.append_child(&back);
            }

            let position = card.position;
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let now = SystemClock.now_ms();
                let mut a = app.borrow_mut();
                if let FlipOutcome::Ignored(reason) = a.game.flip(position, now) {
                    log::debug!("Flip on {} ignored: {:?}", position, reason);
                    return;
                }
                a.sync_cards();
                a.update_hud(now);
            });
            let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();

            let _ = board.append_child(&el);
            cards.push(el);
        }

        let mut a = app.borrow_mut();
        a.cards = cards;
        a.shown_seconds = None;
        a.update_hud(SystemClock.now_ms());
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            game_loop(app);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>) {
        {
            let now = SystemClock.now_ms();
            let mut a = app.borrow_mut();
            let events = a.game.advance(now);
            if !events.is_empty() {
                a.handle_events(events);
                a.sync_cards();
            }
            a.update_hud(now);
        }

        request_animation_frame(app);
    }

    fn set_modal_visible(visible: bool) {
        if let Some(modal) = document().and_then(|d| d.get_element_by_id("game-over-modal")) {
            let _ = modal.class_list().toggle_with_force("show", visible);
        }
    }

    fn close_modal() {
        set_modal_visible(false);
        if let Some(input) = player_name_input() {
            input.set_value("");
        }
    }

    fn player_name_input() -> Option<HtmlInputElement> {
        document()?
            .get_element_by_id("player-name")?
            .dyn_into::<HtmlInputElement>()
            .ok()
    }

    fn setup_restart_button(app: Rc<RefCell<App>>) {
        let Some(btn) = document().and_then(|d| d.get_element_by_id("restart-btn")) else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            {
                let mut a = app.borrow_mut();
                a.game.restart();
                a.result = None;
            }
            build_board(app.clone());
            load_leaderboard(app.clone());
            log::info!("Game restarted");
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_score_dialog(app: Rc<RefCell<App>>) {
        let Some(document) = document() else {
            return;
        };

        if let Some(btn) = document.get_element_by_id("submit-score-btn") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                submit_score(app.clone());
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("close-modal-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                close_modal();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Enter submits the name
        if let Some(input) = document.get_element_by_id("player-name") {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.key() == "Enter" {
                    submit_score(app.clone());
                }
            });
            let _ = input.add_event_listener_with_callback("keypress", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn submit_score(app: Rc<RefCell<App>>) {
        let name = player_name_input().map(|i| i.value()).unwrap_or_default();
        let (result, store) = {
            let a = app.borrow();
            (a.result, a.store.clone())
        };
        let Some(result) = result else {
            alert("점수 정보를 찾을 수 없습니다.");
            return;
        };

        let button = document()
            .and_then(|d| d.get_element_by_id("submit-score-btn"))
            .and_then(|el| el.dyn_into::<HtmlButtonElement>().ok());
        if let Some(btn) = &button {
            btn.set_disabled(true);
            btn.set_text_content(Some("저장 중..."));
        }

        wasm_bindgen_futures::spawn_local(async move {
            let reporter = ScoreReporter::new(store);
            match reporter.submit(&name, &result).await {
                Ok(_) => {
                    alert("리더보드에 등록되었습니다!");
                    app.borrow_mut().result = None;
                    close_modal();
                    load_leaderboard(app.clone());
                }
                Err(SubmitError::EmptyName) => alert("이름을 입력해주세요."),
                Err(e) => {
                    log::error!("Score submission failed: {}", e);
                    alert(&e.to_string());
                }
            }
            if let Some(btn) = &button {
                btn.set_disabled(false);
                btn.set_text_content(Some("리더보드에 등록"));
            }
        });
    }

    /// Fetch and render the ranked list
    fn load_leaderboard(app: Rc<RefCell<App>>) {
        let Some(document) = document() else {
            return;
        };
        let Some(container) = document.get_element_by_id("leaderboard") else {
            return;
        };
        let (store, size) = {
            let a = app.borrow();
            (a.store.clone(), a.leaderboard_size)
        };

        container.set_inner_html("");
        append_message(&document, &container, "리더보드를 불러오는 중...");

        wasm_bindgen_futures::spawn_local(async move {
            let records = Leaderboard::new(store).top_scores(size).await;
            container.set_inner_html("");
            match records {
                Ok(records) if records.is_empty() => {
                    append_message(
                        &document,
                        &container,
                        "아직 기록이 없습니다. 게임을 완료하면 기록이 표시됩니다!",
                    );
                }
                Ok(records) => {
                    for (rank, record) in standings(&records) {
                        let Ok(item) = document.create_element("div") else {
                            continue;
                        };
                        item.set_class_name(&match rank {
                            1..=3 => format!("leaderboard-item rank-{}", rank),
                            _ => "leaderboard-item".to_string(),
                        });
                        for (class, text) in [
                            ("leaderboard-rank", rank.to_string()),
                            ("leaderboard-name", record.player_name.clone()),
                            ("leaderboard-score", record.summary()),
                        ] {
                            if let Ok(span) = document.create_element("span") {
                                span.set_class_name(class);
                                span.set_text_content(Some(&text));
                                let _ = item.append_child(&span);
                            }
                        }
                        let _ = container.append_child(&item);
                    }
                }
                Err(e) => {
                    log::error!("Leaderboard load failed: {}", e);
                    append_message(
                        &document,
                        &container,
                        "리더보드를 불러올 수 없습니다. 콘솔을 확인하세요.",
                    );
                }
            }
        });
    }

    fn append_message(document: &Document, container: &Element, text: &str) {
        if let Ok(p) = document.create_element("p") {
            p.set_class_name("loading");
            p.set_text_content(Some(text));
            let _ = container.append_child(&p);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Memory Match (native) starting...");
    log::info!("Native mode plays a demo round - run with `trunk serve` for the web version");

    if let Err(e) = native_demo::run() {
        log::error!("Demo failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// A perfect-memory player against a seeded round, scored into local storage
#[cfg(not(target_arch = "wasm32"))]
mod native_demo {
    use std::collections::HashMap;
    use std::rc::Rc;

    use futures::executor::block_on;
    use memory_match::game::{GameEvent, MemoryGame};
    use memory_match::leaderboard::{Leaderboard, standings};
    use memory_match::platform::{Clock, MemoryStorage, SystemClock};
    use memory_match::{GameConfig, GameResult, RemoteConfig, ScoreReporter, ScoreStore, SubmitError};

    /// Long enough for any pending transition to run
    const TURN_MS: f64 = 3000.0;

    pub fn run() -> Result<(), SubmitError> {
        let config = GameConfig::default();
        let seed = SystemClock.now_ms() as u64;
        let mut game = MemoryGame::new(&config, seed);
        log::info!("Dealt {} cards with seed {}", game.state().deck.len(), seed);

        let store = ScoreStore::from_config(
            &RemoteConfig::load(),
            Box::new(MemoryStorage::new()),
            Rc::new(SystemClock),
        );

        let Some(result) = play(&mut game) else {
            println!("Round did not finish");
            return Ok(());
        };
        println!(
            "Won in {} attempts ({}s of game time)",
            result.attempts, result.elapsed_seconds
        );

        block_on(ScoreReporter::new(&store).submit("demo", &result))?;
        let top = block_on(Leaderboard::new(&store).top_scores(config.leaderboard_size))?;
        for (rank, record) in standings(&top) {
            println!("{:>2}. {:<12} {}", rank, record.player_name, record.summary());
        }
        Ok(())
    }

    /// Flip unseen cards in order, pairing any symbol seen before
    fn play(game: &mut MemoryGame) -> Option<GameResult> {
        let mut seen: HashMap<String, Vec<usize>> = HashMap::new();
        let mut now = 0.0;

        for _ in 0..game.state().deck.len() * 2 {
            if let Some(result) = game.result() {
                return Some(result);
            }

            let known_pair = seen.values().find(|p| p.len() == 2).map(|p| (p[0], p[1]));
            match known_pair {
                Some((a, b)) => {
                    game.flip(a, now);
                    game.flip(b, now);
                }
                None => {
                    let a = next_unseen(game, &seen)?;
                    game.flip(a, now);
                    let symbol = game.state().deck[a].symbol.clone();
                    let partner = seen.get(&symbol).and_then(|p| p.first().copied());
                    seen.entry(symbol).or_default().push(a);

                    let b = match partner {
                        Some(b) => b,
                        None => {
                            let b = next_unseen(game, &seen)?;
                            let symbol = game.state().deck[b].symbol.clone();
                            seen.entry(symbol).or_default().push(b);
                            b
                        }
                    };
                    game.flip(b, now);
                }
            }

            now += TURN_MS;
            for event in game.advance(now) {
                if let GameEvent::PairMatched { first, .. } = event {
                    let symbol = &game.state().deck[first].symbol;
                    seen.remove(symbol);
                }
            }
        }
        game.result()
    }

    fn next_unseen(game: &MemoryGame, seen: &HashMap<String, Vec<usize>>) -> Option<usize> {
        game.state()
            .deck
            .iter()
            .find(|c| !c.is_matched && !seen.values().any(|p| p.contains(&c.position)))
            .map(|c| c.position)
    }
}
