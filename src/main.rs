//! Silent Kapten entry point
//!
//! Owns the timers, input and network calls; the session decides everything else.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlElement, KeyboardEvent};

    use silent_kapten::Settings;
    use silent_kapten::audio::AudioManager;
    use silent_kapten::consts::TICK_INTERVAL_MS;
    use silent_kapten::narrative::NarrativeClient;
    use silent_kapten::platform::{Input, input_for_key};
    use silent_kapten::renderer;
    use silent_kapten::sim::{Command, Effect, Session};

    /// A running `setInterval` and the closure it calls
    struct Ticker {
        handle: i32,
        _callback: Closure<dyn FnMut()>,
    }

    /// Game instance holding all state
    struct Game {
        session: Session,
        settings: Settings,
        audio: AudioManager,
        narrative: NarrativeClient,
        board: HtmlElement,
        ticker: Option<Ticker>,
        /// A stopped ticker may still be on the call stack; dropped on the next start
        retired: Option<Ticker>,
    }

    impl Game {
        fn draw(&self) {
            let snap = self.session.snapshot();
            self.board
                .set_text_content(Some(&renderer::render(&snap, self.settings.show_key_hints)));

            if let Some(body) = web_sys::window()
                .and_then(|w| w.document())
                .and_then(|d| d.body())
            {
                let class = format!("status-{:?}", snap.status).to_lowercase();
                let _ = body.set_attribute("class", &class);
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        // A second init (hot reload) keeps the first logger
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Silent Kapten starting...");

        let Some(board) = board_element() else {
            log::error!("No document to draw the board into");
            return;
        };

        let settings = Settings::load();
        let narrative = NarrativeClient::new(settings.narrative.clone());
        if !narrative.config().is_configured() {
            log::warn!("No narrative API key - using fallback text");
        }

        let game = Rc::new(RefCell::new(Game {
            session: Session::new(),
            audio: AudioManager::new(&settings),
            settings,
            narrative,
            board,
            ticker: None,
            retired: None,
        }));
        game.borrow().draw();

        fetch_briefing(game.clone());
        setup_input_handlers(game.clone());
        setup_focus_handlers(game);

        log::info!("Silent Kapten running!");
    }

    /// The `#board` element, created as a `<pre>` when the page has none
    fn board_element() -> Option<HtmlElement> {
        let document = web_sys::window()?.document()?;
        if let Some(el) = document.get_element_by_id("board") {
            return el.dyn_into::<HtmlElement>().ok();
        }
        let el = document
            .create_element("pre")
            .ok()?
            .dyn_into::<HtmlElement>()
            .ok()?;
        el.set_id("board");
        document.body()?.append_child(&el).ok()?;
        Some(el)
    }

    /// Apply a command, carry out its effects, redraw
    fn dispatch(game: &Rc<RefCell<Game>>, command: Command) {
        let effects = game.borrow_mut().session.apply(command);
        run_effects(game, effects);
        game.borrow().draw();
    }

    fn restart(game: &Rc<RefCell<Game>>) {
        let effects = game.borrow_mut().session.restart();
        run_effects(game, effects);
        game.borrow().draw();
    }

    fn run_effects(game: &Rc<RefCell<Game>>, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Cue(cue) => game.borrow().audio.play(cue),
                Effect::StartTicker => start_ticker(game),
                Effect::StopTicker => stop_ticker(game),
                Effect::ScheduleSuccess { delay_ms } => schedule_success(game.clone(), delay_ms),
                Effect::FetchRadioDialogue {
                    generation,
                    situation,
                } => fetch_radio_dialogue(game.clone(), generation, situation),
            }
        }
    }

    fn start_ticker(game: &Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let mut g = game.borrow_mut();
        if g.ticker.is_some() {
            return;
        }
        g.retired = None;

        let tick_game = game.clone();
        let callback = Closure::<dyn FnMut()>::new(move || {
            dispatch(&tick_game, Command::Tick);
        });
        match window.set_interval_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            TICK_INTERVAL_MS as i32,
        ) {
            Ok(handle) => {
                g.ticker = Some(Ticker {
                    handle,
                    _callback: callback,
                });
            }
            Err(e) => log::error!("Failed to start ticker: {:?}", e),
        }
    }

    fn stop_ticker(game: &Rc<RefCell<Game>>) {
        let mut g = game.borrow_mut();
        if let Some(ticker) = g.ticker.take() {
            if let Some(window) = web_sys::window() {
                window.clear_interval_with_handle(ticker.handle);
            }
            g.retired = Some(ticker);
        }
    }

    fn schedule_success(game: Rc<RefCell<Game>>, delay_ms: u32) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let callback = Closure::once_into_js(move || {
            dispatch(&game, Command::CompleteMission);
        });
        if let Err(e) = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.unchecked_ref(),
            delay_ms as i32,
        ) {
            log::error!("Failed to schedule success: {:?}", e);
        }
    }

    fn fetch_briefing(game: Rc<RefCell<Game>>) {
        let client = game.borrow().narrative.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let text = client.briefing_or_fallback().await;
            dispatch(&game, Command::BriefingArrived(text));
        });
    }

    fn fetch_radio_dialogue(game: Rc<RefCell<Game>>, generation: u64, situation: String) {
        let client = game.borrow().narrative.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let text = client.radio_dialogue_or_fallback(&situation).await;
            dispatch(&game, Command::RadioDialogueArrived { generation, text });
        });
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                match input_for_key(&event.key()) {
                    Some(Input::Command(command)) => {
                        // Keep arrows and space from scrolling the page
                        event.prevent_default();
                        dispatch(&game, command);
                    }
                    Some(Input::Restart) => {
                        if game.borrow().session.status().is_terminal() {
                            restart(&game);
                        }
                    }
                    Some(Input::ToggleMute) => {
                        let mut g = game.borrow_mut();
                        let muted = g.settings.toggle_mute();
                        g.settings.save();
                        let settings = g.settings.clone();
                        g.audio.apply_settings(&settings);
                        log::info!("Audio {}", if muted { "muted" } else { "unmuted" });
                    }
                    Some(Input::Quit) | None => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        let Some(document) = window.document() else {
            return;
        };

        // Start button
        if let Some(btn) = document.get_element_by_id("start-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                dispatch(&game, Command::StartMission);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Restart button
        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                restart(&game);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_focus_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        for (event, focused) in [("blur", false), ("focus", true)] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().audio.set_focused(focused);
            });
            let _ = window.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native_game {
    use std::time::Duration;

    use tokio::io::{AsyncBufReadExt, BufReader};
    use tokio::sync::mpsc;
    use tokio::time::{self, Instant, Interval, MissedTickBehavior};

    use silent_kapten::Settings;
    use silent_kapten::consts::TICK_INTERVAL_MS;
    use silent_kapten::narrative::NarrativeClient;
    use silent_kapten::platform::{Input, inputs_for_line};
    use silent_kapten::renderer;
    use silent_kapten::sim::{Command, Effect, Session};

    /// Terminal shell: stdin for keys, tokio for timers and fetches
    struct Shell {
        session: Session,
        settings: Settings,
        narrative: NarrativeClient,
        ticker: Option<Interval>,
        /// Replies from spawned timers and fetches
        tx: mpsc::UnboundedSender<Command>,
    }

    impl Shell {
        fn dispatch(&mut self, command: Command) {
            let effects = self.session.apply(command);
            self.run_effects(effects);
        }

        fn run_effects(&mut self, effects: Vec<Effect>) {
            for effect in effects {
                match effect {
                    Effect::Cue(cue) => log::debug!("cue: {}", cue.name()),
                    Effect::StartTicker => {
                        let period = Duration::from_millis(u64::from(TICK_INTERVAL_MS));
                        let mut interval = time::interval_at(Instant::now() + period, period);
                        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                        self.ticker = Some(interval);
                    }
                    Effect::StopTicker => self.ticker = None,
                    Effect::ScheduleSuccess { delay_ms } => {
                        let tx = self.tx.clone();
                        tokio::spawn(async move {
                            time::sleep(Duration::from_millis(u64::from(delay_ms))).await;
                            let _ = tx.send(Command::CompleteMission);
                        });
                    }
                    Effect::FetchRadioDialogue {
                        generation,
                        situation,
                    } => {
                        let tx = self.tx.clone();
                        let client = self.narrative.clone();
                        tokio::spawn(async move {
                            let text = client.radio_dialogue_or_fallback(&situation).await;
                            let _ = tx.send(Command::RadioDialogueArrived { generation, text });
                        });
                    }
                }
            }
        }

        fn draw(&self) {
            let frame = renderer::render(&self.session.snapshot(), self.settings.show_key_hints);
            // Clear screen, cursor home
            println!("\x1b[2J\x1b[H{}", frame);
        }
    }

    /// Resolves on the next tick, never while the ticker is stopped
    async fn next_tick(ticker: &mut Option<Interval>) {
        match ticker {
            Some(interval) => {
                interval.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }

    pub async fn run() {
        let settings = Settings::load();
        let narrative = NarrativeClient::new(settings.narrative.clone());
        if !narrative.config().is_configured() {
            log::warn!("NARRATIVE_API_KEY not set - using fallback text");
        }

        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut shell = Shell {
            session: Session::new(),
            settings,
            narrative,
            ticker: None,
            tx,
        };

        {
            let tx = shell.tx.clone();
            let client = shell.narrative.clone();
            tokio::spawn(async move {
                let text = client.briefing_or_fallback().await;
                let _ = tx.send(Command::BriefingArrived(text));
            });
        }

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        shell.draw();

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let line = match line {
                        Ok(Some(line)) => line,
                        Ok(None) => break,
                        Err(e) => {
                            log::error!("stdin: {}", e);
                            break;
                        }
                    };
                    let mut quit = false;
                    for input in inputs_for_line(&line) {
                        match input {
                            Input::Command(command) => shell.dispatch(command),
                            Input::Restart => {
                                if shell.session.status().is_terminal() {
                                    let effects = shell.session.restart();
                                    shell.run_effects(effects);
                                }
                            }
                            Input::ToggleMute => {
                                log::info!("Cues are only logged in the terminal");
                            }
                            Input::Quit => {
                                quit = true;
                                break;
                            }
                        }
                    }
                    if quit {
                        break;
                    }
                }
                _ = next_tick(&mut shell.ticker) => shell.dispatch(Command::Tick),
                Some(command) = rx.recv() => shell.dispatch(command),
            }
            shell.draw();
        }

        let effects = shell.session.teardown();
        shell.run_effects(effects);
        log::info!("Silent Kapten exiting");
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main]
async fn main() {
    env_logger::init();
    log::info!("Silent Kapten (terminal) starting...");
    native_game::run().await;
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
