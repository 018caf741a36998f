mod animation;
mod fetch;
mod render;
mod state;

use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use chuva_alerta_core::{Registry, DEFAULT_POLL_INTERVAL_SECS};
use ratzilla::ratatui::Terminal;
use ratzilla::{DomBackend, WebRenderer};
use wasm_bindgen_futures::spawn_local;

use crate::fetch::{api_base_url, fetch_current, fetch_history, IntervalHandle};
use crate::state::{Command, WebState};

type SharedState = Rc<RefCell<WebState>>;

fn main() -> io::Result<()> {
    let base_url: Rc<str> = api_base_url().into();
    let state: SharedState = Rc::new(RefCell::new(WebState::new(Registry::default())));

    // Mount fetch, then one per interval for the life of the page
    spawn_local(refresh(state.clone(), base_url.clone()));
    let poll_ms = i32::try_from(DEFAULT_POLL_INTERVAL_SECS * 1000).unwrap_or(i32::MAX);
    let poll = IntervalHandle::start(poll_ms, {
        let state = state.clone();
        let base_url = base_url.clone();
        move || spawn_local(refresh(state.clone(), base_url.clone()))
    })
    .map_err(|error| {
        io::Error::new(io::ErrorKind::Other, format!("could not start polling: {error:?}"))
    })?;

    let backend = DomBackend::new()?;
    let mut terminal = Terminal::new(backend)?;

    terminal.on_key_event({
        let state = state.clone();
        let base_url = base_url.clone();
        move |event| {
            let command = state.borrow_mut().handle_key(event.code);
            match command {
                Some(Command::Refresh) => spawn_local(refresh(state.clone(), base_url.clone())),
                Some(Command::FetchHistory(name)) => {
                    spawn_local(load_history(state.clone(), base_url.clone(), name));
                }
                None => {}
            }
        }
    });

    terminal.draw_web(move |f| {
        // The interval lives as long as the render loop
        let _poll = &poll;

        let mut state = state.borrow_mut();
        state.tick(js_sys::Date::now() / 1000.0);
        render::render(&state, f);
    });

    Ok(())
}

async fn refresh(state: SharedState, base_url: Rc<str>) {
    let result = fetch_current(&base_url).await;
    if let Err(error) = &result {
        web_sys::console::error_1(&format!("could not load current conditions: {error}").into());
    }
    state.borrow_mut().apply_snapshots(result);
}

async fn load_history(state: SharedState, base_url: Rc<str>, neighborhood: &'static str) {
    let result = fetch_history(&base_url, neighborhood).await;
    state.borrow_mut().apply_history(neighborhood, result);
}
