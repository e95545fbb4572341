//! Browser entry point: a ratzilla DOM terminal wired to the game.

use std::{cell::RefCell, io, rc::Rc};

use ratzilla::event::{KeyCode, MouseButton, MouseEventKind};
use ratzilla::ratatui::Terminal;
use ratzilla::{DomBackend, WebRenderer};

use tubecoins::games::tubecoins::tuning::{Tuning, TICKS_PER_SECOND};
use tubecoins::games::tubecoins::{Session, TubeCoinsGame};
use tubecoins::games::Game;
use tubecoins::input::{pixel_x_to_col, pixel_y_to_row, ClickState, InputEvent};
use tubecoins::rng::ChaChaRewards;
use tubecoins::store::LocalStorageStore;
use tubecoins::time::{SystemClock, TickClock};

/// Convert page pixel coordinates to a terminal cell using the grid's
/// bounding rect.
fn dom_pixel_to_cell(mouse_x: u32, mouse_y: u32, cs: &ClickState) -> Option<(u16, u16)> {
    let window = web_sys::window()?;
    let document = window.document()?;

    // DomBackend renders its grid as a <div> directly under <body>.
    let grid = document.query_selector("body > div").ok()??;
    let rect = grid.get_bounding_client_rect();

    let col = pixel_x_to_col(mouse_x as f64 - rect.left(), rect.width(), cs.terminal_cols)?;
    let row = pixel_y_to_row(mouse_y as f64 - rect.top(), rect.height(), cs.terminal_rows)?;
    Some((col, row))
}

fn performance_now() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

pub fn run() -> io::Result<()> {
    console_error_panic_hook::set_once();

    let seed = (js_sys::Math::random() * u32::MAX as f64) as u64 ^ js_sys::Date::now() as u64;
    let session = Session::open(
        Box::new(LocalStorageStore::new()),
        Box::new(SystemClock),
        Box::new(ChaChaRewards::from_seed(seed)),
        Tuning::default(),
    );

    let game = Rc::new(RefCell::new(TubeCoinsGame::new(session)));
    let click_state = Rc::new(RefCell::new(ClickState::new()));
    let tick_clock = Rc::new(RefCell::new(TickClock::new(TICKS_PER_SECOND)));
    let backend = DomBackend::new()?;
    let terminal = Terminal::new(backend)?;

    terminal.on_mouse_event({
        let game = game.clone();
        let click_state = click_state.clone();
        move |mouse_event| {
            if mouse_event.event != MouseEventKind::Pressed
                || mouse_event.button != MouseButton::Left
            {
                return;
            }
            let hit = {
                let cs = click_state.borrow();
                if cs.terminal_rows == 0 || cs.terminal_cols == 0 {
                    return;
                }
                dom_pixel_to_cell(mouse_event.x, mouse_event.y, &cs)
                    .and_then(|(col, row)| cs.hit_test(col, row))
            };
            if let Some(action_id) = hit {
                game.borrow_mut().handle_input(&InputEvent::Click(action_id));
            }
        }
    });

    terminal.on_key_event({
        let game = game.clone();
        move |key_event| {
            if let KeyCode::Char(c) = key_event.code {
                game.borrow_mut().handle_input(&InputEvent::Key(c));
            }
        }
    });

    terminal.draw_web({
        let click_state = click_state.clone();
        move |f| {
            let ticks = tick_clock.borrow_mut().update(performance_now());
            game.borrow_mut().tick(ticks);

            let size = f.area();
            {
                let mut cs = click_state.borrow_mut();
                cs.terminal_cols = size.width;
                cs.terminal_rows = size.height;
                cs.clear_targets();
            }
            game.borrow().render(f, size, &click_state);
        }
    });

    Ok(())
}
