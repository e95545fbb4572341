//! [`Game`] implementation: routes input to the session, advances it by
//! frame ticks, and keeps the notice feed in sync with emitted events.

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::Frame;

use crate::games::Game;
use crate::input::{ClickState, InputEvent};

use super::feed::Feed;
use super::{actions, render, Session};

pub struct TubeCoinsGame {
    session: Session,
    feed: Feed,
}

impl TubeCoinsGame {
    pub fn new(session: Session) -> Self {
        let mut game = Self {
            session,
            feed: Feed::new(),
        };
        // Offline earnings are emitted while the session opens.
        game.pump_events();
        game
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn feed(&self) -> &Feed {
        &self.feed
    }

    fn pump_events(&mut self) {
        for event in self.session.drain_events() {
            self.feed.record(&event);
        }
    }
}

impl Game for TubeCoinsGame {
    fn handle_input(&mut self, event: &InputEvent) -> bool {
        let Some(intent) = actions::intent_for(event, self.session.state()) else {
            return false;
        };
        self.session.dispatch(intent);
        self.pump_events();
        true
    }

    fn tick(&mut self, delta_ticks: u32) {
        if delta_ticks == 0 {
            return;
        }
        self.session.advance(delta_ticks);
        self.pump_events();
    }

    fn render(&self, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
        render::render(self.session.state(), &self.feed, f, area, click_state);
    }
}
