pub mod chrome;
pub mod form;
pub mod form_widget;
pub mod status_bar;
pub mod typeahead;

use crate::app::Effect;
use crate::nav::keys::FormCommand;
use crossterm::event::MouseEvent;
use ratatui::prelude::*;

pub trait Widget {
    fn render(&mut self, f: &mut Frame, area: Rect, focused: bool, tick: u64);
    fn on_command(&mut self, cmd: FormCommand) -> Vec<Effect> {
        let _ = cmd;
        Vec::new()
    }
    fn on_mouse(&mut self, ev: MouseEvent) -> Vec<Effect> {
        let _ = ev;
        Vec::new()
    }
}
