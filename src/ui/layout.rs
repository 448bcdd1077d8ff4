use tui::layout::{Constraint, Layout, Rect, Size};
pub const TAB_BAR_HEIGHT: u16 = 3;
pub const STATUS_HEIGHT: u16 = 1;
/// Share of the body given to the log pane when it is open.
const LOG_PERCENT: u16 = 30;

/// Pre-computed layout areas for the main draw loop.
pub struct LayoutAreas {
    pub tab_bar: [Rect; 2],
    pub main: Rect,
    pub status: Rect,
    pub logs: Option<Rect>,
}

impl LayoutAreas {
    pub fn new(size: Size) -> Self {
        let rect = Rect::new(0, 0, size.width, size.height);
        Self::from_rect(rect, false, false)
    }

    pub fn update(&mut self, area: Rect, full_screen: bool, show_logs: bool) {
        *self = Self::from_rect(area, full_screen, show_logs);
    }

    fn from_rect(area: Rect, full_screen: bool, show_logs: bool) -> Self {
        if full_screen {
            let [main] = Layout::vertical([Constraint::Fill(1)]).areas(area);
            return LayoutAreas {
                tab_bar: [Rect::ZERO, Rect::ZERO],
                main,
                status: Rect::ZERO,
                logs: None,
            };
        }

        let [tab, body, status] = Layout::vertical([
            Constraint::Length(TAB_BAR_HEIGHT),
            Constraint::Fill(1),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .areas(area);

        let (main, logs) = if show_logs {
            let [main, logs] =
                Layout::vertical([Constraint::Fill(1), Constraint::Percentage(LOG_PERCENT)]).areas(body);
            (main, Some(logs))
        } else {
            (body, None)
        };

        LayoutAreas {
            tab_bar: Self::split_tab_bar(tab),
            main,
            status,
            logs,
        }
    }

    fn split_tab_bar(area: Rect) -> [Rect; 2] {
        Layout::horizontal([Constraint::Percentage(85), Constraint::Percentage(15)]).areas(area)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_screen_gives_everything_to_main() {
        let area = Rect::new(0, 0, 120, 40);
        let layout = LayoutAreas::from_rect(area, true, true);
        assert_eq!(layout.main, area);
        assert_eq!(layout.status, Rect::ZERO);
        assert!(layout.logs.is_none());
    }

    #[test]
    fn log_pane_sits_between_main_and_status() {
        let layout = LayoutAreas::from_rect(Rect::new(0, 0, 120, 40), false, true);
        let logs = layout.logs.unwrap();
        assert_eq!(layout.main.y, TAB_BAR_HEIGHT);
        assert_eq!(logs.y, layout.main.y + layout.main.height);
        assert_eq!(layout.status.y, 39);
        assert_eq!(logs.y + logs.height, layout.status.y);
    }
}
