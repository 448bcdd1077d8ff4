use crate::components::banner_frames::{
    BannerColor, BannerTheme, ball_row, basketball_frame, resolve, round_label, title_rows,
};
use bracket_sim::RoundKind;
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::Style;
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Widget};

pub use crate::components::banner_frames::FRAME_COUNT;

pub struct AnimatedBanner {
    pub frame: usize,
    pub tick: u64,
    pub theme: BannerTheme,
    /// Round of the game the simulation resolves next, if a run is going.
    pub next_round: Option<RoundKind>,
    pub decided: usize,
    pub total: usize,
}

impl Default for AnimatedBanner {
    fn default() -> Self {
        Self {
            frame: 0,
            tick: 0,
            theme: BannerTheme::Dark,
            next_round: None,
            decided: 0,
            total: 63,
        }
    }
}

impl AnimatedBanner {
    fn progress_text(&self) -> String {
        let phase = match self.next_round {
            Some(round) => format!("NEXT: {}", round_label(round)),
            None if self.decided == self.total && self.total > 0 => "COMPLETE".to_string(),
            None => "READY".to_string(),
        };
        format!("{}/{} GAMES  |  {phase}", self.decided, self.total)
    }
}

impl Widget for AnimatedBanner {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 20 || area.height < 3 {
            render_line(
                Line::from(" BRACKET SIM "),
                area.x,
                area.y,
                area.width,
                buf,
            );
            return;
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(resolve(BannerColor::Primary, self.theme));
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        if inner.width < 66 {
            render_compact(&self, inner, buf);
            return;
        }
        render_full(&self, inner, buf);
    }
}

fn render_compact(banner: &AnimatedBanner, inner: Rect, buf: &mut Buffer) {
    let title = "BRACKET SIMULATOR";
    render_centered(
        Line::from(Span::styled(title, resolve(BannerColor::Accent, banner.theme))),
        inner,
        inner.y,
        buf,
    );
    if inner.height > 1 {
        render_centered(
            Line::from(Span::styled(
                banner.progress_text(),
                resolve(BannerColor::Secondary, banner.theme),
            )),
            inner,
            inner.y + 1,
            buf,
        );
    }
}

fn render_full(banner: &AnimatedBanner, inner: Rect, buf: &mut Buffer) {
    let title = title_rows();
    let left_ball = basketball_frame(banner.frame);
    let right_ball = basketball_frame((banner.frame + 2) % FRAME_COUNT);
    let ball_y = ball_row(banner.tick, 5);
    let show_right_ball = inner.width > 86;

    for row in 0..4u16 {
        if row >= inner.height {
            break;
        }
        let y = inner.y + row;
        let ball_style = if row == ball_y {
            resolve(BannerColor::Secondary, banner.theme)
        } else {
            resolve(BannerColor::Shadow, banner.theme)
        };

        let mut spans = Vec::new();
        spans.push(Span::styled(left_ball[row as usize].to_string(), ball_style));
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            title[row as usize].to_string(),
            resolve(BannerColor::Primary, banner.theme),
        ));
        if show_right_ball {
            spans.push(Span::raw(" "));
            spans.push(Span::styled(right_ball[row as usize].to_string(), ball_style));
        }
        render_centered(Line::from(spans), inner, y, buf);
    }

    if inner.height > 4 {
        render_centered(
            Line::from(Span::styled(
                format!(" {} ", banner.progress_text()),
                resolve(BannerColor::Accent, banner.theme),
            )),
            inner,
            inner.y + 4,
            buf,
        );
    }
}

fn render_centered(line: Line, area: Rect, y: u16, buf: &mut Buffer) {
    if y >= area.y + area.height {
        return;
    }
    let w = line.width() as u16;
    let x = area.x + area.width.saturating_sub(w) / 2;
    render_line(line, x, y, area.width, buf);
}

fn render_line(line: Line, x: u16, y: u16, max_width: u16, buf: &mut Buffer) {
    let mut cx = x;
    let limit = x.saturating_add(max_width);
    for span in &line.spans {
        let text = span.content.as_ref();
        let style: Style = span.style;
        let mut run = String::new();
        for ch in text.chars() {
            if cx >= limit {
                break;
            }
            run.push(ch);
            cx += 1;
        }
        let start = cx.saturating_sub(run.chars().count() as u16);
        if !run.is_empty() {
            buf.set_string(start, y, run, style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_reflects_run_state() {
        let mut banner = AnimatedBanner::default();
        assert_eq!(banner.progress_text(), "0/63 GAMES  |  READY");

        banner.decided = 40;
        banner.next_round = Some(RoundKind::Sweet16);
        assert_eq!(banner.progress_text(), "40/63 GAMES  |  NEXT: SWEET 16");

        banner.decided = 63;
        banner.next_round = None;
        assert_eq!(banner.progress_text(), "63/63 GAMES  |  COMPLETE");
    }

    #[test]
    fn narrow_area_renders_compact_title() {
        let area = Rect::new(0, 0, 40, 4);
        let mut buf = Buffer::empty(area);
        AnimatedBanner::default().render(area, &mut buf);
        let row: String = (0..area.width).map(|x| buf[(x, 1)].symbol().to_string()).collect();
        assert!(row.contains("BRACKET SIMULATOR"), "{row:?}");
    }
}
