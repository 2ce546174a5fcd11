//! Minimal UI rendering

use ratatui::{
    layout::{Constraint, Layout, Position, Rect},
    style::{Color, Style, Stylize},
    text::Line,
    widgets::{Block, Padding, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, LoadStatus};
use crate::popups;
use howmuch_core::{Answer, Query};

/// Color palette - minimal and elegant (TTY 16-color compatible)
pub mod palette {
    use ratatui::style::Color;

    pub const DIM: Color = Color::DarkGray;
    pub const ACCENT: Color = Color::Cyan;
    pub const NUMBER: Color = Color::Yellow;
    pub const UNIT: Color = Color::Blue;
    pub const BAR: Color = Color::LightGreen;
    pub const ERROR: Color = Color::Red;
    pub const TEXT: Color = Color::Gray;
}

/// Columns drawn for one whole reference in a comparison bar
const BAR_WIDTH: usize = 8;

const SPINNER: [char; 4] = ['|', '/', '-', '\\'];

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Layout: Header | Input | Interpretation | Results | Footer
    let [header_area, input_area, note_area, main_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .areas(area);

    draw_header(frame, header_area);
    draw_input(frame, input_area, app);

    let query = app.query();
    match &query {
        Some(Query::Answer(answer)) => {
            let mut note = vec![Line::from(answer.interpretation.clone().fg(palette::TEXT))];
            if !answer.unit.description.is_empty() {
                note.push(Line::from(answer.unit.description.clone().fg(palette::DIM)));
            }
            draw_note(frame, note_area, note);
            draw_answer(frame, main_area, answer);
        }
        _ if app.apology => {
            let apology = "Sorry, I don't recognise that unit. Try something like \"3 cubic metres\".";
            draw_note(frame, note_area, vec![Line::from(apology.fg(palette::ERROR))]);
        }
        _ => {}
    }

    draw_footer(frame, footer_area, app);

    if app.show_help {
        popups::draw_help_popup(frame, area);
    }
}

fn draw_header(frame: &mut Frame, area: Rect) {
    let block = Block::default().style(Style::new().bg(palette::DIM).fg(Color::White));
    let paragraph = Paragraph::new(" howmuch - how much is that, really? ").block(block);
    frame.render_widget(paragraph, area);
}

fn draw_input(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::bordered()
        .border_style(Style::new().fg(palette::ACCENT))
        .padding(Padding::horizontal(1));
    let inner = block.inner(area);

    // Keep the cursor in view on long input
    let width = inner.width as usize;
    let offset = (app.cursor + 1).saturating_sub(width);
    let visible: String = app.input.chars().skip(offset).take(width).collect();

    let line = if app.input.is_empty() {
        Line::from("e.g. 3 cubic metres".fg(palette::DIM))
    } else {
        Line::from(visible.fg(Color::White))
    };
    frame.render_widget(Paragraph::new(line).block(block), area);

    let x = inner.x + app.cursor.saturating_sub(offset) as u16;
    frame.set_cursor_position(Position::new(x, inner.y));
}

fn draw_note(frame: &mut Frame, area: Rect, note: Vec<Line<'_>>) {
    let paragraph = Paragraph::new(note)
        .block(Block::default().padding(Padding::horizontal(2)))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

/// Conversions on the left, comparisons with bars on the right
fn draw_answer(frame: &mut Frame, area: Rect, answer: &Answer<'_>) {
    let [conversions_area, comparisons_area] =
        Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)]).areas(area);

    let mut lines = vec![
        Line::from(answer.conversions_title().bold()),
        Line::from(""),
    ];
    if answer.conversions.is_empty() {
        lines.push(Line::from("Nothing else measures this.".fg(palette::DIM)));
    }
    for conversion in &answer.conversions {
        lines.push(Line::from(vec![
            conversion.formatted.clone().fg(palette::NUMBER),
            "  ".into(),
            conversion.unit.name.clone().fg(palette::UNIT),
        ]));
    }
    let paragraph = Paragraph::new(lines)
        .block(Block::default().padding(Padding::horizontal(2)))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, conversions_area);

    if answer.comparisons.is_empty() {
        return;
    }
    let mut lines = vec![
        Line::from(answer.comparisons_title().bold()),
        Line::from(""),
    ];
    for comparison in &answer.comparisons {
        lines.push(Line::from(comparison.phrase.clone().fg(palette::TEXT)));
        lines.push(Line::from(
            bar_line(&comparison.bars(), BAR_WIDTH).fg(palette::BAR),
        ));
    }
    let paragraph = Paragraph::new(lines).block(Block::default().padding(Padding::horizontal(2)));
    frame.render_widget(paragraph, comparisons_area);
}

/// One block of `width` columns per whole reference, then a part-block
fn bar_line(segments: &[f64], width: usize) -> String {
    segments
        .iter()
        .map(|segment| {
            let cols = ((segment * width as f64).round() as usize).max(1);
            "█".repeat(cols)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn draw_footer(frame: &mut Frame, area: Rect, app: &App) {
    let mut hints = vec![
        "esc".fg(palette::ACCENT),
        " quit ".dim(),
        "^u".fg(palette::ACCENT),
        " clear ".dim(),
        "^s".fg(palette::ACCENT),
        " save ".dim(),
        "F1".fg(palette::ACCENT),
        " help ".dim(),
    ];

    match &app.load_status {
        LoadStatus::Loading => {
            let frame_idx = (app.load_start.elapsed().as_millis() / 100) as usize % SPINNER.len();
            hints.push(format!(" {} Loading units...", SPINNER[frame_idx]).fg(Color::Yellow));
        }
        LoadStatus::Ready => {}
        LoadStatus::Error(e) => {
            hints.push(format!(" Units: {e}").fg(palette::ERROR));
        }
    }

    if let Some(msg) = &app.status_message {
        hints.push(format!(" {msg}").fg(Color::Green));
    } else if let Some(fragment) = app.share_fragment() {
        hints.push(" share ".dim());
        hints.push(format!("#{fragment}").fg(palette::DIM));
    }

    frame.render_widget(Paragraph::new(Line::from(hints)), area);
}
