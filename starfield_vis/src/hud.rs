use macroquad::prelude::*;

pub const SIDEBAR_W: f32 = 340.0;
pub const UI_MARGIN: f32 = 12.0;
const UI_GAP: f32 = 6.0;
const HUD_FONT_SIZE: u16 = 18;
const HUD_LINE_H: f32 = 20.0;

pub fn sidebar_rect() -> Rect {
    Rect::new(
        screen_width() - SIDEBAR_W - UI_MARGIN,
        UI_MARGIN,
        SIDEBAR_W,
        screen_height() - 2.0 * UI_MARGIN,
    )
}

pub fn draw_panel(rect: Rect) {
    draw_rectangle(
        rect.x,
        rect.y,
        rect.w,
        rect.h,
        Color::new(0.05, 0.06, 0.10, 0.85),
    );
    draw_rectangle_lines(
        rect.x,
        rect.y,
        rect.w,
        rect.h,
        1.0,
        Color::new(0.28, 0.30, 0.40, 1.0),
    );
}

/// Greedy word wrap to `max_w` pixels; a word wider than a whole line is cut between chars.
pub fn wrap_line(text: &str, max_w: f32) -> Vec<String> {
    let fits = |s: &str| measure_text(s, None, HUD_FONT_SIZE, 1.0).width <= max_w;
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        let sep = if line.is_empty() { "" } else { " " };
        if fits(format!("{line}{sep}{word}").as_str()) {
            line.push_str(sep);
            line.push_str(word);
            continue;
        }
        if !line.is_empty() {
            lines.push(std::mem::take(&mut line));
        }
        for ch in word.chars() {
            line.push(ch);
            if line.chars().nth(1).is_some() && !fits(line.as_str()) {
                line.pop();
                lines.push(std::mem::take(&mut line));
                line.push(ch);
            }
        }
    }

    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Draws wrapped lines top-down; returns the y where drawing stopped.
pub fn draw_lines_wrapped(lines: &[String], rect: Rect, start_y: f32, color: Color) -> f32 {
    let max_w = (rect.w - 2.0 * UI_GAP).max(1.0);
    let mut y = start_y + HUD_FONT_SIZE as f32;

    for line in lines {
        // Code blocks keep their line structure.
        let segs = if line.starts_with("    ") {
            vec![line.clone()]
        } else {
            wrap_line(line, max_w)
        };
        for seg in segs {
            if y > rect.y + rect.h - UI_GAP {
                return y;
            }
            draw_text(&seg, rect.x + UI_GAP, y, HUD_FONT_SIZE as f32, color);
            y += HUD_LINE_H;
        }
    }
    y
}

pub fn draw_heading(text: &str, rect: Rect, y: f32) -> f32 {
    draw_text(text, rect.x + UI_GAP, y + 22.0, 22.0, Color::new(0.7, 0.85, 1.0, 1.0));
    y + 28.0
}

/// Full-screen message used while records load or after they fail.
pub fn draw_status_screen(title: &str, detail: &str) {
    clear_background(Color::from_rgba(2, 2, 8, 255));
    let w = screen_width().min(720.0);
    let rect = Rect::new((screen_width() - w) * 0.5, screen_height() * 0.35, w, 160.0);
    draw_panel(rect);
    let y = draw_heading(title, rect, rect.y + UI_GAP);
    draw_lines_wrapped(&[detail.to_string()], rect, y, LIGHTGRAY);
}
