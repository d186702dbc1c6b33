use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Width at which the question screen gains a side panel.
const SIDEBAR_MIN_WIDTH: u16 = 100;

pub struct AppLayout {
    pub header: Rect,
    pub main: Rect,
    pub sidebar: Option<Rect>,
    pub footer: Rect,
}

impl AppLayout {
    pub fn new(area: Rect) -> Self {
        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(10),
                Constraint::Length(2),
            ])
            .split(area);

        if area.width >= SIDEBAR_MIN_WIDTH {
            let horizontal = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
                .split(vertical[1]);

            Self {
                header: vertical[0],
                main: horizontal[0],
                sidebar: Some(horizontal[1]),
                footer: vertical[2],
            }
        } else {
            Self {
                header: vertical[0],
                main: vertical[1],
                sidebar: None,
                footer: vertical[2],
            }
        }
    }
}

/// Greedily pack key hints into lines no wider than `width`.
pub fn pack_hint_lines(hints: &[&str], width: usize) -> Vec<String> {
    if width == 0 || hints.is_empty() {
        return Vec::new();
    }

    let mut out: Vec<String> = Vec::new();
    let mut current = String::from(" ");

    for hint in hints.iter().filter(|h| !h.is_empty()) {
        let candidate = if current.trim().is_empty() {
            format!(" {hint}")
        } else {
            format!("{current}  {hint}")
        };
        if candidate.chars().count() <= width || current.trim().is_empty() {
            current = candidate;
        } else {
            out.push(current);
            current = format!(" {hint}");
        }
    }

    if !current.trim().is_empty() {
        out.push(current);
    }
    out
}

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    const MIN_POPUP_WIDTH: u16 = 60;
    const MIN_POPUP_HEIGHT: u16 = 16;

    let requested_w = area.width.saturating_mul(percent_x.min(100)) / 100;
    let requested_h = area.height.saturating_mul(percent_y.min(100)) / 100;

    let target_w = requested_w.max(MIN_POPUP_WIDTH).min(area.width);
    let target_h = requested_h.max(MIN_POPUP_HEIGHT).min(area.height);

    let left = area.x + (area.width - target_w) / 2;
    let top = area.y + (area.height - target_h) / 2;

    Rect::new(left, top, target_w, target_h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sidebar_only_when_wide() {
        assert!(AppLayout::new(Rect::new(0, 0, 120, 40)).sidebar.is_some());
        assert!(AppLayout::new(Rect::new(0, 0, 80, 40)).sidebar.is_none());
    }

    #[test]
    fn test_pack_hint_lines_wraps() {
        let lines = pack_hint_lines(&["[Enter] Submit", "[Esc] Exit", "[Tab] Switch"], 28);
        assert_eq!(lines, vec![" [Enter] Submit  [Esc] Exit", " [Tab] Switch"]);
    }

    #[test]
    fn test_centered_rect_fits_small_area() {
        let area = Rect::new(0, 0, 40, 10);
        let rect = centered_rect(50, 50, area);
        assert_eq!(rect, area);
    }
}
