//! Server-side painter for the fixtures board.
//!
//! Takes an already-built [`Board`] and writes markup; no filtering or
//! sorting happens here.

use crate::board::{Board, CompetitionFilter, EventLine, MatchCard, TeamLine, View, ViewState};

const STYLE_CSS: &str = r#"
body { font-family: system-ui, sans-serif; background: #f3f4f6; color: #111827; margin: 0; }
header { background: #065f46; color: #fff; padding: 12px 20px; }
form.controls { display: flex; gap: 8px; align-items: center; padding: 12px 20px; }
form.controls button { padding: 6px 14px; border: 1px solid #065f46; background: #fff; cursor: pointer; }
form.controls button.active { background: #065f46; color: #fff; }
main { display: grid; grid-template-columns: repeat(auto-fill, minmax(320px, 1fr)); gap: 12px; padding: 0 20px 20px; }
.card { background: #fff; border-radius: 8px; padding: 12px; box-shadow: 0 1px 3px rgba(0,0,0,.15); }
.league { display: flex; gap: 8px; align-items: center; font-size: .9em; color: #374151; }
.league img, .team img { width: 24px; height: 24px; object-fit: contain; }
.teams { display: flex; justify-content: space-between; margin: 10px 0; font-weight: 600; }
.team { display: flex; gap: 6px; align-items: center; }
.meta { display: flex; flex-direction: column; font-size: .85em; color: #4b5563; }
.events { margin-top: 8px; font-size: .85em; border-top: 1px solid #e5e7eb; }
.placeholder { padding: 20px; color: #6b7280; }
"#;

pub fn render_page(state: &ViewState, options: &[CompetitionFilter], board: &Board) -> String {
    let mut out = String::with_capacity(4096);
    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    out.push_str("<title>Matchday</title>\n<style>");
    out.push_str(STYLE_CSS);
    out.push_str("</style>\n</head>\n<body>\n<header><h1>Matchday</h1></header>\n");
    out.push_str(&render_controls(state, options));

    match board {
        Board::Cards(cards) => {
            out.push_str("<main>\n");
            for card in cards {
                out.push_str(&render_card(card));
            }
            out.push_str("</main>\n");
        }
        other => {
            let text = other.placeholder().unwrap_or_default();
            out.push_str(&format!("<p class=\"placeholder\">{}</p>\n", html_escape(&text)));
        }
    }

    out.push_str("</body>\n</html>\n");
    out
}

fn render_controls(state: &ViewState, options: &[CompetitionFilter]) -> String {
    let mut out = String::from("<form class=\"controls\" method=\"get\" action=\"/board\">\n");
    out.push_str(&format!(
        "<input type=\"hidden\" name=\"current\" value=\"{}\">\n",
        state.view.as_param()
    ));
    for view in View::ALL {
        let class = if view == state.view { " class=\"active\"" } else { "" };
        out.push_str(&format!(
            "<button type=\"submit\" name=\"view\" value=\"{}\"{class}>{}</button>\n",
            view.as_param(),
            view_title(view)
        ));
    }

    out.push_str("<select name=\"competition\" onchange=\"this.form.submit()\">\n");
    for option in options {
        let selected = if *option == state.competition { " selected" } else { "" };
        out.push_str(&format!(
            "<option value=\"{}\"{selected}>{}</option>\n",
            html_escape(option.as_param()),
            html_escape(option.label())
        ));
    }
    out.push_str("</select>\n</form>\n");
    out
}

fn render_card(card: &MatchCard) -> String {
    let mut out = String::from("<div class=\"card\">\n");

    out.push_str("<div class=\"league\">");
    if let Some(logo) = &card.league.logo {
        out.push_str(&format!(
            "<img src=\"{}\" alt=\"{}\">",
            html_escape(logo),
            html_escape(&card.league.name)
        ));
    }
    out.push_str(&format!(
        "<div><span>{}</span><br><span>{}</span></div></div>\n",
        html_escape(&card.league.name),
        html_escape(&card.league.round)
    ));

    out.push_str("<div class=\"teams\">");
    out.push_str(&render_team(&card.home, false));
    out.push_str(&render_team(&card.away, true));
    out.push_str("</div>\n");

    out.push_str(&format!(
        "<div class=\"meta\"><span>{}</span><span>{}</span><span>{}</span><span>{}</span></div>\n",
        html_escape(&card.kickoff),
        html_escape(&card.status),
        html_escape(&card.venue),
        html_escape(&card.referee)
    ));

    if !card.events.is_empty() {
        out.push_str("<div class=\"events\"><h4>Events</h4>\n");
        for event in &card.events {
            out.push_str(&render_event(event));
        }
        out.push_str("</div>\n");
    }

    out.push_str("</div>\n");
    out
}

fn render_team(team: &TeamLine, away: bool) -> String {
    let logo = team
        .logo
        .as_deref()
        .map(|src| {
            format!(
                "<img src=\"{}\" alt=\"{}\">",
                html_escape(src),
                html_escape(&team.name)
            )
        })
        .unwrap_or_default();
    let name = format!("<span>{}</span>", html_escape(&team.name));
    let score = format!("<span class=\"score\">{}</span>", html_escape(&team.score));
    if away {
        format!("<div class=\"team\">{score}{name}{logo}</div>")
    } else {
        format!("<div class=\"team\">{logo}{name}{score}</div>")
    }
}

fn render_event(event: &EventLine) -> String {
    format!("<div class=\"event\">{}</div>\n", html_escape(&event.summary()))
}

fn view_title(view: View) -> &'static str {
    match view {
        View::Live => "Live",
        View::Finished => "Finished",
        View::Today => "Today",
    }
}

pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}
