use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::render::{Block, Display};
use crate::session::Role;

/// Draws successive [`render`](crate::render::render) views of one session.
///
/// Bubbles already on screen are not printed again and the typing indicator
/// becomes a spinner that lives until a view without it is drawn.
#[derive(Default)]
pub struct TerminalView {
    bubbles_shown: usize,
    spinner: Option<ProgressBar>,
}

impl TerminalView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draw(&mut self, view: &[Display]) {
        let mut bubbles = 0;
        let mut typing = false;

        for display in view {
            match display {
                Display::Bubble { role, blocks, time } => {
                    if bubbles >= self.bubbles_shown {
                        self.stop_spinner();
                        print_bubble(*role, blocks, time);
                    }
                    bubbles += 1;
                }
                Display::TypingIndicator => typing = true,
                // The terminal owns the input line and there is no button to grey out.
                Display::Input { .. } | Display::SendControl { .. } => {}
            }
        }

        self.bubbles_shown = bubbles;
        if typing {
            self.start_spinner();
        } else {
            self.stop_spinner();
        }
    }

    fn start_spinner(&mut self) {
        if self.spinner.is_some() {
            return;
        }
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
                .template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message("Clara is typing...");
        spinner.enable_steady_tick(Duration::from_millis(120));
        self.spinner = Some(spinner);
    }

    fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }
}

fn print_bubble(role: Role, blocks: &[Block], time: &str) {
    let who = match role {
        Role::User => "You".green().bold(),
        Role::Assistant => "Clara".blue().bold(),
    };
    println!("{} {}", who, format!("[{}]", time).dimmed());
    println!("{}", format_blocks(blocks));
    println!();
}

/// Lays out bubble blocks, separated by blank lines
pub fn format_blocks(blocks: &[Block]) -> String {
    blocks
        .iter()
        .map(|block| match block {
            Block::Heading { icon, text } => format!("{} {}", icon, text.bold()),
            Block::Section { icon, label, text } => {
                format!("{} {}\n{}", icon, label.bold(), text)
            }
            Block::Plain(text) => text.clone(),
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Show usage instructions when no question or mode is given
pub fn print_usage_instructions() {
    println!("{}", "Usage:".yellow().bold());
    println!("  {}", "clara-chat \"sua pergunta\"".green().bold());
    println!("    Ask Clara a single question");
    println!();
    println!("  {}", "clara-chat -i".green().bold());
    println!("    Start an interactive chat session");
    println!();
    println!("{}", "Options:".cyan());
    println!("  --endpoint <URL>  Query Service endpoint (env: CLARA_API_URL)");
    println!("  --help            Show this help message");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::render;
    use crate::session::{ChatSession, Key};
    use chrono::{Local, TimeZone};
    use clara_core::Answer;

    #[test]
    fn test_view_tracks_bubbles_and_typing() {
        let now = Local.with_ymd_and_hms(2026, 3, 14, 9, 5, 0).unwrap();
        let mut session = ChatSession::new();
        let mut view = TerminalView::new();

        view.draw(&render(&session));
        assert_eq!(view.bubbles_shown, 0);
        assert!(view.spinner.is_none());

        session.set_input("Vai chover?");
        assert!(session.key_press(Key::Enter, false, now).is_some());
        view.draw(&render(&session));
        assert_eq!(view.bubbles_shown, 1);
        assert!(view.spinner.is_some());

        session.complete::<&str>(Ok(Answer::new("Chuva", "Sim.", "Leve guarda-chuva.")), now);
        view.draw(&render(&session));
        assert_eq!(view.bubbles_shown, 2);
        assert!(view.spinner.is_none());
    }

    #[test]
    fn test_format_blocks_layout() {
        colored::control::set_override(false);
        let blocks = vec![
            Block::Heading {
                icon: "📋",
                text: "Título".to_string(),
            },
            Block::Section {
                icon: "📝",
                label: "Resumo:",
                text: "Um resumo.".to_string(),
            },
        ];
        assert_eq!(format_blocks(&blocks), "📋 Título\n\n📝 Resumo:\nUm resumo.");
    }
}
