//! Pure mapping from session state to display instructions.

use clara_core::Answer;

use crate::session::{ChatMessage, ChatSession, Role};

pub const TITLE_ICON: &str = "📋";
pub const SUMMARY_ICON: &str = "📝";
pub const RECOMMENDATION_ICON: &str = "💡";
pub const SUMMARY_LABEL: &str = "Resumo:";
pub const RECOMMENDATION_LABEL: &str = "Recomendação:";
pub const UNPROCESSABLE: &str = "Desculpe, não consegui processar sua pergunta.";

/// A formatted piece of a bubble
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading {
        icon: &'static str,
        text: String,
    },
    Section {
        icon: &'static str,
        label: &'static str,
        text: String,
    },
    Plain(String),
}

/// What the front-end has to draw
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Display {
    Bubble {
        role: Role,
        blocks: Vec<Block>,
        time: String,
    },
    TypingIndicator,
    Input {
        text: String,
        focused: bool,
    },
    SendControl {
        enabled: bool,
    },
}

/// Formats an answer: title, summary and recommendation in that order, each
/// only when present. An answer with no fields becomes a single apology.
pub fn render_answer(answer: &Answer) -> Vec<Block> {
    if answer.is_empty() {
        return vec![Block::Plain(UNPROCESSABLE.to_string())];
    }

    let mut blocks = Vec::with_capacity(3);

    if let Some(titulo) = &answer.titulo {
        blocks.push(Block::Heading {
            icon: TITLE_ICON,
            text: titulo.clone(),
        });
    }
    if let Some(resumo) = &answer.resumo {
        blocks.push(Block::Section {
            icon: SUMMARY_ICON,
            label: SUMMARY_LABEL,
            text: resumo.clone(),
        });
    }
    if let Some(recomendacao) = &answer.recomendacao {
        blocks.push(Block::Section {
            icon: RECOMMENDATION_ICON,
            label: RECOMMENDATION_LABEL,
            text: recomendacao.clone(),
        });
    }
    blocks
}

pub fn render_message(message: &ChatMessage) -> Display {
    Display::Bubble {
        role: message.role,
        blocks: message.content.clone(),
        time: message.time_label(),
    }
}

/// Full view of a session: transcript bubbles, then the typing placeholder
/// while a request is in flight, then the input box and send control.
pub fn render(session: &ChatSession) -> Vec<Display> {
    let mut view: Vec<Display> = session.transcript().iter().map(render_message).collect();

    if session.is_typing() {
        view.push(Display::TypingIndicator);
    }
    view.push(Display::Input {
        text: session.input().to_string(),
        focused: session.is_input_focused(),
    });
    view.push(Display::SendControl {
        enabled: session.is_send_enabled(),
    });
    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};

    #[test]
    fn test_full_answer() {
        let blocks = render_answer(&Answer::new("Chuva", "Vai chover.", "Leve guarda-chuva."));
        assert_eq!(
            blocks,
            vec![
                Block::Heading {
                    icon: "📋",
                    text: "Chuva".to_string()
                },
                Block::Section {
                    icon: "📝",
                    label: "Resumo:",
                    text: "Vai chover.".to_string()
                },
                Block::Section {
                    icon: "💡",
                    label: "Recomendação:",
                    text: "Leve guarda-chuva.".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_absent_fields_are_omitted() {
        let answer = Answer {
            recomendacao: Some("Descanse.".to_string()),
            ..Default::default()
        };
        assert_eq!(
            render_answer(&answer),
            vec![Block::Section {
                icon: RECOMMENDATION_ICON,
                label: RECOMMENDATION_LABEL,
                text: "Descanse.".to_string()
            }]
        );
    }

    #[test]
    fn test_empty_answer_falls_back() {
        assert_eq!(
            render_answer(&Answer::default()),
            vec![Block::Plain(UNPROCESSABLE.to_string())]
        );
    }

    #[test]
    fn test_render_follows_session_state() {
        let now = Local.with_ymd_and_hms(2026, 3, 14, 16, 45, 0).unwrap();
        let mut session = ChatSession::new();

        assert_eq!(
            render(&session),
            vec![
                Display::Input {
                    text: String::new(),
                    focused: true
                },
                Display::SendControl { enabled: true },
            ]
        );

        session.set_input("Oi");
        session.submit(now);
        let sending = render(&session);
        assert_eq!(sending.len(), 4);
        assert_eq!(
            sending[0],
            Display::Bubble {
                role: Role::User,
                blocks: vec![Block::Plain("Oi".to_string())],
                time: "16:45".to_string()
            }
        );
        assert_eq!(sending[1], Display::TypingIndicator);
        assert_eq!(sending[3], Display::SendControl { enabled: false });

        session.complete::<&str>(Ok(Answer::default()), now);
        let done = render(&session);
        assert_eq!(done.len(), 4);
        assert!(!done.contains(&Display::TypingIndicator));
        assert!(matches!(done[1], Display::Bubble { role: Role::Assistant, .. }));
        assert_eq!(done[3], Display::SendControl { enabled: true });
    }
}
