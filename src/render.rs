use crate::session::{Action, Notice, Prompt, Reply};

/// Default number of matches offered as buttons.
pub const DEFAULT_WINDOW: usize = 3;

const EXAMPLE: &str = "Example: egg, tomato, salt";

/// Presentation settings for one rendered reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// How many top matches become buttons.
    pub window: usize,
    /// Channel users must join, named in the join notice.
    pub channel: Option<String>,
    /// First name used in the welcome greeting.
    pub user_name: Option<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            channel: None,
            user_name: None,
        }
    }
}

/// A button that triggers an action when pressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub action: Action,
}

impl Button {
    fn new(label: impl Into<String>, action: Action) -> Self {
        Self {
            label: label.into(),
            action,
        }
    }
}

/// Message text plus rows of buttons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub text: String,
    pub keyboard: Vec<Vec<Button>>,
}

impl Rendered {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: Vec::new(),
        }
    }

    /// All buttons, row by row.
    pub fn buttons(&self) -> impl Iterator<Item = &Button> {
        self.keyboard.iter().flatten()
    }
}

fn another_and_restart() -> Vec<Button> {
    vec![
        Button::new("🔄 Another suggestion", Action::Another),
        Button::new("🔁 Start over", Action::Restart),
    ]
}

/// Render a reply into message text and buttons.
pub fn render(reply: &Reply, options: &RenderOptions) -> Rendered {
    match reply {
        Reply::JoinRequired => Rendered::text(join_required_text(options.channel.as_deref())),
        Reply::Greeting(prompt) => Rendered::text(prompt_text(*prompt, options.user_name.as_deref())),
        Reply::Suggestions(matches) => {
            let mut keyboard: Vec<Vec<Button>> = matches
                .iter()
                .take(options.window)
                .map(|m| {
                    let noun = if m.overlap == 1 {
                        "ingredient"
                    } else {
                        "ingredients"
                    };
                    vec![Button::new(
                        format!("{} ({} shared {noun})", m.recipe.name(), m.overlap),
                        Action::Select(m.recipe.name().to_owned()),
                    )]
                })
                .collect();
            keyboard.push(another_and_restart());
            Rendered {
                text: "🍽 Here is what you can make with your ingredients:".to_owned(),
                keyboard,
            }
        }
        Reply::NoMatches => Rendered {
            text: "😞 Sorry, I have nothing to suggest for those ingredients.".to_owned(),
            keyboard: vec![
                vec![
                    Button::new("🎲 Random recipe", Action::Random),
                    Button::new("➕ Add ingredients", Action::AddMore),
                ],
                vec![Button::new("🔁 Start over", Action::Restart)],
            ],
        },
        Reply::Detail(recipe) => {
            let mut text = format!("🍴 {}\n\n📝 Ingredients:\n", recipe.name());
            for ingredient in recipe.ingredients() {
                text.push_str(&format!("- {ingredient}\n"));
            }
            if !recipe.instructions().is_empty() {
                text.push_str(&format!("\n🔪 Instructions:\n{}", recipe.instructions()));
            }
            Rendered {
                text: text.trim_end().to_owned(),
                keyboard: vec![another_and_restart()],
            }
        }
        Reply::Error(notice) => Rendered::text(notice_text(notice)),
    }
}

fn join_required_text(channel: Option<&str>) -> String {
    match channel {
        Some(channel) => format!(
            "⚠️ Please join our channel to use this bot:\n👉 {channel}\nThen send /start again."
        ),
        None => "⚠️ Please join our channel to use this bot, then send /start again.".to_owned(),
    }
}

fn prompt_text(prompt: Prompt, user_name: Option<&str>) -> String {
    match prompt {
        Prompt::Welcome => {
            let hello = match user_name {
                Some(name) => format!("Hi {name}! 👩‍🍳"),
                None => "Hi! 👩‍🍳".to_owned(),
            };
            format!("{hello}\nTell me which ingredients you have and I'll suggest a dish.\n{EXAMPLE}")
        }
        Prompt::Restarted => {
            format!("🔄 Starting over!\nSend me your ingredients:\n{EXAMPLE}")
        }
        Prompt::MoreIngredients => "Which other ingredients do you have?".to_owned(),
    }
}

fn notice_text(notice: &Notice) -> &'static str {
    match notice {
        Notice::UnknownRecipe(_) | Notice::EmptyCatalog => "Sorry, something went wrong!",
        Notice::StaleAction => "That button has expired. Send me your ingredients again.",
    }
}
