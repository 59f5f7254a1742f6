pub mod client;
pub mod types;

use std::time::Duration;

use rand::Rng;
use tracing::{debug, info, warn};

use crate::bot::Bot;
use crate::membership::{AlwaysMember, MembershipChecker, MembershipError, check_membership};
use crate::render::{RenderOptions, render};
use crate::session::SessionId;

pub use self::client::{BotApi, ClientConfig, TelegramClient, TelegramError};
use self::types::{CallbackQuery, InlineKeyboardMarkup, Message, Update, User};

/// Membership backed by `getChatMember` on a channel.
pub struct ChannelMembership<'a> {
    api: &'a dyn BotApi,
    channel: &'a str,
}

impl<'a> ChannelMembership<'a> {
    pub fn new(api: &'a dyn BotApi, channel: &'a str) -> Self {
        Self { api, channel }
    }
}

impl MembershipChecker for ChannelMembership<'_> {
    fn is_member(&self, user_id: i64) -> Result<bool, MembershipError> {
        self.api
            .get_chat_member(self.channel, user_id)
            .map(|member| member.is_joined())
            .map_err(|e| MembershipError(e.to_string()))
    }
}

/// Settings for the long-poll loop.
#[derive(Debug, Clone)]
pub struct PollOptions {
    /// Server-side long-poll timeout.
    pub poll_timeout: Duration,
    /// Pause after a failed poll before trying again.
    pub retry_delay: Duration,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            poll_timeout: Duration::from_secs(30),
            retry_delay: Duration::from_secs(5),
        }
    }
}

/// Drives a [`Bot`] from Telegram updates.
pub struct TelegramBot<A: BotApi, G: Rng> {
    api: A,
    bot: Bot<G>,
    render_options: RenderOptions,
    poll: PollOptions,
    offset: Option<i64>,
}

impl<A: BotApi, G: Rng> TelegramBot<A, G> {
    pub fn new(api: A, bot: Bot<G>, render_options: RenderOptions, poll: PollOptions) -> Self {
        Self {
            api,
            bot,
            render_options,
            poll,
            offset: None,
        }
    }

    pub fn bot(&self) -> &Bot<G> {
        &self.bot
    }

    /// The offset the next `getUpdates` call will send.
    pub fn offset(&self) -> Option<i64> {
        self.offset
    }

    /// Poll forever, logging and backing off on failures.
    pub fn run(&mut self) {
        info!(
            recipes = self.bot.catalog().len(),
            gated = self.render_options.channel.is_some(),
            "telegram bot polling"
        );
        loop {
            match self.poll_once() {
                Ok(count) => {
                    if count > 0 {
                        debug!(count, "updates handled");
                    }
                }
                Err(e) => {
                    warn!(error = %e, "polling failed, retrying");
                    std::thread::sleep(self.poll.retry_delay);
                }
            }
            self.bot.evict_idle();
        }
    }

    /// Fetch one batch of updates and handle each. Returns the batch size.
    ///
    /// The offset advances past every update, including ones that failed
    /// to handle, so a bad update is never redelivered.
    ///
    /// # Errors
    ///
    /// Returns [`TelegramError`] if fetching updates fails.
    pub fn poll_once(&mut self) -> Result<usize, TelegramError> {
        let updates = self.api.get_updates(self.offset, self.poll.poll_timeout)?;
        let count = updates.len();
        for update in updates {
            let update_id = update.update_id;
            self.offset = Some(update_id + 1);
            if let Err(e) = self.handle_update(update) {
                warn!(update = update_id, error = %e, "failed to handle update");
            }
        }
        Ok(count)
    }

    /// Dispatch a single update.
    ///
    /// # Errors
    ///
    /// Returns [`TelegramError`] if sending the reply fails.
    pub fn handle_update(&mut self, update: Update) -> Result<(), TelegramError> {
        if let Some(query) = update.callback_query {
            return self.handle_callback(query);
        }
        if let Some(message) = update.message {
            return self.handle_message(message);
        }
        Ok(())
    }

    fn handle_message(&mut self, message: Message) -> Result<(), TelegramError> {
        let (Some(text), Some(user)) = (message.text.as_deref(), message.from.as_ref()) else {
            return Ok(());
        };
        let session = SessionId(user.id);

        let reply = if is_start_command(text) {
            let member = self.is_member(user.id);
            self.bot.on_start(session, member)
        } else if text.starts_with('/') {
            debug!(command = text, "ignoring unknown command");
            return Ok(());
        } else {
            let member = self.is_member(user.id);
            self.bot.on_ingredients_text(session, text, member)
        };

        let rendered = render(&reply, &self.options_for(user));
        let markup = InlineKeyboardMarkup::from_rendered(&rendered);
        self.api
            .send_message(message.chat.id, &rendered.text, markup.as_ref())
    }

    fn handle_callback(&mut self, query: CallbackQuery) -> Result<(), TelegramError> {
        if let Err(e) = self.api.answer_callback_query(&query.id) {
            warn!(error = %e, "failed to answer callback query");
        }
        let Some(data) = query.data.as_deref() else {
            return Ok(());
        };

        let reply = self.bot.on_callback(SessionId(query.from.id), data);
        let rendered = render(&reply, &self.options_for(&query.from));
        let markup = InlineKeyboardMarkup::from_rendered(&rendered);

        match &query.message {
            Some(message) if reply.edits_message() => self.api.edit_message_text(
                message.chat.id,
                message.message_id,
                &rendered.text,
                markup.as_ref(),
            ),
            Some(message) => {
                self.api
                    .send_message(message.chat.id, &rendered.text, markup.as_ref())
            }
            // Private chats share the user's id.
            None => self
                .api
                .send_message(query.from.id, &rendered.text, markup.as_ref()),
        }
    }

    fn is_member(&self, user_id: i64) -> bool {
        match self.render_options.channel.as_deref() {
            Some(channel) => check_membership(&ChannelMembership::new(&self.api, channel), user_id),
            None => check_membership(&AlwaysMember, user_id),
        }
    }

    fn options_for(&self, user: &User) -> RenderOptions {
        RenderOptions {
            user_name: (!user.first_name.is_empty()).then(|| user.first_name.clone()),
            ..self.render_options.clone()
        }
    }
}

/// `/start`, optionally addressed (`/start@my_bot`) or with a payload.
fn is_start_command(text: &str) -> bool {
    let command = text.split_whitespace().next().unwrap_or_default();
    command == "/start" || command.starts_with("/start@")
}
