//! Telegram update handlers and bot runner

use super::adapter::TelegramAdapter;
use super::commands::{
    self, idle_keyboard, location_prompt_keyboard, location_request_keyboard,
    parse_location_callback, stop_keyboard, DriverCommand,
};
use super::flow::{self, Reply, ReplyKeyboard};
use super::jobs::JobHandle;
use crate::error::{Error, Result};
use chrono::Utc;
use convoy_core::TrackingService;
use std::sync::Arc;
use teloxide::{
    payloads::SendMessageSetters,
    prelude::*,
    types::{ChatId, KeyboardRemove, Message as TelegramMessage},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

impl TelegramAdapter {
    /// Run the bot until `shutdown` is cancelled
    #[instrument(skip_all)]
    pub async fn run(
        self: Arc<Self>,
        tracking: Arc<TrackingService>,
        shutdown: CancellationToken,
    ) -> Result<()> {
        info!("Starting Telegram bot");

        let bot = self.bot.clone();

        let me = bot
            .get_me()
            .await
            .map_err(|e| Error::Telegram(e.to_string()))?;
        let actual = me.username.as_deref().unwrap_or_default();
        if !self.config.matches_bot_username(actual) {
            warn!(
                configured = %self.config.bot_username,
                actual = %actual,
                "Tracking links point to a different bot"
            );
        }

        let on_message = {
            let adapter = self.clone();
            let tracking = tracking.clone();
            let shutdown = shutdown.clone();
            move |bot: Bot, msg: TelegramMessage| {
                let adapter = adapter.clone();
                let tracking = tracking.clone();
                let shutdown = shutdown.clone();
                async move { Self::handle_message(adapter, tracking, shutdown, bot, msg).await }
            }
        };

        // Live locations arrive as edits of the original message
        let on_edit = {
            let tracking = tracking.clone();
            move |msg: TelegramMessage| {
                let tracking = tracking.clone();
                async move { Self::handle_location(tracking, msg).await }
            }
        };

        let handler = dptree::entry()
            .branch(Update::filter_message().endpoint(on_message))
            .branch(Update::filter_edited_message().endpoint(on_edit))
            .branch(Update::filter_callback_query().endpoint(Self::handle_callback));

        // Unique distribution key per update so a slow reply never holds up
        // another driver's location report.
        let mut dispatcher = Dispatcher::builder(bot, handler)
            .distribution_function(|_| None::<std::convert::Infallible>)
            .build();

        let dispatcher_shutdown = dispatcher.shutdown_token();
        let watcher = tokio::spawn(async move {
            shutdown.cancelled().await;
            match dispatcher_shutdown.shutdown() {
                Ok(done) => done.await,
                Err(e) => debug!(error = ?e, "Dispatcher was not running"),
            }
        });

        dispatcher.dispatch().await;
        watcher.abort();

        info!("Telegram bot stopped");
        Ok(())
    }

    async fn handle_message(
        adapter: Arc<Self>,
        tracking: Arc<TrackingService>,
        shutdown: CancellationToken,
        bot: Bot,
        msg: TelegramMessage,
    ) -> ResponseResult<()> {
        if msg.location().is_some() {
            return Self::handle_location(tracking, msg).await;
        }

        let (Some(text), Some(user)) = (msg.text(), msg.from.as_ref()) else {
            return Ok(());
        };
        let user_id = user.id.0;
        let chat_id = msg.chat.id;

        match DriverCommand::parse(text) {
            Some(DriverCommand::Start { driver_id }) => {
                let Some(driver_id) = driver_id else {
                    return Ok(());
                };
                let username = Self::display_name(user);
                adapter
                    .handle_start(
                        &tracking,
                        &shutdown,
                        &bot,
                        chat_id,
                        user_id,
                        &driver_id,
                        &username,
                    )
                    .await
            }
            Some(DriverCommand::Stop) => {
                adapter.handle_stop(&tracking, &bot, chat_id, user_id).await
            }
            // Unknown slash commands
            _ if text.trim_start().starts_with('/') => Ok(()),
            command => {
                adapter
                    .handle_text(&tracking, &shutdown, &bot, chat_id, user_id, command)
                    .await
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    async fn handle_start(
        self: &Arc<Self>,
        tracking: &TrackingService,
        shutdown: &CancellationToken,
        bot: &Bot,
        chat_id: ChatId,
        user_id: u64,
        driver_id: &str,
        username: &str,
    ) -> ResponseResult<()> {
        let claimed = match tracking
            .register_driver(driver_id, user_id as i64, username)
            .await
        {
            Ok(claimed) => claimed,
            Err(e) => {
                error!(driver_id = %driver_id, error = %e, "Failed to register driver");
                return Ok(());
            }
        };

        let action = flow::after_claim(&self.jobs, shutdown, user_id, claimed);
        self.perform(bot, chat_id, user_id, action).await;
        Ok(())
    }

    async fn handle_stop(
        &self,
        tracking: &TrackingService,
        bot: &Bot,
        chat_id: ChatId,
        user_id: u64,
    ) -> ResponseResult<()> {
        let Some(binding) = Self::lookup(tracking, user_id).await else {
            return Ok(());
        };

        let mut deactivated = None;
        if let Some(binding) = binding {
            let changed = tracking
                .deactivate(&binding.driver_id)
                .await
                .unwrap_or_else(|e| {
                    error!(
                        driver_id = %binding.driver_id,
                        error = %e,
                        "Failed to deactivate driver"
                    );
                    false
                });
            deactivated = Some(changed);
        }

        let reply = flow::on_stop(&self.jobs, user_id, deactivated);
        send_reply(bot, chat_id, reply).await
    }

    /// Free text, including the auto-tracking keyboard buttons
    async fn handle_text(
        self: &Arc<Self>,
        tracking: &TrackingService,
        shutdown: &CancellationToken,
        bot: &Bot,
        chat_id: ChatId,
        user_id: u64,
        command: Option<DriverCommand>,
    ) -> ResponseResult<()> {
        let Some(binding) = Self::lookup(tracking, user_id).await else {
            return Ok(());
        };

        let action = flow::on_text(
            &self.jobs,
            shutdown,
            user_id,
            binding.as_ref().map(|b| b.driver_id.as_str()),
            command.as_ref(),
            self.config.auto_track_interval,
        );
        self.perform(bot, chat_id, user_id, action).await;
        Ok(())
    }

    /// Session bound to the user. `None` when the lookup itself failed.
    async fn lookup(
        tracking: &TrackingService,
        user_id: u64,
    ) -> Option<Option<convoy_core::DriverBinding>> {
        match tracking.store().driver_by_telegram_user(user_id as i64).await {
            Ok(binding) => Some(binding),
            Err(e) => {
                error!(user_id, error = %e, "Failed to look up driver");
                None
            }
        }
    }

    async fn perform(
        self: &Arc<Self>,
        bot: &Bot,
        chat_id: ChatId,
        user_id: u64,
        action: flow::Action,
    ) {
        let delivered = flow::deliver(&self.jobs, user_id, action, |reply| {
            send_reply(bot, chat_id, reply)
        })
        .await;

        match delivered {
            Ok(Some((job, driver_id))) => {
                info!(user_id, driver_id = %driver_id, "Auto tracking started");
                self.spawn_prompt_loop(bot.clone(), chat_id, user_id, driver_id, job);
            }
            Ok(None) => {}
            Err(e) => error!(user_id, error = %e, "Failed to send reply"),
        }
    }

    fn spawn_prompt_loop(
        self: &Arc<Self>,
        bot: Bot,
        chat_id: ChatId,
        user_id: u64,
        driver_id: String,
        job: JobHandle,
    ) {
        let adapter = self.clone();
        let interval = self.config.auto_track_interval;
        tokio::spawn(async move {
            loop {
                let prompt = bot
                    .send_message(chat_id, commands::LOCATION_PROMPT)
                    .reply_markup(location_prompt_keyboard(&driver_id))
                    .await;
                if let Err(e) = prompt {
                    warn!(user_id, error = %e, "Auto tracking prompt failed");
                    break;
                }

                tokio::select! {
                    _ = job.token.cancelled() => break,
                    _ = tokio::time::sleep(interval) => {}
                }
            }
            adapter.jobs.finish(user_id, job.id);
        });
    }

    async fn handle_location(
        tracking: Arc<TrackingService>,
        msg: TelegramMessage,
    ) -> ResponseResult<()> {
        let (Some(location), Some(user)) = (msg.location(), msg.from.as_ref()) else {
            return Ok(());
        };

        let timestamp = flow::report_time(msg.date, msg.edit_date().copied(), Utc::now());

        match tracking
            .record_location_for_user(
                user.id.0 as i64,
                location.latitude,
                location.longitude,
                timestamp,
            )
            .await
        {
            Ok(Some((driver_id, _))) => {
                debug!(driver_id = %driver_id, "Location received");
            }
            Ok(None) => {}
            Err(e) => {
                warn!(user_id = user.id.0, error = %e, "Failed to record location");
            }
        }
        Ok(())
    }

    /// Every callback is answered so the client stops its spinner
    pub(super) async fn handle_callback(bot: Bot, q: CallbackQuery) -> ResponseResult<()> {
        if let Err(e) = bot.answer_callback_query(q.id.clone()).await {
            debug!(error = %e, "Failed to answer callback query");
        }

        let Some(driver_id) = q.data.as_deref().and_then(parse_location_callback) else {
            return Ok(());
        };
        debug!(driver_id = %driver_id, "Location prompt acknowledged");

        if let Some(message) = q.regular_message() {
            let _ = bot
                .edit_message_text(message.chat.id, message.id, commands::LOCATION_PIN)
                .await;
        }
        Ok(())
    }
}

async fn send_reply(bot: &Bot, chat_id: ChatId, reply: Reply) -> ResponseResult<()> {
    let request = bot.send_message(chat_id, reply.text);
    match reply.keyboard {
        ReplyKeyboard::Keep => request.await?,
        ReplyKeyboard::LocationRequest => {
            request.reply_markup(location_request_keyboard()).await?
        }
        ReplyKeyboard::Stop => request.reply_markup(stop_keyboard()).await?,
        ReplyKeyboard::Idle => request.reply_markup(idle_keyboard()).await?,
        ReplyKeyboard::Remove => request.reply_markup(KeyboardRemove::new()).await?,
    };
    Ok(())
}
