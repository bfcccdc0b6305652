//! Dispatcher schema

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::Message;

use super::commands::{handle_check_command, handle_start_command};
use super::types::{HandlerDeps, HandlerError, UserInfo};
use crate::telegram::admin::{
    handle_broadcast_command, handle_deleteall_command, handle_genlink_command, handle_users_command,
};
use crate::telegram::bot::Command;
use crate::telegram::transport::Transport;

/// Creates the dispatcher schema for the bot.
///
/// Only private chats are served; everything else is ignored.
pub fn schema(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter(|msg: Message| msg.chat.is_private())
        .branch(dptree::entry().filter_command::<Command>().endpoint(
            move |bot: Bot, msg: Message, cmd: Command| {
                let deps = deps.clone();
                async move {
                    let Some(user) = UserInfo::from_message(&msg) else {
                        return Ok(());
                    };
                    log::info!("Received command {:?} from user {}", cmd, user.user_id);

                    if let Err(e) = dispatch_command(&bot, &deps, &user, cmd, &msg).await {
                        log::error!("Command handler failed for user {}: {}", user.user_id, e);
                    }
                    Ok(())
                }
            },
        ))
}

async fn dispatch_command(
    transport: &dyn Transport,
    deps: &HandlerDeps,
    user: &UserInfo,
    cmd: Command,
    msg: &Message,
) -> Result<(), HandlerError> {
    match cmd {
        Command::Start(param) => handle_start_command(transport, deps, user, &param).await,
        Command::Check => handle_check_command(transport, deps, user).await,
        Command::Users => handle_users_command(transport, deps, user.user_id).await,
        Command::Broadcast => {
            let reply_to = msg.reply_to_message().map(|reply| reply.id.0);
            handle_broadcast_command(transport, deps, user.user_id, reply_to).await
        }
        Command::Deleteall => handle_deleteall_command(transport, deps, user.user_id).await,
        Command::Genlink(args) => handle_genlink_command(transport, deps, user.user_id, &args).await,
    }
}
