use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Команды бота конкурсов:")]
pub enum Command {
    #[command(description = "Показать это сообщение")]
    Help,
    #[command(description = "Начать работу с ботом")]
    Start,
    #[command(description = "Ваши каналы")]
    Channel,
    #[command(description = "Ваши конкурсы")]
    Gift,
}
