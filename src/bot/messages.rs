//! Admin-facing texts for every conversation reply.

use teloxide::types::InlineKeyboardMarkup;

use crate::bot::keyboards;
use crate::conversation::Reply;
use crate::services::membership::RegistrationOutcome;
use crate::utils::feedback::FeedbackType;

pub const WELCOME: &str = "Добро пожаловать! Бот публикует конкурсы в ваших каналах.\n\n\
/channel - ваши каналы\n/gift - ваши конкурсы\n/help - список команд";
pub const FAILURE: &str = "Что-то пошло не так. Попробуйте ещё раз позже.";

/// A reply ready to be sent or edited into a message.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    pub kind: FeedbackType,
    pub text: String,
    pub keyboard: Option<InlineKeyboardMarkup>,
}

impl Rendered {
    fn plain(kind: FeedbackType, text: &str) -> Self {
        Self { kind, text: text.to_string(), keyboard: None }
    }

    fn with_keyboard(kind: FeedbackType, text: &str, keyboard: InlineKeyboardMarkup) -> Self {
        Self { kind, text: text.to_string(), keyboard: Some(keyboard) }
    }
}

/// `None` for replies that show nothing.
pub fn render(reply: &Reply) -> Option<Rendered> {
    use FeedbackType::*;

    let rendered = match reply {
        Reply::Ignored => return None,
        Reply::Welcome => Rendered::plain(Info, WELCOME),
        Reply::ChannelList(channels) => Rendered::with_keyboard(
            Info,
            if channels.is_empty() { "У вас пока нет каналов." } else { "Ваши каналы:" },
            keyboards::channel_list(channels),
        ),
        Reply::AskChannelHandle => Rendered::plain(
            Prompt,
            "Добавьте бота администратором в канал и отправьте его адрес в формате @channel_name.",
        ),
        Reply::ChannelFormatError => Rendered::plain(
            Error,
            "Неверный формат. Адрес канала начинается с @ и содержит не меньше 5 латинских букв, цифр или _.",
        ),
        Reply::ChannelRightsError => {
            Rendered::plain(Error, "Вы не являетесь администратором этого канала.")
        }
        Reply::ChannelAccessError => Rendered::plain(
            Error,
            "У бота нет доступа к каналу. Добавьте бота администратором и попробуйте снова.",
        ),
        Reply::GiftList(gifts) => Rendered::with_keyboard(
            Info,
            if gifts.is_empty() { "У вас пока нет конкурсов." } else { "Ваши конкурсы:" },
            keyboards::gift_list(gifts),
        ),
        Reply::NoChannelsForGift => {
            Rendered::plain(Warning, "Сначала добавьте хотя бы один канал командой /channel.")
        }
        Reply::AskStartPost => Rendered::plain(
            Prompt,
            "Отправьте пост начала конкурса: текст или одно фото/видео с подписью.",
        ),
        Reply::AskEndPost => Rendered::plain(
            Prompt,
            "Отправьте пост с итогами: текст или одно фото/видео с подписью.",
        ),
        Reply::SingleMediaOnly => {
            Rendered::plain(Error, "Можно прикрепить только одно фото или видео.")
        }
        Reply::EmptyContent => Rendered::plain(Error, "Пост не может быть пустым. Добавьте текст."),
        Reply::AskPostDate => Rendered::plain(
            Prompt,
            "Укажите дату публикации по Москве в формате ДД.ММ.ГГГГ ЧЧ:ММ, например 25.12.2024 18:00.",
        ),
        Reply::DateFormatError => Rendered::plain(
            Error,
            "Неверная дата. Используйте формат ДД.ММ.ГГГГ ЧЧ:ММ, например 25.12.2024 18:00.",
        ),
        Reply::ChannelPicker(channels) => Rendered::with_keyboard(
            Prompt,
            "Выберите каналы для публикации и нажмите «Завершить создание».",
            keyboards::channel_picker(channels),
        ),
        Reply::NoChannelsSelected => Rendered::plain(Warning, "Выберите хотя бы один канал."),
        Reply::GiftSaved => Rendered::plain(Success, "Конкурс создан и будет опубликован в указанное время."),
        Reply::GiftMenu(gift) => Rendered::with_keyboard(
            Info,
            &format!("Управление конкурсом: {}", keyboards::gift_label(gift)),
            keyboards::gift_menu(gift),
        ),
        Reply::EndPostSaved => Rendered::plain(
            Success,
            "Итоги сохранены. Приём участников закрыт, пост с итогами выйдет в указанное время.",
        ),
        Reply::DraftExpired => Rendered::plain(Warning, "Черновик устарел. Начните создание заново."),
        Reply::Failure => Rendered::plain(Error, FAILURE),
    };

    Some(rendered)
}

/// Alert shown to a user who pressed the join button.
pub fn registration_alert(outcome: RegistrationOutcome) -> &'static str {
    match outcome {
        RegistrationOutcome::Registered => "Вы зарегистрированы на участие в конкурсе",
        RegistrationOutcome::AlreadyRegistered => "Вы уже зарегистрированы на участие в конкурсе",
        RegistrationOutcome::NotSubscribed => "Подпишитесь на канал для участия",
        RegistrationOutcome::TransportFailure => "Не удалось зарегистрироваться, попробуйте позже",
    }
}
